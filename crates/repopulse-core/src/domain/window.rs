//! Time windows for activity filtering.
//!
//! A window has an optional lower and an optional upper bound, both
//! timezone-aware UTC instants. Comparisons are inclusive on both ends:
//! a record exactly at a bound is retained.

use chrono::{DateTime, Duration, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::{PulseError, Result};

/// Inclusive temporal bounds applied to repository activity.
///
/// Either side may be absent, meaning unbounded on that side.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeWindow {
    /// Inclusive lower bound.
    pub since: Option<DateTime<Utc>>,

    /// Inclusive upper bound.
    pub until: Option<DateTime<Utc>>,
}

impl TimeWindow {
    /// Create a window, enforcing `since <= until` when both bounds are set.
    pub fn new(since: Option<DateTime<Utc>>, until: Option<DateTime<Utc>>) -> Result<Self> {
        if let (Some(s), Some(u)) = (since, until) {
            if s > u {
                return Err(PulseError::WindowOrder { since: s, until: u });
            }
        }
        Ok(Self { since, until })
    }

    /// Window with no bounds on either side.
    pub fn unbounded() -> Self {
        Self {
            since: None,
            until: None,
        }
    }

    /// Daily window anchored at `now`: since = midnight UTC of the current
    /// calendar day, until unset.
    pub fn daily_from(now: DateTime<Utc>) -> Self {
        let midnight = now.date_naive().and_time(NaiveTime::MIN).and_utc();
        Self {
            since: Some(midnight),
            until: None,
        }
    }

    /// Daily window anchored at the current instant.
    pub fn daily() -> Self {
        Self::daily_from(Utc::now())
    }

    /// Range window of the trailing `days` calendar days, anchored at `now`.
    ///
    /// Bounds are calendar dates, not instants: both collapse to midnight
    /// UTC. The precision drop is intentional and matches the digest file
    /// naming, which is date-granular.
    pub fn range_from(now: DateTime<Utc>, days: u32) -> Result<Self> {
        if days == 0 {
            return Err(PulseError::EmptyRange);
        }
        let today = now.date_naive();
        let start = today - Duration::days(i64::from(days));
        Self::new(
            Some(start.and_time(NaiveTime::MIN).and_utc()),
            Some(today.and_time(NaiveTime::MIN).and_utc()),
        )
    }

    /// Range window of the trailing `days` days ending today.
    pub fn range(days: u32) -> Result<Self> {
        Self::range_from(Utc::now(), days)
    }

    /// Whether `instant` satisfies both bounds, inclusively.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.since.map_or(true, |s| instant >= s) && self.until.map_or(true, |u| instant <= u)
    }

    /// Whether `instant` satisfies the upper bound only, inclusively.
    ///
    /// Issue filtering uses this: issues are never pruned by the lower bound.
    pub fn ends_by(&self, instant: DateTime<Utc>) -> bool {
        self.until.map_or(true, |u| instant <= u)
    }
}
