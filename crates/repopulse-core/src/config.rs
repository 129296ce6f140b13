//! Runtime configuration: one explicit value loaded at startup and passed
//! by reference, never read from globals mid-flight.
//!
//! The file is JSON; every field has a default except the GitHub token,
//! which commands demand through [`Config::require_github_token`] only when
//! they actually talk to the API. Environment overrides (`GITHUB_TOKEN`,
//! `OPENAI_API_KEY`, `OPENAI_API_BASE`) win over file values.

use std::path::{Path, PathBuf};

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::domain::{PulseError, Result};

/// Front-page collection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsConfig {
    pub output_dir: PathBuf,
    pub story_limit: usize,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("hacker_news"),
            story_limit: crate::news::DEFAULT_STORY_LIMIT,
        }
    }
}

/// Summarizer endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub api_base: String,
    pub model: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
        }
    }
}

/// Daemon schedule: run every `frequency_days` at `execution_time` UTC.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    pub frequency_days: u32,
    pub execution_time: String,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            frequency_days: 1,
            execution_time: "08:00".to_string(),
        }
    }
}

impl ScheduleConfig {
    /// `execution_time` as a time of day. `"HH:MM"` only.
    pub fn execution_time_parsed(&self) -> Result<NaiveTime> {
        NaiveTime::parse_from_str(&self.execution_time, "%H:%M").map_err(|_| {
            PulseError::Config(format!(
                "execution_time {:?} is not HH:MM",
                self.execution_time
            ))
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub github_token: Option<String>,
    pub subscriptions_file: PathBuf,
    pub digest_dir: PathBuf,
    pub news: NewsConfig,
    pub llm: LlmConfig,
    pub schedule: ScheduleConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            github_token: None,
            subscriptions_file: PathBuf::from("subscriptions.json"),
            digest_dir: PathBuf::from("daily_progress"),
            news: NewsConfig::default(),
            llm: LlmConfig::default(),
            schedule: ScheduleConfig::default(),
        }
    }
}

/// Env values that override file values. Split out so the override logic
/// is testable without touching process state.
#[derive(Debug, Default)]
struct EnvOverrides {
    github_token: Option<String>,
    openai_api_key: Option<String>,
    openai_api_base: Option<String>,
}

impl EnvOverrides {
    fn from_env() -> Self {
        Self {
            github_token: non_empty_env("GITHUB_TOKEN"),
            openai_api_key: non_empty_env("OPENAI_API_KEY"),
            openai_api_base: non_empty_env("OPENAI_API_BASE"),
        }
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

impl Config {
    /// Load from a JSON file and apply env overrides.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let mut config: Config = serde_json::from_str(&raw)?;
        config.apply_overrides(EnvOverrides::from_env());
        Ok(config)
    }

    /// Like [`Config::load`], but a missing file yields the defaults
    /// (still env-overridden) instead of an error.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            let mut config = Self::default();
            config.apply_overrides(EnvOverrides::from_env());
            Ok(config)
        }
    }

    fn apply_overrides(&mut self, overrides: EnvOverrides) {
        if let Some(token) = overrides.github_token {
            self.github_token = Some(token);
        }
        if let Some(key) = overrides.openai_api_key {
            self.llm.api_key = Some(key);
        }
        if let Some(base) = overrides.openai_api_base {
            self.llm.api_base = base;
        }
    }

    /// The GitHub token, or a config error naming both places it can come
    /// from.
    pub fn require_github_token(&self) -> Result<&str> {
        self.github_token
            .as_deref()
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                PulseError::Config(
                    "github token is not set (config file `github_token` or GITHUB_TOKEN env)"
                        .to_string(),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.github_token, None);
        assert_eq!(config.subscriptions_file, PathBuf::from("subscriptions.json"));
        assert_eq!(config.digest_dir, PathBuf::from("daily_progress"));
        assert_eq!(config.news.output_dir, PathBuf::from("hacker_news"));
        assert_eq!(config.news.story_limit, 30);
        assert_eq!(config.llm.api_base, "https://api.openai.com/v1");
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.schedule.frequency_days, 1);
        assert_eq!(config.schedule.execution_time, "08:00");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"github_token": "ghp_abc", "schedule": {"frequency_days": 7}}"#,
        )
        .expect("write config");

        let config = Config::load(&path).expect("load config");
        assert_eq!(config.github_token.as_deref(), Some("ghp_abc"));
        assert_eq!(config.schedule.frequency_days, 7);
        // Untouched fields keep their defaults.
        assert_eq!(config.schedule.execution_time, "08:00");
        assert_eq!(config.digest_dir, PathBuf::from("daily_progress"));
    }

    #[test]
    fn test_overrides_win_over_file_values() {
        let mut config = Config {
            github_token: Some("from-file".to_string()),
            ..Config::default()
        };
        config.apply_overrides(EnvOverrides {
            github_token: Some("from-env".to_string()),
            openai_api_key: Some("sk-env".to_string()),
            openai_api_base: None,
        });

        assert_eq!(config.github_token.as_deref(), Some("from-env"));
        assert_eq!(config.llm.api_key.as_deref(), Some("sk-env"));
        assert_eq!(config.llm.api_base, "https://api.openai.com/v1");
    }

    #[test]
    fn test_require_github_token() {
        let mut config = Config::default();
        assert!(matches!(
            config.require_github_token(),
            Err(PulseError::Config(_))
        ));

        config.github_token = Some(String::new());
        assert!(config.require_github_token().is_err());

        config.github_token = Some("ghp_abc".to_string());
        assert_eq!(config.require_github_token().expect("token"), "ghp_abc");
    }

    #[test]
    fn test_execution_time_parses_hh_mm_only() {
        let schedule = ScheduleConfig::default();
        let t = schedule.execution_time_parsed().expect("default parses");
        assert_eq!(t, NaiveTime::from_hms_opt(8, 0, 0).expect("valid time"));

        let bad = ScheduleConfig {
            execution_time: "8am".to_string(),
            ..ScheduleConfig::default()
        };
        assert!(matches!(
            bad.execution_time_parsed(),
            Err(PulseError::Config(_))
        ));
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config =
            Config::load_or_default(&dir.path().join("absent.json")).expect("defaults load");
        assert_eq!(config.subscriptions_file, PathBuf::from("subscriptions.json"));
    }
}
