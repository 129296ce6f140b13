//! repopulsed - scheduled digest and report sweeps
//!
//! Wakes at the configured `execution_time` (UTC), aggregates the trailing
//! `frequency_days` window for every subscription, writes digests and
//! reports, then sleeps until the next cycle. A broken repository is
//! logged and skipped; the daemon itself only exits on ctrl-c or a config
//! it cannot start with.

use std::path::PathBuf;

use anyhow::{ensure, Context, Result};
use chrono::{DateTime, Duration, NaiveTime, Utc};
use clap::Parser;
use tracing::{info, warn, Level};

use repopulse_core::{
    Config, DigestWriter, GitHubClient, OpenAiSummarizer, RepoId, ReportGenerator,
    SubscriptionStore, TimeWindow,
};

#[derive(Parser)]
#[command(name = "repopulsed")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Scheduler daemon for repopulse digests and reports", long_about = None)]
struct Cli {
    /// Path to the configuration file
    #[arg(long, default_value = "config.json")]
    config: PathBuf,

    /// Run one sweep immediately instead of waiting for the first slot
    #[arg(long)]
    run_now: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    repopulse_core::init_tracing(cli.json, level);

    let config = Config::load_or_default(&cli.config)
        .with_context(|| format!("load config from {:?}", cli.config))?;
    ensure!(
        config.schedule.frequency_days > 0,
        "schedule.frequency_days must be at least 1"
    );
    let execution_time = config.schedule.execution_time_parsed()?;

    info!(
        event = "daemon.started",
        execution_time = %config.schedule.execution_time,
        frequency_days = config.schedule.frequency_days,
    );

    let mut next = if cli.run_now {
        Utc::now()
    } else {
        next_run_at(Utc::now(), execution_time)
    };

    loop {
        let now = Utc::now();
        if next > now {
            info!(event = "sweep.scheduled", at = %next);
            let wait = (next - now).to_std().unwrap_or_default();
            tokio::select! {
                _ = tokio::time::sleep(wait) => {}
                _ = tokio::signal::ctrl_c() => {
                    info!(event = "daemon.stopped");
                    return Ok(());
                }
            }
        }

        match sweep(&config).await {
            Ok(processed) => info!(event = "sweep.completed", repos = processed),
            Err(error) => warn!(event = "sweep.failed", error = %error),
        }

        next += Duration::days(i64::from(config.schedule.frequency_days));
    }
}

/// First occurrence of `at` strictly after `now`: today if still ahead,
/// otherwise tomorrow.
fn next_run_at(now: DateTime<Utc>, at: NaiveTime) -> DateTime<Utc> {
    let today = now.date_naive().and_time(at).and_utc();
    if today > now {
        today
    } else {
        today + Duration::days(1)
    }
}

/// One pass over every subscription. Per-repo failures are skipped so one
/// bad repository cannot starve the rest.
async fn sweep(config: &Config) -> Result<usize> {
    let store = SubscriptionStore::new(&config.subscriptions_file);
    let repos = store.list().context("read subscription list")?;
    if repos.is_empty() {
        info!(event = "sweep.empty");
        return Ok(0);
    }

    let client = GitHubClient::new(config.require_github_token()?)?;
    let writer = DigestWriter::new(&config.digest_dir);
    let summarizer = match &config.llm.api_key {
        Some(_) => Some(OpenAiSummarizer::new(&config.llm)?),
        None => {
            info!(event = "sweep.reports_skipped", reason = "llm api key not set");
            None
        }
    };
    let window = TimeWindow::range(config.schedule.frequency_days)?;

    let mut processed = 0usize;
    for repo in &repos {
        match process_repo(&client, &writer, summarizer.as_ref(), repo, &window).await {
            Ok(path) => {
                processed += 1;
                info!(event = "sweep.repo_done", repo = %repo, path = %path.display());
            }
            Err(error) => repopulse_core::emit_repo_skipped(repo, &error),
        }
    }
    Ok(processed)
}

async fn process_repo(
    client: &GitHubClient,
    writer: &DigestWriter,
    summarizer: Option<&OpenAiSummarizer>,
    repo: &RepoId,
    window: &TimeWindow,
) -> repopulse_core::Result<PathBuf> {
    let bundle = client.aggregate(repo, window).await?;
    let digest_path = writer.write(&bundle)?;

    if let Some(summarizer) = summarizer {
        let generator = ReportGenerator::new(summarizer);
        let (_, report_path) = generator.generate_progress_report(&digest_path).await?;
        return Ok(report_path);
    }
    Ok(digest_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instant(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s)
            .expect("valid RFC3339")
            .with_timezone(&Utc)
    }

    #[test]
    fn test_next_run_is_today_when_slot_is_ahead() {
        let now = instant("2024-01-15T06:30:00Z");
        let at = NaiveTime::from_hms_opt(8, 0, 0).expect("valid time");
        assert_eq!(next_run_at(now, at), instant("2024-01-15T08:00:00Z"));
    }

    #[test]
    fn test_next_run_rolls_to_tomorrow_when_slot_passed() {
        let now = instant("2024-01-15T09:00:00Z");
        let at = NaiveTime::from_hms_opt(8, 0, 0).expect("valid time");
        assert_eq!(next_run_at(now, at), instant("2024-01-16T08:00:00Z"));
    }

    #[test]
    fn test_next_run_exact_slot_rolls_forward() {
        // Waking exactly on the slot must not schedule a zero-length sleep.
        let now = instant("2024-01-15T08:00:00Z");
        let at = NaiveTime::from_hms_opt(8, 0, 0).expect("valid time");
        assert_eq!(next_run_at(now, at), instant("2024-01-16T08:00:00Z"));
    }
}
