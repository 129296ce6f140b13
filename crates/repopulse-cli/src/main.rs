//! repopulse - repository activity digests and progress reports
//!
//! ## Commands
//!
//! - `digest`: fetch windowed activity and export a markdown digest
//! - `report`: digest plus an LLM-written progress report
//! - `news`: Hacker News front-page digest, optionally summarized
//! - `subs`: manage the subscription list

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::Level;

use repopulse_core::{
    Config, DigestWriter, DryRunSummarizer, GitHubClient, HackerNewsClient, NewsWriter,
    OpenAiSummarizer, RepoId, ReportGenerator, SubscriptionStore, Summarizer, TimeWindow,
};

#[derive(Parser)]
#[command(name = "repopulse")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Repository activity digests and progress reports", long_about = None)]
struct Cli {
    /// Path to the configuration file
    #[arg(long, global = true, default_value = "config.json")]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a markdown digest of recent repository activity
    Digest {
        /// Single repository as owner/name (default: every subscription)
        #[arg(short, long)]
        repo: Option<String>,

        /// Look back this many days instead of today only
        #[arg(short, long)]
        days: Option<u32>,
    },

    /// Export a digest and summarize it into a progress report
    Report {
        /// Single repository as owner/name (default: every subscription)
        #[arg(short, long)]
        repo: Option<String>,

        /// Look back this many days instead of today only
        #[arg(short, long)]
        days: Option<u32>,

        /// Echo the digest instead of calling the summarizer
        #[arg(long)]
        dry_run: bool,
    },

    /// Export a Hacker News front-page digest
    News {
        /// Also summarize the digest into a report
        #[arg(long)]
        report: bool,

        /// Echo the digest instead of calling the summarizer
        #[arg(long)]
        dry_run: bool,
    },

    /// Manage repository subscriptions
    Subs {
        #[command(subcommand)]
        action: SubsAction,
    },
}

#[derive(Subcommand)]
enum SubsAction {
    /// List subscribed repositories
    List,

    /// Subscribe to a repository
    Add {
        /// Repository as owner/name
        repo: String,
    },

    /// Unsubscribe from a repository
    Remove {
        /// Repository as owner/name
        repo: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    repopulse_core::init_tracing(cli.json, level);

    let config = Config::load_or_default(&cli.config)
        .with_context(|| format!("load config from {:?}", cli.config))?;

    match cli.command {
        Commands::Digest { repo, days } => cmd_digest(&config, repo.as_deref(), days).await,
        Commands::Report {
            repo,
            days,
            dry_run,
        } => cmd_report(&config, repo.as_deref(), days, dry_run).await,
        Commands::News { report, dry_run } => cmd_news(&config, report, dry_run).await,
        Commands::Subs { action } => match action {
            SubsAction::List => cmd_subs_list(&config),
            SubsAction::Add { repo } => cmd_subs_add(&config, &repo),
            SubsAction::Remove { repo } => cmd_subs_remove(&config, &repo),
        },
    }
}

/// Daily window unless `--days` was given.
fn window_for(days: Option<u32>) -> Result<TimeWindow> {
    match days {
        None => Ok(TimeWindow::daily()),
        Some(days) => Ok(TimeWindow::range(days)?),
    }
}

/// The explicit `--repo`, or every subscription.
fn target_repos(config: &Config, repo: Option<&str>) -> Result<Vec<RepoId>> {
    match repo {
        Some(slug) => Ok(vec![slug.parse::<RepoId>()?]),
        None => {
            let store = SubscriptionStore::new(&config.subscriptions_file);
            store.list().context("read subscription list")
        }
    }
}

fn summarizer_for(config: &Config, dry_run: bool) -> Result<Box<dyn Summarizer>> {
    if dry_run {
        Ok(Box::new(DryRunSummarizer))
    } else {
        Ok(Box::new(OpenAiSummarizer::new(&config.llm)?))
    }
}

async fn export_digest(
    client: &GitHubClient,
    writer: &DigestWriter,
    repo: &RepoId,
    window: &TimeWindow,
) -> repopulse_core::Result<PathBuf> {
    let bundle = client.aggregate(repo, window).await?;
    writer.write(&bundle)
}

/// Export digests for one or all repositories
async fn cmd_digest(config: &Config, repo: Option<&str>, days: Option<u32>) -> Result<()> {
    let repos = target_repos(config, repo)?;
    if repos.is_empty() {
        println!("No subscriptions; add one with `repopulse subs add <owner/name>`.");
        return Ok(());
    }

    // A single-repo invocation fails loudly; the all-subscriptions sweep
    // skips the broken repo and keeps going.
    let single = repo.is_some();
    let client = GitHubClient::new(config.require_github_token()?)?;
    let writer = DigestWriter::new(&config.digest_dir);
    let window = window_for(days)?;

    for repo in &repos {
        match export_digest(&client, &writer, repo, &window).await {
            Ok(path) => println!("Digest written to {}", path.display()),
            Err(error) if !single => repopulse_core::emit_repo_skipped(repo, &error),
            Err(error) => return Err(error.into()),
        }
    }
    Ok(())
}

/// Export digests and summarize each into a report
async fn cmd_report(
    config: &Config,
    repo: Option<&str>,
    days: Option<u32>,
    dry_run: bool,
) -> Result<()> {
    let repos = target_repos(config, repo)?;
    if repos.is_empty() {
        println!("No subscriptions; add one with `repopulse subs add <owner/name>`.");
        return Ok(());
    }

    let single = repo.is_some();
    let client = GitHubClient::new(config.require_github_token()?)?;
    let writer = DigestWriter::new(&config.digest_dir);
    let window = window_for(days)?;
    let summarizer = summarizer_for(config, dry_run)?;
    let generator = ReportGenerator::new(summarizer.as_ref());

    for repo in &repos {
        let outcome = async {
            let path = export_digest(&client, &writer, repo, &window).await?;
            generator.generate_progress_report(&path).await
        }
        .await;

        match outcome {
            Ok((_, report_path)) => println!("Report written to {}", report_path.display()),
            Err(error) if !single => repopulse_core::emit_repo_skipped(repo, &error),
            Err(error) => return Err(error.into()),
        }
    }
    Ok(())
}

/// Export the Hacker News front page, optionally with a report
async fn cmd_news(config: &Config, report: bool, dry_run: bool) -> Result<()> {
    let client = HackerNewsClient::new()?.with_story_limit(config.news.story_limit);
    let stories = client.top_stories().await.context("fetch front page")?;

    let writer = NewsWriter::new(&config.news.output_dir);
    let path = writer.write(&stories, Utc::now().date_naive())?;
    println!("News digest written to {}", path.display());

    if report {
        let summarizer = summarizer_for(config, dry_run)?;
        let generator = ReportGenerator::new(summarizer.as_ref());
        let (_, report_path) = generator.generate_news_report(&path).await?;
        println!("News report written to {}", report_path.display());
    }
    Ok(())
}

fn cmd_subs_list(config: &Config) -> Result<()> {
    let store = SubscriptionStore::new(&config.subscriptions_file);
    let repos = store.list()?;
    if repos.is_empty() {
        println!("No subscriptions.");
        return Ok(());
    }
    for repo in repos {
        println!("{}", repo);
    }
    Ok(())
}

fn cmd_subs_add(config: &Config, slug: &str) -> Result<()> {
    let repo: RepoId = slug.parse()?;
    let store = SubscriptionStore::new(&config.subscriptions_file);
    if store.add(&repo)? {
        println!("Subscribed to {}", repo);
    } else {
        println!("Already subscribed to {}", repo);
    }
    Ok(())
}

fn cmd_subs_remove(config: &Config, slug: &str) -> Result<()> {
    let repo: RepoId = slug.parse()?;
    let store = SubscriptionStore::new(&config.subscriptions_file);
    store.remove(&repo)?;
    println!("Unsubscribed from {}", repo);
    Ok(())
}
