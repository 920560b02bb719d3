//! parley — conversational AI analyst for pull requests.
//!
//! Entry point and error handling boundary. Uses `anyhow` for
//! ergonomic error propagation and user-facing messages.

mod cli;

use parley::analysis::http::HttpAnalysisService;
use parley::analysis::AnalysisService;
use parley::config::Config;
use parley::constants;
use parley::env::Env;
use parley::host::github::{self, GithubHost};
use parley::host::ChangeRequestHost;
use parley::models::TriggerEvent;
use parley::runner::{self, Outcome};

use std::process;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;

use cli::args::{Cli, Command, ConfigArgs, RunArgs};

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Run(args) => run_analysis(args).await,
        Command::Config(args) => run_config(args),
        Command::Version => run_version(),
    }
}

/// Print version information.
fn run_version() -> Result<()> {
    println!(
        "{} {}",
        constants::APP_NAME.bold(),
        env!("CARGO_PKG_VERSION").green().bold()
    );
    Ok(())
}

/// Print the resolved configuration for troubleshooting workflows.
fn run_config(args: ConfigArgs) -> Result<()> {
    let repo_root = std::fs::canonicalize(&args.path)
        .with_context(|| format!("--path directory not found: {}", args.path.display()))?;
    let config = Config::load(Some(&repo_root), &Env::real())
        .context("failed to load configuration")?;

    println!("{config:#?}");
    Ok(())
}

async fn run_analysis(args: RunArgs) -> Result<()> {
    let env = Env::real();

    let repo_root = std::fs::canonicalize(&args.path)
        .with_context(|| format!("--path directory not found: {}", args.path.display()))?;

    // Configuration problems abort before any external call.
    let config = Config::load(Some(&repo_root), &env).context("failed to load configuration")?;
    config.validate().context("invalid configuration")?;

    let payload = github::load_event(&env)
        .await
        .context("failed to load the trigger event")?;

    let Some(event) = TriggerEvent::parse(&payload.action, payload.merged) else {
        eprintln!(
            "Ignoring unsupported event action: {}",
            payload.action,
        );
        return Ok(());
    };

    let host: Arc<dyn ChangeRequestHost> =
        Arc::new(GithubHost::from_env(&env).context("failed to set up the GitHub client")?);
    let service: Arc<dyn AnalysisService> = Arc::new(
        HttpAnalysisService::new(&config.analysis)
            .context("failed to set up the analysis client")?,
    );

    let outcome = runner::execute(
        &config,
        event,
        &payload.request,
        &repo_root,
        host,
        service,
        args.dry_run,
    )
    .await?;

    match outcome {
        Outcome::SessionTerminated => {
            eprintln!(
                "  {} Session for #{} terminated.",
                "✔".green().bold(),
                payload.request.number,
            );
        }
        Outcome::NothingToAnalyze => {
            eprintln!("No changes to analyze.");
        }
        Outcome::DryRun { prompt_chars } => {
            eprintln!(
                "  {} Dry run: assembled a {prompt_chars}-character prompt.",
                "✔".green().bold(),
            );
        }
        Outcome::Posted {
            content_files,
            diff_files,
        } => {
            eprintln!(
                "  {} Posted analysis for #{} ({content_files} file(s) with content, {diff_files} diff(s)).",
                "✔".green().bold(),
                payload.request.number,
            );
        }
    }

    Ok(())
}
