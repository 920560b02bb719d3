//! Clap argument types.

use clap::Parser;
use std::path::PathBuf;

/// Conversational AI analyst for pull requests.
#[derive(Parser, Debug)]
#[command(name = "parley", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Analyze the change-request event that triggered this run.
    Run(RunArgs),

    /// Print the resolved configuration (secrets redacted).
    Config(ConfigArgs),

    /// Print version information.
    Version,
}

/// Arguments for the `run` subcommand.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Path to the checked-out repository (default: current directory).
    #[arg(long, default_value = ".")]
    pub path: PathBuf,

    /// Assemble and print the prompt without calling the analysis
    /// service or posting a comment.
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

/// Arguments for the `config` subcommand.
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Path to the checked-out repository (default: current directory).
    #[arg(long, default_value = ".")]
    pub path: PathBuf,
}
