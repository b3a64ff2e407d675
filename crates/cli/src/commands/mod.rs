//! CLI command definitions and execution

use clap::{Parser, Subcommand};

use ilm_core::ConfigManager;

use crate::exit_code::ExitCode;
use crate::output::OutputConfig;

pub mod completions;
pub mod rule;

/// ilm - bucket lifecycle rule manager
///
/// Compose, edit and inspect the lifecycle rules of buckets on
/// S3-compatible object storage.
#[derive(Parser, Debug)]
#[command(name = "ilm")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format: human-readable or JSON
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true, default_value = "false")]
    pub no_color: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, default_value = "false")]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, global = true, default_value = "false")]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage bucket lifecycle rules
    #[command(subcommand)]
    Rule(rule::RuleCommands),

    /// Generate shell completion scripts
    Completions(completions::CompletionsArgs),
}

/// Execute the CLI command and return an exit code
pub async fn execute(cli: Cli) -> ExitCode {
    let output_config = OutputConfig {
        json: cli.json || configured_json_output(),
        no_color: cli.no_color,
        quiet: cli.quiet,
    };

    match cli.command {
        Commands::Rule(cmd) => rule::execute(cmd, output_config).await,
        Commands::Completions(args) => completions::execute(args),
    }
}

/// Whether the configuration file asks for JSON output by default
///
/// A broken file is reported later, when aliases are resolved.
fn configured_json_output() -> bool {
    ConfigManager::new()
        .and_then(|manager| manager.load())
        .map(|config| config.json_output())
        .unwrap_or(false)
}
