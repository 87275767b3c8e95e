//! CLI argument parsing for defersched

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ds")]
#[command(author, version, about = "Deferred callback scheduling demo driver", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(short = 'l', long = "log-level", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a scripted schedule/commit scenario
    Demo {
        /// Invocations to schedule before the first commit
        #[arg(short, long, default_value_t = 3)]
        entries: usize,

        /// Reschedule once from inside the callback to show cycle deferral
        #[arg(short, long)]
        reschedule: bool,

        /// Output format for the final stats
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Print the effective configuration
    Config,
}

/// Output format for stats
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
