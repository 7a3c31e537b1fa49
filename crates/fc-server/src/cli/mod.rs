use clap::Parser;

pub mod root_commands;

pub use root_commands::Commands;

use crate::output::OutputFormat;

/// Top-level CLI parser for the `fleetcheck` binary.
#[derive(Debug, Parser)]
#[command(name = "fleetcheck", version, about = "Machine checklist tracking and repair dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format for one-shot commands: json, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Database path (overrides config)
    #[arg(long, global = true)]
    pub db: Option<String>,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Global flags available before or after subcommands.
#[derive(Clone, Debug)]
pub struct GlobalFlags {
    pub format: OutputFormat,
    pub db: Option<String>,
}

impl Cli {
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            db: self.db.clone(),
        }
    }
}
