use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Run the HTTP API.
    Serve(ServeArgs),
    /// Compute dashboard stats once and print them.
    Stats(StatsArgs),
    /// Load staff and assets from a JSON file into empty tables.
    Seed(SeedArgs),
    /// Rewrite legacy category tags and completion timestamps.
    Backfill,
}

#[derive(Clone, Debug, Args)]
pub struct ServeArgs {
    /// Listen host (overrides config)
    #[arg(long)]
    pub host: Option<String>,

    /// Listen port (overrides config)
    #[arg(long)]
    pub port: Option<u16>,

    /// Seed file applied before serving
    #[arg(long)]
    pub seed: Option<PathBuf>,
}

#[derive(Clone, Debug, Args)]
pub struct StatsArgs {
    /// Tenant to compute for; all tenants when omitted
    #[arg(long)]
    pub company: Option<String>,

    /// Print the repair board instead of the counts
    #[arg(long)]
    pub repairs: bool,
}

#[derive(Clone, Debug, Args)]
pub struct SeedArgs {
    /// JSON file with `staff` and `assets` arrays
    pub file: PathBuf,
}
