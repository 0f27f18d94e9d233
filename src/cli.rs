//! Command-line interface definition.

use clap::Parser;

#[derive(Debug, Parser)]
#[command(
    name = "moviegrid",
    about = "Debounced movie search against a remote catalog",
    version
)]
pub struct Cli {
    /// Catalog API base URL (overrides MOVIEGRID_API_BASE).
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Debounce window in milliseconds.
    #[arg(long, value_name = "MS")]
    pub debounce_ms: Option<u64>,

    /// Run a single search and exit instead of reading terms from stdin.
    #[arg(long, value_name = "QUERY")]
    pub once: Option<String>,

    /// Print state snapshots as JSON lines instead of plain text.
    #[arg(long)]
    pub json: bool,

    /// Debug-level logging when RUST_LOG is not set.
    #[arg(short, long)]
    pub verbose: bool,
}
