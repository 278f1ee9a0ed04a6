use std::path::PathBuf;

use clap::Parser;

/// Search for a keyword and wait for the service to publish its result page.
#[derive(Debug, Parser)]
#[command(name = "pagewatch")]
#[command(version)]
pub struct Args {
    /// Keyword to search for
    pub keyword: String,

    /// RON configuration file
    #[arg(short, long, default_value = "pagewatch.ron")]
    pub config: PathBuf,

    /// Search service base URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Maximum number of items the service should scrape
    #[arg(long)]
    pub max_results: Option<u32>,

    /// Ask the service to ignore cached results
    #[arg(long)]
    pub no_cache: bool,

    /// Delay between probe rounds, in milliseconds
    #[arg(long)]
    pub poll_ms: Option<u64>,

    /// Give up waiting after this many milliseconds
    #[arg(long)]
    pub max_ms: Option<u64>,

    /// Also write logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}
