use clap::Parser;
use std::path::PathBuf;

/// Rank npm packages that can be replaced or removed, and the repositories
/// that would benefit most from a bundled replacement PR
#[derive(Parser, Debug)]
#[command(name = "e18e-analyzer")]
#[command(version)]
#[command(about = "Rank replaceable npm packages and the repositories that depend on them", long_about = None)]
pub struct Args {
    /// Analyze a cross-source sample of this many candidates
    #[arg(short, long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    pub limit: Option<u64>,

    /// Approve the estimated warehouse cost without prompting
    #[arg(short, long)]
    pub yes: bool,

    /// Path to a config file (defaults to ./e18e-analyzer.config.yml when present)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory for leaderboard.json, stats.json and target-repos.json
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
