use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod common;
pub use common::*;

#[derive(Parser)]
#[command(
    name = "regdash",
    version,
    about = "Regression dashboard: 24h lab windows, pass rates and failure reasons"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Drop and recreate the run store
    ResetDb(ResetArgs),
    /// Add demo runs to the current window
    SeedDemo(SeedDemoArgs),
    /// Wipe the store and fill the last seven windows
    SeedWeek(SeedWeekArgs),
    /// Ingest a JSON array of run records
    Ingest(IngestArgs),
    /// Summarize one window
    Summary(SummaryArgs),
    /// Per-cloud pass rate over recent windows
    Trend(TrendArgs),
    /// List the selectable windows
    Windows(WindowsArgs),
    /// Serve the JSON API
    Serve(ServeArgs),
    Version,
}

#[derive(Parser, Debug, Clone)]
pub struct ResetArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Parser, Debug, Clone)]
pub struct SeedDemoArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    #[arg(long, default_value_t = regdash_core::seed::DEFAULT_DEMO_RUNS)]
    pub count: usize,

    /// RNG seed for reproducible data
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Parser, Debug, Clone)]
pub struct SeedWeekArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// RNG seed for reproducible data
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Parser, Debug, Clone)]
pub struct IngestArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// JSON file to read, or `-` for stdin
    pub input: PathBuf,
}

#[derive(Parser, Debug, Clone)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    #[command(flatten)]
    pub window: WindowArgs,

    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,

    /// Also write the JSON report to this file
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct TrendArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Number of windows, newest first (1..=7)
    #[arg(long, default_value_t = regdash_core::trend::DEFAULT_TREND_WINDOWS)]
    pub windows: usize,

    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

#[derive(Parser, Debug, Clone)]
pub struct WindowsArgs {
    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

#[derive(Parser, Debug, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    #[arg(long, env = "REGDASH_BIND", default_value = regdash_core::config::DEFAULT_BIND)]
    pub bind: String,
}

#[cfg(test)]
mod tests;
