//! Shared argument types used across multiple commands.

use chrono::NaiveDate;
use clap::ValueEnum;
use regdash_core::config::{DashConfig, DEFAULT_DATABASE_URL, DEFAULT_LOG_BASE_URL};

#[derive(ValueEnum, Clone, Debug, Default, PartialEq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(clap::Args, Debug, Clone)]
pub struct CommonArgs {
    /// Run store location (sqlite:///path or :memory:)
    #[arg(long = "db", env = "DATABASE_URL", default_value = DEFAULT_DATABASE_URL)]
    pub database_url: String,

    /// Prefix for per-run log links
    #[arg(long, env = "LOG_BASE_URL", default_value = DEFAULT_LOG_BASE_URL)]
    pub log_base_url: String,

    /// Comma separated clouds always shown in trends
    #[arg(long, env = "REGDASH_CLOUDS", default_value = "blr-cloud4,blr-cloud5")]
    pub clouds: String,
}

impl CommonArgs {
    pub fn config(&self) -> DashConfig {
        DashConfig {
            database_url: self.database_url.clone(),
            log_base_url: self.log_base_url.clone(),
            monitored_clouds: DashConfig::parse_clouds(&self.clouds),
            ..DashConfig::default()
        }
    }
}

/// Window selection: explicit bounds, a lab day, or an offset from the current window.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct WindowArgs {
    /// Windows back from the current one (0..=6)
    #[arg(long, default_value_t = 0, conflicts_with_all = ["day", "start"])]
    pub offset: u32,

    /// Lab day (YYYY-MM-DD) whose 10:00 window to show
    #[arg(long, conflicts_with = "start")]
    pub day: Option<NaiveDate>,

    /// Explicit window start (ISO 8601; without an offset it is lab time)
    #[arg(long, requires = "end")]
    pub start: Option<String>,

    /// Explicit window end (ISO 8601; without an offset it is lab time)
    #[arg(long, requires = "start")]
    pub end: Option<String>,
}
