//! Process configuration. Built once at startup and handed to components explicitly.

use crate::model::{Run, RunView};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_DATABASE_URL: &str = "sqlite:///regdash.db";
pub const DEFAULT_LOG_BASE_URL: &str = "https://logs.example.com/request/";
pub const DEFAULT_BIND: &str = "127.0.0.1:5000";
pub const DEFAULT_CLOUDS: [&str; 2] = ["blr-cloud4", "blr-cloud5"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashConfig {
    pub database_url: String,
    pub log_base_url: String,
    pub monitored_clouds: Vec<String>,
    pub bind: String,
}

impl Default for DashConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            log_base_url: DEFAULT_LOG_BASE_URL.to_string(),
            monitored_clouds: DEFAULT_CLOUDS.iter().map(|c| c.to_string()).collect(),
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

/// Where the run store lives, derived from `database_url`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    Memory,
    File(PathBuf),
}

impl DashConfig {
    pub fn store_location(&self) -> StoreLocation {
        let raw = self.database_url.trim();
        let path = raw
            .strip_prefix("sqlite:///")
            .or_else(|| raw.strip_prefix("sqlite://"))
            .or_else(|| raw.strip_prefix("sqlite:"))
            .unwrap_or(raw);
        if path.is_empty() || path == ":memory:" {
            StoreLocation::Memory
        } else {
            StoreLocation::File(PathBuf::from(path))
        }
    }

    pub fn log_url(&self, request_id: &str) -> String {
        format!("{}{}", self.log_base_url, request_id)
    }

    pub fn view(&self, run: Run) -> RunView {
        let log_url = self.log_url(&run.request_id);
        RunView { run, log_url }
    }

    /// Parse a comma separated cloud list, dropping blanks.
    pub fn parse_clouds(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect()
    }
}
