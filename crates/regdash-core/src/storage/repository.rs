use crate::errors::Result;
use crate::model::Run;
use crate::window::Window;
use serde::{Deserialize, Serialize};

/// Optional equality filters applied on top of a window query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunFilter {
    pub status: Option<String>,
    pub reason: Option<String>,
    pub scheduler: Option<String>,
    pub cloud: Option<String>,
}

impl RunFilter {
    pub fn cloud(cloud: impl Into<String>) -> Self {
        Self {
            cloud: Some(cloud.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpsertOutcome {
    pub added: usize,
    pub updated: usize,
}

/// Narrow storage boundary the aggregation side depends on.
pub trait RunRepository {
    /// Insert or replace by `request_id`, all-or-nothing.
    fn upsert_runs(&self, runs: &[Run]) -> Result<UpsertOutcome>;

    /// Runs with `started_at` in `[window.start, window.end)`, newest first.
    fn runs_in_window(&self, window: &Window, filter: &RunFilter) -> Result<Vec<Run>>;

    fn get_run(&self, request_id: &str) -> Result<Option<Run>>;

    fn count_runs(&self) -> Result<u64>;
}
