pub mod console;
pub mod json;

use crate::aggregate::WindowSummary;
use crate::trend::TrendPoint;
use serde::Serialize;
use std::collections::BTreeMap;

/// Everything the dashboard shows for one window.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub label: String,
    pub range_label: String,
    pub summary: WindowSummary,
    pub cloud_trends: BTreeMap<String, Vec<TrendPoint>>,
}

impl DashboardReport {
    pub fn new(summary: WindowSummary, cloud_trends: BTreeMap<String, Vec<TrendPoint>>) -> Self {
        Self {
            label: summary.window.label(),
            range_label: summary.window.range_label(),
            summary,
            cloud_trends,
        }
    }
}
