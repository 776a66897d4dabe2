//! Window aggregation: status counts, pass percentage, failure buckets, per-cloud counts.

use crate::errors::Result;
use crate::model::{Run, RunStatus};
use crate::storage::{RunFilter, RunRepository};
use crate::window::Window;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Pass percentage reported for a window without runs.
pub const EMPTY_PASS_PCT: f64 = 0.0;

const ALWAYS_REPORTED: [RunStatus; 3] = [RunStatus::Passed, RunStatus::Failed, RunStatus::Killed];

/// Non-passing runs sharing a `(reason, subreason)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureBucket {
    pub reason: String,
    pub subreason: String,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct WindowSummary {
    pub window: Window,
    pub total: u64,
    pub status_counts: BTreeMap<String, u64>,
    pub pass_pct: f64,
    pub failure_buckets: Vec<FailureBucket>,
    pub by_cloud: BTreeMap<String, BTreeMap<String, u64>>,
}

impl WindowSummary {
    pub fn count(&self, status: &RunStatus) -> u64 {
        self.status_counts.get(status.as_str()).copied().unwrap_or(0)
    }

    pub fn passed(&self) -> u64 {
        self.count(&RunStatus::Passed)
    }

    pub fn failed(&self) -> u64 {
        self.count(&RunStatus::Failed)
    }

    pub fn killed(&self) -> u64 {
        self.count(&RunStatus::Killed)
    }
}

/// `passed / total` as a percentage with two decimals; the empty sentinel when `total == 0`.
pub fn pass_pct(passed: u64, total: u64) -> f64 {
    if total == 0 {
        return EMPTY_PASS_PCT;
    }
    let pct = passed as f64 * 100.0 / total as f64;
    (pct * 100.0).round() / 100.0
}

/// Pure aggregation over runs already restricted to `window`.
pub fn summarize(window: Window, runs: &[Run]) -> WindowSummary {
    let mut status_counts: BTreeMap<String, u64> = ALWAYS_REPORTED
        .iter()
        .map(|s| (s.as_str().to_string(), 0))
        .collect();
    let mut by_cloud: BTreeMap<String, BTreeMap<String, u64>> = BTreeMap::new();
    let mut buckets: HashMap<(String, String), u64> = HashMap::new();

    for run in runs {
        *status_counts.entry(run.status.as_str().to_string()).or_insert(0) += 1;
        *by_cloud
            .entry(run.cloud_label().to_string())
            .or_default()
            .entry(run.status.as_str().to_string())
            .or_insert(0) += 1;
        if !run.status.is_passed() {
            let key = (
                run.reason_label().to_string(),
                run.subreason.clone().unwrap_or_default(),
            );
            *buckets.entry(key).or_insert(0) += 1;
        }
    }

    let total = runs.len() as u64;
    let passed = status_counts
        .get(RunStatus::Passed.as_str())
        .copied()
        .unwrap_or(0);

    WindowSummary {
        window,
        total,
        status_counts,
        pass_pct: pass_pct(passed, total),
        failure_buckets: order_buckets(buckets),
        by_cloud,
    }
}

fn order_buckets(buckets: HashMap<(String, String), u64>) -> Vec<FailureBucket> {
    let mut out: Vec<FailureBucket> = buckets
        .into_iter()
        .map(|((reason, subreason), count)| FailureBucket {
            reason,
            subreason,
            count,
        })
        .collect();
    out.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.reason.cmp(&b.reason))
            .then_with(|| a.subreason.cmp(&b.subreason))
    });
    out
}

/// Window queries against a run repository. Every call recomputes from stored runs.
pub struct Aggregator<'a, R: RunRepository + ?Sized> {
    repo: &'a R,
}

impl<'a, R: RunRepository + ?Sized> Aggregator<'a, R> {
    pub fn new(repo: &'a R) -> Self {
        Self { repo }
    }

    pub fn summary(&self, window: &Window) -> Result<WindowSummary> {
        self.summary_filtered(window, &RunFilter::default())
    }

    pub fn summary_filtered(&self, window: &Window, filter: &RunFilter) -> Result<WindowSummary> {
        let runs = self.repo.runs_in_window(window, filter)?;
        let summary = summarize(*window, &runs);
        tracing::debug!(
            window_start = %window.start,
            total = summary.total,
            pass_pct = summary.pass_pct,
            "window summarized"
        );
        Ok(summary)
    }

    /// Cloud -> status -> count for the window.
    pub fn by_cloud(&self, window: &Window) -> Result<BTreeMap<String, BTreeMap<String, u64>>> {
        Ok(self.summary(window)?.by_cloud)
    }

    /// Non-passing runs grouped by reason, newest first within each group.
    pub fn failures_by_reason(&self, window: &Window) -> Result<BTreeMap<String, Vec<Run>>> {
        let runs = self.repo.runs_in_window(window, &RunFilter::default())?;
        let mut out: BTreeMap<String, Vec<Run>> = BTreeMap::new();
        for run in runs.into_iter().filter(|r| !r.status.is_passed()) {
            out.entry(run.reason_label().to_string()).or_default().push(run);
        }
        Ok(out)
    }

    pub fn list_runs(&self, window: &Window, filter: &RunFilter) -> Result<Vec<Run>> {
        self.repo.runs_in_window(window, filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::WindowResolver;
    use chrono::{DateTime, Duration, Utc};

    fn window() -> Window {
        let at = DateTime::parse_from_rfc3339("2025-10-24T06:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        WindowResolver::lab().containing(at).unwrap()
    }

    fn run(id: &str, status: RunStatus) -> Run {
        Run::new(id, window().start + Duration::minutes(5), status)
    }

    #[test]
    fn empty_window_reports_zeroes() {
        let s = summarize(window(), &[]);
        assert_eq!(s.total, 0);
        assert_eq!(s.pass_pct, EMPTY_PASS_PCT);
        assert_eq!(s.passed(), 0);
        assert_eq!(s.failed(), 0);
        assert_eq!(s.killed(), 0);
        assert!(s.failure_buckets.is_empty());
        assert!(s.by_cloud.is_empty());
    }

    #[test]
    fn totals_match_status_counts() {
        let runs = vec![
            run("1", RunStatus::Passed),
            run("2", RunStatus::Failed),
            run("3", RunStatus::Killed),
            run("4", RunStatus::Other("TIMEOUT".into())),
        ];
        let s = summarize(window(), &runs);
        assert_eq!(s.total, s.status_counts.values().sum::<u64>());
        assert_eq!(s.count(&RunStatus::Other("TIMEOUT".into())), 1);
        assert_eq!(s.pass_pct, 25.0);
    }

    #[test]
    fn buckets_order_by_count_then_reason() {
        let runs = vec![
            run("1", RunStatus::Failed).with_reason("Quota Exceed", None),
            run("2", RunStatus::Failed).with_reason("NSP pod failure", None),
            run("3", RunStatus::Failed).with_reason("Stack Creation Failed", Some("Helm install Failed")),
            run("4", RunStatus::Failed).with_reason("Stack Creation Failed", Some("Helm install Failed")),
            run("5", RunStatus::Killed),
            run("6", RunStatus::Passed).with_reason("ignored", None),
        ];
        let s = summarize(window(), &runs);
        let order: Vec<_> = s
            .failure_buckets
            .iter()
            .map(|b| (b.reason.as_str(), b.subreason.as_str(), b.count))
            .collect();
        assert_eq!(
            order,
            vec![
                ("Stack Creation Failed", "Helm install Failed", 2),
                ("NSP pod failure", "", 1),
                ("Quota Exceed", "", 1),
                ("Unknown", "", 1),
            ]
        );
    }

    #[test]
    fn cloud_counts_use_unknown_label() {
        let runs = vec![
            run("1", RunStatus::Passed).with_cloud("blr-cloud4"),
            run("2", RunStatus::Failed).with_cloud("blr-cloud4"),
            run("3", RunStatus::Failed),
        ];
        let s = summarize(window(), &runs);
        assert_eq!(s.by_cloud["blr-cloud4"]["PASSED"], 1);
        assert_eq!(s.by_cloud["blr-cloud4"]["FAILED"], 1);
        assert_eq!(s.by_cloud["unknown"]["FAILED"], 1);
    }

    #[test]
    fn pass_pct_rounds_to_two_decimals() {
        assert_eq!(pass_pct(1, 3), 33.33);
        assert_eq!(pass_pct(2, 3), 66.67);
        assert_eq!(pass_pct(0, 0), EMPTY_PASS_PCT);
    }
}
