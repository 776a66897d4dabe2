//! Per-cloud pass-percentage series over consecutive windows.

use crate::aggregate::{pass_pct, Aggregator};
use crate::errors::Result;
use crate::model::RunStatus;
use crate::storage::{RunFilter, RunRepository};
use crate::window::{Window, WindowResolver, WINDOW_COUNT};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

pub const DEFAULT_TREND_WINDOWS: usize = WINDOW_COUNT;

#[derive(Debug, Clone, Serialize)]
pub struct TrendPoint {
    pub offset: u32,
    pub window: Window,
    pub passed: u64,
    pub total: u64,
    pub pass_pct: f64,
}

pub struct TrendBuilder<'a, R: RunRepository + ?Sized> {
    aggregator: Aggregator<'a, R>,
    resolver: WindowResolver,
}

impl<'a, R: RunRepository + ?Sized> TrendBuilder<'a, R> {
    pub fn new(repo: &'a R, resolver: WindowResolver) -> Self {
        Self {
            aggregator: Aggregator::new(repo),
            resolver,
        }
    }

    /// `k` points for `cloud`, index 0 = the window containing `now`.
    /// Windows without runs yield the empty sentinel; nothing is interpolated.
    pub fn pass_trend(&self, cloud: &str, k: usize, now: DateTime<Utc>) -> Result<Vec<TrendPoint>> {
        let filter = RunFilter::cloud(cloud);
        let mut points = Vec::with_capacity(k);
        for n in 0..k {
            let offset = u32::try_from(n).unwrap_or(u32::MAX);
            let window = self.resolver.resolve(now, offset)?;
            let summary = self.aggregator.summary_filtered(&window, &filter)?;
            let passed = summary.count(&RunStatus::Passed);
            points.push(TrendPoint {
                offset,
                window,
                passed,
                total: summary.total,
                pass_pct: pass_pct(passed, summary.total),
            });
        }
        Ok(points)
    }

    /// One series per monitored cloud, plus any other cloud that ran in the covered windows.
    /// Runs without a cloud are reported under `unknown`.
    pub fn cloud_trends(
        &self,
        monitored: &[String],
        k: usize,
        now: DateTime<Utc>,
    ) -> Result<BTreeMap<String, Vec<TrendPoint>>> {
        let mut clouds: Vec<String> = monitored.to_vec();
        for n in 0..k {
            let offset = u32::try_from(n).unwrap_or(u32::MAX);
            let window = self.resolver.resolve(now, offset)?;
            for run in self.aggregator.list_runs(&window, &RunFilter::default())? {
                let cloud = run.cloud_label();
                if !clouds.iter().any(|c| c == cloud) {
                    clouds.push(cloud.to_string());
                }
            }
        }

        let mut out = BTreeMap::new();
        for cloud in clouds {
            let series = self.pass_trend(&cloud, k, now)?;
            out.insert(cloud, series);
        }
        Ok(out)
    }
}
