//! Synthetic run data for demos and local development.

use crate::errors::{RegDashError, Result};
use crate::model::{Run, RunStatus, DEFAULT_SCHEDULER};
use crate::storage::{RunRepository, Store};
use crate::window::{WindowResolver, WINDOW_COUNT};
use chrono::{DateTime, Duration, Utc};
use rand::seq::SliceRandom;
use rand::Rng;

pub const DEFAULT_DEMO_RUNS: usize = 110;

const DEMO_STEP_MINUTES: i64 = 13;
const WINDOW_MINUTES: i64 = 24 * 60;

/// (status, reason, subreason) drawn uniformly for demo data.
const DEMO_OUTCOMES: [(&str, Option<&str>, Option<&str>); 9] = [
    ("FAILED", Some("Stack Creation Failed"), Some("Helm install Failed")),
    ("FAILED", Some("Stack Creation Failed"), Some("Helm chart not found")),
    ("FAILED", Some("NSP pod failure"), None),
    ("FAILED", Some("Quota Exceed"), None),
    ("FAILED", Some("MISSING CASE"), Some("CAM Bundle install failed")),
    ("FAILED", Some("MISSING CASE"), Some("Unable to login to NSP Server")),
    ("FAILED", Some("Other Reasons"), Some("Default root context file not found")),
    ("KILLED", None, None),
    ("PASSED", None, None),
];

const WEEK_REASONS: [&str; 6] = [
    "Stack Creation Failed",
    "NSP pod failure",
    "Quota Exceed",
    "MISSING CASE",
    "Other Reasons",
    "Selenium Down",
];

const WEEK_SUBREASONS: [&str; 6] = [
    "Helm install failed",
    "Config map missing",
    "VM quota exceeded",
    "Artifacts not copied",
    "Network policy blocked egress",
    "Daemonset crashloop",
];

/// Cloud for run `i` of `total`, splitting the batch evenly in order.
fn cloud_for(i: usize, total: usize, clouds: &[String]) -> Option<String> {
    if clouds.is_empty() || total == 0 {
        return None;
    }
    clouds.get(i * clouds.len() / total).cloned()
}

/// Spread `count` runs through the current window. Existing ids are left untouched.
pub fn seed_demo<G: Rng>(
    store: &Store,
    resolver: &WindowResolver,
    now: DateTime<Utc>,
    clouds: &[String],
    count: usize,
    rng: &mut G,
) -> Result<usize> {
    let window = resolver.resolve(now, 0)?;
    let base = now.timestamp();
    let mut runs = Vec::with_capacity(count);

    for i in 0..count {
        let request_id = (base + i as i64).to_string();
        if store.get_run(&request_id)?.is_some() {
            continue;
        }
        let (status, reason, sub) = DEMO_OUTCOMES[rng.gen_range(0..DEMO_OUTCOMES.len())];
        let began = window.start + Duration::minutes((DEMO_STEP_MINUTES * i as i64) % WINDOW_MINUTES);
        let ended = began + Duration::minutes(rng.gen_range(20..=120));
        runs.push(Run {
            request_id,
            scheduler: DEFAULT_SCHEDULER.to_string(),
            cloud: cloud_for(i, count, clouds),
            started_at: began,
            ended_at: Some(ended),
            status: RunStatus::parse(status),
            reason: reason.map(str::to_string),
            subreason: sub.map(str::to_string),
            notes: None,
        });
    }

    let outcome = store.upsert_runs(&runs)?;
    tracing::info!(added = outcome.added, window_start = %window.start, "seeded demo runs");
    Ok(outcome.added)
}

/// Status mix for window `d` of the week: pass share grows and volume rises with age.
pub fn week_status_counts(day_offset: usize) -> (usize, usize, usize) {
    let daily_total = 70 + day_offset * 10;
    let pass_ratio = (0.30 + day_offset as f64 * 0.05).min(0.65);
    let killed_ratio = 0.05 + day_offset as f64 * 0.01;
    let passed = (daily_total as f64 * pass_ratio) as usize;
    let killed = (daily_total as f64 * killed_ratio) as usize;
    (passed, killed, daily_total - passed - killed)
}

/// Wipe the store and fill every selectable window with distinct data.
pub fn seed_week<G: Rng>(
    store: &Store,
    resolver: &WindowResolver,
    now: DateTime<Utc>,
    clouds: &[String],
    rng: &mut G,
) -> Result<usize> {
    store
        .reset()
        .map_err(|e| RegDashError::Database(format!("{e:#}")))?;
    let base = now.timestamp();
    let mut runs = Vec::new();

    for day_offset in 0..WINDOW_COUNT {
        let window = resolver.resolve(now, day_offset as u32)?;
        let (passed, killed, failed) = week_status_counts(day_offset);
        let daily_total = passed + killed + failed;

        let mut statuses: Vec<RunStatus> = std::iter::repeat(RunStatus::Passed)
            .take(passed)
            .chain(std::iter::repeat(RunStatus::Killed).take(killed))
            .chain(std::iter::repeat(RunStatus::Failed).take(failed))
            .collect();
        statuses.shuffle(rng);

        // Load shifts toward the later clouds as the week goes back.
        let cloud_bias = (0.4 + 0.06 * day_offset as f64).min(0.85);
        let first_cloud_share = (1.0 - cloud_bias).max(0.1);
        let step = ((WINDOW_MINUTES - 30) / daily_total as i64).max(5);

        for (idx, status) in statuses.into_iter().enumerate() {
            let began = window.start + Duration::minutes(idx as i64 * step);
            let ended = began + Duration::minutes(rng.gen_range(20..=90));
            let cloud = match clouds {
                [] => None,
                [only] => Some(only.clone()),
                [first, rest @ ..] => {
                    if (idx as f64 / daily_total as f64) < first_cloud_share {
                        Some(first.clone())
                    } else {
                        rest.choose(rng).cloned()
                    }
                }
            };
            let (reason, subreason) = if status == RunStatus::Failed {
                (
                    WEEK_REASONS.choose(rng).map(|s| s.to_string()),
                    WEEK_SUBREASONS.choose(rng).map(|s| s.to_string()),
                )
            } else {
                (None, None)
            };
            runs.push(Run {
                request_id: format!("{base}{day_offset:02}{idx:03}"),
                scheduler: DEFAULT_SCHEDULER.to_string(),
                cloud,
                started_at: began,
                ended_at: Some(ended),
                status,
                reason,
                subreason,
                notes: None,
            });
        }
    }

    let outcome = store.upsert_runs(&runs)?;
    tracing::info!(inserted = outcome.added, "seeded week of runs");
    Ok(outcome.added)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::Aggregator;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn clouds() -> Vec<String> {
        vec!["blr-cloud4".to_string(), "blr-cloud5".to_string()]
    }

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-10-24T06:30:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn store() -> Store {
        let s = Store::memory().unwrap();
        s.init_schema().unwrap();
        s
    }

    #[test]
    fn demo_runs_land_in_current_window_split_by_cloud() -> anyhow::Result<()> {
        let s = store();
        let r = WindowResolver::lab();
        let mut rng = StdRng::seed_from_u64(7);
        let added = seed_demo(&s, &r, now(), &clouds(), DEFAULT_DEMO_RUNS, &mut rng)?;
        assert_eq!(added, DEFAULT_DEMO_RUNS);

        let summary = Aggregator::new(&s).summary(&r.resolve(now(), 0)?)?;
        assert_eq!(summary.total, DEFAULT_DEMO_RUNS as u64);
        let c4: u64 = summary.by_cloud["blr-cloud4"].values().sum();
        let c5: u64 = summary.by_cloud["blr-cloud5"].values().sum();
        assert_eq!((c4, c5), (55, 55));

        // Same clock again: every id already exists.
        let again = seed_demo(&s, &r, now(), &clouds(), DEFAULT_DEMO_RUNS, &mut rng)?;
        assert_eq!(again, 0);
        Ok(())
    }

    #[test]
    fn week_mix_matches_ratios() {
        assert_eq!(week_status_counts(0), (21, 3, 46));
        let (p, k, f) = week_status_counts(6);
        assert_eq!(p + k + f, 130);
        assert_eq!(p, 78);
    }

    #[test]
    fn week_seed_fills_every_window_with_distinct_totals() -> anyhow::Result<()> {
        let s = store();
        let r = WindowResolver::lab();
        let mut rng = StdRng::seed_from_u64(11);
        let inserted = seed_week(&s, &r, now(), &clouds(), &mut rng)?;
        let expected: usize = (0..WINDOW_COUNT).map(|d| 70 + d * 10).sum();
        assert_eq!(inserted, expected);

        let agg = Aggregator::new(&s);
        for d in 0..WINDOW_COUNT {
            let summary = agg.summary(&r.resolve(now(), d as u32)?)?;
            assert_eq!(summary.total as usize, 70 + d * 10);
        }
        Ok(())
    }
}
