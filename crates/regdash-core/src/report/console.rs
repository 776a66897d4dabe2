use crate::aggregate::WindowSummary;
use crate::trend::TrendPoint;
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Human-readable window summary. Deterministic, unit-testable.
#[must_use]
pub fn format_summary(summary: &WindowSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Window: {}", summary.window.range_label());
    let _ = writeln!(
        out,
        "Total: {}  Passed: {}  Failed: {}  Killed: {}  Pass%: {:.2}",
        summary.total,
        summary.passed(),
        summary.failed(),
        summary.killed(),
        summary.pass_pct
    );
    for (status, count) in &summary.status_counts {
        if !matches!(status.as_str(), "PASSED" | "FAILED" | "KILLED") {
            let _ = writeln!(out, "  {status}: {count}");
        }
    }

    if !summary.failure_buckets.is_empty() {
        let _ = writeln!(out, "\nFailure reasons:");
        for b in &summary.failure_buckets {
            if b.subreason.is_empty() {
                let _ = writeln!(out, "  {:>4}  {}", b.count, b.reason);
            } else {
                let _ = writeln!(out, "  {:>4}  {} / {}", b.count, b.reason, b.subreason);
            }
        }
    }

    if !summary.by_cloud.is_empty() {
        let _ = writeln!(out, "\nBy cloud:");
        for (cloud, counts) in &summary.by_cloud {
            let parts: Vec<String> = counts.iter().map(|(s, n)| format!("{s}={n}")).collect();
            let _ = writeln!(out, "  {cloud}: {}", parts.join(" "));
        }
    }
    out
}

/// One line per cloud, oldest window on the left.
#[must_use]
pub fn format_trend(trends: &BTreeMap<String, Vec<TrendPoint>>) -> String {
    let mut out = String::new();
    for (cloud, points) in trends {
        let cells: Vec<String> = points
            .iter()
            .rev()
            .map(|p| {
                if p.total == 0 {
                    format!("{}: -", p.window.label())
                } else {
                    format!("{}: {:.2}%", p.window.label(), p.pass_pct)
                }
            })
            .collect();
        let _ = writeln!(out, "{cloud}  {}", cells.join(" | "));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::summarize;
    use crate::model::{Run, RunStatus};
    use crate::window::WindowResolver;
    use chrono::{DateTime, Utc};

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn summary_lists_buckets_and_clouds() {
        let window = WindowResolver::lab()
            .containing(at("2025-10-24T06:30:00Z"))
            .unwrap();
        let t = at("2025-10-24T05:00:00Z");
        let runs = vec![
            Run::new("1", t, RunStatus::Passed).with_cloud("blr-cloud4"),
            Run::new("2", t, RunStatus::Failed)
                .with_cloud("blr-cloud4")
                .with_reason("Stack Creation Failed", Some("Helm install Failed")),
            Run::new("3", t, RunStatus::Other("TIMEOUT".into())),
        ];
        let text = format_summary(&summarize(window, &runs));
        assert!(text.starts_with("Window: Oct 24, 10:00 AM → Oct 25, 10:00 AM\n"));
        assert!(text.contains("Total: 3  Passed: 1  Failed: 1  Killed: 0  Pass%: 33.33"));
        assert!(text.contains("  TIMEOUT: 1\n"));
        assert!(text.contains("     1  Stack Creation Failed / Helm install Failed\n"));
        assert!(text.contains("  blr-cloud4: FAILED=1 PASSED=1\n"));
        assert!(text.contains("  unknown: TIMEOUT=1\n"));
    }
}
