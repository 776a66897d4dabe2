use crate::report::DashboardReport;
use std::path::Path;

pub fn write_json(report: &DashboardReport, out: &Path) -> anyhow::Result<()> {
    std::fs::write(out, serde_json::to_string_pretty(report)?)?;
    Ok(())
}
