use super::{open_store, select_window};
use crate::cli::args::{OutputFormat, SummaryArgs, TrendArgs, WindowsArgs};
use crate::exit_codes::EXIT_SUCCESS;
use chrono::Utc;
use regdash_core::report::{console, json, DashboardReport};
use regdash_core::{Aggregator, TrendBuilder, WindowResolver};
use std::collections::BTreeMap;

pub fn cmd_summary(args: SummaryArgs) -> anyhow::Result<i32> {
    let resolver = WindowResolver::lab();
    let window = select_window(&args.window, &resolver, Utc::now())?;
    let store = open_store(&args.common)?;
    let summary = Aggregator::new(&store).summary(&window)?;
    let report = DashboardReport::new(summary, BTreeMap::new());

    if let Some(out) = &args.out {
        json::write_json(&report, out)?;
        tracing::info!(path = %out.display(), "wrote summary report");
    }
    match args.format {
        OutputFormat::Text => print!("{}", console::format_summary(&report.summary)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(EXIT_SUCCESS)
}

pub fn cmd_trend(args: TrendArgs) -> anyhow::Result<i32> {
    let store = open_store(&args.common)?;
    let cfg = args.common.config();
    let trends = TrendBuilder::new(&store, WindowResolver::lab()).cloud_trends(
        &cfg.monitored_clouds,
        args.windows,
        Utc::now(),
    )?;
    match args.format {
        OutputFormat::Text => print!("{}", console::format_trend(&trends)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&trends)?),
    }
    Ok(EXIT_SUCCESS)
}

pub fn cmd_windows(args: WindowsArgs) -> anyhow::Result<i32> {
    let choices = WindowResolver::lab().recent(Utc::now())?;
    match args.format {
        OutputFormat::Text => {
            for c in &choices {
                println!("{}  {:<12} {}", c.offset, c.label, c.range_label);
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&choices)?),
    }
    Ok(EXIT_SUCCESS)
}
