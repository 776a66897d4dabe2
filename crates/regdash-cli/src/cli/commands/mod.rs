use super::args::*;

pub mod db;
pub mod ingest;
pub mod report;
pub mod serve;

mod dispatch;
pub use dispatch::dispatch;

use anyhow::Context;
use chrono::{DateTime, Utc};
use regdash_core::timestamp::parse_local;
use regdash_core::window::{Window, WindowResolver};
use regdash_core::{RegDashError, Store};

pub(crate) fn open_store(common: &CommonArgs) -> anyhow::Result<Store> {
    let cfg = common.config();
    Store::from_config(&cfg).with_context(|| format!("failed to open store {}", cfg.database_url))
}

pub(crate) fn select_window(
    args: &WindowArgs,
    resolver: &WindowResolver,
    now: DateTime<Utc>,
) -> anyhow::Result<Window> {
    if let (Some(start), Some(end)) = (&args.start, &args.end) {
        let parse = |raw: &str| {
            parse_local(raw, resolver).ok_or_else(|| RegDashError::InvalidBounds {
                detail: format!("unparseable instant '{raw}'"),
            })
        };
        return Ok(resolver.between(parse(start.as_str())?, parse(end.as_str())?)?);
    }
    if let Some(day) = args.day {
        return Ok(resolver.for_day(day)?);
    }
    Ok(resolver.resolve(now, args.offset)?)
}
