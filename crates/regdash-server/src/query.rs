//! Window selection from query parameters.

use crate::error::ApiError;
use chrono::{DateTime, NaiveDate, Utc};
use regdash_core::timestamp::{parse_local, parse_utc};
use regdash_core::window::{Window, WindowResolver};
use regdash_core::{RunFilter, RunStatus};
use serde::Deserialize;

/// Clock used for `start`/`end` values that carry no offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NaiveBounds {
    /// JSON API.
    Utc,
    /// Details page, whose links are built from lab-time labels.
    Lab,
}

#[derive(Debug, Default, Deserialize)]
pub struct WindowQuery {
    pub start: Option<String>,
    pub end: Option<String>,
    pub day: Option<String>,
    pub offset: Option<String>,
    pub status: Option<String>,
    pub reason: Option<String>,
    pub scheduler: Option<String>,
    pub cloud: Option<String>,
    pub windows: Option<String>,
}

impl WindowQuery {
    /// `start`+`end`, else `day`, else `offset`, else the current window.
    pub fn window(
        &self,
        resolver: &WindowResolver,
        now: DateTime<Utc>,
        naive: NaiveBounds,
    ) -> Result<Window, ApiError> {
        let parse = |raw: &str| match naive {
            NaiveBounds::Utc => parse_utc(raw),
            NaiveBounds::Lab => parse_local(raw, resolver),
        };
        if let (Some(start), Some(end)) = (
            self.start.as_deref().and_then(parse),
            self.end.as_deref().and_then(parse),
        ) {
            return Ok(resolver.between(start, end)?);
        }
        if let Some(day) = non_blank(&self.day) {
            let date = NaiveDate::parse_from_str(day, "%Y-%m-%d")
                .map_err(|_| ApiError::BadRequest(format!("invalid day '{day}', expected YYYY-MM-DD")))?;
            return Ok(resolver.for_day(date)?);
        }
        let offset = match non_blank(&self.offset) {
            Some(raw) => raw
                .parse::<u32>()
                .map_err(|_| ApiError::BadRequest(format!("invalid offset '{raw}'")))?,
            None => 0,
        };
        Ok(resolver.resolve(now, offset)?)
    }

    pub fn filter(&self) -> RunFilter {
        RunFilter {
            status: non_blank(&self.status).map(|s| RunStatus::parse(s).as_str().to_string()),
            reason: non_blank(&self.reason).map(str::to_string),
            scheduler: non_blank(&self.scheduler).map(str::to_string),
            cloud: non_blank(&self.cloud).map(str::to_string),
        }
    }

    pub fn trend_windows(&self, default: usize) -> Result<usize, ApiError> {
        match non_blank(&self.windows) {
            Some(raw) => raw
                .parse()
                .map_err(|_| ApiError::BadRequest(format!("invalid windows '{raw}'"))),
            None => Ok(default),
        }
    }
}

fn non_blank(v: &Option<String>) -> Option<&str> {
    v.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
