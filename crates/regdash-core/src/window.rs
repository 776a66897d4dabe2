//! Reporting windows: fixed 24h periods cut at a daily local boundary hour.
//!
//! The lab clock is a fixed UTC offset (no DST), so window arithmetic never
//! consults a time-zone database and boundaries are reproducible in tests.

use crate::errors::{RegDashError, Result};
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Offset, TimeZone, Utc};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// Lab local time is UTC+05:30.
pub const LAB_UTC_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

/// Windows start at 10:00 lab time.
pub const WINDOW_BOUNDARY_HOUR: u32 = 10;

/// Oldest selectable window (0 = current).
pub const MAX_WINDOW_OFFSET: u32 = 6;

/// Number of selectable windows.
pub const WINDOW_COUNT: usize = MAX_WINDOW_OFFSET as usize + 1;

pub const WINDOW_HOURS: i64 = 24;

/// Half-open `[start, end)` interval in UTC, remembering the lab offset for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    offset: FixedOffset,
}

impl Window {
    /// Explicit bounds, e.g. from a query string. Requires `start < end`.
    pub fn between(start: DateTime<Utc>, end: DateTime<Utc>, offset: FixedOffset) -> Result<Self> {
        if start >= end {
            return Err(RegDashError::InvalidBounds {
                detail: format!("start {} is not before end {}", start, end),
            });
        }
        Ok(Self { start, end, offset })
    }

    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        self.start <= t && t < self.end
    }

    pub fn start_local(&self) -> DateTime<FixedOffset> {
        self.start.with_timezone(&self.offset)
    }

    pub fn end_local(&self) -> DateTime<FixedOffset> {
        self.end.with_timezone(&self.offset)
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Same-length window `n` periods earlier.
    pub fn shifted_back(&self, n: u32) -> Self {
        let shift = self.duration() * n as i32;
        Self {
            start: self.start - shift,
            end: self.end - shift,
            offset: self.offset,
        }
    }

    /// Short dropdown label, e.g. `Mon, Oct 20`.
    pub fn label(&self) -> String {
        self.start_local().format("%a, %b %d").to_string()
    }

    /// e.g. `Oct 20, 10:00 AM → Oct 21, 10:00 AM`.
    pub fn range_label(&self) -> String {
        format!(
            "{} → {}",
            self.start_local().format("%b %d, %I:%M %p"),
            self.end_local().format("%b %d, %I:%M %p")
        )
    }
}

impl Serialize for Window {
    fn serialize<S: Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        let mut st = s.serialize_struct("Window", 4)?;
        st.serialize_field("start_utc", &self.start.to_rfc3339())?;
        st.serialize_field("end_utc", &self.end.to_rfc3339())?;
        st.serialize_field("start_iso", &self.start_local().to_rfc3339())?;
        st.serialize_field("end_iso", &self.end_local().to_rfc3339())?;
        st.end()
    }
}

/// A selectable window with its display labels.
#[derive(Debug, Clone, Serialize)]
pub struct WindowChoice {
    pub offset: u32,
    pub label: String,
    pub range_label: String,
    pub window: Window,
}

/// Computes window boundaries for the lab clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowResolver {
    offset: FixedOffset,
    boundary_hour: u32,
}

impl Default for WindowResolver {
    fn default() -> Self {
        Self::lab()
    }
}

impl WindowResolver {
    /// UTC+05:30, boundary at 10:00.
    pub fn lab() -> Self {
        Self {
            offset: FixedOffset::east_opt(LAB_UTC_OFFSET_SECS).unwrap_or_else(|| Utc.fix()),
            boundary_hour: WINDOW_BOUNDARY_HOUR,
        }
    }

    pub fn new(offset_secs: i32, boundary_hour: u32) -> Result<Self> {
        let offset = FixedOffset::east_opt(offset_secs).ok_or_else(|| RegDashError::InvalidBounds {
            detail: format!("utc offset {offset_secs}s out of range"),
        })?;
        if boundary_hour > 23 {
            return Err(RegDashError::InvalidBounds {
                detail: format!("boundary hour {boundary_hour} out of range"),
            });
        }
        Ok(Self {
            offset,
            boundary_hour,
        })
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Window `n` periods back from the one containing `now`.
    pub fn resolve(&self, now: DateTime<Utc>, n: u32) -> Result<Window> {
        if n > MAX_WINDOW_OFFSET {
            return Err(RegDashError::InvalidWindow {
                offset: n,
                max: MAX_WINDOW_OFFSET,
            });
        }
        Ok(self.containing(now)?.shifted_back(n))
    }

    /// The window containing an arbitrary instant.
    pub fn containing(&self, instant: DateTime<Utc>) -> Result<Window> {
        let local_date = instant.with_timezone(&self.offset).date_naive();
        let mut start = self.boundary_on(local_date)?;
        if instant < start {
            start -= Duration::hours(WINDOW_HOURS);
        }
        Ok(Window {
            start,
            end: start + Duration::hours(WINDOW_HOURS),
            offset: self.offset,
        })
    }

    /// The window containing local noon of `date`.
    pub fn for_day(&self, date: NaiveDate) -> Result<Window> {
        let noon = date
            .and_hms_opt(12, 0, 0)
            .ok_or_else(|| RegDashError::InvalidBounds {
                detail: format!("no noon on {date}"),
            })?;
        let utc = self.local_to_utc(noon);
        self.containing(utc)
    }

    /// Explicit bounds in this resolver's display offset.
    pub fn between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Window> {
        Window::between(start, end, self.offset)
    }

    /// All selectable windows, newest first.
    pub fn recent(&self, now: DateTime<Utc>) -> Result<Vec<WindowChoice>> {
        (0..=MAX_WINDOW_OFFSET)
            .map(|n| {
                let window = self.resolve(now, n)?;
                Ok(WindowChoice {
                    offset: n,
                    label: window.label(),
                    range_label: window.range_label(),
                    window,
                })
            })
            .collect()
    }

    /// Interpret a wall-clock time on the lab clock.
    pub fn local_to_utc(&self, local: chrono::NaiveDateTime) -> DateTime<Utc> {
        let utc = local - Duration::seconds(i64::from(self.offset.local_minus_utc()));
        Utc.from_utc_datetime(&utc)
    }

    fn boundary_on(&self, date: NaiveDate) -> Result<DateTime<Utc>> {
        let local = date
            .and_hms_opt(self.boundary_hour, 0, 0)
            .ok_or_else(|| RegDashError::InvalidBounds {
                detail: format!("boundary hour {} invalid", self.boundary_hour),
            })?;
        Ok(self.local_to_utc(local))
    }
}
