//! Row <-> `Run` mapping.
//!
//! Timestamps are fixed-width RFC 3339 UTC text, so `ORDER BY` and range
//! comparisons on the column are chronological.

use crate::model::{Run, RunStatus};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;

pub(crate) const RUN_COLUMNS: &str =
    "request_id, scheduler, cloud, started_at, ended_at, status, reason, subreason, notes";

pub fn ts_to_sql(t: &DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn ts_from_sql(idx: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Maps a row selected with [`RUN_COLUMNS`] in that order.
pub(crate) fn row_to_run(row: &rusqlite::Row<'_>) -> rusqlite::Result<Run> {
    let started_raw: String = row.get(3)?;
    let ended_raw: Option<String> = row.get(4)?;
    let ended_at = match ended_raw {
        Some(s) => Some(ts_from_sql(4, &s)?),
        None => None,
    };
    Ok(Run {
        request_id: row.get(0)?,
        scheduler: row.get(1)?,
        cloud: row.get(2)?,
        started_at: ts_from_sql(3, &started_raw)?,
        ended_at,
        status: RunStatus::parse(&row.get::<_, String>(5)?),
        reason: row.get(6)?,
        subreason: row.get(7)?,
        notes: row.get(8)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps_sort_lexically() {
        let a = DateTime::parse_from_rfc3339("2025-10-24T04:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let b = a + chrono::Duration::milliseconds(1);
        let c = a + chrono::Duration::hours(10);
        assert_eq!(ts_to_sql(&a), "2025-10-24T04:30:00.000Z");
        assert!(ts_to_sql(&a) < ts_to_sql(&b));
        assert!(ts_to_sql(&b) < ts_to_sql(&c));
    }
}
