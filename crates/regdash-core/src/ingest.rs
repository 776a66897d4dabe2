//! Batch ingest of externally produced run records.
//!
//! The whole batch is validated before anything is written; the write itself is
//! a single store transaction, so a bad record never leaves a partial batch behind.

use crate::errors::{RegDashError, Result};
use crate::model::{Run, RunStatus, DEFAULT_SCHEDULER};
use crate::storage::{RunRepository, UpsertOutcome};
use crate::timestamp::parse_local;
use crate::window::WindowResolver;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A run record as supplied by a feed, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RunRecord {
    #[serde(default)]
    pub request_id: Option<Value>,
    #[serde(default)]
    pub scheduler: Option<String>,
    #[serde(default)]
    pub cloud: Option<String>,
    #[serde(default)]
    pub started_at: Option<String>,
    #[serde(default)]
    pub ended_at: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub subreason: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub added: usize,
    pub updated: usize,
}

impl From<UpsertOutcome> for IngestReport {
    fn from(o: UpsertOutcome) -> Self {
        Self {
            added: o.added,
            updated: o.updated,
        }
    }
}

pub struct IngestHandler<'a, R: RunRepository + ?Sized> {
    repo: &'a R,
    resolver: WindowResolver,
}

impl<'a, R: RunRepository + ?Sized> IngestHandler<'a, R> {
    pub fn new(repo: &'a R, resolver: WindowResolver) -> Self {
        Self { repo, resolver }
    }

    /// Parse a JSON array body and ingest it.
    pub fn ingest_json(&self, body: &str) -> Result<IngestReport> {
        let payload: Value = serde_json::from_str(body)
            .map_err(|e| RegDashError::InvalidPayload(format!("malformed JSON: {e}")))?;
        self.ingest_value(payload)
    }

    pub fn ingest_value(&self, payload: Value) -> Result<IngestReport> {
        let items = match payload {
            Value::Array(items) => items,
            _ => {
                return Err(RegDashError::InvalidPayload(
                    "Expected a JSON array".to_string(),
                ))
            }
        };
        let records = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                serde_json::from_value::<RunRecord>(item)
                    .map_err(|e| RegDashError::invalid_record(index, None, "record", e.to_string()))
            })
            .collect::<Result<Vec<_>>>()?;
        self.ingest_records(&records)
    }

    pub fn ingest_records(&self, records: &[RunRecord]) -> Result<IngestReport> {
        let runs = self.validate(records)?;
        let report: IngestReport = self.repo.upsert_runs(&runs)?.into();
        tracing::info!(
            records = runs.len(),
            added = report.added,
            updated = report.updated,
            "ingested run batch"
        );
        Ok(report)
    }

    /// Validate and normalise every record; the first failure aborts the batch.
    pub fn validate(&self, records: &[RunRecord]) -> Result<Vec<Run>> {
        records
            .iter()
            .enumerate()
            .map(|(index, rec)| self.normalize(index, rec))
            .collect()
    }

    fn normalize(&self, index: usize, rec: &RunRecord) -> Result<Run> {
        let request_id = request_id_of(rec.request_id.as_ref())
            .map_err(|detail| RegDashError::invalid_record(index, None, "request_id", detail))?;
        let id = Some(request_id.as_str());

        let started_raw = non_blank(rec.started_at.as_deref())
            .ok_or_else(|| RegDashError::invalid_record(index, id, "started_at", "missing"))?;
        let started_at = parse_local(started_raw, &self.resolver).ok_or_else(|| {
            RegDashError::invalid_record(index, id, "started_at", format!("unparseable '{started_raw}'"))
        })?;

        let ended_at = match non_blank(rec.ended_at.as_deref()) {
            Some(raw) => Some(parse_local(raw, &self.resolver).ok_or_else(|| {
                RegDashError::invalid_record(index, id, "ended_at", format!("unparseable '{raw}'"))
            })?),
            None => None,
        };
        if let Some(end) = ended_at {
            if end < started_at {
                return Err(RegDashError::invalid_record(
                    index,
                    id,
                    "ended_at",
                    "earlier than started_at",
                ));
            }
        }

        let status_raw = non_blank(rec.status.as_deref())
            .ok_or_else(|| RegDashError::invalid_record(index, id, "status", "missing"))?;
        let status = RunStatus::parse(status_raw);

        let (reason, subreason) = if status.is_passed() {
            (None, None)
        } else {
            (
                non_blank(rec.reason.as_deref()).map(str::to_string),
                non_blank(rec.subreason.as_deref()).map(str::to_string),
            )
        };

        Ok(Run {
            request_id,
            scheduler: non_blank(rec.scheduler.as_deref())
                .unwrap_or(DEFAULT_SCHEDULER)
                .to_string(),
            cloud: non_blank(rec.cloud.as_deref()).map(str::to_string),
            started_at,
            ended_at,
            status,
            reason,
            subreason,
            notes: rec.notes.clone(),
        })
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

fn request_id_of(raw: Option<&Value>) -> std::result::Result<String, String> {
    match raw {
        None | Some(Value::Null) => Err("missing".to_string()),
        Some(Value::String(s)) => non_blank(Some(s.as_str()))
            .map(str::to_string)
            .ok_or_else(|| "missing".to_string()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(other) => Err(format!("expected string or number, got {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::Aggregator;
    use crate::storage::Store;
    use chrono::{DateTime, Utc};

    fn handler_store() -> Store {
        let s = Store::memory().unwrap();
        s.init_schema().unwrap();
        s
    }

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn naive_timestamps_are_lab_local() -> anyhow::Result<()> {
        let s = handler_store();
        let h = IngestHandler::new(&s, WindowResolver::lab());
        h.ingest_json(
            r#"[{"request_id": "t1", "started_at": "2025-10-24T10:00",
                 "ended_at": "2025-10-24 10:45:00.250", "status": "PASSED"}]"#,
        )?;
        let run = s.get_run("t1")?.unwrap();
        assert_eq!(run.started_at, utc("2025-10-24T04:30:00Z"));
        assert_eq!(run.ended_at, Some(utc("2025-10-24T05:15:00.250Z")));
        Ok(())
    }

    #[test]
    fn blank_reasons_bucket_as_unknown() -> anyhow::Result<()> {
        let s = handler_store();
        let r = WindowResolver::lab();
        IngestHandler::new(&s, r).ingest_json(
            r#"[{"request_id": "b1", "started_at": "2025-10-24 11:00:00", "status": "FAILED",
                 "reason": "", "subreason": "  "}]"#,
        )?;
        let run = s.get_run("b1")?.unwrap();
        assert_eq!(run.reason, None);
        assert_eq!(run.subreason, None);

        let window = r.containing(utc("2025-10-24T06:30:00Z"))?;
        let agg = Aggregator::new(&s);
        let summary = agg.summary(&window)?;
        assert_eq!(summary.failure_buckets[0].reason, "Unknown");
        assert_eq!(summary.failure_buckets[0].subreason, "");
        let grouped = agg.failures_by_reason(&window)?;
        assert_eq!(grouped.keys().collect::<Vec<_>>(), vec!["Unknown"]);
        Ok(())
    }

    #[test]
    fn numeric_request_ids_are_stringified() -> anyhow::Result<()> {
        let s = handler_store();
        let h = IngestHandler::new(&s, WindowResolver::lab());
        let report = h.ingest_json(
            r#"[{"request_id": 17301, "started_at": "2025-10-24 11:00:00", "status": "passed"}]"#,
        )?;
        assert_eq!(report, IngestReport { added: 1, updated: 0 });
        let run = s.get_run("17301")?.unwrap();
        assert_eq!(run.status, RunStatus::Passed);
        assert_eq!(run.scheduler, DEFAULT_SCHEDULER);
        Ok(())
    }

    #[test]
    fn unknown_status_passes_through_verbatim() -> anyhow::Result<()> {
        let s = handler_store();
        let h = IngestHandler::new(&s, WindowResolver::lab());
        h.ingest_json(
            r#"[{"request_id": "x1", "started_at": "2025-10-24 11:00:00", "status": "Infra-Timeout"}]"#,
        )?;
        assert_eq!(
            s.get_run("x1")?.unwrap().status,
            RunStatus::Other("Infra-Timeout".into())
        );
        Ok(())
    }

    #[test]
    fn passing_runs_drop_failure_reasons() {
        let s = handler_store();
        let h = IngestHandler::new(&s, WindowResolver::lab());
        let rec = RunRecord {
            request_id: Some(Value::from("p1")),
            started_at: Some("2025-10-24 11:00:00".into()),
            status: Some("PASSED".into()),
            reason: Some("Quota Exceed".into()),
            ..RunRecord::default()
        };
        let runs = h.validate(&[rec]).unwrap();
        assert_eq!(runs[0].reason, None);
    }

    #[test]
    fn non_array_payload_is_rejected() {
        let s = handler_store();
        let h = IngestHandler::new(&s, WindowResolver::lab());
        let err = h.ingest_json(r#"{"request_id": "1"}"#).unwrap_err();
        assert_eq!(
            err,
            RegDashError::InvalidPayload("Expected a JSON array".into())
        );
    }

    #[test]
    fn end_before_start_is_rejected() {
        let s = handler_store();
        let h = IngestHandler::new(&s, WindowResolver::lab());
        let err = h
            .ingest_json(
                r#"[{"request_id": "e1", "started_at": "2025-10-24 11:00:00",
                     "ended_at": "2025-10-24 10:00:00", "status": "FAILED"}]"#,
            )
            .unwrap_err();
        assert!(matches!(
            err,
            RegDashError::InvalidRecord { index: 0, ref field, .. } if field == "ended_at"
        ));
    }

    #[test]
    fn wrongly_typed_record_names_its_index() {
        let s = handler_store();
        let h = IngestHandler::new(&s, WindowResolver::lab());
        let err = h
            .ingest_json(r#"[{"request_id": "ok", "started_at": "2025-10-24 11:00:00", "status": "PASSED"}, 5]"#)
            .unwrap_err();
        assert!(matches!(err, RegDashError::InvalidRecord { index: 1, .. }));
        assert_eq!(s.count_runs().unwrap(), 0);
    }
}
