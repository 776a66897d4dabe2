use super::repository::{RunFilter, RunRepository, UpsertOutcome};
use super::rows::{row_to_run, ts_to_sql, RUN_COLUMNS};
use crate::config::{DashConfig, StoreLocation};
use crate::errors::{RegDashError, Result};
use crate::model::{Run, UNKNOWN_CLOUD};
use crate::window::Window;
use anyhow::Context;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, TransactionBehavior};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// How long a writer waits for another process holding the database lock.
pub const BUSY_TIMEOUT: Duration = Duration::from_millis(5000);

/// SQLite-backed run store.
#[derive(Clone)]
pub struct Store {
    pub(crate) conn: Arc<Mutex<Connection>>,
}

impl Store {
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open sqlite db {}", path.display()))?;
        // journal_mode answers with the mode in effect, so read it back rather than execute.
        let mode: String = conn
            .pragma_update_and_check(None, "journal_mode", "WAL", |r| r.get(0))
            .context("set journal_mode")?;
        conn.busy_timeout(BUSY_TIMEOUT).context("set busy_timeout")?;
        tracing::debug!(path = %path.display(), journal_mode = %mode, "opened run store");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn memory() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory().context("failed to open in-memory sqlite db")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open whatever `database_url` points at and make sure the schema exists.
    pub fn from_config(cfg: &DashConfig) -> anyhow::Result<Self> {
        let store = match cfg.store_location() {
            StoreLocation::Memory => Self::memory()?,
            StoreLocation::File(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent)
                        .with_context(|| format!("create {}", parent.display()))?;
                }
                Self::open(&path)?
            }
        };
        store.init_schema()?;
        Ok(store)
    }

    pub fn init_schema(&self) -> anyhow::Result<()> {
        let conn = self.lock()?;
        conn.execute_batch(super::schema::DDL)?;
        super::schema::migrate_additive(&conn)?;
        Ok(())
    }

    /// Drop every run and recreate the schema.
    pub fn reset(&self) -> anyhow::Result<()> {
        {
            let conn = self.lock()?;
            conn.execute_batch(super::schema::DROP)?;
        }
        self.init_schema()?;
        tracing::info!("run store reset");
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| RegDashError::Database("store mutex poisoned".to_string()))
    }
}

impl RunRepository for Store {
    fn upsert_runs(&self, runs: &[Run]) -> Result<UpsertOutcome> {
        let mut conn = self.lock()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let mut outcome = UpsertOutcome::default();
        {
            let mut exists = tx.prepare("SELECT 1 FROM runs WHERE request_id = ?1")?;
            let mut upsert = tx.prepare(
                r#"
                INSERT INTO runs (
                    request_id, scheduler, cloud, started_at, ended_at,
                    status, reason, subreason, notes
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                ON CONFLICT(request_id) DO UPDATE SET
                    scheduler = excluded.scheduler,
                    cloud = excluded.cloud,
                    started_at = excluded.started_at,
                    ended_at = excluded.ended_at,
                    status = excluded.status,
                    reason = excluded.reason,
                    subreason = excluded.subreason,
                    notes = excluded.notes
                "#,
            )?;
            for run in runs {
                let existed = exists
                    .query_row(params![run.request_id], |_| Ok(()))
                    .optional()?
                    .is_some();
                upsert.execute(params![
                    run.request_id,
                    run.scheduler,
                    run.cloud,
                    ts_to_sql(&run.started_at),
                    run.ended_at.as_ref().map(ts_to_sql),
                    run.status.as_str(),
                    run.reason,
                    run.subreason,
                    run.notes,
                ])?;
                if existed {
                    outcome.updated += 1;
                } else {
                    outcome.added += 1;
                }
            }
        }
        tx.commit()?;
        tracing::debug!(
            added = outcome.added,
            updated = outcome.updated,
            "upserted runs"
        );
        Ok(outcome)
    }

    fn runs_in_window(&self, window: &Window, filter: &RunFilter) -> Result<Vec<Run>> {
        let mut sql = format!(
            "SELECT {RUN_COLUMNS} FROM runs WHERE started_at >= ?1 AND started_at < ?2"
        );
        let mut args = vec![ts_to_sql(&window.start), ts_to_sql(&window.end)];
        let clauses = [
            ("status", &filter.status),
            ("reason", &filter.reason),
            ("scheduler", &filter.scheduler),
        ];
        for (col, value) in clauses {
            if let Some(v) = value {
                args.push(v.clone());
                sql.push_str(&format!(" AND {} = ?{}", col, args.len()));
            }
        }
        if let Some(cloud) = &filter.cloud {
            args.push(cloud.clone());
            if cloud == UNKNOWN_CLOUD {
                // Same grouping as `Run::cloud_label`.
                sql.push_str(&format!(
                    " AND (cloud = ?{} OR cloud IS NULL OR TRIM(cloud) = '')",
                    args.len()
                ));
            } else {
                sql.push_str(&format!(" AND cloud = ?{}", args.len()));
            }
        }
        sql.push_str(" ORDER BY started_at DESC, id DESC");

        let conn = self.lock()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(args.iter()), row_to_run)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn get_run(&self, request_id: &str) -> Result<Option<Run>> {
        let conn = self.lock()?;
        let run = conn
            .query_row(
                &format!("SELECT {RUN_COLUMNS} FROM runs WHERE request_id = ?1"),
                params![request_id],
                row_to_run,
            )
            .optional()?;
        Ok(run)
    }

    fn count_runs(&self) -> Result<u64> {
        let conn = self.lock()?;
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM runs", [], |r| r.get(0))?;
        Ok(n.max(0) as u64)
    }
}
