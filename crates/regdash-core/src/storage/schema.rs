//! Schema and additive migrations for the run store.

use anyhow::Context;
use rusqlite::Connection;
use std::collections::HashSet;

pub const DDL: &str = r#"
CREATE TABLE IF NOT EXISTS runs (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  request_id TEXT NOT NULL UNIQUE,
  scheduler TEXT NOT NULL DEFAULT 'BLR-NSP-SCHEDULER1',
  cloud TEXT,
  started_at TEXT NOT NULL,
  ended_at TEXT,
  status TEXT NOT NULL,
  reason TEXT,
  subreason TEXT,
  notes TEXT
);

CREATE INDEX IF NOT EXISTS idx_runs_started_at ON runs(started_at);
CREATE INDEX IF NOT EXISTS idx_runs_cloud ON runs(cloud);
CREATE INDEX IF NOT EXISTS idx_runs_scheduler ON runs(scheduler);
"#;

pub const DROP: &str = "DROP TABLE IF EXISTS runs;";

/// Columns added after the first release; older databases gain them on open.
pub(crate) fn migrate_additive(conn: &Connection) -> anyhow::Result<()> {
    let cols = get_columns(conn, "runs")?;
    add_column_if_missing(conn, &cols, "runs", "subreason", "TEXT")?;
    add_column_if_missing(conn, &cols, "runs", "notes", "TEXT")?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_runs_ended_at ON runs(ended_at)",
        [],
    )
    .context("create ended_at index")?;
    Ok(())
}

pub(crate) fn get_columns(conn: &Connection, table: &str) -> anyhow::Result<HashSet<String>> {
    let mut stmt = conn
        .prepare(&format!("PRAGMA table_info({})", table))
        .context("prepare pragma table_info")?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(1))?;
    let mut out = HashSet::new();
    for r in rows {
        out.insert(r?);
    }
    Ok(out)
}

pub(crate) fn add_column_if_missing(
    conn: &Connection,
    cols: &HashSet<String>,
    table: &str,
    col: &str,
    ty: &str,
) -> anyhow::Result<()> {
    if !cols.contains(col) {
        tracing::info!(table, col, "adding missing column");
        let sql = format!("ALTER TABLE {} ADD COLUMN {} {}", table, col, ty);
        conn.execute(&sql, []).context("alter table add column")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_table_gains_missing_columns() -> anyhow::Result<()> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(
            "CREATE TABLE runs (
               id INTEGER PRIMARY KEY AUTOINCREMENT,
               request_id TEXT NOT NULL UNIQUE,
               scheduler TEXT NOT NULL,
               cloud TEXT,
               started_at TEXT NOT NULL,
               ended_at TEXT,
               status TEXT NOT NULL,
               reason TEXT
             );",
        )?;
        migrate_additive(&conn)?;
        let cols = get_columns(&conn, "runs")?;
        assert!(cols.contains("subreason"));
        assert!(cols.contains("notes"));

        // Idempotent on a current schema.
        migrate_additive(&conn)?;
        Ok(())
    }
}
