//! Schema versioning.
//!
//! `_migrations` records every applied step. A step and its bookkeeping row
//! commit together, so a failed step leaves the schema at the previous
//! version.

use rusqlite::{params, Connection};

use super::error::DatabaseError;

struct SchemaStep {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

/// Ordered by version.
const STEPS: &[SchemaStep] = &[SchemaStep {
    version: 1,
    name: "create_jobs_table",
    sql: include_str!("sql/001_create_jobs.sql"),
}];

const BOOKKEEPING: &str = "CREATE TABLE IF NOT EXISTS _migrations (
    version INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    applied_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);";

/// Highest applied version, 0 for a fresh database.
pub fn schema_version(conn: &Connection) -> Result<u32, DatabaseError> {
    let version = conn.query_row("SELECT IFNULL(MAX(version), 0) FROM _migrations", [], |r| {
        r.get(0)
    })?;
    Ok(version)
}

/// Brings the schema up to the latest version.
pub fn run_all(conn: &Connection) -> Result<(), DatabaseError> {
    conn.execute_batch(BOOKKEEPING)?;
    let current = schema_version(conn)?;

    for step in STEPS.iter().filter(|s| s.version > current) {
        log::info!("Applying schema v{} ({})", step.version, step.name);

        let failed = |e: rusqlite::Error| DatabaseError::Migration {
            version: step.version,
            reason: e.to_string(),
        };
        let tx = conn.unchecked_transaction().map_err(failed)?;
        tx.execute_batch(step.sql).map_err(failed)?;
        tx.execute(
            "INSERT INTO _migrations (version, name) VALUES (?1, ?2)",
            params![step.version, step.name],
        )
        .map_err(failed)?;
        tx.commit().map_err(failed)?;
    }

    Ok(())
}
