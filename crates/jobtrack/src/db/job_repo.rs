//! Row-level access to the `jobs` table.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};

use super::{format_timestamp, parse_timestamp, Database, DatabaseError};
use crate::models::{Job, JobPatch, JobStatus};

/// A raw job row from the database.
#[derive(Debug, Clone, PartialEq)]
pub struct JobRow {
    pub id: String,
    pub company: String,
    pub role: String,
    pub status: String,
    pub applied_date: String,
    pub notes: String,
    pub created_at: String,
    pub updated_at: String,
}

impl JobRow {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get("id")?,
            company: row.get("company")?,
            role: row.get("role")?,
            status: row.get("status")?,
            applied_date: row.get("applied_date")?,
            notes: row.get("notes")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Builds the row for a freshly created job.
    pub fn from_job(job: &Job) -> Self {
        Self {
            id: job.id.clone(),
            company: job.company.clone(),
            role: job.role.clone(),
            status: job.status.as_str().to_string(),
            applied_date: format_timestamp(job.applied_date),
            notes: job.notes.clone(),
            created_at: format_timestamp(job.created_at),
            updated_at: format_timestamp(job.updated_at),
        }
    }

    /// Converts the row into a typed record, rejecting unknown statuses and
    /// unparseable timestamps.
    pub fn into_job(self) -> Result<Job, DatabaseError> {
        let status: JobStatus = self.status.parse().map_err(|e| DatabaseError::InvalidRow {
            id: self.id.clone(),
            reason: format!("{}", e),
        })?;
        let timestamp = |field: &str, value: &str| {
            parse_timestamp(value).ok_or_else(|| DatabaseError::InvalidRow {
                id: self.id.clone(),
                reason: format!("invalid {} '{}'", field, value),
            })
        };
        let applied_date = timestamp("applied_date", &self.applied_date)?;
        let created_at = timestamp("created_at", &self.created_at)?;
        let updated_at = timestamp("updated_at", &self.updated_at)?;

        Ok(Job {
            id: self.id,
            company: self.company,
            role: self.role,
            status,
            applied_date,
            notes: self.notes,
            created_at,
            updated_at,
        })
    }
}

/// Inserts a new job row.
pub fn insert(db: &Database, job: &JobRow) -> Result<(), DatabaseError> {
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO jobs (id, company, role, status, applied_date, notes, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                job.id,
                job.company,
                job.role,
                job.status,
                job.applied_date,
                job.notes,
                job.created_at,
                job.updated_at,
            ],
        )?;
        Ok(())
    })
}

fn find_in(conn: &Connection, id: &str) -> Result<Option<JobRow>, DatabaseError> {
    let mut stmt = conn.prepare("SELECT * FROM jobs WHERE id = ?1")?;
    let mut rows = stmt.query_map(params![id], JobRow::from_row)?;
    match rows.next() {
        Some(Ok(row)) => Ok(Some(row)),
        Some(Err(e)) => Err(DatabaseError::Sqlite(e)),
        None => Ok(None),
    }
}

/// Finds a job by its ID.
pub fn find_by_id(db: &Database, id: &str) -> Result<Option<JobRow>, DatabaseError> {
    db.with_conn(|conn| find_in(conn, id))
}

/// Returns every job, newest first. Rows sharing a `created_at` value come
/// back in reverse insertion order.
pub fn list_all(db: &Database) -> Result<Vec<JobRow>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare("SELECT * FROM jobs ORDER BY created_at DESC, rowid DESC")?;
        let rows = stmt
            .query_map([], JobRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
}

/// Overwrites only the fields present in `patch`, plus `updated_at`.
///
/// Returns the row as stored after the update, or `None` if no job has
/// this id.
pub fn apply_patch(
    db: &Database,
    id: &str,
    patch: &JobPatch,
    updated_at: DateTime<Utc>,
) -> Result<Option<JobRow>, DatabaseError> {
    db.with_conn(|conn| {
        let tx = conn.transaction()?;

        let mut assignments = Vec::new();
        let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

        if let Some(ref company) = patch.company {
            assignments.push(format!("company = ?{}", param_values.len() + 1));
            param_values.push(Box::new(company.clone()));
        }
        if let Some(ref role) = patch.role {
            assignments.push(format!("role = ?{}", param_values.len() + 1));
            param_values.push(Box::new(role.clone()));
        }
        if let Some(status) = patch.status {
            assignments.push(format!("status = ?{}", param_values.len() + 1));
            param_values.push(Box::new(status.as_str().to_string()));
        }
        if let Some(applied_date) = patch.applied_date {
            assignments.push(format!("applied_date = ?{}", param_values.len() + 1));
            param_values.push(Box::new(format_timestamp(applied_date)));
        }
        if let Some(ref notes) = patch.notes {
            assignments.push(format!("notes = ?{}", param_values.len() + 1));
            param_values.push(Box::new(notes.clone()));
        }
        assignments.push(format!("updated_at = ?{}", param_values.len() + 1));
        param_values.push(Box::new(format_timestamp(updated_at)));

        param_values.push(Box::new(id.to_string()));
        let sql = format!(
            "UPDATE jobs SET {} WHERE id = ?{}",
            assignments.join(", "),
            param_values.len()
        );

        let params_ref: Vec<&dyn rusqlite::types::ToSql> =
            param_values.iter().map(|p| p.as_ref()).collect();
        let changed = tx.execute(&sql, params_ref.as_slice())?;
        if changed == 0 {
            return Ok(None);
        }

        let row = find_in(&tx, id)?;
        tx.commit()?;
        Ok(row)
    })
}

/// Deletes a job. Returns `true` if a row was removed.
pub fn delete(db: &Database, id: &str) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let removed = conn.execute("DELETE FROM jobs WHERE id = ?1", params![id])?;
        Ok(removed > 0)
    })
}

/// Counts jobs grouped by status. Statuses with no jobs are absent.
pub fn count_by_status(db: &Database) -> Result<Vec<(String, u64)>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt =
            conn.prepare("SELECT status, COUNT(*) FROM jobs GROUP BY status ORDER BY status")?;
        let counts = stmt
            .query_map([], |r| Ok((r.get::<_, String>(0)?, r.get::<_, u64>(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(counts)
    })
}
