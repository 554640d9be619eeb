//! CRUD service over the job store.
//!
//! Each operation acts on exactly one record or on the full set; store
//! failures are passed through once as [`ServiceError::StoreUnavailable`]
//! without retries.

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::db::job_repo::{self, JobRow};
use crate::db::{Database, DatabaseError};
use crate::models::{DeleteOutcome, Job, JobPatch, JobStatus, NewJob};

/// Errors surfaced by [`JobService`].
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Missing or blank required field.
    #[error("Job validation failed: {0}")]
    Validation(String),

    /// Update referenced an id that does not exist.
    #[error("Job not found: {0}")]
    NotFound(String),

    /// The database could not complete the operation.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[from] DatabaseError),
}

/// Per-status totals as stored, used by the health summary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreSummary {
    pub total: u64,
    pub by_status: Vec<(JobStatus, u64)>,
}

/// The four job operations over a [`Database`].
#[derive(Clone)]
pub struct JobService {
    db: Database,
}

impl JobService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// All jobs, most recently created first.
    pub fn list(&self) -> Result<Vec<Job>, ServiceError> {
        let rows = job_repo::list_all(&self.db)?;
        let jobs = rows
            .into_iter()
            .map(JobRow::into_job)
            .collect::<Result<Vec<_>, _>>()?;
        debug!(count = jobs.len(), "Listed jobs");
        Ok(jobs)
    }

    /// Persists a new job, applying defaults for omitted fields.
    pub fn create(&self, input: NewJob) -> Result<Job, ServiceError> {
        let company = require("company", input.company)?;
        let role = require("role", input.role)?;

        let now = Utc::now();
        let job = Job {
            id: Uuid::new_v4().to_string(),
            company,
            role,
            status: input.status.unwrap_or_default(),
            applied_date: input.applied_date.unwrap_or(now),
            notes: input.notes.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };

        // Return what was stored so timestamps carry storage precision.
        let row = JobRow::from_job(&job);
        job_repo::insert(&self.db, &row)?;
        let job = row.into_job()?;
        info!(job_id = %job.id, company = %job.company, "Created job");
        Ok(job)
    }

    /// Applies a partial update. Only supplied fields change.
    pub fn update(&self, id: &str, patch: JobPatch) -> Result<Job, ServiceError> {
        if let Some(ref company) = patch.company {
            reject_blank("company", company)?;
        }
        if let Some(ref role) = patch.role {
            reject_blank("role", role)?;
        }

        // Nothing to change: report the record as stored, updatedAt untouched.
        let row = if patch.is_empty() {
            job_repo::find_by_id(&self.db, id)?
        } else {
            job_repo::apply_patch(&self.db, id, &patch, Utc::now())?
        }
        .ok_or_else(|| ServiceError::NotFound(id.to_string()))?;
        let job = row.into_job()?;
        info!(job_id = %job.id, status = %job.status, "Updated job");
        Ok(job)
    }

    /// Removes a job. Succeeds whether or not the id existed.
    pub fn delete(&self, id: &str) -> Result<DeleteOutcome, ServiceError> {
        let deleted = job_repo::delete(&self.db, id)?;
        if deleted {
            info!(job_id = %id, "Deleted job");
        } else {
            debug!(job_id = %id, "Delete for unknown job ignored");
        }
        Ok(DeleteOutcome::new(deleted))
    }

    /// Stored totals per status. Unknown status strings cannot exist because
    /// of the schema constraint, so they are skipped rather than reported.
    pub fn summary(&self) -> Result<StoreSummary, ServiceError> {
        let counts = job_repo::count_by_status(&self.db)?;
        let mut summary = StoreSummary {
            total: 0,
            by_status: JobStatus::ALL.iter().map(|s| (*s, 0)).collect(),
        };
        for (status, count) in counts {
            if let Ok(status) = status.parse::<JobStatus>() {
                summary.by_status[status.index()].1 = count;
                summary.total += count;
            }
        }
        Ok(summary)
    }
}

fn require(field: &str, value: Option<String>) -> Result<String, ServiceError> {
    match value {
        Some(v) => {
            reject_blank(field, &v)?;
            Ok(v)
        }
        None => Err(ServiceError::Validation(format!("{} is required", field))),
    }
}

fn reject_blank(field: &str, value: &str) -> Result<(), ServiceError> {
    if value.trim().is_empty() {
        return Err(ServiceError::Validation(format!("{} is required", field)));
    }
    Ok(())
}
