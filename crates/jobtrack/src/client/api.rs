//! The request/response boundary the client state model talks to.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{DeleteOutcome, Job, JobPatch, NewJob};

/// Failures of a single API call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The service refused the input (HTTP 400).
    #[error("{0}")]
    Rejected(String),

    #[error("Job not found: {0}")]
    NotFound(String),

    /// The service failed (HTTP 5xx).
    #[error("Server error: {0}")]
    Server(String),

    /// The request never completed.
    #[error("Request failed: {0}")]
    Transport(String),

    /// The response could not be decoded.
    #[error("Unexpected response: {0}")]
    Decode(String),
}

/// A List result. Records that could not be decoded (for example an
/// unrecognized status) are dropped and counted instead of failing the list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListResponse {
    pub jobs: Vec<Job>,
    pub skipped: usize,
}

impl From<Vec<Job>> for ListResponse {
    fn from(jobs: Vec<Job>) -> Self {
        Self { jobs, skipped: 0 }
    }
}

/// The four job operations as seen by a client.
#[async_trait]
pub trait JobsApi: Send + Sync {
    async fn list(&self) -> Result<ListResponse, ApiError>;

    async fn create(&self, job: &NewJob) -> Result<Job, ApiError>;

    async fn update(&self, id: &str, patch: &JobPatch) -> Result<Job, ApiError>;

    async fn delete(&self, id: &str) -> Result<DeleteOutcome, ApiError>;
}
