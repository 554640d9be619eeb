pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod http;
pub mod logging;
pub mod models;
pub mod service;

pub use client::{ActionError, ApiError, HttpJobsApi, JobsApi, LocalJobsApi, Tracker, TrackerState};
pub use config::{load_config, load_or_default, Config};
pub use db::{Database, DatabaseError};
pub use error::{ConfigError, JobtrackError, Result};
pub use logging::init_logging;
pub use models::{DeleteOutcome, Job, JobPatch, JobStatus, NewJob};
pub use service::{JobService, ServiceError, StoreSummary};
