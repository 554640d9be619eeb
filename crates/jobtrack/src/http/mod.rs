//! REST surface for the job service.
//!
//! ## Endpoints
//! - GET /api/jobs - all jobs, newest first
//! - POST /api/jobs - create a job
//! - PUT /api/jobs/{id} - partial update
//! - DELETE /api/jobs/{id} - idempotent delete
//! - GET /api/health - store liveness and per-status totals

pub mod error;
pub mod handlers;
pub mod routes;

pub use error::{ErrorBody, HttpError};
pub use routes::{configure_routes, json_config};
