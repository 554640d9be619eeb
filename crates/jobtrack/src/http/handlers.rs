//! Job route handlers.
//!
//! Store calls are synchronous SQLite work, so each one runs on actix's
//! blocking pool via `web::block`.

use actix_web::{web, HttpResponse};
use serde::Serialize;

use super::HttpError;
use crate::models::{JobPatch, JobStatus, NewJob};
use crate::service::JobService;

/// GET /api/jobs
pub async fn list_jobs(service: web::Data<JobService>) -> Result<HttpResponse, HttpError> {
    let service = service.get_ref().clone();
    let jobs = web::block(move || service.list()).await??;
    Ok(HttpResponse::Ok().json(jobs))
}

/// POST /api/jobs
pub async fn create_job(
    service: web::Data<JobService>,
    body: web::Json<NewJob>,
) -> Result<HttpResponse, HttpError> {
    let service = service.get_ref().clone();
    let input = body.into_inner();
    let job = web::block(move || service.create(input)).await??;
    Ok(HttpResponse::Created().json(job))
}

/// PUT /api/jobs/{id}
pub async fn update_job(
    service: web::Data<JobService>,
    path: web::Path<String>,
    body: web::Json<JobPatch>,
) -> Result<HttpResponse, HttpError> {
    let service = service.get_ref().clone();
    let id = path.into_inner();
    let patch = body.into_inner();
    let job = web::block(move || service.update(&id, patch)).await??;
    Ok(HttpResponse::Ok().json(job))
}

/// DELETE /api/jobs/{id}
pub async fn delete_job(
    service: web::Data<JobService>,
    path: web::Path<String>,
) -> Result<HttpResponse, HttpError> {
    let service = service.get_ref().clone();
    let id = path.into_inner();
    let outcome = web::block(move || service.delete(&id)).await??;
    Ok(HttpResponse::Ok().json(outcome))
}

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub jobs: u64,
    pub by_status: Vec<StatusCount>,
}

#[derive(Debug, Serialize)]
pub struct StatusCount {
    pub status: JobStatus,
    pub count: u64,
}

/// GET /api/health
///
/// Returns 503 when the store cannot be queried.
pub async fn health(service: web::Data<JobService>) -> HttpResponse {
    let service = service.get_ref().clone();
    let summary = web::block(move || {
        service.database().ping()?;
        service.summary()
    })
    .await;

    match summary {
        Ok(Ok(summary)) => HttpResponse::Ok().json(HealthResponse {
            status: "healthy",
            version: env!("CARGO_PKG_VERSION"),
            jobs: summary.total,
            by_status: summary
                .by_status
                .into_iter()
                .map(|(status, count)| StatusCount { status, count })
                .collect(),
        }),
        Ok(Err(e)) => {
            tracing::error!(error = %e, "Health check failed");
            HttpResponse::ServiceUnavailable().json(serde_json::json!({
                "status": "unavailable",
                "version": env!("CARGO_PKG_VERSION"),
                "message": e.to_string(),
            }))
        }
        Err(e) => {
            tracing::error!(error = %e, "Health check could not run");
            HttpResponse::ServiceUnavailable().json(serde_json::json!({
                "status": "unavailable",
                "version": env!("CARGO_PKG_VERSION"),
            }))
        }
    }
}
