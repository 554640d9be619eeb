//! `JobsApi` backed directly by a [`JobService`], for running the client
//! without a server.

use async_trait::async_trait;

use super::api::{ApiError, JobsApi, ListResponse};
use crate::models::{DeleteOutcome, Job, JobPatch, NewJob};
use crate::service::{JobService, ServiceError};

#[derive(Clone)]
pub struct LocalJobsApi {
    service: JobService,
}

impl LocalJobsApi {
    pub fn new(service: JobService) -> Self {
        Self { service }
    }

    /// Runs a blocking store call off the async executor.
    async fn run<T, F>(&self, f: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: FnOnce(JobService) -> Result<T, ServiceError> + Send + 'static,
    {
        let service = self.service.clone();
        tokio::task::spawn_blocking(move || f(service))
            .await
            .map_err(|e| ApiError::Server(format!("Store task failed: {}", e)))?
            .map_err(ApiError::from)
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(_) => ApiError::Rejected(err.to_string()),
            ServiceError::NotFound(id) => ApiError::NotFound(id),
            ServiceError::StoreUnavailable(_) => ApiError::Server(err.to_string()),
        }
    }
}

#[async_trait]
impl JobsApi for LocalJobsApi {
    async fn list(&self) -> Result<ListResponse, ApiError> {
        self.run(|svc| svc.list()).await.map(ListResponse::from)
    }

    async fn create(&self, job: &NewJob) -> Result<Job, ApiError> {
        let job = job.clone();
        self.run(move |svc| svc.create(job)).await
    }

    async fn update(&self, id: &str, patch: &JobPatch) -> Result<Job, ApiError> {
        let id = id.to_string();
        let patch = patch.clone();
        self.run(move |svc| svc.update(&id, patch)).await
    }

    async fn delete(&self, id: &str) -> Result<DeleteOutcome, ApiError> {
        let id = id.to_string();
        self.run(move |svc| svc.delete(&id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::models::JobStatus;

    fn api() -> LocalJobsApi {
        LocalJobsApi::new(JobService::new(
            Database::open_in_memory().expect("Failed to create test database"),
        ))
    }

    #[tokio::test]
    async fn test_round_trip_through_service() {
        let api = api();
        let job = api.create(&NewJob::new("Acme", "Engineer")).await.unwrap();

        let updated = api
            .update(&job.id, &JobPatch::status(JobStatus::Offer))
            .await
            .unwrap();
        assert_eq!(updated.status, JobStatus::Offer);

        let listed = api.list().await.unwrap();
        assert_eq!(listed.jobs, vec![updated]);
        assert_eq!(listed.skipped, 0);
    }

    #[tokio::test]
    async fn test_errors_map_to_api_errors() {
        let api = api();
        assert!(matches!(
            api.create(&NewJob::default()).await,
            Err(ApiError::Rejected(_))
        ));
        assert_eq!(
            api.update("ghost", &JobPatch::status(JobStatus::Offer)).await,
            Err(ApiError::NotFound("ghost".to_string()))
        );
    }
}
