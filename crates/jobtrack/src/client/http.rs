//! `JobsApi` over HTTP with reqwest.

use async_trait::async_trait;
use reqwest::{Response, StatusCode, Url};
use serde::de::DeserializeOwned;

use super::api::{ApiError, JobsApi, ListResponse};
use crate::http::ErrorBody;
use crate::models::{DeleteOutcome, Job, JobPatch, NewJob};

/// Client for a remote `/api/jobs` collection.
#[derive(Debug, Clone)]
pub struct HttpJobsApi {
    client: reqwest::Client,
    base: Url,
}

impl HttpJobsApi {
    /// `base_url` is the collection URL, e.g. `http://127.0.0.1:5000/api/jobs`.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let base = Url::parse(base_url)
            .map_err(|e| ApiError::Transport(format!("Invalid API URL '{}': {}", base_url, e)))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::Transport(format!(
                "Invalid API URL '{}': not a base URL",
                base_url
            )));
        }
        Ok(Self {
            client: reqwest::Client::new(),
            base,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// The collection URL without a trailing slash.
    fn collection_url(&self) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty();
        }
        url
    }

    /// `{base}/{id}` with the id percent-encoded as a single segment.
    fn job_url(&self, id: &str) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(id);
        }
        url
    }
}

fn transport(err: reqwest::Error) -> ApiError {
    ApiError::Transport(err.to_string())
}

/// Passes successful responses through and turns the rest into `ApiError`,
/// using the `{ "message": ... }` body when present.
async fn check(response: Response, id: Option<&str>) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let url = response.url().clone();
    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|b| b.message)
        .unwrap_or_else(|_| {
            if text.is_empty() {
                status.to_string()
            } else {
                text
            }
        });

    Err(match status {
        StatusCode::NOT_FOUND => match id {
            Some(id) => ApiError::NotFound(id.to_string()),
            // No record was addressed, so the URL itself is wrong.
            None => ApiError::Rejected(format!("HTTP {} at {}", status, url)),
        },
        s if s.is_client_error() => ApiError::Rejected(message),
        s if s.is_server_error() => ApiError::Server(message),
        s => ApiError::Server(format!("HTTP {}: {}", s, message)),
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    response
        .json::<T>()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))
}

/// Decodes list entries one by one so a single bad record does not hide
/// the rest.
pub fn decode_jobs(values: Vec<serde_json::Value>) -> ListResponse {
    let mut response = ListResponse::default();
    for value in values {
        match serde_json::from_value::<Job>(value) {
            Ok(job) => response.jobs.push(job),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping job record that could not be decoded");
                response.skipped += 1;
            }
        }
    }
    response
}

#[async_trait]
impl JobsApi for HttpJobsApi {
    async fn list(&self) -> Result<ListResponse, ApiError> {
        let response = self
            .client
            .get(self.collection_url())
            .send()
            .await
            .map_err(transport)?;
        let values: Vec<serde_json::Value> = decode(check(response, None).await?).await?;
        Ok(decode_jobs(values))
    }

    async fn create(&self, job: &NewJob) -> Result<Job, ApiError> {
        let response = self
            .client
            .post(self.collection_url())
            .json(job)
            .send()
            .await
            .map_err(transport)?;
        decode(check(response, None).await?).await
    }

    async fn update(&self, id: &str, patch: &JobPatch) -> Result<Job, ApiError> {
        let response = self
            .client
            .put(self.job_url(id))
            .json(patch)
            .send()
            .await
            .map_err(transport)?;
        decode(check(response, Some(id)).await?).await
    }

    async fn delete(&self, id: &str) -> Result<DeleteOutcome, ApiError> {
        let response = self
            .client
            .delete(self.job_url(id))
            .send()
            .await
            .map_err(transport)?;
        decode(check(response, Some(id)).await?).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::models::JobStatus;

    #[test]
    fn test_rejects_invalid_url() {
        assert!(matches!(
            HttpJobsApi::new("not a url"),
            Err(ApiError::Transport(_))
        ));
    }

    #[test]
    fn test_job_url_encodes_id() {
        let api = HttpJobsApi::new("http://localhost:5000/api/jobs/").unwrap();
        assert_eq!(
            api.job_url("a b").as_str(),
            "http://localhost:5000/api/jobs/a%20b"
        );
        assert_eq!(
            api.collection_url().as_str(),
            "http://localhost:5000/api/jobs"
        );
    }

    #[test]
    fn test_decode_jobs_skips_unknown_status() {
        let good = json!({
            "id": "1",
            "company": "Acme",
            "role": "Dev",
            "status": "Offer",
            "appliedDate": "2026-01-01T00:00:00Z",
            "notes": "",
            "createdAt": "2026-01-01T00:00:00Z",
            "updatedAt": "2026-01-01T00:00:00Z"
        });
        let mut bad = good.clone();
        bad["id"] = json!("2");
        bad["status"] = json!("Ghosted");

        let response = decode_jobs(vec![good, bad]);
        assert_eq!(response.jobs.len(), 1);
        assert_eq!(response.jobs[0].status, JobStatus::Offer);
        assert_eq!(response.skipped, 1);
    }
}
