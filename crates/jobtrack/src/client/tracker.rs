//! Actions over the client state.
//!
//! Each mutating action is one API call followed by a full List reload.
//! Nothing is applied to the snapshot optimistically; failures land in
//! `TrackerState::error` and are also returned to the caller.

use thiserror::Error;
use tracing::warn;

use super::api::{ApiError, JobsApi};
use super::state::{DraftField, StatusFilter, TrackerState};
use crate::models::{JobPatch, JobStatus, UnknownStatus};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    #[error("Company and Role are required!")]
    MissingRequiredFields,

    #[error(transparent)]
    InvalidStatus(#[from] UnknownStatus),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Owns the state container and the API it synchronizes with.
pub struct Tracker<A> {
    api: A,
    state: TrackerState,
}

impl<A: JobsApi> Tracker<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            state: TrackerState::new(),
        }
    }

    pub fn state(&self) -> &TrackerState {
        &self.state
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Populates the snapshot from List.
    pub async fn load(&mut self) -> Result<(), ActionError> {
        // Cleared first so a skipped-records notice from the snapshot survives.
        self.state.clear_notice();
        let result = self.refresh().await;
        match result {
            Ok(()) => {
                self.state.clear_error();
                Ok(())
            }
            Err(e) => Err(self.fail(e.into())),
        }
    }

    /// Creates a job from the draft. Refuses without calling the API unless
    /// company and role are filled in.
    pub async fn submit_draft(&mut self) -> Result<(), ActionError> {
        if !self.state.draft().is_submittable() {
            return Err(self.fail(ActionError::MissingRequiredFields));
        }

        let new_job = self.state.draft().to_new_job();
        let result = self.api.create(&new_job).await;
        let job = match result {
            Ok(job) => job,
            Err(e) => return Err(self.fail(e.into())),
        };

        self.state.reset_draft();
        self.finish(format!("Added {} ({})", job.company, job.role))
            .await
    }

    pub async fn set_status(&mut self, id: &str, status: JobStatus) -> Result<(), ActionError> {
        let result = self.api.update(id, &JobPatch::status(status)).await;
        let job = match result {
            Ok(job) => job,
            Err(e) => return Err(self.fail(e.into())),
        };
        self.finish(format!("{} moved to {}", job.company, job.status))
            .await
    }

    pub async fn remove(&mut self, id: &str) -> Result<(), ActionError> {
        let result = self.api.delete(id).await;
        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) => return Err(self.fail(e.into())),
        };
        self.finish(outcome.message).await
    }

    /// Local only; no API call.
    pub fn set_filter(&mut self, filter: StatusFilter) {
        self.state.set_filter(filter);
    }

    /// Local only; no API call.
    pub fn edit_draft(&mut self, field: DraftField, value: &str) -> Result<(), ActionError> {
        match self.state.edit_draft(field, value) {
            Ok(()) => Ok(()),
            Err(e) => Err(self.fail(e.into())),
        }
    }

    async fn refresh(&mut self) -> Result<(), ApiError> {
        let ticket = self.state.begin_request();
        let response = self.api.list().await?;
        self.state.apply_snapshot(ticket, response);
        Ok(())
    }

    /// Reloads after a successful mutation.
    async fn finish(&mut self, notice: String) -> Result<(), ActionError> {
        let result = self.refresh().await;
        match result {
            Ok(()) => {
                self.state.clear_error();
                self.state.set_notice(notice);
                Ok(())
            }
            Err(e) => Err(self.fail(e.into())),
        }
    }

    fn fail(&mut self, err: ActionError) -> ActionError {
        warn!(error = %err, "Tracker action failed");
        self.state.clear_notice();
        self.state.set_error(err.to_string());
        err
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::Utc;

    use super::*;
    use crate::client::api::ListResponse;
    use crate::models::{DeleteOutcome, Job, NewJob};

    /// In-memory API that counts calls and can be told to fail.
    #[derive(Default)]
    struct FakeApi {
        jobs: Mutex<Vec<Job>>,
        creates: AtomicUsize,
        lists: AtomicUsize,
        fail_list: AtomicBool,
    }

    #[async_trait]
    impl JobsApi for FakeApi {
        async fn list(&self) -> Result<ListResponse, ApiError> {
            self.lists.fetch_add(1, Ordering::SeqCst);
            if self.fail_list.load(Ordering::SeqCst) {
                return Err(ApiError::Transport("connection refused".to_string()));
            }
            Ok(self.jobs.lock().unwrap().clone().into())
        }

        async fn create(&self, job: &NewJob) -> Result<Job, ApiError> {
            self.creates.fetch_add(1, Ordering::SeqCst);
            let mut jobs = self.jobs.lock().unwrap();
            let now = Utc::now();
            let created = Job {
                id: format!("fake-{}", jobs.len() + 1),
                company: job.company.clone().unwrap_or_default(),
                role: job.role.clone().unwrap_or_default(),
                status: job.status.unwrap_or_default(),
                applied_date: now,
                notes: job.notes.clone().unwrap_or_default(),
                created_at: now,
                updated_at: now,
            };
            jobs.insert(0, created.clone());
            Ok(created)
        }

        async fn update(&self, id: &str, patch: &JobPatch) -> Result<Job, ApiError> {
            let mut jobs = self.jobs.lock().unwrap();
            let job = jobs
                .iter_mut()
                .find(|j| j.id == id)
                .ok_or_else(|| ApiError::NotFound(id.to_string()))?;
            if let Some(status) = patch.status {
                job.status = status;
            }
            Ok(job.clone())
        }

        async fn delete(&self, id: &str) -> Result<DeleteOutcome, ApiError> {
            let mut jobs = self.jobs.lock().unwrap();
            let before = jobs.len();
            jobs.retain(|j| j.id != id);
            Ok(DeleteOutcome::new(jobs.len() != before))
        }
    }

    async fn tracker_with_draft(company: &str, role: &str) -> Tracker<FakeApi> {
        let mut tracker = Tracker::new(FakeApi::default());
        tracker.load().await.unwrap();
        tracker.edit_draft(DraftField::Company, company).unwrap();
        tracker.edit_draft(DraftField::Role, role).unwrap();
        tracker
    }

    #[tokio::test]
    async fn test_submit_with_empty_company_does_not_call_create() {
        let mut tracker = tracker_with_draft("", "Engineer").await;

        let result = tracker.submit_draft().await;
        assert_eq!(result, Err(ActionError::MissingRequiredFields));
        assert_eq!(tracker.api().creates.load(Ordering::SeqCst), 0);
        assert!(tracker.state().records().is_empty());
        assert_eq!(tracker.state().error(), Some("Company and Role are required!"));
        // Draft is kept so the user can fix it.
        assert_eq!(tracker.state().draft().role, "Engineer");
    }

    #[tokio::test]
    async fn test_submit_resets_draft_and_reloads() {
        let mut tracker = tracker_with_draft("Acme", "Engineer").await;
        let lists_before = tracker.api().lists.load(Ordering::SeqCst);

        tracker.submit_draft().await.unwrap();

        assert_eq!(tracker.api().creates.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.api().lists.load(Ordering::SeqCst), lists_before + 1);
        assert_eq!(tracker.state().records().len(), 1);
        assert_eq!(tracker.state().records()[0].status, JobStatus::Applied);
        assert!(tracker.state().draft().company.is_empty());
        assert!(tracker.state().error().is_none());
    }

    #[tokio::test]
    async fn test_load_drops_previous_notice() {
        let mut tracker = tracker_with_draft("Acme", "Dev").await;
        tracker.submit_draft().await.unwrap();
        assert_eq!(tracker.state().notice(), Some("Added Acme (Dev)"));

        tracker.load().await.unwrap();
        assert!(tracker.state().notice().is_none());
        assert_eq!(tracker.state().records().len(), 1);
    }

    #[tokio::test]
    async fn test_set_filter_makes_no_calls() {
        let mut tracker = Tracker::new(FakeApi::default());
        tracker.set_filter(StatusFilter::Only(JobStatus::Offer));
        assert_eq!(tracker.api().lists.load(Ordering::SeqCst), 0);
        assert_eq!(
            tracker.state().active_filter(),
            StatusFilter::Only(JobStatus::Offer)
        );
    }

    #[tokio::test]
    async fn test_failed_reload_surfaces_error() {
        let mut tracker = tracker_with_draft("Acme", "Engineer").await;
        tracker.api().fail_list.store(true, Ordering::SeqCst);

        let result = tracker.submit_draft().await;
        assert!(matches!(result, Err(ActionError::Api(ApiError::Transport(_)))));
        assert!(tracker.state().error().unwrap().contains("connection refused"));
        // The create went through; only the reload failed.
        assert_eq!(tracker.api().creates.load(Ordering::SeqCst), 1);

        tracker.api().fail_list.store(false, Ordering::SeqCst);
        tracker.load().await.unwrap();
        assert!(tracker.state().error().is_none());
        assert_eq!(tracker.state().records().len(), 1);
    }

    #[tokio::test]
    async fn test_set_status_unknown_id_surfaces_not_found() {
        let mut tracker = Tracker::new(FakeApi::default());
        let result = tracker.set_status("missing", JobStatus::Offer).await;
        assert_eq!(
            result,
            Err(ActionError::Api(ApiError::NotFound("missing".to_string())))
        );
        assert_eq!(tracker.state().error(), Some("Job not found: missing"));
    }

    #[tokio::test]
    async fn test_invalid_draft_status_is_reported() {
        let mut tracker = Tracker::new(FakeApi::default());
        let result = tracker.edit_draft(DraftField::Status, "Ghosted");
        assert!(matches!(result, Err(ActionError::InvalidStatus(_))));
        assert!(tracker.state().error().is_some());
        assert_eq!(tracker.state().draft().status, JobStatus::Applied);
    }
}
