//! Client state container and the views derived from it.
//!
//! `TrackerState` holds a disposable snapshot of the store plus UI state.
//! Every derived view is recomputed from the snapshot on each read.

use std::fmt;
use std::str::FromStr;

use super::api::ListResponse;
use crate::models::{Job, JobStatus, NewJob, UnknownStatus};

/// Which records the list shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(JobStatus),
}

impl StatusFilter {
    /// Filter options in display order.
    pub const OPTIONS: [StatusFilter; 5] = [
        StatusFilter::All,
        StatusFilter::Only(JobStatus::Applied),
        StatusFilter::Only(JobStatus::Interview),
        StatusFilter::Only(JobStatus::Offer),
        StatusFilter::Only(JobStatus::Rejected),
    ];

    pub fn matches(&self, job: &Job) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(status) => job.status == *status,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatusFilter::All => "All",
            StatusFilter::Only(status) => status.as_str(),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for StatusFilter {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(StatusFilter::All);
        }
        s.parse().map(StatusFilter::Only)
    }
}

/// Total plus one bucket per status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Counts {
    pub total: usize,
    by_status: [usize; 4],
}

impl Counts {
    pub fn from_jobs<'a, I>(jobs: I) -> Self
    where
        I: IntoIterator<Item = &'a Job>,
    {
        let mut counts = Counts::default();
        for job in jobs {
            counts.total += 1;
            counts.by_status[job.status.index()] += 1;
        }
        counts
    }

    pub fn get(&self, status: JobStatus) -> usize {
        self.by_status[status.index()]
    }

    /// `(status, count)` pairs in pipeline order.
    pub fn iter(&self) -> impl Iterator<Item = (JobStatus, usize)> + '_ {
        JobStatus::ALL.into_iter().map(move |s| (s, self.get(s)))
    }
}

/// Pending new-record form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Draft {
    pub company: String,
    pub role: String,
    pub status: JobStatus,
    pub notes: String,
}

impl Draft {
    /// Whether both required fields are filled in.
    pub fn is_submittable(&self) -> bool {
        !self.company.trim().is_empty() && !self.role.trim().is_empty()
    }

    pub fn to_new_job(&self) -> NewJob {
        NewJob {
            company: Some(self.company.trim().to_string()),
            role: Some(self.role.trim().to_string()),
            status: Some(self.status),
            applied_date: None,
            notes: Some(self.notes.clone()),
        }
    }
}

/// One input of the draft form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Company,
    Role,
    Status,
    Notes,
}

/// Sequence number of a List request. Snapshots carrying an older ticket
/// than the last applied one are discarded.
///
/// [`Tracker`](super::Tracker) runs one request at a time, so it never trips
/// this. Tickets matter to callers that share a `TrackerState` across tasks
/// and let List requests overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestTicket(u64);

#[derive(Debug, Clone, Default)]
pub struct TrackerState {
    records: Vec<Job>,
    draft: Draft,
    active_filter: StatusFilter,
    error: Option<String>,
    notice: Option<String>,
    issued: u64,
    applied: u64,
}

impl TrackerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The snapshot, in List order.
    pub fn records(&self) -> &[Job] {
        &self.records
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn active_filter(&self) -> StatusFilter {
        self.active_filter
    }

    /// Last action failure, shown until the next action succeeds.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Records passing the active filter, snapshot order preserved.
    pub fn visible_records(&self) -> Vec<&Job> {
        self.records
            .iter()
            .filter(|job| self.active_filter.matches(job))
            .collect()
    }

    /// Row `n` (1-based) of the visible list.
    pub fn visible_row(&self, n: usize) -> Option<&Job> {
        n.checked_sub(1)
            .and_then(|i| self.visible_records().get(i).copied())
    }

    pub fn counts(&self) -> Counts {
        Counts::from_jobs(&self.records)
    }

    pub fn set_filter(&mut self, filter: StatusFilter) {
        self.active_filter = filter;
    }

    pub fn edit_draft(&mut self, field: DraftField, value: &str) -> Result<(), UnknownStatus> {
        match field {
            DraftField::Company => self.draft.company = value.to_string(),
            DraftField::Role => self.draft.role = value.to_string(),
            DraftField::Status => self.draft.status = value.parse()?,
            DraftField::Notes => self.draft.notes = value.to_string(),
        }
        Ok(())
    }

    pub fn reset_draft(&mut self) {
        self.draft = Draft::default();
    }

    /// Issues the ticket for the next List request.
    pub fn begin_request(&mut self) -> RequestTicket {
        self.issued += 1;
        RequestTicket(self.issued)
    }

    /// Replaces the snapshot unless a newer one was already applied.
    /// Returns whether the snapshot was taken.
    pub fn apply_snapshot(&mut self, ticket: RequestTicket, response: ListResponse) -> bool {
        if ticket.0 <= self.applied {
            tracing::debug!(
                ticket = ticket.0,
                applied = self.applied,
                "Discarding stale snapshot"
            );
            return false;
        }
        self.applied = ticket.0;
        self.records = response.jobs;
        if response.skipped > 0 {
            self.notice = Some(format!(
                "{} record(s) with an unrecognized status were hidden",
                response.skipped
            ));
        }
        true
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn set_notice(&mut self, message: impl Into<String>) {
        self.notice = Some(message.into());
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }
}
