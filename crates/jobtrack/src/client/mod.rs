//! Client side of the tracker: the API seam, the state container with its
//! derived views, and the action runner that keeps the two in sync.

pub mod api;
pub mod http;
pub mod local;
pub mod state;
pub mod tracker;

pub use api::{ApiError, JobsApi, ListResponse};
pub use http::HttpJobsApi;
pub use local::LocalJobsApi;
pub use state::{Counts, Draft, DraftField, RequestTicket, StatusFilter, TrackerState};
pub use tracker::{ActionError, Tracker};
