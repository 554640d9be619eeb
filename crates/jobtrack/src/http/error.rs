//! Mapping of service failures to HTTP responses.

use actix_web::error::BlockingError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::service::ServiceError;

/// JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

/// Error type returned by handlers.
#[derive(Error, Debug)]
pub enum HttpError {
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// Request body could not be decoded (including unknown status values).
    #[error("{0}")]
    BadRequest(String),

    #[error("Blocking task failed")]
    Blocking(#[from] BlockingError),
}

impl ResponseError for HttpError {
    fn status_code(&self) -> StatusCode {
        match self {
            HttpError::Service(ServiceError::Validation(_)) => StatusCode::BAD_REQUEST,
            HttpError::Service(ServiceError::NotFound(_)) => StatusCode::NOT_FOUND,
            HttpError::Service(ServiceError::StoreUnavailable(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            HttpError::BadRequest(_) => StatusCode::BAD_REQUEST,
            HttpError::Blocking(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }
        HttpResponse::build(status).json(ErrorBody {
            message: self.to_string(),
        })
    }
}
