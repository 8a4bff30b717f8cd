//! Errors surfaced over HTTP.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// `date_req` is not a calendar date in `DD/MM/YYYY`.
    #[error("Date must be in DD/MM/YYYY format")]
    InvalidDate,

    /// Synthetic failure, forced by the caller or drawn at random.
    #[error("Internal server error")]
    Injected,

    /// The request log could not be read or written.
    #[error("Internal server error")]
    Storage(#[from] sqlx::Error),

    /// The XML document could not be rendered.
    #[error("Internal server error")]
    Serialization(#[from] quick_xml::SeError),

    /// Query string could not be decoded.
    #[error("{0}")]
    InvalidQuery(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidDate => StatusCode::BAD_REQUEST,
            ApiError::InvalidQuery(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Injected | ApiError::Storage(_) | ApiError::Serialization(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "detail": self.to_string() }))
    }
}
