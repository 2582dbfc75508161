use actix_web::error::PayloadError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

use crate::web::models::ErrorBody;

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Missing OPENAI_API_KEY")]
    MissingApiKey,

    #[error("Invalid JSON body: {0}")]
    MalformedBody(#[from] serde_json::Error),

    #[error("Request body exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error("Failed to read request body: {0}")]
    Payload(#[from] PayloadError),

    /// Upstream answered with a non-success status; the body is relayed as-is.
    #[error("{body}")]
    Upstream { status: u16, body: String },

    #[error("Upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Upstream answered 2xx with a body that is not JSON at all.
    #[error("Upstream returned invalid JSON: {0}")]
    InvalidUpstreamBody(serde_json::Error),
}

impl ResponseError for RelayError {
    fn status_code(&self) -> StatusCode {
        match self {
            RelayError::MissingApiKey => StatusCode::INTERNAL_SERVER_ERROR,
            RelayError::MalformedBody(_) | RelayError::Payload(_) => StatusCode::BAD_REQUEST,
            RelayError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            RelayError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            RelayError::Transport(_) | RelayError::InvalidUpstreamBody(_) => {
                StatusCode::BAD_GATEWAY
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.to_string(),
        })
    }
}
