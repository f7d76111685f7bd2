use thiserror::Error;

use crate::retry::{is_retryable_status, Retryable};

/// Everything that can go wrong talking to SWAPI
///
/// Transport, decode and reference failures stay distinct so callers never
/// have to guess whether an empty record is real data or a swallowed error.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid resource reference: {0}")]
    InvalidReference(String),

    #[error("Unknown resource kind: {0}")]
    UnknownKind(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Status {status}: {message}")]
    RequestFailed { status: u16, message: String },
}

impl Retryable for ApiError {
    fn is_retryable(&self) -> bool {
        match self {
            ApiError::Transport(_) | ApiError::RateLimitExceeded => true,
            ApiError::RequestFailed { status, .. } => reqwest::StatusCode::from_u16(*status)
                .map(is_retryable_status)
                .unwrap_or(false),
            ApiError::Decode(_)
            | ApiError::InvalidReference(_)
            | ApiError::UnknownKind(_)
            | ApiError::NotFound(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
