use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::{error, warn};
use thiserror::Error;

/// Failure taxonomy for the ingest and export pipeline.
///
/// Every variant is terminal for the request that raised it; nothing in the
/// pipeline retries. The variant decides the HTTP status the handler returns.
#[derive(Error, Debug)]
pub enum CollectorError {
    /// A submitted form field failed validation
    #[error("{field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// The audio payload is not a data URL (no comma separator)
    #[error("invalid audio format")]
    MalformedAudioFormat,

    /// The data URL prefix does not declare an audio media type
    #[error("uploaded data is not audio")]
    NotAudioContent,

    /// The payload after the separator is not valid base64
    #[error("failed to decode audio data: {0}")]
    Base64Decode(#[from] base64::DecodeError),

    /// The decoded audio exceeds the configured size limit
    #[error("audio exceeds {limit_mb}MB limit")]
    AudioTooLarge { limit_mb: usize },

    /// Disk or database write error
    #[error("storage write failed: {0}")]
    StorageWrite(String),

    /// Unknown filename or empty result set
    #[error("{0}")]
    NotFound(String),
}

impl CollectorError {
    pub fn status(&self) -> StatusCode {
        match self {
            CollectorError::Validation { .. }
            | CollectorError::MalformedAudioFormat
            | CollectorError::NotAudioContent
            | CollectorError::Base64Decode(_)
            | CollectorError::AudioTooLarge { .. } => StatusCode::BAD_REQUEST,
            CollectorError::StorageWrite(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CollectorError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl From<sqlx::Error> for CollectorError {
    fn from(e: sqlx::Error) -> Self {
        CollectorError::StorageWrite(e.to_string())
    }
}

impl IntoResponse for CollectorError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("request failed: {}", self);
        } else {
            warn!("request rejected: {}", self);
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}
