// src/error.rs
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::message::ErrorResponse;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Missing BACKEND_URL. Set it in the relay environment (e.g., http://localhost:5000).")]
    MissingBackendUrl,

    /// The upstream answered with a non-success status; holds its raw body.
    #[error("Backend error: {0}")]
    Upstream(String),

    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("{0}")]
    InvalidRequest(#[from] serde_json::Error),

    #[error("Unknown error")]
    Unknown,
}

impl AppError {
    /// Message shown to the client. Falls back to "Unknown error" when the
    /// underlying failure has nothing to say.
    pub fn client_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            AppError::Unknown.to_string()
        } else {
            message
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::MissingBackendUrl => tracing::error!("BACKEND_URL is not configured"),
            AppError::Upstream(body) => tracing::warn!(body = %body, "upstream returned an error"),
            AppError::Transport(e) => tracing::error!(error = ?e, "upstream transport failure"),
            AppError::InvalidRequest(e) => tracing::warn!(error = %e, "malformed chat request"),
            AppError::Unknown => tracing::error!("unknown relay failure"),
        }

        let body = Json(ErrorResponse {
            error: self.client_message(),
        });
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}
