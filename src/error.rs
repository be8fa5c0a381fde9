//! Domain error types for the portfolio server.
//!
//! Uses thiserror for ergonomic error handling with automatic Display implementations.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use std::fmt;

use crate::services::github::GitHubError;

/// Application-level errors.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A top-level GitHub call failed
    #[error(transparent)]
    GitHub(#[from] GitHubError),

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::GitHub(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::GitHub(GitHubError::MissingToken) => {
                tracing::error!("GitHub request attempted without GITHUB_TOKEN");
                "GITHUB_TOKEN is not configured on the server".to_string()
            }
            AppError::GitHub(GitHubError::Http { status, body }) => {
                tracing::error!(status = %status, body = %body, "GitHub API returned an error");
                format!("GitHub API request failed: {}", status)
            }
            AppError::GitHub(err) => {
                tracing::error!("GitHub error: {}", err);
                format!("Failed to fetch data from GitHub: {}", err)
            }
            AppError::InvalidInput(_) => self.to_string(),
        };

        HttpResponse::build(self.status_code()).json(ErrorResponse { error: message })
    }
}

/// Error response body matching OpenAPI schema.
#[derive(Debug, serde::Serialize, serde::Deserialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
