//! GitHub token validity report.

use serde::Serialize;
use utoipa::ToSchema;

/// Token status as reported by `/api/github/token-status`.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum TokenStatus {
    /// GitHub accepted the token
    Valid {
        message: String,
        username: String,
        rate_limit: String,
    },
    /// GitHub rejected the token
    Invalid {
        #[serde(skip)]
        http_status: u16,
        message: String,
        error: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        documentation_url: Option<String>,
    },
    /// The token is missing or GitHub could not be reached
    Error {
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
        error: String,
    },
}

impl TokenStatus {
    /// HTTP status the endpoint responds with.
    pub fn http_status(&self) -> u16 {
        match self {
            TokenStatus::Valid { .. } => 200,
            TokenStatus::Invalid { http_status, .. } => *http_status,
            TokenStatus::Error { .. } => 500,
        }
    }
}
