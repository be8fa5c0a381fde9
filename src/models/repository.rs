//! GitHub repository snapshot as returned by the REST API.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Repository owner (user or organization).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RepositoryOwner {
    pub login: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// A repository from `/users/{user}/repos` or `/users/{user}/starred`.
///
/// The fields the portfolio relies on are typed; everything else GitHub sends
/// is kept in `extra` so the starred endpoint can pass the payload through
/// unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Repository {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub html_url: String,
    pub languages_url: String,
    pub owner: RepositoryOwner,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub default_branch: Option<String>,
    /// Decoded README text; `None` when the repository has none or it could not be fetched
    #[serde(default)]
    pub readme_content: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Repository {
    /// Branch used to resolve README-relative assets.
    pub fn branch(&self) -> &str {
        self.default_branch.as_deref().unwrap_or("main")
    }
}

/// The authenticated user from `/user`.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubUser {
    pub login: String,
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
}
