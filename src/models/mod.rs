//! Domain models for the portfolio API.

pub mod project;
pub mod repository;
pub mod skill;
pub mod token_status;

// Re-export commonly used types
pub use project::{FeaturedMetadata, FeaturedProject, ProjectSource};
pub use repository::{GitHubUser, Repository, RepositoryOwner};
pub use skill::Skill;
pub use token_status::TokenStatus;

/// Optional `username` override accepted by the GitHub endpoints.
#[derive(Debug, Clone, Default, serde::Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UsernameQuery {
    /// GitHub account to query (defaults to the configured owner)
    pub username: Option<String>,
}

/// Query parameters for the featured projects endpoint.
#[derive(Debug, Clone, Default, serde::Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FeaturedQuery {
    /// GitHub account to query (defaults to the configured owner)
    pub username: Option<String>,
    /// Repository set to scan: `starred` (default) or `owned`
    pub source: Option<String>,
}
