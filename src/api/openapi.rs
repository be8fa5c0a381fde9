//! OpenAPI documentation configuration.

use utoipa::OpenApi;

use crate::{api, error, models};

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Portfolio Server",
        version = "0.2.0",
        description = "Portfolio backend serving GitHub language skills, starred repositories and README-featured projects"
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    paths(
        // Health endpoints
        api::health::health,
        // GitHub endpoints
        api::github::get_skills,
        api::github::get_starred,
        api::github::get_featured,
        api::github::get_token_status,
    ),
    components(
        schemas(
            // Common
            error::ErrorResponse,
            // Health
            api::health::HealthResponse,
            api::health::CacheHealth,
            api::health::CacheUsage,
            // GitHub
            models::Skill,
            models::Repository,
            models::RepositoryOwner,
            models::FeaturedProject,
            models::TokenStatus,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "GitHub", description = "Portfolio data derived from GitHub")
    )
)]
pub struct ApiDoc;
