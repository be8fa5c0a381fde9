//! Health check endpoint.

use actix_web::{HttpResponse, get, web};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::services::PortfolioService;
use crate::services::cache::CacheStats;

/// Occupancy of one response cache.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CacheUsage {
    pub entries: usize,
    pub expired: usize,
    pub capacity: usize,
}

impl From<CacheStats> for CacheUsage {
    fn from(stats: CacheStats) -> Self {
        Self {
            entries: stats.total_entries,
            expired: stats.expired_entries,
            capacity: stats.max_entries,
        }
    }
}

/// Response cache occupancy per endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CacheHealth {
    pub skills: CacheUsage,
    pub starred: CacheUsage,
    pub featured: CacheUsage,
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub version: String,
    pub cache: CacheHealth,
}

/// Health check endpoint.
///
/// Returns 200 if the service is running. Never calls GitHub.
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
#[get("/health")]
pub async fn health(service: web::Data<PortfolioService>) -> HttpResponse {
    let stats = service.cache_stats().await;

    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        cache: CacheHealth {
            skills: stats.skills.into(),
            starred: stats.starred.into(),
            featured: stats.featured.into(),
        },
    })
}

/// Configure health routes.
pub fn configure_health_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(health);
}
