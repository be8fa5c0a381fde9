//! GitHub-backed portfolio API handlers.

use actix_web::http::StatusCode;
use actix_web::http::header::{CACHE_CONTROL, HeaderValue};
use actix_web::{HttpResponse, web};
use serde::Serialize;

use crate::error::AppResult;
use crate::models::{
    FeaturedProject, FeaturedQuery, ProjectSource, Repository, Skill, TokenStatus, UsernameQuery,
};
use crate::services::PortfolioService;

/// Edge caching policy for successful GitHub-derived responses.
pub const CACHE_CONTROL_VALUE: &str = "public, s-maxage=3600, stale-while-revalidate=86400";

fn cached_json<T: Serialize>(body: &T) -> HttpResponse {
    HttpResponse::Ok()
        .insert_header((CACHE_CONTROL, HeaderValue::from_static(CACHE_CONTROL_VALUE)))
        .json(body)
}

/// Language skills across the user's own repositories.
///
/// Languages that cannot be fetched for individual repositories are skipped.
#[utoipa::path(
    get,
    path = "/api/github/skills",
    tag = "GitHub",
    params(UsernameQuery),
    responses(
        (status = 200, description = "Skills ordered by percentage", body = [Skill]),
        (status = 400, description = "Invalid username", body = crate::error::ErrorResponse),
        (status = 500, description = "GitHub request failed", body = crate::error::ErrorResponse),
    )
)]
pub async fn get_skills(
    service: web::Data<PortfolioService>,
    query: web::Query<UsernameQuery>,
) -> AppResult<HttpResponse> {
    let username = service.resolve_username(query.username.as_deref())?;
    let skills = service.skills(&username).await?;
    Ok(cached_json(&skills))
}

/// Repositories starred by the user, each with its decoded README.
#[utoipa::path(
    get,
    path = "/api/github/starred",
    tag = "GitHub",
    params(UsernameQuery),
    responses(
        (status = 200, description = "Starred repositories, most recently updated first", body = [Repository]),
        (status = 400, description = "Invalid username", body = crate::error::ErrorResponse),
        (status = 500, description = "GitHub request failed", body = crate::error::ErrorResponse),
    )
)]
pub async fn get_starred(
    service: web::Data<PortfolioService>,
    query: web::Query<UsernameQuery>,
) -> AppResult<HttpResponse> {
    let username = service.resolve_username(query.username.as_deref())?;
    let repos = service.starred(&username).await?;
    Ok(cached_json(&repos))
}

/// Projects whose README carries a `PORTFOLIO-FEATURED` block.
#[utoipa::path(
    get,
    path = "/api/github/featured",
    tag = "GitHub",
    params(FeaturedQuery),
    responses(
        (status = 200, description = "Featured projects ordered by stars", body = [FeaturedProject]),
        (status = 400, description = "Invalid username or source", body = crate::error::ErrorResponse),
        (status = 500, description = "GitHub request failed", body = crate::error::ErrorResponse),
    )
)]
pub async fn get_featured(
    service: web::Data<PortfolioService>,
    query: web::Query<FeaturedQuery>,
) -> AppResult<HttpResponse> {
    let username = service.resolve_username(query.username.as_deref())?;
    let source = match query.source.as_deref() {
        Some(s) if !s.trim().is_empty() => ProjectSource::parse(s.trim())?,
        _ => ProjectSource::default(),
    };

    let projects = service.featured(&username, source).await?;
    Ok(cached_json(&projects))
}

/// Validate the configured GitHub token.
///
/// The response status mirrors GitHub's answer for rejected tokens.
#[utoipa::path(
    get,
    path = "/api/github/token-status",
    tag = "GitHub",
    responses(
        (status = 200, description = "Token is valid", body = TokenStatus),
        (status = 401, description = "GitHub rejected the token", body = TokenStatus),
        (status = 500, description = "Token missing or GitHub unreachable", body = TokenStatus),
    )
)]
pub async fn get_token_status(service: web::Data<PortfolioService>) -> HttpResponse {
    let status = service.token_status().await;
    let code =
        StatusCode::from_u16(status.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    HttpResponse::build(code).json(status)
}

/// Configure GitHub routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/github/skills").route(web::get().to(get_skills)))
        .service(web::resource("/github/starred").route(web::get().to(get_starred)))
        .service(web::resource("/github/featured").route(web::get().to(get_featured)))
        .service(web::resource("/github/token-status").route(web::get().to(get_token_status)));
}
