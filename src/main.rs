//! Portfolio Server - Main entry point.
//!
//! Starts the Actix-web server with configured routes and middleware.

use std::path::PathBuf;

use actix_cors::Cors;
use actix_files::{Files, NamedFile};
use actix_web::{App, HttpRequest, HttpServer, Result as ActixResult, http::header, web};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use portfolio_lib::config::Config;
use portfolio_lib::services::{self, CleanupConfig, GitHubClient, PortfolioService};
use portfolio_lib::{api, middleware};

/// Front-end build directory registered as app data.
#[derive(Clone)]
struct StaticDir(PathBuf);

/// SPA fallback handler - serves index.html for client-side routing.
async fn spa_fallback(req: HttpRequest) -> ActixResult<NamedFile> {
    let static_dir = req
        .app_data::<web::Data<StaticDir>>()
        .ok_or_else(|| actix_web::error::ErrorNotFound("Static files are not configured"))?;
    Ok(NamedFile::open(static_dir.0.join("index.html"))?)
}

/// Perform health check (for Docker healthcheck).
fn health_check() -> bool {
    // Simple check - just verify we can load config
    Config::from_env().is_ok()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Check for --health-check flag (used by Docker HEALTHCHECK)
    if std::env::args().any(|arg| arg == "--health-check") {
        dotenvy::dotenv().ok();
        std::process::exit(if health_check() { 0 } else { 1 });
    }

    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            error!("");
            error!("Please check your environment variables:");
            error!("  - RUST_ENV must be set to 'development' or 'production'");
            error!("  - In production, GITHUB_TOKEN and GITHUB_USERNAME must be set");
            error!("  - In production, GITHUB_USERNAME must not be the development default");
            std::process::exit(1);
        }
    };

    info!("========================================");
    info!("  Portfolio Server v{}", env!("CARGO_PKG_VERSION"));
    info!("  Environment: {}", config.environment);
    info!("  GitHub user: {}", config.github.username);
    info!("========================================");

    if config.is_development() {
        warn!("Running in DEVELOPMENT mode - do not use in production!");
    }
    if !config.github.has_token() {
        warn!("GITHUB_TOKEN is not set; GitHub endpoints will answer with 500");
    }

    let client = GitHubClient::new(&config.github).map_err(std::io::Error::other)?;
    let service = PortfolioService::new(client, &config.github, config.cache);

    // Start the cache cleanup background task
    match CleanupConfig::for_cache(&config.cache) {
        Some(cleanup_config) => {
            services::start_cleanup_task(service.clone(), cleanup_config);
            info!(
                "Response cache enabled (ttl: {} seconds, {} entries per endpoint)",
                config.cache.ttl.as_secs(),
                config.cache.max_entries
            );
        }
        None => info!("Response cache disabled"),
    }

    // Prepare shared state
    let bind_address = config.bind_address();
    let static_dir = config.static_dir.clone();
    let is_development = config.is_development();
    let service = web::Data::new(service);
    let openapi = api::ApiDoc::openapi();

    if let Some(ref dir) = static_dir {
        info!("Static file serving enabled from {}", dir.display());
    }

    let worker_count = if is_development {
        info!(
            "Starting server at http://{} (4 workers - development mode)",
            bind_address
        );
        4
    } else {
        let cpus = num_cpus::get();
        info!(
            "Starting server at http://{} ({} workers)",
            bind_address, cpus
        );
        cpus
    };

    // Start HTTP server
    let server = HttpServer::new(move || {
        // Configure CORS
        let cors = if is_development {
            Cors::default()
                .allowed_origin("http://localhost:3000")
                .allowed_origin("http://127.0.0.1:3000")
                .allowed_methods(vec!["GET", "OPTIONS"])
                .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
                .max_age(3600)
        } else {
            // Same-origin only
            Cors::default()
                .allowed_methods(vec!["GET", "OPTIONS"])
                .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
                .max_age(3600)
        };

        let mut app = App::new()
            // Add CORS middleware (must be before other middleware)
            .wrap(cors)
            .wrap(middleware::RequestLogger::new())
            .app_data(service.clone())
            .service(
                SwaggerUi::new("/api/docs/{_:.*}").url("/api/docs/openapi.json", openapi.clone()),
            )
            .service(
                web::scope("/api")
                    .configure(api::configure_health_routes)
                    .configure(api::configure_github_routes),
            );

        // Serve the front-end build (when PORTFOLIO_STATIC_DIR is set)
        if let Some(ref dir) = static_dir {
            app = app
                .app_data(web::Data::new(StaticDir(dir.clone())))
                .service(Files::new("/assets", dir.join("assets")).prefer_utf8(true))
                .service(Files::new("/favicon", dir.clone()).index_file("favicon.ico"))
                // SPA fallback - serve index.html for all other routes
                .default_service(web::route().to(spa_fallback));
        }

        app
    });

    server
        .workers(worker_count)
        .bind(&bind_address)?
        .run()
        .await
}
