//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

/// Development default values - NEVER use in production.
pub mod defaults {
    pub const DEV_HOST: &str = "127.0.0.1";
    pub const DEV_PORT: u16 = 8080;
    pub const DEV_GITHUB_USERNAME: &str = "octocat";
    pub const GITHUB_API_URL: &str = "https://api.github.com";
    pub const GITHUB_RAW_URL: &str = "https://raw.githubusercontent.com";
    pub const GITHUB_CONCURRENCY: usize = 8;
    pub const HTTP_CONNECT_TIMEOUT_SECS: u64 = 5;
    pub const HTTP_TIMEOUT_SECS: u64 = 10;
    pub const CACHE_TTL_SECS: u64 = 3600; // 1 hour, 0 disables
    pub const CACHE_MAX_ENTRIES: usize = 50;
}

/// Runtime environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// Parse environment from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Some(Self::Development),
            "production" | "prod" => Some(Self::Production),
            _ => None,
        }
    }

    /// Check if this is a development environment.
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    /// Check if this is a production environment.
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

/// GitHub API access settings.
#[derive(Debug, Clone)]
pub struct GitHubSettings {
    /// Personal access token sent as a bearer token
    pub token: Option<SecretString>,
    /// Account whose repositories are served when no `username` is given
    pub username: String,
    /// REST API base URL
    pub api_url: String,
    /// Base URL for raw repository content (README images)
    pub raw_url: String,
    /// Maximum in-flight per-repository requests
    pub concurrency: usize,
    /// TCP connect timeout for GitHub calls
    pub connect_timeout: Duration,
    /// Total request timeout for GitHub calls
    pub request_timeout: Duration,
}

impl GitHubSettings {
    /// Whether a token has been configured.
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }
}

/// Response cache settings.
#[derive(Debug, Clone, Copy)]
pub struct CacheSettings {
    /// Time-to-live for cached responses; zero disables caching
    pub ttl: Duration,
    /// Maximum number of cached responses per cache
    pub max_entries: usize,
}

impl CacheSettings {
    /// Check whether caching is enabled.
    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero() && self.max_entries > 0
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Runtime environment
    pub environment: Environment,
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Directory for a pre-built front-end (optional)
    pub static_dir: Option<PathBuf>,
    /// GitHub API settings
    pub github: GitHubSettings,
    /// Response cache settings
    pub cache: CacheSettings,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// In development mode (RUST_ENV=development) every variable has a default
    /// and only RUST_ENV is required. In production mode GITHUB_TOKEN and
    /// GITHUB_USERNAME must be set.
    ///
    /// Environment variables:
    /// - `RUST_ENV`: Environment (development/production) - REQUIRED
    /// - `PORTFOLIO_HOST`: Server host (default: 127.0.0.1)
    /// - `PORTFOLIO_PORT`: Server port (default: 8080)
    /// - `PORTFOLIO_STATIC_DIR`: Front-end build directory to serve
    /// - `GITHUB_TOKEN`: GitHub personal access token
    /// - `GITHUB_USERNAME`: Default GitHub account (default: octocat)
    /// - `GITHUB_API_URL`: GitHub REST base URL (default: https://api.github.com)
    /// - `GITHUB_RAW_URL`: Raw content base URL (default: https://raw.githubusercontent.com)
    /// - `PORTFOLIO_GITHUB_CONCURRENCY`: Max concurrent per-repo requests (default: 8)
    /// - `PORTFOLIO_HTTP_CONNECT_TIMEOUT_SECS`: Connect timeout (default: 5)
    /// - `PORTFOLIO_HTTP_TIMEOUT_SECS`: Request timeout (default: 10)
    /// - `PORTFOLIO_CACHE_TTL_SECS`: Response cache TTL, 0 disables (default: 3600)
    /// - `PORTFOLIO_CACHE_MAX_ENTRIES`: Response cache capacity (default: 50)
    pub fn from_env() -> Result<Self, ConfigError> {
        let env_str = env::var("RUST_ENV").map_err(|_| ConfigError::MissingEnvVar("RUST_ENV"))?;

        let environment = Environment::parse(&env_str).ok_or(ConfigError::InvalidValue(
            "RUST_ENV must be 'development' or 'production'",
        ))?;

        let host = env::var("PORTFOLIO_HOST").unwrap_or_else(|_| defaults::DEV_HOST.to_string());

        let port = env::var("PORTFOLIO_PORT")
            .unwrap_or_else(|_| defaults::DEV_PORT.to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidValue("PORTFOLIO_PORT must be a valid port number"))?;

        let static_dir = env::var("PORTFOLIO_STATIC_DIR").ok().map(PathBuf::from);

        let token = env::var("GITHUB_TOKEN")
            .ok()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .map(SecretString::from);

        let concurrency = parse_var(
            "PORTFOLIO_GITHUB_CONCURRENCY",
            defaults::GITHUB_CONCURRENCY,
            "PORTFOLIO_GITHUB_CONCURRENCY must be a valid number",
        )?;
        if concurrency == 0 {
            return Err(ConfigError::InvalidValue(
                "PORTFOLIO_GITHUB_CONCURRENCY must be at least 1",
            ));
        }

        let connect_timeout_secs = parse_var(
            "PORTFOLIO_HTTP_CONNECT_TIMEOUT_SECS",
            defaults::HTTP_CONNECT_TIMEOUT_SECS,
            "PORTFOLIO_HTTP_CONNECT_TIMEOUT_SECS must be a valid number",
        )?;
        let request_timeout_secs = parse_var(
            "PORTFOLIO_HTTP_TIMEOUT_SECS",
            defaults::HTTP_TIMEOUT_SECS,
            "PORTFOLIO_HTTP_TIMEOUT_SECS must be a valid number",
        )?;

        let github = GitHubSettings {
            token,
            username: env::var("GITHUB_USERNAME")
                .unwrap_or_else(|_| defaults::DEV_GITHUB_USERNAME.to_string()),
            api_url: env::var("GITHUB_API_URL")
                .unwrap_or_else(|_| defaults::GITHUB_API_URL.to_string()),
            raw_url: env::var("GITHUB_RAW_URL")
                .unwrap_or_else(|_| defaults::GITHUB_RAW_URL.to_string()),
            concurrency,
            connect_timeout: Duration::from_secs(connect_timeout_secs),
            request_timeout: Duration::from_secs(request_timeout_secs),
        };

        let cache = CacheSettings {
            ttl: Duration::from_secs(parse_var(
                "PORTFOLIO_CACHE_TTL_SECS",
                defaults::CACHE_TTL_SECS,
                "PORTFOLIO_CACHE_TTL_SECS must be a valid number",
            )?),
            max_entries: parse_var(
                "PORTFOLIO_CACHE_MAX_ENTRIES",
                defaults::CACHE_MAX_ENTRIES,
                "PORTFOLIO_CACHE_MAX_ENTRIES must be a valid number",
            )?,
        };

        let config = Config {
            environment,
            host,
            port,
            static_dir,
            github,
            cache,
        };

        if environment.is_production() {
            config.validate_production()?;
        }

        Ok(config)
    }

    /// Validate that production configuration does not rely on development defaults.
    fn validate_production(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if !self.github.has_token() {
            errors.push(
                "GITHUB_TOKEN is not set. GitHub endpoints will fail without a token.".to_string(),
            );
        }

        if self.github.username == defaults::DEV_GITHUB_USERNAME {
            errors.push(format!(
                "GITHUB_USERNAME is using development default '{}'. Set the portfolio owner's account.",
                defaults::DEV_GITHUB_USERNAME
            ));
        }

        if !errors.is_empty() {
            return Err(ConfigError::ProductionValidation(errors));
        }

        Ok(())
    }

    /// Get the server bind address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check if running in development mode.
    pub fn is_development(&self) -> bool {
        self.environment.is_development()
    }
}

fn parse_var<T: std::str::FromStr>(
    name: &str,
    default: T,
    message: &'static str,
) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidValue(message)),
        Err(_) => Ok(default),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(&'static str),

    #[error("Production configuration validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    ProductionValidation(Vec<String>),
}
