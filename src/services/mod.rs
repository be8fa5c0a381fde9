//! Business logic services.

pub mod cache;
pub mod cleanup;
pub mod github;
pub mod languages;
pub mod portfolio;
pub mod readme;

pub use cleanup::{CleanupConfig, start_cleanup_task};
pub use github::{GitHubClient, GitHubError};
pub use portfolio::PortfolioService;
