//! Portfolio data service.
//!
//! Orchestrates GitHub fetches, per-repository sub-fetches and response caching
//! for the skills, starred and featured endpoints. Each request builds its own
//! accumulator; the only shared state is the response cache.

use futures_util::StreamExt;
use futures_util::stream;
use serde::Deserialize;
use tracing::{info, warn};

use crate::config::{CacheSettings, GitHubSettings};
use crate::error::{AppError, AppResult};
use crate::models::{FeaturedProject, ProjectSource, Repository, Skill, TokenStatus};
use crate::services::cache::{CacheStats, ResponseCache};
use crate::services::github::{GitHubClient, GitHubError};
use crate::services::languages::collect_language_stats;
use crate::services::readme::build_featured_project;

/// Longest GitHub login accepted.
const MAX_USERNAME_LEN: usize = 39;

/// Error body GitHub sends with non-2xx responses.
#[derive(Debug, Default, Deserialize)]
struct GitHubErrorBody {
    message: Option<String>,
    documentation_url: Option<String>,
}

/// Occupancy of each response cache.
#[derive(Debug, Clone, Copy)]
pub struct PortfolioCacheStats {
    pub skills: CacheStats,
    pub starred: CacheStats,
    pub featured: CacheStats,
}

/// GitHub-backed portfolio data.
#[derive(Clone)]
pub struct PortfolioService {
    client: GitHubClient,
    default_username: String,
    concurrency: usize,
    skills_cache: ResponseCache<Vec<Skill>>,
    starred_cache: ResponseCache<Vec<Repository>>,
    featured_cache: ResponseCache<Vec<FeaturedProject>>,
}

impl PortfolioService {
    pub fn new(client: GitHubClient, github: &GitHubSettings, cache: CacheSettings) -> Self {
        Self {
            client,
            default_username: github.username.clone(),
            concurrency: github.concurrency.max(1),
            skills_cache: ResponseCache::new("skills", cache),
            starred_cache: ResponseCache::new("starred", cache),
            featured_cache: ResponseCache::new("featured", cache),
        }
    }

    /// Pick the requested username or the configured owner, rejecting invalid logins.
    pub fn resolve_username(&self, requested: Option<&str>) -> AppResult<String> {
        let username = match requested.map(str::trim) {
            Some(u) if !u.is_empty() => u,
            _ => return Ok(self.default_username.clone()),
        };

        let valid = username.len() <= MAX_USERNAME_LEN
            && !username.starts_with('-')
            && !username.ends_with('-')
            && username.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');

        if !valid {
            return Err(AppError::InvalidInput(format!(
                "'{}' is not a valid GitHub username",
                username
            )));
        }

        Ok(username.to_string())
    }

    /// Language skills across the user's own repositories.
    pub async fn skills(&self, username: &str) -> Result<Vec<Skill>, GitHubError> {
        let key = format!("skills:{}", username.to_lowercase());
        if let Some(skills) = self.skills_cache.get(&key).await {
            return Ok(skills);
        }

        let repos = self.client.list_user_repos(username).await?;
        let stats = collect_language_stats(&self.client, &repos, self.concurrency).await;
        let skills = stats.into_skills();

        info!(
            username,
            repos = repos.len(),
            skills = skills.len(),
            "Aggregated GitHub skills"
        );

        self.skills_cache.insert(key, skills.clone()).await;
        Ok(skills)
    }

    /// Starred repositories with their README text.
    ///
    /// Ordered by `updated_at` desc, then stars desc, then id desc.
    pub async fn starred(&self, username: &str) -> Result<Vec<Repository>, GitHubError> {
        let key = format!("starred:{}", username.to_lowercase());
        if let Some(repos) = self.starred_cache.get(&key).await {
            return Ok(repos);
        }

        let repos = self.client.list_starred_repos(username).await?;
        let mut repos = self.with_readmes(repos).await;
        repos.sort_by(|a, b| {
            b.updated_at
                .cmp(&a.updated_at)
                .then_with(|| b.stargazers_count.cmp(&a.stargazers_count))
                .then_with(|| b.id.cmp(&a.id))
        });

        info!(username, repos = repos.len(), "Fetched starred repositories");

        self.starred_cache.insert(key, repos.clone()).await;
        Ok(repos)
    }

    /// Projects whose README carries the featured marker block.
    ///
    /// Ordered by stars desc, then `updated_at` desc.
    pub async fn featured(
        &self,
        username: &str,
        source: ProjectSource,
    ) -> Result<Vec<FeaturedProject>, GitHubError> {
        let key = format!("featured:{}:{}", source.as_str(), username.to_lowercase());
        if let Some(projects) = self.featured_cache.get(&key).await {
            return Ok(projects);
        }

        let repos = match source {
            ProjectSource::Starred => self.starred(username).await?,
            ProjectSource::Owned => {
                let repos = self.client.list_user_repos(username).await?;
                self.with_readmes(repos).await
            }
        };

        let raw_base = self.client.raw_url();
        let mut projects: Vec<FeaturedProject> = repos
            .iter()
            .filter_map(|repo| build_featured_project(repo, raw_base))
            .collect();
        projects.sort_by(|a, b| {
            b.stars
                .cmp(&a.stars)
                .then_with(|| b.updated_at.cmp(&a.updated_at))
                .then_with(|| b.id.cmp(&a.id))
        });

        info!(
            username,
            source = source.as_str(),
            scanned = repos.len(),
            featured = projects.len(),
            "Extracted featured projects"
        );

        self.featured_cache.insert(key, projects.clone()).await;
        Ok(projects)
    }

    /// Check the configured token against GitHub's `/user` endpoint.
    pub async fn token_status(&self) -> TokenStatus {
        match self.client.get_authenticated_user().await {
            Ok(auth) => TokenStatus::Valid {
                message: "Token is valid".to_string(),
                username: auth.user.login,
                rate_limit: auth
                    .rate_limit_remaining
                    .unwrap_or_else(|| "unknown".to_string()),
            },
            Err(GitHubError::MissingToken) => TokenStatus::Error {
                message: None,
                error: "GITHUB_TOKEN is not configured on the server".to_string(),
            },
            Err(GitHubError::Http { status, body }) => {
                let parsed: GitHubErrorBody = serde_json::from_str(&body).unwrap_or_default();
                warn!(status = %status, "GitHub rejected the configured token");
                TokenStatus::Invalid {
                    http_status: status.as_u16(),
                    message: format!("Token invalid or expired: {}", status.as_u16()),
                    error: parsed.message.unwrap_or_else(|| "Unknown error".to_string()),
                    documentation_url: parsed.documentation_url,
                }
            }
            Err(e) => {
                warn!("Failed to verify GitHub token: {}", e);
                TokenStatus::Error {
                    message: Some("Failed to verify GitHub token".to_string()),
                    error: e.to_string(),
                }
            }
        }
    }

    pub async fn cache_stats(&self) -> PortfolioCacheStats {
        PortfolioCacheStats {
            skills: self.skills_cache.stats().await,
            starred: self.starred_cache.stats().await,
            featured: self.featured_cache.stats().await,
        }
    }

    /// Drop expired entries from every cache.
    pub async fn purge_expired(&self) -> usize {
        self.skills_cache.purge_expired().await
            + self.starred_cache.purge_expired().await
            + self.featured_cache.purge_expired().await
    }

    /// Attach README text to each repository; failures leave it empty.
    async fn with_readmes(&self, repos: Vec<Repository>) -> Vec<Repository> {
        let client = &self.client;
        stream::iter(repos)
            .map(|mut repo| async move {
                repo.readme_content = match client.get_readme(&repo.owner.login, &repo.name).await
                {
                    Ok(readme) => readme,
                    Err(e) => {
                        warn!(repo = %repo.name, "Skipping README: {}", e);
                        None
                    }
                };
                repo
            })
            .buffered(self.concurrency)
            .collect()
            .await
    }
}
