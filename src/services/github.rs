//! GitHub REST API client.
//!
//! Thin wrapper over reqwest for the handful of endpoints the portfolio needs:
//! - `GET /users/{user}/repos` and `GET /users/{user}/starred`
//! - `GET /repos/{owner}/{repo}/languages` (via the repository's `languages_url`)
//! - `GET /repos/{owner}/{repo}/readme` (base64 payload, decoded here)
//! - `GET /user` (token validation)
//!
//! Every call is authenticated with the configured bearer token. Non-2xx
//! responses surface as [`GitHubError::Http`] carrying the status and raw body.
//! No retries are attempted.

use std::collections::BTreeMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::StatusCode;
use reqwest::header::ACCEPT;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::GitHubSettings;
use crate::models::{GitHubUser, Repository};

/// User agent sent with every GitHub request (GitHub rejects requests without one).
pub const USER_AGENT: &str = concat!("portfolio-server/", env!("CARGO_PKG_VERSION"));

/// Media type for the GitHub REST v3 JSON representation.
const GITHUB_JSON: &str = "application/vnd.github+json";

/// Response header carrying the remaining request quota.
const RATE_LIMIT_REMAINING: &str = "x-ratelimit-remaining";

/// Errors raised by the GitHub client.
#[derive(Debug, thiserror::Error)]
pub enum GitHubError {
    /// No token configured on the server
    #[error("GITHUB_TOKEN is not configured")]
    MissingToken,

    /// Connection, TLS or timeout failure
    #[error("request to GitHub failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// GitHub answered with a non-2xx status
    #[error("GitHub returned HTTP {status}: {body}")]
    Http { status: StatusCode, body: String },

    /// Response body did not match the expected shape
    #[error("unexpected response body from GitHub: {0}")]
    Decode(#[from] serde_json::Error),

    /// README payload was not valid base64
    #[error("README content could not be decoded: {0}")]
    Readme(String),
}

/// The authenticated account plus the quota left for the token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user: GitHubUser,
    pub rate_limit_remaining: Option<String>,
}

#[derive(Deserialize)]
struct ReadmePayload {
    content: String,
    #[serde(default)]
    encoding: Option<String>,
}

/// GitHub REST client.
#[derive(Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    api_url: String,
    raw_url: String,
    token: Option<SecretString>,
}

impl GitHubClient {
    /// Build a client from settings.
    pub fn new(settings: &GitHubSettings) -> Result<Self, GitHubError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()?;

        Ok(Self {
            http,
            api_url: settings.api_url.trim_end_matches('/').to_string(),
            raw_url: settings.raw_url.trim_end_matches('/').to_string(),
            token: settings.token.clone(),
        })
    }

    /// List repositories owned by `username` (first 100, most recently updated first).
    pub async fn list_user_repos(&self, username: &str) -> Result<Vec<Repository>, GitHubError> {
        let url = format!(
            "{}/users/{}/repos?per_page=100&sort=updated",
            self.api_url,
            urlencoding::encode(username)
        );
        self.get_json(&url).await
    }

    /// List repositories starred by `username` (first 100, most recently updated first).
    pub async fn list_starred_repos(
        &self,
        username: &str,
    ) -> Result<Vec<Repository>, GitHubError> {
        let url = format!(
            "{}/users/{}/starred?per_page=100&sort=updated&direction=desc",
            self.api_url,
            urlencoding::encode(username)
        );
        self.get_json(&url).await
    }

    /// Fetch a repository's language byte counts from its `languages_url`.
    pub async fn get_languages(
        &self,
        languages_url: &str,
    ) -> Result<BTreeMap<String, u64>, GitHubError> {
        self.get_json(languages_url).await
    }

    /// Fetch and decode a repository's README.
    ///
    /// Returns `Ok(None)` when the repository has no README (404).
    pub async fn get_readme(&self, owner: &str, repo: &str) -> Result<Option<String>, GitHubError> {
        let url = format!(
            "{}/repos/{}/{}/readme",
            self.api_url,
            urlencoding::encode(owner),
            urlencoding::encode(repo)
        );

        let response = self.get(&url).await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!("No README for {}/{}", owner, repo);
            return Ok(None);
        }

        let body = response.text().await?;
        if !status.is_success() {
            return Err(GitHubError::Http { status, body });
        }

        let payload: ReadmePayload = serde_json::from_str(&body)?;
        match payload.encoding.as_deref() {
            None | Some("base64") => decode_readme_content(&payload.content).map(Some),
            Some(_) => Ok(Some(payload.content)),
        }
    }

    /// Fetch the account the token belongs to.
    pub async fn get_authenticated_user(&self) -> Result<AuthenticatedUser, GitHubError> {
        let url = format!("{}/user", self.api_url);
        let response = self.get(&url).await?;
        let status = response.status();
        let rate_limit_remaining = response
            .headers()
            .get(RATE_LIMIT_REMAINING)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response.text().await?;
        if !status.is_success() {
            return Err(GitHubError::Http { status, body });
        }

        Ok(AuthenticatedUser {
            user: serde_json::from_str(&body)?,
            rate_limit_remaining,
        })
    }

    /// Base URL of the raw content host (no trailing slash).
    pub fn raw_url(&self) -> &str {
        &self.raw_url
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, GitHubError> {
        let token = self.token.as_ref().ok_or(GitHubError::MissingToken)?;
        debug!("GET {}", url);

        let response = self
            .http
            .get(url)
            .header(ACCEPT, GITHUB_JSON)
            .bearer_auth(token.expose_secret())
            .send()
            .await?;

        debug!(status = %response.status(), "GitHub responded for {}", url);
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, GitHubError> {
        let response = self.get(url).await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(GitHubError::Http { status, body });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

/// Decode GitHub's base64 README payload.
///
/// GitHub wraps the encoded content at 60 columns, so whitespace is stripped
/// before decoding. Invalid UTF-8 sequences are replaced rather than rejected.
pub fn decode_readme_content(content: &str) -> Result<String, GitHubError> {
    let compact: String = content.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| GitHubError::Readme(e.to_string()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
