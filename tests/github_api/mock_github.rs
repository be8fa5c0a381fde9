//! Mock GitHub REST API for integration tests.
//!
//! Starts an in-process HTTP server serving the handful of endpoints the
//! portfolio client calls. Fixtures are mutable through shared state and every
//! request is counted so tests can observe caching.

use actix_web::{App, HttpRequest, HttpResponse, HttpServer, get, web};
use base64::{Engine, engine::general_purpose::STANDARD};
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::net::TcpListener;
use std::sync::{Arc, Mutex};

/// Token the mock accepts.
pub const MOCK_TOKEN: &str = "ghp_mock_token_for_tests";

/// Username that does not exist on the mock.
pub const UNKNOWN_USER: &str = "ghost-user";

/// A repository fixture.
#[derive(Debug, Clone)]
pub struct MockRepo {
    pub id: u64,
    pub owner: String,
    pub name: String,
    pub description: Option<String>,
    pub stars: u64,
    pub updated_at: String,
    pub default_branch: String,
    /// `None` makes the languages endpoint fail with 500
    pub languages: Option<BTreeMap<String, u64>>,
    /// `None` makes the readme endpoint answer 404
    pub readme: Option<String>,
    /// Overrides `readme` with a broken response
    pub readme_failure: Option<ReadmeFailure>,
}

/// Ways the readme endpoint can misbehave.
#[derive(Debug, Clone, Copy)]
pub enum ReadmeFailure {
    /// 500 Server Error
    ServerError,
    /// 200 with a payload that is not base64
    InvalidBase64,
}

impl MockRepo {
    pub fn new(id: u64, owner: &str, name: &str) -> Self {
        Self {
            id,
            owner: owner.to_string(),
            name: name.to_string(),
            description: Some(format!("{} description", name)),
            stars: 0,
            updated_at: "2024-01-01T00:00:00Z".to_string(),
            default_branch: "main".to_string(),
            languages: Some(BTreeMap::new()),
            readme: None,
            readme_failure: None,
        }
    }

    pub fn stars(mut self, stars: u64) -> Self {
        self.stars = stars;
        self
    }

    pub fn updated_at(mut self, updated_at: &str) -> Self {
        self.updated_at = updated_at.to_string();
        self
    }

    pub fn branch(mut self, branch: &str) -> Self {
        self.default_branch = branch.to_string();
        self
    }

    pub fn languages(mut self, pairs: &[(&str, u64)]) -> Self {
        self.languages = Some(pairs.iter().map(|(n, b)| (n.to_string(), *b)).collect());
        self
    }

    pub fn failing_languages(mut self) -> Self {
        self.languages = None;
        self
    }

    pub fn readme(mut self, readme: &str) -> Self {
        self.readme = Some(readme.to_string());
        self
    }

    pub fn failing_readme(mut self) -> Self {
        self.readme_failure = Some(ReadmeFailure::ServerError);
        self
    }

    pub fn garbled_readme(mut self) -> Self {
        self.readme_failure = Some(ReadmeFailure::InvalidBase64);
        self
    }

    fn to_json(&self, base_url: &str) -> Value {
        json!({
            "id": self.id,
            "name": self.name,
            "full_name": format!("{}/{}", self.owner, self.name),
            "description": self.description,
            "html_url": format!("https://github.com/{}/{}", self.owner, self.name),
            "languages_url": format!("{}/repos/{}/{}/languages", base_url, self.owner, self.name),
            "owner": { "login": self.owner, "avatar_url": "https://avatars.example.com/u/1" },
            "stargazers_count": self.stars,
            "forks_count": 1,
            "updated_at": self.updated_at,
            "default_branch": self.default_branch,
            "topics": ["portfolio"],
        })
    }
}

/// Shared state for the mock GitHub server.
#[derive(Default)]
pub struct MockGitHubState {
    pub base_url: String,
    pub owned: Vec<MockRepo>,
    pub starred: Vec<MockRepo>,
    pub rate_limit_remaining: Option<String>,
    pub requests: usize,
}

type SharedState = web::Data<Arc<Mutex<MockGitHubState>>>;

fn is_authorized(req: &HttpRequest) -> bool {
    req.headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {}", MOCK_TOKEN))
}

fn bad_credentials() -> HttpResponse {
    HttpResponse::Unauthorized().json(json!({
        "message": "Bad credentials",
        "documentation_url": "https://docs.github.com/rest",
    }))
}

fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(json!({
        "message": "Not Found",
        "documentation_url": "https://docs.github.com/rest",
    }))
}

/// Record the request and check credentials.
fn admit(req: &HttpRequest, state: &SharedState) -> Result<(), HttpResponse> {
    state.lock().unwrap().requests += 1;
    if is_authorized(req) {
        Ok(())
    } else {
        Err(bad_credentials())
    }
}

fn list(state: &MockGitHubState, repos: &[MockRepo]) -> HttpResponse {
    let body: Vec<Value> = repos.iter().map(|r| r.to_json(&state.base_url)).collect();
    HttpResponse::Ok().json(body)
}

fn find_repo<'a>(state: &'a MockGitHubState, owner: &str, name: &str) -> Option<&'a MockRepo> {
    state
        .owned
        .iter()
        .chain(state.starred.iter())
        .find(|r| r.owner == owner && r.name == name)
}

#[get("/users/{user}/repos")]
async fn user_repos(req: HttpRequest, path: web::Path<String>, state: SharedState) -> HttpResponse {
    if let Err(resp) = admit(&req, &state) {
        return resp;
    }
    if path.as_str() == UNKNOWN_USER {
        return not_found();
    }
    let state = state.lock().unwrap();
    list(&state, &state.owned)
}

#[get("/users/{user}/starred")]
async fn user_starred(req: HttpRequest, path: web::Path<String>, state: SharedState) -> HttpResponse {
    if let Err(resp) = admit(&req, &state) {
        return resp;
    }
    if path.as_str() == UNKNOWN_USER {
        return not_found();
    }
    let state = state.lock().unwrap();
    list(&state, &state.starred)
}

#[get("/repos/{owner}/{repo}/languages")]
async fn repo_languages(
    req: HttpRequest,
    path: web::Path<(String, String)>,
    state: SharedState,
) -> HttpResponse {
    if let Err(resp) = admit(&req, &state) {
        return resp;
    }
    let (owner, name) = path.into_inner();
    let state = state.lock().unwrap();
    match find_repo(&state, &owner, &name) {
        None => not_found(),
        Some(repo) => match &repo.languages {
            Some(languages) => HttpResponse::Ok().json(languages),
            None => HttpResponse::InternalServerError().json(json!({ "message": "Server Error" })),
        },
    }
}

#[get("/repos/{owner}/{repo}/readme")]
async fn repo_readme(
    req: HttpRequest,
    path: web::Path<(String, String)>,
    state: SharedState,
) -> HttpResponse {
    if let Err(resp) = admit(&req, &state) {
        return resp;
    }
    let (owner, name) = path.into_inner();
    let state = state.lock().unwrap();
    let Some(repo) = find_repo(&state, &owner, &name) else {
        return not_found();
    };
    match repo.readme_failure {
        Some(ReadmeFailure::ServerError) => {
            return HttpResponse::InternalServerError().json(json!({ "message": "Server Error" }));
        }
        Some(ReadmeFailure::InvalidBase64) => {
            return HttpResponse::Ok().json(json!({
                "name": "README.md",
                "path": "README.md",
                "encoding": "base64",
                "content": "***not base64***",
            }));
        }
        None => {}
    }
    let Some(readme) = repo.readme.as_ref() else {
        return not_found();
    };

    // GitHub wraps base64 content at 60 columns
    let encoded = STANDARD.encode(readme);
    let wrapped = encoded
        .as_bytes()
        .chunks(60)
        .map(|c| String::from_utf8_lossy(c).into_owned())
        .collect::<Vec<_>>()
        .join("\n");

    HttpResponse::Ok().json(json!({
        "name": "README.md",
        "path": "README.md",
        "encoding": "base64",
        "content": wrapped,
    }))
}

#[get("/user")]
async fn authenticated_user(req: HttpRequest, state: SharedState) -> HttpResponse {
    if let Err(resp) = admit(&req, &state) {
        return resp;
    }
    let state = state.lock().unwrap();
    let mut resp = HttpResponse::Ok();
    if let Some(remaining) = &state.rate_limit_remaining {
        resp.insert_header(("x-ratelimit-remaining", remaining.as_str()));
    }
    resp.json(json!({ "login": "owner", "id": 1, "name": "Portfolio Owner" }))
}

/// Mock GitHub API server.
pub struct MockGitHub {
    pub base_url: String,
    pub state: Arc<Mutex<MockGitHubState>>,
}

impl MockGitHub {
    /// Start the mock on an ephemeral port.
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("failed to bind");
        let port = listener.local_addr().unwrap().port();
        let base_url = format!("http://127.0.0.1:{}", port);

        let state = Arc::new(Mutex::new(MockGitHubState {
            base_url: base_url.clone(),
            rate_limit_remaining: Some("4999".to_string()),
            ..Default::default()
        }));

        let state_data = state.clone();
        let server = HttpServer::new(move || {
            App::new()
                .app_data(web::Data::new(state_data.clone()))
                .service(user_repos)
                .service(user_starred)
                .service(repo_languages)
                .service(repo_readme)
                .service(authenticated_user)
        })
        .workers(1)
        .listen(listener)
        .expect("failed to listen")
        .disable_signals()
        .run();

        // Server lives for the rest of the test process
        tokio::spawn(server);

        MockGitHub { base_url, state }
    }

    pub fn set_owned(&self, repos: Vec<MockRepo>) {
        self.state.lock().unwrap().owned = repos;
    }

    pub fn set_starred(&self, repos: Vec<MockRepo>) {
        self.state.lock().unwrap().starred = repos;
    }

    pub fn set_rate_limit(&self, remaining: Option<&str>) {
        self.state.lock().unwrap().rate_limit_remaining = remaining.map(str::to_string);
    }

    /// Number of requests the mock has served.
    pub fn request_count(&self) -> usize {
        self.state.lock().unwrap().requests
    }
}
