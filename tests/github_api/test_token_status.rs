//! Token status endpoint tests.

use super::mock_github::MockGitHub;
use super::test_helpers::*;

#[actix_rt::test]
async fn test_valid_token_reports_user_and_rate_limit() {
    let mock = MockGitHub::start().await;
    let app = create_test_app(&mock, TokenSetup::Valid, false).await;

    let (status, cache_control, body) = get_json(&app, "/api/github/token-status").await;

    assert_eq!(status, 200);
    assert!(cache_control.is_none(), "token status must not be edge cached");
    assert_eq!(body["status"], "valid");
    assert_eq!(body["username"], "owner");
    assert_eq!(body["rate_limit"], "4999");
    assert!(body["message"].is_string());
}

#[actix_rt::test]
async fn test_missing_rate_limit_header_is_unknown() {
    let mock = MockGitHub::start().await;
    mock.set_rate_limit(None);
    let app = create_test_app(&mock, TokenSetup::Valid, false).await;

    let (status, _, body) = get_json(&app, "/api/github/token-status").await;

    assert_eq!(status, 200);
    assert_eq!(body["rate_limit"], "unknown");
}

#[actix_rt::test]
async fn test_rejected_token_mirrors_github_status() {
    let mock = MockGitHub::start().await;
    let app = create_test_app(&mock, TokenSetup::Wrong, false).await;

    let (status, _, body) = get_json(&app, "/api/github/token-status").await;

    assert_eq!(status, 401);
    assert_eq!(body["status"], "invalid");
    assert_eq!(body["error"], "Bad credentials");
    assert_eq!(body["documentation_url"], "https://docs.github.com/rest");
    assert!(body["message"].as_str().unwrap().contains("401"));
}

#[actix_rt::test]
async fn test_missing_token_is_error() {
    let mock = MockGitHub::start().await;
    let app = create_test_app(&mock, TokenSetup::Missing, false).await;

    let (status, _, body) = get_json(&app, "/api/github/token-status").await;

    assert_eq!(status, 500);
    assert_eq!(body["status"], "error");
    assert!(body["error"].as_str().unwrap().contains("GITHUB_TOKEN"));
    assert_eq!(mock.request_count(), 0);
}
