//! Starred repositories endpoint tests.

use super::mock_github::{MockGitHub, MockRepo};
use super::test_helpers::*;

#[actix_rt::test]
async fn test_starred_passes_payload_through_with_readme() {
    let mock = MockGitHub::start().await;
    mock.set_starred(vec![
        MockRepo::new(10, "alice", "tool").readme("# Tool\n\nUseful tool."),
        MockRepo::new(11, "bob", "lib"),
    ]);
    let app = create_test_app(&mock, TokenSetup::Valid, false).await;

    let (status, cache_control, body) = get_json(&app, "/api/github/starred").await;

    assert_eq!(status, 200);
    assert!(cache_control.is_some());
    let repos = body.as_array().unwrap();
    assert_eq!(repos.len(), 2);

    let tool = repos.iter().find(|r| r["name"] == "tool").unwrap();
    assert_eq!(tool["full_name"], "alice/tool");
    assert_eq!(tool["topics"][0], "portfolio");
    assert_eq!(tool["readme_content"], "# Tool\n\nUseful tool.");

    let lib = repos.iter().find(|r| r["name"] == "lib").unwrap();
    assert!(lib["readme_content"].is_null());
}

#[actix_rt::test]
async fn test_readme_failures_keep_the_repository() {
    let mock = MockGitHub::start().await;
    mock.set_starred(vec![
        MockRepo::new(1, "alice", "ok").readme("# Fine"),
        MockRepo::new(2, "bob", "broken").failing_readme(),
        MockRepo::new(3, "carol", "garbled").garbled_readme(),
    ]);
    let app = create_test_app(&mock, TokenSetup::Valid, false).await;

    let (status, _, body) = get_json(&app, "/api/github/starred").await;

    assert_eq!(status, 200);
    let repos = body.as_array().unwrap();
    assert_eq!(repos.len(), 3);

    let ok = repos.iter().find(|r| r["name"] == "ok").unwrap();
    assert_eq!(ok["readme_content"], "# Fine");
    for name in ["broken", "garbled"] {
        let repo = repos.iter().find(|r| r["name"] == name).unwrap();
        assert!(repo["readme_content"].is_null(), "{} should have no readme", name);
    }
}

#[actix_rt::test]
async fn test_starred_ordering() {
    let mock = MockGitHub::start().await;
    mock.set_starred(vec![
        MockRepo::new(1, "a", "old").updated_at("2023-01-01T00:00:00Z").stars(500),
        MockRepo::new(2, "a", "new-few").updated_at("2024-06-01T00:00:00Z").stars(1),
        MockRepo::new(3, "a", "new-many").updated_at("2024-06-01T00:00:00Z").stars(9),
        MockRepo::new(4, "a", "new-many-later-id")
            .updated_at("2024-06-01T00:00:00Z")
            .stars(9),
    ]);
    let app = create_test_app(&mock, TokenSetup::Valid, false).await;

    let (status, _, body) = get_json(&app, "/api/github/starred").await;

    assert_eq!(status, 200);
    let ids: Vec<u64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![4, 3, 2, 1]);
}

#[actix_rt::test]
async fn test_wrong_token_is_server_error() {
    let mock = MockGitHub::start().await;
    let app = create_test_app(&mock, TokenSetup::Wrong, false).await;

    let (status, cache_control, body) = get_json(&app, "/api/github/starred").await;

    assert_eq!(status, 500);
    assert!(cache_control.is_none());
    assert!(body["error"].as_str().unwrap().contains("401"));
}
