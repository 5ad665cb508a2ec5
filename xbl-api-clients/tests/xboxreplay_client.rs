//! Integration tests for the XboxReplay client
//!
//! Run with: cargo test --test xboxreplay_client

use serde_json::json;
use wiremock::matchers::{header, method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use xbl_api_clients::xboxreplay::{Culture, ReplayMediaOptions, XboxReplayClient};
use xbl_api_clients::{ErrorKind, XblError};

#[tokio::test]
async fn test_screenshots_by_gamertag() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/players/Major%20Nelson/screenshots$"))
        .and(header("xr-client-token", "client-token"))
        .and(header("user-agent", "xboxreplay/xboxlive-api"))
        .and(query_param("limit", "5"))
        .and(query_param("culture", "en_US"))
        .and(query_param("title_ids", "219630713,1144039928"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "id": "s1" }],
            "additional": { "total": 1 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = XboxReplayClient::new("client-token").with_base_url(server.uri());
    let options = ReplayMediaOptions {
        limit: Some(5),
        offset: None,
        title_ids: vec!["219630713".to_string(), "1144039928".to_string()],
        culture: Some(Culture::EnUs),
    };
    let body = client
        .get_player_screenshots("Major Nelson", &options)
        .await
        .unwrap();
    assert_eq!(body["data"][0]["id"], "s1");
}

#[tokio::test]
async fn test_game_clips_by_xuid() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/players/2584878536129841/clips"))
        .and(query_param("offset", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let client = XboxReplayClient::new("client-token").with_base_url(format!("{}/", server.uri()));
    let options = ReplayMediaOptions {
        offset: Some(20),
        ..Default::default()
    };
    let body = client
        .get_player_game_clips("xuid(2584878536129841)", &options)
        .await
        .unwrap();
    assert_eq!(body, json!({ "data": [] }));
}

#[tokio::test]
async fn test_errors_are_classified() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/players/Unknown/clips"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/players/Busy/clips"))
        .respond_with(ResponseTemplate::new(429))
        .expect(1)
        .mount(&server)
        .await;

    let client = XboxReplayClient::new("client-token").with_base_url(server.uri());
    let options = ReplayMediaOptions::default();

    let err = client.get_player_game_clips("Unknown", &options).await.unwrap_err();
    assert!(matches!(err, XblError::NotFound { .. }));

    let err = client.get_player_game_clips("Busy", &options).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TooManyRequests);
    assert_eq!(err.status_code(), 429);
}
