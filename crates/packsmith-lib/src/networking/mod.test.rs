use super::*;
use mockito::Server;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Echo {
    value: u32,
}

fn manager() -> NetworkingManager {
    NetworkingManager::new(NetworkingConfig::default()).unwrap()
}

#[test]
fn test_default_config() {
    let config = NetworkingConfig::default();
    assert_eq!(config.timeout_seconds, 30);
    assert!(config.user_agent.starts_with("packsmith/"));
    assert!(!config.trace_requests);
}

#[tokio::test]
async fn test_get_json_success() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/echo")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"value": 7}"#)
        .create_async()
        .await;

    let echo: Echo = manager()
        .get_json(&format!("{}/echo", server.url()), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(echo.value, 7);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_get_bytes_http_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/missing")
        .with_status(404)
        .create_async()
        .await;

    let result = manager()
        .get_bytes(&format!("{}/missing", server.url()), &CancellationToken::new())
        .await;

    assert!(matches!(
        result,
        Err(NetworkingError::HttpStatus { status: 404, .. })
    ));
}

#[tokio::test]
async fn test_get_json_invalid_body() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/garbage")
        .with_status(200)
        .with_body("not json")
        .create_async()
        .await;

    let result: Result<Echo, _> = manager()
        .get_json(&format!("{}/garbage", server.url()), &CancellationToken::new())
        .await;

    assert!(matches!(result, Err(NetworkingError::JsonError { .. })));
}

#[tokio::test]
async fn test_cancelled_token_short_circuits() {
    let cancel = CancellationToken::new();
    cancel.cancel();

    // Nothing listens on this port; the biased select must win first
    let result = manager()
        .get_bytes("http://127.0.0.1:9/never", &cancel)
        .await;

    assert!(matches!(result, Err(NetworkingError::Cancelled { .. })));
}
