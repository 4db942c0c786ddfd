use super::*;
use crate::networking::NetworkingConfig;
use mockito::Server;
use tempfile::TempDir;

fn cache_in(dir: &TempDir) -> ImageCache {
    let networking = NetworkingManager::new(NetworkingConfig::default()).unwrap();
    ImageCache::new(networking, dir.path().join("images"))
}

#[test]
fn test_extension_from_uri() {
    assert_eq!(
        extension_from_uri("https://cdn.example.com/a/b/preview.PNG"),
        Some("png".to_string())
    );
    assert_eq!(
        extension_from_uri("https://cdn.example.com/img.webp?size=large#top"),
        Some("webp".to_string())
    );
    assert_eq!(extension_from_uri("https://cdn.example.com/noext"), None);
    assert_eq!(extension_from_uri("https://cdn.example.com/weird.tar~gz"), None);
}

#[test]
fn test_path_for_is_stable_and_distinct() {
    let dir = TempDir::new().unwrap();
    let cache = cache_in(&dir);

    let a = cache.path_for("https://example.com/a.jpg");
    assert_eq!(a, cache.path_for("https://example.com/a.jpg"));
    assert_ne!(a, cache.path_for("https://example.com/b.jpg"));
    assert_eq!(a.extension().unwrap(), "jpg");
    assert!(a.starts_with(cache.cache_dir()));
}

#[tokio::test]
async fn test_fresh_file_is_served_from_disk() {
    let dir = TempDir::new().unwrap();
    let cache = cache_in(&dir);
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/thumb.png")
        .with_status(200)
        .with_body(b"\x89PNG-data")
        .expect(1)
        .create_async()
        .await;

    let uri = format!("{}/thumb.png", server.url());
    let cancel = CancellationToken::new();

    let first = cache
        .get_or_download(&uri, MOD_PREVIEW_EXPIRATION, false, &cancel)
        .await
        .unwrap();
    let second = cache
        .get_or_download(&uri, MOD_PREVIEW_EXPIRATION, false, &cancel)
        .await
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(std::fs::read(&first).unwrap(), b"\x89PNG-data");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_force_refresh_and_expiry_redownload() {
    let dir = TempDir::new().unwrap();
    let cache = cache_in(&dir);
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/banner.jpg")
        .with_status(200)
        .with_body("jpeg")
        .expect(3)
        .create_async()
        .await;

    let uri = format!("{}/banner.jpg", server.url());
    let cancel = CancellationToken::new();

    cache
        .get_or_download(&uri, MOD_PREVIEW_EXPIRATION, false, &cancel)
        .await
        .unwrap();
    cache
        .get_or_download(&uri, MOD_PREVIEW_EXPIRATION, true, &cancel)
        .await
        .unwrap();
    cache
        .get_or_download(&uri, Duration::ZERO, false, &cancel)
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_http_error_is_not_cached() {
    let dir = TempDir::new().unwrap();
    let cache = cache_in(&dir);
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/gone.png")
        .with_status(410)
        .create_async()
        .await;

    let uri = format!("{}/gone.png", server.url());
    let result = cache
        .get_or_download(&uri, MOD_PREVIEW_EXPIRATION, false, &CancellationToken::new())
        .await;

    assert!(matches!(
        result,
        Err(CacheError::Download {
            source: NetworkingError::HttpStatus { status: 410, .. }
        })
    ));
    assert!(!cache.path_for(&uri).exists());
}

#[tokio::test]
async fn test_cancelled_before_download() {
    let dir = TempDir::new().unwrap();
    let cache = cache_in(&dir);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = cache
        .get_or_download(
            "https://example.invalid/x.png",
            MOD_PREVIEW_EXPIRATION,
            false,
            &cancel,
        )
        .await;

    assert!(matches!(result, Err(CacheError::Cancelled)));
}
