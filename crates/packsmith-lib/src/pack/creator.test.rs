use super::*;
use crate::api::{PackageCandidate, PackageVersion, StaticPackageProvider};
use crate::networking::{NetworkingConfig, NetworkingManager};
use crate::pack::image::PassthroughConverter;
use mockito::Server;
use serde_json::json;
use tempfile::TempDir;

fn creator_with(provider: StaticPackageProvider, dir: &TempDir) -> AutoPackCreator {
    let networking = NetworkingManager::new(NetworkingConfig::default()).unwrap();
    let cache = ImageCache::new(networking, dir.path().join("cache"));
    AutoPackCreator::new(vec![Arc::new(provider)], Arc::new(PassthroughConverter), cache)
}

fn hooks_config() -> ModConfig {
    ModConfig::new("reloaded.sharedlib.hooks", "Shared Hooks")
        .with_plugin_data("NuGet", json!({ "AllowUpdateFromAnyRepository": true }))
}

#[test]
fn test_can_create_requires_resolver() {
    assert!(can_create(&hooks_config()));
    assert!(!can_create(&ModConfig::new("plain", "Plain")));
}

#[test]
fn test_validate_can_create_lists_incompatible() {
    let configs = vec![
        hooks_config(),
        ModConfig::new("plain.one", "Plain One"),
        ModConfig::new("plain.two", "Plain Two"),
    ];

    let incompatible = validate_can_create(&configs).unwrap_err();
    let ids: Vec<&str> = incompatible.iter().map(|c| c.mod_id.as_str()).collect();
    assert_eq!(ids, vec!["plain.one", "plain.two"]);

    assert!(validate_can_create(&configs[..1]).is_ok());
    assert!(validate_can_create(&[]).is_ok());
}

#[tokio::test]
async fn test_create_downloads_images_and_sets_metadata() {
    let mut server = Server::new_async().await;
    let cover = server
        .mock("GET", "/cover.JPG")
        .with_body("cover-bytes")
        .expect(1)
        .create_async()
        .await;
    let shot = server
        .mock("GET", "/shot")
        .with_body("shot-bytes")
        .expect(1)
        .create_async()
        .await;

    let provider = StaticPackageProvider::new("static").with_candidates(
        "reloaded.sharedlib.hooks",
        vec![PackageCandidate {
            version: Some(PackageVersion::new(1, 2, 0)),
            images: Some(vec![
                DownloadableImage::new(format!("{}/cover.JPG", server.url())).with_caption("Cover"),
                DownloadableImage::new(format!("{}/shot", server.url())),
            ]),
            markdown_readme: Some("# Hooks".into()),
            description: Some("Function hooking".into()),
        }],
    );

    let dir = TempDir::new().unwrap();
    let creator = creator_with(provider, &dir);
    let builder = creator
        .create(&[hooks_config()], &CancellationToken::new())
        .await
        .unwrap();

    cover.assert_async().await;
    shot.assert_async().await;

    let manifest = builder.manifest().unwrap();
    assert_eq!(manifest.name, DEFAULT_PACK_NAME);
    assert_eq!(manifest.readme, DEFAULT_PACK_README);

    let item = &manifest.items[0];
    assert_eq!(item.mod_id, "reloaded.sharedlib.hooks");
    assert_eq!(item.name, "Shared Hooks");
    assert_eq!(item.readme.as_deref(), Some("# Hooks"));
    assert_eq!(item.summary.as_deref(), Some("Function hooking"));
    assert!(item.plugin_data.contains_key("NuGet"));

    let paths: Vec<&str> = item.images.iter().map(|i| i.path.as_str()).collect();
    assert_eq!(
        paths,
        vec![
            "items/reloaded.sharedlib.hooks/0.jpg",
            "items/reloaded.sharedlib.hooks/1.png"
        ]
    );
    assert_eq!(item.images[0].caption.as_deref(), Some("Cover"));
    assert_eq!(item.images[1].caption, None);
}

#[tokio::test]
async fn test_failed_image_is_skipped() {
    let mut server = Server::new_async().await;
    let _missing = server
        .mock("GET", "/missing.png")
        .with_status(404)
        .create_async()
        .await;
    let _ok = server
        .mock("GET", "/ok.png")
        .with_body("ok")
        .create_async()
        .await;

    let provider = StaticPackageProvider::new("static").with_candidates(
        "reloaded.sharedlib.hooks",
        vec![PackageCandidate {
            images: Some(vec![
                DownloadableImage::new(format!("{}/missing.png", server.url())),
                DownloadableImage::new(format!("{}/ok.png", server.url())),
            ]),
            ..Default::default()
        }],
    );

    let dir = TempDir::new().unwrap();
    let creator = creator_with(provider, &dir);
    let builder = creator
        .create(&[hooks_config()], &CancellationToken::new())
        .await
        .unwrap();

    let item = &builder.manifest().unwrap().items[0];
    assert_eq!(item.images.len(), 1);
    assert_eq!(item.images[0].path, "items/reloaded.sharedlib.hooks/0.png");
}

#[tokio::test]
async fn test_unknown_mod_still_gets_an_item() {
    let dir = TempDir::new().unwrap();
    let creator = creator_with(StaticPackageProvider::new("static"), &dir);

    let mut builder = PackBuilder::new();
    creator
        .create_mod(&mut builder, &hooks_config(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(builder.items().len(), 1);
    assert_eq!(builder.items()[0].image_count(), 0);
}

#[tokio::test]
async fn test_empty_readme_is_not_set() {
    let provider = StaticPackageProvider::new("static").with_candidates(
        "reloaded.sharedlib.hooks",
        vec![PackageCandidate {
            version: Some(PackageVersion::new(2, 0, 0)),
            markdown_readme: Some(String::new()),
            description: Some("Summary only".into()),
            ..Default::default()
        }],
    );

    let dir = TempDir::new().unwrap();
    let creator = creator_with(provider, &dir);
    let builder = creator
        .create(&[hooks_config()], &CancellationToken::new())
        .await
        .unwrap();

    let item = &builder.manifest().unwrap().items[0];
    assert_eq!(item.readme, None);
    assert_eq!(item.summary.as_deref(), Some("Summary only"));
}

#[tokio::test]
async fn test_cancelled_creation() {
    let dir = TempDir::new().unwrap();
    let creator = creator_with(StaticPackageProvider::new("static"), &dir);

    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = creator.create(&[hooks_config()], &cancel).await;
    assert!(matches!(result, Err(CreateError::Cancelled)));
}
