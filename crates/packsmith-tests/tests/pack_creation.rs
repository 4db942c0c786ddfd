//! End-to-end pack creation against replayed provider responses

use anyhow::Result;
use packsmith_lib::api::{GameBananaProvider, NuGetProvider, PackageProvider, SearchOptions};
use packsmith_lib::application::{CommandSession, Commands, execute_command};
use packsmith_lib::display::Display;
use packsmith_lib::networking::{ImageCache, NetworkingConfig, NetworkingManager};
use packsmith_lib::pack::{AutoPackCreator, ModConfig, PackManifest, PassthroughConverter};
use packsmith_tests::{TestEnvironment, mount_cassette, mount_image};
use serde_json::json;
use std::io::Read;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

fn hooks_mod() -> ModConfig {
    ModConfig::new("reloaded.sharedlib.hooks", "Shared Hooks")
        .with_plugin_data("NuGet", json!({ "AllowUpdateFromAnyRepository": false }))
}

fn creator(env: &TestEnvironment, server_url: &str) -> Result<AutoPackCreator> {
    let networking = NetworkingManager::new(NetworkingConfig::default())?;
    let providers: Vec<Arc<dyn PackageProvider>> = vec![
        Arc::new(NuGetProvider::new(
            networking.clone(),
            vec![format!("{server_url}/v3/index.json")],
        )),
        Arc::new(GameBananaProvider::with_base_url(
            networking.clone(),
            server_url.to_string(),
            None,
        )),
    ];
    let cache = ImageCache::new(networking, env.cache_dir());
    Ok(AutoPackCreator::new(providers, Arc::new(PassthroughConverter), cache))
}

/// The newer GameBanana release wins: its screenshots replace the NuGet icon
#[tokio::test]
async fn creates_pack_from_newest_provider_metadata() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    mount_cassette(&mut server, "nuget/service_index.json").await?;
    mount_cassette(&mut server, "nuget/search_hooks.json").await?;
    mount_cassette(&mut server, "gamebanana/search_hooks.json").await?;
    mount_image(&mut server, "/img/ss/mods/hooks-1.jpg", b"jpeg-one").await;
    mount_image(&mut server, "/img/ss/mods/hooks-2.jpg", b"jpeg-two").await;

    let env = TestEnvironment::new()?;
    let builder = creator(&env, &server.url())?
        .create(&[hooks_mod()], &CancellationToken::new())
        .await?;

    let output = env.output_path("hooks.zip");
    let manifest = builder.write_to_path(&output)?;

    let item = &manifest.items[0];
    assert_eq!(item.name, "Shared Hooks");
    assert_eq!(item.summary.as_deref(), Some("Hooks & detours for Reloaded-II"));
    assert_eq!(item.readme, None);
    assert_eq!(item.images.len(), 2);
    assert_eq!(item.images[0].path, "items/reloaded.sharedlib.hooks/0.jpg");
    assert_eq!(item.images[0].caption.as_deref(), Some("Main menu"));
    assert_eq!(item.images[1].caption, None);
    assert_eq!(
        item.plugin_data["NuGet"]["AllowUpdateFromAnyRepository"],
        json!(false)
    );

    let mut archive = zip::ZipArchive::new(std::fs::File::open(&output)?)?;
    let mut image = Vec::new();
    archive
        .by_name("items/reloaded.sharedlib.hooks/1.jpg")?
        .read_to_end(&mut image)?;
    assert_eq!(image, b"jpeg-two");

    let read_back = PackManifest::read_from_archive(std::fs::File::open(&output)?)?;
    assert_eq!(read_back, manifest);
    Ok(())
}

/// With nothing on GameBanana the NuGet icon and description are used
#[tokio::test]
async fn falls_back_to_nuget_metadata() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    mount_cassette(&mut server, "nuget/service_index.json").await?;
    mount_cassette(&mut server, "nuget/search_hooks.json").await?;
    mount_cassette(&mut server, "gamebanana/search_empty.json").await?;
    mount_image(&mut server, "/icons/hooks.png", b"png").await;

    let env = TestEnvironment::new()?;
    let builder = creator(&env, &server.url())?
        .create(&[hooks_mod()], &CancellationToken::new())
        .await?;

    let manifest = builder.manifest()?;
    let item = &manifest.items[0];
    assert_eq!(
        item.summary.as_deref(),
        Some("Shared hooking library for Reloaded-II mods.")
    );
    let paths: Vec<&str> = item.images.iter().map(|i| i.path.as_str()).collect();
    assert_eq!(paths, vec!["items/reloaded.sharedlib.hooks/0.png"]);
    Ok(())
}

/// A second run reuses cached previews instead of downloading again
#[tokio::test]
async fn second_run_is_served_from_cache() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    mount_cassette(&mut server, "nuget/service_index.json").await?;
    mount_cassette(&mut server, "nuget/search_hooks.json").await?;
    mount_cassette(&mut server, "gamebanana/search_empty.json").await?;
    let icon = server
        .mock("GET", "/icons/hooks.png")
        .with_body("png")
        .expect(1)
        .create_async()
        .await;

    let env = TestEnvironment::new()?;
    let creator = creator(&env, &server.url())?;
    for _ in 0..2 {
        let builder = creator
            .create(&[hooks_mod()], &CancellationToken::new())
            .await?;
        assert_eq!(builder.items()[0].image_count(), 1);
    }

    icon.assert_async().await;
    Ok(())
}

/// Every version a feed lists becomes a candidate when asked for all of them
#[tokio::test]
async fn all_versions_still_merge_to_newest() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    mount_cassette(&mut server, "nuget/service_index.json").await?;
    mount_cassette(&mut server, "nuget/search_hooks.json").await?;
    mount_cassette(&mut server, "gamebanana/search_empty.json").await?;
    mount_image(&mut server, "/icons/hooks.png", b"png").await;

    let env = TestEnvironment::new()?;
    let options = SearchOptions {
        only_best_version: false,
        ..SearchOptions::default()
    };
    let builder = creator(&env, &server.url())?
        .with_options(options)
        .create(&[hooks_mod()], &CancellationToken::new())
        .await?;

    assert_eq!(builder.items()[0].image_count(), 1);
    Ok(())
}

/// Full command path: mods directory in, archive out
#[tokio::test]
async fn create_command_writes_archive() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    mount_cassette(&mut server, "nuget/service_index.json").await?;
    mount_cassette(&mut server, "nuget/search_hooks.json").await?;
    mount_cassette(&mut server, "gamebanana/search_hooks.json").await?;
    mount_image(&mut server, "/img/ss/mods/hooks-1.jpg", b"jpeg-one").await;
    mount_image(&mut server, "/img/ss/mods/hooks-2.jpg", b"jpeg-two").await;

    let env = TestEnvironment::new()?;
    env.install_mod(&hooks_mod())?;
    env.install_mod(&ModConfig::new("plain.mod", "Plain"))?;

    let (display, buffer) = Display::buffered();
    let session = CommandSession::with_display(env.app_config(&server.url()), display);
    let output = env.output_path("weekend.zip");

    execute_command(
        Some(Commands::Create {
            mods: env.mods_dir(),
            output: output.clone(),
            name: Some("Weekend".to_string()),
            force: true,
        }),
        &session,
    )
    .await?;

    let manifest = PackManifest::read_from_archive(std::fs::File::open(&output)?)?;
    assert_eq!(manifest.name, "Weekend");
    assert_eq!(manifest.items.len(), 1);
    assert_eq!(manifest.items[0].images.len(), 2);

    let printed = String::from_utf8(buffer.lock().unwrap().clone())?;
    assert!(printed.contains("plain.mod"));
    assert!(printed.contains("1 mods, 2 images"));
    Ok(())
}
