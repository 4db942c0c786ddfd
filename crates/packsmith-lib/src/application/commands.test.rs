use super::*;
use crate::pack::PackManifest;
use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;
use std::sync::Mutex;
use tempfile::TempDir;

/// Session against a mock server, with captured output
fn test_session(server: &ServerGuard, dir: &TempDir) -> (CommandSession, Arc<Mutex<Vec<u8>>>) {
    let config = AppConfig {
        cache_dir: Some(dir.path().join("cache")),
        nuget_feeds: vec![format!("{}/query", server.url())],
        gamebanana_url: server.url(),
        ..AppConfig::default()
    };
    let (display, buffer) = Display::buffered();
    (CommandSession::with_display(config, display), buffer)
}

fn output_of(buffer: &Mutex<Vec<u8>>) -> String {
    String::from_utf8(buffer.lock().unwrap().clone()).unwrap()
}

fn write_mod(mods: &Path, dir: &str, config: serde_json::Value) {
    let mod_dir = mods.join(dir);
    std::fs::create_dir_all(&mod_dir).unwrap();
    std::fs::write(mod_dir.join("ModConfig.json"), config.to_string()).unwrap();
}

fn write_hooks_mod(mods: &Path) {
    write_mod(
        mods,
        "hooks",
        json!({
            "ModId": "reloaded.sharedlib.hooks",
            "ModName": "Shared Hooks",
            "PluginData": { "NuGet": { "AllowUpdateFromAnyRepository": true } }
        }),
    );
}

fn write_plain_mod(mods: &Path) {
    write_mod(
        mods,
        "plain",
        json!({ "ModId": "plain.mod", "ModName": "Plain" }),
    );
}

async fn mock_providers(server: &mut ServerGuard) {
    let icon = format!("{}/icon.png", server.url());
    server
        .mock("GET", "/query")
        .match_query(Matcher::Any)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "totalHits": 1,
                "data": [{
                    "id": "Reloaded.SharedLib.Hooks",
                    "version": "1.9.0",
                    "description": "Function hooking for Reloaded mods",
                    "iconUrl": icon
                }]
            })
            .to_string(),
        )
        .create_async()
        .await;
    server
        .mock("GET", "/apiv11/Util/Search/Results")
        .match_query(Matcher::Any)
        .with_header("content-type", "application/json")
        .with_body(json!({ "_aRecords": [] }).to_string())
        .create_async()
        .await;
    server
        .mock("GET", "/icon.png")
        .with_body("icon-bytes")
        .create_async()
        .await;
}

mod execute_command_tests {
    use super::*;

    #[tokio::test]
    async fn it_prints_usage_hint_without_command() {
        let server = Server::new_async().await;
        let dir = TempDir::new().unwrap();
        let (session, buffer) = test_session(&server, &dir);

        execute_command(None, &session).await.unwrap();

        assert!(output_of(&buffer).contains("packsmith --help"));
    }

    #[tokio::test]
    async fn it_displays_version_information() {
        let server = Server::new_async().await;
        let dir = TempDir::new().unwrap();
        let (session, buffer) = test_session(&server, &dir);

        execute_command(Some(Commands::Version), &session)
            .await
            .unwrap();

        let output = output_of(&buffer);
        assert!(output.contains(&format!("packsmith {}", env!("CARGO_PKG_VERSION"))));
        assert!(output.contains("Target"));
    }
}

mod handle_validate_tests {
    use super::*;

    #[tokio::test]
    async fn it_accepts_mods_with_resolvers() {
        let server = Server::new_async().await;
        let dir = TempDir::new().unwrap();
        let mods = dir.path().join("Mods");
        write_hooks_mod(&mods);
        let (session, buffer) = test_session(&server, &dir);

        handle_validate(&session, &mods).unwrap();

        assert!(output_of(&buffer).contains("1 mods: ready to pack"));
    }

    #[tokio::test]
    async fn it_lists_incompatible_mods() {
        let server = Server::new_async().await;
        let dir = TempDir::new().unwrap();
        let mods = dir.path().join("Mods");
        write_hooks_mod(&mods);
        write_plain_mod(&mods);
        let (session, buffer) = test_session(&server, &dir);

        let err = handle_validate(&session, &mods).unwrap_err();

        assert!(err.to_string().contains("1 of 2 mods cannot be packed"));
        assert!(output_of(&buffer).contains("✗ plain.mod"));
    }

    #[tokio::test]
    async fn it_rejects_empty_mod_directory() {
        let server = Server::new_async().await;
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("Mods")).unwrap();
        let (session, _buffer) = test_session(&server, &dir);

        let err = handle_validate(&session, &dir.path().join("Mods")).unwrap_err();
        assert!(err.to_string().contains("No mods found"));
    }
}

mod handle_create_tests {
    use super::*;

    #[tokio::test]
    async fn it_writes_a_pack_archive() {
        let mut server = Server::new_async().await;
        mock_providers(&mut server).await;
        let dir = TempDir::new().unwrap();
        let mods = dir.path().join("Mods");
        write_hooks_mod(&mods);
        let output = dir.path().join("out").join("pack.zip");
        let (session, buffer) = test_session(&server, &dir);

        handle_create(&session, &mods, &output, Some("Weekend"), false)
            .await
            .unwrap();

        let manifest =
            PackManifest::read_from_archive(std::fs::File::open(&output).unwrap()).unwrap();
        assert_eq!(manifest.name, "Weekend");
        assert_eq!(manifest.items.len(), 1);

        let item = &manifest.items[0];
        assert_eq!(item.summary.as_deref(), Some("Function hooking for Reloaded mods"));
        assert_eq!(item.images.len(), 1);
        assert_eq!(item.images[0].path, "items/reloaded.sharedlib.hooks/0.png");

        assert!(output_of(&buffer).contains("1 mods, 1 images"));
    }

    #[tokio::test]
    async fn it_refuses_incompatible_mods_without_force() {
        let server = Server::new_async().await;
        let dir = TempDir::new().unwrap();
        let mods = dir.path().join("Mods");
        write_hooks_mod(&mods);
        write_plain_mod(&mods);
        let output = dir.path().join("pack.zip");
        let (session, _buffer) = test_session(&server, &dir);

        let err = handle_create(&session, &mods, &output, None, false)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("--force"));
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn it_leaves_out_incompatible_mods_with_force() {
        let mut server = Server::new_async().await;
        mock_providers(&mut server).await;
        let dir = TempDir::new().unwrap();
        let mods = dir.path().join("Mods");
        write_hooks_mod(&mods);
        write_plain_mod(&mods);
        let output = dir.path().join("pack.zip");
        let (session, buffer) = test_session(&server, &dir);

        handle_create(&session, &mods, &output, None, true)
            .await
            .unwrap();

        let manifest =
            PackManifest::read_from_archive(std::fs::File::open(&output).unwrap()).unwrap();
        let ids: Vec<&str> = manifest.items.iter().map(|i| i.mod_id.as_str()).collect();
        assert_eq!(ids, vec!["reloaded.sharedlib.hooks"]);
        assert_eq!(manifest.name, crate::pack::creator::DEFAULT_PACK_NAME);
        assert!(output_of(&buffer).contains("Leaving out 1 incompatible mods"));
    }

    #[tokio::test]
    async fn it_stops_when_cancelled() {
        let server = Server::new_async().await;
        let dir = TempDir::new().unwrap();
        let mods = dir.path().join("Mods");
        write_hooks_mod(&mods);
        let output = dir.path().join("pack.zip");
        let (session, _buffer) = test_session(&server, &dir);
        session.cancellation().cancel();

        let err = handle_create(&session, &mods, &output, None, false)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Pack creation stopped"));
        assert!(!output.exists());
    }
}

mod handle_inspect_tests {
    use super::*;

    #[tokio::test]
    async fn it_prints_the_aggregated_result_as_json() {
        let mut server = Server::new_async().await;
        mock_providers(&mut server).await;
        let dir = TempDir::new().unwrap();
        let (session, buffer) = test_session(&server, &dir);

        handle_inspect(&session, "reloaded.sharedlib.hooks", None)
            .await
            .unwrap();

        let printed: serde_json::Value = serde_json::from_str(&output_of(&buffer)).unwrap();
        assert_eq!(printed["summary"], "Function hooking for Reloaded mods");
        assert_eq!(
            printed["images"][0]["uri"],
            format!("{}/icon.png", server.url())
        );
    }
}
