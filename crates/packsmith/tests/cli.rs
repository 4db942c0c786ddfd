//! CLI integration tests against the real packsmith binary

use assert_cmd::Command;
use mockito::{Matcher, Server};
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

#[allow(deprecated)]
fn packsmith_cmd(workdir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("packsmith").unwrap();
    cmd.current_dir(workdir.path())
        .env("PACKSMITH_CACHE_DIR", workdir.path().join("cache"))
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

fn write_mod(mods: &Path, dir: &str, json: &str) {
    fs::create_dir_all(mods.join(dir)).unwrap();
    fs::write(mods.join(dir).join("ModConfig.json"), json).unwrap();
}

#[test]
fn test_help_output() {
    let dir = TempDir::new().unwrap();
    packsmith_cmd(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("create"))
        .stdout(predicate::str::contains("validate"))
        .stdout(predicate::str::contains("inspect"));
}

#[test]
fn test_version_output() {
    let dir = TempDir::new().unwrap();
    packsmith_cmd(&dir)
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("packsmith"));
}

#[test]
fn test_validate_reports_incompatible_mods() {
    let dir = TempDir::new().unwrap();
    let mods = dir.path().join("Mods");
    write_mod(
        &mods,
        "hooks",
        r#"{"ModId": "reloaded.sharedlib.hooks", "ModName": "Hooks", "PluginData": {"NuGet": {}}}"#,
    );
    write_mod(&mods, "plain", r#"{"ModId": "plain.mod", "ModName": "Plain"}"#);

    packsmith_cmd(&dir)
        .args(["validate", "--mods"])
        .arg(&mods)
        .assert()
        .failure()
        .stdout(predicate::str::contains("plain.mod"))
        .stderr(predicate::str::contains("1 of 2 mods cannot be packed"));
}

#[test]
fn test_validate_succeeds_for_packable_mods() {
    let dir = TempDir::new().unwrap();
    let mods = dir.path().join("Mods");
    write_mod(
        &mods,
        "hooks",
        r#"{"ModId": "reloaded.sharedlib.hooks", "ModName": "Hooks", "PluginData": {"GameBanana": {"ItemId": 1}}}"#,
    );

    packsmith_cmd(&dir)
        .args(["validate", "--mods"])
        .arg(&mods)
        .assert()
        .success()
        .stdout(predicate::str::contains("ready to pack"));
}

#[test]
fn test_create_without_force_leaves_no_archive() {
    let dir = TempDir::new().unwrap();
    let mods = dir.path().join("Mods");
    write_mod(&mods, "plain", r#"{"ModId": "plain.mod", "ModName": "Plain"}"#);
    let output = dir.path().join("pack.zip");

    packsmith_cmd(&dir)
        .args(["create", "--mods"])
        .arg(&mods)
        .arg("--output")
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    assert!(!output.exists());
}

#[test]
fn test_inspect_prints_json() {
    let mut server = Server::new();
    let _nuget = server
        .mock("GET", "/query")
        .match_query(Matcher::Any)
        .with_body(
            r#"{"totalHits": 1, "data": [{"id": "reloaded.sharedlib.hooks", "version": "1.0.0", "description": "Hooks"}]}"#,
        )
        .create();
    let _gamebanana = server
        .mock("GET", "/apiv11/Util/Search/Results")
        .match_query(Matcher::Any)
        .with_body(r#"{"_aRecords": []}"#)
        .create();

    let dir = TempDir::new().unwrap();
    packsmith_cmd(&dir)
        .env("PACKSMITH_NUGET_FEEDS", format!("{}/query", server.url()))
        .env("PACKSMITH_GAMEBANANA_URL", server.url())
        .args(["inspect", "reloaded.sharedlib.hooks"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""summary": "Hooks""#));
}
