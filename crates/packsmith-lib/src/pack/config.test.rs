use super::*;
use serde_json::json;
use tempfile::TempDir;

fn write_mod(root: &Path, dir: &str, contents: &str) {
    let mod_dir = root.join(dir);
    std::fs::create_dir_all(&mod_dir).unwrap();
    std::fs::write(mod_dir.join(MOD_CONFIG_FILE), contents).unwrap();
}

#[test]
fn test_parse_pascal_case_config() {
    let config: ModConfig = serde_json::from_value(json!({
        "ModId": "sonicheroes.essentials",
        "ModName": "Essentials",
        "ModAuthor": "Sewer",
        "ModVersion": "1.2.0",
        "SupportedAppId": ["tsonic_win.exe"],
        "PluginData": {
            "GitHubRelease": { "UserName": "someone", "RepositoryName": "essentials" }
        }
    }))
    .unwrap();

    assert_eq!(config.mod_id, "sonicheroes.essentials");
    assert_eq!(config.mod_author.as_deref(), Some("Sewer"));
    assert_eq!(config.identity(), ModIdentity::new("sonicheroes.essentials", "Essentials"));
    assert_eq!(config.configured_resolvers(), vec!["GitHubRelease"]);
}

#[test]
fn test_resolver_detection_requires_object() {
    let none = ModConfig::new("a", "A");
    assert!(!none.has_any_configured_resolver());

    let scalar = ModConfig::new("a", "A").with_plugin_data("NuGet", json!(true));
    assert!(!scalar.has_any_configured_resolver());

    let unrelated = ModConfig::new("a", "A").with_plugin_data("Other", json!({}));
    assert!(!unrelated.has_any_configured_resolver());

    let both = ModConfig::new("a", "A")
        .with_plugin_data("GameBanana", json!({ "ItemId": 1 }))
        .with_plugin_data("NuGet", json!({ "AllowUpdateFromAnyRepository": false }));
    assert_eq!(both.configured_resolvers(), vec!["GameBanana", "NuGet"]);
}

#[test]
fn test_load_rejects_blank_id() {
    let dir = TempDir::new().unwrap();
    write_mod(dir.path(), "blank", r#"{"ModId": " ", "ModName": "Blank"}"#);

    let err = ModConfig::load(&dir.path().join("blank").join(MOD_CONFIG_FILE)).unwrap_err();
    assert!(matches!(err, ModConfigError::MissingField { field: "ModId", .. }));
}

#[test]
fn test_load_accepts_byte_order_mark() {
    let dir = TempDir::new().unwrap();
    write_mod(dir.path(), "bom", "\u{feff}{\"ModId\": \"bom.mod\", \"ModName\": \"Bom\"}");

    let config = ModConfig::load(&dir.path().join("bom").join(MOD_CONFIG_FILE)).unwrap();
    assert_eq!(config.mod_id, "bom.mod");
}

#[test]
fn test_load_mod_configs_skips_broken_and_sorts() {
    let dir = TempDir::new().unwrap();
    write_mod(dir.path(), "zeta", r#"{"ModId": "z.mod", "ModName": "Zeta"}"#);
    write_mod(dir.path(), "alpha", r#"{"ModId": "a.mod", "ModName": "Alpha"}"#);
    write_mod(dir.path(), "broken", "{ not json");
    std::fs::create_dir_all(dir.path().join("empty")).unwrap();
    std::fs::write(dir.path().join("stray.txt"), "ignored").unwrap();

    let configs = load_mod_configs(dir.path()).unwrap();
    let ids: Vec<&str> = configs.iter().map(|c| c.mod_id.as_str()).collect();
    assert_eq!(ids, vec!["a.mod", "z.mod"]);
}

#[test]
fn test_load_mod_configs_missing_dir() {
    let dir = TempDir::new().unwrap();
    let result = load_mod_configs(&dir.path().join("nope"));
    assert!(matches!(result, Err(ModConfigError::Io { .. })));
}
