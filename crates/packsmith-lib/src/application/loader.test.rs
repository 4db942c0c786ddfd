use super::*;
use crate::primitives::ColorMode;
use std::path::PathBuf;
use tempfile::TempDir;

fn with_cache(config: AppConfig) -> AppConfig {
    AppConfig {
        cache_dir: Some(PathBuf::from("/tmp/packsmith-cache")),
        ..config
    }
}

#[test]
fn test_environment_color_applies_under_cli() {
    let env = EnvironmentConfig {
        no_color: Some("1".into()),
        ..EnvironmentConfig::default()
    };

    let config = AppConfig::resolve_with(with_cache(AppConfig::default()), env).unwrap();
    assert_eq!(config.color, ColorMode::Never);
}

#[test]
fn test_cli_color_beats_environment() {
    let env = EnvironmentConfig {
        no_color: Some("1".into()),
        ..EnvironmentConfig::default()
    };
    let cli = with_cache(AppConfig {
        color: ColorMode::Always,
        ..AppConfig::default()
    });

    let config = AppConfig::resolve_with(cli, env).unwrap();
    assert_eq!(config.color, ColorMode::Always);
}

#[test]
fn test_resolve_propagates_validation_errors() {
    let cli = with_cache(AppConfig {
        max_results: 0,
        ..AppConfig::default()
    });
    let result = AppConfig::resolve_with(cli, EnvironmentConfig::default());
    assert!(matches!(result, Err(ConfigError::ValidationFailed { .. })));
}

#[test]
fn test_missing_env_files_are_fine() {
    let dir = TempDir::new().unwrap();
    assert!(load_env_files(dir.path()).unwrap().is_empty());
}

#[test]
fn test_env_file_is_loaded() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join(".env"),
        "PACKSMITH_LOADER_TEST_VALUE=from-dotenv\n",
    )
    .unwrap();

    let loaded = load_env_files(dir.path()).unwrap();
    assert_eq!(loaded, vec![".env".to_string()]);
    assert_eq!(
        std::env::var("PACKSMITH_LOADER_TEST_VALUE").unwrap(),
        "from-dotenv"
    );
}

#[test]
fn test_malformed_env_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join(".env.local"), "NOT A VALID LINE\n").unwrap();

    let result = load_env_files(dir.path());
    assert!(matches!(result, Err(ConfigError::EnvFileError { .. })));
}
