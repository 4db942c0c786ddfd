use packsmith_lib::application::config::AppConfig;
use packsmith_lib::application::env::EnvironmentConfig;
use packsmith_lib::primitives::{ColorMode, ConfigError, LogLevel};
use std::path::PathBuf;

#[test]
fn test_config_default_creation() {
    let config = AppConfig::default();

    assert!(config.log_level <= 4);
    assert!(config.net_timeout > 0);
    assert_eq!(config.color, ColorMode::Auto);
    assert!(!config.nuget_feeds.is_empty());
}

#[test]
fn test_config_merging_integration() {
    let base_config = AppConfig::default();
    let override_config = AppConfig {
        log_level: 3,
        max_providers: 2,
        color: ColorMode::Never,
        ..AppConfig::default()
    };

    let merged = base_config.merge_with(override_config);

    assert_eq!(merged.log_level, 3);
    assert_eq!(merged.max_providers, 2);
    assert_eq!(merged.color, ColorMode::Never);
    assert_eq!(merged.net_timeout, 30);
}

#[test]
fn test_resolve_fills_cache_dir_when_possible() {
    let resolved = AppConfig::resolve_with(AppConfig::default(), EnvironmentConfig::default());

    match resolved {
        Ok(config) => assert!(config.cache_dir.is_some()),
        // Sandboxes without a home directory
        Err(ConfigError::NoCacheDir) => {}
        Err(e) => panic!("unexpected error: {e}"),
    }
}

#[test]
fn test_resolved_config_feeds_logger_and_search() {
    let cli = AppConfig {
        cache_dir: Some(PathBuf::from("/tmp/packsmith")),
        log_level: 2,
        max_results: 10,
        ..AppConfig::default()
    };
    let config = AppConfig::resolve_with(cli, EnvironmentConfig::default()).unwrap();

    assert_eq!(config.to_logger_config().level, LogLevel::Info);
    assert_eq!(config.search_options().max_results, 10);
    assert!(config.search_options().only_best_version);
}
