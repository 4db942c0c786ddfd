use super::*;

#[test]
fn test_defaults() {
    let config = AppConfig::default();
    assert_eq!(config.log_level, 1);
    assert_eq!(config.net_timeout, 30);
    assert_eq!(config.nuget_feeds, vec![NUGET_ORG_INDEX.to_string()]);
    assert_eq!(config.color, ColorMode::Auto);
    assert_eq!(config.search_options(), SearchOptions::default());
}

#[test]
fn test_clap_defaults_match_struct_defaults() {
    let parsed = AppConfig::try_parse_from(["packsmith"]).unwrap();
    let defaults = AppConfig::default();
    assert_eq!(parsed.net_timeout, defaults.net_timeout);
    assert_eq!(parsed.nuget_feeds, defaults.nuget_feeds);
    assert_eq!(parsed.gamebanana_url, defaults.gamebanana_url);
    assert_eq!(parsed.max_results, defaults.max_results);
    assert_eq!(parsed.max_providers, defaults.max_providers);
    assert_eq!(parsed.log_level, defaults.log_level);
    assert_eq!(parsed.log_format, defaults.log_format);
}

#[test]
fn test_feeds_are_comma_separated() {
    let parsed = AppConfig::try_parse_from([
        "packsmith",
        "--nuget-feeds",
        "https://a.example/index.json,https://b.example/index.json",
    ])
    .unwrap();
    assert_eq!(
        parsed.nuget_feeds,
        vec!["https://a.example/index.json", "https://b.example/index.json"]
    );
}

#[test]
fn test_merge_takes_non_defaults() {
    let base = AppConfig {
        cache_dir: Some(PathBuf::from("/base")),
        ..AppConfig::default()
    };
    let cli = AppConfig {
        log_level: 3,
        color: ColorMode::Never,
        max_results: 5,
        gamebanana_game_id: Some(6061),
        ..AppConfig::default()
    };

    let merged = base.merge_with(cli);
    assert_eq!(merged.log_level, 3);
    assert_eq!(merged.color, ColorMode::Never);
    assert_eq!(merged.max_results, 5);
    assert_eq!(merged.gamebanana_game_id, Some(6061));
    assert_eq!(merged.cache_dir, Some(PathBuf::from("/base")));
    assert_eq!(merged.net_timeout, 30);
}

#[test]
fn test_validate_rejects_zero_timeout() {
    let mut config = AppConfig {
        net_timeout: 0,
        cache_dir: Some(PathBuf::from("/tmp/cache")),
        ..AppConfig::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::ValidationFailed { .. })
    ));
}

#[test]
fn test_validate_cleans_feeds_and_keeps_cache_dir() {
    let mut config = AppConfig {
        nuget_feeds: vec![" https://a.example/index.json ".into(), "".into()],
        cache_dir: Some(PathBuf::from("/tmp/cache")),
        ..AppConfig::default()
    };
    config.validate().unwrap();
    assert_eq!(config.nuget_feeds, vec!["https://a.example/index.json"]);
    assert_eq!(config.cache_dir, Some(PathBuf::from("/tmp/cache")));
}

#[test]
fn test_logger_and_network_config() {
    let config = AppConfig {
        log_level: 4,
        log_format: LogFormat::Json,
        color: ColorMode::Never,
        net_timeout: 7,
        ..AppConfig::default()
    };

    let logger = config.to_logger_config();
    assert_eq!(logger.level, LogLevel::Trace);
    assert_eq!(logger.format, LogFormat::Json);
    assert!(!logger.ansi);

    let networking = config.to_networking_config();
    assert_eq!(networking.timeout_seconds, 7);
    assert!(networking.trace_requests);
}
