use super::*;

#[test]
fn test_default_filter_scopes_crate_level() {
    let filter = default_filter(LogLevel::Debug);
    assert!(filter.starts_with("packsmith=debug"));
    assert!(filter.contains("reqwest=warn"));
    assert!(filter.ends_with(",debug"));
}

#[test]
fn test_default_filter_is_valid_env_filter() {
    for level in [LogLevel::Error, LogLevel::Info, LogLevel::Trace] {
        let filter = default_filter(level);
        assert!(EnvFilter::try_new(&filter).is_ok(), "bad filter: {filter}");
    }
}

#[test]
fn test_logger_global_consistent() {
    // Other tests in the process may have initialized it
    assert_eq!(Logger::is_initialized(), Logger::global().is_some());
}
