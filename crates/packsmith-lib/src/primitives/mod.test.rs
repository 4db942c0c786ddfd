use super::*;

macro_rules! test_enum_completeness {
    ($enum_type:ty, $test_name:ident) => {
        #[test]
        fn $test_name() {
            for variant in <$enum_type>::value_variants() {
                let possible_value = variant
                    .to_possible_value()
                    .expect("PossibleValue should exist for all variants");
                let parsed: $enum_type = possible_value.get_name().parse().unwrap();
                assert_eq!(parsed, *variant, "Round-trip should preserve variant");
            }
        }
    };
}

test_enum_completeness!(LogLevel, test_log_level_completeness);
test_enum_completeness!(LogFormat, test_log_format_completeness);
test_enum_completeness!(LogOutput, test_log_output_completeness);
test_enum_completeness!(ColorMode, test_color_mode_completeness);

#[test]
fn test_aliases_parse() {
    assert_eq!("warning".parse::<LogLevel>().unwrap(), LogLevel::Warning);
    assert_eq!("WARN".parse::<LogLevel>().unwrap(), LogLevel::Warning);
    assert_eq!("verbose".parse::<LogLevel>().unwrap(), LogLevel::Trace);
    assert_eq!("yml".parse::<LogFormat>().unwrap(), LogFormat::Yaml);
    assert_eq!("plain".parse::<LogFormat>().unwrap(), LogFormat::Text);
    assert_eq!("off".parse::<ColorMode>().unwrap(), ColorMode::Never);
}

#[test]
fn test_invalid_value_reports_parse_error() {
    let err = "loud".parse::<LogLevel>().unwrap_err();
    match err {
        ConfigError::ParseError { value, reason } => {
            assert_eq!(value, "loud");
            assert_eq!(reason, "invalid log level");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_verbosity_mapping() {
    assert_eq!(LogLevel::from_verbosity(0), LogLevel::Error);
    assert_eq!(LogLevel::from_verbosity(2), LogLevel::Info);
    assert_eq!(LogLevel::from_verbosity(4), LogLevel::Trace);
    assert_eq!(LogLevel::from_verbosity(200), LogLevel::Trace);
}

#[test]
fn test_should_log_ordering() {
    assert!(LogLevel::Error.should_log(LogLevel::Info));
    assert!(!LogLevel::Debug.should_log(LogLevel::Warning));
    assert_eq!(LogLevel::Warning.as_directive(), "warn");
}

#[test]
fn test_forced_color_modes() {
    assert!(ColorMode::Always.use_ansi());
    assert!(!ColorMode::Never.use_ansi());
}

#[test]
fn test_log_context_progress() {
    let mut context = LogContext::with_progress("create", 3);
    assert_eq!(context.total_items, Some(3));
    assert_eq!(context.current_item, None);
    context.set_progress(2);
    assert_eq!(context.current_item, Some(2));
    assert_eq!(LogContext::new("inspect").total_items, None);
}
