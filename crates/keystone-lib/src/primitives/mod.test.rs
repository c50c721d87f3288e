use super::*;
use clap::ValueEnum;

// =============================================================================
// VALUE PARSING
// =============================================================================

fn names_round_trip<T: ValueEnum + std::str::FromStr + PartialEq + std::fmt::Debug>() {
    for variant in T::value_variants() {
        let name = variant
            .to_possible_value()
            .map(|value| value.get_name().to_string())
            .unwrap_or_else(|| panic!("{variant:?} has no possible value"));
        match name.parse::<T>() {
            Ok(parsed) => assert_eq!(&parsed, variant),
            Err(_) => panic!("{name} does not parse back"),
        }
    }
}

#[test]
fn test_primary_names_round_trip() {
    names_round_trip::<LogLevel>();
    names_round_trip::<LogFormat>();
    names_round_trip::<LogOutput>();
}

#[test]
fn test_log_level_aliases() {
    let cases = [
        ("err", LogLevel::Error),
        ("fatal", LogLevel::Error),
        ("warn", LogLevel::Warning),
        ("warning", LogLevel::Warning),
        ("information", LogLevel::Info),
        ("debugging", LogLevel::Debug),
        ("verbose", LogLevel::Trace),
        ("TRACE", LogLevel::Trace),
    ];
    for (input, expected) in cases {
        assert_eq!(input.parse::<LogLevel>().ok(), Some(expected), "{input}");
    }
}

#[test]
fn test_format_and_output_aliases() {
    assert_eq!("plain".parse::<LogFormat>().ok(), Some(LogFormat::Text));
    assert_eq!("txt".parse::<LogFormat>().ok(), Some(LogFormat::Text));
    assert_eq!("yml".parse::<LogFormat>().ok(), Some(LogFormat::Yaml));
    assert_eq!("Json".parse::<LogFormat>().ok(), Some(LogFormat::Json));
    assert_eq!("out".parse::<LogOutput>().ok(), Some(LogOutput::Stdout));
    assert_eq!("err".parse::<LogOutput>().ok(), Some(LogOutput::Stderr));
}

#[test]
fn test_unknown_log_format_is_parse_error() {
    let parsed: Result<LogFormat, _> = "xml".parse();
    match parsed {
        Err(ConfigError::ParseError { value, reason }) => {
            assert_eq!(value, "xml");
            assert_eq!(reason, "invalid log format");
        }
        other => panic!("expected ParseError, got {:?}", other),
    }
}

// =============================================================================
// BEHAVIOR
// =============================================================================

#[test]
fn test_log_level_from_verbosity_boundary_conditions() {
    assert_eq!(LogLevel::from_verbosity(0), LogLevel::Error);
    assert_eq!(LogLevel::from_verbosity(1), LogLevel::Warning);
    assert_eq!(LogLevel::from_verbosity(2), LogLevel::Info);
    assert_eq!(LogLevel::from_verbosity(3), LogLevel::Debug);
    assert_eq!(LogLevel::from_verbosity(4), LogLevel::Trace);
    assert_eq!(LogLevel::from_verbosity(u8::MAX), LogLevel::Trace);
}

#[test]
fn test_log_level_should_log_matrix() {
    let levels = [
        LogLevel::Error,
        LogLevel::Warning,
        LogLevel::Info,
        LogLevel::Debug,
        LogLevel::Trace,
    ];

    for (i, message_level) in levels.iter().enumerate() {
        for (j, current_level) in levels.iter().enumerate() {
            assert_eq!(message_level.should_log(*current_level), i <= j);
        }
    }
}

#[test]
fn test_transition_table() {
    use ComponentState::*;

    assert!(Transition::Load.is_valid_from(None));
    assert!(Transition::Load.is_valid_from(Some(Uninstalled)));
    assert!(!Transition::Load.is_valid_from(Some(Disposed)));

    assert!(Transition::Install.is_valid_from(Some(Uninstalled)));
    assert!(!Transition::Install.is_valid_from(Some(Deactivated)));

    assert!(Transition::Activate.is_valid_from(Some(Installed)));
    assert!(Transition::Activate.is_valid_from(Some(Deactivated)));
    assert!(!Transition::Activate.is_valid_from(Some(Uninstalled)));
    assert!(!Transition::Activate.is_valid_from(Some(Active)));

    assert!(Transition::Deactivate.is_valid_from(Some(Active)));
    assert!(!Transition::Deactivate.is_valid_from(Some(Installed)));

    assert!(Transition::Uninstall.is_valid_from(Some(Installed)));
    assert!(Transition::Uninstall.is_valid_from(Some(Deactivated)));
    assert!(!Transition::Uninstall.is_valid_from(Some(Active)));

    assert!(Transition::Dispose.is_valid_from(Some(Uninstalled)));
    assert!(!Transition::Dispose.is_valid_from(Some(Installed)));
}

#[test]
fn test_disposed_accepts_no_transition() {
    let all = [
        Transition::Load,
        Transition::Install,
        Transition::Activate,
        Transition::Deactivate,
        Transition::Uninstall,
        Transition::Dispose,
    ];
    assert!(ComponentState::Disposed.is_terminal());
    for transition in all {
        assert!(!transition.is_valid_from(Some(ComponentState::Disposed)));
    }
}

#[test]
fn test_state_display() {
    assert_eq!(ComponentState::Deactivated.to_string(), "deactivated");
    assert_eq!(describe_state(&None), "unloaded");
    assert_eq!(describe_state(&Some(ComponentState::Active)), "active");
    assert_eq!(Transition::Uninstall.to_string(), "uninstall");
}

#[test]
fn test_config_error_display() {
    let error = ConfigError::AlreadyInitialized;
    assert_eq!(error.to_string(), "Global configuration already initialized");

    let error = ConfigError::ValidationFailed {
        reason: "empty component reference".to_string(),
    };
    assert_eq!(
        error.to_string(),
        "Configuration validation failed: empty component reference"
    );
}
