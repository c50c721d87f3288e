use super::*;

#[test]
fn test_default_filter_targets_keystone() {
    assert_eq!(default_filter(LogLevel::Error), "keystone=error,error");
    assert_eq!(default_filter(LogLevel::Debug), "keystone=debug,error");
}

#[test]
fn test_default_filter_parses() {
    for level in [
        LogLevel::Error,
        LogLevel::Warning,
        LogLevel::Info,
        LogLevel::Debug,
        LogLevel::Trace,
    ] {
        assert!(EnvFilter::try_new(default_filter(level)).is_ok());
    }
}

#[test]
fn test_logger_not_initialized_by_library_code() {
    // Nothing in the library installs a subscriber on its own
    assert!(!Logger::is_initialized() || Logger::global().is_some());
}
