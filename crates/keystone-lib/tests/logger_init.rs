use keystone_lib::logger::{Logger, default_filter};
use keystone_lib::primitives::{LogFormat, LogLevel, LogOutput, LoggerConfig, LoggerError};

#[test]
fn test_logger_initializes_once() {
    assert!(!Logger::is_initialized());

    let config = LoggerConfig {
        level: LogLevel::Debug,
        format: LogFormat::Json,
        output: LogOutput::Stderr,
        ansi: false,
    };
    let logger = Logger::init(config.clone()).unwrap();
    assert_eq!(logger.config().level, LogLevel::Debug);
    assert!(Logger::is_initialized());

    assert!(matches!(
        Logger::init(config),
        Err(LoggerError::AlreadyInitialized)
    ));
    assert_eq!(default_filter(logger.config().level), "keystone=debug,error");
}
