use keystone_lib::application::config::PlatformConfig;
use keystone_lib::primitives::{ConfigError, LogFormat, LogLevel, LogOutput};
use std::fs;

fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_config_default_creation() {
    let config = PlatformConfig::default();

    assert!(config.log_level <= 4);
    assert!(config.components.is_empty());
    assert_eq!(config.log_format, LogFormat::Text);
    assert_eq!(config.log_output, LogOutput::Stderr);
}

#[test]
fn test_config_merging_integration() {
    let base_config = PlatformConfig::default();
    let override_config = PlatformConfig {
        log_level: 3,
        components: vec!["core".to_string()],
        ..PlatformConfig::default()
    };

    let merged = base_config.merge_with(override_config);

    assert_eq!(merged.log_level, 3);
    assert_eq!(merged.components, vec!["core"]);
    assert_eq!(merged.log_output, LogOutput::Stderr);
}

#[test]
fn test_load_from_directory_and_environment() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    fs::write(
        dir.path().join(".env"),
        "# platform\nKEYSTONE_COMPONENTS=core,web\nKEYSTONE_LOG_FORMAT=plain\n",
    )?;

    let config = PlatformConfig::load_from(
        dir.path(),
        vars(&[("KEYSTONE_LOG_LEVEL", "2"), ("HOME", "/root")]),
    )?;

    assert_eq!(config.components, vec!["core", "web"]);
    assert_eq!(config.log_format, LogFormat::Text);
    assert_eq!(config.to_logger_config().level, LogLevel::Info);
    Ok(())
}

#[test]
fn test_invalid_level_value_is_rejected() {
    let err = PlatformConfig::from_env_iter(vars(&[("KEYSTONE_LOG_LEVEL", "loud")])).unwrap_err();
    assert!(matches!(err, ConfigError::EnvironmentParsingFailed { .. }));
}

#[test]
fn test_global_config_initializes_once() {
    let config = PlatformConfig::default();
    PlatformConfig::init_global(config.clone()).unwrap();

    assert_eq!(PlatformConfig::global(), Some(&config));
    assert!(matches!(
        PlatformConfig::init_global(config),
        Err(ConfigError::AlreadyInitialized)
    ));
}
