use super::*;
use crate::primitives::{LogFormat, LogLevel, LogOutput};
use crate::testing::TempDirFixture;

fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_config_loading_defaults() {
    let config = PlatformConfig::from_env_iter(Vec::new()).unwrap();
    assert_eq!(config, PlatformConfig::default());
    assert_eq!(config.log_level, 0);
    assert!(config.components.is_empty());
    assert!(!config.color);
}

#[test]
fn test_prefixed_variables_override_defaults() {
    let config = PlatformConfig::from_env_iter(vars(&[
        ("KEYSTONE_COMPONENTS", "core,web , jobs"),
        ("KEYSTONE_LOG_LEVEL", "3"),
        ("KEYSTONE_LOG_FORMAT", "JSON"),
        ("KEYSTONE_LOG_OUTPUT", "out"),
        ("LOG_LEVEL", "4"),
    ]))
    .unwrap();

    assert_eq!(config.components, vec!["core", "web", "jobs"]);
    assert_eq!(config.log_level, 3);
    assert_eq!(config.log_format, LogFormat::Json);
    assert_eq!(config.log_output, LogOutput::Stdout);
}

#[test]
fn test_format_aliases_are_accepted() {
    let config =
        PlatformConfig::from_env_iter(vars(&[("KEYSTONE_LOG_FORMAT", "yml")])).unwrap();
    assert_eq!(config.log_format, LogFormat::Yaml);
}

#[test]
fn test_unknown_format_is_an_environment_error() {
    let err =
        PlatformConfig::from_env_iter(vars(&[("KEYSTONE_LOG_FORMAT", "xml")])).unwrap_err();
    assert!(matches!(err, ConfigError::EnvironmentParsingFailed { .. }));
}

#[test]
fn test_duplicate_reference_fails_validation() {
    let err = PlatformConfig::from_env_iter(vars(&[("KEYSTONE_COMPONENTS", "a,b,a")]))
        .unwrap_err();
    match err {
        ConfigError::ValidationFailed { reason } => assert!(reason.contains("listed twice")),
        other => panic!("expected ValidationFailed, got {:?}", other),
    }
}

#[test]
fn test_empty_reference_fails_validation() {
    let err =
        PlatformConfig::from_env_iter(vars(&[("KEYSTONE_COMPONENTS", "a, ,b")])).unwrap_err();
    assert!(matches!(err, ConfigError::ValidationFailed { .. }));
}

#[test]
fn test_color_follows_standard_variables() {
    let config = PlatformConfig::from_env_iter(vars(&[
        ("KEYSTONE_COLOR", "true"),
        ("NO_COLOR", "1"),
    ]))
    .unwrap();
    assert!(!config.color);

    let config = PlatformConfig::from_env_iter(vars(&[("FORCE_COLOR", "1")])).unwrap();
    assert!(config.color);
}

#[test]
fn test_logger_config_from_platform_config() {
    let config = PlatformConfig {
        log_level: 2,
        log_format: LogFormat::Json,
        color: true,
        ..PlatformConfig::default()
    };
    let logger = config.to_logger_config();
    assert_eq!(logger.level, LogLevel::Info);
    assert_eq!(logger.format, LogFormat::Json);
    // JSON output never carries ANSI escapes
    assert!(!logger.ansi);
}

#[test]
fn test_config_merging() {
    let base = PlatformConfig::default();
    let override_config = PlatformConfig {
        log_level: 4,
        log_output: LogOutput::Stdout,
        ..PlatformConfig::default()
    };

    let merged = base.merge_with(override_config);
    assert_eq!(merged.log_level, 4);
    assert_eq!(merged.log_output, LogOutput::Stdout);
    assert_eq!(merged.log_format, LogFormat::Text);
}

// =============================================================================
// Env files
// =============================================================================

#[test]
fn test_env_files_are_layered() -> Result<(), Box<dyn std::error::Error>> {
    let fixture = TempDirFixture::new()?;
    fixture.write_env(
        ".env",
        &[("KEYSTONE_COMPONENTS", "core"), ("KEYSTONE_LOG_LEVEL", "1")],
    )?;
    fixture.write_env(".env.local", &[("KEYSTONE_LOG_LEVEL", "2")])?;

    let config = PlatformConfig::load_from(fixture.path(), Vec::new())?;
    assert_eq!(config.components, vec!["core"]);
    assert_eq!(config.log_level, 2);

    // The environment beats both files
    let config =
        PlatformConfig::load_from(fixture.path(), vars(&[("KEYSTONE_LOG_LEVEL", "4")]))?;
    assert_eq!(config.log_level, 4);
    Ok(())
}

#[test]
fn test_missing_env_files_are_ignored() -> Result<(), Box<dyn std::error::Error>> {
    let fixture = TempDirFixture::new()?;
    let config = PlatformConfig::load_from(fixture.path(), Vec::new())?;
    assert_eq!(config, PlatformConfig::default());
    Ok(())
}

#[test]
fn test_malformed_env_file_is_reported() -> Result<(), Box<dyn std::error::Error>> {
    let fixture = TempDirFixture::new()?;
    fixture.write_file(".env", "KEYSTONE_LOG_LEVEL='unterminated\n")?;

    let err = PlatformConfig::load_from(fixture.path(), Vec::new()).unwrap_err();
    match err {
        ConfigError::EnvFileError { file, .. } => assert!(file.ends_with(".env")),
        other => panic!("expected EnvFileError, got {:?}", other),
    }
    Ok(())
}
