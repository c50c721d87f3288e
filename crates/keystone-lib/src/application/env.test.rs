use super::*;

fn env_of(pairs: &[(&str, &str)]) -> EnvironmentConfig {
    EnvironmentConfig::from_iter(
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string())),
    )
    .unwrap()
}

#[test]
fn test_no_color_environment_variable() {
    let env = env_of(&[("NO_COLOR", "1")]);
    assert!(!env.apply_color_config(true));
}

#[test]
fn test_force_color_environment_variable() {
    let env = env_of(&[("FORCE_COLOR", "1")]);
    assert!(env.apply_color_config(false));
}

#[test]
fn test_environment_variable_precedence() {
    let env = env_of(&[("CLICOLOR", "0"), ("NO_COLOR", "1"), ("FORCE_COLOR", "1")]);
    // FORCE_COLOR wins over NO_COLOR and CLICOLOR
    assert!(env.apply_color_config(false));
}

#[test]
fn test_ci_environment_variable() {
    let env = env_of(&[("CI", "true"), ("FORCE_COLOR", "1")]);
    assert!(!env.apply_color_config(true));
}

#[test]
fn test_empty_no_color_is_ignored() {
    let env = env_of(&[("NO_COLOR", "")]);
    assert!(env.apply_color_config(true));
}

#[test]
fn test_invalid_force_color_values_ignored() {
    let env = env_of(&[("FORCE_COLOR", "invalid")]);
    assert!(env.apply_color_config(true));
    assert!(!env.apply_color_config(false));
}

#[test]
fn test_unrelated_variables_leave_color_alone() {
    let env = env_of(&[("KEYSTONE_COLOR", "false"), ("PATH", "/usr/bin")]);
    assert!(env.apply_color_config(true));
}

#[test]
fn test_color_override_outcomes() {
    assert_eq!(env_of(&[]).color_override(), ColorOverride::Unset);
    assert_eq!(env_of(&[("CLICOLOR", "1")]).color_override(), ColorOverride::Unset);
    assert_eq!(env_of(&[("CLICOLOR", "0")]).color_override(), ColorOverride::Disable);
    assert_eq!(env_of(&[("FORCE_COLOR", "false")]).color_override(), ColorOverride::Disable);
    assert_eq!(env_of(&[("FORCE_COLOR", "3")]).color_override(), ColorOverride::Enable);
}
