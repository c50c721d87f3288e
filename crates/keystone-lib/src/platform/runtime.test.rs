use super::*;
use crate::primitives::ComponentState;
use crate::testing::{HookScript, InMemoryLoader, descriptor, require_any};

fn references(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

#[test]
fn test_new_platform_is_initializing() {
    let platform = Platform::new(InMemoryLoader::new(), references(&["a"]));
    assert_eq!(platform.state(), PlatformState::Initializing);
    assert!(platform.manager().is_empty());
    assert_eq!(platform.references(), ["a".to_string()]);
}

#[test]
fn test_start_and_shutdown() {
    let loader = InMemoryLoader::new()
        .with(descriptor("db", "1.0").hook("pool"))
        .with(descriptor("app", "1.0").hook("http").requires(require_any("db")));
    let mut platform = Platform::new(loader, references(&["app", "db"]));

    let report = platform.start().unwrap();
    assert!(report.is_success());
    assert_eq!(report.install.succeeded, vec!["db", "app"]);
    assert_eq!(platform.state(), PlatformState::Active);

    let report = platform.shutdown().unwrap();
    assert!(report.is_success());
    assert_eq!(report.deactivate.succeeded, vec!["app", "db"]);
    assert_eq!(platform.state(), PlatformState::Stopped);
    assert!(platform.manager().is_empty());
}

#[test]
fn test_start_isolates_failures() {
    let loader = InMemoryLoader::new()
        .with(descriptor("x", "1.0").hook("x-hook"))
        .with(descriptor("y", "1.0").hook("y-hook").requires(require_any("z")))
        .with(descriptor("z", "1.0").hook("z-hook"))
        .with_script("z-hook", HookScript::failing_activate());
    let mut platform = Platform::new(loader, references(&["x", "y", "z"]));

    let report = platform.start().unwrap();
    assert!(!report.is_success());
    assert_eq!(report.activate.failed_ids(), vec!["z", "y"]);
    assert_eq!(platform.state(), PlatformState::Active);

    let state = |id: &str| platform.manager().get_component(id).unwrap().state();
    assert_eq!(state("x"), Some(ComponentState::Active));
    assert_eq!(state("z"), Some(ComponentState::Deactivated));
    assert_eq!(state("y"), Some(ComponentState::Installed));
}

#[test]
fn test_unknown_reference_is_rejected_not_fatal() {
    let loader = InMemoryLoader::new().with(descriptor("ok", "1.0"));
    let mut platform = Platform::new(loader, references(&["ok", "nowhere"]));

    let report = platform.start().unwrap();
    assert_eq!(report.rejected.len(), 1);
    assert_eq!(report.rejected[0].component, "nowhere");
    assert_eq!(report.activate.succeeded, vec!["ok"]);
}

#[test]
fn test_cyclic_configuration_refuses_start() {
    let loader = InMemoryLoader::new()
        .with(descriptor("a", "1.0").requires(require_any("b")))
        .with(descriptor("b", "1.0").requires(require_any("a")));
    let mut platform = Platform::new(loader, references(&["a", "b"]));

    let err = platform.start().unwrap_err();
    assert!(matches!(
        err,
        PlatformError::Component(ComponentError::CircularDependency { .. })
    ));
    assert!(err.to_string().contains("[a -> b]"));
    assert_eq!(platform.state(), PlatformState::Stopped);
}

#[test]
fn test_invalid_platform_transitions() {
    let loader = InMemoryLoader::new().with(descriptor("a", "1.0"));
    let mut platform = Platform::new(loader, references(&["a"]));

    assert!(matches!(
        platform.shutdown(),
        Err(PlatformError::InvalidState {
            state: PlatformState::Initializing,
            ..
        })
    ));

    platform.start().unwrap();
    let err = platform.start().unwrap_err();
    assert_eq!(err.to_string(), "Cannot start the platform while active");
}

#[test]
fn test_restart_after_shutdown() {
    let loader = InMemoryLoader::new().with(descriptor("a", "1.0").hook("h"));
    let mut platform = Platform::new(loader, references(&["a"]));

    platform.start().unwrap();
    platform.shutdown().unwrap();
    let report = platform.start().unwrap();

    assert!(report.is_success());
    assert_eq!(report.activate.succeeded, vec!["a"]);
    assert_eq!(platform.manager().len(), 1);
}

#[test]
fn test_from_config_uses_component_list() {
    let config = PlatformConfig {
        components: references(&["a", "b"]),
        ..PlatformConfig::default()
    };
    let platform = Platform::from_config(InMemoryLoader::new(), &config);
    assert_eq!(platform.references(), config.components.as_slice());
}
