//! End-to-end tests for the platform lifecycle
//!
//! Covers the platform state machine around component startup:
//! - Start, shutdown and restart
//! - Circular configurations refusing to start
//! - Configuration from `.env` files driving the component list
//! - Reloading a component under a new reference
//! - Status and reports as JSON

use anyhow::Result;
use keystone_lib::platform::ComponentError;
use keystone_lib::primitives::ComponentState;
use keystone_lib::testing::{descriptor, version};
use keystone_lib::{Platform, PlatformConfig, PlatformError, PlatformState, VersionRange};
use keystone_tests::{TestPlatformBuilder, load_component_set};
use std::fs;

/// Test: full start and shutdown cycle
#[test]
fn test_start_and_shutdown_cycle() -> Result<()> {
    let mut test = TestPlatformBuilder::new().with_fixture("services")?.build();
    assert_eq!(test.platform.state(), PlatformState::Initializing);

    test.platform.start()?;
    assert_eq!(test.platform.state(), PlatformState::Active);
    assert_eq!(test.platform.manager().len(), 4);

    let report = test.platform.shutdown()?;
    assert!(report.is_success());
    assert_eq!(test.platform.state(), PlatformState::Stopped);
    assert!(test.platform.manager().is_empty());

    // Shutting down twice is refused
    let err = test.platform.shutdown().unwrap_err();
    assert!(matches!(
        err,
        PlatformError::InvalidState {
            state: PlatformState::Stopped,
            ..
        }
    ));
    Ok(())
}

/// Test: a stopped platform starts again from its references
#[test]
fn test_restart_after_shutdown() -> Result<()> {
    let mut test = TestPlatformBuilder::new().with_fixture("layered")?.build();
    test.platform.start()?;
    test.platform.shutdown()?;
    test.log.clear();

    let report = test.platform.start()?;
    assert!(report.is_success());
    assert!(report.rejected.is_empty());
    assert_eq!(test.platform.state(), PlatformState::Active);
    assert_eq!(
        test.components_with("activate"),
        vec!["B", "E", "F", "D", "C", "A"]
    );
    Ok(())
}

/// Test: starting an active platform is refused
#[test]
fn test_double_start_is_refused() -> Result<()> {
    let mut test = TestPlatformBuilder::new().with_fixture("layered")?.build();
    test.platform.start()?;

    let err = test.platform.start().unwrap_err();
    assert_eq!(err.to_string(), "Cannot start the platform while active");
    Ok(())
}

/// Test: circular requirements refuse the start and leave everything uninstalled
#[test]
fn test_cycle_refuses_start() -> Result<()> {
    let mut test = TestPlatformBuilder::new().with_fixture("cycle")?.build();

    match test.platform.start() {
        Err(PlatformError::Component(ComponentError::CircularDependency { cycles })) => {
            assert_eq!(cycles, vec![vec!["a", "b", "c"]]);
        }
        other => panic!("expected CircularDependency, got {:?}", other),
    }

    assert_eq!(test.platform.state(), PlatformState::Stopped);
    assert_eq!(test.state_of("solo"), Some(ComponentState::Uninstalled));
    assert!(test.log.entries().is_empty());
    Ok(())
}

/// Test: `.env` files name the components to start
#[test]
fn test_platform_from_env_file() -> Result<()> {
    let dir = tempfile::tempdir()?;
    fs::write(
        dir.path().join(".env"),
        "KEYSTONE_COMPONENTS=storage,cache\nKEYSTONE_LOG_LEVEL=3\n",
    )?;
    fs::write(dir.path().join(".env.local"), "KEYSTONE_LOG_FORMAT=json\n")?;

    let config = PlatformConfig::load_from(dir.path(), Vec::<(String, String)>::new())?;
    assert_eq!(config.components, vec!["storage", "cache"]);

    let loader = load_component_set("services")?.into_loader();
    let mut platform = Platform::from_config(loader, &config);
    let report = platform.start()?;

    assert!(report.is_success());
    assert_eq!(report.install.succeeded, vec!["storage", "cache"]);
    assert!(!platform.manager().contains("api"));
    Ok(())
}

/// Test: adding a new reference for a managed id replaces the old container
#[test]
fn test_reload_replaces_provider() -> Result<()> {
    let set = load_component_set("services")?;
    let references = set.references();
    let mut loader = set.into_loader();
    loader.add_component("plugins/auth-3.5", descriptor("auth", "3.5").hook("auth-main"));

    let mut platform = Platform::new(loader, references);
    platform.start()?;

    let manager = platform.manager_mut();
    manager.add_component("plugins/auth-3.5")?;
    assert_eq!(
        manager.get_component("auth")?.state(),
        Some(ComponentState::Uninstalled)
    );
    assert!(!manager.has_reference("plugins/auth-3.2"));

    let providers = manager
        .dependencies()
        .providers_in_range("auth", &VersionRange::any());
    assert_eq!(providers, vec![(&version("3.5"), &"auth".to_string())]);
    assert!(manager.dependencies().all_requirements_satisfied("api"));

    manager.install_component("auth")?;
    manager.activate_component("auth")?;
    assert_eq!(
        manager.get_component("auth")?.state(),
        Some(ComponentState::Active)
    );
    Ok(())
}

/// Test: status rows and reports serialize for tooling
#[test]
fn test_status_and_reports_as_json() -> Result<()> {
    let mut test = TestPlatformBuilder::new().with_fixture("services")?.build();
    let report = test.platform.start()?;

    let json = serde_json::to_value(&report)?;
    assert_eq!(json["install"]["operation"], "install");
    assert_eq!(json["activate"]["failed"].as_array().map(Vec::len), Some(0));

    let status = serde_json::to_value(test.platform.manager().status())?;
    let rows = status.as_array().expect("status is an array");
    assert_eq!(rows.len(), 4);

    let auth = rows
        .iter()
        .find(|row| row["id"] == "auth")
        .expect("auth row present");
    assert_eq!(auth["reference"], "plugins/auth-3.2");
    assert_eq!(auth["version"], "3.2");
    assert_eq!(auth["state"], "active");
    assert_eq!(auth["requirements_satisfied"], true);

    let api = rows.iter().find(|row| row["id"] == "api").expect("api row present");
    assert_eq!(api["hooks"], serde_json::json!(["api-main", "api-metrics"]));
    Ok(())
}
