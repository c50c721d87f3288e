//! End-to-end tests for failure isolation
//!
//! One broken component must only take down the components that need it:
//! - Hook creation failures dispose the component and its dependents
//! - Activation failures leave dependents installed
//! - Version mismatches and unknown references are reported, not fatal

use anyhow::Result;
use keystone_lib::PlatformState;
use keystone_lib::primitives::ComponentState;
use keystone_lib::testing::{HookScript, descriptor, require_range};
use keystone_tests::TestPlatformBuilder;

fn sorted(ids: Vec<&str>) -> Vec<&str> {
    let mut ids = ids;
    ids.sort_unstable();
    ids
}

/// Test: a broken hook class cascades through the requirement chain only
#[test]
fn test_broken_provider_disposes_dependents() -> Result<()> {
    let mut test = TestPlatformBuilder::new()
        .with_fixture("services")?
        .with_broken_hook("storage-main")
        .build();

    let report = test.platform.start()?;
    assert!(!report.is_success());
    assert_eq!(test.platform.state(), PlatformState::Active);

    assert_eq!(report.install.succeeded, vec!["auth"]);
    assert_eq!(
        sorted(report.install.failed_ids()),
        vec!["api", "cache", "storage"]
    );

    let cache = report
        .install
        .failed
        .iter()
        .find(|failure| failure.component == "cache")
        .expect("cache failure reported");
    assert!(cache.error.contains("kv [1.0, 2.0)"), "{}", cache.error);

    for id in ["storage", "cache", "api"] {
        assert_eq!(test.state_of(id), Some(ComponentState::Disposed));
    }
    assert_eq!(test.state_of("auth"), Some(ComponentState::Active));
    Ok(())
}

/// Test: a failed activation leaves its dependents installed and untouched
#[test]
fn test_failed_activation_skips_dependents() -> Result<()> {
    let mut test = TestPlatformBuilder::new()
        .with_fixture("services")?
        .with_script("auth-main", HookScript::failing_activate())
        .build();

    let report = test.platform.start()?;
    assert!(report.install.is_success());
    assert_eq!(sorted(report.activate.failed_ids()), vec!["api", "auth"]);

    let api = report
        .activate
        .failed
        .iter()
        .find(|failure| failure.component == "api")
        .expect("api failure reported");
    assert!(api.error.contains("no active provider"), "{}", api.error);

    assert_eq!(test.state_of("auth"), Some(ComponentState::Deactivated));
    assert_eq!(test.state_of("api"), Some(ComponentState::Installed));
    assert_eq!(test.state_of("storage"), Some(ComponentState::Active));
    assert_eq!(test.state_of("cache"), Some(ComponentState::Active));
    assert!(!test.components_with("activate").contains(&"api".to_string()));

    Ok(())
}

/// Test: a requirement outside every provider's range fails only its owner
#[test]
fn test_version_mismatch_is_isolated() -> Result<()> {
    let mut test = TestPlatformBuilder::new()
        .with_fixture("services")?
        .with_component(descriptor("legacy", "0.1").requires(require_range("kv", "2.0", "3.0")))
        .build();

    let report = test.platform.start()?;
    assert_eq!(report.install.failed_ids(), vec!["legacy"]);
    assert!(report.install.failed[0].error.contains("kv [2.0, 3.0)"));
    assert_eq!(report.install.succeeded.len(), 4);
    assert_eq!(test.state_of("legacy"), Some(ComponentState::Disposed));

    Ok(())
}

/// Test: unknown references are rejected while the rest starts
#[test]
fn test_unknown_reference_is_rejected() -> Result<()> {
    let mut test = TestPlatformBuilder::new()
        .with_fixture("layered")?
        .with_reference("plugins/missing")
        .build();

    let report = test.platform.start()?;
    assert_eq!(report.rejected.len(), 1);
    assert_eq!(report.rejected[0].component, "plugins/missing");
    assert!(report.rejected[0].error.contains("not found"));
    assert!(report.install.is_success());
    assert!(report.activate.is_success());

    Ok(())
}

/// Test: failed deactivation hooks do not stop the shutdown
#[test]
fn test_shutdown_continues_past_hook_errors() -> Result<()> {
    let mut test = TestPlatformBuilder::new()
        .with_fixture("services")?
        .with_script("cache-main", HookScript::failing_deactivate())
        .build();
    test.platform.start()?;

    test.platform.shutdown()?;
    assert_eq!(test.platform.state(), PlatformState::Stopped);
    assert!(test.platform.manager().is_empty());
    assert_eq!(test.components_with("deactivate").len(), 4);

    Ok(())
}
