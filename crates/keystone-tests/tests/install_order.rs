//! End-to-end tests for dependency-ordered startup and shutdown
//!
//! Component sets come from JSON fixtures and run through a full `Platform`:
//! - Every component installs and activates after what it requires
//! - Exported capabilities order their exporter first
//! - Shutdown walks the same order backwards

use anyhow::Result;
use keystone_lib::primitives::ComponentState;
use keystone_tests::{TestPlatformBuilder, load_component_set};

fn position(order: &[String], id: &str) -> usize {
    order
        .iter()
        .position(|entry| entry == id)
        .unwrap_or_else(|| panic!("{id} missing from {order:?}"))
}

/// Test: layered fixture installs leaves first
///
/// A -> [B, C], C -> [D, E, F], D -> [F], E -> [B], F -> [E]
#[test]
fn test_layered_startup_order() -> Result<()> {
    let mut test = TestPlatformBuilder::new().with_fixture("layered")?.build();

    let report = test.platform.start()?;
    assert!(report.is_success());

    let expected = vec!["B", "E", "F", "D", "C", "A"];
    assert_eq!(report.install.succeeded, expected);
    assert_eq!(report.activate.succeeded, expected);
    assert_eq!(test.components_with("activate"), expected);
    assert_eq!(test.components_with("state=installed"), expected);

    Ok(())
}

/// Test: exporters and providers come before their consumers
#[test]
fn test_services_install_after_providers() -> Result<()> {
    let mut test = TestPlatformBuilder::new().with_fixture("services")?.build();

    let report = test.platform.start()?;
    assert!(report.is_success());

    let order = &report.install.succeeded;
    assert_eq!(order.len(), 4);
    for (dependent, provider) in [("cache", "storage"), ("api", "cache"), ("api", "auth")] {
        assert!(
            position(order, provider) < position(order, dependent),
            "{provider} should install before {dependent}: {order:?}"
        );
    }

    for id in ["storage", "cache", "api", "auth"] {
        assert_eq!(test.state_of(id), Some(ComponentState::Active));
    }
    Ok(())
}

/// Test: hooks of one component activate in declaration order
#[test]
fn test_hooks_activate_in_declared_order() -> Result<()> {
    let mut test = TestPlatformBuilder::new().with_fixture("services")?.build();
    test.platform.start()?;

    let api_hooks: Vec<String> = test
        .log
        .events("activate")
        .into_iter()
        .filter(|entry| entry.starts_with("api/"))
        .collect();
    assert_eq!(api_hooks, vec!["api/api-main", "api/api-metrics"]);

    Ok(())
}

/// Test: shutdown deactivates dependents first
#[test]
fn test_shutdown_reverses_install_order() -> Result<()> {
    let mut test = TestPlatformBuilder::new().with_fixture("services")?.build();
    let startup = test.platform.start()?;

    let shutdown = test.platform.shutdown()?;
    assert!(shutdown.is_success());

    let mut reversed = startup.install.succeeded.clone();
    reversed.reverse();
    assert_eq!(shutdown.deactivate.succeeded, reversed);
    assert_eq!(shutdown.uninstall.succeeded, reversed);
    assert_eq!(shutdown.dispose.succeeded, reversed);
    assert_eq!(test.components_with("state=disposed"), reversed);

    Ok(())
}

/// Test: fixture references fall back to component ids
#[test]
fn test_fixture_references() -> Result<()> {
    let layered = load_component_set("layered")?;
    assert_eq!(layered.name, "layered");
    assert_eq!(layered.references(), vec!["A", "B", "C", "D", "E", "F"]);

    let services = load_component_set("services")?;
    assert_eq!(
        services.references(),
        vec!["api", "cache", "storage", "plugins/auth-3.2"]
    );
    Ok(())
}
