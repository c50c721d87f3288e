use super::*;
use crate::testing::{
    HookScript, InMemoryLoader, descriptor, export, require_any, require_range, version,
};

// =============================================================================
// Test Utilities
// =============================================================================

fn manager_with(loader: InMemoryLoader, references: &[&str]) -> ComponentManager<InMemoryLoader> {
    let mut manager = ComponentManager::new(loader);
    for reference in references {
        manager.add_component(reference).unwrap();
    }
    manager
}

fn state(manager: &ComponentManager<InMemoryLoader>, id: &str) -> Option<ComponentState> {
    manager.get_component(id).unwrap().state()
}

/// A -> [B, C], C -> [D, E, F], D -> [F], E -> [B], F -> [E]
fn layered_loader() -> InMemoryLoader {
    InMemoryLoader::new()
        .with(
            descriptor("A", "1.0")
                .hook("main")
                .requires(require_any("B"))
                .requires(require_any("C")),
        )
        .with(descriptor("B", "1.0").hook("main"))
        .with(
            descriptor("C", "1.0")
                .hook("main")
                .requires(require_any("D"))
                .requires(require_any("E"))
                .requires(require_any("F")),
        )
        .with(descriptor("D", "1.0").hook("main").requires(require_any("F")))
        .with(descriptor("E", "1.0").hook("main").requires(require_any("B")))
        .with(descriptor("F", "1.0").hook("main").requires(require_any("E")))
}

// =============================================================================
// Registration
// =============================================================================

#[test]
fn test_add_component_registers_own_capability() {
    let loader = InMemoryLoader::new().with(descriptor("core", "1.2"));
    let manager = manager_with(loader, &["core"]);

    let container = manager.get_component("core").unwrap();
    assert_eq!(container.state(), Some(ComponentState::Uninstalled));

    let providers = manager
        .dependencies()
        .providers_in_range("core", &VersionRange::any());
    assert_eq!(providers, vec![(&version("1.2"), &"core".to_string())]);
}

#[test]
fn test_duplicate_reference_is_rejected() {
    let loader = InMemoryLoader::new().with(descriptor("core", "1.0"));
    let mut manager = manager_with(loader, &["core"]);

    let err = manager.add_component("core").unwrap_err();
    assert!(matches!(err, ComponentError::DuplicateReference { .. }));
    assert_eq!(manager.len(), 1);
}

#[test]
fn test_unknown_reference_is_a_lifecycle_error() {
    let mut manager = ComponentManager::new(InMemoryLoader::new());
    let err = manager.add_component("missing").unwrap_err();
    assert!(matches!(err, ComponentError::Lifecycle(LifecycleError::Loader { .. })));
    assert!(manager.is_empty());
}

#[test]
fn test_get_unknown_component() {
    let manager = ComponentManager::new(InMemoryLoader::new());
    assert!(matches!(
        manager.get_component("ghost"),
        Err(ComponentError::UnknownComponent { .. })
    ));
}

#[test]
fn test_reload_replaces_registrations() {
    let loader = InMemoryLoader::new()
        .with_component("core@1", descriptor("core", "1.0").hook("h").requires(require_any("old")))
        .with_component("core@2", descriptor("core", "2.0").hook("h"));
    let mut manager = manager_with(loader, &["core@1"]);
    manager.install_component("core").unwrap_err();

    manager.add_component("core@2").unwrap();

    assert_eq!(manager.len(), 1);
    assert!(manager.has_reference("core@2"));
    assert!(!manager.has_reference("core@1"));
    assert!(manager.dependencies().requirements_of("core").is_empty());

    let versions: Vec<&Version> = manager
        .dependencies()
        .providers_in_range("core", &VersionRange::any())
        .into_iter()
        .map(|(v, _)| v)
        .collect();
    assert_eq!(versions, vec![&version("2.0")]);
    assert_eq!(state(&manager, "core"), Some(ComponentState::Uninstalled));
}

// =============================================================================
// Ordering
// =============================================================================

#[test]
fn test_install_order_end_to_end() {
    let mut manager = manager_with(layered_loader(), &["A", "B", "C", "D", "E", "F"]);
    assert_eq!(manager.install_order(), vec!["B", "E", "F", "D", "C", "A"]);

    let report = manager.install_all().unwrap();
    assert!(report.is_success());
    assert_eq!(report.succeeded, vec!["B", "E", "F", "D", "C", "A"]);

    let installed: Vec<String> = manager
        .loader()
        .log()
        .events("state=installed")
        .into_iter()
        .map(|entry| entry.trim_end_matches("/main").to_string())
        .collect();
    assert_eq!(installed, vec!["B", "E", "F", "D", "C", "A"]);
}

#[test]
fn test_exporter_precedes_consumers() {
    let loader = InMemoryLoader::new()
        .with(descriptor("web", "1.0").requires(require_range("http", "1.0", "2.0")))
        .with(descriptor("server", "0.3").exports(export("http", "1.1")));
    let mut manager = manager_with(loader, &["web", "server"]);

    assert_eq!(manager.install_order(), vec!["server", "web"]);
    assert!(manager.dependencies().all_requirements_satisfied("web"));

    let report = manager.install_all().unwrap();
    assert_eq!(report.succeeded, vec!["server", "web"]);
    assert!(manager.activate_all().is_success());
    assert_eq!(state(&manager, "web"), Some(ComponentState::Active));
}

#[test]
fn test_exporter_consuming_its_own_capability_is_not_a_cycle() {
    let loader = InMemoryLoader::new()
        .with(
            descriptor("log-b", "1.0")
                .requires(require_range("logging", "1.0", "2.0"))
                .exports(export("logging", "2.0")),
        )
        .with(descriptor("log-a", "1.0").exports(export("logging", "1.0")));
    let mut manager = manager_with(loader, &["log-b", "log-a"]);

    assert!(manager.dependencies().find_cycles().is_empty());
    assert_eq!(manager.install_order(), vec!["log-a", "log-b"]);
    assert!(manager.dependencies().all_requirements_satisfied("log-b"));

    let report = manager.install_all().unwrap();
    assert!(report.is_success());
    assert_eq!(report.succeeded, vec!["log-a", "log-b"]);
}

#[test]
fn test_circular_requirements_refuse_install() {
    let loader = InMemoryLoader::new()
        .with(descriptor("a", "1.0").requires(require_any("b")))
        .with(descriptor("b", "1.0").requires(require_any("c")))
        .with(descriptor("c", "1.0").requires(require_any("a")))
        .with(descriptor("solo", "1.0"));
    let mut manager = manager_with(loader, &["a", "b", "c", "solo"]);

    match manager.install_all() {
        Err(ComponentError::CircularDependency { cycles }) => {
            assert_eq!(cycles, vec![vec!["a", "b", "c"]]);
        }
        other => panic!("expected CircularDependency, got {:?}", other),
    }
    assert_eq!(state(&manager, "solo"), Some(ComponentState::Uninstalled));
}

// =============================================================================
// Failure isolation
// =============================================================================

#[test]
fn test_failed_install_withdraws_providers() {
    let loader = InMemoryLoader::new()
        .with(descriptor("z", "1.0").hook("broken"))
        .with(descriptor("y", "1.0").requires(require_any("z")))
        .with(descriptor("x", "1.0"))
        .with_broken_hook("broken");
    let mut manager = manager_with(loader, &["x", "y", "z"]);

    let report = manager.install_all().unwrap();
    assert_eq!(report.succeeded, vec!["x"]);
    assert_eq!(report.failed_ids(), vec!["z", "y"]);
    assert!(report.failed[1].error.contains("unsatisfied requirements: z"));

    assert_eq!(state(&manager, "z"), Some(ComponentState::Disposed));
    assert_eq!(state(&manager, "y"), Some(ComponentState::Disposed));
    assert!(
        manager
            .dependencies()
            .providers_in_range("z", &VersionRange::any())
            .is_empty()
    );
}

#[test]
fn test_failed_activation_blocks_dependents() {
    let loader = InMemoryLoader::new()
        .with(descriptor("x", "1.0").hook("x-hook"))
        .with(descriptor("y", "1.0").hook("y-hook").requires(require_any("z")))
        .with(descriptor("z", "1.0").hook("z-hook"))
        .with_script("z-hook", HookScript::failing_activate());
    let mut manager = manager_with(loader, &["x", "y", "z"]);
    manager.install_all().unwrap();

    let report = manager.activate_all();
    assert_eq!(report.succeeded, vec!["x"]);
    assert_eq!(report.failed_ids(), vec!["z", "y"]);
    assert!(report.failed[1].error.contains("no active provider"));

    assert_eq!(state(&manager, "x"), Some(ComponentState::Active));
    assert_eq!(state(&manager, "z"), Some(ComponentState::Deactivated));
    assert_eq!(state(&manager, "y"), Some(ComponentState::Installed));
    assert!(manager.loader().log().events("activate").iter().all(|e| e != "y/y-hook"));
}

#[test]
fn test_activate_component_requires_active_provider() {
    let loader = InMemoryLoader::new()
        .with(descriptor("db", "1.0"))
        .with(descriptor("app", "1.0").requires(require_any("db")));
    let mut manager = manager_with(loader, &["db", "app"]);
    manager.install_all().unwrap();

    let err = manager.activate_component("app").unwrap_err();
    assert!(matches!(err, ComponentError::InactiveDependency { .. }));

    manager.activate_component("db").unwrap();
    manager.activate_component("app").unwrap();
    assert_eq!(state(&manager, "app"), Some(ComponentState::Active));
}

#[test]
fn test_repeated_install_keeps_providers() {
    let loader = InMemoryLoader::new()
        .with(descriptor("B", "1.0"))
        .with(descriptor("A", "1.0").requires(require_any("B")));
    let mut manager = manager_with(loader, &["B", "A"]);
    manager.install_all().unwrap();

    let err = manager.install_component("B").unwrap_err();
    assert!(matches!(
        err,
        ComponentError::Lifecycle(LifecycleError::InvalidTransition {
            operation: Transition::Install,
            ..
        })
    ));

    assert_eq!(state(&manager, "B"), Some(ComponentState::Installed));
    assert!(manager.dependencies().requirement("A", "B").unwrap().is_satisfied());
    assert_eq!(
        manager
            .dependencies()
            .providers_in_range("B", &VersionRange::any()),
        vec![(&version("1.0"), &"B".to_string())]
    );
    assert_eq!(manager.install_order(), vec!["B", "A"]);
}

#[test]
fn test_activate_uninstalled_component_reports_state_first() {
    let loader = InMemoryLoader::new().with(descriptor("app", "1.0").requires(require_any("db")));
    let mut manager = manager_with(loader, &["app"]);

    let err = manager.activate_component("app").unwrap_err();
    match err {
        ComponentError::Lifecycle(LifecycleError::InvalidTransition {
            operation, state, ..
        }) => {
            assert_eq!(operation, Transition::Activate);
            assert_eq!(state, Some(ComponentState::Uninstalled));
        }
        other => panic!("expected InvalidTransition, got {:?}", other),
    }
    assert_eq!(state(&manager, "app"), Some(ComponentState::Uninstalled));
}

// =============================================================================
// Shutdown
// =============================================================================

#[test]
fn test_shutdown_runs_in_reverse_order() {
    let mut manager = manager_with(layered_loader(), &["A", "B", "C", "D", "E", "F"]);
    manager.install_all().unwrap();
    assert!(manager.activate_all().is_success());

    let report = manager.deactivate_all();
    assert_eq!(report.succeeded, vec!["A", "C", "D", "F", "E", "B"]);
    assert_eq!(report.operation, Transition::Deactivate);

    let report = manager.uninstall_all();
    assert_eq!(report.succeeded.len(), 6);
    assert!(manager.components().all(|c| c.state() == Some(ComponentState::Uninstalled)));

    let report = manager.dispose_all();
    assert_eq!(report.succeeded.len(), 6);
    assert!(manager.is_empty());
    assert!(
        manager
            .dependencies()
            .providers_in_range("A", &VersionRange::any())
            .is_empty()
    );
}

#[test]
fn test_bulk_steps_skip_invalid_transitions() {
    let loader = InMemoryLoader::new()
        .with(descriptor("on", "1.0"))
        .with(descriptor("off", "1.0"));
    let mut manager = manager_with(loader, &["on", "off"]);
    manager.install_all().unwrap();
    manager.activate_component("on").unwrap();

    let report = manager.deactivate_all();
    assert_eq!(report.succeeded, vec!["on"]);

    // Deactivating something inactive is a no-op
    manager.deactivate_component("off").unwrap();
    assert_eq!(state(&manager, "off"), Some(ComponentState::Installed));
}

#[test]
fn test_dispose_all_sweeps_failed_installs() {
    let loader = InMemoryLoader::new()
        .with(descriptor("bad", "1.0").hook("broken"))
        .with(descriptor("good", "1.0"))
        .with_broken_hook("broken");
    let mut manager = manager_with(loader, &["bad", "good"]);
    manager.install_all().unwrap();

    manager.uninstall_all();
    let report = manager.dispose_all();
    assert_eq!(report.succeeded, vec!["good"]);
    assert!(manager.is_empty());
    assert!(!manager.has_reference("bad"));
}

// =============================================================================
// Introspection
// =============================================================================

#[test]
fn test_status_serializes() {
    let loader = InMemoryLoader::new()
        .with(descriptor("core", "1.0").hook("main"))
        .with(descriptor("app", "0.1").requires(require_any("missing")));
    let mut manager = manager_with(loader, &["core", "app"]);
    manager.install_component("core").unwrap();

    let status = manager.status();
    assert_eq!(status.len(), 2);
    assert_eq!(status[0].state, Some(ComponentState::Installed));
    assert_eq!(status[0].hooks, vec!["main"]);
    assert!(!status[1].requirements_satisfied);

    let json = serde_json::to_value(&status).unwrap();
    assert_eq!(json[0]["id"], "core");
    assert_eq!(json[0]["version"], "1.0");
    assert_eq!(json[0]["state"], "installed");
    assert_eq!(json[1]["state"], "uninstalled");
}

#[test]
fn test_batch_report_serializes() {
    let mut report = BatchReport::new(Transition::Activate);
    report.succeed("a");
    report.fail(
        "b",
        &ComponentError::UnknownComponent {
            id: "b".to_string(),
        },
    );

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["operation"], "activate");
    assert_eq!(json["succeeded"][0], "a");
    assert_eq!(json["failed"][0]["component"], "b");
}
