use super::*;
use crate::dependency::VersionRange;
use crate::lifecycle::{HookAdapter, RequireSpec};
use crate::testing::{HookScript, InMemoryLoader, descriptor, version};

// =============================================================================
// Test Utilities
// =============================================================================

fn loader_with_hooks(id: &str, hooks: &[&str]) -> InMemoryLoader {
    let mut desc = descriptor(id, "1.0");
    for hook in hooks {
        desc = desc.hook(*hook);
    }
    InMemoryLoader::new().with(desc)
}

fn installed(loader: &InMemoryLoader, id: &str) -> ComponentContainer {
    let deps: DependencyManager<String> = DependencyManager::new();
    let mut container = ComponentContainer::new(id);
    container.load(loader).unwrap();
    container.install(loader, &deps).unwrap();
    container
}

// =============================================================================
// Load and install
// =============================================================================

#[test]
fn test_new_container_is_unloaded() {
    let container = ComponentContainer::new("ref:core");
    assert_eq!(container.state(), None);
    assert_eq!(container.id(), "ref:core");
    assert!(container.descriptor().is_none());
}

#[test]
fn test_load_reads_descriptor() {
    let loader = InMemoryLoader::new().with_component("ref:core", descriptor("core", "2.1"));
    let mut container = ComponentContainer::new("ref:core");

    let loaded = container.load(&loader).unwrap();
    assert_eq!(loaded.version, version("2.1"));
    assert_eq!(container.id(), "core");
    assert_eq!(container.reference(), "ref:core");
    assert_eq!(container.state(), Some(ComponentState::Uninstalled));
}

#[test]
fn test_load_unknown_reference_fails_without_state() {
    let loader = InMemoryLoader::new();
    let mut container = ComponentContainer::new("missing");
    let err = container.load(&loader).unwrap_err();
    assert!(matches!(
        err,
        LifecycleError::Loader {
            source: LoaderError::NotFound { .. },
            ..
        }
    ));
    assert_eq!(container.state(), None);
}

#[test]
fn test_install_creates_hooks_in_order() {
    let loader = loader_with_hooks("core", &["first", "second"]);
    let container = installed(&loader, "core");

    assert_eq!(container.state(), Some(ComponentState::Installed));
    assert_eq!(container.hook_names(), vec!["first", "second"]);
    assert_eq!(
        loader.log().events("state=installed"),
        vec!["core/first", "core/second"]
    );
}

#[test]
fn test_install_with_unsatisfied_requirement_disposes() {
    let loader = InMemoryLoader::new()
        .with(descriptor("web", "1.0").requires(RequireSpec::new("db")).hook("h"));
    let mut deps: DependencyManager<String> = DependencyManager::new();
    deps.require("web", "db", VersionRange::any()).unwrap();

    let mut container = ComponentContainer::new("web");
    container.load(&loader).unwrap();
    let err = container.install(&loader, &deps).unwrap_err();

    match err {
        LifecycleError::UnsatisfiedDependencies { component, missing } => {
            assert_eq!(component, "web");
            assert_eq!(missing, vec!["db (*, *)".to_string()]);
        }
        other => panic!("expected UnsatisfiedDependencies, got {:?}", other),
    }
    assert_eq!(container.state(), Some(ComponentState::Disposed));
    assert!(container.hook_names().is_empty());
}

#[test]
fn test_install_with_satisfied_requirement() {
    let loader = InMemoryLoader::new().with(descriptor("web", "1.0").hook("h"));
    let mut deps: DependencyManager<String> = DependencyManager::new();
    deps.require("web", "db", VersionRange::any()).unwrap();
    deps.add_provider("db", version("1.0"), "db".to_string()).unwrap();

    let mut container = ComponentContainer::new("web");
    container.load(&loader).unwrap();
    container.install(&loader, &deps).unwrap();
    assert_eq!(container.state(), Some(ComponentState::Installed));
}

#[test]
fn test_hook_creation_failure_disposes() {
    let loader = loader_with_hooks("core", &["ok", "broken"]).with_broken_hook("broken");
    let deps: DependencyManager<String> = DependencyManager::new();

    let mut container = ComponentContainer::new("core");
    container.load(&loader).unwrap();
    let err = container.install(&loader, &deps).unwrap_err();

    assert!(matches!(
        err,
        LifecycleError::Loader {
            source: LoaderError::HookCreation { .. },
            ..
        }
    ));
    assert_eq!(container.state(), Some(ComponentState::Disposed));
}

// =============================================================================
// Transition legality
// =============================================================================

#[test]
fn test_activate_from_uninstalled_fails_and_keeps_state() {
    let loader = loader_with_hooks("core", &["h"]);
    let mut container = ComponentContainer::new("core");
    container.load(&loader).unwrap();

    let err = container.activate().unwrap_err();
    match &err {
        LifecycleError::InvalidTransition {
            operation, state, ..
        } => {
            assert_eq!(*operation, Transition::Activate);
            assert_eq!(*state, Some(ComponentState::Uninstalled));
        }
        other => panic!("expected InvalidTransition, got {:?}", other),
    }
    assert_eq!(
        err.to_string(),
        "Cannot activate component core while uninstalled"
    );
    assert_eq!(container.state(), Some(ComponentState::Uninstalled));
}

#[test]
fn test_activate_deactivate_activate() {
    let loader = loader_with_hooks("core", &["h"]);
    let mut container = installed(&loader, "core");

    container.activate().unwrap();
    assert_eq!(container.state(), Some(ComponentState::Active));
    container.deactivate().unwrap();
    assert_eq!(container.state(), Some(ComponentState::Deactivated));
    container.activate().unwrap();
    assert_eq!(container.state(), Some(ComponentState::Active));

    assert_eq!(loader.log().events("activate").len(), 2);
    assert_eq!(loader.log().events("deactivate").len(), 1);
}

#[test]
fn test_deactivate_requires_active() {
    let loader = loader_with_hooks("core", &[]);
    let mut container = installed(&loader, "core");
    assert!(container.deactivate().is_err());
    assert_eq!(container.state(), Some(ComponentState::Installed));
}

#[test]
fn test_uninstall_keeps_hooks_and_allows_reinstall() {
    let loader = loader_with_hooks("core", &["h"]);
    let deps: DependencyManager<String> = DependencyManager::new();
    let mut container = installed(&loader, "core");

    container.uninstall().unwrap();
    assert_eq!(container.state(), Some(ComponentState::Uninstalled));
    assert_eq!(container.hook_names(), vec!["h"]);

    container.install(&loader, &deps).unwrap();
    assert_eq!(container.state(), Some(ComponentState::Installed));
}

#[test]
fn test_uninstall_from_active_is_rejected() {
    let loader = loader_with_hooks("core", &["h"]);
    let mut container = installed(&loader, "core");
    container.activate().unwrap();
    assert!(container.uninstall().is_err());
    assert_eq!(container.state(), Some(ComponentState::Active));
}

#[test]
fn test_dispose_is_terminal() {
    let loader = loader_with_hooks("core", &["h"]);
    let mut container = installed(&loader, "core");

    // Only from Uninstalled
    assert!(container.dispose().is_err());
    container.uninstall().unwrap();
    container.dispose().unwrap();

    assert_eq!(container.state(), Some(ComponentState::Disposed));
    assert!(container.hook_names().is_empty());
    assert!(matches!(
        container.load(&loader),
        Err(LifecycleError::Disposed { .. })
    ));
    assert!(matches!(
        container.activate(),
        Err(LifecycleError::Disposed { .. })
    ));
}

// =============================================================================
// Failure handling
// =============================================================================

#[test]
fn test_failed_activation_rolls_back_earlier_hooks() {
    let loader = loader_with_hooks("core", &["a", "b", "c"])
        .with_script("b", HookScript::failing_activate());
    let mut container = installed(&loader, "core");
    loader.log().clear();

    let err = container.activate().unwrap_err();
    match err {
        LifecycleError::ActivationFailed { component, hook, .. } => {
            assert_eq!(component, "core");
            assert_eq!(hook, "b");
        }
        other => panic!("expected ActivationFailed, got {:?}", other),
    }

    assert_eq!(container.state(), Some(ComponentState::Deactivated));
    assert_eq!(loader.log().events("activate"), vec!["core/a", "core/b"]);
    assert_eq!(loader.log().events("deactivate"), vec!["core/a"]);
    assert_eq!(loader.log().events("state=deactivated").len(), 3);
}

#[test]
fn test_deactivate_continues_past_failing_hook() {
    let loader = loader_with_hooks("core", &["a", "b", "c"])
        .with_script("a", HookScript::failing_deactivate());
    let mut container = installed(&loader, "core");
    container.activate().unwrap();

    container.deactivate().unwrap();
    assert_eq!(container.state(), Some(ComponentState::Deactivated));
    assert_eq!(
        loader.log().events("deactivate"),
        vec!["core/a", "core/b", "core/c"]
    );
}

#[test]
fn test_notification_failure_does_not_stop_others() {
    let loader = loader_with_hooks("core", &["noisy", "quiet"])
        .with_script("noisy", HookScript::failing_state_change());
    let mut container = installed(&loader, "core");

    container.activate().unwrap();
    assert_eq!(
        loader.log().events("state=active"),
        vec!["core/noisy", "core/quiet"]
    );
}

#[test]
fn test_adapted_hooks_run_through_the_container() {
    use std::sync::{Arc, Mutex};

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let loader = loader_with_hooks("core", &["adapted"]).with_factory("adapted", move |_| {
        let sink = Arc::clone(&sink);
        Box::new(HookAdapter::new("adapted").on_state(move |state| {
            sink.lock().unwrap().push(state);
            Ok(())
        })) as Box<dyn Hook>
    });

    let mut container = installed(&loader, "core");
    container.activate().unwrap();
    container.deactivate().unwrap();

    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            ComponentState::Installed,
            ComponentState::Active,
            ComponentState::Deactivated
        ]
    );
}
