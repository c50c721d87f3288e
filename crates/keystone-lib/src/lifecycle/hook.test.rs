use super::*;
use std::sync::{Arc, Mutex};

#[test]
fn test_adapter_without_callbacks_is_a_no_op() {
    let mut hook = HookAdapter::new("empty");
    assert_eq!(hook.name(), "empty");
    assert!(hook.activate().is_ok());
    assert!(hook.deactivate().is_ok());
    assert!(hook.on_state_change(ComponentState::Active).is_ok());
}

#[test]
fn test_adapter_forwards_present_callbacks() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let activations = Arc::clone(&seen);
    let states = Arc::clone(&seen);

    let mut hook = HookAdapter::new("partial")
        .on_activate(move || {
            activations.lock().unwrap().push("activate".to_string());
            Ok(())
        })
        .on_state(move |state| {
            states.lock().unwrap().push(state.to_string());
            Ok(())
        });

    hook.activate().unwrap();
    hook.deactivate().unwrap();
    hook.on_state_change(ComponentState::Active).unwrap();

    assert_eq!(*seen.lock().unwrap(), vec!["activate", "active"]);
}

#[test]
fn test_adapter_propagates_callback_errors() {
    let mut hook =
        HookAdapter::new("broken").on_deactivate(|| Err(HookError::failed("broken", "socket closed")));

    let err = hook.deactivate().unwrap_err();
    assert_eq!(err.to_string(), "Hook broken failed: socket closed");
    assert!(hook.activate().is_ok());
}

#[test]
fn test_adapter_debug_lists_callbacks() {
    let hook = HookAdapter::new("dbg").on_activate(|| Ok(()));
    let rendered = format!("{:?}", hook);
    assert!(rendered.contains("on_activate: true"));
    assert!(rendered.contains("on_deactivate: false"));
}

#[test]
fn test_state_callback_runs_through_trait_method() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let states = Arc::clone(&seen);
    let mut hook = HookAdapter::new("watcher").on_state(move |state| {
        states.lock().unwrap().push(state);
        Ok(())
    });

    // Method syntax on the concrete adapter reaches the Hook callback
    hook.on_state_change(ComponentState::Installed).unwrap();
    hook.on_state_change(ComponentState::Disposed).unwrap();

    assert_eq!(
        *seen.lock().unwrap(),
        vec![ComponentState::Installed, ComponentState::Disposed]
    );
}
