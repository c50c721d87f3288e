use super::*;

fn v(text: &str) -> Version {
    Version::parse(text).unwrap()
}

fn names<P>(order: &[&Dependency<P>]) -> Vec<String> {
    use crate::graph::Vertex;
    order.iter().map(|d| d.name().to_string()).collect()
}

fn position(order: &[String], name: &str) -> usize {
    order.iter().position(|n| n == name).unwrap()
}

// =============================================================================
// Registration
// =============================================================================

#[test]
fn test_dependency_is_an_upsert() {
    let mut manager: DependencyManager<String> = DependencyManager::new();
    manager.dependency("log");
    manager
        .add_provider("log", v("1.0"), "logger".to_string())
        .unwrap();

    let again = manager.dependency("log");
    assert_eq!(again.provider_count(), 1);
    assert_eq!(manager.graph().vertex_count(), 1);
}

#[test]
fn test_add_provider_to_unknown_dependency_fails() {
    let mut manager: DependencyManager<&str> = DependencyManager::new();
    let err = manager.add_provider("ghost", v("1.0"), "p").unwrap_err();
    assert_eq!(
        err,
        DependencyError::UnknownDependency {
            name: "ghost".to_string()
        }
    );
}

#[test]
fn test_same_provider_same_version_is_deduplicated() {
    let mut manager: DependencyManager<&str> = DependencyManager::new();
    manager.dependency("db");

    assert!(manager.add_provider("db", v("2.0"), "pg").unwrap());
    assert!(!manager.add_provider("db", v("2.0.0"), "pg").unwrap());
    assert!(manager.add_provider("db", v("2.0"), "sqlite").unwrap());
    assert!(manager.add_provider("db", v("3.0"), "pg").unwrap());

    let db = manager.get_dependency("db").unwrap();
    assert_eq!(db.provider_count(), 3);
    assert_eq!(db.providers().len(), 2);
}

// =============================================================================
// Satisfaction
// =============================================================================

#[test]
fn test_requirement_satisfied_when_provider_arrives() {
    let mut manager: DependencyManager<&str> = DependencyManager::new();
    let requirement = manager
        .require("app", "db", VersionRange::between(v("1.0"), v("2.0")))
        .unwrap();
    assert!(!requirement.is_satisfied());

    // Out of range: still unsatisfied
    manager.add_provider("db", v("2.0"), "new-db").unwrap();
    assert!(!manager.requirement("app", "db").unwrap().is_satisfied());

    manager.add_provider("db", v("1.4"), "old-db").unwrap();
    assert!(manager.requirement("app", "db").unwrap().is_satisfied());
    assert!(manager.all_requirements_satisfied("app"));
}

#[test]
fn test_require_checks_existing_providers() {
    let mut manager: DependencyManager<&str> = DependencyManager::new();
    manager.dependency("db");
    manager.add_provider("db", v("1.4"), "db").unwrap();

    assert!(manager.require("app", "db", VersionRange::any()).unwrap().is_satisfied());
}

#[test]
fn test_redeclaring_replaces_the_range() {
    let mut manager: DependencyManager<&str> = DependencyManager::new();
    manager.dependency("db");
    manager.add_provider("db", v("1.4"), "db").unwrap();

    assert!(manager.require("app", "db", VersionRange::any()).unwrap().is_satisfied());
    let narrowed = manager
        .require("app", "db", VersionRange::at_least(v("2.0")))
        .unwrap();
    assert!(!narrowed.is_satisfied());
    assert_eq!(manager.graph().edge_count(), 1);
}

#[test]
fn test_withdrawing_a_provider_unsatisfies_requirements() {
    let mut manager: DependencyManager<&str> = DependencyManager::new();
    manager.require("app", "db", VersionRange::any()).unwrap();
    manager.require("app", "cache", VersionRange::any()).unwrap();
    manager.add_provider("db", v("1.0"), "pg").unwrap();
    manager.add_provider("cache", v("1.0"), "pg").unwrap();
    assert!(manager.all_requirements_satisfied("app"));

    let affected = manager.withdraw_provider(&"pg");
    assert_eq!(affected, vec!["db".to_string(), "cache".to_string()]);

    let missing: Vec<&str> = manager
        .unsatisfied_requirements("app")
        .into_iter()
        .map(|(name, _)| name)
        .collect();
    assert_eq!(missing, vec!["db", "cache"]);
    // The vertices stay
    assert!(manager.get_dependency("db").is_some());
}

#[test]
fn test_remove_provider_keeps_other_providers() {
    let mut manager: DependencyManager<&str> = DependencyManager::new();
    manager.require("app", "db", VersionRange::any()).unwrap();
    manager.add_provider("db", v("1.0"), "pg").unwrap();
    manager.add_provider("db", v("1.1"), "sqlite").unwrap();

    assert!(manager.remove_provider("db", &"pg").unwrap());
    assert!(!manager.remove_provider("db", &"pg").unwrap());
    assert!(manager.requirement("app", "db").unwrap().is_satisfied());

    let providers = manager.providers_in_range("db", &VersionRange::any());
    assert_eq!(providers, vec![(&v("1.1"), &"sqlite")]);
}

#[test]
fn test_providers_in_range_filters_by_version() {
    let mut manager: DependencyManager<&str> = DependencyManager::new();
    manager.dependency("db");
    manager.add_provider("db", v("1.0"), "a").unwrap();
    manager.add_provider("db", v("2.0"), "b").unwrap();
    manager.add_provider("db", v("2.0"), "c").unwrap();

    let range = VersionRange::at_least(v("1.5"));
    let found: Vec<&str> = manager
        .providers_in_range("db", &range)
        .into_iter()
        .map(|(_, p)| *p)
        .collect();
    assert_eq!(found, vec!["b", "c"]);
    assert!(manager.providers_in_range("ghost", &range).is_empty());
}

#[test]
fn test_remove_requirement_and_dependency() {
    let mut manager: DependencyManager<&str> = DependencyManager::new();
    manager.require("app", "db", VersionRange::any()).unwrap();
    manager.require("app", "cache", VersionRange::any()).unwrap();

    assert!(manager.remove_requirement("app", "db").is_some());
    assert!(manager.remove_requirement("app", "db").is_none());
    assert_eq!(manager.requirements_of("app").len(), 1);

    assert!(manager.remove_dependency("cache").is_some());
    assert!(manager.requirements_of("app").is_empty());
    assert!(manager.dependents_of("cache").is_empty());
}

#[test]
fn test_dependents_of() {
    let mut manager: DependencyManager<&str> = DependencyManager::new();
    manager.require("web", "db", VersionRange::any()).unwrap();
    manager.require("jobs", "db", VersionRange::any()).unwrap();

    let dependents: Vec<&str> = manager
        .dependents_of("db")
        .into_iter()
        .map(|(name, _)| name)
        .collect();
    assert_eq!(dependents, vec!["web", "jobs"]);
}

// =============================================================================
// Ordering
// =============================================================================

#[test]
fn test_reverse_dependency_order_end_to_end() {
    let mut manager: DependencyManager<&str> = DependencyManager::new();
    for name in ["A", "B", "C", "D", "E", "F"] {
        manager.dependency(name);
    }
    for (dependent, required) in [
        ("A", "B"),
        ("A", "C"),
        ("C", "D"),
        ("C", "E"),
        ("C", "F"),
        ("D", "F"),
        ("E", "B"),
        ("F", "E"),
    ] {
        manager.require(dependent, required, VersionRange::any()).unwrap();
    }

    let order = names(&manager.reverse_dependency_order());
    assert_eq!(order, vec!["B", "E", "F", "D", "C", "A"]);
}

#[test]
fn test_dependencies_come_first() {
    let mut manager: DependencyManager<&str> = DependencyManager::new();
    manager.require("app", "web", VersionRange::any()).unwrap();
    manager.require("web", "http", VersionRange::any()).unwrap();
    manager.require("app", "db", VersionRange::any()).unwrap();
    manager.require("db", "io", VersionRange::any()).unwrap();
    manager.require("http", "io", VersionRange::any()).unwrap();
    manager.dependency("standalone");

    let order = names(&manager.reverse_dependency_order());
    assert_eq!(order.len(), 6);
    for (dependent, required) in [
        ("app", "web"),
        ("web", "http"),
        ("app", "db"),
        ("db", "io"),
        ("http", "io"),
    ] {
        assert!(position(&order, required) < position(&order, dependent));
    }
}

#[test]
fn test_cycle_members_are_not_emitted() {
    let mut manager: DependencyManager<&str> = DependencyManager::new();
    manager.require("a", "b", VersionRange::any()).unwrap();
    manager.require("b", "a", VersionRange::any()).unwrap();
    manager.dependency("c");

    assert!(manager.is_circular());
    assert_eq!(manager.find_cycles().len(), 1);
    assert_eq!(names(&manager.reverse_dependency_order()), vec!["c"]);
}

#[test]
fn test_order_is_recomputed_each_call() {
    let mut manager: DependencyManager<&str> = DependencyManager::new();
    manager.require("a", "b", VersionRange::any()).unwrap();
    let first = names(&manager.reverse_dependency_order());
    let second = names(&manager.reverse_dependency_order());
    assert_eq!(first, second);
    assert_eq!(first, vec!["b", "a"]);
}
