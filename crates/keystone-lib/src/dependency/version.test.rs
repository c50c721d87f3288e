use super::*;

fn v(text: &str) -> Version {
    Version::parse(text).unwrap()
}

// =============================================================================
// Parsing and ordering
// =============================================================================

#[test]
fn test_parse_rejects_empty_and_blank_segments() {
    assert_eq!(Version::parse("   "), Err(VersionError::Empty));
    assert!(matches!(
        Version::parse("1..2"),
        Err(VersionError::InvalidSegment { .. })
    ));
    assert!(matches!(
        Version::parse("1.0."),
        Err(VersionError::InvalidSegment { .. })
    ));
}

#[test]
fn test_numeric_segments_compare_numerically() {
    assert!(v("10.0.0") > v("9.0.0"));
    assert!(v("1.10") > v("1.9"));
    assert!(v("2") > v("1.99.99"));
}

#[test]
fn test_missing_trailing_segments_are_zero() {
    assert_eq!(v("1.0"), v("1.0.0"));
    assert_eq!(v("1"), v("1.0.0.0"));
    assert!(v("1.0.1") > v("1"));
}

#[test]
fn test_suffix_compared_after_number() {
    assert!(v("1.0.1rc1") > v("1.0.0"));
    assert!(v("1.0.0rc2") > v("1.0.0rc1"));
    assert!(v("1.2.beta") > v("1.2.alpha"));
}

#[test]
fn test_display_keeps_source_text() {
    assert_eq!(v(" 1.0 ").to_string(), "1.0");
    let parsed: Version = "3.1.4".parse().unwrap();
    assert_eq!(parsed.as_str(), "3.1.4");
}

#[test]
fn test_serde_as_string() {
    let json = serde_json::to_string(&v("1.2.3")).unwrap();
    assert_eq!(json, "\"1.2.3\"");
    let back: Version = serde_json::from_str(&json).unwrap();
    assert_eq!(back, v("1.2.3"));
    assert!(serde_json::from_str::<Version>("\"\"").is_err());
}

// =============================================================================
// Ranges
// =============================================================================

#[test]
fn test_half_open_range_boundaries() {
    let range = VersionRange::between(v("1.0.0"), v("2.0.0"));
    assert!(version_in_range(&v("1.0.0"), &range));
    assert!(version_in_range(&v("1.9.9"), &range));
    assert!(!version_in_range(&v("2.0.0"), &range));
    assert!(!version_in_range(&v("0.9.9"), &range));
}

#[test]
fn test_exclusive_min_and_inclusive_max() {
    let range = VersionRange::new(
        Some(Bound::exclusive(v("1.0"))),
        Some(Bound::inclusive(v("2.0"))),
    );
    assert!(!range.contains(&v("1.0.0")));
    assert!(range.contains(&v("1.0.1")));
    assert!(range.contains(&v("2")));
}

#[test]
fn test_unbounded_sides() {
    assert!(VersionRange::any().contains(&v("0")));
    assert!(VersionRange::any().contains(&v("999.0")));
    assert!(VersionRange::at_least(v("1.5")).contains(&v("1.5")));
    assert!(!VersionRange::at_least(v("1.5")).contains(&v("1.4")));
    assert!(VersionRange::at_most(v("1.5")).contains(&v("1.5")));
    assert!(!VersionRange::at_most(v("1.5")).contains(&v("1.6")));
}

#[test]
fn test_exact_range() {
    let range = VersionRange::exactly(v("1.2"));
    assert!(range.contains(&v("1.2.0")));
    assert!(!range.contains(&v("1.2.1")));
}

#[test]
fn test_range_display() {
    assert_eq!(
        VersionRange::between(v("1.0.0"), v("2.0.0")).to_string(),
        "[1.0.0, 2.0.0)"
    );
    assert_eq!(VersionRange::any().to_string(), "(*, *)");
    assert_eq!(VersionRange::at_least(v("1")).to_string(), "[1, *)");
}
