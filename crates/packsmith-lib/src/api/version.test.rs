use super::*;

fn v(input: &str) -> PackageVersion {
    input.parse().unwrap()
}

#[test]
fn test_short_forms_pad_with_zero() {
    assert_eq!(v("1"), PackageVersion::new(1, 0, 0));
    assert_eq!(v("1.0"), v("1.0.0"));
    assert_eq!(v("v2.3.1"), PackageVersion::new(2, 3, 1));
    assert_eq!(v(" V0.9 "), PackageVersion::new(0, 9, 0));
}

#[test]
fn test_revision_component_orders() {
    assert!(v("1.2.3.4") > v("1.2.3"));
    assert!(v("1.2.3.4") < v("1.2.4"));
    assert_eq!(v("1.2.3.0"), v("1.2.3"));
}

#[test]
fn test_prerelease_sorts_before_release() {
    assert!(v("1.0.0-beta") < v("1.0.0"));
    assert!(v("1.0.0-alpha") < v("1.0.0-beta"));
    assert!(v("1.0.0-rc.1") > v("0.9.9"));
    assert!(v("1.0.0-beta").is_prerelease());
    assert!(!v("1.0.0").is_prerelease());
}

#[test]
fn test_prerelease_labels_ignore_case() {
    assert_eq!(v("1.0.0-Beta"), v("1.0.0-beta"));
    assert_eq!(v("2.1.0-RC.2").cmp(&v("2.1.0-rc.2")), Ordering::Equal);
    assert!(v("1.0.0-ALPHA") < v("1.0.0-beta"));
    assert_eq!(v("1.0.0-Beta").to_string(), "1.0.0-beta");
}

#[test]
fn test_build_metadata_ignored() {
    assert_eq!(v("1.0.0+abc"), v("1.0.0+def"));
    assert_eq!(v("1.0.0+abc").to_string(), "1.0.0");
}

#[test]
fn test_display_round_trips() {
    for input in ["1.2.3", "1.2.3.4", "2.0.0-preview.1"] {
        assert_eq!(v(input).to_string(), input);
    }
}

#[test]
fn test_invalid_versions() {
    assert_eq!("".parse::<PackageVersion>(), Err(VersionError::Empty));
    assert_eq!("  v ".parse::<PackageVersion>(), Err(VersionError::Empty));
    assert!("1.x".parse::<PackageVersion>().is_err());
    assert!("1.2.3.4.5".parse::<PackageVersion>().is_err());
    assert!("1.0.0-".parse::<PackageVersion>().is_err());
    assert_eq!(PackageVersion::parse_lenient("latest"), None);
}

#[test]
fn test_serde_as_string() {
    let json = serde_json::to_string(&v("1.4")).unwrap();
    assert_eq!(json, "\"1.4.0\"");
    let back: PackageVersion = serde_json::from_str("\"1.4.0.2\"").unwrap();
    assert_eq!(back, v("1.4.0.2"));
}
