use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        AmbientError::config("x")
            .to_string()
            .contains("config error:")
    );
    assert!(
        AmbientError::lifecycle("x")
            .to_string()
            .contains("lifecycle error:")
    );
}

#[test]
fn predicates_match_their_variant() {
    assert!(AmbientError::config("negative duration").is_config());
    assert!(!AmbientError::lifecycle("removed twice").is_config());
    assert!(AmbientError::lifecycle("removed twice").is_lifecycle());
    assert!(!AmbientError::config("negative duration").is_lifecycle());
}
