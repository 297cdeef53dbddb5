use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(DramaError::load("x").to_string().contains("load error:"));
    assert!(DramaError::parse("x").to_string().contains("parse error:"));
    assert!(
        DramaError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        DramaError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = DramaError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn load_failures_are_classified() {
    assert!(DramaError::load("gone").is_load_failure());
    assert!(DramaError::parse("bad json").is_load_failure());
    assert!(!DramaError::validation("no such play").is_load_failure());
}
