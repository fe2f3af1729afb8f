use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        CardError::config("x")
            .to_string()
            .contains("invalid configuration:")
    );
    assert!(
        CardError::font("x")
            .to_string()
            .contains("font unavailable:")
    );
    assert!(CardError::encode("x").to_string().contains("encode error:"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = CardError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
    assert!(!err.is_setup_error());
}

#[test]
fn setup_errors_are_classified() {
    assert!(CardError::config("x").is_setup_error());
    assert!(CardError::font("x").is_setup_error());
    assert!(!CardError::encode("x").is_setup_error());
}
