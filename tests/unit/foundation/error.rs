use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(KineError::layout("x").to_string().contains("layout error:"));
    assert!(
        KineError::directive("x")
            .to_string()
            .contains("invalid directive:")
    );
    assert!(
        KineError::resource("x")
            .to_string()
            .contains("resource load error:")
    );
    assert!(
        KineError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(KineError::sink("x").to_string().contains("sink error:"));
    assert!(
        KineError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = KineError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn serde_json_errors_convert() {
    let err: KineError = serde_json::from_str::<u32>("nope").unwrap_err().into();
    assert!(matches!(err, KineError::Serde(_)));
}
