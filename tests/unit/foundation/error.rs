use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        EaselError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        EaselError::persistence("x")
            .to_string()
            .contains("persistence error:")
    );
    assert!(EaselError::hook("x").to_string().contains("hook error:"));
    assert!(
        EaselError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn io_and_other_preserve_source() {
    let err: EaselError = std::io::Error::other("disk gone").into();
    assert!(err.to_string().contains("disk gone"));

    let err = EaselError::Other(anyhow::anyhow!("boom"));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn serde_json_errors_map_to_serde_variant() {
    let parse = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
    let err: EaselError = parse.into();
    assert!(matches!(err, EaselError::Serde(_)));
}
