use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        GraphPaperError::config("x")
            .to_string()
            .contains("configuration error:")
    );
    assert!(
        GraphPaperError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        GraphPaperError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = GraphPaperError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
    assert!(!err.is_config());
}

#[test]
fn config_is_flagged() {
    assert!(GraphPaperError::config("cell size").is_config());
    assert!(!GraphPaperError::validation("dst").is_config());
}
