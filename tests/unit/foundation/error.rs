use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        PosterError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(PosterError::render("x").to_string().contains("render error:"));
    assert!(
        PosterError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn missing_file_names_the_path() {
    let err = PosterError::missing_file("templates/default/cover.png");
    let msg = err.to_string();
    assert!(msg.starts_with("missing file:"));
    assert!(msg.contains("templates/default/cover.png"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = PosterError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
