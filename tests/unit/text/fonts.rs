use super::*;

const FIXTURE_FONT: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/DejaVuSans.ttf");

fn fixture_registry() -> FontRegistry {
    let mut reg = FontRegistry::new();
    reg.register_file(Path::new(FIXTURE_FONT), "Display").unwrap();
    reg
}

#[test]
fn empty_registry_shapes_nothing() {
    let mut reg = FontRegistry::new();
    assert!(reg.is_empty());
    assert!(reg.shape("hello", "Any", 24.0, Rgba8::BLACK).is_none());
}

#[test]
fn garbage_bytes_fail_to_register() {
    let mut reg = FontRegistry::new();
    assert!(reg.register_bytes(b"not a font".to_vec(), "Bad").is_err());
    assert!(reg.is_empty());
}

#[test]
fn missing_font_files_are_skipped_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let defs = vec![FontDef {
        path: "fonts/missing.ttf".into(),
        family: "Missing".to_string(),
    }];
    let reg = FontRegistry::from_defs(&defs, dir.path());
    assert!(reg.is_empty());
}

#[test]
fn shaping_measures_width_and_falls_back() {
    let mut reg = fixture_registry();
    assert!(!reg.is_empty());

    let short = reg.shape("hi", "Display", 32.0, Rgba8::BLACK).unwrap();
    let long = reg.shape("hi there", "Display", 32.0, Rgba8::BLACK).unwrap();
    assert!(!short.glyphs.is_empty());
    assert!(long.width > short.width);

    // Unknown families fall back to the first registered font.
    assert!(reg.shape("hi", "Nope", 32.0, Rgba8::BLACK).is_some());
    // The font's own family name resolves too.
    assert!(reg.shape("hi", "DejaVu Sans", 32.0, Rgba8::BLACK).is_some());
}

#[test]
fn shaped_glyphs_advance_along_the_baseline() {
    let mut reg = fixture_registry();
    let span = reg.shape("hello", "Display", 32.0, Rgba8::BLACK).unwrap();
    assert_eq!(span.glyphs.len(), 5);

    let xs: Vec<f32> = span.glyphs.iter().map(|g| g.x).collect();
    assert!(xs.windows(2).all(|w| w[1] > w[0]), "x positions: {xs:?}");
    assert!(*xs.last().unwrap() < span.width);

    let baseline = span.glyphs[0].y;
    assert!(baseline > 0.0 && baseline < 32.0 * 1.5, "baseline {baseline}");
    assert!(span.glyphs.iter().all(|g| g.y == baseline));
}

#[test]
fn from_defs_registers_declared_fonts() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR"));
    let defs = vec![FontDef {
        path: "tests/data/DejaVuSans.ttf".into(),
        family: "Body".to_string(),
    }];
    let mut reg = FontRegistry::from_defs(&defs, root);
    assert!(!reg.is_empty());
    assert!(reg.shape("ok", "Body", 20.0, Rgba8::BLACK).is_some());
}
