//! Integration tests for the DiagramBuilder API
//!
//! These tests load the documents under `tests/fixtures` and render them
//! through the public API only.

use std::{fs, path::PathBuf};

use dbmagic::{
    DbMagicError, DiagramBuilder,
    config::AppConfig,
    document::{DocumentError, DocumentFormat},
    model::ModelError,
};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn test_json_and_toml_documents_agree() {
    let builder = DiagramBuilder::default();
    let from_json = builder.load(fixture("tienda.json")).expect("Failed to load JSON");
    let from_toml = builder.load(fixture("tienda.toml")).expect("Failed to load TOML");

    assert_eq!(from_json, from_toml);
    assert_eq!(from_json.entities().len(), 2);
    assert_eq!(from_json.rows_count(), 6);
}

#[test]
fn test_render_fixture_to_svg() {
    let builder = DiagramBuilder::default();
    let diagram = builder.load(fixture("tienda.json")).expect("Failed to load");
    let svg = builder.render_svg(&diagram).expect("Failed to render");

    assert!(svg.starts_with("<svg"), "Output should be an SVG document");
    assert!(svg.contains("</svg>"), "Output should be complete SVG");
    for text in ["productos", "pais", "varchar(255)", "pais_id"] {
        assert!(svg.contains(text), "SVG should contain `{text}`");
    }
    assert!(svg.contains("data:image/svg+xml;base64,"));
}

#[test]
fn test_builder_reusability() {
    let builder = DiagramBuilder::default();
    let diagram = builder.load(fixture("tienda.json")).expect("Failed to load");

    let first = builder.render_svg(&diagram).expect("Failed first render");
    let second = builder.render_svg(&diagram).expect("Failed second render");
    assert_eq!(first, second);
}

#[test]
fn test_viewport_is_fitted_to_fixture() {
    let builder = DiagramBuilder::default();
    let diagram = builder.load(fixture("tienda.json")).expect("Failed to load");
    let svg = builder.render_svg(&diagram).expect("Failed to render");

    assert!(svg.contains(r#"width="790""#), "unexpected width in {svg}");
    assert!(svg.contains(r#"height="310""#), "unexpected height in {svg}");
}

#[test]
fn test_invalid_row_height_is_rejected() {
    let err = DiagramBuilder::default()
        .load(fixture("invalid_row_height.json"))
        .unwrap_err();

    match err {
        DbMagicError::Document(DocumentError::Invalid(ModelError::Entity { index, name, .. })) => {
            assert_eq!(index, 0);
            assert_eq!(name, "vacia");
        }
        other => panic!("expected an invalid entity error, got {other:?}"),
    }
}

#[test]
fn test_syntax_error_has_location() {
    let source = "{ \"entities\": [ { \"name\": } ] }";
    let err = DiagramBuilder::default()
        .parse(source, DocumentFormat::Json)
        .unwrap_err();

    let DbMagicError::Document(err) = err else {
        panic!("expected a document error");
    };
    let (src, span) = err.source_span().expect("syntax errors carry a span");
    assert_eq!(src, source);
    assert!(span.start <= source.len());
}

#[test]
fn test_missing_icon_makes_diagram_unavailable() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = dir.path().join("config.toml");
    fs::write(
        &config_path,
        format!(
            "[icons]\ntableIcon = \"missing.png\"\nroot = {:?}\n",
            dir.path().display().to_string()
        ),
    )
    .expect("Failed to write config");

    let config: AppConfig =
        toml::from_str(&fs::read_to_string(&config_path).expect("Failed to read config"))
            .expect("Failed to parse config");
    let builder = DiagramBuilder::new(config);
    let diagram = builder.load(fixture("tienda.json")).expect("Failed to load");

    let err = builder.render_svg(&diagram).unwrap_err();
    let DbMagicError::Asset(err) = err else {
        panic!("expected an asset error, got {err:?}");
    };
    assert_eq!(err.failures().len(), 1);
    assert_eq!(err.failures()[0].locator(), "missing.png");
}

#[cfg(feature = "raster")]
#[test]
fn test_render_fixture_to_png() {
    let builder = DiagramBuilder::default();
    let diagram = builder.load(fixture("tienda.json")).expect("Failed to load");
    let png = builder.render_png(&diagram).expect("Failed to render PNG");

    assert!(png.starts_with(b"\x89PNG\r\n\x1a\n"));
}
