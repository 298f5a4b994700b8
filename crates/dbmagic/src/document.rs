//! Loading the declarative diagram document.
//!
//! A document is an ordered list of entity records, written either as JSON or
//! as TOML. Records are deserialized with `serde` into plain structs and then
//! converted into the validated [`Diagram`] model. One malformed entity aborts
//! the whole document.
//!
//! ```
//! use dbmagic::document::{DocumentFormat, parse_document};
//!
//! let source = r#"{
//!     "entities": [{
//!         "name": "productos", "x": 100, "y": 50, "width": 300, "height": 50,
//!         "properties": { "rowHeight": 40, "rows": [{ "name": "id", "type": "int", "pk": true }] }
//!     }]
//! }"#;
//!
//! let diagram = parse_document(source, DocumentFormat::Json).unwrap();
//! assert_eq!(diagram.entities()[0].name(), "productos");
//! assert!(diagram.entities()[0].rows()[0].is_primary_key());
//! ```

use std::{fmt, fs, ops::Range, path::Path};

use log::{debug, info};
use serde::Deserialize;
use thiserror::Error;

use dbmagic_core::{
    geometry::{Point, Size},
    model::{Diagram, Entity, ModelError, PropertyBlock, PropertyRow},
};

use crate::DbMagicError;

/// Errors raised while reading a diagram document.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The text is not valid JSON/TOML or does not match the document shape.
    #[error("{format} syntax error at line {line}, column {column}: {message}")]
    Syntax {
        format: DocumentFormat,
        message: String,
        line: usize,
        column: usize,
        /// Byte range of the offending text, when the parser reports one.
        span: Option<Range<usize>>,
        src: String,
    },

    /// The document parsed but describes an invalid diagram.
    #[error("invalid diagram: {0}")]
    Invalid(#[from] ModelError),
}

impl DocumentError {
    /// Returns the source text and byte span of a syntax error.
    pub fn source_span(&self) -> Option<(&str, Range<usize>)> {
        match self {
            Self::Syntax {
                src,
                span: Some(span),
                ..
            } => Some((src.as_str(), span.clone())),
            _ => None,
        }
    }
}

/// Serialization format of a diagram document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DocumentFormat {
    #[default]
    Json,
    Toml,
}

impl DocumentFormat {
    /// Picks the format from the file extension; anything but `.toml` is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Self::Toml,
            _ => Self::Json,
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => f.write_str("JSON"),
            Self::Toml => f.write_str("TOML"),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DocumentRecord {
    entities: Vec<EntityRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct EntityRecord {
    name: String,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    properties: PropertiesRecord,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PropertiesRecord {
    #[serde(rename = "rowHeight", alias = "height")]
    row_height: f32,
    #[serde(default)]
    rows: Vec<RowRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RowRecord {
    name: String,
    #[serde(rename = "type", default)]
    data_type: String,
    #[serde(rename = "isPrimaryKey", alias = "pk", alias = "primaryKey", default)]
    primary_key: bool,
    #[serde(rename = "isNotNullable", alias = "nn", alias = "notNullable", default)]
    not_nullable: bool,
}

impl EntityRecord {
    fn into_entity(self) -> Result<Entity, ModelError> {
        let rows = self
            .properties
            .rows
            .into_iter()
            .map(|row| {
                PropertyRow::new(row.name, row.data_type)
                    .with_primary_key(row.primary_key)
                    .with_not_nullable(row.not_nullable)
            })
            .collect();
        let properties = PropertyBlock::new(self.properties.row_height, rows)?;

        Entity::new(
            self.name,
            Point::new(self.x, self.y),
            Size::new(self.width, self.height),
            properties,
        )
    }
}

/// Parses and validates a diagram document.
///
/// # Errors
///
/// Returns [`DocumentError::Syntax`] for malformed text or a record that does
/// not match the document shape, and [`DocumentError::Invalid`] for an entity
/// with a non-positive or non-finite dimension.
pub fn parse_document(source: &str, format: DocumentFormat) -> Result<Diagram, DocumentError> {
    let record: DocumentRecord = match format {
        DocumentFormat::Json => {
            serde_json::from_str(source).map_err(|err| json_syntax_error(&err, source))?
        }
        DocumentFormat::Toml => {
            toml::from_str(source).map_err(|err| toml_syntax_error(&err, source))?
        }
    };

    let entities = record
        .entities
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            let name = record.name.clone();
            record
                .into_entity()
                .map_err(|err| err.in_entity(index, name))
        })
        .collect::<Result<Vec<_>, _>>()?;

    debug!(format:% = format, entities_count = entities.len(); "Document parsed");
    Ok(Diagram::new(entities))
}

/// Reads a diagram document from disk, picking the format from the extension.
///
/// # Errors
///
/// Returns [`DbMagicError::Io`] if the file cannot be read, or
/// [`DbMagicError::Document`] if it does not describe a valid diagram.
pub fn load_document(path: impl AsRef<Path>) -> Result<Diagram, DbMagicError> {
    let path = path.as_ref();
    let format = DocumentFormat::from_path(path);
    info!(path = path.display().to_string(), format:% = format; "Loading diagram document");

    let source = fs::read_to_string(path)?;
    Ok(parse_document(&source, format)?)
}

fn json_syntax_error(err: &serde_json::Error, source: &str) -> DocumentError {
    let (line, column) = (err.line(), err.column());
    let offset = offset_of(source, line, column);

    // serde_json appends " at line L column C" to its messages
    let message = err.to_string();
    let message = message
        .split(" at line ")
        .next()
        .unwrap_or(&message)
        .to_string();

    DocumentError::Syntax {
        format: DocumentFormat::Json,
        message,
        line,
        column,
        span: offset.map(|start| start..start),
        src: source.to_string(),
    }
}

fn toml_syntax_error(err: &toml::de::Error, source: &str) -> DocumentError {
    let span = err.span();
    let (line, column) = span
        .as_ref()
        .map(|span| line_column_of(source, span.start))
        .unwrap_or((0, 0));

    DocumentError::Syntax {
        format: DocumentFormat::Toml,
        message: err.message().to_string(),
        line,
        column,
        span,
        src: source.to_string(),
    }
}

/// Converts a 1-based line and column into a byte offset into `source`.
fn offset_of(source: &str, line: usize, column: usize) -> Option<usize> {
    if line == 0 {
        return None;
    }

    let line_start = source
        .split_inclusive('\n')
        .take(line - 1)
        .map(str::len)
        .sum::<usize>();
    let offset = line_start + column.saturating_sub(1);

    Some(offset.min(source.len()))
}

/// Converts a byte offset into a 1-based line and column.
fn line_column_of(source: &str, offset: usize) -> (usize, usize) {
    let prefix = &source.as_bytes()[..offset.min(source.len())];
    let line = prefix.iter().filter(|&&byte| byte == b'\n').count() + 1;
    let line_start = prefix
        .iter()
        .rposition(|&byte| byte == b'\n')
        .map_or(0, |pos| pos + 1);

    (line, prefix.len() - line_start + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    const JSON_DOCUMENT: &str = r#"{
  "entities": [
    {
      "name": "productos", "x": 100, "y": 50, "width": 300, "height": 50,
      "properties": {
        "rowHeight": 40,
        "rows": [
          { "name": "id", "type": "int", "isPrimaryKey": true, "isNotNullable": true },
          { "name": "nombre", "type": "varchar(255)" }
        ]
      }
    },
    {
      "name": "pais", "x": 600, "y": 300, "width": 250, "height": 38,
      "properties": { "height": 36, "rows": [ { "name": "codigo", "pk": true, "nn": true } ] }
    }
  ]
}"#;

    #[test]
    fn test_parse_json_document() {
        let diagram = parse_document(JSON_DOCUMENT, DocumentFormat::Json).unwrap();
        assert_eq!(diagram.entities().len(), 2);

        let productos = &diagram.entities()[0];
        assert_eq!(productos.name(), "productos");
        assert_eq!(productos.x(), 100.0);
        assert_eq!(productos.properties().row_height(), 40.0);
        assert_eq!(productos.rows()[1].data_type(), "varchar(255)");
        assert!(!productos.rows()[1].is_primary_key());

        let pais = &diagram.entities()[1];
        assert_eq!(pais.properties().row_height(), 36.0);
        assert_eq!(pais.rows()[0].data_type(), "");
        assert!(pais.rows()[0].is_primary_key());
        assert!(pais.rows()[0].is_not_nullable());
    }

    #[test]
    fn test_parse_toml_document() {
        let source = r#"
[[entities]]
name = "productos"
x = 100
y = 50
width = 300
height = 50

[entities.properties]
rowHeight = 40.5

[[entities.properties.rows]]
name = "id"
type = "int"
primaryKey = true
notNullable = true
"#;
        let diagram = parse_document(source, DocumentFormat::Toml).unwrap();
        let entity = &diagram.entities()[0];
        assert_eq!(entity.width(), 300.0);
        assert_eq!(entity.properties().row_height(), 40.5);
        assert!(entity.rows()[0].is_primary_key());
        assert!(entity.rows()[0].is_not_nullable());
    }

    #[test]
    fn test_invalid_dimension_names_entity() {
        let source = r#"{ "entities": [
            { "name": "ok", "x": 0, "y": 0, "width": 10, "height": 10, "properties": { "rowHeight": 10 } },
            { "name": "broken", "x": 0, "y": 0, "width": 10, "height": 0, "properties": { "rowHeight": 10 } }
        ] }"#;

        let err = parse_document(source, DocumentFormat::Json).unwrap_err();
        match err {
            DocumentError::Invalid(ModelError::Entity { index, name, source }) => {
                assert_eq!(index, 1);
                assert_eq!(name, "broken");
                assert!(matches!(
                    *source,
                    ModelError::InvalidDimension { field: "height", .. }
                ));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_non_positive_row_height_is_rejected() {
        let source = r#"{ "entities": [
            { "name": "t", "x": 0, "y": 0, "width": 10, "height": 10, "properties": { "rowHeight": -4 } }
        ] }"#;

        let err = parse_document(source, DocumentFormat::Json).unwrap_err();
        assert!(err.to_string().contains("rowHeight"));
    }

    #[test]
    fn test_missing_field_is_syntax_error() {
        let source = r#"{ "entities": [ { "name": "t", "x": 0, "y": 0, "width": 10 } ] }"#;
        let err = parse_document(source, DocumentFormat::Json).unwrap_err();
        assert!(matches!(err, DocumentError::Syntax { .. }));
        assert!(err.to_string().contains("missing field"));
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let source = r#"{ "entities": [], "relations": [] }"#;
        let err = parse_document(source, DocumentFormat::Json).unwrap_err();
        assert!(err.to_string().contains("unknown field"));
    }

    #[test]
    fn test_json_syntax_error_location() {
        let source = "{\n  \"entities\": [\n    {,\n  ]\n}";
        let err = parse_document(source, DocumentFormat::Json).unwrap_err();

        let DocumentError::Syntax { line, .. } = &err else {
            panic!("expected syntax error, got {err:?}");
        };
        assert_eq!(*line, 3);

        let (src, span) = err.source_span().unwrap();
        assert_eq!(src, source);
        assert_eq!(&source[span.start..span.start + 1], ",");
    }

    #[test]
    fn test_toml_syntax_error_location() {
        let source = "[[entities]]\nname = \n";
        let err = parse_document(source, DocumentFormat::Toml).unwrap_err();
        let DocumentError::Syntax { line, format, .. } = &err else {
            panic!("expected syntax error, got {err:?}");
        };
        assert_eq!(*format, DocumentFormat::Toml);
        assert_eq!(*line, 2);
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            DocumentFormat::from_path(Path::new("diagram.toml")),
            DocumentFormat::Toml
        );
        assert_eq!(
            DocumentFormat::from_path(Path::new("diagram.TOML")),
            DocumentFormat::Toml
        );
        assert_eq!(
            DocumentFormat::from_path(Path::new("diagram.json")),
            DocumentFormat::Json
        );
        assert_eq!(
            DocumentFormat::from_path(Path::new("diagram")),
            DocumentFormat::Json
        );
    }

    #[test]
    fn test_line_column_helpers() {
        let source = "ab\ncde\nf";
        assert_eq!(offset_of(source, 2, 2), Some(4));
        assert_eq!(line_column_of(source, 4), (2, 2));
        assert_eq!(offset_of(source, 0, 0), None);
        assert_eq!(line_column_of(source, 0), (1, 1));
    }
}
