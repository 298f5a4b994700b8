//! CLI logic for the dbMagic diagram tool.
//!
//! Loads a diagram document, renders it with the configured style and
//! icons, and writes an SVG or PNG file.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::{fs, path::Path};

use log::info;

use dbmagic::{DbMagicError, DiagramBuilder, surface::ExportError};

/// Output file type, picked from the output path's extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Svg,
    Png,
}

impl OutputFormat {
    fn from_path(path: &Path) -> Result<Self, ExportError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            None => Ok(Self::Svg),
            Some(ext) if ext.eq_ignore_ascii_case("svg") => Ok(Self::Svg),
            Some(ext) if ext.eq_ignore_ascii_case("png") => Ok(Self::Png),
            Some(ext) => Err(ExportError::UnsupportedFormat(ext.to_string())),
        }
    }
}

/// Run the dbMagic CLI application
///
/// # Errors
///
/// Returns `DbMagicError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Document errors
/// - Icon loading errors
/// - Export errors
pub fn run(args: &Args) -> Result<(), DbMagicError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing diagram"
    );

    let output_format = OutputFormat::from_path(Path::new(&args.output))?;

    let app_config = config::load_config(args.config.as_ref())?;
    let app_config = config::apply_overrides(app_config, args);

    let builder = DiagramBuilder::new(app_config);
    let diagram = builder.load(&args.input)?;

    match output_format {
        OutputFormat::Svg => {
            let svg = builder.render_svg(&diagram)?;
            fs::write(&args.output, svg)?;
            info!(output_file = args.output; "SVG exported successfully");
        }
        OutputFormat::Png => {
            let png = render_png(&builder, &diagram)?;
            fs::write(&args.output, png)?;
            info!(output_file = args.output; "PNG exported successfully");
        }
    }

    Ok(())
}

#[cfg(feature = "raster")]
fn render_png(
    builder: &DiagramBuilder,
    diagram: &dbmagic::model::Diagram,
) -> Result<Vec<u8>, DbMagicError> {
    builder.render_png(diagram)
}

#[cfg(not(feature = "raster"))]
fn render_png(
    _builder: &DiagramBuilder,
    _diagram: &dbmagic::model::Diagram,
) -> Result<Vec<u8>, DbMagicError> {
    Err(ExportError::RasterDisabled.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_from_extension() {
        assert_eq!(
            OutputFormat::from_path(Path::new("out.svg")).unwrap(),
            OutputFormat::Svg
        );
        assert_eq!(
            OutputFormat::from_path(Path::new("out.PNG")).unwrap(),
            OutputFormat::Png
        );
        assert_eq!(
            OutputFormat::from_path(Path::new("out")).unwrap(),
            OutputFormat::Svg
        );
        assert!(matches!(
            OutputFormat::from_path(Path::new("out.pdf")),
            Err(ExportError::UnsupportedFormat(ext)) if ext == "pdf"
        ));
    }
}
