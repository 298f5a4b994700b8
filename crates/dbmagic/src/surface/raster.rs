//! PNG output by rasterizing the SVG surface.

use log::debug;

use super::ExportError;

/// Renders an SVG document to PNG bytes at its own pixel size.
///
/// Text is shaped with the fonts installed on the system, so glyphs may
/// differ slightly between machines.
///
/// # Errors
///
/// Returns an [`ExportError`] if the SVG cannot be parsed, has an empty size,
/// or the PNG encoder fails.
pub fn svg_to_png(svg: &str) -> Result<Vec<u8>, ExportError> {
    let mut opt = usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_str(svg, &opt).map_err(|err| ExportError::SvgParse(err.to_string()))?;

    let size = tree.size().to_int_size();
    let (width, height) = (size.width(), size.height());
    let mut pixmap =
        tiny_skia::Pixmap::new(width, height).ok_or(ExportError::PixmapAlloc { width, height })?;

    resvg::render(&tree, tiny_skia::Transform::identity(), &mut pixmap.as_mut());
    debug!(width, height; "SVG rasterized");

    pixmap
        .encode_png()
        .map_err(|err| ExportError::PngEncode(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

    #[test]
    fn test_svg_to_png_produces_png_signature() {
        let svg = r##"<svg xmlns="http://www.w3.org/2000/svg" width="20" height="10"><rect width="20" height="10" fill="#121722"/></svg>"##;
        let png = svg_to_png(svg).unwrap();
        assert!(png.starts_with(PNG_SIGNATURE));
    }

    #[test]
    fn test_invalid_svg_is_rejected() {
        assert!(matches!(
            svg_to_png("<not-svg"),
            Err(ExportError::SvgParse(_))
        ));
    }
}
