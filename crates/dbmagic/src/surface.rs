//! Drawing surfaces.
//!
//! The [`Surface`] trait is the 2D canvas the renderer paints into. It works
//! like an immediate-mode canvas: a pixel size, a uniform scale transform
//! from diagram units to pixels, and draw calls issued in z-order. Resizing
//! resets the transform and discards everything drawn so far.
//!
//! - [`SvgSurface`] builds an SVG document and can rasterize it to PNG.
//! - [`RecordingSurface`] keeps a display list of [`DrawCommand`]s.

mod recording;
mod svg;

#[cfg(feature = "raster")]
mod raster;

pub use recording::{DrawCommand, RecordingSurface};
pub use self::svg::SvgSurface;

#[cfg(feature = "raster")]
pub use raster::svg_to_png;

use thiserror::Error;

use dbmagic_core::{
    color::Color,
    draw::{StrokeDefinition, TextAnchor, TextDefinition},
    geometry::{Bounds, Line},
    icon::IconKey,
    layout::PathCommand,
};

use crate::assets::IconImage;

/// Errors raised while encoding or writing a rendered surface.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to parse SVG for rasterization: {0}")]
    SvgParse(String),

    #[error("failed to allocate a {width}x{height} pixmap")]
    PixmapAlloc { width: u32, height: u32 },

    #[error("failed to encode PNG: {0}")]
    PngEncode(String),

    #[error("unsupported output format `{0}`, expected `svg` or `png`")]
    UnsupportedFormat(String),

    #[error("PNG output requires the `raster` feature")]
    RasterDisabled,
}

/// Size of a surface in device pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PixelSize {
    width: u32,
    height: u32,
}

impl PixelSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn width(self) -> u32 {
        self.width
    }

    pub fn height(self) -> u32 {
        self.height
    }

    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// An immediate-mode 2D canvas.
///
/// Coordinates passed to the draw methods are in diagram units; the surface
/// multiplies them by the current transform scale.
pub trait Surface {
    /// Sets the pixel size, discarding all content and resetting the transform.
    fn resize(&mut self, size: PixelSize);

    fn pixel_size(&self) -> PixelSize;

    /// Replaces the current transform with a uniform scale.
    fn set_transform(&mut self, scale: f32);

    fn scale(&self) -> f32;

    /// Erases every pixel, keeping size and transform.
    fn clear(&mut self);

    fn fill_rect(&mut self, bounds: Bounds, color: Color);

    fn fill_path(&mut self, path: &[PathCommand], color: Color);

    fn stroke_line(&mut self, line: Line, stroke: &StrokeDefinition);

    fn draw_text(&mut self, content: &str, anchor: TextAnchor, text: &TextDefinition);

    /// Draws `image` stretched into `bounds`.
    fn draw_icon(&mut self, key: IconKey, image: &IconImage, bounds: Bounds);
}

impl<S: Surface + ?Sized> Surface for &mut S {
    fn resize(&mut self, size: PixelSize) {
        (**self).resize(size);
    }

    fn pixel_size(&self) -> PixelSize {
        (**self).pixel_size()
    }

    fn set_transform(&mut self, scale: f32) {
        (**self).set_transform(scale);
    }

    fn scale(&self) -> f32 {
        (**self).scale()
    }

    fn clear(&mut self) {
        (**self).clear();
    }

    fn fill_rect(&mut self, bounds: Bounds, color: Color) {
        (**self).fill_rect(bounds, color);
    }

    fn fill_path(&mut self, path: &[PathCommand], color: Color) {
        (**self).fill_path(path, color);
    }

    fn stroke_line(&mut self, line: Line, stroke: &StrokeDefinition) {
        (**self).stroke_line(line, stroke);
    }

    fn draw_text(&mut self, content: &str, anchor: TextAnchor, text: &TextDefinition) {
        (**self).draw_text(content, anchor, text);
    }

    fn draw_icon(&mut self, key: IconKey, image: &IconImage, bounds: Bounds) {
        (**self).draw_icon(key, image, bounds);
    }
}
