//! Stroke definitions for separator lines.
//!
//! A [`StrokeDefinition`] carries the color and width of a line. Surfaces
//! that emit SVG apply it with [`apply_stroke!`](crate::apply_stroke!).
//!
//! ```
//! use dbmagic_core::{color::Color, draw::StrokeDefinition};
//!
//! let mut separator = StrokeDefinition::new(Color::new("rgb(100, 100, 100)").unwrap(), 1.0);
//! separator.set_width(2.0);
//! assert_eq!(separator.width(), 2.0);
//! ```

use crate::color::Color;

/// Color and width of a stroked line.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeDefinition {
    color: Color,
    width: f32,
}

impl StrokeDefinition {
    pub fn new(color: Color, width: f32) -> Self {
        Self { color, width }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// Line width in diagram units.
    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn set_width(&mut self, width: f32) {
        self.width = width;
    }
}

impl Default for StrokeDefinition {
    /// A black line one unit wide.
    fn default() -> Self {
        Self::new(Color::default(), 1.0)
    }
}

/// Sets `stroke`, `stroke-opacity` and `stroke-width` on an SVG element.
///
/// ```
/// use dbmagic_core::{color::Color, draw::StrokeDefinition};
/// use svg::node::element as svg_element;
///
/// let stroke = StrokeDefinition::new(Color::new("black").unwrap(), 1.0);
/// let line = svg_element::Line::new().set("x2", 100);
/// let line = dbmagic_core::apply_stroke!(line, &stroke);
/// ```
#[macro_export]
macro_rules! apply_stroke {
    ($element:expr, $stroke:expr) => {{
        $element
            .set("stroke", $stroke.color().to_string())
            .set("stroke-opacity", $stroke.color().alpha())
            .set("stroke-width", $stroke.width())
    }};
}
