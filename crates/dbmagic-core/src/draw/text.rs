//! Text styling and anchoring definitions.
//!
//! # Overview
//!
//! - [`TextDefinition`] - Reusable text style configuration (family, size, weight, color)
//! - [`FontWeight`] - CSS numeric font weight
//! - [`TextKind`] - The closed set of text roles drawn on an entity
//! - [`TextAnchor`] / [`TextAlign`] - Where a run of text is placed and how it aligns
//!
//! # Quick Start
//!
//! ```
//! # use dbmagic_core::draw::{FontWeight, TextDefinition};
//! let mut style = TextDefinition::new();
//! style.set_font_family("monospace");
//! style.set_font_size(13);
//! style.set_font_weight(FontWeight::LIGHT);
//! assert_eq!(style.font_size(), 13);
//! ```

use serde::Deserialize;

use crate::{color::Color, geometry::Point};

/// A CSS numeric font weight (100-900).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(transparent)]
pub struct FontWeight(u16);

impl FontWeight {
    pub const LIGHT: Self = Self(300);
    pub const REGULAR: Self = Self(400);
    pub const MEDIUM: Self = Self(500);
    pub const BOLD: Self = Self(700);

    pub fn new(weight: u16) -> Self {
        Self(weight)
    }

    pub fn value(self) -> u16 {
        self.0
    }

    /// Whether the weight lies in the CSS range 100 to 900.
    pub fn is_in_css_range(self) -> bool {
        (100..=900).contains(&self.0)
    }
}

impl Default for FontWeight {
    fn default() -> Self {
        Self::REGULAR
    }
}

/// Defines the visual style for text drawn on the surface.
///
/// # Default Values
///
/// | Property | Default |
/// |----------|---------|
/// | Font family | `"sans-serif"` |
/// | Font size | `15` |
/// | Font weight | `400` |
/// | Color | `white` |
#[derive(Debug, Clone, PartialEq)]
pub struct TextDefinition {
    font_family: String,
    font_size: u16,
    font_weight: FontWeight,
    color: Color,
}

impl TextDefinition {
    /// Creates a new text definition with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the font size in pixels.
    pub fn set_font_size(&mut self, size: u16) {
        self.font_size = size;
    }

    /// Sets the font family for the text.
    ///
    /// # Arguments
    ///
    /// * `family` - The font family list (e.g., "Inter var, ui-sans-serif, sans-serif")
    pub fn set_font_family(&mut self, family: &str) {
        self.font_family = family.to_string();
    }

    /// Sets the font weight.
    pub fn set_font_weight(&mut self, weight: FontWeight) {
        self.font_weight = weight;
    }

    /// Sets the fill color of the glyphs.
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn font_size(&self) -> u16 {
        self.font_size
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    pub fn font_weight(&self) -> FontWeight {
        self.font_weight
    }

    pub fn color(&self) -> Color {
        self.color
    }
}

impl Default for TextDefinition {
    fn default() -> Self {
        Self {
            font_family: "sans-serif".to_string(),
            font_size: 15,
            font_weight: FontWeight::default(),
            color: Color::new("white").expect("'white' is a valid CSS color"),
        }
    }
}

/// The role a run of text plays on an entity.
///
/// Each role resolves to exactly one [`TextDefinition`] in
/// [`Style`](crate::style::Style); property names additionally depend on the
/// row's primary-key flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextKind {
    /// Entity name drawn in the header
    Title,
    /// Column name drawn on the left of a property row
    PropertyName,
    /// Column type drawn right-aligned on a property row
    PropertyType,
}

/// Horizontal alignment of text relative to its anchor point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextAlign {
    /// The anchor is the left edge of the text
    #[default]
    Start,
    /// The anchor is the right edge of the text
    End,
}

impl TextAlign {
    /// Returns the SVG `text-anchor` value
    pub fn to_svg_value(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::End => "end",
        }
    }
}

/// Position of a text baseline together with its alignment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextAnchor {
    position: Point,
    align: TextAlign,
}

impl TextAnchor {
    pub fn new(position: Point, align: TextAlign) -> Self {
        Self { position, align }
    }

    /// Returns the baseline anchor point
    pub fn position(self) -> Point {
        self.position
    }

    pub fn x(self) -> f32 {
        self.position.x()
    }

    pub fn y(self) -> f32 {
        self.position.y()
    }

    pub fn align(self) -> TextAlign {
        self.align
    }
}
