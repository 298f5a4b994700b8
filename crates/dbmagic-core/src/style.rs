//! The immutable drawing style shared by the layout engine and the renderer.
//!
//! A [`Style`] is built once (usually from configuration) and passed by
//! reference into every layout and render call. It carries the colors, the
//! three text styles and the [`LayoutMetrics`] that position everything.
//!
//! ```
//! # use dbmagic_core::{color::Color, draw::{FontWeight, TextKind}, style::Style};
//! let style = Style::default().with_background(Color::new("white").unwrap());
//!
//! let name = style.text(TextKind::PropertyName, false);
//! let key_name = style.text(TextKind::PropertyName, true);
//! assert!(key_name.font_weight() > name.font_weight());
//! ```

use crate::{
    color::Color,
    draw::{FontWeight, StrokeDefinition, TextDefinition, TextKind},
    layout::LayoutMetrics,
};

const SANS_FAMILY: &str = "Inter var, ui-sans-serif, system-ui, sans-serif, Apple Color Emoji, Segoe UI Emoji, Segoe UI Symbol, Noto Color Emoji";
const MONO_FAMILY: &str = "ui-monospace, SFMono-Regular, Menlo, Consolas, monospace";

fn color(css: &str) -> Color {
    Color::new(css).expect("built-in style colors are valid CSS")
}

/// Colors, text styles and metrics for one rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    background: Color,
    header_fill: Color,
    row_fill: Color,
    separator: StrokeDefinition,
    title_text: TextDefinition,
    property_text: TextDefinition,
    primary_key_text: TextDefinition,
    type_text: TextDefinition,
    metrics: LayoutMetrics,
}

impl Style {
    /// Resolves the text style for a text role.
    ///
    /// `primary_key` only affects [`TextKind::PropertyName`]: key columns are
    /// drawn with the heavier primary-key style.
    pub fn text(&self, kind: TextKind, primary_key: bool) -> &TextDefinition {
        match kind {
            TextKind::Title => &self.title_text,
            TextKind::PropertyName if primary_key => &self.primary_key_text,
            TextKind::PropertyName => &self.property_text,
            TextKind::PropertyType => &self.type_text,
        }
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn header_fill(&self) -> Color {
        self.header_fill
    }

    pub fn row_fill(&self) -> Color {
        self.row_fill
    }

    pub fn separator(&self) -> &StrokeDefinition {
        &self.separator
    }

    pub fn metrics(&self) -> &LayoutMetrics {
        &self.metrics
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    pub fn with_header_fill(mut self, color: Color) -> Self {
        self.header_fill = color;
        self
    }

    pub fn with_row_fill(mut self, color: Color) -> Self {
        self.row_fill = color;
        self
    }

    pub fn with_separator(mut self, stroke: StrokeDefinition) -> Self {
        self.separator = stroke;
        self
    }

    /// Replaces the text color of every text role.
    pub fn with_text_color(mut self, color: Color) -> Self {
        for text in [
            &mut self.title_text,
            &mut self.property_text,
            &mut self.primary_key_text,
            &mut self.type_text,
        ] {
            text.set_color(color);
        }
        self
    }

    /// Replaces the font family of the title and property-name roles.
    pub fn with_font_family(mut self, family: &str) -> Self {
        for text in [
            &mut self.title_text,
            &mut self.property_text,
            &mut self.primary_key_text,
        ] {
            text.set_font_family(family);
        }
        self
    }

    /// Replaces the font size of the title and property-name roles.
    pub fn with_font_size(mut self, size: u16) -> Self {
        for text in [
            &mut self.title_text,
            &mut self.property_text,
            &mut self.primary_key_text,
        ] {
            text.set_font_size(size);
        }
        self
    }

    pub fn with_type_text(mut self, text: TextDefinition) -> Self {
        self.type_text = text;
        self
    }

    /// Sets the weights used for regular and heavier (title, primary-key) text.
    pub fn with_font_weights(mut self, regular: FontWeight, heavy: FontWeight) -> Self {
        self.property_text.set_font_weight(regular);
        self.title_text.set_font_weight(heavy);
        self.primary_key_text.set_font_weight(heavy);
        self
    }

    pub fn with_metrics(mut self, metrics: LayoutMetrics) -> Self {
        self.metrics = metrics;
        self
    }
}

impl Default for Style {
    fn default() -> Self {
        let mut property_text = TextDefinition::new();
        property_text.set_font_family(SANS_FAMILY);
        property_text.set_font_size(15);
        property_text.set_font_weight(FontWeight::LIGHT);

        let mut heavy_text = property_text.clone();
        heavy_text.set_font_weight(FontWeight::MEDIUM);

        let mut type_text = TextDefinition::new();
        type_text.set_font_family(MONO_FAMILY);
        type_text.set_font_size(13);
        type_text.set_font_weight(FontWeight::LIGHT);
        type_text.set_color(color("rgb(180, 180, 180)"));

        Self {
            background: color("#121722"),
            header_fill: color("rgb(100, 100, 100)"),
            row_fill: color("rgb(50, 50, 50)"),
            separator: StrokeDefinition::new(color("rgb(100, 100, 100)"), 1.0),
            title_text: heavy_text.clone(),
            property_text,
            primary_key_text: heavy_text,
            type_text,
            metrics: LayoutMetrics::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_is_always_heavy() {
        let style = Style::default();
        let title = style.text(TextKind::Title, false);
        assert_eq!(title.font_weight(), FontWeight::MEDIUM);
        assert_eq!(style.text(TextKind::Title, true), title);
    }

    #[test]
    fn test_property_name_weight_follows_primary_key() {
        let style = Style::default();
        let regular = style.text(TextKind::PropertyName, false);
        let key = style.text(TextKind::PropertyName, true);
        assert!(key.font_weight() > regular.font_weight());
    }

    #[test]
    fn test_type_text_is_light_monospace_and_smaller() {
        let style = Style::default();
        let type_text = style.text(TextKind::PropertyType, false);
        let name = style.text(TextKind::PropertyName, false);

        assert_eq!(style.text(TextKind::PropertyType, true), type_text);
        assert!(type_text.font_family().contains("monospace"));
        assert!(type_text.font_size() < name.font_size());
        assert_eq!(type_text.font_weight(), FontWeight::LIGHT);
    }

    #[test]
    fn test_with_text_color_applies_to_every_role() {
        let red = Color::new("red").unwrap();
        let style = Style::default().with_text_color(red);
        for kind in [TextKind::Title, TextKind::PropertyName, TextKind::PropertyType] {
            assert_eq!(style.text(kind, false).color(), red);
            assert_eq!(style.text(kind, true).color(), red);
        }
    }

    #[test]
    fn test_with_font_weights() {
        let style = Style::default().with_font_weights(FontWeight::REGULAR, FontWeight::BOLD);
        assert_eq!(
            style.text(TextKind::PropertyName, false).font_weight(),
            FontWeight::REGULAR
        );
        assert_eq!(
            style.text(TextKind::PropertyName, true).font_weight(),
            FontWeight::BOLD
        );
        assert_eq!(style.text(TextKind::Title, false).font_weight(), FontWeight::BOLD);
    }
}
