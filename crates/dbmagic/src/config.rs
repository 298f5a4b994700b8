//! Configuration types for dbMagic diagram rendering.
//!
//! All types implement [`serde::Deserialize`] and are usually loaded from a
//! TOML file. Every field is optional; anything left out falls back to the
//! built-in default.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining the sections below.
//! - [`StyleConfig`] - Colors, fonts and the header corner radius.
//! - [`IconConfig`] - Where each icon is loaded from.
//! - [`ViewConfig`] - Viewport size, device pixel ratio and zoom.
//!
//! # Example
//!
//! ```
//! # use dbmagic::config::AppConfig;
//! let config: AppConfig = toml::from_str(r##"
//!     [style]
//!     background_color = "white"
//!     text_color = "#1f2937"
//!
//!     [icons]
//!     tableIcon = "icons/table.png"
//!
//!     [view]
//!     zoom = 1.5
//! "##).unwrap();
//!
//! assert!(config.style().to_style().is_ok());
//! assert_eq!(config.view().zoom(), 1.5);
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use dbmagic_core::{
    color::Color,
    draw::{FontWeight, TextKind},
    icon::IconKey,
    layout::LayoutMetrics,
    style::Style,
};

use crate::assets::IconSet;

/// Top-level configuration combining style, icon and view settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,

    /// Icon locator section.
    #[serde(default)]
    icons: IconConfig,

    /// Viewport section.
    #[serde(default)]
    view: ViewConfig,
}

impl AppConfig {
    pub fn new(style: StyleConfig, icons: IconConfig, view: ViewConfig) -> Self {
        Self { style, icons, view }
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    pub fn icons(&self) -> &IconConfig {
        &self.icons
    }

    pub fn view(&self) -> &ViewConfig {
        &self.view
    }

    /// Replaces the view section, e.g. with command-line overrides.
    pub fn with_view(mut self, view: ViewConfig) -> Self {
        self.view = view;
        self
    }
}

/// Visual styling overrides.
///
/// Colors are CSS color strings. Fields that are not set keep the default
/// dark theme.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct StyleConfig {
    #[serde(default)]
    background_color: Option<String>,

    /// Fill of entity headers.
    #[serde(default)]
    header_color: Option<String>,

    /// Fill of property rows.
    #[serde(default)]
    row_color: Option<String>,

    #[serde(default)]
    separator_color: Option<String>,

    #[serde(default)]
    separator_width: Option<f32>,

    /// Color of every text run.
    #[serde(default)]
    text_color: Option<String>,

    /// Color of column type text, applied after `text_color`.
    #[serde(default)]
    type_text_color: Option<String>,

    /// Font family of titles and property names.
    #[serde(default)]
    font_family: Option<String>,

    #[serde(default)]
    font_size: Option<u16>,

    /// Font family of column type text.
    #[serde(default)]
    type_font_family: Option<String>,

    #[serde(default)]
    type_font_size: Option<u16>,

    /// Weight of regular property names.
    #[serde(default)]
    font_weight: Option<FontWeight>,

    /// Weight of titles and primary-key property names.
    #[serde(default)]
    heavy_font_weight: Option<FontWeight>,

    /// Radius of the header's top corners.
    #[serde(default)]
    corner_radius: Option<f32>,
}

impl StyleConfig {
    /// Builds the [`Style`] described by this section.
    ///
    /// # Errors
    ///
    /// Returns an error if a color string cannot be parsed, or a size, width
    /// or radius is out of range.
    pub fn to_style(&self) -> Result<Style, String> {
        let mut style = Style::default();

        if let Some(color) = parse_color("background_color", &self.background_color)? {
            style = style.with_background(color);
        }
        if let Some(color) = parse_color("header_color", &self.header_color)? {
            style = style.with_header_fill(color);
        }
        if let Some(color) = parse_color("row_color", &self.row_color)? {
            style = style.with_row_fill(color);
        }

        let mut separator = style.separator().clone();
        if let Some(color) = parse_color("separator_color", &self.separator_color)? {
            separator.set_color(color);
        }
        if let Some(width) = self.separator_width {
            if !(width.is_finite() && width > 0.0) {
                return Err(format!("Invalid separator_width in config: {width}"));
            }
            separator.set_width(width);
        }
        style = style.with_separator(separator);

        if let Some(color) = parse_color("text_color", &self.text_color)? {
            style = style.with_text_color(color);
        }
        if let Some(family) = &self.font_family {
            style = style.with_font_family(family);
        }
        if let Some(size) = self.font_size {
            style = style.with_font_size(check_font_size("font_size", size)?);
        }

        if self.font_weight.is_some() || self.heavy_font_weight.is_some() {
            let regular = self
                .font_weight
                .unwrap_or_else(|| style.text(TextKind::PropertyName, false).font_weight());
            let heavy = self
                .heavy_font_weight
                .unwrap_or_else(|| style.text(TextKind::Title, false).font_weight());
            let regular = check_font_weight("font_weight", regular)?;
            let heavy = check_font_weight("heavy_font_weight", heavy)?;
            if heavy <= regular {
                return Err(format!(
                    "Invalid font weights in config: heavy_font_weight ({}) must be greater than font_weight ({})",
                    heavy.value(),
                    regular.value()
                ));
            }
            style = style.with_font_weights(regular, heavy);
        }

        let mut type_text = style.text(TextKind::PropertyType, false).clone();
        if let Some(color) = parse_color("type_text_color", &self.type_text_color)? {
            type_text.set_color(color);
        }
        if let Some(family) = &self.type_font_family {
            type_text.set_font_family(family);
        }
        if let Some(size) = self.type_font_size {
            type_text.set_font_size(check_font_size("type_font_size", size)?);
        }
        style = style.with_type_text(type_text);

        if let Some(radius) = self.corner_radius {
            if !(radius.is_finite() && radius >= 0.0) {
                return Err(format!("Invalid corner_radius in config: {radius}"));
            }
            style = style.with_metrics(LayoutMetrics::default().with_corner_radius(radius));
        }

        Ok(style)
    }
}

fn parse_color(field: &str, value: &Option<String>) -> Result<Option<Color>, String> {
    value
        .as_ref()
        .map(|color| Color::new(color))
        .transpose()
        .map_err(|err| format!("Invalid {field} in config: {err}"))
}

fn check_font_size(field: &str, size: u16) -> Result<u16, String> {
    if size == 0 {
        Err(format!("Invalid {field} in config: must be greater than zero"))
    } else {
        Ok(size)
    }
}

fn check_font_weight(field: &str, weight: FontWeight) -> Result<FontWeight, String> {
    if weight.is_in_css_range() {
        Ok(weight)
    } else {
        Err(format!(
            "Invalid {field} in config: {} is outside 100-900",
            weight.value()
        ))
    }
}

/// Icon locator overrides.
///
/// Keys use the same names as the icon keys. Unset keys use the built-in
/// icons. Relative file locators are resolved against `root`, or against the
/// working directory when `root` is not set.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct IconConfig {
    #[serde(default, rename = "tableIcon")]
    table: Option<String>,

    #[serde(default, rename = "primaryKeyIcon")]
    primary_key: Option<String>,

    #[serde(default, rename = "nullableIcon")]
    nullable: Option<String>,

    #[serde(default, rename = "notNullableIcon")]
    not_nullable: Option<String>,

    #[serde(default)]
    root: Option<PathBuf>,
}

impl IconConfig {
    /// Returns the built-in icon set with the configured overrides applied.
    pub fn icon_set(&self) -> IconSet {
        [
            (IconKey::Table, &self.table),
            (IconKey::PrimaryKey, &self.primary_key),
            (IconKey::Nullable, &self.nullable),
            (IconKey::NotNullable, &self.not_nullable),
        ]
        .into_iter()
        .fold(IconSet::builtin(), |icons, (key, locator)| match locator {
            Some(locator) => icons.with_locator(key, locator.as_str()),
            None => icons,
        })
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }
}

/// Viewport settings.
///
/// A missing width or height is fitted to the diagram.
#[derive(Debug, Default, Clone, Copy, PartialEq, Deserialize)]
pub struct ViewConfig {
    #[serde(default)]
    width: Option<f32>,

    #[serde(default)]
    height: Option<f32>,

    #[serde(default)]
    device_pixel_ratio: Option<f32>,

    #[serde(default)]
    zoom: Option<f32>,
}

impl ViewConfig {
    pub fn width(&self) -> Option<f32> {
        self.width
    }

    pub fn height(&self) -> Option<f32> {
        self.height
    }

    /// Device pixel ratio, 1 when unset.
    pub fn device_pixel_ratio(&self) -> f32 {
        self.device_pixel_ratio.unwrap_or(1.0)
    }

    /// Zoom factor, 1 when unset.
    pub fn zoom(&self) -> f32 {
        self.zoom.unwrap_or(1.0)
    }

    pub fn with_width(mut self, width: f32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_height(mut self, height: f32) -> Self {
        self.height = Some(height);
        self
    }

    pub fn with_device_pixel_ratio(mut self, device_pixel_ratio: f32) -> Self {
        self.device_pixel_ratio = Some(device_pixel_ratio);
        self
    }

    pub fn with_zoom(mut self, zoom: f32) -> Self {
        self.zoom = Some(zoom);
        self
    }
}
