//! Icon assets: locators, decoded images and asynchronous loading.
//!
//! An [`IconSet`] names where each of the four icons comes from. The
//! [`IconLoader`] resolves every locator through an [`ImageFetcher`] and
//! produces [`IconImages`], which holds exactly one decoded [`IconImage`] per
//! [`IconKey`]. There is no way to build [`IconImages`] with a key missing,
//! so anything holding one can paint every icon.

mod fetch;
mod loader;

pub use fetch::{AssetFetcher, ImageFetcher};
pub use loader::{AssetError, IconFailure, IconFailureReason, IconLoader};

use std::{fmt, str};

use base64::{Engine as _, engine::general_purpose::STANDARD};
use thiserror::Error;

use dbmagic_core::{geometry::Size, icon::IconKey};

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Size of an SVG without `width`, `height` or `viewBox`.
const SVG_FALLBACK_SIZE: Size = Size::new(300.0, 150.0);

/// Where to fetch each icon from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconSet {
    table: String,
    primary_key: String,
    nullable: String,
    not_nullable: String,
}

impl IconSet {
    pub fn new(
        table: impl Into<String>,
        primary_key: impl Into<String>,
        nullable: impl Into<String>,
        not_nullable: impl Into<String>,
    ) -> Self {
        Self {
            table: table.into(),
            primary_key: primary_key.into(),
            nullable: nullable.into(),
            not_nullable: not_nullable.into(),
        }
    }

    /// The icons bundled with the library, resolved by [`AssetFetcher`].
    pub fn builtin() -> Self {
        Self::new(
            "builtin:table",
            "builtin:primary-key",
            "builtin:nullable",
            "builtin:not-nullable",
        )
    }

    pub fn locator(&self, key: IconKey) -> &str {
        match key {
            IconKey::Table => &self.table,
            IconKey::PrimaryKey => &self.primary_key,
            IconKey::Nullable => &self.nullable,
            IconKey::NotNullable => &self.not_nullable,
        }
    }

    pub fn with_locator(mut self, key: IconKey, locator: impl Into<String>) -> Self {
        let slot = match key {
            IconKey::Table => &mut self.table,
            IconKey::PrimaryKey => &mut self.primary_key,
            IconKey::Nullable => &mut self.nullable,
            IconKey::NotNullable => &mut self.not_nullable,
        };
        *slot = locator.into();
        self
    }

    /// Every key with its locator, in [`IconKey::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (IconKey, &str)> {
        IconKey::ALL.into_iter().map(|key| (key, self.locator(key)))
    }
}

impl Default for IconSet {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Raster or vector encoding of an icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Svg,
}

impl ImageFormat {
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Svg => "image/svg+xml",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Png => f.write_str("PNG"),
            Self::Svg => f.write_str("SVG"),
        }
    }
}

/// Reasons fetched bytes are not a usable image.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("data is neither a PNG nor an SVG image")]
    UnknownFormat,

    #[error("PNG header is truncated or missing its IHDR chunk")]
    TruncatedPng,

    #[error("invalid SVG: {0}")]
    InvalidSvg(String),

    #[error("expected an `svg` root element, found `{0}`")]
    NotSvgRoot(String),
}

/// Fetched icon bytes, decoded far enough to know the format and intrinsic size.
#[derive(Debug, Clone, PartialEq)]
pub struct IconImage {
    format: ImageFormat,
    size: Size,
    data: Vec<u8>,
}

impl IconImage {
    /// Sniffs the format of `data` and reads its intrinsic size.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] when the bytes are neither a PNG with a
    /// complete header nor a well-formed SVG document.
    pub fn decode(data: Vec<u8>) -> Result<Self, DecodeError> {
        let (format, size) = if data.starts_with(&PNG_SIGNATURE) {
            (ImageFormat::Png, png_size(&data)?)
        } else {
            let text = str::from_utf8(&data).map_err(|_| DecodeError::UnknownFormat)?;
            if !text.trim_start().starts_with('<') {
                return Err(DecodeError::UnknownFormat);
            }
            (ImageFormat::Svg, svg_size(text)?)
        };

        Ok(Self { format, size, data })
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// Intrinsic size in image units.
    pub fn size(&self) -> Size {
        self.size
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the image as a base64 `data:` URI.
    pub fn to_data_uri(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.format.mime_type(),
            STANDARD.encode(&self.data)
        )
    }
}

fn png_size(data: &[u8]) -> Result<Size, DecodeError> {
    // signature, chunk length, "IHDR", width, height
    let header = data.get(8..24).ok_or(DecodeError::TruncatedPng)?;
    if &header[4..8] != b"IHDR" {
        return Err(DecodeError::TruncatedPng);
    }

    let width = u32::from_be_bytes([header[8], header[9], header[10], header[11]]);
    let height = u32::from_be_bytes([header[12], header[13], header[14], header[15]]);
    Ok(Size::new(width as f32, height as f32))
}

fn svg_size(text: &str) -> Result<Size, DecodeError> {
    let document =
        roxmltree::Document::parse(text).map_err(|err| DecodeError::InvalidSvg(err.to_string()))?;
    let root = document.root_element();

    let tag = root.tag_name().name();
    if tag != "svg" {
        return Err(DecodeError::NotSvgRoot(tag.to_string()));
    }

    let view_box = root.attribute("viewBox").and_then(parse_view_box);
    let width = root.attribute("width").and_then(parse_length);
    let height = root.attribute("height").and_then(parse_length);

    let size = match (width, height, view_box) {
        (Some(width), Some(height), _) => Size::new(width, height),
        (Some(width), None, Some(view_box)) => {
            Size::new(width, width * view_box.height() / view_box.width())
        }
        (None, Some(height), Some(view_box)) => {
            Size::new(height * view_box.width() / view_box.height(), height)
        }
        (None, None, Some(view_box)) => view_box,
        (Some(width), None, None) => Size::new(width, SVG_FALLBACK_SIZE.height()),
        (None, Some(height), None) => Size::new(SVG_FALLBACK_SIZE.width(), height),
        (None, None, None) => SVG_FALLBACK_SIZE,
    };

    Ok(size)
}

fn parse_length(value: &str) -> Option<f32> {
    let value = value.trim();
    let value = value.strip_suffix("px").unwrap_or(value);
    value
        .parse::<f32>()
        .ok()
        .filter(|length| length.is_finite() && *length > 0.0)
}

fn parse_view_box(value: &str) -> Option<Size> {
    let numbers = value
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|part| !part.is_empty())
        .map(str::parse::<f32>)
        .collect::<Result<Vec<_>, _>>()
        .ok()?;

    match numbers.as_slice() {
        [_, _, width, height] if *width > 0.0 && *height > 0.0 => Some(Size::new(*width, *height)),
        _ => None,
    }
}

/// One decoded image for every [`IconKey`].
#[derive(Debug, Clone, PartialEq)]
pub struct IconImages {
    table: IconImage,
    primary_key: IconImage,
    nullable: IconImage,
    not_nullable: IconImage,
}

impl IconImages {
    pub fn new(
        table: IconImage,
        primary_key: IconImage,
        nullable: IconImage,
        not_nullable: IconImage,
    ) -> Self {
        Self {
            table,
            primary_key,
            nullable,
            not_nullable,
        }
    }

    pub fn get(&self, key: IconKey) -> &IconImage {
        match key {
            IconKey::Table => &self.table,
            IconKey::PrimaryKey => &self.primary_key,
            IconKey::Nullable => &self.nullable,
            IconKey::NotNullable => &self.not_nullable,
        }
    }
}

/// Collects images one key at a time until the set is complete.
#[derive(Debug, Default)]
pub(crate) struct PartialIconImages {
    table: Option<IconImage>,
    primary_key: Option<IconImage>,
    nullable: Option<IconImage>,
    not_nullable: Option<IconImage>,
}

impl PartialIconImages {
    pub(crate) fn insert(&mut self, key: IconKey, image: IconImage) {
        let slot = match key {
            IconKey::Table => &mut self.table,
            IconKey::PrimaryKey => &mut self.primary_key,
            IconKey::Nullable => &mut self.nullable,
            IconKey::NotNullable => &mut self.not_nullable,
        };
        *slot = Some(image);
    }

    pub(crate) fn resolved_count(&self) -> usize {
        [
            &self.table,
            &self.primary_key,
            &self.nullable,
            &self.not_nullable,
        ]
        .into_iter()
        .filter(|slot| slot.is_some())
        .count()
    }

    /// Returns the complete set, or the keys still missing.
    pub(crate) fn finish(self) -> Result<IconImages, Vec<IconKey>> {
        match self {
            Self {
                table: Some(table),
                primary_key: Some(primary_key),
                nullable: Some(nullable),
                not_nullable: Some(not_nullable),
            } => Ok(IconImages::new(table, primary_key, nullable, not_nullable)),
            partial => Err([
                (IconKey::Table, partial.table.is_none()),
                (IconKey::PrimaryKey, partial.primary_key.is_none()),
                (IconKey::Nullable, partial.nullable.is_none()),
                (IconKey::NotNullable, partial.not_nullable.is_none()),
            ]
            .into_iter()
            .filter_map(|(key, missing)| missing.then_some(key))
            .collect()),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// A minimal SVG icon.
    pub fn svg_icon(label: &str) -> IconImage {
        let svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24"><title>{label}</title></svg>"#
        );
        IconImage::decode(svg.into_bytes()).unwrap()
    }

    pub fn icon_images() -> IconImages {
        IconImages::new(
            svg_icon("table"),
            svg_icon("key"),
            svg_icon("nullable"),
            svg_icon("not-nullable"),
        )
    }

    /// Signature plus a bare IHDR chunk header.
    pub fn png_header(width: u32, height: u32) -> Vec<u8> {
        let mut data = PNG_SIGNATURE.to_vec();
        data.extend_from_slice(&13u32.to_be_bytes());
        data.extend_from_slice(b"IHDR");
        data.extend_from_slice(&width.to_be_bytes());
        data.extend_from_slice(&height.to_be_bytes());
        data.extend_from_slice(&[8, 6, 0, 0, 0]);
        data
    }
}
