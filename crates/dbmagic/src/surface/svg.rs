use std::{fs, path::Path};

use log::{debug, error, info};
use svg::{Document, node::element as svg_element};

use dbmagic_core::{
    apply_stroke,
    color::Color,
    draw::{StrokeDefinition, TextAnchor, TextDefinition},
    geometry::{Bounds, Line},
    icon::IconKey,
    layout::PathCommand,
};

use super::{PixelSize, Surface};
use crate::assets::IconImage;

/// Nodes drawn under one transform.
#[derive(Debug)]
struct Layer {
    scale: f32,
    nodes: Vec<Box<dyn svg::Node>>,
}

/// A surface that builds an SVG document.
///
/// The document is `pixel_size` wide and high; every draw call lands in a
/// group scaled by the transform that was current when it was issued.
#[derive(Debug)]
pub struct SvgSurface {
    size: PixelSize,
    scale: f32,
    layers: Vec<Layer>,
}

impl SvgSurface {
    pub fn new() -> Self {
        Self {
            size: PixelSize::default(),
            scale: 1.0,
            layers: Vec::new(),
        }
    }

    /// Builds the SVG document for everything drawn since the last clear.
    pub fn document(&self) -> Document {
        let (width, height) = (self.size.width(), self.size.height());
        let mut doc = Document::new()
            .set("width", width)
            .set("height", height)
            .set("viewBox", format!("0 0 {width} {height}"));

        for layer in self.layers.iter().filter(|layer| !layer.nodes.is_empty()) {
            let group = layer.nodes.iter().cloned().fold(
                svg_element::Group::new().set("transform", format!("scale({})", layer.scale)),
                |group, node| group.add(node),
            );
            doc = doc.add(group);
        }

        doc
    }

    pub fn to_svg_string(&self) -> String {
        self.document().to_string()
    }

    /// Writes the SVG document to `path`.
    pub fn write_to(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Writing SVG file");

        fs::write(path, self.to_svg_string()).inspect_err(|err| {
            error!(path = path.display().to_string(), err:% = err; "Failed to write SVG file");
        })
    }

    /// Rasterizes the current document at its pixel size.
    #[cfg(feature = "raster")]
    pub fn to_png(&self) -> Result<Vec<u8>, super::ExportError> {
        super::svg_to_png(&self.to_svg_string())
    }

    fn push(&mut self, node: impl Into<Box<dyn svg::Node>>) {
        let scale = self.scale;
        match self.layers.last_mut() {
            Some(layer) if layer.scale == scale => layer.nodes.push(node.into()),
            _ => self.layers.push(Layer {
                scale,
                nodes: vec![node.into()],
            }),
        }
    }
}

impl Default for SvgSurface {
    fn default() -> Self {
        Self::new()
    }
}

/// Converts outline commands into SVG path data.
fn path_data(path: &[PathCommand]) -> String {
    path.iter()
        .map(|command| match command {
            PathCommand::MoveTo(point) => format!("M {} {}", point.x(), point.y()),
            PathCommand::LineTo(point) => format!("L {} {}", point.x(), point.y()),
            PathCommand::ArcTo { to, radius } => {
                format!("A {radius} {radius} 0 0 1 {} {}", to.x(), to.y())
            }
            PathCommand::Close => "Z".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

impl Surface for SvgSurface {
    fn resize(&mut self, size: PixelSize) {
        debug!(width = size.width(), height = size.height(); "SVG surface resized");
        self.size = size;
        self.scale = 1.0;
        self.layers.clear();
    }

    fn pixel_size(&self) -> PixelSize {
        self.size
    }

    fn set_transform(&mut self, scale: f32) {
        self.scale = scale;
    }

    fn scale(&self) -> f32 {
        self.scale
    }

    fn clear(&mut self) {
        self.layers.clear();
    }

    fn fill_rect(&mut self, bounds: Bounds, color: Color) {
        let rect = svg_element::Rectangle::new()
            .set("x", bounds.min_x())
            .set("y", bounds.min_y())
            .set("width", bounds.width())
            .set("height", bounds.height())
            .set("fill", &color)
            .set("fill-opacity", color.alpha());
        self.push(rect);
    }

    fn fill_path(&mut self, path: &[PathCommand], color: Color) {
        let path = svg_element::Path::new()
            .set("d", path_data(path))
            .set("fill", &color)
            .set("fill-opacity", color.alpha());
        self.push(path);
    }

    fn stroke_line(&mut self, line: Line, stroke: &StrokeDefinition) {
        let element = svg_element::Line::new()
            .set("x1", line.start().x())
            .set("y1", line.start().y())
            .set("x2", line.end().x())
            .set("y2", line.end().y());
        self.push(apply_stroke!(element, stroke));
    }

    fn draw_text(&mut self, content: &str, anchor: TextAnchor, text: &TextDefinition) {
        let element = svg_element::Text::new(content)
            .set("x", anchor.x())
            .set("y", anchor.y())
            .set("text-anchor", anchor.align().to_svg_value())
            .set("font-family", text.font_family())
            .set("font-size", text.font_size())
            .set("font-weight", text.font_weight().value())
            .set("fill", &text.color())
            .set("fill-opacity", text.color().alpha());
        self.push(element);
    }

    fn draw_icon(&mut self, key: IconKey, image: &IconImage, bounds: Bounds) {
        let element = svg_element::Image::new()
            .set("class", key.as_str())
            .set("x", bounds.min_x())
            .set("y", bounds.min_y())
            .set("width", bounds.width())
            .set("height", bounds.height())
            .set("preserveAspectRatio", "none")
            .set("href", image.to_data_uri());
        self.push(element);
    }
}

#[cfg(test)]
mod tests {
    use dbmagic_core::{draw::TextAlign, geometry::Point, geometry::Size};

    use super::*;
    use crate::assets::test_support::svg_icon;

    #[test]
    fn test_document_size_and_transform() {
        let mut surface = SvgSurface::new();
        surface.resize(PixelSize::new(1600, 1200));
        surface.set_transform(2.0);
        surface.fill_rect(
            Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(800.0, 600.0)),
            Color::new("#121722").unwrap(),
        );

        let svg = surface.to_svg_string();
        assert!(svg.contains(r#"width="1600""#));
        assert!(svg.contains(r#"height="1200""#));
        assert!(svg.contains(r#"viewBox="0 0 1600 1200""#));
        assert!(svg.contains(r#"transform="scale(2)""#));
        assert!(svg.contains(r#"width="800""#));
    }

    #[test]
    fn test_clear_discards_content() {
        let mut surface = SvgSurface::new();
        surface.resize(PixelSize::new(10, 10));
        surface.fill_rect(Bounds::default(), Color::default());
        surface.clear();
        assert!(!surface.to_svg_string().contains("<rect"));
    }

    #[test]
    fn test_resize_resets_transform() {
        let mut surface = SvgSurface::new();
        surface.set_transform(3.0);
        surface.resize(PixelSize::new(10, 10));
        assert_eq!(surface.scale(), 1.0);
        assert_eq!(surface.pixel_size(), PixelSize::new(10, 10));
    }

    #[test]
    fn test_path_data_uses_clockwise_arcs() {
        let data = path_data(&[
            PathCommand::MoveTo(Point::new(7.0, 0.0)),
            PathCommand::LineTo(Point::new(93.0, 0.0)),
            PathCommand::ArcTo {
                to: Point::new(100.0, 7.0),
                radius: 7.0,
            },
            PathCommand::Close,
        ]);
        assert_eq!(data, "M 7 0 L 93 0 A 7 7 0 0 1 100 7 Z");
    }

    #[test]
    fn test_text_and_icon_elements() {
        let mut surface = SvgSurface::new();
        surface.resize(PixelSize::new(100, 100));
        surface.draw_text(
            "int",
            TextAnchor::new(Point::new(85.0, 25.0), TextAlign::End),
            &TextDefinition::default(),
        );
        surface.draw_icon(
            IconKey::PrimaryKey,
            &svg_icon("key"),
            Bounds::new_from_top_left(Point::new(16.0, 8.0), Size::new(20.0, 20.0)),
        );

        let svg = surface.to_svg_string();
        assert!(svg.contains(r#"text-anchor="end""#));
        assert!(svg.contains(">int</text>"));
        assert!(svg.contains(r#"class="primaryKeyIcon""#));
        assert!(svg.contains(r#"href="data:image/svg+xml;base64,"#));
    }
}
