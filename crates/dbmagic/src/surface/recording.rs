use log::trace;

use dbmagic_core::{
    color::Color,
    draw::{StrokeDefinition, TextAnchor, TextDefinition},
    geometry::{Bounds, Line},
    icon::IconKey,
    layout::PathCommand,
};

use super::{PixelSize, Surface};
use crate::assets::IconImage;

/// One recorded draw call, in diagram units.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    FillRect {
        bounds: Bounds,
        color: Color,
    },
    FillPath {
        path: Vec<PathCommand>,
        color: Color,
    },
    StrokeLine {
        line: Line,
        stroke: StrokeDefinition,
    },
    Text {
        content: String,
        anchor: TextAnchor,
        text: TextDefinition,
    },
    Icon {
        key: IconKey,
        bounds: Bounds,
    },
}

/// A surface that records draw calls as a display list.
///
/// Like a canvas, clearing drops everything drawn before, so
/// [`commands`](Self::commands) always holds the current frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordingSurface {
    size: PixelSize,
    scale: f32,
    commands: Vec<DrawCommand>,
    frames: usize,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self {
            size: PixelSize::default(),
            scale: 1.0,
            commands: Vec::new(),
            frames: 0,
        }
    }

    /// Draw calls issued since the last clear.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of times the surface was cleared, i.e. frames started.
    pub fn frame_count(&self) -> usize {
        self.frames
    }

    /// Text runs of the current frame.
    pub fn texts(&self) -> impl Iterator<Item = (&str, TextAnchor, &TextDefinition)> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Text {
                content,
                anchor,
                text,
            } => Some((content.as_str(), *anchor, text)),
            _ => None,
        })
    }

    /// Icons of the current frame.
    pub fn icons(&self) -> impl Iterator<Item = (IconKey, Bounds)> + '_ {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Icon { key, bounds } => Some((*key, *bounds)),
            _ => None,
        })
    }

    /// Separator and other lines of the current frame.
    pub fn lines(&self) -> impl Iterator<Item = Line> + '_ {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::StrokeLine { line, .. } => Some(*line),
            _ => None,
        })
    }
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface for RecordingSurface {
    fn resize(&mut self, size: PixelSize) {
        self.size = size;
        self.scale = 1.0;
        self.commands.clear();
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
        self.commands.clear();
        self.commands.push(DrawCommand::Clear);
        self.frames += 1;
        trace!(frame = self.frames; "Recording frame");
    }

    fn fill_rect(&mut self, bounds: Bounds, color: Color) {
        self.commands.push(DrawCommand::FillRect { bounds, color });
    }

    fn fill_path(&mut self, path: &[PathCommand], color: Color) {
        self.commands.push(DrawCommand::FillPath {
            path: path.to_vec(),
            color,
        });
    }

    fn stroke_line(&mut self, line: Line, stroke: &StrokeDefinition) {
        self.commands.push(DrawCommand::StrokeLine {
            line,
            stroke: stroke.clone(),
        });
    }

    fn draw_text(&mut self, content: &str, anchor: TextAnchor, text: &TextDefinition) {
        self.commands.push(DrawCommand::Text {
            content: content.to_string(),
            anchor,
            text: text.clone(),
        });
    }

    fn draw_icon(&mut self, key: IconKey, _image: &IconImage, bounds: Bounds) {
        self.commands.push(DrawCommand::Icon { key, bounds });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_starts_a_new_frame() {
        let mut surface = RecordingSurface::new();
        surface.clear();
        surface.fill_rect(Bounds::default(), Color::default());
        assert_eq!(surface.commands().len(), 2);

        surface.clear();
        assert_eq!(surface.commands(), &[DrawCommand::Clear]);
        assert_eq!(surface.frame_count(), 2);
    }

    #[test]
    fn test_resize_drops_content_and_transform() {
        let mut surface = RecordingSurface::new();
        surface.set_transform(2.0);
        surface.clear();
        surface.resize(PixelSize::new(800, 600));

        assert!(surface.commands().is_empty());
        assert_eq!(surface.scale(), 1.0);
        assert_eq!(surface.pixel_size(), PixelSize::new(800, 600));
    }
}
