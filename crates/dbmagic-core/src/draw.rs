//! Visual definitions for diagram elements.
//!
//! The drawing surface is told *what* to paint through these types: text
//! styles and anchors, and stroke definitions for lines.

mod stroke;
mod text;

pub use stroke::StrokeDefinition;
pub use text::{FontWeight, TextAlign, TextAnchor, TextDefinition, TextKind};
