//! dbMagic Core Types and Definitions
//!
//! This crate provides the foundational types for dbMagic entity-relationship
//! diagrams. It includes:
//!
//! - **Colors**: Color handling with CSS color support ([`color::Color`])
//! - **Geometry**: Basic geometric types ([`geometry`] module)
//! - **Draw**: Text and stroke definitions plus the shared [`style::Style`]
//! - **Model**: The immutable diagram model ([`model`] module)
//! - **Icons**: The fixed set of icon keys ([`icon::IconKey`])
//! - **Layout**: Pure geometry for entity boxes, rows, text and icons ([`layout`] module)

pub mod color;
pub mod draw;
pub mod geometry;
pub mod icon;
pub mod layout;
pub mod model;
pub mod style;
