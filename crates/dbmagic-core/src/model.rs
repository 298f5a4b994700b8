//! The immutable diagram model.
//!
//! A [`Diagram`] is an ordered list of [`Entity`] values, each carrying a
//! [`PropertyBlock`] of [`PropertyRow`]s. Order is significant everywhere:
//! entities are painted in model order (later entities overlay earlier ones)
//! and rows are stacked top to bottom in row order.
//!
//! Every constructor validates its input, so a value of any of these types is
//! known to have positive, finite dimensions. There are no mutation methods.
//!
//! # Example
//!
//! ```
//! use dbmagic_core::{
//!     geometry::{Point, Size},
//!     model::{Diagram, Entity, PropertyBlock, PropertyRow},
//! };
//!
//! let rows = vec![
//!     PropertyRow::new("id", "int").with_primary_key(true).with_not_nullable(true),
//!     PropertyRow::new("name", "varchar(255)"),
//! ];
//! let block = PropertyBlock::new(40.0, rows).unwrap();
//! let entity = Entity::new("productos", Point::new(100.0, 50.0), Size::new(300.0, 50.0), block).unwrap();
//! let diagram = Diagram::new(vec![entity]);
//!
//! assert_eq!(diagram.entities().len(), 1);
//! assert_eq!(diagram.bounds().unwrap().max_y(), 180.0);
//! ```

use log::debug;
use thiserror::Error;

use crate::geometry::{Bounds, Point, Size};

/// Errors raised while building the diagram model.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("`{field}` must be a positive finite number, got {value}")]
    InvalidDimension { field: &'static str, value: f32 },

    #[error("`{field}` must be a finite number, got {value}")]
    InvalidCoordinate { field: &'static str, value: f32 },

    #[error("entity #{index} `{name}`: {source}")]
    Entity {
        index: usize,
        name: String,
        #[source]
        source: Box<ModelError>,
    },
}

impl ModelError {
    /// Attach the position and name of the offending entity.
    pub fn in_entity(self, index: usize, name: impl Into<String>) -> Self {
        Self::Entity {
            index,
            name: name.into(),
            source: Box::new(self),
        }
    }
}

fn check_dimension(field: &'static str, value: f32) -> Result<(), ModelError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ModelError::InvalidDimension { field, value })
    }
}

fn check_coordinate(field: &'static str, value: f32) -> Result<(), ModelError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ModelError::InvalidCoordinate { field, value })
    }
}

/// One column of an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyRow {
    name: String,
    data_type: String,
    primary_key: bool,
    not_nullable: bool,
}

impl PropertyRow {
    /// Creates a nullable, non-key row.
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            primary_key: false,
            not_nullable: false,
        }
    }

    pub fn with_primary_key(mut self, primary_key: bool) -> Self {
        self.primary_key = primary_key;
        self
    }

    pub fn with_not_nullable(mut self, not_nullable: bool) -> Self {
        self.not_nullable = not_nullable;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The column type as displayed, e.g. `varchar(255)`.
    pub fn data_type(&self) -> &str {
        &self.data_type
    }

    pub fn is_primary_key(&self) -> bool {
        self.primary_key
    }

    pub fn is_not_nullable(&self) -> bool {
        self.not_nullable
    }
}

/// The rows of one entity together with their shared row height.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyBlock {
    row_height: f32,
    rows: Vec<PropertyRow>,
}

impl PropertyBlock {
    /// Creates a property block.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidDimension`] if `row_height` is not a
    /// positive finite number.
    pub fn new(row_height: f32, rows: Vec<PropertyRow>) -> Result<Self, ModelError> {
        check_dimension("rowHeight", row_height)?;
        Ok(Self { row_height, rows })
    }

    pub fn row_height(&self) -> f32 {
        self.row_height
    }

    pub fn rows(&self) -> &[PropertyRow] {
        &self.rows
    }

    /// Combined height of every row.
    pub fn total_height(&self) -> f32 {
        self.row_height * self.rows.len() as f32
    }
}

/// A database table drawn as a titled box with one row per column.
///
/// The position and size describe the header rectangle in diagram space; the
/// rows hang below it.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    name: String,
    bounds: Bounds,
    properties: PropertyBlock,
}

impl Entity {
    /// Creates an entity whose header's top-left corner is `origin`.
    ///
    /// # Errors
    ///
    /// Returns a [`ModelError`] if the origin is not finite or the size is not
    /// strictly positive and finite.
    pub fn new(
        name: impl Into<String>,
        origin: Point,
        size: Size,
        properties: PropertyBlock,
    ) -> Result<Self, ModelError> {
        check_coordinate("x", origin.x())?;
        check_coordinate("y", origin.y())?;
        check_dimension("width", size.width())?;
        check_dimension("height", size.height())?;

        Ok(Self {
            name: name.into(),
            bounds: Bounds::new_from_top_left(origin, size),
            properties,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn x(&self) -> f32 {
        self.bounds.min_x()
    }

    pub fn y(&self) -> f32 {
        self.bounds.min_y()
    }

    pub fn width(&self) -> f32 {
        self.bounds.width()
    }

    pub fn height(&self) -> f32 {
        self.bounds.height()
    }

    /// Returns the header rectangle.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn properties(&self) -> &PropertyBlock {
        &self.properties
    }

    pub fn rows(&self) -> &[PropertyRow] {
        self.properties.rows()
    }

    /// Returns the rectangle covering the header and every row.
    pub fn total_bounds(&self) -> Bounds {
        Bounds::new_from_top_left(
            self.bounds.min_point(),
            Size::new(self.width(), self.height() + self.properties.total_height()),
        )
    }
}

/// An ordered, read-only collection of entities.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagram {
    entities: Vec<Entity>,
}

impl Diagram {
    pub fn new(entities: Vec<Entity>) -> Self {
        debug!(entities_count = entities.len(); "Diagram model created");
        Self { entities }
    }

    /// Entities in paint order.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Total number of property rows across all entities.
    pub fn rows_count(&self) -> usize {
        self.entities.iter().map(|entity| entity.rows().len()).sum()
    }

    /// Returns the union of every entity's total bounds, or `None` for an empty diagram.
    pub fn bounds(&self) -> Option<Bounds> {
        self.entities
            .iter()
            .map(Entity::total_bounds)
            .reduce(|acc, bounds| acc.merge(&bounds))
    }
}
