//! Layout engine: pure geometry for entity boxes, rows, text and icons.
//!
//! Every function here is side-effect free and works in diagram space. The
//! results depend only on the entity, the row index and the
//! [`LayoutMetrics`]; zoom and device pixel ratio never enter the math, so a
//! layout is identical at every resolution.
//!
//! Entities are laid out independently of each other. Overlapping entities
//! are neither detected nor resolved.
//!
//! # Example
//!
//! ```
//! use dbmagic_core::{
//!     geometry::{Point, Size},
//!     layout::{LayoutEngine, LayoutMetrics, TextTarget},
//!     model::{Entity, PropertyBlock, PropertyRow},
//! };
//!
//! let rows = vec![PropertyRow::new("id", "int").with_primary_key(true)];
//! let entity = Entity::new(
//!     "productos",
//!     Point::new(100.0, 50.0),
//!     Size::new(300.0, 50.0),
//!     PropertyBlock::new(40.0, rows).unwrap(),
//! )
//! .unwrap();
//!
//! let metrics = LayoutMetrics::default();
//! let engine = LayoutEngine::new(&metrics);
//!
//! let row = engine.row_box(&entity, 0);
//! assert_eq!(row.min_y(), 100.0);
//!
//! let type_anchor = engine.text_anchor(&entity, TextTarget::PropertyType { row: 0 }).unwrap();
//! assert_eq!(type_anchor.x(), 385.0);
//! assert_eq!(type_anchor.y(), 125.0);
//! ```

use crate::{
    draw::{TextAlign, TextAnchor, TextKind},
    geometry::{Bounds, Line, Point, Size},
    icon::IconKey,
    model::{Entity, PropertyRow},
};

/// Offsets and sizes used to position everything inside an entity.
///
/// Horizontal insets are measured from the entity's left edge, vertical
/// offsets from the top of the row they belong to.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutMetrics {
    corner_radius: f32,
    text_indent: f32,
    key_column_width: f32,
    icon_column_width: f32,
    type_text_inset: f32,
    baseline_offset: f32,
    table_icon_inset: f32,
    table_icon_size: f32,
    primary_key_icon_inset: f32,
    primary_key_icon_top: f32,
    primary_key_icon_size: f32,
    nullability_icon_inset: f32,
    nullability_icon_top: f32,
    nullability_icon_size: f32,
}

impl LayoutMetrics {
    /// Sets the radius of the header's two top corners.
    pub fn with_corner_radius(mut self, radius: f32) -> Self {
        self.corner_radius = radius;
        self
    }

    pub fn corner_radius(&self) -> f32 {
        self.corner_radius
    }

    /// Horizontal room reserved for the primary-key icon.
    pub fn key_column_width(&self) -> f32 {
        self.key_column_width
    }

    /// Horizontal room reserved for the nullability (or table) icon.
    pub fn icon_column_width(&self) -> f32 {
        self.icon_column_width
    }
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self {
            corner_radius: 7.0,
            text_indent: 20.0,
            key_column_width: 22.0,
            icon_column_width: 22.0,
            type_text_inset: 15.0,
            baseline_offset: 5.0,
            table_icon_inset: 15.0,
            table_icon_size: 25.0,
            primary_key_icon_inset: 16.0,
            primary_key_icon_top: 8.0,
            primary_key_icon_size: 20.0,
            nullability_icon_inset: 17.0,
            nullability_icon_top: 10.0,
            nullability_icon_size: 18.0,
        }
    }
}

/// One step of an outline path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    /// Clockwise circular arc of `radius` from the current point to `to`.
    ArcTo { to: Point, radius: f32 },
    Close,
}

/// The entity header: a rectangle whose two top corners are rounded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeaderBox {
    bounds: Bounds,
    corner_radius: f32,
}

impl HeaderBox {
    pub fn bounds(&self) -> Bounds {
        self.bounds
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

    pub fn corner_radius(&self) -> f32 {
        self.corner_radius
    }

    /// Returns the clockwise outline: rounded top-left and top-right corners,
    /// square bottom corners.
    pub fn outline(&self) -> Vec<PathCommand> {
        let Self {
            bounds,
            corner_radius: r,
        } = *self;
        let (left, top, right, bottom) = (
            bounds.min_x(),
            bounds.min_y(),
            bounds.max_x(),
            bounds.max_y(),
        );

        vec![
            PathCommand::MoveTo(Point::new(left + r, top)),
            PathCommand::LineTo(Point::new(right - r, top)),
            PathCommand::ArcTo {
                to: Point::new(right, top + r),
                radius: r,
            },
            PathCommand::LineTo(Point::new(right, bottom)),
            PathCommand::LineTo(Point::new(left, bottom)),
            PathCommand::LineTo(Point::new(left, top + r)),
            PathCommand::ArcTo {
                to: Point::new(left + r, top),
                radius: r,
            },
            PathCommand::Close,
        ]
    }
}

/// Which text run of an entity to anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextTarget {
    Title,
    PropertyName { row: usize },
    PropertyType { row: usize },
}

impl TextTarget {
    pub fn kind(self) -> TextKind {
        match self {
            Self::Title => TextKind::Title,
            Self::PropertyName { .. } => TextKind::PropertyName,
            Self::PropertyType { .. } => TextKind::PropertyType,
        }
    }
}

/// Which icon slot of an entity to place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconTarget {
    Table,
    PrimaryKey { row: usize },
    Nullability { row: usize },
}

/// An icon resolved to a concrete key and a destination rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IconPlacement {
    key: IconKey,
    bounds: Bounds,
}

impl IconPlacement {
    pub fn key(&self) -> IconKey {
        self.key
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }
}

/// Computes entity geometry from a set of [`LayoutMetrics`].
#[derive(Debug, Clone, Copy)]
pub struct LayoutEngine<'a> {
    metrics: &'a LayoutMetrics,
}

impl<'a> LayoutEngine<'a> {
    pub fn new(metrics: &'a LayoutMetrics) -> Self {
        Self { metrics }
    }

    /// Returns the header box of `entity`.
    ///
    /// The corner radius is clamped so the two arcs never overlap or extend
    /// past the bottom edge.
    pub fn header_box(&self, entity: &Entity) -> HeaderBox {
        let corner_radius = self
            .metrics
            .corner_radius
            .max(0.0)
            .min(entity.width() / 2.0)
            .min(entity.height());

        HeaderBox {
            bounds: entity.bounds(),
            corner_radius,
        }
    }

    /// Returns the rectangle of row `index`, stacked directly below the header.
    ///
    /// This is plain arithmetic and does not require `index` to be in range.
    pub fn row_box(&self, entity: &Entity, index: usize) -> Bounds {
        let row_height = entity.properties().row_height();
        let top = entity.y() + entity.height() + row_height * index as f32;

        Bounds::new_from_top_left(
            Point::new(entity.x(), top),
            Size::new(entity.width(), row_height),
        )
    }

    /// Returns the separator drawn along the top edge of row `index`.
    ///
    /// The first row has no separator since it sits directly under the header.
    pub fn separator_line(&self, entity: &Entity, index: usize) -> Option<Line> {
        if index == 0 {
            return None;
        }

        let row = self.row_box(entity, index);
        Some(Line::new(
            Point::new(row.min_x(), row.min_y()),
            Point::new(row.max_x(), row.min_y()),
        ))
    }

    /// Returns where a text run starts (or ends, for right-aligned text).
    ///
    /// Returns `None` when the target row does not exist.
    pub fn text_anchor(&self, entity: &Entity, target: TextTarget) -> Option<TextAnchor> {
        let metrics = self.metrics;

        let anchor = match target {
            TextTarget::Title => {
                let header = entity.bounds();
                TextAnchor::new(
                    Point::new(
                        header.min_x() + metrics.text_indent + metrics.icon_column_width,
                        self.baseline(header),
                    ),
                    TextAlign::Start,
                )
            }
            TextTarget::PropertyName { row } => {
                let property = self.row(entity, row)?;
                let bounds = self.row_box(entity, row);
                let key_offset = if property.is_primary_key() {
                    metrics.key_column_width
                } else {
                    0.0
                };
                TextAnchor::new(
                    Point::new(
                        bounds.min_x()
                            + metrics.text_indent
                            + key_offset
                            + metrics.icon_column_width,
                        self.baseline(bounds),
                    ),
                    TextAlign::Start,
                )
            }
            TextTarget::PropertyType { row } => {
                self.row(entity, row)?;
                let bounds = self.row_box(entity, row);
                TextAnchor::new(
                    Point::new(bounds.max_x() - metrics.type_text_inset, self.baseline(bounds)),
                    TextAlign::End,
                )
            }
        };

        Some(anchor)
    }

    /// Returns the icon to draw for `target` and where to draw it.
    ///
    /// Returns `None` when the target row does not exist, or for
    /// [`IconTarget::PrimaryKey`] on a row that is not a primary key.
    pub fn icon_placement(&self, entity: &Entity, target: IconTarget) -> Option<IconPlacement> {
        let metrics = self.metrics;

        let placement = match target {
            IconTarget::Table => {
                let header = entity.bounds();
                let size = metrics.table_icon_size;
                IconPlacement {
                    key: IconKey::Table,
                    bounds: Bounds::new_from_top_left(
                        Point::new(
                            header.min_x() + metrics.table_icon_inset,
                            header.min_y() + (header.height() - size) / 2.0,
                        ),
                        Size::new(size, size),
                    ),
                }
            }
            IconTarget::PrimaryKey { row } => {
                if !self.row(entity, row)?.is_primary_key() {
                    return None;
                }
                let bounds = self.row_box(entity, row);
                let size = metrics.primary_key_icon_size;
                IconPlacement {
                    key: IconKey::PrimaryKey,
                    bounds: Bounds::new_from_top_left(
                        Point::new(
                            bounds.min_x() + metrics.primary_key_icon_inset,
                            bounds.min_y() + metrics.primary_key_icon_top,
                        ),
                        Size::new(size, size),
                    ),
                }
            }
            IconTarget::Nullability { row } => {
                let property = self.row(entity, row)?;
                let bounds = self.row_box(entity, row);
                let size = metrics.nullability_icon_size;
                let key_offset = if property.is_primary_key() {
                    metrics.key_column_width
                } else {
                    0.0
                };
                IconPlacement {
                    key: IconKey::for_nullability(property.is_not_nullable()),
                    bounds: Bounds::new_from_top_left(
                        Point::new(
                            bounds.min_x() + key_offset + metrics.nullability_icon_inset,
                            bounds.min_y() + metrics.nullability_icon_top,
                        ),
                        Size::new(size, size),
                    ),
                }
            }
        };

        Some(placement)
    }

    fn row<'e>(&self, entity: &'e Entity, index: usize) -> Option<&'e PropertyRow> {
        entity.rows().get(index)
    }

    fn baseline(&self, bounds: Bounds) -> f32 {
        bounds.min_y() + bounds.height() / 2.0 + self.metrics.baseline_offset
    }
}


#[cfg(test)]
mod proptest_tests {
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    use super::*;
    use crate::model::PropertyBlock;

    // ===================
    // Strategies
    // ===================

    fn row_strategy() -> impl Strategy<Value = PropertyRow> {
        (any::<bool>(), any::<bool>()).prop_map(|(primary_key, not_nullable)| {
            PropertyRow::new("column", "int")
                .with_primary_key(primary_key)
                .with_not_nullable(not_nullable)
        })
    }

    fn entity_strategy() -> impl Strategy<Value = Entity> {
        (
            -1000.0f32..1000.0,
            -1000.0f32..1000.0,
            1.0f32..800.0,
            1.0f32..200.0,
            1.0f32..100.0,
            prop::collection::vec(row_strategy(), 1..12),
        )
            .prop_map(|(x, y, width, height, row_height, rows)| {
                Entity::new(
                    "table",
                    Point::new(x, y),
                    Size::new(width, height),
                    PropertyBlock::new(row_height, rows).expect("positive row height"),
                )
                .expect("valid entity")
            })
    }

    // ===================
    // Property Test Functions
    // ===================

    /// Consecutive rows are exactly one row height apart.
    fn check_rows_are_evenly_spaced(entity: &Entity) -> Result<(), TestCaseError> {
        let metrics = LayoutMetrics::default();
        let engine = LayoutEngine::new(&metrics);
        let row_height = entity.properties().row_height();

        for index in 0..entity.rows().len() {
            let current = engine.row_box(entity, index);
            let next = engine.row_box(entity, index + 1);
            prop_assert!(next.min_y() > current.min_y());
            prop_assert!(approx_eq!(
                f32,
                next.min_y() - current.min_y(),
                row_height,
                epsilon = 0.01
            ));
        }
        Ok(())
    }

    /// Type text sits at the right edge regardless of row index or key flag.
    fn check_type_anchor_is_fixed(entity: &Entity) -> Result<(), TestCaseError> {
        let metrics = LayoutMetrics::default();
        let engine = LayoutEngine::new(&metrics);
        let expected = entity.x() + entity.width() - 15.0;

        for row in 0..entity.rows().len() {
            let anchor = engine
                .text_anchor(entity, TextTarget::PropertyType { row })
                .expect("row exists");
            prop_assert!(approx_eq!(f32, anchor.x(), expected, epsilon = 0.01));
            prop_assert_eq!(anchor.align(), TextAlign::End);
        }
        Ok(())
    }

    /// Property names of key rows are shifted right by exactly one key column.
    fn check_primary_key_shift(entity: &Entity) -> Result<(), TestCaseError> {
        let metrics = LayoutMetrics::default();
        let engine = LayoutEngine::new(&metrics);
        let base = entity.x() + 20.0 + 22.0;

        for (row, property) in entity.rows().iter().enumerate() {
            let anchor = engine
                .text_anchor(entity, TextTarget::PropertyName { row })
                .expect("row exists");
            let expected = if property.is_primary_key() {
                base + 22.0
            } else {
                base
            };
            prop_assert!(approx_eq!(f32, anchor.x(), expected, epsilon = 0.01));
        }
        Ok(())
    }

    /// Exactly one nullability icon per row, selected only by the flag; key
    /// icons exist exactly on key rows; separators exactly on rows after the first.
    fn check_row_decorations(entity: &Entity) -> Result<(), TestCaseError> {
        let metrics = LayoutMetrics::default();
        let engine = LayoutEngine::new(&metrics);

        for (row, property) in entity.rows().iter().enumerate() {
            let nullability = engine
                .icon_placement(entity, IconTarget::Nullability { row })
                .expect("nullability icon is mandatory");
            prop_assert_eq!(
                nullability.key(),
                IconKey::for_nullability(property.is_not_nullable())
            );

            let key = engine.icon_placement(entity, IconTarget::PrimaryKey { row });
            prop_assert_eq!(key.is_some(), property.is_primary_key());

            let separator = engine.separator_line(entity, row);
            prop_assert_eq!(separator.is_some(), row > 0);
        }
        Ok(())
    }

    // ===================
    // Proptest Wrappers
    // ===================

    proptest! {
        #[test]
        fn rows_are_evenly_spaced(entity in entity_strategy()) {
            check_rows_are_evenly_spaced(&entity)?;
        }

        #[test]
        fn type_anchor_is_fixed(entity in entity_strategy()) {
            check_type_anchor_is_fixed(&entity)?;
        }

        #[test]
        fn primary_key_shift(entity in entity_strategy()) {
            check_primary_key_shift(&entity)?;
        }

        #[test]
        fn row_decorations(entity in entity_strategy()) {
            check_row_decorations(&entity)?;
        }
    }
}
