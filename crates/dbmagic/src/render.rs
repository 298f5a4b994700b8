//! The surface renderer.
//!
//! [`render_frame`] repaints the whole diagram from scratch: it clears the
//! surface, fills the background and draws every entity in model order, so
//! later entities overlay earlier ones. It keeps no state between calls.

use log::trace;

use dbmagic_core::{
    geometry::{Bounds, Point},
    layout::{IconTarget, LayoutEngine, TextTarget},
    model::Entity,
    style::Style,
};

use crate::{assets::IconImages, surface::Surface, view::ViewState};

/// Paints one full frame.
///
/// The surface transform must already map diagram units to pixels; the
/// background covers the visible diagram area at the current zoom.
pub fn render_frame<S: Surface + ?Sized>(
    surface: &mut S,
    entities: &[Entity],
    icons: &IconImages,
    view: &ViewState,
    style: &Style,
) {
    trace!(entities_count = entities.len(), zoom = view.zoom(); "Rendering frame");

    surface.clear();
    surface.fill_rect(
        Bounds::new_from_top_left(Point::default(), view.diagram_extent()),
        style.background(),
    );

    let engine = LayoutEngine::new(style.metrics());
    for entity in entities {
        draw_entity(surface, &engine, entity, icons, style);
    }
}

fn draw_entity<S: Surface + ?Sized>(
    surface: &mut S,
    engine: &LayoutEngine<'_>,
    entity: &Entity,
    icons: &IconImages,
    style: &Style,
) {
    let header = engine.header_box(entity);
    surface.fill_path(&header.outline(), style.header_fill());

    draw_text(surface, engine, entity, TextTarget::Title, entity.name(), false, style);
    draw_icon(surface, engine, entity, IconTarget::Table, icons);

    for (row, property) in entity.rows().iter().enumerate() {
        surface.fill_rect(engine.row_box(entity, row), style.row_fill());

        let primary_key = property.is_primary_key();
        draw_text(
            surface,
            engine,
            entity,
            TextTarget::PropertyName { row },
            property.name(),
            primary_key,
            style,
        );
        draw_text(
            surface,
            engine,
            entity,
            TextTarget::PropertyType { row },
            property.data_type(),
            primary_key,
            style,
        );

        draw_icon(surface, engine, entity, IconTarget::PrimaryKey { row }, icons);
        draw_icon(surface, engine, entity, IconTarget::Nullability { row }, icons);

        if let Some(line) = engine.separator_line(entity, row) {
            surface.stroke_line(line, style.separator());
        }
    }
}

fn draw_text<S: Surface + ?Sized>(
    surface: &mut S,
    engine: &LayoutEngine<'_>,
    entity: &Entity,
    target: TextTarget,
    content: &str,
    primary_key: bool,
    style: &Style,
) {
    if let Some(anchor) = engine.text_anchor(entity, target) {
        surface.draw_text(content, anchor, style.text(target.kind(), primary_key));
    }
}

fn draw_icon<S: Surface + ?Sized>(
    surface: &mut S,
    engine: &LayoutEngine<'_>,
    entity: &Entity,
    target: IconTarget,
    icons: &IconImages,
) {
    if let Some(placement) = engine.icon_placement(entity, target) {
        let key = placement.key();
        surface.draw_icon(key, icons.get(key), placement.bounds());
    }
}
