//! dbMagic - Entity-relationship diagrams for database schemas.
//!
//! Loading of diagram documents, icon assets, and the view controller that
//! paints entities onto a drawing surface. The [`DiagramBuilder`] ties these
//! together into a one-shot SVG or PNG render.

pub mod assets;
pub mod config;
pub mod document;
pub mod render;
pub mod surface;
pub mod view;

mod error;

pub use dbmagic_core::{color, draw, geometry, icon::IconKey, layout, model, style};

pub use error::DbMagicError;

use std::path::Path;

use futures::executor::block_on;
use log::{debug, info};

use dbmagic_core::{geometry::Size, model::Diagram, style::Style};

use assets::{AssetFetcher, IconLoader};
use config::AppConfig;
use document::DocumentFormat;
use surface::SvgSurface;
use view::{HostViewport, ViewController};

/// Margin added around the diagram when the viewport is fitted to it.
const FIT_MARGIN: f32 = 50.0;

/// Viewport used for an empty diagram without a configured size.
const DEFAULT_VIEWPORT: Size = Size::new(800.0, 600.0);

/// Builder for loading and rendering dbMagic diagrams.
///
/// # Examples
///
/// ```rust,no_run
/// use dbmagic::{DiagramBuilder, config::AppConfig, document::DocumentFormat};
///
/// let source = r#"{ "entities": [{
///     "name": "pais", "x": 20, "y": 20, "width": 200, "height": 40,
///     "properties": { "rowHeight": 30, "rows": [{ "name": "id", "type": "int", "pk": true }] }
/// }] }"#;
///
/// let builder = DiagramBuilder::new(AppConfig::default());
/// let diagram = builder
///     .parse(source, DocumentFormat::Json)
///     .expect("Failed to parse");
///
/// let svg = builder.render_svg(&diagram).expect("Failed to render");
/// assert!(svg.starts_with("<svg"));
/// ```
#[derive(Debug, Default)]
pub struct DiagramBuilder {
    config: AppConfig,
}

impl DiagramBuilder {
    /// Create a new diagram builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parse a diagram document held in memory.
    ///
    /// # Errors
    ///
    /// Returns [`DbMagicError::Document`] for syntax errors and invalid
    /// entities.
    pub fn parse(&self, source: &str, format: DocumentFormat) -> Result<Diagram, DbMagicError> {
        info!(format:% = format; "Parsing diagram document");
        let diagram = document::parse_document(source, format)?;
        debug!(entities_count = diagram.entities().len(); "Diagram parsed successfully");
        Ok(diagram)
    }

    /// Load a diagram document from a file, picking the format by extension.
    ///
    /// # Errors
    ///
    /// Returns [`DbMagicError::Io`] if the file cannot be read, and
    /// [`DbMagicError::Document`] if it is not a valid diagram.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Diagram, DbMagicError> {
        document::load_document(path)
    }

    /// Build the [`Style`] described by the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`DbMagicError::Config`] for invalid colors or sizes.
    pub fn style(&self) -> Result<Style, DbMagicError> {
        self.config.style().to_style().map_err(DbMagicError::Config)
    }

    /// The viewport size the diagram is rendered at.
    ///
    /// Configured dimensions win. A missing dimension is fitted to the
    /// diagram's far edge plus a margin, scaled by the zoom.
    pub fn viewport_for(&self, diagram: &Diagram) -> Size {
        let view = self.config.view();
        let fitted = match diagram.bounds() {
            Some(bounds) => Size::new(bounds.max_x() + FIT_MARGIN, bounds.max_y() + FIT_MARGIN)
                .scale(view.zoom()),
            None => DEFAULT_VIEWPORT,
        };

        Size::new(
            view.width().unwrap_or(fitted.width()),
            view.height().unwrap_or(fitted.height()),
        )
    }

    /// Render a diagram to an SVG string.
    ///
    /// Icons are loaded before anything is painted.
    ///
    /// # Errors
    ///
    /// Returns [`DbMagicError::Asset`] if any icon cannot be loaded, and
    /// [`DbMagicError::View`] or [`DbMagicError::Config`] for invalid view
    /// or style settings.
    pub fn render_svg(&self, diagram: &Diagram) -> Result<String, DbMagicError> {
        let surface = self.render(diagram)?;
        info!("SVG rendered successfully");
        Ok(surface.to_svg_string())
    }

    /// Render a diagram to PNG bytes at the viewport's pixel size.
    ///
    /// # Errors
    ///
    /// Same as [`render_svg`](Self::render_svg), plus
    /// [`DbMagicError::Export`] if rasterizing fails.
    #[cfg(feature = "raster")]
    pub fn render_png(&self, diagram: &Diagram) -> Result<Vec<u8>, DbMagicError> {
        let png = self.render(diagram)?.to_png()?;
        info!(bytes = png.len(); "PNG rendered successfully");
        Ok(png)
    }

    fn render(&self, diagram: &Diagram) -> Result<SvgSurface, DbMagicError> {
        let style = self.style()?;
        let view = self.config.view();
        let viewport = HostViewport::new(self.viewport_for(diagram), view.device_pixel_ratio());

        let fetcher = self
            .config
            .icons()
            .root()
            .map(AssetFetcher::new)
            .unwrap_or_default();
        let loader = IconLoader::new(fetcher);

        let mut controller =
            ViewController::new(diagram, &style, SvgSurface::new()).with_zoom(view.zoom())?;
        block_on(controller.mount(&loader, &self.config.icons().icon_set(), &viewport))?;

        Ok(controller.into_surface())
    }
}
