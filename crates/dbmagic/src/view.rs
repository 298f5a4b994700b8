//! View state, the host viewport and the controller that triggers painting.
//!
//! The [`ViewController`] owns the draw trigger. It waits for every icon to
//! load, paints the first frame, then listens for viewport resizes; each
//! resize or zoom change repaints the full frame at the new scale.
//!
//! ```text
//! Uninitialized --mount--> LoadingIcons --icons ok--> Repainting --> Ready
//!                               |                        ^           |
//!                               +--icons failed--> Unavailable       +--zoom / resize
//! ```
//!
//! Resize notifications go through a per-subscriber queue. A
//! [`ResizeSubscription`] is an RAII guard: dropping it (on
//! [`ViewController::unmount`] or when the controller is dropped) removes
//! the listener from the viewport.

use std::{
    cell::{Cell, RefCell},
    collections::{BTreeMap, VecDeque},
    fmt,
    rc::{Rc, Weak},
};

use log::{debug, info, trace, warn};
use thiserror::Error;

use dbmagic_core::{geometry::Size, model::Diagram, style::Style};

use crate::{
    DbMagicError,
    assets::{IconImages, IconLoader, IconSet, ImageFetcher},
    render::render_frame,
    surface::{PixelSize, Surface},
};

/// Lifecycle phase of a [`ViewController`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    LoadingIcons,
    Repainting,
    Ready,
    /// Icon loading failed; nothing is ever painted.
    Unavailable,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Uninitialized => "uninitialized",
            Self::LoadingIcons => "loading icons",
            Self::Repainting => "repainting",
            Self::Ready => "ready",
            Self::Unavailable => "unavailable",
        };
        f.write_str(name)
    }
}

/// Errors raised by the view controller.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ViewError {
    #[error("view is {phase}, it must be ready to paint")]
    NotReady { phase: Phase },

    #[error("view is already mounted ({phase})")]
    AlreadyMounted { phase: Phase },

    #[error("zoom factor must be a positive finite number, got {0}")]
    InvalidZoom(f32),

    #[error("device pixel ratio must be a positive finite number, got {0}")]
    InvalidDevicePixelRatio(f32),

    #[error("viewport size must be finite and non-negative, got {width}x{height}")]
    InvalidViewport { width: f32, height: f32 },
}

/// Zoom and resolution parameters of the diagram-to-pixel transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    viewport: Size,
    device_pixel_ratio: f32,
    zoom: f32,
}

impl ViewState {
    /// Creates a view state.
    ///
    /// # Errors
    ///
    /// Returns a [`ViewError`] if the viewport is negative or not finite, or
    /// if the device pixel ratio or zoom is not a positive finite number.
    pub fn new(viewport: Size, device_pixel_ratio: f32, zoom: f32) -> Result<Self, ViewError> {
        let (width, height) = (viewport.width(), viewport.height());
        if !(width.is_finite() && height.is_finite() && width >= 0.0 && height >= 0.0) {
            return Err(ViewError::InvalidViewport { width, height });
        }
        if !is_positive(device_pixel_ratio) {
            return Err(ViewError::InvalidDevicePixelRatio(device_pixel_ratio));
        }
        if !is_positive(zoom) {
            return Err(ViewError::InvalidZoom(zoom));
        }

        Ok(Self {
            viewport,
            device_pixel_ratio,
            zoom,
        })
    }

    /// Viewport size in CSS pixels.
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn device_pixel_ratio(&self) -> f32 {
        self.device_pixel_ratio
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Scale from diagram units to device pixels.
    pub fn scale(&self) -> f32 {
        self.device_pixel_ratio * self.zoom
    }

    /// Surface size in device pixels, truncated like a canvas dimension.
    pub fn pixel_size(&self) -> PixelSize {
        let size = self.viewport.scale(self.device_pixel_ratio);
        PixelSize::new(size.width() as u32, size.height() as u32)
    }

    /// The part of diagram space visible on the surface.
    pub fn diagram_extent(&self) -> Size {
        self.viewport.scale(1.0 / self.zoom)
    }

    fn with_zoom(self, zoom: f32) -> Result<Self, ViewError> {
        Self::new(self.viewport, self.device_pixel_ratio, zoom)
    }

    fn with_viewport(self, event: ResizeEvent) -> Result<Self, ViewError> {
        Self::new(event.size, event.device_pixel_ratio, self.zoom)
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            viewport: Size::default(),
            device_pixel_ratio: 1.0,
            zoom: 1.0,
        }
    }
}

fn is_positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

/// A viewport size change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeEvent {
    size: Size,
    device_pixel_ratio: f32,
}

impl ResizeEvent {
    pub fn new(size: Size, device_pixel_ratio: f32) -> Self {
        Self {
            size,
            device_pixel_ratio,
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn device_pixel_ratio(&self) -> f32 {
        self.device_pixel_ratio
    }
}

#[derive(Debug, Default)]
struct Listeners {
    next_id: u64,
    queues: BTreeMap<u64, VecDeque<ResizeEvent>>,
}

/// A broadcast point for resize events with one queue per subscriber.
#[derive(Debug, Clone, Default)]
pub struct ResizeEvents {
    listeners: Rc<RefCell<Listeners>>,
}

impl ResizeEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener; it receives every event emitted from now on.
    pub fn subscribe(&self) -> ResizeSubscription {
        let mut listeners = self.listeners.borrow_mut();
        let id = listeners.next_id;
        listeners.next_id += 1;
        listeners.queues.insert(id, VecDeque::new());
        trace!(listener_id = id; "Resize listener added");

        ResizeSubscription {
            id,
            listeners: Rc::downgrade(&self.listeners),
        }
    }

    /// Queues `event` for every current listener.
    pub fn emit(&self, event: ResizeEvent) {
        for queue in self.listeners.borrow_mut().queues.values_mut() {
            queue.push_back(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().queues.len()
    }
}

/// A registered resize listener; dropping it deregisters the listener.
#[derive(Debug)]
pub struct ResizeSubscription {
    id: u64,
    listeners: Weak<RefCell<Listeners>>,
}

impl ResizeSubscription {
    /// Takes the oldest pending event, if any.
    pub fn next_event(&self) -> Option<ResizeEvent> {
        let listeners = self.listeners.upgrade()?;
        let mut listeners = listeners.borrow_mut();
        listeners.queues.get_mut(&self.id)?.pop_front()
    }

    /// Takes every pending event, oldest first.
    pub fn drain(&self) -> Vec<ResizeEvent> {
        std::iter::from_fn(|| self.next_event()).collect()
    }
}

impl Drop for ResizeSubscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners.borrow_mut().queues.remove(&self.id);
            trace!(listener_id = self.id; "Resize listener removed");
        }
    }
}

/// The host window or element the diagram is shown in.
pub trait Viewport {
    /// Current size in CSS pixels.
    fn size(&self) -> Size;

    fn device_pixel_ratio(&self) -> f32;

    fn subscribe_resize(&self) -> ResizeSubscription;
}

#[derive(Debug)]
struct HostState {
    size: Cell<Size>,
    device_pixel_ratio: Cell<f32>,
}

/// An in-process [`Viewport`] whose size is driven by the host.
///
/// Clones share the same state, so the host can keep one handle to resize
/// while the controller listens on another.
#[derive(Debug, Clone)]
pub struct HostViewport {
    state: Rc<HostState>,
    events: ResizeEvents,
}

impl HostViewport {
    pub fn new(size: Size, device_pixel_ratio: f32) -> Self {
        Self {
            state: Rc::new(HostState {
                size: Cell::new(size),
                device_pixel_ratio: Cell::new(device_pixel_ratio),
            }),
            events: ResizeEvents::new(),
        }
    }

    /// Changes the size and notifies every listener.
    pub fn resize(&self, size: Size) {
        self.state.size.set(size);
        self.notify();
    }

    /// Changes the device pixel ratio and notifies every listener.
    pub fn set_device_pixel_ratio(&self, device_pixel_ratio: f32) {
        self.state.device_pixel_ratio.set(device_pixel_ratio);
        self.notify();
    }

    pub fn listener_count(&self) -> usize {
        self.events.listener_count()
    }

    fn notify(&self) {
        self.events
            .emit(ResizeEvent::new(self.size(), self.device_pixel_ratio()));
    }
}

impl Viewport for HostViewport {
    fn size(&self) -> Size {
        self.state.size.get()
    }

    fn device_pixel_ratio(&self) -> f32 {
        self.state.device_pixel_ratio.get()
    }

    fn subscribe_resize(&self) -> ResizeSubscription {
        self.events.subscribe()
    }
}

/// Drives painting of one diagram onto one surface.
///
/// The controller owns the [`ViewState`], the loaded icons and the resize
/// subscription, and is the only code that touches the surface.
pub struct ViewController<'d, C> {
    diagram: &'d Diagram,
    style: &'d Style,
    surface: C,
    view: ViewState,
    phase: Phase,
    icons: Option<IconImages>,
    subscription: Option<ResizeSubscription>,
}

impl<'d, C: Surface> ViewController<'d, C> {
    pub fn new(diagram: &'d Diagram, style: &'d Style, surface: C) -> Self {
        Self {
            diagram,
            style,
            surface,
            view: ViewState::default(),
            phase: Phase::Uninitialized,
            icons: None,
            subscription: None,
        }
    }

    /// Sets the zoom used from the first paint on.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::InvalidZoom`] for a non-positive or non-finite zoom.
    pub fn with_zoom(mut self, zoom: f32) -> Result<Self, ViewError> {
        self.view = self.view.with_zoom(zoom)?;
        Ok(self)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn view_state(&self) -> &ViewState {
        &self.view
    }

    pub fn surface(&self) -> &C {
        &self.surface
    }

    pub fn into_surface(self) -> C {
        self.surface
    }

    /// Whether a resize listener is currently registered.
    pub fn is_listening(&self) -> bool {
        self.subscription.is_some()
    }

    /// Loads every icon, paints the first frame and starts listening for resizes.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::AlreadyMounted`] unless the controller is
    /// uninitialized. An [`AssetError`](crate::assets::AssetError) from the
    /// loader or an invalid viewport leaves the controller
    /// [`Unavailable`](Phase::Unavailable) without painting anything.
    pub async fn mount<F, V>(
        &mut self,
        loader: &IconLoader<F>,
        icon_set: &IconSet,
        viewport: &V,
    ) -> Result<(), DbMagicError>
    where
        F: ImageFetcher,
        V: Viewport + ?Sized,
    {
        if self.phase != Phase::Uninitialized {
            return Err(ViewError::AlreadyMounted { phase: self.phase }.into());
        }

        self.transition(Phase::LoadingIcons);
        let icons = match loader.load_all(icon_set).await {
            Ok(icons) => icons,
            Err(err) => {
                warn!(err:% = err; "Diagram unavailable");
                self.transition(Phase::Unavailable);
                return Err(err.into());
            }
        };

        // The viewport may have changed while icons were loading.
        let event = ResizeEvent::new(viewport.size(), viewport.device_pixel_ratio());
        self.view = match self.view.with_viewport(event) {
            Ok(view) => view,
            Err(err) => {
                self.transition(Phase::Unavailable);
                return Err(err.into());
            }
        };

        self.icons = Some(icons);
        self.paint()?;
        self.subscription = Some(viewport.subscribe_resize());

        info!(
            entities_count = self.diagram.entities().len(),
            width = self.view.viewport().width(),
            height = self.view.viewport().height();
            "Diagram mounted"
        );
        Ok(())
    }

    /// Changes the zoom, repainting if the view is ready.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::InvalidZoom`] for a non-positive or non-finite zoom.
    pub fn set_zoom(&mut self, zoom: f32) -> Result<(), ViewError> {
        self.view = self.view.with_zoom(zoom)?;
        debug!(zoom; "Zoom changed");

        if self.phase == Phase::Ready {
            self.paint()?;
        }
        Ok(())
    }

    /// Applies a new viewport size and repaints.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::NotReady`] before the first paint, or a
    /// [`ViewError`] for an invalid size or device pixel ratio.
    pub fn handle_resize(&mut self, event: ResizeEvent) -> Result<(), ViewError> {
        self.ensure_ready()?;
        self.view = self.view.with_viewport(event)?;
        debug!(
            width = event.size().width(),
            height = event.size().height(),
            device_pixel_ratio = event.device_pixel_ratio();
            "Viewport resized"
        );
        self.paint()
    }

    /// Handles pending resize events in arrival order, one repaint each.
    ///
    /// Returns the number of events handled; zero when not listening.
    ///
    /// # Errors
    ///
    /// Stops at the first event that fails [`handle_resize`](Self::handle_resize).
    /// That event is consumed; later events stay queued for the next call.
    pub fn process_resize_events(&mut self) -> Result<usize, ViewError> {
        let mut count = 0;
        while let Some(event) = self
            .subscription
            .as_ref()
            .and_then(ResizeSubscription::next_event)
        {
            self.handle_resize(event)?;
            count += 1;
        }
        Ok(count)
    }

    /// Repaints the current frame.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::NotReady`] unless the view is ready.
    pub fn repaint(&mut self) -> Result<(), ViewError> {
        self.ensure_ready()?;
        self.paint()
    }

    /// Stops listening for resizes and forgets the loaded icons.
    ///
    /// The controller can be mounted again afterwards.
    pub fn unmount(&mut self) {
        self.subscription = None;
        self.icons = None;
        self.transition(Phase::Uninitialized);
    }

    fn ensure_ready(&self) -> Result<(), ViewError> {
        if self.phase == Phase::Ready {
            Ok(())
        } else {
            Err(ViewError::NotReady { phase: self.phase })
        }
    }

    fn paint(&mut self) -> Result<(), ViewError> {
        if self.icons.is_none() {
            return Err(ViewError::NotReady { phase: self.phase });
        }

        self.transition(Phase::Repainting);
        trace!(scale = self.view.scale(), zoom = self.view.zoom(); "Repainting");
        self.surface.resize(self.view.pixel_size());
        self.surface.set_transform(self.view.scale());
        if let Some(icons) = &self.icons {
            render_frame(
                &mut self.surface,
                self.diagram.entities(),
                icons,
                &self.view,
                self.style,
            );
        }
        self.transition(Phase::Ready);
        Ok(())
    }

    fn transition(&mut self, phase: Phase) {
        if self.phase != phase {
            debug!(from:% = self.phase, to:% = phase; "View phase changed");
            self.phase = phase;
        }
    }
}
