//! Frame- and event-driven orchestration of one interactive globe.
//!
//! A `GlobeView` is single-threaded: a host that renders on another thread
//! must keep the whole view behind one lock so rotation and catalog change together.

use std::sync::Arc;

use datasets::DatasetSource;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use runtime::{EventBus, EventKind, Frame, Metrics};
use scene::{ClickResolution, LinkedRecord, MarkerCatalog, ViewMode, resolve};
use tracing::{debug, info, warn};

use crate::GlobeError;
use crate::backend::{FrameState, RenderBackend, RenderConfig};
use crate::config::GlobeConfig;
use crate::globe_controller::{RotationState, Transition};
use crate::pointer::{CanvasRect, PointerController, PointerEvent, PointerOutcome};

/// Default CSS width before the host reports a layout.
pub const DEFAULT_CSS_WIDTH: f64 = 600.0;

pub type ClickHandler = Box<dyn FnMut(&LinkedRecord)>;

pub struct GlobeView<B: RenderBackend> {
    config: GlobeConfig,
    datasets: Box<dyn DatasetSource>,
    catalog: Arc<MarkerCatalog>,
    rotation: RotationState,
    pointer: PointerController,
    backend: B,
    on_click: Option<ClickHandler>,
    selection: Option<LinkedRecord>,
    auto_rotate: bool,
    /// Last rendered frame; `None` until the first `frame()`.
    last_frame: Option<Frame>,
    /// Effective rotation handed to the backend on the last rendered frame.
    rendered_rotation: Option<f64>,
    css_width: f64,
    rng: ChaCha8Rng,
    events: EventBus,
    metrics: Metrics,
}

impl<B: RenderBackend> GlobeView<B> {
    pub fn new(
        config: GlobeConfig,
        datasets: Box<dyn DatasetSource>,
        mut backend: B,
    ) -> Result<Self, GlobeError> {
        config.validate()?;

        let mut rng = match config.satellite_seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let mode = config.initial_mode;
        let catalog = MarkerCatalog::build(mode, datasets.as_ref(), config.satellite_count, &mut rng);
        backend.start(&RenderConfig::for_catalog(
            &catalog,
            config.device_pixel_ratio,
            config.theta,
        ))?;
        info!(%mode, markers = catalog.len(), "globe view started");

        Ok(Self {
            rotation: RotationState::new(config.drag_px_per_radian),
            pointer: PointerController::new(
                CanvasRect::square(DEFAULT_CSS_WIDTH),
                config.click_drag_threshold_px,
            ),
            auto_rotate: config.auto_rotate,
            catalog: Arc::new(catalog),
            config,
            datasets,
            backend,
            on_click: None,
            selection: None,
            last_frame: None,
            rendered_rotation: None,
            css_width: DEFAULT_CSS_WIDTH,
            rng,
            events: EventBus::new(),
            metrics: Metrics::new(),
        })
    }

    pub fn mode(&self) -> ViewMode {
        self.catalog.mode()
    }

    /// Shared handle to the active catalog.
    pub fn catalog(&self) -> Arc<MarkerCatalog> {
        Arc::clone(&self.catalog)
    }

    pub fn rotation(&self) -> &RotationState {
        &self.rotation
    }

    pub fn rendered_rotation(&self) -> Option<f64> {
        self.rendered_rotation
    }

    pub fn selection(&self) -> Option<&LinkedRecord> {
        self.selection.as_ref()
    }

    pub fn auto_rotate(&self) -> bool {
        self.auto_rotate
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    fn stamp(&self) -> Frame {
        self.last_frame.unwrap_or_default()
    }

    /// Swap to `mode`'s marker set and clear the selection.
    ///
    /// Rotation is kept. Re-selecting the active mode only clears the selection.
    /// If the renderer cannot start with the new markers, the view stays in
    /// the previous mode and the renderer is restarted with its markers.
    pub fn set_mode(&mut self, mode: ViewMode) -> Result<(), GlobeError> {
        if mode == self.catalog.mode() {
            self.selection = None;
            return Ok(());
        }

        let catalog = MarkerCatalog::build(
            mode,
            self.datasets.as_ref(),
            self.config.satellite_count,
            &mut self.rng,
        );
        if let Err(e) = self.backend.release() {
            warn!(error = %e, "renderer release failed during mode change");
        }
        if let Err(e) = self.backend.start(&RenderConfig::for_catalog(
            &catalog,
            self.config.device_pixel_ratio,
            self.config.theta,
        )) {
            warn!(error = %e, to = %mode, "renderer restart failed; keeping current mode");
            let current = RenderConfig::for_catalog(
                &self.catalog,
                self.config.device_pixel_ratio,
                self.config.theta,
            );
            if let Err(restore) = self.backend.start(&current) {
                warn!(error = %restore, "renderer could not be restored");
            }
            return Err(GlobeError::Backend(e));
        }

        let previous = self.catalog.mode();
        self.catalog = Arc::new(catalog);
        self.selection = None;
        self.metrics.inc_counter("mode_changes", 1);
        self.events.emit(
            self.stamp(),
            EventKind::ModeChanged,
            format!("{previous} -> {mode} ({} markers)", self.catalog.len()),
        );
        info!(from = %previous, to = %mode, markers = self.catalog.len(), "mode changed");
        Ok(())
    }

    pub fn set_auto_rotate(&mut self, enabled: bool) {
        if self.auto_rotate == enabled {
            return;
        }
        self.auto_rotate = enabled;
        self.events.emit(
            self.stamp(),
            EventKind::AutoRotateChanged,
            if enabled { "on" } else { "off" },
        );
        debug!(enabled, "auto-rotate toggled");
    }

    pub fn set_click_handler(&mut self, handler: impl FnMut(&LinkedRecord) + 'static) {
        self.on_click = Some(Box::new(handler));
    }

    pub fn clear_click_handler(&mut self) {
        self.on_click = None;
    }

    /// New layout: the canvas is square, `css_width` on a side, at (`left`, `top`).
    pub fn resize(&mut self, left: f64, top: f64, css_width: f64) {
        self.css_width = css_width;
        self.pointer
            .set_rect(CanvasRect::new(left, top, css_width, css_width));
    }

    /// Advance by one rendered frame covering `dt_s` seconds.
    pub fn frame(&mut self, dt_s: f64) -> FrameState {
        let frame = match self.last_frame {
            Some(prev) => prev.next_with_dt(dt_s),
            None => Frame::first(dt_s),
        };
        self.rotation
            .advance(&frame, self.config.auto_rotation, self.auto_rotate);

        let phi = self.rotation.effective_rotation();
        let side = self.css_width * self.config.device_pixel_ratio;
        let state = FrameState {
            phi,
            theta: self.config.theta,
            width: side,
            height: side,
        };
        self.backend.render(&state);

        self.last_frame = Some(frame);
        self.rendered_rotation = Some(phi);
        self.metrics.inc_counter("frames", 1);
        self.metrics.set_gauge("rotation_rad", phi);
        state
    }

    /// Feed one pointer event. Returns the resolution when a click was hit-tested.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> Option<ClickResolution> {
        let click = match self.pointer.handle(&mut self.rotation, event) {
            PointerOutcome::Ignored => return None,
            PointerOutcome::Rotation(t) => {
                self.record_rotation(t);
                return None;
            }
            PointerOutcome::Click(click) => click,
        };
        self.metrics.inc_counter("clicks", 1);
        self.events.emit(
            self.stamp(),
            EventKind::Click,
            format!("({:.3}, {:.3})", click.x, click.y),
        );
        if self.on_click.is_none() || self.catalog.clickable_count() == 0 {
            return None;
        }

        let catalog = Arc::clone(&self.catalog);
        let rotation = self
            .rendered_rotation
            .unwrap_or_else(|| self.rotation.effective_rotation());
        let resolution = resolve(click, rotation, &catalog);

        match resolution.marker(&catalog).and_then(|m| m.linked.as_ref()) {
            Some(record) => {
                self.selection = Some(record.clone());
                if let Some(handler) = self.on_click.as_mut() {
                    handler(record);
                }
                self.metrics.inc_counter("hits", 1);
                self.events.emit(
                    self.stamp(),
                    EventKind::Pick,
                    format!("{} at {:.4}", record.title(), resolution.distance),
                );
                info!(title = record.title(), distance = resolution.distance, "marker selected");
            }
            None => {
                self.metrics.inc_counter("misses", 1);
                self.events.emit(
                    self.stamp(),
                    EventKind::Miss,
                    format!("nearest {:.4}", resolution.distance),
                );
                debug!(nearest = resolution.distance, "click missed");
            }
        }
        Some(resolution)
    }

    fn record_rotation(&mut self, t: Transition) {
        match t {
            Transition::Started => {
                self.events
                    .emit(self.stamp(), EventKind::DragStarted, "drag started");
            }
            Transition::Ended { offset_rad } => {
                self.events.emit(
                    self.stamp(),
                    EventKind::DragEnded,
                    format!("offset {offset_rad:.4} rad"),
                );
            }
            Transition::Moved { .. } => {}
        }
    }

    /// Release the renderer. The view is consumed either way; a failure is
    /// returned so the host can surface it.
    pub fn close(mut self) -> Result<B, GlobeError> {
        self.on_click = None;
        self.events
            .emit(self.stamp(), EventKind::Teardown, "closing");
        match self.backend.release() {
            Ok(()) => Ok(self.backend),
            Err(e) => {
                warn!(error = %e, "renderer release failed on close");
                Err(GlobeError::Teardown(e))
            }
        }
    }
}
