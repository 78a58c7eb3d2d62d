//! Seam between the globe view and whatever draws it.

use scene::{MarkerCatalog, ViewMode};
use serde::Serialize;

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct RenderMarker {
    /// `[lat, lon]` in degrees.
    pub location: [f64; 2],
    pub size: f64,
}

/// Everything a backend needs to (re)initialize for one marker set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderConfig {
    pub device_pixel_ratio: f64,
    pub phi: f64,
    pub theta: f64,
    pub dark: f64,
    pub diffuse: f64,
    pub map_samples: u32,
    pub map_brightness: f64,
    pub base_color: [f32; 3],
    pub glow_color: [f32; 3],
    pub marker_color: [f32; 3],
    pub markers: Vec<RenderMarker>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            device_pixel_ratio: 2.0,
            phi: 0.0,
            theta: 0.3,
            dark: 1.0,
            diffuse: 3.0,
            map_samples: 16_000,
            map_brightness: 1.2,
            base_color: [0.1, 0.1, 0.15],
            glow_color: [0.05, 0.1, 0.2],
            marker_color: ViewMode::default().marker_color(),
            markers: Vec::new(),
        }
    }
}

impl RenderConfig {
    /// Config for `catalog` with the given display parameters.
    pub fn for_catalog(catalog: &MarkerCatalog, device_pixel_ratio: f64, theta: f64) -> Self {
        Self {
            device_pixel_ratio,
            theta,
            marker_color: catalog.mode().marker_color(),
            markers: catalog
                .markers()
                .iter()
                .map(|m| RenderMarker {
                    location: [m.location.lat_deg, m.location.lon_deg],
                    size: m.size,
                })
                .collect(),
            ..Self::default()
        }
    }
}

/// Per-frame values the backend reads before drawing.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct FrameState {
    pub phi: f64,
    pub theta: f64,
    /// Drawing-buffer size in device pixels.
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    Init(String),
    Release(String),
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendError::Init(msg) => write!(f, "renderer init failed: {msg}"),
            BackendError::Release(msg) => write!(f, "renderer release failed: {msg}"),
        }
    }
}

impl std::error::Error for BackendError {}

pub trait RenderBackend {
    /// Start (or restart) drawing with `config`.
    fn start(&mut self, config: &RenderConfig) -> Result<(), BackendError>;
    fn render(&mut self, frame: &FrameState);
    fn release(&mut self) -> Result<(), BackendError>;
}

/// Headless backend that keeps every config and frame it receives.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    pub configs: Vec<RenderConfig>,
    pub frames: Vec<FrameState>,
    pub releases: usize,
    /// Every `start` call, including failed ones.
    pub start_attempts: usize,
    running: bool,
    /// 0-based `start` attempt that fails.
    fail_start_at: Option<usize>,
    fail_release: bool,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_start() -> Self {
        Self::failing_start_at(0)
    }

    /// Succeeds on every `start` except attempt `attempt` (0-based).
    pub fn failing_start_at(attempt: usize) -> Self {
        Self {
            fail_start_at: Some(attempt),
            ..Self::default()
        }
    }

    pub fn failing_release() -> Self {
        Self {
            fail_release: true,
            ..Self::default()
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn last_config(&self) -> Option<&RenderConfig> {
        self.configs.last()
    }

    pub fn last_frame(&self) -> Option<&FrameState> {
        self.frames.last()
    }
}

impl RenderBackend for RecordingBackend {
    fn start(&mut self, config: &RenderConfig) -> Result<(), BackendError> {
        let attempt = self.start_attempts;
        self.start_attempts += 1;
        if self.fail_start_at == Some(attempt) {
            return Err(BackendError::Init("recording backend set to fail".to_string()));
        }
        self.configs.push(config.clone());
        self.running = true;
        Ok(())
    }

    fn render(&mut self, frame: &FrameState) {
        if self.running {
            self.frames.push(*frame);
        }
    }

    fn release(&mut self) -> Result<(), BackendError> {
        self.running = false;
        self.releases += 1;
        if self.fail_release {
            return Err(BackendError::Release("recording backend set to fail".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{FrameState, RecordingBackend, RenderBackend, RenderConfig};
    use foundation::math::GeoPoint;
    use scene::{Marker, MarkerCatalog, ViewMode};

    #[test]
    fn defaults_match_renderer_options() {
        let c = RenderConfig::default();
        assert_eq!(c.device_pixel_ratio, 2.0);
        assert_eq!(c.theta, 0.3);
        assert_eq!(c.map_samples, 16_000);
        assert_eq!(c.base_color, [0.1, 0.1, 0.15]);
        assert_eq!(c.glow_color, [0.05, 0.1, 0.2]);
    }

    #[test]
    fn catalog_config_carries_markers_and_colour() {
        let catalog = MarkerCatalog::from_markers(
            ViewMode::Satellites,
            vec![Marker {
                location: GeoPoint::new(12.0, -40.0),
                size: 0.008,
                linked: None,
            }],
        );
        let c = RenderConfig::for_catalog(&catalog, 1.0, 0.5);
        assert_eq!(c.marker_color, [0.9, 0.9, 1.0]);
        assert_eq!(c.markers.len(), 1);
        assert_eq!(c.markers[0].location, [12.0, -40.0]);
        assert_eq!(c.device_pixel_ratio, 1.0);
        assert_eq!(c.theta, 0.5);
        assert_eq!(c.dark, 1.0);
    }

    #[test]
    fn recording_backend_only_records_while_running() {
        let mut b = RecordingBackend::new();
        let frame = FrameState {
            phi: 0.1,
            theta: 0.3,
            width: 1200.0,
            height: 1200.0,
        };
        b.render(&frame);
        assert!(b.frames.is_empty());

        b.start(&RenderConfig::default()).expect("start");
        b.render(&frame);
        assert_eq!(b.last_frame(), Some(&frame));

        b.release().expect("release");
        b.render(&frame);
        assert_eq!(b.frames.len(), 1);
        assert_eq!(b.releases, 1);
    }

    #[test]
    fn failure_modes() {
        assert!(RecordingBackend::failing_start().start(&RenderConfig::default()).is_err());
        let mut b = RecordingBackend::failing_release();
        b.start(&RenderConfig::default()).expect("start");
        assert!(b.release().is_err());
        assert!(!b.is_running());
    }
}
