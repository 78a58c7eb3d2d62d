//! Interactive globe core: rotation, pointer routing, click resolution and the
//! renderer seam, tied together by [`GlobeView`].

pub mod backend;
pub mod config;
pub mod globe_controller;
pub mod pointer;
pub mod view;

pub use backend::{
    BackendError, FrameState, RecordingBackend, RenderBackend, RenderConfig, RenderMarker,
};
pub use config::{ConfigError, GlobeConfig};
pub use globe_controller::{AutoRotation, DragEvent, DragPhase, RotationState, Transition};
pub use pointer::{CanvasRect, PointerController, PointerEvent, PointerOutcome};
pub use view::{ClickHandler, GlobeView};

#[derive(Debug, Clone, PartialEq)]
pub enum GlobeError {
    Config(ConfigError),
    Backend(BackendError),
    /// Renderer release failed while closing. The view is gone either way.
    Teardown(BackendError),
}

impl std::fmt::Display for GlobeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GlobeError::Config(e) => write!(f, "{e}"),
            GlobeError::Backend(e) => write!(f, "{e}"),
            GlobeError::Teardown(e) => write!(f, "teardown: {e}"),
        }
    }
}

impl std::error::Error for GlobeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GlobeError::Config(e) => Some(e),
            GlobeError::Backend(e) | GlobeError::Teardown(e) => Some(e),
        }
    }
}

impl From<ConfigError> for GlobeError {
    fn from(e: ConfigError) -> Self {
        GlobeError::Config(e)
    }
}

impl From<BackendError> for GlobeError {
    fn from(e: BackendError) -> Self {
        GlobeError::Backend(e)
    }
}
