use datasets::{CountryRecord, DatasetSource, Located, StoryRecord};
use foundation::math::GeoPoint;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::satellites::generate_satellite_positions;

/// Relative marker sizes in renderer world units.
pub const COUNTRY_MARKER_SIZE: f64 = 0.08;
pub const SATELLITE_MARKER_SIZE: f64 = 0.008;
pub const STORY_MARKER_SIZE: f64 = 0.1;

/// Which marker set the globe shows.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Countries,
    Satellites,
    Stories,
}

impl ViewMode {
    pub const ALL: [ViewMode; 3] = [ViewMode::Countries, ViewMode::Satellites, ViewMode::Stories];

    pub fn as_str(self) -> &'static str {
        match self {
            ViewMode::Countries => "countries",
            ViewMode::Satellites => "satellites",
            ViewMode::Stories => "stories",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ViewMode::Countries => "Coverage",
            ViewMode::Satellites => "Constellation",
            ViewMode::Stories => "Impact Stories",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ViewMode::Countries => "Countries with service",
            ViewMode::Satellites => "Satellites in orbit",
            ViewMode::Stories => "Making a difference worldwide",
        }
    }

    /// Linear RGB marker colour for the renderer.
    pub fn marker_color(self) -> [f32; 3] {
        match self {
            ViewMode::Countries => [0.2, 0.8, 1.0],
            ViewMode::Satellites => [0.9, 0.9, 1.0],
            ViewMode::Stories => [1.0, 0.4, 0.4],
        }
    }

    pub fn marker_size(self) -> f64 {
        match self {
            ViewMode::Countries => COUNTRY_MARKER_SIZE,
            ViewMode::Satellites => SATELLITE_MARKER_SIZE,
            ViewMode::Stories => STORY_MARKER_SIZE,
        }
    }
}

impl std::fmt::Display for ViewMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseViewModeError(pub String);

impl std::fmt::Display for ParseViewModeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown view mode {:?} (expected countries, satellites or stories)",
            self.0
        )
    }
}

impl std::error::Error for ParseViewModeError {}

impl std::str::FromStr for ViewMode {
    type Err = ParseViewModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "countries" | "coverage" => Ok(ViewMode::Countries),
            "satellites" | "constellation" => Ok(ViewMode::Satellites),
            "stories" | "impact-stories" => Ok(ViewMode::Stories),
            _ => Err(ParseViewModeError(s.to_string())),
        }
    }
}

/// Record a clickable marker stands for.
#[derive(Debug, Clone, PartialEq)]
pub enum LinkedRecord {
    Country(CountryRecord),
    Story(StoryRecord),
}

impl LinkedRecord {
    /// Display name: country name or story title.
    pub fn title(&self) -> &str {
        match self {
            LinkedRecord::Country(c) => &c.name,
            LinkedRecord::Story(s) => &s.title,
        }
    }

    pub fn location(&self) -> GeoPoint {
        match self {
            LinkedRecord::Country(c) => c.geo_point(),
            LinkedRecord::Story(s) => s.geo_point(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub location: GeoPoint,
    /// Render hint only.
    pub size: f64,
    /// `None` means the marker is decorative and never selectable.
    pub linked: Option<LinkedRecord>,
}

impl Marker {
    pub fn is_clickable(&self) -> bool {
        self.linked.is_some()
    }
}

/// The ordered marker set for one mode.
///
/// A catalog is never patched: switching modes builds a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerCatalog {
    mode: ViewMode,
    markers: Vec<Marker>,
}

impl MarkerCatalog {
    /// Map the dataset for `mode` to markers, one per record, in record order.
    ///
    /// `satellite_count` and `rng` are only consulted in satellite mode.
    pub fn build<R: Rng + ?Sized>(
        mode: ViewMode,
        datasets: &dyn DatasetSource,
        satellite_count: usize,
        rng: &mut R,
    ) -> Self {
        let size = mode.marker_size();
        let markers: Vec<Marker> = match mode {
            ViewMode::Countries => datasets
                .countries()
                .iter()
                .map(|c| Marker {
                    location: c.geo_point(),
                    size,
                    linked: Some(LinkedRecord::Country(c.clone())),
                })
                .collect(),
            ViewMode::Satellites => generate_satellite_positions(satellite_count, rng)
                .into_iter()
                .map(|s| Marker {
                    location: s.location,
                    size,
                    linked: None,
                })
                .collect(),
            ViewMode::Stories => datasets
                .stories()
                .iter()
                .map(|s| Marker {
                    location: s.geo_point(),
                    size,
                    linked: Some(LinkedRecord::Story(s.clone())),
                })
                .collect(),
        };

        debug!(%mode, markers = markers.len(), "built marker catalog");
        Self { mode, markers }
    }

    /// A catalog for `mode` with no markers.
    pub fn empty(mode: ViewMode) -> Self {
        Self {
            mode,
            markers: Vec::new(),
        }
    }

    /// Catalog from explicit markers, for hosts that source markers elsewhere.
    pub fn from_markers(mode: ViewMode, markers: Vec<Marker>) -> Self {
        Self { mode, markers }
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn get(&self, index: usize) -> Option<&Marker> {
        self.markers.get(index)
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn clickable_count(&self) -> usize {
        self.markers.iter().filter(|m| m.is_clickable()).count()
    }
}
