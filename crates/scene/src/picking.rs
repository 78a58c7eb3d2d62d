use foundation::math::{
    GeoPoint, Vec2, Vec3, rotate_vector_around_vertical_axis, strictly_less, to_sphere_vector,
};

use crate::markers::{Marker, MarkerCatalog, ViewMode};

/// Maximum click-to-marker distance (unit-sphere space) per mode.
pub const COUNTRY_ACCEPTANCE_THRESHOLD: f64 = 0.25;
pub const STORY_ACCEPTANCE_THRESHOLD: f64 = 0.30;

/// `None` for modes without selectable markers.
pub fn acceptance_threshold(mode: ViewMode) -> Option<f64> {
    match mode {
        ViewMode::Countries => Some(COUNTRY_ACCEPTANCE_THRESHOLD),
        ViewMode::Stories => Some(STORY_ACCEPTANCE_THRESHOLD),
        ViewMode::Satellites => None,
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PickHit {
    /// Index into the catalog the click was resolved against.
    pub index: usize,
    pub distance: f64,
}

/// Outcome of one hit-test.
///
/// `distance` is the smallest distance seen over eligible markers, whether or
/// not it was accepted; `f64::INFINITY` when nothing was eligible.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ClickResolution {
    pub hit: Option<PickHit>,
    pub distance: f64,
}

impl ClickResolution {
    pub fn miss() -> Self {
        Self {
            hit: None,
            distance: f64::INFINITY,
        }
    }

    pub fn is_hit(&self) -> bool {
        self.hit.is_some()
    }

    /// The matched marker, looked up in the catalog this resolution came from.
    pub fn marker<'a>(&self, catalog: &'a MarkerCatalog) -> Option<&'a Marker> {
        self.hit.and_then(|h| catalog.get(h.index))
    }
}

/// Lift a normalized click onto the near hemisphere of the unit globe.
///
/// Returns `None` outside the projected disc or for non-finite input.
pub fn click_to_sphere(click: Vec2) -> Option<Vec3> {
    if !click.is_finite() || click.length() > 1.0 {
        return None;
    }
    let z = (1.0 - click.length_squared()).max(0.0).sqrt();
    Some(Vec3::new(click.x, click.y, z))
}

/// Marker position expressed in the click's frame for a globe turned by `rotation`.
pub fn marker_in_view(location: GeoPoint, rotation: f64) -> Vec3 {
    rotate_vector_around_vertical_axis(to_sphere_vector(location, 1.0), -rotation)
}

/// Find the clickable marker nearest to `click` (normalized canvas
/// coordinates, +y up) with the globe at `rotation` radians.
///
/// Ordering contract:
/// - Markers are scanned in catalog order with a strict less-than, so the
///   earliest marker wins an exact tie.
/// - Markers whose distance is NaN are ignored.
pub fn resolve(click: Vec2, rotation: f64, catalog: &MarkerCatalog) -> ClickResolution {
    let Some(threshold) = acceptance_threshold(catalog.mode()) else {
        return ClickResolution::miss();
    };
    if !rotation.is_finite() {
        return ClickResolution::miss();
    }
    let Some(point) = click_to_sphere(click) else {
        return ClickResolution::miss();
    };

    let mut best: Option<PickHit> = None;
    for (index, marker) in catalog.markers().iter().enumerate() {
        if !marker.is_clickable() {
            continue;
        }
        let distance = point.distance(marker_in_view(marker.location, rotation));
        if distance.is_nan() {
            continue;
        }
        if best.is_none_or(|b| strictly_less(distance, b.distance)) {
            best = Some(PickHit { index, distance });
        }
    }

    let Some(nearest) = best else {
        return ClickResolution::miss();
    };
    ClickResolution {
        hit: (nearest.distance < threshold).then_some(nearest),
        distance: nearest.distance,
    }
}
