use super::Vec3;

/// Mean Earth radius (kilometres) for great-circle distances.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Cartesian position on (or near) the unit globe.
///
/// Always derived from a [`GeoPoint`]; recompute instead of caching, since the
/// value is only meaningful for one rotation.
pub type SphereVector = Vec3;

/// Geographic coordinates in degrees.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GeoPoint {
    pub lat_deg: f64,
    pub lon_deg: f64,
}

impl GeoPoint {
    pub fn new(lat_deg: f64, lon_deg: f64) -> Self {
        Self { lat_deg, lon_deg }
    }

    /// Finite, latitude within [-90, 90] and longitude within [-180, 180].
    pub fn is_valid(&self) -> bool {
        self.lat_deg.is_finite()
            && self.lon_deg.is_finite()
            && (-90.0..=90.0).contains(&self.lat_deg)
            && (-180.0..=180.0).contains(&self.lon_deg)
    }
}

/// Geographic point to sphere-space vector.
///
/// Polar angle is measured from +y and azimuth from the antimeridian, which is
/// the convention the globe renderer projects markers with:
///
/// ```text
/// phi   = (90 - lat) * pi / 180
/// theta = (lon + 180) * pi / 180
/// x = -r sin(phi) cos(theta),  y = r cos(phi),  z = r sin(phi) sin(theta)
/// ```
pub fn to_sphere_vector(point: GeoPoint, radius: f64) -> SphereVector {
    let phi = (90.0 - point.lat_deg).to_radians();
    let theta = (point.lon_deg + 180.0).to_radians();
    let (sin_phi, cos_phi) = phi.sin_cos();
    let (sin_theta, cos_theta) = theta.sin_cos();

    Vec3::new(
        -(radius * sin_phi * cos_theta),
        radius * cos_phi,
        radius * sin_phi * sin_theta,
    )
}

/// Inverse of [`to_sphere_vector`] for any non-zero vector.
///
/// Longitude comes back wrapped into `[-180, 180)`; at the poles it is
/// arbitrary. Returns `None` for zero-length or non-finite input.
pub fn from_sphere_vector(v: SphereVector) -> Option<GeoPoint> {
    let r = v.length();
    if !r.is_finite() || r <= 0.0 {
        return None;
    }

    let phi = (v.y / r).clamp(-1.0, 1.0).acos();
    let theta = v.z.atan2(-v.x);

    let lat_deg = 90.0 - phi.to_degrees();
    let lon_deg = wrap_longitude_deg(theta.to_degrees() - 180.0);
    Some(GeoPoint::new(lat_deg, lon_deg))
}

/// Rotate the `(x, z)` plane by `angle` radians; `y` is untouched.
#[inline]
pub fn rotate_around_vertical_axis(x: f64, z: f64, angle: f64) -> (f64, f64) {
    let (s, c) = angle.sin_cos();
    (x * c - z * s, x * s + z * c)
}

/// [`rotate_around_vertical_axis`] applied to a full vector.
#[inline]
pub fn rotate_vector_around_vertical_axis(v: SphereVector, angle: f64) -> SphereVector {
    let (x, z) = rotate_around_vertical_axis(v.x, v.z, angle);
    Vec3::new(x, v.y, z)
}

/// Wrap a longitude into `[-180, 180)`.
pub fn wrap_longitude_deg(lon_deg: f64) -> f64 {
    (lon_deg + 180.0).rem_euclid(360.0) - 180.0
}

/// Haversine distance on a sphere of radius [`EARTH_RADIUS_KM`].
pub fn great_circle_distance_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let d_lat = (b.lat_deg - a.lat_deg).to_radians();
    let d_lon = (b.lon_deg - a.lon_deg).to_radians();
    let lat_a = a.lat_deg.to_radians();
    let lat_b = b.lat_deg.to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::{
        GeoPoint, from_sphere_vector, great_circle_distance_km, rotate_around_vertical_axis,
        rotate_vector_around_vertical_axis, to_sphere_vector, wrap_longitude_deg,
    };
    use crate::math::Vec3;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn equator_prime_meridian_faces_positive_x() {
        let v = to_sphere_vector(GeoPoint::new(0.0, 0.0), 1.0);
        assert_close(v.x, 1.0, 1e-12);
        assert_close(v.y, 0.0, 1e-12);
        assert_close(v.z, 0.0, 1e-12);
    }

    #[test]
    fn north_pole_is_up() {
        let v = to_sphere_vector(GeoPoint::new(90.0, 45.0), 1.0);
        assert_close(v.y, 1.0, 1e-12);
        assert_close(v.x, 0.0, 1e-12);
        assert_close(v.z, 0.0, 1e-12);
    }

    #[test]
    fn east_longitudes_have_negative_z() {
        let v = to_sphere_vector(GeoPoint::new(0.0, 90.0), 1.0);
        assert_close(v.x, 0.0, 1e-12);
        assert_close(v.z, -1.0, 1e-12);
    }

    #[test]
    fn radius_scales_vector() {
        let v = to_sphere_vector(GeoPoint::new(30.0, -60.0), 2.5);
        assert_close(v.length(), 2.5, 1e-12);
    }

    #[test]
    fn unit_norm_over_the_whole_globe() {
        let mut lat = -90.0;
        while lat <= 90.0 {
            let mut lon = -180.0;
            while lon <= 180.0 {
                let v = to_sphere_vector(GeoPoint::new(lat, lon), 1.0);
                assert_close(v.length(), 1.0, 1e-12);
                lon += 7.5;
            }
            lat += 7.5;
        }
    }

    #[test]
    fn round_trip_through_sphere_space() {
        for &(lat, lon) in &[(12.5, -71.25), (-33.9, 151.2), (51.5, -0.1), (0.0, 179.0)] {
            let p = GeoPoint::new(lat, lon);
            let back = from_sphere_vector(to_sphere_vector(p, 1.0)).expect("non-zero vector");
            assert_close(back.lat_deg, lat, 1e-9);
            assert_close(back.lon_deg, lon, 1e-9);
        }
    }

    #[test]
    fn from_sphere_vector_rejects_degenerate_input() {
        assert!(from_sphere_vector(Vec3::new(0.0, 0.0, 0.0)).is_none());
        assert!(from_sphere_vector(Vec3::new(f64::NAN, 0.0, 1.0)).is_none());
    }

    #[test]
    fn zero_rotation_is_identity() {
        let (x, z) = rotate_around_vertical_axis(0.3, -0.7, 0.0);
        assert_eq!((x, z), (0.3, -0.7));
    }

    #[test]
    fn rotation_then_inverse_restores_point() {
        let angle = 1.234;
        let (x, z) = rotate_around_vertical_axis(0.6, 0.8, angle);
        let (x, z) = rotate_around_vertical_axis(x, z, -angle);
        assert_close(x, 0.6, 1e-12);
        assert_close(z, 0.8, 1e-12);
    }

    #[test]
    fn quarter_turn_maps_x_onto_z() {
        let v = rotate_vector_around_vertical_axis(Vec3::new(1.0, 0.5, 0.0), std::f64::consts::FRAC_PI_2);
        assert_close(v.x, 0.0, 1e-12);
        assert_close(v.y, 0.5, 1e-12);
        assert_close(v.z, 1.0, 1e-12);
    }

    #[test]
    fn wraps_longitude() {
        assert_eq!(wrap_longitude_deg(190.0), -170.0);
        assert_eq!(wrap_longitude_deg(-180.0), -180.0);
        assert_eq!(wrap_longitude_deg(180.0), -180.0);
        assert_eq!(wrap_longitude_deg(45.0), 45.0);
    }

    #[test]
    fn validates_ranges() {
        assert!(GeoPoint::new(90.0, -180.0).is_valid());
        assert!(!GeoPoint::new(90.5, 0.0).is_valid());
        assert!(!GeoPoint::new(0.0, 181.0).is_valid());
        assert!(!GeoPoint::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn great_circle_quarter_meridian() {
        let d = great_circle_distance_km(GeoPoint::new(0.0, 0.0), GeoPoint::new(90.0, 0.0));
        assert_close(d, std::f64::consts::FRAC_PI_2 * 6371.0, 1e-6);
        assert_close(
            great_circle_distance_km(GeoPoint::new(10.0, 10.0), GeoPoint::new(10.0, 10.0)),
            0.0,
            1e-12,
        );
    }
}
