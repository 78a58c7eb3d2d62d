//! Illustrative constellation scatter.
//!
//! Positions are a static scatter per shell, not propagated orbits: longitude
//! is spread evenly and latitude is jittered inside the shell's inclination band.

use foundation::math::GeoPoint;
use rand::Rng;

/// One orbital shell of the constellation.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OrbitalShell {
    pub altitude_km: f64,
    pub inclination_deg: f64,
    /// Satellites in this shell when the constellation has its nominal size.
    pub nominal_count: usize,
}

/// Nominal constellation size the shell shares are expressed against.
pub const NOMINAL_CONSTELLATION_SIZE: usize = 6900;

/// Largest scatter ever generated; larger requests are clamped to it.
pub const MAX_SATELLITE_COUNT: usize = 100_000;

pub const CONSTELLATION_SHELLS: [OrbitalShell; 4] = [
    OrbitalShell {
        altitude_km: 550.0,
        inclination_deg: 53.0,
        nominal_count: 4400,
    },
    OrbitalShell {
        altitude_km: 540.0,
        inclination_deg: 53.2,
        nominal_count: 1600,
    },
    OrbitalShell {
        altitude_km: 570.0,
        inclination_deg: 70.0,
        nominal_count: 700,
    },
    // Polar shell; its band is wider than the latitude range and gets clamped.
    OrbitalShell {
        altitude_km: 560.0,
        inclination_deg: 97.6,
        nominal_count: 200,
    },
];

#[derive(Debug, Clone, PartialEq)]
pub struct SatellitePosition {
    pub id: usize,
    pub location: GeoPoint,
    pub altitude_km: f64,
    pub inclination_deg: f64,
    /// 1-based shell number.
    pub shell: usize,
}

impl OrbitalShell {
    /// This shell's share of a constellation of `total` satellites (floored).
    pub fn count_for(&self, total: usize) -> usize {
        let scaled = self.nominal_count as u128 * total as u128 / NOMINAL_CONSTELLATION_SIZE as u128;
        scaled as usize
    }
}

/// Scatter `count` satellites across [`CONSTELLATION_SHELLS`].
///
/// Flooring per shell means the result can hold slightly fewer than `count`
/// entries, and `count` is clamped to [`MAX_SATELLITE_COUNT`]. Output order is
/// shell by shell, west to east; only latitude draws from `rng`.
pub fn generate_satellite_positions<R: Rng + ?Sized>(
    count: usize,
    rng: &mut R,
) -> Vec<SatellitePosition> {
    let count = count.min(MAX_SATELLITE_COUNT);
    let total: usize = CONSTELLATION_SHELLS.iter().map(|s| s.count_for(count)).sum();
    let mut satellites = Vec::with_capacity(total);

    for (shell_idx, shell) in CONSTELLATION_SHELLS.iter().enumerate() {
        let in_shell = shell.count_for(count);
        let band = shell.inclination_deg;

        for i in 0..in_shell {
            let lon_deg = (i as f64 / in_shell as f64) * 360.0 - 180.0;
            let lat_deg = rng.gen_range(-band..band).clamp(-90.0, 90.0);

            satellites.push(SatellitePosition {
                id: satellites.len(),
                location: GeoPoint::new(lat_deg, lon_deg),
                altitude_km: shell.altitude_km,
                inclination_deg: shell.inclination_deg,
                shell: shell_idx + 1,
            });
        }
    }

    satellites
}

#[cfg(test)]
mod tests {
    use super::{
        CONSTELLATION_SHELLS, MAX_SATELLITE_COUNT, NOMINAL_CONSTELLATION_SIZE,
        generate_satellite_positions,
    };
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn nominal_size_fills_every_shell_exactly() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let sats = generate_satellite_positions(NOMINAL_CONSTELLATION_SIZE, &mut rng);
        assert_eq!(sats.len(), NOMINAL_CONSTELLATION_SIZE);

        for (idx, shell) in CONSTELLATION_SHELLS.iter().enumerate() {
            let n = sats.iter().filter(|s| s.shell == idx + 1).count();
            assert_eq!(n, shell.nominal_count);
        }
    }

    #[test]
    fn shell_counts_are_floored() {
        // 100 / 6900 of each shell: 63, 23, 10, 2.
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let sats = generate_satellite_positions(100, &mut rng);
        assert_eq!(sats.len(), 63 + 23 + 10 + 2);
        assert!(generate_satellite_positions(0, &mut rng).is_empty());
    }

    #[test]
    fn oversized_requests_are_clamped() {
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let sats = generate_satellite_positions(usize::MAX / 2, &mut rng);
        let expected: usize = CONSTELLATION_SHELLS
            .iter()
            .map(|s| s.count_for(MAX_SATELLITE_COUNT))
            .sum();
        assert_eq!(sats.len(), expected);
        assert!(sats.len() <= MAX_SATELLITE_COUNT);
    }

    #[test]
    fn ids_are_sequential() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let sats = generate_satellite_positions(500, &mut rng);
        assert!(sats.iter().enumerate().all(|(i, s)| s.id == i));
    }

    #[test]
    fn longitudes_spread_from_antimeridian() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let sats = generate_satellite_positions(NOMINAL_CONSTELLATION_SIZE, &mut rng);
        let first_shell: Vec<_> = sats.iter().filter(|s| s.shell == 1).collect();
        assert_eq!(first_shell[0].location.lon_deg, -180.0);
        assert!(first_shell.iter().all(|s| (-180.0..180.0).contains(&s.location.lon_deg)));
        assert!(
            first_shell
                .windows(2)
                .all(|w| w[0].location.lon_deg < w[1].location.lon_deg)
        );
    }

    #[test]
    fn latitudes_stay_inside_band_and_globe() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for sat in generate_satellite_positions(NOMINAL_CONSTELLATION_SIZE, &mut rng) {
            assert!(sat.location.lat_deg.abs() <= sat.inclination_deg);
            assert!(sat.location.is_valid());
        }
    }

    #[test]
    fn same_seed_same_scatter() {
        let a = generate_satellite_positions(300, &mut ChaCha8Rng::seed_from_u64(9));
        let b = generate_satellite_positions(300, &mut ChaCha8Rng::seed_from_u64(9));
        assert_eq!(a, b);
    }
}
