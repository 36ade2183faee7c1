use serde::{Deserialize, Serialize};

use crate::error::{HydroError, HydroResult};

/// Lower bound applied to every time of concentration [min].
pub const TC_FLOOR_MIN: f64 = 10.0;

// Drainage basin description (immutable for one run)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BasinParameters {
    pub area: f64,   // Drainage area [km²]
    pub length: f64, // Main channel length [km]
    pub slope: f64,  // Elevation difference along the main channel [m]
    pub cn: f64,     // SCS curve number [-]
}

impl BasinParameters {
    pub fn new(area: f64, length: f64, slope: f64, cn: f64) -> Self {
        BasinParameters {
            area,
            length,
            slope,
            cn,
        }
    }

    // Kirpich time of concentration for this basin [min]
    pub fn time_of_concentration(&self) -> f64 {
        time_of_concentration(self.length, self.slope)
    }
}

/**
Kirpich time of concentration.

`tc = 57 * (L³ / H)^0.385`, with L the channel length in km and H the elevation
drop in m. The result is floored at [`TC_FLOOR_MIN`].

Non-positive geometry returns the floor directly instead of evaluating the power
function. Use [`try_time_of_concentration`] to get an error instead.
*/
pub fn time_of_concentration(length_km: f64, elevation_drop_m: f64) -> f64 {
    time_of_concentration_with_floor(length_km, elevation_drop_m, TC_FLOOR_MIN)
}

pub fn time_of_concentration_with_floor(length_km: f64, elevation_drop_m: f64, floor: f64) -> f64 {
    if length_km <= 0.0 || elevation_drop_m <= 0.0 {
        return floor;
    }
    kirpich(length_km, elevation_drop_m).max(floor)
}

/// Strict Kirpich estimate: zero, negative or non-finite geometry is an error.
pub fn try_time_of_concentration(
    length_km: f64,
    elevation_drop_m: f64,
    floor: f64,
) -> HydroResult<f64> {
    let valid = |v: f64| v.is_finite() && v > 0.0;
    if !valid(length_km) || !valid(elevation_drop_m) {
        return Err(HydroError::InvalidBasinGeometry {
            length_km,
            elevation_drop_m,
        });
    }
    Ok(kirpich(length_km, elevation_drop_m).max(floor))
}

fn kirpich(length_km: f64, elevation_drop_m: f64) -> f64 {
    let factor = length_km.powi(3) / elevation_drop_m;
    57.0 * factor.powf(0.385)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn kirpich_reference_basin() {
        // L = 5 km, H = 100 m -> 57 * 1.25^0.385
        let expected = 57.0 * 1.25_f64.powf(0.385);
        assert_relative_eq!(time_of_concentration(5.0, 100.0), expected, epsilon = 1e-12);
        assert!(time_of_concentration(5.0, 100.0) > TC_FLOOR_MIN);
    }

    #[test]
    fn short_steep_basin_is_floored() {
        assert_eq!(time_of_concentration(0.1, 500.0), TC_FLOOR_MIN);
    }

    #[test]
    fn degenerate_geometry_falls_back_to_floor() {
        assert_eq!(time_of_concentration(0.0, 100.0), TC_FLOOR_MIN);
        assert_eq!(time_of_concentration(5.0, 0.0), TC_FLOOR_MIN);
        assert_eq!(time_of_concentration(-1.0, -1.0), TC_FLOOR_MIN);
    }

    #[test]
    fn strict_variant_rejects_degenerate_geometry() {
        let err = try_time_of_concentration(5.0, 0.0, TC_FLOOR_MIN).unwrap_err();
        assert!(matches!(err, HydroError::InvalidBasinGeometry { .. }));
        assert!(try_time_of_concentration(f64::NAN, 100.0, TC_FLOOR_MIN).is_err());
    }

    #[test]
    fn strict_variant_matches_lenient_on_valid_input() {
        let strict = try_time_of_concentration(5.0, 100.0, TC_FLOOR_MIN).unwrap();
        assert_eq!(strict, time_of_concentration(5.0, 100.0));
    }

    #[test]
    fn basin_delegates_to_kirpich() {
        let basin = BasinParameters::new(10.0, 5.0, 100.0, 70.0);
        assert_eq!(basin.time_of_concentration(), time_of_concentration(5.0, 100.0));
    }
}
