use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::basin::TC_FLOOR_MIN;
use crate::convolution::DEFAULT_RAIN_EPSILON;
use crate::error::{HydroError, HydroResult};
use crate::huff::HuffQuartile;
use crate::unit_hydrograph::DEFAULT_TAIL_MARGIN;
use crate::validation::DEFAULT_LARGE_AREA_KM2;

// Engine discretisation and method settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub num_steps: usize,      // Design storm steps
    pub quartile: HuffQuartile, // Huff curve shaping the storm
    pub tc_floor_min: f64,     // Minimum time of concentration [min]
    pub strict_tc: bool,       // Reject degenerate geometry instead of using the floor
    pub uh_tail_margin: f64,   // Unit hydrograph samples past tb, as a factor of tb
    pub rain_epsilon: f64,     // Skipped effective rainfall increments [mm]
    pub large_area_km2: f64,   // Area above which a precision warning is raised [km²]
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            num_steps: 50,
            quartile: HuffQuartile::First,
            tc_floor_min: TC_FLOOR_MIN,
            strict_tc: false,
            uh_tail_margin: DEFAULT_TAIL_MARGIN,
            rain_epsilon: DEFAULT_RAIN_EPSILON,
            large_area_km2: DEFAULT_LARGE_AREA_KM2,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(toml_str: &str) -> HydroResult<Self> {
        let config: EngineConfig = toml::from_str(toml_str)?;
        config.check()?;
        Ok(config)
    }

    /// Reject settings that would truncate the unit hydrograph or make the
    /// pipeline meaningless.
    pub fn check(&self) -> HydroResult<()> {
        if self.num_steps == 0 {
            return Err(HydroError::InvalidStepCount);
        }
        let checks = [
            (
                "uh_tail_margin",
                self.uh_tail_margin,
                self.uh_tail_margin.is_finite() && self.uh_tail_margin >= 1.0,
                "must be a finite factor >= 1",
            ),
            (
                "rain_epsilon",
                self.rain_epsilon,
                self.rain_epsilon.is_finite() && self.rain_epsilon >= 0.0,
                "must be finite and >= 0",
            ),
            (
                "tc_floor_min",
                self.tc_floor_min,
                self.tc_floor_min.is_finite() && self.tc_floor_min > 0.0,
                "must be finite and > 0",
            ),
            (
                "large_area_km2",
                self.large_area_km2,
                self.large_area_km2.is_finite() && self.large_area_km2 > 0.0,
                "must be finite and > 0",
            ),
        ];
        match checks.into_iter().find(|(_, _, ok, _)| !ok) {
            Some((parameter, value, _, requirement)) => Err(HydroError::InvalidConfig {
                parameter,
                value,
                requirement,
            }),
            None => Ok(()),
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> HydroResult<Self> {
        let path = path.as_ref();
        let toml_str = fs::read_to_string(path).map_err(|e| HydroError::io(path, e))?;
        Self::from_toml_str(&toml_str)
    }
}
