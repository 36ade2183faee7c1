use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

pub type HydroResult<T> = Result<T, HydroError>;

// Hard failure found while checking basin/storm inputs
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("invalid basin geometry: {parameter} = {value} (must be > 0)")]
    InvalidBasinGeometry { parameter: &'static str, value: f64 },

    #[error("curve number {0} outside the valid range [30, 100]")]
    CurveNumberOutOfRange(f64),

    #[error("storm duration {0} min is below the 10 min minimum")]
    InvalidStormDuration(f64),

    #[error("return period {0} years must be > 0")]
    InvalidReturnPeriod(f64),
}

// Soft warning, the run still goes ahead
#[derive(Debug, Clone, PartialEq)]
pub enum InputWarning {
    LargeBasinArea { area_km2: f64, limit_km2: f64 },
    AtypicalCurveNumber(f64),
    OutsideIdfRange {
        formula: String,
        parameter: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

impl fmt::Display for InputWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputWarning::LargeBasinArea {
                area_km2,
                limit_km2,
            } => write!(
                f,
                "basin area {area_km2} km² exceeds {limit_km2} km², SCS method precision is reduced"
            ),
            InputWarning::AtypicalCurveNumber(cn) => {
                write!(f, "curve number {cn} is atypically low (< 40)")
            }
            InputWarning::OutsideIdfRange {
                formula,
                parameter,
                value,
                min,
                max,
            } => write!(
                f,
                "{parameter} = {value} is outside the fitted range [{min}, {max}] of IDF formula '{formula}'"
            ),
        }
    }
}

#[derive(Debug, Error)]
pub enum HydroError {
    #[error("{} invalid input(s): {}", .0.len(), join_messages(.0))]
    InvalidInputs(Vec<InputError>),

    #[error("invalid basin geometry: length = {length_km} km, elevation drop = {elevation_drop_m} m")]
    InvalidBasinGeometry {
        length_km: f64,
        elevation_drop_m: f64,
    },

    #[error("invalid storm duration: {0} min")]
    InvalidStormDuration(f64),

    #[error("step count must be at least 1")]
    InvalidStepCount,

    #[error("invalid engine setting: {parameter} = {value} ({requirement})")]
    InvalidConfig {
        parameter: &'static str,
        value: f64,
        requirement: &'static str,
    },

    #[error("step width mismatch: expected {expected} min, got {actual} min")]
    StepWidthMismatch { expected: f64, actual: f64 },

    #[error("{0} series is empty")]
    EmptySeries(&'static str),

    #[error("unknown IDF formula '{0}'")]
    UnknownIdfFormula(String),

    #[error("unknown combination of soil group '{soil_group}' and land use '{land_use}'")]
    UnknownLandUse {
        soil_group: String,
        land_use: String,
    },

    #[error("failed to access {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("failed to write TOML: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

impl HydroError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        HydroError::Io {
            path: path.into(),
            source,
        }
    }
}

fn join_messages(errors: &[InputError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_inputs_lists_every_message() {
        let err = HydroError::InvalidInputs(vec![
            InputError::CurveNumberOutOfRange(120.0),
            InputError::InvalidStormDuration(5.0),
        ]);
        let msg = err.to_string();
        assert!(msg.starts_with("2 invalid input(s)"));
        assert!(msg.contains("curve number 120"));
        assert!(msg.contains("5 min"));
    }

    #[test]
    fn warning_messages_are_readable() {
        let w = InputWarning::AtypicalCurveNumber(35.0);
        assert_eq!(w.to_string(), "curve number 35 is atypically low (< 40)");
    }
}
