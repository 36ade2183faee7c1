//! Intensity-Duration-Frequency equations.
//!
//! All formulas share the form `I = K * TR^a / (t + b)^c`, with `I` in mm/h,
//! `TR` in years and `t` in minutes. Regional coefficient sets are kept in a
//! TOML catalogue (see `idf_parameters.toml` at the crate root).

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{HydroError, HydroResult, InputWarning};

// IDF coefficients
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IdfParameters {
    #[serde(rename = "K")]
    pub k: f64, // Scale coefficient
    pub a: f64, // Return period exponent
    pub b: f64, // Duration offset [min]
    pub c: f64, // Duration exponent
}

impl IdfParameters {
    pub fn new(k: f64, a: f64, b: f64, c: f64) -> Self {
        IdfParameters { k, a, b, c }
    }

    /// Rainfall intensity [mm/h] for a return period [years] and duration [min].
    pub fn intensity(&self, return_period: f64, duration_min: f64) -> f64 {
        self.k * return_period.powf(self.a) / (duration_min + self.b).powf(self.c)
    }

    /// Total storm depth [mm]: intensity times duration in hours.
    pub fn total_depth(&self, return_period: f64, duration_min: f64) -> f64 {
        self.intensity(return_period, duration_min) * duration_min / 60.0
    }
}

impl Default for IdfParameters {
    // Curitiba (Prado Velho station)
    fn default() -> Self {
        IdfParameters::new(5726.64, 0.159, 41.0, 1.041)
    }
}

// Design storm definition (immutable for one run)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StormParameters {
    pub tr: f64,       // Return period [years]
    pub duration: f64, // Storm duration [min]
    #[serde(default)]
    pub idf: IdfParameters,
}

impl StormParameters {
    pub fn new(tr: f64, duration: f64, idf: IdfParameters) -> Self {
        StormParameters { tr, duration, idf }
    }

    pub fn intensity(&self) -> f64 {
        self.idf.intensity(self.tr, self.duration)
    }

    pub fn total_depth(&self) -> f64 {
        self.idf.total_depth(self.tr, self.duration)
    }
}

/// A named regional IDF formula with the range of durations and return periods
/// it was fitted on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdfFormula {
    pub name: String,
    pub city: String,
    pub state: String,
    pub k: f64,
    pub a: f64,
    pub b: f64,
    pub c: f64,
    #[serde(default = "default_duration_min")]
    pub duration_min: f64,
    #[serde(default = "default_duration_max")]
    pub duration_max: f64,
    #[serde(default = "default_return_period_min")]
    pub return_period_min: f64,
    #[serde(default = "default_return_period_max")]
    pub return_period_max: f64,
    #[serde(default)]
    pub source: String,
}

fn default_duration_min() -> f64 {
    5.0
}

fn default_duration_max() -> f64 {
    1440.0
}

fn default_return_period_min() -> f64 {
    2.0
}

fn default_return_period_max() -> f64 {
    100.0
}

impl IdfFormula {
    pub fn parameters(&self) -> IdfParameters {
        IdfParameters::new(self.k, self.a, self.b, self.c)
    }

    pub fn label(&self) -> String {
        format!("{}/{} - {}", self.city, self.state, self.name)
    }

    /// Warnings for a storm that falls outside the fitted range of this formula.
    pub fn range_warnings(&self, return_period: f64, duration_min: f64) -> Vec<InputWarning> {
        let mut warnings = Vec::new();
        if duration_min < self.duration_min || duration_min > self.duration_max {
            warnings.push(InputWarning::OutsideIdfRange {
                formula: self.label(),
                parameter: "duration",
                value: duration_min,
                min: self.duration_min,
                max: self.duration_max,
            });
        }
        if return_period < self.return_period_min || return_period > self.return_period_max {
            warnings.push(InputWarning::OutsideIdfRange {
                formula: self.label(),
                parameter: "return period",
                value: return_period,
                min: self.return_period_min,
                max: self.return_period_max,
            });
        }
        warnings
    }
}

/// Catalogue of regional IDF formulas keyed by identifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdfCatalog {
    formulas: BTreeMap<String, IdfFormula>,
}

impl IdfCatalog {
    pub fn from_toml_str(toml_str: &str) -> HydroResult<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> HydroResult<Self> {
        let path = path.as_ref();
        let toml_str = fs::read_to_string(path).map_err(|e| HydroError::io(path, e))?;
        Self::from_toml_str(&toml_str)
    }

    pub fn get(&self, id: &str) -> HydroResult<&IdfFormula> {
        self.formulas
            .get(&id.to_lowercase())
            .ok_or_else(|| HydroError::UnknownIdfFormula(id.to_string()))
    }

    pub fn len(&self) -> usize {
        self.formulas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formulas.is_empty()
    }

    // Formulas ordered by city, then state, then name (case-insensitive)
    pub fn sorted(&self) -> Vec<(&str, &IdfFormula)> {
        let mut entries: Vec<(&str, &IdfFormula)> = self
            .formulas
            .iter()
            .map(|(id, f)| (id.as_str(), f))
            .collect();
        entries.sort_by_key(|(_, f)| (sort_key(&f.city), sort_key(&f.state), sort_key(&f.name)));
        entries
    }
}

// Lowercase with Portuguese diacritics folded, so "São Paulo" sorts as "sao paulo"
fn sort_key(s: &str) -> String {
    s.chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            'ñ' => 'n',
            other => other,
        })
        .collect()
}
