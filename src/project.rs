/*!
Project files.

A project stores the raw calculator inputs and, for reference, the headline
results of the last run. Results are never trusted on reload: the model is
re-run from the inputs.
*/
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{HydroError, HydroResult};
use crate::hydrograph::{HydrographInputs, HydrographResult};

pub const APP_NAME: &str = "runoff_hydrograph";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub max_flow: f64,                 // [m³/s]
    pub peak_time: f64,                // [min]
    pub total_volume: f64,             // [m³]
    pub total_effective_rainfall: f64, // [mm]
    pub tc: f64,                       // [min]
    pub intensity: f64,                // [mm/h]
}

impl From<&HydrographResult> for ProjectSummary {
    fn from(result: &HydrographResult) -> Self {
        ProjectSummary {
            max_flow: result.max_flow,
            peak_time: result.peak_time,
            total_volume: result.total_volume,
            total_effective_rainfall: result.total_effective_rainfall,
            tc: result.tc,
            intensity: result.intensity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectFile {
    pub app_name: String,
    pub inputs: HydrographInputs,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<ProjectSummary>,
}

impl ProjectFile {
    pub fn new(inputs: HydrographInputs, result: Option<&HydrographResult>) -> Self {
        ProjectFile {
            app_name: APP_NAME.to_string(),
            inputs,
            results: result.map(ProjectSummary::from),
        }
    }

    pub fn to_toml_string(&self) -> HydroResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn from_toml_str(toml_str: &str) -> HydroResult<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> HydroResult<()> {
        let path = path.as_ref();
        fs::write(path, self.to_toml_string()?).map_err(|e| HydroError::io(path, e))
    }

    pub fn load(path: impl AsRef<Path>) -> HydroResult<Self> {
        let path = path.as_ref();
        let toml_str = fs::read_to_string(path).map_err(|e| HydroError::io(path, e))?;
        Self::from_toml_str(&toml_str)
    }
}
