use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::basin::{BasinParameters, time_of_concentration_with_floor, try_time_of_concentration};
use crate::config::EngineConfig;
use crate::convolution::{OutflowHydrograph, route};
use crate::error::{HydroResult, InputWarning};
use crate::huff::{StormDistribution, distribute};
use crate::idf::{IdfFormula, IdfParameters, StormParameters};
use crate::runoff::{ScsAbstraction, abstract_losses};
use crate::unit_hydrograph::UnitHydrograph;
use crate::validation::validate;

// Raw calculator inputs, as stored in project files
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HydrographInputs {
    pub area: f64,     // Drainage area [km²]
    pub length: f64,   // Main channel length [km]
    pub slope: f64,    // Elevation difference [m]
    pub cn: f64,       // Curve number [-]
    pub tr: f64,       // Return period [years]
    pub duration: f64, // Storm duration [min]
    #[serde(default)]
    pub idf: IdfParameters,
}

impl HydrographInputs {
    pub fn basin(&self) -> BasinParameters {
        BasinParameters::new(self.area, self.length, self.slope, self.cn)
    }

    pub fn storm(&self) -> StormParameters {
        StormParameters::new(self.tr, self.duration, self.idf)
    }
}

impl Default for HydrographInputs {
    // Worked example: 10 km² basin, CN 70, 10-year storm of 65 min
    fn default() -> Self {
        HydrographInputs {
            area: 10.0,
            length: 5.0,
            slope: 100.0,
            cn: 70.0,
            tr: 10.0,
            duration: 65.0,
            idf: IdfParameters::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HydrographResult {
    pub tc: f64,           // Time of concentration [min]
    pub intensity: f64,    // Design intensity [mm/h]
    pub total_precip: f64, // Storm depth [mm]
    pub storm: StormDistribution,
    pub abstraction: ScsAbstraction,
    pub unit_hydrograph: UnitHydrograph,
    pub outflow: OutflowHydrograph,
    pub dt: f64,                       // Common step width [min]
    pub max_flow: f64,                 // Peak discharge [m³/s]
    pub peak_time: f64,                // Time of peak discharge [min]
    pub total_volume: f64,             // Runoff volume [m³]
    pub total_effective_rainfall: f64, // Effective rainfall depth [mm]
    pub warnings: Vec<InputWarning>,
}

/// Design storm to outflow hydrograph for one basin.
pub struct RunoffModel {
    inputs: HydrographInputs,
    config: EngineConfig,
    idf_formula: Option<IdfFormula>,
}

impl RunoffModel {
    pub fn new(inputs: HydrographInputs, config: EngineConfig) -> Self {
        RunoffModel {
            inputs,
            config,
            idf_formula: None,
        }
    }

    /// Take the IDF coefficients from a catalogue formula; storms outside its
    /// fitted range are reported as warnings.
    pub fn with_idf_formula(mut self, formula: IdfFormula) -> Self {
        self.inputs.idf = formula.parameters();
        self.idf_formula = Some(formula);
        self
    }

    pub fn inputs(&self) -> &HydrographInputs {
        &self.inputs
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // Validate, then run every stage in order
    pub fn run(&self) -> HydroResult<HydrographResult> {
        let basin = self.inputs.basin();
        let storm = self.inputs.storm();
        let config = &self.config;
        config.check()?;

        let mut report = validate(&basin, &storm, config.large_area_km2);
        if let Some(formula) = &self.idf_formula {
            report.check_idf_range(formula, &storm);
        }
        let warnings = report.into_result()?;
        for w in &warnings {
            warn!("{w}");
        }

        let tc = if config.strict_tc {
            try_time_of_concentration(basin.length, basin.slope, config.tc_floor_min)?
        } else {
            time_of_concentration_with_floor(basin.length, basin.slope, config.tc_floor_min)
        };
        let intensity = storm.intensity();
        let total_precip = storm.total_depth();
        debug!("tc = {tc:.2} min, i = {intensity:.2} mm/h, P = {total_precip:.2} mm");

        let storm_steps = distribute(
            total_precip,
            storm.duration,
            config.num_steps,
            config.quartile,
        )?;
        let dt = storm_steps.dt;
        debug!("design storm: {} steps of {dt:.3} min", storm_steps.steps.len());

        let abstraction = abstract_losses(basin.cn, &storm_steps);
        debug!("S = {:.2} mm, Ia = {:.2} mm", abstraction.s, abstraction.ia);

        let unit_hydrograph =
            UnitHydrograph::triangular_with_margin(basin.area, tc, dt, config.uh_tail_margin);
        debug!(
            "unit hydrograph: tp = {:.2} min, tb = {:.2} min, qp = {:.3} m³/s, {} ordinates",
            unit_hydrograph.tp,
            unit_hydrograph.tb,
            unit_hydrograph.qp,
            unit_hydrograph.len()
        );

        let outflow = route(&abstraction, &unit_hydrograph, config.rain_epsilon)?;

        let (peak_index, max_flow) = outflow.peak().unwrap_or((0, 0.0));
        let peak_time = peak_index as f64 * dt;
        let total_volume = outflow.volume();
        let total_effective_rainfall = abstraction.total_effective_rainfall();
        info!(
            "peak {max_flow:.2} m³/s at {peak_time:.1} min, volume {total_volume:.0} m³, Pe {total_effective_rainfall:.1} mm"
        );

        Ok(HydrographResult {
            tc,
            intensity,
            total_precip,
            storm: storm_steps,
            abstraction,
            unit_hydrograph,
            outflow,
            dt,
            max_flow,
            peak_time,
            total_volume,
            total_effective_rainfall,
            warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HydroError;
    use approx::assert_relative_eq;

    #[test]
    fn reference_run() {
        let result = RunoffModel::new(HydrographInputs::default(), EngineConfig::default())
            .run()
            .unwrap();
        assert_relative_eq!(result.tc, 57.0 * 1.25_f64.powf(0.385), epsilon = 1e-12);
        assert_eq!(result.storm.steps.len(), 50);
        assert_relative_eq!(result.dt, 1.3);
        assert!(result.max_flow > 0.0);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn invalid_inputs_skip_the_pipeline() {
        let inputs = HydrographInputs {
            cn: 150.0,
            ..HydrographInputs::default()
        };
        let err = RunoffModel::new(inputs, EngineConfig::default()).run().unwrap_err();
        assert!(matches!(err, HydroError::InvalidInputs(ref e) if e.len() == 1));
    }

    #[test]
    fn short_tail_margin_is_rejected_before_routing() {
        let config = EngineConfig {
            uh_tail_margin: 0.5,
            ..EngineConfig::default()
        };
        let err = RunoffModel::new(HydrographInputs::default(), config)
            .run()
            .unwrap_err();
        assert!(matches!(
            err,
            HydroError::InvalidConfig {
                parameter: "uh_tail_margin",
                ..
            }
        ));
    }

    #[test]
    fn catalogue_formula_overrides_coefficients() {
        let formula = IdfFormula {
            name: "Test".into(),
            city: "Testville".into(),
            state: "PR".into(),
            k: 1000.0,
            a: 0.2,
            b: 15.0,
            c: 0.8,
            duration_min: 5.0,
            duration_max: 60.0,
            return_period_min: 2.0,
            return_period_max: 100.0,
            source: String::new(),
        };
        let model = RunoffModel::new(HydrographInputs::default(), EngineConfig::default())
            .with_idf_formula(formula);
        assert_eq!(model.inputs().idf, IdfParameters::new(1000.0, 0.2, 15.0, 0.8));
        let result = model.run().unwrap();
        // 65 min is past the formula's 60 min limit
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn inputs_deserialize_from_toml() {
        let inputs: HydrographInputs = toml::from_str(
            "area = 10.0\nlength = 5.0\nslope = 100.0\ncn = 70.0\ntr = 10.0\nduration = 65.0\n",
        )
        .unwrap();
        assert_eq!(inputs, HydrographInputs::default());
    }
}
