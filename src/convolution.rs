use approx::relative_eq;
use nalgebra::DVector;

use crate::error::{HydroError, HydroResult};
use crate::runoff::ScsAbstraction;
use crate::unit_hydrograph::UnitHydrograph;

/// Effective rainfall increments at or below this depth [mm] are skipped.
pub const DEFAULT_RAIN_EPSILON: f64 = 1e-5;

// Basin outflow hydrograph
#[derive(Debug, Clone, PartialEq)]
pub struct OutflowHydrograph {
    pub flow: DVector<f64>, // Discharge per step [m³/s]
    pub dt: f64,            // Step width [min]
}

impl OutflowHydrograph {
    pub fn len(&self) -> usize {
        self.flow.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flow.is_empty()
    }

    // First maximum as (index, discharge)
    pub fn peak(&self) -> Option<(usize, f64)> {
        self.flow
            .iter()
            .copied()
            .enumerate()
            .fold(None, |best, (i, q)| match best {
                Some((_, best_q)) if q <= best_q => best,
                _ => Some((i, q)),
            })
    }

    /// Runoff volume [m³]: discharge summed over steps of `dt` minutes.
    pub fn volume(&self) -> f64 {
        self.flow.sum() * self.dt * 60.0
    }

    pub fn times(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.len()).map(move |i| i as f64 * self.dt)
    }
}

/**
Discrete convolution of effective rainfall increments with unit hydrograph ordinates.

`flow[k] = sum_i rain[i] * uh[k - i]`, with `rain.len() + uh.len() - 1` outputs.
The outer loop runs over rainfall and the inner over the ordinates, so the
summation order is fixed. Increments `<= epsilon` are skipped.
*/
pub fn convolve(
    rain: &[f64],
    ordinates: &DVector<f64>,
    epsilon: f64,
) -> HydroResult<DVector<f64>> {
    if rain.is_empty() {
        return Err(HydroError::EmptySeries("effective rainfall"));
    }
    if ordinates.is_empty() {
        return Err(HydroError::EmptySeries("unit hydrograph"));
    }

    let n_uh = ordinates.len();
    let mut flow = DVector::zeros(rain.len() + n_uh - 1);
    for (i, &pe) in rain.iter().enumerate() {
        if pe <= epsilon {
            continue;
        }
        flow.rows_mut(i, n_uh).axpy(pe, ordinates, 1.0);
    }
    Ok(flow)
}

/// Route an effective rainfall series through a unit hydrograph.
///
/// Both must have been built on the same step width.
pub fn route(
    abstraction: &ScsAbstraction,
    unit_hydrograph: &UnitHydrograph,
    epsilon: f64,
) -> HydroResult<OutflowHydrograph> {
    if !relative_eq!(abstraction.dt, unit_hydrograph.dt) {
        return Err(HydroError::StepWidthMismatch {
            expected: abstraction.dt,
            actual: unit_hydrograph.dt,
        });
    }
    let flow = convolve(
        &abstraction.effective_increments(),
        &unit_hydrograph.ordinates,
        epsilon,
    )?;
    Ok(OutflowHydrograph {
        flow,
        dt: abstraction.dt,
    })
}
