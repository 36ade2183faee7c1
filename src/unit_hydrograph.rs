//! Triangular synthetic unit hydrograph (SCS).
//!
//! The ordinates are the basin response to one unit of effective rainfall
//! falling during one step of width `dt`, sampled at `t = i * dt`.
use nalgebra::DVector;

/// Samples generated past the theoretical base time, as a fraction of it.
pub const DEFAULT_TAIL_MARGIN: f64 = 1.2;

#[derive(Debug, Clone, PartialEq)]
pub struct UnitHydrograph {
    pub ordinates: DVector<f64>, // Discharge per step [m³/s]
    pub tp: f64,                 // Time to peak [min]
    pub tb: f64,                 // Base time [min]
    pub qp: f64,                 // Peak discharge [m³/s]
    pub dt: f64,                 // Step width [min]
}

impl UnitHydrograph {
    /// Build the triangular unit hydrograph for a basin.
    ///
    /// - `area_km2`: drainage area [km²]
    /// - `tc_min`: time of concentration [min]
    /// - `dt_min`: step width shared with the design storm [min]
    pub fn triangular(area_km2: f64, tc_min: f64, dt_min: f64) -> Self {
        Self::triangular_with_margin(area_km2, tc_min, dt_min, DEFAULT_TAIL_MARGIN)
    }

    pub fn triangular_with_margin(
        area_km2: f64,
        tc_min: f64,
        dt_min: f64,
        tail_margin: f64,
    ) -> Self {
        let t_lag = 0.6 * tc_min;
        let tp = dt_min / 2.0 + t_lag;
        let tb = 2.67 * tp;
        let qp = 0.208 * area_km2 / (tp / 60.0);

        let n = ((tb * tail_margin) / dt_min).ceil() as usize;
        let ordinates =
            DVector::from_iterator(n, (0..n).map(|i| ordinate(i as f64 * dt_min, tp, tb, qp)));

        UnitHydrograph {
            ordinates,
            tp,
            tb,
            qp,
            dt: dt_min,
        }
    }

    pub fn len(&self) -> usize {
        self.ordinates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordinates.is_empty()
    }
}

// Triangle: rises over [0, tp], recedes over (tp, tb], zero afterwards
fn ordinate(t: f64, tp: f64, tb: f64, qp: f64) -> f64 {
    if t <= tp {
        qp * (t / tp)
    } else if t <= tb {
        qp * ((tb - t) / (tb - tp))
    } else {
        0.0
    }
}
