/*!
Huff design storm distribution.

Spreads a total storm depth over `N` equal time steps following one of the four
dimensionless Huff quartile curves (cumulative percent of rain against percent
of storm duration). The curves are process-wide constant tables.
*/
use serde::{Deserialize, Serialize};

use crate::error::{HydroError, HydroResult};

// One anchor of a dimensionless cumulative rainfall curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HuffPoint {
    pub pct_time: f64, // Percent of storm duration [%]
    pub pct_rain: f64, // Percent of total depth fallen so far [%]
}

const fn point(pct_time: f64, pct_rain: f64) -> HuffPoint {
    HuffPoint { pct_time, pct_rain }
}

pub static FIRST_QUARTILE: [HuffPoint; 11] = [
    point(0.0, 0.0),
    point(10.0, 33.0),
    point(20.0, 52.0),
    point(30.0, 66.0),
    point(40.0, 75.0),
    point(50.0, 82.0),
    point(60.0, 86.0),
    point(70.0, 90.0),
    point(80.0, 94.0),
    point(90.0, 97.0),
    point(100.0, 100.0),
];

pub static SECOND_QUARTILE: [HuffPoint; 11] = [
    point(0.0, 0.0),
    point(10.0, 14.0),
    point(20.0, 33.0),
    point(30.0, 55.0),
    point(40.0, 72.0),
    point(50.0, 84.0),
    point(60.0, 90.0),
    point(70.0, 94.0),
    point(80.0, 97.0),
    point(90.0, 99.0),
    point(100.0, 100.0),
];

pub static THIRD_QUARTILE: [HuffPoint; 11] = [
    point(0.0, 0.0),
    point(10.0, 8.0),
    point(20.0, 18.0),
    point(30.0, 30.0),
    point(40.0, 43.0),
    point(50.0, 57.0),
    point(60.0, 72.0),
    point(70.0, 85.0),
    point(80.0, 94.0),
    point(90.0, 98.0),
    point(100.0, 100.0),
];

pub static FOURTH_QUARTILE: [HuffPoint; 11] = [
    point(0.0, 0.0),
    point(10.0, 4.0),
    point(20.0, 10.0),
    point(30.0, 18.0),
    point(40.0, 28.0),
    point(50.0, 40.0),
    point(60.0, 52.0),
    point(70.0, 64.0),
    point(80.0, 78.0),
    point(90.0, 92.0),
    point(100.0, 100.0),
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HuffQuartile {
    #[default]
    First,
    Second,
    Third,
    Fourth,
}

impl HuffQuartile {
    pub const ALL: [HuffQuartile; 4] = [
        HuffQuartile::First,
        HuffQuartile::Second,
        HuffQuartile::Third,
        HuffQuartile::Fourth,
    ];

    pub fn curve(self) -> &'static [HuffPoint] {
        match self {
            HuffQuartile::First => &FIRST_QUARTILE,
            HuffQuartile::Second => &SECOND_QUARTILE,
            HuffQuartile::Third => &THIRD_QUARTILE,
            HuffQuartile::Fourth => &FOURTH_QUARTILE,
        }
    }
}

// One discretised time increment of the design storm
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RainfallStep {
    pub time: f64,       // End of the step [min]
    pub accum_rain: f64, // Cumulative gross rainfall [mm]
    pub inc_rain: f64,   // Gross rainfall during the step [mm]
}

#[derive(Debug, Clone, PartialEq)]
pub struct StormDistribution {
    pub steps: Vec<RainfallStep>,
    pub dt: f64, // Step width [min]
}

impl StormDistribution {
    pub fn total_rain(&self) -> f64 {
        self.steps.last().map(|s| s.accum_rain).unwrap_or(0.0)
    }
}

/// Percent of rain at `pct_time` by linear interpolation on `curve`.
///
/// The bracket is found by a linear scan from the first anchor; the first
/// bracket containing `pct_time` wins. Times past the last anchor are clamped
/// to it. A zero-width bracket interpolates with ratio 0.
pub fn interpolate_pct_rain(curve: &[HuffPoint], pct_time: f64) -> f64 {
    let (Some(first), Some(last)) = (curve.first(), curve.last()) else {
        return 0.0;
    };
    let pct_time = pct_time.min(last.pct_time);

    let (lower, upper) = curve
        .windows(2)
        .find(|w| pct_time >= w[0].pct_time && pct_time <= w[1].pct_time)
        .map(|w| (w[0], w[1]))
        .unwrap_or_else(|| match curve {
            [.., lower, upper] => (*lower, *upper),
            _ => (*first, *last),
        });

    let range = upper.pct_time - lower.pct_time;
    let ratio = if range == 0.0 {
        0.0
    } else {
        (pct_time - lower.pct_time) / range
    };
    lower.pct_rain + ratio * (upper.pct_rain - lower.pct_rain)
}

/**
Distribute `total_rain_mm` over `num_steps` steps of a storm lasting `duration_min`.

# Returns
The ordered steps and the step width `dt = duration / num_steps`. Each step's
increment is `max(0, cumulative - previous cumulative)`; the clamp hides any
decrease coming from the interpolation.
*/
pub fn distribute(
    total_rain_mm: f64,
    duration_min: f64,
    num_steps: usize,
    quartile: HuffQuartile,
) -> HydroResult<StormDistribution> {
    if num_steps == 0 {
        return Err(HydroError::InvalidStepCount);
    }
    if !duration_min.is_finite() || duration_min <= 0.0 {
        return Err(HydroError::InvalidStormDuration(duration_min));
    }

    let curve = quartile.curve();
    let dt = duration_min / num_steps as f64;

    let (steps, _) = (1..=num_steps).fold(
        (Vec::with_capacity(num_steps), 0.0),
        |(mut steps, prev_accum): (Vec<RainfallStep>, f64), i| {
            let time = i as f64 * dt;
            let pct_rain = interpolate_pct_rain(curve, time / duration_min * 100.0);
            let accum_rain = pct_rain / 100.0 * total_rain_mm;
            steps.push(RainfallStep {
                time,
                accum_rain,
                inc_rain: (accum_rain - prev_accum).max(0.0),
            });
            (steps, accum_rain)
        },
    );

    Ok(StormDistribution { steps, dt })
}
