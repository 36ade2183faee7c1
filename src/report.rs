//! Tabular views of a run for reports and CSV export.

use std::io::{self, Write};

use serde::Serialize;

use crate::hydrograph::HydrographResult;

// One line of the detailed hydrograph table
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DetailedRow {
    pub time: f64,        // [min]
    pub inc_rain: f64,    // Gross rainfall increment [mm]
    pub pe_inc: f64,      // Effective rainfall increment [mm]
    pub uh_ordinate: f64, // Unit hydrograph ordinate [m³/s]
    pub flow: f64,        // Outflow [m³/s]
}

// Sampled design storm row for the calculation memorandum
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StormTableRow {
    pub index: usize,
    pub time: f64,       // [min]
    pub pct_time: f64,   // Percent of storm duration [%]
    pub accum_rain: f64, // [mm]
}

/// One row per outflow ordinate; series shorter than the outflow read as zero.
pub fn detailed_table(result: &HydrographResult) -> Vec<DetailedRow> {
    let steps = &result.abstraction.steps;
    let uh = &result.unit_hydrograph.ordinates;
    result
        .outflow
        .flow
        .iter()
        .enumerate()
        .map(|(i, &flow)| {
            let step = steps.get(i);
            DetailedRow {
                time: i as f64 * result.dt,
                inc_rain: step.map_or(0.0, |s| s.rain.inc_rain),
                pe_inc: step.map_or(0.0, |s| s.pe_inc),
                uh_ordinate: uh.as_slice().get(i).copied().unwrap_or(0.0),
                flow,
            }
        })
        .collect()
}

/// About ten evenly spaced rows of the design storm.
pub fn storm_table(result: &HydrographResult, duration_min: f64) -> Vec<StormTableRow> {
    let steps = &result.storm.steps;
    let stride = (steps.len() / 10).max(1);
    steps
        .iter()
        .step_by(stride)
        .enumerate()
        .map(|(k, s)| StormTableRow {
            index: k + 1,
            time: s.time,
            pct_time: s.time / duration_min * 100.0,
            accum_rain: s.accum_rain,
        })
        .collect()
}

pub fn write_csv<W: Write>(out: &mut W, rows: &[DetailedRow]) -> io::Result<()> {
    writeln!(
        out,
        "Time [min],Gross Rain [mm],Effective Rain [mm],UH Ordinate [m3/s],Flow [m3/s]"
    )?;
    for row in rows {
        writeln!(
            out,
            "{:.2},{:.3},{:.3},{:.4},{:.3}",
            row.time, row.inc_rain, row.pe_inc, row.uh_ordinate, row.flow
        )?;
    }
    Ok(())
}
