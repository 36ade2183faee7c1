//! Range checks on basin and storm parameters before a run.

use std::fmt;

use crate::basin::BasinParameters;
use crate::error::{HydroError, InputError, InputWarning};
use crate::idf::{IdfFormula, StormParameters};

pub const CN_MIN: f64 = 30.0;
pub const CN_MAX: f64 = 100.0;
pub const CN_ATYPICAL_BELOW: f64 = 40.0;
pub const MIN_DURATION_MIN: f64 = 10.0;
pub const DEFAULT_LARGE_AREA_KM2: f64 = 500.0;

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationIssue {
    Error(InputError),
    Warning(InputWarning),
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::Error(e) => write!(f, "{e}"),
            ValidationIssue::Warning(w) => write!(f, "warning: {w}"),
        }
    }
}

/// Ordered list of hard failures and soft warnings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    fn error(&mut self, e: InputError) {
        self.issues.push(ValidationIssue::Error(e));
    }

    fn warning(&mut self, w: InputWarning) {
        self.issues.push(ValidationIssue::Warning(w));
    }

    pub fn is_valid(&self) -> bool {
        self.errors().next().is_none()
    }

    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    pub fn errors(&self) -> impl Iterator<Item = &InputError> {
        self.issues.iter().filter_map(|i| match i {
            ValidationIssue::Error(e) => Some(e),
            ValidationIssue::Warning(_) => None,
        })
    }

    pub fn warnings(&self) -> impl Iterator<Item = &InputWarning> {
        self.issues.iter().filter_map(|i| match i {
            ValidationIssue::Warning(w) => Some(w),
            ValidationIssue::Error(_) => None,
        })
    }

    pub fn messages(&self) -> Vec<String> {
        self.issues.iter().map(|i| i.to_string()).collect()
    }

    /// Add the fitted-range warnings of the IDF formula the storm comes from.
    pub fn check_idf_range(&mut self, formula: &IdfFormula, storm: &StormParameters) {
        for w in formula.range_warnings(storm.tr, storm.duration) {
            self.warning(w);
        }
    }

    /// Warnings on success, every hard failure otherwise.
    pub fn into_result(self) -> Result<Vec<InputWarning>, HydroError> {
        let (errors, warnings): (Vec<_>, Vec<_>) = self
            .issues
            .into_iter()
            .partition(|i| matches!(i, ValidationIssue::Error(_)));
        if errors.is_empty() {
            return Ok(warnings
                .into_iter()
                .filter_map(|i| match i {
                    ValidationIssue::Warning(w) => Some(w),
                    ValidationIssue::Error(_) => None,
                })
                .collect());
        }
        Err(HydroError::InvalidInputs(
            errors
                .into_iter()
                .filter_map(|i| match i {
                    ValidationIssue::Error(e) => Some(e),
                    ValidationIssue::Warning(_) => None,
                })
                .collect(),
        ))
    }
}

// Non-finite values never pass a "> 0" check
fn positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

/**
Checks basin and storm parameters.

Hard failures: non-positive area, channel length, elevation difference or
return period, curve number outside [30, 100], duration under 10 min.
Soft warnings: area above `large_area_km2`, curve number under 40.
*/
pub fn validate(
    basin: &BasinParameters,
    storm: &StormParameters,
    large_area_km2: f64,
) -> ValidationReport {
    let mut report = ValidationReport::default();

    if !positive(basin.area) {
        report.error(InputError::InvalidBasinGeometry {
            parameter: "area",
            value: basin.area,
        });
    }
    if basin.area > large_area_km2 {
        report.warning(InputWarning::LargeBasinArea {
            area_km2: basin.area,
            limit_km2: large_area_km2,
        });
    }

    if !positive(basin.length) {
        report.error(InputError::InvalidBasinGeometry {
            parameter: "length",
            value: basin.length,
        });
    }
    if !positive(basin.slope) {
        report.error(InputError::InvalidBasinGeometry {
            parameter: "elevation difference",
            value: basin.slope,
        });
    }

    if !(CN_MIN..=CN_MAX).contains(&basin.cn) {
        report.error(InputError::CurveNumberOutOfRange(basin.cn));
    }
    if basin.cn < CN_ATYPICAL_BELOW {
        report.warning(InputWarning::AtypicalCurveNumber(basin.cn));
    }

    if storm.duration.is_nan() || storm.duration < MIN_DURATION_MIN {
        report.error(InputError::InvalidStormDuration(storm.duration));
    }
    if !positive(storm.tr) {
        report.error(InputError::InvalidReturnPeriod(storm.tr));
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::idf::IdfParameters;

    fn basin() -> BasinParameters {
        BasinParameters::new(10.0, 5.0, 100.0, 70.0)
    }

    fn storm(duration: f64) -> StormParameters {
        StormParameters::new(10.0, duration, IdfParameters::default())
    }

    #[test]
    fn reference_inputs_are_clean() {
        let report = validate(&basin(), &storm(65.0), DEFAULT_LARGE_AREA_KM2);
        assert!(report.is_valid());
        assert!(report.issues().is_empty());
        assert_eq!(report.into_result().unwrap(), vec![]);
    }

    #[test]
    fn every_hard_failure_is_reported_in_order() {
        let bad = BasinParameters::new(0.0, -1.0, 0.0, 120.0);
        let report = validate(&bad, &storm(5.0), DEFAULT_LARGE_AREA_KM2);
        assert!(!report.is_valid());
        let errors: Vec<_> = report.errors().cloned().collect();
        assert_eq!(
            errors,
            vec![
                InputError::InvalidBasinGeometry { parameter: "area", value: 0.0 },
                InputError::InvalidBasinGeometry { parameter: "length", value: -1.0 },
                InputError::InvalidBasinGeometry { parameter: "elevation difference", value: 0.0 },
                InputError::CurveNumberOutOfRange(120.0),
                InputError::InvalidStormDuration(5.0),
            ]
        );
        match report.into_result() {
            Err(HydroError::InvalidInputs(errors)) => assert_eq!(errors.len(), 5),
            other => panic!("expected InvalidInputs, got {other:?}"),
        }
    }

    #[test]
    fn warnings_do_not_block() {
        let wide = BasinParameters::new(800.0, 40.0, 300.0, 35.0);
        let report = validate(&wide, &storm(120.0), DEFAULT_LARGE_AREA_KM2);
        assert!(report.is_valid());
        let warnings = report.into_result().unwrap();
        assert_eq!(warnings.len(), 2);
        assert!(matches!(warnings[0], InputWarning::LargeBasinArea { .. }));
        assert!(matches!(warnings[1], InputWarning::AtypicalCurveNumber(_)));
    }

    #[test]
    fn out_of_range_cn_also_warns_when_low() {
        let low = BasinParameters::new(10.0, 5.0, 100.0, 20.0);
        let report = validate(&low, &storm(65.0), DEFAULT_LARGE_AREA_KM2);
        assert_eq!(report.messages().len(), 2);
        assert!(report.messages()[1].starts_with("warning:"));
    }

    #[test]
    fn boundary_values_are_accepted() {
        let edge = BasinParameters::new(10.0, 5.0, 100.0, 30.0);
        assert!(validate(&edge, &storm(10.0), DEFAULT_LARGE_AREA_KM2).is_valid());
        let edge = BasinParameters::new(10.0, 5.0, 100.0, 100.0);
        assert!(validate(&edge, &storm(10.0), DEFAULT_LARGE_AREA_KM2).is_valid());
    }

    #[test]
    fn nan_inputs_are_rejected() {
        let nan = BasinParameters::new(f64::NAN, 5.0, 100.0, f64::NAN);
        let mut s = storm(f64::NAN);
        s.tr = 0.0;
        let report = validate(&nan, &s, DEFAULT_LARGE_AREA_KM2);
        assert_eq!(report.errors().count(), 4);
    }
}
