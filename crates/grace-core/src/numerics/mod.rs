pub mod clenshaw;
pub mod legendre;
pub mod point_load;

pub use clenshaw::{
    ClenshawOrderInput, ClenshawSummation, ClenshawSummationApi, ClenshawSummationInput,
    ConditionedPartialSum, SpatialField, clenshaw_order_sum, clenshaw_summation,
    clenshaw_summation_with_weights,
};
pub use legendre::{ColomboRecursion, LegendreRecursionApi, LegendreTable, plm_colombo};
pub use point_load::{PointLoadInput, PointLoadSynthesis, PointLoadSynthesisApi, gen_point_load};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct NumericTolerance {
    #[serde(rename = "absTol")]
    pub abs_tol: f64,
    #[serde(rename = "relTol")]
    pub rel_tol: f64,
    #[serde(rename = "relativeFloor", default = "default_relative_floor")]
    pub relative_floor: f64,
}

impl NumericTolerance {
    pub const fn new(abs_tol: f64, rel_tol: f64) -> Self {
        Self {
            abs_tol,
            rel_tol,
            relative_floor: 1.0,
        }
    }
}

fn default_relative_floor() -> f64 {
    1.0
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToleranceComparison {
    pub abs_diff: f64,
    pub rel_diff: f64,
    pub passes: bool,
}

pub fn compare_with_tolerance(
    expected: f64,
    actual: f64,
    tolerance: NumericTolerance,
) -> ToleranceComparison {
    let abs_diff = (actual - expected).abs();
    let rel_denominator = expected.abs().max(tolerance.relative_floor);
    let rel_diff = abs_diff / rel_denominator;
    let passes = abs_diff <= tolerance.abs_tol || abs_diff <= tolerance.rel_tol * rel_denominator;

    ToleranceComparison {
        abs_diff,
        rel_diff,
        passes,
    }
}

pub fn format_numeric(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }

    if value == f64::INFINITY {
        return "inf".to_string();
    }

    if value == f64::NEG_INFINITY {
        return "-inf".to_string();
    }

    format!("{value:.15E}")
}

/// Running Kahan-compensated sum.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CompensatedSum {
    sum: f64,
    correction: f64,
}

impl CompensatedSum {
    pub fn add(&mut self, value: f64) {
        let corrected = value - self.correction;
        let next = self.sum + corrected;
        self.correction = (next - self.sum) - corrected;
        self.sum = next;
    }

    pub fn value(&self) -> f64 {
        self.sum
    }
}

#[cfg(test)]
mod tests {
    use super::{CompensatedSum, NumericTolerance, compare_with_tolerance, format_numeric};

    #[test]
    fn tolerance_comparison_uses_relative_floor() {
        let tolerance = NumericTolerance::new(1.0e-12, 1.0e-6);
        assert!(compare_with_tolerance(1.0e6, 1.0e6 + 0.5, tolerance).passes);
        assert!(!compare_with_tolerance(1.0e-3, 2.0e-3, tolerance).passes);

        let comparison = compare_with_tolerance(0.0, 1.0e-13, tolerance);
        assert!(comparison.passes);
        assert_eq!(comparison.abs_diff, 1.0e-13);
    }

    #[test]
    fn tolerance_deserializes_from_camel_case_json() {
        let tolerance: NumericTolerance =
            serde_json::from_str(r#"{ "absTol": 1e-10, "relTol": 1e-8 }"#)
                .expect("tolerance should parse");
        assert_eq!(tolerance.abs_tol, 1.0e-10);
        assert_eq!(tolerance.relative_floor, 1.0);
    }

    #[test]
    fn compensated_sum_recovers_cancelled_terms() {
        let mut sum = CompensatedSum::default();
        for value in [1.0, 1.0e-16, 1.0e-16, 1.0e-16, 1.0e-16, -1.0] {
            sum.add(value);
        }
        assert!((sum.value() - 4.0e-16).abs() <= 1.0e-16);
    }

    #[test]
    fn numeric_formatting_handles_non_finite_values() {
        assert_eq!(format_numeric(f64::NAN), "NaN");
        assert_eq!(format_numeric(f64::INFINITY), "inf");
        assert_eq!(format_numeric(f64::NEG_INFINITY), "-inf");
        assert_eq!(format_numeric(1.5), "1.500000000000000E0");
    }
}
