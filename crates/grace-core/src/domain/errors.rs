use std::fmt::{Display, Formatter};

pub type GravityResult<T> = Result<T, GravityError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GravityErrorCategory {
    InvalidArgument,
    DimensionMismatch,
    NumericDomainWarning,
}

impl GravityErrorCategory {
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::InvalidArgument => 2,
            Self::DimensionMismatch => 3,
            Self::NumericDomainWarning => 0,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidArgument => "InvalidArgument",
            Self::DimensionMismatch => "DimensionMismatch",
            Self::NumericDomainWarning => "NumericDomainWarning",
        }
    }

    pub const fn is_fatal(self) -> bool {
        !matches!(self, Self::NumericDomainWarning)
    }
}

impl Display for GravityErrorCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GravityError {
    #[error("invalid argument '{field}': {reason}")]
    InvalidArgument { field: &'static str, reason: String },
    #[error("dimension mismatch for '{field}': expected {expected}, got {actual}")]
    DimensionMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
}

impl GravityError {
    pub fn invalid_argument(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field,
            reason: reason.into(),
        }
    }

    pub fn dimension_mismatch(field: &'static str, expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            field,
            expected,
            actual,
        }
    }

    pub const fn category(&self) -> GravityErrorCategory {
        match self {
            Self::InvalidArgument { .. } => GravityErrorCategory::InvalidArgument,
            Self::DimensionMismatch { .. } => GravityErrorCategory::DimensionMismatch,
        }
    }

    pub const fn exit_code(&self) -> i32 {
        self.category().exit_code()
    }

    pub fn diagnostic_line(&self) -> String {
        format!("ERROR: [{}] {}", self.category(), self)
    }
}

/// Non-fatal numeric condition reported next to a result.
///
/// Pole evaluations are not masked: the affected derivative entries stay
/// non-finite in the output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericDomainWarning {
    PoleEvaluation { point_index: usize, x: f64 },
    MarginalPrecision { lmax: usize, threshold: usize },
}

impl NumericDomainWarning {
    pub const fn category(&self) -> GravityErrorCategory {
        GravityErrorCategory::NumericDomainWarning
    }

    pub fn diagnostic_line(&self) -> String {
        format!("WARNING: [{}] {}", self.category(), self)
    }
}

impl Display for NumericDomainWarning {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PoleEvaluation { point_index, x } => write!(
                f,
                "point {point_index} lies on a pole (x={x}); Legendre derivatives are non-finite"
            ),
            Self::MarginalPrecision { lmax, threshold } => write!(
                f,
                "lmax={lmax} exceeds {threshold}; fixed Clenshaw pre-scale precision is marginal"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{GravityError, GravityErrorCategory, NumericDomainWarning};

    #[test]
    fn exit_mapping_is_stable() {
        let cases = [
            (GravityErrorCategory::InvalidArgument, 2, "InvalidArgument", true),
            (
                GravityErrorCategory::DimensionMismatch,
                3,
                "DimensionMismatch",
                true,
            ),
            (
                GravityErrorCategory::NumericDomainWarning,
                0,
                "NumericDomainWarning",
                false,
            ),
        ];

        for (category, exit_code, name, fatal) in cases {
            assert_eq!(category.exit_code(), exit_code);
            assert_eq!(category.as_str(), name);
            assert_eq!(category.is_fatal(), fatal);
        }
    }

    #[test]
    fn errors_carry_their_category() {
        let invalid = GravityError::invalid_argument("lmax", "must be >= 0, got -1");
        assert_eq!(invalid.category(), GravityErrorCategory::InvalidArgument);
        assert_eq!(invalid.exit_code(), 2);
        assert_eq!(
            invalid.diagnostic_line(),
            "ERROR: [InvalidArgument] invalid argument 'lmax': must be >= 0, got -1"
        );

        let mismatch = GravityError::dimension_mismatch("lat", 3, 2);
        assert_eq!(mismatch.category(), GravityErrorCategory::DimensionMismatch);
        assert_eq!(
            mismatch.to_string(),
            "dimension mismatch for 'lat': expected 3, got 2"
        );
    }

    #[test]
    fn warnings_are_non_fatal() {
        let warning = NumericDomainWarning::PoleEvaluation {
            point_index: 4,
            x: 1.0,
        };
        assert!(!warning.category().is_fatal());
        assert!(warning.diagnostic_line().starts_with("WARNING: [NumericDomainWarning]"));
    }
}
