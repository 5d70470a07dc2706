use std::fmt;

/// Errors raised while validating a single risk factor's parameters
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterError {
    Missing {
        factor: String,
        distribution: &'static str,
        parameter: &'static str,
    },
    NonFinite {
        factor: String,
        parameter: &'static str,
        value: f64,
    },
    NonPositiveStdDev {
        factor: String,
        std_dev: f64,
    },
    InvertedRange {
        factor: String,
        min: f64,
        max: f64,
    },
    MostLikelyOutOfRange {
        factor: String,
        min: f64,
        most_likely: f64,
        max: f64,
    },
    NonPositiveMean {
        factor: String,
        mean: f64,
    },
}

impl ParameterError {
    /// Name of the factor that failed validation
    #[must_use]
    pub fn factor(&self) -> &str {
        match self {
            Self::Missing { factor, .. }
            | Self::NonFinite { factor, .. }
            | Self::NonPositiveStdDev { factor, .. }
            | Self::InvertedRange { factor, .. }
            | Self::MostLikelyOutOfRange { factor, .. }
            | Self::NonPositiveMean { factor, .. } => factor,
        }
    }

    /// Name of the offending parameter
    #[must_use]
    pub fn parameter(&self) -> &'static str {
        match self {
            Self::Missing { parameter, .. } | Self::NonFinite { parameter, .. } => parameter,
            Self::NonPositiveStdDev { .. } => "std_dev",
            Self::InvertedRange { .. } => "max_value",
            Self::MostLikelyOutOfRange { .. } => "most_likely",
            Self::NonPositiveMean { .. } => "mean",
        }
    }
}

impl fmt::Display for ParameterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing {
                factor,
                distribution,
                parameter,
            } => write!(
                f,
                "risk factor '{factor}': {distribution} distribution requires '{parameter}'"
            ),
            Self::NonFinite {
                factor,
                parameter,
                value,
            } => write!(f, "risk factor '{factor}': {parameter} must be finite, got {value}"),
            Self::NonPositiveStdDev { factor, std_dev } => {
                write!(f, "risk factor '{factor}': std_dev must be > 0, got {std_dev}")
            }
            Self::InvertedRange { factor, min, max } => write!(
                f,
                "risk factor '{factor}': max_value must be greater than min_value (min={min}, max={max})"
            ),
            Self::MostLikelyOutOfRange {
                factor,
                min,
                most_likely,
                max,
            } => write!(
                f,
                "risk factor '{factor}': most_likely {most_likely} outside [{min}, {max}]"
            ),
            Self::NonPositiveMean { factor, mean } => {
                write!(f, "risk factor '{factor}': lognormal mean must be > 0, got {mean}")
            }
        }
    }
}

impl std::error::Error for ParameterError {}

/// Structural problems with a caller-supplied correlation matrix
#[derive(Debug, Clone, PartialEq)]
pub enum CorrelationMatrixError {
    ShapeMismatch {
        rows: usize,
        cols: usize,
        expected: usize,
    },
    NotSymmetric {
        row: usize,
        col: usize,
        upper: f64,
        lower: f64,
    },
    InvalidDiagonal {
        index: usize,
        value: f64,
    },
    OutOfRange {
        row: usize,
        col: usize,
        value: f64,
    },
}

impl CorrelationMatrixError {
    /// Stable machine-readable code for API clients
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::ShapeMismatch { .. } => "INVALID_CORRELATION_MATRIX_SHAPE",
            Self::NotSymmetric { .. } => "CORRELATION_MATRIX_NOT_SYMMETRIC",
            Self::InvalidDiagonal { .. } => "CORRELATION_MATRIX_INVALID_DIAGONAL",
            Self::OutOfRange { .. } => "CORRELATION_MATRIX_OUT_OF_RANGE",
        }
    }
}

impl fmt::Display for CorrelationMatrixError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShapeMismatch {
                rows,
                cols,
                expected,
            } => write!(
                f,
                "correlation matrix shape ({rows}, {cols}) doesn't match {expected} risk factors (expected {expected}x{expected})"
            ),
            Self::NotSymmetric {
                row,
                col,
                upper,
                lower,
            } => write!(
                f,
                "correlation matrix must be symmetric: [{row}][{col}]={upper} but [{col}][{row}]={lower}"
            ),
            Self::InvalidDiagonal { index, value } => write!(
                f,
                "correlation matrix diagonal must be all 1.0, got {value} at [{index}][{index}]"
            ),
            Self::OutOfRange { row, col, value } => write!(
                f,
                "correlation matrix values must be in range [-1, 1], got {value} at [{row}][{col}]"
            ),
        }
    }
}

impl std::error::Error for CorrelationMatrixError {}

/// Errors returned by the risk analysis engine
#[derive(Debug, Clone, PartialEq)]
pub enum RiskAnalysisError {
    InvalidParameter(ParameterError),
    UnsupportedDistribution { factor: String, distribution: String },
    InvalidCorrelationMatrix(CorrelationMatrixError),
    InvalidBaseCost(f64),
    InvalidConfidenceLevel(f64),
    InvalidIterations {
        iterations: usize,
        min: usize,
        max: usize,
    },
    DuplicateFactor(String),
    EmptyFactorName,
    /// The quantile function could not be built from otherwise valid parameters
    Distribution { factor: String, reason: String },
}

impl RiskAnalysisError {
    /// Stable machine-readable code for API clients
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidParameter(_) => "INVALID_RISK_FACTOR_PARAMETER",
            Self::UnsupportedDistribution { .. } => "UNSUPPORTED_DISTRIBUTION",
            Self::InvalidCorrelationMatrix(e) => e.code(),
            Self::InvalidBaseCost(_) => "INVALID_BASE_COST",
            Self::InvalidConfidenceLevel(_) => "INVALID_CONFIDENCE_LEVEL",
            Self::InvalidIterations { .. } => "INVALID_ITERATIONS",
            Self::DuplicateFactor(_) | Self::EmptyFactorName => "INVALID_RISK_FACTOR_DTO",
            Self::Distribution { .. } => "DISTRIBUTION_ERROR",
        }
    }

    /// Name of the risk factor that triggered the error, when there is one
    #[must_use]
    pub fn factor(&self) -> Option<&str> {
        match self {
            Self::InvalidParameter(e) => Some(e.factor()),
            Self::UnsupportedDistribution { factor, .. } | Self::Distribution { factor, .. } => {
                Some(factor)
            }
            Self::DuplicateFactor(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for RiskAnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParameter(e) => write!(f, "{e}"),
            Self::UnsupportedDistribution {
                factor,
                distribution,
            } => write!(
                f,
                "risk factor '{factor}': unsupported distribution type '{distribution}'"
            ),
            Self::InvalidCorrelationMatrix(e) => write!(f, "{e}"),
            Self::InvalidBaseCost(cost) => {
                write!(f, "base cost must be a finite non-negative amount, got {cost}")
            }
            Self::InvalidConfidenceLevel(level) => {
                write!(f, "confidence level must be in (0, 1), got {level}")
            }
            Self::InvalidIterations {
                iterations,
                min,
                max,
            } => write!(f, "iterations must be in [{min}, {max}], got {iterations}"),
            Self::DuplicateFactor(name) => write!(f, "duplicate risk factor name '{name}'"),
            Self::EmptyFactorName => write!(f, "risk factor name must not be empty"),
            Self::Distribution { factor, reason } => {
                write!(f, "risk factor '{factor}': {reason}")
            }
        }
    }
}

impl std::error::Error for RiskAnalysisError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidParameter(e) => Some(e),
            Self::InvalidCorrelationMatrix(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ParameterError> for RiskAnalysisError {
    fn from(e: ParameterError) -> Self {
        RiskAnalysisError::InvalidParameter(e)
    }
}

impl From<CorrelationMatrixError> for RiskAnalysisError {
    fn from(e: CorrelationMatrixError) -> Self {
        RiskAnalysisError::InvalidCorrelationMatrix(e)
    }
}

pub type Result<T> = std::result::Result<T, RiskAnalysisError>;
