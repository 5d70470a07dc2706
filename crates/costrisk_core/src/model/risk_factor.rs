//! Risk factor definitions
//!
//! A [`RiskFactor`] pairs a unique name with a validated [`Distribution`] of
//! fractional cost impact (0.10 means "+10% of base cost").

use serde::{Deserialize, Serialize};

use crate::error::{ParameterError, RiskAnalysisError};

/// PERT weighting of the most-likely value
pub const PERT_LAMBDA: f64 = 4.0;

/// Supported distribution families, by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistributionKind {
    Triangular,
    Normal,
    Uniform,
    LogNormal,
    Pert,
}

impl DistributionKind {
    pub const ALL: [DistributionKind; 5] = [
        Self::Triangular,
        Self::Normal,
        Self::Uniform,
        Self::LogNormal,
        Self::Pert,
    ];

    /// Parse a distribution name, ignoring case and surrounding whitespace
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(name))
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Triangular => "triangular",
            Self::Normal => "normal",
            Self::Uniform => "uniform",
            Self::LogNormal => "lognormal",
            Self::Pert => "pert",
        }
    }
}

impl std::fmt::Display for DistributionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Probability distribution of a factor's fractional cost impact
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "distribution", rename_all = "lowercase")]
pub enum Distribution {
    Triangular {
        min: f64,
        most_likely: f64,
        max: f64,
    },
    Normal {
        mean: f64,
        std_dev: f64,
    },
    Uniform {
        min: f64,
        max: f64,
    },
    /// `mean`/`std_dev` describe the distribution itself, not its logarithm
    LogNormal {
        mean: f64,
        std_dev: f64,
    },
    Pert {
        min: f64,
        most_likely: f64,
        max: f64,
    },
}

impl Distribution {
    #[must_use]
    pub fn kind(&self) -> DistributionKind {
        match self {
            Self::Triangular { .. } => DistributionKind::Triangular,
            Self::Normal { .. } => DistributionKind::Normal,
            Self::Uniform { .. } => DistributionKind::Uniform,
            Self::LogNormal { .. } => DistributionKind::LogNormal,
            Self::Pert { .. } => DistributionKind::Pert,
        }
    }

    /// Check the parameters for internal consistency.
    ///
    /// `factor` is only used to label the error.
    pub fn validate(&self, factor: &str) -> Result<(), ParameterError> {
        let finite = |parameter: &'static str, value: f64| {
            if value.is_finite() {
                Ok(())
            } else {
                Err(ParameterError::NonFinite {
                    factor: factor.to_string(),
                    parameter,
                    value,
                })
            }
        };

        match *self {
            Self::Triangular {
                min,
                most_likely,
                max,
            }
            | Self::Pert {
                min,
                most_likely,
                max,
            } => {
                finite("min_value", min)?;
                finite("most_likely", most_likely)?;
                finite("max_value", max)?;
                check_range(factor, min, max)?;
                if most_likely < min || most_likely > max {
                    return Err(ParameterError::MostLikelyOutOfRange {
                        factor: factor.to_string(),
                        min,
                        most_likely,
                        max,
                    });
                }
            }
            Self::Uniform { min, max } => {
                finite("min_value", min)?;
                finite("max_value", max)?;
                check_range(factor, min, max)?;
            }
            Self::Normal { mean, std_dev } => {
                finite("mean", mean)?;
                finite("std_dev", std_dev)?;
                check_std_dev(factor, std_dev)?;
            }
            Self::LogNormal { mean, std_dev } => {
                finite("mean", mean)?;
                finite("std_dev", std_dev)?;
                check_std_dev(factor, std_dev)?;
                if mean <= 0.0 {
                    return Err(ParameterError::NonPositiveMean {
                        factor: factor.to_string(),
                        mean,
                    });
                }
            }
        }
        Ok(())
    }

    /// Log-space location and scale of a lognormal with the given moments
    #[must_use]
    pub fn lognormal_params(mean: f64, std_dev: f64) -> (f64, f64) {
        let mean_sq = mean * mean;
        let var = std_dev * std_dev;
        let mu = (mean_sq / (mean_sq + var).sqrt()).ln();
        let sigma = (1.0 + var / mean_sq).ln().sqrt();
        (mu, sigma)
    }

    /// Beta shape parameters of a PERT distribution
    #[must_use]
    pub fn pert_shape(min: f64, most_likely: f64, max: f64) -> (f64, f64) {
        let range = max - min;
        let alpha = 1.0 + PERT_LAMBDA * (most_likely - min) / range;
        let beta = 1.0 + PERT_LAMBDA * (max - most_likely) / range;
        (alpha, beta)
    }

    /// Theoretical mean of the fractional impact
    #[must_use]
    pub fn mean(&self) -> f64 {
        match *self {
            Self::Triangular {
                min,
                most_likely,
                max,
            } => (min + most_likely + max) / 3.0,
            Self::Normal { mean, .. } | Self::LogNormal { mean, .. } => mean,
            Self::Uniform { min, max } => (min + max) / 2.0,
            Self::Pert {
                min,
                most_likely,
                max,
            } => {
                let (alpha, beta) = Self::pert_shape(min, most_likely, max);
                min + (max - min) * alpha / (alpha + beta)
            }
        }
    }

    /// Theoretical variance of the fractional impact
    #[must_use]
    pub fn variance(&self) -> f64 {
        match *self {
            Self::Triangular {
                min: a,
                most_likely: c,
                max: b,
            } => (a * a + b * b + c * c - a * b - a * c - b * c) / 18.0,
            Self::Normal { std_dev, .. } | Self::LogNormal { std_dev, .. } => std_dev * std_dev,
            Self::Uniform { min, max } => (max - min).powi(2) / 12.0,
            Self::Pert {
                min,
                most_likely,
                max,
            } => {
                let (alpha, beta) = Self::pert_shape(min, most_likely, max);
                let sum = alpha + beta;
                (max - min).powi(2) * alpha * beta / (sum * sum * (sum + 1.0))
            }
        }
    }
}

fn check_range(factor: &str, min: f64, max: f64) -> Result<(), ParameterError> {
    if max <= min {
        return Err(ParameterError::InvertedRange {
            factor: factor.to_string(),
            min,
            max,
        });
    }
    Ok(())
}

fn check_std_dev(factor: &str, std_dev: f64) -> Result<(), ParameterError> {
    if std_dev <= 0.0 {
        return Err(ParameterError::NonPositiveStdDev {
            factor: factor.to_string(),
            std_dev,
        });
    }
    Ok(())
}

/// A named, independent source of cost uncertainty.
///
/// Immutable once constructed; construction validates the distribution,
/// and deserialization goes through the same checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRiskFactor")]
pub struct RiskFactor {
    name: String,
    #[serde(flatten)]
    distribution: Distribution,
}

#[derive(Deserialize)]
struct RawRiskFactor {
    name: String,
    #[serde(flatten)]
    distribution: Distribution,
}

impl TryFrom<RawRiskFactor> for RiskFactor {
    type Error = RiskAnalysisError;

    fn try_from(raw: RawRiskFactor) -> Result<Self, Self::Error> {
        Self::new(raw.name, raw.distribution)
    }
}

impl RiskFactor {
    pub fn new(
        name: impl Into<String>,
        distribution: Distribution,
    ) -> Result<Self, RiskAnalysisError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(RiskAnalysisError::EmptyFactorName);
        }
        distribution.validate(&name)?;
        Ok(Self { name, distribution })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn distribution(&self) -> &Distribution {
        &self.distribution
    }

    #[must_use]
    pub fn kind(&self) -> DistributionKind {
        self.distribution.kind()
    }

    /// Skip validation so engine-side checks can be exercised
    #[cfg(test)]
    pub(crate) fn new_unchecked(name: impl Into<String>, distribution: Distribution) -> Self {
        Self {
            name: name.into(),
            distribution,
        }
    }
}
