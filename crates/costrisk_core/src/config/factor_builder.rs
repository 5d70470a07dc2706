//! Risk Factor Builder DSL
//!
//! Provides a fluent API for defining risk factors.
//!
//! # Examples
//!
//! ```ignore
//! use costrisk_core::config::RiskFactorBuilder;
//!
//! let weather = RiskFactorBuilder::triangular("weather")
//!     .min(-0.05)
//!     .most_likely(0.0)
//!     .max(0.15)
//!     .build()?;
//!
//! let escalation = RiskFactorBuilder::lognormal("material_escalation")
//!     .mean(0.04)
//!     .std_dev(0.02)
//!     .build()?;
//! ```

use crate::error::{ParameterError, RiskAnalysisError};
use crate::model::{Distribution, DistributionKind, RiskFactor};

/// Builder for a [`RiskFactor`]; parameters are checked in [`RiskFactorBuilder::build`]
#[derive(Debug, Clone)]
pub struct RiskFactorBuilder {
    pub(crate) name: String,
    pub(crate) kind: DistributionKind,
    pub(crate) min_value: Option<f64>,
    pub(crate) most_likely: Option<f64>,
    pub(crate) max_value: Option<f64>,
    pub(crate) mean: Option<f64>,
    pub(crate) std_dev: Option<f64>,
}

impl RiskFactorBuilder {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: DistributionKind) -> Self {
        Self {
            name: name.into(),
            kind,
            min_value: None,
            most_likely: None,
            max_value: None,
            mean: None,
            std_dev: None,
        }
    }

    // =========================================================================
    // Distribution presets
    // =========================================================================

    #[must_use]
    pub fn triangular(name: impl Into<String>) -> Self {
        Self::new(name, DistributionKind::Triangular)
    }

    #[must_use]
    pub fn normal(name: impl Into<String>) -> Self {
        Self::new(name, DistributionKind::Normal)
    }

    #[must_use]
    pub fn uniform(name: impl Into<String>) -> Self {
        Self::new(name, DistributionKind::Uniform)
    }

    #[must_use]
    pub fn lognormal(name: impl Into<String>) -> Self {
        Self::new(name, DistributionKind::LogNormal)
    }

    #[must_use]
    pub fn pert(name: impl Into<String>) -> Self {
        Self::new(name, DistributionKind::Pert)
    }

    // =========================================================================
    // Parameters
    // =========================================================================

    #[must_use]
    pub fn min(mut self, value: f64) -> Self {
        self.min_value = Some(value);
        self
    }

    #[must_use]
    pub fn most_likely(mut self, value: f64) -> Self {
        self.most_likely = Some(value);
        self
    }

    #[must_use]
    pub fn max(mut self, value: f64) -> Self {
        self.max_value = Some(value);
        self
    }

    #[must_use]
    pub fn mean(mut self, value: f64) -> Self {
        self.mean = Some(value);
        self
    }

    #[must_use]
    pub fn std_dev(mut self, value: f64) -> Self {
        self.std_dev = Some(value);
        self
    }

    /// Three-point estimate shortcut for triangular/PERT factors
    #[must_use]
    pub fn three_point(self, min: f64, most_likely: f64, max: f64) -> Self {
        self.min(min).most_likely(most_likely).max(max)
    }

    /// Resolve the parameters required by the chosen distribution and validate them
    pub fn build(self) -> Result<RiskFactor, RiskAnalysisError> {
        let kind = self.kind;
        let require = |value: Option<f64>, parameter: &'static str| {
            value.ok_or_else(|| ParameterError::Missing {
                factor: self.name.clone(),
                distribution: kind.as_str(),
                parameter,
            })
        };

        let distribution = match kind {
            DistributionKind::Triangular => Distribution::Triangular {
                min: require(self.min_value, "min_value")?,
                most_likely: require(self.most_likely, "most_likely")?,
                max: require(self.max_value, "max_value")?,
            },
            DistributionKind::Pert => Distribution::Pert {
                min: require(self.min_value, "min_value")?,
                most_likely: require(self.most_likely, "most_likely")?,
                max: require(self.max_value, "max_value")?,
            },
            DistributionKind::Uniform => Distribution::Uniform {
                min: require(self.min_value, "min_value")?,
                max: require(self.max_value, "max_value")?,
            },
            DistributionKind::Normal => Distribution::Normal {
                mean: require(self.mean, "mean")?,
                std_dev: require(self.std_dev, "std_dev")?,
            },
            DistributionKind::LogNormal => Distribution::LogNormal {
                mean: require(self.mean, "mean")?,
                std_dev: require(self.std_dev, "std_dev")?,
            },
        };

        RiskFactor::new(self.name, distribution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_triangular() {
        let factor = RiskFactorBuilder::triangular("weather")
            .three_point(-0.05, 0.0, 0.15)
            .build()
            .unwrap();
        assert_eq!(factor.name(), "weather");
        assert_eq!(
            *factor.distribution(),
            Distribution::Triangular {
                min: -0.05,
                most_likely: 0.0,
                max: 0.15
            }
        );
    }

    #[test]
    fn test_missing_parameter_names_factor_and_parameter() {
        let err = RiskFactorBuilder::normal("labor")
            .mean(0.02)
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            RiskAnalysisError::InvalidParameter(ParameterError::Missing {
                factor: "labor".into(),
                distribution: "normal",
                parameter: "std_dev",
            })
        );
        assert_eq!(err.factor(), Some("labor"));
    }

    #[test]
    fn test_irrelevant_parameters_are_ignored() {
        let factor = RiskFactorBuilder::uniform("permits")
            .min(0.0)
            .max(0.1)
            .mean(99.0)
            .build()
            .unwrap();
        assert_eq!(
            *factor.distribution(),
            Distribution::Uniform { min: 0.0, max: 0.1 }
        );
    }
}
