//! Caller-facing payloads and the audit record of a run.
//!
//! [`RiskFactorInput`] mirrors the loosely-typed records a web or file layer
//! receives: every numeric parameter is optional and the distribution is a
//! free-form string. Conversion into [`RiskFactor`] is where all of that is
//! checked.

use serde::{Deserialize, Serialize};

use crate::analyzer::RiskAnalyzer;
use crate::config::{
    AnalyzerConfig, DEFAULT_CONFIDENCE_LEVELS, DEFAULT_MONTE_CARLO_ITERATIONS,
    DEFAULT_RANDOM_SEED, MAX_REQUEST_ITERATIONS, MIN_REQUEST_ITERATIONS, RiskFactorBuilder,
};
use crate::error::{Result, RiskAnalysisError};
use crate::model::{CorrelationMatrix, Distribution, DistributionKind, RiskFactor, SimulationResult};

/// Risk factor as supplied by a caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskFactorInput {
    pub name: String,
    /// "triangular", "normal", "uniform", "lognormal" or "pert"
    pub distribution: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub most_likely: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mean: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub std_dev: Option<f64>,
}

impl RiskFactorInput {
    pub fn to_risk_factor(&self) -> Result<RiskFactor> {
        let kind = DistributionKind::parse(&self.distribution).ok_or_else(|| {
            RiskAnalysisError::UnsupportedDistribution {
                factor: self.name.clone(),
                distribution: self.distribution.clone(),
            }
        })?;

        let mut builder = RiskFactorBuilder::new(self.name.clone(), kind);
        builder.min_value = self.min_value;
        builder.most_likely = self.most_likely;
        builder.max_value = self.max_value;
        builder.mean = self.mean;
        builder.std_dev = self.std_dev;
        builder.build()
    }
}

impl From<&RiskFactor> for RiskFactorInput {
    fn from(factor: &RiskFactor) -> Self {
        let mut input = Self {
            name: factor.name().to_string(),
            distribution: factor.kind().as_str().to_string(),
            min_value: None,
            most_likely: None,
            max_value: None,
            mean: None,
            std_dev: None,
        };
        match *factor.distribution() {
            Distribution::Triangular {
                min,
                most_likely,
                max,
            }
            | Distribution::Pert {
                min,
                most_likely,
                max,
            } => {
                input.min_value = Some(min);
                input.most_likely = Some(most_likely);
                input.max_value = Some(max);
            }
            Distribution::Uniform { min, max } => {
                input.min_value = Some(min);
                input.max_value = Some(max);
            }
            Distribution::Normal { mean, std_dev } | Distribution::LogNormal { mean, std_dev } => {
                input.mean = Some(mean);
                input.std_dev = Some(std_dev);
            }
        }
        input
    }
}

/// Convert caller records into validated factors, all or nothing
pub fn build_risk_factors(inputs: &[RiskFactorInput]) -> Result<Vec<RiskFactor>> {
    let factors = inputs
        .iter()
        .map(RiskFactorInput::to_risk_factor)
        .collect::<Result<Vec<_>>>()?;

    for (i, factor) in factors.iter().enumerate() {
        if factors[..i].iter().any(|f| f.name() == factor.name()) {
            return Err(RiskAnalysisError::DuplicateFactor(factor.name().to_string()));
        }
    }

    tracing::info!("Built {} RiskFactor objects from inputs", factors.len());
    Ok(factors)
}

fn default_confidence_levels() -> Vec<f64> {
    DEFAULT_CONFIDENCE_LEVELS.to_vec()
}

fn default_iterations() -> usize {
    DEFAULT_MONTE_CARLO_ITERATIONS
}

fn default_seed() -> u64 {
    DEFAULT_RANDOM_SEED
}

/// A complete analysis request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub base_cost: f64,
    #[serde(default)]
    pub risk_factors: Vec<RiskFactorInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_matrix: Option<Vec<Vec<f64>>>,
    #[serde(default = "default_confidence_levels")]
    pub confidence_levels: Vec<f64>,
    #[serde(default = "default_iterations")]
    pub iterations: usize,
    #[serde(default = "default_seed")]
    pub random_seed: u64,
}

impl AnalysisRequest {
    #[must_use]
    pub fn new(base_cost: f64, risk_factors: Vec<RiskFactorInput>) -> Self {
        Self {
            base_cost,
            risk_factors,
            correlation_matrix: None,
            confidence_levels: default_confidence_levels(),
            iterations: default_iterations(),
            random_seed: default_seed(),
        }
    }

    /// Request-layer checks on top of what the engine validates
    pub fn validate(&self) -> Result<()> {
        if !(MIN_REQUEST_ITERATIONS..=MAX_REQUEST_ITERATIONS).contains(&self.iterations) {
            return Err(RiskAnalysisError::InvalidIterations {
                iterations: self.iterations,
                min: MIN_REQUEST_ITERATIONS,
                max: MAX_REQUEST_ITERATIONS,
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn analyzer_config(&self) -> AnalyzerConfig {
        AnalyzerConfig::default()
            .iterations(self.iterations)
            .seed(self.random_seed)
            .confidence_levels(self.confidence_levels.clone())
    }

    pub fn correlation(&self) -> Result<Option<CorrelationMatrix>> {
        self.correlation_matrix
            .clone()
            .map(CorrelationMatrix::from_rows)
            .transpose()
            .map_err(Into::into)
    }

    /// Validate, build factors and run the engine
    pub fn run(&self) -> Result<SimulationResult> {
        self.validate()?;
        let factors = build_risk_factors(&self.risk_factors)?;
        let correlation = self.correlation()?;
        RiskAnalyzer::new(self.analyzer_config()).run_analysis(
            self.base_cost,
            &factors,
            correlation.as_ref(),
        )
    }
}

/// Everything needed to reproduce a run, for the caller to persist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub recorded_at: jiff::Timestamp,
    pub request: AnalysisRequest,
    pub result: SimulationResult,
}

impl AuditRecord {
    #[must_use]
    pub fn new(request: AnalysisRequest, result: SimulationResult) -> Self {
        Self {
            recorded_at: jiff::Timestamp::now(),
            request,
            result,
        }
    }

    /// Re-run the recorded request
    pub fn replay(&self) -> Result<SimulationResult> {
        self.request.run()
    }

    /// Whether replaying reproduces the recorded result exactly
    pub fn verify(&self) -> Result<bool> {
        Ok(self.replay()? == self.result)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
