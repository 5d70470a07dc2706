//! Simulation results
//!
//! Contains the output of a single risk analysis run. Results are never
//! mutated after the analyzer returns them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Percentile key for a confidence level, e.g. `0.95 -> "p95"`
///
/// `level * 100` is rounded to the nearest integer, not truncated, so
/// `0.57` maps to `"p57"` even though `0.57 * 100` is `56.99999999999999`.
#[must_use]
pub fn percentile_key(level: f64) -> String {
    format!("p{}", (level * 100.0).round() as u32)
}

/// What happened to the optional correlation step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrelationOutcome {
    /// No correlation matrix was supplied
    #[default]
    NotRequested,
    /// Samples were reordered to follow the target rank correlation
    Applied,
    /// The matrix was not positive definite; samples were left uncorrelated
    FallbackNotPositiveDefinite,
}

/// Non-fatal conditions detected during a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalysisWarning {
    /// Correlation matrix failed Cholesky decomposition
    CorrelationNotPositiveDefinite,
    /// Some iterations drove the total multiplier below zero
    NegativeCostIterations { count: usize },
}

impl std::fmt::Display for AnalysisWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CorrelationNotPositiveDefinite => write!(
                f,
                "correlation matrix is not positive definite; factors were sampled independently"
            ),
            Self::NegativeCostIterations { count } => {
                write!(f, "{count} iterations produced a negative total cost")
            }
        }
    }
}

/// Output of a Monte Carlo risk analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub base_cost: f64,
    pub mean_cost: f64,
    pub std_dev: f64,
    /// Percentile key (`"p50"`) -> risk-adjusted cost
    pub percentiles: BTreeMap<String, f64>,
    pub min_cost: f64,
    pub max_cost: f64,
    pub iterations: usize,
    /// Factor names in input order
    pub risk_factors_applied: Vec<String>,
    /// Factor name -> Spearman rank correlation with total cost
    pub sensitivities: BTreeMap<String, f64>,
    #[serde(default)]
    pub correlation: CorrelationOutcome,
    #[serde(default)]
    pub warnings: Vec<AnalysisWarning>,
}

impl SimulationResult {
    /// Cost at a confidence level, if that level was requested
    #[must_use]
    pub fn percentile(&self, level: f64) -> Option<f64> {
        self.percentiles.get(&percentile_key(level)).copied()
    }

    /// Sensitivities ordered by descending magnitude (tornado order)
    #[must_use]
    pub fn ranked_sensitivities(&self) -> Vec<(&str, f64)> {
        let mut ranked: Vec<(&str, f64)> = self
            .sensitivities
            .iter()
            .map(|(name, rho)| (name.as_str(), *rho))
            .collect();
        ranked.sort_by(|a, b| b.1.abs().total_cmp(&a.1.abs()).then(a.0.cmp(b.0)));
        ranked
    }

    #[must_use]
    pub fn correlation_fell_back(&self) -> bool {
        self.correlation == CorrelationOutcome::FallbackNotPositiveDefinite
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentile_key_rounds() {
        assert_eq!(percentile_key(0.5), "p50");
        assert_eq!(percentile_key(0.95), "p95");
        // 0.57 * 100 = 56.99999999999999
        assert_eq!(percentile_key(0.57), "p57");
    }

    #[test]
    fn test_ranked_sensitivities() {
        let result = SimulationResult {
            base_cost: 100.0,
            mean_cost: 100.0,
            std_dev: 0.0,
            percentiles: BTreeMap::new(),
            min_cost: 100.0,
            max_cost: 100.0,
            iterations: 10,
            risk_factors_applied: vec!["a".into(), "b".into(), "c".into()],
            sensitivities: BTreeMap::from([
                ("a".to_string(), 0.2),
                ("b".to_string(), -0.9),
                ("c".to_string(), 0.5),
            ]),
            correlation: CorrelationOutcome::NotRequested,
            warnings: Vec::new(),
        };

        let ranked = result.ranked_sensitivities();
        assert_eq!(ranked[0], ("b", -0.9));
        assert_eq!(ranked[1], ("c", 0.5));
        assert_eq!(ranked[2], ("a", 0.2));
    }
}
