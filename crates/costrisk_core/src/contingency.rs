//! Estimate-level contingency derived from a simulation result.

use serde::{Deserialize, Serialize};

use crate::model::SimulationResult;

/// Headline numbers an estimate record carries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateSummary {
    pub base_cost: f64,
    pub p50_cost: f64,
    /// Cost at `confidence_level`, or P50 when that level was not simulated
    pub target_cost: f64,
    pub p95_cost: Option<f64>,
    pub confidence_level: f64,
    /// `(target - base) / base * 100`; zero for a zero base cost
    pub contingency_percentage: f64,
}

impl EstimateSummary {
    /// Returns `None` when the result has no P50
    #[must_use]
    pub fn from_result(result: &SimulationResult, confidence_level: f64) -> Option<Self> {
        let p50_cost = result.percentile(0.50)?;
        let target_cost = result.percentile(confidence_level).unwrap_or_else(|| {
            tracing::warn!(
                "P{:.0} not in simulation result, falling back to P50",
                confidence_level * 100.0
            );
            p50_cost
        });

        let contingency_percentage = if result.base_cost > 0.0 {
            (target_cost - result.base_cost) / result.base_cost * 100.0
        } else {
            0.0
        };

        Some(Self {
            base_cost: result.base_cost,
            p50_cost,
            target_cost,
            p95_cost: result.percentile(0.95),
            confidence_level,
            contingency_percentage,
        })
    }

    #[must_use]
    pub fn contingency_amount(&self) -> f64 {
        self.target_cost - self.base_cost
    }
}
