//! Aggregation of per-factor samples into a total cost distribution.

use std::collections::BTreeMap;

use crate::model::percentile_key;
use crate::sampling::SampleMatrix;
use crate::stats;

/// Summary statistics of the risk-adjusted cost distribution, unrounded
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CostSummary {
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub percentiles: BTreeMap<String, f64>,
}

/// Risk-adjusted cost for every iteration: `base_cost * (1 + sum(row))`.
///
/// With a `floor`, each iteration's total multiplier is clamped from below.
pub(crate) fn risk_adjusted_costs(
    samples: &SampleMatrix,
    base_cost: f64,
    floor: Option<f64>,
) -> Vec<f64> {
    samples
        .row_sums()
        .into_iter()
        .map(|sum| {
            let multiplier = 1.0 + sum;
            let multiplier = match floor {
                Some(floor) => multiplier.max(floor),
                None => multiplier,
            };
            base_cost * multiplier
        })
        .collect()
}

pub(crate) fn summarize(costs: &[f64], confidence_levels: &[f64]) -> CostSummary {
    let mut sorted = costs.to_vec();
    sorted.sort_by(f64::total_cmp);

    let percentiles = confidence_levels
        .iter()
        .map(|&level| {
            (
                percentile_key(level),
                stats::percentile_sorted(&sorted, level),
            )
        })
        .collect();

    CostSummary {
        mean: stats::mean(costs),
        std_dev: stats::population_std_dev(costs),
        min: sorted.first().copied().unwrap_or(f64::NAN),
        max: sorted.last().copied().unwrap_or(f64::NAN),
        percentiles,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_costs_are_additive_fractional_impacts() {
        let samples = SampleMatrix::from_columns(2, vec![vec![0.10, -0.05], vec![0.05, 0.0]]);
        let costs = risk_adjusted_costs(&samples, 1_000.0, None);
        assert!((costs[0] - 1_150.0).abs() < 1e-9);
        assert!((costs[1] - 950.0).abs() < 1e-9);
    }

    #[test]
    fn test_floor_clamps_multiplier() {
        let samples = SampleMatrix::from_columns(1, vec![vec![-0.8], vec![-0.7]]);
        assert!(risk_adjusted_costs(&samples, 100.0, None)[0] < 0.0);
        assert_eq!(risk_adjusted_costs(&samples, 100.0, Some(0.0)), vec![0.0]);
    }

    #[test]
    fn test_summarize() {
        let costs = [4.0, 1.0, 3.0, 2.0];
        let summary = summarize(&costs, &[0.5, 0.8]);
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.max, 4.0);
        assert!((summary.mean - 2.5).abs() < 1e-12);
        assert!((summary.percentiles["p50"] - 2.5).abs() < 1e-12);
        assert!((summary.percentiles["p80"] - 3.4).abs() < 1e-12);
    }
}
