//! End-to-end estimate scenarios

use super::{all_families, weather};
use crate::analyzer::run_analysis;
use crate::config::{AnalyzerConfig, confidence_levels_for_target};
use crate::contingency::EstimateSummary;
use crate::model::CorrelationMatrix;
use crate::RiskAnalyzer;

/// Single triangular weather factor on a $1M base.
///
/// The triangular CDF at the mode is 0.25, so P50 and P95 both fall on the
/// right limb: `1e6 * (1 + 0.15 - sqrt((1 - p) * 0.2 * 0.15))`.
#[test]
fn test_weather_only_estimate() {
    let result = run_analysis(1_000_000.0, &[weather()], None, &[0.5, 0.8, 0.95], 50_000, 42).unwrap();

    let p50 = result.percentile(0.5).unwrap();
    let p95 = result.percentile(0.95).unwrap();
    assert!((p50 - 1_027_525.0).abs() < 200.0, "p50 {p50}");
    assert!((p95 - 1_111_270.0).abs() < 200.0, "p95 {p95}");
    assert!(result.min_cost >= 950_000.0);
    assert!(result.max_cost <= 1_150_000.0);
    assert!((result.mean_cost - 1_033_333.33).abs() < 100.0);
    assert_eq!(result.sensitivities["weather"], 1.0);
    assert_eq!(result.iterations, 50_000);
    assert_eq!(result.risk_factors_applied, vec!["weather".to_string()]);
}

#[test]
fn test_correlated_portfolio_contingency() {
    let factors = all_families();
    let matrix = CorrelationMatrix::identity(factors.len())
        .with_pair(0, 3, 0.6)
        .with_pair(1, 2, 0.4);

    let config = AnalyzerConfig::default()
        .iterations(20_000)
        .confidence_levels(confidence_levels_for_target(0.90));
    let result = RiskAnalyzer::new(config)
        .run_analysis(5_000_000.0, &factors, Some(&matrix))
        .unwrap();
    assert!(result.percentile(0.90).is_some());

    let summary = EstimateSummary::from_result(&result, 0.90).unwrap();
    assert_eq!(summary.target_cost, result.percentile(0.90).unwrap());
    assert!(summary.target_cost > summary.p50_cost);
    assert!(summary.contingency_percentage > 0.0);
    assert!(summary.p95_cost.unwrap() > summary.target_cost);
}

#[test]
fn test_result_serializes_with_percentile_keys() {
    let result = run_analysis(1e6, &[weather()], None, &[0.5, 0.8, 0.95], 1_000, 42).unwrap();
    let json = serde_json::to_value(&result).unwrap();
    let percentiles = json["percentiles"].as_object().unwrap();
    let keys: Vec<&str> = percentiles.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["p50", "p80", "p95"]);
    assert_eq!(json["correlation"], "not_requested");
}
