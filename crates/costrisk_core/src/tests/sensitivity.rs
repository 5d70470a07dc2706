//! Tests for Spearman sensitivities

use super::weather;
use crate::analyzer::run_analysis;
use crate::config::RiskFactorBuilder;

#[test]
fn test_dominant_and_negligible_factors() {
    let dominant = RiskFactorBuilder::normal("foundation")
        .mean(0.0)
        .std_dev(0.5)
        .build()
        .unwrap();
    let negligible = RiskFactorBuilder::uniform("signage")
        .min(0.0)
        .max(0.001)
        .build()
        .unwrap();

    let result = run_analysis(1e6, &[dominant, negligible], None, &[0.5], 10_000, 42).unwrap();
    let foundation = result.sensitivities["foundation"];
    let signage = result.sensitivities["signage"];
    assert!(foundation.abs() > 0.99, "foundation {foundation}");
    assert!(signage.abs() < 0.05, "signage {signage}");

    let ranked = result.ranked_sensitivities();
    assert_eq!(ranked[0].0, "foundation");
}

#[test]
fn test_every_factor_has_a_bounded_coefficient() {
    let factors = super::all_families();
    let result = run_analysis(1e6, &factors, None, &[0.5], 5_000, 42).unwrap();

    assert_eq!(result.sensitivities.len(), factors.len());
    for factor in &factors {
        let rho = result.sensitivities[factor.name()];
        assert!((-1.0..=1.0).contains(&rho), "{}: {rho}", factor.name());
        let scaled = rho * 10_000.0;
        assert!((scaled - scaled.round()).abs() < 1e-6);
    }
    assert_eq!(
        result.risk_factors_applied,
        factors.iter().map(|f| f.name().to_string()).collect::<Vec<_>>()
    );
}

#[test]
fn test_zero_base_cost_gives_zero_sensitivity() {
    let result = run_analysis(0.0, &[weather()], None, &[0.5], 1_000, 42).unwrap();
    assert_eq!(result.sensitivities["weather"], 0.0);
}
