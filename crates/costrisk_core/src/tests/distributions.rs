//! Tests for marginal distributions produced by Latin Hypercube sampling
//!
//! Each family is checked against its closed-form mean, variance and a known
//! quantile at 100,000 iterations.

use rand::SeedableRng;
use rand::rngs::StdRng;

use super::all_families;
use crate::config::RiskFactorBuilder;
use crate::model::RiskFactor;
use crate::sampling::sample_factors;
use crate::stats;

const ITERATIONS: usize = 100_000;

fn sorted_samples(factor: &RiskFactor, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let matrix = sample_factors(ITERATIONS, std::slice::from_ref(factor), &mut rng).unwrap();
    let mut column = matrix.column(0).to_vec();
    column.sort_by(f64::total_cmp);
    column
}

fn assert_within_pct(actual: f64, expected: f64, pct: f64, what: &str) {
    let tolerance = expected.abs() * pct / 100.0;
    assert!(
        (actual - expected).abs() <= tolerance,
        "{what}: expected {expected}, got {actual}"
    );
}

#[test]
fn test_moments_match_theory() {
    for factor in all_families() {
        let samples = sorted_samples(&factor, 42);
        let dist = factor.distribution();
        let sd = stats::population_std_dev(&samples);

        assert_within_pct(stats::mean(&samples), dist.mean(), 1.0, factor.name());
        assert_within_pct(sd * sd, dist.variance(), 1.0, factor.name());
    }
}

#[test]
fn test_bounded_families_stay_in_range() {
    for factor in [super::weather(), super::permitting(), super::site_conditions()] {
        let samples = sorted_samples(&factor, 3);
        let (lo, hi) = match *factor.distribution() {
            crate::Distribution::Triangular { min, max, .. }
            | crate::Distribution::Pert { min, max, .. }
            | crate::Distribution::Uniform { min, max } => (min, max),
            _ => unreachable!(),
        };
        assert!(samples[0] >= lo, "{}", factor.name());
        assert!(samples[ITERATIONS - 1] <= hi, "{}", factor.name());
    }
}

#[test]
fn test_triangular_median() {
    let samples = sorted_samples(&super::weather(), 11);
    // CDF(0) = 0.25, so the median sits on the right limb: 0.15 - sqrt(0.5 * 0.2 * 0.15)
    let expected = 0.15 - 0.015_f64.sqrt();
    let median = stats::percentile_sorted(&samples, 0.5);
    assert!((median - expected).abs() < 1e-4, "median {median}");
}

#[test]
fn test_uniform_quantiles_are_linear() {
    let samples = sorted_samples(&super::site_conditions(), 5);
    for p in [0.1, 0.5, 0.9] {
        let expected = -0.02 + p * 0.08;
        let actual = stats::percentile_sorted(&samples, p);
        assert!((actual - expected).abs() < 1e-4, "p={p}: {actual}");
    }
}

#[test]
fn test_normal_quartiles() {
    let samples = sorted_samples(&super::labor_rates(), 8);
    // z(0.75) = 0.67449
    let q1 = stats::percentile_sorted(&samples, 0.25);
    let q3 = stats::percentile_sorted(&samples, 0.75);
    assert!((q1 - (0.02 - 0.0067449)).abs() < 1e-4, "q1 {q1}");
    assert!((q3 - (0.02 + 0.0067449)).abs() < 1e-4, "q3 {q3}");
}

#[test]
fn test_lognormal_median_and_support() {
    let factor = super::material_escalation();
    let samples = sorted_samples(&factor, 13);
    // median of a lognormal is exp(mu)
    let (mu, _) = crate::Distribution::lognormal_params(0.04, 0.02);
    let median = stats::percentile_sorted(&samples, 0.5);
    assert_within_pct(median, mu.exp(), 0.5, "lognormal median");
    assert!(samples[0] > 0.0);
}

#[test]
fn test_symmetric_pert_is_centered() {
    let factor = RiskFactorBuilder::pert("symmetric")
        .three_point(-0.1, 0.0, 0.1)
        .build()
        .unwrap();
    let samples = sorted_samples(&factor, 21);
    assert!(stats::mean(&samples).abs() < 1e-4);
    assert!(stats::percentile_sorted(&samples, 0.5).abs() < 1e-3);
}
