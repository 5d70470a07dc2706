//! Integration tests for the costrisk analysis engine
//!
//! Tests are organized by topic:
//! - `determinism` - Seeded reproducibility
//! - `distributions` - Marginal moments and quantiles of each distribution family
//! - `correlation` - Iman-Conover induction, validation and fallback
//! - `aggregation` - Total cost statistics and the multiplier floor
//! - `sensitivity` - Spearman sensitivities against total cost
//! - `scenario` - End-to-end estimate scenarios

mod determinism;
mod distributions;
mod scenario;
mod sensitivity;

use crate::config::RiskFactorBuilder;
use crate::model::RiskFactor;

/// Weather delay as a fractional impact: -5% / 0% / +15%
pub(super) fn weather() -> RiskFactor {
    RiskFactorBuilder::triangular("weather")
        .three_point(-0.05, 0.0, 0.15)
        .build()
        .unwrap()
}

pub(super) fn labor_rates() -> RiskFactor {
    RiskFactorBuilder::normal("labor_rates")
        .mean(0.02)
        .std_dev(0.01)
        .build()
        .unwrap()
}

pub(super) fn material_escalation() -> RiskFactor {
    RiskFactorBuilder::lognormal("material_escalation")
        .mean(0.04)
        .std_dev(0.02)
        .build()
        .unwrap()
}

pub(super) fn permitting() -> RiskFactor {
    RiskFactorBuilder::pert("permitting")
        .three_point(0.0, 0.02, 0.10)
        .build()
        .unwrap()
}

pub(super) fn site_conditions() -> RiskFactor {
    RiskFactorBuilder::uniform("site_conditions")
        .min(-0.02)
        .max(0.06)
        .build()
        .unwrap()
}

pub(super) fn all_families() -> Vec<RiskFactor> {
    vec![
        weather(),
        labor_rates(),
        material_escalation(),
        permitting(),
        site_conditions(),
    ]
}
