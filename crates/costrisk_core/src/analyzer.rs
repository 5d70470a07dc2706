//! Monte Carlo cost-risk analysis entry point.
//!
//! Pipeline: Latin Hypercube sampling -> (optional) rank-correlation induction
//! -> aggregation into total cost -> Spearman sensitivities. All stages run
//! over the same sample matrix and draw randomness only from RNG streams
//! derived from the configured seed.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rustc_hash::FxHashSet;

use crate::aggregate;
use crate::config::AnalyzerConfig;
use crate::correlation::{self, Induction};
use crate::error::{Result, RiskAnalysisError};
use crate::model::{
    AnalysisWarning, CorrelationMatrix, CorrelationOutcome, RiskFactor, SimulationResult,
    percentile_key,
};
use crate::sampling;
use crate::sensitivity;
use crate::stats::round_to;

/// Decimal places kept in monetary outputs
const MONEY_DECIMALS: i32 = 2;

/// Offset separating the correlation stream from the sampling stream
const CORRELATION_STREAM: u64 = 0x9E37_79B9_7F4A_7C15;

/// Stateless, reentrant Monte Carlo risk analyzer.
///
/// Owns only its configuration; concurrent calls share nothing.
#[derive(Debug, Clone, Default)]
pub struct RiskAnalyzer {
    config: AnalyzerConfig,
}

impl RiskAnalyzer {
    #[must_use]
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Run the analysis for `base_cost` under `factors`.
    ///
    /// Every input is validated before any sampling starts; a single bad
    /// factor or a malformed correlation matrix aborts the whole run. A matrix
    /// that is well formed but not positive definite is not an error: the run
    /// proceeds uncorrelated and the result is tagged
    /// [`CorrelationOutcome::FallbackNotPositiveDefinite`].
    pub fn run_analysis(
        &self,
        base_cost: f64,
        factors: &[RiskFactor],
        correlation_matrix: Option<&CorrelationMatrix>,
    ) -> Result<SimulationResult> {
        let config = &self.config;
        validate_inputs(config, base_cost, factors, correlation_matrix)?;

        tracing::info!(
            "Starting Monte Carlo analysis: base_cost={base_cost:.2}, {} risk factors, {} iterations",
            factors.len(),
            config.iterations
        );

        if factors.is_empty() {
            return Ok(base_cost_only(base_cost, config));
        }

        let mut rng = StdRng::seed_from_u64(config.random_seed);
        let mut samples = sampling::sample_factors(config.iterations, factors, &mut rng)?;

        let mut warnings = Vec::new();
        let mut outcome = CorrelationOutcome::NotRequested;
        if let Some(matrix) = correlation_matrix {
            tracing::warn!(
                "Applying Iman-Conover rank correlation across {} risk factors",
                factors.len()
            );
            let mut correlation_rng =
                StdRng::seed_from_u64(config.random_seed ^ CORRELATION_STREAM);
            samples = match correlation::induce_rank_correlation(samples, matrix, &mut correlation_rng)
            {
                Induction::Applied(correlated) => {
                    outcome = CorrelationOutcome::Applied;
                    correlated
                }
                Induction::NotPositiveDefinite(original) => {
                    outcome = CorrelationOutcome::FallbackNotPositiveDefinite;
                    warnings.push(AnalysisWarning::CorrelationNotPositiveDefinite);
                    original
                }
            };
        }

        let costs = aggregate::risk_adjusted_costs(&samples, base_cost, config.multiplier_floor);
        let negative = costs.iter().filter(|cost| **cost < 0.0).count();
        if negative > 0 {
            tracing::warn!(
                "{negative} of {} iterations produced a negative total cost",
                costs.len()
            );
            warnings.push(AnalysisWarning::NegativeCostIterations { count: negative });
        }

        let summary = aggregate::summarize(&costs, &config.confidence_levels);
        let names: Vec<String> = factors.iter().map(|f| f.name().to_string()).collect();
        let sensitivities = sensitivity::spearman_sensitivities(&samples, &costs, &names);

        Ok(SimulationResult {
            base_cost,
            mean_cost: round_to(summary.mean, MONEY_DECIMALS),
            std_dev: round_to(summary.std_dev, MONEY_DECIMALS),
            percentiles: summary
                .percentiles
                .into_iter()
                .map(|(key, value)| (key, round_to(value, MONEY_DECIMALS)))
                .collect(),
            min_cost: round_to(summary.min, MONEY_DECIMALS),
            max_cost: round_to(summary.max, MONEY_DECIMALS),
            iterations: config.iterations,
            risk_factors_applied: names,
            sensitivities,
            correlation: outcome,
            warnings,
        })
    }
}

/// Run an analysis with every engine parameter given explicitly
pub fn run_analysis(
    base_cost: f64,
    factors: &[RiskFactor],
    correlation_matrix: Option<&CorrelationMatrix>,
    confidence_levels: &[f64],
    iterations: usize,
    random_seed: u64,
) -> Result<SimulationResult> {
    let config = AnalyzerConfig::default()
        .iterations(iterations)
        .seed(random_seed)
        .confidence_levels(confidence_levels);
    RiskAnalyzer::new(config).run_analysis(base_cost, factors, correlation_matrix)
}

fn validate_inputs(
    config: &AnalyzerConfig,
    base_cost: f64,
    factors: &[RiskFactor],
    correlation_matrix: Option<&CorrelationMatrix>,
) -> Result<()> {
    if !base_cost.is_finite() || base_cost < 0.0 {
        return Err(RiskAnalysisError::InvalidBaseCost(base_cost));
    }
    if config.iterations == 0 {
        return Err(RiskAnalysisError::InvalidIterations {
            iterations: 0,
            min: 1,
            max: usize::MAX,
        });
    }
    if let Some(&level) = config
        .confidence_levels
        .iter()
        .find(|level| !(**level > 0.0 && **level < 1.0))
    {
        return Err(RiskAnalysisError::InvalidConfidenceLevel(level));
    }

    let mut seen = FxHashSet::default();
    for factor in factors {
        if factor.name().trim().is_empty() {
            return Err(RiskAnalysisError::EmptyFactorName);
        }
        factor.distribution().validate(factor.name())?;
        if !seen.insert(factor.name()) {
            return Err(RiskAnalysisError::DuplicateFactor(factor.name().to_string()));
        }
    }

    if let Some(matrix) = correlation_matrix {
        matrix.validate(factors.len())?;
    }
    Ok(())
}

/// Result for a run with no risk factors: every statistic is the base cost
fn base_cost_only(base_cost: f64, config: &AnalyzerConfig) -> SimulationResult {
    SimulationResult {
        base_cost,
        mean_cost: base_cost,
        std_dev: 0.0,
        percentiles: config
            .confidence_levels
            .iter()
            .map(|&level| (percentile_key(level), base_cost))
            .collect(),
        min_cost: base_cost,
        max_cost: base_cost,
        iterations: config.iterations,
        risk_factors_applied: Vec::new(),
        sensitivities: Default::default(),
        correlation: CorrelationOutcome::NotRequested,
        warnings: Vec::new(),
    }
}
