use serde::{Deserialize, Serialize};

/// Default number of Monte Carlo iterations
pub const DEFAULT_MONTE_CARLO_ITERATIONS: usize = 10_000;
/// Default random seed, fixed so repeated runs are reproducible
pub const DEFAULT_RANDOM_SEED: u64 = 42;
/// Default target confidence level for contingency
pub const DEFAULT_CONFIDENCE_LEVEL: f64 = 0.80;
/// Default percentiles reported for every run
pub const DEFAULT_CONFIDENCE_LEVELS: [f64; 3] = [0.50, 0.80, 0.95];

/// Request-layer bounds on iteration count
pub const MIN_REQUEST_ITERATIONS: usize = 1_000;
pub const MAX_REQUEST_ITERATIONS: usize = 100_000;

/// Engine-level settings for a [`crate::RiskAnalyzer`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub iterations: usize,
    pub random_seed: u64,
    /// Fractions in (0, 1)
    pub confidence_levels: Vec<f64>,
    /// Lower bound on each iteration's total multiplier.
    /// `None` keeps the raw additive model, which can yield negative costs.
    pub multiplier_floor: Option<f64>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_MONTE_CARLO_ITERATIONS,
            random_seed: DEFAULT_RANDOM_SEED,
            confidence_levels: DEFAULT_CONFIDENCE_LEVELS.to_vec(),
            multiplier_floor: None,
        }
    }
}

impl AnalyzerConfig {
    #[must_use]
    pub fn iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.random_seed = seed;
        self
    }

    #[must_use]
    pub fn confidence_levels(mut self, levels: impl Into<Vec<f64>>) -> Self {
        self.confidence_levels = levels.into();
        self
    }

    #[must_use]
    pub fn multiplier_floor(mut self, floor: f64) -> Self {
        self.multiplier_floor = Some(floor);
        self
    }
}

/// `[0.50, target, 0.95]`, sorted and deduplicated
#[must_use]
pub fn confidence_levels_for_target(target: f64) -> Vec<f64> {
    let mut levels = vec![0.50, target, 0.95];
    levels.sort_by(f64::total_cmp);
    levels.dedup_by(|a, b| (*a - *b).abs() < 1e-9);
    levels
}
