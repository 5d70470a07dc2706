//! Latin Hypercube sampling and inverse-CDF transforms.
//!
//! Each column of the [`SampleMatrix`] is stratified into `iterations`
//! equal-probability strata with one draw per stratum, shuffled, and then
//! mapped through its factor's quantile function. Every column gets its own
//! RNG seeded from the run's master stream, so the result does not depend on
//! whether columns are processed in parallel.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore, SeedableRng};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use statrs::distribution::{Beta, ContinuousCDF, LogNormal, Normal};

use crate::error::{Result, RiskAnalysisError};
use crate::model::{Distribution, RiskFactor};

/// Dense `iterations x factors` matrix stored column by column
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SampleMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl SampleMatrix {
    pub(crate) fn from_columns(rows: usize, columns: Vec<Vec<f64>>) -> Self {
        let cols = columns.len();
        let mut data = Vec::with_capacity(rows * cols);
        for column in columns {
            debug_assert_eq!(column.len(), rows);
            data.extend(column);
        }
        Self { rows, cols, data }
    }

    pub(crate) fn rows(&self) -> usize {
        self.rows
    }

    pub(crate) fn cols(&self) -> usize {
        self.cols
    }

    pub(crate) fn column(&self, j: usize) -> &[f64] {
        &self.data[j * self.rows..(j + 1) * self.rows]
    }

    pub(crate) fn columns(&self) -> impl Iterator<Item = &[f64]> {
        self.data.chunks(self.rows.max(1)).take(self.cols)
    }

    #[cfg(not(feature = "parallel"))]
    pub(crate) fn columns_mut(&mut self) -> impl Iterator<Item = &mut [f64]> {
        let cols = self.cols;
        self.data.chunks_mut(self.rows.max(1)).take(cols)
    }

    /// Sum across factors for each iteration
    pub(crate) fn row_sums(&self) -> Vec<f64> {
        let mut sums = vec![0.0; self.rows];
        for column in self.columns() {
            for (sum, value) in sums.iter_mut().zip(column) {
                *sum += value;
            }
        }
        sums
    }
}

/// One stratified, shuffled column of uniform [0, 1) values
fn stratified_column(iterations: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let n = iterations as f64;
    let mut column: Vec<f64> = (0..iterations)
        .map(|k| (k as f64 + rng.random::<f64>()) / n)
        .collect();
    column.shuffle(&mut rng);
    column
}

/// Latin Hypercube design of `iterations x dims` uniform values
pub(crate) fn latin_hypercube<R: RngCore + ?Sized>(
    iterations: usize,
    dims: usize,
    rng: &mut R,
) -> SampleMatrix {
    let seeds: Vec<u64> = (0..dims).map(|_| rng.next_u64()).collect();

    #[cfg(feature = "parallel")]
    let columns: Vec<Vec<f64>> = seeds
        .into_par_iter()
        .map(|seed| stratified_column(iterations, seed))
        .collect();
    #[cfg(not(feature = "parallel"))]
    let columns: Vec<Vec<f64>> = seeds
        .into_iter()
        .map(|seed| stratified_column(iterations, seed))
        .collect();

    SampleMatrix::from_columns(iterations, columns)
}

/// Quantile function of a validated distribution
#[derive(Debug, Clone)]
pub(crate) enum InverseCdf {
    Triangular { min: f64, mode: f64, max: f64 },
    Normal(Normal),
    Uniform { min: f64, max: f64 },
    LogNormal(LogNormal),
    Pert { beta: Beta, min: f64, range: f64 },
}

impl InverseCdf {
    pub(crate) fn new(factor: &RiskFactor) -> Result<Self> {
        let wrap = |reason: String| RiskAnalysisError::Distribution {
            factor: factor.name().to_string(),
            reason,
        };

        let inverse = match *factor.distribution() {
            Distribution::Triangular {
                min,
                most_likely,
                max,
            } => Self::Triangular {
                min,
                mode: most_likely,
                max,
            },
            Distribution::Normal { mean, std_dev } => {
                Self::Normal(Normal::new(mean, std_dev).map_err(|e| wrap(e.to_string()))?)
            }
            Distribution::Uniform { min, max } => Self::Uniform { min, max },
            Distribution::LogNormal { mean, std_dev } => {
                let (mu, sigma) = Distribution::lognormal_params(mean, std_dev);
                Self::LogNormal(LogNormal::new(mu, sigma).map_err(|e| wrap(e.to_string()))?)
            }
            Distribution::Pert {
                min,
                most_likely,
                max,
            } => {
                let (alpha, beta) = Distribution::pert_shape(min, most_likely, max);
                Self::Pert {
                    beta: Beta::new(alpha, beta).map_err(|e| wrap(e.to_string()))?,
                    min,
                    range: max - min,
                }
            }
        };
        Ok(inverse)
    }

    /// Map a uniform [0, 1) draw to the target distribution
    pub(crate) fn quantile(&self, u: f64) -> f64 {
        // Keep unbounded tails finite at the extreme strata; statrs' Beta
        // quantile fails for u far below EPSILON
        let u = u.clamp(f64::EPSILON, 1.0 - f64::EPSILON);
        match self {
            Self::Triangular { min, mode, max } => triangular_quantile(*min, *mode, *max, u),
            Self::Normal(normal) => normal.inverse_cdf(u),
            Self::Uniform { min, max } => min + u * (max - min),
            Self::LogNormal(lognormal) => lognormal.inverse_cdf(u),
            Self::Pert { beta, min, range } => min + beta.inverse_cdf(u) * range,
        }
    }
}

fn triangular_quantile(min: f64, mode: f64, max: f64, u: f64) -> f64 {
    let range = max - min;
    let split = (mode - min) / range;
    if u < split {
        min + (u * range * (mode - min)).sqrt()
    } else {
        max - ((1.0 - u) * range * (max - mode)).sqrt()
    }
}

/// Map each uniform column through its factor's quantile function.
///
/// All quantile functions are built before any column is touched, so a bad
/// factor aborts the whole transform.
pub(crate) fn transform_columns(
    mut uniform: SampleMatrix,
    factors: &[RiskFactor],
) -> Result<SampleMatrix> {
    debug_assert_eq!(uniform.cols(), factors.len());
    let inverses = factors
        .iter()
        .map(InverseCdf::new)
        .collect::<Result<Vec<_>>>()?;

    let apply = |(column, inverse): (&mut [f64], &InverseCdf)| {
        for value in column.iter_mut() {
            *value = inverse.quantile(*value);
        }
    };

    #[cfg(feature = "parallel")]
    {
        let rows = uniform.rows().max(1);
        uniform
            .data
            .par_chunks_mut(rows)
            .zip(inverses.par_iter())
            .for_each(apply);
    }
    #[cfg(not(feature = "parallel"))]
    uniform.columns_mut().zip(inverses.iter()).for_each(apply);

    for factor in factors {
        tracing::debug!(
            "Transformed risk factor '{}' using {} distribution",
            factor.name(),
            factor.kind()
        );
    }

    Ok(uniform)
}

/// Sample every factor: stratified uniforms followed by the inverse-CDF transform
pub(crate) fn sample_factors(
    iterations: usize,
    factors: &[RiskFactor],
    rng: &mut StdRng,
) -> Result<SampleMatrix> {
    let uniform = latin_hypercube(iterations, factors.len(), rng);
    transform_columns(uniform, factors)
}
