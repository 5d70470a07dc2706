//! Rank-correlation induction (Iman-Conover).
//!
//! Reorders the values inside each column so the columns' rank correlation
//! approximates a target matrix. Values are only moved between rows, never
//! changed, so every factor keeps exactly the marginal distribution it was
//! sampled with.
//!
//! Steps:
//! 1. Draw an `iterations x factors` matrix of independent standard-normal scores.
//! 2. Multiply by the transposed lower Cholesky factor of the target to get
//!    correlated scores.
//! 3. For each column, hand the k-th smallest sampled value to the row whose
//!    correlated score has rank k.

use rand::Rng;
use rand_distr::StandardNormal;

use crate::model::CorrelationMatrix;
use crate::sampling::SampleMatrix;

/// Result of attempting to induce correlation
#[derive(Debug)]
pub(crate) enum Induction {
    Applied(SampleMatrix),
    /// Target was not positive definite; the input samples are returned untouched
    NotPositiveDefinite(SampleMatrix),
}

/// Induce the target rank correlation on `samples`.
///
/// `target` must already have passed [`CorrelationMatrix::validate`].
pub(crate) fn induce_rank_correlation<R: Rng + ?Sized>(
    samples: SampleMatrix,
    target: &CorrelationMatrix,
    rng: &mut R,
) -> Induction {
    let rows = samples.rows();
    let n = samples.cols();
    debug_assert_eq!(target.size(), n);

    let Some(lower) = target.cholesky() else {
        tracing::warn!("Correlation matrix is not positive definite - using original samples");
        return Induction::NotPositiveDefinite(samples);
    };

    // scores[j][i]: independent standard normals, column-major like the samples
    let scores: Vec<Vec<f64>> = (0..n)
        .map(|_| (0..rows).map(|_| rng.sample::<f64, _>(StandardNormal)).collect())
        .collect();

    let mut columns = Vec::with_capacity(n);
    let mut correlated = vec![0.0; rows];
    for j in 0..n {
        // Row j of L against each row of scores: (scores @ L^T)[i][j]
        for (i, out) in correlated.iter_mut().enumerate() {
            *out = (0..=j).map(|k| scores[k][i] * lower[j * n + k]).sum();
        }
        columns.push(reorder_by_scores(samples.column(j), &correlated));
    }

    Induction::Applied(SampleMatrix::from_columns(rows, columns))
}

/// Place the sorted `values` into the rank positions of `scores`
fn reorder_by_scores(values: &[f64], scores: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[a].total_cmp(&scores[b]));

    let mut out = vec![0.0; values.len()];
    for (value, row) in sorted.into_iter().zip(order) {
        out[row] = value;
    }
    out
}
