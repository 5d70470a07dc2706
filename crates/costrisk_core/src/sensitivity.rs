//! Spearman rank-correlation sensitivity of each factor against total cost.

use std::collections::BTreeMap;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::sampling::SampleMatrix;
use crate::stats;

/// Decimal places kept in reported coefficients
pub(crate) const SENSITIVITY_DECIMALS: i32 = 4;

/// Factor name -> Spearman's rho between that factor's column and `costs`
pub(crate) fn spearman_sensitivities(
    samples: &SampleMatrix,
    costs: &[f64],
    names: &[String],
) -> BTreeMap<String, f64> {
    debug_assert_eq!(samples.cols(), names.len());
    let cost_ranks = stats::average_ranks(costs);

    let rho = |j: usize| {
        let factor_ranks = stats::average_ranks(samples.column(j));
        stats::round_to(
            stats::pearson(&factor_ranks, &cost_ranks),
            SENSITIVITY_DECIMALS,
        )
    };

    #[cfg(feature = "parallel")]
    let coefficients: Vec<f64> = (0..names.len()).into_par_iter().map(rho).collect();
    #[cfg(not(feature = "parallel"))]
    let coefficients: Vec<f64> = (0..names.len()).map(rho).collect();

    names.iter().cloned().zip(coefficients).collect()
}
