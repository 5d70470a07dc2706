//! Target rank-correlation structure between risk factors

use serde::{Deserialize, Serialize};

use crate::error::CorrelationMatrixError;

/// Relative tolerance used for symmetry and diagonal checks
const RTOL: f64 = 1e-5;
/// Absolute tolerance used for symmetry and diagonal checks
const ATOL: f64 = 1e-8;

#[inline]
fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= ATOL + RTOL * b.abs()
}

/// Square correlation matrix, one row/column per risk factor in factor order.
///
/// Stored row-major. Construction only checks that the rows form a square;
/// [`CorrelationMatrix::validate`] checks the remaining invariants against
/// the factor count of a particular run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct CorrelationMatrix {
    size: usize,
    values: Vec<f64>,
}

impl CorrelationMatrix {
    /// Identity matrix (no correlation) of the given size
    #[must_use]
    pub fn identity(size: usize) -> Self {
        let mut values = vec![0.0; size * size];
        for i in 0..size {
            values[i * size + i] = 1.0;
        }
        Self { size, values }
    }

    /// Build from nested rows. Fails if the rows are ragged or not square.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, CorrelationMatrixError> {
        let size = rows.len();
        let mut values = Vec::with_capacity(size * size);
        for row in rows {
            if row.len() != size {
                return Err(CorrelationMatrixError::ShapeMismatch {
                    rows: size,
                    cols: row.len(),
                    expected: size,
                });
            }
            values.extend(row);
        }
        Ok(Self { size, values })
    }

    /// Set a symmetric off-diagonal pair
    ///
    /// # Panics
    ///
    /// Panics if `i` or `j` is not below [`CorrelationMatrix::size`].
    #[must_use]
    pub fn with_pair(mut self, i: usize, j: usize, value: f64) -> Self {
        assert!(
            i < self.size && j < self.size,
            "correlation pair ({i}, {j}) out of bounds for a {n}x{n} matrix",
            n = self.size
        );
        self.values[i * self.size + j] = value;
        self.values[j * self.size + i] = value;
        self
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.size + col]
    }

    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.values
            .chunks(self.size.max(1))
            .take(self.size)
            .map(<[f64]>::to_vec)
            .collect()
    }

    /// Check shape against `n_factors`, symmetry, unit diagonal and range.
    ///
    /// Positive-definiteness is deliberately not checked here: a matrix that
    /// fails only that test is handled by falling back to uncorrelated samples.
    pub fn validate(&self, n_factors: usize) -> Result<(), CorrelationMatrixError> {
        if self.size != n_factors {
            return Err(CorrelationMatrixError::ShapeMismatch {
                rows: self.size,
                cols: self.size,
                expected: n_factors,
            });
        }

        for row in 0..self.size {
            for col in (row + 1)..self.size {
                let upper = self.get(row, col);
                let lower = self.get(col, row);
                if !close(upper, lower) {
                    return Err(CorrelationMatrixError::NotSymmetric {
                        row,
                        col,
                        upper,
                        lower,
                    });
                }
            }
        }

        for index in 0..self.size {
            let value = self.get(index, index);
            if !close(value, 1.0) {
                return Err(CorrelationMatrixError::InvalidDiagonal { index, value });
            }
        }

        for row in 0..self.size {
            for col in 0..self.size {
                let value = self.get(row, col);
                if !(-1.0..=1.0).contains(&value) {
                    return Err(CorrelationMatrixError::OutOfRange { row, col, value });
                }
            }
        }

        Ok(())
    }

    /// Lower-triangular Cholesky factor, row-major.
    ///
    /// Returns `None` when the matrix is not positive definite.
    #[must_use]
    pub fn cholesky(&self) -> Option<Vec<f64>> {
        let n = self.size;
        let mut lower = vec![0.0_f64; n * n];

        for j in 0..n {
            let diag = self.get(j, j) - (0..j).map(|k| lower[j * n + k].powi(2)).sum::<f64>();
            if diag <= 0.0 || !diag.is_finite() {
                return None;
            }
            let pivot = diag.sqrt();
            lower[j * n + j] = pivot;

            for i in (j + 1)..n {
                let dot: f64 = (0..j).map(|k| lower[i * n + k] * lower[j * n + k]).sum();
                lower[i * n + j] = (self.get(i, j) - dot) / pivot;
            }
        }

        Some(lower)
    }
}

impl TryFrom<Vec<Vec<f64>>> for CorrelationMatrix {
    type Error = CorrelationMatrixError;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self, Self::Error> {
        Self::from_rows(rows)
    }
}

impl From<CorrelationMatrix> for Vec<Vec<f64>> {
    fn from(matrix: CorrelationMatrix) -> Self {
        matrix.to_rows()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_is_valid() {
        let matrix = CorrelationMatrix::identity(3);
        assert!(matrix.validate(3).is_ok());
        assert_eq!(matrix.get(1, 1), 1.0);
        assert_eq!(matrix.get(0, 2), 0.0);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = CorrelationMatrix::from_rows(vec![vec![1.0, 0.2], vec![0.2]]).unwrap_err();
        assert_eq!(err.code(), "INVALID_CORRELATION_MATRIX_SHAPE");
    }

    #[test]
    fn test_shape_mismatch_against_factor_count() {
        let matrix = CorrelationMatrix::identity(2);
        let err = matrix.validate(3).unwrap_err();
        assert_eq!(
            err,
            CorrelationMatrixError::ShapeMismatch {
                rows: 2,
                cols: 2,
                expected: 3
            }
        );
    }

    #[test]
    #[should_panic(expected = "correlation pair (0, 5) out of bounds for a 2x2 matrix")]
    fn test_with_pair_out_of_bounds_panics() {
        let _ = CorrelationMatrix::identity(2).with_pair(0, 5, 0.5);
    }

    #[test]
    fn test_asymmetric_rejected() {
        let matrix =
            CorrelationMatrix::from_rows(vec![vec![1.0, 0.5], vec![0.3, 1.0]]).unwrap();
        let err = matrix.validate(2).unwrap_err();
        assert_eq!(err.code(), "CORRELATION_MATRIX_NOT_SYMMETRIC");
    }

    #[test]
    fn test_bad_diagonal_rejected() {
        let matrix =
            CorrelationMatrix::from_rows(vec![vec![0.9, 0.0], vec![0.0, 1.0]]).unwrap();
        let err = matrix.validate(2).unwrap_err();
        assert_eq!(err.code(), "CORRELATION_MATRIX_INVALID_DIAGONAL");
    }

    #[test]
    fn test_out_of_range_rejected() {
        let matrix = CorrelationMatrix::identity(2).with_pair(0, 1, 1.5);
        let err = matrix.validate(2).unwrap_err();
        assert_eq!(err.code(), "CORRELATION_MATRIX_OUT_OF_RANGE");
    }

    #[test]
    fn test_symmetry_within_tolerance() {
        let matrix = CorrelationMatrix::from_rows(vec![
            vec![1.0, 0.5],
            vec![0.5 + 1e-10, 1.0],
        ])
        .unwrap();
        assert!(matrix.validate(2).is_ok());
    }

    #[test]
    fn test_cholesky_two_by_two() {
        let matrix = CorrelationMatrix::identity(2).with_pair(0, 1, 0.6);
        let lower = matrix.cholesky().unwrap();
        assert!((lower[0] - 1.0).abs() < 1e-12);
        assert_eq!(lower[1], 0.0);
        assert!((lower[2] - 0.6).abs() < 1e-12);
        assert!((lower[3] - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_cholesky_rejects_indefinite() {
        let matrix = CorrelationMatrix::identity(3)
            .with_pair(0, 1, 0.9)
            .with_pair(0, 2, 0.9)
            .with_pair(1, 2, -0.9);
        assert!(matrix.validate(3).is_ok());
        assert!(matrix.cholesky().is_none());
    }

    #[test]
    fn test_serde_as_nested_rows() {
        let matrix = CorrelationMatrix::identity(2).with_pair(0, 1, 0.25);
        let json = serde_json::to_string(&matrix).unwrap();
        assert_eq!(json, "[[1.0,0.25],[0.25,1.0]]");
        let back: CorrelationMatrix = serde_json::from_str(&json).unwrap();
        assert_eq!(back, matrix);
    }
}
