//! Toeplitz structures built from correlation sequences and signals.
//!
//! - [`toeplitz`] assembles the symmetric (p+1)×(p+1) correlation matrix of
//!   the Wiener normal equations, entry (i, j) = `seq[|i - j|]`.
//! - [`DesignMatrix`] is the convolution embedding of an input signal used by
//!   the adaptive filter: column n holds the q most recent samples ending at
//!   n, most recent first.
//!
//! # Padding
//!
//! The design matrix is the only place where padding happens, and it is
//! always zero padding. Samples before the start of the signal read as 0.0;
//! there is no wrap-around and no reflection.

use alloc::vec;
use alloc::vec::Vec;

use crate::error::{require_non_empty, Error, InvalidParameter};
use crate::linalg::Matrix;

/// Build the symmetric Toeplitz matrix of order `order` from lags `0..=order`.
///
/// Only `seq[..=order]` is read; `seq[0]` is lag 0. When `seq` comes from a
/// biased autocorrelation the result is positive semi-definite.
///
/// # Errors
///
/// [`InvalidParameter::TooFewLags`] when `seq` has fewer than `order + 1`
/// values.
///
/// # Example
///
/// ```
/// use adaptfir::toeplitz;
///
/// let r = toeplitz(&[4.0, 2.0, 1.0], 2).unwrap();
/// assert_eq!(r.row(0), &[4.0, 2.0, 1.0]);
/// assert_eq!(r.row(1), &[2.0, 4.0, 2.0]);
/// assert_eq!(r.row(2), &[1.0, 2.0, 4.0]);
/// ```
pub fn toeplitz(seq: &[f64], order: usize) -> Result<Matrix, Error> {
    let q = order + 1;
    if seq.len() < q {
        return Err(InvalidParameter::TooFewLags {
            required: q,
            available: seq.len(),
        }
        .into());
    }

    Ok(Matrix::from_fn(q, q, |i, j| seq[i.abs_diff(j)]))
}

/// Sliding-window embedding of a signal, q rows by N columns.
///
/// Entry (k, n) is `x[n - k]`, or 0.0 when `n < k`. Columns are stored
/// contiguously so each one can be borrowed as the tap vector for time n.
///
/// # Example
///
/// ```
/// use adaptfir::DesignMatrix;
///
/// let x = [1.0, 2.0, 3.0, 4.0];
/// let design = DesignMatrix::new(&x, 3).unwrap();
///
/// assert_eq!(design.column(0), &[1.0, 0.0, 0.0]); // zero padded history
/// assert_eq!(design.column(3), &[4.0, 3.0, 2.0]); // most recent first
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DesignMatrix {
    /// Column-contiguous storage, `len * taps` values
    data: Vec<f64>,
    taps: usize,
    len: usize,
}

impl DesignMatrix {
    /// Build the design matrix of `x` for a filter with `taps` coefficients.
    ///
    /// # Errors
    ///
    /// [`InvalidParameter::EmptySignal`] for an empty signal,
    /// [`InvalidParameter::ZeroTaps`] when `taps == 0`.
    pub fn new(x: &[f64], taps: usize) -> Result<Self, Error> {
        require_non_empty(x)?;
        if taps == 0 {
            return Err(InvalidParameter::ZeroTaps.into());
        }

        let len = x.len();
        let mut data = vec![0.0; len * taps];
        for (n, column) in data.chunks_exact_mut(taps).enumerate() {
            // Rows past the start of the signal stay zero
            for (k, slot) in column.iter_mut().enumerate().take(n + 1) {
                *slot = x[n - k];
            }
        }

        Ok(Self { data, taps, len })
    }

    /// Number of rows (filter taps, q).
    pub fn taps(&self) -> usize {
        self.taps
    }

    /// Number of columns (signal length, N).
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false; construction rejects empty signals.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Tap vector for time `n`: `[x[n], x[n-1], ..., x[n-q+1]]`.
    ///
    /// # Panics
    ///
    /// Panics if `n >= len()`.
    pub fn column(&self, n: usize) -> &[f64] {
        assert!(n < self.len, "Column index out of bounds");
        &self.data[n * self.taps..(n + 1) * self.taps]
    }

    /// Entry (k, n), i.e. `x[n - k]` or zero.
    pub fn get(&self, k: usize, n: usize) -> f64 {
        assert!(k < self.taps, "Row index out of bounds");
        self.column(n)[k]
    }

    /// Iterator over the tap vectors in time order.
    pub fn columns(&self) -> impl Iterator<Item = &[f64]> {
        self.data.chunks_exact(self.taps)
    }

    /// Dense q×N copy.
    pub fn to_matrix(&self) -> Matrix {
        Matrix::from_fn(self.taps, self.len, |k, n| self.get(k, n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xcorr::{estimate, Bias};

    #[test]
    fn test_toeplitz_entries() {
        let seq = [3.0, 2.0, 1.0, 0.5];
        let r = toeplitz(&seq, 3).unwrap();
        for i in 0..4 {
            for j in 0..4 {
                assert_eq!(r.get(i, j), seq[i.abs_diff(j)]);
            }
        }
    }

    #[test]
    fn test_toeplitz_ignores_extra_lags() {
        let r = toeplitz(&[1.0, 0.5, 0.25, 9.0], 1).unwrap();
        assert_eq!(r.rows(), 2);
        assert_eq!(r.data(), &[1.0, 0.5, 0.5, 1.0]);
    }

    #[test]
    fn test_toeplitz_order_zero() {
        let r = toeplitz(&[2.0], 0).unwrap();
        assert_eq!(r.data(), &[2.0]);
    }

    #[test]
    fn test_toeplitz_too_few_lags() {
        assert_eq!(
            toeplitz(&[1.0, 0.5], 2),
            Err(Error::InvalidParameter(InvalidParameter::TooFewLags {
                required: 3,
                available: 2
            }))
        );
    }

    #[test]
    fn test_toeplitz_biased_is_symmetric_psd() {
        let signals: [&[f64]; 3] = [
            &[1.0, -2.0, 3.0, 0.5, -1.0, 2.0, 0.0, 1.5],
            &[1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0],
            &[0.0, 0.0, 5.0, 0.0, 0.0, 0.0, -5.0, 0.0],
        ];

        for x in signals {
            let r = estimate(x, None, 7, Bias::Biased).unwrap();
            let m = toeplitz(r.non_negative(), 7).unwrap();
            assert!(m.is_symmetric(0.0));

            let eigen = m.eigen_symmetric(10_000, 1e-13).unwrap();
            let tol = 1e-10 * m.frobenius_norm().max(1.0);
            for &l in &eigen.eigenvalues {
                assert!(l >= -tol, "Negative eigenvalue {} for {:?}", l, x);
            }
        }
    }

    #[test]
    fn test_design_matrix_zero_padding() {
        let x = [1.0, 2.0, 3.0];
        let design = DesignMatrix::new(&x, 4).unwrap();

        assert_eq!(design.taps(), 4);
        assert_eq!(design.len(), 3);
        assert!(!design.is_empty());
        assert_eq!(design.column(0), &[1.0, 0.0, 0.0, 0.0]);
        assert_eq!(design.column(1), &[2.0, 1.0, 0.0, 0.0]);
        assert_eq!(design.column(2), &[3.0, 2.0, 1.0, 0.0]);
    }

    #[test]
    fn test_design_matrix_is_convolution_embedding() {
        let x = [0.5, -1.0, 2.0, 4.0, -3.0, 1.0];
        let design = DesignMatrix::new(&x, 3).unwrap();
        let m = design.to_matrix();

        assert_eq!(m.rows(), 3);
        assert_eq!(m.cols(), 6);
        for k in 0..3 {
            for n in 0..6 {
                let expected = if n >= k { x[n - k] } else { 0.0 };
                assert_eq!(m.get(k, n), expected);
                assert_eq!(design.get(k, n), expected);
            }
        }
    }

    #[test]
    fn test_design_matrix_columns_iter() {
        let design = DesignMatrix::new(&[1.0, 2.0], 1).unwrap();
        let cols: Vec<&[f64]> = design.columns().collect();
        assert_eq!(cols, vec![&[1.0][..], &[2.0][..]]);
    }

    #[test]
    fn test_design_matrix_invalid() {
        assert_eq!(
            DesignMatrix::new(&[], 2),
            Err(Error::InvalidParameter(InvalidParameter::EmptySignal))
        );
        assert_eq!(
            DesignMatrix::new(&[1.0], 0),
            Err(Error::InvalidParameter(InvalidParameter::ZeroTaps))
        );
    }
}
