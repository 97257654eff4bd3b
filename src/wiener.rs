//! Wiener (minimum mean square error) FIR filter from the normal equations.
//!
//! For an input `x` and desired signal `d` the order-p Wiener filter solves
//!
//! ```text
//! Rx · w = rdx
//!
//! Rx[i][j] = rx[|i - j|]          rx[k]  = (1/N) Σ x[n + k] · x[n]
//! rdx[k]   = (1/N) Σ d[n + k] · x[n]
//! ```
//!
//! Both sequences use biased scaling so `Rx` is positive semi-definite. The
//! system is always solved in the minimum-norm least-squares sense: for a
//! well-conditioned `Rx` this is the ordinary solution, for a singular one
//! (silent input, a pure tone with a large order) it is the smallest weight
//! vector that fits. Degenerate input is never an error.
//!
//! # Example
//!
//! ```
//! use adaptfir::solve_wiener;
//!
//! let x: Vec<f64> = (0..400).map(|i| ((i * 37) % 101) as f64 / 101.0 - 0.5).collect();
//!
//! // d is x delayed by one sample
//! let mut d = vec![0.0];
//! d.extend_from_slice(&x[..399]);
//!
//! let w = solve_wiener(&x, &d, 2).unwrap();
//! assert!((w[1] - 1.0).abs() < 0.1);
//! assert!(w[0].abs() < 0.1 && w[2].abs() < 0.1);
//! ```

use alloc::vec::Vec;

use crate::error::{require_non_empty, require_same_len, Error, InvalidParameter};
use crate::filter::fir_filter;
use crate::linalg::DEFAULT_RCOND;
use crate::rms::mean_square;
use crate::toeplitz::toeplitz;
use crate::xcorr::{correlate_window, Bias};

/// Solved Wiener filter.
///
/// # Example
///
/// ```
/// use adaptfir::{fir_filter, WienerFilter};
///
/// let x: Vec<f64> = (0..500).map(|i| ((i * 13) % 31) as f64 / 31.0 - 0.5).collect();
/// let d = fir_filter(&[0.5, 0.25], &x).unwrap();
///
/// let wiener = WienerFilter::fit(&x, &d, 1).unwrap();
/// assert_eq!(wiener.order(), 1);
/// assert!(wiener.mmse(&x, &d).unwrap() < 1e-3);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct WienerFilter {
    weights: Vec<f64>,
    rank: usize,
}

impl WienerFilter {
    /// Estimates the order-`order` Wiener filter mapping `x` to `d`.
    ///
    /// # Errors
    ///
    /// Empty `x`, `d` of a different length, or `order >= x.len()`.
    pub fn fit(x: &[f64], d: &[f64], order: usize) -> Result<Self, Error> {
        require_non_empty(x)?;
        require_same_len(x, d)?;
        if order >= x.len() {
            return Err(InvalidParameter::OrderOutOfRange {
                order,
                len: x.len(),
            }
            .into());
        }

        // Window computation accepts order 0, unlike the public estimator
        let rx = correlate_window(x, x, order, Bias::Biased);
        let rdx = correlate_window(d, x, order, Bias::Biased);

        let r = toeplitz(rx.non_negative(), order)?;
        let ls = r.lstsq_symmetric(rdx.non_negative(), DEFAULT_RCOND);

        log::debug!(
            "wiener solve: n={} order={} rank={}/{}",
            x.len(),
            order,
            ls.rank,
            order + 1
        );

        Ok(Self {
            weights: ls.solution,
            rank: ls.rank,
        })
    }

    /// Filter coefficients, `order + 1` values.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Consumes the filter, returning its coefficients.
    pub fn into_weights(self) -> Vec<f64> {
        self.weights
    }

    /// Filter order p.
    pub fn order(&self) -> usize {
        self.weights.len() - 1
    }

    /// Numerical rank of the correlation matrix used for the solve.
    ///
    /// Below `order() + 1` the weights are the minimum-norm solution.
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Filters `x` with the solved weights from zero initial state.
    pub fn apply(&self, x: &[f64]) -> Result<Vec<f64>, Error> {
        fir_filter(&self.weights, x)
    }

    /// Mean square of the residual `d - apply(x)`.
    ///
    /// # Errors
    ///
    /// Empty `x` or `d` of a different length.
    pub fn mmse(&self, x: &[f64], d: &[f64]) -> Result<f64, Error> {
        require_same_len(x, d)?;
        let y = self.apply(x)?;
        let residual: Vec<f64> = d.iter().zip(&y).map(|(d, y)| d - y).collect();
        mean_square(&residual)
    }
}

/// Wiener filter weights of order `order` for input `x` and desired `d`.
///
/// Returns `order + 1` weights, `w[k]` multiplying `x[n - k]`.
///
/// # Errors
///
/// Empty `x`, `d` of a different length, or `order >= x.len()`.
pub fn solve_wiener(x: &[f64], d: &[f64], order: usize) -> Result<Vec<f64>, Error> {
    WienerFilter::fit(x, d, order).map(WienerFilter::into_weights)
}
