//! Cross-correlation and auto-correlation estimates.
//!
//! This module provides the empirical correlation sequences that feed the
//! Wiener normal equations, plus a few helpers for time delay estimation.
//!
//! # Convention
//!
//! The correlation of `x` against `y` at lag `k` is
//!
//! ```text
//! r_xy[k] = Σ_n x[n + k] · y[n]
//! ```
//!
//! summed over every `n` where both indices are in range. The full sequence
//! of two signals of lengths N and M has `N + M - 1` entries, lags
//! `-(M-1)..=N-1`. Swapping the arguments reverses the sequence in time:
//! `r_xy[k] == r_yx[-k]`. Signals are never demeaned.
//!
//! # Bias
//!
//! [`estimate`] scales each lag by one of two conventions:
//! - [`Bias::Biased`] divides every lag by N. The resulting Toeplitz matrix
//!   is always positive semi-definite, which the Wiener solve relies on.
//! - [`Bias::Unbiased`] divides lag `k` by `N - |k|`. Each lag is unbiased,
//!   but the Toeplitz matrix may be indefinite.
//!
//! # Example
//!
//! ```
//! use adaptfir::{estimate, Bias};
//!
//! let x = [1.0, 2.0, 3.0, 2.0, 1.0];
//! let r = estimate(&x, None, 2, Bias::Biased).unwrap();
//!
//! // Lag 0 of the biased autocorrelation is mean(x²)
//! assert!((r.lag(0).unwrap() - 19.0 / 5.0).abs() < 1e-12);
//!
//! // Auto-correlation is symmetric
//! assert_eq!(r.lag(-2), r.lag(2));
//! ```

use alloc::vec::Vec;

use crate::error::{require_non_empty, require_same_len, Error, InvalidParameter};

/// Scaling applied to raw correlation sums.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Bias {
    /// Divide by N. Positive semi-definite, standard for Wiener filtering.
    #[default]
    Biased,
    /// Divide lag `k` by `N - |k|`.
    Unbiased,
}

/// Two-sided correlation estimate for lags `-max_lag..=max_lag`.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationSequence {
    /// Values ordered from lag `-max_lag` to lag `max_lag`
    values: Vec<f64>,
    max_lag: usize,
    bias: Bias,
}

impl CorrelationSequence {
    /// Largest lag held by the sequence.
    pub fn max_lag(&self) -> usize {
        self.max_lag
    }

    /// Scaling convention the sequence was estimated with.
    pub fn bias(&self) -> Bias {
        self.bias
    }

    /// Number of lags, `2 * max_lag + 1`.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false; a sequence holds at least lag 0.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// All values, ordered from lag `-max_lag` to `max_lag`.
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Consumes the sequence, returning the two-sided values.
    pub fn into_vec(self) -> Vec<f64> {
        self.values
    }

    /// Value at a signed lag, or `None` outside `-max_lag..=max_lag`.
    pub fn lag(&self, lag: isize) -> Option<f64> {
        let index = lag + self.max_lag as isize;
        if index < 0 {
            return None;
        }
        self.values.get(index as usize).copied()
    }

    /// Lags `0..=max_lag`, the half consumed by the Toeplitz builder.
    ///
    /// ```
    /// use adaptfir::{estimate, Bias};
    ///
    /// let r = estimate(&[1.0, 1.0, 1.0, 1.0], None, 2, Bias::Biased).unwrap();
    /// assert_eq!(r.non_negative(), &[1.0, 0.75, 0.5]);
    /// ```
    pub fn non_negative(&self) -> &[f64] {
        &self.values[self.max_lag..]
    }

    /// Iterator over the lag values `-max_lag..=max_lag`.
    pub fn lags(&self) -> impl Iterator<Item = isize> {
        let max_lag = self.max_lag as isize;
        -max_lag..=max_lag
    }

    /// Iterator over `(lag, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (isize, f64)> + '_ {
        self.lags().zip(self.values.iter().copied())
    }

    /// Lag of the largest value. Ties resolve to the most negative lag.
    ///
    /// Commonly used for time delay estimation between two signals.
    ///
    /// ```
    /// use adaptfir::{estimate, Bias};
    ///
    /// let x = [0.0, 0.0, 1.0, 2.0, 1.0, 0.0, 0.0, 0.0];
    /// let d = [0.0, 0.0, 0.0, 0.0, 1.0, 2.0, 1.0, 0.0]; // x delayed by 2
    ///
    /// let r = estimate(&d, Some(&x), 4, Bias::Biased).unwrap();
    /// assert_eq!(r.peak_lag(), 2);
    /// ```
    pub fn peak_lag(&self) -> isize {
        let mut max_idx = 0;
        let mut max_val = f64::NEG_INFINITY;

        for (i, &val) in self.values.iter().enumerate() {
            if val > max_val {
                max_val = val;
                max_idx = i;
            }
        }

        max_idx as isize - self.max_lag as isize
    }
}

/// Raw correlation sum `Σ_n x[n + lag] · y[n]` over the overlapping range.
fn correlate_lag(x: &[f64], y: &[f64], lag: isize) -> f64 {
    // n must satisfy 0 <= n < M and 0 <= n + lag < N
    let n_start = (-lag).max(0) as usize;
    let n_end_signed = (y.len() as isize).min(x.len() as isize - lag);
    if n_end_signed <= n_start as isize {
        return 0.0;
    }
    let n_end = n_end_signed as usize;

    let mut sum = 0.0;
    for n in n_start..n_end {
        sum += x[(n as isize + lag) as usize] * y[n];
    }
    sum
}

/// Full linear correlation of `x` against `y`.
///
/// Output has `N + M - 1` entries; index `k` holds lag `k - (M - 1)`. This is
/// the unscaled direct double sum, matching `numpy.correlate(x, y, "full")`.
///
/// # Errors
///
/// Either signal empty.
///
/// # Example
///
/// ```
/// use adaptfir::correlate_full;
///
/// let c = correlate_full(&[1.0, 2.0, 3.0], &[0.0, 1.0, 0.5]).unwrap();
/// assert_eq!(c, vec![0.5, 2.0, 3.5, 3.0, 0.0]);
/// ```
pub fn correlate_full(x: &[f64], y: &[f64]) -> Result<Vec<f64>, Error> {
    require_non_empty(x)?;
    require_non_empty(y)?;

    let min_lag = -(y.len() as isize - 1);
    let max_lag = x.len() as isize - 1;
    Ok((min_lag..=max_lag)
        .map(|lag| correlate_lag(x, y, lag))
        .collect())
}

/// Lag window of the full correlation, scaled. Accepts `max_lag == 0`.
///
/// Only the `2 * max_lag + 1` lags of the window are summed; each one is the
/// same double sum [`correlate_full`] would produce at that position.
pub(crate) fn correlate_window(
    x: &[f64],
    y: &[f64],
    max_lag: usize,
    bias: Bias,
) -> CorrelationSequence {
    let n = x.len();
    let values = (-(max_lag as isize)..=max_lag as isize)
        .map(|lag| {
            let sum = correlate_lag(x, y, lag);
            match bias {
                Bias::Biased => sum / n as f64,
                Bias::Unbiased => sum / (n - lag.unsigned_abs()) as f64,
            }
        })
        .collect();

    CorrelationSequence {
        values,
        max_lag,
        bias,
    }
}

/// Estimate the auto- or cross-correlation sequence of finite signals.
///
/// With `y == None` this is the autocorrelation of `x`. Otherwise it is the
/// correlation of `x` against `y`, value at lag `k` being
/// `Σ_n x[n + k] · y[n]` scaled per [`Bias`].
///
/// # Arguments
///
/// * `x` - Signal of length N
/// * `y` - Optional second signal, also of length N
/// * `max_lag` - Largest lag, `0 < max_lag < N`
/// * `bias` - Scaling convention
///
/// # Errors
///
/// [`InvalidParameter`] when `x` is empty, `y` has a different length or
/// `max_lag` is outside `1..N`. Nothing is truncated silently.
///
/// # Example
///
/// ```
/// use adaptfir::{estimate, Bias};
///
/// let x = [1.0, 1.0, 1.0, 1.0];
///
/// let biased = estimate(&x, None, 2, Bias::Biased).unwrap();
/// assert!((biased.lag(1).unwrap() - 0.75).abs() < 1e-12);
///
/// let unbiased = estimate(&x, None, 2, Bias::Unbiased).unwrap();
/// assert!((unbiased.lag(1).unwrap() - 1.0).abs() < 1e-12);
/// ```
pub fn estimate(
    x: &[f64],
    y: Option<&[f64]>,
    max_lag: usize,
    bias: Bias,
) -> Result<CorrelationSequence, Error> {
    require_non_empty(x)?;
    let y = match y {
        Some(y) => {
            require_same_len(x, y)?;
            y
        }
        None => x,
    };
    if max_lag == 0 || max_lag >= x.len() {
        return Err(InvalidParameter::LagOutOfRange {
            max_lag,
            len: x.len(),
        }
        .into());
    }

    log::trace!(
        "correlation estimate: n={} max_lag={} bias={:?}",
        x.len(),
        max_lag,
        bias
    );
    Ok(correlate_window(x, y, max_lag, bias))
}

/// Auto-correlation of `x`, shorthand for `estimate(x, None, ..)`.
pub fn autocorr(x: &[f64], max_lag: usize, bias: Bias) -> Result<CorrelationSequence, Error> {
    estimate(x, None, max_lag, bias)
}

/// Correlation of `x` against `y`, shorthand for `estimate(x, Some(y), ..)`.
pub fn xcorr(
    x: &[f64],
    y: &[f64],
    max_lag: usize,
    bias: Bias,
) -> Result<CorrelationSequence, Error> {
    estimate(x, Some(y), max_lag, bias)
}
