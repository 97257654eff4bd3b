//! Signal power statistics.
//!
//! Used to normalize signals before filtering and to report residual power
//! (mean square error) of a solved filter.

use crate::error::{require_non_empty, Error};

/// Mean of the squared samples, `sum(x²) / N`.
///
/// # Errors
///
/// Returns [`InvalidParameter::EmptySignal`](crate::InvalidParameter::EmptySignal)
/// for an empty signal.
///
/// # Example
///
/// ```
/// use adaptfir::mean_square;
///
/// let p = mean_square(&[3.0, 4.0]).unwrap();
/// assert!((p - 12.5).abs() < 1e-12);
/// ```
pub fn mean_square(x: &[f64]) -> Result<f64, Error> {
    require_non_empty(x)?;
    let sum_squared: f64 = x.iter().map(|&v| v * v).sum();
    Ok(sum_squared / x.len() as f64)
}

/// Root mean square of a signal, `sqrt(mean(x²))`.
///
/// # Errors
///
/// Returns [`InvalidParameter::EmptySignal`](crate::InvalidParameter::EmptySignal)
/// for an empty signal.
///
/// # Example
///
/// ```
/// use adaptfir::rms;
///
/// // Alternating ±1 has unit RMS
/// let r = rms(&[1.0, -1.0, 1.0, -1.0]).unwrap();
/// assert!((r - 1.0).abs() < 1e-12);
/// ```
pub fn rms(x: &[f64]) -> Result<f64, Error> {
    Ok(libm::sqrt(mean_square(x)?))
}
