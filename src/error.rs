//! Error types shared by every public operation.
//!
//! There is exactly one error kind, [`Error::InvalidParameter`]. It is raised
//! at the boundary of each operation, before any computation, and names the
//! precondition that was violated. Numerical degeneracy (a singular
//! correlation matrix, a diverging adaptive filter) is never reported as an
//! error.

use core::fmt;

/// Precondition violated by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidParameter {
    /// A signal (or weight vector) with no samples was supplied.
    EmptySignal,

    /// Two signals that must be index-aligned have different lengths.
    LengthMismatch { expected: usize, actual: usize },

    /// Correlation lag outside `1..len`.
    LagOutOfRange { max_lag: usize, len: usize },

    /// Filter order `p` not below the signal length.
    OrderOutOfRange { order: usize, len: usize },

    /// Step size was zero, negative or not finite.
    NonPositiveStepSize,

    /// NLMS regularizer was negative or not finite.
    InvalidRegularization,

    /// Initial weight vector does not have `order + 1` entries.
    WeightLengthMismatch { expected: usize, actual: usize },

    /// Correlation sequence is too short for the requested Toeplitz order.
    TooFewLags { required: usize, available: usize },

    /// A filter needs at least one tap.
    ZeroTaps,
}

/// Errors returned by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The inputs do not satisfy the operation's preconditions.
    InvalidParameter(InvalidParameter),
}

impl From<InvalidParameter> for Error {
    fn from(reason: InvalidParameter) -> Self {
        Error::InvalidParameter(reason)
    }
}

impl fmt::Display for InvalidParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            InvalidParameter::EmptySignal => write!(f, "signal must contain at least one sample"),
            InvalidParameter::LengthMismatch { expected, actual } => write!(
                f,
                "signals must be equal length: expected {}, got {}",
                expected, actual
            ),
            InvalidParameter::LagOutOfRange { max_lag, len } => write!(
                f,
                "max lag must satisfy 0 < max_lag < {}, got {}",
                len, max_lag
            ),
            InvalidParameter::OrderOutOfRange { order, len } => write!(
                f,
                "filter order must be below the signal length {}, got {}",
                len, order
            ),
            InvalidParameter::NonPositiveStepSize => {
                write!(f, "step size mu must be positive and finite")
            }
            InvalidParameter::InvalidRegularization => {
                write!(f, "regularization epsilon must be non-negative and finite")
            }
            InvalidParameter::WeightLengthMismatch { expected, actual } => write!(
                f,
                "initial weights must have {} taps, got {}",
                expected, actual
            ),
            InvalidParameter::TooFewLags {
                required,
                available,
            } => write!(
                f,
                "correlation sequence needs {} non-negative lags, got {}",
                required, available
            ),
            InvalidParameter::ZeroTaps => write!(f, "filter must have at least one tap"),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidParameter(reason) => write!(f, "invalid parameter: {}", reason),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for InvalidParameter {}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Fails with [`InvalidParameter::EmptySignal`] for an empty slice.
pub(crate) fn require_non_empty(x: &[f64]) -> Result<(), Error> {
    if x.is_empty() {
        return Err(InvalidParameter::EmptySignal.into());
    }
    Ok(())
}

/// Fails with [`InvalidParameter::LengthMismatch`] unless both slices align.
pub(crate) fn require_same_len(x: &[f64], y: &[f64]) -> Result<(), Error> {
    if x.len() != y.len() {
        return Err(InvalidParameter::LengthMismatch {
            expected: x.len(),
            actual: y.len(),
        }
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    extern crate alloc;
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn test_from_reason() {
        let err: Error = InvalidParameter::NonPositiveStepSize.into();
        assert_eq!(
            err,
            Error::InvalidParameter(InvalidParameter::NonPositiveStepSize)
        );
    }

    #[test]
    fn test_display_names_values() {
        let err: Error = InvalidParameter::OrderOutOfRange { order: 8, len: 8 }.into();
        let msg = err.to_string();
        assert!(msg.starts_with("invalid parameter"));
        assert!(msg.contains('8'));
    }

    #[test]
    fn test_require_helpers() {
        assert!(require_non_empty(&[1.0]).is_ok());
        assert_eq!(
            require_non_empty(&[]),
            Err(Error::InvalidParameter(InvalidParameter::EmptySignal))
        );
        assert_eq!(
            require_same_len(&[1.0, 2.0], &[1.0]),
            Err(Error::InvalidParameter(InvalidParameter::LengthMismatch {
                expected: 2,
                actual: 1
            }))
        );
    }
}
