//! Optimal and adaptive FIR filter estimation for real-valued signals.
//!
//! Given an input (reference) signal `x` and a desired signal `d` of equal
//! length, the crate finds FIR weights `w` such that `w * x` approximates `d`:
//!
//! - [`solve_wiener`]: closed-form Wiener solution of the normal equations
//!   built from biased correlation estimates.
//! - [`run`] / [`lms`]: LMS or NLMS adaptation over the whole signal,
//!   recording the weight vector after every sample.
//! - [`LmsFilter`]: the same update as a streaming filter.
//!
//! Supporting pieces are public as well: correlation estimation
//! ([`estimate`]), Toeplitz and design matrices ([`toeplitz`],
//! [`DesignMatrix`]), FIR application ([`fir_filter`]), [`rms`], and a small
//! dense [`linalg`] module with a minimum-norm least-squares solver.
//!
//! All operations validate their inputs up front and return
//! [`Error::InvalidParameter`]; numerical degeneracy is never an error.
//!
//! # Example
//!
//! ```
//! use adaptfir::{fir_filter, lms, solve_wiener};
//!
//! let x: Vec<f64> = (0..3000).map(|i| ((i * 37) % 101) as f64 / 101.0 - 0.5).collect();
//! let d = fir_filter(&[0.8, -0.4], &x).unwrap();
//!
//! let wiener = solve_wiener(&x, &d, 1).unwrap();
//! let adaptive = lms(&x, &d, 1, 0.5, true, None).unwrap();
//!
//! for k in 0..2 {
//!     assert!((wiener[k] - adaptive.weights[k]).abs() < 0.01);
//! }
//! ```

#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

mod error;
pub mod filter;
pub mod linalg;
mod rms;
mod toeplitz;
mod wiener;
mod xcorr;

pub use error::{Error, InvalidParameter};
pub use filter::{
    fir_filter, lms, lms_update, run, AdaptiveOutput, FirFilter, LmsConfig, LmsFilter, LmsOutput,
    StepRule, WeightTrajectory, DEFAULT_EPSILON,
};
pub use rms::{mean_square, rms};
pub use toeplitz::{toeplitz, DesignMatrix};
pub use wiener::{solve_wiener, WienerFilter};
pub use xcorr::{autocorr, correlate_full, estimate, xcorr, Bias, CorrelationSequence};
