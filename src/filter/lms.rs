//! LMS and NLMS (Normalized Least Mean Squares) adaptive filtering.
//!
//! The LMS algorithm adaptively adjusts FIR coefficients to minimize the
//! error between a desired signal and the filter output. NLMS divides the
//! step by the instantaneous input energy, which makes convergence largely
//! independent of the input amplitude.
//!
//! # Algorithm
//!
//! ```text
//! u(n) = [x(n), x(n-1), ..., x(n-p)]        // tap vector, most recent first
//! y(n) = wᵀ(n-1) · u(n)                     // filter output
//! e(n) = d(n) - y(n)                        // error signal
//! w(n) = w(n-1) + μ · e(n) · u(n) / den     // weight update
//! ```
//!
//! with `den = 1` for LMS and `den = ||u(n)||² + ε` for NLMS.
//!
//! # Batch Run
//!
//! [`run`] processes a whole signal pair and records every weight vector:
//!
//! - Warm-up, `n < p`: the tap vector is zero padded, output and error use
//!   the initial weights, and no adaptation happens. The trajectory holds the
//!   initial weights for these indices, so the slot at `p - 1` is the seed.
//! - Steady loop, `p <= n < N`: one update per sample in increasing time
//!   order; the trajectory at n holds the weights after the update.
//!
//! `error[n] == desired[n] - output[n]` holds exactly for every n.
//!
//! # Step Size (μ) Selection
//!
//! - **LMS**: stable for 0 < μ < 2/λ_max, λ_max the largest eigenvalue of the
//!   input autocorrelation matrix. The bound is not computed or enforced; a
//!   too large μ shows up as diverging weights, not as an error.
//! - **NLMS**: μ ∈ (0, 2), typically 0.1 - 1.0.
//!
//! # Example: System Identification
//!
//! ```
//! use adaptfir::{fir_filter, run, LmsConfig};
//!
//! let x: Vec<f64> = (0..2000).map(|i| ((i * 7) % 17) as f64 / 17.0 - 0.5).collect();
//! let d = fir_filter(&[0.5, 1.0, 0.5], &x).unwrap();
//!
//! let config = LmsConfig::new(2, 0.5).normalized(true);
//! let result = run(&x, &d, &config).unwrap();
//!
//! assert!((result.weights[1] - 1.0).abs() < 0.05);
//! ```

use alloc::vec;
use alloc::vec::Vec;

use crate::error::{require_non_empty, require_same_len, Error, InvalidParameter};
use crate::linalg::Matrix;
use crate::toeplitz::DesignMatrix;

/// Default NLMS regularizer added to the input energy.
pub const DEFAULT_EPSILON: f64 = 1e-3;

/// Output from one adaptive filter step.
///
/// The error signal is what remains of the desired signal after the filter
/// output is removed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdaptiveOutput {
    /// Filtered output signal y(n) = wᵀ · u(n)
    pub output: f64,
    /// Error signal e(n) = d(n) - y(n)
    pub error: f64,
}

/// Denominator rule for the weight update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepRule {
    /// Plain LMS, denominator 1.
    Lms,
    /// NLMS, denominator `||u||² + epsilon`.
    Normalized { epsilon: f64 },
}

impl StepRule {
    #[inline]
    fn denominator(&self, taps: &[f64]) -> f64 {
        match *self {
            StepRule::Lms => 1.0,
            StepRule::Normalized { epsilon } => {
                taps.iter().map(|&u| u * u).sum::<f64>() + epsilon
            }
        }
    }
}

/// Performs one LMS/NLMS step in place.
///
/// Computes the output with the current `weights`, the error against
/// `desired`, then updates `weights` by `mu · e · taps / den`.
///
/// # Errors
///
/// [`InvalidParameter::WeightLengthMismatch`] if `weights` and `taps` differ
/// in length, [`InvalidParameter::NonPositiveStepSize`] for a non-positive
/// or non-finite `mu`. The weights are untouched on error.
///
/// # Example
///
/// ```
/// use adaptfir::{lms_update, StepRule};
///
/// let mut w = [0.0, 0.0];
/// let out = lms_update(&mut w, &[1.0, 1.0], 1.0, 0.1, StepRule::Lms).unwrap();
///
/// assert_eq!(out.output, 0.0);
/// assert_eq!(out.error, 1.0);
/// assert!((w[0] - 0.1).abs() < 1e-12);
/// ```
pub fn lms_update(
    weights: &mut [f64],
    taps: &[f64],
    desired: f64,
    mu: f64,
    rule: StepRule,
) -> Result<AdaptiveOutput, Error> {
    if weights.len() != taps.len() {
        return Err(InvalidParameter::WeightLengthMismatch {
            expected: taps.len(),
            actual: weights.len(),
        }
        .into());
    }
    if !(mu > 0.0 && mu.is_finite()) {
        return Err(InvalidParameter::NonPositiveStepSize.into());
    }
    Ok(adapt(weights, taps, desired, mu, rule))
}

/// Unchecked update shared by [`run`] and [`LmsFilter`], whose weight and
/// tap vectors always have the same length.
#[inline]
fn adapt(weights: &mut [f64], taps: &[f64], desired: f64, mu: f64, rule: StepRule) -> AdaptiveOutput {
    debug_assert_eq!(weights.len(), taps.len());

    let output = dot(weights, taps);
    let error = desired - output;

    let scale = mu * error / rule.denominator(taps);
    for (w, &u) in weights.iter_mut().zip(taps) {
        *w += scale * u;
    }

    AdaptiveOutput { output, error }
}

#[inline]
fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Parameters of an LMS/NLMS run.
///
/// # Example
///
/// ```
/// use adaptfir::LmsConfig;
///
/// let config = LmsConfig::new(4, 0.5)
///     .normalized(true)
///     .epsilon(1e-6)
///     .initial_weights(vec![1.0, 0.0, 0.0, 0.0, 0.0]);
///
/// assert_eq!(config.taps(), 5);
/// assert!(config.validate(100).is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LmsConfig {
    /// Filter order p; the filter has p + 1 taps
    pub order: usize,
    /// Step size μ, must be positive
    pub mu: f64,
    /// Use the NLMS denominator
    pub normalized: bool,
    /// NLMS regularizer ε, ignored for plain LMS
    pub epsilon: f64,
    /// Initial weights, zeros when absent
    pub initial_weights: Option<Vec<f64>>,
}

impl Default for LmsConfig {
    fn default() -> Self {
        Self {
            order: 0,
            mu: 0.01,
            normalized: false,
            epsilon: DEFAULT_EPSILON,
            initial_weights: None,
        }
    }
}

impl LmsConfig {
    /// Plain LMS of order `order` with step size `mu` and zero initial weights.
    pub fn new(order: usize, mu: f64) -> Self {
        Self {
            order,
            mu,
            ..Self::default()
        }
    }

    /// Selects the NLMS denominator.
    pub fn normalized(mut self, normalized: bool) -> Self {
        self.normalized = normalized;
        self
    }

    /// Sets the NLMS regularizer.
    pub fn epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Sets the initial weights (length `order + 1`).
    pub fn initial_weights(mut self, weights: Vec<f64>) -> Self {
        self.initial_weights = Some(weights);
        self
    }

    /// Number of taps, `order + 1`.
    pub fn taps(&self) -> usize {
        self.order + 1
    }

    /// Update rule selected by this configuration.
    pub fn step_rule(&self) -> StepRule {
        if self.normalized {
            StepRule::Normalized {
                epsilon: self.epsilon,
            }
        } else {
            StepRule::Lms
        }
    }

    /// Checks the configuration against a signal of length `len`.
    ///
    /// # Errors
    ///
    /// `order >= len`, non-positive or non-finite `mu`, negative or
    /// non-finite `epsilon`, or initial weights of the wrong length.
    pub fn validate(&self, len: usize) -> Result<(), Error> {
        if self.order >= len {
            return Err(InvalidParameter::OrderOutOfRange {
                order: self.order,
                len,
            }
            .into());
        }
        if !(self.mu > 0.0 && self.mu.is_finite()) {
            return Err(InvalidParameter::NonPositiveStepSize.into());
        }
        if !(self.epsilon >= 0.0 && self.epsilon.is_finite()) {
            return Err(InvalidParameter::InvalidRegularization.into());
        }
        if let Some(w0) = &self.initial_weights {
            if w0.len() != self.taps() {
                return Err(InvalidParameter::WeightLengthMismatch {
                    expected: self.taps(),
                    actual: w0.len(),
                }
                .into());
            }
        }
        Ok(())
    }

    fn start_weights(&self) -> Vec<f64> {
        match &self.initial_weights {
            Some(w0) => w0.clone(),
            None => vec![0.0; self.taps()],
        }
    }
}

/// Every weight vector of one run, indexed by time step.
///
/// Entry n holds the weights in effect after sample n. Append-only while the
/// run is in progress and owned by its [`LmsOutput`].
#[derive(Debug, Clone, PartialEq)]
pub struct WeightTrajectory {
    /// Row-major, one row of `taps` weights per time step
    data: Vec<f64>,
    taps: usize,
}

impl WeightTrajectory {
    fn with_capacity(taps: usize, steps: usize) -> Self {
        Self {
            data: Vec::with_capacity(taps * steps),
            taps,
        }
    }

    fn push(&mut self, weights: &[f64]) {
        debug_assert_eq!(weights.len(), self.taps);
        self.data.extend_from_slice(weights);
    }

    /// Number of recorded time steps.
    pub fn len(&self) -> usize {
        self.data.len() / self.taps
    }

    /// True when nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Weights per entry.
    pub fn taps(&self) -> usize {
        self.taps
    }

    /// Weights after sample `n`.
    pub fn get(&self, n: usize) -> Option<&[f64]> {
        if n >= self.len() {
            return None;
        }
        Some(&self.data[n * self.taps..(n + 1) * self.taps])
    }

    /// Last recorded weights.
    pub fn last(&self) -> Option<&[f64]> {
        self.len().checked_sub(1).and_then(|n| self.get(n))
    }

    /// Iterator over the recorded weight vectors in time order.
    pub fn iter(&self) -> impl Iterator<Item = &[f64]> {
        self.data.chunks_exact(self.taps)
    }

    /// Trajectory of tap `k` over time.
    pub fn tap(&self, k: usize) -> Vec<f64> {
        assert!(k < self.taps, "Tap index out of bounds");
        self.iter().map(|w| w[k]).collect()
    }

    /// Dense N×q copy, one row per time step.
    pub fn to_matrix(&self) -> Matrix {
        Matrix::from_row_major(self.len(), self.taps, self.data.clone())
    }
}

/// Result of [`run`].
#[derive(Debug, Clone, PartialEq)]
pub struct LmsOutput {
    /// Weight vector after every sample
    pub trajectory: WeightTrajectory,
    /// Filter output y, aligned with the input
    pub output: Vec<f64>,
    /// Error e = d - y, aligned with the input
    pub error: Vec<f64>,
    /// Final weights, equal to the last trajectory entry
    pub weights: Vec<f64>,
}

/// Runs LMS or NLMS over a whole signal pair.
///
/// # Arguments
///
/// * `x` - Input (reference) signal of length N
/// * `d` - Desired signal of length N
/// * `config` - Order, step size, normalization and initial weights
///
/// # Errors
///
/// [`InvalidParameter`] for an empty signal, `x`/`d` length mismatch, or any
/// [`LmsConfig::validate`] failure. Checked before any computation.
///
/// # Example
///
/// ```
/// use adaptfir::{run, LmsConfig};
///
/// let x = [1.0; 8];
/// let result = run(&x, &x, &LmsConfig::new(1, 0.1)).unwrap();
///
/// assert_eq!(result.trajectory.len(), 8);
/// assert!(result.error[7] < result.error[2]);
/// ```
pub fn run(x: &[f64], d: &[f64], config: &LmsConfig) -> Result<LmsOutput, Error> {
    require_non_empty(x)?;
    require_same_len(x, d)?;
    config.validate(x.len())?;

    let n_samples = x.len();
    let order = config.order;
    let rule = config.step_rule();
    let design = DesignMatrix::new(x, config.taps())?;

    let mut weights = config.start_weights();
    let mut trajectory = WeightTrajectory::with_capacity(config.taps(), n_samples);
    let mut output = vec![0.0; n_samples];
    let mut error = vec![0.0; n_samples];

    // Warm-up: partial history, initial weights, no adaptation
    for n in 0..order {
        output[n] = dot(&weights, design.column(n));
        error[n] = d[n] - output[n];
        trajectory.push(&weights);
    }

    for n in order..n_samples {
        let step = adapt(&mut weights, design.column(n), d[n], config.mu, rule);
        output[n] = step.output;
        error[n] = step.error;
        trajectory.push(&weights);
    }

    log::debug!(
        "lms run: n={} taps={} mu={} rule={:?} final |e|={:e}",
        n_samples,
        config.taps(),
        config.mu,
        rule,
        libm::fabs(error[n_samples - 1])
    );

    Ok(LmsOutput {
        trajectory,
        output,
        error,
        weights,
    })
}

/// [`run`] with the parameters spelled out.
///
/// `w0 == None` starts from zero weights.
///
/// # Example
///
/// ```
/// use adaptfir::lms;
///
/// let x = [1.0; 8];
/// let result = lms(&x, &x, 1, 0.1, false, Some(&[0.0, 0.0])).unwrap();
/// assert!((result.output[2] - 0.2).abs() < 1e-12);
/// ```
pub fn lms(
    x: &[f64],
    d: &[f64],
    order: usize,
    mu: f64,
    normalized: bool,
    w0: Option<&[f64]>,
) -> Result<LmsOutput, Error> {
    let mut config = LmsConfig::new(order, mu).normalized(normalized);
    if let Some(w0) = w0 {
        config = config.initial_weights(w0.to_vec());
    }
    run(x, d, &config)
}

/// Streaming LMS/NLMS filter.
///
/// Adapts coefficients one sample at a time. The delay line starts zeroed,
/// newest sample at index 0, which is the same zero-padded history the batch
/// [`run`] uses.
///
/// # Example
///
/// ```
/// use adaptfir::LmsFilter;
///
/// let mut lms = LmsFilter::new(32, 0.01).unwrap();
///
/// let result = lms.process_sample(0.5, 1.0);
/// assert!(result.error.abs() > 0.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LmsFilter {
    /// Adaptive filter coefficients (weights)
    weights: Vec<f64>,
    /// Past inputs, newest first
    delay_line: Vec<f64>,
    /// Step size (learning rate), controls adaptation speed vs stability
    mu: f64,
    rule: StepRule,
}

impl LmsFilter {
    /// Creates a plain LMS filter with `taps` zero-initialized weights.
    ///
    /// # Errors
    ///
    /// `taps == 0` or a non-positive `mu`.
    pub fn new(taps: usize, mu: f64) -> Result<Self, Error> {
        Self::with_weights(mu, vec![0.0; taps])
    }

    /// Creates an NLMS filter with `taps` zero-initialized weights.
    ///
    /// # Errors
    ///
    /// `taps == 0`, a non-positive `mu` or a negative `epsilon`.
    pub fn normalized(taps: usize, mu: f64, epsilon: f64) -> Result<Self, Error> {
        if !(epsilon >= 0.0 && epsilon.is_finite()) {
            return Err(InvalidParameter::InvalidRegularization.into());
        }
        let mut filter = Self::new(taps, mu)?;
        filter.rule = StepRule::Normalized { epsilon };
        Ok(filter)
    }

    /// Creates a plain LMS filter starting from `weights`.
    ///
    /// Useful for resuming adaptation from a previously solved filter, e.g.
    /// a Wiener solution.
    ///
    /// # Errors
    ///
    /// Empty `weights` or a non-positive `mu`.
    pub fn with_weights(mu: f64, weights: Vec<f64>) -> Result<Self, Error> {
        if weights.is_empty() {
            return Err(InvalidParameter::ZeroTaps.into());
        }
        if !(mu > 0.0 && mu.is_finite()) {
            return Err(InvalidParameter::NonPositiveStepSize.into());
        }
        let taps = weights.len();
        Ok(Self {
            weights,
            delay_line: vec![0.0; taps],
            mu,
            rule: StepRule::Lms,
        })
    }

    /// Creates a filter from a batch configuration.
    ///
    /// The order bound of [`LmsConfig::validate`] does not apply to an
    /// unbounded stream; every other check does.
    pub fn from_config(config: &LmsConfig) -> Result<Self, Error> {
        config.validate(usize::MAX)?;
        let mut filter = Self::with_weights(config.mu, config.start_weights())?;
        filter.rule = config.step_rule();
        Ok(filter)
    }

    #[inline]
    fn push_input(&mut self, input: f64) {
        self.delay_line.rotate_right(1);
        self.delay_line[0] = input;
    }

    /// Processes a single sample through the adaptive filter.
    ///
    /// Shifts `input` into the delay line, computes the output and error
    /// against `desired`, then updates the weights.
    pub fn process_sample(&mut self, input: f64, desired: f64) -> AdaptiveOutput {
        self.push_input(input);
        adapt(
            &mut self.weights,
            &self.delay_line,
            desired,
            self.mu,
            self.rule,
        )
    }

    /// Processes a block of samples.
    ///
    /// # Errors
    ///
    /// [`InvalidParameter::LengthMismatch`] unless all three slices have the
    /// same length. Nothing is processed in that case.
    pub fn process_block(
        &mut self,
        inputs: &[f64],
        desired: &[f64],
        outputs: &mut [AdaptiveOutput],
    ) -> Result<(), Error> {
        require_same_len(inputs, desired)?;
        if outputs.len() != inputs.len() {
            return Err(InvalidParameter::LengthMismatch {
                expected: inputs.len(),
                actual: outputs.len(),
            }
            .into());
        }
        for ((out, &x), &d) in outputs.iter_mut().zip(inputs).zip(desired) {
            *out = self.process_sample(x, d);
        }
        Ok(())
    }

    /// Filter output for `input` without adapting the weights.
    ///
    /// The input still enters the delay line.
    pub fn predict(&mut self, input: f64) -> f64 {
        self.push_input(input);
        dot(&self.weights, &self.delay_line)
    }

    /// Clears the input history, keeping the learned weights.
    pub fn reset(&mut self) {
        self.delay_line.fill(0.0);
    }

    /// Resets the adaptive weights to zero, keeping the input history.
    pub fn reset_weights(&mut self) {
        self.weights.fill(0.0);
    }

    /// Current filter weights.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Replaces the weights.
    ///
    /// # Errors
    ///
    /// [`InvalidParameter::WeightLengthMismatch`] if the tap count differs.
    pub fn set_weights(&mut self, weights: &[f64]) -> Result<(), Error> {
        if weights.len() != self.weights.len() {
            return Err(InvalidParameter::WeightLengthMismatch {
                expected: self.weights.len(),
                actual: weights.len(),
            }
            .into());
        }
        self.weights.copy_from_slice(weights);
        Ok(())
    }

    /// Current step size.
    pub fn mu(&self) -> f64 {
        self.mu
    }

    /// Sets the step size.
    ///
    /// # Errors
    ///
    /// [`InvalidParameter::NonPositiveStepSize`] for a non-positive `mu`.
    pub fn set_mu(&mut self, mu: f64) -> Result<(), Error> {
        if !(mu > 0.0 && mu.is_finite()) {
            return Err(InvalidParameter::NonPositiveStepSize.into());
        }
        self.mu = mu;
        Ok(())
    }

    /// Update rule in use.
    pub fn step_rule(&self) -> StepRule {
        self.rule
    }
}
