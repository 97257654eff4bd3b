use alloc::vec;
use alloc::vec::Vec;

use crate::error::{require_non_empty, Error, InvalidParameter};

/// FIR (Finite Impulse Response) filter with runtime tap count.
///
/// Implements direct-form FIR filtering using a circular buffer for state
/// storage. Used to apply weights produced by the Wiener or LMS solvers.
///
/// # Memory Layout
/// - `coeffs`: Filter tap weights [b0, b1, ..., b_{q-1}]
/// - `delay_line`: Circular buffer storing past q input samples
///
/// # Example
/// ```
/// # use adaptfir::FirFilter;
/// // 5-tap moving average filter
/// let mut filter = FirFilter::new(vec![0.2; 5]).unwrap();
///
/// let output = filter.process_sample(1.0);
/// assert!((output - 0.2).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FirFilter {
    coeffs: Vec<f64>,
    delay_line: Vec<f64>,
    index: usize,
}

impl FirFilter {
    /// Creates a new FIR filter with given tap coefficients.
    ///
    /// # Errors
    ///
    /// [`InvalidParameter::ZeroTaps`] for an empty coefficient vector.
    pub fn new(coeffs: Vec<f64>) -> Result<Self, Error> {
        if coeffs.is_empty() {
            return Err(InvalidParameter::ZeroTaps.into());
        }
        let taps = coeffs.len();
        Ok(Self {
            coeffs,
            delay_line: vec![0.0; taps],
            index: 0,
        })
    }

    /// Number of taps.
    pub fn taps(&self) -> usize {
        self.coeffs.len()
    }

    /// Processes a single sample through the FIR filter.
    ///
    /// Implements: `y[n] = sum(b[k] * x[n-k])` for k = 0 to q-1
    #[inline]
    pub fn process_sample(&mut self, input: f64) -> f64 {
        let taps = self.coeffs.len();
        self.delay_line[self.index] = input;

        let mut output = 0.0;
        let mut delay_idx = self.index;

        for &coeff in &self.coeffs {
            output += coeff * self.delay_line[delay_idx];
            // Move backward through delay line (with wrap-around)
            delay_idx = if delay_idx == 0 { taps - 1 } else { delay_idx - 1 };
        }

        self.index = (self.index + 1) % taps;

        output
    }

    /// Processes multiple samples in place.
    pub fn process_block(&mut self, samples: &mut [f64]) {
        for sample in samples.iter_mut() {
            *sample = self.process_sample(*sample);
        }
    }

    /// Resets filter state (clears delay line).
    pub fn reset(&mut self) {
        self.delay_line.fill(0.0);
        self.index = 0;
    }

    /// Returns the filter coefficients.
    pub fn coefficients(&self) -> &[f64] {
        &self.coeffs
    }

    /// Replaces the filter coefficients. The delay line is kept when the tap
    /// count is unchanged and cleared otherwise.
    ///
    /// # Errors
    ///
    /// [`InvalidParameter::ZeroTaps`] for an empty coefficient vector.
    pub fn set_coefficients(&mut self, coeffs: Vec<f64>) -> Result<(), Error> {
        if coeffs.is_empty() {
            return Err(InvalidParameter::ZeroTaps.into());
        }
        if coeffs.len() != self.coeffs.len() {
            self.delay_line = vec![0.0; coeffs.len()];
            self.index = 0;
        }
        self.coeffs = coeffs;
        Ok(())
    }
}

/// Filters a whole signal with zero initial state.
///
/// Output has the length of `x`: `y[n] = Σ_k w[k] · x[n - k]`, with samples
/// before the start of `x` taken as zero.
///
/// # Errors
///
/// Empty `weights` or empty `x`.
///
/// # Example
///
/// ```
/// use adaptfir::fir_filter;
///
/// // Two-sample delay
/// let y = fir_filter(&[0.0, 0.0, 1.0], &[1.0, 2.0, 3.0, 4.0]).unwrap();
/// assert_eq!(y, vec![0.0, 0.0, 1.0, 2.0]);
/// ```
pub fn fir_filter(weights: &[f64], x: &[f64]) -> Result<Vec<f64>, Error> {
    require_non_empty(x)?;
    let mut filter = FirFilter::new(weights.to_vec())?;
    Ok(x.iter().map(|&sample| filter.process_sample(sample)).collect())
}
