//! Python bindings for Wiener and LMS/NLMS filter estimation.

use numpy::{PyArray1, PyArray2, PyArrayMethods, PyReadonlyArray1};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyDict;

use adaptfir::{LmsConfig, LmsFilter as AfLmsFilter, DEFAULT_EPSILON};

use crate::to_py_err;

/// Wiener filter weights from the normal equations.
///
/// Args:
///     x (np.ndarray): Input signal as 1D float64 array (length N).
///     d (np.ndarray): Desired signal, same length as x.
///     order (int): Filter order p < N; returns p + 1 weights.
///
/// Returns:
///     np.ndarray: Minimum-norm least-squares solution of Rx w = rdx.
///
/// Example:
///     >>> w = af.solve_wiener(x, d, 4)
#[pyfunction]
fn solve_wiener<'py>(
    py: Python<'py>,
    x: PyReadonlyArray1<f64>,
    d: PyReadonlyArray1<f64>,
    order: usize,
) -> PyResult<Bound<'py, PyArray1<f64>>> {
    let w = adaptfir::solve_wiener(x.as_slice()?, d.as_slice()?, order).map_err(to_py_err)?;
    Ok(PyArray1::from_vec(py, w))
}

/// Run LMS or NLMS over a whole signal pair.
///
/// Args:
///     x (np.ndarray): Input signal as 1D float64 array (length N).
///     d (np.ndarray): Desired signal, same length as x.
///     order (int): Filter order p < N.
///     mu (float): Step size, must be positive.
///     normalized (bool): Use NLMS (default False).
///     w0 (np.ndarray | None): Initial weights of length p + 1, zeros if None.
///     epsilon (float): NLMS regularizer (default 1e-3).
///
/// Returns:
///     dict: 'weights' (p + 1,), 'output' (N,), 'error' (N,) and
///         'trajectory' (N, p + 1) with the weights after every sample.
///
/// Example:
///     >>> res = af.lms(x, d, 4, 0.5, normalized=True)
///     >>> res['trajectory'][-1] == res['weights']
#[pyfunction]
#[pyo3(signature = (x, d, order, mu, normalized=false, w0=None, epsilon=DEFAULT_EPSILON))]
#[allow(clippy::too_many_arguments)]
fn lms<'py>(
    py: Python<'py>,
    x: PyReadonlyArray1<f64>,
    d: PyReadonlyArray1<f64>,
    order: usize,
    mu: f64,
    normalized: bool,
    w0: Option<PyReadonlyArray1<f64>>,
    epsilon: f64,
) -> PyResult<Bound<'py, PyDict>> {
    let mut config = LmsConfig::new(order, mu)
        .normalized(normalized)
        .epsilon(epsilon);
    if let Some(w0) = &w0 {
        config = config.initial_weights(w0.as_slice()?.to_vec());
    }

    let result = adaptfir::run(x.as_slice()?, d.as_slice()?, &config).map_err(to_py_err)?;

    let steps = result.trajectory.len();
    let taps = result.trajectory.taps();
    let flat: Vec<f64> = result.trajectory.iter().flatten().copied().collect();
    let trajectory: Bound<'py, PyArray2<f64>> = PyArray1::from_vec(py, flat).reshape([steps, taps])?;

    let dict = PyDict::new(py);
    dict.set_item("weights", PyArray1::from_vec(py, result.weights))?;
    dict.set_item("output", PyArray1::from_vec(py, result.output))?;
    dict.set_item("error", PyArray1::from_vec(py, result.error))?;
    dict.set_item("trajectory", trajectory)?;
    Ok(dict)
}

/// Filter x with FIR weights from zero initial state.
#[pyfunction]
fn fir_filter<'py>(
    py: Python<'py>,
    weights: PyReadonlyArray1<f64>,
    x: PyReadonlyArray1<f64>,
) -> PyResult<Bound<'py, PyArray1<f64>>> {
    let y = adaptfir::fir_filter(weights.as_slice()?, x.as_slice()?).map_err(to_py_err)?;
    Ok(PyArray1::from_vec(py, y))
}

pub(crate) fn register(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(solve_wiener, m)?)?;
    m.add_function(wrap_pyfunction!(lms, m)?)?;
    m.add_function(wrap_pyfunction!(fir_filter, m)?)?;
    Ok(())
}

/// Streaming LMS/NLMS adaptive filter.
///
/// Adapts filter coefficients one sample at a time to minimize the mean
/// square error between the desired signal and the filter output.
///
/// # Example
/// ```python
/// import pyadaptfir as af
/// import numpy as np
///
/// lms = af.LmsFilter(taps=32, mu=0.01)
///
/// reference = np.random.randn(1000)
/// desired = np.random.randn(1000)
/// output, error = lms.process(reference, desired)
/// ```
#[pyclass]
pub struct LmsFilter {
    filter: AfLmsFilter,
}

#[pymethods]
impl LmsFilter {
    /// Create a new adaptive filter.
    ///
    /// Args:
    ///     taps (int): Number of filter taps. Must be >= 1.
    ///     mu (float): Step size. Typically 0.001 - 0.1 for LMS, 0.1 - 1.0 for NLMS.
    ///     normalized (bool): Use NLMS (default False).
    ///     epsilon (float): NLMS regularizer (default 1e-3).
    #[new]
    #[pyo3(signature = (taps, mu, normalized=false, epsilon=DEFAULT_EPSILON))]
    fn new(taps: usize, mu: f64, normalized: bool, epsilon: f64) -> PyResult<Self> {
        let filter = if normalized {
            AfLmsFilter::normalized(taps, mu, epsilon)
        } else {
            AfLmsFilter::new(taps, mu)
        }
        .map_err(to_py_err)?;
        Ok(Self { filter })
    }

    /// Process reference and desired signals through the adaptive filter.
    ///
    /// Args:
    ///     input (np.ndarray): Reference signal as 1D float64 array.
    ///     desired (np.ndarray): Desired signal, same length as input.
    ///
    /// Returns:
    ///     tuple[np.ndarray, np.ndarray]: (output, error) arrays.
    fn process<'py>(
        &mut self,
        py: Python<'py>,
        input: PyReadonlyArray1<f64>,
        desired: PyReadonlyArray1<f64>,
    ) -> PyResult<(Bound<'py, PyArray1<f64>>, Bound<'py, PyArray1<f64>>)> {
        let input_slice = input.as_slice()?;
        let desired_slice = desired.as_slice()?;
        if input_slice.len() != desired_slice.len() {
            return Err(PyValueError::new_err(format!(
                "input and desired must be equal length, got {} and {}",
                input_slice.len(),
                desired_slice.len()
            )));
        }

        let mut output = Vec::with_capacity(input_slice.len());
        let mut error = Vec::with_capacity(input_slice.len());
        for (&x, &d) in input_slice.iter().zip(desired_slice) {
            let step = self.filter.process_sample(x, d);
            output.push(step.output);
            error.push(step.error);
        }

        Ok((PyArray1::from_vec(py, output), PyArray1::from_vec(py, error)))
    }

    /// Filter output for each input sample without adapting.
    fn predict<'py>(
        &mut self,
        py: Python<'py>,
        input: PyReadonlyArray1<f64>,
    ) -> PyResult<Bound<'py, PyArray1<f64>>> {
        let output: Vec<f64> = input
            .as_slice()?
            .iter()
            .map(|&x| self.filter.predict(x))
            .collect();
        Ok(PyArray1::from_vec(py, output))
    }

    /// Reset the filter state (delay line and weights).
    fn reset(&mut self) {
        self.filter.reset();
        self.filter.reset_weights();
    }

    /// Current filter weights.
    #[getter]
    fn weights<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        PyArray1::from_vec(py, self.filter.weights().to_vec())
    }

    #[setter]
    fn set_weights(&mut self, weights: PyReadonlyArray1<f64>) -> PyResult<()> {
        self.filter
            .set_weights(weights.as_slice()?)
            .map_err(to_py_err)
    }

    /// Step size.
    #[getter]
    fn mu(&self) -> f64 {
        self.filter.mu()
    }

    #[setter]
    fn set_mu(&mut self, mu: f64) -> PyResult<()> {
        self.filter.set_mu(mu).map_err(to_py_err)
    }

    /// Number of taps.
    #[getter]
    fn taps(&self) -> usize {
        self.filter.weights().len()
    }

    fn __repr__(&self) -> String {
        format!(
            "LmsFilter(taps={}, mu={}, rule={:?})",
            self.filter.weights().len(),
            self.filter.mu(),
            self.filter.step_rule()
        )
    }
}
