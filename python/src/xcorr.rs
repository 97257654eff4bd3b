//! Python bindings for correlation estimation.
//!
//! Values are returned for lags `-max_lag..=max_lag`; index `max_lag` of the
//! result is lag 0.

use numpy::{PyArray1, PyReadonlyArray1};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use adaptfir::Bias;

use crate::to_py_err;

/// Convert Python bias string to Rust enum.
fn parse_bias(bias: &str) -> PyResult<Bias> {
    match bias.to_lowercase().as_str() {
        "biased" => Ok(Bias::Biased),
        "unbiased" => Ok(Bias::Unbiased),
        _ => Err(PyValueError::new_err(format!(
            "Unknown bias '{}'. Use: 'biased' or 'unbiased'",
            bias
        ))),
    }
}

/// Estimate the auto- or cross-correlation sequence.
///
/// Args:
///     x (np.ndarray): Signal as 1D float64 array (length N).
///     y (np.ndarray | None): Second signal of length N, or None for the
///         autocorrelation of x.
///     max_lag (int): Largest lag, 0 < max_lag < N.
///     bias (str): 'biased' divides by N, 'unbiased' by N - |lag|.
///
/// Returns:
///     np.ndarray: 2 * max_lag + 1 values; lag k at index max_lag + k is
///         sum(x[n + k] * y[n]) scaled.
///
/// Example:
///     >>> r = af.estimate(x, None, 10)
///     >>> r[10]  # lag 0, equals mean(x ** 2)
#[pyfunction]
#[pyo3(signature = (x, y, max_lag, bias="biased"))]
fn estimate<'py>(
    py: Python<'py>,
    x: PyReadonlyArray1<f64>,
    y: Option<PyReadonlyArray1<f64>>,
    max_lag: usize,
    bias: &str,
) -> PyResult<Bound<'py, PyArray1<f64>>> {
    let bias = parse_bias(bias)?;
    let y_slice = match &y {
        Some(y) => Some(y.as_slice()?),
        None => None,
    };
    let seq = adaptfir::estimate(x.as_slice()?, y_slice, max_lag, bias).map_err(to_py_err)?;
    Ok(PyArray1::from_vec(py, seq.into_vec()))
}

/// Autocorrelation of x for lags -max_lag..=max_lag.
#[pyfunction]
#[pyo3(signature = (x, max_lag, bias="biased"))]
fn autocorr<'py>(
    py: Python<'py>,
    x: PyReadonlyArray1<f64>,
    max_lag: usize,
    bias: &str,
) -> PyResult<Bound<'py, PyArray1<f64>>> {
    let bias = parse_bias(bias)?;
    let seq = adaptfir::autocorr(x.as_slice()?, max_lag, bias).map_err(to_py_err)?;
    Ok(PyArray1::from_vec(py, seq.into_vec()))
}

/// Full linear correlation, same convention as numpy.correlate(x, y, 'full').
#[pyfunction]
fn correlate_full<'py>(
    py: Python<'py>,
    x: PyReadonlyArray1<f64>,
    y: PyReadonlyArray1<f64>,
) -> PyResult<Bound<'py, PyArray1<f64>>> {
    let c = adaptfir::correlate_full(x.as_slice()?, y.as_slice()?).map_err(to_py_err)?;
    Ok(PyArray1::from_vec(py, c))
}

pub(crate) fn register(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(estimate, m)?)?;
    m.add_function(wrap_pyfunction!(autocorr, m)?)?;
    m.add_function(wrap_pyfunction!(correlate_full, m)?)?;
    Ok(())
}
