use numpy::PyReadonlyArray1;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

mod filters;
mod xcorr;

use filters::LmsFilter;

/// Map a library error onto `ValueError`.
pub(crate) fn to_py_err(err: adaptfir::Error) -> PyErr {
    PyValueError::new_err(err.to_string())
}

/// Root mean square of a signal.
///
/// Args:
///     x (np.ndarray): Signal as 1D float64 array, at least one sample.
///
/// Returns:
///     float: sqrt(mean(x ** 2))
///
/// Example:
///     >>> import pyadaptfir as af
///     >>> af.rms(np.array([3.0, 4.0]))
///     3.5355339059327378
#[pyfunction]
fn rms(x: PyReadonlyArray1<f64>) -> PyResult<f64> {
    adaptfir::rms(x.as_slice()?).map_err(to_py_err)
}

/// Mean of the squared samples.
#[pyfunction]
fn mean_square(x: PyReadonlyArray1<f64>) -> PyResult<f64> {
    adaptfir::mean_square(x.as_slice()?).map_err(to_py_err)
}

/// pyadaptfir: Wiener and LMS/NLMS adaptive FIR filter estimation.
///
/// Invalid arguments raise `ValueError`; numerically degenerate input
/// (silent signals, singular correlation matrices) does not.
#[pymodule]
fn pyadaptfir(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(rms, m)?)?;
    m.add_function(wrap_pyfunction!(mean_square, m)?)?;
    xcorr::register(m)?;
    filters::register(m)?;
    m.add_class::<LmsFilter>()?;
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    Ok(())
}
