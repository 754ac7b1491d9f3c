//! Glue between loosely typed front-end arguments and the core option types.
//!
//! The builders here take the flat keyword arguments of the Python API
//! (timeouts in seconds, option names as strings) and return validated
//! [`SamplerConfig`] / [`EstimatorOptions`]. With `python-bindings` the module
//! also provides array extraction and [`PyCallbackSource`], the adapter that
//! turns a Python callable into a [`crate::sampling::SampleSource`].
use crate::{
    estimation::{aggregate::EssFormula, interval::IntervalKind, options::EstimatorOptions},
    sampling::{
        errors::{ConfigError, ConfigResult},
        options::{Budget, SamplerConfig, Targets},
    },
};
use std::{str::FromStr, time::Duration};

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use numpy::{
    IntoPyArray,    // Vec → PyArray
    PyArrayMethods, // .readonly()
    PyReadonlyArray1,
};

/// Timeout of the Python `sample_to_target` when the caller does not pass one.
pub const DEFAULT_TIMEOUT_SECS: f64 = 30.0;

/// Convert a timeout in seconds; `None` means no timeout.
///
/// # Errors
/// [`ConfigError::InvalidTimeout`] for negative, NaN or overflowing values.
pub fn parse_timeout(secs: Option<f64>) -> ConfigResult<Option<Duration>> {
    secs.map(|s| {
        Duration::try_from_secs_f64(s).map_err(|_| ConfigError::InvalidTimeout {
            secs: s,
            reason: "must be a finite, non-negative number of seconds.",
        })
    })
    .transpose()
}

/// Estimator options from flat arguments; `None` keeps the default.
pub fn build_estimator_options(
    tau: Option<f64>, ci: Option<f64>, max_lag_fraction: Option<f64>,
    truncation_constant: Option<f64>, ess_formula: Option<&str>, interval: Option<&str>,
) -> ConfigResult<EstimatorOptions> {
    let defaults = EstimatorOptions::default();
    let opts = EstimatorOptions {
        confidence: ci.unwrap_or(defaults.confidence),
        max_lag_fraction: max_lag_fraction.unwrap_or(defaults.max_lag_fraction),
        truncation_constant: truncation_constant.unwrap_or(defaults.truncation_constant),
        ess_formula: ess_formula.map(EssFormula::from_str).transpose()?.unwrap_or_default(),
        interval: interval.map(IntervalKind::from_str).transpose()?.unwrap_or_default(),
        known_tau: tau,
        ..defaults
    };
    opts.validate()?;
    Ok(opts)
}

/// Full sampler configuration from the keyword arguments of
/// `sample_to_target`.
#[allow(clippy::too_many_arguments)]
pub fn build_sampler_config(
    target_error: Option<f64>, target_eff_sample_size: Option<f64>, timeout_secs: Option<f64>,
    initial_sample_size: Option<usize>, max_total_samples: Option<usize>,
    max_iterations: Option<usize>, estimator: EstimatorOptions,
) -> ConfigResult<SamplerConfig> {
    let targets = Targets {
        margin: target_error,
        ess: target_eff_sample_size,
        timeout: parse_timeout(timeout_secs)?,
    };
    let budget = Budget {
        initial_batch_size: initial_sample_size.unwrap_or(Budget::default().initial_batch_size),
        max_total_samples,
        max_iterations,
    };
    SamplerConfig::new(targets, estimator, budget)
}

#[cfg(feature = "python-bindings")]
#[inline]
pub fn extract_f64_array<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArray1<'py, f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray1<f64>>() {
        if arr_ro.as_slice().is_ok() {
            return Ok(arr_ro);
        }
    }

    let vec: Vec<f64> = raw_data.extract().map_err(|_| {
        pyo3::exceptions::PyTypeError::new_err(
            "expected a 1-D numpy.ndarray or sequence of float64",
        )
    })?;
    Ok(vec.into_pyarray(py).readonly())
}

/// Copy a Python array-like into an owned `Vec<f64>`.
#[cfg(feature = "python-bindings")]
pub fn extract_f64_vec<'py>(py: Python<'py>, raw_data: &Bound<'py, PyAny>) -> PyResult<Vec<f64>> {
    let arr = extract_f64_array(py, raw_data)?;
    Ok(arr.as_array().to_vec())
}

/// A Python callable `f(n) -> array-like of n floats` used as a sample source.
#[cfg(feature = "python-bindings")]
pub struct PyCallbackSource {
    callback: Py<PyAny>,
}

#[cfg(feature = "python-bindings")]
impl PyCallbackSource {
    pub fn new(callback: &Bound<'_, PyAny>) -> PyResult<Self> {
        if !callback.is_callable() {
            return Err(pyo3::exceptions::PyTypeError::new_err("callback must be callable"));
        }
        Ok(PyCallbackSource { callback: callback.clone().unbind() })
    }
}

#[cfg(feature = "python-bindings")]
impl crate::sampling::source::SampleSource for PyCallbackSource {
    fn sample(&mut self, n: usize) -> anyhow::Result<Vec<f64>> {
        Python::with_gil(|py| {
            let out = self.callback.bind(py).call1((n,))?;
            Ok(extract_f64_vec(py, &out)?)
        })
    }
}
