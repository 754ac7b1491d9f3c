//! sample_to_target — autocorrelation-aware mean estimation and adaptive
//! sampling, with Python bindings.
//!
//! Purpose
//! -------
//! Estimate the mean of a scalar observable drawn from a stationary but
//! autocorrelated process (molecular dynamics, MCMC output) together with its
//! margin of error and effective sample size, and drive a sampling loop that
//! grows the sample until a precision, sample-size or time target is met.
//!
//! Key behaviors
//! -------------
//! - [`autocorrelation`]: empirical ACF and integrated autocorrelation time
//!   with a self-consistent truncation window.
//! - [`estimation`]: effective sample size, standard error, margin of error,
//!   and downsampling.
//! - [`sampling`]: targets, budgets and the doubling state machine that calls
//!   a user-supplied source.
//! - With the `python-bindings` feature, the `_sample_to_target` extension
//!   module exposes the same routines to Python.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work lives in the inner modules; this file performs only
//!   FFI glue, argument conversion and error mapping.
//! - Input series are stationary; no detrending is performed.
//!
//! Conventions
//! -----------
//! - Configuration and data errors become Python `ValueError`s; callback
//!   failures and exhausted budgets become `RuntimeError`s.
//! - Durations cross the boundary as seconds (`float`).
//!
//! Downstream usage
//! ----------------
//! - Native Rust code should use the inner modules directly and can ignore
//!   the items gated behind `python-bindings`.
//! - The Python packaging layer imports `_sample_to_target` and re-exports
//!   its submodules.

pub mod autocorrelation;
pub mod estimation;
pub mod sampling;
pub mod utils;

#[cfg(feature = "python-bindings")]
use numpy::{IntoPyArray, PyArray1};

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use rand::{rngs::StdRng, SeedableRng};

#[cfg(feature = "python-bindings")]
use crate::{
    autocorrelation::tau::estimate_tau,
    estimation::{aggregate::correlated_mean_error, aggregate::ConfidenceFlag, downsample},
    sampling::{
        driver::{sample_to_target as run_sample_to_target, TargetOutcome},
        options::DEFAULT_MAX_ITERATIONS,
    },
    utils::{
        build_estimator_options, build_sampler_config, extract_f64_vec, PyCallbackSource,
        DEFAULT_TIMEOUT_SECS,
    },
};

/// SampleToTargetResult — Python-facing result of `sample_to_target`.
///
/// Fields
/// ------
/// - `inner`: [`TargetOutcome`] returned by the Rust driver.
///
/// Notes
/// -----
/// - `err` is an alias of `margin_of_error`, matching the tuple the
///   pure-Python wrapper unpacks as `(mean, err, ess, tau)`.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "sample_to_target.sampling", frozen)]
pub struct SampleToTargetResult {
    inner: TargetOutcome,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl SampleToTargetResult {
    #[getter]
    pub fn mean(&self) -> f64 {
        self.inner.mean
    }

    #[getter]
    pub fn margin_of_error(&self) -> f64 {
        self.inner.margin_of_error
    }

    #[getter]
    pub fn err(&self) -> f64 {
        self.inner.margin_of_error
    }

    #[getter]
    pub fn effective_sample_size(&self) -> f64 {
        self.inner.effective_sample_size
    }

    #[getter]
    pub fn tau(&self) -> f64 {
        self.inner.tau
    }

    /// Whether τ came from a converged window scan or was supplied.
    #[getter]
    pub fn tau_converged(&self) -> bool {
        self.inner.tau_estimate.is_converged()
    }

    #[getter]
    pub fn total_samples(&self) -> usize {
        self.inner.total_samples
    }

    #[getter]
    pub fn iterations(&self) -> usize {
        self.inner.iterations
    }

    /// Wall-clock seconds spent in the loop.
    #[getter]
    pub fn elapsed(&self) -> f64 {
        self.inner.elapsed.as_secs_f64()
    }

    /// One of `"margin_reached"`, `"ess_reached"`, `"timeout"`.
    #[getter]
    pub fn termination_reason(&self) -> &'static str {
        self.inner.termination.as_str()
    }

    #[getter]
    pub fn low_confidence(&self) -> bool {
        self.inner.confidence == ConfidenceFlag::LowConfidence
    }

    /// `(mean, err, effective_sample_size, tau)`.
    pub fn as_tuple(&self) -> (f64, f64, f64, f64) {
        (
            self.inner.mean,
            self.inner.margin_of_error,
            self.inner.effective_sample_size,
            self.inner.tau,
        )
    }

    fn __repr__(&self) -> String {
        format!(
            "SampleToTargetResult(mean={}, err={}, ess={:.1}, tau={:.4}, n={}, reason='{}', low_confidence={})",
            self.inner.mean,
            self.inner.margin_of_error,
            self.inner.effective_sample_size,
            self.inner.tau,
            self.inner.total_samples,
            self.inner.termination,
            self.low_confidence()
        )
    }
}

/// Sample from `callback` until a target is met.
///
/// Parameters
/// ----------
/// - `callback`: Python callable `f(n) -> array-like of n floats`.
/// - `target_error`: stop when the margin of error is ≤ this value.
/// - `target_eff_sample_size`: stop when ESS is ≥ this value.
/// - `timeout`: stop after this many seconds (default 30; pass `None` to
///   rely on the resource caps alone).
/// - `initial_sample_size`: first request size (default 100).
/// - `tau`: known autocorrelation time; skips estimation.
/// - `ci`: confidence level (default 0.95).
/// - `max_total_samples`, `max_iterations`: resource caps
///   (`max_iterations` defaults to 12; pass `None` to lift it).
/// - `max_lag_fraction`, `truncation_constant`, `ess_formula`, `interval`:
///   estimator options.
///
/// Errors
/// ------
/// - `ValueError` for invalid configuration, or when no estimate could be
///   formed before the loop had to stop.
/// - `RuntimeError` when the callback fails or a resource cap is hit.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (
    callback, target_error = None, target_eff_sample_size = None,
    timeout = Some(DEFAULT_TIMEOUT_SECS), initial_sample_size = 100, tau = None, ci = 0.95,
    max_total_samples = None, max_iterations = Some(DEFAULT_MAX_ITERATIONS), max_lag_fraction = 0.25, truncation_constant = 5.0,
    ess_formula = "conservative", interval = "normal"
))]
#[allow(clippy::too_many_arguments)]
pub fn sample_to_target<'py>(
    callback: &Bound<'py, PyAny>, target_error: Option<f64>,
    target_eff_sample_size: Option<f64>, timeout: Option<f64>, initial_sample_size: usize,
    tau: Option<f64>, ci: f64, max_total_samples: Option<usize>, max_iterations: Option<usize>,
    max_lag_fraction: f64, truncation_constant: f64, ess_formula: &str, interval: &str,
) -> PyResult<SampleToTargetResult> {
    let estimator = build_estimator_options(
        tau,
        Some(ci),
        Some(max_lag_fraction),
        Some(truncation_constant),
        Some(ess_formula),
        Some(interval),
    )?;
    let config = build_sampler_config(
        target_error,
        target_eff_sample_size,
        timeout,
        Some(initial_sample_size),
        max_total_samples,
        max_iterations,
        estimator,
    )?;

    let mut source = PyCallbackSource::new(callback)?;
    let outcome = run_sample_to_target(&mut source, &config)?;
    Ok(SampleToTargetResult { inner: outcome })
}

/// Integrated autocorrelation time of `x`.
///
/// Returns `(tau, converged)`; when the window scan does not converge, `tau`
/// is the best-effort value over all available lags.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (x, max_lag_fraction = 0.25, truncation_constant = 5.0, max_lag = None))]
pub fn get_tau<'py>(
    py: Python<'py>, x: &Bound<'py, PyAny>, max_lag_fraction: f64, truncation_constant: f64,
    max_lag: Option<usize>,
) -> PyResult<(f64, bool)> {
    let data = extract_f64_vec(py, x)?;
    let estimate = estimate_tau(&data, max_lag_fraction, max_lag, truncation_constant)?;
    Ok((estimate.value(), estimate.is_converged()))
}

/// Mean of a correlated series and its margin of error: `(mean, err)`.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (x, tau = None, ci = 0.95, ess_formula = "conservative", interval = "normal"))]
pub fn correlated_data_mean_err<'py>(
    py: Python<'py>, x: &Bound<'py, PyAny>, tau: Option<f64>, ci: f64, ess_formula: &str,
    interval: &str,
) -> PyResult<(f64, f64)> {
    let data = extract_f64_vec(py, x)?;
    let opts =
        build_estimator_options(None, Some(ci), None, None, Some(ess_formula), Some(interval))?;
    let estimate = correlated_mean_error(&data, tau, &opts)?;
    Ok((estimate.mean, estimate.margin_of_error))
}

/// Keep one random element from each of `len(x) // dist` contiguous chunks.
#[cfg(feature = "python-bindings")]
#[pyfunction(name = "downsample")]
#[pyo3(signature = (x, dist, seed = None))]
pub fn py_downsample<'py>(
    py: Python<'py>, x: &Bound<'py, PyAny>, dist: usize, seed: Option<u64>,
) -> PyResult<Bound<'py, PyArray1<f64>>> {
    let data = extract_f64_vec(py, x)?;
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let thinned = downsample(&data, dist, &mut rng)?;
    Ok(thinned.into_pyarray(py))
}

/// Module initializer for `_sample_to_target`.
///
/// Registers the `sampling` and `estimators` submodules and inserts them into
/// `sys.modules` so that dotted imports work.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _sample_to_target<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    let sampling_mod = PyModule::new(_py, "sampling")?;
    let estimators_mod = PyModule::new(_py, "estimators")?;
    sampling(_py, m, &sampling_mod)?;
    estimators(_py, m, &estimators_mod)?;

    // Manually add submodules into sys.modules to allow for dot notation.
    _py.import("sys")?.getattr("modules")?.set_item("sample_to_target.sampling", sampling_mod)?;

    _py.import("sys")?
        .getattr("modules")?
        .set_item("sample_to_target.estimators", estimators_mod)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn sampling<'py>(
    _py: Python, root: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_class::<SampleToTargetResult>()?;
    m.add_function(wrap_pyfunction!(sample_to_target, m)?)?;
    root.add_submodule(m)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn estimators<'py>(
    _py: Python, root: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(get_tau, m)?)?;
    m.add_function(wrap_pyfunction!(correlated_data_mean_err, m)?)?;
    m.add_function(wrap_pyfunction!(py_downsample, m)?)?;
    root.add_submodule(m)?;
    Ok(())
}
