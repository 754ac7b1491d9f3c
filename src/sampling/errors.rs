//! Errors for the sampling driver.
//!
//! - [`ConfigError`]: invalid targets, budgets or estimator options. Raised
//!   before the first callback invocation.
//! - [`SamplingError`]: the fatal outcomes of a run. Every variant except
//!   `Configuration` carries the partial [`LoopState`] reached before the
//!   failure.
//!
//! A non-converged τ is never an error; it only drives the `Continue`
//! decision.
use crate::{estimation::errors::EstimationError, sampling::state::LoopState};

#[cfg(feature = "python-bindings")]
use pyo3::{
    exceptions::{PyRuntimeError, PyValueError},
    PyErr,
};

pub type ConfigResult<T> = Result<T, ConfigError>;
pub type SamplingResult<T> = Result<T, SamplingError>;

/// Configuration errors, detected before sampling starts.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    // ---- Targets ----
    /// None of margin, ESS or timeout is set.
    NoTargetsProvided,

    /// Margin-of-error target must be finite and > 0.
    InvalidMarginTarget { value: f64, reason: &'static str },

    /// ESS target must be finite and > 0.
    InvalidEssTarget { value: f64, reason: &'static str },

    /// Timeout must be non-zero.
    InvalidTimeout { secs: f64, reason: &'static str },

    // ---- Budget ----
    /// Neither a timeout, a sample cap nor an iteration cap bounds the loop.
    NoResourceBound,

    /// Initial batch must be ≥ 1 and fit within `max_total_samples`.
    InvalidInitialBatchSize { value: usize, reason: &'static str },

    /// Sample cap must be ≥ 1.
    InvalidMaxTotalSamples { value: usize, reason: &'static str },

    /// Iteration cap must be ≥ 1.
    InvalidMaxIterations { value: usize, reason: &'static str },

    // ---- Synthetic sources ----
    /// AR(1) parameter outside its admissible range.
    InvalidProcessParameter { name: &'static str, value: f64, reason: &'static str },

    // ---- Wrapped ----
    /// Estimator option error.
    Estimator(EstimationError),
}

impl From<EstimationError> for ConfigError {
    fn from(err: EstimationError) -> Self {
        ConfigError::Estimator(err)
    }
}

impl std::error::Error for ConfigError {}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Targets ----
            ConfigError::NoTargetsProvided => {
                write!(f, "At least one of margin, ESS or timeout targets must be set.")
            }
            ConfigError::InvalidMarginTarget { value, reason } => {
                write!(f, "Invalid margin-of-error target {value}: {reason}")
            }
            ConfigError::InvalidEssTarget { value, reason } => {
                write!(f, "Invalid effective-sample-size target {value}: {reason}")
            }
            ConfigError::InvalidTimeout { secs, reason } => {
                write!(f, "Invalid timeout {secs}s: {reason}")
            }

            // ---- Budget ----
            ConfigError::NoResourceBound => write!(
                f,
                "No resource bound: set a timeout, max_total_samples or max_iterations."
            ),
            ConfigError::InvalidInitialBatchSize { value, reason } => {
                write!(f, "Invalid initial batch size {value}: {reason}")
            }
            ConfigError::InvalidMaxTotalSamples { value, reason } => {
                write!(f, "Invalid max_total_samples {value}: {reason}")
            }
            ConfigError::InvalidMaxIterations { value, reason } => {
                write!(f, "Invalid max_iterations {value}: {reason}")
            }

            // ---- Synthetic sources ----
            ConfigError::InvalidProcessParameter { name, value, reason } => {
                write!(f, "Invalid process parameter {name} = {value}: {reason}")
            }

            // ---- Wrapped ----
            ConfigError::Estimator(err) => write!(f, "Estimator options: {err}"),
        }
    }
}

/// Resource cap that ended a run without reaching any target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceLimit {
    MaxTotalSamples { limit: usize },
    MaxIterations { limit: usize },
}

impl std::fmt::Display for ResourceLimit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceLimit::MaxTotalSamples { limit } => write!(f, "max_total_samples = {limit}"),
            ResourceLimit::MaxIterations { limit } => write!(f, "max_iterations = {limit}"),
        }
    }
}

/// Fatal outcomes of a sample-to-target run.
#[derive(Debug, Clone, PartialEq)]
pub enum SamplingError {
    /// Invalid configuration; no sampling took place.
    Configuration(ConfigError),

    /// The sample never supported an estimate before the loop had to stop,
    /// or the estimators failed in a way more data cannot fix.
    InsufficientData { source: EstimationError, partial: Box<LoopState> },

    /// The callback failed, returned the wrong count, or returned non-finite
    /// values.
    CallbackFailure { reason: String, partial: Box<LoopState> },

    /// A sample or iteration cap was hit before any target was reached.
    ResourceExhausted { limit: ResourceLimit, partial: Box<LoopState> },
}

impl SamplingError {
    /// Loop state reached before the failure; `None` for configuration errors.
    pub fn partial_state(&self) -> Option<&LoopState> {
        match self {
            SamplingError::Configuration(_) => None,
            SamplingError::InsufficientData { partial, .. }
            | SamplingError::CallbackFailure { partial, .. }
            | SamplingError::ResourceExhausted { partial, .. } => Some(partial),
        }
    }
}

impl From<ConfigError> for SamplingError {
    fn from(err: ConfigError) -> Self {
        SamplingError::Configuration(err)
    }
}

impl std::error::Error for SamplingError {}

impl std::fmt::Display for SamplingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SamplingError::Configuration(err) => write!(f, "Configuration error: {err}"),
            SamplingError::InsufficientData { source, partial } => write!(
                f,
                "Insufficient data after {} samples and {} iterations: {source}",
                partial.total_samples, partial.iterations
            ),
            SamplingError::CallbackFailure { reason, partial } => write!(
                f,
                "Sampling callback failed after {} samples: {reason}",
                partial.total_samples
            ),
            SamplingError::ResourceExhausted { limit, partial } => write!(
                f,
                "Resource limit {limit} exhausted after {} samples without reaching a target.",
                partial.total_samples
            ),
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<ConfigError> for PyErr {
    fn from(err: ConfigError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

#[cfg(feature = "python-bindings")]
impl From<SamplingError> for PyErr {
    fn from(err: SamplingError) -> PyErr {
        match err {
            SamplingError::Configuration(_) | SamplingError::InsufficientData { .. } => {
                PyValueError::new_err(err.to_string())
            }
            SamplingError::CallbackFailure { .. } | SamplingError::ResourceExhausted { .. } => {
                PyRuntimeError::new_err(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_state_is_absent_only_for_configuration_errors() {
        let partial = Box::new(LoopState { total_samples: 300, ..LoopState::default() });
        let failure = SamplingError::CallbackFailure { reason: "boom".into(), partial };
        assert_eq!(failure.partial_state().map(|s| s.total_samples), Some(300));
        assert!(SamplingError::from(ConfigError::NoTargetsProvided).partial_state().is_none());
    }

    #[test]
    fn display_names_the_exhausted_limit() {
        let err = SamplingError::ResourceExhausted {
            limit: ResourceLimit::MaxIterations { limit: 20 },
            partial: Box::default(),
        };
        assert!(err.to_string().contains("max_iterations = 20"));
    }
}
