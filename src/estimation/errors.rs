//! Errors for the statistics aggregator (moments, ESS, margin of error) and
//! the downsampling helper.
//!
//! [`EstimationError`] wraps [`AutocorrError`] so that estimator options can
//! be validated in one pass, and wraps `statrs` distribution constructor
//! failures as a string reason.
use crate::autocorrelation::errors::AutocorrError;

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, PyErr};

pub type EstimationResult<T> = Result<T, EstimationError>;

/// Unified error type for the statistics aggregator.
#[derive(Debug, Clone, PartialEq)]
pub enum EstimationError {
    // ---- Input data ----
    /// Fewer than two observations; the sample variance is undefined.
    InsufficientData { len: usize },

    /// A NaN/±inf observation.
    NonFiniteData { index: usize, value: f64 },

    // ---- Estimator options ----
    /// τ must be finite and ≥ 1.
    InvalidTau { tau: f64, reason: &'static str },

    /// Confidence level must lie strictly inside (0, 1).
    InvalidConfidence { value: f64, reason: &'static str },

    /// ESS confidence floor must be finite and > 0.
    InvalidEssFloor { value: f64, reason: &'static str },

    /// Unknown ESS formula or interval name.
    InvalidChoice { name: String, reason: &'static str },

    // ---- Downsampling ----
    /// Chunk distance must be ≥ 1 and ≤ series length.
    InvalidDownsampleDistance { dist: usize, len: usize },

    // ---- Wrapped ----
    /// ACF / τ option or data error.
    Autocorr(AutocorrError),

    /// statrs rejected distribution parameters.
    Distribution { reason: String },
}

impl From<AutocorrError> for EstimationError {
    fn from(err: AutocorrError) -> Self {
        EstimationError::Autocorr(err)
    }
}

impl std::error::Error for EstimationError {}

impl std::fmt::Display for EstimationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Input data ----
            EstimationError::InsufficientData { len } => {
                write!(f, "Need at least 2 observations for a sample variance; got {len}.")
            }
            EstimationError::NonFiniteData { index, value } => {
                write!(f, "Observation at index {index} is non-finite: {value}")
            }

            // ---- Estimator options ----
            EstimationError::InvalidTau { tau, reason } => {
                write!(f, "Invalid autocorrelation time {tau}: {reason}")
            }
            EstimationError::InvalidConfidence { value, reason } => {
                write!(f, "Invalid confidence level {value}: {reason}")
            }
            EstimationError::InvalidEssFloor { value, reason } => {
                write!(f, "Invalid ESS confidence floor {value}: {reason}")
            }
            EstimationError::InvalidChoice { name, reason } => {
                write!(f, "Invalid option '{name}': {reason}")
            }

            // ---- Downsampling ----
            EstimationError::InvalidDownsampleDistance { dist, len } => {
                write!(f, "Downsample distance {dist} must satisfy 1 ≤ dist ≤ len ({len}).")
            }

            // ---- Wrapped ----
            EstimationError::Autocorr(err) => write!(f, "{err}"),
            EstimationError::Distribution { reason } => {
                write!(f, "Distribution error: {reason}")
            }
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<EstimationError> for PyErr {
    fn from(err: EstimationError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
