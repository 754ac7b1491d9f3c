//! autocorrelation::errors — error types for ACF and τ estimation.
//!
//! Purpose
//! -------
//! Provide the error enum and result alias shared by the autocorrelation
//! estimator, the integrated autocorrelation-time estimator, and their input
//! guards. Keeping these failures local to the subtree lets the sampling
//! driver decide which of them are recoverable (e.g. "sample too short") and
//! which are fatal.
//!
//! Key behaviors
//! -------------
//! - Define [`AutocorrResult`] and [`AutocorrError`] as the canonical result
//!   and error types for `autocorrelation::{acf, tau, validation}`.
//! - Attach human-readable `Display` messages to each variant so diagnostics
//!   are meaningful without further context.
//! - Map every variant to a Python `ValueError` when the `python-bindings`
//!   feature is enabled.
//!
//! Invariants & assumptions
//! ------------------------
//! - Estimators validate their inputs and return [`AutocorrResult<T>`]
//!   instead of panicking on user data.
//! - A non-converged truncation window is *not* an error; it is reported as
//!   `TauEstimate::NotConverged` by the τ estimator.
//!
//! Testing notes
//! -------------
//! - Unit tests verify that each variant's `Display` output embeds its
//!   payload (length, index, offending value).

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, PyErr};

pub type AutocorrResult<T> = Result<T, AutocorrError>;

/// AutocorrError — failures of the autocorrelation estimators.
///
/// Variants
/// --------
/// - `InsufficientData { len }`
///   Fewer than two observations; no lag-1 quantity exists.
/// - `NonFiniteData { index, value }`
///   A NaN or ±∞ observation at position `index`.
/// - `ZeroVariance { variance }`
///   The sample variance is numerically zero, so the ACF normalization
///   ρₖ = γₖ / γ₀ is undefined.
/// - `InvalidMaxLagFraction { value, reason }`
///   The lag-range fraction is not finite or not in (0, 1].
/// - `InvalidTruncationConstant { value, reason }`
///   The self-consistent window constant C is not finite or not positive.
///
/// Notes
/// -----
/// - `InsufficientData` and `ZeroVariance` are treated as "keep sampling" by
///   the sampling driver; the option errors are configuration mistakes.
#[derive(Debug, Clone, PartialEq)]
pub enum AutocorrError {
    // ---- Input data ----
    InsufficientData { len: usize },
    NonFiniteData { index: usize, value: f64 },
    ZeroVariance { variance: f64 },

    // ---- Options ----
    InvalidMaxLagFraction { value: f64, reason: &'static str },
    InvalidTruncationConstant { value: f64, reason: &'static str },
}

impl AutocorrError {
    /// Whether more data could resolve this error.
    ///
    /// `InsufficientData` and `ZeroVariance` may disappear once the sample
    /// grows; everything else is a property of the inputs or options.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, AutocorrError::InsufficientData { .. } | AutocorrError::ZeroVariance { .. })
    }
}

impl std::error::Error for AutocorrError {}

impl std::fmt::Display for AutocorrError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Input data ----
            AutocorrError::InsufficientData { len } => {
                write!(f, "Need at least 2 observations to estimate autocorrelation; got {len}.")
            }
            AutocorrError::NonFiniteData { index, value } => {
                write!(f, "Observation at index {index} is non-finite: {value}")
            }
            AutocorrError::ZeroVariance { variance } => {
                write!(f, "Sample variance is numerically zero ({variance}); ACF is undefined.")
            }

            // ---- Options ----
            AutocorrError::InvalidMaxLagFraction { value, reason } => {
                write!(f, "Invalid max lag fraction {value}: {reason}")
            }
            AutocorrError::InvalidTruncationConstant { value, reason } => {
                write!(f, "Invalid truncation constant {value}: {reason}")
            }
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<AutocorrError> for PyErr {
    fn from(err: AutocorrError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - `Display` payload embedding for AutocorrError variants.
    // - The recoverable / fatal split used by the sampling driver.
    //
    // They intentionally DO NOT cover:
    // - The PyErr conversion, which needs a Python interpreter.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // `InsufficientData` reports the observed length.
    //
    // Given
    // -----
    // - An `InsufficientData { len: 1 }` value.
    //
    // Expect
    // ------
    // - The message contains "got 1".
    fn autocorr_error_insufficient_data_includes_length() {
        // Arrange
        let err = AutocorrError::InsufficientData { len: 1 };

        // Act
        let msg = err.to_string();

        // Assert
        assert!(msg.contains("got 1"), "Expected length in message.\nGot: {msg}");
    }

    #[test]
    // Purpose
    // -------
    // `NonFiniteData` reports both index and value.
    //
    // Given
    // -----
    // - A NaN at index 7.
    //
    // Expect
    // ------
    // - The message contains "7" and "NaN".
    fn autocorr_error_non_finite_includes_index_and_value() {
        // Arrange
        let err = AutocorrError::NonFiniteData { index: 7, value: f64::NAN };

        // Act
        let msg = err.to_string();

        // Assert
        assert!(msg.contains('7') && msg.contains("NaN"), "Got: {msg}");
    }

    #[test]
    // Purpose
    // -------
    // Only data-shape errors are flagged as recoverable.
    //
    // Given
    // -----
    // - One recoverable and one option error.
    //
    // Expect
    // ------
    // - `ZeroVariance` is recoverable, `InvalidTruncationConstant` is not.
    fn autocorr_error_recoverable_split_matches_data_errors() {
        // Arrange
        let zero_var = AutocorrError::ZeroVariance { variance: 0.0 };
        let bad_c = AutocorrError::InvalidTruncationConstant { value: -1.0, reason: "negative" };

        // Act / Assert
        assert!(zero_var.is_recoverable());
        assert!(!bad_c.is_recoverable());
    }
}
