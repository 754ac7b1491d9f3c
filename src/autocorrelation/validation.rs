//! autocorrelation::validation — shared input guards for ACF and τ.
//!
//! Purpose
//! -------
//! Centralize the basic checks that every autocorrelation routine needs:
//! series length, finiteness of observations, and the range of the lag and
//! window tuning constants. Estimators call these once at the top instead of
//! repeating ad-hoc checks.
//!
//! Invariants & assumptions
//! ------------------------
//! - Series must contain at least 2 observations.
//! - All observations must be finite (no NaN, no ±∞).
//! - `max_lag_fraction` must lie in (0, 1].
//! - The truncation constant C must be finite and strictly positive.
//!
//! Conventions
//! -----------
//! - Pure functions, no allocation beyond error construction.
//! - The first offending element is reported.

use crate::autocorrelation::errors::{AutocorrError, AutocorrResult};

/// Validate a raw series before any lag-based computation.
///
/// Parameters
/// ----------
/// - `data`: `&[f64]`
///   Observations in generation order.
///
/// Returns
/// -------
/// `AutocorrResult<()>`
///   `Ok(())` when `data.len() ≥ 2` and every element is finite.
///
/// Errors
/// ------
/// - `AutocorrError::InsufficientData` when `data.len() < 2`.
/// - `AutocorrError::NonFiniteData` for the first NaN/±∞ value.
///
/// Examples
/// --------
/// ```rust
/// # use sample_to_target::autocorrelation::validation::validate_series;
/// # use sample_to_target::autocorrelation::errors::AutocorrError;
/// assert!(validate_series(&[0.1, -0.2, 0.3]).is_ok());
/// assert_eq!(validate_series(&[1.0]), Err(AutocorrError::InsufficientData { len: 1 }));
/// ```
pub fn validate_series(data: &[f64]) -> AutocorrResult<()> {
    if data.len() < 2 {
        return Err(AutocorrError::InsufficientData { len: data.len() });
    }

    if let Some((index, &value)) = data.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(AutocorrError::NonFiniteData { index, value });
    }

    Ok(())
}

/// Validate the fraction of the sample length used as maximum ACF lag.
///
/// # Errors
/// `AutocorrError::InvalidMaxLagFraction` if the value is non-finite or
/// outside (0, 1].
pub fn validate_max_lag_fraction(value: f64) -> AutocorrResult<()> {
    if !value.is_finite() {
        return Err(AutocorrError::InvalidMaxLagFraction { value, reason: "must be finite." });
    }
    if value <= 0.0 || value > 1.0 {
        return Err(AutocorrError::InvalidMaxLagFraction {
            value,
            reason: "must lie in the interval (0, 1].",
        });
    }
    Ok(())
}

/// Validate the self-consistent window constant C.
///
/// # Errors
/// `AutocorrError::InvalidTruncationConstant` if the value is non-finite or
/// not strictly positive.
pub fn validate_truncation_constant(value: f64) -> AutocorrResult<()> {
    if !value.is_finite() {
        return Err(AutocorrError::InvalidTruncationConstant { value, reason: "must be finite." });
    }
    if value <= 0.0 {
        return Err(AutocorrError::InvalidTruncationConstant {
            value,
            reason: "must be strictly positive.",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover every branch of the three guards plus a success
    // path for each.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // A short finite series passes validation.
    //
    // Given
    // -----
    // - Three finite observations.
    //
    // Expect
    // ------
    // - `Ok(())`.
    fn validate_series_finite_series_succeeds() {
        // Arrange
        let data = [0.1_f64, -0.2, 0.3];

        // Act
        let result = validate_series(&data);

        // Assert
        assert!(result.is_ok(), "Expected Ok(()), got {result:?}");
    }

    #[test]
    // Purpose
    // -------
    // Empty and single-element series are rejected.
    //
    // Given
    // -----
    // - `[]` and `[1.0]`.
    //
    // Expect
    // ------
    // - `InsufficientData` with the matching length.
    fn validate_series_short_series_returns_insufficient_data() {
        assert_eq!(validate_series(&[]), Err(AutocorrError::InsufficientData { len: 0 }));
        assert_eq!(validate_series(&[1.0]), Err(AutocorrError::InsufficientData { len: 1 }));
    }

    #[test]
    // Purpose
    // -------
    // The first non-finite entry is reported with its index.
    //
    // Given
    // -----
    // - `[0.0, 1.0, +∞, NaN]`.
    //
    // Expect
    // ------
    // - `NonFiniteData { index: 2, value: +∞ }`.
    fn validate_series_reports_first_non_finite_value() {
        // Arrange
        let data = [0.0, 1.0, f64::INFINITY, f64::NAN];

        // Act
        let result = validate_series(&data);

        // Assert
        assert_eq!(result, Err(AutocorrError::NonFiniteData { index: 2, value: f64::INFINITY }));
    }

    #[test]
    // Purpose
    // -------
    // Lag fraction must be in (0, 1].
    //
    // Given
    // -----
    // - 0.25 and 1.0 (valid); 0.0, 1.5 and NaN (invalid).
    //
    // Expect
    // ------
    // - Valid values pass, invalid ones yield `InvalidMaxLagFraction`.
    fn validate_max_lag_fraction_enforces_unit_interval() {
        assert!(validate_max_lag_fraction(0.25).is_ok());
        assert!(validate_max_lag_fraction(1.0).is_ok());
        for bad in [0.0, 1.5, f64::NAN] {
            assert!(matches!(
                validate_max_lag_fraction(bad),
                Err(AutocorrError::InvalidMaxLagFraction { .. })
            ));
        }
    }

    #[test]
    // Purpose
    // -------
    // The window constant must be positive and finite.
    //
    // Given
    // -----
    // - 5.0 (valid); 0.0 and -∞ (invalid).
    //
    // Expect
    // ------
    // - Only 5.0 passes.
    fn validate_truncation_constant_rejects_non_positive() {
        assert!(validate_truncation_constant(5.0).is_ok());
        assert!(validate_truncation_constant(0.0).is_err());
        assert!(validate_truncation_constant(f64::NEG_INFINITY).is_err());
    }
}
