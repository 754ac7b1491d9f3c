//! estimation::interval — critical values for confidence intervals.
//!
//! Purpose
//! -------
//! Map a two-sided confidence level to the multiplier applied to the
//! standard error of the mean. The default is the normal quantile
//! z = Φ⁻¹(1 − (1 − c)/2) (z ≈ 1.96 for c = 0.95), justified by the effective
//! sample size being the "equivalent number of independent draws". For small
//! effective samples a Student-t quantile can be requested instead.
//!
//! Conventions
//! -----------
//! - Student-t degrees of freedom are `max(ESS − 1, 1)`; ESS is real-valued,
//!   so fractional degrees of freedom are allowed.
//! - Quantiles come from `statrs::distribution`.
use crate::estimation::errors::{EstimationError, EstimationResult};
use statrs::distribution::{ContinuousCDF, Normal, StudentsT};
use std::str::FromStr;

/// Default two-sided confidence level.
pub const DEFAULT_CONFIDENCE: f64 = 0.95;

/// Distribution used for the critical value of the margin of error.
///
/// Parsing accepts case-insensitive `"normal"`/`"z"` and
/// `"student_t"`/`"studentt"`/`"t"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntervalKind {
    #[default]
    Normal,
    StudentT,
}

impl FromStr for IntervalKind {
    type Err = EstimationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "normal" | "z" => Ok(IntervalKind::Normal),
            "student_t" | "studentt" | "t" => Ok(IntervalKind::StudentT),
            _ => Err(EstimationError::InvalidChoice {
                name: s.to_string(),
                reason: "Valid interval kinds are 'normal' or 'student_t'.",
            }),
        }
    }
}

/// Validate a two-sided confidence level.
///
/// # Errors
/// [`EstimationError::InvalidConfidence`] unless the value is finite and in (0, 1).
pub fn validate_confidence(value: f64) -> EstimationResult<()> {
    if !value.is_finite() {
        return Err(EstimationError::InvalidConfidence { value, reason: "must be finite." });
    }
    if value <= 0.0 || value >= 1.0 {
        return Err(EstimationError::InvalidConfidence {
            value,
            reason: "must lie strictly between 0 and 1.",
        });
    }
    Ok(())
}

/// Critical value for a two-sided interval at level `confidence`.
///
/// Parameters
/// ----------
/// - `kind`: [`IntervalKind`]
/// - `confidence`: `f64` in (0, 1).
/// - `ess`: `f64`
///   Effective sample size; only used for `StudentT`.
///
/// Returns
/// -------
/// The upper `(1 + confidence)/2` quantile of the chosen distribution.
///
/// Errors
/// ------
/// - [`EstimationError::InvalidConfidence`] for a bad level.
/// - [`EstimationError::Distribution`] if statrs rejects the parameters.
///
/// Examples
/// --------
/// ```rust
/// use sample_to_target::estimation::interval::{critical_value, IntervalKind};
///
/// let z = critical_value(IntervalKind::Normal, 0.95, 1000.0).unwrap();
/// assert!((z - 1.959964).abs() < 1e-5);
/// ```
pub fn critical_value(kind: IntervalKind, confidence: f64, ess: f64) -> EstimationResult<f64> {
    validate_confidence(confidence)?;
    let p = 1.0 - (1.0 - confidence) / 2.0;
    match kind {
        IntervalKind::Normal => {
            let normal = Normal::new(0.0, 1.0)
                .map_err(|e| EstimationError::Distribution { reason: e.to_string() })?;
            Ok(normal.inverse_cdf(p))
        }
        IntervalKind::StudentT => {
            let dof = (ess - 1.0).max(1.0);
            let t = StudentsT::new(0.0, 1.0, dof)
                .map_err(|e| EstimationError::Distribution { reason: e.to_string() })?;
            Ok(t.inverse_cdf(p))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Normal quantiles for common levels.
    // - Student-t quantiles being wider than normal, and approaching the
    //   normal quantile for large ESS.
    // - Confidence validation and FromStr parsing.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // 95% and 99% normal quantiles match tabulated values.
    //
    // Given
    // -----
    // - c = 0.95 and c = 0.99.
    //
    // Expect
    // ------
    // - 1.959964 and 2.575829 (to 1e-5).
    fn critical_value_normal_matches_tables() {
        let z95 = critical_value(IntervalKind::Normal, 0.95, 100.0).unwrap();
        let z99 = critical_value(IntervalKind::Normal, 0.99, 100.0).unwrap();
        assert_relative_eq!(z95, 1.959964, epsilon = 1e-5);
        assert_relative_eq!(z99, 2.575829, epsilon = 1e-5);
    }

    #[test]
    // Purpose
    // -------
    // Student-t is wider for small ESS and converges to normal.
    //
    // Given
    // -----
    // - ESS = 5 (dof 4) and ESS = 1e6.
    //
    // Expect
    // ------
    // - t(4) 97.5% quantile ≈ 2.776445; large-ESS t ≈ z.
    fn critical_value_student_t_widens_for_small_ess() {
        let t_small = critical_value(IntervalKind::StudentT, 0.95, 5.0).unwrap();
        let t_large = critical_value(IntervalKind::StudentT, 0.95, 1e6).unwrap();
        let z = critical_value(IntervalKind::Normal, 0.95, 5.0).unwrap();
        assert_relative_eq!(t_small, 2.776445, epsilon = 1e-4);
        assert!(t_small > z);
        assert_relative_eq!(t_large, z, epsilon = 1e-3);
    }

    #[test]
    fn critical_value_rejects_out_of_range_confidence() {
        for bad in [0.0, 1.0, -0.5, f64::NAN] {
            assert!(matches!(
                critical_value(IntervalKind::Normal, bad, 10.0),
                Err(EstimationError::InvalidConfidence { .. })
            ));
        }
    }

    #[test]
    fn interval_kind_parses_case_insensitively() {
        assert_eq!("Normal".parse::<IntervalKind>().unwrap(), IntervalKind::Normal);
        assert_eq!("STUDENT_T".parse::<IntervalKind>().unwrap(), IntervalKind::StudentT);
        assert!("cauchy".parse::<IntervalKind>().is_err());
    }
}
