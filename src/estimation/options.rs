//! Estimator options — configuration for ACF, τ, ESS and margin of error.
//!
//! Purpose
//! -------
//! Collect every knob that influences a single evaluation round in one
//! plain-data struct, so the sampling driver and the one-shot helpers run
//! the same pipeline with the same defaults.
//!
//! Key behaviors
//! -------------
//! - [`EstimatorOptions::new`] validates all fields; [`EstimatorOptions::validate`]
//!   re-checks a value built with a struct literal.
//! - `Default` encodes the standard policy: 95% confidence, K = n/4,
//!   C = 5, ESS floor 10, ESS = n/(2τ − 1), normal quantiles, τ estimated.
//!
//! Invariants & assumptions
//! ------------------------
//! - `known_tau`, when set, bypasses the ACF and window scan entirely; the
//!   caller vouches for its value (≥ 1).
use crate::{
    autocorrelation::{
        acf::DEFAULT_MAX_LAG_FRACTION,
        tau::DEFAULT_TRUNCATION_CONSTANT,
        validation::{validate_max_lag_fraction, validate_truncation_constant},
    },
    estimation::{
        aggregate::EssFormula,
        errors::{EstimationError, EstimationResult},
        interval::{validate_confidence, IntervalKind, DEFAULT_CONFIDENCE},
    },
};

/// ESS below which a result is flagged `LowConfidence`.
pub const DEFAULT_ESS_CONFIDENCE_FLOOR: f64 = 10.0;

/// EstimatorOptions — per-round estimation configuration.
///
/// Fields
/// ------
/// - `confidence`: two-sided confidence level in (0, 1).
/// - `max_lag_fraction`: f ∈ (0, 1]; the ACF uses lags up to ⌊f·n⌋.
/// - `max_lag`: optional absolute cap on the ACF lag range.
/// - `truncation_constant`: self-consistent window constant C > 0.
/// - `ess_confidence_floor`: ESS below this is reported as `LowConfidence`.
/// - `ess_formula`: relation between n, τ and ESS.
/// - `interval`: normal or Student-t critical values.
/// - `known_tau`: skip τ estimation and use this value (≥ 1).
#[derive(Debug, Clone, PartialEq)]
pub struct EstimatorOptions {
    pub confidence: f64,
    pub max_lag_fraction: f64,
    pub max_lag: Option<usize>,
    pub truncation_constant: f64,
    pub ess_confidence_floor: f64,
    pub ess_formula: EssFormula,
    pub interval: IntervalKind,
    pub known_tau: Option<f64>,
}

impl EstimatorOptions {
    /// Construct validated options.
    ///
    /// # Errors
    /// - [`EstimationError::InvalidConfidence`] for a level outside (0, 1).
    /// - [`EstimationError::Autocorr`] for a bad lag fraction or window constant.
    /// - [`EstimationError::InvalidEssFloor`] for a non-positive floor.
    /// - [`EstimationError::InvalidTau`] for a known τ that is < 1 or non-finite.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        confidence: f64, max_lag_fraction: f64, max_lag: Option<usize>, truncation_constant: f64,
        ess_confidence_floor: f64, ess_formula: EssFormula, interval: IntervalKind,
        known_tau: Option<f64>,
    ) -> EstimationResult<Self> {
        let opts = EstimatorOptions {
            confidence,
            max_lag_fraction,
            max_lag,
            truncation_constant,
            ess_confidence_floor,
            ess_formula,
            interval,
            known_tau,
        };
        opts.validate()?;
        Ok(opts)
    }

    /// Re-check every field.
    pub fn validate(&self) -> EstimationResult<()> {
        validate_confidence(self.confidence)?;
        validate_max_lag_fraction(self.max_lag_fraction)?;
        validate_truncation_constant(self.truncation_constant)?;
        if !self.ess_confidence_floor.is_finite() || self.ess_confidence_floor <= 0.0 {
            return Err(EstimationError::InvalidEssFloor {
                value: self.ess_confidence_floor,
                reason: "must be finite and strictly positive.",
            });
        }
        if let Some(tau) = self.known_tau {
            validate_tau(tau)?;
        }
        Ok(())
    }
}

impl Default for EstimatorOptions {
    fn default() -> Self {
        EstimatorOptions {
            confidence: DEFAULT_CONFIDENCE,
            max_lag_fraction: DEFAULT_MAX_LAG_FRACTION,
            max_lag: None,
            truncation_constant: DEFAULT_TRUNCATION_CONSTANT,
            ess_confidence_floor: DEFAULT_ESS_CONFIDENCE_FLOOR,
            ess_formula: EssFormula::default(),
            interval: IntervalKind::default(),
            known_tau: None,
        }
    }
}

/// τ must be finite and ≥ 1.
pub fn validate_tau(tau: f64) -> EstimationResult<()> {
    if !tau.is_finite() {
        return Err(EstimationError::InvalidTau { tau, reason: "must be finite." });
    }
    if tau < 1.0 {
        return Err(EstimationError::InvalidTau { tau, reason: "must be at least 1." });
    }
    Ok(())
}
