//! estimation::aggregate — effective sample size and margin of error.
//!
//! Purpose
//! -------
//! Combine the moments of the current sample with an autocorrelation time τ
//! into the quantities the sampling loop compares against its targets:
//!
//! ```text
//! ESS    = n / (2τ − 1)        (conservative, default)
//!        = n / τ               (integrated)
//! SE     = sqrt(σ² / ESS)
//! margin = crit · SE
//! ```
//!
//! where σ² is the unbiased sample variance and `crit` the two-sided critical
//! value from [`crate::estimation::interval`].
//!
//! Key behaviors
//! -------------
//! - [`aggregate`] works on precomputed [`SampleMoments`] and a τ value.
//! - [`tau_for_sample`] resolves τ from options: a caller-supplied τ, or
//!   ACF + window scan.
//! - [`correlated_mean_error`] is the one-shot helper chaining both.
//! - Results with ESS below the configured floor are flagged
//!   [`ConfidenceFlag::LowConfidence`] but still returned.
//!
//! Invariants & assumptions
//! ------------------------
//! - τ ≥ 1, so ESS ≤ n under both formulas; τ = 1 gives ESS = n.
use crate::{
    autocorrelation::{acf::AutocorrelationFunction, tau::integrated_tau, tau::TauEstimate},
    estimation::{
        errors::{EstimationError, EstimationResult},
        interval::critical_value,
        moments::SampleMoments,
        options::{validate_tau, EstimatorOptions},
    },
};
use std::str::FromStr;

/// Relation between sample size, τ and effective sample size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EssFormula {
    /// ESS = n / (2τ − 1).
    #[default]
    Conservative,
    /// ESS = n / τ.
    Integrated,
}

impl FromStr for EssFormula {
    type Err = EstimationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "conservative" => Ok(EssFormula::Conservative),
            "integrated" => Ok(EssFormula::Integrated),
            _ => Err(EstimationError::InvalidChoice {
                name: s.to_string(),
                reason: "Valid ESS formulas are 'conservative' or 'integrated'.",
            }),
        }
    }
}

/// Whether the normal approximation behind the margin is trustworthy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfidenceFlag {
    #[default]
    Normal,
    LowConfidence,
}

/// CorrelatedEstimate — mean of a correlated sample with its uncertainty.
///
/// Fields
/// ------
/// - `mean`, `variance`, `n`: sample moments (σ² unbiased).
/// - `tau`: autocorrelation time used (≥ 1).
/// - `effective_sample_size`: ESS under the configured formula.
/// - `standard_error`: sqrt(σ² / ESS).
/// - `critical_value`: z or t multiplier for `confidence`.
/// - `margin_of_error`: `critical_value · standard_error`.
/// - `confidence`: [`ConfidenceFlag`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrelatedEstimate {
    pub mean: f64,
    pub variance: f64,
    pub n: usize,
    pub tau: f64,
    pub effective_sample_size: f64,
    pub standard_error: f64,
    pub critical_value: f64,
    pub margin_of_error: f64,
    pub confidence: ConfidenceFlag,
}

impl CorrelatedEstimate {
    /// Same estimate flagged `LowConfidence`.
    pub fn downgraded(mut self) -> Self {
        self.confidence = ConfidenceFlag::LowConfidence;
        self
    }

    pub fn is_low_confidence(&self) -> bool {
        self.confidence == ConfidenceFlag::LowConfidence
    }
}

/// Effective sample size of `n` draws with autocorrelation time `tau`.
///
/// # Errors
/// [`EstimationError::InvalidTau`] if τ is non-finite or below 1.
pub fn effective_sample_size(n: usize, tau: f64, formula: EssFormula) -> EstimationResult<f64> {
    validate_tau(tau)?;
    let n = n as f64;
    Ok(match formula {
        EssFormula::Conservative => n / (2.0 * tau - 1.0),
        EssFormula::Integrated => n / tau,
    })
}

/// Derive ESS, standard error and margin of error from moments and τ.
///
/// Parameters
/// ----------
/// - `moments`: [`SampleMoments`] of the full sample.
/// - `tau`: `f64` ≥ 1.
/// - `opts`: [`EstimatorOptions`]; uses `confidence`, `interval`,
///   `ess_formula` and `ess_confidence_floor`.
///
/// Returns
/// -------
/// `EstimationResult<CorrelatedEstimate>`, flagged `LowConfidence` when
/// ESS < `opts.ess_confidence_floor`.
///
/// Errors
/// ------
/// - [`EstimationError::InvalidTau`] for τ < 1 or non-finite.
/// - [`EstimationError::InvalidConfidence`] / [`EstimationError::Distribution`]
///   from the critical value.
pub fn aggregate(
    moments: &SampleMoments, tau: f64, opts: &EstimatorOptions,
) -> EstimationResult<CorrelatedEstimate> {
    let ess = effective_sample_size(moments.n, tau, opts.ess_formula)?;
    let standard_error = (moments.variance / ess).sqrt();
    let crit = critical_value(opts.interval, opts.confidence, ess)?;
    let confidence = if ess < opts.ess_confidence_floor {
        ConfidenceFlag::LowConfidence
    } else {
        ConfidenceFlag::Normal
    };

    Ok(CorrelatedEstimate {
        mean: moments.mean,
        variance: moments.variance,
        n: moments.n,
        tau,
        effective_sample_size: ess,
        standard_error,
        critical_value: crit,
        margin_of_error: crit * standard_error,
        confidence,
    })
}

/// Resolve τ for `data`: the caller-supplied `opts.known_tau`, or the
/// self-consistent window estimate of the sample ACF.
///
/// # Errors
/// Option validation errors, and wrapped [`crate::autocorrelation::AutocorrError`]s
/// for short, non-finite or constant samples.
pub fn tau_for_sample(data: &[f64], opts: &EstimatorOptions) -> EstimationResult<TauEstimate> {
    if let Some(tau) = opts.known_tau {
        validate_tau(tau)?;
        return Ok(TauEstimate::Known { tau });
    }
    let acf = AutocorrelationFunction::compute(data, opts.max_lag_fraction, opts.max_lag)?;
    Ok(integrated_tau(&acf, opts.truncation_constant)?)
}

/// One-shot mean and margin of error of a correlated series.
///
/// `tau` overrides `opts.known_tau` when given. A window scan that does not
/// converge falls back to its best-effort τ and flags the result
/// `LowConfidence`.
///
/// # Errors
/// Any error of [`SampleMoments::from_slice`], [`tau_for_sample`] or
/// [`aggregate`].
///
/// # Examples
/// ```rust
/// use sample_to_target::estimation::{aggregate::correlated_mean_error, EstimatorOptions};
///
/// let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
/// let est = correlated_mean_error(&data, Some(1.0), &EstimatorOptions::default()).unwrap();
/// assert_eq!(est.mean, 5.0);
/// assert_eq!(est.effective_sample_size, 8.0);
/// ```
pub fn correlated_mean_error(
    data: &[f64], tau: Option<f64>, opts: &EstimatorOptions,
) -> EstimationResult<CorrelatedEstimate> {
    opts.validate()?;
    let moments = SampleMoments::from_slice(data)?;
    let estimate = match tau {
        Some(tau) => TauEstimate::Known { tau },
        None => tau_for_sample(data, opts)?,
    };
    let result = aggregate(&moments, estimate.value(), opts)?;
    if estimate.is_converged() {
        Ok(result)
    } else {
        Ok(result.downgraded())
    }
}
