//! autocorrelation::tau — integrated autocorrelation time with automatic
//! windowing.
//!
//! Purpose
//! -------
//! Turn an empirical ACF into a single integrated autocorrelation time
//!
//! ```text
//! τ(M) = 1 + 2 · Σ_{k=1}^{M} ρ̂ₖ
//! ```
//!
//! choosing the truncation point M by the self-consistent window rule: the
//! smallest M with `M ≥ C · τ(M)`. Integrating too many lags accumulates
//! noise, truncating too early underestimates τ; tying M to τ itself
//! balances the two.
//!
//! Key behaviors
//! -------------
//! - Scan k = 1, 2, …, K once (O(K)) and stop at the first admissible M.
//! - Clamp the reported τ to at least 1, the uncorrelated limit.
//! - Report [`TauEstimate::NotConverged`] when no M ≤ K satisfies the rule.
//!   This is a signal to keep sampling, not an error, and it carries a
//!   best-effort τ(K) for reporting after a timeout.
//!
//! Invariants & assumptions
//! ------------------------
//! - `C` is finite and > 0 (validated here).
//! - The ACF passed in satisfies ρ̂₀ = 1; only ρ̂₁,…,ρ̂_K are summed.
//!
//! Testing notes
//! -------------
//! - Unit tests exercise white-noise and geometric ACFs with known windows,
//!   anti-correlated data (clamp), short lag ranges (no convergence), and
//!   statistical recovery of τ on seeded i.i.d. and AR(1) series.

use crate::autocorrelation::{
    acf::AutocorrelationFunction, errors::AutocorrResult,
    validation::validate_truncation_constant,
};
use ndarray::ArrayView1;

/// Default self-consistent window constant C.
pub const DEFAULT_TRUNCATION_CONSTANT: f64 = 5.0;

/// TauEstimate — outcome of the integrated autocorrelation-time estimator.
///
/// Variants
/// --------
/// - `Converged { tau, window }`
///   The window rule was satisfied at M = `window`; `tau ≥ 1`.
/// - `NotConverged { best_effort, max_lag }`
///   No M ≤ K = `max_lag` satisfied the rule. `best_effort` is τ(K)
///   clamped to ≥ 1 and is only meaningful as a low-confidence fallback.
/// - `Known { tau }`
///   τ was supplied by the caller and no estimation took place.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TauEstimate {
    Converged { tau: f64, window: usize },
    NotConverged { best_effort: f64, max_lag: usize },
    Known { tau: f64 },
}

impl TauEstimate {
    /// τ if it can be trusted (converged or known), `None` otherwise.
    pub fn tau(&self) -> Option<f64> {
        match *self {
            TauEstimate::Converged { tau, .. } | TauEstimate::Known { tau } => Some(tau),
            TauEstimate::NotConverged { .. } => None,
        }
    }

    /// τ including the best-effort fallback of a non-converged scan.
    pub fn value(&self) -> f64 {
        match *self {
            TauEstimate::Converged { tau, .. } | TauEstimate::Known { tau } => tau,
            TauEstimate::NotConverged { best_effort, .. } => best_effort,
        }
    }

    pub fn is_converged(&self) -> bool {
        !matches!(self, TauEstimate::NotConverged { .. })
    }
}

/// Integrate an ACF with the self-consistent window rule.
///
/// Parameters
/// ----------
/// - `acf`: [`AutocorrelationFunction`]
///   Normalized ACF up to lag K.
/// - `truncation_constant`: `f64`
///   Window constant C > 0 (default [`DEFAULT_TRUNCATION_CONSTANT`]).
///
/// Returns
/// -------
/// `AutocorrResult<TauEstimate>`
///   `Converged` or `NotConverged`; never `Known`.
///
/// Errors
/// ------
/// - `AutocorrError::InvalidTruncationConstant` if C is not finite and > 0.
pub fn integrated_tau(
    acf: &AutocorrelationFunction, truncation_constant: f64,
) -> AutocorrResult<TauEstimate> {
    validate_truncation_constant(truncation_constant)?;
    Ok(integrate_acf(acf.rho().view(), truncation_constant))
}

/// Compute the ACF of `data` and integrate it in one call.
///
/// Convenience for callers that do not need the ACF itself; see
/// [`AutocorrelationFunction::compute`] for the lag-range arguments.
///
/// # Errors
/// Any error of [`AutocorrelationFunction::compute`] or [`integrated_tau`].
///
/// # Examples
/// ```rust
/// use sample_to_target::autocorrelation::tau::{estimate_tau, TauEstimate};
///
/// let data: Vec<f64> = (0..400).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
/// let estimate = estimate_tau(&data, 0.25, None, 5.0).unwrap();
/// // Alternating data is anti-correlated: τ is clamped to 1.
/// assert_eq!(estimate, TauEstimate::Converged { tau: 1.0, window: 1 });
/// ```
pub fn estimate_tau(
    data: &[f64], max_lag_fraction: f64, max_lag: Option<usize>, truncation_constant: f64,
) -> AutocorrResult<TauEstimate> {
    validate_truncation_constant(truncation_constant)?;
    let acf = AutocorrelationFunction::compute(data, max_lag_fraction, max_lag)?;
    integrated_tau(&acf, truncation_constant)
}

/// Window scan over ρ̂₀,…,ρ̂_K; `c` is assumed valid.
pub(crate) fn integrate_acf(rho: ArrayView1<f64>, c: f64) -> TauEstimate {
    let max_lag = rho.len().saturating_sub(1);
    let mut running = 1.0;
    for (m, &rho_m) in rho.iter().enumerate().skip(1) {
        running += 2.0 * rho_m;
        if m as f64 >= c * running {
            return TauEstimate::Converged { tau: running.max(1.0), window: m };
        }
    }
    TauEstimate::NotConverged { best_effort: running.max(1.0), max_lag }
}
