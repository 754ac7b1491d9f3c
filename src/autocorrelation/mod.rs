//! autocorrelation — empirical ACF and integrated autocorrelation time.
//!
//! Purpose
//! -------
//! Quantify how strongly successive observations of a stationary scalar
//! process depend on each other. The subtree provides the two leaf stages of
//! every sampling round: the normalized autocorrelation function ρ̂ₖ and the
//! integrated autocorrelation time τ obtained from it with an automatic,
//! self-consistent truncation window.
//!
//! Key behaviors
//! -------------
//! - [`AutocorrelationFunction::compute`] builds ρ̂₀,…,ρ̂_K from the full
//!   sample with K = min(n − 1, ⌊f·n⌋).
//! - [`integrated_tau`] scans the ACF once and returns a [`TauEstimate`]:
//!   converged, not converged (keep sampling), or caller-supplied.
//! - [`estimate_tau`] chains both for one-shot use.
//! - Input guards live in [`validation`]; failures are [`AutocorrError`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs are finite, stationary series; no detrending is performed.
//! - Everything is recomputed from scratch per call, so repeated calls on a
//!   frozen sample return exactly equal results.
//!
//! Downstream usage
//! ----------------
//! - The sampling driver calls these once per evaluation round and treats
//!   `TauEstimate::NotConverged` and recoverable errors as "continue".
//! - Library users can call [`estimate_tau`] directly on stored output:
//!
//!   ```rust
//!   use sample_to_target::autocorrelation::prelude::*;
//!
//!   let data: Vec<f64> = (0..256).map(|i| ((i * 37) % 17) as f64).collect();
//!   let tau: TauEstimate = estimate_tau(&data, 0.25, None, 5.0)?;
//!   # Ok::<(), AutocorrError>(())
//!   ```

pub mod acf;
pub mod errors;
pub mod tau;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::acf::{AutocorrelationFunction, DEFAULT_MAX_LAG_FRACTION};
pub use self::errors::{AutocorrError, AutocorrResult};
pub use self::tau::{estimate_tau, integrated_tau, TauEstimate, DEFAULT_TRUNCATION_CONSTANT};
pub use self::validation::validate_series;

pub mod prelude {
    pub use super::acf::AutocorrelationFunction;
    pub use super::errors::{AutocorrError, AutocorrResult};
    pub use super::tau::{estimate_tau, integrated_tau, TauEstimate};
}
