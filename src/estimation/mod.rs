//! estimation — effective sample size, standard error and margin of error
//! for correlated samples.
//!
//! Purpose
//! -------
//! Turn a raw sample plus its autocorrelation time into the summary the
//! sampling loop reports: mean, ESS, standard error, margin of error and a
//! confidence flag.
//!
//! Key behaviors
//! -------------
//! - [`moments`]: mean and unbiased variance.
//! - [`interval`]: normal / Student-t critical values (`statrs`).
//! - [`aggregate`]: ESS formulas, the margin of error and the
//!   LowConfidence floor; one-shot [`correlated_mean_error`].
//! - [`options`]: [`EstimatorOptions`] shared with the sampling driver.
//! - [`downsample`]: random thinning of a correlated series.
//!
//! Conventions
//! -----------
//! - The ACF normalizes by the population variance; the standard error
//!   uses the unbiased variance.
//! - Every error is an [`EstimationError`]; autocorrelation failures are
//!   wrapped, not flattened.

pub mod aggregate;
pub mod downsample;
pub mod errors;
pub mod interval;
pub mod moments;
pub mod options;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::aggregate::{
    aggregate, correlated_mean_error, effective_sample_size, tau_for_sample, ConfidenceFlag,
    CorrelatedEstimate, EssFormula,
};
pub use self::downsample::downsample;
pub use self::errors::{EstimationError, EstimationResult};
pub use self::interval::{critical_value, IntervalKind, DEFAULT_CONFIDENCE};
pub use self::moments::SampleMoments;
pub use self::options::{EstimatorOptions, DEFAULT_ESS_CONFIDENCE_FLOOR};

pub mod prelude {
    pub use super::aggregate::{correlated_mean_error, ConfidenceFlag, CorrelatedEstimate, EssFormula};
    pub use super::errors::{EstimationError, EstimationResult};
    pub use super::interval::IntervalKind;
    pub use super::options::EstimatorOptions;
}
