//! sampling — adaptive "sample to target" loop.
//!
//! Purpose
//! -------
//! Repeatedly request more observations from a user-supplied source, re-run
//! the autocorrelation and estimation pipeline on the full sample, and stop
//! once a margin-of-error, effective-sample-size or timeout target is met.
//!
//! Key behaviors
//! -------------
//! - [`driver`]: the explicit `Init → Evaluating → {Sampling, Done}` state
//!   machine with a doubling growth schedule.
//! - [`evaluator`]: pure continue/stop decision with priority
//!   timeout > ESS > margin.
//! - [`options`]: [`Targets`], [`Budget`] and [`SamplerConfig`].
//! - [`source`]: the [`SampleSource`] seam; closures qualify.
//! - [`synthetic`]: seeded AR(1) source with a known τ.
//! - [`state`]: [`LoopState`], attached to every fatal error.
//!
//! Invariants & assumptions
//! ------------------------
//! - Single-threaded and synchronous: the driver blocks on each callback.
//! - Every validated configuration terminates: at least one target and at
//!   least one of timeout / sample cap / iteration cap are required.

pub mod driver;
pub mod errors;
pub mod evaluator;
pub mod options;
pub mod source;
pub mod state;
pub mod synthetic;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::driver::{sample_to_target, SampleToTarget, TargetOutcome};
pub use self::errors::{ConfigError, ConfigResult, ResourceLimit, SamplingError, SamplingResult};
pub use self::evaluator::{evaluate, Decision, TerminationReason};
pub use self::options::{Budget, SamplerConfig, Targets};
pub use self::source::SampleSource;
pub use self::state::LoopState;
pub use self::synthetic::Ar1Process;

pub mod prelude {
    pub use super::driver::{sample_to_target, SampleToTarget, TargetOutcome};
    pub use super::errors::{ConfigError, SamplingError};
    pub use super::evaluator::TerminationReason;
    pub use super::options::{Budget, SamplerConfig, Targets};
    pub use super::source::SampleSource;
    pub use super::synthetic::Ar1Process;
}
