//! LoopState — transient bookkeeping of one sample-to-target call.
//!
//! Holds the latest evaluation summary, not the sample itself; the driver
//! owns the growing buffer. A copy of the state travels inside fatal
//! [`crate::sampling::errors::SamplingError`]s for diagnostics.
use crate::{
    autocorrelation::tau::TauEstimate,
    estimation::aggregate::CorrelatedEstimate,
};
use std::time::Duration;

/// Snapshot of the adaptive loop after the most recent evaluation.
///
/// Fields
/// ------
/// - `total_samples`: size of the accumulated sample.
/// - `iterations`: number of completed evaluation passes.
/// - `batches`: number of callback invocations that succeeded.
/// - `elapsed`: wall-clock time since loop entry, taken after the last
///   evaluation (includes callback and estimator time).
/// - `tau`: latest τ estimate; `None` before the first evaluation or when
///   the sample could not support one.
/// - `estimate`: latest mean / ESS / margin. When `tau` is not converged
///   this is the best-effort, `LowConfidence` estimate.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LoopState {
    pub total_samples: usize,
    pub iterations: usize,
    pub batches: usize,
    pub elapsed: Duration,
    pub tau: Option<TauEstimate>,
    pub estimate: Option<CorrelatedEstimate>,
}

impl LoopState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for a batch appended to the sample.
    pub fn record_batch(&mut self, total_samples: usize) {
        self.total_samples = total_samples;
        self.batches += 1;
    }

    /// Store the outcome of one evaluation pass.
    pub fn record_evaluation(
        &mut self, elapsed: Duration, tau: Option<TauEstimate>,
        estimate: Option<CorrelatedEstimate>,
    ) {
        self.iterations += 1;
        self.elapsed = elapsed;
        self.tau = tau;
        self.estimate = estimate;
    }

    /// Latest estimate, only if τ is trustworthy (converged or known).
    pub fn converged_estimate(&self) -> Option<&CorrelatedEstimate> {
        match self.tau {
            Some(tau) if tau.is_converged() => self.estimate.as_ref(),
            _ => None,
        }
    }

    pub fn margin_of_error(&self) -> Option<f64> {
        self.estimate.map(|e| e.margin_of_error)
    }
}
