//! Target evaluator — continue or stop, and why.
//!
//! Order of checks:
//! 1. timeout (elapsed ≥ timeout), which always wins so the loop terminates
//!    even when the estimators are degenerate;
//! 2. ESS target (ESS ≥ target);
//! 3. margin target (margin ≤ target).
//!
//! Without a trustworthy estimate (τ not converged, or the sample could not
//! support one) only the timeout can stop the loop.
use crate::sampling::{options::Targets, state::LoopState};

/// Outcome of one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Continue,
    StopTimeout,
    StopEssReached,
    StopMarginReached,
}

impl Decision {
    /// Termination reason for stopping decisions; `None` for `Continue`.
    pub fn termination(self) -> Option<TerminationReason> {
        match self {
            Decision::Continue => None,
            Decision::StopTimeout => Some(TerminationReason::Timeout),
            Decision::StopEssReached => Some(TerminationReason::EssReached),
            Decision::StopMarginReached => Some(TerminationReason::MarginReached),
        }
    }
}

/// Why a successful run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    MarginReached,
    EssReached,
    Timeout,
}

impl TerminationReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            TerminationReason::MarginReached => "margin_reached",
            TerminationReason::EssReached => "ess_reached",
            TerminationReason::Timeout => "timeout",
        }
    }
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compare the loop state against the targets.
pub fn evaluate(state: &LoopState, targets: &Targets) -> Decision {
    if let Some(timeout) = targets.timeout {
        if state.elapsed >= timeout {
            return Decision::StopTimeout;
        }
    }

    let Some(estimate) = state.converged_estimate() else {
        return Decision::Continue;
    };

    if let Some(ess) = targets.ess {
        if estimate.effective_sample_size >= ess {
            return Decision::StopEssReached;
        }
    }
    if let Some(margin) = targets.margin {
        if estimate.margin_of_error <= margin {
            return Decision::StopMarginReached;
        }
    }
    Decision::Continue
}
