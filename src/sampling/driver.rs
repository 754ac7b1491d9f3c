//! sampling::driver — the sample-to-target state machine.
//!
//! Purpose
//! -------
//! Grow a sample from a [`SampleSource`] until a
//! [`Targets`](crate::sampling::options::Targets) criterion is
//! met, re-estimating τ, ESS and the margin of error on the full sample after
//! every batch.
//!
//! Key behaviors
//! -------------
//! - Phases `Init → Evaluating → {Sampling → Evaluating, Done}`.
//! - `Init` validates the configuration and requests `initial_batch_size`
//!   samples. `Sampling` requests as many samples as are already held, so the
//!   total doubles each round and there are O(log n) evaluation passes.
//! - `Evaluating` runs ACF → τ → aggregation on the whole sample, records the
//!   result in [`LoopState`] and asks [`evaluate`] whether to stop.
//! - Short or constant samples and non-converged τ only mean "continue".
//!   They become fatal (`InsufficientData`) if the loop has to stop with no
//!   estimate at all.
//! - `max_iterations` and `max_total_samples` end the loop with
//!   `ResourceExhausted`. The last request is clipped to the remaining sample
//!   capacity.
//!
//! Invariants & assumptions
//! ------------------------
//! - Elapsed time is measured from loop entry and checked only between
//!   callback invocations; a running callback is never interrupted.
//! - The sample is append-only and owned by one run; runs share nothing.
//!
//! Downstream usage
//! ----------------
//! ```rust
//! use sample_to_target::sampling::prelude::*;
//!
//! let mut source = Ar1Process::new(0.5, 1.0, 7)?;
//! let config = SamplerConfig::with_targets(Targets { ess: Some(200.0), ..Targets::default() })?;
//! let outcome = sample_to_target(&mut source, &config)?;
//! assert_eq!(outcome.termination, TerminationReason::EssReached);
//! assert!(outcome.effective_sample_size >= 200.0);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
use crate::{
    autocorrelation::tau::TauEstimate,
    estimation::{
        aggregate::{aggregate, tau_for_sample, ConfidenceFlag, CorrelatedEstimate},
        errors::{EstimationError, EstimationResult},
        moments::SampleMoments,
    },
    sampling::{
        errors::{ConfigResult, ResourceLimit, SamplingError, SamplingResult},
        evaluator::{evaluate, Decision, TerminationReason},
        options::SamplerConfig,
        source::SampleSource,
        state::LoopState,
    },
};
use std::time::{Duration, Instant};

/// TargetOutcome — result of a successful run.
///
/// Fields
/// ------
/// - `mean`, `margin_of_error`, `effective_sample_size`, `tau`: final
///   estimate on the full sample.
/// - `tau_estimate`: how τ was obtained (converged, known, or best effort
///   after a timeout).
/// - `total_samples`, `iterations`, `elapsed`: resources used.
/// - `termination`: which target stopped the loop.
/// - `confidence`: `LowConfidence` when ESS is below the floor or τ did not
///   converge.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetOutcome {
    pub mean: f64,
    pub margin_of_error: f64,
    pub effective_sample_size: f64,
    pub tau: f64,
    pub tau_estimate: TauEstimate,
    pub total_samples: usize,
    pub iterations: usize,
    pub elapsed: Duration,
    pub termination: TerminationReason,
    pub confidence: ConfidenceFlag,
}

/// A validated sampling routine; each [`SampleToTarget::run`] is independent.
#[derive(Debug, Clone)]
pub struct SampleToTarget {
    config: SamplerConfig,
}

impl SampleToTarget {
    /// # Errors
    /// Any [`crate::sampling::errors::ConfigError`] of the configuration.
    pub fn new(config: SamplerConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(SampleToTarget { config })
    }

    /// Drive `source` until a target is met.
    ///
    /// # Errors
    /// - `CallbackFailure` if the source fails or returns a malformed batch.
    /// - `ResourceExhausted` if a budget cap is hit first.
    /// - `InsufficientData` if the loop must stop without any estimate.
    pub fn run<S: SampleSource + ?Sized>(&self, source: &mut S) -> SamplingResult<TargetOutcome> {
        Run::new(&self.config).drive(source)
    }
}

/// Validate `config` and run the loop once.
///
/// # Errors
/// `SamplingError::Configuration` before any callback invocation, or any
/// error of [`SampleToTarget::run`].
pub fn sample_to_target<S: SampleSource + ?Sized>(
    source: &mut S, config: &SamplerConfig,
) -> SamplingResult<TargetOutcome> {
    config.validate()?;
    Run::new(config).drive(source)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Init,
    Sampling,
    Evaluating,
    Done(TerminationReason),
}

struct Run<'c> {
    config: &'c SamplerConfig,
    sample: Vec<f64>,
    state: LoopState,
    start: Instant,
    last_data_error: Option<EstimationError>,
}

impl<'c> Run<'c> {
    fn new(config: &'c SamplerConfig) -> Self {
        Run {
            config,
            sample: Vec::with_capacity(config.budget.initial_batch_size),
            state: LoopState::new(),
            start: Instant::now(),
            last_data_error: None,
        }
    }

    fn drive<S: SampleSource + ?Sized>(mut self, source: &mut S) -> SamplingResult<TargetOutcome> {
        let mut phase = Phase::Init;
        loop {
            phase = match phase {
                Phase::Init => {
                    self.request(source, self.config.budget.initial_batch_size)?;
                    Phase::Evaluating
                }
                Phase::Evaluating => match self.evaluate_round()?.termination() {
                    Some(reason) => Phase::Done(reason),
                    None => Phase::Sampling,
                },
                Phase::Sampling => {
                    let n = self.next_request()?;
                    self.request(source, n)?;
                    Phase::Evaluating
                }
                Phase::Done(reason) => return self.finish(reason),
            };
        }
    }

    fn request<S: SampleSource + ?Sized>(&mut self, source: &mut S, n: usize) -> SamplingResult<()> {
        let batch = match source.sample(n) {
            Ok(batch) => batch,
            Err(err) => return Err(self.callback_failure(format!("{err:#}"))),
        };
        if batch.len() != n {
            return Err(self.callback_failure(format!(
                "requested {n} samples, callback returned {}",
                batch.len()
            )));
        }
        if let Some((index, value)) = batch.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(self.callback_failure(format!(
                "callback returned non-finite value {value} at batch index {index}"
            )));
        }

        self.sample.extend(batch);
        self.state.record_batch(self.sample.len());
        Ok(())
    }

    fn evaluate_round(&mut self) -> SamplingResult<Decision> {
        let config = self.config;
        let round = estimate_round(&self.sample, config);
        let elapsed = self.start.elapsed();

        match round {
            Ok((tau, estimate)) => {
                tracing::debug!(
                    "iteration {}: n = {}, tau = {:.4} ({}), ess = {:.1}, margin = {:.6}, elapsed = {:?}",
                    self.state.iterations + 1,
                    self.sample.len(),
                    estimate.tau,
                    if tau.is_converged() { "converged" } else { "not converged" },
                    estimate.effective_sample_size,
                    estimate.margin_of_error,
                    elapsed
                );
                self.last_data_error = None;
                self.state.record_evaluation(elapsed, Some(tau), Some(estimate));
            }
            Err(err) if is_recoverable(&err) => {
                tracing::debug!(
                    "iteration {}: n = {}, no estimate yet: {}",
                    self.state.iterations + 1,
                    self.sample.len(),
                    err
                );
                self.state.record_evaluation(elapsed, None, None);
                self.last_data_error = Some(err);
            }
            Err(err) => {
                return Err(SamplingError::InsufficientData { source: err, partial: self.partial() });
            }
        }
        Ok(evaluate(&self.state, &config.targets))
    }

    /// Size of the next request: the current total, clipped to the sample cap.
    fn next_request(&self) -> SamplingResult<usize> {
        let budget = &self.config.budget;
        if let Some(limit) = budget.max_iterations {
            if self.state.iterations >= limit {
                return Err(self.exhausted(ResourceLimit::MaxIterations { limit }));
            }
        }

        let mut n = self.sample.len().max(1);
        if let Some(limit) = budget.max_total_samples {
            let remaining = limit.saturating_sub(self.sample.len());
            if remaining == 0 {
                return Err(self.exhausted(ResourceLimit::MaxTotalSamples { limit }));
            }
            n = n.min(remaining);
        }
        Ok(n)
    }

    fn finish(&self, termination: TerminationReason) -> SamplingResult<TargetOutcome> {
        let (Some(tau_estimate), Some(estimate)) = (self.state.tau, self.state.estimate) else {
            let source = self
                .last_data_error
                .clone()
                .unwrap_or(EstimationError::InsufficientData { len: self.sample.len() });
            tracing::warn!(
                "sampling stopped ({}) after {} samples without any estimate: {}",
                termination,
                self.sample.len(),
                source
            );
            return Err(SamplingError::InsufficientData { source, partial: self.partial() });
        };

        if estimate.is_low_confidence() {
            tracing::warn!(
                "low-confidence result: ess = {:.1}, tau {}",
                estimate.effective_sample_size,
                if tau_estimate.is_converged() { "converged" } else { "not converged" }
            );
        }
        tracing::info!(
            "sampling finished ({}): n = {}, mean = {}, margin = {}, ess = {:.1}, tau = {:.4}, iterations = {}",
            termination,
            self.sample.len(),
            estimate.mean,
            estimate.margin_of_error,
            estimate.effective_sample_size,
            estimate.tau,
            self.state.iterations
        );

        Ok(TargetOutcome {
            mean: estimate.mean,
            margin_of_error: estimate.margin_of_error,
            effective_sample_size: estimate.effective_sample_size,
            tau: estimate.tau,
            tau_estimate,
            total_samples: self.sample.len(),
            iterations: self.state.iterations,
            elapsed: self.state.elapsed,
            termination,
            confidence: estimate.confidence,
        })
    }

    fn partial(&self) -> Box<LoopState> {
        let mut partial = self.state.clone();
        partial.elapsed = self.start.elapsed();
        Box::new(partial)
    }

    fn callback_failure(&self, reason: String) -> SamplingError {
        tracing::warn!("sampling callback failed after {} samples: {}", self.sample.len(), reason);
        SamplingError::CallbackFailure { reason, partial: self.partial() }
    }

    fn exhausted(&self, limit: ResourceLimit) -> SamplingError {
        if let (None, Some(source)) = (&self.state.estimate, &self.last_data_error) {
            tracing::warn!("{} reached without any estimate: {}", limit, source);
            return SamplingError::InsufficientData {
                source: source.clone(),
                partial: self.partial(),
            };
        }
        tracing::warn!(
            "{} reached after {} samples without meeting a target",
            limit,
            self.sample.len()
        );
        SamplingError::ResourceExhausted { limit, partial: self.partial() }
    }
}

/// One evaluation pass on the full sample. A non-converged τ yields its
/// best-effort estimate, flagged `LowConfidence`.
fn estimate_round(
    sample: &[f64], config: &SamplerConfig,
) -> EstimationResult<(TauEstimate, CorrelatedEstimate)> {
    let opts = &config.estimator;
    let moments = SampleMoments::from_slice(sample)?;
    let tau = tau_for_sample(sample, opts)?;
    let estimate = aggregate(&moments, tau.value(), opts)?;
    if tau.is_converged() {
        Ok((tau, estimate))
    } else {
        Ok((tau, estimate.downgraded()))
    }
}

fn is_recoverable(err: &EstimationError) -> bool {
    match err {
        EstimationError::InsufficientData { .. } => true,
        EstimationError::Autocorr(inner) => inner.is_recoverable(),
        _ => false,
    }
}
