//! Sampling options — targets, resource budget and the combined config.
//!
//! Purpose
//! -------
//! Describe when the adaptive loop may stop ([`Targets`]), how it grows and
//! how far it may grow ([`Budget`]), and bundle both with the estimator
//! options into a [`SamplerConfig`] validated once at loop entry.
//!
//! Key behaviors
//! -------------
//! - Validated constructors (`new`) plus a `validate()` re-check for values
//!   built with struct literals.
//! - At least one target and at least one resource bound are required, so
//!   every validated configuration terminates.
//!
//! Invariants & assumptions
//! ------------------------
//! - Thresholds are finite and > 0; caps are ≥ 1.
//! - `initial_batch_size ≤ max_total_samples` when a sample cap is set.
use crate::{
    estimation::options::EstimatorOptions,
    sampling::{
        driver::{sample_to_target, TargetOutcome},
        errors::{ConfigError, ConfigResult, SamplingResult},
        source::SampleSource,
    },
};
use std::time::Duration;

/// Default size of the first callback request.
pub const DEFAULT_INITIAL_BATCH_SIZE: usize = 100;

/// Default cap on evaluation passes. With doubling, 12 passes from a batch of
/// 100 hold 100·2¹¹ = 204 800 samples; a stream whose τ never converges stops
/// there with `ResourceExhausted`.
pub const DEFAULT_MAX_ITERATIONS: usize = 12;

/// Targets — stopping criteria of the loop.
///
/// Fields
/// ------
/// - `margin`: stop once the margin of error is ≤ this value.
/// - `ess`: stop once the effective sample size is ≥ this value.
/// - `timeout`: stop once elapsed wall-clock time is ≥ this duration.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Targets {
    pub margin: Option<f64>,
    pub ess: Option<f64>,
    pub timeout: Option<Duration>,
}

impl Targets {
    /// Construct validated targets.
    ///
    /// # Errors
    /// - [`ConfigError::NoTargetsProvided`] if all three are `None`.
    /// - `InvalidMarginTarget` / `InvalidEssTarget` / `InvalidTimeout` for
    ///   non-positive or non-finite thresholds.
    pub fn new(
        margin: Option<f64>, ess: Option<f64>, timeout: Option<Duration>,
    ) -> ConfigResult<Self> {
        let targets = Targets { margin, ess, timeout };
        targets.validate()?;
        Ok(targets)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.margin.is_none() && self.ess.is_none() && self.timeout.is_none() {
            return Err(ConfigError::NoTargetsProvided);
        }
        if let Some(value) = self.margin {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidMarginTarget {
                    value,
                    reason: "must be finite and strictly positive.",
                });
            }
        }
        if let Some(value) = self.ess {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidEssTarget {
                    value,
                    reason: "must be finite and strictly positive.",
                });
            }
        }
        if let Some(timeout) = self.timeout {
            if timeout.is_zero() {
                return Err(ConfigError::InvalidTimeout {
                    secs: timeout.as_secs_f64(),
                    reason: "must be non-zero.",
                });
            }
        }
        Ok(())
    }

    /// Run `source` against these targets with default options.
    ///
    /// # Errors
    /// As [`sample_to_target`].
    pub fn sample<S: SampleSource + ?Sized>(&self, source: &mut S) -> SamplingResult<TargetOutcome> {
        let config = SamplerConfig::with_targets(*self)?;
        sample_to_target(source, &config)
    }
}

/// Budget — growth schedule and resource caps.
///
/// Fields
/// ------
/// - `initial_batch_size`: size of the first request (≥ 1).
/// - `max_total_samples`: optional hard cap on the accumulated sample.
/// - `max_iterations`: optional cap on evaluation passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Budget {
    pub initial_batch_size: usize,
    pub max_total_samples: Option<usize>,
    pub max_iterations: Option<usize>,
}

impl Budget {
    pub fn new(
        initial_batch_size: usize, max_total_samples: Option<usize>,
        max_iterations: Option<usize>,
    ) -> ConfigResult<Self> {
        let budget = Budget { initial_batch_size, max_total_samples, max_iterations };
        budget.validate()?;
        Ok(budget)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.initial_batch_size == 0 {
            return Err(ConfigError::InvalidInitialBatchSize {
                value: 0,
                reason: "must be at least 1.",
            });
        }
        if let Some(max_total) = self.max_total_samples {
            if max_total == 0 {
                return Err(ConfigError::InvalidMaxTotalSamples {
                    value: 0,
                    reason: "must be at least 1.",
                });
            }
            if self.initial_batch_size > max_total {
                return Err(ConfigError::InvalidInitialBatchSize {
                    value: self.initial_batch_size,
                    reason: "must not exceed max_total_samples.",
                });
            }
        }
        if self.max_iterations == Some(0) {
            return Err(ConfigError::InvalidMaxIterations {
                value: 0,
                reason: "must be at least 1.",
            });
        }
        Ok(())
    }

    fn is_bounded(&self) -> bool {
        self.max_total_samples.is_some() || self.max_iterations.is_some()
    }
}

impl Default for Budget {
    fn default() -> Self {
        Budget {
            initial_batch_size: DEFAULT_INITIAL_BATCH_SIZE,
            max_total_samples: None,
            max_iterations: Some(DEFAULT_MAX_ITERATIONS),
        }
    }
}

/// SamplerConfig — everything one sample-to-target run needs.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplerConfig {
    pub targets: Targets,
    pub estimator: EstimatorOptions,
    pub budget: Budget,
}

impl SamplerConfig {
    /// Construct a validated configuration.
    ///
    /// # Errors
    /// Any error of [`Targets::validate`], [`Budget::validate`] or the
    /// estimator options, and [`ConfigError::NoResourceBound`] if neither a
    /// timeout nor a budget cap is set.
    pub fn new(
        targets: Targets, estimator: EstimatorOptions, budget: Budget,
    ) -> ConfigResult<Self> {
        let config = SamplerConfig { targets, estimator, budget };
        config.validate()?;
        Ok(config)
    }

    /// Targets with default estimator options and budget.
    pub fn with_targets(targets: Targets) -> ConfigResult<Self> {
        Self::new(targets, EstimatorOptions::default(), Budget::default())
    }

    pub fn validate(&self) -> ConfigResult<()> {
        self.targets.validate()?;
        self.estimator.validate()?;
        self.budget.validate()?;
        if self.targets.timeout.is_none() && !self.budget.is_bounded() {
            return Err(ConfigError::NoResourceBound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        estimation::errors::EstimationError,
        sampling::{evaluator::TerminationReason, synthetic::Ar1Process},
    };

    #[test]
    // Purpose
    // -------
    // An empty target set is a configuration error.
    //
    // Given
    // -----
    // - `Targets::default()` (nothing set).
    //
    // Expect
    // ------
    // - `NoTargetsProvided` from both `new` and `SamplerConfig::with_targets`.
    fn targets_require_at_least_one_criterion() {
        assert_eq!(Targets::new(None, None, None), Err(ConfigError::NoTargetsProvided));
        assert_eq!(
            SamplerConfig::with_targets(Targets::default()),
            Err(ConfigError::NoTargetsProvided)
        );
    }

    #[test]
    fn targets_reject_non_positive_thresholds() {
        assert!(matches!(
            Targets::new(Some(0.0), None, None),
            Err(ConfigError::InvalidMarginTarget { .. })
        ));
        assert!(matches!(
            Targets::new(None, Some(f64::NAN), None),
            Err(ConfigError::InvalidEssTarget { .. })
        ));
        assert!(matches!(
            Targets::new(None, None, Some(Duration::ZERO)),
            Err(ConfigError::InvalidTimeout { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // The loop must be bounded by a timeout or a budget cap.
    //
    // Given
    // -----
    // - An ESS target with all caps removed, then the same with a timeout.
    //
    // Expect
    // ------
    // - `NoResourceBound`, then Ok.
    fn sampler_config_requires_a_resource_bound() {
        let targets = Targets { ess: Some(500.0), ..Targets::default() };
        let unbounded = Budget { max_iterations: None, ..Budget::default() };
        assert_eq!(
            SamplerConfig::new(targets, EstimatorOptions::default(), unbounded),
            Err(ConfigError::NoResourceBound)
        );

        let timed = Targets { timeout: Some(Duration::from_secs(1)), ..targets };
        assert!(SamplerConfig::new(timed, EstimatorOptions::default(), unbounded).is_ok());
    }

    #[test]
    fn budget_checks_initial_batch_against_cap() {
        assert!(matches!(
            Budget::new(200, Some(100), None),
            Err(ConfigError::InvalidInitialBatchSize { value: 200, .. })
        ));
        assert!(matches!(Budget::new(0, None, Some(5)), Err(ConfigError::InvalidInitialBatchSize { .. })));
        assert!(matches!(
            Budget::new(10, None, Some(0)),
            Err(ConfigError::InvalidMaxIterations { .. })
        ));
    }

    #[test]
    fn sampler_config_wraps_estimator_errors() {
        let estimator = EstimatorOptions { confidence: 1.5, ..EstimatorOptions::default() };
        let targets = Targets { margin: Some(0.1), ..Targets::default() };
        assert!(matches!(
            SamplerConfig::new(targets, estimator, Budget::default()),
            Err(ConfigError::Estimator(EstimationError::InvalidConfidence { .. }))
        ));
    }

    #[test]
    // Purpose
    // -------
    // `Targets::sample` runs the loop with the default budget and options.
    //
    // Given
    // -----
    // - White noise and an ESS target of 150; the same targets left empty.
    //
    // Expect
    // ------
    // - `EssReached` with ESS ≥ 150; a configuration error for empty targets.
    fn targets_sample_runs_with_default_config() {
        let targets = Targets { ess: Some(150.0), ..Targets::default() };
        let outcome = targets.sample(&mut Ar1Process::white_noise(4).unwrap()).unwrap();
        assert_eq!(outcome.termination, TerminationReason::EssReached);
        assert!(outcome.effective_sample_size >= 150.0);

        assert!(Targets::default().sample(&mut Ar1Process::white_noise(4).unwrap()).is_err());
    }

    #[test]
    fn default_budget_caps_iterations() {
        let budget = Budget::default();
        assert_eq!(budget.initial_batch_size, DEFAULT_INITIAL_BATCH_SIZE);
        assert_eq!(budget.max_iterations, Some(DEFAULT_MAX_ITERATIONS));
        assert_eq!(budget.max_total_samples, None);
    }
}
