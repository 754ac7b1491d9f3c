//! Synthetic correlated sources for testing and calibration.
//!
//! [`Ar1Process`] generates the Gaussian AR(1) series
//!
//! ```text
//! x₀     ~ N(0, σ² / (1 − φ²))
//! xₜ₊₁   = φ·xₜ + εₜ,   εₜ ~ N(0, σ²)
//! ```
//!
//! whose ACF is ρₖ = φᵏ and whose integrated autocorrelation time is
//! τ* = (1 + φ) / (1 − φ). The chain starts in its stationary distribution,
//! so no burn-in is needed; φ = 0 gives i.i.d. normal draws.
use crate::sampling::{
    errors::{ConfigError, ConfigResult},
    source::SampleSource,
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::Normal;

/// |φ| must stay below `1 − STATIONARITY_MARGIN`.
pub const STATIONARITY_MARGIN: f64 = 1e-6;

/// Seeded Gaussian AR(1) process.
#[derive(Debug, Clone)]
pub struct Ar1Process {
    phi: f64,
    sigma: f64,
    noise: Normal<f64>,
    rng: StdRng,
    current: Option<f64>,
}

impl Ar1Process {
    /// # Errors
    /// [`ConfigError::InvalidProcessParameter`] if φ is not finite with
    /// |φ| < 1 − [`STATIONARITY_MARGIN`], or σ is not finite and > 0.
    pub fn new(phi: f64, sigma: f64, seed: u64) -> ConfigResult<Self> {
        if !phi.is_finite() || phi.abs() >= 1.0 - STATIONARITY_MARGIN {
            return Err(ConfigError::InvalidProcessParameter {
                name: "phi",
                value: phi,
                reason: "must satisfy |phi| < 1 for a stationary process.",
            });
        }
        if !sigma.is_finite() || sigma <= 0.0 {
            return Err(ConfigError::InvalidProcessParameter {
                name: "sigma",
                value: sigma,
                reason: "must be finite and strictly positive.",
            });
        }
        let noise = Normal::new(0.0, sigma).map_err(|_| ConfigError::InvalidProcessParameter {
            name: "sigma",
            value: sigma,
            reason: "rejected by the normal distribution.",
        })?;

        Ok(Ar1Process { phi, sigma, noise, rng: StdRng::seed_from_u64(seed), current: None })
    }

    /// I.i.d. N(0, 1) draws.
    pub fn white_noise(seed: u64) -> ConfigResult<Self> {
        Self::new(0.0, 1.0, seed)
    }

    /// Integrated autocorrelation time (1 + φ) / (1 − φ).
    pub fn true_tau(&self) -> f64 {
        (1.0 + self.phi) / (1.0 - self.phi)
    }

    /// Stationary standard deviation σ / sqrt(1 − φ²).
    pub fn stationary_std(&self) -> f64 {
        self.sigma / (1.0 - self.phi * self.phi).sqrt()
    }

    fn next_value(&mut self) -> f64 {
        let next = match self.current {
            None => self.stationary_std() * self.rng.sample::<f64, _>(rand_distr::StandardNormal),
            Some(prev) => self.phi * prev + self.rng.sample(self.noise),
        };
        self.current = Some(next);
        next
    }

    /// Draw `n` consecutive values, continuing the chain.
    pub fn generate(&mut self, n: usize) -> Vec<f64> {
        (0..n).map(|_| self.next_value()).collect()
    }
}

impl SampleSource for Ar1Process {
    fn sample(&mut self, n: usize) -> anyhow::Result<Vec<f64>> {
        Ok(self.generate(n))
    }
}
