//! autocorrelation::acf — normalized empirical autocorrelation function.
//!
//! Purpose
//! -------
//! Compute ρ̂ₖ for k = 0,…,K from the full current sample. This is the first
//! stage of every evaluation round; the result feeds the integrated
//! autocorrelation-time estimator in [`crate::autocorrelation::tau`].
//!
//! Key behaviors
//! -------------
//! - Centre the series on its full-sample mean x̄ once per call.
//! - Compute the lag-k autocovariance with an unbiased (1 / (n − k))
//!   denominator and normalize by the population variance γ̂₀.
//! - Obtain all lagged cross-products at once through a zero-padded FFT
//!   (Wiener–Khinchin), so a round costs O(n log n) instead of O(n · K).
//! - Set ρ̂₀ = 1 exactly, independent of rounding.
//! - Bound the lag range by `K = min(n − 1, ⌊f · n⌋)` (default f = 1/4) and
//!   by an optional absolute cap.
//!
//! Invariants & assumptions
//! ------------------------
//! - The input is stationary; no detrending is attempted.
//! - The ACF is recomputed from scratch each round. Caching partial sums
//!   across doubling rounds is possible but not done here.
//! - Zero-variance samples are rejected with `AutocorrError::ZeroVariance`
//!   because ρ̂ₖ would be 0/0. Only exactly constant data (or a variance that
//!   underflows to 0) qualifies; a large offset with small fluctuations is a
//!   valid sample.
//!
//! Conventions
//! -----------
//! - Lag k pairs (xᵢ, xᵢ₊ₖ) for i = 0,…,n−k−1.
//! - ρ̂ₖ = (1/(n−k)) Σᵢ (xᵢ − x̄)(xᵢ₊ₖ − x̄) / γ̂₀ with
//!   γ̂₀ = (1/n) Σᵢ (xᵢ − x̄)².
//!
//! Testing notes
//! -------------
//! - Unit tests cover: ρ̂₀ = 1, the lag-range rule, a hand-computed short
//!   series, alternating (anti-correlated) data, agreement with the direct
//!   O(n · K) sum, offset data, and the error paths.

use crate::autocorrelation::{
    errors::{AutocorrError, AutocorrResult},
    validation::{validate_max_lag_fraction, validate_series},
};
use ndarray::{Array1, ArrayView1};
use rustfft::{num_complex::Complex, FftPlanner};

/// Default fraction of the sample length used as maximum lag.
pub const DEFAULT_MAX_LAG_FRACTION: f64 = 0.25;

/// AutocorrelationFunction — ρ̂₀,…,ρ̂_K of a frozen sample.
///
/// Purpose
/// -------
/// Hold the normalized ACF together with the sample moments it was built
/// from, so downstream stages do not recompute the mean and variance.
///
/// Fields
/// ------
/// - `rho`: `Array1<f64>` of length K + 1 with `rho[0] == 1.0`.
/// - `mean`: full-sample mean x̄.
/// - `variance`: population variance γ̂₀ used for the normalization.
///
/// Invariants
/// ----------
/// - `rho.len() ≥ 1` and `rho[0] == 1.0`.
/// - `rho.len() − 1 ≤ n − 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct AutocorrelationFunction {
    rho: Array1<f64>,
    mean: f64,
    variance: f64,
}

impl AutocorrelationFunction {
    /// Compute the ACF of `data` up to the lag bound implied by
    /// `max_lag_fraction` and the optional absolute `max_lag` cap.
    ///
    /// Parameters
    /// ----------
    /// - `data`: `&[f64]`
    ///   Sample in generation order; length n ≥ 2, all values finite.
    /// - `max_lag_fraction`: `f64`
    ///   Fraction f ∈ (0, 1] of n used as maximum lag.
    /// - `max_lag`: `Option<usize>`
    ///   Optional absolute cap on K.
    ///
    /// Returns
    /// -------
    /// `AutocorrResult<AutocorrelationFunction>` with
    /// `K = min(n − 1, ⌊f·n⌋, max_lag)`.
    ///
    /// Errors
    /// ------
    /// - `InsufficientData` if n < 2.
    /// - `NonFiniteData` for NaN/±∞ observations.
    /// - `ZeroVariance` if all observations are equal or γ̂₀ underflows to 0.
    /// - `InvalidMaxLagFraction` if f ∉ (0, 1].
    ///
    /// Examples
    /// --------
    /// ```rust
    /// use sample_to_target::autocorrelation::acf::AutocorrelationFunction;
    ///
    /// let data = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
    /// let acf = AutocorrelationFunction::compute(&data, 0.25, None).unwrap();
    /// assert_eq!(acf.max_lag(), 2);
    /// assert_eq!(acf.rho()[0], 1.0);
    /// ```
    pub fn compute(
        data: &[f64], max_lag_fraction: f64, max_lag: Option<usize>,
    ) -> AutocorrResult<Self> {
        validate_series(data)?;
        validate_max_lag_fraction(max_lag_fraction)?;

        let n = data.len();
        let view = ArrayView1::from(data);
        let mean = view.sum() / n as f64;
        let variance = view.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n as f64;
        if variance == 0.0 || data.iter().all(|&x| x == data[0]) {
            return Err(AutocorrError::ZeroVariance { variance });
        }

        let k_max = lag_bound(n, max_lag_fraction, max_lag);
        let centred: Vec<f64> = data.iter().map(|x| x - mean).collect();
        let lagged = lagged_products(&centred, k_max);

        let mut rho = Array1::<f64>::zeros(k_max + 1);
        rho[0] = 1.0;
        for k in 1..=k_max {
            rho[k] = lagged[k] / (n - k) as f64 / variance;
        }

        Ok(AutocorrelationFunction { rho, mean, variance })
    }

    /// ρ̂₀,…,ρ̂_K.
    pub fn rho(&self) -> &Array1<f64> {
        &self.rho
    }

    /// Largest lag K available.
    pub fn max_lag(&self) -> usize {
        self.rho.len() - 1
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Population variance γ̂₀ used to normalize the ACF.
    pub fn variance(&self) -> f64 {
        self.variance
    }
}

/// Largest lag `K = min(n − 1, ⌊f · n⌋, cap)`.
#[inline]
pub fn lag_bound(n: usize, max_lag_fraction: f64, max_lag: Option<usize>) -> usize {
    let by_fraction = (max_lag_fraction * n as f64).floor() as usize;
    let bound = by_fraction.min(n.saturating_sub(1));
    match max_lag {
        Some(cap) => bound.min(cap),
        None => bound,
    }
}

/// Sₖ = Σᵢ₌₀^{n−k−1} yᵢ yᵢ₊ₖ for k = 0,…,`k_max` of an already-centred series.
///
/// The series is zero-padded to a power of two ≥ n + k_max so the circular
/// correlation computed by the FFT has no wrap-around terms for these lags.
/// Callers guarantee `k_max < n`.
fn lagged_products(centred: &[f64], k_max: usize) -> Vec<f64> {
    let len = (centred.len() + k_max).next_power_of_two();
    let mut buffer: Vec<Complex<f64>> = centred
        .iter()
        .map(|&y| Complex::new(y, 0.0))
        .chain(std::iter::repeat(Complex::new(0.0, 0.0)))
        .take(len)
        .collect();

    let mut planner = FftPlanner::<f64>::new();
    planner.plan_fft_forward(len).process(&mut buffer);
    for c in buffer.iter_mut() {
        *c = Complex::new(c.norm_sqr(), 0.0);
    }
    planner.plan_fft_inverse(len).process(&mut buffer);

    // rustfft leaves the inverse transform unnormalized.
    let scale = len as f64;
    buffer[..=k_max].iter().map(|c| c.re / scale).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::{rngs::StdRng, Rng, SeedableRng};
    use rand_distr::StandardNormal;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The lag bound rule K = min(n − 1, ⌊f·n⌋, cap).
    // - ρ̂₀ = 1 and hand-computed ρ̂ₖ on a short series.
    // - Sign behavior on alternating data.
    // - Agreement of the FFT path with the direct lagged sum.
    // - Offset data (small fluctuations around a large mean) is accepted.
    // - Error paths: short series and zero variance.
    //
    // They intentionally DO NOT cover:
    // - Statistical convergence on long random series (see `tau` tests and
    //   the integration suite).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // The lag bound respects the fraction, n − 1, and the absolute cap.
    //
    // Given
    // -----
    // - n = 100 with f = 0.25, n = 3 with f = 1.0, and n = 100 with cap 10.
    //
    // Expect
    // ------
    // - 25, 2, and 10 respectively.
    fn lag_bound_applies_fraction_length_and_cap() {
        assert_eq!(lag_bound(100, 0.25, None), 25);
        assert_eq!(lag_bound(3, 1.0, None), 2);
        assert_eq!(lag_bound(100, 0.25, Some(10)), 10);
        assert_eq!(lag_bound(2, 0.25, None), 0);
    }

    #[test]
    // Purpose
    // -------
    // Verify ρ̂₁ against a hand computation.
    //
    // Given
    // -----
    // - x = [1, 2, 3, 4], f = 0.5 ⇒ K = 2, x̄ = 2.5, γ̂₀ = 1.25.
    // - Centred y = [-1.5, -0.5, 0.5, 1.5].
    // - γ̂₁ = (0.75 − 0.25 + 0.75) / 3 = 1.25 / 3.
    //
    // Expect
    // ------
    // - ρ̂₀ = 1, ρ̂₁ = 1/3.
    fn acf_matches_hand_computation_on_short_series() {
        // Arrange
        let data = [1.0, 2.0, 3.0, 4.0];

        // Act
        let acf = AutocorrelationFunction::compute(&data, 0.5, None).unwrap();

        // Assert
        assert_eq!(acf.max_lag(), 2);
        assert_eq!(acf.rho()[0], 1.0);
        assert_relative_eq!(acf.rho()[1], 1.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(acf.mean(), 2.5, epsilon = 1e-12);
        assert_relative_eq!(acf.variance(), 1.25, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Perfectly alternating data is negatively correlated at lag 1 and
    // positively at lag 2.
    //
    // Given
    // -----
    // - x = [1, -1, 1, -1, …] of length 40.
    //
    // Expect
    // ------
    // - ρ̂₁ = −1, ρ̂₂ = 1.
    fn acf_alternating_series_flips_sign() {
        // Arrange
        let data: Vec<f64> = (0..40).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();

        // Act
        let acf = AutocorrelationFunction::compute(&data, 0.25, None).unwrap();

        // Assert
        assert_relative_eq!(acf.rho()[1], -1.0, epsilon = 1e-12);
        assert_relative_eq!(acf.rho()[2], 1.0, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // A single observation cannot produce an ACF.
    //
    // Given
    // -----
    // - n = 1.
    //
    // Expect
    // ------
    // - `InsufficientData { len: 1 }`.
    fn acf_single_observation_returns_insufficient_data() {
        let result = AutocorrelationFunction::compute(&[3.0], 0.25, None);
        assert_eq!(result, Err(AutocorrError::InsufficientData { len: 1 }));
    }

    #[test]
    // Purpose
    // -------
    // Constant data has zero variance and is rejected.
    //
    // Given
    // -----
    // - 50 copies of 7.0.
    //
    // Expect
    // ------
    // - `ZeroVariance`.
    fn acf_constant_series_returns_zero_variance() {
        let data = vec![7.0; 50];
        let result = AutocorrelationFunction::compute(&data, 0.25, None);
        assert!(matches!(result, Err(AutocorrError::ZeroVariance { .. })), "got {result:?}");
    }

    fn normal_series(n: usize, seed: u64) -> Vec<f64> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..n).map(|_| rng.sample::<f64, _>(StandardNormal)).collect()
    }

    #[test]
    // Purpose
    // -------
    // The FFT-based products match the textbook O(n · K) definition.
    //
    // Given
    // -----
    // - 1000 seeded normal draws plus a slow sine, f = 0.25 ⇒ K = 250.
    //
    // Expect
    // ------
    // - Every ρ̂ₖ within 1e-10 of (1/(n−k)) Σ yᵢ yᵢ₊ₖ / γ̂₀.
    fn acf_matches_direct_lagged_sum() {
        // Arrange
        let data: Vec<f64> = normal_series(1000, 21)
            .into_iter()
            .enumerate()
            .map(|(i, e)| e + (i as f64 / 40.0).sin())
            .collect();
        let n = data.len();
        let mean = data.iter().sum::<f64>() / n as f64;
        let centred: Vec<f64> = data.iter().map(|x| x - mean).collect();
        let gamma0 = centred.iter().map(|y| y * y).sum::<f64>() / n as f64;

        // Act
        let acf = AutocorrelationFunction::compute(&data, 0.25, None).unwrap();

        // Assert
        assert_eq!(acf.max_lag(), 250);
        for k in 1..=acf.max_lag() {
            let direct = centred[k..].iter().zip(&centred).map(|(a, b)| a * b).sum::<f64>()
                / (n - k) as f64
                / gamma0;
            assert_relative_eq!(acf.rho()[k], direct, epsilon = 1e-10);
        }
    }

    #[test]
    // Purpose
    // -------
    // Small fluctuations around a large mean are ordinary data, not a
    // constant series.
    //
    // Given
    // -----
    // - 1e6 + 0.1·N(0, 1), n = 4096 (an energy-like observable).
    // - 1e155 + 1e145·N(0, 1), n = 512, where x̄² is not representable.
    //
    // Expect
    // ------
    // - Ok with ρ̂₀ = 1, |ρ̂₁| small, and γ̂₀ close to the noise variance.
    fn acf_accepts_offset_series() {
        // Arrange
        let energies: Vec<f64> = normal_series(4096, 5).iter().map(|e| 1e6 + 0.1 * e).collect();
        let huge: Vec<f64> = normal_series(512, 6).iter().map(|e| 1e155 + 1e145 * e).collect();

        // Act
        let acf = AutocorrelationFunction::compute(&energies, 0.25, None).unwrap();
        let acf_huge = AutocorrelationFunction::compute(&huge, 0.25, None).unwrap();

        // Assert
        assert_eq!(acf.rho()[0], 1.0);
        assert!(acf.rho()[1].abs() < 0.1, "rho_1 = {}", acf.rho()[1]);
        assert_relative_eq!(acf.variance(), 0.01, max_relative = 0.1);
        assert_relative_eq!(acf.mean(), 1e6, max_relative = 1e-6);

        assert_eq!(acf_huge.rho()[0], 1.0);
        assert!(acf_huge.rho()[1].abs() < 0.2, "rho_1 = {}", acf_huge.rho()[1]);
        assert!(acf_huge.variance().is_finite() && acf_huge.variance() > 0.0);
    }

    #[test]
    // Purpose
    // -------
    // Two identical calls on a frozen sample give exactly equal results.
    //
    // Given
    // -----
    // - A deterministic pseudo-random series.
    //
    // Expect
    // ------
    // - Both ACFs compare equal with `==`.
    fn acf_is_idempotent_on_frozen_sample() {
        // Arrange
        let data: Vec<f64> = (0..500).map(|i| ((i * 7919) % 113) as f64 / 13.0).collect();

        // Act
        let first = AutocorrelationFunction::compute(&data, 0.25, None).unwrap();
        let second = AutocorrelationFunction::compute(&data, 0.25, None).unwrap();

        // Assert
        assert_eq!(first, second);
    }
}
