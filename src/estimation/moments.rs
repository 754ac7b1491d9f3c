//! Sample moments of a frozen series.
//!
//! - [`SampleMoments`] holds n, the mean x̄ and the unbiased sample variance
//!   σ² = (1/(n−1)) Σ (xᵢ − x̄)².
//!
//! Notes
//! -----
//! The ACF uses the population variance (1/n) for its normalization; the
//! standard error of the mean uses the unbiased σ² computed here.
use crate::estimation::errors::{EstimationError, EstimationResult};
use ndarray::ArrayView1;

/// Mean and unbiased variance of a sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleMoments {
    pub n: usize,
    pub mean: f64,
    pub variance: f64,
}

impl SampleMoments {
    /// Compute moments of `data`.
    ///
    /// # Errors
    /// - [`EstimationError::InsufficientData`] if `data.len() < 2`.
    /// - [`EstimationError::NonFiniteData`] for the first NaN/±inf value.
    pub fn from_slice(data: &[f64]) -> EstimationResult<Self> {
        if data.len() < 2 {
            return Err(EstimationError::InsufficientData { len: data.len() });
        }
        if let Some((index, &value)) = data.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(EstimationError::NonFiniteData { index, value });
        }

        let view = ArrayView1::from(data);
        let mean = view.mean().ok_or(EstimationError::InsufficientData { len: 0 })?;
        let variance = view.var(1.0);
        Ok(SampleMoments { n: data.len(), mean, variance })
    }
}
