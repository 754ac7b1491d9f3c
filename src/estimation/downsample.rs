//! Thinning of a correlated series.
//!
//! [`downsample`] splits the series into `⌊len / dist⌋` contiguous chunks of
//! near-equal size (the first `len mod chunks` chunks hold one extra element)
//! and keeps one uniformly random element per chunk. Order is preserved, so
//! with `dist ≈ τ` the output is approximately uncorrelated.
use crate::estimation::errors::{EstimationError, EstimationResult};
use rand::Rng;

/// Keep one random element from each of `⌊len / dist⌋` chunks of `x`.
///
/// # Errors
/// [`EstimationError::InvalidDownsampleDistance`] unless `1 ≤ dist ≤ x.len()`.
///
/// # Examples
/// ```rust
/// use rand::{rngs::StdRng, SeedableRng};
/// use sample_to_target::estimation::downsample::downsample;
///
/// let x: Vec<f64> = (0..10).map(f64::from).collect();
/// let thinned = downsample(&x, 3, &mut StdRng::seed_from_u64(0)).unwrap();
/// assert_eq!(thinned.len(), 3);
/// ```
pub fn downsample<R: Rng + ?Sized>(
    x: &[f64], dist: usize, rng: &mut R,
) -> EstimationResult<Vec<f64>> {
    let len = x.len();
    if dist == 0 || dist > len {
        return Err(EstimationError::InvalidDownsampleDistance { dist, len });
    }

    let chunks = len / dist;
    let base = len / chunks;
    let extra = len % chunks;

    let mut out = Vec::with_capacity(chunks);
    let mut start = 0;
    for i in 0..chunks {
        let size = if i < extra { base + 1 } else { base };
        out.push(x[start + rng.random_range(0..size)]);
        start += size;
    }
    Ok(out)
}
