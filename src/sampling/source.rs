//! The data-source seam of the sampling loop.
//!
//! A [`SampleSource`] produces `n` new scalar observations on demand, in
//! generation order. Any `FnMut(usize) -> Result<Vec<f64>, E>` closure is a
//! source, so simple callers never name the trait.

/// Produces new observations of the scalar observable.
///
/// Implementations must return exactly `n` values, in generation order,
/// or fail. The driver checks the count and finiteness of every batch.
pub trait SampleSource {
    fn sample(&mut self, n: usize) -> anyhow::Result<Vec<f64>>;
}

impl<F, E> SampleSource for F
where
    F: FnMut(usize) -> Result<Vec<f64>, E>,
    E: Into<anyhow::Error>,
{
    fn sample(&mut self, n: usize) -> anyhow::Result<Vec<f64>> {
        self(n).map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;

    #[test]
    fn closures_are_sample_sources() {
        let mut calls = 0;
        let mut source = |n: usize| -> anyhow::Result<Vec<f64>> {
            calls += 1;
            if n > 3 {
                bail!("at most 3 per call");
            }
            Ok(vec![1.0; n])
        };

        assert_eq!(source.sample(2).unwrap(), vec![1.0, 1.0]);
        assert!(source.sample(4).is_err());
        drop(source);
        assert_eq!(calls, 2);
    }
}
