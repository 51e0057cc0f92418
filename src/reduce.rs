//! Shrinking a sequence of samples: cutting off a time window or thinning it
//! out. None of this touches files.

pub mod plan;

use crate::search::{self, NANOS_PER_SECOND};
use crate::Timed;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("the stride must be at least one")]
    ZeroStride,
    #[error("the minimum period must be a finite, non negative number of seconds, got: {0}")]
    InvalidPeriod(f64),
    #[error("{0}")]
    Order(#[from] search::Error),
}

/// Drops every sample strictly before the given time.
///
/// # Errors
/// If the samples are not in time order.
pub fn trim_before<T: Timed>(
    mut samples: Vec<T>,
    seconds: u32,
    nano: u32,
) -> Result<Vec<T>, Error> {
    search::check_ordered(&samples)?;
    let start = search::first_at_or_after(&samples, search::to_ns(seconds, nano));
    if start > 0 {
        samples.drain(..start);
    }
    Ok(samples)
}

/// Drops every sample strictly after the given time.
///
/// # Errors
/// If the samples are not in time order.
pub fn trim_after<T: Timed>(
    mut samples: Vec<T>,
    seconds: u32,
    nano: u32,
) -> Result<Vec<T>, Error> {
    search::check_ordered(&samples)?;
    let end = search::first_after(&samples, search::to_ns(seconds, nano));
    samples.truncate(end);
    Ok(samples)
}

/// Keeps the first sample then every next sample that lies at least
/// `period_seconds` after the previously kept one.
///
/// # Errors
/// If the period is negative or not finite or the samples are not in time
/// order.
pub fn min_period<T: Timed>(samples: Vec<T>, period_seconds: f64) -> Result<Vec<T>, Error> {
    if !period_seconds.is_finite() || period_seconds < 0.0 {
        return Err(Error::InvalidPeriod(period_seconds));
    }
    search::check_ordered(&samples)?;

    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    let period_ns = (period_seconds * NANOS_PER_SECOND as f64).round() as i64;
    let before = samples.len();
    let mut last_kept = None;
    let kept: Vec<T> = samples
        .into_iter()
        .filter(|sample| {
            let time = search::absolute_time_ns(sample);
            match last_kept {
                Some(kept) if time - kept < period_ns => false,
                Some(_) | None => {
                    last_kept = Some(time);
                    true
                }
            }
        })
        .collect();

    tracing::debug!(
        "minimum period of {period_seconds}s kept {} out of {before} samples",
        kept.len()
    );
    Ok(kept)
}

/// Keeps every `n`th sample starting with the first.
///
/// # Errors
/// If `n` is zero.
pub fn stride<T>(samples: Vec<T>, n: usize) -> Result<Vec<T>, Error> {
    match n {
        0 => Err(Error::ZeroStride),
        1 => Ok(samples),
        n => Ok(samples.into_iter().step_by(n).collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PayloadType, Sample};

    fn at(times: &[(u32, u32)]) -> Vec<Sample> {
        times
            .iter()
            .enumerate()
            .map(|(i, &(seconds, nano))| {
                Sample::from_index(PayloadType::ScalarInt, seconds, nano, i, 1)
            })
            .collect()
    }

    #[test]
    fn trims_split_on_exact_time() {
        let samples = at(&[(1, 0), (2, 0), (2, 0), (3, 0)]);
        let before = trim_before(samples.clone(), 2, 0).unwrap();
        assert_eq!(before, samples[1..]);
        let after = trim_after(samples.clone(), 2, 0).unwrap();
        assert_eq!(after, samples[..3]);
    }

    #[test]
    fn trims_reject_unordered_samples() {
        let samples = at(&[(3, 0), (2, 0)]);
        assert!(matches!(
            trim_before(samples.clone(), 2, 0),
            Err(Error::Order(search::Error::OutOfOrder { index: 1, .. }))
        ));
        assert!(trim_after(samples, 2, 0).is_err());
    }

    #[test]
    fn trims_of_nothing_are_nothing() {
        assert!(trim_before(Vec::<Sample>::new(), 2, 0).unwrap().is_empty());
        assert!(trim_after(Vec::<Sample>::new(), 2, 0).unwrap().is_empty());
    }

    #[test]
    fn min_period_measures_from_last_kept() {
        let samples = at(&[(0, 0), (0, 600_000_000), (1, 100_000_000), (1, 900_000_000)]);
        let kept = min_period(samples.clone(), 1.0).unwrap();
        assert_eq!(kept, vec![samples[0].clone(), samples[2].clone()]);
    }

    #[test]
    fn min_period_rejects_bad_periods() {
        let samples = at(&[(0, 0), (1, 0)]);
        assert_eq!(min_period(samples.clone(), -1.0), Err(Error::InvalidPeriod(-1.0)));
        assert!(min_period(samples, f64::NAN).is_err());
    }

    #[test]
    fn zero_period_keeps_duplicates() {
        let samples = at(&[(0, 0), (0, 0), (1, 0)]);
        assert_eq!(min_period(samples.clone(), 0.0).unwrap(), samples);
    }

    #[test]
    fn stride_of_empty() {
        assert!(stride(Vec::<u8>::new(), 3).unwrap().is_empty());
        assert_eq!(stride(Vec::<u8>::new(), 0), Err(Error::ZeroStride));
    }
}
