//! Finding samples by time.
//!
//! Time here is the number of nanoseconds since the start of the year in the
//! header. All functions expect the samples sorted by that time.

use crate::Timed;

pub(crate) const NANOS_PER_SECOND: i64 = 1_000_000_000;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("there are no samples to search through")]
    EmptySeries,
    #[error(
        "samples are not in time order, sample {index} lies before the one \
        preceding it (difference: {diff_ns} ns)"
    )]
    OutOfOrder { index: usize, diff_ns: i64 },
}

/// Nanoseconds since the start of the year.
#[must_use]
pub fn absolute_time_ns(sample: &impl Timed) -> i64 {
    to_ns(sample.secondsintoyear(), sample.nano())
}

/// Whole seconds between `a` and `b`. Both times are floored to the second
/// before subtracting.
#[must_use]
pub fn seconds_diff(a: &impl Timed, b: &impl Timed) -> i64 {
    absolute_time_ns(b).div_euclid(NANOS_PER_SECOND)
        - absolute_time_ns(a).div_euclid(NANOS_PER_SECOND)
}

/// Time from `a` to `b` in nanoseconds, negative when `b` lies before `a`.
#[must_use]
pub fn nano_diff(a: &impl Timed, b: &impl Timed) -> i64 {
    absolute_time_ns(b) - absolute_time_ns(a)
}

pub(crate) fn to_ns(seconds: u32, nano: u32) -> i64 {
    i64::from(seconds) * NANOS_PER_SECOND + i64::from(nano)
}

/// Index of the first sample at or after `target_ns`, `samples.len()` if
/// there is none.
#[must_use]
pub fn first_at_or_after<T: Timed>(samples: &[T], target_ns: i64) -> usize {
    samples.partition_point(|sample| absolute_time_ns(sample) < target_ns)
}

/// Index of the first sample strictly after `target_ns`, `samples.len()` if
/// there is none.
#[must_use]
pub fn first_after<T: Timed>(samples: &[T], target_ns: i64) -> usize {
    samples.partition_point(|sample| absolute_time_ns(sample) <= target_ns)
}

/// Finds the sample nearest to, but not before, a point in time.
///
/// Returns the index of the first sample at or after the target together
/// with the offset `target - time(sample)` in nanoseconds. That offset is
/// zero on an exact hit and negative otherwise. If the target lies past the
/// last sample the last index is returned with a positive offset. With
/// duplicate timestamps the first of them is returned.
///
/// # Errors
/// If there are no samples.
pub fn locate<T: Timed>(
    samples: &[T],
    target_seconds: u32,
    target_nano: u32,
) -> Result<(usize, i64), Error> {
    let (first, last) = match samples {
        [] => return Err(Error::EmptySeries),
        [first, .., last] => (first, last),
        [only] => (only, only),
    };

    let target = to_ns(target_seconds, target_nano);
    if target <= absolute_time_ns(first) {
        return Ok((0, target - absolute_time_ns(first)));
    }
    let last_idx = samples.len() - 1;
    if target >= absolute_time_ns(last) {
        return Ok((last_idx, target - absolute_time_ns(last)));
    }

    let idx = first_at_or_after(samples, target);
    Ok((idx, target - absolute_time_ns(&samples[idx])))
}

/// # Errors
/// Returns the first place where a sample lies before the one preceding it.
pub fn check_ordered<T: Timed>(samples: &[T]) -> Result<(), Error> {
    match samples
        .windows(2)
        .map(|pair| nano_diff(&pair[0], &pair[1]))
        .enumerate()
        .find(|(_, diff)| *diff < 0)
    {
        Some((index, diff_ns)) => Err(Error::OutOfOrder {
            index: index + 1,
            diff_ns,
        }),
        None => Ok(()),
    }
}
