use ron::extensions::Extensions;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::{min_period, stride, trim_after, trim_before};
use crate::search;
use crate::{SampleStore, Timed};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Could not parse reduction plan: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("Could not apply reduction: {0}")]
    Reduce(#[from] super::Error),
    #[error("Reduced samples do not fit the store: {0}")]
    Store(#[from] crate::store::Error),
}

/// A moment in the year of the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimePoint {
    pub seconds: u32,
    #[serde(default)]
    pub nano: u32,
}

/// Which reductions to apply to a sample store. Unset steps are skipped,
/// the others run in the order of the fields.
///
/// Plans are usually read from RON, `Some` may be left out:
/// ```text
/// (
///     after: (seconds: 3600),
///     min_period: 1.5,
///     stride: 10,
/// )
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Plan {
    /// Drop samples before this moment.
    pub after: Option<TimePoint>,
    /// Drop samples after this moment.
    pub before: Option<TimePoint>,
    /// Seconds that must pass between two kept samples.
    pub min_period: Option<f64>,
    /// Keep only every nth sample.
    pub stride: Option<usize>,
}

impl Plan {
    /// # Errors
    /// If the text is not a valid RON plan.
    pub fn from_ron(text: &str) -> Result<Self, Error> {
        let plan = ron::Options::default()
            .with_default_extension(Extensions::IMPLICIT_SOME)
            .from_str(text)?;
        Ok(plan)
    }

    /// # Errors
    /// Only if serialization itself fails.
    pub fn to_ron(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::new())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Runs every configured step on `samples`.
    ///
    /// # Errors
    /// If a parameter is out of range or the samples are out of order
    /// while a time based step is configured.
    pub fn reduce<T: Timed>(&self, mut samples: Vec<T>) -> Result<Vec<T>, super::Error> {
        if let Some(TimePoint { seconds, nano }) = self.after {
            samples = trim_before(samples, seconds, nano)?;
        }
        if let Some(TimePoint { seconds, nano }) = self.before {
            samples = trim_after(samples, seconds, nano)?;
        }
        if let Some(period) = self.min_period {
            samples = min_period(samples, period)?;
        }
        if let Some(n) = self.stride {
            samples = stride(samples, n)?;
        }
        Ok(samples)
    }

    fn validate(&self) -> Result<(), super::Error> {
        if self.stride == Some(0) {
            return Err(super::Error::ZeroStride);
        }
        match self.min_period {
            Some(period) if !period.is_finite() || period < 0.0 => {
                Err(super::Error::InvalidPeriod(period))
            }
            _ => Ok(()),
        }
    }

    fn needs_order(&self) -> bool {
        self.after.is_some() || self.before.is_some() || self.min_period.is_some()
    }

    /// Reduces the samples of `store` in place.
    ///
    /// # Errors
    /// See [`reduce`](Self::reduce). Everything is checked before the
    /// samples are touched so on error the store is left as it was.
    #[instrument(skip_all, fields(plan = ?self, n_samples = store.len()))]
    pub fn apply(&self, store: &mut SampleStore) -> Result<(), Error> {
        self.validate()?;
        if self.needs_order() {
            search::check_ordered(store.samples()).map_err(super::Error::Order)?;
        }

        let before = store.len();
        let reduced = self.reduce(store.take_samples())?;
        tracing::debug!("reduced {before} samples to {}", reduced.len());
        store.replace_samples(reduced)?;
        Ok(())
    }
}
