//! Evenly spaced made up samples, for testing reductions and round trips
//! without real archiver files.

use crate::search::NANOS_PER_SECOND;
use crate::{Header, PayloadType, Sample, SampleStore};

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error(
        "Sample {index} would lie {ns} ns into the year, that is before the \
        start of the year or too far from it to store"
    )]
    TimeOutOfRange { index: usize, ns: i128 },
}

/// Configures a [`SampleStore`] of generated samples. Sample `i` lies at
/// `start + i * (seconds_gap + nano_gap)` and holds the value `i`.
#[derive(Debug, Clone)]
pub struct Synthetic {
    payload_type: PayloadType,
    samples: usize,
    year: i32,
    start: u32,
    seconds_gap: i64,
    nano_gap: i64,
    element_count: usize,
    pvname: String,
}

impl Default for Synthetic {
    fn default() -> Self {
        Self::new()
    }
}

impl Synthetic {
    /// 100 `SCALAR_DOUBLE` samples one second apart from the start of 2024.
    #[must_use]
    pub fn new() -> Self {
        Self {
            payload_type: PayloadType::ScalarDouble,
            samples: 100,
            year: 2024,
            start: 0,
            seconds_gap: 1,
            nano_gap: 0,
            element_count: 1,
            pvname: "test".to_owned(),
        }
    }

    #[must_use]
    pub fn payload_type(mut self, payload_type: PayloadType) -> Self {
        self.payload_type = payload_type;
        self
    }

    #[must_use]
    pub fn samples(mut self, samples: usize) -> Self {
        self.samples = samples;
        self
    }

    #[must_use]
    pub fn year(mut self, year: i32) -> Self {
        self.year = year;
        self
    }

    /// Seconds into the year of the first sample.
    #[must_use]
    pub fn start(mut self, seconds: u32) -> Self {
        self.start = seconds;
        self
    }

    /// Whole seconds between samples. Negative values produce samples that
    /// go back in time.
    #[must_use]
    pub fn seconds_gap(mut self, seconds: i64) -> Self {
        self.seconds_gap = seconds;
        self
    }

    /// Added to the `seconds_gap`.
    #[must_use]
    pub fn nano_gap(mut self, nanos: i64) -> Self {
        self.nano_gap = nanos;
        self
    }

    /// Number of elements in every waveform value, ignored for scalars.
    #[must_use]
    pub fn element_count(mut self, element_count: usize) -> Self {
        self.element_count = element_count;
        self
    }

    #[must_use]
    pub fn pvname(mut self, pvname: impl Into<String>) -> Self {
        self.pvname = pvname.into();
        self
    }

    /// # Errors
    /// If any sample would fall before the start of the year or further
    /// than `u32::MAX` seconds after it.
    pub fn build(self) -> Result<SampleStore, Error> {
        let nanos_per_second = i128::from(NANOS_PER_SECOND);
        let gap = i128::from(self.seconds_gap) * nanos_per_second + i128::from(self.nano_gap);
        let start = i128::from(self.start) * nanos_per_second;

        let samples = (0..self.samples)
            .map(|index| -> Result<Sample, Error> {
                let ns = start + index as i128 * gap;
                let out_of_range = Error::TimeOutOfRange { index, ns };
                let seconds = u32::try_from(ns.div_euclid(nanos_per_second))
                    .map_err(|_| out_of_range.clone())?;
                let nano = u32::try_from(ns.rem_euclid(nanos_per_second))
                    .map_err(|_| out_of_range)?;
                Ok(Sample::from_index(
                    self.payload_type,
                    seconds,
                    nano,
                    index,
                    self.element_count,
                ))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut header = Header::new(self.pvname, self.year, self.payload_type);
        if self.payload_type.is_waveform() {
            header.element_count = i32::try_from(self.element_count).ok();
        }
        tracing::trace!("generated {} samples for: {header}", samples.len());
        Ok(SampleStore::from_checked(header, self.payload_type, samples))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Timed;

    #[test]
    fn defaults() {
        let store = Synthetic::new().build().unwrap();
        assert_eq!(store.len(), 100);
        assert_eq!(store.payload_type(), PayloadType::ScalarDouble);
        assert_eq!(store.header().year, 2024);
        assert_eq!(store.header().pvname, "test");
        let last = store.samples().last().unwrap();
        assert_eq!((last.secondsintoyear(), last.nano()), (99, 0));
    }

    #[test]
    fn nano_gap_carries_into_seconds() {
        let store = Synthetic::new()
            .samples(3)
            .start(10)
            .seconds_gap(0)
            .nano_gap(600_000_000)
            .build()
            .unwrap();
        let times: Vec<_> = store
            .samples()
            .iter()
            .map(|s| (s.secondsintoyear(), s.nano()))
            .collect();
        assert_eq!(times, [(10, 0), (10, 600_000_000), (11, 200_000_000)]);
    }

    #[test]
    fn before_start_of_year() {
        let err = Synthetic::new()
            .samples(5)
            .start(2)
            .seconds_gap(-1)
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            Error::TimeOutOfRange {
                index: 3,
                ns: -NANOS_PER_SECOND as i128
            }
        );
    }

    #[test]
    fn waveform_header_has_element_count() {
        let store = Synthetic::new()
            .payload_type(PayloadType::WaveformInt)
            .element_count(4)
            .samples(1)
            .build()
            .unwrap();
        assert_eq!(store.header().element_count, Some(4));
        assert_eq!(store.samples()[0].val_string(), "[0, 0, 0, 0]");
    }
}
