use core::fmt;

use crate::schema::{PayloadInfo, PayloadType};
use crate::Sample;

/// Metadata on the first line of a PB file.
pub type Header = PayloadInfo;

impl PayloadInfo {
    #[must_use]
    pub fn new(pvname: impl Into<String>, year: i32, payload_type: PayloadType) -> Self {
        Self {
            r#type: payload_type as i32,
            pvname: pvname.into(),
            year,
            ..Default::default()
        }
    }

    /// # Errors
    /// If the header holds a type number the archiver does not define.
    pub fn payload_type(&self) -> Result<PayloadType, prost::UnknownEnumValue> {
        PayloadType::try_from(self.r#type)
    }
}

impl fmt::Display for PayloadInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name: {}, Type: ", self.pvname)?;
        match self.payload_type() {
            Ok(payload_type) => write!(f, "{payload_type}")?,
            Err(prost::UnknownEnumValue(number)) => write!(f, "UNKNOWN({number})")?,
        }
        write!(f, ", Year: {}", self.year)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error(
        "Sample {index} is a {found} sample while the header says the \
        file holds {expected} samples"
    )]
    KindMismatch {
        index: usize,
        expected: PayloadType,
        found: PayloadType,
    },
}

/// A header and the samples belonging to it, usually one whole PB file.
///
/// The samples are expected in non decreasing time order. That is not
/// enforced here, the reduction functions check it.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleStore {
    header: Header,
    payload_type: PayloadType,
    samples: Vec<Sample>,
}

impl SampleStore {
    /// # Errors
    /// If the header does not contain a known payload type.
    pub fn new(header: Header) -> Result<Self, prost::UnknownEnumValue> {
        let payload_type = header.payload_type()?;
        Ok(Self {
            header,
            payload_type,
            samples: Vec::new(),
        })
    }

    /// # Errors
    /// If any sample does not match the type in the header.
    pub fn with_samples(header: Header, samples: Vec<Sample>) -> Result<Self, crate::Error> {
        let mut store = Self::new(header).map_err(crate::Error::UnknownPayloadType)?;
        store.replace_samples(samples)?;
        Ok(store)
    }

    /// Only for samples already checked against the header.
    pub(crate) fn from_checked(
        header: Header,
        payload_type: PayloadType,
        samples: Vec<Sample>,
    ) -> Self {
        Self {
            header,
            payload_type,
            samples,
        }
    }

    #[must_use]
    pub fn header(&self) -> &Header {
        &self.header
    }

    #[must_use]
    pub fn payload_type(&self) -> PayloadType {
        self.payload_type
    }

    #[must_use]
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Moves the samples out leaving the store empty, pair with
    /// [`replace_samples`](Self::replace_samples) to trim in place.
    pub fn take_samples(&mut self) -> Vec<Sample> {
        core::mem::take(&mut self.samples)
    }

    /// # Errors
    /// If any sample is of a different kind then the header specifies. The
    /// store is left unchanged in that case.
    pub fn replace_samples(&mut self, samples: Vec<Sample>) -> Result<(), Error> {
        if let Some((index, sample)) = samples
            .iter()
            .enumerate()
            .find(|(_, sample)| sample.payload_type() != self.payload_type)
        {
            return Err(Error::KindMismatch {
                index,
                expected: self.payload_type,
                found: sample.payload_type(),
            });
        }
        self.samples = samples;
        Ok(())
    }

    #[must_use]
    pub fn into_parts(self) -> (Header, Vec<Sample>) {
        (self.header, self.samples)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_display() {
        let header = Header::new("SR-DI-DCCT-01:SIGNAL", 2024, PayloadType::ScalarDouble);
        assert_eq!(
            header.to_string(),
            "Name: SR-DI-DCCT-01:SIGNAL, Type: SCALAR_DOUBLE, Year: 2024"
        );
    }

    #[test]
    fn replacing_with_wrong_kind_is_rejected() {
        let header = Header::new("test", 2024, PayloadType::ScalarInt);
        let mut store = SampleStore::new(header).unwrap();
        let samples = vec![
            Sample::from_index(PayloadType::ScalarInt, 1, 0, 0, 1),
            Sample::from_index(PayloadType::ScalarDouble, 2, 0, 1, 1),
        ];
        let err = store.replace_samples(samples).unwrap_err();
        assert_eq!(
            err,
            Error::KindMismatch {
                index: 1,
                expected: PayloadType::ScalarInt,
                found: PayloadType::ScalarDouble,
            }
        );
        assert!(store.is_empty());
    }

    #[test]
    fn unknown_type_is_rejected() {
        let mut header = Header::new("test", 2024, PayloadType::ScalarInt);
        header.r#type = 42;
        assert!(SampleStore::new(header).is_err());
    }
}
