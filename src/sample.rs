use core::fmt::Debug;

use itertools::Itertools;
use prost::Message;

use crate::schema::{self, PayloadType};
use crate::Timed;

/// One decoded line of a PB file. The variant is fixed by the
/// [`PayloadType`] in the header of the file it came from.
#[derive(Debug, Clone, PartialEq)]
pub enum Sample {
    ScalarString(schema::ScalarString),
    ScalarShort(schema::ScalarShort),
    ScalarFloat(schema::ScalarFloat),
    ScalarEnum(schema::ScalarEnum),
    ScalarByte(schema::ScalarByte),
    ScalarInt(schema::ScalarInt),
    ScalarDouble(schema::ScalarDouble),
    WaveformString(schema::WaveformString),
    WaveformShort(schema::WaveformShort),
    WaveformFloat(schema::WaveformFloat),
    WaveformEnum(schema::WaveformEnum),
    WaveformByte(schema::WaveformByte),
    WaveformInt(schema::WaveformInt),
    WaveformDouble(schema::WaveformDouble),
    V4GenericBytes(schema::V4GenericBytes),
}

/// Runs `$body` with `$record` bound to the record inside any variant.
macro_rules! with_record {
    ($sample:expr, $record:ident => $body:expr) => {
        match $sample {
            Sample::ScalarString($record) => $body,
            Sample::ScalarShort($record) => $body,
            Sample::ScalarFloat($record) => $body,
            Sample::ScalarEnum($record) => $body,
            Sample::ScalarByte($record) => $body,
            Sample::ScalarInt($record) => $body,
            Sample::ScalarDouble($record) => $body,
            Sample::WaveformString($record) => $body,
            Sample::WaveformShort($record) => $body,
            Sample::WaveformFloat($record) => $body,
            Sample::WaveformEnum($record) => $body,
            Sample::WaveformByte($record) => $body,
            Sample::WaveformInt($record) => $body,
            Sample::WaveformDouble($record) => $body,
            Sample::V4GenericBytes($record) => $body,
        }
    };
}

impl PayloadType {
    /// Decode one unescaped line using the record belonging to this type.
    ///
    /// # Errors
    /// Returns the protobuf error if the bytes are not a valid record.
    pub fn decode_sample(self, bytes: &[u8]) -> Result<Sample, prost::DecodeError> {
        use schema as s;
        Ok(match self {
            Self::ScalarString => Sample::ScalarString(s::ScalarString::decode(bytes)?),
            Self::ScalarShort => Sample::ScalarShort(s::ScalarShort::decode(bytes)?),
            Self::ScalarFloat => Sample::ScalarFloat(s::ScalarFloat::decode(bytes)?),
            Self::ScalarEnum => Sample::ScalarEnum(s::ScalarEnum::decode(bytes)?),
            Self::ScalarByte => Sample::ScalarByte(s::ScalarByte::decode(bytes)?),
            Self::ScalarInt => Sample::ScalarInt(s::ScalarInt::decode(bytes)?),
            Self::ScalarDouble => Sample::ScalarDouble(s::ScalarDouble::decode(bytes)?),
            Self::WaveformString => Sample::WaveformString(s::WaveformString::decode(bytes)?),
            Self::WaveformShort => Sample::WaveformShort(s::WaveformShort::decode(bytes)?),
            Self::WaveformFloat => Sample::WaveformFloat(s::WaveformFloat::decode(bytes)?),
            Self::WaveformEnum => Sample::WaveformEnum(s::WaveformEnum::decode(bytes)?),
            Self::WaveformByte => Sample::WaveformByte(s::WaveformByte::decode(bytes)?),
            Self::WaveformInt => Sample::WaveformInt(s::WaveformInt::decode(bytes)?),
            Self::WaveformDouble => Sample::WaveformDouble(s::WaveformDouble::decode(bytes)?),
            Self::V4GenericBytes => Sample::V4GenericBytes(s::V4GenericBytes::decode(bytes)?),
        })
    }
}

impl Sample {
    #[must_use]
    pub fn payload_type(&self) -> PayloadType {
        match self {
            Sample::ScalarString(_) => PayloadType::ScalarString,
            Sample::ScalarShort(_) => PayloadType::ScalarShort,
            Sample::ScalarFloat(_) => PayloadType::ScalarFloat,
            Sample::ScalarEnum(_) => PayloadType::ScalarEnum,
            Sample::ScalarByte(_) => PayloadType::ScalarByte,
            Sample::ScalarInt(_) => PayloadType::ScalarInt,
            Sample::ScalarDouble(_) => PayloadType::ScalarDouble,
            Sample::WaveformString(_) => PayloadType::WaveformString,
            Sample::WaveformShort(_) => PayloadType::WaveformShort,
            Sample::WaveformFloat(_) => PayloadType::WaveformFloat,
            Sample::WaveformEnum(_) => PayloadType::WaveformEnum,
            Sample::WaveformByte(_) => PayloadType::WaveformByte,
            Sample::WaveformInt(_) => PayloadType::WaveformInt,
            Sample::WaveformDouble(_) => PayloadType::WaveformDouble,
            Sample::V4GenericBytes(_) => PayloadType::V4GenericBytes,
        }
    }

    /// Serialized protobuf record, not yet escaped.
    #[must_use]
    pub fn encode_to_vec(&self) -> Vec<u8> {
        with_record!(self, record => record.encode_to_vec())
    }

    /// The value formatted for humans. Arrays are printed as `[a, b, c]`,
    /// raw bytes as `b'..'` with non printable bytes escaped.
    #[must_use]
    pub fn val_string(&self) -> String {
        match self {
            Sample::ScalarString(r) => r.val.clone(),
            Sample::ScalarShort(r) => r.val.to_string(),
            Sample::ScalarFloat(r) => format!("{:?}", r.val),
            Sample::ScalarEnum(r) => r.val.to_string(),
            Sample::ScalarByte(r) => bytes_string(&r.val),
            Sample::ScalarInt(r) => r.val.to_string(),
            Sample::ScalarDouble(r) => format!("{:?}", r.val),
            Sample::WaveformString(r) => list_string(&r.val),
            Sample::WaveformShort(r) => list_string(&r.val),
            Sample::WaveformFloat(r) => list_string(&r.val),
            Sample::WaveformEnum(r) => list_string(&r.val),
            Sample::WaveformByte(r) => bytes_string(&r.val),
            Sample::WaveformInt(r) => list_string(&r.val),
            Sample::WaveformDouble(r) => list_string(&r.val),
            Sample::V4GenericBytes(r) => bytes_string(&r.val),
        }
    }

    /// A sample of kind `payload_type` whose value is derived from `index`.
    /// Arrays get `element_count` copies of that value.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn from_index(
        payload_type: PayloadType,
        secondsintoyear: u32,
        nano: u32,
        index: usize,
        element_count: usize,
    ) -> Self {
        use schema as s;

        macro_rules! record {
            ($record:ident, $val:expr) => {
                s::$record {
                    secondsintoyear,
                    nano,
                    val: $val,
                    ..Default::default()
                }
            };
        }

        let int = index as i32;
        match payload_type {
            PayloadType::ScalarString => Sample::ScalarString(record!(ScalarString, index.to_string())),
            PayloadType::ScalarShort => Sample::ScalarShort(record!(ScalarShort, int)),
            PayloadType::ScalarFloat => Sample::ScalarFloat(record!(ScalarFloat, index as f32)),
            PayloadType::ScalarEnum => Sample::ScalarEnum(record!(ScalarEnum, int)),
            PayloadType::ScalarByte => Sample::ScalarByte(record!(ScalarByte, vec![index as u8])),
            PayloadType::ScalarInt => Sample::ScalarInt(record!(ScalarInt, int)),
            PayloadType::ScalarDouble => Sample::ScalarDouble(record!(ScalarDouble, index as f64)),
            PayloadType::WaveformString => Sample::WaveformString(record!(
                WaveformString,
                vec![index.to_string(); element_count]
            )),
            PayloadType::WaveformShort => {
                Sample::WaveformShort(record!(WaveformShort, vec![int; element_count]))
            }
            PayloadType::WaveformFloat => Sample::WaveformFloat(record!(
                WaveformFloat,
                vec![index as f32; element_count]
            )),
            PayloadType::WaveformEnum => {
                Sample::WaveformEnum(record!(WaveformEnum, vec![int; element_count]))
            }
            PayloadType::WaveformByte => Sample::WaveformByte(record!(
                WaveformByte,
                vec![index as u8; element_count]
            )),
            PayloadType::WaveformInt => {
                Sample::WaveformInt(record!(WaveformInt, vec![int; element_count]))
            }
            PayloadType::WaveformDouble => Sample::WaveformDouble(record!(
                WaveformDouble,
                vec![index as f64; element_count]
            )),
            PayloadType::V4GenericBytes => Sample::V4GenericBytes(record!(
                V4GenericBytes,
                (index as u64).to_le_bytes().to_vec()
            )),
        }
    }
}

impl Timed for Sample {
    fn secondsintoyear(&self) -> u32 {
        with_record!(self, record => record.secondsintoyear)
    }
    fn nano(&self) -> u32 {
        with_record!(self, record => record.nano)
    }
}

fn list_string<T: Debug>(list: &[T]) -> String {
    format!("[{}]", list.iter().map(|item| format!("{item:?}")).join(", "))
}

fn bytes_string(bytes: &[u8]) -> String {
    format!("b'{}'", bytes.escape_ascii())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_type_decodes_what_it_encoded() {
        for payload_type in PayloadType::ALL {
            let sample = Sample::from_index(payload_type, 400, 12, 7, 3);
            let bytes = sample.encode_to_vec();
            let decoded = payload_type.decode_sample(&bytes).unwrap();
            assert_eq!(decoded, sample);
            assert_eq!(decoded.payload_type(), payload_type);
            assert_eq!(decoded.secondsintoyear(), 400);
            assert_eq!(decoded.nano(), 12);
        }
    }

    #[test]
    fn values_are_printed_like_the_archiver_tools() {
        let double = Sample::from_index(PayloadType::ScalarDouble, 0, 0, 3, 1);
        assert_eq!(double.val_string(), "3.0");
        let ints = Sample::from_index(PayloadType::WaveformInt, 0, 0, 2, 3);
        assert_eq!(ints.val_string(), "[2, 2, 2]");
        let byte = Sample::from_index(PayloadType::ScalarByte, 0, 0, 10, 1);
        assert_eq!(byte.val_string(), "b'\\n'");
    }
}
