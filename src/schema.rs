//! Protobuf messages of the archiver appliance PB format.
//!
//! These mirror `EPICSEvent.proto`, with the record names derived from the
//! payload type tags (`WAVEFORM_FLOAT` is decoded by [`WaveformFloat`]).
//! Every sample record has the same layout: the time in two fields, the value
//! in field 3 and optional alarm and metadata fields after that. Only the
//! type of `val` differs.

use core::fmt;

/// Value type of the samples in a file, stored in the header.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum PayloadType {
    ScalarString = 0,
    ScalarShort = 1,
    ScalarFloat = 2,
    ScalarEnum = 3,
    ScalarByte = 4,
    ScalarInt = 5,
    ScalarDouble = 6,
    WaveformString = 7,
    WaveformShort = 8,
    WaveformFloat = 9,
    WaveformEnum = 10,
    WaveformByte = 11,
    WaveformInt = 12,
    WaveformDouble = 13,
    V4GenericBytes = 14,
}

impl PayloadType {
    pub const ALL: [PayloadType; 15] = [
        Self::ScalarString,
        Self::ScalarShort,
        Self::ScalarFloat,
        Self::ScalarEnum,
        Self::ScalarByte,
        Self::ScalarInt,
        Self::ScalarDouble,
        Self::WaveformString,
        Self::WaveformShort,
        Self::WaveformFloat,
        Self::WaveformEnum,
        Self::WaveformByte,
        Self::WaveformInt,
        Self::WaveformDouble,
        Self::V4GenericBytes,
    ];

    /// Name of the tag as the archiver spells it, e.g. `WAVEFORM_FLOAT`.
    #[must_use]
    pub fn tag_name(self) -> &'static str {
        match self {
            Self::ScalarString => "SCALAR_STRING",
            Self::ScalarShort => "SCALAR_SHORT",
            Self::ScalarFloat => "SCALAR_FLOAT",
            Self::ScalarEnum => "SCALAR_ENUM",
            Self::ScalarByte => "SCALAR_BYTE",
            Self::ScalarInt => "SCALAR_INT",
            Self::ScalarDouble => "SCALAR_DOUBLE",
            Self::WaveformString => "WAVEFORM_STRING",
            Self::WaveformShort => "WAVEFORM_SHORT",
            Self::WaveformFloat => "WAVEFORM_FLOAT",
            Self::WaveformEnum => "WAVEFORM_ENUM",
            Self::WaveformByte => "WAVEFORM_BYTE",
            Self::WaveformInt => "WAVEFORM_INT",
            Self::WaveformDouble => "WAVEFORM_DOUBLE",
            Self::V4GenericBytes => "V4_GENERIC_BYTES",
        }
    }

    /// Name of the record decoding samples of this type. Derived from the
    /// tag: split on `_`, capitalize every word and join them.
    /// `SCALAR_DOUBLE` becomes `ScalarDouble`.
    #[must_use]
    pub fn record_name(self) -> String {
        self.tag_name()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first
                        .to_uppercase()
                        .chain(chars.flat_map(char::to_lowercase))
                        .collect::<String>(),
                    None => String::new(),
                }
            })
            .collect()
    }

    /// Arrays rather than single values.
    #[must_use]
    pub fn is_waveform(self) -> bool {
        matches!(
            self,
            Self::WaveformString
                | Self::WaveformShort
                | Self::WaveformFloat
                | Self::WaveformEnum
                | Self::WaveformByte
                | Self::WaveformInt
                | Self::WaveformDouble
        )
    }
}

impl fmt::Display for PayloadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag_name())
    }
}

#[derive(Clone, PartialEq, Eq, Hash, prost::Message)]
pub struct FieldValue {
    #[prost(string, required, tag = "1")]
    pub name: String,
    #[prost(string, required, tag = "2")]
    pub val: String,
}

/// The first line of every PB file.
#[derive(Clone, PartialEq, prost::Message)]
pub struct PayloadInfo {
    #[prost(enumeration = "PayloadType", required, tag = "1")]
    pub r#type: i32,
    #[prost(string, required, tag = "2")]
    pub pvname: String,
    #[prost(int32, required, tag = "3")]
    pub year: i32,
    #[prost(int32, optional, tag = "4")]
    pub element_count: Option<i32>,
    #[prost(message, repeated, tag = "15")]
    pub headers: Vec<FieldValue>,
}

macro_rules! records {
    ($($(#[doc = $doc:literal])* $name:ident { $($val_attr:tt)* } => $val_ty:ty;)*) => {
        $(
            $(#[doc = $doc])*
            #[derive(Clone, PartialEq, prost::Message)]
            pub struct $name {
                #[prost(uint32, required, tag = "1")]
                pub secondsintoyear: u32,
                #[prost(uint32, required, tag = "2")]
                pub nano: u32,
                #[prost($($val_attr)*, tag = "3")]
                pub val: $val_ty,
                #[prost(int32, optional, tag = "4")]
                pub severity: Option<i32>,
                #[prost(int32, optional, tag = "5")]
                pub status: Option<i32>,
                #[prost(uint32, optional, tag = "6")]
                pub repeatcount: Option<u32>,
                #[prost(message, repeated, tag = "7")]
                pub fieldvalues: Vec<FieldValue>,
                #[prost(bool, optional, tag = "8")]
                pub fieldactualchange: Option<bool>,
            }

            impl crate::Timed for $name {
                fn secondsintoyear(&self) -> u32 {
                    self.secondsintoyear
                }
                fn nano(&self) -> u32 {
                    self.nano
                }
            }
        )*
    };
}

records! {
    ScalarString { string, required } => String;
    ScalarShort { sint32, required } => i32;
    ScalarFloat { float, required } => f32;
    ScalarEnum { sint32, required } => i32;
    /// Holds a single byte in practise, the protobuf type is `bytes`.
    ScalarByte { bytes = "vec", required } => Vec<u8>;
    ScalarInt { sfixed32, required } => i32;
    ScalarDouble { double, required } => f64;
    WaveformString { string, repeated } => Vec<String>;
    WaveformShort { sint32, repeated, packed = "true" } => Vec<i32>;
    WaveformFloat { float, repeated, packed = "true" } => Vec<f32>;
    WaveformEnum { sint32, repeated, packed = "true" } => Vec<i32>;
    WaveformByte { bytes = "vec", required } => Vec<u8>;
    WaveformInt { sfixed32, repeated, packed = "true" } => Vec<i32>;
    WaveformDouble { double, repeated, packed = "true" } => Vec<f64>;
    /// Opaque pvAccess payload.
    V4GenericBytes { bytes = "vec", required } => Vec<u8>;
}
