use crate::{builder, codec, file, reduce, search, store, synthetic, text};

/// Any error this crate can return, for callers that do not care which
/// step failed.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Read(#[from] codec::ReadError),
    #[error("{0}")]
    Write(#[from] codec::WriteError),
    #[error("{0}")]
    Load(#[from] file::LoadError),
    #[error("{0}")]
    Save(#[from] file::SaveError),
    #[error("{0}")]
    Open(#[from] builder::Error),
    #[error("The header holds an invalid payload type: {0:?}")]
    UnknownPayloadType(prost::UnknownEnumValue),
    #[error("{0}")]
    Store(#[from] store::Error),
    #[error("{0}")]
    Search(#[from] search::Error),
    #[error("{0}")]
    Reduce(#[from] reduce::Error),
    #[error("{0}")]
    Plan(#[from] reduce::plan::Error),
    #[error("{0}")]
    Text(#[from] text::Error),
    #[error("{0}")]
    Synthetic(#[from] synthetic::Error),
}

impl From<prost::UnknownEnumValue> for Error {
    fn from(value: prost::UnknownEnumValue) -> Self {
        Self::UnknownPayloadType(value)
    }
}
