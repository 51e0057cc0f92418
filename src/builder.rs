use std::path::Path;

use crate::codec::ReadCursor;
use crate::file::{LoadError, Reader};
use crate::schema::PayloadType;

#[derive(Debug, Clone, Copy)]
enum PayloadTypeOption {
    MustMatch(PayloadType),
    Ignore,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Load(#[from] LoadError),
    #[error(
        "The file holds {in_file} samples while {expected} samples \
        were expected"
    )]
    PayloadTypeMismatch {
        expected: PayloadType,
        in_file: PayloadType,
    },
}

/// Configures how a [`Reader`] reads its file.
#[derive(Debug)]
pub struct ReaderBuilder {
    chunk_size: usize,
    payload_type: PayloadTypeOption,
}

impl Default for ReaderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReaderBuilder {
    pub(crate) fn new() -> Self {
        Self {
            chunk_size: 0,
            payload_type: PayloadTypeOption::Ignore,
        }
    }

    /// Maximum number of samples returned by one call to
    /// [`Reader::next_chunk`]. Zero, the default, reads the whole file in
    /// one go.
    #[must_use]
    pub fn chunk_size(mut self, samples: usize) -> Self {
        self.chunk_size = samples;
        self
    }

    /// Opening fails if the header of the file declares a different type.
    #[must_use]
    pub fn with_payload_type(mut self, payload_type: PayloadType) -> Self {
        self.payload_type = PayloadTypeOption::MustMatch(payload_type);
        self
    }

    /// Accept whatever type the file holds, this is the default.
    #[must_use]
    pub fn with_any_payload_type(mut self) -> Self {
        self.payload_type = PayloadTypeOption::Ignore;
        self
    }

    /// Reads the header, the samples are read by
    /// [`Reader::next_chunk`].
    ///
    /// # Errors
    /// If the file can not be opened, its header is invalid or its type
    /// is not the one required.
    pub fn open(self, path: impl AsRef<Path>) -> Result<Reader, Error> {
        let reader = Reader::open_with_cursor(path.as_ref(), ReadCursor::new(self.chunk_size))?;

        match self.payload_type {
            PayloadTypeOption::MustMatch(expected) if reader.payload_type() != expected => {
                Err(Error::PayloadTypeMismatch {
                    expected,
                    in_file: reader.payload_type(),
                })
            }
            PayloadTypeOption::MustMatch(_) | PayloadTypeOption::Ignore => Ok(reader),
        }
    }
}
