use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use tracing::instrument;

use crate::builder::ReaderBuilder;
use crate::codec::{self, ReadCursor, ReadError, WriteError};
use crate::schema::PayloadType;
use crate::store::{Header, SampleStore};
use crate::Sample;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Could not open {path:?} for reading: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Could not read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: ReadError,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("Could not open {path:?} for writing: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Could not write to {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: WriteError,
    },
}

/// Reads a whole PB file into memory.
///
/// # Errors
/// If the file can not be opened or any line fails to decode.
#[instrument(skip_all, fields(path = ?path.as_ref()))]
pub fn load(path: impl AsRef<Path>) -> Result<SampleStore, LoadError> {
    let reader = Reader::open(path)?;
    reader.read_to_end()
}

/// Writes the header and samples to a new or truncated file. With `append`
/// set only the samples are added to the end of an existing file and the
/// header is ignored.
///
/// # Errors
/// If the file can not be opened or written.
#[instrument(skip_all, fields(path = ?path.as_ref(), n_samples = samples.len(), append = append))]
pub fn save(
    path: impl AsRef<Path>,
    header: &Header,
    samples: &[Sample],
    append: bool,
) -> Result<(), SaveError> {
    let path = path.as_ref();
    let file = if append {
        OpenOptions::new().append(true).open(path)
    } else {
        File::create(path)
    }
    .map_err(|source| SaveError::Open {
        path: path.to_owned(),
        source,
    })?;

    let header = if append { None } else { Some(header) };
    codec::write_chunk(file, header, samples).map_err(|source| SaveError::Write {
        path: path.to_owned(),
        source,
    })
}

/// Reads a PB file a chunk of samples at the time. The file is only open
/// during a call.
#[derive(Debug)]
pub struct Reader {
    path: PathBuf,
    cursor: ReadCursor,
}

impl Reader {
    #[must_use]
    pub fn builder() -> ReaderBuilder {
        ReaderBuilder::new()
    }

    /// Opens the file reading all samples in one chunk and accepting any
    /// payload type. Use [`Reader::builder`] to change that.
    ///
    /// # Errors
    /// If the file can not be opened or its header is invalid.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        Self::open_with_cursor(path.as_ref(), ReadCursor::unbounded())
    }

    #[instrument(level = "debug", skip(cursor))]
    pub(crate) fn open_with_cursor(path: &Path, mut cursor: ReadCursor) -> Result<Self, LoadError> {
        let file = open_for_reading(path)?;
        codec::read_header(file, &mut cursor).map_err(|source| LoadError::Read {
            path: path.to_owned(),
            source,
        })?;
        Ok(Self {
            path: path.to_owned(),
            cursor,
        })
    }

    #[must_use]
    pub fn header(&self) -> &Header {
        self.cursor
            .header()
            .expect("Reader is only constructed after reading the header")
    }

    #[must_use]
    pub fn payload_type(&self) -> PayloadType {
        self.cursor
            .payload_type()
            .expect("Reader is only constructed after reading the header")
    }

    #[must_use]
    pub fn cursor(&self) -> &ReadCursor {
        &self.cursor
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The next chunk of samples or `None` if all have been read.
    ///
    /// # Errors
    /// If the file can not be opened or a line fails to decode.
    #[instrument(level = "debug", skip(self), fields(path = ?self.path, lines_read = self.cursor.lines_read()))]
    pub fn next_chunk(&mut self) -> Result<Option<Vec<Sample>>, LoadError> {
        if self.cursor.is_drained() {
            return Ok(None);
        }

        let file = open_for_reading(&self.path)?;
        let samples = codec::read_chunk(file, &mut self.cursor).map_err(|source| {
            LoadError::Read {
                path: self.path.clone(),
                source,
            }
        })?;

        if samples.is_empty() && self.cursor.is_drained() {
            Ok(None)
        } else {
            tracing::debug!("read {} samples", samples.len());
            Ok(Some(samples))
        }
    }

    /// Reads every remaining chunk into one [`SampleStore`].
    ///
    /// # Errors
    /// If the file can not be opened or a line fails to decode.
    pub fn read_to_end(mut self) -> Result<SampleStore, LoadError> {
        let mut samples = Vec::new();
        while let Some(chunk) = self.next_chunk()? {
            samples.extend(chunk);
        }
        let payload_type = self.payload_type();
        let header = self.header().clone();
        Ok(SampleStore::from_checked(header, payload_type, samples))
    }
}

fn open_for_reading(path: &Path) -> Result<File, LoadError> {
    File::open(path).map_err(|source| LoadError::Open {
        path: path.to_owned(),
        source,
    })
}

/// Writes a PB file in chunks. The first chunk creates (or truncates) the
/// file and writes the header, later chunks are appended.
#[derive(Debug)]
pub struct Writer {
    path: PathBuf,
    header: Header,
    started: bool,
}

impl Writer {
    /// Nothing is written until the first call to
    /// [`write_chunk`](Self::write_chunk).
    #[must_use]
    pub fn new(path: impl AsRef<Path>, header: Header) -> Self {
        Self {
            path: path.as_ref().to_owned(),
            header,
            started: false,
        }
    }

    /// # Errors
    /// If the file can not be opened or written.
    pub fn write_chunk(&mut self, samples: &[Sample]) -> Result<(), SaveError> {
        save(&self.path, &self.header, samples, self.started)?;
        self.started = true;
        Ok(())
    }

    #[must_use]
    pub fn header_written(&self) -> bool {
        self.started
    }
}
