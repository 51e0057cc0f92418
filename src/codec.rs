//! Reading and writing the line based PB format from any byte source.
//!
//! A file looks like:
//!
//! ```text
//! escape(header)\n
//! escape(sample)\n
//! escape(sample)\n
//! ...
//! ```
//!
//! Reading happens in chunks of lines, the position to continue from is kept
//! in a [`ReadCursor`] that the caller passes back in on every call.

use std::io::{self, BufRead, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::num::NonZeroUsize;

use prost::Message;
use tracing::instrument;

use crate::escape::{escape_into, unescape, NEWLINE};
use crate::schema::PayloadType;
use crate::store::Header;
use crate::Sample;

#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("Could not read from source: {0}")]
    Io(#[from] io::Error),
    #[error("The data is empty, it should start with a header line")]
    MissingHeader,
    #[error("The header on line 1 could not be decoded: {0}")]
    Header(#[source] prost::DecodeError),
    #[error("The header specifies payload type {0} which does not exist")]
    UnknownPayloadType(i32),
    #[error("Line {line} is empty, every line should hold a sample")]
    EmptyLine { line: u64 },
    #[error("Line {line} is not a valid {payload_type} sample: {source}")]
    Sample {
        line: u64,
        payload_type: PayloadType,
        #[source]
        source: prost::DecodeError,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("Could not write to destination: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadState {
    /// Nothing has been read, not even the header.
    Fresh,
    /// The last call stopped because the chunk was full, there are more
    /// lines to read.
    HasMore,
    /// Every line has been read.
    Drained,
}

/// Where to continue reading and what was learned so far.
#[derive(Debug, Clone)]
pub struct ReadCursor {
    chunk_size: Option<NonZeroUsize>,
    header: Option<(Header, PayloadType)>,
    /// lines consumed so far, the header included
    lines: u64,
    /// byte offset of the first line not yet consumed
    offset: u64,
    state: ReadState,
}

impl ReadCursor {
    /// A `chunk_size` of zero reads everything in one call.
    #[must_use]
    pub fn new(chunk_size: usize) -> Self {
        Self {
            chunk_size: NonZeroUsize::new(chunk_size),
            header: None,
            lines: 0,
            offset: 0,
            state: ReadState::Fresh,
        }
    }

    /// Reads everything in one call.
    #[must_use]
    pub fn unbounded() -> Self {
        Self::new(0)
    }

    #[must_use]
    pub fn header(&self) -> Option<&Header> {
        self.header.as_ref().map(|(header, _)| header)
    }

    #[must_use]
    pub fn payload_type(&self) -> Option<PayloadType> {
        self.header.as_ref().map(|(_, payload_type)| *payload_type)
    }

    /// Number of lines consumed, including the header line.
    #[must_use]
    pub fn lines_read(&self) -> u64 {
        self.lines
    }

    #[must_use]
    pub fn state(&self) -> ReadState {
        self.state
    }

    #[must_use]
    pub fn is_drained(&self) -> bool {
        self.state == ReadState::Drained
    }
}

/// Reads the header if the cursor does not have it yet.
///
/// # Errors
/// Io errors and a missing or undecodable header.
pub fn read_header<R: Read + Seek>(
    source: R,
    cursor: &mut ReadCursor,
) -> Result<&Header, ReadError> {
    if cursor.header.is_none() {
        let mut reader = BufReader::new(source);
        reader.seek(SeekFrom::Start(cursor.offset))?;
        ensure_header(&mut reader, cursor)?;
    }
    Ok(cursor
        .header()
        .expect("ensure_header fails or sets the header"))
}

fn ensure_header<R: BufRead>(reader: &mut R, cursor: &mut ReadCursor) -> Result<(), ReadError> {
    if cursor.header.is_some() {
        return Ok(());
    }

    let mut line = Vec::new();
    let read = reader.read_until(NEWLINE, &mut line)?;
    let line = strip_newline(&line);
    if line.is_empty() {
        return Err(ReadError::MissingHeader);
    }

    let header = Header::decode(unescape(line).as_slice()).map_err(ReadError::Header)?;
    let payload_type = header
        .payload_type()
        .map_err(|prost::UnknownEnumValue(number)| ReadError::UnknownPayloadType(number))?;
    tracing::debug!("read header: {header}");

    cursor.header = Some((header, payload_type));
    cursor.lines += 1;
    cursor.offset += read as u64;
    Ok(())
}

/// Reads up to the cursors chunk size samples, starting where the previous
/// call stopped. On the first call the header is read first.
///
/// Returns an empty vec once the cursor is [drained](ReadState::Drained).
///
/// # Errors
/// Io errors and lines that can not be decoded. Reading stops at the first
/// bad line, the cursor then still points at it.
#[instrument(level = "trace", skip_all, fields(lines_read = cursor.lines))]
pub fn read_chunk<R: Read + Seek>(
    source: R,
    cursor: &mut ReadCursor,
) -> Result<Vec<Sample>, ReadError> {
    if cursor.is_drained() {
        return Ok(Vec::new());
    }

    let mut reader = BufReader::new(source);
    reader.seek(SeekFrom::Start(cursor.offset))?;
    ensure_header(&mut reader, cursor)?;
    let payload_type = cursor.payload_type().expect("ensure_header succeeded");

    let mut samples = Vec::new();
    let mut line = Vec::new();
    loop {
        if cursor
            .chunk_size
            .is_some_and(|chunk_size| samples.len() >= chunk_size.get())
        {
            break;
        }

        line.clear();
        let read = reader.read_until(NEWLINE, &mut line)?;
        if read == 0 {
            cursor.state = ReadState::Drained;
            tracing::trace!("drained after {} lines", cursor.lines);
            return Ok(samples);
        }

        let line_number = cursor.lines + 1;
        let payload = strip_newline(&line);
        if payload.is_empty() {
            return Err(ReadError::EmptyLine { line: line_number });
        }
        let sample = payload_type
            .decode_sample(&unescape(payload))
            .map_err(|source| ReadError::Sample {
                line: line_number,
                payload_type,
                source,
            })?;
        samples.push(sample);
        cursor.lines = line_number;
        cursor.offset += read as u64;
    }

    cursor.state = if reader.fill_buf()?.is_empty() {
        ReadState::Drained
    } else {
        ReadState::HasMore
    };
    tracing::trace!(
        "read chunk of {} samples, state: {:?}",
        samples.len(),
        cursor.state
    );
    Ok(samples)
}

fn strip_newline(line: &[u8]) -> &[u8] {
    line.strip_suffix(&[NEWLINE]).unwrap_or(line)
}

/// Writes the header line, if one is passed, followed by the samples. Pass
/// no header to continue a file that already has one.
///
/// # Errors
/// Any io error writing to `destination`.
pub fn write_chunk<W: Write>(
    destination: W,
    header: Option<&Header>,
    samples: &[Sample],
) -> Result<(), WriteError> {
    let mut writer = BufWriter::new(destination);
    let mut line = Vec::new();

    if let Some(header) = header {
        escape_into(&header.encode_to_vec(), &mut line);
        line.push(NEWLINE);
        writer.write_all(&line)?;
    }

    for sample in samples {
        line.clear();
        escape_into(&sample.encode_to_vec(), &mut line);
        line.push(NEWLINE);
        writer.write_all(&line)?;
    }

    writer.flush()?;
    Ok(())
}
