//! Human readable dumps of samples.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use time::{Date, Duration, Month};
use tracing::instrument;

use crate::{Sample, SampleStore, Timed};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Could not write text to {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{seconds} seconds into year {year} is not a representable date")]
    InvalidDate { year: i32, seconds: u32 },
}

/// Calendar date and time of `seconds` after the start of `year`, formatted
/// as `YYYY-MM-DD HH:MM:SS`.
///
/// # Errors
/// If the date falls outside the range supported by [`time`].
pub fn date_string(year: i32, seconds: u32) -> Result<String, Error> {
    let invalid = || Error::InvalidDate { year, seconds };
    let moment = Date::from_calendar_date(year, Month::January, 1)
        .map_err(|_| invalid())?
        .midnight()
        .checked_add(Duration::seconds(i64::from(seconds)))
        .ok_or_else(invalid)?;

    Ok(format!(
        "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
        moment.year(),
        u8::from(moment.month()),
        moment.day(),
        moment.hour(),
        moment.minute(),
        moment.second()
    ))
}

/// One sample as a line of text, without line ending:
/// `date    seconds    nano    value`.
///
/// # Errors
/// If the sample's time can not be expressed as a date in `year`.
pub fn render_line(sample: &Sample, year: i32) -> Result<String, Error> {
    let seconds = sample.secondsintoyear();
    Ok(format!(
        "{}    {seconds:8}    {:9}    {}",
        date_string(year, seconds)?,
        sample.nano(),
        sample.val_string()
    ))
}

/// The column titles above the rendered samples.
pub const COLUMN_TITLES: &str = "DATE                   SECONDS     NANO         VAL";

/// Writes the header, the column titles and every sample as text.
///
/// # Errors
/// If the file can not be written or a sample has no valid date.
#[instrument(skip_all, fields(path = ?path.as_ref(), n_samples = store.len()))]
pub fn write_text(path: impl AsRef<Path>, store: &SampleStore) -> Result<(), Error> {
    let path = path.as_ref();
    let io_err = |source| Error::Io {
        path: path.to_owned(),
        source,
    };

    let header = store.header();
    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    writeln!(
        writer,
        "{}, {}, {}",
        header.pvname,
        store.payload_type(),
        header.year
    )
    .map_err(io_err)?;
    writeln!(writer, "{COLUMN_TITLES}").map_err(io_err)?;
    for sample in store.samples() {
        writeln!(writer, "{}", render_line(sample, header.year)?).map_err(io_err)?;
    }
    writer.flush().map_err(io_err)
}
