//! Read, trim and decimate the PB files written by the EPICS archiver
//! appliance.
//!
//! A PB file holds one process variable: an escaped protobuf header line
//! followed by one escaped protobuf sample per line. Load it with [`load`] or
//! chunk by chunk with a [`Reader`], shrink the samples using the functions in
//! [`reduce`] or a [`Plan`], then write them back with [`save`].

pub mod builder;
pub mod codec;
pub mod error;
pub mod escape;
pub mod file;
pub mod reduce;
pub mod sample;
pub mod schema;
pub mod search;
pub mod store;
pub mod synthetic;
pub mod text;

pub use builder::ReaderBuilder;
pub use codec::{ReadCursor, ReadState};
pub use error::Error;
pub use escape::{escape, unescape};
pub use file::{load, save, LoadError, Reader, SaveError, Writer};
pub use reduce::plan::{Plan, TimePoint};
pub use sample::Sample;
pub use schema::PayloadType;
pub use search::{locate, nano_diff, seconds_diff};
pub use store::{Header, SampleStore};
pub use synthetic::Synthetic;
pub use text::render_line;

/// Anything placed in time by seconds and nanoseconds since the start of
/// the year.
pub trait Timed {
    fn secondsintoyear(&self) -> u32;
    /// Always below one billion.
    fn nano(&self) -> u32;
}

impl<T: Timed> Timed for &T {
    fn secondsintoyear(&self) -> u32 {
        (*self).secondsintoyear()
    }
    fn nano(&self) -> u32 {
        (*self).nano()
    }
}
