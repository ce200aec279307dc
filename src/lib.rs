//! radiorec - record live radio streams one track at a time
//!
//! Reads an Ogg/Vorbis or ICY/MP3 broadcast from a long-lived HTTP
//! connection, finds the track boundaries in it and saves every complete
//! track under a name taken from the stream's own metadata.
//!
//! The pieces, from the bottom up:
//! - [`utils::io::WaitReader`] turns a trickling socket into exact-length reads
//! - [`ogg`] and [`icy`] decode the two stream framings
//! - [`extractor`] turns either framing into blocks and track boundaries
//! - [`splitter`] collects blocks into tracks and hands them to a [`TrackSink`]
//! - [`recorder`] owns the connection and reconnects after stream errors

pub mod config;
pub mod crc;
pub mod error;
pub mod extractor;
pub mod icy;
pub mod identity;
pub mod ogg;
pub mod recorder;
pub mod sink;
pub mod splitter;
pub mod transport;
pub mod utils;

pub use config::RecorderConfig;
pub use error::{ConfigError, Disposition, Error, FormatError, Result, TrackError};
pub use extractor::{Extractor, StreamExtractor, StreamFormat};
pub use identity::TrackName;
pub use recorder::Recorder;
pub use sink::DirectorySink;
pub use splitter::{SplitState, Splitter, TrackSink};
