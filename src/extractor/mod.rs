// Track extraction
//
// An extractor turns a raw stream into a sequence of blocks and tells the
// caller where tracks begin. There is one extractor per stream format, and
// the format is fixed for the lifetime of a connection:
// - Ogg/Vorbis: one block per Ogg page, a BOS page starts a track
// - ICY/MP3: one block per metaint interval, fresh metadata starts a track

pub mod icy;
pub mod vorbis;

use std::io::{Read, Write};

use crate::error::{ConfigError, Result};
use crate::identity::TrackName;

pub use icy::IcyExtractor;
pub use vorbis::VorbisExtractor;

/// Common interface of the per-format extractors
pub trait Extractor {
    /// Read one block from `reader`, writing the part that belongs to the
    /// recorded track into `out`. Returns true if the block is the first
    /// block of a new track.
    ///
    /// Any error leaves the stream position unknown; the connection has to
    /// be dropped.
    fn read_block<R, W>(&mut self, reader: &mut R, out: &mut W) -> Result<bool>
    where
        R: Read + ?Sized,
        W: Write + ?Sized;

    /// Name for the current track, once enough metadata has been seen.
    /// Returns `Some` at most once per track.
    fn try_get_filename(&mut self) -> Option<TrackName>;
}

/// Supported stream formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamFormat {
    OggVorbis,
    IcyMp3,
}

impl StreamFormat {
    /// Pick the format from a Content-Type header value
    pub fn from_content_type(content_type: &str) -> std::result::Result<Self, ConfigError> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or("")
            .trim()
            .to_ascii_lowercase();
        match essence.as_str() {
            "application/ogg" | "audio/ogg" | "audio/vorbis" => Ok(StreamFormat::OggVorbis),
            "audio/mpeg" | "audio/mp3" | "audio/mpeg3" => Ok(StreamFormat::IcyMp3),
            _ => Err(ConfigError::UnsupportedContentType(content_type.to_string())),
        }
    }
}

/// The extractor for one connection
#[derive(Debug)]
pub enum StreamExtractor {
    Vorbis(VorbisExtractor),
    Icy(IcyExtractor),
}

impl StreamExtractor {
    /// Build the extractor matching a connection's response headers.
    ///
    /// `metaint` is only consulted for ICY streams, where it is required.
    pub fn new(
        content_type: Option<&str>,
        metaint: Option<&str>,
    ) -> std::result::Result<Self, ConfigError> {
        let content_type = content_type.unwrap_or("");
        match StreamFormat::from_content_type(content_type)? {
            StreamFormat::OggVorbis => Ok(StreamExtractor::Vorbis(VorbisExtractor::new())),
            StreamFormat::IcyMp3 => Ok(StreamExtractor::Icy(IcyExtractor::from_header(metaint)?)),
        }
    }

    pub fn format(&self) -> StreamFormat {
        match self {
            StreamExtractor::Vorbis(_) => StreamFormat::OggVorbis,
            StreamExtractor::Icy(_) => StreamFormat::IcyMp3,
        }
    }
}

impl Extractor for StreamExtractor {
    fn read_block<R, W>(&mut self, reader: &mut R, out: &mut W) -> Result<bool>
    where
        R: Read + ?Sized,
        W: Write + ?Sized,
    {
        match self {
            StreamExtractor::Vorbis(extractor) => extractor.read_block(reader, out),
            StreamExtractor::Icy(extractor) => extractor.read_block(reader, out),
        }
    }

    fn try_get_filename(&mut self) -> Option<TrackName> {
        match self {
            StreamExtractor::Vorbis(extractor) => extractor.try_get_filename(),
            StreamExtractor::Icy(extractor) => extractor.try_get_filename(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_types() {
        assert_eq!(StreamFormat::from_content_type("application/ogg"), Ok(StreamFormat::OggVorbis));
        assert_eq!(StreamFormat::from_content_type("Audio/Ogg; codecs=vorbis"), Ok(StreamFormat::OggVorbis));
        assert_eq!(StreamFormat::from_content_type("audio/mpeg"), Ok(StreamFormat::IcyMp3));
        assert!(matches!(
            StreamFormat::from_content_type("audio/aacp"),
            Err(ConfigError::UnsupportedContentType(_))
        ));
    }

    #[test]
    fn extractor_for_headers() {
        let ogg = StreamExtractor::new(Some("application/ogg"), None).unwrap();
        assert_eq!(ogg.format(), StreamFormat::OggVorbis);

        let mp3 = StreamExtractor::new(Some("audio/mpeg"), Some("8192")).unwrap();
        assert_eq!(mp3.format(), StreamFormat::IcyMp3);
    }

    #[test]
    fn icy_without_metaint_is_config_error() {
        assert_eq!(
            StreamExtractor::new(Some("audio/mpeg"), None).unwrap_err(),
            ConfigError::MissingMetaint
        );
        assert!(matches!(
            StreamExtractor::new(None, None).unwrap_err(),
            ConfigError::UnsupportedContentType(_)
        ));
    }
}
