use std::io::{Read, Write};

use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::extractor::Extractor;
use crate::icy::IcyDecoder;
use crate::identity::TrackName;

/// Extractor for MP3 streams with ICY metadata.
///
/// ICY streams have no track framing. Servers send a metadata block when
/// a new track begins, so every non-empty block marks a track start, even
/// one carrying the same title as before. Metadata is stripped from the
/// output.
#[derive(Debug)]
pub struct IcyExtractor {
    decoder: IcyDecoder,
    // Title of the current track, until it has been handed out
    stream_title: Option<String>,
}

impl IcyExtractor {
    pub fn new(decoder: IcyDecoder) -> Self {
        IcyExtractor {
            decoder,
            stream_title: None,
        }
    }

    /// Create an extractor from the "icy-metaint" header value
    pub fn from_header(metaint: Option<&str>) -> std::result::Result<Self, ConfigError> {
        Ok(Self::new(IcyDecoder::from_header(metaint)?))
    }
}

impl Extractor for IcyExtractor {
    fn read_block<R, W>(&mut self, reader: &mut R, out: &mut W) -> Result<bool>
    where
        R: Read + ?Sized,
        W: Write + ?Sized,
    {
        let unit = self.decoder.read_unit(reader)?;
        out.write_all(&unit.audio)?;

        let Some(metadata) = unit.metadata else {
            return Ok(false);
        };

        debug!(title = %metadata.stream_title, "icy metadata");
        self.stream_title = Some(metadata.stream_title);
        Ok(true)
    }

    fn try_get_filename(&mut self) -> Option<TrackName> {
        let title = self.stream_title.take()?;
        Some(TrackName::new(&title, TrackName::MP3_EXTENSION))
    }
}
