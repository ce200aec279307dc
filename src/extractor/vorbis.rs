use std::io::{Read, Write};

use tracing::{debug, trace};

use crate::error::{FormatError, Result};
use crate::extractor::Extractor;
use crate::identity::TrackName;
use crate::ogg::{OggPage, VorbisComment, VorbisHeader};
use crate::utils::io::TeeReader;

/// Extractor for chained Ogg/Vorbis streams.
///
/// Pages are passed through whole, so the recorded bytes of a track form a
/// complete Ogg file.
#[derive(Debug, Default)]
pub struct VorbisExtractor {
    // Comment of the current track and the CRC of the page it came in
    metadata: Option<(VorbisComment, u32)>,
}

impl VorbisExtractor {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Extractor for VorbisExtractor {
    fn read_block<R, W>(&mut self, reader: &mut R, out: &mut W) -> Result<bool>
    where
        R: Read + ?Sized,
        W: Write + ?Sized,
    {
        let page = OggPage::read(&mut TeeReader::new(reader, out))?;
        trace!(
            sequence = page.header.page_sequence,
            header_type = page.header.header_type,
            segments = page.segments.len(),
            "ogg page"
        );

        // The first segment holds the Vorbis header, if there is one
        let first = page.segments.first().ok_or(FormatError::NoHeaderSegment)?;

        let is_first = page.header.is_bos();
        if is_first {
            self.metadata = None;
        }

        // A continued packet has no packet type byte in front
        if !page.header.is_continuation() {
            if let Some(comment) = VorbisHeader::decode(first)?.comment {
                debug!(fields = comment.comments.len(), "vorbis comment");
                self.metadata = Some((comment, page.header.crc));
            }
        }

        Ok(is_first)
    }

    fn try_get_filename(&mut self) -> Option<TrackName> {
        let (comment, checksum) = self.metadata.take()?;
        Some(TrackName::from_vorbis(&comment, checksum))
    }
}
