// Vorbis header and comment decoding
//
// Reference: https://xiph.org/vorbis/doc/Vorbis_I_spec.html, sections 4.2 and 5.
// Only the comment header is interpreted; identification and setup headers
// are recognised by type and otherwise skipped.

use std::io::{Cursor, Read};

use crate::error::{FormatError, Result};
use crate::utils::io::{read_le_u32, read_le_u32_prefixed, read_u8};

/// Vorbis packet types
pub const PACKET_TYPE_INFO: u8 = 0x01;
pub const PACKET_TYPE_COMMENT: u8 = 0x03;

const VORBIS_TAG: &[u8; 6] = b"vorbis";

/// Vorbis comment structure
///
/// Field names are case-insensitive, so they are stored upper-cased and
/// looked up the same way.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct VorbisComment {
    pub vendor_string: String,
    pub comments: Vec<(String, String)>,
}

impl VorbisComment {
    /// Decode a complete comment packet, including its type byte and tag
    pub fn decode(packet: &[u8]) -> Result<Self> {
        let mut reader = Cursor::new(packet);
        if read_u8(&mut reader)? != PACKET_TYPE_COMMENT {
            return Err(FormatError::WrongHeaderType.into());
        }
        check_tag(&mut reader)?;
        Self::read(&mut reader)
    }

    /// Read the comment body that follows the packet type and "vorbis" tag
    pub fn read<R: Read + ?Sized>(reader: &mut R) -> Result<Self> {
        let vendor_string = String::from_utf8_lossy(&read_le_u32_prefixed(reader)?).into_owned();

        let comment_count = read_le_u32(reader)?;
        // Each entry needs at least its length prefix, so don't trust huge counts
        let mut comments = Vec::with_capacity((comment_count as usize).min(1024));
        for _ in 0..comment_count {
            let entry = read_le_u32_prefixed(reader)?;
            let entry = String::from_utf8_lossy(&entry);

            // Parse comment (format: FIELD=value)
            let mut parts = entry.split('=');
            let (field, value) = match (parts.next(), parts.next(), parts.next()) {
                (Some(field), Some(value), None) => (field, value),
                _ => return Err(FormatError::InvalidCommentFormat.into()),
            };
            comments.push((field.to_ascii_uppercase(), value.to_string()));
        }

        Ok(VorbisComment {
            vendor_string,
            comments,
        })
    }

    /// Get a comment value by field name
    pub fn get(&self, field: &str) -> Option<&str> {
        let field = field.to_ascii_uppercase();
        self.comments
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, v)| v.as_str())
    }

    /// Serialize as a complete comment packet, framing bit included
    pub fn to_packet(&self) -> Vec<u8> {
        let mut packet = vec![PACKET_TYPE_COMMENT];
        packet.extend_from_slice(VORBIS_TAG);
        push_prefixed(&mut packet, self.vendor_string.as_bytes());
        packet.extend_from_slice(&(self.comments.len() as u32).to_le_bytes());
        for (field, value) in &self.comments {
            push_prefixed(&mut packet, format!("{}={}", field, value).as_bytes());
        }
        packet.push(1);
        packet
    }
}

/// The part of a Vorbis header packet this crate cares about
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VorbisHeader {
    pub packet_type: u8,
    pub comment: Option<VorbisComment>,
}

impl VorbisHeader {
    /// Decode the packet type and, for comment packets, the comment.
    ///
    /// An empty packet decodes as type 0, same as an audio packet.
    pub fn decode(packet: &[u8]) -> Result<Self> {
        let packet_type = packet.first().copied().unwrap_or(0);
        let comment = match packet_type {
            PACKET_TYPE_COMMENT => Some(VorbisComment::decode(packet)?),
            _ => None,
        };
        Ok(VorbisHeader {
            packet_type,
            comment,
        })
    }

    pub fn is_comment(&self) -> bool {
        self.packet_type == PACKET_TYPE_COMMENT
    }
}

fn check_tag<R: Read + ?Sized>(reader: &mut R) -> Result<()> {
    let mut tag = [0u8; 6];
    reader.read_exact(&mut tag)?;
    if &tag != VORBIS_TAG {
        return Err(FormatError::WrongHeaderType.into());
    }
    Ok(())
}

fn push_prefixed(packet: &mut Vec<u8>, data: &[u8]) {
    packet.extend_from_slice(&(data.len() as u32).to_le_bytes());
    packet.extend_from_slice(data);
}
