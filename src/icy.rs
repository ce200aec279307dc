// ICY (SHOUTCAST/Icecast) interleaved metadata
//
// Stream layout when the client sends "Icy-MetaData: 1":
// - `metaint` bytes of MP3 audio
// - 1 byte: metadata length in 16-byte blocks (0 = no metadata this time)
// - length * 16 bytes of metadata, NUL padded: StreamTitle='...';StreamUrl='...';
// - repeat
//
// `metaint` comes from the "icy-metaint" response header.

use std::io::Read;

use crate::crc::ieee_crc32;
use crate::error::{ConfigError, FormatError, Result};
use crate::identity::unknown_base;
use crate::utils::encoding::decode_metadata;
use crate::utils::io::read_u8;

/// Size of one metadata length unit
pub const METADATA_BLOCK_SIZE: usize = 16;

/// Largest accepted "icy-metaint". Servers use a few KiB.
pub const MAX_METAINT: usize = 1 << 20;

const STREAM_TITLE: &str = "StreamTitle";

/// Decoder for one ICY stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IcyDecoder {
    metaint: usize,
}

/// One metaint-sized slice of audio plus the metadata that followed it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IcyUnit {
    pub audio: Vec<u8>,
    pub metadata: Option<IcyMetadata>,
}

/// Metadata recovered from one non-empty metadata block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IcyMetadata {
    /// Title to name the track by. A literal "Unknown" from the server is
    /// already replaced by "Unknown_<crc32 of the unit's audio>".
    pub stream_title: String,
}

impl IcyDecoder {
    pub fn new(metaint: usize) -> std::result::Result<Self, ConfigError> {
        if metaint == 0 || metaint > MAX_METAINT {
            return Err(ConfigError::InvalidMetaint(metaint.to_string()));
        }
        Ok(IcyDecoder { metaint })
    }

    /// Create a decoder from the value of the "icy-metaint" header
    pub fn from_header(value: Option<&str>) -> std::result::Result<Self, ConfigError> {
        let value = value.ok_or(ConfigError::MissingMetaint)?;
        let metaint = value
            .trim()
            .parse::<usize>()
            .map_err(|_| ConfigError::InvalidMetaint(value.to_string()))?;
        Self::new(metaint)
    }

    /// Read exactly one unit: `metaint` audio bytes, then one metadata block
    pub fn read_unit<R: Read + ?Sized>(&self, reader: &mut R) -> Result<IcyUnit> {
        let mut audio = vec![0u8; self.metaint];
        reader.read_exact(&mut audio)?;

        let block_count = read_u8(reader)? as usize;
        if block_count == 0 {
            return Ok(IcyUnit {
                audio,
                metadata: None,
            });
        }

        let mut raw = vec![0u8; block_count * METADATA_BLOCK_SIZE];
        reader.read_exact(&mut raw)?;

        let title = parse_stream_title(&raw)?;
        let stream_title = if title == "Unknown" {
            // Some stations send "Unknown" instead of leaving the title out
            unknown_base(ieee_crc32(&audio))
        } else {
            title
        };

        Ok(IcyUnit {
            audio,
            metadata: Some(IcyMetadata { stream_title }),
        })
    }
}

/// Find the StreamTitle value in a raw metadata block
pub fn parse_stream_title(raw: &[u8]) -> std::result::Result<String, FormatError> {
    let text = unescape_html(&decode_metadata(raw));
    parse_fields(&text)?
        .into_iter()
        .find(|(key, _)| key == STREAM_TITLE)
        .map(|(_, value)| value)
        .ok_or(FormatError::MissingStreamTitle)
}

/// Split `key='value';key='value';` into pairs.
///
/// Quoted values run to the next `';`, so a title may contain quotes or
/// semicolons. Entries without `=` are ignored. A StreamTitle too short to
/// hold its two quotes is corrupted.
fn parse_fields(text: &str) -> std::result::Result<Vec<(String, String)>, FormatError> {
    let mut fields = Vec::new();
    let mut rest = text;

    while !rest.is_empty() {
        let entry_end = rest.find(';').unwrap_or(rest.len());
        let Some(eq) = rest[..entry_end].find('=') else {
            rest = rest.get(entry_end + 1..).unwrap_or("");
            continue;
        };

        let key = rest[..eq].trim().to_string();
        let after = &rest[eq + 1..];

        let (value, next) = if let Some(quoted) = after.strip_prefix('\'') {
            match quoted.find("';") {
                Some(close) => (&quoted[..close], &quoted[close + 2..]),
                None => match quoted.strip_suffix('\'') {
                    Some(value) => (value, ""),
                    None => return Err(FormatError::CorruptedMetadata),
                },
            }
        } else {
            let end = after.find(';').unwrap_or(after.len());
            let value = &after[..end];
            if key == STREAM_TITLE && value.chars().count() < 2 {
                return Err(FormatError::CorruptedMetadata);
            }
            (value, after.get(end + 1..).unwrap_or(""))
        };

        fields.push((key, value.to_string()));
        rest = next;
    }

    Ok(fields)
}

/// Resolve HTML character references such as `&amp;` and `&#39;`
pub fn unescape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];

        let decoded = rest
            .find(';')
            .filter(|&semi| semi <= 10)
            .and_then(|semi| decode_entity(&rest[1..semi]).map(|c| (c, semi)));
        match decoded {
            Some((c, semi)) => {
                out.push(c);
                rest = &rest[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let number = entity.strip_prefix('#')?;
            let code = match number.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => number.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::io::Cursor;

    /// Pad metadata text to whole 16-byte blocks, prefixed by the block count
    fn metadata_block(text: &str) -> Vec<u8> {
        let blocks = text.len().div_ceil(METADATA_BLOCK_SIZE);
        let mut block = vec![blocks as u8];
        block.extend_from_slice(text.as_bytes());
        block.resize(1 + blocks * METADATA_BLOCK_SIZE, 0);
        block
    }

    #[test]
    fn unit_with_metadata_then_without() {
        let mut stream = vec![1u8; 100];
        let meta = metadata_block("StreamTitle='X - Y';");
        assert_eq!(meta[0], 2);
        stream.extend(meta);
        stream.extend(vec![2u8; 100]);
        stream.push(0);

        let decoder = IcyDecoder::new(100).unwrap();
        let mut reader = Cursor::new(stream);

        let first = decoder.read_unit(&mut reader).unwrap();
        assert_eq!(first.audio, vec![1u8; 100]);
        assert_eq!(first.metadata.unwrap().stream_title, "X - Y");

        let second = decoder.read_unit(&mut reader).unwrap();
        assert_eq!(second.audio, vec![2u8; 100]);
        assert!(second.metadata.is_none());
    }

    #[test]
    fn unknown_title_uses_unit_checksum() {
        let audio: Vec<u8> = (0..32).collect();
        let mut stream = audio.clone();
        stream.extend(metadata_block("StreamTitle='Unknown';"));

        let unit = IcyDecoder::new(32).unwrap().read_unit(&mut Cursor::new(stream)).unwrap();
        let expected = format!("Unknown_{}", ieee_crc32(&audio));
        assert_eq!(unit.metadata.unwrap().stream_title, expected);
    }

    #[test]
    fn missing_stream_title() {
        let mut stream = vec![0u8; 8];
        stream.extend(metadata_block("StreamUrl='http://example.com';"));
        let err = IcyDecoder::new(8).unwrap().read_unit(&mut Cursor::new(stream)).unwrap_err();
        assert!(matches!(err, Error::Format(FormatError::MissingStreamTitle)));
    }

    #[test]
    fn padding_only_block_has_no_title() {
        let mut stream = vec![0u8; 8];
        stream.push(1);
        stream.extend([0u8; 16]);
        let err = IcyDecoder::new(8).unwrap().read_unit(&mut Cursor::new(stream)).unwrap_err();
        assert!(matches!(err, Error::Format(FormatError::MissingStreamTitle)));
    }

    #[test]
    fn truncated_metadata() {
        let mut stream = vec![0u8; 8];
        stream.push(2);
        stream.extend(b"StreamTitle='cut");
        let err = IcyDecoder::new(8).unwrap().read_unit(&mut Cursor::new(stream)).unwrap_err();
        assert!(matches!(err, Error::Format(FormatError::IoTruncation)));
    }

    #[test]
    fn title_with_quotes_and_entities() {
        let title = parse_stream_title(b"StreamTitle='Guns N&#39; Roses - Rock &amp; Roll; Live';StreamUrl='';").unwrap();
        assert_eq!(title, "Guns N' Roses - Rock & Roll; Live");
    }

    #[test]
    fn title_after_other_fields() {
        let title = parse_stream_title(b"StreamUrl='http://a/?x=1';StreamTitle='A - B'").unwrap();
        assert_eq!(title, "A - B");
    }

    #[test]
    fn unterminated_quote_is_corrupted() {
        assert_eq!(
            parse_stream_title(b"StreamTitle='no end"),
            Err(FormatError::CorruptedMetadata)
        );
    }

    #[test]
    fn short_unquoted_title_is_corrupted() {
        assert_eq!(parse_stream_title(b"StreamTitle=;"), Err(FormatError::CorruptedMetadata));
        assert_eq!(parse_stream_title(b"StreamTitle=x;"), Err(FormatError::CorruptedMetadata));
        assert_eq!(parse_stream_title(b"StreamUrl=;StreamTitle='A';").unwrap(), "A");
    }

    #[test]
    fn latin1_title() {
        assert_eq!(parse_stream_title(b"StreamTitle='Bj\xf6rk - J\xf3ga';").unwrap(), "Björk - Jóga");
    }

    #[test]
    fn unescape() {
        assert_eq!(unescape_html("a &lt;b&gt; &#x41;&#66; &unknown; & done"), "a <b> AB &unknown; & done");
    }

    #[test]
    fn metaint_header() {
        assert_eq!(IcyDecoder::from_header(Some(" 16000 ")), IcyDecoder::new(16000));
        assert_eq!(IcyDecoder::from_header(None), Err(ConfigError::MissingMetaint));
        assert!(matches!(
            IcyDecoder::from_header(Some("lots")),
            Err(ConfigError::InvalidMetaint(_))
        ));
        assert!(matches!(
            IcyDecoder::from_header(Some("0")),
            Err(ConfigError::InvalidMetaint(_))
        ));
    }

    #[test]
    fn oversized_metaint_is_rejected() {
        assert!(IcyDecoder::from_header(Some("1048576")).is_ok());
        assert!(matches!(
            IcyDecoder::from_header(Some("1048577")),
            Err(ConfigError::InvalidMetaint(_))
        ));
        assert!(matches!(
            IcyDecoder::from_header(Some("18446744073709551615")),
            Err(ConfigError::InvalidMetaint(_))
        ));
    }
}
