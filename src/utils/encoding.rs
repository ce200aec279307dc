// Encoding utilities

use encoding_rs::{UTF_8, WINDOWS_1252};

/// Text encoding of in-band stream metadata
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TextEncoding {
    Utf8,
    Windows1252,
}

impl TextEncoding {
    /// Guess the encoding of a metadata blob.
    ///
    /// ICY servers send whatever bytes the source client gave them. Valid
    /// UTF-8 is taken as such, anything else is treated as Windows-1252, the
    /// usual encoding of older Shoutcast sources.
    pub fn detect(data: &[u8]) -> Self {
        if std::str::from_utf8(data).is_ok() {
            TextEncoding::Utf8
        } else {
            TextEncoding::Windows1252
        }
    }
}

/// Decode text with specified encoding
pub fn decode_text(data: &[u8], encoding: TextEncoding) -> String {
    match encoding {
        TextEncoding::Utf8 => UTF_8.decode(data).0.into_owned(),
        TextEncoding::Windows1252 => WINDOWS_1252.decode(data).0.into_owned(),
    }
}

/// Decode metadata bytes, dropping the NUL padding ICY blocks end with
pub fn decode_metadata(data: &[u8]) -> String {
    let end = data.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    let data = &data[..end];
    decode_text(data, TextEncoding::detect(data))
}
