// Track naming
//
// Every saved track gets a file name derived from stream metadata. Names are
// built here so both stream formats share one sanitizing rule.

use std::fmt;

use crate::ogg::VorbisComment;

/// File name (without directory) for one recorded track
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackName {
    base: String,
    extension: &'static str,
}

impl TrackName {
    pub const OGG_EXTENSION: &'static str = "ogg";
    pub const MP3_EXTENSION: &'static str = "mp3";

    /// Create a name from an arbitrary title, making it safe as a file name
    pub fn new(base: &str, extension: &'static str) -> Self {
        TrackName {
            base: sanitize(base),
            extension,
        }
    }

    /// Fallback name used when a stream carries no usable title
    pub fn unknown(checksum: u32, extension: &'static str) -> Self {
        Self::new(&unknown_base(checksum), extension)
    }

    /// Name a Vorbis track as "Artist -- Title".
    ///
    /// If only one of the two fields exists the other reads "Unknown". With
    /// neither, the name falls back to the checksum of the comment page.
    pub fn from_vorbis(comment: &VorbisComment, checksum: u32) -> Self {
        match (comment.get("ARTIST"), comment.get("TITLE")) {
            (None, None) => Self::unknown(checksum, Self::OGG_EXTENSION),
            (artist, title) => Self::new(
                &format!(
                    "{} -- {}",
                    artist.unwrap_or("Unknown"),
                    title.unwrap_or("Unknown")
                ),
                Self::OGG_EXTENSION,
            ),
        }
    }

    /// Title without extension
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Full file name, e.g. "Artist -- Title.ogg"
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.base, self.extension)
    }
}

impl fmt::Display for TrackName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base)
    }
}

/// "Unknown_<checksum>", the base used when there is nothing better
pub fn unknown_base(checksum: u32) -> String {
    format!("Unknown_{}", checksum)
}

/// Replace characters that would turn a title into a path
fn sanitize(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            c => c,
        })
        .collect();

    // "", "." and ".." name directories, not files
    if cleaned.chars().all(|c| c == '.') {
        "_".repeat(cleaned.len().max(1))
    } else {
        cleaned
    }
}
