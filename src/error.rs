// Error types for stream recording
//
// Errors fall into three groups, distinguished by what the caller must do:
// - Io / Http / Format: the byte position in the stream can no longer be
//   trusted, drop the connection and reconnect.
// - Config: the stream can never be handled, stop the process.
// - TrackError: only the current track is lost, keep reading.

use std::io;

use thiserror::Error;

/// What the caller should do after an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Abandon the connection and let the recorder reconnect
    Reconnect,
    /// Stop recording altogether
    Abort,
    /// Skip the affected track, keep the connection
    Skip,
}

/// Malformed stream data
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("ogg: capture pattern mismatch")]
    HeaderMismatch,

    #[error("stream ended before a declared length was satisfied")]
    IoTruncation,

    #[error("ogg: checksum mismatch (expected {expected:#010x}, computed {computed:#010x})")]
    ChecksumMismatch { expected: u32, computed: u32 },

    #[error("vorbis: header not Vorbis")]
    WrongHeaderType,

    #[error("vorbis: invalid Vorbis comment")]
    InvalidCommentFormat,

    #[error("vorbis: no header segment")]
    NoHeaderSegment,

    #[error("icy: no 'StreamTitle' tag in metadata")]
    MissingStreamTitle,

    #[error("icy: corrupted metadata")]
    CorruptedMetadata,
}

/// Stream configuration that makes recording impossible
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("key 'icy-metaint' not found in HTTP header")]
    MissingMetaint,

    #[error("invalid 'icy-metaint' value: '{0}'")]
    InvalidMetaint(String),

    #[error("unsupported content type: '{0}'")]
    UnsupportedContentType(String),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Errors that end a connection (or the whole process)
#[derive(Error, Debug)]
pub enum Error {
    #[error("i/o error: {0}")]
    Io(io::Error),

    #[error("http error: {0}")]
    Http(#[from] ureq::Error),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<io::Error> for Error {
    // A short read inside a decoder means the stream stopped mid-structure.
    fn from(e: io::Error) -> Self {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            Error::Format(FormatError::IoTruncation)
        } else {
            Error::Io(e)
        }
    }
}

impl Error {
    pub fn disposition(&self) -> Disposition {
        match self {
            Error::Io(_) | Error::Http(_) | Error::Format(_) => Disposition::Reconnect,
            Error::Config(_) => Disposition::Abort,
        }
    }
}

/// Problems that cost a single track but not the connection
#[derive(Error, Debug)]
pub enum TrackError {
    #[error("no filename could be derived for the track")]
    MissingName,

    #[error("failed to persist track '{name}': {source}")]
    Persist {
        name: String,
        #[source]
        source: io::Error,
    },
}

impl TrackError {
    pub fn disposition(&self) -> Disposition {
        Disposition::Skip
    }
}

pub type Result<T> = std::result::Result<T, Error>;
