// Stream splitting
//
// The splitter drives an extractor over a live stream, collects the blocks of
// the current track and hands every finished track to a sink. The first track
// of a connection is always thrown away: the connection attaches somewhere in
// the middle of it.

use std::io::{self, Read};

use tracing::{info, warn};

use crate::error::{Result, TrackError};
use crate::extractor::Extractor;
use crate::identity::TrackName;

/// Destination for finished tracks
pub trait TrackSink {
    fn save(&mut self, name: &TrackName, data: &[u8]) -> io::Result<()>;
}

impl<S: TrackSink + ?Sized> TrackSink for &mut S {
    fn save(&mut self, name: &TrackName, data: &[u8]) -> io::Result<()> {
        (**self).save(name, data)
    }
}

/// Where the splitter stands within a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitState {
    /// Still inside the partial track the connection started in
    DiscardingFirst,
    /// Recording complete tracks
    Accumulating,
}

/// Result of a single splitter step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Continue,
    /// The configured number of tracks has been saved
    LimitReached,
}

/// Splits one connection's stream into tracks
#[derive(Debug)]
pub struct Splitter<E> {
    extractor: E,
    state: SplitState,
    // Bytes of the current track
    buffer: Vec<u8>,
    // Scratch space for the block being read
    block: Vec<u8>,
    name: Option<TrackName>,
    track_limit: Option<usize>,
    tracks_saved: usize,
}

impl<E: Extractor> Splitter<E> {
    pub fn new(extractor: E) -> Self {
        Splitter {
            extractor,
            state: SplitState::DiscardingFirst,
            buffer: Vec::new(),
            block: Vec::new(),
            name: None,
            track_limit: None,
            tracks_saved: 0,
        }
    }

    /// Stop after this many tracks have been saved
    pub fn with_track_limit(mut self, limit: Option<usize>) -> Self {
        self.track_limit = limit;
        self
    }

    pub fn state(&self) -> SplitState {
        self.state
    }

    /// Number of tracks handed to the sink successfully
    pub fn tracks_saved(&self) -> usize {
        self.tracks_saved
    }

    /// Bytes collected for the current track so far
    pub fn buffered(&self) -> &[u8] {
        &self.buffer
    }

    /// Process blocks until the track limit is reached or the stream fails.
    ///
    /// Errors are always fatal to the connection; problems with a single
    /// track are logged and skipped.
    pub fn run<R, S>(&mut self, reader: &mut R, sink: &mut S) -> Result<()>
    where
        R: Read + ?Sized,
        S: TrackSink + ?Sized,
    {
        while self.step(reader, sink)? == Step::Continue {}
        Ok(())
    }

    /// Read and process exactly one block
    pub fn step<R, S>(&mut self, reader: &mut R, sink: &mut S) -> Result<Step>
    where
        R: Read + ?Sized,
        S: TrackSink + ?Sized,
    {
        self.block.clear();
        let is_track_start = self.extractor.read_block(reader, &mut self.block)?;

        if is_track_start && !self.buffer.is_empty() {
            let limit_reached = self.finish_track(sink);
            self.buffer.clear();
            self.name = None;
            if limit_reached {
                return Ok(Step::LimitReached);
            }
        }

        self.buffer.extend_from_slice(&self.block);

        if self.name.is_none() {
            if let Some(name) = self.extractor.try_get_filename() {
                match self.state {
                    SplitState::DiscardingFirst => info!("Going to discard incomplete track: {}", name),
                    SplitState::Accumulating => info!("Recording track: {}", name),
                }
                self.name = Some(name);
            }
        }

        Ok(Step::Continue)
    }

    // Returns true when the track limit has been reached
    fn finish_track<S: TrackSink + ?Sized>(&mut self, sink: &mut S) -> bool {
        if self.state == SplitState::DiscardingFirst {
            info!(bytes = self.buffer.len(), "Discarded incomplete first track");
            self.state = SplitState::Accumulating;
            return false;
        }

        match save_track(self.name.as_ref(), &self.buffer, sink) {
            Ok(name) => {
                info!(bytes = self.buffer.len(), "Saved track: {}", name.file_name());
                self.tracks_saved += 1;
                self.track_limit.is_some_and(|limit| self.tracks_saved >= limit)
            }
            Err(e) => {
                warn!("{}", e);
                warn!("Unable to record track, skipping.");
                false
            }
        }
    }
}

fn save_track<'a, S: TrackSink + ?Sized>(
    name: Option<&'a TrackName>,
    data: &[u8],
    sink: &mut S,
) -> std::result::Result<&'a TrackName, TrackError> {
    let name = name.ok_or(TrackError::MissingName)?;
    sink.save(name, data).map_err(|source| TrackError::Persist {
        name: name.file_name(),
        source,
    })?;
    Ok(name)
}
