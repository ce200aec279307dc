// Recording loop
//
// Connects, picks the extractor for the stream format and splits until the
// connection fails, then starts over from scratch. Nothing carries over from
// one connection to the next except the count of saved tracks.

use std::thread;

use tracing::{error, info};

use crate::config::RecorderConfig;
use crate::error::{ConfigError, Disposition, Result};
use crate::extractor::StreamExtractor;
use crate::splitter::{Splitter, TrackSink};
use crate::transport::Transport;
use crate::utils::io::WaitReader;

/// Records one stream until the track limit is hit or a fatal error occurs
pub struct Recorder {
    config: RecorderConfig,
    transport: Transport,
}

impl Recorder {
    pub fn new(config: RecorderConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        let transport = Transport::new(config.url.clone(), config.connect_timeout());
        Ok(Recorder { config, transport })
    }

    /// Record until done. Returns the number of saved tracks.
    ///
    /// Without a track limit this only returns on a configuration error.
    pub fn run<S: TrackSink + ?Sized>(&self, sink: &mut S) -> Result<usize> {
        let mut saved = 0;
        loop {
            let remaining = self.config.track_limit.map(|limit| limit - saved);
            let (count, result) = self.record_connection(sink, remaining);
            saved += count;

            let e = match result {
                Ok(()) => return Ok(saved),
                Err(e) => e,
            };
            if e.disposition() == Disposition::Abort {
                return Err(e);
            }

            error!("Error reading stream: {}", e);
            info!("Retrying in {:?}", self.config.retry_delay());
            thread::sleep(self.config.retry_delay());
        }
    }

    // Returns the number of tracks saved on this connection alongside the
    // reason it ended
    fn record_connection<S: TrackSink + ?Sized>(
        &self,
        sink: &mut S,
        remaining: Option<usize>,
    ) -> (usize, Result<()>) {
        let connection = match self.transport.connect() {
            Ok(connection) => connection,
            Err(e) => return (0, Err(e)),
        };

        let extractor = match StreamExtractor::new(
            connection.content_type.as_deref(),
            connection.metaint.as_deref(),
        ) {
            Ok(extractor) => extractor,
            Err(e) => return (0, Err(e.into())),
        };
        info!(format = ?extractor.format(), "Connected to {}", self.transport.url());

        let mut splitter = Splitter::new(extractor).with_track_limit(remaining);
        let result = splitter.run(&mut WaitReader::new(connection.body), sink);
        (splitter.tracks_saved(), result)
    }
}
