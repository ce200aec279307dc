// Track persistence

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::identity::TrackName;
use crate::splitter::TrackSink;

/// Writes every track to its own file inside one directory
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        DirectorySink { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path a track with this name is written to
    pub fn path_for(&self, name: &TrackName) -> PathBuf {
        self.dir.join(name.file_name())
    }
}

impl TrackSink for DirectorySink {
    fn save(&mut self, name: &TrackName, data: &[u8]) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(name), data)
    }
}

/// Keeps tracks in memory, in the order they were saved
impl TrackSink for Vec<(TrackName, Vec<u8>)> {
    fn save(&mut self, name: &TrackName, data: &[u8]) -> io::Result<()> {
        self.push((name.clone(), data.to_vec()));
        Ok(())
    }
}
