//! Where workers read records from.
//!
//! The format has no random access, so every worker opens its own reader
//! and walks from the start of the stream.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor};
use std::path::PathBuf;

/// A record stream that can be opened independently by each worker.
pub trait RecordSource: Sync {
    /// Open a fresh reader positioned at the first record.
    fn open(&self) -> io::Result<Box<dyn BufRead + '_>>;
}

/// A PGN file on disk.
#[derive(Debug, Clone)]
pub struct PgnFile {
    path: PathBuf,
}

impl PgnFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RecordSource for PgnFile {
    fn open(&self) -> io::Result<Box<dyn BufRead + '_>> {
        let file = File::open(&self.path)?;
        Ok(Box::new(BufReader::new(file)))
    }
}

/// PGN text held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemory {
    bytes: Vec<u8>,
}

impl InMemory {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }
}

impl RecordSource for InMemory {
    fn open(&self) -> io::Result<Box<dyn BufRead + '_>> {
        Ok(Box::new(Cursor::new(self.bytes.as_slice())))
    }
}
