//! Market data source abstraction for record ingestion.
//!
//! A source yields decoded [`MboMessage`]s in input order. Records that fail
//! to decode are skipped inside the stream and counted in [`SourceStats`];
//! I/O failures are yielded as `Err` and end the stream.
//!
//! # Example
//!
//! ```
//! use mbo_book_replay::source::{MarketDataSource, RecordStream, VecSource};
//!
//! let source = VecSource::new(vec![
//!     "t,e,160,1,100,A,B,0,10.50,5,1,0,0,1,SYM,1",
//!     "not a record",
//! ]);
//!
//! let mut stream = source.messages().unwrap();
//! let msg = stream.next().unwrap().unwrap();
//! assert_eq!(msg.order_id, 1);
//! assert!(stream.next().is_none());
//! assert_eq!(stream.stats().records_dropped, 1);
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::decoder::decode;
use crate::error::{DecodeError, Result};
use crate::types::MboMessage;

/// Buffer size for file-backed sources.
pub const IO_BUFFER_SIZE: usize = 1024 * 1024;

// ============================================================================
// Source Metadata
// ============================================================================

/// Where a source's records come from.
#[derive(Debug, Clone, Default)]
pub struct SourceMetadata {
    /// Original file path (if loaded from file)
    pub file_path: Option<PathBuf>,

    /// Kind of backing store (e.g., "file", "memory")
    pub provider: Option<String>,
}

impl SourceMetadata {
    /// Create new empty metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the file path.
    pub fn with_file_path(mut self, path: impl AsRef<Path>) -> Self {
        self.file_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the provider.
    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    /// Short label for log lines: the path when known, else the provider.
    pub fn describe(&self) -> String {
        match (&self.file_path, &self.provider) {
            (Some(path), _) => path.display().to_string(),
            (None, Some(provider)) => format!("<{provider}>"),
            (None, None) => "<unknown>".to_string(),
        }
    }
}

// ============================================================================
// Stream Statistics
// ============================================================================

/// Counters kept while a stream is consumed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceStats {
    /// Lines pulled from the source, including ones that failed to decode
    pub lines_read: u64,

    /// Lines that decoded into a message
    pub records_decoded: u64,

    /// Lines skipped because they failed to decode
    pub records_dropped: u64,

    /// Raw bytes consumed
    pub bytes_read: u64,
}

impl SourceStats {
    /// Account for one raw line and decode it. Failures are logged and
    /// counted, never surfaced.
    fn decode_line(&mut self, bytes: &[u8]) -> Option<MboMessage> {
        self.lines_read += 1;
        self.bytes_read += bytes.len() as u64;

        let decoded = std::str::from_utf8(bytes)
            .map_err(|_| DecodeError::InvalidUtf8)
            .and_then(decode);
        match decoded {
            Ok(msg) => {
                self.records_decoded += 1;
                Some(msg)
            }
            Err(e) => {
                self.records_dropped += 1;
                log::debug!("Skipping line {}: {e}", self.lines_read);
                None
            }
        }
    }
}

// ============================================================================
// Market Data Source Trait
// ============================================================================

/// Iterator over decoded messages that also reports its progress.
pub trait RecordStream: Iterator<Item = Result<MboMessage>> {
    /// Counters for everything consumed so far.
    fn stats(&self) -> &SourceStats;
}

/// Trait for market data sources.
///
/// `messages()` consumes `self` to allow single-pass iteration. Metadata
/// should be populated before calling it.
pub trait MarketDataSource {
    /// The stream type for messages.
    type MessageIter: RecordStream;

    /// Consume the source and return a stream over messages.
    ///
    /// # Returns
    ///
    /// * `Ok(stream)` - Stream of decoded messages
    /// * `Err(...)` - Failed to open the source
    fn messages(self) -> Result<Self::MessageIter>;

    /// Get metadata about the source.
    fn metadata(&self) -> &SourceMetadata;
}

// ============================================================================
// Line Source
// ============================================================================

/// Line-oriented text source over any buffered reader.
pub struct LineSource<R> {
    reader: R,
    metadata: SourceMetadata,
}

impl LineSource<BufReader<File>> {
    /// Open a record file.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError::Io`](crate::ReplayError::Io) if the file cannot
    /// be opened.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        log::debug!("Opened {}", path.display());

        Ok(Self {
            reader: BufReader::with_capacity(IO_BUFFER_SIZE, file),
            metadata: SourceMetadata::new()
                .with_file_path(path)
                .with_provider("file"),
        })
    }
}

impl<R: BufRead> LineSource<R> {
    /// Wrap an existing reader.
    pub fn from_reader(reader: R) -> Self {
        Self {
            reader,
            metadata: SourceMetadata::new().with_provider("reader"),
        }
    }
}

impl<R: BufRead> MarketDataSource for LineSource<R> {
    type MessageIter = LineMessages<R>;

    fn messages(self) -> Result<Self::MessageIter> {
        Ok(LineMessages {
            reader: self.reader,
            buf: Vec::with_capacity(256),
            stats: SourceStats::default(),
            done: false,
        })
    }

    fn metadata(&self) -> &SourceMetadata {
        &self.metadata
    }
}

/// Stream over the lines of a [`LineSource`].
pub struct LineMessages<R> {
    reader: R,
    buf: Vec<u8>,
    stats: SourceStats,
    done: bool,
}

impl<R: BufRead> Iterator for LineMessages<R> {
    type Item = Result<MboMessage>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            self.buf.clear();
            match self.reader.read_until(b'\n', &mut self.buf) {
                Ok(0) => self.done = true,
                Ok(_) => {
                    if let Some(msg) = self.stats.decode_line(&self.buf) {
                        return Some(Ok(msg));
                    }
                }
                Err(e) => {
                    log::error!("Read failed after {} lines: {e}", self.stats.lines_read);
                    self.done = true;
                    return Some(Err(e.into()));
                }
            }
        }
        None
    }
}

impl<R: BufRead> RecordStream for LineMessages<R> {
    fn stats(&self) -> &SourceStats {
        &self.stats
    }
}

// ============================================================================
// Vector Source (for testing)
// ============================================================================

/// A simple in-memory source of raw lines.
pub struct VecSource {
    lines: Vec<String>,
    metadata: SourceMetadata,
}

impl VecSource {
    /// Create a new vector source.
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            metadata: SourceMetadata::new().with_provider("memory"),
        }
    }
}

impl MarketDataSource for VecSource {
    type MessageIter = VecMessages;

    fn messages(self) -> Result<Self::MessageIter> {
        Ok(VecMessages {
            lines: self.lines.into_iter(),
            stats: SourceStats::default(),
        })
    }

    fn metadata(&self) -> &SourceMetadata {
        &self.metadata
    }
}

/// Stream over the lines of a [`VecSource`].
pub struct VecMessages {
    lines: std::vec::IntoIter<String>,
    stats: SourceStats,
}

impl Iterator for VecMessages {
    type Item = Result<MboMessage>;

    fn next(&mut self) -> Option<Self::Item> {
        for line in self.lines.by_ref() {
            if let Some(msg) = self.stats.decode_line(line.as_bytes()) {
                return Some(Ok(msg));
            }
        }
        None
    }
}

impl RecordStream for VecMessages {
    fn stats(&self) -> &SourceStats {
        &self.stats
    }
}

// ============================================================================
// Tests
// ============================================================================
