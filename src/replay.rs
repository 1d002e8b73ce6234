//! Replay driver: source → book → output.
//!
//! Each record is taken to completion (decode, apply, snapshot, write)
//! before the next one is read. A decode failure drops the record without
//! touching the book; an I/O failure on either end stops the replay.

use std::io::Write;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::lob::{BookConfig, BookReconstructor, BookStats};
use crate::output::RecordWriter;
use crate::source::{MarketDataSource, RecordStream};
use crate::types::BookSnapshot;

/// Totals for one completed replay.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaySummary {
    pub lines_read: u64,
    pub records_decoded: u64,
    pub records_dropped: u64,
    pub records_written: u64,
    /// Final engine counters
    pub book: BookStats,
}

/// Drives one book over one source.
#[derive(Debug)]
pub struct Replayer {
    book: BookReconstructor,
}

impl Default for Replayer {
    fn default() -> Self {
        Self::with_config(BookConfig::default())
    }
}

impl Replayer {
    /// Create a replayer reporting `depth` levels per side.
    pub fn new(depth: usize) -> Self {
        Self::with_config(BookConfig::new(depth))
    }

    pub fn with_config(config: BookConfig) -> Self {
        Self {
            book: BookReconstructor::with_config(config),
        }
    }

    /// The book as left by the last replay.
    pub fn book(&self) -> &BookReconstructor {
        &self.book
    }

    /// Replay every record of `source` into `writer`.
    ///
    /// The book is not reset first, so consecutive runs continue from the
    /// previous state.
    pub fn run<S, W>(&mut self, source: S, writer: &mut W) -> Result<ReplaySummary>
    where
        S: MarketDataSource,
        W: Write,
    {
        let start = Instant::now();
        log::info!("Replaying {}", source.metadata().describe());

        let mut stream = source.messages()?;
        let mut snapshot = BookSnapshot::empty(self.book.depth());
        let mut out = RecordWriter::new();
        let mut written = 0u64;

        for msg in stream.by_ref() {
            let msg = msg?;
            self.book.process_message_into(&msg, &mut snapshot);
            out.write(writer, &msg, &snapshot)?;
            written += 1;
        }
        writer.flush()?;

        let stats = stream.stats();
        let summary = ReplaySummary {
            lines_read: stats.lines_read,
            records_decoded: stats.records_decoded,
            records_dropped: stats.records_dropped,
            records_written: written,
            book: self.book.stats().clone(),
        };

        let elapsed = start.elapsed();
        log::info!(
            "Replayed {} records ({} dropped) in {:.2?}; {} orders resting",
            summary.records_written,
            summary.records_dropped,
            elapsed,
            summary.book.active_orders
        );
        if summary.book.unknown_cancels > 0 || summary.book.implicit_adds > 0 {
            log::info!(
                "Unknown order references: {} cancels, {} modifies",
                summary.book.unknown_cancels,
                summary.book.implicit_adds
            );
        }

        Ok(summary)
    }
}
