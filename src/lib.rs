//! # MBO Book Replay
//!
//! Rebuilds a single-instrument limit order book from a Market-By-Order
//! (MBO) event feed and emits a depth-10 snapshot after every event.
//!
//! The library takes comma-delimited MBO records, applies each one to an
//! order registry plus bid/ask price ladders, and reports the top levels of
//! each side with aggregated size and order count.
//!
//! ## Features
//!
//! - **Exact prices**: fixed-point `i64` at 1e-9 scale, parsed without floats
//! - **FIFO queues**: per-price order queues with modify/cancel priority rules
//! - **Top-of-book replacement**: TOB-flagged adds collapse a side to one level
//! - **Tolerant**: unknown cancels are no-ops, unknown modifies become adds
//! - **Deterministic**: same input, byte-identical output
//!
//! ## Quick Start
//!
//! ```rust
//! use mbo_book_replay::{Action, BookReconstructor, MboMessage, Side};
//!
//! let mut book = BookReconstructor::new(10);
//!
//! let msg = MboMessage::new(
//!     1001,            // order_id
//!     Action::Add,     // action
//!     Side::Bid,       // side
//!     100_000_000_000, // price (100.00 in fixed-point)
//!     100,             // size
//! );
//!
//! let snapshot = book.process_message(&msg);
//! assert_eq!(snapshot.best_bid(), Some(100_000_000_000));
//! assert_eq!(snapshot.bids.len(), 10);
//! ```
//!
//! ### Replaying a file
//!
//! ```no_run
//! use mbo_book_replay::{LineSource, Replayer};
//!
//! let source = LineSource::open("data/ESZ4.mbo.csv")?;
//! let stdout = std::io::stdout();
//! let summary = Replayer::new(10).run(source, &mut stdout.lock())?;
//! eprintln!("{} records written", summary.records_written);
//! # Ok::<(), mbo_book_replay::ReplayError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`types`] | Core types: `MboMessage`, `Action`, `Side`, `PriceLevel`, `BookSnapshot` |
//! | [`price`] | Fixed-point price parsing and formatting |
//! | [`decoder`] | Text record decoder |
//! | [`lob`] | Book state: `OrderRegistry`, `PriceLadder`, `BookReconstructor` |
//! | [`source`] | Record sources: `LineSource`, `VecSource` |
//! | [`output`] | Output line formatting |
//! | [`replay`] | Source → book → output driver |

pub mod decoder;
pub mod error;
pub mod lob;
pub mod output;
pub mod price;
pub mod replay;
pub mod source;
pub mod types;

// Re-exports - Core types
pub use error::{DecodeError, ReplayError, Result};
pub use price::{PRICE_SCALE, UNDEF_PRICE};
pub use types::{
    flags, Action, BookConsistency, BookSnapshot, MboMessage, PriceLevel, Side, DEFAULT_DEPTH,
};

// Re-exports - Book reconstruction
pub use lob::{BookConfig, BookReconstructor, BookStats, OrderRegistry, PriceLadder};

// Re-exports - Decoding and output
pub use decoder::decode;
pub use output::{format_record, write_record, RecordWriter};

// Re-exports - Sources and replay
pub use replay::{ReplaySummary, Replayer};
pub use source::{
    LineSource, MarketDataSource, RecordStream, SourceMetadata, SourceStats, VecSource,
};
