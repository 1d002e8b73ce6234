//! Core data types for MBO events and book snapshots.
//!
//! These types are designed to be:
//! - Faithful to the input record (every column survives decoding)
//! - Cheap to copy where the hot path touches them (`Action`, `Side`, `PriceLevel`)
//! - Serializable for downstream research tooling

use serde::{Deserialize, Serialize};

use crate::price::{is_defined, price_to_f64, PRICE_SCALE, UNDEF_PRICE};

/// Default number of price levels reported per side.
pub const DEFAULT_DEPTH: usize = 10;

/// Bits of the 8-bit event `flags` field.
pub mod flags {
    /// Last record in an event for a given instrument
    pub const LAST: u8 = 1 << 7;
    /// Top-of-book replacement rather than an individual order action
    pub const TOB: u8 = 1 << 6;
    /// Record sourced from a replay such as a snapshot server
    pub const SNAPSHOT: u8 = 1 << 5;
}

/// MBO action type (what happened to the order)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Action {
    /// Add new order to book
    Add = b'A',
    /// Modify existing order
    Modify = b'M',
    /// Cancel (fully or partially) an order
    Cancel = b'C',
    /// Wipe the whole book
    Clear = b'R',
    /// Aggressing trade
    Trade = b'T',
    /// Passive fill
    Fill = b'F',
    /// No action, carries flags or other state only
    None = b'N',
}

impl Action {
    /// Parse action from a byte.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'A' => Some(Action::Add),
            b'M' => Some(Action::Modify),
            b'C' => Some(Action::Cancel),
            b'R' => Some(Action::Clear),
            b'T' => Some(Action::Trade),
            b'F' => Some(Action::Fill),
            b'N' => Some(Action::None),
            _ => None,
        }
    }

    /// Convert to byte representation.
    pub fn to_byte(self) -> u8 {
        self as u8
    }

    /// Character used in the textual feed.
    pub fn to_char(self) -> char {
        self.to_byte() as char
    }

    /// Whether this action can change book state.
    #[inline(always)]
    pub fn is_structural(self) -> bool {
        matches!(
            self,
            Action::Add | Action::Modify | Action::Cancel | Action::Clear
        )
    }
}

/// Order side (bid or ask)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Side {
    /// Buy order (bid)
    Bid = b'B',
    /// Sell order (ask)
    Ask = b'A',
    /// Non-directional
    None = b'N',
}

impl Side {
    /// Parse side from a byte.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'B' => Some(Side::Bid),
            b'A' => Some(Side::Ask),
            b'N' => Some(Side::None),
            _ => None,
        }
    }

    /// Convert to byte representation.
    pub fn to_byte(self) -> u8 {
        self as u8
    }

    /// Character used in the textual feed.
    pub fn to_char(self) -> char {
        self.to_byte() as char
    }

    /// Check if this is a bid.
    #[inline(always)]
    pub fn is_bid(self) -> bool {
        matches!(self, Side::Bid)
    }

    /// Check if this is an ask.
    #[inline(always)]
    pub fn is_ask(self) -> bool {
        matches!(self, Side::Ask)
    }
}

/// Market By Order (MBO) event, one per input record.
///
/// Timestamps are kept as the exact text of the input and only echoed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MboMessage {
    /// Capture-server receive time (pass-through)
    pub ts_recv: String,

    /// Matching-engine event time (pass-through)
    pub ts_event: String,

    /// Record type byte
    pub rtype: u8,

    /// Publisher (venue/dataset) identifier
    pub publisher_id: u16,

    /// Numeric instrument identifier
    pub instrument_id: u32,

    /// What happened to the order
    pub action: Action,

    /// Bid, ask or none
    pub side: Side,

    /// Book level hint from the venue
    pub depth: u8,

    /// Price in fixed-point format, or `UNDEF_PRICE`
    pub price: i64,

    /// Order size (or size delta for cancels)
    pub size: u32,

    /// Event flags, see [`flags`]
    pub flags: u8,

    /// Receive-to-send latency in nanoseconds
    pub ts_in_delta: i32,

    /// Venue sequence number
    pub sequence: u32,

    /// Instrument symbol
    pub symbol: String,

    /// Order identifier
    pub order_id: u64,
}

impl MboMessage {
    /// Create a new MBO message with empty metadata.
    pub fn new(order_id: u64, action: Action, side: Side, price: i64, size: u32) -> Self {
        Self {
            ts_recv: String::new(),
            ts_event: String::new(),
            rtype: 0,
            publisher_id: 0,
            instrument_id: 0,
            action,
            side,
            depth: 0,
            price,
            size,
            flags: 0,
            ts_in_delta: 0,
            sequence: 0,
            symbol: String::new(),
            order_id,
        }
    }

    /// A `Clear` event.
    pub fn clear() -> Self {
        Self::new(0, Action::Clear, Side::None, UNDEF_PRICE, 0)
    }

    /// Set the flags byte.
    pub fn with_flags(mut self, flags: u8) -> Self {
        self.flags = flags;
        self
    }

    /// Set both timestamps.
    pub fn with_timestamps(mut self, ts_recv: impl Into<String>, ts_event: impl Into<String>) -> Self {
        self.ts_recv = ts_recv.into();
        self.ts_event = ts_event.into();
        self
    }

    /// Set the symbol.
    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = symbol.into();
        self
    }

    /// Set the sequence number.
    pub fn with_sequence(mut self, sequence: u32) -> Self {
        self.sequence = sequence;
        self
    }

    /// True when the TOB bit is set.
    #[inline(always)]
    pub fn is_tob(&self) -> bool {
        self.flags & flags::TOB != 0
    }

    /// True unless the price column was empty.
    #[inline(always)]
    pub fn has_price(&self) -> bool {
        is_defined(self.price)
    }

    /// Get price as floating point units.
    #[inline]
    pub fn price_as_f64(&self) -> Option<f64> {
        price_to_f64(self.price)
    }
}

/// One aggregated level of a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceLevel {
    /// Level price, or `UNDEF_PRICE` for padding
    pub price: i64,
    /// Total resting size of real orders at this price
    pub size: u64,
    /// Number of real orders at this price
    pub count: u32,
}

impl PriceLevel {
    /// Padding level: undefined price, nothing resting.
    pub const EMPTY: PriceLevel = PriceLevel {
        price: UNDEF_PRICE,
        size: 0,
        count: 0,
    };

    /// True for padding levels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        !is_defined(self.price)
    }
}

impl Default for PriceLevel {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Book consistency status of a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookConsistency {
    /// best_bid < best_ask
    Valid,
    /// No level on one or both sides
    Empty,
    /// best_bid == best_ask
    Locked,
    /// best_bid > best_ask
    Crossed,
}

/// Depth-limited view of both ladders after an event.
///
/// `bids` runs from the highest price down, `asks` from the lowest price
/// up. Both always hold exactly `depth` entries; missing levels are
/// [`PriceLevel::EMPTY`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookSnapshot {
    pub depth: usize,
    pub bids: Vec<PriceLevel>,
    pub asks: Vec<PriceLevel>,
}

impl BookSnapshot {
    /// A snapshot of an empty book.
    pub fn empty(depth: usize) -> Self {
        Self {
            depth,
            bids: vec![PriceLevel::EMPTY; depth],
            asks: vec![PriceLevel::EMPTY; depth],
        }
    }

    /// Best bid price, if any bid level exists.
    #[inline]
    pub fn best_bid(&self) -> Option<i64> {
        self.bids.first().filter(|l| !l.is_empty()).map(|l| l.price)
    }

    /// Best ask price, if any ask level exists.
    #[inline]
    pub fn best_ask(&self) -> Option<i64> {
        self.asks.first().filter(|l| !l.is_empty()).map(|l| l.price)
    }

    /// True when every level on both sides is padding.
    pub fn is_empty(&self) -> bool {
        self.bids.iter().chain(&self.asks).all(PriceLevel::is_empty)
    }

    /// Bid levels followed by ask levels, the output order.
    pub fn levels(&self) -> impl Iterator<Item = &PriceLevel> {
        self.bids.iter().chain(self.asks.iter())
    }

    /// Mid-price in floating point units.
    pub fn mid_price(&self) -> Option<f64> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => {
                Some((bid as f64 + ask as f64) / 2.0 / PRICE_SCALE as f64)
            }
            _ => None,
        }
    }

    /// Best ask minus best bid in floating point units.
    pub fn spread(&self) -> Option<f64> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some((ask - bid) as f64 / PRICE_SCALE as f64),
            _ => None,
        }
    }

    /// Classify the top of book.
    pub fn consistency(&self) -> BookConsistency {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) if bid < ask => BookConsistency::Valid,
            (Some(bid), Some(ask)) if bid == ask => BookConsistency::Locked,
            (Some(_), Some(_)) => BookConsistency::Crossed,
            _ => BookConsistency::Empty,
        }
    }
}
