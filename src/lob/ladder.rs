//! One side of the book: price → FIFO queue of order ids.
//!
//! # Invariants
//!
//! - No level is ever empty; a queue that loses its last id is pruned.
//! - A synthetic top-of-book level never shares the ladder with real
//!   orders. Inserting a real order first discards the synthetic level.
//!
//! | Operation | Complexity |
//! |-----------|------------|
//! | `push_back` | O(log P) |
//! | `remove` | O(log P + Q) |
//! | `replace_with_synthetic` | O(P) |
//!
//! P is the number of price levels, Q the queue length at one price.

use indexmap::IndexSet;
use std::collections::BTreeMap;

use crate::price::is_defined;
use crate::types::Side;

/// Contents of one price level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelQueue {
    /// Authoritative top-of-book level with no backing orders
    Synthetic,
    /// Real order ids, front of the queue first
    Orders(IndexSet<u64>),
}

impl LevelQueue {
    #[inline]
    pub fn is_synthetic(&self) -> bool {
        matches!(self, LevelQueue::Synthetic)
    }

    /// Number of real orders queued here.
    #[inline]
    pub fn order_count(&self) -> usize {
        match self {
            LevelQueue::Synthetic => 0,
            LevelQueue::Orders(ids) => ids.len(),
        }
    }

    /// Real order ids in queue order.
    pub fn order_ids(&self) -> impl Iterator<Item = u64> + '_ {
        let ids = match self {
            LevelQueue::Synthetic => None,
            LevelQueue::Orders(ids) => Some(ids.iter().copied()),
        };
        ids.into_iter().flatten()
    }
}

/// Ordered price levels for a single side.
#[derive(Debug, Clone)]
pub struct PriceLadder {
    side: Side,
    levels: BTreeMap<i64, LevelQueue>,
    synthetic: bool,
}

impl PriceLadder {
    pub fn new(side: Side) -> Self {
        Self {
            side,
            levels: BTreeMap::new(),
            synthetic: false,
        }
    }

    #[inline]
    pub fn side(&self) -> Side {
        self.side
    }

    /// Number of distinct prices.
    #[inline]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// True while the ladder holds a synthetic top-of-book level.
    #[inline]
    pub fn is_synthetic(&self) -> bool {
        self.synthetic
    }

    pub fn clear(&mut self) {
        self.levels.clear();
        self.synthetic = false;
    }

    /// Replace every level with one synthetic level at `price`.
    ///
    /// An undefined price leaves the ladder empty.
    pub fn replace_with_synthetic(&mut self, price: i64) {
        self.levels.clear();
        self.synthetic = is_defined(price);
        if self.synthetic {
            self.levels.insert(price, LevelQueue::Synthetic);
        }
    }

    /// Discard the synthetic level, if any. Returns whether one was dropped.
    pub fn drop_synthetic(&mut self) -> bool {
        if !self.synthetic {
            return false;
        }
        self.clear();
        true
    }

    /// Append `order_id` to the back of the queue at `price`.
    pub fn push_back(&mut self, price: i64, order_id: u64) {
        self.drop_synthetic();
        let queue = self
            .levels
            .entry(price)
            .or_insert_with(|| LevelQueue::Orders(IndexSet::new()));
        if let LevelQueue::Orders(ids) = queue {
            ids.insert(order_id);
        }
    }

    /// Take `order_id` out of the queue at `price`, pruning the level if it
    /// empties. Returns whether the id was present.
    pub fn remove(&mut self, price: i64, order_id: u64) -> bool {
        let Some(LevelQueue::Orders(ids)) = self.levels.get_mut(&price) else {
            return false;
        };
        let removed = ids.shift_remove(&order_id);
        let emptied = ids.is_empty();
        if emptied {
            self.levels.remove(&price);
        }
        removed
    }

    /// Queue position of `order_id` at `price` (0 = front).
    pub fn position(&self, price: i64, order_id: u64) -> Option<usize> {
        match self.levels.get(&price)? {
            LevelQueue::Orders(ids) => ids.get_index_of(&order_id),
            LevelQueue::Synthetic => None,
        }
    }

    #[inline]
    pub fn get(&self, price: i64) -> Option<&LevelQueue> {
        self.levels.get(&price)
    }

    /// Most aggressive price: highest bid or lowest ask.
    pub fn best_price(&self) -> Option<i64> {
        if self.side.is_bid() {
            self.levels.keys().next_back().copied()
        } else {
            self.levels.keys().next().copied()
        }
    }

    /// Levels from lowest to highest price.
    pub fn ascending(&self) -> impl Iterator<Item = (&i64, &LevelQueue)> {
        self.levels.iter()
    }

    /// Levels from highest to lowest price.
    pub fn descending(&self) -> impl Iterator<Item = (&i64, &LevelQueue)> {
        self.levels.iter().rev()
    }
}
