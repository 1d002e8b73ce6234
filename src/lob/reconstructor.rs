//! Single-instrument book reconstructor.
//!
//! Applies decoded MBO events to the order registry and the two price
//! ladders, then snapshots the result. Only `Add`, `Modify`, `Cancel` and
//! `Clear` change state. Unknown order ids are tolerated: a cancel is a
//! no-op and a modify becomes an add.
//!
//! Queue priority is tracked as position inside a price bucket:
//! - a price change always re-queues at the back of the new price
//! - a size increase re-queues at the back of the same price
//! - a size decrease (or no change) keeps the position
//! - a partial cancel re-queues at the back

use super::ladder::PriceLadder;
use super::registry::{OrderRegistry, RestingOrder};
use super::snapshot::{build_snapshot, fill_snapshot};
use crate::error::{ReplayError, Result};
use crate::types::{Action, BookSnapshot, MboMessage, Side, DEFAULT_DEPTH};
use serde::{Deserialize, Serialize};

/// Configuration for reconstructor behavior.
#[derive(Debug, Clone)]
pub struct BookConfig {
    /// Number of price levels reported per side
    pub depth: usize,

    /// Whether to log warnings when a top-of-book replacement drops orders
    pub log_warnings: bool,
}

impl Default for BookConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            log_warnings: true,
        }
    }
}

impl BookConfig {
    /// Create a new config with the given snapshot depth.
    pub fn new(depth: usize) -> Self {
        Self {
            depth,
            ..Default::default()
        }
    }

    /// Set the snapshot depth.
    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    /// Enable/disable warning logs.
    pub fn with_logging(mut self, log: bool) -> Self {
        self.log_warnings = log;
        self
    }

    /// Reject configurations the reconstructor cannot honour.
    pub fn validate(&self) -> Result<()> {
        if self.depth == 0 {
            return Err(ReplayError::config("depth must be at least 1"));
        }
        Ok(())
    }
}

/// Counters describing what the reconstructor has seen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookStats {
    /// Total events applied
    pub messages: u64,
    pub adds: u64,
    pub modifies: u64,
    pub cancels: u64,
    pub clears: u64,

    /// TOB-flagged adds that replaced a ladder
    pub tob_replacements: u64,

    /// Modifies for unknown ids handled as adds
    pub implicit_adds: u64,

    /// Cancels for unknown ids
    pub unknown_cancels: u64,

    /// Structural events that could not be placed (no side, no price, zero size)
    pub ignored: u64,

    /// Trade, fill and none events
    pub non_structural: u64,

    /// Currently resting orders
    pub active_orders: usize,

    /// Current number of bid prices
    pub bid_levels: usize,

    /// Current number of ask prices
    pub ask_levels: usize,
}

/// Order book state for one event stream.
///
/// # Example
///
/// ```
/// use mbo_book_replay::{Action, BookReconstructor, MboMessage, Side};
///
/// let mut book = BookReconstructor::new(10);
/// let add = MboMessage::new(1, Action::Add, Side::Bid, 10_500_000_000, 5);
/// let snapshot = book.process_message(&add);
///
/// assert_eq!(snapshot.bids[0].price, 10_500_000_000);
/// assert_eq!(snapshot.bids[0].size, 5);
/// assert_eq!(snapshot.bids[0].count, 1);
/// ```
#[derive(Debug, Clone)]
pub struct BookReconstructor {
    config: BookConfig,
    registry: OrderRegistry,
    bids: PriceLadder,
    asks: PriceLadder,
    stats: BookStats,
}

impl Default for BookReconstructor {
    fn default() -> Self {
        Self::with_config(BookConfig::default())
    }
}

impl BookReconstructor {
    /// Create a reconstructor reporting `depth` levels per side.
    pub fn new(depth: usize) -> Self {
        Self::with_config(BookConfig::new(depth))
    }

    /// Create a reconstructor with custom configuration.
    pub fn with_config(config: BookConfig) -> Self {
        Self {
            config,
            registry: OrderRegistry::new(),
            bids: PriceLadder::new(Side::Bid),
            asks: PriceLadder::new(Side::Ask),
            stats: BookStats::default(),
        }
    }

    /// Get the configured snapshot depth.
    #[inline]
    pub fn depth(&self) -> usize {
        self.config.depth
    }

    /// Get a reference to the current configuration.
    #[inline]
    pub fn config(&self) -> &BookConfig {
        &self.config
    }

    /// Apply one event, then snapshot at the configured depth.
    pub fn process_message(&mut self, msg: &MboMessage) -> BookSnapshot {
        self.apply(msg);
        self.snapshot(self.config.depth)
    }

    /// Like [`process_message`](Self::process_message) but refills `out`.
    pub fn process_message_into(&mut self, msg: &MboMessage, out: &mut BookSnapshot) {
        self.apply(msg);
        self.snapshot_into(self.config.depth, out);
    }

    /// Apply one event to the book. Never fails.
    pub fn apply(&mut self, msg: &MboMessage) {
        self.stats.messages += 1;

        if !msg.action.is_structural() {
            self.stats.non_structural += 1;
            return;
        }

        match msg.action {
            Action::Clear => {
                self.stats.clears += 1;
                self.clear();
            }
            Action::Add => {
                self.stats.adds += 1;
                self.add_order(msg);
            }
            Action::Modify => {
                self.stats.modifies += 1;
                self.modify_order(msg);
            }
            Action::Cancel => {
                self.stats.cancels += 1;
                self.cancel_order(msg);
            }
            Action::Trade | Action::Fill | Action::None => {}
        }

        self.stats.active_orders = self.registry.len();
        self.stats.bid_levels = self.bids.len();
        self.stats.ask_levels = self.asks.len();
    }

    /// Snapshot `depth` levels per side.
    pub fn snapshot(&self, depth: usize) -> BookSnapshot {
        build_snapshot(&self.bids, &self.asks, &self.registry, depth)
    }

    /// Snapshot into an existing buffer.
    pub fn snapshot_into(&self, depth: usize, out: &mut BookSnapshot) {
        fill_snapshot(&self.bids, &self.asks, &self.registry, depth, out);
    }

    fn clear(&mut self) {
        self.registry.clear();
        self.bids.clear();
        self.asks.clear();
    }

    #[inline]
    fn ladder_mut(&mut self, side: Side) -> Option<&mut PriceLadder> {
        match side {
            Side::Bid => Some(&mut self.bids),
            Side::Ask => Some(&mut self.asks),
            Side::None => None,
        }
    }

    fn add_order(&mut self, msg: &MboMessage) {
        if msg.is_tob() {
            self.replace_top_of_book(msg);
        } else if self.registry.contains(msg.order_id) {
            log::debug!("add for resting order {} applied as modify", msg.order_id);
            self.modify_order(msg);
        } else {
            self.insert_order(msg);
        }
    }

    /// Non-TOB add path: register the order and queue it at the back.
    fn insert_order(&mut self, msg: &MboMessage) {
        if msg.side == Side::None || !msg.has_price() || msg.size == 0 {
            self.ignore(msg, "cannot rest");
            return;
        }

        let order = RestingOrder::from_message(msg);
        self.registry.insert(msg.order_id, order);
        if let Some(ladder) = self.ladder_mut(order.side) {
            ladder.push_back(order.price, msg.order_id);
        }
    }

    fn replace_top_of_book(&mut self, msg: &MboMessage) {
        if msg.side == Side::None {
            self.ignore(msg, "top-of-book without side");
            return;
        }
        if let Some(ladder) = self.ladder_mut(msg.side) {
            ladder.replace_with_synthetic(msg.price);
        }
        self.stats.tob_replacements += 1;

        let dropped = self.registry.remove_side(msg.side);
        if dropped > 0 && self.config.log_warnings {
            log::warn!(
                "Top-of-book replacement on {:?} discarded {} resting orders (message #{})",
                msg.side,
                dropped,
                self.stats.messages
            );
        }
    }

    fn cancel_order(&mut self, msg: &MboMessage) {
        let Some(order) = self.registry.get_mut(msg.order_id) else {
            // Already gone or never seen; tolerated for partial feeds.
            self.stats.unknown_cancels += 1;
            log::debug!("cancel for unknown order {}", msg.order_id);
            return;
        };
        order.size = order.size.saturating_sub(msg.size);
        let order = *order;

        if let Some(ladder) = self.ladder_mut(order.side) {
            ladder.remove(order.price, msg.order_id);
            if order.size > 0 {
                ladder.push_back(order.price, msg.order_id);
            }
        }
        if order.size == 0 {
            self.registry.remove(msg.order_id);
        }
    }

    fn modify_order(&mut self, msg: &MboMessage) {
        let Some(old) = self.registry.get(msg.order_id).copied() else {
            self.stats.implicit_adds += 1;
            self.insert_order(msg);
            return;
        };

        if msg.size == 0 {
            if let Some(ladder) = self.ladder_mut(old.side) {
                ladder.remove(old.price, msg.order_id);
            }
            self.registry.remove(msg.order_id);
            return;
        }
        if !msg.has_price() {
            self.ignore(msg, "modify without price");
            return;
        }
        if msg.side != old.side && msg.side != Side::None {
            log::debug!(
                "modify for order {} on {:?} keeps it on {:?}",
                msg.order_id,
                msg.side,
                old.side
            );
        }

        let new = old.updated_from(msg);
        self.registry.insert(msg.order_id, new);

        let requeue = new.price != old.price || new.size > old.size;
        if requeue {
            if let Some(ladder) = self.ladder_mut(old.side) {
                ladder.remove(old.price, msg.order_id);
                ladder.push_back(new.price, msg.order_id);
            }
        }
    }

    fn ignore(&mut self, msg: &MboMessage, reason: &str) {
        self.stats.ignored += 1;
        log::debug!(
            "ignored {:?} for order {} ({reason})",
            msg.action,
            msg.order_id
        );
    }

    /// Reset to an empty book and zeroed statistics.
    pub fn reset(&mut self) {
        self.clear();
        self.stats = BookStats::default();
    }

    /// Get current statistics.
    pub fn stats(&self) -> &BookStats {
        &self.stats
    }

    /// Get number of resting orders.
    pub fn order_count(&self) -> usize {
        self.registry.len()
    }

    /// Get number of price levels on bid side.
    pub fn bid_levels(&self) -> usize {
        self.bids.len()
    }

    /// Get number of price levels on ask side.
    pub fn ask_levels(&self) -> usize {
        self.asks.len()
    }

    /// Look up a resting order.
    pub fn order(&self, order_id: u64) -> Option<&RestingOrder> {
        self.registry.get(order_id)
    }

    /// Position of a resting order within its price queue (0 = front).
    pub fn queue_position(&self, order_id: u64) -> Option<usize> {
        let order = self.registry.get(order_id)?;
        match order.side {
            Side::Bid => self.bids.position(order.price, order_id),
            Side::Ask => self.asks.position(order.price, order_id),
            Side::None => None,
        }
    }

    /// Resting orders.
    pub fn registry(&self) -> &OrderRegistry {
        &self.registry
    }

    /// Bid ladder.
    pub fn bids(&self) -> &PriceLadder {
        &self.bids
    }

    /// Ask ladder.
    pub fn asks(&self) -> &PriceLadder {
        &self.asks
    }

    /// Verify that registry and ladders agree.
    ///
    /// Every queued id must be registered on the same side and price, no
    /// level may be empty, no order may have zero size, and every
    /// registered order must be queued exactly once.
    pub fn check_invariants(&self) -> std::result::Result<(), String> {
        let mut queued = 0usize;
        for ladder in [&self.bids, &self.asks] {
            for (&price, queue) in ladder.ascending() {
                if queue.is_synthetic() {
                    if ladder.len() != 1 {
                        return Err(format!("synthetic level shares {:?} ladder", ladder.side()));
                    }
                    continue;
                }
                if queue.order_count() == 0 {
                    return Err(format!("empty level at {price}"));
                }
                for order_id in queue.order_ids() {
                    let order = self
                        .registry
                        .get(order_id)
                        .ok_or_else(|| format!("order {order_id} queued but not registered"))?;
                    if order.side != ladder.side() || order.price != price {
                        return Err(format!(
                            "order {order_id} queued at {:?} {price} but rests at {:?} {}",
                            ladder.side(),
                            order.side,
                            order.price
                        ));
                    }
                    queued += 1;
                }
            }
        }

        if let Some((order_id, _)) = self.registry.iter().find(|(_, o)| o.size == 0) {
            return Err(format!("zero size order {order_id}"));
        }
        if queued != self.registry.len() {
            return Err(format!(
                "{} orders registered but {queued} queued",
                self.registry.len()
            ));
        }
        Ok(())
    }

    /// Panic if [`check_invariants`](Self::check_invariants) fails.
    pub fn assert_invariants(&self) {
        if let Err(violation) = self.check_invariants() {
            panic!("book invariant violated: {violation}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::price::UNDEF_PRICE;
    use crate::types::{flags, PriceLevel};

    fn msg(order_id: u64, action: Action, side: Side, price_units: f64, size: u32) -> MboMessage {
        MboMessage::new(order_id, action, side, (price_units * 1e9).round() as i64, size)
    }

    fn px(units: f64) -> i64 {
        (units * 1e9).round() as i64
    }

    #[test]
    fn test_new_book() {
        let book = BookReconstructor::new(10);
        assert_eq!(book.order_count(), 0);
        assert_eq!(book.bid_levels(), 0);
        assert_eq!(book.ask_levels(), 0);
        assert_eq!(book.depth(), 10);
        assert!(book.snapshot(10).is_empty());
    }

    #[test]
    fn test_add_bid_and_ask() {
        let mut book = BookReconstructor::new(10);
        book.apply(&msg(1, Action::Add, Side::Bid, 100.0, 100));
        let snap = book.process_message(&msg(2, Action::Add, Side::Ask, 100.01, 200));

        assert_eq!(snap.bids[0], PriceLevel { price: px(100.0), size: 100, count: 1 });
        assert_eq!(snap.asks[0], PriceLevel { price: px(100.01), size: 200, count: 1 });
        assert_eq!(snap.bids[1], PriceLevel::EMPTY);
        book.assert_invariants();
    }

    #[test]
    fn test_full_cancel_removes_level() {
        let mut book = BookReconstructor::new(10);
        book.apply(&msg(1, Action::Add, Side::Bid, 10.5, 5));
        let snap = book.process_message(&msg(1, Action::Cancel, Side::Bid, 10.5, 5));

        assert!(snap.bids.iter().all(|l| l.price != px(10.5)));
        assert_eq!(book.order_count(), 0);
        assert_eq!(book.bid_levels(), 0);
        book.assert_invariants();
    }

    #[test]
    fn test_partial_cancel_keeps_level() {
        let mut book = BookReconstructor::new(10);
        book.apply(&msg(1, Action::Add, Side::Bid, 10.5, 10));
        let snap = book.process_message(&msg(1, Action::Cancel, Side::Bid, 10.5, 4));

        assert_eq!(snap.bids[0], PriceLevel { price: px(10.5), size: 6, count: 1 });
        assert_eq!(book.order(1).map(|o| o.size), Some(6));
    }

    #[test]
    fn test_oversized_cancel_floors_at_zero() {
        let mut book = BookReconstructor::new(10);
        book.apply(&msg(1, Action::Add, Side::Ask, 10.5, 3));
        book.apply(&msg(1, Action::Cancel, Side::Ask, 10.5, 50));
        assert_eq!(book.order_count(), 0);
        assert_eq!(book.ask_levels(), 0);
    }

    #[test]
    fn test_partial_cancel_requeues_at_back() {
        let mut book = BookReconstructor::new(10);
        book.apply(&msg(1, Action::Add, Side::Bid, 10.0, 10));
        book.apply(&msg(2, Action::Add, Side::Bid, 10.0, 10));
        book.apply(&msg(1, Action::Cancel, Side::Bid, 10.0, 1));

        assert_eq!(book.queue_position(2), Some(0));
        assert_eq!(book.queue_position(1), Some(1));
    }

    #[test]
    fn test_cancel_uses_resting_side() {
        let mut book = BookReconstructor::new(10);
        book.apply(&msg(1, Action::Add, Side::Bid, 10.0, 10));
        book.apply(&msg(1, Action::Cancel, Side::Ask, 10.0, 10));
        assert_eq!(book.bid_levels(), 0);
        book.assert_invariants();
    }

    #[test]
    fn test_unknown_cancel_is_noop() {
        let mut book = BookReconstructor::new(10);
        let snap = book.process_message(&msg(999, Action::Cancel, Side::Bid, 1.0, 5));
        assert!(snap.is_empty());
        assert_eq!(book.stats().unknown_cancels, 1);
    }

    #[test]
    fn test_modify_unknown_is_add() {
        let mut book = BookReconstructor::new(10);
        let snap = book.process_message(&msg(5, Action::Modify, Side::Ask, 20.0, 7));
        assert_eq!(snap.asks[0], PriceLevel { price: px(20.0), size: 7, count: 1 });
        assert_eq!(book.stats().implicit_adds, 1);
    }

    #[test]
    fn test_modify_unknown_ignores_tob_flag() {
        let mut book = BookReconstructor::new(10);
        book.apply(&msg(1, Action::Add, Side::Ask, 21.0, 1));
        book.apply(&msg(5, Action::Modify, Side::Ask, 20.0, 7).with_flags(flags::TOB));
        assert_eq!(book.order_count(), 2);
        assert!(!book.asks().is_synthetic());
    }

    #[test]
    fn test_modify_price_moves_to_back_of_new_level() {
        let mut book = BookReconstructor::new(10);
        book.apply(&msg(1, Action::Add, Side::Bid, 10.0, 5));
        book.apply(&msg(2, Action::Add, Side::Bid, 10.1, 5));
        let snap = book.process_message(&msg(1, Action::Modify, Side::Bid, 10.1, 4));

        assert_eq!(snap.bids[0], PriceLevel { price: px(10.1), size: 9, count: 2 });
        assert_eq!(snap.bids[1], PriceLevel::EMPTY);
        assert_eq!(book.queue_position(1), Some(1));
        book.assert_invariants();
    }

    #[test]
    fn test_modify_size_increase_loses_priority() {
        let mut book = BookReconstructor::new(10);
        book.apply(&msg(1, Action::Add, Side::Ask, 10.0, 5));
        book.apply(&msg(2, Action::Add, Side::Ask, 10.0, 5));
        book.apply(&msg(1, Action::Modify, Side::Ask, 10.0, 6));

        assert_eq!(book.queue_position(2), Some(0));
        assert_eq!(book.queue_position(1), Some(1));
        assert_eq!(book.snapshot(1).asks[0].size, 11);
    }

    #[test]
    fn test_modify_size_decrease_keeps_priority() {
        let mut book = BookReconstructor::new(10);
        book.apply(&msg(1, Action::Add, Side::Ask, 10.0, 5));
        book.apply(&msg(2, Action::Add, Side::Ask, 10.0, 5));
        book.apply(&msg(1, Action::Modify, Side::Ask, 10.0, 2));
        book.apply(&msg(2, Action::Modify, Side::Ask, 10.0, 5));

        assert_eq!(book.queue_position(1), Some(0));
        assert_eq!(book.queue_position(2), Some(1));
        assert_eq!(book.snapshot(1).asks[0].size, 7);
    }

    #[test]
    fn test_modify_overwrites_flags_in_place() {
        let mut book = BookReconstructor::new(10);
        book.apply(&msg(1, Action::Add, Side::Bid, 10.0, 5));
        book.apply(&msg(1, Action::Modify, Side::Bid, 10.0, 5).with_flags(flags::LAST).with_sequence(9));
        let order = book.order(1).unwrap();
        assert_eq!(order.flags, flags::LAST);
        assert_eq!(order.sequence, 9);
    }

    #[test]
    fn test_modify_keeps_resting_side() {
        let mut book = BookReconstructor::new(10);
        book.apply(&msg(1, Action::Add, Side::Bid, 10.0, 5));
        book.apply(&msg(1, Action::Modify, Side::Ask, 11.0, 5));
        assert_eq!(book.bid_levels(), 1);
        assert_eq!(book.ask_levels(), 0);
        assert_eq!(book.order(1).map(|o| o.side), Some(Side::Bid));
        book.assert_invariants();
    }

    #[test]
    fn test_modify_to_zero_removes_order() {
        let mut book = BookReconstructor::new(10);
        book.apply(&msg(1, Action::Add, Side::Bid, 10.0, 5));
        book.apply(&msg(1, Action::Modify, Side::Bid, 10.0, 0));
        assert_eq!(book.order_count(), 0);
        assert_eq!(book.bid_levels(), 0);
    }

    #[test]
    fn test_duplicate_add_is_modify() {
        let mut book = BookReconstructor::new(10);
        book.apply(&msg(1, Action::Add, Side::Bid, 10.0, 5));
        book.apply(&msg(1, Action::Add, Side::Bid, 10.2, 3));
        let snap = book.snapshot(10);
        assert_eq!(book.order_count(), 1);
        assert_eq!(snap.bids[0], PriceLevel { price: px(10.2), size: 3, count: 1 });
        assert_eq!(snap.bids[1], PriceLevel::EMPTY);
        book.assert_invariants();
    }

    #[test]
    fn test_unplaceable_adds_are_ignored() {
        let mut book = BookReconstructor::new(10);
        book.apply(&msg(1, Action::Add, Side::None, 10.0, 5));
        book.apply(&MboMessage::new(2, Action::Add, Side::Bid, UNDEF_PRICE, 5));
        book.apply(&msg(3, Action::Add, Side::Bid, 10.0, 0));
        assert_eq!(book.order_count(), 0);
        assert_eq!(book.stats().ignored, 3);
    }

    #[test]
    fn test_tob_add_replaces_side() {
        let mut book = BookReconstructor::with_config(BookConfig::new(10).with_logging(false));
        book.apply(&msg(1, Action::Add, Side::Ask, 10.0, 5));
        book.apply(&msg(2, Action::Add, Side::Ask, 10.1, 5));
        book.apply(&msg(3, Action::Add, Side::Bid, 9.9, 5));
        let snap = book.process_message(&msg(4, Action::Add, Side::Ask, 10.5, 9).with_flags(flags::TOB));

        assert_eq!(snap.asks[0], PriceLevel { price: px(10.5), size: 0, count: 0 });
        assert_eq!(snap.asks[1], PriceLevel::EMPTY);
        assert_eq!(snap.bids[0].count, 1);
        assert_eq!(book.order_count(), 1);
        assert!(book.order(4).is_none());
        assert_eq!(book.stats().tob_replacements, 1);
        book.assert_invariants();
    }

    #[test]
    fn test_tob_add_without_price_empties_side() {
        let mut book = BookReconstructor::new(10);
        book.apply(&msg(1, Action::Add, Side::Bid, 10.0, 5).with_flags(flags::TOB));
        let tob_clear = MboMessage::new(0, Action::Add, Side::Bid, UNDEF_PRICE, 0).with_flags(flags::TOB);
        let snap = book.process_message(&tob_clear);
        assert!(snap.is_empty());
    }

    #[test]
    fn test_real_add_clears_synthetic_level() {
        let mut book = BookReconstructor::new(10);
        book.apply(&msg(1, Action::Add, Side::Bid, 10.0, 5).with_flags(flags::TOB));
        let snap = book.process_message(&msg(2, Action::Add, Side::Bid, 9.0, 3));

        assert_eq!(snap.bids[0], PriceLevel { price: px(9.0), size: 3, count: 1 });
        assert_eq!(snap.bids[1], PriceLevel::EMPTY);
        book.assert_invariants();
    }

    #[test]
    fn test_clear_resets_book() {
        let mut book = BookReconstructor::new(10);
        book.apply(&msg(1, Action::Add, Side::Bid, 10.0, 5));
        book.apply(&msg(2, Action::Add, Side::Ask, 11.0, 5).with_flags(flags::TOB));
        let snap = book.process_message(&MboMessage::clear());

        assert_eq!(snap, BookSnapshot::empty(10));
        assert_eq!(book.order_count(), 0);
        assert!(!book.asks().is_synthetic());
        assert_eq!(book.stats().clears, 1);
    }

    #[test]
    fn test_non_structural_actions_do_not_mutate() {
        let mut book = BookReconstructor::new(10);
        book.apply(&msg(1, Action::Add, Side::Bid, 10.0, 5));
        let before = book.snapshot(10);
        for action in [Action::Trade, Action::Fill, Action::None] {
            let snap = book.process_message(&msg(1, action, Side::Bid, 10.0, 5));
            assert_eq!(snap, before);
        }
        assert_eq!(book.stats().non_structural, 3);
    }

    #[test]
    fn test_non_structural_actions_skip_structural_counters() {
        let mut book = BookReconstructor::new(10);
        for action in [Action::Trade, Action::Fill, Action::None] {
            book.apply(&msg(7, action, Side::Ask, 11.0, 3));
        }

        let stats = book.stats();
        assert_eq!(stats.messages, 3);
        assert_eq!(stats.non_structural, 3);
        assert_eq!(stats.adds + stats.modifies + stats.cancels + stats.clears, 0);
        assert_eq!(stats.implicit_adds, 0);
        assert_eq!(stats.unknown_cancels, 0);
        assert!(book.order(7).is_none());
        assert_eq!(book.ask_levels(), 0);
    }

    #[test]
    fn test_statistics() {
        let mut book = BookReconstructor::new(10);
        book.apply(&msg(1, Action::Add, Side::Bid, 10.0, 5));
        book.apply(&msg(2, Action::Add, Side::Ask, 11.0, 5));
        book.apply(&msg(2, Action::Modify, Side::Ask, 11.5, 5));
        book.apply(&msg(1, Action::Cancel, Side::Bid, 10.0, 2));

        let stats = book.stats();
        assert_eq!(stats.messages, 4);
        assert_eq!(stats.adds, 2);
        assert_eq!(stats.modifies, 1);
        assert_eq!(stats.cancels, 1);
        assert_eq!(stats.active_orders, 2);
        assert_eq!(stats.bid_levels, 1);
        assert_eq!(stats.ask_levels, 1);
    }

    #[test]
    fn test_reset() {
        let mut book = BookReconstructor::new(10);
        book.apply(&msg(1, Action::Add, Side::Bid, 10.0, 5));
        book.reset();
        assert_eq!(book.order_count(), 0);
        assert_eq!(book.stats(), &BookStats::default());
    }

    #[test]
    fn test_process_message_into() {
        let mut book = BookReconstructor::new(3);
        let mut snap = BookSnapshot::empty(3);
        book.process_message_into(&msg(1, Action::Add, Side::Ask, 10.0, 5), &mut snap);
        assert_eq!(snap.asks[0].size, 5);
        assert_eq!(snap.asks.len(), 3);
    }

    #[test]
    fn test_check_invariants_detects_drift() {
        let mut book = BookReconstructor::new(10);
        book.apply(&msg(1, Action::Add, Side::Bid, 10.0, 5));
        assert!(book.check_invariants().is_ok());

        book.registry.remove(1);
        assert!(book.check_invariants().is_err());
    }

    #[test]
    fn test_config_builder() {
        let config = BookConfig::default().with_depth(5).with_logging(false);
        assert_eq!(config.depth, 5);
        assert!(!config.log_warnings);
        assert!(config.validate().is_ok());
        assert!(BookConfig::new(0).validate().is_err());
    }
}
