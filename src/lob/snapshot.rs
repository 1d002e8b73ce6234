//! Snapshot builder: aggregates both ladders to a fixed depth.
//!
//! Each visited level reports the summed size and the count of real orders
//! queued at it. A synthetic top-of-book level reports its price with zero
//! size and zero count. Sides with fewer than `depth` prices are padded with
//! [`PriceLevel::EMPTY`].

use super::ladder::{LevelQueue, PriceLadder};
use super::registry::OrderRegistry;
use crate::types::{BookSnapshot, PriceLevel};

/// Build a fresh snapshot of `depth` levels per side.
pub fn build_snapshot(
    bids: &PriceLadder,
    asks: &PriceLadder,
    registry: &OrderRegistry,
    depth: usize,
) -> BookSnapshot {
    let mut snapshot = BookSnapshot {
        depth,
        bids: Vec::with_capacity(depth),
        asks: Vec::with_capacity(depth),
    };
    fill_snapshot(bids, asks, registry, depth, &mut snapshot);
    snapshot
}

/// Refill an existing snapshot in place, reusing its buffers.
pub fn fill_snapshot(
    bids: &PriceLadder,
    asks: &PriceLadder,
    registry: &OrderRegistry,
    depth: usize,
    snapshot: &mut BookSnapshot,
) {
    snapshot.depth = depth;
    fill_side(bids.descending(), registry, depth, &mut snapshot.bids);
    fill_side(asks.ascending(), registry, depth, &mut snapshot.asks);
}

fn fill_side<'a>(
    levels: impl Iterator<Item = (&'a i64, &'a LevelQueue)>,
    registry: &OrderRegistry,
    depth: usize,
    out: &mut Vec<PriceLevel>,
) {
    out.clear();
    out.extend(
        levels
            .take(depth)
            .map(|(&price, queue)| aggregate(price, queue, registry)),
    );
    out.resize(depth, PriceLevel::EMPTY);
}

#[inline]
fn aggregate(price: i64, queue: &LevelQueue, registry: &OrderRegistry) -> PriceLevel {
    let mut level = PriceLevel {
        price,
        size: 0,
        count: 0,
    };
    for order_id in queue.order_ids() {
        match registry.get(order_id) {
            Some(order) => {
                level.size += u64::from(order.size);
                level.count += 1;
            }
            None => debug_assert!(false, "order {order_id} queued at {price} but not registered"),
        }
    }
    level
}
