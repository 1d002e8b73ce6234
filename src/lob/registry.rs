//! Order registry: the single owner of resting order state.
//!
//! Ladders refer to orders by id only. Every size, price or side change goes
//! through this map, so a relocation is "remove id from old bucket, update
//! value here, append id to new bucket".

use ahash::AHashMap;

use crate::types::{MboMessage, Side};

/// State kept for an order between events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestingOrder {
    pub side: Side,
    pub price: i64,
    pub size: u32,
    pub flags: u8,
    /// Sequence number of the last event that touched the order
    pub sequence: u32,
}

impl RestingOrder {
    /// Build from an add (or implicit add) event.
    pub fn from_message(msg: &MboMessage) -> Self {
        Self {
            side: msg.side,
            price: msg.price,
            size: msg.size,
            flags: msg.flags,
            sequence: msg.sequence,
        }
    }

    /// Overwrite from a modify event. The side an order rests on is fixed.
    pub fn updated_from(self, msg: &MboMessage) -> Self {
        Self {
            side: self.side,
            price: msg.price,
            size: msg.size,
            flags: msg.flags,
            sequence: msg.sequence,
        }
    }
}

/// Resting orders keyed by order id.
#[derive(Debug, Clone, Default)]
pub struct OrderRegistry {
    orders: AHashMap<u64, RestingOrder>,
}

impl OrderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-allocate for `capacity` orders.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            orders: AHashMap::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn get(&self, order_id: u64) -> Option<&RestingOrder> {
        self.orders.get(&order_id)
    }

    #[inline]
    pub fn get_mut(&mut self, order_id: u64) -> Option<&mut RestingOrder> {
        self.orders.get_mut(&order_id)
    }

    #[inline]
    pub fn contains(&self, order_id: u64) -> bool {
        self.orders.contains_key(&order_id)
    }

    /// Insert or overwrite, returning the previous value.
    ///
    /// Zero-size orders must not be stored; callers remove instead.
    #[inline]
    pub fn insert(&mut self, order_id: u64, order: RestingOrder) -> Option<RestingOrder> {
        debug_assert!(order.size > 0, "zero-size order {order_id} inserted");
        self.orders.insert(order_id, order)
    }

    #[inline]
    pub fn remove(&mut self, order_id: u64) -> Option<RestingOrder> {
        self.orders.remove(&order_id)
    }

    /// Drop every order resting on `side`, returning how many went.
    pub fn remove_side(&mut self, side: Side) -> usize {
        let before = self.orders.len();
        self.orders.retain(|_, order| order.side != side);
        before - self.orders.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn clear(&mut self) {
        self.orders.clear();
    }

    /// Iterate over all (order_id, order) pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&u64, &RestingOrder)> {
        self.orders.iter()
    }
}
