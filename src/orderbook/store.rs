//! Slab-backed order storage.
//!
//! ## Design
//!
//! Orders live in a single arena owned by the caller. Price levels, their
//! staged state and the orchestrator all refer to an order through its slab
//! key ([`OrderKey`]), so an order can sit in a queue, a rollback log and an
//! external index at once without shared references.
//!
//! Per the slab docs (https://docs.rs/slab/0.4.11), keys are reused after
//! removal. Callers must drop every handle to an order before removing it.

use slab::Slab;

use crate::orderbook::LevelError;
use crate::types::Order;

/// Stable handle to an order inside an [`OrderStore`].
pub type OrderKey = usize;

/// Arena of orders addressed by [`OrderKey`].
///
/// ## Example
///
/// ```
/// use price_level::orderbook::OrderStore;
/// use price_level::types::{Order, Side};
///
/// let mut store = OrderStore::with_capacity(16);
/// let key = store.insert(Order::new(1, Side::Buy, 100, 10, 0));
///
/// assert_eq!(store.get(key).unwrap().id, 1);
/// assert_eq!(store.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct OrderStore {
    orders: Slab<Order>,
}

impl OrderStore {
    pub fn new() -> Self {
        Self {
            orders: Slab::new(),
        }
    }

    /// Create a store with `capacity` pre-allocated slots
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            orders: Slab::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.orders.capacity()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Take ownership of an order.
    ///
    /// # Returns
    ///
    /// The handle every level and the orchestrator use to refer to it
    pub fn insert(&mut self, order: Order) -> OrderKey {
        self.orders.insert(order)
    }

    /// Remove an order from the arena, returning it if the key was live
    pub fn remove(&mut self, key: OrderKey) -> Option<Order> {
        self.orders.try_remove(key)
    }

    #[inline]
    pub fn contains(&self, key: OrderKey) -> bool {
        self.orders.contains(key)
    }

    /// Look up an order by handle.
    ///
    /// # Errors
    ///
    /// [`LevelError::UnknownOrder`] if `key` is not live
    pub fn get(&self, key: OrderKey) -> Result<&Order, LevelError> {
        self.orders.get(key).ok_or(LevelError::UnknownOrder(key))
    }

    pub fn get_mut(&mut self, key: OrderKey) -> Result<&mut Order, LevelError> {
        self.orders.get_mut(key).ok_or(LevelError::UnknownOrder(key))
    }

    /// Iterate over all live orders with their keys
    pub fn iter(&self) -> impl Iterator<Item = (OrderKey, &Order)> {
        self.orders.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Side;

    #[test]
    fn test_store_insert_get() {
        let mut store = OrderStore::with_capacity(4);
        assert!(store.capacity() >= 4);
        assert!(store.is_empty());

        let a = store.insert(Order::new(1, Side::Buy, 100, 10, 0));
        let b = store.insert(Order::new(2, Side::Buy, 100, 20, 0));

        assert_ne!(a, b);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(b).unwrap().volume, 20);

        store.get_mut(a).unwrap().fill(4);
        assert_eq!(store.get(a).unwrap().filled, 4);
    }

    #[test]
    fn test_store_unknown_key() {
        let mut store = OrderStore::new();

        assert_eq!(store.get(9).unwrap_err(), LevelError::UnknownOrder(9));
        assert!(store.get_mut(9).is_err());
        assert!(store.remove(9).is_none());
    }

    #[test]
    fn test_store_remove() {
        let mut store = OrderStore::new();
        let key = store.insert(Order::new(1, Side::Sell, 100, 10, 0));

        let removed = store.remove(key).unwrap();
        assert_eq!(removed.id, 1);
        assert!(!store.contains(key));
        assert_eq!(store.iter().count(), 0);
    }
}
