//! Matching queue for all orders at a single price.
//!
//! ## Design
//!
//! A `PriceLevel` holds two collections of [`OrderKey`] handles into an
//! [`OrderStore`]:
//!
//! ```text
//! orders:      front (oldest) -> ... -> back (newest)   FIFO, matched from the front
//! stop_orders: { parked stop orders triggering at this price }
//! ```
//!
//! ## Transactions
//!
//! `cross` mutates the queue and the orders it touches in place. Everything
//! needed to undo it is staged as it happens:
//!
//! - `orders_staged`: makers popped from the queue, in pop order
//! - `stop_orders_staged`: the stop list before its first change
//! - `fills_staged`: the quantity this level executed against every touched
//!   order, the taker included
//!
//! The orchestrator ends every attempt with [`PriceLevel::commit`] (drop the
//! staged state) or [`PriceLevel::revert`] (restore it). Revert subtracts only
//! what this level applied, so the levels of one attempt can be reverted in
//! any order.

use std::cmp::Ordering;
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use sha2::{Digest, Sha256};
use tracing::{debug, error, trace, warn};

use crate::collector::Collector;
use crate::orderbook::{LevelError, OrderKey, OrderStore};
use crate::types::{Order, OrderFlag};

/// What a `cross` left of the taker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrossStatus {
    /// Nothing left to do: the taker is fully executed, was already filled,
    /// or was a stop order parked at this level
    Filled,
    /// The level ran out of liquidity; continue with the taker at the next level
    Exhausted(OrderKey),
    /// An all-or-none taker could not be satisfied; roll the attempt back
    Rejected(OrderKey),
}

impl CrossStatus {
    /// The taker handle handed back to the orchestrator, if any
    pub fn taker(&self) -> Option<OrderKey> {
        match self {
            CrossStatus::Filled => None,
            CrossStatus::Exhausted(key) | CrossStatus::Rejected(key) => Some(*key),
        }
    }

    #[inline]
    pub fn is_filled(&self) -> bool {
        matches!(self, CrossStatus::Filled)
    }
}

/// Result of crossing a taker against a level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrossOutcome {
    pub status: CrossStatus,
    /// Stop orders released because a trade printed at this price.
    /// The orchestrator activates and routes them.
    pub triggered_stops: Vec<OrderKey>,
}

impl CrossOutcome {
    fn new(status: CrossStatus, triggered_stops: Vec<OrderKey>) -> Self {
        Self {
            status,
            triggered_stops,
        }
    }

    fn filled() -> Self {
        Self::new(CrossStatus::Filled, Vec::new())
    }
}

/// All resting orders at one price, with rollback support.
///
/// ## Example
///
/// ```
/// use std::sync::Arc;
/// use price_level::collector::EventCollector;
/// use price_level::orderbook::{CrossStatus, OrderStore, PriceLevel};
/// use price_level::types::{Order, Side};
///
/// let collector = Arc::new(EventCollector::new());
/// let mut store = OrderStore::new();
/// let mut level = PriceLevel::new(100, collector.clone());
///
/// let maker = store.insert(Order::new(1, Side::Sell, 100, 10, 0));
/// level.add(maker, &store).unwrap();
///
/// let taker = store.insert(Order::new(2, Side::Buy, 100, 4, 1));
/// let outcome = level.cross(taker, &mut store).unwrap();
/// level.commit();
///
/// assert_eq!(outcome.status, CrossStatus::Filled);
/// assert_eq!(level.volume(&store).unwrap(), 6);
/// ```
pub struct PriceLevel {
    price: u64,
    orders: VecDeque<OrderKey>,
    orders_staged: Vec<OrderKey>,
    stop_orders: Vec<OrderKey>,
    stop_orders_staged: Option<Vec<OrderKey>>,
    fills_staged: Vec<(OrderKey, u64)>,
    collector: Arc<dyn Collector>,
}

impl fmt::Debug for PriceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PriceLevel")
            .field("price", &self.price)
            .field("orders", &self.orders)
            .field("orders_staged", &self.orders_staged)
            .field("stop_orders", &self.stop_orders)
            .field("stop_orders_staged", &self.stop_orders_staged)
            .field("fills_staged", &self.fills_staged)
            .finish_non_exhaustive()
    }
}

impl PriceLevel {
    /// Create an empty level.
    ///
    /// # Arguments
    ///
    /// * `price` - The price for this level (fixed-point)
    /// * `collector` - Receives the lifecycle notifications of orders here
    pub fn new(price: u64, collector: Arc<dyn Collector>) -> Self {
        Self::with_capacity(price, collector, 0)
    }

    /// Create an empty level with room for `capacity` resting orders
    pub fn with_capacity(price: u64, collector: Arc<dyn Collector>, capacity: usize) -> Self {
        Self {
            price,
            orders: VecDeque::with_capacity(capacity),
            orders_staged: Vec::new(),
            stop_orders: Vec::new(),
            stop_orders_staged: None,
            fills_staged: Vec::new(),
            collector,
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    #[inline]
    pub fn price(&self) -> u64 {
        self.price
    }

    /// Number of active (matchable) orders
    #[inline]
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    #[inline]
    pub fn stop_len(&self) -> usize {
        self.stop_orders.len()
    }

    #[inline]
    pub fn contains(&self, key: OrderKey) -> bool {
        self.orders.contains(&key)
    }

    /// The order with time priority, matched first
    #[inline]
    pub fn front(&self) -> Option<OrderKey> {
        self.orders.front().copied()
    }

    /// Active orders in time priority
    pub fn iter(&self) -> impl Iterator<Item = OrderKey> + '_ {
        self.orders.iter().copied()
    }

    pub fn stop_orders(&self) -> &[OrderKey] {
        &self.stop_orders
    }

    /// True while a matching attempt has staged state awaiting commit or revert
    pub fn in_transaction(&self) -> bool {
        !self.orders_staged.is_empty()
            || self.stop_orders_staged.is_some()
            || !self.fills_staged.is_empty()
    }

    /// Total open quantity of the active orders: sum of `volume - filled`
    pub fn volume(&self, store: &OrderStore) -> Result<u64, LevelError> {
        self.orders.iter().try_fold(0u64, |sum, &key| {
            Ok(sum.saturating_add(store.get(key)?.remaining()))
        })
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Rest an order at this level.
    ///
    /// Stop orders are parked (idempotently) without notification. Any other
    /// order is appended to the queue with an open notification, or, if it is
    /// already queued, reported as changed and left in place.
    ///
    /// # Errors
    ///
    /// [`LevelError::PriceMismatch`] if the order's price is not this level's
    pub fn add(&mut self, key: OrderKey, store: &OrderStore) -> Result<(), LevelError> {
        let order = self.checked_order(key, store)?;

        if order.is_stop() {
            if !self.stop_orders.contains(&key) {
                debug!(key, price = self.price, "parking stop order");
                self.stop_orders.push(key);
            }
        } else if self.orders.contains(&key) {
            self.collector.change(key, order, false);
        } else {
            debug!(key, price = self.price, "order opened");
            self.orders.push_back(key);
            self.collector.open(key, order);
        }
        Ok(())
    }

    /// Withdraw an active order from the queue.
    ///
    /// # Errors
    ///
    /// [`LevelError::OrderNotFound`] if the order is at another price or is not
    /// in the active queue.
    pub fn remove(&mut self, key: OrderKey, store: &OrderStore) -> Result<OrderKey, LevelError> {
        let order = store.get(key)?;
        let position = self.orders.iter().position(|&queued| queued == key);

        let position = match position {
            Some(position) if order.price == self.price => position,
            _ => {
                return Err(LevelError::OrderNotFound {
                    key,
                    price: self.price,
                })
            }
        };

        self.orders.remove(position);
        debug!(key, price = self.price, "order removed");
        self.collector.cancel(key, order);
        Ok(key)
    }

    // ========================================================================
    // Matching
    // ========================================================================

    /// Match `taker` against the resting orders in time priority.
    ///
    /// Makers are consumed from the front of the queue until the taker is
    /// filled or the queue is empty. Flags are honored on both sides:
    ///
    /// - a FOK/AON maker that would be only partially consumed is cancelled
    /// - an IOC maker is cancelled after a partial execution instead of requeued
    /// - an AON taker that a maker cannot complete aborts with
    ///   [`CrossStatus::Rejected`]
    ///
    /// When any quantity executes, every stop order parked here is released in
    /// [`CrossOutcome::triggered_stops`].
    ///
    /// # Arguments
    ///
    /// * `taker` - The incoming order, filled in place
    /// * `store` - Arena holding the taker and every order at this level
    ///
    /// # Returns
    ///
    /// What is left of the taker and the stop orders released by this cross.
    /// On error the level is left mid-attempt; call [`PriceLevel::revert`].
    pub fn cross(
        &mut self,
        taker: OrderKey,
        store: &mut OrderStore,
    ) -> Result<CrossOutcome, LevelError> {
        let (is_stop, is_filled, taker_flag) = {
            let order = store.get(taker)?;
            (order.is_stop(), order.is_filled(), order.flag())
        };

        if is_stop {
            self.stage_stops();
            self.add(taker, store)?;
            return Ok(CrossOutcome::filled());
        }

        if is_filled {
            return Ok(CrossOutcome::filled());
        }

        let mut executed = false;

        while !store.get(taker)?.is_filled() {
            let Some(maker) = self.orders.pop_front() else {
                break;
            };
            self.stage_order(maker);

            let to_fill = store.get(taker)?.remaining();
            let (maker_remaining, maker_flag) = {
                let order = self.checked_order(maker, store)?;
                (order.remaining(), order.flag())
            };

            trace!(
                taker,
                maker,
                to_fill,
                maker_remaining,
                price = self.price,
                "crossing maker"
            );

            match maker_remaining.cmp(&to_fill) {
                Ordering::Greater => {
                    if maker_flag.requires_full_fill() {
                        self.collector.cancel(maker, store.get(maker)?);
                        continue;
                    }

                    self.execute(taker, maker, to_fill, store)?;
                    executed = true;

                    self.collector.fill(taker, store.get(taker)?, false);
                    self.collector.change(maker, store.get(maker)?, true);

                    if maker_flag == OrderFlag::ImmediateOrCancel {
                        self.collector.cancel(maker, store.get(maker)?);
                    } else {
                        self.orders.push_front(maker);
                    }
                }
                Ordering::Less => {
                    if taker_flag == OrderFlag::AllOrNone {
                        // kept until the attempt is reverted
                        let applied = store.get_mut(taker)?.fill(maker_remaining);
                        self.stage_fill(taker, applied);
                        self.orders.push_front(maker);
                        warn!(
                            taker,
                            maker,
                            price = self.price,
                            "all-or-none taker cannot complete"
                        );
                        return Ok(CrossOutcome::new(
                            CrossStatus::Rejected(taker),
                            Vec::new(),
                        ));
                    }

                    self.execute(taker, maker, maker_remaining, store)?;
                    executed = true;

                    self.collector.change(taker, store.get(taker)?, false);
                    self.collector.fill(maker, store.get(maker)?, true);
                }
                Ordering::Equal => {
                    self.execute(taker, maker, to_fill, store)?;
                    executed = true;

                    self.collector.fill(taker, store.get(taker)?, false);
                    self.collector.fill(maker, store.get(maker)?, true);
                }
            }
        }

        let triggered_stops = if executed {
            self.release_stops()
        } else {
            Vec::new()
        };

        let order = store.get(taker)?;
        if order.is_filled() {
            self.collector.trade(taker, order);
            Ok(CrossOutcome::new(CrossStatus::Filled, triggered_stops))
        } else {
            // level exhausted, taker still has volume
            Ok(CrossOutcome::new(CrossStatus::Exhausted(taker), triggered_stops))
        }
    }

    // ========================================================================
    // Transaction control
    // ========================================================================

    /// Drop every resting order, parked stop and staged entry.
    pub fn clear(&mut self) {
        self.orders.clear();
        self.orders_staged.clear();
        self.stop_orders.clear();
        self.stop_orders_staged = None;
        self.fills_staged.clear();
    }

    /// Accept the last matching attempt.
    ///
    /// The queue already reflects the attempt, so only the staged state is
    /// discarded.
    pub fn commit(&mut self) {
        if self.in_transaction() {
            debug!(
                price = self.price,
                touched = self.orders_staged.len(),
                "level commit"
            );
        }
        self.orders_staged.clear();
        self.stop_orders_staged = None;
        self.fills_staged.clear();
    }

    /// Undo the last matching attempt.
    ///
    /// Restores queue membership and order and the stop list, and takes back
    /// the quantity this level executed against every order it touched.
    pub fn revert(&mut self, store: &mut OrderStore) -> Result<(), LevelError> {
        debug!(
            price = self.price,
            touched = self.orders_staged.len(),
            "level revert"
        );

        let staged = std::mem::take(&mut self.orders_staged);
        if !staged.is_empty() {
            // Popped makers were the queue head, in pop order. A requeued maker
            // is back at the front and must not appear twice.
            self.orders.retain(|key| !staged.contains(key));
            for &key in staged.iter().rev() {
                self.orders.push_front(key);
            }
        }

        if let Some(stops) = self.stop_orders_staged.take() {
            self.stop_orders = stops;
        }

        for (key, applied) in std::mem::take(&mut self.fills_staged) {
            let order = store.get_mut(key)?;
            order.filled = order.filled.saturating_sub(applied);
        }
        Ok(())
    }

    // ========================================================================
    // State digest
    // ========================================================================

    /// SHA-256 over the level price and the SSZ encoding of every active order
    /// in queue order, then every parked stop order.
    pub fn state_root(&self, store: &OrderStore) -> Result<[u8; 32], LevelError> {
        let mut hasher = Sha256::new();
        hasher.update(self.price.to_le_bytes());

        hasher.update((self.orders.len() as u64).to_le_bytes());
        for &key in &self.orders {
            hasher.update(encode(key, store)?);
        }
        hasher.update((self.stop_orders.len() as u64).to_le_bytes());
        for &key in &self.stop_orders {
            hasher.update(encode(key, store)?);
        }

        let mut root = [0u8; 32];
        root.copy_from_slice(&hasher.finalize());
        Ok(root)
    }

    /// State root as a hex string
    pub fn state_root_hex(&self, store: &OrderStore) -> Result<String, LevelError> {
        Ok(hex::encode(self.state_root(store)?))
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    /// Fetch an order and verify it belongs at this price.
    fn checked_order<'a>(
        &self,
        key: OrderKey,
        store: &'a OrderStore,
    ) -> Result<&'a Order, LevelError> {
        let order = store.get(key)?;
        if order.price != self.price {
            error!(
                key,
                order_price = order.price,
                level_price = self.price,
                "order at wrong price level"
            );
            return Err(LevelError::PriceMismatch {
                key,
                order_price: order.price,
                level_price: self.price,
            });
        }
        Ok(order)
    }

    fn stage_order(&mut self, key: OrderKey) {
        if !self.orders_staged.contains(&key) {
            self.orders_staged.push(key);
        }
    }

    fn stage_fill(&mut self, key: OrderKey, applied: u64) {
        if applied == 0 {
            return;
        }
        match self.fills_staged.iter_mut().find(|(staged, _)| *staged == key) {
            Some((_, total)) => *total += applied,
            None => self.fills_staged.push((key, applied)),
        }
    }

    /// Trade `quantity` between taker and maker at this price.
    fn execute(
        &mut self,
        taker: OrderKey,
        maker: OrderKey,
        quantity: u64,
        store: &mut OrderStore,
    ) -> Result<(), LevelError> {
        let taker_applied = store.get_mut(taker)?.fill(quantity);
        let maker_applied = store.get_mut(maker)?.fill(quantity);
        self.stage_fill(taker, taker_applied);
        self.stage_fill(maker, maker_applied);

        self.collector
            .execution(store.get(taker)?, store.get(maker)?, self.price, quantity);
        Ok(())
    }

    fn stage_stops(&mut self) {
        if self.stop_orders_staged.is_none() {
            self.stop_orders_staged = Some(self.stop_orders.clone());
        }
    }

    /// Hand every parked stop order to the caller.
    fn release_stops(&mut self) -> Vec<OrderKey> {
        if self.stop_orders.is_empty() {
            return Vec::new();
        }
        self.stage_stops();
        let released = std::mem::take(&mut self.stop_orders);
        debug!(price = self.price, count = released.len(), "stop orders triggered");
        released
    }
}

fn encode(key: OrderKey, store: &OrderStore) -> Result<Vec<u8>, LevelError> {
    let order = store.get(key)?;
    ssz_rs::serialize(order).map_err(|e| LevelError::Serialization(format!("{e:?}")))
}

// ============================================================================
// Unit Tests
// ============================================================================
