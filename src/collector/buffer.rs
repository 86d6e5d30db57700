//! Buffering collector with per-attempt commit and rollback.

use parking_lot::Mutex;

use crate::collector::{Collector, Event, EventType};
use crate::orderbook::OrderKey;
use crate::types::{Order, Trade};

/// Executions accumulated for the taker in progress.
#[derive(Debug, Default)]
struct Executions {
    makers: Vec<u64>,
    volume: u64,
    /// Sum of price * quantity, scaled by 10^16
    notional: u128,
}

impl Executions {
    /// Volume-weighted execution price, `fallback` when nothing executed
    fn average_price(&self, fallback: u64) -> u64 {
        if self.volume == 0 {
            return fallback;
        }
        u64::try_from(self.notional / self.volume as u128).unwrap_or(fallback)
    }
}

#[derive(Debug)]
struct Buffers {
    /// Events of the attempt in progress
    pending: Vec<Event>,
    /// Trades of the attempt in progress, ids assigned on commit
    pending_trades: Vec<Trade>,
    /// Executions since the last trade record
    executions: Executions,
    events: Vec<Event>,
    trades: Vec<Trade>,
    next_trade_id: u64,
}

impl Default for Buffers {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
            pending_trades: Vec::new(),
            executions: Executions::default(),
            events: Vec::new(),
            trades: Vec::new(),
            next_trade_id: 1,
        }
    }
}

/// Collector that records events and trades in memory.
///
/// Notifications accumulate in a pending buffer. `commit` appends them to the
/// committed log, `revert` discards them, so a rolled back matching attempt
/// leaves no trace.
///
/// Each `trade` notification closes a [`Trade`] over the executions reported
/// since the previous one: the makers in execution order, the executed volume
/// and its volume-weighted price.
///
/// ## Example
///
/// ```
/// use price_level::collector::{Collector, EventCollector, EventType};
/// use price_level::types::{Order, Side};
///
/// let collector = EventCollector::new();
/// let order = Order::new(1, Side::Buy, 100, 10, 0);
///
/// collector.open(0, &order);
/// assert!(collector.events().is_empty());
///
/// collector.commit();
/// assert_eq!(collector.events()[0].event_type, EventType::Open);
/// ```
#[derive(Debug, Default)]
pub struct EventCollector {
    inner: Mutex<Buffers>,
}

impl EventCollector {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, event_type: EventType, key: OrderKey, order: &Order, partial: bool) {
        let event = Event::new(event_type, key, order, partial);
        let mut inner = self.inner.lock();

        if event_type == EventType::Trade {
            let executions = std::mem::take(&mut inner.executions);
            let price = executions.average_price(order.price);
            inner.pending_trades.push(Trade::new(
                0,
                order.id,
                executions.makers,
                price,
                executions.volume,
            ));
        }
        inner.pending.push(event);
    }

    /// Committed events, oldest first
    pub fn events(&self) -> Vec<Event> {
        self.inner.lock().events.clone()
    }

    /// Events of the attempt in progress
    pub fn pending(&self) -> Vec<Event> {
        self.inner.lock().pending.clone()
    }

    /// Committed trades, oldest first
    pub fn trades(&self) -> Vec<Trade> {
        self.inner.lock().trades.clone()
    }

    /// Take the committed events, leaving the log empty
    pub fn drain_events(&self) -> Vec<Event> {
        std::mem::take(&mut self.inner.lock().events)
    }

    /// Committed event types in order, convenient for assertions
    pub fn event_types(&self) -> Vec<EventType> {
        self.inner
            .lock()
            .events
            .iter()
            .map(|event| event.event_type)
            .collect()
    }

    /// Drop all pending and committed state
    pub fn clear(&self) {
        *self.inner.lock() = Buffers::default();
    }
}

impl Collector for EventCollector {
    fn open(&self, key: OrderKey, order: &Order) {
        self.push(EventType::Open, key, order, false);
    }

    fn change(&self, key: OrderKey, order: &Order, partial: bool) {
        self.push(EventType::Change, key, order, partial);
    }

    fn cancel(&self, key: OrderKey, order: &Order) {
        self.push(EventType::Cancel, key, order, false);
    }

    fn fill(&self, key: OrderKey, order: &Order, partial: bool) {
        self.push(EventType::Fill, key, order, partial);
    }

    fn trade(&self, key: OrderKey, order: &Order) {
        self.push(EventType::Trade, key, order, false);
    }

    fn execution(&self, _taker: &Order, maker: &Order, price: u64, quantity: u64) {
        let mut inner = self.inner.lock();
        let executions = &mut inner.executions;
        executions.makers.push(maker.id);
        executions.volume += quantity;
        executions.notional += price as u128 * quantity as u128;
    }

    fn commit(&self) {
        let mut inner = self.inner.lock();
        let inner = &mut *inner;

        inner.events.append(&mut inner.pending);
        for mut trade in inner.pending_trades.drain(..) {
            trade.id = inner.next_trade_id;
            inner.next_trade_id += 1;
            inner.trades.push(trade);
        }
        inner.executions = Executions::default();
    }

    fn revert(&self) {
        let mut inner = self.inner.lock();
        inner.pending.clear();
        inner.pending_trades.clear();
        inner.executions = Executions::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Side;

    #[test]
    fn test_commit_moves_pending() {
        let collector = EventCollector::new();
        let order = Order::new(1, Side::Buy, 100, 10, 0);

        collector.open(0, &order);
        collector.change(0, &order, false);
        assert_eq!(collector.pending().len(), 2);
        assert!(collector.events().is_empty());

        collector.commit();
        assert!(collector.pending().is_empty());
        assert_eq!(collector.event_types(), vec![EventType::Open, EventType::Change]);
    }

    #[test]
    fn test_revert_discards_pending() {
        let collector = EventCollector::new();
        let order = Order::new(1, Side::Buy, 100, 10, 0);

        collector.open(0, &order);
        collector.commit();

        collector.cancel(0, &order);
        collector.trade(0, &order);
        collector.revert();
        collector.commit();

        assert_eq!(collector.event_types(), vec![EventType::Open]);
        assert!(collector.trades().is_empty());
    }

    #[test]
    fn test_trade_aggregates_executions() {
        let collector = EventCollector::new();
        let mut taker = Order::new(10, Side::Buy, 110, 20, 0);
        let maker_a = Order::new(1, Side::Sell, 100, 10, 0);
        let maker_b = Order::new(2, Side::Sell, 110, 10, 0);

        // Filled 5 before this attempt
        taker.filled = 15;
        collector.execution(&taker, &maker_a, 100, 10);
        collector.change(5, &taker, false);
        collector.fill(0, &maker_a, true);
        taker.filled = 20;
        collector.execution(&taker, &maker_b, 110, 5);
        collector.fill(5, &taker, false);
        collector.change(1, &maker_b, true);
        collector.trade(5, &taker);
        collector.commit();

        let trades = collector.trades();
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].id, 1);
        assert_eq!(trades[0].taker_order_id, 10);
        assert_eq!(trades[0].maker_order_ids, vec![1, 2]);
        assert_eq!(trades[0].volume, 15);
        // (10 * 100 + 5 * 110) / 15
        assert_eq!(trades[0].price, 103);
    }

    #[test]
    fn test_reverted_executions_do_not_leak() {
        let collector = EventCollector::new();
        let taker = Order::new(10, Side::Buy, 100, 5, 0);
        let maker = Order::new(1, Side::Sell, 100, 5, 0);

        collector.execution(&taker, &maker, 100, 3);
        collector.revert();
        collector.execution(&taker, &maker, 100, 5);
        collector.trade(5, &taker);
        collector.commit();

        let trade = &collector.trades()[0];
        assert_eq!(trade.volume, 5);
        assert_eq!(trade.maker_order_ids, vec![1]);
    }

    #[test]
    fn test_trade_ids_skip_reverted() {
        let collector = EventCollector::new();
        let order = Order::new(1, Side::Buy, 100, 10, 0);

        collector.trade(0, &order);
        collector.revert();
        collector.trade(0, &order);
        collector.commit();

        assert_eq!(collector.trades()[0].id, 1);
    }

    #[test]
    fn test_drain_and_clear() {
        let collector = EventCollector::new();
        let order = Order::new(1, Side::Buy, 100, 10, 0);

        collector.open(0, &order);
        collector.commit();
        assert_eq!(collector.drain_events().len(), 1);
        assert!(collector.events().is_empty());

        collector.open(0, &order);
        collector.clear();
        collector.commit();
        assert!(collector.events().is_empty());
    }
}
