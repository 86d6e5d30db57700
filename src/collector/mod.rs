//! Order lifecycle notifications produced while matching.
//!
//! A [`PriceLevel`](crate::orderbook::PriceLevel) reports every lifecycle
//! change of the orders it touches to a [`Collector`]. Notifications are
//! fire-and-forget: the collector never influences matching.
//!
//! ## Implementations
//!
//! - [`EventCollector`]: buffers events per matching attempt and builds
//!   [`Trade`](crate::types::Trade) records, committed or dropped together
//!   with the attempt
//! - [`LoggingCollector`]: reports every event through `tracing`
//! - [`NoOpCollector`]: discards everything

mod buffer;
mod event;
mod logging;

pub use buffer::EventCollector;
pub use event::{Event, EventType};
pub use logging::LoggingCollector;

use crate::orderbook::OrderKey;
use crate::types::Order;

/// Sink for order lifecycle notifications.
///
/// `partial` marks maker-side updates: a resting order that was executed
/// against an incoming taker.
pub trait Collector: Send + Sync {
    /// A new order started resting at a level
    fn open(&self, key: OrderKey, order: &Order);

    /// An order's terms or fill state changed without completing it
    fn change(&self, key: OrderKey, order: &Order, partial: bool);

    /// An order was withdrawn from a level
    fn cancel(&self, key: OrderKey, order: &Order);

    /// An order was fully executed
    fn fill(&self, key: OrderKey, order: &Order, partial: bool);

    /// A taker order completed; aggregate execution record
    fn trade(&self, key: OrderKey, order: &Order);

    /// `quantity` traded between `taker` and `maker` at `price`.
    ///
    /// Reported once per maker step, before the order notifications of that
    /// step. Both orders already include the execution.
    fn execution(&self, _taker: &Order, _maker: &Order, _price: u64, _quantity: u64) {}

    /// Accept everything reported since the last commit or revert
    fn commit(&self) {}

    /// Drop everything reported since the last commit or revert
    fn revert(&self) {}
}

/// Collector that ignores every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpCollector;

impl Collector for NoOpCollector {
    fn open(&self, _key: OrderKey, _order: &Order) {}

    fn change(&self, _key: OrderKey, _order: &Order, _partial: bool) {}

    fn cancel(&self, _key: OrderKey, _order: &Order) {}

    fn fill(&self, _key: OrderKey, _order: &Order, _partial: bool) {}

    fn trade(&self, _key: OrderKey, _order: &Order) {}
}
