use crate::orderbook::OrderKey;
use crate::types::Order;

/// Kind of lifecycle notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    Open,
    Change,
    Cancel,
    Fill,
    Trade,
}

/// A recorded notification with a snapshot of the order at emission time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub event_type: EventType,
    pub key: OrderKey,
    pub order: Order,
    /// Maker-side update
    pub partial: bool,
}

impl Event {
    pub fn new(event_type: EventType, key: OrderKey, order: &Order, partial: bool) -> Self {
        Self {
            event_type,
            key,
            order: order.clone(),
            partial,
        }
    }
}
