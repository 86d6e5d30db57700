//! Errors raised by price level operations.

use thiserror::Error;

use crate::orderbook::OrderKey;

/// Failures of a price level or the order store behind it.
///
/// `OrderNotFound` is a caller error: the orchestrator's view of where an
/// order rests diverged from the level. The other variants are consistency
/// faults, and the level that raised them should not be trusted afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LevelError {
    #[error("order {key} not found in price level {price}")]
    OrderNotFound { key: OrderKey, price: u64 },

    #[error("order key {0} is not present in the order store")]
    UnknownOrder(OrderKey),

    #[error("order {key} has price {order_price} but rests at level {level_price}")]
    PriceMismatch {
        key: OrderKey,
        order_price: u64,
        level_price: u64,
    },

    #[error("failed to serialize level state: {0}")]
    Serialization(String),
}
