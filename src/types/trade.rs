//! Aggregate execution record for a completed taker order.

/// A trade summarizes one taker order that was executed in full.
///
/// ## Terminology
///
/// - **Maker**: a resting order that provided liquidity
/// - **Taker**: the incoming order that crossed the level(s)
///
/// A single trade can span several makers, listed in execution order.
///
/// ## Example
///
/// ```
/// use price_level::types::Trade;
///
/// let trade = Trade::new(1, 200, vec![100, 101], 5_000_000_000_000, 50_000_000);
/// assert_eq!(trade.maker_order_ids.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Trade {
    /// Sequence number assigned by the collector
    pub id: u64,

    /// The incoming (taker) order
    pub taker_order_id: u64,

    /// Resting orders that traded against the taker, in execution order
    pub maker_order_ids: Vec<u64>,

    /// Volume-weighted execution price in fixed-point (scaled by 10^8)
    pub price: u64,

    /// Quantity executed by this attempt in fixed-point (scaled by 10^8).
    /// Fills the taker carried before the attempt are not included.
    pub volume: u64,
}

impl Trade {
    pub fn new(
        id: u64,
        taker_order_id: u64,
        maker_order_ids: Vec<u64>,
        price: u64,
        volume: u64,
    ) -> Self {
        Self {
            id,
            taker_order_id,
            maker_order_ids,
            price,
            volume,
        }
    }
}
