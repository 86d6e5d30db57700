//! Order types held by a price level.
//!
//! ## SSZ Serialization
//!
//! `Order` derives `SimpleSerialize` from ssz_rs so the state of a level can be
//! hashed deterministically. Enums are stored as raw `u8` fields with typed
//! accessors, since SSZ has no native enum encoding.
//!
//! ## Fixed-Point Representation
//!
//! Prices and quantities are `u64` scaled by 10^8 (see [`crate::types::price::SCALE`]).

use ssz_rs::prelude::*;

// ============================================================================
// Side enum
// ============================================================================

/// Order side: Buy or Sell
///
/// Represented as u8 for SSZ compatibility:
/// - Buy = 0
/// - Sell = 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Side {
    /// Buy order (bid)
    #[default]
    Buy,
    /// Sell order (ask)
    Sell,
}

impl Side {
    pub fn to_u8(self) -> u8 {
        match self {
            Side::Buy => 0,
            Side::Sell => 1,
        }
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Side::Buy),
            1 => Some(Side::Sell),
            _ => None,
        }
    }
}

// ============================================================================
// OrderKind enum
// ============================================================================

/// How an order participates in matching.
///
/// A `Stop` order is parked at its trigger price and does not match until it
/// is released and activated as a `Limit` order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OrderKind {
    #[default]
    Limit,
    Stop,
}

impl OrderKind {
    pub fn to_u8(self) -> u8 {
        match self {
            OrderKind::Limit => 0,
            OrderKind::Stop => 1,
        }
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(OrderKind::Limit),
            1 => Some(OrderKind::Stop),
            _ => None,
        }
    }
}

// ============================================================================
// OrderFlag enum
// ============================================================================

/// Execution constraint attached to an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OrderFlag {
    /// No constraint, partial fills rest on the book
    #[default]
    None,
    /// Execute in full immediately or not at all
    FillOrKill,
    /// Execute in full or not at all, no time limit
    AllOrNone,
    /// Execute what is possible now, cancel the remainder
    ImmediateOrCancel,
}

impl OrderFlag {
    pub fn to_u8(self) -> u8 {
        match self {
            OrderFlag::None => 0,
            OrderFlag::FillOrKill => 1,
            OrderFlag::AllOrNone => 2,
            OrderFlag::ImmediateOrCancel => 3,
        }
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(OrderFlag::None),
            1 => Some(OrderFlag::FillOrKill),
            2 => Some(OrderFlag::AllOrNone),
            3 => Some(OrderFlag::ImmediateOrCancel),
            _ => None,
        }
    }

    /// True for flags that forbid a partial execution of the order.
    #[inline]
    pub fn requires_full_fill(self) -> bool {
        matches!(self, OrderFlag::FillOrKill | OrderFlag::AllOrNone)
    }
}

// ============================================================================
// Order struct
// ============================================================================

/// An order resting at (or crossing) a price level.
///
/// ## SSZ Layout
///
/// Fixed-size container, 43 bytes:
/// id(8) + side(1) + price(8) + volume(8) + filled(8) + timestamp(8) + kind(1) + flag(1)
///
/// ## Example
///
/// ```
/// use price_level::types::{Order, OrderFlag, Side};
///
/// let order = Order::new(1, Side::Sell, 10_000_000_000, 500_000_000, 0)
///     .with_flag(OrderFlag::ImmediateOrCancel);
///
/// assert_eq!(order.remaining(), 500_000_000);
/// assert_eq!(order.flag(), OrderFlag::ImmediateOrCancel);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
pub struct Order {
    /// Order identifier, assigned outside this crate
    pub id: u64,

    /// Order side as u8 (0=Buy, 1=Sell)
    pub side_raw: u8,

    /// Limit price, or trigger price for stop orders (fixed-point)
    pub price: u64,

    /// Original size (fixed-point)
    pub volume: u64,

    /// Cumulative executed size, never above `volume`
    pub filled: u64,

    /// Unix timestamp in milliseconds
    pub timestamp: u64,

    /// Order kind as u8 (0=Limit, 1=Stop)
    pub kind_raw: u8,

    /// Order flag as u8 (see [`OrderFlag::to_u8`])
    pub flag_raw: u8,
}

impl Order {
    /// Create a new limit order with no flag and nothing filled.
    pub fn new(id: u64, side: Side, price: u64, volume: u64, timestamp: u64) -> Self {
        Self {
            id,
            side_raw: side.to_u8(),
            price,
            volume,
            filled: 0,
            timestamp,
            kind_raw: OrderKind::Limit.to_u8(),
            flag_raw: OrderFlag::None.to_u8(),
        }
    }

    /// Create a stop order parked at `trigger_price`.
    pub fn stop(id: u64, side: Side, trigger_price: u64, volume: u64, timestamp: u64) -> Self {
        Self::new(id, side, trigger_price, volume, timestamp).with_kind(OrderKind::Stop)
    }

    pub fn with_flag(mut self, flag: OrderFlag) -> Self {
        self.flag_raw = flag.to_u8();
        self
    }

    pub fn with_kind(mut self, kind: OrderKind) -> Self {
        self.kind_raw = kind.to_u8();
        self
    }

    pub fn side(&self) -> Side {
        Side::from_u8(self.side_raw).unwrap_or(Side::Buy)
    }

    pub fn kind(&self) -> OrderKind {
        OrderKind::from_u8(self.kind_raw).unwrap_or(OrderKind::Limit)
    }

    pub fn flag(&self) -> OrderFlag {
        OrderFlag::from_u8(self.flag_raw).unwrap_or(OrderFlag::None)
    }

    #[inline]
    pub fn is_stop(&self) -> bool {
        self.kind() == OrderKind::Stop
    }

    /// Quantity still open for execution
    #[inline]
    pub fn remaining(&self) -> u64 {
        self.volume.saturating_sub(self.filled)
    }

    #[inline]
    pub fn is_filled(&self) -> bool {
        self.filled >= self.volume
    }

    /// Execute up to `quantity` against this order.
    ///
    /// # Returns
    ///
    /// The quantity actually executed, clamped to what remains open
    pub fn fill(&mut self, quantity: u64) -> u64 {
        let actual = quantity.min(self.remaining());
        self.filled += actual;
        actual
    }

    /// Turn a released stop order into a live limit order.
    pub fn activate(&mut self) {
        self.kind_raw = OrderKind::Limit.to_u8();
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_conversions() {
        assert_eq!(Side::from_u8(Side::Sell.to_u8()), Some(Side::Sell));
        assert_eq!(Side::from_u8(2), None);
        assert_eq!(OrderKind::from_u8(1), Some(OrderKind::Stop));
        assert_eq!(OrderKind::from_u8(7), None);

        for flag in [
            OrderFlag::None,
            OrderFlag::FillOrKill,
            OrderFlag::AllOrNone,
            OrderFlag::ImmediateOrCancel,
        ] {
            assert_eq!(OrderFlag::from_u8(flag.to_u8()), Some(flag));
        }
        assert_eq!(OrderFlag::from_u8(4), None);
    }

    #[test]
    fn test_requires_full_fill() {
        assert!(OrderFlag::FillOrKill.requires_full_fill());
        assert!(OrderFlag::AllOrNone.requires_full_fill());
        assert!(!OrderFlag::None.requires_full_fill());
        assert!(!OrderFlag::ImmediateOrCancel.requires_full_fill());
    }

    #[test]
    fn test_order_new() {
        let order = Order::new(7, Side::Sell, 10_000_000_000, 100_000_000, 1703577600000);

        assert_eq!(order.id, 7);
        assert_eq!(order.side(), Side::Sell);
        assert_eq!(order.kind(), OrderKind::Limit);
        assert_eq!(order.flag(), OrderFlag::None);
        assert_eq!(order.filled, 0);
        assert_eq!(order.remaining(), 100_000_000);
        assert!(!order.is_filled());
    }

    #[test]
    fn test_order_fill_clamps() {
        let mut order = Order::new(1, Side::Buy, 100, 10, 0);

        assert_eq!(order.fill(4), 4);
        assert_eq!(order.remaining(), 6);

        // Overfill only executes what is left
        assert_eq!(order.fill(100), 6);
        assert_eq!(order.filled, 10);
        assert!(order.is_filled());
        assert_eq!(order.fill(1), 0);
    }

    #[test]
    fn test_stop_activation() {
        let mut order = Order::stop(3, Side::Buy, 100, 10, 0);
        assert!(order.is_stop());

        order.activate();
        assert!(!order.is_stop());
        assert_eq!(order.kind(), OrderKind::Limit);
    }

    #[test]
    fn test_order_ssz_roundtrip() {
        let mut order = Order::new(1, Side::Buy, 5_000_000_000_000, 100_000_000, 1703577600000)
            .with_flag(OrderFlag::AllOrNone);
        order.fill(25_000_000);

        let serialized = ssz_rs::serialize(&order).expect("Failed to serialize");
        let deserialized: Order = ssz_rs::deserialize(&serialized).expect("Failed to deserialize");

        assert_eq!(order, deserialized);
    }

    #[test]
    fn test_order_ssz_size() {
        let order = Order::new(1, Side::Buy, 5_000_000_000_000, 100_000_000, 0);
        let bytes = ssz_rs::serialize(&order).expect("Failed to serialize");

        assert_eq!(bytes.len(), 43, "Order should serialize to 43 bytes");
    }
}
