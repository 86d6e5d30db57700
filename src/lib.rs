//! # price-level
//!
//! Single-price matching queue of a limit order book.
//!
//! ## Architecture
//!
//! - **Types**: orders with kind (limit/stop) and execution flags, trades,
//!   fixed-point helpers
//! - **OrderBook**: slab-backed [`OrderStore`] and the [`PriceLevel`] that
//!   matches takers against resting orders
//! - **Collector**: sink for order lifecycle notifications
//!
//! ## Design Principles
//!
//! 1. **Price-time priority**: orders at a level are matched in arrival order
//! 2. **Transactional matching**: every `cross` can be committed or reverted,
//!    restoring queue position and fill state exactly
//! 3. **No Floating Point**: all quantities are `u64` scaled by 10^8
//! 4. **Handles, not references**: orders live in an arena and are addressed
//!    by key
//! 5. **Synchronous Execution**: matching never blocks or yields
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use price_level::{CrossStatus, EventCollector, Order, OrderStore, PriceLevel, Side};
//! use price_level::collector::Collector;
//!
//! let collector = Arc::new(EventCollector::new());
//! let mut store = OrderStore::new();
//! let mut level = PriceLevel::new(100, collector.clone());
//!
//! let maker = store.insert(Order::new(1, Side::Sell, 100, 5, 0));
//! level.add(maker, &store).unwrap();
//!
//! // Taker wants 10 but only 5 rest here
//! let taker = store.insert(Order::new(2, Side::Buy, 100, 10, 1));
//! let outcome = level.cross(taker, &mut store).unwrap();
//! assert_eq!(outcome.status, CrossStatus::Exhausted(taker));
//!
//! // The orchestrator decides the attempt failed
//! level.revert(&mut store).unwrap();
//! collector.revert();
//! assert_eq!(level.volume(&store).unwrap(), 5);
//! assert_eq!(store.get(taker).unwrap().filled, 0);
//! ```

// ============================================================================
// Module declarations
// ============================================================================

/// Core data types: Order, Trade, fixed-point helpers
pub mod types;

/// Order store and price level matching
pub mod orderbook;

/// Order lifecycle notification sinks
pub mod collector;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use collector::{Collector, EventCollector, LoggingCollector, NoOpCollector};
pub use orderbook::{CrossOutcome, CrossStatus, LevelError, OrderKey, OrderStore, PriceLevel};
pub use types::{Order, OrderFlag, OrderKind, Side, Trade};
