//! Price level matching with transactional rollback.
//!
//! ## Architecture
//!
//! - **Arena storage**: orders live in an [`OrderStore`] (slab) and are
//!   addressed by [`OrderKey`] handles
//! - **Price level**: a FIFO queue of handles at one price, plus parked stop
//!   orders
//! - **Transactions**: every `cross` stages what it touches so the attempt can
//!   be committed or reverted as a unit
//!
//! ## Performance
//!
//! | Operation | Complexity |
//! |-----------|------------|
//! | Add order | O(n) (duplicate check) |
//! | Remove order | O(n) |
//! | Cross | O(k) for k makers consumed |
//! | Commit | O(1) amortized |
//! | Revert | O(n + k) |
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use price_level::collector::NoOpCollector;
//! use price_level::orderbook::{OrderStore, PriceLevel};
//! use price_level::types::{Order, Side};
//!
//! let mut store = OrderStore::with_capacity(1_000);
//! let mut level = PriceLevel::new(5_000_000_000_000, Arc::new(NoOpCollector));
//!
//! let key = store.insert(Order::new(1, Side::Sell, 5_000_000_000_000, 100_000_000, 0));
//! level.add(key, &store).unwrap();
//!
//! assert_eq!(level.volume(&store).unwrap(), 100_000_000);
//! ```

mod error;
pub mod level;
pub mod store;

pub use error::LevelError;
pub use level::{CrossOutcome, CrossStatus, PriceLevel};
pub use store::{OrderKey, OrderStore};
