//! Core data types.
//!
//! ## Types
//!
//! - [`Order`]: an order with volume, cumulative fill, kind and flag
//! - [`Side`], [`OrderKind`], [`OrderFlag`]: order attributes
//! - [`Trade`]: aggregate record of a fully executed taker
//!
//! ## Fixed-Point Arithmetic
//!
//! All prices and quantities are stored as `u64` scaled by 10^8.
//! Example: 50000.12345678 is stored as 5_000_012_345_678u64

mod order;
mod trade;
pub mod price;

pub use order::{Order, OrderFlag, OrderKind, Side};
pub use trade::Trade;
