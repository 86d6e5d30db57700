//! price-level - demo binary
//!
//! Walks a single price level through a committed and a reverted matching
//! attempt. Set `RUST_LOG=debug` (or `trace`) to see the level internals.

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use price_level::collector::{Collector, LoggingCollector};
use price_level::types::price::{from_fixed, to_fixed};
use price_level::{LevelError, Order, OrderFlag, OrderStore, PriceLevel, Side};

fn main() -> Result<(), LevelError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let price = to_fixed("100.00").unwrap_or_default();
    let qty = |s: &str| to_fixed(s).unwrap_or_default();

    let collector = Arc::new(LoggingCollector);
    let mut store = OrderStore::with_capacity(16);
    let mut level = PriceLevel::new(price, collector.clone());

    println!("===========================================");
    println!("  price level @ {}", from_fixed(price));
    println!("===========================================");

    let a = store.insert(Order::new(1, Side::Sell, price, qty("1.5"), 1));
    let b = store.insert(
        Order::new(2, Side::Sell, price, qty("2.0"), 2).with_flag(OrderFlag::FillOrKill),
    );
    let c = store.insert(Order::new(3, Side::Sell, price, qty("1.0"), 3));
    let stop = store.insert(Order::stop(4, Side::Buy, price, qty("0.5"), 4));
    for key in [a, b, c, stop] {
        level.add(key, &store)?;
    }
    collector.commit();

    println!("resting volume: {}", from_fixed(level.volume(&store)?));
    println!("parked stops:   {}", level.stop_len());
    let before = level.state_root_hex(&store)?;
    println!("state root:     {before}");

    // Attempt 1: a taker for 2.0, committed
    let taker = store.insert(Order::new(10, Side::Buy, price, qty("2.0"), 10));
    let outcome = level.cross(taker, &mut store)?;
    println!();
    println!("cross #1 -> {:?}", outcome.status);
    for key in &outcome.triggered_stops {
        store.get_mut(*key)?.activate();
        println!("  stop order key {key} triggered and activated");
    }
    level.commit();
    collector.commit();
    println!("resting volume: {}", from_fixed(level.volume(&store)?));

    // Attempt 2: an all-or-none taker larger than the book, reverted
    let before = level.state_root_hex(&store)?;
    let aon = store.insert(
        Order::new(11, Side::Buy, price, qty("5.0"), 11).with_flag(OrderFlag::AllOrNone),
    );
    let outcome = level.cross(aon, &mut store)?;
    println!();
    println!("cross #2 -> {:?}", outcome.status);
    level.revert(&mut store)?;
    collector.revert();

    let after = level.state_root_hex(&store)?;
    println!("state restored: {}", before == after);
    println!("resting volume: {}", from_fixed(level.volume(&store)?));

    Ok(())
}
