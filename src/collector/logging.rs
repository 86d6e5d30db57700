use tracing::info;

use crate::collector::Collector;
use crate::orderbook::OrderKey;
use crate::types::price::from_fixed;
use crate::types::Order;

/// Collector that reports every notification as a `tracing` event.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingCollector;

fn log(event: &'static str, key: OrderKey, order: &Order, partial: bool) {
    info!(
        event,
        key,
        order_id = order.id,
        price = %from_fixed(order.price),
        volume = %from_fixed(order.volume),
        filled = %from_fixed(order.filled),
        partial,
        "order event"
    );
}

impl Collector for LoggingCollector {
    fn open(&self, key: OrderKey, order: &Order) {
        log("open", key, order, false);
    }

    fn change(&self, key: OrderKey, order: &Order, partial: bool) {
        log("change", key, order, partial);
    }

    fn cancel(&self, key: OrderKey, order: &Order) {
        log("cancel", key, order, false);
    }

    fn fill(&self, key: OrderKey, order: &Order, partial: bool) {
        log("fill", key, order, partial);
    }

    fn trade(&self, key: OrderKey, order: &Order) {
        log("trade", key, order, false);
    }

    fn execution(&self, taker: &Order, maker: &Order, price: u64, quantity: u64) {
        info!(
            taker_id = taker.id,
            maker_id = maker.id,
            price = %from_fixed(price),
            quantity = %from_fixed(quantity),
            "execution"
        );
    }

    fn commit(&self) {
        info!("collector commit");
    }

    fn revert(&self) {
        info!("collector revert");
    }
}
