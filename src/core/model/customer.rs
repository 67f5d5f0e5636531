use super::product::Product;
use crate::core::clock::SimClock;
use crate::core::config::CustomerConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How a customer's visit to a checkout ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Served,
    /// Waited longer than `max_queue_wait_secs`
    AbandonedByTime,
    /// Found more people in the lane than `max_queue_depth`
    AbandonedByDepth,
}

/// A shopper moving through exactly one checkout lane.
///
/// Customers are owned by their store's spawner until routed, then moved
/// through the lane channel to the worker, which fills in the timestamps and
/// hands the finished record back to the coordinator. All timestamps are
/// simulated epoch seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: u32,
    pub store_id: u32,
    pub items: usize,
    /// Lane the customer was routed to; 0 until assigned
    pub checkout_id: u32,
    pub queue_time_start: i64,
    pub queue_time_end: i64,
    pub queue_wait_secs: i64,
    pub max_queue_wait_secs: i64,
    pub max_queue_depth: i64,
    pub purchase_complete: bool,
    pub left_queue: bool,
    pub checkout_time_start: i64,
    pub checkout_time_end: i64,
    pub checkout_duration_secs: i64,
    pub outcome: Option<Outcome>,
    pub products: BTreeMap<String, Product>,
}

impl Customer {
    pub fn from_config(store_id: u32, config: &CustomerConfig) -> Self {
        let products: BTreeMap<String, Product> = config
            .products
            .iter()
            .map(Product::from)
            .map(|product| (product.name(), product))
            .collect();

        Self {
            id: config.id,
            store_id,
            items: products.len(),
            checkout_id: 0,
            queue_time_start: 0,
            queue_time_end: 0,
            queue_wait_secs: 0,
            max_queue_wait_secs: config.max_queue_wait_secs,
            max_queue_depth: config.max_queue_depth,
            purchase_complete: false,
            left_queue: false,
            checkout_time_start: 0,
            checkout_time_end: 0,
            checkout_duration_secs: 0,
            outcome: None,
            products,
        }
    }

    /// Stamp the moment the customer joins a lane
    pub fn enter_queue(&mut self, checkout_id: u32, now: i64) {
        self.checkout_id = checkout_id;
        self.queue_time_start = now;
    }

    /// Stamp the moment a worker picks the customer up
    pub fn leave_queue(&mut self, clock: &SimClock, now: i64) {
        self.queue_time_end = now;
        self.queue_wait_secs = clock.diff(self.queue_time_start, now);
    }

    pub fn waited_too_long(&self) -> bool {
        self.queue_wait_secs > self.max_queue_wait_secs
    }

    pub fn queue_too_deep(&self, depth: i64) -> bool {
        depth > self.max_queue_depth
    }

    pub fn abandon(&mut self, outcome: Outcome) {
        debug_assert!(outcome != Outcome::Served);
        self.left_queue = true;
        self.outcome = Some(outcome);
    }

    pub fn start_checkout(&mut self, now: i64) {
        self.checkout_time_start = now;
    }

    pub fn finish_checkout(&mut self, clock: &SimClock, now: i64) {
        self.checkout_time_end = now;
        self.checkout_duration_secs = clock.diff(self.checkout_time_start, now);
        self.purchase_complete = true;
        self.outcome = Some(Outcome::Served);
    }
}
