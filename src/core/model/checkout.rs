use crate::core::config::{basket_fits, CheckoutConfig};
use crate::core::counter::SafeCounter;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckoutStatus {
    Idle,
    Busy,
}

/// A single checkout lane.
///
/// Configuration fields are fixed for the run. The depth counter is shared
/// between the store's spawner (reserve on routing) and the lane's worker
/// (release on every terminal outcome); the remaining counters and the status
/// are only written by the lane's own worker.
#[derive(Debug)]
pub struct Checkout {
    pub id: u32,
    pub name: String,
    pub cashier_efficiency: f64,
    /// 0 means unlimited
    pub max_items: u32,
    pub payment_time_secs: f64,
    pub desirability: u32,
    depth: SafeCounter,
    status: Mutex<CheckoutStatus>,
    customers_served: SafeCounter,
    items_scanned: SafeCounter,
}

impl Checkout {
    pub fn from_config(config: &CheckoutConfig) -> Self {
        Self {
            id: config.id,
            name: config.name.clone(),
            cashier_efficiency: config.cashier_efficiency,
            max_items: config.max_items,
            payment_time_secs: config.payment_time_secs,
            desirability: config.desirability,
            depth: SafeCounter::new(),
            status: Mutex::new(CheckoutStatus::Idle),
            customers_served: SafeCounter::new(),
            items_scanned: SafeCounter::new(),
        }
    }

    /// True when a basket of `items` may queue here
    pub fn accepts(&self, items: usize) -> bool {
        basket_fits(self.max_items, items)
    }

    /// Customers currently queued at or being served by this lane
    pub fn depth(&self) -> i64 {
        self.depth.value()
    }

    /// Reserve a place in the lane for a routed customer, returning the new depth
    pub fn reserve(&self) -> i64 {
        self.depth.increment()
    }

    /// Release a reservation. Called exactly once per routed customer.
    pub fn release(&self) -> i64 {
        let remaining = self.depth.decrement();
        assert!(
            remaining >= 0,
            "depth of checkout {} dropped below zero ({})",
            self.name,
            remaining
        );
        remaining
    }

    /// Counter backing the lane depth, exposed for conservation checks
    pub fn depth_counter(&self) -> &SafeCounter {
        &self.depth
    }

    pub fn status(&self) -> CheckoutStatus {
        *self.status.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn set_status(&self, status: CheckoutStatus) {
        *self.status.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = status;
    }

    pub fn record_item_scanned(&self) {
        self.items_scanned.increment();
    }

    pub fn record_customer_served(&self) {
        self.customers_served.increment();
    }

    pub fn customers_served(&self) -> i64 {
        self.customers_served.value()
    }

    pub fn items_scanned(&self) -> i64 {
        self.items_scanned.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserve_and_release() {
        let checkout = Checkout::from_config(&CheckoutConfig::new(1));
        assert_eq!(checkout.reserve(), 1);
        assert_eq!(checkout.reserve(), 2);
        assert_eq!(checkout.release(), 1);
        assert_eq!(checkout.depth(), 1);
        assert_eq!(checkout.depth_counter().increments(), 2);
        assert_eq!(checkout.depth_counter().decrements(), 1);
    }

    #[test]
    #[should_panic(expected = "dropped below zero")]
    fn test_release_without_reservation_panics() {
        let checkout = Checkout::from_config(&CheckoutConfig::new(1));
        checkout.release();
    }

    #[test]
    fn test_status_and_cap() {
        let express = Checkout::from_config(&CheckoutConfig::new(4).with_max_items(5));
        assert_eq!(express.status(), CheckoutStatus::Idle);
        express.set_status(CheckoutStatus::Busy);
        assert_eq!(express.status(), CheckoutStatus::Busy);
        assert!(express.accepts(5));
        assert!(!express.accepts(6));
    }
}
