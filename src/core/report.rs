use crate::core::model::{Customer, Outcome, Store};
use serde::Serialize;
use std::time::Duration;

/// Final counters of one checkout lane
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutReport {
    pub id: u32,
    pub name: String,
    pub max_items: u32,
    pub customers_served: i64,
    pub items_scanned: i64,
    /// Customers routed to this lane, whatever their outcome
    pub customers_routed: u64,
}

impl CheckoutReport {
    pub fn label(&self) -> String {
        if self.max_items > 0 {
            format!("{} (max {} items)", self.name, self.max_items)
        } else {
            self.name.clone()
        }
    }
}

/// Final counters of one store plus every customer's finished record
#[derive(Debug, Clone, Serialize)]
pub struct StoreReport {
    pub id: u32,
    pub name: String,
    pub has_floor_manager: bool,
    pub total_customers: usize,
    pub processed: i64,
    pub abandoned_by_time: i64,
    pub abandoned_by_depth: i64,
    pub checkouts: Vec<CheckoutReport>,
    /// Sorted by customer id
    pub customers: Vec<Customer>,
}

impl StoreReport {
    /// Snapshot a store's counters once all of its tasks have stopped
    pub fn collect(store: &Store, mut customers: Vec<Customer>) -> Self {
        customers.sort_by_key(|customer| customer.id);
        Self {
            id: store.id,
            name: store.name(),
            has_floor_manager: store.has_floor_manager,
            total_customers: store.total_customers,
            processed: store.processed(),
            abandoned_by_time: store.abandoned_by_time(),
            abandoned_by_depth: store.abandoned_by_depth(),
            checkouts: store
                .checkouts()
                .iter()
                .map(|checkout| CheckoutReport {
                    id: checkout.id,
                    name: checkout.name.clone(),
                    max_items: checkout.max_items,
                    customers_served: checkout.customers_served(),
                    items_scanned: checkout.items_scanned(),
                    customers_routed: checkout.depth_counter().increments(),
                })
                .collect(),
            customers,
        }
    }

    fn served(&self) -> impl Iterator<Item = &Customer> {
        self.customers
            .iter()
            .filter(|customer| customer.outcome == Some(Outcome::Served))
    }

    /// Mean simulated queue wait of served customers
    pub fn average_queue_wait_secs(&self) -> Option<f64> {
        mean(self.served().map(|customer| customer.queue_wait_secs))
    }

    /// Mean simulated checkout duration of served customers
    pub fn average_checkout_secs(&self) -> Option<f64> {
        mean(self.served().map(|customer| customer.checkout_duration_secs))
    }

    pub fn items_scanned(&self) -> i64 {
        self.checkouts.iter().map(|checkout| checkout.items_scanned).sum()
    }
}

fn mean(values: impl Iterator<Item = i64>) -> Option<f64> {
    let (sum, count) = values.fold((0i64, 0usize), |(sum, count), value| (sum + value, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum as f64 / count as f64)
    }
}

/// Outcome of a complete run
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub stores: Vec<StoreReport>,
    /// Simulated time of day when the last completion arrived
    pub finished_at: String,
    /// Real time the run took
    pub elapsed: Duration,
}

impl SimulationReport {
    pub fn store(&self, id: u32) -> Option<&StoreReport> {
        self.stores.iter().find(|store| store.id == id)
    }

    pub fn total_customers(&self) -> usize {
        self.stores.iter().map(|store| store.total_customers).sum()
    }
}

impl std::fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for store in &self.stores {
            writeln!(f, "---Store: {}, Customer processed: {}", store.name, store.processed)?;
            writeln!(
                f,
                "---Store: {}, Customer Left(Queuing Time): {}",
                store.name, store.abandoned_by_time
            )?;
            writeln!(
                f,
                "---Store: {}, Customer Left(Queue Deep): {}",
                store.name, store.abandoned_by_depth
            )?;
            if let Some(wait) = store.average_queue_wait_secs() {
                writeln!(f, "---Store: {}, Average queue wait: {:.1}s", store.name, wait)?;
            }
            if let Some(duration) = store.average_checkout_secs() {
                writeln!(f, "---Store: {}, Average checkout time: {:.1}s", store.name, duration)?;
            }
            for checkout in &store.checkouts {
                writeln!(
                    f,
                    "---Checkout: {}, Customers processed: {}, Products processed: {}",
                    checkout.label(),
                    checkout.customers_served,
                    checkout.items_scanned
                )?;
            }
        }
        write!(
            f,
            "Finished at {} (simulated) after {:.2}s (real)",
            self.finished_at,
            self.elapsed.as_secs_f64()
        )
    }
}
