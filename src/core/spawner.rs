use crate::core::context::SimulationContext;
use crate::core::errors::{SimResult, SimulationError};
use crate::core::model::{Customer, Store};
use crate::core::routing::RoutingPolicy;
use crossbeam::channel::Sender;
use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

/// Multiplier applied to the base inter-arrival gap for the current hour.
///
/// The hourly busy factor minus `baseline`; a negative result is floored at 1.
pub fn arrival_multiplier(busy_factor: f64, baseline: f64) -> f64 {
    let adjusted = busy_factor - baseline;
    if adjusted < 0.0 {
        1.0
    } else {
        adjusted
    }
}

/// Per-store task that feeds customers into the store's lanes.
///
/// Visits every customer exactly once, in order: waits the inter-arrival
/// gap, routes the customer, reserves a place in the chosen lane, stamps the
/// queue entry and hands the customer over. The hand-off is a rendezvous, so
/// a slow lane holds back new arrivals to itself. Dropping the spawner closes
/// every lane of the store.
pub struct CustomerSpawner {
    context: Arc<SimulationContext>,
    store: Arc<Store>,
    customers: Vec<Customer>,
    /// One sender per checkout, in the store's checkout order
    lanes: Vec<Sender<Customer>>,
    policy: RoutingPolicy,
    rng: StdRng,
}

impl CustomerSpawner {
    pub fn new(
        context: Arc<SimulationContext>,
        store: Arc<Store>,
        customers: Vec<Customer>,
        lanes: Vec<Sender<Customer>>,
        routing_seed: Option<u64>,
    ) -> Self {
        debug_assert_eq!(lanes.len(), store.checkouts().len());
        let policy = RoutingPolicy::for_store(store.has_floor_manager);
        let rng = match routing_seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(u64::from(store.id))),
            None => StdRng::from_entropy(),
        };
        Self {
            context,
            store,
            customers,
            lanes,
            policy,
            rng,
        }
    }

    /// Hand every customer to a lane, returning how many were routed
    pub fn run(mut self) -> SimResult<usize> {
        let customers = std::mem::take(&mut self.customers);
        let mut routed = 0;
        for customer in customers {
            self.pace_arrival();
            self.route(customer)?;
            routed += 1;
        }
        debug!("[{}] All {} customers routed", self.store.name(), routed);
        Ok(routed)
    }

    fn pace_arrival(&self) {
        let timing = &self.context.timing;
        let hour = self.context.clock.current_sim_time().hour();
        let multiplier = arrival_multiplier(self.store.busy_factor(hour), timing.busy_baseline);
        self.context
            .clock
            .scaled_sleep(timing.base_inter_arrival_secs * multiplier);
    }

    fn route(&mut self, mut customer: Customer) -> SimResult<()> {
        let index = self
            .policy
            .select(self.store.checkouts(), customer.items, &mut self.rng)
            .ok_or_else(|| {
                SimulationError::Configuration(format!(
                    "no checkout of {} accepts customer {} with {} items",
                    self.store.name(),
                    customer.id,
                    customer.items
                ))
            })?;

        let checkout = self.store.checkout(index);
        let depth = checkout.reserve();
        debug!(
            "[{}] Queue {} has length {}",
            self.store.name(),
            checkout.name,
            depth
        );

        customer.enter_queue(checkout.id, self.context.clock.current_sim_time().epoch_seconds);
        if let Err(returned) = self.lanes[index].send(customer) {
            checkout.release();
            return Err(SimulationError::InvariantViolation(format!(
                "{} of {} closed before customer {} was handed over",
                checkout.name,
                self.store.name(),
                returned.0.id
            )));
        }
        Ok(())
    }
}
