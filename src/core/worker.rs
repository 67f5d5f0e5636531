use crate::core::context::SimulationContext;
use crate::core::events::{Phase, ProgressEvent};
use crate::core::model::{Checkout, CheckoutStatus, Customer, Outcome, Store};
use crossbeam::channel::{Receiver, Sender};
use log::debug;
use std::sync::Arc;

/// One lane's worker task.
///
/// Pulls customers from its lane in hand-off order, decides whether each one
/// abandons (too long a wait, too deep a queue) or is served, and sends the
/// finished customer to the coordinator. Every customer taken off the lane
/// releases its depth reservation and produces exactly one completion,
/// whatever the outcome. The worker stops once the lane's sender is dropped
/// and the lane is empty.
pub struct CheckoutWorker {
    context: Arc<SimulationContext>,
    store: Arc<Store>,
    checkout_index: usize,
    lane: Receiver<Customer>,
    completions: Sender<Customer>,
}

impl CheckoutWorker {
    pub fn new(
        context: Arc<SimulationContext>,
        store: Arc<Store>,
        checkout_index: usize,
        lane: Receiver<Customer>,
        completions: Sender<Customer>,
    ) -> Self {
        Self {
            context,
            store,
            checkout_index,
            lane,
            completions,
        }
    }

    fn checkout(&self) -> &Checkout {
        self.store.checkout(self.checkout_index)
    }

    /// Serve the lane until it closes, returning how many customers were handled
    pub fn run(self) -> usize {
        let mut handled = 0;
        loop {
            // Lane setup between two customers
            self.context.clock.scaled_sleep(self.context.timing.lane_setup_secs);

            let customer = match self.lane.recv() {
                Ok(customer) => customer,
                Err(_) => break,
            };

            let finished = self.process(customer);
            if self.completions.send(finished).is_err() {
                panic!(
                    "{} of {} finished a customer after the coordinator stopped counting",
                    self.checkout().name,
                    self.store.name()
                );
            }
            handled += 1;
        }

        debug!(
            "[{}:{}] Lane closed after {} customers",
            self.store.name(),
            self.checkout().name,
            handled
        );
        handled
    }

    /// Take one customer from queue exit to a terminal outcome
    pub fn process(&self, mut customer: Customer) -> Customer {
        let now = self.context.clock.current_sim_time();
        customer.leave_queue(&self.context.clock, now.epoch_seconds);

        if customer.waited_too_long() {
            self.abandon(&mut customer, Outcome::AbandonedByTime);
            return customer;
        }

        if customer.queue_too_deep(self.checkout().depth()) {
            self.abandon(&mut customer, Outcome::AbandonedByDepth);
            return customer;
        }

        self.serve(&mut customer);
        customer
    }

    fn abandon(&self, customer: &mut Customer, outcome: Outcome) {
        let checkout = self.checkout();
        customer.abandon(outcome);

        let phase = match outcome {
            Outcome::AbandonedByTime => {
                self.store.record_abandoned_by_time();
                Phase::LeftQueueTime
            }
            Outcome::AbandonedByDepth => {
                self.store.record_abandoned_by_depth();
                Phase::LeftQueueDepth
            }
            Outcome::Served => unreachable!("served customers do not abandon"),
        };
        checkout.release();

        debug!(
            "[{}:{}] Customer {} left the queue ({:?}) after {}s",
            self.store.name(),
            checkout.name,
            customer.id,
            outcome,
            customer.queue_wait_secs
        );
        self.emit(customer, phase, None);
    }

    fn serve(&self, customer: &mut Customer) {
        let clock = &self.context.clock;
        let checkout = self.checkout();

        customer.start_checkout(clock.current_sim_time().epoch_seconds);
        checkout.set_status(CheckoutStatus::Busy);
        self.emit(customer, Phase::Arrived, None);

        for product in customer.products.values() {
            self.emit(customer, Phase::Scanning, Some(product.id));
            clock.scaled_sleep(product.scan_time(checkout.cashier_efficiency));
            checkout.record_item_scanned();
        }

        self.emit(customer, Phase::Paying, None);
        clock.scaled_sleep(checkout.payment_time_secs);

        customer.finish_checkout(clock, clock.current_sim_time().epoch_seconds);
        checkout.set_status(CheckoutStatus::Idle);
        checkout.record_customer_served();
        self.store.record_processed();
        checkout.release();

        self.emit(customer, Phase::Finished, None);
    }

    fn emit(&self, customer: &Customer, phase: Phase, product_id: Option<u32>) {
        let mut event = ProgressEvent::new(
            self.context.clock.current_sim_time(),
            self.store.id,
            customer.id,
            self.checkout().id,
            customer.items,
            phase,
        );
        if let Some(product_id) = product_id {
            event = event.with_product(product_id);
        }
        self.context.sink.emit(event);
    }
}
