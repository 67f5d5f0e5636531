use crate::core::clock::SimClock;
use crate::core::config::SimulationConfig;
use crate::core::context::SimulationContext;
use crate::core::counter::SafeCounter;
use crate::core::errors::{SimResult, SimulationError};
use crate::core::events::{EventSink, LogSink};
use crate::core::model::{Customer, Store};
use crate::core::report::{SimulationReport, StoreReport};
use crate::core::spawner::CustomerSpawner;
use crate::core::worker::CheckoutWorker;
use crossbeam::channel;
use log::{debug, info};
use std::collections::HashMap;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

/// Runs a validated [`SimulationConfig`] to completion.
///
/// Starts one worker thread per checkout and one spawner thread per store,
/// then counts completions on the shared completion channel until every
/// customer of every store is accounted for. Once the count is reached the
/// channel is closed, all tasks are joined and the counters are reported.
pub struct Simulation {
    config: SimulationConfig,
    sink: Arc<dyn EventSink>,
}

struct StoreTasks {
    store: Arc<Store>,
    spawner: JoinHandle<SimResult<usize>>,
    workers: Vec<JoinHandle<usize>>,
}

impl Simulation {
    /// Validate `config`; a configuration error aborts before anything runs
    pub fn new(config: SimulationConfig) -> SimResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            sink: Arc::new(LogSink),
        })
    }

    /// Send progress events to `sink` instead of the log
    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn run(self) -> SimResult<SimulationReport> {
        let started = Instant::now();
        let expected = self.config.total_customers();
        let clock = SimClock::new(self.config.seconds_per_sim_hour, self.config.earliest_opening());
        let context = Arc::new(SimulationContext::new(
            clock,
            self.config.timing.clone(),
            self.sink.clone(),
        ));

        let (completion_tx, completion_rx) = channel::unbounded::<Customer>();
        let mut tasks = Vec::with_capacity(self.config.stores.len());
        let mut pending_spawners = Vec::with_capacity(self.config.stores.len());

        for store_config in &self.config.stores {
            let (store, customers) = Store::from_config(store_config);
            let store = Arc::new(store);
            info!(
                "{} opens at {:02}:00 with {} checkouts and {} customers",
                store.name(),
                store.opening_hours.from,
                store.checkouts().len(),
                store.total_customers
            );

            let mut lanes = Vec::with_capacity(store.checkouts().len());
            let mut workers = Vec::with_capacity(store.checkouts().len());
            for (index, checkout) in store.checkouts().iter().enumerate() {
                let (lane_tx, lane_rx) = channel::bounded(0);
                lanes.push(lane_tx);

                let worker = CheckoutWorker::new(
                    context.clone(),
                    store.clone(),
                    index,
                    lane_rx,
                    completion_tx.clone(),
                );
                debug!("Opening: {} of {}", checkout.name, store.name());
                workers.push(spawn_task(
                    format!("{}-{}", store.name(), checkout.name),
                    move || worker.run(),
                )?);
            }

            let spawner = CustomerSpawner::new(
                context.clone(),
                store.clone(),
                customers,
                lanes,
                self.config.routing_seed,
            );
            pending_spawners.push((store, spawner, workers));
        }
        // Only workers hold completion senders from here on
        drop(completion_tx);

        for (store, spawner, workers) in pending_spawners {
            let handle = spawn_task(format!("{}-spawner", store.name()), move || spawner.run())?;
            tasks.push(StoreTasks {
                store,
                spawner: handle,
                workers,
            });
        }

        let total_processed = SafeCounter::new();
        let mut finished: HashMap<u32, Vec<Customer>> = HashMap::new();
        while (total_processed.value() as usize) < expected {
            match completion_rx.recv() {
                Ok(customer) => {
                    total_processed.increment();
                    finished.entry(customer.store_id).or_default().push(customer);
                }
                // Every worker is gone; the join below says why
                Err(_) => break,
            }
        }
        let finished_at = context.clock.current_sim_time();
        drop(completion_rx);
        info!(
            "{} of {} customers completed at {}",
            total_processed.value(),
            expected,
            finished_at
        );

        let mut first_error = None;
        let mut stores = Vec::with_capacity(tasks.len());
        for task in tasks {
            if let Err(err) = join_task(task.spawner).and_then(|routed| routed) {
                first_error.get_or_insert(err);
            }
            for worker in task.workers {
                if let Err(err) = join_task(worker) {
                    first_error.get_or_insert(err);
                }
            }
            stores.push(task.store);
        }
        if let Some(err) = first_error {
            return Err(err);
        }

        let processed = total_processed.value() as usize;
        if processed != expected {
            return Err(SimulationError::InvariantViolation(format!(
                "completion channel closed after {} of {} customers",
                processed, expected
            )));
        }

        let mut reports = Vec::with_capacity(stores.len());
        for store in stores {
            check_conservation(&store)?;
            let customers = finished.remove(&store.id).unwrap_or_default();
            reports.push(StoreReport::collect(&store, customers));
        }

        Ok(SimulationReport {
            stores: reports,
            finished_at: finished_at.label,
            elapsed: started.elapsed(),
        })
    }
}

fn spawn_task<T, F>(name: String, task: F) -> SimResult<JoinHandle<T>>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    thread::Builder::new()
        .name(name.clone())
        .spawn(task)
        .map_err(|err| SimulationError::Spawn(format!("{}: {}", name, err)))
}

fn join_task<T>(handle: JoinHandle<T>) -> SimResult<T> {
    let name = handle.thread().name().unwrap_or("unnamed").to_string();
    handle.join().map_err(|payload| {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        SimulationError::TaskPanicked(format!("{}: {}", name, message))
    })
}

/// Every customer has exactly one outcome and every depth reservation was released
fn check_conservation(store: &Store) -> SimResult<()> {
    let finished = store.finished();
    if finished != store.total_customers as i64 {
        return Err(SimulationError::InvariantViolation(format!(
            "{} accounted for {} of {} customers",
            store.name(),
            finished,
            store.total_customers
        )));
    }
    for checkout in store.checkouts() {
        let depth = checkout.depth_counter();
        if depth.value() != 0 || depth.increments() != depth.decrements() {
            return Err(SimulationError::InvariantViolation(format!(
                "{} of {} has depth {} after {} reservations and {} releases",
                checkout.name,
                store.name(),
                depth.value(),
                depth.increments(),
                depth.decrements()
            )));
        }
    }
    Ok(())
}
