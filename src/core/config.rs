//! Configuration for checkout simulation runs
//!
//! Two layers live here. [`ScenarioConfig`] describes a run in terms of ranges
//! (how many customers, how many products each, how patient they are) and is
//! what presets and config files provide. [`SimulationConfig`] is the fully
//! materialised form the engine consumes: every store, checkout, customer and
//! product spelled out. `generator::materialize` turns the first into the second.
use crate::core::errors::{config_error, SimResult};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// How busy a store is during a given hour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BusyLevel {
    Quiet,
    LittleBusy,
    Busy,
}

impl BusyLevel {
    pub fn factor(&self) -> f64 {
        match self {
            BusyLevel::Quiet => 0.8,
            BusyLevel::LittleBusy => 1.0,
            BusyLevel::Busy => 1.2,
        }
    }
}

impl Default for BusyLevel {
    fn default() -> Self {
        BusyLevel::LittleBusy
    }
}

/// Weather on the simulated day; scales how many customers show up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Weather {
    Bad,
    Good,
    Excellent,
}

impl Weather {
    pub fn factor(&self) -> f64 {
        match self {
            Weather::Bad => 0.8,
            Weather::Good => 1.0,
            Weather::Excellent => 0.85,
        }
    }
}

impl Default for Weather {
    fn default() -> Self {
        Weather::Good
    }
}

/// Store opening hours, `from` inclusive and `to` exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningHours {
    pub from: u32,
    pub to: u32,
}

impl OpeningHours {
    pub fn new(from: u32, to: u32) -> Self {
        Self { from, to }
    }

    pub fn hours(&self) -> std::ops::Range<u32> {
        self.from..self.to
    }
}

impl Default for OpeningHours {
    fn default() -> Self {
        Self { from: 8, to: 22 }
    }
}

/// Engine-wide simulated delays, all in simulated seconds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Gap between two customer arrivals before busy-hour adjustment
    pub base_inter_arrival_secs: f64,
    /// Pause a lane takes before calling the next customer
    pub lane_setup_secs: f64,
    /// Subtracted from the hourly busy factor to get the arrival multiplier
    pub busy_baseline: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            base_inter_arrival_secs: 120.0,
            lane_setup_secs: 30.0,
            busy_baseline: 2.0,
        }
    }
}

impl TimingConfig {
    pub fn with_base_inter_arrival(mut self, secs: f64) -> Self {
        self.base_inter_arrival_secs = secs;
        self
    }

    pub fn with_lane_setup(mut self, secs: f64) -> Self {
        self.lane_setup_secs = secs;
        self
    }

    pub fn with_busy_baseline(mut self, baseline: f64) -> Self {
        self.busy_baseline = baseline;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductConfig {
    pub id: u32,
    /// Base scan time in simulated seconds, before cashier efficiency
    pub process_time_secs: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerConfig {
    pub id: u32,
    pub products: Vec<ProductConfig>,
    /// Longest queue wait (simulated seconds) the customer tolerates
    pub max_queue_wait_secs: i64,
    /// Deepest queue the customer tolerates, counting themselves
    pub max_queue_depth: i64,
}

impl CustomerConfig {
    /// Customer with `items` products of `process_time_secs` each and no patience limits
    pub fn new(id: u32, items: u32, process_time_secs: f64) -> Self {
        Self {
            id,
            products: (1..=items)
                .map(|product_id| ProductConfig {
                    id: product_id,
                    process_time_secs,
                })
                .collect(),
            max_queue_wait_secs: i64::MAX,
            max_queue_depth: i64::MAX,
        }
    }

    pub fn with_max_queue_wait(mut self, secs: i64) -> Self {
        self.max_queue_wait_secs = secs;
        self
    }

    pub fn with_max_queue_depth(mut self, depth: i64) -> Self {
        self.max_queue_depth = depth;
        self
    }

    pub fn items(&self) -> usize {
        self.products.len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutConfig {
    pub id: u32,
    pub name: String,
    /// Multiplier on every product's scan time
    pub cashier_efficiency: f64,
    /// Largest basket this lane accepts; 0 means unlimited
    pub max_items: u32,
    /// Simulated seconds spent paying once scanning is done
    pub payment_time_secs: f64,
    /// Location rank; informational only
    pub desirability: u32,
}

impl CheckoutConfig {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            name: format!("checkout{}", id),
            cashier_efficiency: 1.0,
            max_items: 0,
            payment_time_secs: 60.0,
            desirability: id,
        }
    }

    pub fn with_max_items(mut self, max_items: u32) -> Self {
        self.max_items = max_items;
        self
    }

    pub fn with_cashier_efficiency(mut self, efficiency: f64) -> Self {
        self.cashier_efficiency = efficiency;
        self
    }

    pub fn with_payment_time(mut self, secs: f64) -> Self {
        self.payment_time_secs = secs;
        self
    }

    /// True when a basket of `items` may queue here
    pub fn accepts(&self, items: usize) -> bool {
        basket_fits(self.max_items, items)
    }
}

/// Fully materialised store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub id: u32,
    pub opening_hours: OpeningHours,
    /// Busy level per hour of day; must cover every opening hour
    pub busy_hours: BTreeMap<u32, BusyLevel>,
    pub weather: Weather,
    /// With a floor manager customers are sent to the shortest eligible queue,
    /// otherwise to a random eligible one
    pub has_floor_manager: bool,
    pub checkouts: Vec<CheckoutConfig>,
    pub customers: Vec<CustomerConfig>,
}

impl StoreConfig {
    /// Store open with default hours, little-busy all day, floor manager present
    pub fn new(id: u32) -> Self {
        let opening_hours = OpeningHours::default();
        Self {
            id,
            opening_hours,
            busy_hours: uniform_busy_hours(opening_hours, BusyLevel::LittleBusy),
            weather: Weather::default(),
            has_floor_manager: true,
            checkouts: Vec::new(),
            customers: Vec::new(),
        }
    }

    pub fn with_opening_hours(mut self, from: u32, to: u32) -> Self {
        self.opening_hours = OpeningHours::new(from, to);
        self.busy_hours = uniform_busy_hours(self.opening_hours, BusyLevel::LittleBusy);
        self
    }

    pub fn with_floor_manager(mut self, present: bool) -> Self {
        self.has_floor_manager = present;
        self
    }

    pub fn with_checkouts(mut self, checkouts: Vec<CheckoutConfig>) -> Self {
        self.checkouts = checkouts;
        self
    }

    pub fn with_customers(mut self, customers: Vec<CustomerConfig>) -> Self {
        self.customers = customers;
        self
    }

    fn validate(&self) -> SimResult<()> {
        let hours = self.opening_hours;
        if hours.from >= hours.to || hours.to > 24 {
            return Err(config_error(format!(
                "store {} has invalid opening hours {}-{}",
                self.id, hours.from, hours.to
            )));
        }
        for hour in hours.hours() {
            if !self.busy_hours.contains_key(&hour) {
                return Err(config_error(format!(
                    "store {} has no busy level for {:02}:00",
                    self.id, hour
                )));
            }
        }

        if self.checkouts.is_empty() {
            return Err(config_error(format!("store {} has no checkouts", self.id)));
        }

        let mut ids = HashSet::new();
        let mut names = HashSet::new();
        for checkout in &self.checkouts {
            if !ids.insert(checkout.id) {
                return Err(config_error(format!(
                    "store {} has duplicate checkout id {}",
                    self.id, checkout.id
                )));
            }
            if !names.insert(checkout.name.as_str()) {
                return Err(config_error(format!(
                    "store {} has duplicate checkout name \"{}\"",
                    self.id, checkout.name
                )));
            }
            if !is_non_negative(checkout.cashier_efficiency) {
                return Err(config_error(format!(
                    "checkout {} of store {} has invalid cashier efficiency {}",
                    checkout.id, self.id, checkout.cashier_efficiency
                )));
            }
            if !is_non_negative(checkout.payment_time_secs) {
                return Err(config_error(format!(
                    "checkout {} of store {} has invalid payment time {}",
                    checkout.id, self.id, checkout.payment_time_secs
                )));
            }
        }

        let mut customer_ids = HashSet::new();
        for customer in &self.customers {
            if !customer_ids.insert(customer.id) {
                return Err(config_error(format!(
                    "store {} has duplicate customer id {}",
                    self.id, customer.id
                )));
            }
            let mut product_ids = HashSet::new();
            for product in &customer.products {
                if !product_ids.insert(product.id) {
                    return Err(config_error(format!(
                        "customer {} of store {} has duplicate product id {}",
                        customer.id, self.id, product.id
                    )));
                }
                if !is_non_negative(product.process_time_secs) {
                    return Err(config_error(format!(
                        "product {} of customer {} in store {} has invalid process time {}",
                        product.id, customer.id, self.id, product.process_time_secs
                    )));
                }
            }
            if !self.checkouts.iter().any(|c| c.accepts(customer.items())) {
                return Err(config_error(format!(
                    "customer {} of store {} has {} items and no checkout accepts that many",
                    customer.id,
                    self.id,
                    customer.items()
                )));
            }
        }

        Ok(())
    }
}

/// Item cap check shared by checkout configs and live lanes; a cap of 0 is unlimited
pub(crate) fn basket_fits(max_items: u32, items: usize) -> bool {
    max_items == 0 || items <= max_items as usize
}

/// Durations and multipliers that feed the scaled clock must be finite and >= 0
fn is_non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

/// Busy level `level` for every opening hour
pub fn uniform_busy_hours(hours: OpeningHours, level: BusyLevel) -> BTreeMap<u32, BusyLevel> {
    hours.hours().map(|hour| (hour, level)).collect()
}

/// Configuration the engine runs from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Real seconds that represent one simulated hour
    pub seconds_per_sim_hour: f64,
    pub timing: TimingConfig,
    /// Seed for random-eligible routing; `None` seeds from entropy
    pub routing_seed: Option<u64>,
    pub stores: Vec<StoreConfig>,
}

impl SimulationConfig {
    pub fn new() -> Self {
        Self {
            seconds_per_sim_hour: 1.0,
            timing: TimingConfig::default(),
            routing_seed: None,
            stores: Vec::new(),
        }
    }

    pub fn with_seconds_per_sim_hour(mut self, seconds: f64) -> Self {
        self.seconds_per_sim_hour = seconds;
        self
    }

    pub fn with_timing(mut self, timing: TimingConfig) -> Self {
        self.timing = timing;
        self
    }

    pub fn with_routing_seed(mut self, seed: u64) -> Self {
        self.routing_seed = Some(seed);
        self
    }

    pub fn with_store(mut self, store: StoreConfig) -> Self {
        self.stores.push(store);
        self
    }

    /// Total customers across all stores; the coordinator waits for this many completions
    pub fn total_customers(&self) -> usize {
        self.stores.iter().map(|s| s.customers.len()).sum()
    }

    /// Earliest opening hour, which is where the simulated day starts
    pub fn earliest_opening(&self) -> u32 {
        self.stores
            .iter()
            .map(|s| s.opening_hours.from)
            .min()
            .unwrap_or(0)
    }

    /// Reject configurations that cannot produce a complete run
    pub fn validate(&self) -> SimResult<()> {
        if !self.seconds_per_sim_hour.is_finite() || self.seconds_per_sim_hour <= 0.0 {
            return Err(config_error(format!(
                "seconds per simulated hour must be positive, got {}",
                self.seconds_per_sim_hour
            )));
        }
        let timing = &self.timing;
        for (name, value) in [
            ("base inter-arrival", timing.base_inter_arrival_secs),
            ("lane setup", timing.lane_setup_secs),
        ] {
            if !is_non_negative(value) {
                return Err(config_error(format!(
                    "{} time must be finite and non-negative, got {}",
                    name, value
                )));
            }
        }
        if !timing.busy_baseline.is_finite() {
            return Err(config_error(format!(
                "busy baseline must be finite, got {}",
                timing.busy_baseline
            )));
        }
        if self.stores.is_empty() {
            return Err(config_error("at least one store is required"));
        }

        let mut store_ids = HashSet::new();
        for store in &self.stores {
            if !store_ids.insert(store.id) {
                return Err(config_error(format!("duplicate store id {}", store.id)));
            }
            store.validate()?;
        }
        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Range-based description of one store, sampled by the generator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreScenario {
    pub opening_hours: OpeningHours,
    pub busy_hours: BTreeMap<u32, BusyLevel>,
    pub weather: Weather,
    pub has_floor_manager: bool,
    /// Customers per day (min, max), before weather
    pub customer_count: (u32, u32),
    /// Products per customer (min, max)
    pub products_per_customer: (u32, u32),
    /// Scan time per product in seconds (min, max), sampled in tenths
    pub product_process_time_secs: (f64, f64),
    /// Minutes a customer queues before giving up (min, max)
    pub max_queue_time_minutes: (u32, u32),
    /// Queue depth that makes a customer give up (min, max)
    pub max_queue_depth: (u32, u32),
    pub checkouts: Vec<CheckoutConfig>,
}

impl Default for StoreScenario {
    fn default() -> Self {
        let opening_hours = OpeningHours::default();
        Self {
            opening_hours,
            busy_hours: uniform_busy_hours(opening_hours, BusyLevel::LittleBusy),
            weather: Weather::Good,
            has_floor_manager: true,
            customer_count: (350, 450),
            products_per_customer: (1, 100),
            product_process_time_secs: (0.5, 6.0),
            max_queue_time_minutes: (15, 30),
            max_queue_depth: (5, 10),
            checkouts: (1..=10).map(CheckoutConfig::new).collect(),
        }
    }
}

/// Range-based description of a whole run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub name: String,
    pub seconds_per_sim_hour: f64,
    pub timing: TimingConfig,
    /// Seed for customer generation and routing; `None` draws from entropy
    pub seed: Option<u64>,
    pub stores: Vec<StoreScenario>,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            seconds_per_sim_hour: 1.0,
            timing: TimingConfig::default(),
            seed: None,
            stores: vec![StoreScenario::default()],
        }
    }
}

impl ScenarioConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_seconds_per_sim_hour(mut self, seconds: f64) -> Self {
        self.seconds_per_sim_hour = seconds;
        self
    }
}
