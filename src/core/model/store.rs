use super::checkout::Checkout;
use super::customer::Customer;
use crate::core::config::{BusyLevel, OpeningHours, StoreConfig, Weather};
use crate::core::counter::SafeCounter;

/// Busy factor for every hour of the day.
///
/// Hours outside the configured table fall back to [`BusyLevel::default`];
/// validation guarantees every opening hour is configured explicitly.
#[derive(Debug, Clone, PartialEq)]
pub struct BusySchedule {
    factors: [f64; 24],
}

impl BusySchedule {
    pub fn from_levels<'a>(levels: impl IntoIterator<Item = (&'a u32, &'a BusyLevel)>) -> Self {
        let mut factors = [BusyLevel::default().factor(); 24];
        for (hour, level) in levels {
            if let Some(slot) = factors.get_mut(*hour as usize) {
                *slot = level.factor();
            }
        }
        Self { factors }
    }

    pub fn factor_at(&self, hour: u32) -> f64 {
        self.factors[(hour % 24) as usize]
    }
}

/// Shared runtime state of one store.
///
/// Built once from its [`StoreConfig`] and shared by the store's spawner and
/// every lane worker. The three outcome counters are written concurrently by
/// the workers and read by the coordinator at shutdown.
#[derive(Debug)]
pub struct Store {
    pub id: u32,
    pub opening_hours: OpeningHours,
    pub weather: Weather,
    pub has_floor_manager: bool,
    pub total_customers: usize,
    busy_schedule: BusySchedule,
    /// Sorted by id so routing ties resolve the same way on every run
    checkouts: Vec<Checkout>,
    processed: SafeCounter,
    abandoned_by_time: SafeCounter,
    abandoned_by_depth: SafeCounter,
}

impl Store {
    /// Build the store and hand back its customers, which move to the spawner
    pub fn from_config(config: &StoreConfig) -> (Self, Vec<Customer>) {
        let mut checkouts: Vec<Checkout> =
            config.checkouts.iter().map(Checkout::from_config).collect();
        checkouts.sort_by_key(|checkout| checkout.id);

        let customers: Vec<Customer> = config
            .customers
            .iter()
            .map(|customer| Customer::from_config(config.id, customer))
            .collect();

        let store = Self {
            id: config.id,
            opening_hours: config.opening_hours,
            weather: config.weather,
            has_floor_manager: config.has_floor_manager,
            total_customers: customers.len(),
            busy_schedule: BusySchedule::from_levels(&config.busy_hours),
            checkouts,
            processed: SafeCounter::new(),
            abandoned_by_time: SafeCounter::new(),
            abandoned_by_depth: SafeCounter::new(),
        };
        (store, customers)
    }

    pub fn name(&self) -> String {
        format!("store{}", self.id)
    }

    pub fn checkouts(&self) -> &[Checkout] {
        &self.checkouts
    }

    pub fn checkout(&self, index: usize) -> &Checkout {
        &self.checkouts[index]
    }

    pub fn busy_factor(&self, hour: u32) -> f64 {
        self.busy_schedule.factor_at(hour)
    }

    pub fn record_processed(&self) {
        self.processed.increment();
    }

    pub fn record_abandoned_by_time(&self) {
        self.abandoned_by_time.increment();
    }

    pub fn record_abandoned_by_depth(&self) {
        self.abandoned_by_depth.increment();
    }

    pub fn processed(&self) -> i64 {
        self.processed.value()
    }

    pub fn abandoned_by_time(&self) -> i64 {
        self.abandoned_by_time.value()
    }

    pub fn abandoned_by_depth(&self) -> i64 {
        self.abandoned_by_depth.value()
    }

    /// Customers with a terminal outcome so far
    pub fn finished(&self) -> i64 {
        self.processed() + self.abandoned_by_time() + self.abandoned_by_depth()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{CheckoutConfig, CustomerConfig};
    use std::collections::BTreeMap;

    #[test]
    fn test_busy_schedule_lookup() {
        let mut levels = BTreeMap::new();
        levels.insert(9, BusyLevel::Quiet);
        levels.insert(13, BusyLevel::Busy);
        let schedule = BusySchedule::from_levels(&levels);

        assert_eq!(schedule.factor_at(9), 0.8);
        assert_eq!(schedule.factor_at(13), 1.2);
        assert_eq!(schedule.factor_at(3), 1.0);
        assert_eq!(schedule.factor_at(37), 1.2);
    }

    #[test]
    fn test_from_config_sorts_checkouts() {
        let config = StoreConfig::new(2)
            .with_checkouts(vec![
                CheckoutConfig::new(3),
                CheckoutConfig::new(1),
                CheckoutConfig::new(2),
            ])
            .with_customers(vec![CustomerConfig::new(1, 2, 1.0), CustomerConfig::new(2, 4, 1.0)]);
        let (store, customers) = Store::from_config(&config);

        let ids: Vec<u32> = store.checkouts().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(store.total_customers, 2);
        assert_eq!(customers.len(), 2);
        assert!(customers.iter().all(|c| c.store_id == 2));
        assert_eq!(store.name(), "store2");
    }

    #[test]
    fn test_outcome_counters() {
        let config = StoreConfig::new(1).with_checkouts(vec![CheckoutConfig::new(1)]);
        let (store, _) = Store::from_config(&config);
        store.record_processed();
        store.record_processed();
        store.record_abandoned_by_time();
        store.record_abandoned_by_depth();
        assert_eq!(store.processed(), 2);
        assert_eq!(store.finished(), 4);
    }
}
