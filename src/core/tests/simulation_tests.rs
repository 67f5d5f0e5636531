// End-to-end runs of the coordinator with small, fast configurations
#[cfg(test)]
mod tests {
    use crate::core::{
        config::{CheckoutConfig, CustomerConfig, SimulationConfig, StoreConfig, TimingConfig},
        coordinator::Simulation,
        errors::SimulationError,
        events::{NullSink, Phase, RecordingSink},
        model::Outcome,
        report::StoreReport,
    };
    use std::sync::Arc;
    use std::time::Duration;

    /// 0.036 real seconds per simulated hour: one simulated second is 10µs
    const FAST: f64 = 0.036;

    fn fast_config() -> SimulationConfig {
        SimulationConfig::new()
            .with_seconds_per_sim_hour(FAST)
            .with_routing_seed(11)
    }

    fn assert_conserved(store: &StoreReport) {
        assert_eq!(
            store.processed + store.abandoned_by_time + store.abandoned_by_depth,
            store.total_customers as i64,
            "{} lost customers",
            store.name
        );
        assert_eq!(store.customers.len(), store.total_customers);
        let served: i64 = store.checkouts.iter().map(|c| c.customers_served).sum();
        assert_eq!(served, store.processed);
        let routed: u64 = store.checkouts.iter().map(|c| c.customers_routed).sum();
        assert_eq!(routed as usize, store.total_customers);
    }

    #[test]
    fn test_patient_customers_are_all_served_within_caps() {
        let store = StoreConfig::new(1)
            .with_checkouts(vec![CheckoutConfig::new(1), CheckoutConfig::new(2).with_max_items(5)])
            .with_customers((1..=10).map(|id| CustomerConfig::new(id, id, 1.0)).collect());
        let report = Simulation::new(fast_config().with_store(store))
            .unwrap()
            .with_sink(Arc::new(NullSink))
            .run()
            .unwrap();

        let store = report.store(1).unwrap();
        assert_conserved(store);
        assert_eq!(store.processed, 10);
        assert_eq!(store.abandoned_by_time, 0);
        assert_eq!(store.abandoned_by_depth, 0);
        assert_eq!(store.items_scanned(), (1..=10).sum::<i64>());

        for customer in &store.customers {
            assert_eq!(customer.outcome, Some(Outcome::Served));
            if customer.items > 5 {
                assert_eq!(customer.checkout_id, 1, "customer {} skipped the cap", customer.id);
            }
        }
    }

    #[test]
    fn test_depth_limit_turns_everyone_away() {
        // Each customer counts themselves in the lane, so a limit of 0 always trips
        let store = StoreConfig::new(1)
            .with_checkouts(vec![CheckoutConfig::new(1)])
            .with_customers(
                (1..=5)
                    .map(|id| CustomerConfig::new(id, 3, 1.0).with_max_queue_depth(0))
                    .collect(),
            );
        let sink = Arc::new(RecordingSink::new());
        let report = Simulation::new(fast_config().with_store(store))
            .unwrap()
            .with_sink(sink.clone())
            .run()
            .unwrap();

        let store = report.store(1).unwrap();
        assert_conserved(store);
        assert_eq!(store.abandoned_by_depth, 5);
        assert_eq!(store.processed, 0);
        assert_eq!(store.items_scanned(), 0);
        assert!(store.customers.iter().all(|c| {
            c.left_queue && !c.purchase_complete && c.outcome == Some(Outcome::AbandonedByDepth)
        }));

        let phases: Vec<Phase> = sink.events().iter().map(|e| e.phase).collect();
        assert_eq!(phases, vec![Phase::LeftQueueDepth; 5]);
    }

    #[test]
    fn test_customer_stuck_behind_slow_payment_leaves() {
        // A simulated hour at the till holds the next customer in the hand-off
        // far longer than their ten minutes of patience
        let config = SimulationConfig::new()
            .with_seconds_per_sim_hour(0.36)
            .with_timing(
                TimingConfig::default()
                    .with_base_inter_arrival(1.0)
                    .with_lane_setup(0.0),
            )
            .with_store(
                StoreConfig::new(1)
                    .with_checkouts(vec![CheckoutConfig::new(1).with_payment_time(3600.0)])
                    .with_customers(
                        (1..=2)
                            .map(|id| CustomerConfig::new(id, 1, 1.0).with_max_queue_wait(600))
                            .collect(),
                    ),
            );
        let report = Simulation::new(config)
            .unwrap()
            .with_sink(Arc::new(NullSink))
            .run()
            .unwrap();

        let store = report.store(1).unwrap();
        assert_conserved(store);
        assert_eq!(store.customers[0].outcome, Some(Outcome::Served));
        assert_eq!(store.customers[1].outcome, Some(Outcome::AbandonedByTime));
        assert!(store.customers[1].queue_wait_secs > 600);
        assert_eq!(store.abandoned_by_time, 1);
        assert_eq!(store.processed, 1);
    }

    #[test]
    fn test_timestamps_and_events_are_ordered() {
        let store = StoreConfig::new(1)
            .with_checkouts(vec![CheckoutConfig::new(1), CheckoutConfig::new(2)])
            .with_customers((1..=6).map(|id| CustomerConfig::new(id, 4, 2.0)).collect());
        let sink = Arc::new(RecordingSink::new());
        let report = Simulation::new(fast_config().with_store(store))
            .unwrap()
            .with_sink(sink.clone())
            .run()
            .unwrap();

        let store = report.store(1).unwrap();
        assert_conserved(store);
        for customer in &store.customers {
            assert!(customer.queue_time_start <= customer.queue_time_end);
            assert!(customer.queue_time_end <= customer.checkout_time_start);
            assert!(customer.checkout_time_start <= customer.checkout_time_end);
            assert_eq!(
                customer.queue_wait_secs,
                customer.queue_time_end - customer.queue_time_start
            );

            let events = sink.events_for(1, customer.id);
            let phases: Vec<Phase> = events.iter().map(|e| e.phase).collect();
            assert_eq!(phases.first(), Some(&Phase::Arrived));
            assert_eq!(phases.last(), Some(&Phase::Finished));
            assert_eq!(phases.iter().filter(|p| **p == Phase::Scanning).count(), 4);
            assert_eq!(phases.iter().filter(|p| p.is_terminal()).count(), 1);
            assert!(events
                .windows(2)
                .all(|pair| pair[0].time.epoch_seconds <= pair[1].time.epoch_seconds));
            assert!(events.iter().all(|e| e.checkout_id == customer.checkout_id));
        }
    }

    #[test]
    fn test_stores_run_side_by_side() {
        let config = fast_config()
            .with_store(
                StoreConfig::new(1)
                    .with_checkouts(vec![CheckoutConfig::new(1)])
                    .with_customers((1..=4).map(|id| CustomerConfig::new(id, 2, 1.0)).collect()),
            )
            .with_store(
                StoreConfig::new(2)
                    .with_floor_manager(false)
                    .with_checkouts(vec![CheckoutConfig::new(1), CheckoutConfig::new(2)])
                    .with_customers((1..=7).map(|id| CustomerConfig::new(id, 1, 1.0)).collect()),
            );
        let report = Simulation::new(config)
            .unwrap()
            .with_sink(Arc::new(NullSink))
            .run()
            .unwrap();

        assert_eq!(report.stores.len(), 2);
        assert_eq!(report.total_customers(), 11);
        for store in &report.stores {
            assert_conserved(store);
            assert!(store.customers.iter().all(|c| c.store_id == store.id));
        }
        assert_eq!(report.store(1).unwrap().processed, 4);
        assert_eq!(report.store(2).unwrap().processed, 7);
    }

    #[test]
    fn test_store_without_customers_finishes() {
        let config = fast_config()
            .with_store(StoreConfig::new(1).with_checkouts(vec![CheckoutConfig::new(1)]));
        let report = Simulation::new(config).unwrap().run().unwrap();

        let store = report.store(1).unwrap();
        assert_eq!(store.processed, 0);
        assert!(store.customers.is_empty());
        assert_eq!(store.average_queue_wait_secs(), None);
        assert_eq!(report.total_customers(), 0);
    }

    #[test]
    fn test_lane_setup_paces_the_worker() {
        // Half a simulated hour of setup before every pick-up, 0.18s real each
        let config = SimulationConfig::new()
            .with_seconds_per_sim_hour(0.36)
            .with_timing(
                TimingConfig::default()
                    .with_base_inter_arrival(1.0)
                    .with_lane_setup(1800.0),
            )
            .with_store(
                StoreConfig::new(1)
                    .with_checkouts(vec![CheckoutConfig::new(1).with_payment_time(0.0)])
                    .with_customers((1..=3).map(|id| CustomerConfig::new(id, 1, 0.1)).collect()),
            );
        let report = Simulation::new(config)
            .unwrap()
            .with_sink(Arc::new(NullSink))
            .run()
            .unwrap();

        assert_eq!(report.store(1).unwrap().processed, 3);
        assert!(report.elapsed >= Duration::from_millis(540), "took {:?}", report.elapsed);
    }

    #[test]
    fn test_invalid_configuration_never_starts() {
        assert!(matches!(
            Simulation::new(SimulationConfig::new()),
            Err(SimulationError::Configuration(_))
        ));

        let unservable = fast_config().with_store(
            StoreConfig::new(1)
                .with_checkouts(vec![CheckoutConfig::new(1).with_max_items(2)])
                .with_customers(vec![CustomerConfig::new(1, 3, 1.0)]),
        );
        assert!(matches!(
            Simulation::new(unservable),
            Err(SimulationError::Configuration(_))
        ));

        let no_clock = fast_config()
            .with_seconds_per_sim_hour(0.0)
            .with_store(StoreConfig::new(1).with_checkouts(vec![CheckoutConfig::new(1)]));
        assert!(Simulation::new(no_clock).is_err());
    }
}
