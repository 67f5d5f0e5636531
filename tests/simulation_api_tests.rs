use checkout_sim::core::{generator, scenarios};
use checkout_sim::{
    CheckoutConfig, CustomerConfig, Outcome, RecordingSink, ScenarioConfig, SimClock, Simulation,
    SimulationConfig, SimulationError, StoreConfig, StoreScenario, TimingConfig,
};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[test]
fn test_one_real_second_is_one_simulated_second_at_3600() {
    let clock = SimClock::new(3600.0, 8);
    assert!((clock.scaling_factor() - 1.0).abs() < 1e-12);

    let started = Instant::now();
    clock.scaled_sleep(1.0);
    let slept = started.elapsed();
    assert!(slept >= Duration::from_millis(900), "slept {:?}", slept);
    assert!(slept <= Duration::from_millis(1300), "slept {:?}", slept);

    // One hour of simulated time passes in one real second at the default speed
    let fast = SimClock::new(1.0, 8);
    assert_eq!(fast.real_duration(3600.0), Duration::from_secs(1));
    assert_eq!(fast.sim_time_at(Duration::from_secs(1)).label, "09:00:00");
}

#[test]
fn test_generated_scenario_runs_end_to_end() {
    let scenario = ScenarioConfig {
        name: "smoke".to_string(),
        seconds_per_sim_hour: 0.036,
        timing: TimingConfig::default(),
        seed: Some(2024),
        stores: vec![StoreScenario {
            customer_count: (15, 25),
            products_per_customer: (1, 12),
            checkouts: vec![
                CheckoutConfig::new(1),
                CheckoutConfig::new(2),
                CheckoutConfig::new(3).with_max_items(5),
            ],
            ..StoreScenario::default()
        }],
    };
    let config = generator::materialize(&scenario).unwrap();
    let expected = config.total_customers();

    let report = Simulation::new(config).unwrap().run().unwrap();
    let store = report.store(1).unwrap();
    assert_eq!(report.total_customers(), expected);
    assert_eq!(
        store.processed + store.abandoned_by_time + store.abandoned_by_depth,
        expected as i64
    );
    for customer in &store.customers {
        if customer.items > 5 {
            assert_ne!(customer.checkout_id, 3);
        }
    }

    let text = report.to_string();
    assert!(text.contains("---Store: store1, Customer processed:"));
    assert!(text.contains("---Checkout: checkout3 (max 5 items)"));
}

#[test]
fn test_report_serializes_to_json() {
    let config = SimulationConfig::new()
        .with_seconds_per_sim_hour(0.036)
        .with_store(
            StoreConfig::new(7)
                .with_checkouts(vec![CheckoutConfig::new(1)])
                .with_customers(vec![CustomerConfig::new(1, 2, 1.0)]),
        );
    let sink = Arc::new(RecordingSink::new());
    let report = Simulation::new(config).unwrap().with_sink(sink.clone()).run().unwrap();

    let json: serde_json::Value = serde_json::to_value(&report).unwrap();
    assert_eq!(json["stores"][0]["name"], "store7");
    assert_eq!(json["stores"][0]["processed"], 1);
    assert_eq!(json["stores"][0]["customers"][0]["outcome"], "Served");
    assert_eq!(report.store(7).unwrap().customers[0].outcome, Some(Outcome::Served));
    assert!(sink.events().iter().all(|e| e.store_id == 7));
}

#[test]
fn test_presets_and_errors_through_public_api() {
    let names = scenarios::names();
    assert!(names.contains(&"scenario3"));
    let preset = scenarios::resolve("scenario1").unwrap();
    let config = preset.into_simulation().unwrap();
    assert_eq!(config.stores[0].checkouts.len(), 4);

    let error = Simulation::new(SimulationConfig::new()).err().unwrap();
    assert!(matches!(error, SimulationError::Configuration(_)));
    assert!(error.to_string().starts_with("Configuration error"));
}
