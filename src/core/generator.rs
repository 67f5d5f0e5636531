use crate::core::config::{
    CustomerConfig, ProductConfig, ScenarioConfig, SimulationConfig, StoreConfig, StoreScenario,
};
use crate::core::errors::{config_error, SimResult};
use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Uniform};
use rayon::prelude::*;

/// Turn a range-based scenario into a fully materialised run.
///
/// Stores are generated in parallel, each from its own `StdRng` seeded with
/// `seed + store_id`, so a seeded scenario always yields the same customers
/// and products. Store ids are assigned from 1 in scenario order. The
/// scenario seed doubles as the routing seed.
pub fn materialize(scenario: &ScenarioConfig) -> SimResult<SimulationConfig> {
    let stores = scenario
        .stores
        .par_iter()
        .enumerate()
        .map(|(index, store)| generate_store(index as u32 + 1, store, scenario.seed))
        .collect::<SimResult<Vec<StoreConfig>>>()?;

    let config = SimulationConfig {
        seconds_per_sim_hour: scenario.seconds_per_sim_hour,
        timing: scenario.timing.clone(),
        routing_seed: scenario.seed,
        stores,
    };
    config.validate()?;
    Ok(config)
}

/// Number of customers for a day in the given weather
pub fn weather_adjusted_count(range: (u32, u32), weather_factor: f64) -> (u32, u32) {
    let (min, max) = range;
    let scaled = (max as f64 * weather_factor).floor() as u32;
    (min, scaled.max(min))
}

fn check_range<T: PartialOrd + std::fmt::Debug>(
    store_id: u32,
    what: &str,
    range: (T, T),
) -> SimResult<()> {
    if range.0 > range.1 {
        return Err(config_error(format!(
            "store{}: {} range {:?}..={:?} is empty",
            store_id, what, range.0, range.1
        )));
    }
    Ok(())
}

fn generate_store(id: u32, scenario: &StoreScenario, seed: Option<u64>) -> SimResult<StoreConfig> {
    check_range(id, "customer count", scenario.customer_count)?;
    check_range(id, "products per customer", scenario.products_per_customer)?;
    check_range(id, "max queue time", scenario.max_queue_time_minutes)?;
    check_range(id, "max queue depth", scenario.max_queue_depth)?;
    let (scan_min, scan_max) = scenario.product_process_time_secs;
    if !scan_min.is_finite() || !scan_max.is_finite() || scan_min < 0.0 {
        return Err(config_error(format!(
            "store{}: product process time range {}..={} is invalid",
            id, scan_min, scan_max
        )));
    }
    check_range(id, "product process time", (scan_min, scan_max))?;

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(u64::from(id))),
        None => StdRng::from_entropy(),
    };

    let (count_min, count_max) =
        weather_adjusted_count(scenario.customer_count, scenario.weather.factor());
    let count = Uniform::new_inclusive(count_min, count_max).sample(&mut rng);
    let (products_min, products_max) = scenario.products_per_customer;
    let products = Uniform::new_inclusive(products_min, products_max);
    // Scan times are drawn in tenths of a second
    let scan_tenths = Uniform::new_inclusive(
        (scan_min * 10.0).round() as u32,
        (scan_max * 10.0).round() as u32,
    );
    let (wait_min, wait_max) = scenario.max_queue_time_minutes;
    let queue_minutes = Uniform::new_inclusive(wait_min, wait_max);
    let (depth_min, depth_max) = scenario.max_queue_depth;
    let queue_depth = Uniform::new_inclusive(depth_min, depth_max);

    let customers = (1..=count)
        .map(|customer_id| CustomerConfig {
            id: customer_id,
            products: (1..=products.sample(&mut rng))
                .map(|product_id| ProductConfig {
                    id: product_id,
                    process_time_secs: scan_tenths.sample(&mut rng) as f64 / 10.0,
                })
                .collect(),
            max_queue_wait_secs: i64::from(queue_minutes.sample(&mut rng)) * 60,
            max_queue_depth: i64::from(queue_depth.sample(&mut rng)),
        })
        .collect::<Vec<_>>();

    debug!(
        "store{}: generated {} customers ({:?} weather) for {} checkouts",
        id,
        customers.len(),
        scenario.weather,
        scenario.checkouts.len()
    );

    Ok(StoreConfig {
        id,
        opening_hours: scenario.opening_hours,
        busy_hours: scenario.busy_hours.clone(),
        weather: scenario.weather,
        has_floor_manager: scenario.has_floor_manager,
        checkouts: scenario.checkouts.clone(),
        customers,
    })
}
