use checkout_sim::SimClock;
use log::info;
use std::time::Duration;

/// Sleep one configured hour of real time and show how far the simulated clock moved.
///
/// Usage: `clock_check [SECONDS_PER_SIM_HOUR] [OPENING_HOUR]`, defaults 1 and 8.
fn main() -> Result<(), String> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp(None)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let seconds_per_sim_hour: f64 = match args.first() {
        Some(value) => value
            .parse()
            .map_err(|_| format!("invalid seconds per simulated hour '{}'", value))?,
        None => 1.0,
    };
    let opening_hour: u32 = match args.get(1) {
        Some(value) => value.parse().map_err(|_| format!("invalid opening hour '{}'", value))?,
        None => 8,
    };
    if !seconds_per_sim_hour.is_finite() || seconds_per_sim_hour <= 0.0 {
        return Err("seconds per simulated hour must be positive".to_string());
    }

    let clock = SimClock::new(seconds_per_sim_hour, opening_hour);
    let start = clock.current_sim_time();
    info!("{} real seconds = 1 hour in the simulated world", seconds_per_sim_hour);
    info!("Simulated start: {}", start);

    println!("Sleeping {} real seconds", seconds_per_sim_hour);
    std::thread::sleep(Duration::from_secs_f64(seconds_per_sim_hour));
    let after_real = clock.current_sim_time();
    println!(
        "Real sleep:   {} -> {} ({} simulated seconds)",
        start,
        after_real,
        clock.diff(start.epoch_seconds, after_real.epoch_seconds)
    );

    // The same hour again, this time through the scaled sleep the engine uses
    clock.scaled_sleep(3600.0);
    let after_scaled = clock.current_sim_time();
    println!(
        "Scaled sleep: {} -> {} ({} simulated seconds)",
        after_real,
        after_scaled,
        clock.diff(after_real.epoch_seconds, after_scaled.epoch_seconds)
    );
    Ok(())
}
