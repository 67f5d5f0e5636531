use checkout_sim::core::scenarios::{self, ConfigFile};
use checkout_sim::Simulation;

/// Command line options: `[preset|config.json] [--speed SECONDS] [--seed N] [--json]`
#[derive(Debug)]
struct Options {
    source: String,
    seconds_per_sim_hour: Option<f64>,
    seed: Option<u64>,
    json: bool,
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut options = Options {
        source: "default".to_string(),
        seconds_per_sim_hour: None,
        seed: None,
        json: false,
    };

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--json" => options.json = true,
            "--speed" => {
                let value = iter.next().ok_or("--speed needs a value")?;
                options.seconds_per_sim_hour =
                    Some(value.parse().map_err(|_| format!("invalid --speed '{}'", value))?);
            }
            "--seed" => {
                let value = iter.next().ok_or("--seed needs a value")?;
                options.seed =
                    Some(value.parse().map_err(|_| format!("invalid --seed '{}'", value))?);
            }
            other if other.starts_with("--") => return Err(format!("unknown option '{}'", other)),
            other => options.source = other.to_string(),
        }
    }
    Ok(options)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp(None)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("{}", message);
            eprintln!(
                "Usage: checkout_sim [preset|config.json] [--speed SECONDS] [--seed N] [--json]"
            );
            eprintln!("   Presets: {}", scenarios::names().join(", "));
            std::process::exit(2);
        }
    };

    let config = match scenarios::resolve(&options.source)? {
        ConfigFile::Scenario(mut scenario) => {
            if let Some(seconds) = options.seconds_per_sim_hour {
                scenario = scenario.with_seconds_per_sim_hour(seconds);
            }
            if let Some(seed) = options.seed {
                scenario = scenario.with_seed(seed);
            }
            ConfigFile::Scenario(scenario).into_simulation()?
        }
        ConfigFile::Simulation(mut config) => {
            if let Some(seconds) = options.seconds_per_sim_hour {
                config = config.with_seconds_per_sim_hour(seconds);
            }
            if let Some(seed) = options.seed {
                config = config.with_routing_seed(seed);
            }
            ConfigFile::Simulation(config).into_simulation()?
        }
    };

    println!("Starting checkout simulation '{}'", options.source);
    println!(
        "  {} store(s), {} customer(s), {} real second(s) per simulated hour",
        config.stores.len(),
        config.total_customers(),
        config.seconds_per_sim_hour
    );
    for store in &config.stores {
        println!(
            "  store{}: open {:02}:00-{:02}:00, {} checkouts, floor manager: {}",
            store.id,
            store.opening_hours.from,
            store.opening_hours.to,
            store.checkouts.len(),
            store.has_floor_manager
        );
    }
    println!();

    let report = Simulation::new(config)?.run()?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report);
    }
    Ok(())
}
