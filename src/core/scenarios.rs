//! Built-in scenario presets and config file loading
use crate::core::config::{
    BusyLevel, CheckoutConfig, OpeningHours, ScenarioConfig, SimulationConfig, StoreScenario,
};
use crate::core::errors::{config_error, SimResult};
use crate::core::generator;
use std::collections::BTreeMap;
use std::path::Path;

/// Names accepted by [`by_name`]
pub fn names() -> &'static [&'static str] {
    &["default", "scenario1", "scenario2", "scenario3"]
}

/// Look up a preset by name (case-insensitive)
pub fn by_name(name: &str) -> Option<ScenarioConfig> {
    match name.to_ascii_lowercase().as_str() {
        "default" => Some(ScenarioConfig::default()),
        "scenario1" => Some(scenario1()),
        "scenario2" => Some(scenario2()),
        "scenario3" => Some(scenario3()),
        _ => None,
    }
}

/// Busy levels from `(first_hour, last_hour, level)` spans, both ends inclusive
fn busy_profile(spans: &[(u32, u32, BusyLevel)]) -> BTreeMap<u32, BusyLevel> {
    spans
        .iter()
        .flat_map(|&(first, last, level)| (first..=last).map(move |hour| (hour, level)))
        .collect()
}

/// `count` unlimited checkouts with the last one capped at `express_max_items`
fn checkouts_with_express(count: u32, express_max_items: u32) -> Vec<CheckoutConfig> {
    (1..=count)
        .map(|id| {
            let checkout = CheckoutConfig::new(id);
            if id == count {
                checkout.with_max_items(express_max_items)
            } else {
                checkout
            }
        })
        .collect()
}

fn preset(
    name: &str,
    busy_hours: BTreeMap<u32, BusyLevel>,
    checkouts: Vec<CheckoutConfig>,
) -> ScenarioConfig {
    let store = StoreScenario {
        opening_hours: OpeningHours::new(9, 22),
        busy_hours,
        customer_count: (300, 400),
        products_per_customer: (1, 120),
        checkouts,
        ..StoreScenario::default()
    };
    ScenarioConfig {
        name: name.to_string(),
        stores: vec![store],
        ..ScenarioConfig::default()
    }
}

/// Four checkouts, one express lane, busy through the working day
pub fn scenario1() -> ScenarioConfig {
    preset(
        "scenario1",
        busy_profile(&[
            (9, 9, BusyLevel::Quiet),
            (10, 18, BusyLevel::LittleBusy),
            (19, 21, BusyLevel::Quiet),
        ]),
        checkouts_with_express(4, 5),
    )
}

/// Six checkouts, one express lane, a lunchtime lull between two rushes
pub fn scenario2() -> ScenarioConfig {
    preset(
        "scenario2",
        busy_profile(&[
            (9, 9, BusyLevel::Quiet),
            (10, 11, BusyLevel::LittleBusy),
            (12, 15, BusyLevel::Quiet),
            (16, 18, BusyLevel::LittleBusy),
            (19, 21, BusyLevel::Quiet),
        ]),
        checkouts_with_express(6, 5),
    )
}

/// Nine checkouts, a ten-item lane, one busy afternoon
pub fn scenario3() -> ScenarioConfig {
    preset(
        "scenario3",
        busy_profile(&[
            (9, 12, BusyLevel::Quiet),
            (13, 15, BusyLevel::Busy),
            (16, 21, BusyLevel::Quiet),
        ]),
        checkouts_with_express(9, 10),
    )
}

/// Contents of a config file: either form is accepted
#[derive(Debug, Clone)]
pub enum ConfigFile {
    Scenario(ScenarioConfig),
    Simulation(SimulationConfig),
}

impl ConfigFile {
    /// A scenario carries a `name`; anything else must be a full simulation
    pub fn from_json(text: &str) -> SimResult<Self> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        if value.get("name").is_some() {
            Ok(ConfigFile::Scenario(serde_json::from_str(text)?))
        } else {
            Ok(ConfigFile::Simulation(serde_json::from_str(text)?))
        }
    }

    pub fn load(path: impl AsRef<Path>) -> SimResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Materialise into a runnable configuration
    pub fn into_simulation(self) -> SimResult<SimulationConfig> {
        match self {
            ConfigFile::Scenario(scenario) => generator::materialize(&scenario),
            ConfigFile::Simulation(config) => {
                config.validate()?;
                Ok(config)
            }
        }
    }
}

/// Resolve a preset name or a path to a JSON config file
pub fn resolve(name_or_path: &str) -> SimResult<ConfigFile> {
    if let Some(scenario) = by_name(name_or_path) {
        return Ok(ConfigFile::Scenario(scenario));
    }
    let path = Path::new(name_or_path);
    if !path.exists() {
        return Err(config_error(format!(
            "'{}' is neither a preset ({}) nor a config file",
            name_or_path,
            names().join(", ")
        )));
    }
    ConfigFile::load(path)
}
