pub mod core;

// Re-export commonly used types
pub use crate::core::clock::{SimClock, SimTime};
pub use crate::core::config::{
    BusyLevel, CheckoutConfig, CustomerConfig, OpeningHours, ProductConfig, ScenarioConfig,
    SimulationConfig, StoreConfig, StoreScenario, TimingConfig, Weather,
};
pub use crate::core::coordinator::Simulation;
pub use crate::core::errors::{SimResult, SimulationError};
pub use crate::core::events::{EventSink, LogSink, NullSink, Phase, ProgressEvent, RecordingSink};
pub use crate::core::model::{Customer, Outcome};
pub use crate::core::report::{CheckoutReport, SimulationReport, StoreReport};
pub use crate::core::routing::RoutingPolicy;
