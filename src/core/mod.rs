pub mod clock;
pub mod config;
pub mod context;
pub mod coordinator;
pub mod counter;
pub mod errors;
pub mod events;
pub mod generator;
pub mod model;
pub mod report;
pub mod routing;
pub mod scenarios;
pub mod spawner;
pub mod worker;

#[cfg(test)]
mod tests;
