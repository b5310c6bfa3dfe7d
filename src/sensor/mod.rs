//! Simulated temperature sensor
//!
//! Produces a bounded triangle wave between a minimum and maximum
//! temperature, formatted to one fractional digit.

mod simulator;

pub use simulator::TemperatureSimulator;
