pub mod config;
pub mod error;
pub mod loader;
pub mod report;
pub mod statistics;
pub mod telemetry;
