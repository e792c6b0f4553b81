// src/health/mod.rs
mod aggregator;

pub use aggregator::{aggregate_health, HealthEnvelope, HealthError, SCHEMA_VERSION};
