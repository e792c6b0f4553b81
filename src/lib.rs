// src/lib.rs
//! Operational endpoints (`/__about`, `/__gtg`, `/__health`, `/__error`)
//! as tower middleware for hyper services.
pub mod check;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod gtg;
pub mod health;
pub mod metrics;
pub mod server;

pub use check::{AboutProvider, AlwaysGood, GoodToGoCheck, HealthCheck, NoChecks};
pub use config::{RouteMatching, RouteName, ServiceConfig};
pub use descriptor::{build_descriptor, build_descriptor_with, DeployDate, ServiceDescriptor};
pub use error::{ConfigError, OpsError};
pub use gtg::{evaluate_gtg, GtgOutcome};
pub use health::{aggregate_health, HealthEnvelope, HealthError};
pub use server::{Endpoints, ErrorPage, OpsEndpoints, OpsLayer};
