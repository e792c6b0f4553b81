// src/check/mod.rs
mod callback;
mod provider;

pub use callback::{CallbackCheck, Responder};
pub use provider::{
    about_fn, gtg_fn, health_fn, AboutFn, AboutProvider, AlwaysGood, GoodToGoCheck, GtgFn,
    HealthCheck, HealthFn, NoChecks,
};
