// src/gtg/mod.rs
mod evaluator;

pub use evaluator::{evaluate_gtg, GtgOutcome, DEFAULT_GTG_TIMEOUT};
