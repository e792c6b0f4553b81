// src/metrics/collector.rs
use crate::config::RouteName;
use crate::gtg::GtgOutcome;
use anyhow::Result;
use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::Arc;
use std::time::Instant;

pub struct MetricsRegistry {
    registry: Registry,
    collector: Arc<MetricsCollector>,
}

impl MetricsRegistry {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();
        let collector = Arc::new(MetricsCollector::new(&registry)?);

        Ok(Self {
            registry,
            collector,
        })
    }

    pub fn collector(&self) -> Arc<MetricsCollector> {
        self.collector.clone()
    }

    pub fn gather(&self) -> Result<Vec<u8>> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(buffer)
    }
}

pub struct MetricsCollector {
    pub requests_total: IntCounterVec,
    pub gtg_outcomes_total: IntCounterVec,
    pub gtg_duration_seconds: Histogram,
    pub health_results_total: IntCounterVec,
}

impl MetricsCollector {
    pub fn new(registry: &Registry) -> Result<Self> {
        let requests_total = IntCounterVec::new(
            Opts::new("ops_requests_total", "Requests served by the operational endpoints"),
            &["route"],
        )?;
        registry.register(Box::new(requests_total.clone()))?;

        let gtg_outcomes_total = IntCounterVec::new(
            Opts::new("ops_gtg_outcomes_total", "Good-to-go evaluations by outcome"),
            &["outcome"],
        )?;
        registry.register(Box::new(gtg_outcomes_total.clone()))?;

        let gtg_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "ops_gtg_duration_seconds",
            "Time spent evaluating good-to-go",
        ))?;
        registry.register(Box::new(gtg_duration_seconds.clone()))?;

        let health_results_total = IntCounterVec::new(
            Opts::new("ops_health_results_total", "Health aggregations by result"),
            &["result"],
        )?;
        registry.register(Box::new(health_results_total.clone()))?;

        Ok(Self {
            requests_total,
            gtg_outcomes_total,
            gtg_duration_seconds,
            health_results_total,
        })
    }

    pub fn record_request(&self, route: RouteName) {
        self.requests_total.with_label_values(&[route.as_str()]).inc();
    }

    pub fn record_gtg(&self, outcome: &GtgOutcome, duration: std::time::Duration) {
        self.gtg_outcomes_total
            .with_label_values(&[outcome.label()])
            .inc();
        self.gtg_duration_seconds.observe(duration.as_secs_f64());
    }

    pub fn record_health(&self, success: bool) {
        let result = if success { "success" } else { "failure" };
        self.health_results_total.with_label_values(&[result]).inc();
    }
}

// Helper for timing operations
pub struct Timer {
    start: Instant,
}

impl Timer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> std::time::Duration {
        self.start.elapsed()
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}
