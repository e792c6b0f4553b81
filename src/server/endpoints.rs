// src/server/endpoints.rs
use super::route::resolve_route;
use crate::check::{AboutProvider, AlwaysGood, GoodToGoCheck, HealthCheck, NoChecks};
use crate::config::{RouteMatching, RouteName, ServiceConfig};
use crate::descriptor::{build_descriptor, build_descriptor_with, ServiceDescriptor};
use crate::error::{ConfigError, OpsError};
use crate::gtg::evaluate_gtg;
use crate::health::aggregate_health;
use crate::metrics::{MetricsCollector, Timer};
use hyper::header::{HeaderValue, CACHE_CONTROL, CONTENT_TYPE};
use hyper::{Body, Method, Request, Response, StatusCode};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

const JSON: &str = "application/json; charset=utf-8";
const TEXT: &str = "text/plain; charset=utf-8";

/// The operational endpoints of one service.
///
/// Holds everything a request may read; nothing in here changes after
/// construction, so it is shared between requests behind an `Arc`.
pub struct Endpoints {
    descriptor: Arc<ServiceDescriptor>,
    gtg_check: Arc<dyn GoodToGoCheck>,
    health_check: Arc<dyn HealthCheck>,
    routes: HashSet<RouteName>,
    route_matching: RouteMatching,
    cache_control: HeaderValue,
    gtg_timeout: Duration,
    metrics: Option<Arc<MetricsCollector>>,
}

impl Endpoints {
    pub fn new(config: &ServiceConfig, descriptor: ServiceDescriptor) -> Result<Self, ConfigError> {
        config.validate_settings()?;

        let cache_control = HeaderValue::from_str(&config.cache_control)
            .map_err(|_| ConfigError::InvalidCacheControl(config.cache_control.clone()))?;

        Ok(Self {
            descriptor: Arc::new(descriptor),
            gtg_check: Arc::new(AlwaysGood),
            health_check: Arc::new(NoChecks),
            routes: config.routes.iter().copied().collect(),
            route_matching: config.route_matching,
            cache_control,
            gtg_timeout: config.gtg_timeout(),
            metrics: None,
        })
    }

    /// Build the descriptor from `config` and the endpoints around it.
    pub async fn from_config(config: &ServiceConfig) -> Result<Self, ConfigError> {
        let descriptor = build_descriptor(config).await?;
        Self::new(config, descriptor)
    }

    /// Like [`Endpoints::from_config`], awaiting `about` for the part of the
    /// about information that is only known at runtime.
    pub async fn from_config_with_about(
        config: &ServiceConfig,
        about: &dyn AboutProvider,
    ) -> Result<Self, ConfigError> {
        let descriptor = build_descriptor_with(config, about).await?;
        Self::new(config, descriptor)
    }

    pub fn with_gtg_check(mut self, check: impl GoodToGoCheck + 'static) -> Self {
        self.gtg_check = Arc::new(check);
        self
    }

    pub fn with_health_check(mut self, check: impl HealthCheck + 'static) -> Self {
        self.health_check = Arc::new(check);
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<MetricsCollector>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn descriptor(&self) -> &ServiceDescriptor {
        &self.descriptor
    }

    pub fn is_enabled(&self, route: RouteName) -> bool {
        self.routes.contains(&route)
    }

    /// The enabled route this request should be answered by, if any.
    pub fn route_for<B>(&self, req: &Request<B>) -> Option<RouteName> {
        if req.method() != Method::GET {
            return None;
        }

        let route = resolve_route(req.uri().path(), self.route_matching)?;
        if !self.is_enabled(route) {
            debug!(route = route.as_str(), "route disabled, passing request on");
            return None;
        }
        Some(route)
    }

    pub async fn handle(&self, route: RouteName) -> Result<Response<Body>, OpsError> {
        debug!(route = route.as_str(), "handling operational request");
        if let Some(metrics) = &self.metrics {
            metrics.record_request(route);
        }

        match route {
            RouteName::About => self.about(),
            RouteName::Gtg => self.gtg().await,
            RouteName::Health => self.health().await,
            RouteName::Error => Err(OpsError::Intentional),
        }
    }

    fn about(&self) -> Result<Response<Body>, OpsError> {
        let body = serde_json::to_vec(&*self.descriptor)?;
        self.respond(StatusCode::OK, JSON, body)
    }

    async fn gtg(&self) -> Result<Response<Body>, OpsError> {
        let timer = Timer::new();
        let outcome = evaluate_gtg(self.gtg_check.clone(), self.gtg_timeout).await;

        if let Some(metrics) = &self.metrics {
            metrics.record_gtg(&outcome, timer.elapsed());
        }

        self.respond(outcome.status(), TEXT, outcome.message().to_owned())
    }

    async fn health(&self) -> Result<Response<Body>, OpsError> {
        let result = aggregate_health(self.health_check.as_ref(), &self.descriptor).await;

        if let Some(metrics) = &self.metrics {
            metrics.record_health(result.is_ok());
        }

        match result {
            Ok(envelope) => self.respond(StatusCode::OK, JSON, serde_json::to_vec(&envelope)?),
            Err(e) => self.respond(StatusCode::INTERNAL_SERVER_ERROR, TEXT, e.to_string()),
        }
    }

    fn respond(
        &self,
        status: StatusCode,
        content_type: &'static str,
        body: impl Into<Body>,
    ) -> Result<Response<Body>, OpsError> {
        let response = Response::builder()
            .status(status)
            .header(CACHE_CONTROL, self.cache_control.clone())
            .header(CONTENT_TYPE, content_type)
            .body(body.into())?;
        Ok(response)
    }
}
