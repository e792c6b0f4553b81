// src/check/provider.rs
use anyhow::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::future::Future;

/// Decides whether the service is ready to receive traffic.
#[async_trait]
pub trait GoodToGoCheck: Send + Sync {
    async fn check(&self) -> Result<bool>;
}

/// Produces the detailed health check records for `/__health`.
///
/// The shape of each record is owned by the implementor; they are passed
/// through to the response untouched and in order.
#[async_trait]
pub trait HealthCheck: Send + Sync {
    async fn checks(&self) -> Result<Vec<Value>>;
}

/// Supplies about information that is only known asynchronously, e.g.
/// from a service registry. Awaited once while the descriptor is built.
#[async_trait]
pub trait AboutProvider: Send + Sync {
    async fn about(&self) -> Result<Map<String, Value>>;
}

/// Always good to go.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysGood;

#[async_trait]
impl GoodToGoCheck for AlwaysGood {
    async fn check(&self) -> Result<bool> {
        Ok(true)
    }
}

/// Reports no health checks.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoChecks;

#[async_trait]
impl HealthCheck for NoChecks {
    async fn checks(&self) -> Result<Vec<Value>> {
        Ok(Vec::new())
    }
}

/// A good-to-go check backed by an async closure. See [`gtg_fn`].
#[derive(Clone)]
pub struct GtgFn<F> {
    f: F,
}

/// Wrap an async closure as a [`GoodToGoCheck`].
pub fn gtg_fn<F, Fut>(f: F) -> GtgFn<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<bool>> + Send,
{
    GtgFn { f }
}

#[async_trait]
impl<F, Fut> GoodToGoCheck for GtgFn<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<bool>> + Send,
{
    async fn check(&self) -> Result<bool> {
        (self.f)().await
    }
}

/// A health check producer backed by an async closure. See [`health_fn`].
#[derive(Clone)]
pub struct HealthFn<F> {
    f: F,
}

/// Wrap an async closure as a [`HealthCheck`].
pub fn health_fn<F, Fut>(f: F) -> HealthFn<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<Vec<Value>>> + Send,
{
    HealthFn { f }
}

#[async_trait]
impl<F, Fut> HealthCheck for HealthFn<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<Vec<Value>>> + Send,
{
    async fn checks(&self) -> Result<Vec<Value>> {
        (self.f)().await
    }
}

/// An about provider backed by an async closure. See [`about_fn`].
#[derive(Clone)]
pub struct AboutFn<F> {
    f: F,
}

/// Wrap an async closure as an [`AboutProvider`].
pub fn about_fn<F, Fut>(f: F) -> AboutFn<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<Map<String, Value>>> + Send,
{
    AboutFn { f }
}

#[async_trait]
impl<F, Fut> AboutProvider for AboutFn<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<Map<String, Value>>> + Send,
{
    async fn about(&self) -> Result<Map<String, Value>> {
        (self.f)().await
    }
}
