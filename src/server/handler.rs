// src/server/handler.rs
use super::endpoints::Endpoints;
use futures::future::BoxFuture;
use hyper::{Body, Request, Response};
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{BoxError, Layer, Service};

/// Installs the operational endpoints in front of another service.
#[derive(Clone)]
pub struct OpsLayer {
    endpoints: Arc<Endpoints>,
}

impl OpsLayer {
    pub fn new(endpoints: Endpoints) -> Self {
        Self {
            endpoints: Arc::new(endpoints),
        }
    }
}

impl<S> Layer<S> for OpsLayer {
    type Service = OpsEndpoints<S>;

    fn layer(&self, inner: S) -> Self::Service {
        OpsEndpoints {
            endpoints: self.endpoints.clone(),
            inner,
        }
    }
}

/// Answers `/__about`, `/__gtg`, `/__health` and `/__error` when enabled and
/// hands every other request to `inner` untouched.
#[derive(Clone)]
pub struct OpsEndpoints<S> {
    endpoints: Arc<Endpoints>,
    inner: S,
}

impl<S> Service<Request<Body>> for OpsEndpoints<S>
where
    S: Service<Request<Body>, Response = Response<Body>> + Clone + Send + 'static,
    S::Error: Into<BoxError>,
    S::Future: Send + 'static,
{
    type Response = Response<Body>;
    type Error = BoxError;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx).map_err(Into::into)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let endpoints = self.endpoints.clone();

        match endpoints.route_for(&req) {
            Some(route) => {
                Box::pin(async move { endpoints.handle(route).await.map_err(Into::into) })
            }
            None => {
                // Hand the ready service to the request and keep a fresh clone.
                let clone = self.inner.clone();
                let mut inner = std::mem::replace(&mut self.inner, clone);
                let fut = inner.call(req);
                Box::pin(async move { fut.await.map_err(Into::into) })
            }
        }
    }
}
