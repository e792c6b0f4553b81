// src/server/error_page.rs
// Host-side translation of handler errors into a generic 500 page.
use futures::future::BoxFuture;
use hyper::header::{CONTENT_TYPE, HeaderValue};
use hyper::{Body, Request, Response, StatusCode};
use std::task::{Context, Poll};
use tower::{BoxError, Layer, Service};

const ERROR_PAGE: &str = "<!DOCTYPE html>\n<html><head><title>Error</title></head>\
<body><h1>500 Internal Server Error</h1></body></html>\n";

#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorPageLayer;

impl<S> Layer<S> for ErrorPageLayer {
    type Service = ErrorPage<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ErrorPage::new(inner)
    }
}

/// Answers any error from the inner service with a 500 HTML page.
///
/// The error is logged but never written to the response.
#[derive(Debug, Clone)]
pub struct ErrorPage<S> {
    inner: S,
}

impl<S> ErrorPage<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

impl<S> Service<Request<Body>> for ErrorPage<S>
where
    S: Service<Request<Body>, Response = Response<Body>>,
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
        let path = req.uri().path().to_owned();
        let fut = self.inner.call(req);

        Box::pin(async move {
            match fut.await {
                Ok(response) => Ok(response),
                Err(e) => {
                    let e: BoxError = e.into();
                    tracing::error!(%path, error = %e, "request failed");
                    let mut response = Response::new(Body::from(ERROR_PAGE));
                    *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
                    response.headers_mut().insert(
                        CONTENT_TYPE,
                        HeaderValue::from_static("text/html; charset=utf-8"),
                    );
                    Ok(response)
                }
            }
        })
    }
}
