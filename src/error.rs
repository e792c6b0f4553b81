// src/error.rs
use thiserror::Error;

/// Problems with the service configuration. These are fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing configuration option. Should include a 'serviceName' property.")]
    MissingServiceName,

    #[error("Invalid cacheControl header value: {0:?}")]
    InvalidCacheControl(String),

    #[error("gtgTimeoutMs must be greater than zero")]
    ZeroGtgTimeout,
}

#[derive(Debug, Error)]
pub enum OpsError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Raised by the `/__error` route so the host's error page can be exercised.
    #[error("Intentional test error triggered by the /__error route")]
    Intentional,

    #[error("Failed to build response: {0}")]
    Http(#[from] hyper::http::Error),

    #[error("Failed to serialize response body: {0}")]
    Json(#[from] serde_json::Error),
}
