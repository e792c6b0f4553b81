// src/config/models.rs
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Operational routes that can be switched on or off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteName {
    About,
    Gtg,
    Health,
    Error,
}

impl RouteName {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteName::About => "about",
            RouteName::Gtg => "gtg",
            RouteName::Health => "health",
            RouteName::Error => "error",
        }
    }

    /// The request path segment that selects this route, e.g. `/__gtg`.
    pub fn path(&self) -> &'static str {
        match self {
            RouteName::About => "/__about",
            RouteName::Gtg => "/__gtg",
            RouteName::Health => "/__health",
            RouteName::Error => "/__error",
        }
    }
}

/// How request paths are compared against the route paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteMatching {
    /// `/__gtg` only.
    #[default]
    Exact,
    /// Any path ending in the route, e.g. `/v1/__gtg`.
    Suffix,
}

/// Identity and behaviour of the operational endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceConfig {
    #[serde(default)]
    pub service_name: Option<String>,

    #[serde(default)]
    pub service_description: Option<String>,

    #[serde(default)]
    pub system_code: Option<String>,

    /// Free-form about information: `purpose`, `appVersion`, `dateDeployed`,
    /// `hostname` and anything else the service wants to publish.
    #[serde(default)]
    pub about: Map<String, Value>,

    #[serde(default = "default_routes")]
    pub routes: Vec<RouteName>,

    #[serde(default)]
    pub manifest_path: Option<PathBuf>,

    #[serde(default = "default_cache_control")]
    pub cache_control: String,

    #[serde(default)]
    pub route_matching: RouteMatching,

    #[serde(default = "default_gtg_timeout_ms")]
    pub gtg_timeout_ms: u64,
}

impl ServiceConfig {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: Some(service_name.into()),
            ..Self::default()
        }
    }

    /// The configured service name, falling back to `about.name`.
    pub fn name(&self) -> Option<&str> {
        self.service_name
            .as_deref()
            .or_else(|| self.about.get("name").and_then(Value::as_str))
            .filter(|name| !name.trim().is_empty())
    }

    pub fn gtg_timeout(&self) -> Duration {
        Duration::from_millis(self.gtg_timeout_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name().is_none() {
            return Err(ConfigError::MissingServiceName);
        }

        self.validate_settings()
    }

    /// Checks everything except the service name, which may still arrive
    /// from an async about provider.
    pub fn validate_settings(&self) -> Result<(), ConfigError> {
        if self.cache_control.trim().is_empty() {
            return Err(ConfigError::InvalidCacheControl(self.cache_control.clone()));
        }

        if self.gtg_timeout_ms == 0 {
            return Err(ConfigError::ZeroGtgTimeout);
        }

        Ok(())
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            service_name: None,
            service_description: None,
            system_code: None,
            about: Map::new(),
            routes: default_routes(),
            manifest_path: None,
            cache_control: default_cache_control(),
            route_matching: RouteMatching::default(),
            gtg_timeout_ms: default_gtg_timeout_ms(),
        }
    }
}

/// Top-level configuration for the demo server binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(flatten)]
    pub service: ServiceConfig,

    #[serde(default = "default_bind")]
    pub bind: SocketAddr,

    #[serde(default)]
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_metrics_port")]
    pub port: u16,

    #[serde(default = "default_metrics_path")]
    pub path: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            port: default_metrics_port(),
            path: default_metrics_path(),
        }
    }
}

fn default_routes() -> Vec<RouteName> {
    vec![RouteName::About, RouteName::Gtg, RouteName::Health]
}

fn default_cache_control() -> String {
    "max-age=0, must-revalidate, no-cache, no-store".to_string()
}

fn default_gtg_timeout_ms() -> u64 {
    3000
}

fn default_bind() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

fn default_metrics_port() -> u16 {
    9090
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServiceConfig::new("foo");
        assert_eq!(config.routes, vec![RouteName::About, RouteName::Gtg, RouteName::Health]);
        assert_eq!(config.cache_control, "max-age=0, must-revalidate, no-cache, no-store");
        assert_eq!(config.gtg_timeout(), Duration::from_secs(3));
        assert_eq!(config.route_matching, RouteMatching::Exact);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_name_falls_back_to_about() {
        let mut config = ServiceConfig::default();
        assert!(matches!(config.validate(), Err(ConfigError::MissingServiceName)));

        config.about.insert("name".into(), Value::from("from-about"));
        assert_eq!(config.name(), Some("from-about"));
    }

    #[test]
    fn test_blank_name_is_missing() {
        let config = ServiceConfig::new("   ");
        assert!(matches!(config.validate(), Err(ConfigError::MissingServiceName)));
    }

    #[test]
    fn test_settings_validated_without_name() {
        let config = ServiceConfig::default();
        assert!(config.validate_settings().is_ok());

        let mut config = ServiceConfig::default();
        config.cache_control = " ".to_string();
        assert!(matches!(
            config.validate_settings(),
            Err(ConfigError::InvalidCacheControl(_))
        ));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = ServiceConfig::new("foo");
        config.gtg_timeout_ms = 0;
        assert!(matches!(config.validate(), Err(ConfigError::ZeroGtgTimeout)));
    }
}
