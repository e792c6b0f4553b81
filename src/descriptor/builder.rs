// src/descriptor/builder.rs
use super::enrich::{manifest_modified, manifest_version, os_hostname};
use super::{DeployDate, ServiceDescriptor};
use crate::check::AboutProvider;
use crate::config::ServiceConfig;
use crate::error::ConfigError;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

/// Build the service descriptor from configuration.
///
/// Fails only when no service name is configured. Enrichment from the
/// manifest and the OS is awaited here, so the returned descriptor is
/// complete before any request can observe it.
pub async fn build_descriptor(config: &ServiceConfig) -> Result<ServiceDescriptor, ConfigError> {
    describe(config, config.about.clone()).await
}

/// Like [`build_descriptor`], but first awaits `provider` and lays its
/// about information over `config.about`. A failing provider is logged
/// and the configured about information is used alone.
pub async fn build_descriptor_with(
    config: &ServiceConfig,
    provider: &dyn AboutProvider,
) -> Result<ServiceDescriptor, ConfigError> {
    let mut about = config.about.clone();
    match provider.about().await {
        Ok(resolved) => about.extend(resolved),
        Err(e) => warn!("About provider failed, using configured about only: {}", e),
    }
    describe(config, about).await
}

async fn describe(
    config: &ServiceConfig,
    mut about: Map<String, Value>,
) -> Result<ServiceDescriptor, ConfigError> {
    let name = non_blank(config.service_name.clone())
        .or_else(|| non_blank(take_text(&mut about, "name")))
        .ok_or(ConfigError::MissingServiceName)?;
    about.remove("name");

    // Keys that serialise as descriptor fields are lifted out of the map.
    // `purpose` stays in it and is published as given.
    let purpose = about.get("purpose").and_then(Value::as_str).map(str::to_string);
    let description = take_text(&mut about, "description")
        .or_else(|| config.service_description.clone())
        .or(purpose);
    let system_code =
        take_text(&mut about, "systemCode").or_else(|| config.system_code.clone());
    let about_app_version = take_text(&mut about, "appVersion");
    let about_date_deployed = take_text(&mut about, "dateDeployed").map(DeployDate::parse);

    // Legacy `hostname` wins over the canonical `_hostname`.
    let legacy_hostname = take_text(&mut about, "hostname");
    let canonical_hostname = take_text(&mut about, "_hostname");
    let hostname = legacy_hostname
        .or(canonical_hostname)
        .or_else(os_hostname)
        .unwrap_or_else(|| "unknown".to_string());

    let app_version = match (about_app_version, &config.manifest_path) {
        (Some(version), _) => Some(version),
        (None, Some(path)) => manifest_version(path).await,
        (None, None) => None,
    };

    let date_deployed = match (about_date_deployed, &config.manifest_path) {
        (Some(date), _) => Some(date),
        (None, Some(path)) => manifest_modified(path).await.map(DeployDate::Parsed),
        (None, None) => None,
    };

    let descriptor = ServiceDescriptor {
        name,
        description,
        system_code,
        app_version,
        date_deployed,
        hostname,
        extra: about,
    };

    info!(
        name = %descriptor.name,
        hostname = %descriptor.hostname,
        app_version = ?descriptor.app_version,
        date_deployed = ?descriptor.date_deployed,
        "Service descriptor ready"
    );

    Ok(descriptor)
}

/// Removes `key`, rendering non-string values as JSON text.
fn take_text(about: &mut Map<String, Value>, key: &str) -> Option<String> {
    match about.remove(key)? {
        Value::String(value) => Some(value),
        Value::Null => None,
        other => {
            debug!("about.{} is not a string, using {}", key, other);
            Some(other.to_string())
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
