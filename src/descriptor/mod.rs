// src/descriptor/mod.rs
mod builder;
mod enrich;

pub use builder::{build_descriptor, build_descriptor_with};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

/// Static identity of the running service, served by `/__about`.
///
/// Built once at startup by [`build_descriptor`] and shared read-only
/// between requests afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDescriptor {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_code: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_version: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_deployed: Option<DeployDate>,

    #[serde(rename = "_hostname")]
    pub hostname: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// When the service was deployed.
///
/// A configured value that is not RFC 3339 is published as given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DeployDate {
    Parsed(DateTime<Utc>),
    Raw(String),
}

impl DeployDate {
    pub fn parse(raw: String) -> Self {
        match DateTime::parse_from_rfc3339(&raw) {
            Ok(date) => DeployDate::Parsed(date.with_timezone(&Utc)),
            Err(_) => DeployDate::Raw(raw),
        }
    }
}
