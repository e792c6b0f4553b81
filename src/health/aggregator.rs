// src/health/aggregator.rs
use crate::check::HealthCheck;
use crate::descriptor::ServiceDescriptor;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

pub const SCHEMA_VERSION: u8 = 1;

/// Body of the `/__health` response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthEnvelope {
    schema_version: u8,
    pub name: String,
    pub system_code: Option<String>,
    pub description: Option<String>,
    pub checks: Vec<Value>,
}

impl HealthEnvelope {
    pub fn new(descriptor: &ServiceDescriptor, checks: Vec<Value>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            name: descriptor.name.clone(),
            system_code: descriptor.system_code.clone(),
            description: descriptor.description.clone(),
            checks,
        }
    }

    pub fn schema_version(&self) -> u8 {
        self.schema_version
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HealthError {
    #[error("{0}")]
    Producer(String),
}

/// Run the health check producer once and wrap its records.
///
/// No timeout is applied here: a producer that never settles keeps the
/// request open.
pub async fn aggregate_health(
    producer: &dyn HealthCheck,
    descriptor: &ServiceDescriptor,
) -> Result<HealthEnvelope, HealthError> {
    match producer.checks().await {
        Ok(checks) => {
            debug!("Health check produced {} records", checks.len());
            Ok(HealthEnvelope::new(descriptor, checks))
        }
        Err(e) => {
            warn!("Health check failed: {}", e);
            Err(HealthError::Producer(e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::{health_fn, NoChecks};
    use anyhow::anyhow;
    use serde_json::{json, Map};

    fn descriptor() -> ServiceDescriptor {
        ServiceDescriptor {
            name: "foo".to_string(),
            description: Some("Does foo".to_string()),
            system_code: Some("foo-sys".to_string()),
            app_version: None,
            date_deployed: None,
            hostname: "host".to_string(),
            extra: Map::new(),
        }
    }

    #[tokio::test]
    async fn test_empty_checks() {
        let envelope = aggregate_health(&NoChecks, &descriptor()).await.unwrap();
        assert_eq!(envelope.schema_version(), 1);
        assert!(envelope.checks.is_empty());

        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({
                "schemaVersion": 1,
                "name": "foo",
                "systemCode": "foo-sys",
                "description": "Does foo",
                "checks": []
            })
        );
    }

    #[tokio::test]
    async fn test_checks_kept_verbatim_and_in_order() {
        let producer = health_fn(|| async {
            Ok(vec![
                json!({"id": "b", "ok": false}),
                json!("not even an object"),
                json!({"id": "a", "ok": true}),
                json!({"id": "b", "ok": false}),
            ])
        });

        let envelope = aggregate_health(&producer, &descriptor()).await.unwrap();
        assert_eq!(
            envelope.checks,
            vec![
                json!({"id": "b", "ok": false}),
                json!("not even an object"),
                json!({"id": "a", "ok": true}),
                json!({"id": "b", "ok": false}),
            ]
        );
    }

    #[tokio::test]
    async fn test_producer_failure_is_surfaced() {
        let producer = health_fn(|| async { Err(anyhow!("cannot reach cache")) });
        let err = aggregate_health(&producer, &descriptor()).await.unwrap_err();
        assert_eq!(err, HealthError::Producer("cannot reach cache".to_string()));
        assert_eq!(err.to_string(), "cannot reach cache");
    }

    #[tokio::test]
    async fn test_missing_system_code_serializes_as_null() {
        let mut descriptor = descriptor();
        descriptor.system_code = None;

        let envelope = aggregate_health(&NoChecks, &descriptor).await.unwrap();
        let body = serde_json::to_value(&envelope).unwrap();
        assert_eq!(body["systemCode"], Value::Null);
    }
}
