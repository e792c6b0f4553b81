// src/descriptor/enrich.rs
// Best-effort lookups. Every failure here leaves the field empty.
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::path::Path;
use tracing::debug;

pub(crate) fn os_hostname() -> Option<String> {
    sysinfo::System::host_name().filter(|name| !name.is_empty())
}

/// Deploy date is the last modification time of the manifest.
pub(crate) async fn manifest_modified(path: &Path) -> Option<DateTime<Utc>> {
    match tokio::fs::metadata(path).await.and_then(|meta| meta.modified()) {
        Ok(modified) => Some(DateTime::<Utc>::from(modified)),
        Err(e) => {
            debug!("Cannot stat manifest {}: {}", path.display(), e);
            None
        }
    }
}

/// Reads the top-level `version` string of a JSON manifest.
pub(crate) async fn manifest_version(path: &Path) -> Option<String> {
    let contents = match tokio::fs::read_to_string(path).await {
        Ok(contents) => contents,
        Err(e) => {
            debug!("Cannot read manifest {}: {}", path.display(), e);
            return None;
        }
    };

    match serde_json::from_str::<Value>(&contents) {
        Ok(manifest) => manifest
            .get("version")
            .and_then(Value::as_str)
            .map(str::to_string),
        Err(e) => {
            debug!("Manifest {} is not valid JSON: {}", path.display(), e);
            None
        }
    }
}
