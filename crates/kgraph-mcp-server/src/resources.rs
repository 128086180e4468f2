//! C7 — the static resource table (spec §4.5).
//!
//! Each of the six URIs maps to exactly one backend call plus one formatter;
//! there is no action dimension, unlike the tools in [`crate::dispatch`].
//! `mcp/allowed-paths` is the one exception that never calls the backend —
//! it reads C1's configuration directly.

use kgraph_mcp_core::{Resource, ResourceContent};
use serde_json::json;

use crate::context::AppState;
use crate::error::DispatchError;
use crate::formatters::format_record;

const URIS: &[&str] = &[
    "database/stats",
    "database/info",
    "database/health",
    "system/status",
    "api/health",
    "mcp/allowed-paths",
];

pub fn list_resources() -> Vec<Resource> {
    URIS.iter()
        .map(|uri| Resource {
            uri: uri.to_string(),
            name: uri.to_string(),
            description: Some(format!("Knowledge-graph {uri} snapshot")),
            mime_type: Some("application/json".to_string()),
        })
        .collect()
}

pub async fn read_resource(state: &AppState, uri: &str) -> Result<ResourceContent, DispatchError> {
    let text = match uri {
        "database/stats" => {
            let payload = state.backend.database_stats().await?;
            format_record("Database stats", &payload)
        }
        "database/info" => {
            let payload = state.backend.database_info().await?;
            format_record("Database info", &payload)
        }
        "database/health" => {
            let payload = state.backend.database_health().await?;
            format_record("Database health", &payload)
        }
        "system/status" => {
            let payload = state.backend.system_status().await?;
            format_record("System status", &payload)
        }
        "api/health" => {
            let payload = state.backend.api_health().await?;
            format_record("API health", &payload)
        }
        "mcp/allowed-paths" => match state.allowlist.get_config() {
            Some(config) => format_record(
                "Allowed paths",
                &json!({
                    "config_path": state.allowlist.get_path().to_string_lossy(),
                    "allowed_directories": config.allowed_directories,
                    "allowed_patterns": config.allowed_patterns,
                    "blocked_patterns": config.blocked_patterns,
                    "max_file_size_mb": config.max_file_size_mb,
                    "max_files_per_directory": config.max_files_per_directory,
                }),
            ),
            None => format_record(
                "Allowed paths",
                &json!({"initialized": false, "config_path": state.allowlist.get_path().to_string_lossy()}),
            ),
        },
        other => return Err(DispatchError::Validation(format!("Unknown resource: {other}"))),
    };

    Ok(ResourceContent::Text {
        uri: uri.to_string(),
        text,
        mime_type: Some("text/plain".to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn six_resources_are_registered() {
        assert_eq!(list_resources().len(), 6);
        assert!(list_resources().iter().any(|r| r.uri == "mcp/allowed-paths"));
    }

    #[test]
    fn all_resources_advertise_json_mime_type() {
        for resource in list_resources() {
            assert_eq!(resource.mime_type.as_deref(), Some("application/json"));
        }
    }
}
