//! Error taxonomy for the path allowlist (C1) and the tool dispatcher (C6).
//!
//! Both enums ultimately flatten into the `{ "error", "details" }` envelope
//! described in spec §7 — see [`DispatchError::into_envelope`]. Nothing in
//! this module panics the process; every variant is a value, not a crash.

use serde_json::Value;
use thiserror::Error;

/// Failures raised by [`crate::allowlist::Allowlist`].
#[derive(Debug, Error, Clone)]
pub enum AllowlistError {
    #[error("path allowlist is not initialized")]
    NotInitialized { hint: &'static str },

    #[error("path denied: {reason}")]
    Denied {
        reason: String,
        hint: Option<String>,
        resolved_absolute: String,
    },
}

impl AllowlistError {
    pub fn hint(&self) -> Option<&str> {
        match self {
            AllowlistError::NotInitialized { hint } => Some(hint),
            AllowlistError::Denied { hint, .. } => hint.as_deref(),
        }
    }
}

/// Failures raised while routing and executing a tool or resource call.
///
/// Every variant here corresponds to one of the "Validation failure" or
/// "Backend failure" rows in spec §7's taxonomy. `Backend` wraps whatever
/// the HTTP client surfaced, `details` carrying its body verbatim.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Unknown {tool} action: {action}")]
    UnknownAction { tool: String, action: String },

    #[error("{0}")]
    Validation(String),

    #[error("path denied: {0}")]
    PathDenied(#[from] AllowlistError),

    #[error("Source {0} not found")]
    SourceNotFound(String),

    #[error("backend request failed: {message}")]
    Backend { message: String, details: Value },
}

impl DispatchError {
    /// Builds the `{ "error": ..., "details": ... }` envelope the dispatcher
    /// serializes into the single `is_error` text part (spec §7).
    pub fn into_envelope(self) -> Value {
        let details = match &self {
            DispatchError::Backend { details, .. } => details.clone(),
            DispatchError::PathDenied(AllowlistError::Denied {
                reason,
                hint,
                resolved_absolute,
            }) => serde_json::json!({
                "reason": reason,
                "hint": hint,
                "resolvedAbsolute": resolved_absolute,
            }),
            DispatchError::PathDenied(AllowlistError::NotInitialized { hint }) => {
                serde_json::json!({ "hint": hint })
            }
            other => Value::String(other.to_string()),
        };
        serde_json::json!({
            "error": self.to_string(),
            "details": details,
        })
    }
}

impl From<kgraph_mcp_backend::BackendError> for DispatchError {
    fn from(err: kgraph_mcp_backend::BackendError) -> Self {
        if err.is_not_found() {
            // Callers that need the "Source X not found" special case
            // (spec §7) construct `SourceNotFound` directly; generic 404s
            // from other endpoints fall through to the verbatim body.
        }
        let details = err.body().cloned().unwrap_or_else(|| Value::String(err.to_string()));
        DispatchError::Backend {
            message: err.to_string(),
            details,
        }
    }
}
