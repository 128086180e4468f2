//! Process-wide application state and per-request call context.
//!
//! `AppState` is the dependency-injection root C9 builds once at startup and
//! hands to the dispatcher and resource handler (spec §9: "encapsulate C2
//! and C5 in a process-wide state object passed into the dispatcher at
//! construction time... avoid globals"). `CallContext` is the transient,
//! per-dispatch counterpart described in §3.1 — it owns nothing shared and
//! dies with the request.

use std::sync::Arc;
use std::time::Instant;

use kgraph_mcp_backend::BackendClient;
use kgraph_mcp_core::utils::{CancellationManager, PingManager};
use serde_json::Value;

use crate::allowlist::Allowlist;

/// Everything a dispatch needs to reach the outside world. One instance per
/// process, constructed by [`crate::lifecycle::run`] and shared behind an
/// `Arc`.
pub struct AppState {
    pub backend: Arc<BackendClient>,
    pub auth: Arc<kgraph_mcp_auth::TokenManager>,
    pub allowlist: Arc<Allowlist>,
    pub cancellation: Arc<CancellationManager>,
    pub ping: PingManager,
    pub server_version: &'static str,
}

/// Transient per-request state (spec §3.1). Not shared across requests and
/// not stored anywhere once the dispatch returns.
pub struct CallContext {
    pub tool_or_resource_id: String,
    pub raw_args: Value,
    pub start_time: Instant,
}

impl CallContext {
    pub fn new(tool_or_resource_id: impl Into<String>, raw_args: Value) -> Self {
        Self {
            tool_or_resource_id: tool_or_resource_id.into(),
            raw_args,
            start_time: Instant::now(),
        }
    }

    pub fn elapsed_ms(&self) -> u128 {
        self.start_time.elapsed().as_millis()
    }
}
