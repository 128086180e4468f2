//! C8 — protocol adapter binding JSON-RPC methods to C6/C7/prompts (spec §4.6).
//!
//! Six request kinds reach this module: `tools/list`, `tools/call`,
//! `resources/list`, `resources/read`, `prompts/list`, `prompts/get`, plus
//! `initialize`/`ping`/`notifications/*` handled inline. Every branch
//! returns a `JsonRpcResponse`; nothing here ever terminates the process —
//! an uncaught failure becomes a JSON-RPC error response, not a panic (T7).

use kgraph_mcp_core::protocol::{
    JsonRpcError, JsonRpcRequest, JsonRpcResponse, LifecyclePhase,
};
use kgraph_mcp_core::types::notifications::CancelledNotification;
use kgraph_mcp_core::types::{
    GetPromptRequest, InitializeRequest, InitializeResponse, ListPromptsResponse,
    ListResourcesResponse, ListToolsResponse, LoggingCapability, PromptsCapability,
    ReadResourceRequest, ReadResourceResponse, ResourcesCapability, ServerCapabilities,
    ServerInfo, ToolCallRequest, ToolsCapability,
};
use serde_json::{json, Value};
use tracing::warn;

use crate::context::AppState;
use crate::{dispatch, prompts, resources, schemas};

/// Tracks the connection's lifecycle phase across requests (spec §4.7). Not
/// `Sync` internally — the caller serializes stdio reads, so a plain `Cell`
/// read/write from a single task is sufficient.
pub struct ProtocolAdapter {
    phase: LifecyclePhase,
}

impl Default for ProtocolAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProtocolAdapter {
    pub fn new() -> Self {
        Self {
            phase: LifecyclePhase::Uninitialized,
        }
    }

    pub fn phase(&self) -> &LifecyclePhase {
        &self.phase
    }

    /// Routes one JSON-RPC request to its handler and returns the response
    /// to send back. `request.id` is threaded through unchanged; a
    /// notification (`id: None`) is handled by the caller, which must not
    /// send a response for it.
    pub async fn handle(&mut self, state: &AppState, request: JsonRpcRequest) -> JsonRpcResponse {
        let id = request.id.clone();
        match request.method.as_str() {
            "initialize" => self.handle_initialize(state, request.params, id),
            "notifications/initialized" => {
                self.phase = LifecyclePhase::Operating;
                JsonRpcResponse::success(Value::Null, id)
            }
            "ping" => JsonRpcResponse::success(json!({}), id),
            "notifications/cancelled" => {
                self.handle_cancelled(state, request.params).await;
                JsonRpcResponse::success(Value::Null, id)
            }
            "tools/list" => JsonRpcResponse::success(
                serde_json::to_value(ListToolsResponse {
                    tools: schemas::all(),
                    next_cursor: None,
                })
                .unwrap_or(Value::Null),
                id,
            ),
            "tools/call" => self.handle_tools_call(state, request.params, id).await,
            "resources/list" => JsonRpcResponse::success(
                serde_json::to_value(ListResourcesResponse {
                    resources: resources::list_resources(),
                    next_cursor: None,
                })
                .unwrap_or(Value::Null),
                id,
            ),
            "resources/read" => self.handle_resources_read(state, request.params, id).await,
            "prompts/list" => JsonRpcResponse::success(
                serde_json::to_value(ListPromptsResponse {
                    prompts: prompts::list_prompts(),
                    next_cursor: None,
                })
                .unwrap_or(Value::Null),
                id,
            ),
            "prompts/get" => self.handle_prompts_get(request.params, id),
            other => {
                JsonRpcResponse::error(JsonRpcError::method_not_found(other.to_string()), id)
            }
        }
    }

    fn handle_initialize(
        &mut self,
        state: &AppState,
        params: Option<Value>,
        id: Option<kgraph_mcp_core::protocol::RequestId>,
    ) -> JsonRpcResponse {
        let Some(params) = params else {
            return JsonRpcResponse::error(
                JsonRpcError::invalid_params(Some("initialize requires params".to_string())),
                id,
            );
        };
        let request: InitializeRequest = match serde_json::from_value(params) {
            Ok(req) => req,
            Err(err) => {
                return JsonRpcResponse::error(
                    JsonRpcError::invalid_params(Some(err.to_string())),
                    id,
                )
            }
        };

        self.phase = LifecyclePhase::Initializing;
        let response = InitializeResponse {
            protocol_version: request.protocol_version,
            capabilities: server_capabilities(),
            server_info: ServerInfo::new("kgraph-mcp-server".to_string(), state.server_version.to_string()),
            instructions: Some(
                "Knowledge-graph MCP server. Start with `search` to find concepts, then \
                 `concept` to inspect or connect them."
                    .to_string(),
            ),
        };
        self.phase = LifecyclePhase::Initialized;
        JsonRpcResponse::success(serde_json::to_value(response).unwrap_or(Value::Null), id)
    }

    async fn handle_tools_call(
        &self,
        state: &AppState,
        params: Option<Value>,
        id: Option<kgraph_mcp_core::protocol::RequestId>,
    ) -> JsonRpcResponse {
        let Some(params) = params else {
            return JsonRpcResponse::error(
                JsonRpcError::invalid_params(Some("tools/call requires params".to_string())),
                id,
            );
        };
        let request: ToolCallRequest = match serde_json::from_value(params) {
            Ok(req) => req,
            Err(err) => {
                return JsonRpcResponse::error(JsonRpcError::invalid_params(Some(err.to_string())), id)
            }
        };

        // §5 Cancellation: a `graph/queue` dispatch checks this id between
        // operations so a `notifications/cancelled` can stop it from
        // issuing further queued writes. Tracked for the duration of this
        // one dispatch only — never persisted past `complete_request`.
        let tracked_id = id.as_ref().and_then(|i| serde_json::to_value(i).ok());
        if let Some(tracked_id) = tracked_id.clone() {
            let _ = state
                .cancellation
                .register_request(tracked_id, "tools/call".to_string())
                .await;
        }

        let result = dispatch::call_tool(state, &request.name, request.arguments, tracked_id.as_ref()).await;

        if let Some(tracked_id) = tracked_id {
            let _ = state.cancellation.complete_request(&tracked_id).await;
        }

        JsonRpcResponse::success(serde_json::to_value(result).unwrap_or(Value::Null), id)
    }

    /// Routes a `notifications/cancelled` to the shared cancellation manager.
    /// Best-effort: an unparsable payload is logged and ignored rather than
    /// surfaced as an error, since notifications never receive a response.
    async fn handle_cancelled(&self, state: &AppState, params: Option<Value>) {
        let Some(params) = params else {
            warn!("notifications/cancelled received with no params");
            return;
        };
        match serde_json::from_value::<CancelledNotification>(params) {
            Ok(notification) => {
                let _ = state.cancellation.handle_cancellation(notification).await;
            }
            Err(err) => warn!("malformed notifications/cancelled payload: {err}"),
        }
    }

    async fn handle_resources_read(
        &self,
        state: &AppState,
        params: Option<Value>,
        id: Option<kgraph_mcp_core::protocol::RequestId>,
    ) -> JsonRpcResponse {
        let Some(params) = params else {
            return JsonRpcResponse::error(
                JsonRpcError::invalid_params(Some("resources/read requires params".to_string())),
                id,
            );
        };
        let request: ReadResourceRequest = match serde_json::from_value(params) {
            Ok(req) => req,
            Err(err) => {
                return JsonRpcResponse::error(JsonRpcError::invalid_params(Some(err.to_string())), id)
            }
        };

        match resources::read_resource(state, &request.uri).await {
            Ok(content) => JsonRpcResponse::success(
                serde_json::to_value(ReadResourceResponse {
                    contents: vec![content],
                })
                .unwrap_or(Value::Null),
                id,
            ),
            Err(err) => {
                JsonRpcResponse::error(JsonRpcError::resource_not_found(request.uri), id)
                    .with_meta("details".to_string(), err.into_envelope())
            }
        }
    }

    fn handle_prompts_get(
        &self,
        params: Option<Value>,
        id: Option<kgraph_mcp_core::protocol::RequestId>,
    ) -> JsonRpcResponse {
        let Some(params) = params else {
            return JsonRpcResponse::error(
                JsonRpcError::invalid_params(Some("prompts/get requires params".to_string())),
                id,
            );
        };
        let request: GetPromptRequest = match serde_json::from_value(params) {
            Ok(req) => req,
            Err(err) => {
                return JsonRpcResponse::error(JsonRpcError::invalid_params(Some(err.to_string())), id)
            }
        };

        match prompts::get_prompt(&request.name, request.arguments.as_ref()) {
            Ok(response) => {
                JsonRpcResponse::success(serde_json::to_value(response).unwrap_or(Value::Null), id)
            }
            Err(err) => JsonRpcResponse::error(
                JsonRpcError::invalid_params(Some(err.to_string())),
                id,
            ),
        }
    }
}

fn server_capabilities() -> ServerCapabilities {
    ServerCapabilities {
        tools: Some(ToolsCapability { list_changed: Some(false) }),
        resources: Some(ResourcesCapability {
            subscribe: Some(false),
            list_changed: Some(false),
        }),
        prompts: Some(PromptsCapability { list_changed: Some(false) }),
        logging: Some(LoggingCapability {}),
        completion: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adapter_starts_uninitialized() {
        let adapter = ProtocolAdapter::new();
        assert_eq!(*adapter.phase(), LifecyclePhase::Uninitialized);
    }
}
