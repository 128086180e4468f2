//! Protocol-level integration tests that exercise the adapter end to end
//! without reaching the backend — construction of `AppState` never makes a
//! network call, so these stay hermetic (the pack carries no HTTP mocking
//! crate to fake `KG_API_URL` responses with).

use std::sync::Arc;

use kgraph_mcp_auth::{OAuthCredentials, TokenManager};
use kgraph_mcp_backend::BackendClient;
use kgraph_mcp_core::protocol::{JsonRpcRequest, LifecyclePhase, RequestId};
use kgraph_mcp_core::utils::{CancellationManager, PingManager};
use kgraph_mcp_server::allowlist::Allowlist;
use kgraph_mcp_server::{AppState, ProtocolAdapter};
use serde_json::{json, Value};

fn test_state() -> AppState {
    let backend = Arc::new(BackendClient::new("http://127.0.0.1:0").expect("valid url"));
    let auth = TokenManager::new(backend.clone(), None);
    AppState {
        backend,
        auth,
        allowlist: Arc::new(Allowlist::load()),
        cancellation: Arc::new(CancellationManager::default()),
        ping: PingManager::default(),
        server_version: "0.0.0-test",
    }
}

#[tokio::test]
async fn initialize_echoes_the_caller_request_id() {
    let state = test_state();
    let mut adapter = ProtocolAdapter::new();
    let request = JsonRpcRequest::new(
        "initialize".to_string(),
        Some(json!({"protocolVersion": "2025-06-18", "capabilities": {}, "clientInfo": {"name": "x", "version": "1"}})),
        Some(RequestId::number(42)),
    );

    let response = adapter.handle(&state, request).await;

    assert_eq!(response.id, Some(RequestId::number(42)));
    assert!(response.error.is_none());
    assert_eq!(*adapter.phase(), LifecyclePhase::Initialized);
}

#[tokio::test]
async fn notifications_initialized_moves_to_operating_with_no_response_payload() {
    let state = test_state();
    let mut adapter = ProtocolAdapter::new();
    let request = JsonRpcRequest::notification("notifications/initialized".to_string(), None);

    let response = adapter.handle(&state, request).await;

    assert_eq!(*adapter.phase(), LifecyclePhase::Operating);
    assert_eq!(response.id, None);
}

#[tokio::test]
async fn tools_list_advertises_all_eleven_tools() {
    let state = test_state();
    let mut adapter = ProtocolAdapter::new();
    let request = JsonRpcRequest::new("tools/list".to_string(), None, Some(RequestId::number(1)));

    let response = adapter.handle(&state, request).await;
    let result = response.result.expect("tools/list succeeds");
    let tools = result.get("tools").and_then(|t| t.as_array()).expect("tools array");
    assert_eq!(tools.len(), 11);
}

#[tokio::test]
async fn resources_list_advertises_six_resources() {
    let state = test_state();
    let mut adapter = ProtocolAdapter::new();
    let request = JsonRpcRequest::new("resources/list".to_string(), None, Some(RequestId::number(2)));

    let response = adapter.handle(&state, request).await;
    let result = response.result.expect("resources/list succeeds");
    let resources = result.get("resources").and_then(|r| r.as_array()).expect("resources array");
    assert_eq!(resources.len(), 6);
}

#[tokio::test]
async fn prompts_list_advertises_explore_graph() {
    let state = test_state();
    let mut adapter = ProtocolAdapter::new();
    let request = JsonRpcRequest::new("prompts/list".to_string(), None, Some(RequestId::number(3)));

    let response = adapter.handle(&state, request).await;
    let result = response.result.expect("prompts/list succeeds");
    let prompts = result.get("prompts").and_then(|p| p.as_array()).expect("prompts array");
    assert_eq!(prompts.len(), 1);
    assert_eq!(prompts[0]["name"], "explore-graph");
}

#[tokio::test]
async fn unknown_tool_call_produces_an_error_envelope_not_a_crash() {
    let state = test_state();
    let mut adapter = ProtocolAdapter::new();
    let request = JsonRpcRequest::new(
        "tools/call".to_string(),
        Some(json!({"name": "no-such-tool", "arguments": {}})),
        Some(RequestId::number(4)),
    );

    let response = adapter.handle(&state, request).await;
    let result = response.result.expect("tools/call always returns a result, never a JSON-RPC error");
    assert_eq!(result["isError"], json!(true));
}

#[tokio::test]
async fn unknown_method_is_a_json_rpc_method_not_found_error() {
    let state = test_state();
    let mut adapter = ProtocolAdapter::new();
    let request = JsonRpcRequest::new("nonexistent/method".to_string(), None, Some(RequestId::number(5)));

    let response = adapter.handle(&state, request).await;
    assert!(response.error.is_some());
    assert!(response.result.is_none());
}

#[tokio::test]
async fn ping_round_trips_an_empty_object() {
    let state = test_state();
    let mut adapter = ProtocolAdapter::new();
    let request = JsonRpcRequest::new("ping".to_string(), None, Some(RequestId::number(6)));

    let response = adapter.handle(&state, request).await;
    assert_eq!(response.result, Some(json!({})));
}

#[tokio::test]
async fn cancelling_before_a_queue_op_marks_it_skipped_not_crashed() {
    let state = test_state();

    // Pre-register and immediately cancel the id a `graph/queue` dispatch
    // will check (§5): the queue sees it already cancelled before its first
    // operation and reports every operation as skipped rather than
    // attempting any backend call.
    let tracked_id = json!(7);
    state
        .cancellation
        .register_request(tracked_id.clone(), "tools/call".to_string())
        .await
        .unwrap();
    state.cancellation.cancel_request(&tracked_id, None).await.unwrap();

    let mut adapter = ProtocolAdapter::new();
    let request = JsonRpcRequest::new(
        "tools/call".to_string(),
        Some(json!({
            "name": "graph",
            "arguments": {
                "action": "queue",
                "operations": [{"op": "create", "entity": "concept", "label": "A"}]
            }
        })),
        Some(RequestId::number(7)),
    );

    let response = adapter.handle(&state, request).await;
    let result = response.result.expect("tools/call always returns a result");
    assert_eq!(result["isError"], Value::Null);
    let text = result["content"][0]["text"].as_str().unwrap();
    assert!(text.contains("skipped"), "expected a skipped op, got: {text}");
}

#[tokio::test]
async fn notifications_cancelled_marks_the_tracked_request_as_cancelled() {
    let state = test_state();
    let tracked_id = json!(9);
    state
        .cancellation
        .register_request(tracked_id.clone(), "tools/call".to_string())
        .await
        .unwrap();

    let mut adapter = ProtocolAdapter::new();
    let request = JsonRpcRequest::notification(
        "notifications/cancelled".to_string(),
        Some(json!({"requestId": 9, "reason": "client gave up"})),
    );
    let response = adapter.handle(&state, request).await;
    assert_eq!(response.id, None);
    assert!(state.cancellation.is_cancelled(&tracked_id).await);
}
