//! C9 — process startup, the stdio serve loop, and shutdown (spec §6).
//!
//! `run()` is the only thing `main.rs` calls. It builds [`AppState`] from the
//! environment, attaches the adapter to stdio, and drives the request/
//! response loop until the transport closes or an unrecoverable transport
//! error surfaces.

use std::sync::Arc;

use kgraph_mcp_auth::{OAuthCredentials, TokenManager};
use kgraph_mcp_backend::BackendClient;
use kgraph_mcp_core::protocol::JsonRpcMessage;
use kgraph_mcp_core::utils::{CancellationManager, PingManager};
use kgraph_mcp_transport::{create_stdio_transport, Transport};
use tracing::{error, info, warn};

use crate::adapter::ProtocolAdapter;
use crate::allowlist::Allowlist;
use crate::context::AppState;

const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

/// Runs the server to completion. Returns `Ok(())` on a clean transport
/// close, `Err` on a startup or transport failure that should exit `1`
/// (spec §6.5).
pub async fn run() -> anyhow::Result<()> {
    let state = build_state()?;
    state.auth.initialize().await;

    let mut transport = create_stdio_transport().await?;
    let mut adapter = ProtocolAdapter::new();

    info!("kgraph-mcp-server {} ready", state.server_version);

    let result = serve(&mut transport, &mut adapter, &state).await;

    state.auth.shutdown().await;
    let _ = transport.close().await;

    result
}

fn build_state() -> anyhow::Result<AppState> {
    let api_url = std::env::var("KG_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
    let backend = Arc::new(BackendClient::new(&api_url)?);
    let credentials = OAuthCredentials::from_env();
    let auth = TokenManager::new(backend.clone(), credentials);

    Ok(AppState {
        backend,
        auth,
        allowlist: Arc::new(Allowlist::load()),
        cancellation: Arc::new(CancellationManager::default()),
        ping: PingManager::default(),
        server_version: env!("CARGO_PKG_VERSION"),
    })
}

/// The request/response loop. A notification never produces a response; a
/// malformed line is logged and skipped rather than killing the connection
/// (T7: the server never crashes on bad input).
async fn serve(
    transport: &mut impl Transport,
    adapter: &mut ProtocolAdapter,
    state: &AppState,
) -> anyhow::Result<()> {
    loop {
        let message = match transport.receive_message().await {
            Ok(message) => message,
            Err(kgraph_mcp_transport::TransportError::ConnectionClosed) => {
                info!("transport closed, shutting down");
                return Ok(());
            }
            Err(kgraph_mcp_transport::TransportError::SerializationError { message }) => {
                warn!("dropping malformed request: {message}");
                continue;
            }
            Err(err) => {
                error!("transport error: {err}");
                return Err(err.into());
            }
        };

        match message {
            // `JsonRpcMessage` is `#[serde(untagged)]` with `Request` listed
            // before `Notification` and `JsonRpcRequest::id` optional, so an
            // incoming notification always deserializes into this arm with
            // `id: None`; `JsonRpcMessage::Notification` below is never
            // produced by the transport's own deserialization. Gate the
            // reply on the request actually carrying an id so a
            // notification never gets a response back (adapter.rs's own
            // documented contract).
            JsonRpcMessage::Request(request) => {
                let is_notification = request.is_notification();
                let response = adapter.handle(state, request).await;
                if is_notification {
                    continue;
                }
                if let Err(err) = transport.send_message(JsonRpcMessage::Response(response)).await {
                    error!("failed to send response: {err}");
                    return Err(err.into());
                }
            }
            JsonRpcMessage::Notification(notification) => {
                let _ = adapter.handle(state, notification).await;
            }
            JsonRpcMessage::Response(_) => {
                warn!("ignoring unexpected response message from client");
            }
        }
    }
}
