//! Transport layer for the knowledge-graph MCP server.
//!
//! The server speaks exactly one transport: line-delimited JSON-RPC over
//! stdio. The [`Transport`] trait exists so the dispatcher and protocol
//! adapter never depend on stdio directly; a host-agnostic framing could be
//! swapped in without touching `kgraph-mcp-server`.

use async_trait::async_trait;
use kgraph_mcp_core::protocol::JsonRpcMessage;
use std::time::Duration;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TransportError>;

pub mod stdio;

pub use stdio::StdioTransport;

/// Transport errors.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("transport not ready: {state:?}")]
    NotReady { state: ConnectionState },

    #[error("connection closed")]
    ConnectionClosed,

    #[error("serialization error: {message}")]
    SerializationError { message: String },

    #[error("network error: {message}")]
    NetworkError { message: String },
}

/// Connection lifecycle state of a transport instance.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connected,
    ShuttingDown,
    Failed(String),
}

/// Health/diagnostic snapshot of a transport, useful for logging.
#[derive(Debug, Clone, Default)]
pub struct TransportHealth {
    pub state: ConnectionState,
    pub messages_sent: u64,
    pub messages_received: u64,
    pub error_count: u64,
    pub last_error: Option<String>,
    pub last_activity: Option<std::time::SystemTime>,
    pub connection_duration: Option<Duration>,
}

/// Parameters governing a graceful shutdown of a transport.
#[derive(Debug, Clone, Default)]
pub struct ShutdownConfig {
    pub drain_timeout: Option<Duration>,
}

/// A bidirectional channel for exchanging MCP JSON-RPC messages.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send_message(&mut self, message: JsonRpcMessage) -> Result<()>;
    async fn receive_message(&mut self) -> Result<JsonRpcMessage>;
    async fn close(&mut self) -> Result<()>;
    fn get_state(&self) -> ConnectionState;
    fn get_health(&self) -> TransportHealth;
    async fn shutdown(&mut self, config: ShutdownConfig) -> Result<()>;
    async fn force_shutdown(&mut self) -> Result<()>;
    async fn reset(&mut self) -> Result<()>;
}

/// Construct the process's stdio transport.
pub async fn create_stdio_transport() -> Result<StdioTransport> {
    StdioTransport::new().await
}
