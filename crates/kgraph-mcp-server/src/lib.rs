//! # kgraph-mcp-server
//!
//! Tool dispatcher, resource handler, and process lifecycle for the
//! knowledge-graph MCP server.
//!
//! This crate is the outermost of the workspace's four layers: it owns the
//! process entry point, the JSON-RPC protocol adapter, the path allowlist,
//! and the dispatch logic that turns the eleven tool calls and six resource
//! reads described by the protocol into calls against `kgraph-mcp-backend`,
//! authenticated through `kgraph-mcp-auth`.
//!
//! ## Modules
//!
//! - [`lifecycle`] (C9) — process startup, the stdio serve loop, shutdown.
//! - [`adapter`] (C8) — binds JSON-RPC methods to the dispatcher/resources/prompts.
//! - [`context`] — `AppState`, the dependency-injection root, and `CallContext`.
//! - [`allowlist`] (C1) — the path allowlist clients use to scope filesystem access.
//! - [`dispatch`] (C6) — the eleven-tool dispatcher.
//! - [`resources`] (C7) — the six static resource URIs.
//! - [`prompts`] — the `explore-graph` prompt.
//! - [`schemas`] — JSON Schema descriptors for every tool.
//! - [`formatters`] — turns opaque backend JSON into the text content clients read.
//! - [`segmenter`] (C4) — chunks exact-mode connection paths into overlapping segments.
//! - [`error`] — `AllowlistError` and `DispatchError`, and the JSON error envelope.

pub mod adapter;
pub mod allowlist;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod formatters;
pub mod lifecycle;
pub mod prompts;
pub mod resources;
pub mod schemas;
pub mod segmenter;

pub use adapter::ProtocolAdapter;
pub use context::{AppState, CallContext};
pub use error::{AllowlistError, DispatchError};
