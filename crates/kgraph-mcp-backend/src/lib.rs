//! C2 — the typed HTTP client to the remote knowledge-graph API.
//!
//! This crate is deliberately thin: the backend's own concept-search,
//! ingestion, ontology, and graph algorithms are out of scope for this
//! workspace (spec.md §1). [`BackendClient`] exposes one async method per
//! endpoint family (§6.2) and forwards typed request parameters as JSON;
//! response bodies stay opaque `serde_json::Value`s, since the only place
//! that needs to understand their shape is the formatter layer in
//! `kgraph-mcp-server`.
//!
//! The client also owns the single mutable piece of shared state the rest
//! of the workspace depends on: the current bearer token. [`kgraph-mcp-auth`]'s
//! token manager is the only writer; every dispatcher call reads it fresh.

pub mod client;
pub mod error;
pub mod types;

pub use client::BackendClient;
pub use error::{BackendError, BackendResult};
