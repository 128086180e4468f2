//! # kgraph-mcp Core
//!
//! Protocol-level types for the knowledge-graph MCP server: the JSON-RPC
//! envelope, lifecycle messages, capability negotiation, and the error
//! taxonomy every other crate in this workspace builds on. No I/O lives
//! here — this crate only defines shapes and pure validation.
//!
//! ## Modules
//!
//! - [`protocol`]: JSON-RPC 2.0 messages, lifecycle, capability negotiation
//! - [`types`]: tools, resources, prompts, client/server info
//! - [`schema`]: JSON Schema generation and validation utilities
//! - [`utils`]: URIs, pagination, progress tracking, cancellation
//! - [`error`]: the `MCPError` taxonomy

pub mod error;
pub mod protocol;
pub mod schema;
pub mod types;
pub mod utils;

pub use error::{MCPError, MCPResult};

// Re-export protocol items
pub use protocol::{
    ImplementationMetadata, InitializeRequest, InitializeResponse, InitializedNotification,
    JsonRpcError, JsonRpcMessage, JsonRpcRequest, JsonRpcResponse, LifecyclePhase, LogLevel,
    LogMessage, Message, Notification, ProgressNotification, ProtocolMetadata, RequestId,
    RequestMetadata, ResponseMetadata, ShutdownRequest, VersionNegotiator,
};

// Re-export types items
pub use types::{
    ClientInfo, GetPromptRequest, GetPromptResponse, ListPromptsRequest, ListPromptsResponse,
    ListResourceTemplatesRequest, ListResourceTemplatesResponse, ListResourcesRequest,
    ListResourcesResponse, ListToolsRequest, ListToolsResponse, Prompt, PromptArgument,
    PromptContent, PromptMessage, PromptMessages, PromptRole, ReadResourceRequest,
    ReadResourceResponse, Resource, ResourceContent, ResourceTemplate,
    ResourceUpdatedNotification, ServerInfo, SubscribeRequest, Tool, ToolCallRequest,
    ToolCallResponse, ToolContent, UnsubscribeRequest,
};

// Re-export schema items explicitly (using what's actually available)
pub use schema::{
    array_schema, basic_schema, enum_schema, generate_schema_for, object_schema,
    validate_against_schema, validate_tool_input, validate_tool_output, SchemaGeneration,
};

// Re-export utils items explicitly (using what's actually available)
pub use utils::{
    Cursor, PaginationInfo, PaginationParams, Progress, ProgressStatus, ProgressTracker, Uri,
};
