//! Core MCP type definitions: tools, resources, prompts, and the
//! client/server info and capability structures exchanged during
//! initialization.

pub mod client;
pub mod notifications;
pub mod prompts;
pub mod resources;
pub mod server;
pub mod tools;

pub use client::*;
pub use notifications::*;
pub use prompts::*;
pub use resources::*;
pub use server::*;
pub use tools::*;
