//! Model Context Protocol (MCP) client.
//!
//! Connects to a stdio MCP server spawned as a child process, discovers its
//! tools and invokes them.
//!
//! # Configuration
//!
//! Launch specs use the `mcp.json` shape:
//!
//! ```json
//! {
//!   "mcpServers": {
//!     "linear": {
//!       "command": "npx",
//!       "args": ["-y", "@tacticlaunch/mcp-linear"],
//!       "env": { "LINEAR_API_TOKEN": "${LINEAR_API_TOKEN}" }
//!     }
//!   }
//! }
//! ```
//!
//! `${VAR}` templates in `env` are expanded from the process environment when
//! the server is spawned.

pub mod client;
pub mod config;
pub mod types;

pub use client::{Connector, McpClient, StdioConnector, ToolClient};
pub use config::{McpConfig, McpServerEntry};
pub use types::{ToolArguments, ToolSummary};
