//! Launch the configured MCP server, list its tools and call one.
//!
//! A run is strictly sequential:
//!
//! 1. check the API token (a missing token only warns)
//! 2. connect (fatal on failure)
//! 3. list tools (failure only warns)
//! 4. call the tool (fatal on failure)
//!
//! The client is closed on every path once it exists.

use crate::config::AppConfig;
use crate::error::ProbeError;
use crate::mcp::{Connector, McpConfig, ToolArguments, ToolClient, ToolSummary};
use std::io::Write;
use tracing::{info, warn};

/// Everything a run needs, resolved from [`AppConfig`].
#[derive(Debug, Clone)]
pub struct RunPlan {
    pub identity: String,
    pub server: String,
    pub launch: McpConfig,
    pub tool: String,
    pub arguments: ToolArguments,
}

impl RunPlan {
    pub fn from_config(cfg: &AppConfig) -> Result<Self, ProbeError> {
        Ok(Self {
            identity: cfg.client.identity.clone(),
            server: cfg.client.server.clone(),
            launch: cfg.launch_config().map_err(ProbeError::Config)?,
            tool: cfg.invocation.tool.clone(),
            arguments: cfg.invocation.arguments().map_err(ProbeError::Config)?,
        })
    }
}

/// True when the token is unset or empty.
pub fn token_missing(value: Option<&str>) -> bool {
    value.is_none_or(str::is_empty)
}

/// Read the token variable and warn if it is missing. Returns whether a
/// token is present.
///
/// The value itself is never used here; the launch config forwards it as a
/// `${VAR}` template.
pub fn check_token(var: &str) -> bool {
    let value = std::env::var(var).ok();
    if token_missing(value.as_deref()) {
        warn!(
            name: "probe.token.missing",
            var = %var,
            "{var} is empty; set it in the environment or a .env file"
        );
        return false;
    }
    true
}

pub fn write_tools<W: Write>(out: &mut W, tools: &[ToolSummary]) -> std::io::Result<()> {
    writeln!(out, "Available tools:")?;
    for t in tools {
        writeln!(out, "- {}: {}", t.name, t.description)?;
    }
    Ok(())
}

pub fn write_result<W: Write>(out: &mut W, result: &serde_json::Value) -> std::io::Result<()> {
    writeln!(out, "Result: {result}")
}

/// Connect, discover, invoke, close.
pub async fn run<C, W>(connector: &C, plan: &RunPlan, out: &mut W) -> Result<(), ProbeError>
where
    C: Connector,
    W: Write,
{
    let mut client = connector
        .connect(&plan.identity, &plan.launch, &plan.server)
        .await
        .map_err(ProbeError::Construction)?;

    let result = discover_and_call(&client, plan, out).await;

    if let Err(e) = client.close().await {
        warn!(name: "mcp.client.close_failed", error = %format!("{e:#}"), "Failed to close MCP client");
    }

    result
}

async fn discover_and_call<T, W>(client: &T, plan: &RunPlan, out: &mut W) -> Result<(), ProbeError>
where
    T: ToolClient,
    W: Write,
{
    match client.list_tools().await {
        Ok(tools) => {
            info!(name: "mcp.tools.discovered", count = tools.len(), "Tools discovered");
            if let Err(e) = write_tools(out, &tools) {
                warn!(name: "probe.output.write_failed", error = %e, "Failed to print tool list");
            }
        }
        Err(e) => {
            let err = ProbeError::Discovery(e);
            warn!(name: "mcp.tools.discovery_failed", error = %err, "Continuing without tool list");
        }
    }

    let value = client
        .call_tool(&plan.tool, plan.arguments.clone())
        .await
        .map_err(ProbeError::Invocation)?;

    // Output failures never change the exit status.
    if let Err(e) = write_result(out, &value).and_then(|()| out.flush()) {
        warn!(name: "probe.output.write_failed", error = %e, "Failed to print result");
    }
    Ok(())
}
