use crate::mcp::config::{McpConfig, expand_env_map};
use crate::mcp::types::{ToolArguments, ToolSummary};
use anyhow::{Context, anyhow};
use async_trait::async_trait;
use rmcp::{
    model::{CallToolRequestParam, ClientInfo},
    service::{RoleClient, RunningService, ServiceExt},
    transport::TokioChildProcess,
};
use tokio::process::Command;
use tracing::{debug, info};

/// The operations the driver needs from an MCP connection.
#[async_trait]
pub trait ToolClient: Send + Sync {
    async fn list_tools(&self) -> anyhow::Result<Vec<ToolSummary>>;

    async fn call_tool(
        &self,
        name: &str,
        arguments: ToolArguments,
    ) -> anyhow::Result<serde_json::Value>;

    /// Release the connection. Calling it twice is a no-op.
    async fn close(&mut self) -> anyhow::Result<()>;
}

/// Builds a [`ToolClient`] for one named server.
#[async_trait]
pub trait Connector: Send + Sync {
    type Client: ToolClient;

    async fn connect(
        &self,
        identity: &str,
        config: &McpConfig,
        server: &str,
    ) -> anyhow::Result<Self::Client>;
}

type ClientService = RunningService<RoleClient, ClientInfo>;

/// A connection to one stdio MCP server running as a child process.
pub struct McpClient {
    server_name: String,
    service: Option<ClientService>,
}

impl std::fmt::Debug for McpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("McpClient")
            .field("server_name", &self.server_name)
            .field("open", &self.service.is_some())
            .finish()
    }
}

impl McpClient {
    /// Spawn `server` from `config` and complete the MCP handshake.
    pub async fn connect(identity: &str, config: &McpConfig, server: &str) -> anyhow::Result<Self> {
        let entry = config
            .server(server)
            .ok_or_else(|| anyhow!("no MCP server named '{server}' in launch config"))?;

        let mut cmd = Command::new(&entry.command);
        cmd.args(&entry.args);
        for (k, v) in expand_env_map(&entry.env) {
            cmd.env(k, v);
        }

        let transport = TokioChildProcess::new(cmd)
            .with_context(|| format!("failed to spawn MCP server '{server}' ({})", entry.command))?;

        let mut info = ClientInfo::default();
        info.client_info.name = identity.to_string();

        let service = info
            .serve(transport)
            .await
            .with_context(|| format!("failed to connect stdio MCP server '{server}'"))?;

        info!(
            name: "mcp.client.connected",
            server = %server,
            identity = %identity,
            "MCP server connected"
        );

        Ok(Self {
            server_name: server.to_string(),
            service: Some(service),
        })
    }

    fn service(&self) -> anyhow::Result<&ClientService> {
        self.service
            .as_ref()
            .ok_or_else(|| anyhow!("MCP client for '{}' is closed", self.server_name))
    }
}

#[async_trait]
impl ToolClient for McpClient {
    async fn list_tools(&self) -> anyhow::Result<Vec<ToolSummary>> {
        let tools = self
            .service()?
            .list_all_tools()
            .await
            .with_context(|| format!("tools/list failed for MCP server '{}'", self.server_name))?;

        Ok(tools.into_iter().map(ToolSummary::from).collect())
    }

    async fn call_tool(
        &self,
        name: &str,
        arguments: ToolArguments,
    ) -> anyhow::Result<serde_json::Value> {
        let res = self
            .service()?
            .call_tool(CallToolRequestParam {
                name: name.to_string().into(),
                arguments: Some(arguments),
            })
            .await
            .with_context(|| format!("tools/call failed for {}::{name}", self.server_name))?;

        if res.is_error == Some(true) {
            return Err(anyhow!(
                "tool {}::{name} reported an error: {}",
                self.server_name,
                serde_json::to_string(&res.content)?
            ));
        }

        Ok(serde_json::to_value(res)?)
    }

    async fn close(&mut self) -> anyhow::Result<()> {
        let Some(service) = self.service.take() else {
            return Ok(());
        };

        let reason = service
            .cancel()
            .await
            .with_context(|| format!("failed to stop MCP server '{}'", self.server_name))?;
        debug!(server = %self.server_name, ?reason, "MCP client closed");
        Ok(())
    }
}

/// Connects real child-process servers.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdioConnector;

#[async_trait]
impl Connector for StdioConnector {
    type Client = McpClient;

    async fn connect(
        &self,
        identity: &str,
        config: &McpConfig,
        server: &str,
    ) -> anyhow::Result<McpClient> {
        McpClient::connect(identity, config, server).await
    }
}
