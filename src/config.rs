use crate::mcp::config::{LINEAR_SERVER, LINEAR_TOKEN_ENV, McpConfig, load_mcp_config};
use crate::mcp::types::ToolArguments;
use anyhow::{Context, anyhow};
use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;

/// Prefix for environment overrides, e.g. `PROBE_INVOCATION__TOOL=list_teams`.
pub const ENV_PREFIX: &str = "PROBE";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<String>,

    /// `mcp.json`-style launch config replacing the built-in Linear server
    #[arg(long, env = "MCP_CONFIG")]
    pub mcp_config: Option<String>,

    /// Name of the server entry to launch
    #[arg(long)]
    pub server: Option<String>,

    /// Tool to invoke
    #[arg(long)]
    pub tool: Option<String>,

    /// Tool arguments as a JSON object
    #[arg(long)]
    pub args: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub client: ClientConfig,
    pub invocation: InvocationConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ClientConfig {
    /// Client name sent in the MCP handshake.
    pub identity: String,
    pub server: String,
    /// Environment variable holding the API token.
    pub token_env: String,
    #[serde(default)]
    pub mcp_config: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct InvocationConfig {
    pub tool: String,
    /// JSON object text.
    pub arguments: String,
}

impl InvocationConfig {
    pub fn arguments(&self) -> anyhow::Result<ToolArguments> {
        let value: serde_json::Value = serde_json::from_str(&self.arguments)
            .with_context(|| format!("tool arguments are not valid JSON: {}", self.arguments))?;
        match value {
            serde_json::Value::Object(map) => Ok(map),
            other => Err(anyhow!("tool arguments must be a JSON object, got {other}")),
        }
    }
}

impl AppConfig {
    /// Load from the process arguments. `--help`, `--version` and usage
    /// errors are handled by clap, which exits the process.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::from_cli(Cli::parse())
    }

    pub fn load_from_args<I, T>(args: I) -> Result<Self, config::ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli =
            Cli::try_parse_from(args).map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Self::from_cli(cli)
    }

    pub fn from_cli(cli: Cli) -> Result<Self, config::ConfigError> {
        // 1. Defaults
        let mut builder = Config::builder()
            .set_default("client.identity", "gomcp-linear-example")?
            .set_default("client.server", LINEAR_SERVER)?
            .set_default("client.token_env", LINEAR_TOKEN_ENV)?
            .set_default("invocation.tool", "list_issues")?
            .set_default("invocation.arguments", r#"{"team":"Frontend"}"#)?;

        // 2. Config file
        if let Some(path) = &cli.config {
            builder = builder.add_source(File::with_name(path));
        }

        // 3. Environment, e.g. PROBE_CLIENT__SERVER=linear
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        // 4. CLI flags win
        if let Some(path) = cli.mcp_config {
            builder = builder.set_override("client.mcp_config", path)?;
        }
        if let Some(server) = cli.server {
            builder = builder.set_override("client.server", server)?;
        }
        if let Some(tool) = cli.tool {
            builder = builder.set_override("invocation.tool", tool)?;
        }
        if let Some(args) = cli.args {
            builder = builder.set_override("invocation.arguments", args)?;
        }

        builder.build()?.try_deserialize()
    }

    /// Launch config: the `mcp.json` file if one is configured, else the
    /// built-in Linear server forwarding `client.token_env`.
    pub fn launch_config(&self) -> anyhow::Result<McpConfig> {
        match &self.client.mcp_config {
            Some(path) => load_mcp_config(path),
            None => Ok(McpConfig::linear_with_token_env(&self.client.token_env)),
        }
    }
}
