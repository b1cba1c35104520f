use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fs, path::Path};

/// Name of the built-in launch entry.
pub const LINEAR_SERVER: &str = "linear";

/// Token variable the Linear server reads.
pub const LINEAR_TOKEN_ENV: &str = "LINEAR_API_TOKEN";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct McpConfig {
    #[serde(rename = "mcpServers")]
    pub mcp_servers: HashMap<String, McpServerEntry>,
}

/// How to launch one stdio MCP server.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct McpServerEntry {
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
    /// Values may hold `${VAR}` templates; they are expanded at spawn time.
    #[serde(default)]
    pub env: HashMap<String, String>,
}

impl McpConfig {
    /// The Linear server launched through `npx`, with the API token forwarded
    /// as an unexpanded `${LINEAR_API_TOKEN}` template.
    pub fn linear() -> Self {
        Self::linear_with_token_env(LINEAR_TOKEN_ENV)
    }

    /// Like [`McpConfig::linear`], but the child's `LINEAR_API_TOKEN` is
    /// templated from `token_env`.
    pub fn linear_with_token_env(token_env: &str) -> Self {
        let entry = McpServerEntry {
            command: "npx".to_string(),
            args: vec!["-y".to_string(), "@tacticlaunch/mcp-linear".to_string()],
            env: HashMap::from([(LINEAR_TOKEN_ENV.to_string(), format!("${{{token_env}}}"))]),
        };

        Self {
            mcp_servers: HashMap::from([(LINEAR_SERVER.to_string(), entry)]),
        }
    }

    pub fn server(&self, name: &str) -> Option<&McpServerEntry> {
        self.mcp_servers.get(name)
    }
}

pub fn load_mcp_config(path: impl AsRef<Path>) -> anyhow::Result<McpConfig> {
    let path = path.as_ref();
    let txt = fs::read_to_string(path)
        .with_context(|| format!("failed to read MCP config '{}'", path.display()))?;
    serde_json::from_str(&txt)
        .with_context(|| format!("invalid MCP config '{}'", path.display()))
}

/// Expand `${NAME}` placeholders using `lookup`.
///
/// Unknown names keep their placeholder. An unterminated `${` is copied as is.
pub fn expand_placeholders<F>(input: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            out.push_str(&rest[start..]);
            return out;
        };

        let name = &after[..end];
        match lookup(name) {
            Some(value) if !name.is_empty() => out.push_str(&value),
            _ => out.push_str(&rest[start..start + 2 + end + 1]),
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    out
}

/// Expand every value of an env map from the process environment.
pub fn expand_env_map(map: &HashMap<String, String>) -> HashMap<String, String> {
    map.iter()
        .map(|(k, v)| {
            (
                k.clone(),
                expand_placeholders(v, |name| std::env::var(name).ok()),
            )
        })
        .collect()
}
