use serde::{Deserialize, Serialize};

/// Read-only view of a discovered tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolSummary {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl ToolSummary {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

impl From<rmcp::model::Tool> for ToolSummary {
    fn from(tool: rmcp::model::Tool) -> Self {
        Self {
            name: tool.name.to_string(),
            description: tool.description.as_deref().unwrap_or("").to_string(),
        }
    }
}

/// Arguments passed to `tools/call`.
pub type ToolArguments = serde_json::Map<String, serde_json::Value>;
