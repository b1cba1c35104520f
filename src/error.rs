//! Failure classes of a probe run.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProbeError {
    /// Configuration could not be loaded or is invalid.
    #[error("configuration error: {0:#}")]
    Config(anyhow::Error),

    /// The MCP client could not be constructed.
    #[error("client construction failed: {0:#}")]
    Construction(anyhow::Error),

    /// Tool discovery failed. Recoverable.
    #[error("could not list tools: {0:#}")]
    Discovery(anyhow::Error),

    /// The tool call failed.
    #[error("tool call failed: {0:#}")]
    Invocation(anyhow::Error),
}

impl ProbeError {
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Discovery(_))
    }

    /// Process exit status for this failure.
    pub fn exit_code(&self) -> u8 {
        u8::from(self.is_fatal())
    }
}
