use std::path::PathBuf;

use agent_provider::ProviderInitError;
use thiserror::Error;

/// Fatal startup failures. Reported before the interactive loop starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("OPENROUTER_API_KEY is required")]
    MissingApiKey,
    #[error("unsupported provider '{0}'. Available providers: chat-api, mock")]
    UnsupportedProvider(String),
    #[error("CODING_AGENT_TIMEOUT_SEC must be a positive integer, got '{0}'")]
    InvalidTimeout(String),
    #[error("failed to read tool schema {}: {source}", path.display())]
    ToolsUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid tool schema {}: {reason}", path.display())]
    ToolsInvalid { path: PathBuf, reason: String },
    #[error("failed to read system prompt {}: {source}", path.display())]
    SystemPromptUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Provider(#[from] ProviderInitError),
}

/// Argument payload of a tool call that could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid arguments for {tool}: {reason}")]
pub struct ArgumentError {
    pub tool: String,
    pub reason: String,
}

impl ArgumentError {
    pub fn new(tool: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            tool: tool.into(),
            reason: reason.into(),
        }
    }
}
