//! Chat-completions implementation of the shared `agent_provider` contract.
//!
//! This adapter translates provider-neutral history into `chat_api` wire
//! payloads, performs one blocking exchange and maps the reply (or failure)
//! back into the contract types expected by `coding_agent`.

use std::sync::Arc;
use std::time::Duration;

use agent_provider::{
    CompletionError, CompletionProvider, Message, ProviderInitError, ProviderProfile, Role,
    ToolCall, ToolDefinition,
};
use chat_api::{
    ChatApiClient, ChatApiConfig, ChatApiError, ChatMessage, ChatRequest, WireFunction, WireTool,
    WireToolCall,
};

/// Stable provider identifier used by `coding_agent` startup selection.
pub const CHAT_API_PROVIDER_ID: &str = "chat-api";

/// Model used when the configured identifier is blank.
pub const DEFAULT_MODEL: &str = "anthropic/claude-opus-4.5";

/// Runtime configuration for the chat-completions provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatApiProviderConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: Option<String>,
    pub timeout: Option<Duration>,
}

impl ChatApiProviderConfig {
    #[must_use]
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: None,
            timeout: None,
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn into_chat_api_config(self) -> ChatApiConfig {
        let mut config = ChatApiConfig::new(self.api_key);

        if let Some(base_url) = self.base_url {
            config = config.with_base_url(base_url);
        }

        if let Some(timeout) = self.timeout {
            config = config.with_timeout(timeout);
        }

        config
    }
}

trait CompletionClient: Send + Sync {
    fn complete(&self, request: &ChatRequest) -> Result<ChatMessage, ChatApiError>;
}

#[derive(Debug)]
struct DefaultCompletionClient {
    client: ChatApiClient,
}

impl CompletionClient for DefaultCompletionClient {
    fn complete(&self, request: &ChatRequest) -> Result<ChatMessage, ChatApiError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|error| {
                ChatApiError::Decode(format!("failed to initialize tokio runtime: {error}"))
            })?;

        runtime.block_on(self.client.complete(request))
    }
}

/// `CompletionProvider` adapter backed by `chat_api` transport primitives.
pub struct ChatApiProvider {
    model: String,
    client: Arc<dyn CompletionClient>,
}

impl ChatApiProvider {
    /// Creates a provider using real chat-completions transport.
    ///
    /// A blank API key is rejected here so the failure surfaces at startup
    /// rather than on the first turn.
    pub fn new(config: ChatApiProviderConfig) -> Result<Self, ProviderInitError> {
        if config.api_key.trim().is_empty() {
            return Err(map_init_error(ChatApiError::MissingApiKey));
        }

        let model = sanitize_model(&config.model);
        let client = Arc::new(DefaultCompletionClient {
            client: ChatApiClient::new(config.into_chat_api_config()).map_err(map_init_error)?,
        });

        Ok(Self { model, client })
    }

    #[cfg(test)]
    fn with_client_for_tests(model: &str, client: Arc<dyn CompletionClient>) -> Self {
        Self {
            model: sanitize_model(model),
            client,
        }
    }
}

impl CompletionProvider for ChatApiProvider {
    fn profile(&self) -> ProviderProfile {
        ProviderProfile {
            provider_id: CHAT_API_PROVIDER_ID.to_string(),
            model_id: self.model.clone(),
        }
    }

    fn complete(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
    ) -> Result<Message, CompletionError> {
        let request = ChatRequest::new(
            self.model.clone(),
            messages.iter().map(to_wire_message).collect(),
        )
        .with_tools(tools.iter().map(to_wire_tool).collect());

        tracing::debug!(
            model = %self.model,
            messages = request.messages.len(),
            tools = request.tools.len(),
            "sending completion request"
        );

        let reply = self.client.complete(&request).map_err(map_completion_error)?;
        let message = from_wire_message(reply)?;

        tracing::debug!(
            tool_calls = message.tool_calls.len(),
            has_content = message.content.is_some(),
            "received completion reply"
        );

        Ok(message)
    }
}

fn to_wire_message(message: &Message) -> ChatMessage {
    ChatMessage {
        role: message.role.as_str().to_string(),
        content: message.content.clone(),
        tool_calls: message
            .tool_calls
            .iter()
            .map(|call| WireToolCall::function(&call.id, &call.name, &call.arguments))
            .collect(),
        tool_call_id: message.tool_call_id.clone(),
    }
}

fn to_wire_tool(tool: &ToolDefinition) -> WireTool {
    WireTool::function(WireFunction {
        name: tool.name.clone(),
        description: tool.description.clone(),
        parameters: tool.parameters.clone(),
    })
}

/// A reply missing its role decodes as `assistant`; any other role is malformed.
fn from_wire_message(message: ChatMessage) -> Result<Message, CompletionError> {
    if message.role != Role::Assistant.as_str() {
        return Err(CompletionError::protocol(format!(
            "unexpected reply role '{}'",
            message.role
        )));
    }

    let tool_calls = message
        .tool_calls
        .into_iter()
        .map(|call| ToolCall::new(call.id, call.function.name, call.function.arguments))
        .collect();

    Ok(Message::assistant_with_tool_calls(message.content, tool_calls))
}

fn map_completion_error(error: ChatApiError) -> CompletionError {
    if error.is_transport() {
        CompletionError::transport(error.to_string())
    } else {
        CompletionError::protocol(error.to_string())
    }
}

fn sanitize_model(model: &str) -> String {
    let trimmed = model.trim();
    if trimmed.is_empty() {
        DEFAULT_MODEL.to_string()
    } else {
        trimmed.to_string()
    }
}

fn map_init_error(error: ChatApiError) -> ProviderInitError {
    ProviderInitError::new(format!("Failed to initialize chat-api provider: {error}"))
}
