use std::sync::Arc;

use agent_provider::CompletionProvider;
use agent_provider_chat_api::{ChatApiProvider, ChatApiProviderConfig};
use agent_provider_mock::MockProvider;

use crate::config::{AgentConfig, ProviderKind};
use crate::error::ConfigError;

/// Builds the completion provider selected by `config`.
pub fn provider_from_config(
    config: &AgentConfig,
) -> Result<Arc<dyn CompletionProvider>, ConfigError> {
    match config.provider {
        ProviderKind::Mock => Ok(Arc::new(MockProvider::echo())),
        ProviderKind::ChatApi => {
            let api_key = config.api_key.clone().ok_or(ConfigError::MissingApiKey)?;
            let mut provider_config = ChatApiProviderConfig::new(api_key, config.model.clone())
                .with_base_url(config.base_url.clone());
            if let Some(timeout) = config.timeout {
                provider_config = provider_config.with_timeout(timeout);
            }
            Ok(Arc::new(ChatApiProvider::new(provider_config)?))
        }
    }
}
