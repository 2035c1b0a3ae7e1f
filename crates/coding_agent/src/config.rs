//! Startup configuration, built once and passed explicitly.

use std::path::PathBuf;
use std::time::Duration;

use agent_provider_chat_api::{CHAT_API_PROVIDER_ID, DEFAULT_MODEL};
use agent_provider_mock::MOCK_PROVIDER_ID;

use crate::error::ConfigError;

pub const PROVIDER_ENV_VAR: &str = "CODING_AGENT_PROVIDER";
pub const API_KEY_ENV_VAR: &str = "OPENROUTER_API_KEY";
pub const BASE_URL_ENV_VAR: &str = "BASE_URL";
pub const MODEL_ENV_VAR: &str = "MODEL";
pub const TOOLS_PATH_ENV_VAR: &str = "CODING_AGENT_TOOLS_PATH";
pub const SYSTEM_PROMPT_PATH_ENV_VAR: &str = "CODING_AGENT_SYSTEM_PROMPT_PATH";
pub const TIMEOUT_ENV_VAR: &str = "CODING_AGENT_TIMEOUT_SEC";

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_TOOLS_PATH: &str = "tools.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    ChatApi,
    Mock,
}

impl ProviderKind {
    pub fn id(self) -> &'static str {
        match self {
            Self::ChatApi => CHAT_API_PROVIDER_ID,
            Self::Mock => MOCK_PROVIDER_ID,
        }
    }

    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value {
            CHAT_API_PROVIDER_ID => Ok(Self::ChatApi),
            MOCK_PROVIDER_ID => Ok(Self::Mock),
            other => Err(ConfigError::UnsupportedProvider(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentConfig {
    pub provider: ProviderKind,
    /// Present whenever `provider` is [`ProviderKind::ChatApi`].
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub tools_path: PathBuf,
    pub system_prompt_path: Option<PathBuf>,
    pub timeout: Option<Duration>,
}

impl AgentConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source. Blank values count
    /// as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let provider = match get(PROVIDER_ENV_VAR) {
            Some(value) => ProviderKind::parse(&value)?,
            None => ProviderKind::ChatApi,
        };

        let api_key = get(API_KEY_ENV_VAR);
        if provider == ProviderKind::ChatApi && api_key.is_none() {
            return Err(ConfigError::MissingApiKey);
        }

        let timeout = match get(TIMEOUT_ENV_VAR) {
            Some(raw) => match raw.parse::<u64>() {
                Ok(seconds) if seconds > 0 => Some(Duration::from_secs(seconds)),
                _ => return Err(ConfigError::InvalidTimeout(raw)),
            },
            None => None,
        };

        Ok(Self {
            provider,
            api_key,
            base_url: get(BASE_URL_ENV_VAR).unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: get(MODEL_ENV_VAR).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            tools_path: get(TOOLS_PATH_ENV_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_TOOLS_PATH)),
            system_prompt_path: get(SYSTEM_PROMPT_PATH_ENV_VAR).map(PathBuf::from),
            timeout,
        })
    }
}
