use std::fmt;

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Error as JsonError;

#[derive(Debug)]
pub enum ChatApiError {
    MissingApiKey,
    InvalidHeader(String),
    Request(reqwest::Error),
    Status(StatusCode, String),
    Decode(String),
    NoChoices,
    Serde(JsonError),
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorPayload {
    #[serde(rename = "error")]
    pub value: Option<ErrorPayloadFields>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorPayloadFields {
    pub message: Option<String>,
    pub code: Option<serde_json::Value>,
}

impl ErrorPayloadFields {
    fn message_with_code(&self) -> Option<String> {
        let message = self
            .message
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())?;
        match self.code.as_ref().map(code_text) {
            Some(code) if !code.is_empty() => Some(format!("{message} ({code})")),
            _ => Some(message.to_owned()),
        }
    }
}

impl fmt::Display for ChatApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingApiKey => write!(f, "API key is required"),
            Self::InvalidHeader(message) => write!(f, "invalid header: {message}"),
            Self::Request(error) => write!(f, "request error: {error}"),
            Self::Status(status, message) => write!(f, "HTTP {status} {message}"),
            Self::Decode(message) => write!(f, "undecodable response body: {message}"),
            Self::NoChoices => write!(f, "no choices in response"),
            Self::Serde(error) => write!(f, "serialization error: {error}"),
        }
    }
}

impl std::error::Error for ChatApiError {}

impl From<reqwest::Error> for ChatApiError {
    fn from(error: reqwest::Error) -> Self {
        Self::Request(error)
    }
}

impl From<JsonError> for ChatApiError {
    fn from(error: JsonError) -> Self {
        Self::Serde(error)
    }
}

impl ChatApiError {
    /// True when the service could not be reached or refused the request.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Request(_) | Self::Status(..))
    }
}

/// Extracts a human-readable message from a failed response body.
///
/// Prefers `{"error":{"message":..}}`, then the raw body, then the canonical
/// reason phrase of `status`.
pub fn parse_error_message(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<ErrorPayload>(body) {
        if let Some(message) = payload.value.and_then(|error| error.message_with_code()) {
            return message;
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        trimmed.to_string()
    }
}

fn code_text(code: &serde_json::Value) -> String {
    match code {
        serde_json::Value::String(value) => value.trim().to_owned(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}
