//! Transport-only client for OpenAI-compatible chat-completions endpoints.
//!
//! This crate owns request building, header construction and response
//! decoding for a single non-streaming POST. It contains no retry logic and no
//! knowledge of conversation state or tool execution.

pub mod client;
pub mod config;
pub mod error;
pub mod headers;
pub mod payload;
pub mod url;

pub use client::ChatApiClient;
pub use config::ChatApiConfig;
pub use error::ChatApiError;
pub use payload::{
    ChatMessage, ChatRequest, ChatResponse, WireFunction, WireFunctionCall, WireTool, WireToolCall,
};
pub use reqwest::StatusCode;
pub use url::normalize_chat_completions_url;
