//! Interactive coding agent with a human-gated tool loop.
//!
//! ## Configuration
//!
//! A `.env` file in the working directory is loaded first; real environment
//! variables take precedence over it.
//!
//! - `CODING_AGENT_PROVIDER`: `chat-api` (default) or `mock` for offline runs
//! - `OPENROUTER_API_KEY`: required for `chat-api`
//! - `BASE_URL`: OpenAI-compatible API base, default `https://openrouter.ai/api/v1`
//! - `MODEL`: model identifier, default `anthropic/claude-opus-4.5`
//! - `CODING_AGENT_TOOLS_PATH`: tool schema file, default `tools.json`
//! - `CODING_AGENT_SYSTEM_PROMPT_PATH`: optional system prompt file
//! - `CODING_AGENT_TIMEOUT_SEC`: optional request timeout in seconds
//!
//! Logging is configured through `RUST_LOG` and `AGENT_TERM_LOG_FILE`, see
//! `agent_term::logging`.
//!
//! ## History contract
//!
//! Before every completion request, each assistant message carrying tool
//! calls is followed by exactly one tool message per call, in call order.
//! Declining any action in a batch removes the whole batch from history.

pub mod app;
pub mod commands;
pub mod config;
pub mod confirm;
pub mod conversation;
pub mod dispatcher;
pub mod error;
pub mod prompt;
pub mod providers;
pub mod runtime;
pub mod shutdown;
pub mod tools;
