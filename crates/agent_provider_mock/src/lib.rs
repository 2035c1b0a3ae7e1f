//! Deterministic mock implementation of the shared `agent_provider` contract.
//!
//! This crate contains no transport/protocol logic and is intended for local
//! development and contract-level integration testing. Replies are scripted up
//! front and every request snapshot is recorded for later inspection.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use agent_provider::{
    CompletionError, CompletionProvider, Message, ProviderProfile, Role, ToolCall, ToolDefinition,
};

/// Stable provider identifier used for explicit startup selection.
pub const MOCK_PROVIDER_ID: &str = "mock";

/// One scripted answer returned by [`MockProvider::complete`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedReply {
    Message(Message),
    Error(CompletionError),
}

impl ScriptedReply {
    /// Final assistant text.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Message(Message::assistant(text))
    }

    /// Assistant message requesting the given tool calls.
    #[must_use]
    pub fn tool_calls(tool_calls: Vec<ToolCall>) -> Self {
        Self::Message(Message::assistant_with_tool_calls(None, tool_calls))
    }

    #[must_use]
    pub fn error(error: CompletionError) -> Self {
        Self::Error(error)
    }
}

/// Snapshot of one request received by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub messages: Vec<Message>,
    pub tool_names: Vec<String>,
}

/// Deterministic mock provider used by `coding_agent` tests and offline runs.
#[derive(Debug)]
pub struct MockProvider {
    model_id: String,
    replies: Mutex<VecDeque<ScriptedReply>>,
    echo_when_exhausted: bool,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockProvider {
    /// Creates a provider that answers with `replies` in order and fails once
    /// the script is exhausted.
    #[must_use]
    pub fn scripted(replies: Vec<ScriptedReply>) -> Self {
        Self {
            model_id: "mock".to_string(),
            replies: Mutex::new(replies.into()),
            echo_when_exhausted: false,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Creates a provider that echoes the latest user line as final text.
    #[must_use]
    pub fn echo() -> Self {
        Self {
            echo_when_exhausted: true,
            ..Self::scripted(Vec::new())
        }
    }

    /// Returns every request received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock_unpoisoned(&self.requests).clone()
    }

    #[must_use]
    pub fn request_count(&self) -> usize {
        lock_unpoisoned(&self.requests).len()
    }

    /// Returns how many scripted replies have not been consumed yet.
    #[must_use]
    pub fn remaining_replies(&self) -> usize {
        lock_unpoisoned(&self.replies).len()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::echo()
    }
}

impl CompletionProvider for MockProvider {
    fn profile(&self) -> ProviderProfile {
        ProviderProfile {
            provider_id: MOCK_PROVIDER_ID.to_string(),
            model_id: self.model_id.clone(),
        }
    }

    fn complete(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
    ) -> Result<Message, CompletionError> {
        lock_unpoisoned(&self.requests).push(RecordedRequest {
            messages: messages.to_vec(),
            tool_names: tools.iter().map(|tool| tool.name.clone()).collect(),
        });

        match lock_unpoisoned(&self.replies).pop_front() {
            Some(ScriptedReply::Message(message)) => Ok(message),
            Some(ScriptedReply::Error(error)) => Err(error),
            None if self.echo_when_exhausted => Ok(Message::assistant(echo_text(messages))),
            None => Err(CompletionError::protocol(
                "mock provider script exhausted",
            )),
        }
    }
}

fn echo_text(messages: &[Message]) -> String {
    let last_user = messages
        .iter()
        .rev()
        .find(|message| message.role == Role::User)
        .and_then(|message| message.content.as_deref())
        .unwrap_or("");

    format!("(mock) {last_user}")
}

fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

#[cfg(test)]
mod tests {
    use agent_provider::CompletionErrorKind;
    use serde_json::json;

    use super::*;

    fn shell_definition() -> ToolDefinition {
        ToolDefinition {
            name: "run_shell".to_string(),
            description: None,
            parameters: json!({"type": "object"}),
        }
    }

    #[test]
    fn profile_exposes_explicit_mock_provider_identity() {
        let profile = MockProvider::default().profile();

        assert_eq!(profile.provider_id, MOCK_PROVIDER_ID);
        assert_eq!(profile.model_id, "mock");
    }

    #[test]
    fn scripted_replies_are_returned_in_order_then_exhaust() {
        let provider = MockProvider::scripted(vec![
            ScriptedReply::tool_calls(vec![ToolCall::new("call-1", "run_shell", "{}")]),
            ScriptedReply::text("done"),
        ]);

        let first = provider
            .complete(&[Message::user("go")], &[])
            .expect("first scripted reply");
        assert!(first.requests_tools());

        let second = provider
            .complete(&[Message::user("go")], &[])
            .expect("second scripted reply");
        assert_eq!(second.content.as_deref(), Some("done"));

        let exhausted = provider
            .complete(&[Message::user("go")], &[])
            .expect_err("script should be exhausted");
        assert_eq!(exhausted.kind(), CompletionErrorKind::Protocol);
        assert_eq!(provider.remaining_replies(), 0);
    }

    #[test]
    fn scripted_errors_are_surfaced_verbatim() {
        let provider = MockProvider::scripted(vec![ScriptedReply::error(
            CompletionError::transport("connection refused"),
        )]);

        let error = provider
            .complete(&[Message::user("hi")], &[])
            .expect_err("scripted error");

        assert_eq!(error, CompletionError::transport("connection refused"));
    }

    #[test]
    fn requests_record_full_snapshots_and_tool_names() {
        let provider = MockProvider::echo();
        let history = vec![Message::system("sys"), Message::user("hello")];

        let reply = provider
            .complete(&history, &[shell_definition()])
            .expect("echo reply");

        assert_eq!(reply.content.as_deref(), Some("(mock) hello"));
        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].messages, history);
        assert_eq!(requests[0].tool_names, vec!["run_shell".to_string()]);
    }
}
