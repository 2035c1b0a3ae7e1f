//! Per-line turn loop: completion requests, tool batches and rollback.

use std::sync::Arc;

use agent_provider::{CompletionError, CompletionProvider, Message, ToolDefinition};
use agent_term::Terminal;

use crate::conversation::ConversationState;
use crate::dispatcher::ToolDispatcher;

/// How a turn ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The model produced a final answer, already appended and printed.
    Answered(Option<String>),
    /// A gated action was declined; the in-flight batch was rolled back.
    Cancelled { interrupted: bool },
    /// The completion request failed; only the user message was kept.
    Failed(CompletionError),
}

pub struct TurnOrchestrator {
    provider: Arc<dyn CompletionProvider>,
    tools: Vec<ToolDefinition>,
    dispatcher: ToolDispatcher,
}

impl TurnOrchestrator {
    pub fn new(
        provider: Arc<dyn CompletionProvider>,
        tools: Vec<ToolDefinition>,
        dispatcher: ToolDispatcher,
    ) -> Self {
        Self {
            provider,
            tools,
            dispatcher,
        }
    }

    pub fn provider(&self) -> &Arc<dyn CompletionProvider> {
        &self.provider
    }

    /// Runs one user line to completion.
    ///
    /// Every request is sent with all tool calls of the previous assistant
    /// message answered. A declined action truncates history back to the
    /// checkpoint taken before the assistant message that carried the batch.
    pub fn run_turn(
        &mut self,
        conversation: &mut ConversationState,
        input: &str,
        terminal: &mut dyn Terminal,
    ) -> TurnOutcome {
        conversation.append(Message::user(input));

        loop {
            debug_assert!(conversation.is_request_ready());
            tracing::debug!(
                messages = conversation.len(),
                tools = self.tools.len(),
                "requesting completion"
            );

            let reply = match self.provider.complete(conversation.snapshot(), &self.tools) {
                Ok(reply) => reply,
                Err(error) => {
                    tracing::warn!(%error, "completion failed; turn aborted");
                    terminal.write(&format!("Error: {error}\n"));
                    return TurnOutcome::Failed(error);
                }
            };
            tracing::debug!(tool_calls = reply.tool_calls.len(), "completion received");

            if !reply.requests_tools() {
                let content = reply.content.clone();
                conversation.append(reply);
                if let Some(text) = content.as_deref().filter(|text| !text.is_empty()) {
                    terminal.write(&format!("{text}\n"));
                }
                return TurnOutcome::Answered(content);
            }

            let checkpoint = conversation.checkpoint();
            let calls = reply.tool_calls.clone();
            if let Some(preamble) = reply.content.as_deref().filter(|text| !text.trim().is_empty()) {
                terminal.write(&format!("{preamble}\n"));
            }
            conversation.append(reply);

            for (index, call) in calls.iter().enumerate() {
                let dispatch = self
                    .dispatcher
                    .dispatch(&call.name, &call.arguments, terminal);

                if !dispatch.proceeded {
                    conversation.truncate(checkpoint);
                    tracing::info!(
                        call = index + 1,
                        batch = calls.len(),
                        restored_len = checkpoint.position(),
                        "action declined; batch rolled back"
                    );
                    return TurnOutcome::Cancelled {
                        interrupted: dispatch.interrupted,
                    };
                }

                conversation.append(Message::tool_result(call.id.clone(), dispatch.result));
            }
        }
    }
}
