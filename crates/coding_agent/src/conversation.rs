//! Ordered message history with checkpoint/rollback.

use agent_provider::{Message, Role};

/// Recorded history length. Only meaningful for the state that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Checkpoint(usize);

impl Checkpoint {
    pub fn position(self) -> usize {
        self.0
    }
}

/// Append-only transcript, except for truncation back to a checkpoint.
///
/// Insertion order is the protocol payload; entries are never reordered or
/// edited in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationState {
    messages: Vec<Message>,
}

impl ConversationState {
    /// Creates a history seeded with a single system message.
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::system(system_prompt)],
        }
    }

    /// Adds `message` to the end. Pairing is the caller's responsibility.
    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.messages.len())
    }

    /// Discards everything appended after `checkpoint`.
    ///
    /// A checkpoint at or beyond the current length is a no-op.
    pub fn truncate(&mut self, checkpoint: Checkpoint) {
        self.messages.truncate(checkpoint.0);
    }

    /// Full ordered history, handed verbatim to the completion service.
    pub fn snapshot(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Checks the tool-call pairing rule that must hold before every request:
    /// each assistant message with tool calls is followed by exactly one tool
    /// message per call, in call order, and tool messages appear nowhere else.
    pub fn is_request_ready(&self) -> bool {
        let mut index = 0;
        while index < self.messages.len() {
            let message = &self.messages[index];
            index += 1;

            match message.role {
                Role::Tool => return false,
                Role::Assistant if message.requests_tools() => {
                    for call in &message.tool_calls {
                        match self.messages.get(index) {
                            Some(answer)
                                if answer.role == Role::Tool
                                    && answer.tool_call_id.as_deref() == Some(call.id.as_str()) =>
                            {
                                index += 1;
                            }
                            _ => return false,
                        }
                    }
                }
                _ => {}
            }
        }
        true
    }
}
