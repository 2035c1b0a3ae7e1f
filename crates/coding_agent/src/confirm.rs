//! Single-keypress approval of side-effecting actions.

use std::collections::VecDeque;

use agent_term::{Key, KeyReader};

/// Decision for one pending action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Proceed,
    Cancel,
    /// Cancel, and the user asked the process to shut down (Ctrl-C in raw mode).
    Interrupt,
}

impl Confirmation {
    pub fn proceeds(self) -> bool {
        self == Self::Proceed
    }
}

impl From<Key> for Confirmation {
    fn from(key: Key) -> Self {
        match key {
            Key::Escape => Self::Cancel,
            Key::Interrupt => Self::Interrupt,
            Key::Char(_) => Self::Proceed,
        }
    }
}

/// Blocks for a human decision on the action currently on screen.
pub trait ConfirmationGate {
    fn confirm(&mut self) -> Confirmation;
}

/// Gate backed by one raw keypress. Escape cancels, any other key proceeds.
///
/// End of input and read failures cancel.
pub struct KeypressGate<K> {
    keys: K,
}

impl<K: KeyReader> KeypressGate<K> {
    pub fn new(keys: K) -> Self {
        Self { keys }
    }
}

impl<K: KeyReader> ConfirmationGate for KeypressGate<K> {
    fn confirm(&mut self) -> Confirmation {
        match self.keys.read_key() {
            Ok(Some(key)) => Confirmation::from(key),
            Ok(None) => {
                tracing::warn!("input closed while awaiting confirmation; cancelling");
                Confirmation::Cancel
            }
            Err(error) => {
                tracing::warn!(%error, "confirmation key read failed; cancelling");
                Confirmation::Cancel
            }
        }
    }
}

/// Deterministic gate replaying a fixed list of decisions. Cancels once exhausted.
#[derive(Debug, Default, Clone)]
pub struct ScriptedGate {
    decisions: VecDeque<Confirmation>,
    asked: usize,
}

impl ScriptedGate {
    pub fn new(decisions: impl IntoIterator<Item = Confirmation>) -> Self {
        Self {
            decisions: decisions.into_iter().collect(),
            asked: 0,
        }
    }

    /// How many confirmations were requested so far.
    pub fn asked(&self) -> usize {
        self.asked
    }
}

impl ConfirmationGate for ScriptedGate {
    fn confirm(&mut self) -> Confirmation {
        self.asked += 1;
        self.decisions.pop_front().unwrap_or(Confirmation::Cancel)
    }
}
