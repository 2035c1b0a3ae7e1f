#![allow(dead_code)]

use std::collections::VecDeque;
use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use agent_provider::{CompletionProvider, Role, ToolCall};
use agent_provider_mock::{MockProvider, ScriptedReply};
use agent_term::Terminal;
use coding_agent::confirm::{Confirmation, ConfirmationGate};
use coding_agent::conversation::ConversationState;
use coding_agent::dispatcher::ToolDispatcher;
use coding_agent::runtime::TurnOrchestrator;
use coding_agent::tools::BuiltinActionExecutor;

#[derive(Default)]
pub struct TerminalTrace {
    pub lines: VecDeque<String>,
    pub writes: Vec<String>,
}

/// Console double: replays scripted input lines and records every write.
pub struct SharedTerminal {
    state: Arc<Mutex<TerminalTrace>>,
}

impl SharedTerminal {
    pub fn new(lines: &[&str]) -> (Self, Arc<Mutex<TerminalTrace>>) {
        let state = Arc::new(Mutex::new(TerminalTrace {
            lines: lines.iter().map(|line| line.to_string()).collect(),
            writes: Vec::new(),
        }));
        (
            Self {
                state: Arc::clone(&state),
            },
            state,
        )
    }
}

impl Terminal for SharedTerminal {
    fn write(&mut self, data: &str) {
        lock_unpoisoned(&self.state).writes.push(data.to_string());
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        Ok(lock_unpoisoned(&self.state).lines.pop_front())
    }
}

pub fn rendered_output(state: &Arc<Mutex<TerminalTrace>>) -> String {
    lock_unpoisoned(state).writes.join("")
}

#[derive(Default)]
pub struct GateTrace {
    pub decisions: VecDeque<Confirmation>,
    pub asked: usize,
}

/// Confirmation double. Cancels once its script is exhausted.
pub struct RecordingGate {
    state: Arc<Mutex<GateTrace>>,
}

impl RecordingGate {
    pub fn new(decisions: &[Confirmation]) -> (Self, Arc<Mutex<GateTrace>>) {
        let state = Arc::new(Mutex::new(GateTrace {
            decisions: decisions.iter().copied().collect(),
            asked: 0,
        }));
        (
            Self {
                state: Arc::clone(&state),
            },
            state,
        )
    }
}

impl ConfirmationGate for RecordingGate {
    fn confirm(&mut self) -> Confirmation {
        let mut state = lock_unpoisoned(&self.state);
        state.asked += 1;
        state.decisions.pop_front().unwrap_or(Confirmation::Cancel)
    }
}

/// Orchestrator over a scripted provider, a recording gate and a real
/// executor rooted at `root`.
pub struct Harness {
    pub provider: Arc<MockProvider>,
    pub gate: Arc<Mutex<GateTrace>>,
    pub orchestrator: TurnOrchestrator,
}

impl Harness {
    pub fn new(root: &Path, replies: Vec<ScriptedReply>, decisions: &[Confirmation]) -> Self {
        let provider = Arc::new(MockProvider::scripted(replies));
        let (gate, gate_state) = RecordingGate::new(decisions);
        let dispatcher = ToolDispatcher::new(
            Box::new(BuiltinActionExecutor::new(root)),
            Box::new(gate),
        );
        let orchestrator = TurnOrchestrator::new(
            Arc::clone(&provider) as Arc<dyn CompletionProvider>,
            Vec::new(),
            dispatcher,
        );
        Self {
            provider,
            gate: gate_state,
            orchestrator,
        }
    }

    pub fn gate_asked(&self) -> usize {
        lock_unpoisoned(&self.gate).asked
    }
}

pub fn call(id: &str, name: &str, arguments: &str) -> ToolCall {
    ToolCall::new(id, name, arguments)
}

pub fn roles(conversation: &ConversationState) -> Vec<Role> {
    conversation
        .snapshot()
        .iter()
        .map(|message| message.role)
        .collect()
}

pub fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
