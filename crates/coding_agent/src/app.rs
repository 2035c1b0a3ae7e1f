//! Line-oriented REPL driving one turn per user line.

use std::io;
use std::sync::Arc;

use agent_term::Terminal;

use crate::commands::{parse_slash_command, SlashCommand, HELP_TEXT};
use crate::conversation::{Checkpoint, ConversationState};
use crate::runtime::{TurnOrchestrator, TurnOutcome};
use crate::shutdown::{ShutdownState, FAREWELL};

pub const PROMPT: &str = "> ";

/// Whether the loop keeps reading lines after one was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineAction {
    Continue,
    Quit,
}

pub struct App {
    conversation: ConversationState,
    orchestrator: TurnOrchestrator,
    startup: Checkpoint,
    shutdown: Arc<ShutdownState>,
}

impl App {
    pub fn new(
        system_prompt: impl Into<String>,
        orchestrator: TurnOrchestrator,
        shutdown: Arc<ShutdownState>,
    ) -> Self {
        let conversation = ConversationState::new(system_prompt);
        let startup = conversation.checkpoint();
        Self {
            conversation,
            orchestrator,
            startup,
            shutdown,
        }
    }

    pub fn conversation(&self) -> &ConversationState {
        &self.conversation
    }

    /// Reads lines until end of input, `/quit`, or a recorded shutdown request.
    pub fn run(&mut self, terminal: &mut dyn Terminal) -> io::Result<()> {
        while !self.shutdown.is_requested() {
            terminal.write(PROMPT);
            let Some(line) = terminal.read_line()? else {
                terminal.write("\n");
                break;
            };

            if self.handle_line(&line, terminal) == LineAction::Quit {
                break;
            }
        }

        terminal.write(&format!("{FAREWELL}\n"));
        Ok(())
    }

    pub fn handle_line(&mut self, line: &str, terminal: &mut dyn Terminal) -> LineAction {
        let input = line.trim();
        if input.is_empty() {
            return LineAction::Continue;
        }

        if let Some(command) = parse_slash_command(input) {
            return self.handle_command(command, terminal);
        }

        let outcome = {
            let _busy = self.shutdown.begin_turn();
            self.orchestrator
                .run_turn(&mut self.conversation, input, terminal)
        };

        if let TurnOutcome::Cancelled { interrupted: true } = outcome {
            self.shutdown.request();
        }
        LineAction::Continue
    }

    fn handle_command(&mut self, command: SlashCommand, terminal: &mut dyn Terminal) -> LineAction {
        match command {
            SlashCommand::Help => terminal.write(&format!("{HELP_TEXT}\n")),
            SlashCommand::Clear => {
                self.conversation.truncate(self.startup);
                terminal.write("Conversation cleared\n");
            }
            SlashCommand::Quit => return LineAction::Quit,
            SlashCommand::Unknown(command) => {
                terminal.write(&format!("Unknown command: {command}\n"));
            }
        }
        LineAction::Continue
    }
}
