//! Maps one tool call to a gated, displayed action execution.

use agent_term::{StatusLine, Terminal};

use crate::confirm::{Confirmation, ConfirmationGate};
use crate::tools::{Action, ActionExecutor, DecodeError};

/// Outcome of dispatching one tool call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    /// Text returned to the model. Empty when the call was cancelled.
    pub result: String,
    /// False when the user declined the action; the batch must be abandoned.
    pub proceeded: bool,
    /// True when the decline also asked the process to shut down.
    pub interrupted: bool,
}

impl Dispatch {
    fn completed(result: impl Into<String>) -> Self {
        Self {
            result: result.into(),
            proceeded: true,
            interrupted: false,
        }
    }

    fn declined(decision: Confirmation) -> Self {
        Self {
            result: String::new(),
            proceeded: false,
            interrupted: decision == Confirmation::Interrupt,
        }
    }
}

pub struct ToolDispatcher {
    executor: Box<dyn ActionExecutor>,
    gate: Box<dyn ConfirmationGate>,
}

impl ToolDispatcher {
    pub fn new(executor: Box<dyn ActionExecutor>, gate: Box<dyn ConfirmationGate>) -> Self {
        Self { executor, gate }
    }

    /// Decodes `arguments`, asks for confirmation when the action is gated,
    /// then executes it. Status lines are written to `terminal` throughout.
    pub fn dispatch(&mut self, name: &str, arguments: &str, terminal: &mut dyn Terminal) -> Dispatch {
        let action = match Action::decode(name, arguments) {
            Ok(action) => action,
            Err(DecodeError::UnknownTool(tool)) => {
                tracing::info!(tool = %tool, "model requested an unknown tool");
                let result = format!("unknown tool '{tool}'");
                let line = StatusLine::new(&format!("{tool}(?)"), false);
                terminal.write(&line.pending());
                terminal.write(&line.resolved(&result));
                return Dispatch::completed(result);
            }
            Err(DecodeError::Arguments(error)) => {
                tracing::info!(tool = %error.tool, reason = %error.reason, "tool arguments rejected");
                let result = format!("fail: {error}");
                let line = StatusLine::new(&format!("{name}(?)"), false);
                terminal.write(&line.pending());
                terminal.write(&line.resolved(&result));
                return Dispatch::completed(result);
            }
        };

        let gated = action.is_gated();
        tracing::info!(
            tool = action.tool_name(),
            risk = action.risk_label(),
            gated,
            "dispatching action"
        );

        let line = StatusLine::new(&action.describe(), gated);
        terminal.write(&line.pending());

        if gated {
            let decision = self.gate.confirm();
            if !decision.proceeds() {
                tracing::info!(tool = action.tool_name(), ?decision, "action declined");
                terminal.write(&line.cancelled());
                return Dispatch::declined(decision);
            }
        }

        let outcome = self.executor.execute(&action);
        if !outcome.ok {
            tracing::debug!(tool = action.tool_name(), status = %outcome.status, "action failed");
        }
        terminal.write(&line.resolved(&outcome.status));
        Dispatch::completed(outcome.result)
    }
}
