mod support;

use std::sync::{Arc, Mutex};

use agent_provider::{
    CompletionError, CompletionProvider, Message, ProviderProfile, Role, ToolDefinition,
};
use agent_provider_mock::{MockProvider, ScriptedReply};
use coding_agent::app::{App, LineAction};
use coding_agent::confirm::Confirmation;
use coding_agent::dispatcher::ToolDispatcher;
use coding_agent::runtime::TurnOrchestrator;
use coding_agent::shutdown::{InterruptAction, ShutdownState};
use coding_agent::tools::BuiltinActionExecutor;
use support::{
    call, lock_unpoisoned, rendered_output, roles, GateTrace, Harness, RecordingGate,
    SharedTerminal,
};

const SYSTEM: &str = "be brief";

struct Fixture {
    provider: Arc<MockProvider>,
    gate: Arc<Mutex<GateTrace>>,
}

impl Fixture {
    fn gate_asked(&self) -> usize {
        lock_unpoisoned(&self.gate).asked
    }
}

fn app(replies: Vec<ScriptedReply>, decisions: &[Confirmation]) -> (App, Fixture, Arc<ShutdownState>) {
    let Harness {
        provider,
        gate,
        orchestrator,
    } = Harness::new(&std::env::temp_dir(), replies, decisions);
    let shutdown = Arc::new(ShutdownState::new());
    let app = App::new(SYSTEM, orchestrator, Arc::clone(&shutdown));
    (app, Fixture { provider, gate }, shutdown)
}

#[test]
fn runs_until_end_of_input_and_says_goodbye() {
    let (mut app, fixture, _) = app(vec![ScriptedReply::text("hi there")], &[]);
    let (mut terminal, trace) = SharedTerminal::new(&["hello"]);

    app.run(&mut terminal).expect("loop should end cleanly");

    let output = rendered_output(&trace);
    assert!(output.starts_with("> hi there\n> "), "{output}");
    assert!(output.ends_with("See you later, alligator!\n"), "{output}");
    assert_eq!(fixture.provider.request_count(), 1);
    assert_eq!(
        roles(app.conversation()),
        vec![Role::System, Role::User, Role::Assistant]
    );
}

#[test]
fn blank_lines_are_ignored() {
    let (mut app, fixture, _) = app(Vec::new(), &[]);
    let (mut terminal, _) = SharedTerminal::new(&[]);

    assert_eq!(app.handle_line("   ", &mut terminal), LineAction::Continue);
    assert_eq!(fixture.provider.request_count(), 0);
    assert_eq!(app.conversation().len(), 1);
}

#[test]
fn slash_commands_do_not_reach_the_model() {
    let (mut app, fixture, _) = app(vec![ScriptedReply::text("answer")], &[]);
    let (mut terminal, trace) = SharedTerminal::new(&[]);

    app.handle_line("what is this", &mut terminal);
    assert_eq!(app.conversation().len(), 3);

    assert_eq!(app.handle_line("/help", &mut terminal), LineAction::Continue);
    assert_eq!(app.handle_line("/bogus", &mut terminal), LineAction::Continue);
    assert_eq!(app.handle_line("/clear", &mut terminal), LineAction::Continue);
    assert_eq!(app.conversation().snapshot(), &[Message::system(SYSTEM)]);
    assert_eq!(app.handle_line("/quit", &mut terminal), LineAction::Quit);

    let output = rendered_output(&trace);
    assert!(output.contains("/clear"));
    assert!(output.contains("Unknown command: /bogus\n"));
    assert!(output.contains("Conversation cleared\n"));
    assert_eq!(fixture.provider.request_count(), 1);
}

#[test]
fn quit_command_stops_reading_lines() {
    let (mut app, fixture, _) = app(Vec::new(), &[]);
    let (mut terminal, trace) = SharedTerminal::new(&["/quit", "never read"]);

    app.run(&mut terminal).expect("loop should end cleanly");

    assert_eq!(fixture.provider.request_count(), 0);
    assert_eq!(lock_unpoisoned(&trace).lines.len(), 1);
}

#[test]
fn ctrl_c_during_confirmation_ends_the_loop_after_rollback() {
    let (mut app, fixture, shutdown) = app(
        vec![ScriptedReply::tool_calls(vec![call(
            "call-1",
            "run_shell",
            r#"{"command":"touch should-not-exist"}"#,
        )])],
        &[Confirmation::Interrupt],
    );
    let (mut terminal, trace) = SharedTerminal::new(&["make a file", "never read"]);

    app.run(&mut terminal).expect("loop should end cleanly");

    assert!(shutdown.is_requested());
    assert_eq!(app.conversation().len(), 2);
    assert_eq!(fixture.gate_asked(), 1);
    assert_eq!(lock_unpoisoned(&trace).lines.len(), 1);
}

/// Provider that receives an interrupt while its completion is in flight.
struct InterruptedProvider {
    shutdown: Arc<ShutdownState>,
    observed: Mutex<Vec<InterruptAction>>,
}

impl CompletionProvider for InterruptedProvider {
    fn profile(&self) -> ProviderProfile {
        ProviderProfile {
            provider_id: "interrupted".to_string(),
            model_id: "test".to_string(),
        }
    }

    fn complete(
        &self,
        _messages: &[Message],
        _tools: &[ToolDefinition],
    ) -> Result<Message, CompletionError> {
        lock_unpoisoned(&self.observed).push(self.shutdown.on_interrupt());
        Ok(Message::assistant("finished anyway"))
    }
}

#[test]
fn signal_during_turn_is_honored_before_the_next_prompt() {
    let shutdown = Arc::new(ShutdownState::new());
    let provider = Arc::new(InterruptedProvider {
        shutdown: Arc::clone(&shutdown),
        observed: Mutex::new(Vec::new()),
    });
    let (gate, _) = RecordingGate::new(&[]);
    let dispatcher = ToolDispatcher::new(
        Box::new(BuiltinActionExecutor::new(std::env::temp_dir())),
        Box::new(gate),
    );
    let orchestrator = TurnOrchestrator::new(
        Arc::clone(&provider) as Arc<dyn CompletionProvider>,
        Vec::new(),
        dispatcher,
    );
    let mut app = App::new(SYSTEM, orchestrator, Arc::clone(&shutdown));
    let (mut terminal, trace) = SharedTerminal::new(&["one", "two"]);

    app.run(&mut terminal).expect("loop should end cleanly");

    assert_eq!(
        *lock_unpoisoned(&provider.observed),
        vec![InterruptAction::Deferred]
    );
    assert_eq!(
        app.conversation().snapshot(),
        &[
            Message::system(SYSTEM),
            Message::user("one"),
            Message::assistant("finished anyway"),
        ]
    );
    assert!(shutdown.is_requested());
    assert_eq!(
        lock_unpoisoned(&trace).lines,
        vec!["two".to_string()]
    );
    assert!(rendered_output(&trace).contains("finished anyway\n"));
}

#[test]
fn interrupt_recorded_while_idle_stops_the_loop_before_reading() {
    let (mut app, fixture, shutdown) = app(vec![ScriptedReply::text("first")], &[]);
    let (mut terminal, trace) = SharedTerminal::new(&["one"]);

    shutdown.request();
    app.run(&mut terminal).expect("loop should end cleanly");

    assert_eq!(fixture.provider.request_count(), 0);
    assert_eq!(lock_unpoisoned(&trace).lines.len(), 1);
}
