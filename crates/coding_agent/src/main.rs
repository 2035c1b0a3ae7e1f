use std::process::ExitCode;
use std::sync::Arc;

use agent_term::{install_interrupt_handler, EnvConfig, ProcessTerminal, Terminal};
use coding_agent::app::App;
use coding_agent::config::AgentConfig;
use coding_agent::confirm::KeypressGate;
use coding_agent::dispatcher::ToolDispatcher;
use coding_agent::error::ConfigError;
use coding_agent::prompt::{load_system_prompt, load_tool_definitions};
use coding_agent::providers;
use coding_agent::runtime::TurnOrchestrator;
use coding_agent::shutdown::{InterruptAction, ShutdownState, FAREWELL};
use coding_agent::tools::BuiltinActionExecutor;

fn main() -> ExitCode {
    let _ = dotenvy::dotenv();

    let env = EnvConfig::from_env();
    if let Err(error) = agent_term::logging::init(&env) {
        eprintln!("Failed to initialize logging: {error}");
        return ExitCode::FAILURE;
    }

    let mut terminal = ProcessTerminal::new(&env);
    let (system_prompt, orchestrator) = match bootstrap(terminal) {
        Ok(parts) => parts,
        Err(error) => {
            tracing::error!(%error, "startup failed");
            eprintln!("{error}");
            return ExitCode::FAILURE;
        }
    };

    let shutdown = Arc::new(ShutdownState::new());
    let signal_state = Arc::clone(&shutdown);
    let _interrupts = match install_interrupt_handler(move |signal| {
        tracing::debug!(signal, "interrupt received");
        if signal_state.on_interrupt() == InterruptAction::ExitNow {
            println!("\n{FAREWELL}");
            std::process::exit(0);
        }
    }) {
        Ok(guard) => guard,
        Err(error) => {
            eprintln!("Failed to install interrupt handler: {error}");
            return ExitCode::FAILURE;
        }
    };

    let profile = orchestrator.provider().profile();
    terminal.write(&format!(
        "coding_agent ({} / {}). /help for commands.\n",
        profile.provider_id, profile.model_id
    ));

    let mut app = App::new(system_prompt, orchestrator, shutdown);
    match app.run(&mut terminal) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(%error, "input loop failed");
            eprintln!("Input error: {error}");
            ExitCode::FAILURE
        }
    }
}

fn bootstrap(keys: ProcessTerminal) -> Result<(String, TurnOrchestrator), ConfigError> {
    let config = AgentConfig::from_env()?;
    let system_prompt = load_system_prompt(config.system_prompt_path.as_deref())?;
    let tools = load_tool_definitions(&config.tools_path)?;
    let provider = providers::provider_from_config(&config)?;
    tracing::info!(
        provider = config.provider.id(),
        model = %config.model,
        tools = tools.len(),
        "agent configured"
    );

    let dispatcher = ToolDispatcher::new(
        Box::new(BuiltinActionExecutor::new(".")),
        Box::new(KeypressGate::new(keys)),
    );
    Ok((system_prompt, TurnOrchestrator::new(provider, tools, dispatcher)))
}
