#![allow(unused_imports)]

use agent_term::core::status_line::{CANCELLED, CONFIRM_HINT, MARKER};
use agent_term::{
    logging, EnvConfig, Key, KeyReader, ProcessTerminal, StatusLine, Terminal,
};

#[cfg(unix)]
use agent_term::{install_interrupt_handler, InterruptGuard, RawModeGuard};

#[test]
fn public_api_exports_compile() {}

#[test]
fn process_terminal_is_usable_through_trait_objects() {
    let terminal = ProcessTerminal::new(&EnvConfig::default());
    let _console: Box<dyn Terminal> = Box::new(terminal);
    let _keys: Box<dyn KeyReader> = Box::new(terminal);
}
