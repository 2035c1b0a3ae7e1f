//! Platform-specific terminal integrations.

pub mod process_terminal;
#[cfg(unix)]
pub mod signals;

pub use process_terminal::ProcessTerminal;
#[cfg(unix)]
pub use process_terminal::RawModeGuard;
#[cfg(unix)]
pub use signals::{install_interrupt_handler, InterruptGuard};
