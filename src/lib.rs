//! Console primitives for an interactive, human-gated coding agent.
//!
//! Invariant: raw mode is only ever entered through [`RawModeGuard`], so the
//! prior terminal mode is restored on every exit path of a key read.
//!
//! # Public API Overview
//! - Read user lines and write output through the [`Terminal`] trait.
//! - Read single confirmation keys through [`KeyReader`].
//! - Render pending/resolved action lines with [`StatusLine`].
//! - Listen for SIGINT/SIGTERM with [`install_interrupt_handler`].
//! - Load [`EnvConfig`] and install tracing via [`logging::init`].

pub mod config;
pub mod logging;

pub mod core;
pub mod platform;

pub use crate::config::EnvConfig;
pub use crate::core::keys::Key;
pub use crate::core::status_line::StatusLine;
pub use crate::core::terminal::{KeyReader, Terminal};
pub use crate::platform::ProcessTerminal;

#[cfg(unix)]
pub use crate::platform::{install_interrupt_handler, InterruptGuard, RawModeGuard};
