//! Diagnostic tracing for the agent process.
//!
//! Status lines and answers go to stdout; diagnostics never do. Output goes to
//! stderr by default, or to `AGENT_TERM_LOG_FILE` with ANSI styling disabled so
//! it does not interleave with in-place status rewrites.

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::EnvConfig;

/// Initialize the global tracing subscriber.
///
/// Reads `RUST_LOG`. Defaults to `warn` if unset. A second call is a no-op.
///
/// # Example
/// ```bash
/// RUST_LOG=coding_agent=debug AGENT_TERM_LOG_FILE=agent.log coding_agent
/// ```
pub fn init(config: &EnvConfig) -> std::io::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let result = match config.log_file.as_deref() {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_writer(Mutex::new(file))
                        .with_ansi(false)
                        .compact(),
                )
                .try_init()
        }
        None => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr).compact())
            .try_init(),
    };

    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
    Ok(())
}
