//! Background interrupt listener.

use std::io;
use std::thread::{self, JoinHandle};

use signal_hook::iterator::{Handle, Signals};

/// Listener thread for SIGINT/SIGTERM. Dropping it stops the listener.
pub struct InterruptGuard {
    handle: Handle,
    thread: Option<JoinHandle<()>>,
}

impl Drop for InterruptGuard {
    fn drop(&mut self) {
        self.handle.close();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

/// Runs `on_interrupt` on a background thread for every SIGINT or SIGTERM.
///
/// The callback decides what an interrupt means; it may exit the process.
pub fn install_interrupt_handler<F>(on_interrupt: F) -> io::Result<InterruptGuard>
where
    F: Fn(i32) + Send + 'static,
{
    let mut signals = Signals::new([libc::SIGINT, libc::SIGTERM])?;
    let handle = signals.handle();

    let thread = thread::Builder::new()
        .name("interrupt-listener".to_string())
        .spawn(move || {
            for signal in signals.forever() {
                tracing::debug!(signal, "interrupt received");
                on_interrupt(signal);
            }
        })?;

    Ok(InterruptGuard {
        handle,
        thread: Some(thread),
    })
}
