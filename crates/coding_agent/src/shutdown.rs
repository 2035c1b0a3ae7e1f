//! Interrupt bookkeeping shared between the signal listener and the REPL.

use std::sync::atomic::{AtomicBool, Ordering};

pub const FAREWELL: &str = "See you later, alligator!";

/// What the signal listener should do with an interrupt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptAction {
    /// Nothing in flight (or a repeated interrupt): exit right away.
    ExitNow,
    /// A turn is running; it will stop the loop once the turn ends.
    Deferred,
}

#[derive(Debug, Default)]
pub struct ShutdownState {
    requested: AtomicBool,
    busy: AtomicBool,
}

impl ShutdownState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an interrupt and decides whether the process may exit now.
    pub fn on_interrupt(&self) -> InterruptAction {
        let already_requested = self.requested.swap(true, Ordering::SeqCst);
        if already_requested || !self.busy.load(Ordering::SeqCst) {
            InterruptAction::ExitNow
        } else {
            InterruptAction::Deferred
        }
    }

    /// Records a shutdown request that did not arrive as a signal.
    pub fn request(&self) {
        self.requested.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    /// Marks a turn as in flight until the guard drops.
    pub fn begin_turn(&self) -> BusyGuard<'_> {
        self.busy.store(true, Ordering::SeqCst);
        BusyGuard { state: self }
    }
}

pub struct BusyGuard<'a> {
    state: &'a ShutdownState,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.state.busy.store(false, Ordering::SeqCst);
    }
}
