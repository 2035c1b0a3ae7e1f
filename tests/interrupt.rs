#![cfg(unix)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use agent_term::install_interrupt_handler;

fn wait_for(counter: &AtomicUsize, expected: usize) -> bool {
    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        if counter.load(Ordering::SeqCst) >= expected {
            return true;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    false
}

#[test]
fn interrupt_handler_observes_every_signal_until_dropped() {
    let seen = Arc::new(AtomicUsize::new(0));
    let guard = install_interrupt_handler({
        let seen = Arc::clone(&seen);
        move |signal| {
            assert!(signal == libc::SIGINT || signal == libc::SIGTERM);
            seen.fetch_add(1, Ordering::SeqCst);
        }
    })
    .expect("install interrupt handler");

    unsafe {
        libc::raise(libc::SIGTERM);
    }
    assert!(wait_for(&seen, 1), "first signal should be observed");

    unsafe {
        libc::raise(libc::SIGINT);
    }
    assert!(wait_for(&seen, 2), "second signal should be observed");

    drop(guard);
}
