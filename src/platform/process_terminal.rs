//! Process stdin/stdout terminal with scoped raw-mode key reads.

use std::io::{self, BufRead, Write};

use crate::config::EnvConfig;
use crate::core::keys::Key;
use crate::core::terminal::{KeyReader, Terminal};

#[cfg(unix)]
use libc::{self, c_int};

/// Window in which trailing bytes of a multi-byte key sequence are discarded.
#[cfg(unix)]
const SEQUENCE_DRAIN_MS: i32 = 10;

#[cfg(unix)]
fn get_termios(fd: c_int) -> io::Result<libc::termios> {
    let mut termios = unsafe { std::mem::zeroed::<libc::termios>() };
    let result = unsafe { libc::tcgetattr(fd, &mut termios) };
    if result != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(termios)
}

#[cfg(unix)]
fn set_termios(fd: c_int, termios: &libc::termios) -> io::Result<()> {
    let result = unsafe { libc::tcsetattr(fd, libc::TCSANOW, termios) };
    if result != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

#[cfg(unix)]
fn poll_readable(fd: c_int, timeout_ms: i32) -> bool {
    let mut fds = libc::pollfd {
        fd,
        events: libc::POLLIN,
        revents: 0,
    };
    let result = unsafe { libc::poll(&mut fds, 1, timeout_ms) };
    result > 0 && (fds.revents & libc::POLLIN) != 0
}

#[cfg(unix)]
fn is_tty(fd: c_int) -> bool {
    unsafe { libc::isatty(fd) == 1 }
}

/// Raw mode on one file descriptor, restored when dropped.
///
/// Restoration runs on every exit path, including unwinding, because it lives
/// in `Drop`.
#[cfg(unix)]
pub struct RawModeGuard {
    fd: c_int,
    original: libc::termios,
}

#[cfg(unix)]
impl RawModeGuard {
    pub fn enter(fd: c_int) -> io::Result<Self> {
        let original = get_termios(fd)?;
        let mut raw = original;
        unsafe {
            libc::cfmakeraw(&mut raw);
        }
        set_termios(fd, &raw)?;
        Ok(Self { fd, original })
    }
}

#[cfg(unix)]
impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if let Err(error) = set_termios(self.fd, &self.original) {
            tracing::warn!(%error, "failed to restore terminal mode");
        }
    }
}

/// Console over the process's stdin/stdout.
///
/// The type holds no buffers of its own, so separate instances can back the
/// line console and the key reader at the same time.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessTerminal {
    cooked_keys: bool,
}

impl ProcessTerminal {
    pub fn new(config: &EnvConfig) -> Self {
        Self {
            cooked_keys: config.cooked_keys,
        }
    }

    #[cfg(unix)]
    fn read_raw_key(&self) -> io::Result<Option<Key>> {
        let fd = libc::STDIN_FILENO;
        let _raw = RawModeGuard::enter(fd)?;
        let mut stdin = io::stdin().lock();

        let (first, available) = match stdin.fill_buf()? {
            [] => return Ok(None),
            buffer => (buffer[0], buffer.len()),
        };
        stdin.consume(available);

        // Arrow and function keys arrive as ESC plus a tail; drop the tail so
        // it does not show up in the next line read.
        while poll_readable(fd, SEQUENCE_DRAIN_MS) {
            let drained = match stdin.fill_buf() {
                Ok(buffer) if !buffer.is_empty() => buffer.len(),
                _ => break,
            };
            stdin.consume(drained);
        }

        Ok(Some(Key::from_byte(first)))
    }

    fn read_cooked_key(&self) -> io::Result<Option<Key>> {
        let mut stdin = io::stdin().lock();
        let first = match stdin.fill_buf()? {
            [] => return Ok(None),
            buffer => buffer[0],
        };
        stdin.consume(1);
        Ok(Some(Key::from_byte(first)))
    }
}

impl Terminal for ProcessTerminal {
    fn write(&mut self, data: &str) {
        let mut stdout = io::stdout().lock();
        if stdout
            .write_all(data.as_bytes())
            .and_then(|()| stdout.flush())
            .is_err()
        {
            tracing::debug!("stdout write failed");
        }
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }
}

impl KeyReader for ProcessTerminal {
    #[cfg(unix)]
    fn read_key(&mut self) -> io::Result<Option<Key>> {
        if self.cooked_keys || !is_tty(libc::STDIN_FILENO) {
            return self.read_cooked_key();
        }
        self.read_raw_key()
    }

    #[cfg(not(unix))]
    fn read_key(&mut self) -> io::Result<Option<Key>> {
        self.read_cooked_key()
    }
}
