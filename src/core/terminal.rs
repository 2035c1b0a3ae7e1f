//! Console capabilities consumed by the agent loop.

use std::io;

use crate::core::keys::Key;

/// Line-oriented console used for prompts, status lines and answers.
pub trait Terminal {
    /// Write output and flush it immediately.
    fn write(&mut self, data: &str);

    /// Read one line of user input without its line terminator.
    ///
    /// Returns `Ok(None)` at end of input.
    fn read_line(&mut self) -> io::Result<Option<String>>;
}

/// Blocking single-keypress input.
pub trait KeyReader {
    /// Wait for exactly one keypress. Returns `Ok(None)` at end of input.
    fn read_key(&mut self) -> io::Result<Option<Key>>;
}

impl<T: Terminal + ?Sized> Terminal for &mut T {
    fn write(&mut self, data: &str) {
        (**self).write(data);
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        (**self).read_line()
    }
}

impl<K: KeyReader + ?Sized> KeyReader for Box<K> {
    fn read_key(&mut self) -> io::Result<Option<Key>> {
        (**self).read_key()
    }
}
