//! Single-keypress classification.

const ESC: u8 = 0x1b;
const ETX: u8 = 0x03;

/// One keypress read from the interactive input device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Escape, or the first byte of any escape sequence (arrows, function keys).
    Escape,
    /// Ctrl-C delivered as a byte because raw mode disables `ISIG`.
    Interrupt,
    Char(u8),
}

impl Key {
    #[must_use]
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            ESC => Self::Escape,
            ETX => Self::Interrupt,
            other => Self::Char(other),
        }
    }

    /// True for keys that decline a pending action.
    #[must_use]
    pub fn cancels(self) -> bool {
        matches!(self, Self::Escape | Self::Interrupt)
    }
}
