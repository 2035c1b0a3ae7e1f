//! In-place action status lines.
//!
//! A status line is printed once as a pending prompt and later overwritten by
//! returning the cursor to column zero. The resolution is padded with spaces
//! so no part of the longer pending text survives.

use unicode_width::UnicodeWidthStr;

pub const MARKER: &str = "● ";
pub const CONFIRM_HINT: &str = " [Enter/Esc] ";
pub const CANCELLED: &str = "=> cancelled";

/// Pending/resolved rendering of one dispatched action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    prompt: String,
    gated: bool,
}

impl StatusLine {
    /// `description` is the action summary without the marker, e.g. `Read('a.txt')`.
    #[must_use]
    pub fn new(description: &str, gated: bool) -> Self {
        Self {
            prompt: format!("{MARKER}{description}"),
            gated,
        }
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Text shown while the action waits for confirmation or runs.
    #[must_use]
    pub fn pending(&self) -> String {
        if self.gated {
            format!("{}{CONFIRM_HINT}", self.prompt)
        } else {
            format!("{} ", self.prompt)
        }
    }

    /// Suffix appended after a declined confirmation; ends the line.
    #[must_use]
    pub fn cancelled(&self) -> String {
        format!("{CANCELLED}\n")
    }

    /// Carriage-return rewrite of the pending text with the final outcome.
    #[must_use]
    pub fn resolved(&self, status: &str) -> String {
        let line = format!("{} => {status}", self.prompt);
        let pad = self
            .pending()
            .width()
            .saturating_sub(line.width());
        format!("\r{line}{}\n", " ".repeat(pad))
    }
}

#[cfg(test)]
mod tests {
    use unicode_width::UnicodeWidthStr;

    use super::StatusLine;

    #[test]
    fn gated_pending_prompt_carries_confirmation_hint() {
        let line = StatusLine::new("Write('a.txt', 3 lines)", true);
        assert_eq!(line.pending(), "● Write('a.txt', 3 lines) [Enter/Esc] ");
        assert_eq!(line.cancelled(), "=> cancelled\n");
    }

    #[test]
    fn ungated_pending_prompt_has_no_hint() {
        let line = StatusLine::new("Read('a.txt')", false);
        assert_eq!(line.pending(), "● Read('a.txt') ");
    }

    #[test]
    fn resolution_overwrites_longer_pending_text() {
        let line = StatusLine::new("Edit('a.txt')", true);
        let resolved = line.resolved("ok");

        assert!(resolved.starts_with("\r● Edit('a.txt') => ok"));
        assert!(resolved.ends_with('\n'));
        let visible = resolved.trim_start_matches('\r').trim_end_matches('\n');
        assert_eq!(visible.chars().count(), line.pending().chars().count());
    }

    #[test]
    fn resolution_longer_than_pending_is_not_padded() {
        let line = StatusLine::new("Read('a')", false);
        assert_eq!(
            line.resolved("fail: No such file or directory"),
            "\r● Read('a') => fail: No such file or directory\n"
        );
    }

    #[test]
    fn padding_uses_display_width_for_wide_text() {
        let line = StatusLine::new("Edit('日本')", true);
        let resolved = line.resolved("ok");

        let visible = resolved.trim_start_matches('\r').trim_end_matches('\n');
        assert_eq!(visible.width(), line.pending().width());
        assert_eq!(visible.len() - visible.trim_end().len(), 7);
    }
}
