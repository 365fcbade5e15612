//! Normal vs. capture input gate.

use crate::models::DirectoryEntry;

/// How the next submitted line is interpreted.
///
/// Capture is single-shot: the line submitted while `Capturing` is written to
/// `target` and the mode returns to `Normal` whether or not the write
/// succeeds. Capture cannot nest.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum InputMode {
    /// Lines are parsed as commands
    #[default]
    Normal,
    /// The next line is literal content for `target`
    Capturing {
        target: DirectoryEntry,
        append: bool,
    },
}

impl InputMode {
    pub fn capture(target: DirectoryEntry, append: bool) -> Self {
        Self::Capturing { target, append }
    }

    pub fn is_capturing(&self) -> bool {
        matches!(self, Self::Capturing { .. })
    }

    /// Leave capture mode, returning the pending target and append flag.
    pub fn take(&mut self) -> Option<(DirectoryEntry, bool)> {
        match std::mem::take(self) {
            Self::Capturing { target, append } => Some((target, append)),
            Self::Normal => None,
        }
    }
}
