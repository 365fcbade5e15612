//! Command execution result type.

use crate::models::{DirectoryEntry, EntryId};
use crate::path::PathSegment;

/// A view outside the terminal the front end should switch to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Navigation {
    /// Open the text editor on a file
    Editor(EntryId),
    MemoryViewer,
}

/// Working-directory change requested by `cd`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DirChange {
    Root,
    Up,
    Enter(PathSegment),
}

/// Session state change applied by the shell after the output is appended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    ChangeDir(DirChange),
    /// Route the next submitted line into `target`
    Capture { target: DirectoryEntry, append: bool },
    Navigate(Navigation),
    /// Empty the transcript
    Clear,
}

/// Result of executing a command.
///
/// Commands produce transcript lines and optionally one effect on the
/// session (e.g. a directory change for `cd`).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommandResult {
    /// Output lines to append, in order
    pub output: Vec<String>,
    pub effect: Option<Effect>,
}

impl CommandResult {
    /// Create a result with just output, no effect.
    pub fn output(lines: Vec<String>) -> Self {
        Self {
            output: lines,
            effect: None,
        }
    }

    /// A single output line.
    pub fn line(line: impl Into<String>) -> Self {
        Self::output(vec![line.into()])
    }

    /// Multi-line text, one output line per `\n`-separated piece.
    pub fn text(text: &str) -> Self {
        Self::output(text.split('\n').map(str::to_string).collect())
    }

    /// Create a result with an effect and no output.
    pub fn effect(effect: Effect) -> Self {
        Self {
            output: vec![],
            effect: Some(effect),
        }
    }

    /// Create an empty result (no output, no effect).
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.output.push(line.into());
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effect = Some(effect);
        self
    }
}
