//! Append-only terminal transcript.

/// Ordered lines shown to the user.
///
/// Lines are only ever appended; [`clear`](Self::clear) replaces the whole
/// sequence with an empty one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TranscriptLog {
    lines: Vec<String>,
}

impl TranscriptLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn extend(&mut self, lines: impl IntoIterator<Item = String>) {
        self.lines.extend(lines);
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn last(&self) -> Option<&str> {
        self.lines.last().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
