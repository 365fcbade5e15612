//! Working-directory stack.

use crate::config::{PATH_SEPARATOR, ROOT_NAME};
use crate::models::EntryId;

/// One level of the working-directory stack.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathSegment {
    /// `None` only for the synthetic root
    pub id: Option<EntryId>,
    pub name: String,
}

impl PathSegment {
    pub fn root() -> Self {
        Self {
            id: None,
            name: ROOT_NAME.to_string(),
        }
    }

    pub fn new(id: EntryId, name: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            name: name.into(),
        }
    }
}

/// Ordered stack of directories from the root to the working directory.
///
/// The stack is never empty: index 0 is always the root segment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathState {
    segments: Vec<PathSegment>,
}

impl PathState {
    pub fn new() -> Self {
        Self {
            segments: vec![PathSegment::root()],
        }
    }

    /// Identifier of the working directory (`None` at the root).
    pub fn current_id(&self) -> Option<EntryId> {
        self.segments.last().and_then(|s| s.id)
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn push(&mut self, segment: PathSegment) {
        self.segments.push(segment);
    }

    /// Leave the working directory. The root is a floor: popping it is a no-op.
    pub fn pop(&mut self) {
        if self.segments.len() > 1 {
            self.segments.pop();
        }
    }

    pub fn reset(&mut self) {
        self.segments.truncate(1);
    }

    /// Segment names joined with `/`, e.g. `~/projects/demo`.
    pub fn display(&self) -> String {
        self.segments
            .iter()
            .map(|s| s.name.as_str())
            .collect::<Vec<_>>()
            .join(PATH_SEPARATOR)
    }
}

impl Default for PathState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_root() {
        let path = PathState::new();
        assert_eq!(path.depth(), 1);
        assert_eq!(path.current_id(), None);
        assert_eq!(path.display(), "~");
    }

    #[test]
    fn test_pop_at_root_is_noop() {
        let mut path = PathState::new();
        path.pop();
        path.pop();
        assert_eq!(path.depth(), 1);
        assert_eq!(path.segments()[0], PathSegment::root());
    }

    #[test]
    fn test_push_pop() {
        let mut path = PathState::new();
        path.push(PathSegment::new(EntryId(4), "docs"));
        path.push(PathSegment::new(EntryId(9), "drafts"));
        assert_eq!(path.display(), "~/docs/drafts");
        assert_eq!(path.current_id(), Some(EntryId(9)));

        path.pop();
        assert_eq!(path.depth(), 2);
        assert_eq!(path.current_id(), Some(EntryId(4)));
    }

    #[test]
    fn test_reset() {
        let mut path = PathState::new();
        path.push(PathSegment::new(EntryId(4), "docs"));
        path.reset();
        assert_eq!(path, PathState::new());
    }
}
