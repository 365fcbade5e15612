//! Single-slot listing of the working directory.

use crate::error::GatewayError;
use crate::gateway::Gateway;
use crate::models::{DirectoryEntry, EntryId};

/// The most recently fetched entry list of the working directory.
///
/// One slot only: every navigation or mutation overwrites it with a fresh
/// listing. Name lookups are exact and case-sensitive; when the backend
/// returns duplicate names the first one wins.
#[derive(Clone, Debug, Default)]
pub struct DirectoryIndex {
    parent: Option<EntryId>,
    entries: Vec<DirectoryEntry>,
}

impl DirectoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from an already fetched listing.
    pub fn from_entries(parent: Option<EntryId>, entries: Vec<DirectoryEntry>) -> Self {
        Self { parent, entries }
    }

    /// Replace the slot with the current listing of `parent`.
    ///
    /// On failure the previous listing is kept.
    pub async fn refresh<G>(&mut self, gateway: &G, parent: Option<EntryId>) -> Result<(), GatewayError>
    where
        G: Gateway + ?Sized,
    {
        let entries = gateway.list_entries(parent).await?;
        self.parent = parent;
        self.entries = entries;
        Ok(())
    }

    /// Directory the listing belongs to.
    pub fn parent(&self) -> Option<EntryId> {
        self.parent
    }

    pub fn entries(&self) -> &[DirectoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First entry with exactly this name.
    pub fn find(&self, name: &str) -> Option<&DirectoryEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// First directory with exactly this name; files are skipped.
    pub fn find_dir(&self, name: &str) -> Option<&DirectoryEntry> {
        self.entries.iter().find(|e| e.is_dir && e.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn entry(id: u64, name: &str, is_dir: bool) -> DirectoryEntry {
        DirectoryEntry {
            id: EntryId(id),
            name: name.to_string(),
            is_dir,
            permissions: "rwx------".to_string(),
            owner: "alice".to_string(),
            parent: None,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            content: None,
        }
    }

    #[test]
    fn test_find_is_case_sensitive() {
        let index = DirectoryIndex::from_entries(None, vec![entry(1, "Notes", false)]);
        assert!(index.find("Notes").is_some());
        assert!(index.find("notes").is_none());
    }

    #[test]
    fn test_first_duplicate_wins() {
        let index = DirectoryIndex::from_entries(
            None,
            vec![entry(1, "a", false), entry(2, "a", false)],
        );
        assert_eq!(index.find("a").map(|e| e.id), Some(EntryId(1)));
    }

    #[test]
    fn test_find_dir_skips_files() {
        let index = DirectoryIndex::from_entries(
            None,
            vec![entry(1, "src", false), entry(2, "src", true)],
        );
        assert_eq!(index.find_dir("src").map(|e| e.id), Some(EntryId(2)));
        assert!(index.find_dir("missing").is_none());
    }
}
