//! In-process backend with the same rules as the REST service.

use std::cell::RefCell;
use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};

use super::Gateway;
use crate::config::{DEFAULT_PERMISSIONS, DEFAULT_STORAGE_LIMIT};
use crate::error::GatewayError;
use crate::models::{
    DirectoryEntry, EntryId, EntryPatch, NewEntry, ProcessId, ProcessInfo, ProcessStatus, Quota,
};

/// A content write observed by the gateway.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WriteRecord {
    pub id: EntryId,
    pub content: String,
    pub append: bool,
}

#[derive(Clone, Debug)]
struct StoredProcess {
    file: EntryId,
    status: ProcessStatus,
}

#[derive(Debug)]
struct State {
    entries: BTreeMap<EntryId, DirectoryEntry>,
    processes: BTreeMap<ProcessId, StoredProcess>,
    next_id: u64,
    next_pid: ProcessId,
    clock: DateTime<Utc>,
    used: u64,
    limit: u64,
    offline: bool,
    writes: Vec<WriteRecord>,
}

/// [`Gateway`] keeping one user's filesystem and process table in memory.
///
/// Mirrors the backend: new entries get `rwx------`, reading needs the owner
/// `r` bit, writing the `w` bit and spawning the `x` bit; appends join with a
/// newline; growth beyond the storage limit is rejected. Creation timestamps
/// advance one minute per entry so ordering is deterministic.
#[derive(Debug)]
pub struct MemoryGateway {
    owner: String,
    state: RefCell<State>,
}

impl MemoryGateway {
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            state: RefCell::new(State {
                entries: BTreeMap::new(),
                processes: BTreeMap::new(),
                next_id: 1,
                next_pid: 1,
                clock: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().unwrap_or_default(),
                used: 0,
                limit: DEFAULT_STORAGE_LIMIT,
                offline: false,
                writes: Vec::new(),
            }),
        }
    }

    pub fn with_limit(self, limit: u64) -> Self {
        self.state.borrow_mut().limit = limit;
        self
    }

    /// Make every subsequent call fail with a network error (or recover).
    pub fn set_offline(&self, offline: bool) {
        self.state.borrow_mut().offline = offline;
    }

    /// Create a directory directly, bypassing the async API.
    pub fn seed_dir(&self, parent: Option<EntryId>, name: &str) -> EntryId {
        self.insert(NewEntry::directory(name, parent)).id
    }

    /// Create a file with content directly, bypassing the async API.
    pub fn seed_file(&self, parent: Option<EntryId>, name: &str, content: &str) -> EntryId {
        let mut entry = NewEntry::file(name, parent);
        entry.content = Some(content.to_string());
        self.insert(entry).id
    }

    pub fn content(&self, id: EntryId) -> Option<String> {
        self.state
            .borrow()
            .entries
            .get(&id)
            .map(|e| e.content.clone().unwrap_or_default())
    }

    pub fn entry(&self, id: EntryId) -> Option<DirectoryEntry> {
        self.state.borrow().entries.get(&id).cloned()
    }

    /// Every content write received so far, oldest first.
    pub fn writes(&self) -> Vec<WriteRecord> {
        self.state.borrow().writes.clone()
    }

    pub fn set_process_status(&self, pid: ProcessId, status: ProcessStatus) {
        if let Some(process) = self.state.borrow_mut().processes.get_mut(&pid) {
            process.status = status;
        }
    }

    fn insert(&self, new: NewEntry) -> DirectoryEntry {
        let mut state = self.state.borrow_mut();
        let id = EntryId(state.next_id);
        state.next_id += 1;
        state.clock += Duration::minutes(1);

        let entry = DirectoryEntry {
            id,
            name: new.name,
            is_dir: new.is_directory,
            permissions: DEFAULT_PERMISSIONS.to_string(),
            owner: self.owner.clone(),
            parent: new.parent,
            created_at: state.clock,
            content: if new.is_directory { None } else { new.content },
        };
        state.used += entry.content.as_ref().map(|c| c.len() as u64).unwrap_or(0);
        state.entries.insert(id, entry.clone());
        entry
    }

    fn check_online(&self) -> Result<(), GatewayError> {
        if self.state.borrow().offline {
            Err(GatewayError::Network("backend unreachable".to_string()))
        } else {
            Ok(())
        }
    }

    fn file(&self, id: EntryId) -> Result<DirectoryEntry, GatewayError> {
        match self.state.borrow().entries.get(&id) {
            Some(entry) if !entry.is_dir => Ok(entry.clone()),
            _ => Err(GatewayError::NotFound),
        }
    }
}

/// Whether the owner bit at `slot` (0 = r, 1 = w, 2 = x) is granted.
///
/// Short permission strings grant everything they do not mention.
fn owner_may(permissions: &str, slot: usize, bit: char) -> bool {
    permissions.chars().nth(slot).is_none_or(|c| c == bit)
}

#[async_trait(?Send)]
impl Gateway for MemoryGateway {
    async fn list_entries(&self, parent: Option<EntryId>) -> Result<Vec<DirectoryEntry>, GatewayError> {
        self.check_online()?;
        let state = self.state.borrow();
        let mut entries: Vec<DirectoryEntry> = state
            .entries
            .values()
            .filter(|e| e.parent == parent)
            .cloned()
            .collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(entries)
    }

    async fn create_entry(&self, entry: NewEntry) -> Result<DirectoryEntry, GatewayError> {
        self.check_online()?;
        if entry.name.is_empty() {
            return Err(GatewayError::Invalid("name is required".to_string()));
        }
        if let Some(parent) = entry.parent {
            let state = self.state.borrow();
            match state.entries.get(&parent) {
                Some(p) if p.is_dir => {}
                _ => return Err(GatewayError::Invalid("parent is not a directory".to_string())),
            }
        }
        let size = entry.content.as_ref().map(|c| c.len() as u64).unwrap_or(0);
        {
            let state = self.state.borrow();
            if state.used + size > state.limit {
                return Err(GatewayError::QuotaExceeded);
            }
        }
        Ok(self.insert(entry))
    }

    async fn delete_entry(&self, id: EntryId) -> Result<(), GatewayError> {
        self.check_online()?;
        let mut state = self.state.borrow_mut();
        if !state.entries.contains_key(&id) {
            return Err(GatewayError::NotFound);
        }

        let mut doomed = vec![id];
        let mut cursor = 0;
        while cursor < doomed.len() {
            let current = doomed[cursor];
            doomed.extend(
                state
                    .entries
                    .values()
                    .filter(|e| e.parent == Some(current))
                    .map(|e| e.id),
            );
            cursor += 1;
        }

        for id in &doomed {
            if let Some(entry) = state.entries.remove(id) {
                let size = entry.content.map(|c| c.len() as u64).unwrap_or(0);
                state.used = state.used.saturating_sub(size);
            }
        }
        state.processes.retain(|_, p| !doomed.contains(&p.file));
        Ok(())
    }

    async fn patch_entry(&self, id: EntryId, patch: EntryPatch) -> Result<(), GatewayError> {
        self.check_online()?;
        let mut state = self.state.borrow_mut();
        let entry = state.entries.get_mut(&id).ok_or(GatewayError::NotFound)?;
        if let Some(name) = patch.name {
            entry.name = name;
        }
        if let Some(permissions) = patch.permissions {
            entry.permissions = permissions;
        }
        Ok(())
    }

    async fn read_content(&self, id: EntryId) -> Result<String, GatewayError> {
        self.check_online()?;
        let entry = self.file(id)?;
        if !owner_may(&entry.permissions, 0, 'r') {
            return Err(GatewayError::PermissionDenied("read not allowed".to_string()));
        }
        Ok(entry.content.unwrap_or_default())
    }

    async fn write_content(&self, id: EntryId, content: &str, append: bool) -> Result<(), GatewayError> {
        self.check_online()?;
        let entry = self.file(id)?;
        self.state.borrow_mut().writes.push(WriteRecord {
            id,
            content: content.to_string(),
            append,
        });
        if !owner_may(&entry.permissions, 1, 'w') {
            return Err(GatewayError::PermissionDenied("write not allowed".to_string()));
        }

        let old = entry.content.unwrap_or_default();
        let new = if append {
            let separator = if !old.is_empty() && !content.is_empty() { "\n" } else { "" };
            format!("{}{}{}", old, separator, content)
        } else {
            content.to_string()
        };

        let mut state = self.state.borrow_mut();
        let (old_len, new_len) = (old.len() as u64, new.len() as u64);
        if new_len > old_len && state.used + (new_len - old_len) > state.limit {
            return Err(GatewayError::QuotaExceeded);
        }
        state.used = (state.used + new_len).saturating_sub(old_len);
        if let Some(stored) = state.entries.get_mut(&id) {
            stored.content = Some(new);
        }
        Ok(())
    }

    async fn create_process(&self, file: EntryId) -> Result<ProcessId, GatewayError> {
        self.check_online()?;
        let entry = self
            .file(file)
            .map_err(|_| GatewayError::Invalid("invalid program file".to_string()))?;
        if !owner_may(&entry.permissions, 2, 'x') {
            return Err(GatewayError::PermissionDenied("execute not allowed".to_string()));
        }

        let mut state = self.state.borrow_mut();
        let pid = state.next_pid;
        state.next_pid += 1;
        state.processes.insert(
            pid,
            StoredProcess {
                file,
                status: ProcessStatus::Ready,
            },
        );
        Ok(pid)
    }

    async fn list_processes(&self) -> Result<Vec<ProcessInfo>, GatewayError> {
        self.check_online()?;
        let state = self.state.borrow();
        Ok(state
            .processes
            .iter()
            .map(|(pid, p)| ProcessInfo {
                id: *pid,
                status: p.status,
                file_name: state.entries.get(&p.file).map(|e| e.name.clone()),
            })
            .collect())
    }

    async fn kill_process(&self, pid: ProcessId) -> Result<(), GatewayError> {
        self.check_online()?;
        self.state
            .borrow_mut()
            .processes
            .remove(&pid)
            .map(|_| ())
            .ok_or(GatewayError::NotFound)
    }

    async fn kill_by_name(&self, name: &str) -> Result<u64, GatewayError> {
        self.check_online()?;
        if name.is_empty() {
            return Err(GatewayError::Invalid("name is required".to_string()));
        }

        let mut state = self.state.borrow_mut();
        let State {
            entries, processes, ..
        } = &mut *state;
        let before = processes.len();
        processes.retain(|_, p| {
            let matches = entries.get(&p.file).is_some_and(|e| e.name == name);
            !(matches && p.status.is_live())
        });
        Ok((before - processes.len()) as u64)
    }

    async fn quota(&self) -> Result<Quota, GatewayError> {
        self.check_online()?;
        let state = self.state.borrow();
        Ok(Quota {
            used: state.used,
            limit: state.limit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_listing_sorted_by_name() {
        let gw = MemoryGateway::new("alice");
        gw.seed_file(None, "zeta", "");
        gw.seed_dir(None, "alpha");
        let docs = gw.seed_dir(None, "docs");
        gw.seed_file(Some(docs), "inner", "");

        let names: Vec<String> = gw
            .list_entries(None)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["alpha", "docs", "zeta"]);
        assert_eq!(gw.list_entries(Some(docs)).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_append_joins_with_newline() {
        let gw = MemoryGateway::new("alice");
        let id = gw.seed_file(None, "log", "");
        gw.write_content(id, "first", true).await.unwrap();
        gw.write_content(id, "second", true).await.unwrap();
        assert_eq!(gw.content(id).as_deref(), Some("first\nsecond"));

        gw.write_content(id, "reset", false).await.unwrap();
        assert_eq!(gw.read_content(id).await.unwrap(), "reset");
        assert_eq!(gw.writes().len(), 3);
    }

    #[tokio::test]
    async fn test_permission_bits_enforced() {
        let gw = MemoryGateway::new("alice");
        let id = gw.seed_file(None, "secret", "x");
        gw.patch_entry(id, EntryPatch::permissions("---------"))
            .await
            .unwrap();

        assert!(matches!(
            gw.read_content(id).await,
            Err(GatewayError::PermissionDenied(_))
        ));
        assert!(matches!(
            gw.write_content(id, "y", false).await,
            Err(GatewayError::PermissionDenied(_))
        ));
        assert!(matches!(
            gw.create_process(id).await,
            Err(GatewayError::PermissionDenied(_))
        ));
    }

    #[tokio::test]
    async fn test_quota_rejects_growth() {
        let gw = MemoryGateway::new("alice").with_limit(5);
        let id = gw.seed_file(None, "f", "");
        gw.write_content(id, "12345", false).await.unwrap();
        assert_eq!(
            gw.write_content(id, "6", true).await,
            Err(GatewayError::QuotaExceeded)
        );
        gw.write_content(id, "1", false).await.unwrap();
        assert_eq!(gw.quota().await.unwrap(), Quota { used: 1, limit: 5 });
    }

    #[tokio::test]
    async fn test_delete_removes_subtree_and_processes() {
        let gw = MemoryGateway::new("alice");
        let dir = gw.seed_dir(None, "bin");
        let prog = gw.seed_file(Some(dir), "prog", "");
        gw.create_process(prog).await.unwrap();

        gw.delete_entry(dir).await.unwrap();
        assert!(gw.entry(prog).is_none());
        assert!(gw.list_processes().await.unwrap().is_empty());
        assert_eq!(gw.delete_entry(dir).await, Err(GatewayError::NotFound));
    }

    #[tokio::test]
    async fn test_kill_by_name_only_live() {
        let gw = MemoryGateway::new("alice");
        let prog = gw.seed_file(None, "worker", "");
        let a = gw.create_process(prog).await.unwrap();
        let b = gw.create_process(prog).await.unwrap();
        let c = gw.create_process(prog).await.unwrap();
        gw.set_process_status(b, ProcessStatus::Running);
        gw.set_process_status(c, ProcessStatus::Finished);

        assert_eq!(gw.kill_by_name("worker").await.unwrap(), 2);
        let left = gw.list_processes().await.unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].id, c);
        assert_ne!(a, c);
    }

    #[tokio::test]
    async fn test_offline() {
        let gw = MemoryGateway::new("alice");
        gw.set_offline(true);
        assert!(matches!(
            gw.list_entries(None).await,
            Err(GatewayError::Network(_))
        ));
        gw.set_offline(false);
        assert!(gw.list_entries(None).await.is_ok());
    }

    #[test]
    fn test_owner_may() {
        assert!(owner_may("rwx------", 0, 'r'));
        assert!(!owner_may("-wx------", 0, 'r'));
        assert!(owner_may("", 2, 'x'));
    }
}
