//! Wire and domain types shared by the interpreter and the gateways.
//!
//! - [`DirectoryEntry`], [`EntryId`] - filesystem entries
//! - [`NewEntry`], [`EntryPatch`] - create and metadata-update requests
//! - [`ProcessInfo`], [`ProcessStatus`] - process table rows
//! - [`Quota`] - storage usage

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

// =============================================================================
// Identifiers
// =============================================================================

/// Backend identifier of a filesystem entry.
///
/// The root directory has no identifier; it is represented as
/// `Option::<EntryId>::None` wherever a parent id is expected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub u64);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Backend identifier of a process.
pub type ProcessId = u64;

// =============================================================================
// Directory Entry
// =============================================================================

/// A named node in the virtual filesystem.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    pub id: EntryId,
    pub name: String,
    #[serde(rename = "is_directory")]
    pub is_dir: bool,
    /// 9-character `rwx` string, e.g. `rwxr-xr--`
    pub permissions: String,
    #[serde(deserialize_with = "owner_name")]
    pub owner: String,
    #[serde(default)]
    pub parent: Option<EntryId>,
    pub created_at: DateTime<Utc>,
    /// Inline content as returned by the listing (files only)
    #[serde(default)]
    pub content: Option<String>,
}

impl DirectoryEntry {
    /// Display name with a trailing `/` for directories.
    pub fn display_name(&self) -> String {
        if self.is_dir {
            format!("{}/", self.name)
        } else {
            self.name.clone()
        }
    }
}

/// The backend reports owners either by user name or by numeric user id.
fn owner_name<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Owner {
        Name(String),
        Id(u64),
    }

    Ok(match Owner::deserialize(deserializer)? {
        Owner::Name(name) => name,
        Owner::Id(id) => id.to_string(),
    })
}

/// Request body for creating an entry.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewEntry {
    pub name: String,
    pub is_directory: bool,
    pub parent: Option<EntryId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl NewEntry {
    pub fn file(name: impl Into<String>, parent: Option<EntryId>) -> Self {
        Self {
            name: name.into(),
            is_directory: false,
            parent,
            content: None,
        }
    }

    pub fn directory(name: impl Into<String>, parent: Option<EntryId>) -> Self {
        Self {
            name: name.into(),
            is_directory: true,
            parent,
            content: None,
        }
    }
}

/// Partial metadata update; absent fields are left unchanged.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct EntryPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<String>,
}

impl EntryPatch {
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn permissions(permissions: impl Into<String>) -> Self {
        Self {
            permissions: Some(permissions.into()),
            ..Default::default()
        }
    }
}

// =============================================================================
// Processes
// =============================================================================

/// Scheduling state of a process.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcessStatus {
    #[default]
    Ready,
    Running,
    Blocked,
    Finished,
}

impl ProcessStatus {
    /// Whether `pkill` may terminate a process in this state.
    pub fn is_live(self) -> bool {
        matches!(self, Self::Ready | Self::Running)
    }
}

impl fmt::Display for ProcessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Ready => "Ready",
            Self::Running => "Running",
            Self::Blocked => "Blocked",
            Self::Finished => "Finished",
        };
        f.write_str(label)
    }
}

/// A row of the process table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessInfo {
    pub id: ProcessId,
    pub status: ProcessStatus,
    #[serde(default)]
    pub file_name: Option<String>,
}

// =============================================================================
// Quota
// =============================================================================

/// Storage usage of the signed-in user, in bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quota {
    #[serde(rename = "storage_used")]
    pub used: u64,
    #[serde(rename = "storage_limit")]
    pub limit: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_from_backend_json() {
        let json = r#"{
            "id": 7,
            "name": "notes.txt",
            "is_directory": false,
            "owner": 3,
            "parent": null,
            "permissions": "rw-r--r--",
            "created_at": "2024-03-05T10:20:30.123456Z",
            "content": "hello"
        }"#;
        let entry: DirectoryEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.id, EntryId(7));
        assert_eq!(entry.owner, "3");
        assert!(entry.parent.is_none());
        assert!(!entry.is_dir);
        assert_eq!(entry.content.as_deref(), Some("hello"));
        assert_eq!(entry.created_at.format("%Y-%m-%d").to_string(), "2024-03-05");
    }

    #[test]
    fn test_entry_owner_name_and_null_content() {
        let json = r#"{
            "id": 1, "name": "docs", "is_directory": true, "owner": "alice",
            "parent": 4, "permissions": "rwx------",
            "created_at": "2024-03-05T10:20:30+00:00", "content": null
        }"#;
        let entry: DirectoryEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.owner, "alice");
        assert_eq!(entry.parent, Some(EntryId(4)));
        assert!(entry.content.is_none());
        assert_eq!(entry.display_name(), "docs/");
    }

    #[test]
    fn test_new_entry_serializes_null_parent() {
        let body = serde_json::to_value(NewEntry::directory("src", None)).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"name": "src", "is_directory": true, "parent": null})
        );
    }

    #[test]
    fn test_patch_skips_absent_fields() {
        let body = serde_json::to_value(EntryPatch::permissions("rwxr-xr--")).unwrap();
        assert_eq!(body, serde_json::json!({"permissions": "rwxr-xr--"}));
    }

    #[test]
    fn test_process_and_quota_json() {
        let rows: Vec<ProcessInfo> = serde_json::from_str(
            r#"[{"id": 5, "owner": 1, "file_object": 9, "file_name": "a.out", "status": "Running"}]"#,
        )
        .unwrap();
        assert_eq!(rows[0].status, ProcessStatus::Running);
        assert_eq!(rows[0].file_name.as_deref(), Some("a.out"));

        let quota: Quota =
            serde_json::from_str(r#"{"storage_used": 12, "storage_limit": 10000}"#).unwrap();
        assert_eq!(quota, Quota { used: 12, limit: 10000 });
    }

    #[test]
    fn test_live_status() {
        assert!(ProcessStatus::Ready.is_live());
        assert!(ProcessStatus::Running.is_live());
        assert!(!ProcessStatus::Blocked.is_live());
        assert!(!ProcessStatus::Finished.is_live());
    }
}
