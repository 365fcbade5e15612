//! Boundary to the filesystem/process backend.
//!
//! - [`Gateway`] - the operations the interpreter consumes
//! - [`HttpGateway`] - REST client for the backend API
//! - `MemoryGateway` - in-process backend for tests and offline sessions
//!   (feature `mock`)
//!
//! Futures are not `Send`: in the browser every call runs on the single UI
//! thread and is awaited to completion before the next line is dispatched.

mod http;
#[cfg(any(test, feature = "mock"))]
mod memory;

pub use http::HttpGateway;
#[cfg(any(test, feature = "mock"))]
pub use memory::{MemoryGateway, WriteRecord};

use async_trait::async_trait;

use crate::error::GatewayError;
use crate::models::{DirectoryEntry, EntryId, EntryPatch, NewEntry, ProcessId, ProcessInfo, Quota};

/// Filesystem and process operations provided by the backend.
///
/// All calls are scoped to the signed-in user. A `parent` of `None` denotes
/// the root directory.
#[async_trait(?Send)]
pub trait Gateway {
    /// Entries directly under `parent`, in backend order.
    async fn list_entries(&self, parent: Option<EntryId>) -> Result<Vec<DirectoryEntry>, GatewayError>;

    async fn create_entry(&self, entry: NewEntry) -> Result<DirectoryEntry, GatewayError>;

    async fn delete_entry(&self, id: EntryId) -> Result<(), GatewayError>;

    /// Update name and/or permissions.
    async fn patch_entry(&self, id: EntryId, patch: EntryPatch) -> Result<(), GatewayError>;

    async fn read_content(&self, id: EntryId) -> Result<String, GatewayError>;

    /// Overwrite the content, or append it when `append` is set.
    async fn write_content(&self, id: EntryId, content: &str, append: bool) -> Result<(), GatewayError>;

    /// Start a process running the file `file`.
    async fn create_process(&self, file: EntryId) -> Result<ProcessId, GatewayError>;

    async fn list_processes(&self) -> Result<Vec<ProcessInfo>, GatewayError>;

    async fn kill_process(&self, pid: ProcessId) -> Result<(), GatewayError>;

    /// Terminate live processes whose file is named `name`; returns how many.
    async fn kill_by_name(&self, name: &str) -> Result<u64, GatewayError>;

    async fn quota(&self) -> Result<Quota, GatewayError>;
}
