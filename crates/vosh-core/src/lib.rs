//! Command interpreter for the virtual OS terminal.
//!
//! This crate provides:
//! - [`Shell`] - line submission, prompt, and transcript for one session
//! - [`Command`] parsing and per-command execution against a [`Gateway`]
//! - [`text`] - grep/sed/awk semantics over file content
//! - [`HttpGateway`] for the REST backend and, behind the `mock` feature,
//!   an in-memory [`MemoryGateway`]
//!
//! # Architecture
//!
//! A submitted line is either routed to the pending capture target (see
//! [`InputMode`]) or parsed into a [`Command`] and executed. Execution reads
//! the [`DirectoryIndex`] and [`PathState`], talks to the gateway, and returns
//! a [`CommandResult`] whose effects the shell applies afterwards.

pub mod commands;
pub mod config;
pub mod error;
pub mod format;
pub mod gateway;
mod index;
mod mode;
pub mod models;
pub mod parser;
mod path;
mod shell;
pub mod text;
mod transcript;

pub use commands::{Command, CommandKind, CommandResult, Confirm, Effect, Navigation};
pub use error::GatewayError;
pub use gateway::{Gateway, HttpGateway};
#[cfg(any(test, feature = "mock"))]
pub use gateway::{MemoryGateway, WriteRecord};
pub use index::DirectoryIndex;
pub use mode::InputMode;
pub use models::{DirectoryEntry, EntryId, ProcessInfo, ProcessStatus, Quota};
pub use path::{PathSegment, PathState};
pub use shell::Shell;
pub use transcript::TranscriptLog;
