//! UI components built with Leptos.
//!
//! - [`router`] - Hash routing between the terminal and external views
//! - [`terminal`] - Terminal emulator interface
//! - [`external`] - Hand-off panel for the editor and memory viewer

pub mod external;
pub mod router;
pub mod terminal;

pub use router::AppRouter;
