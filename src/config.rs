//! Front-end configuration.
//!
//! Interpreter and backend constants live in [`vosh_core::config`]; this
//! module only holds what the browser shell itself needs.

use log::LevelFilter;

/// Title shown above the terminal.
pub const APP_NAME: &str = "Virtual OS";

/// Maximum number of commands kept for up/down recall.
pub const MAX_COMMAND_HISTORY: usize = 100;

/// Console log level.
pub const LOG_LEVEL: LevelFilter = if cfg!(debug_assertions) {
    LevelFilter::Debug
} else {
    LevelFilter::Info
};
