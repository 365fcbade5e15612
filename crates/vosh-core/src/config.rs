//! Interpreter configuration.
//!
//! Centralizes the constants shared by the interpreter, the gateways and the
//! web front end. Text assets are loaded at compile time using `include_str!`.

// =============================================================================
// Text Assets (loaded at compile time)
// =============================================================================

/// Help text for the `help` command.
pub const HELP_TEXT: &str = include_str!("../assets/help.txt");

/// First transcript line of every session.
pub const WELCOME_BANNER: &str = "Welcome to Virtual OS!";

// =============================================================================
// Prompt
// =============================================================================

/// Display name of the root directory.
pub const ROOT_NAME: &str = "~";

/// Separator between path segments in the prompt and `pwd`.
pub const PATH_SEPARATOR: &str = "/";

/// Suffix appended to the joined path to form the prompt.
pub const PROMPT_SUFFIX: &str = ">";

/// Prompt shown while the next line is captured as file content.
pub const CAPTURE_PROMPT: &str = "...";

/// Name reported by `whoami` when no user is signed in.
pub const ANONYMOUS_USER: &str = "anonymous";

// =============================================================================
// Backend
// =============================================================================

/// Default REST API root of the filesystem/process backend.
pub const DEFAULT_API_BASE: &str = "http://localhost:8000/api";

/// localStorage key holding the bearer token.
pub const TOKEN_STORAGE_KEY: &str = "vosh.token";

/// localStorage key holding an optional API base override.
pub const API_BASE_STORAGE_KEY: &str = "vosh.api_base";

/// localStorage key holding the signed-in user name.
pub const USER_STORAGE_KEY: &str = "vosh.user";

/// Permission string given to newly created entries.
pub const DEFAULT_PERMISSIONS: &str = "rwx------";

/// Per-user storage limit in bytes used by the in-memory backend.
pub const DEFAULT_STORAGE_LIMIT: u64 = 10_000;

// =============================================================================
// Pagers
// =============================================================================

/// Line counts for `head` and `tail`.
pub mod pagers {
    /// Number of lines printed by `head`.
    pub const HEAD_LINES: usize = 10;
    /// Number of lines printed by `tail`.
    pub const TAIL_LINES: usize = 10;
}

/// Connection settings for [`HttpGateway`](crate::HttpGateway).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GatewayConfig {
    /// API root without a trailing slash.
    pub base_url: String,
    /// Bearer token sent on every request.
    pub token: Option<String>,
}

impl GatewayConfig {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_config_trims_trailing_slash() {
        let config = GatewayConfig::new("http://host/api/", None);
        assert_eq!(config.base_url, "http://host/api");
    }

    #[test]
    fn test_default_config() {
        let config = GatewayConfig::default();
        assert_eq!(config.base_url, DEFAULT_API_BASE);
        assert!(config.token.is_none());
    }
}
