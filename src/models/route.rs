//! Hash-based routing between the terminal and the external views.

use vosh_core::{EntryId, Navigation};

use crate::utils::dom;

/// Application routes.
/// URL format: `#/`, `#/editor/<id>`, `#/memory`
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AppRoute {
    /// Terminal view: `#/` or empty hash
    Terminal,
    /// Text editor bound to a file: `#/editor/<id>`
    Editor(EntryId),
    /// Memory/paging visualizer: `#/memory`
    Memory,
}

impl AppRoute {
    /// Parse URL hash into a route. Unknown hashes fall back to the terminal.
    pub fn from_hash(hash: &str) -> Self {
        let path = hash.trim_start_matches('#').trim_matches('/');

        if path == "memory" {
            return Self::Memory;
        }
        if let Some(id) = path.strip_prefix("editor/")
            && let Ok(id) = id.parse::<u64>()
        {
            return Self::Editor(EntryId(id));
        }
        Self::Terminal
    }

    /// Convert the route to a URL hash.
    pub fn to_hash(&self) -> String {
        match self {
            Self::Terminal => "#/".to_string(),
            Self::Editor(id) => format!("#/editor/{}", id),
            Self::Memory => "#/memory".to_string(),
        }
    }

    /// Get current route from browser URL.
    pub fn current() -> Self {
        Self::from_hash(&dom::get_hash())
    }

    /// Navigate the browser to this route.
    pub fn push(&self) {
        dom::set_hash(&self.to_hash());
    }
}

impl From<Navigation> for AppRoute {
    fn from(nav: Navigation) -> Self {
        match nav {
            Navigation::Editor(id) => Self::Editor(id),
            Navigation::MemoryViewer => Self::Memory,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_parsing() {
        assert_eq!(AppRoute::from_hash(""), AppRoute::Terminal);
        assert_eq!(AppRoute::from_hash("#"), AppRoute::Terminal);
        assert_eq!(AppRoute::from_hash("#/"), AppRoute::Terminal);
        assert_eq!(AppRoute::from_hash("#/memory"), AppRoute::Memory);
        assert_eq!(AppRoute::from_hash("#/editor/42"), AppRoute::Editor(EntryId(42)));
        assert_eq!(AppRoute::from_hash("#/editor/abc"), AppRoute::Terminal);
        assert_eq!(AppRoute::from_hash("#/unknown"), AppRoute::Terminal);
    }

    #[test]
    fn test_route_to_hash() {
        assert_eq!(AppRoute::Terminal.to_hash(), "#/");
        assert_eq!(AppRoute::Memory.to_hash(), "#/memory");
        assert_eq!(AppRoute::Editor(EntryId(7)).to_hash(), "#/editor/7");
        assert_eq!(
            AppRoute::from_hash(&AppRoute::Editor(EntryId(7)).to_hash()),
            AppRoute::Editor(EntryId(7))
        );
    }

    #[test]
    fn test_from_navigation() {
        assert_eq!(AppRoute::from(Navigation::MemoryViewer), AppRoute::Memory);
        assert_eq!(
            AppRoute::from(Navigation::Editor(EntryId(3))),
            AppRoute::Editor(EntryId(3))
        );
    }
}
