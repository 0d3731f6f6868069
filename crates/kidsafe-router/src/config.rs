//! Router configuration

use serde::{Deserialize, Serialize};

/// Router behavior switches, usually read from the `[router]` table of the
/// application config
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Prefix under which the application is served (e.g. "/kids")
    #[serde(default = "default_base_path")]
    pub base_path: String,

    /// Whether literal segments match regardless of ASCII case (default: true)
    #[serde(default = "default_true")]
    pub case_insensitive: bool,

    /// Whether a trailing slash makes a URL distinct (default: false)
    #[serde(default)]
    pub strict: bool,

    /// Whether back/forward navigation restores the saved scroll position
    /// instead of applying the fragment/top policy (default: false)
    #[serde(default)]
    pub restore_saved_position: bool,
}

fn default_base_path() -> String {
    "/".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            base_path: default_base_path(),
            case_insensitive: true,
            strict: false,
            restore_saved_position: false,
        }
    }
}

impl RouterConfig {
    /// Base path without its trailing slash; empty when served from the root
    pub fn base_prefix(&self) -> &str {
        self.base_path.trim_end_matches('/')
    }
}
