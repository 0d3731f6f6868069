// File: src/config.rs
// Purpose: Configuration parsing from kidsafe.toml

use anyhow::{Context, Result};
use kidsafe_router::RouterConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub app: AppConfig,

    #[serde(default)]
    pub router: RouterConfig,

    #[serde(default)]
    pub views: ViewsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Application metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_name")]
    pub name: String,

    /// URL the application navigates to when mounted
    #[serde(default = "default_mount")]
    pub mount: String,
}

/// View loading configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewsConfig {
    /// Simulated fetch latency of a lazily loaded view chunk
    #[serde(default = "default_chunk_latency_ms")]
    pub chunk_latency_ms: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive; RUST_LOG takes precedence
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_name() -> String {
    "kidsafe".to_string()
}

fn default_mount() -> String {
    "/".to_string()
}

fn default_chunk_latency_ms() -> u64 {
    25
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            mount: default_mount(),
        }
    }
}

impl Default for ViewsConfig {
    fn default() -> Self {
        Self {
            chunk_latency_ms: default_chunk_latency_ms(),
        }
    }
}

impl ViewsConfig {
    pub fn chunk_latency(&self) -> Duration {
        Duration::from_millis(self.chunk_latency_ms)
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// A missing or empty file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Load configuration from default path (./kidsafe.toml)
    pub fn load_default() -> Result<Self> {
        Self::load("kidsafe.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.app.mount, "/");
        assert_eq!(config.router.base_path, "/");
        assert!(config.router.case_insensitive);
        assert!(!config.router.restore_saved_position);
        assert_eq!(config.views.chunk_latency(), Duration::from_millis(25));
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_empty_config() {
        let config = toml::from_str::<Config>("").unwrap_or_default();
        assert_eq!(config.app.name, "kidsafe");
    }

    #[test]
    fn test_custom_router_section() {
        let toml = r#"
            [app]
            mount = "/interactive-games"

            [router]
            base_path = "/kids/"
            strict = true
            restore_saved_position = true

            [views]
            chunk_latency_ms = 0
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.app.mount, "/interactive-games");
        assert_eq!(config.router.base_prefix(), "/kids");
        assert!(config.router.strict);
        assert!(config.router.case_insensitive);
        assert!(config.router.restore_saved_position);
        assert_eq!(config.views.chunk_latency_ms, 0);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let config = Config::load("does-not-exist/kidsafe.toml").unwrap();
        assert_eq!(config.app.name, "kidsafe");
    }

    #[test]
    fn test_load_rejects_invalid_toml() {
        let path = std::env::temp_dir().join(format!("kidsafe-invalid-{}.toml", std::process::id()));
        fs::write(&path, "[router\nbase_path = ").unwrap();
        let err = Config::load(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
        fs::remove_file(&path).ok();
    }
}
