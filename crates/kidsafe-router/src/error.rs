//! Error types for route configuration, view loading and history access

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

/// Errors surfaced by the registry and the router
///
/// Configuration variants (`DuplicateName`, `DuplicatePath`, `AmbiguousPath`,
/// `InvalidPattern`) are raised while the registry is built and are meant to
/// abort startup. `Load` and `History` are per-navigation and leave the rest
/// of the router untouched.
#[derive(Debug, Error)]
pub enum RouterError {
    #[error("route name `{0}` is already registered")]
    DuplicateName(String),

    #[error("route path `{path}` is already registered by `{existing}`")]
    DuplicatePath { path: String, existing: String },

    #[error("route path `{path}` overlaps `{other}` registered by `{existing}`")]
    AmbiguousPath {
        path: String,
        other: String,
        existing: String,
    },

    #[error("invalid route pattern `{pattern}`: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("no route named `{0}`")]
    UnknownRoute(String),

    #[error("missing parameter `{param}` for route `{route}`")]
    MissingParam { route: String, param: String },

    #[error("failed to load view for route `{route}`")]
    Load {
        route: String,
        #[source]
        source: LoadError,
    },

    #[error("history backend error: {0}")]
    History(#[from] anyhow::Error),
}

impl RouterError {
    /// True for errors that can only happen while the route table is built
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            RouterError::DuplicateName(_)
                | RouterError::DuplicatePath { .. }
                | RouterError::AmbiguousPath { .. }
                | RouterError::InvalidPattern { .. }
        )
    }
}

/// Failure reported by a view loader
///
/// Cloneable so a single failed fetch can be handed to every navigation that
/// was waiting on the same in-flight load.
#[derive(Debug, Clone)]
pub struct LoadError {
    reason: Arc<str>,
}

impl LoadError {
    pub fn new(reason: impl fmt::Display) -> Self {
        Self {
            reason: reason.to_string().into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reason)
    }
}

impl std::error::Error for LoadError {}

impl From<anyhow::Error> for LoadError {
    fn from(err: anyhow::Error) -> Self {
        LoadError::new(format!("{:#}", err))
    }
}

pub type Result<T, E = RouterError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_classification() {
        assert!(RouterError::DuplicateName("about".into()).is_configuration());
        assert!(!RouterError::UnknownRoute("about".into()).is_configuration());

        let load = RouterError::Load {
            route: "login".into(),
            source: LoadError::new("chunk missing"),
        };
        assert!(!load.is_configuration());
        assert_eq!(load.to_string(), "failed to load view for route `login`");
    }

    #[test]
    fn test_load_error_from_anyhow_keeps_context() {
        let err = anyhow::anyhow!("connection reset").context("fetching chunk");
        let load = LoadError::from(err);
        assert_eq!(load.reason(), "fetching chunk: connection reset");
    }
}
