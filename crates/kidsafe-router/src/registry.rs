//! The view registry: the frozen set of routes an application serves
//!
//! Routes are declared once through [`RegistryBuilder`]. Every registration is
//! validated against the routes already present, so a built [`ViewRegistry`]
//! never holds two routes with the same name or two patterns that could match
//! the same URL.

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::RouterConfig;
use crate::error::{Result, RouterError};
use crate::path::scopes;
use crate::route::{Loader, RouteEntry, RoutePattern, ViewSource};

/// Collects route declarations and validates them
///
/// # Examples
///
/// ```
/// use kidsafe_router::{RegistryBuilder, route::lazy};
///
/// let registry = RegistryBuilder::new()
///     .eager("/", "home", "home view")?
///     .lazy("/about", "about", lazy(|| async { Ok("about view") }))?
///     .build();
///
/// assert_eq!(registry.len(), 2);
/// # Ok::<(), kidsafe_router::RouterError>(())
/// ```
pub struct RegistryBuilder<V> {
    entries: Vec<Arc<RouteEntry<V>>>,
    not_found: Vec<Arc<RouteEntry<V>>>,
    case_insensitive: bool,
}

impl<V> RegistryBuilder<V> {
    /// Creates an empty builder with case-insensitive matching
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            not_found: Vec::new(),
            case_insensitive: true,
        }
    }

    /// Creates an empty builder that follows the router configuration
    pub fn from_config(config: &RouterConfig) -> Self {
        Self::new().case_insensitive(config.case_insensitive)
    }

    pub fn case_insensitive(mut self, case_insensitive: bool) -> Self {
        self.case_insensitive = case_insensitive;
        self
    }

    /// Registers a route
    ///
    /// Fails when the name is taken, or when the pattern is malformed,
    /// duplicates, or overlaps an existing route.
    pub fn register(mut self, path: &str, name: &str, source: ViewSource<V>) -> Result<Self> {
        let pattern = RoutePattern::parse(path)?;
        self.ensure_unique_name(name)?;

        if let Some(existing) = self
            .entries
            .iter()
            .find(|entry| entry.pattern.overlaps(&pattern, self.case_insensitive))
        {
            let same_shape = existing.pattern.same_shape(&pattern, self.case_insensitive);
            return Err(if same_shape {
                RouterError::DuplicatePath {
                    path: path.to_string(),
                    existing: existing.name.clone(),
                }
            } else {
                RouterError::AmbiguousPath {
                    path: path.to_string(),
                    other: existing.path().to_string(),
                    existing: existing.name.clone(),
                }
            });
        }

        self.entries.push(Arc::new(RouteEntry {
            pattern,
            name: name.to_string(),
            source,
        }));
        Ok(self)
    }

    /// Registers a route whose view is fetched on first visit
    pub fn lazy(self, path: &str, name: &str, loader: Loader<V>) -> Result<Self> {
        self.register(path, name, ViewSource::Lazy(loader))
    }

    /// Registers a route whose view ships with the application
    pub fn eager(self, path: &str, name: &str, view: V) -> Result<Self> {
        self.register(path, name, ViewSource::Eager(Arc::new(view)))
    }

    /// Registers the view shown for unmatched URLs under `scope`
    ///
    /// A miss resolves to the not-found view with the longest scope that is an
    /// ancestor of (or equal to) the requested path.
    pub fn not_found(mut self, scope: &str, name: &str, source: ViewSource<V>) -> Result<Self> {
        let pattern = RoutePattern::parse(scope)?;
        if !pattern.is_literal() {
            return Err(RouterError::InvalidPattern {
                pattern: scope.to_string(),
                reason: "not-found scopes must be literal paths".to_string(),
            });
        }
        self.ensure_unique_name(name)?;

        if let Some(existing) = self
            .not_found
            .iter()
            .find(|entry| entry.pattern.overlaps(&pattern, self.case_insensitive))
        {
            return Err(RouterError::DuplicatePath {
                path: scope.to_string(),
                existing: existing.name.clone(),
            });
        }

        self.not_found.push(Arc::new(RouteEntry {
            pattern,
            name: name.to_string(),
            source,
        }));
        Ok(self)
    }

    fn ensure_unique_name(&self, name: &str) -> Result<()> {
        let taken = self
            .entries
            .iter()
            .chain(&self.not_found)
            .any(|entry| entry.name == name);
        if taken {
            return Err(RouterError::DuplicateName(name.to_string()));
        }
        Ok(())
    }

    /// Freezes the registry
    pub fn build(self) -> ViewRegistry<V> {
        let by_name = self
            .entries
            .iter()
            .chain(&self.not_found)
            .map(|entry| (entry.name.clone(), Arc::clone(entry)))
            .collect();

        let not_found = self
            .not_found
            .into_iter()
            .map(|entry| (scope_key(entry.path(), self.case_insensitive), entry))
            .collect();

        ViewRegistry {
            entries: self.entries,
            by_name,
            not_found,
            case_insensitive: self.case_insensitive,
        }
    }
}

impl<V> Default for RegistryBuilder<V> {
    fn default() -> Self {
        Self::new()
    }
}

fn scope_key(path: &str, case_insensitive: bool) -> String {
    if case_insensitive {
        path.to_ascii_lowercase()
    } else {
        path.to_string()
    }
}

/// Immutable route table
pub struct ViewRegistry<V> {
    entries: Vec<Arc<RouteEntry<V>>>,
    by_name: HashMap<String, Arc<RouteEntry<V>>>,
    not_found: HashMap<String, Arc<RouteEntry<V>>>,
    case_insensitive: bool,
}

impl<V> ViewRegistry<V> {
    /// Finds the route matching a canonical path
    ///
    /// Registration rejects overlapping patterns, so at most one route can
    /// match; entries are still scanned in registration order.
    pub fn find(&self, path: &str) -> Option<(Arc<RouteEntry<V>>, HashMap<String, String>)> {
        self.entries.iter().find_map(|entry| {
            entry
                .pattern
                .matches(path, self.case_insensitive)
                .map(|params| (Arc::clone(entry), params))
        })
    }

    /// Finds the nearest not-found view for a canonical path
    pub fn not_found_for(&self, path: &str) -> Option<Arc<RouteEntry<V>>> {
        if self.not_found.is_empty() {
            return None;
        }
        let key = scope_key(path, self.case_insensitive);
        let found = scopes(&key).find_map(|scope| self.not_found.get(scope).cloned());
        found
    }

    /// Looks a route (or not-found view) up by name
    pub fn get(&self, name: &str) -> Option<&Arc<RouteEntry<V>>> {
        self.by_name.get(name)
    }

    /// Routes in registration order, excluding not-found views
    pub fn entries(&self) -> impl Iterator<Item = &Arc<RouteEntry<V>>> {
        self.entries.iter()
    }

    /// Every entry holding a view, including not-found views
    pub fn all_entries(&self) -> impl Iterator<Item = &Arc<RouteEntry<V>>> {
        self.by_name.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::lazy;
    use crate::LoadError;

    fn loader(view: &'static str) -> Loader<&'static str> {
        lazy(move || async move { Ok::<_, LoadError>(view) })
    }

    #[test]
    fn test_register_and_find() {
        let registry = RegistryBuilder::new()
            .eager("/", "home", "home")
            .unwrap()
            .lazy("/about", "about", loader("about"))
            .unwrap()
            .build();

        let (entry, params) = registry.find("/about").unwrap();
        assert_eq!(entry.name, "about");
        assert!(params.is_empty());
        assert!(entry.is_lazy());

        let (home, _) = registry.find("/").unwrap();
        assert_eq!(home.name, "home");
        assert!(!home.is_lazy());

        assert!(registry.find("/nonexistent").is_none());
    }

    #[test]
    fn test_duplicate_name_is_rejected() {
        let err = RegistryBuilder::new()
            .lazy("/about", "about", loader("about"))
            .unwrap()
            .lazy("/about-us", "about", loader("about"))
            .err()
            .unwrap();
        assert!(matches!(err, RouterError::DuplicateName(name) if name == "about"));
    }

    #[test]
    fn test_duplicate_path_is_rejected() {
        let err = RegistryBuilder::new()
            .lazy("/login", "login", loader("login"))
            .unwrap()
            .lazy("/LOGIN", "sign-in", loader("login"))
            .err()
            .unwrap();
        assert!(
            matches!(err, RouterError::DuplicatePath { ref existing, .. } if existing == "login"),
            "{err}"
        );
    }

    #[test]
    fn test_case_sensitive_registry_allows_case_variants() {
        let registry = RegistryBuilder::new()
            .case_insensitive(false)
            .lazy("/login", "login", loader("login"))
            .unwrap()
            .lazy("/LOGIN", "shouting-login", loader("login"))
            .unwrap()
            .build();
        assert_eq!(registry.find("/LOGIN").unwrap().0.name, "shouting-login");
        assert!(registry.find("/Login").is_none());
    }

    #[test]
    fn test_overlapping_param_route_is_rejected() {
        let err = RegistryBuilder::new()
            .lazy("/games/memory-match", "games/memory-match", loader("memory"))
            .unwrap()
            .lazy("/games/:game", "games/any", loader("any"))
            .err()
            .unwrap();
        assert!(matches!(err, RouterError::AmbiguousPath { .. }), "{err}");
    }

    #[test]
    fn test_not_found_scopes() {
        let registry = RegistryBuilder::new()
            .lazy("/games/math-puzzle", "games/math-puzzle", loader("math"))
            .unwrap()
            .not_found("/", "not-found", ViewSource::Eager(Arc::new("404")))
            .unwrap()
            .not_found("/games", "games/not-found", ViewSource::Eager(Arc::new("no game")))
            .unwrap()
            .build();

        assert_eq!(registry.not_found_for("/games/chess").unwrap().name, "games/not-found");
        assert_eq!(registry.not_found_for("/Games/chess").unwrap().name, "games/not-found");
        assert_eq!(registry.not_found_for("/nowhere").unwrap().name, "not-found");
        assert!(registry.get("not-found").is_some());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_not_found_scope_must_be_literal() {
        let err = RegistryBuilder::<&str>::new()
            .not_found("/games/:id", "nf", ViewSource::Eager(Arc::new("x")))
            .err()
            .unwrap();
        assert!(err.is_configuration());
    }
}
