//! The router: resolves URLs, loads views, commits history, applies scroll
//!
//! Navigation runs in four steps: resolve, load, commit, scroll. Only the load
//! step suspends. Every call is stamped with a ticket when it is issued; at
//! commit time a navigation whose ticket is no longer the newest is discarded,
//! so the last-issued navigation always decides what is visible. A discarded
//! navigation's module stays cached.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{broadcast, Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::cache::{CacheStats, LoadState, ViewCache};
use crate::config::RouterConfig;
use crate::error::{Result, RouterError};
use crate::history::{History, HistoryEntry};
use crate::navigation::{Location, NavigationKind, NavigationRequest};
use crate::path::{has_trailing_slash, normalize_path};
use crate::registry::ViewRegistry;
use crate::route::{RouteEntry, ViewSource};
use crate::scroll::{ScrollPolicy, ScrollPosition, ScrollTarget};

const EVENT_CAPACITY: usize = 64;

/// A route matched against a location
#[derive(Debug)]
pub struct ResolvedView<V> {
    pub entry: Arc<RouteEntry<V>>,
    pub params: HashMap<String, String>,
    pub location: Location,
    /// True when this is a not-found view standing in for a miss
    pub is_fallback: bool,
}

impl<V> ResolvedView<V> {
    pub fn name(&self) -> &str {
        &self.entry.name
    }
}

/// Outcome of [`Router::resolve`]
#[derive(Debug)]
pub enum Resolution<V> {
    Matched(ResolvedView<V>),
    /// No route matched; `fallback` holds the nearest not-found view, if any
    NotFound {
        path: String,
        fallback: Option<ResolvedView<V>>,
    },
}

impl<V> Resolution<V> {
    pub fn is_match(&self) -> bool {
        matches!(self, Resolution::Matched(_))
    }

    /// The matched view, or the fallback standing in for a miss
    pub fn into_view(self) -> Option<ResolvedView<V>> {
        match self {
            Resolution::Matched(view) => Some(view),
            Resolution::NotFound { fallback, .. } => fallback,
        }
    }
}

/// A committed navigation: what is now visible
#[derive(Debug)]
pub struct Navigation<V> {
    pub route: String,
    pub location: Location,
    pub href: String,
    pub params: HashMap<String, String>,
    pub view: Arc<V>,
    pub scroll: ScrollTarget,
    pub is_fallback: bool,
}

/// Result of a navigation that did not fail
#[derive(Debug)]
pub enum NavigationOutcome<V> {
    /// The view is visible and history was updated
    Committed(Arc<Navigation<V>>),
    /// A newer navigation was issued before this one finished loading
    Superseded { path: String },
    /// No route and no not-found view matched
    NotFound { path: String },
}

impl<V> NavigationOutcome<V> {
    pub fn committed(&self) -> Option<&Arc<Navigation<V>>> {
        match self {
            NavigationOutcome::Committed(navigation) => Some(navigation),
            _ => None,
        }
    }
}

/// Broadcast to subscribers after every committed navigation
#[derive(Debug, Clone, PartialEq)]
pub struct RouteChange {
    pub route: String,
    pub href: String,
    pub scroll: ScrollTarget,
}

/// Client-side router over a frozen [`ViewRegistry`]
pub struct Router<V> {
    registry: Arc<ViewRegistry<V>>,
    cache: ViewCache<V>,
    history: Arc<dyn History>,
    config: RouterConfig,
    scroll: ScrollPolicy,
    latest: AtomicU64,
    commit: Mutex<()>,
    current: RwLock<Option<Arc<Navigation<V>>>>,
    events: broadcast::Sender<RouteChange>,
}

impl<V> Router<V>
where
    V: Send + Sync + 'static,
{
    /// Creates a router; eager views are cached immediately
    pub fn new(registry: ViewRegistry<V>, history: Arc<dyn History>, config: RouterConfig) -> Self {
        let ready = registry.all_entries().filter_map(|entry| match &entry.source {
            ViewSource::Eager(view) => Some((entry.name.clone(), Arc::clone(view))),
            ViewSource::Lazy(_) => None,
        });
        let cache = ViewCache::with_ready(ready);
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        info!(
            "Router ready: {} routes, history backend: {}",
            registry.len(),
            history.name()
        );

        Self {
            registry: Arc::new(registry),
            cache,
            history,
            scroll: ScrollPolicy::new(config.restore_saved_position),
            config,
            latest: AtomicU64::new(0),
            commit: Mutex::new(()),
            current: RwLock::new(None),
            events,
        }
    }

    pub fn registry(&self) -> &ViewRegistry<V> {
        &self.registry
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Subscribes to committed navigations
    pub fn subscribe(&self) -> broadcast::Receiver<RouteChange> {
        self.events.subscribe()
    }

    /// Matches a URL against the registry
    ///
    /// The URL may carry the base path, a query and a fragment; only the path
    /// takes part in matching.
    pub fn resolve(&self, url: &str) -> Resolution<V> {
        let location = Location::parse_with_base(url, self.config.base_prefix());
        self.resolve_location(location)
    }

    fn resolve_location(&self, location: Location) -> Resolution<V> {
        let path = normalize_path(&location.path).into_owned();

        let strict_miss = self.config.strict && has_trailing_slash(&location.path);
        let found = if strict_miss {
            None
        } else {
            self.registry.find(&path)
        };

        match found {
            Some((entry, params)) => Resolution::Matched(ResolvedView {
                entry,
                params,
                location,
                is_fallback: false,
            }),
            None => Resolution::NotFound {
                fallback: self.registry.not_found_for(&path).map(|entry| ResolvedView {
                    entry,
                    params: HashMap::new(),
                    location,
                    is_fallback: true,
                }),
                path,
            },
        }
    }

    /// Returns the view module for a resolved route, loading it on first use
    pub async fn load_view(&self, resolved: &ResolvedView<V>) -> Result<Arc<V>> {
        let entry = &resolved.entry;
        match &entry.source {
            ViewSource::Eager(view) => Ok(Arc::clone(view)),
            ViewSource::Lazy(loader) => self
                .cache
                .get_or_load(&entry.name, loader)
                .await
                .map_err(|source| RouterError::Load {
                    route: entry.name.clone(),
                    source,
                }),
        }
    }

    /// Loads a route's view without navigating
    pub async fn preload(&self, name: &str) -> Result<Arc<V>> {
        let entry = self
            .registry
            .get(name)
            .cloned()
            .ok_or_else(|| RouterError::UnknownRoute(name.to_string()))?;
        let resolved = ResolvedView {
            location: Location::parse(entry.path()),
            entry,
            params: HashMap::new(),
            is_fallback: false,
        };
        self.load_view(&resolved).await
    }

    /// Pushes a new history entry for `url`
    pub async fn push(&self, url: &str) -> Result<NavigationOutcome<V>> {
        self.navigate(NavigationRequest::push(url)).await
    }

    /// Replaces the current history entry with `url`
    pub async fn replace(&self, url: &str) -> Result<NavigationOutcome<V>> {
        self.navigate(NavigationRequest::replace(url)).await
    }

    /// Runs a navigation: resolve, load, commit, scroll
    pub async fn navigate(&self, mut request: NavigationRequest) -> Result<NavigationOutcome<V>> {
        let ticket = self.issue();
        request.location = Location::parse_with_base(
            &request.location.full_path(),
            self.config.base_prefix(),
        );
        self.run(ticket, request).await
    }

    pub async fn back(&self) -> Result<Option<NavigationOutcome<V>>> {
        self.go(-1).await
    }

    pub async fn forward(&self) -> Result<Option<NavigationOutcome<V>>> {
        self.go(1).await
    }

    /// Traverses history by `delta` entries
    ///
    /// Returns `None` without navigating when there is no entry there. The
    /// target entry's saved scroll position is handed to the scroll policy.
    pub async fn go(&self, delta: isize) -> Result<Option<NavigationOutcome<V>>> {
        let (ticket, target) = {
            let _commit = self.commit.lock().await;
            match self.history.peek(delta).await? {
                Some(target) => (self.issue(), target),
                None => {
                    debug!("No history entry at offset {}", delta);
                    return Ok(None);
                }
            }
        };

        let request = NavigationRequest::traverse(target.location, delta, target.scroll);
        self.run(ticket, request).await.map(Some)
    }

    /// Records the scroll position of the current history entry
    pub async fn save_scroll_position(&self, position: ScrollPosition) -> Result<()> {
        self.history.save_scroll(position).await?;
        Ok(())
    }

    /// The visible navigation, if any has been committed
    pub async fn current(&self) -> Option<Arc<Navigation<V>>> {
        self.current.read().await.clone()
    }

    /// Builds the URL (including base path) of a named route
    ///
    /// # Examples
    ///
    /// ```
    /// use kidsafe_router::{MemoryHistory, RegistryBuilder, Router, RouterConfig};
    /// use std::sync::Arc;
    ///
    /// let config = RouterConfig { base_path: "/kids/".into(), ..RouterConfig::default() };
    /// let registry = RegistryBuilder::from_config(&config)
    ///     .eager("/games/:game", "game", "game view")?
    ///     .build();
    /// let router = Router::new(registry, Arc::new(MemoryHistory::new()), config);
    ///
    /// assert_eq!(router.url_for("game", &[("game", "memory-match")])?, "/kids/games/memory-match");
    /// # Ok::<(), kidsafe_router::RouterError>(())
    /// ```
    pub fn url_for(&self, name: &str, params: &[(&str, &str)]) -> Result<String> {
        let entry = self
            .registry
            .get(name)
            .ok_or_else(|| RouterError::UnknownRoute(name.to_string()))?;

        let params: HashMap<String, String> = params
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        let path = entry
            .pattern
            .generate(&params)
            .map_err(|param| RouterError::MissingParam {
                route: name.to_string(),
                param,
            })?;

        Ok(format!("{}{}", self.config.base_prefix(), path))
    }

    /// Load state of a route's view
    pub async fn load_state(&self, name: &str) -> LoadState {
        self.cache.state(name).await
    }

    /// Names of every route whose view is loaded, sorted
    pub async fn loaded_views(&self) -> Vec<String> {
        self.cache.loaded().await
    }

    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.stats().await
    }

    fn issue(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_latest(&self, ticket: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket
    }

    async fn run(&self, ticket: u64, request: NavigationRequest) -> Result<NavigationOutcome<V>> {
        let resolved = match self.resolve_location(request.location.clone()) {
            Resolution::Matched(view) => view,
            Resolution::NotFound {
                fallback: Some(view),
                path,
            } => {
                debug!("No route for {}, using not-found view {}", path, view.name());
                view
            }
            Resolution::NotFound {
                fallback: None,
                path,
            } => {
                info!("No route matches {}", path);
                return Ok(NavigationOutcome::NotFound { path });
            }
        };

        let view = match self.load_view(&resolved).await {
            Ok(view) => view,
            Err(err) => {
                warn!("Navigation to {} failed: {}", request.location.path, err);
                return Err(err);
            }
        };

        let _commit = self.commit.lock().await;
        if !self.is_latest(ticket) {
            info!(
                "Discarding navigation to {}: superseded by a newer navigation",
                request.location.path
            );
            return Ok(NavigationOutcome::Superseded {
                path: request.location.path,
            });
        }

        let entry = HistoryEntry::new(request.location.clone(), self.config.base_prefix());
        let href = entry.href.clone();
        match request.kind {
            NavigationKind::Push => self.history.push(entry).await?,
            NavigationKind::Replace => self.history.replace(entry).await?,
            NavigationKind::Traverse(delta) => {
                self.history.go(delta).await?;
            }
        }

        let scroll = self.scroll.target(&request);
        let navigation = Arc::new(Navigation {
            route: resolved.entry.name.clone(),
            location: request.location,
            href,
            params: resolved.params,
            view,
            scroll,
            is_fallback: resolved.is_fallback,
        });

        *self.current.write().await = Some(Arc::clone(&navigation));

        info!("Navigated to {} ({})", navigation.href, navigation.route);
        // No subscribers is fine
        let _ = self.events.send(RouteChange {
            route: navigation.route.clone(),
            href: navigation.href.clone(),
            scroll: navigation.scroll.clone(),
        });

        Ok(NavigationOutcome::Committed(navigation))
    }
}
