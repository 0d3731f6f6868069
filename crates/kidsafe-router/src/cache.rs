//! Memoizing cache for lazily loaded view modules
//!
//! Each route name maps to one of:
//! - nothing (never requested, or the last attempt failed)
//! - an in-flight load, shared by every caller that asks while it runs
//! - the loaded module, kept for the lifetime of the cache
//!
//! Failed loads are evicted so the next request invokes the loader again.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::LoadError;
use crate::route::Loader;

type SharedLoad<V> = Shared<BoxFuture<'static, Result<Arc<V>, LoadError>>>;

enum Slot<V> {
    Loading { attempt: u64, load: SharedLoad<V> },
    Ready(Arc<V>),
}

/// Observable state of a cached view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    NotStarted,
    Loading,
    Loaded,
}

/// Statistics for the view cache
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Requests answered from an already loaded module
    pub hits: u64,
    /// Requests that joined a load already in flight
    pub joins: u64,
    /// Loader invocations
    pub loads: u64,
    /// Loads that failed and were evicted
    pub failures: u64,
}

impl CacheStats {
    /// Share of requests that did not start a new load
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.joins + self.loads;
        if total == 0 {
            0.0
        } else {
            (self.hits + self.joins) as f64 / total as f64
        }
    }
}

struct Inner<V> {
    slots: HashMap<String, Slot<V>>,
    stats: CacheStats,
    next_attempt: u64,
}

/// View module cache keyed by route name
pub struct ViewCache<V> {
    inner: Mutex<Inner<V>>,
}

impl<V> ViewCache<V>
where
    V: Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::with_ready(std::iter::empty())
    }

    /// Creates a cache with modules that are already available
    pub fn with_ready<I>(ready: I) -> Self
    where
        I: IntoIterator<Item = (String, Arc<V>)>,
    {
        let slots = ready
            .into_iter()
            .map(|(key, view)| (key, Slot::Ready(view)))
            .collect();

        Self {
            inner: Mutex::new(Inner {
                slots,
                stats: CacheStats::default(),
                next_attempt: 0,
            }),
        }
    }

    /// Returns the cached module, joining or starting a load as needed
    ///
    /// The loader is invoked only when no module is cached and no load is in
    /// flight for `key`. Every caller that arrives during a load receives the
    /// same result.
    pub async fn get_or_load(&self, key: &str, loader: &Loader<V>) -> Result<Arc<V>, LoadError> {
        let (attempt, load) = {
            let mut guard = self.inner.lock().await;
            let inner = &mut *guard;

            match inner.slots.get(key) {
                Some(Slot::Ready(view)) => {
                    inner.stats.hits += 1;
                    debug!("View cache hit: {}", key);
                    return Ok(Arc::clone(view));
                }
                Some(Slot::Loading { attempt, load }) => {
                    inner.stats.joins += 1;
                    debug!("Joining in-flight load: {}", key);
                    (*attempt, load.clone())
                }
                None => {
                    inner.next_attempt += 1;
                    inner.stats.loads += 1;
                    let attempt = inner.next_attempt;
                    debug!("Loading view: {} (attempt {})", key, attempt);

                    let load = loader().map(|result| result.map(Arc::new)).boxed().shared();
                    inner.slots.insert(
                        key.to_string(),
                        Slot::Loading {
                            attempt,
                            load: load.clone(),
                        },
                    );
                    (attempt, load)
                }
            }
        };

        let result = load.await;

        let mut guard = self.inner.lock().await;
        let inner = &mut *guard;
        let still_current = matches!(
            inner.slots.get(key),
            Some(Slot::Loading { attempt: a, .. }) if *a == attempt
        );

        if still_current {
            match &result {
                Ok(view) => {
                    inner.slots.insert(key.to_string(), Slot::Ready(Arc::clone(view)));
                }
                Err(err) => {
                    inner.slots.remove(key);
                    inner.stats.failures += 1;
                    warn!("View load failed for {}: {} (evicted)", key, err);
                }
            }
        }

        result
    }

    /// Current state of a key
    pub async fn state(&self, key: &str) -> LoadState {
        match self.inner.lock().await.slots.get(key) {
            None => LoadState::NotStarted,
            Some(Slot::Loading { .. }) => LoadState::Loading,
            Some(Slot::Ready(_)) => LoadState::Loaded,
        }
    }

    /// Names of every loaded module
    pub async fn loaded(&self) -> Vec<String> {
        let inner = self.inner.lock().await;
        let mut keys: Vec<String> = inner
            .slots
            .iter()
            .filter(|(_, slot)| matches!(slot, Slot::Ready(_)))
            .map(|(key, _)| key.clone())
            .collect();
        keys.sort();
        keys
    }

    /// Get cache statistics
    pub async fn stats(&self) -> CacheStats {
        self.inner.lock().await.stats.clone()
    }
}

impl<V> Default for ViewCache<V>
where
    V: Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
