/// Route entries: a pattern, a unique name, and where the view comes from

pub mod pattern;

pub use pattern::{RoutePattern, Segment};

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};

use crate::error::LoadError;

/// Deferred factory producing a view module
///
/// Invoking the loader starts the fetch; the router makes sure that happens
/// at most once per successful load.
pub type Loader<V> = Arc<dyn Fn() -> BoxFuture<'static, Result<V, LoadError>> + Send + Sync>;

/// Wraps an async closure into a [`Loader`]
///
/// # Examples
///
/// ```
/// use kidsafe_router::route::lazy;
///
/// let loader = lazy(|| async { Ok::<_, kidsafe_router::LoadError>("about view") });
/// ```
pub fn lazy<V, F, Fut>(factory: F) -> Loader<V>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<V, LoadError>> + Send + 'static,
{
    Arc::new(move || factory().boxed())
}

/// Where a route's view module comes from
pub enum ViewSource<V> {
    /// Bundled with the application and available before the first navigation
    Eager(Arc<V>),
    /// Split into its own chunk and fetched on the first visit
    Lazy(Loader<V>),
}

impl<V> Clone for ViewSource<V> {
    fn clone(&self) -> Self {
        match self {
            ViewSource::Eager(view) => ViewSource::Eager(Arc::clone(view)),
            ViewSource::Lazy(loader) => ViewSource::Lazy(Arc::clone(loader)),
        }
    }
}

impl<V> fmt::Debug for ViewSource<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewSource::Eager(_) => f.write_str("Eager"),
            ViewSource::Lazy(_) => f.write_str("Lazy"),
        }
    }
}

/// A single registered route
#[derive(Debug)]
pub struct RouteEntry<V> {
    pub pattern: RoutePattern,
    pub name: String,
    pub source: ViewSource<V>,
}

impl<V> RouteEntry<V> {
    pub fn path(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn is_lazy(&self) -> bool {
        matches!(self.source, ViewSource::Lazy(_))
    }
}
