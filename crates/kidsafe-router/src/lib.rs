//! # kidsafe router
//!
//! Client-side routing for the kidsafe site:
//! - A frozen route table validated at startup (duplicate names, duplicate or
//!   overlapping paths are rejected)
//! - Literal routes (`/about`) and dynamic segments (`/stories/:id`)
//! - Lazily loaded views: each view is fetched on its first visit, concurrent
//!   visits share one fetch, failed fetches are retried on the next visit
//! - History management through a pluggable [`History`] backend
//! - A deterministic scroll policy: `#fragment` scrolls smoothly to the
//!   element, everything else jumps to the top
//! - Last-issued-wins navigation: a navigation that is overtaken while its
//!   view loads is discarded
//!
//! ## Path Normalization
//!
//! - Trailing slashes: `/path/` → `/path` (unless the router is strict)
//! - Double slashes: `/path//to` → `/path/to`
//! - Backslashes: `\path\to` → `/path/to`
//!
//! ## Example
//!
//! ```
//! use kidsafe_router::{route::lazy, MemoryHistory, RegistryBuilder, Router, RouterConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), kidsafe_router::RouterError> {
//!     let config = RouterConfig::default();
//!     let registry = RegistryBuilder::from_config(&config)
//!         .eager("/", "home", "Home")?
//!         .lazy("/about", "about", lazy(|| async { Ok("About") }))?
//!         .build();
//!
//!     let router = Router::new(registry, Arc::new(MemoryHistory::new()), config);
//!     let outcome = router.push("/about#team").await?;
//!     assert_eq!(*outcome.committed().unwrap().view, "About");
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod history;
pub mod navigation;
pub mod path;
pub mod registry;
pub mod route;
pub mod router;
pub mod scroll;

pub use cache::{CacheStats, LoadState, ViewCache};
pub use config::RouterConfig;
pub use error::{LoadError, Result, RouterError};
pub use history::{History, HistoryEntry, MemoryHistory};
pub use navigation::{Location, NavigationKind, NavigationRequest};
pub use path::{is_valid_path, normalize_path};
pub use registry::{RegistryBuilder, ViewRegistry};
pub use route::{lazy, Loader, RouteEntry, RoutePattern, Segment, ViewSource};
pub use router::{Navigation, NavigationOutcome, ResolvedView, Resolution, RouteChange, Router};
pub use scroll::{ScrollBehavior, ScrollPolicy, ScrollPosition, ScrollTarget};
