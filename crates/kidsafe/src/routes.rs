//! The site's route table

use std::time::Duration;

use kidsafe_router::{RegistryBuilder, Result, RouterConfig, ViewRegistry, ViewSource};

use crate::views::{self, chunk, ViewModule};

/// Lazily loaded routes: (path, name, module)
const LAZY_ROUTES: &[(&str, &str, fn() -> ViewModule)] = &[
    ("/about", "about", views::about),
    ("/login", "login", views::login),
    ("/interactive-games", "interactive-games", views::interactive_games),
    ("/child-help", "child-help", views::child_help),
    ("/safe-sharing", "safe-sharing", views::safe_sharing),
    ("/games/memory-match", "games/memory-match", views::memory_match),
    ("/games/math-puzzle", "games/math-puzzle", views::math_puzzle),
    ("/games/word-scramble", "games/word-scramble", views::word_scramble),
    ("/games/coloring-fun", "games/coloring-fun", views::coloring_fun),
];

/// Builds the frozen route table
///
/// Home is bundled with the application; every other view is fetched on its
/// first visit with the given latency. Unmatched paths fall back to the
/// not-found view.
pub fn build_registry(config: &RouterConfig, latency: Duration) -> Result<ViewRegistry<ViewModule>> {
    let mut builder = RegistryBuilder::from_config(config).eager("/", "home", views::home())?;

    for (path, name, module) in LAZY_ROUTES {
        builder = builder.lazy(path, name, chunk(*module, latency))?;
    }

    let registry = builder
        .not_found("/", "not-found", ViewSource::Eager(views::not_found().into()))?
        .build();

    Ok(registry)
}
