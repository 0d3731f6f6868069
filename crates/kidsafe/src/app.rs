// File: src/app.rs
// Purpose: Application bootstrap wiring the store, views and router

use std::sync::Arc;

use anyhow::{Context, Result};
use kidsafe_router::{MemoryHistory, NavigationOutcome, Router};
use tracing::info;

use crate::config::Config;
use crate::routes::build_registry;
use crate::store::Store;
use crate::views::ViewModule;

/// The running application
pub struct App {
    pub config: Config,
    pub store: Store,
    pub router: Arc<Router<ViewModule>>,
    history: MemoryHistory,
}

impl App {
    /// Initializes the store and the router
    ///
    /// Fails if the route table is invalid.
    pub fn new(config: Config) -> Result<Self> {
        let store = Store::new();

        let registry = build_registry(&config.router, config.views.chunk_latency())
            .context("Invalid route table")?;
        info!("Registered {} routes", registry.len());

        let history = MemoryHistory::new();
        let router = Router::new(registry, Arc::new(history.clone()), config.router.clone());

        Ok(Self {
            config,
            store,
            router: Arc::new(router),
            history,
        })
    }

    /// Shows the mount URL, replacing the initial history entry
    pub async fn mount(&self) -> Result<NavigationOutcome<ViewModule>> {
        info!("Mounting {} at {}", self.config.app.name, self.config.app.mount);
        let outcome = self.router.replace(&self.config.app.mount).await?;
        Ok(outcome)
    }

    /// Navigates to `url`, pushing a history entry
    pub async fn visit(&self, url: &str) -> Result<NavigationOutcome<ViewModule>> {
        let outcome = self.router.push(url).await?;
        Ok(outcome)
    }

    /// HTML of the visible view
    pub async fn render_current(&self) -> Option<String> {
        let current = self.router.current().await?;
        Some(current.view.render().into_string())
    }

    pub fn history(&self) -> &MemoryHistory {
        &self.history
    }
}
