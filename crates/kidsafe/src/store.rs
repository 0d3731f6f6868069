//! Global state container
//!
//! Created once when the app starts. The router never holds a handle, so
//! navigation cannot read or change application state.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

/// Cloneable handle to the application state
#[derive(Debug, Clone, Default)]
pub struct Store {
    state: Arc<RwLock<HashMap<String, String>>>,
}

impl Store {
    pub fn new() -> Self {
        debug!("Store initialized");
        Self::default()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_new_store_is_empty() {
        let store = Store::new();
        assert!(store.is_empty().await);
        assert!(store.clone().is_empty().await);
    }
}
