//! History backends
//!
//! The router never owns history storage; it reads and writes entries through
//! the [`History`] trait. In a browser the backend wraps the session history
//! API. [`MemoryHistory`] keeps the stack in memory for native hosts and tests.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::navigation::Location;
use crate::scroll::ScrollPosition;

/// One visited URL and the scroll position recorded for it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Full URL including the base path
    pub href: String,
    /// Location relative to the base path
    pub location: Location,
    /// Position saved when the user left this entry
    pub scroll: Option<ScrollPosition>,
}

impl HistoryEntry {
    pub fn new(location: Location, base_prefix: &str) -> Self {
        Self {
            href: location.href(base_prefix),
            location,
            scroll: None,
        }
    }
}

/// Trait for history backends
#[async_trait]
pub trait History: Send + Sync {
    /// Adds an entry after the current one, dropping any forward entries
    async fn push(&self, entry: HistoryEntry) -> Result<()>;

    /// Overwrites the current entry (pushes when the stack is empty)
    async fn replace(&self, entry: HistoryEntry) -> Result<()>;

    /// The current entry
    async fn current(&self) -> Result<Option<HistoryEntry>>;

    /// The entry `delta` steps away from the current one, without moving
    async fn peek(&self, delta: isize) -> Result<Option<HistoryEntry>>;

    /// Moves `delta` steps and returns the new current entry
    ///
    /// Returns `None` and stays put when the target is out of range.
    async fn go(&self, delta: isize) -> Result<Option<HistoryEntry>>;

    /// Records the scroll position of the current entry
    async fn save_scroll(&self, position: ScrollPosition) -> Result<()>;

    /// Number of entries in the stack
    async fn len(&self) -> Result<usize>;

    /// Get history backend name
    fn name(&self) -> &'static str;
}

#[derive(Debug, Default)]
struct Stack {
    entries: Vec<HistoryEntry>,
    index: Option<usize>,
}

impl Stack {
    fn offset(&self, delta: isize) -> Option<usize> {
        let index = self.index?.checked_add_signed(delta)?;
        (index < self.entries.len()).then_some(index)
    }
}

/// In-memory history backend
#[derive(Clone, Default)]
pub struct MemoryHistory {
    stack: Arc<RwLock<Stack>>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every entry, oldest first
    pub async fn entries(&self) -> Vec<HistoryEntry> {
        self.stack.read().await.entries.clone()
    }

    /// Index of the current entry
    pub async fn index(&self) -> Option<usize> {
        self.stack.read().await.index
    }
}

#[async_trait]
impl History for MemoryHistory {
    async fn push(&self, entry: HistoryEntry) -> Result<()> {
        let mut stack = self.stack.write().await;
        let next = stack.index.map_or(0, |i| i + 1);
        stack.entries.truncate(next);
        stack.entries.push(entry);
        stack.index = Some(next);
        Ok(())
    }

    async fn replace(&self, entry: HistoryEntry) -> Result<()> {
        let mut stack = self.stack.write().await;
        match stack.index {
            Some(index) => stack.entries[index] = entry,
            None => {
                stack.entries.push(entry);
                stack.index = Some(0);
            }
        }
        Ok(())
    }

    async fn current(&self) -> Result<Option<HistoryEntry>> {
        let stack = self.stack.read().await;
        Ok(stack.index.map(|i| stack.entries[i].clone()))
    }

    async fn peek(&self, delta: isize) -> Result<Option<HistoryEntry>> {
        let stack = self.stack.read().await;
        Ok(stack.offset(delta).map(|i| stack.entries[i].clone()))
    }

    async fn go(&self, delta: isize) -> Result<Option<HistoryEntry>> {
        let mut stack = self.stack.write().await;
        let Some(index) = stack.offset(delta) else {
            return Ok(None);
        };
        stack.index = Some(index);
        Ok(Some(stack.entries[index].clone()))
    }

    async fn save_scroll(&self, position: ScrollPosition) -> Result<()> {
        let mut stack = self.stack.write().await;
        if let Some(index) = stack.index {
            stack.entries[index].scroll = Some(position);
        }
        Ok(())
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.stack.read().await.entries.len())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
