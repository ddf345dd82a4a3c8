//! Ordering and enablement operations over a [`PluginStore`].

use std::sync::Arc;

use tracing::{debug, info};

use crate::{
    Result,
    store::{PluginEntry, PluginStore},
};

/// Tracks installed display plugins, their evaluation order, and enabled
/// state. Ranks are zero-based and ascend with decreasing authority: the
/// chain asks rank 0 first.
pub struct PluginRegistry {
    store: Arc<dyn PluginStore>,
}

impl PluginRegistry {
    pub fn new(store: Arc<dyn PluginStore>) -> Self {
        Self { store }
    }

    /// Every tracked plugin, rank ascending.
    pub async fn list_all(&self) -> Result<Vec<PluginEntry>> {
        Ok(self.store.list().await?)
    }

    /// The plugins the resolution chain should consult, in order.
    pub async fn list_enabled_in_order(&self) -> Result<Vec<PluginEntry>> {
        let mut entries = self.store.list().await?;
        entries.retain(|e| e.enabled);
        Ok(entries)
    }

    /// Track a plugin on first sight: next rank after the current maximum
    /// (0 when the registry is empty), enabled by default. Returns the
    /// plugin's rank either way.
    pub async fn register_if_absent(&self, plugin: &str) -> Result<i64> {
        if let Some(order) = self.store.get_sort_order(plugin).await? {
            return Ok(order);
        }
        let next = self
            .store
            .list()
            .await?
            .iter()
            .map(|e| e.sort_order)
            .max()
            .map_or(0, |m| m + 1);
        self.store.insert(plugin, next).await?;
        info!(plugin, sort_order = next, "display plugin registered");
        Ok(next)
    }

    /// Swap with the previous entry in the full ordering. Returns `false`
    /// (and changes nothing) for the first entry or an unknown name.
    pub async fn move_up(&self, plugin: &str) -> Result<bool> {
        self.swap_with_neighbor(plugin, Direction::Up).await
    }

    /// Swap with the next entry in the full ordering. Returns `false` (and
    /// changes nothing) for the last entry or an unknown name.
    pub async fn move_down(&self, plugin: &str) -> Result<bool> {
        self.swap_with_neighbor(plugin, Direction::Down).await
    }

    async fn swap_with_neighbor(&self, plugin: &str, direction: Direction) -> Result<bool> {
        let entries = self.store.list().await?;
        let Some(position) = entries.iter().position(|e| e.name == plugin) else {
            debug!(plugin, "unknown plugin, reorder ignored");
            return Ok(false);
        };
        let neighbor = match direction {
            Direction::Up => position.checked_sub(1).map(|i| &entries[i]),
            Direction::Down => entries.get(position + 1),
        };
        let Some(neighbor) = neighbor else {
            debug!(plugin, ?direction, "already at the boundary, reorder ignored");
            return Ok(false);
        };
        self.store.swap_sort_orders(plugin, &neighbor.name).await?;
        Ok(true)
    }

    /// Unknown names are a no-op.
    pub async fn enable(&self, plugin: &str) -> Result<()> {
        self.store.set_enabled(plugin, true).await?;
        Ok(())
    }

    /// Disabling removes the plugin from chain consideration without
    /// disturbing anyone's rank.
    pub async fn disable(&self, plugin: &str) -> Result<()> {
        self.store.set_enabled(plugin, false).await?;
        Ok(())
    }

    /// Delete the entry. Remaining ranks are not renumbered; readers order by
    /// rank, never by positional index, so gaps are harmless.
    pub async fn uninstall(&self, plugin: &str) -> Result<()> {
        self.store.remove(plugin).await?;
        info!(plugin, "display plugin uninstalled");
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
enum Direction {
    Up,
    Down,
}
