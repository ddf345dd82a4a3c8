use std::sync::Mutex;

use {anyhow::Result, async_trait::async_trait, sqlx::SqlitePool};

/// One tracked display plugin: its name, rank in the evaluation order, and
/// enabled flag.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PluginEntry {
    pub name: String,
    pub sort_order: i64,
    pub enabled: bool,
}

/// Persistence seam for plugin ordering and enabled state.
///
/// Implementations must apply each operation atomically;
/// [`PluginStore::swap_sort_orders`] in particular must never be observable
/// half-applied.
#[async_trait]
pub trait PluginStore: Send + Sync {
    /// All entries, sorted by rank ascending.
    async fn list(&self) -> Result<Vec<PluginEntry>>;
    async fn get_sort_order(&self, plugin: &str) -> Result<Option<i64>>;
    async fn get_by_sort_order(&self, sort_order: i64) -> Result<Option<PluginEntry>>;
    async fn set_sort_order(&self, plugin: &str, sort_order: i64) -> Result<()>;
    /// Unknown plugin names are a no-op.
    async fn set_enabled(&self, plugin: &str, enabled: bool) -> Result<()>;
    /// Insert a new entry, enabled by default.
    async fn insert(&self, plugin: &str, sort_order: i64) -> Result<()>;
    async fn remove(&self, plugin: &str) -> Result<()>;
    /// Swap the ranks of two plugins as one atomic step. Missing names are a
    /// no-op.
    async fn swap_sort_orders(&self, a: &str, b: &str) -> Result<()>;
}

// ── SQLite implementation ───────────────────────────────────────────────────

/// Internal row type for sqlx mapping.
#[derive(sqlx::FromRow)]
struct PluginRow {
    plugin: String,
    sortorder: i64,
    enabled: i64,
}

impl From<PluginRow> for PluginEntry {
    fn from(r: PluginRow) -> Self {
        Self {
            name: r.plugin,
            sort_order: r.sortorder,
            enabled: r.enabled != 0,
        }
    }
}

/// SQLite-backed plugin store.
pub struct SqlitePluginStore {
    pool: SqlitePool,
}

impl SqlitePluginStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Initialize the plugins table schema.
    pub async fn init(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"CREATE TABLE IF NOT EXISTS plugins (
                plugin    TEXT    PRIMARY KEY,
                sortorder INTEGER NOT NULL UNIQUE,
                enabled   INTEGER NOT NULL DEFAULT 1
            )"#,
        )
        .execute(pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl PluginStore for SqlitePluginStore {
    async fn list(&self) -> Result<Vec<PluginEntry>> {
        let rows =
            sqlx::query_as::<_, PluginRow>("SELECT * FROM plugins ORDER BY sortorder ASC")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get_sort_order(&self, plugin: &str) -> Result<Option<i64>> {
        let order =
            sqlx::query_scalar::<_, i64>("SELECT sortorder FROM plugins WHERE plugin = ?")
                .bind(plugin)
                .fetch_optional(&self.pool)
                .await?;
        Ok(order)
    }

    async fn get_by_sort_order(&self, sort_order: i64) -> Result<Option<PluginEntry>> {
        let row = sqlx::query_as::<_, PluginRow>("SELECT * FROM plugins WHERE sortorder = ?")
            .bind(sort_order)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Into::into))
    }

    async fn set_sort_order(&self, plugin: &str, sort_order: i64) -> Result<()> {
        sqlx::query("UPDATE plugins SET sortorder = ? WHERE plugin = ?")
            .bind(sort_order)
            .bind(plugin)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn set_enabled(&self, plugin: &str, enabled: bool) -> Result<()> {
        sqlx::query("UPDATE plugins SET enabled = ? WHERE plugin = ?")
            .bind(i64::from(enabled))
            .bind(plugin)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn insert(&self, plugin: &str, sort_order: i64) -> Result<()> {
        sqlx::query("INSERT INTO plugins (plugin, sortorder, enabled) VALUES (?, ?, 1)")
            .bind(plugin)
            .bind(sort_order)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn remove(&self, plugin: &str) -> Result<()> {
        sqlx::query("DELETE FROM plugins WHERE plugin = ?")
            .bind(plugin)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn swap_sort_orders(&self, a: &str, b: &str) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let order_a =
            sqlx::query_scalar::<_, i64>("SELECT sortorder FROM plugins WHERE plugin = ?")
                .bind(a)
                .fetch_optional(&mut *tx)
                .await?;
        let order_b =
            sqlx::query_scalar::<_, i64>("SELECT sortorder FROM plugins WHERE plugin = ?")
                .bind(b)
                .fetch_optional(&mut *tx)
                .await?;
        let (Some(order_a), Some(order_b)) = (order_a, order_b) else {
            // Unknown name: drop the transaction without touching anything.
            return Ok(());
        };

        // Park `a` on a rank no real entry uses so the UNIQUE(sortorder)
        // constraint holds through the swap.
        sqlx::query("UPDATE plugins SET sortorder = -1 WHERE plugin = ?")
            .bind(a)
            .execute(&mut *tx)
            .await?;
        sqlx::query("UPDATE plugins SET sortorder = ? WHERE plugin = ?")
            .bind(order_a)
            .bind(b)
            .execute(&mut *tx)
            .await?;
        sqlx::query("UPDATE plugins SET sortorder = ? WHERE plugin = ?")
            .bind(order_b)
            .bind(a)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}

// ── In-memory implementation ────────────────────────────────────────────────

/// Mutex-guarded in-memory store, for tests and ephemeral setups.
#[derive(Default)]
pub struct MemoryPluginStore {
    entries: Mutex<Vec<PluginEntry>>,
}

impl MemoryPluginStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<PluginEntry>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl PluginStore for MemoryPluginStore {
    async fn list(&self) -> Result<Vec<PluginEntry>> {
        let mut entries = self.lock().clone();
        entries.sort_by_key(|e| e.sort_order);
        Ok(entries)
    }

    async fn get_sort_order(&self, plugin: &str) -> Result<Option<i64>> {
        Ok(self
            .lock()
            .iter()
            .find(|e| e.name == plugin)
            .map(|e| e.sort_order))
    }

    async fn get_by_sort_order(&self, sort_order: i64) -> Result<Option<PluginEntry>> {
        Ok(self
            .lock()
            .iter()
            .find(|e| e.sort_order == sort_order)
            .cloned())
    }

    async fn set_sort_order(&self, plugin: &str, sort_order: i64) -> Result<()> {
        if let Some(entry) = self.lock().iter_mut().find(|e| e.name == plugin) {
            entry.sort_order = sort_order;
        }
        Ok(())
    }

    async fn set_enabled(&self, plugin: &str, enabled: bool) -> Result<()> {
        if let Some(entry) = self.lock().iter_mut().find(|e| e.name == plugin) {
            entry.enabled = enabled;
        }
        Ok(())
    }

    async fn insert(&self, plugin: &str, sort_order: i64) -> Result<()> {
        self.lock().push(PluginEntry {
            name: plugin.to_string(),
            sort_order,
            enabled: true,
        });
        Ok(())
    }

    async fn remove(&self, plugin: &str) -> Result<()> {
        self.lock().retain(|e| e.name != plugin);
        Ok(())
    }

    async fn swap_sort_orders(&self, a: &str, b: &str) -> Result<()> {
        let mut entries = self.lock();
        let pos_a = entries.iter().position(|e| e.name == a);
        let pos_b = entries.iter().position(|e| e.name == b);
        if let (Some(pos_a), Some(pos_b)) = (pos_a, pos_b) {
            let order_a = entries[pos_a].sort_order;
            entries[pos_a].sort_order = entries[pos_b].sort_order;
            entries[pos_b].sort_order = order_a;
        }
        Ok(())
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        SqlitePluginStore::init(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn insert_and_list_sorted() {
        let store = SqlitePluginStore::new(test_pool().await);
        store.insert("basic", 1).await.unwrap();
        store.insert("disguise", 0).await.unwrap();

        let entries = store.list().await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "disguise");
        assert_eq!(entries[1].name, "basic");
        assert!(entries.iter().all(|e| e.enabled));
    }

    #[tokio::test]
    async fn get_by_sort_order_and_name() {
        let store = SqlitePluginStore::new(test_pool().await);
        store.insert("basic", 0).await.unwrap();

        assert_eq!(store.get_sort_order("basic").await.unwrap(), Some(0));
        assert_eq!(store.get_sort_order("missing").await.unwrap(), None);
        let entry = store.get_by_sort_order(0).await.unwrap().unwrap();
        assert_eq!(entry.name, "basic");
        assert!(store.get_by_sort_order(7).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn set_enabled_toggles_flag_only() {
        let store = SqlitePluginStore::new(test_pool().await);
        store.insert("basic", 0).await.unwrap();

        store.set_enabled("basic", false).await.unwrap();
        let entry = store.get_by_sort_order(0).await.unwrap().unwrap();
        assert!(!entry.enabled);
        assert_eq!(entry.sort_order, 0);

        // Unknown plugin is a no-op, not an error.
        store.set_enabled("missing", true).await.unwrap();
    }

    #[tokio::test]
    async fn swap_respects_unique_constraint() {
        let store = SqlitePluginStore::new(test_pool().await);
        store.insert("disguise", 0).await.unwrap();
        store.insert("basic", 1).await.unwrap();

        store.swap_sort_orders("disguise", "basic").await.unwrap();

        assert_eq!(store.get_sort_order("disguise").await.unwrap(), Some(1));
        assert_eq!(store.get_sort_order("basic").await.unwrap(), Some(0));
    }

    #[tokio::test]
    async fn swap_with_unknown_name_is_a_noop() {
        let store = SqlitePluginStore::new(test_pool().await);
        store.insert("basic", 0).await.unwrap();

        store.swap_sort_orders("basic", "missing").await.unwrap();
        assert_eq!(store.get_sort_order("basic").await.unwrap(), Some(0));
    }

    #[tokio::test]
    async fn set_sort_order_moves_a_single_entry() {
        let store = SqlitePluginStore::new(test_pool().await);
        store.insert("basic", 0).await.unwrap();

        store.set_sort_order("basic", 5).await.unwrap();
        assert_eq!(store.get_sort_order("basic").await.unwrap(), Some(5));
    }

    #[tokio::test]
    async fn remove_deletes_entry() {
        let store = SqlitePluginStore::new(test_pool().await);
        store.insert("basic", 0).await.unwrap();
        store.remove("basic").await.unwrap();
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn memory_store_mirrors_sqlite_behavior() {
        let store = MemoryPluginStore::new();
        store.insert("disguise", 0).await.unwrap();
        store.insert("basic", 1).await.unwrap();

        store.swap_sort_orders("disguise", "basic").await.unwrap();
        let entries = store.list().await.unwrap();
        assert_eq!(entries[0].name, "basic");
        assert_eq!(entries[1].name, "disguise");

        store.set_enabled("basic", false).await.unwrap();
        assert!(!store.list().await.unwrap()[0].enabled);
    }
}
