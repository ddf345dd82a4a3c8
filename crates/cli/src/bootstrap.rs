//! Wiring: database pool, plugin registry, and the resolution chain.

use std::sync::Arc;

use sqlx::SqlitePool;

use {
    visage_config::{NameFormatConfig, VisageConfig},
    visage_display::{
        AvatarUrlRenderer, BasicStrategy, DefaultLocale, DisguiseStrategy, NameFormatter,
        ResolutionChain, StaticMask, UrlBuilder,
    },
    visage_gateway::AppState,
    visage_registry::{PluginRegistry, SqlitePluginStore},
};

/// Open (and if needed create) the registry database.
pub async fn connect_pool(path: &str) -> anyhow::Result<SqlitePool> {
    let url = if path == ":memory:" {
        "sqlite::memory:".to_string()
    } else {
        format!("sqlite://{path}?mode=rwc")
    };
    let pool = SqlitePool::connect(&url).await?;
    SqlitePluginStore::init(&pool).await?;
    Ok(pool)
}

pub fn registry_over(pool: SqlitePool) -> Arc<PluginRegistry> {
    Arc::new(PluginRegistry::new(Arc::new(SqlitePluginStore::new(pool))))
}

/// Assemble the full gateway state from config: formatter, bundled
/// strategies, chain, and the replay token.
pub fn build_state(
    config: &VisageConfig,
    registry: Arc<PluginRegistry>,
) -> anyhow::Result<Arc<AppState>> {
    let urls = Arc::new(UrlBuilder::new(&config.server.base_url)?);
    let formatter = Arc::new(NameFormatter::new(
        NameFormatConfig::from(&config.display),
        Arc::new(DefaultLocale),
    ));
    let pictures = Arc::new(AvatarUrlRenderer::new(UrlBuilder::new(
        &config.server.base_url,
    )?));

    let basic: Arc<BasicStrategy> = Arc::new(BasicStrategy::new(
        Arc::clone(&formatter),
        Arc::clone(&urls),
        pictures,
    ));
    let disguise = Arc::new(DisguiseStrategy::new(
        Arc::clone(&urls),
        config.display.anonymous_user_id,
    ));

    let chain = ResolutionChain::new(Arc::clone(&registry), Arc::clone(&formatter))
        .with_strategy(disguise)
        .with_strategy(Arc::clone(&basic) as Arc<dyn visage_display::DisplayStrategy>)
        .with_fallback(basic);

    let mask = Arc::new(StaticMask::new(config.display.anonymous_user_name.clone()));
    Ok(Arc::new(AppState::new(registry, Arc::new(chain), mask)))
}
