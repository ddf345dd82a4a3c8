use {clap::Subcommand, visage_config::VisageConfig};

use crate::bootstrap;

#[derive(Subcommand)]
pub enum PluginAction {
    /// List installed plugins in evaluation order.
    List,
    /// Enable a plugin.
    Enable { plugin: String },
    /// Disable a plugin without changing its rank.
    Disable { plugin: String },
    /// Move a plugin one rank earlier (more authoritative).
    Up { plugin: String },
    /// Move a plugin one rank later.
    Down { plugin: String },
    /// Remove a plugin from the registry. Its rank is not reused until
    /// registration passes it.
    Uninstall { plugin: String },
}

pub async fn handle_plugins(action: PluginAction, config: &VisageConfig) -> anyhow::Result<()> {
    let pool = bootstrap::connect_pool(&config.database.path).await?;
    let registry = bootstrap::registry_over(pool);

    match action {
        PluginAction::List => {
            let entries = registry.list_all().await?;
            if entries.is_empty() {
                println!("No display plugins registered.");
                return Ok(());
            }
            println!("{:<6} {:<20} enabled", "order", "plugin");
            for entry in entries {
                println!(
                    "{:<6} {:<20} {}",
                    entry.sort_order,
                    entry.name,
                    if entry.enabled { "yes" } else { "no" }
                );
            }
        },
        PluginAction::Enable { plugin } => {
            registry.enable(&plugin).await?;
            println!("Enabled {plugin}.");
        },
        PluginAction::Disable { plugin } => {
            registry.disable(&plugin).await?;
            println!("Disabled {plugin}.");
        },
        PluginAction::Up { plugin } => {
            if registry.move_up(&plugin).await? {
                println!("Moved {plugin} up.");
            } else {
                println!("{plugin} is already first (or not registered).");
            }
        },
        PluginAction::Down { plugin } => {
            if registry.move_down(&plugin).await? {
                println!("Moved {plugin} down.");
            } else {
                println!("{plugin} is already last (or not registered).");
            }
        },
        PluginAction::Uninstall { plugin } => {
            registry.uninstall(&plugin).await?;
            println!("Uninstalled {plugin}.");
        },
    }

    Ok(())
}
