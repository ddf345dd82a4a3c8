mod bootstrap;
mod plugin_commands;

use std::{path::PathBuf, sync::Arc};

use {
    clap::{Parser, Subcommand},
    tracing::warn,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
    visage_config::{Severity, VisageConfig, validate_config},
};

#[derive(Parser)]
#[command(name = "visage", about = "Visage — pluggable user identity display")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Address to bind to (overrides config value).
    #[arg(long, global = true)]
    bind: Option<String>,
    /// Port to listen on (overrides config value).
    #[arg(long, global = true)]
    port: Option<u16>,
    /// Explicit config file path (otherwise discovered).
    #[arg(long, global = true, env = "VISAGE_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the admin gateway (default when no subcommand is provided).
    Serve,
    /// Plugin registry management.
    Plugins {
        #[command(subcommand)]
        action: plugin_commands::PluginAction,
    },
    /// Validate the configuration and print diagnostics.
    Doctor,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.json_logs);

    let mut config = match &cli.config {
        Some(path) => visage_config::load_config(path)?,
        None => visage_config::discover_and_load(),
    };
    if let Some(bind) = &cli.bind {
        config.server.bind = bind.clone();
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await,
        Commands::Plugins { action } => plugin_commands::handle_plugins(action, &config).await,
        Commands::Doctor => doctor(&config),
    }
}

fn init_tracing(level: &str, json_logs: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    if json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .init();
    }
}

async fn serve(config: VisageConfig) -> anyhow::Result<()> {
    let report = validate_config(&config);
    for diagnostic in &report.diagnostics {
        warn!(
            severity = %diagnostic.severity,
            path = %diagnostic.path,
            "{}",
            diagnostic.message
        );
    }
    if report.has_errors() {
        anyhow::bail!("configuration has errors; see `visage doctor`");
    }

    let pool = bootstrap::connect_pool(&config.database.path).await?;
    let registry = bootstrap::registry_over(pool);

    // First install ranks disguise ahead of basic so masking plugins get the
    // first look at every field.
    registry
        .register_if_absent(visage_display::PLUGIN_DISGUISE)
        .await?;
    registry
        .register_if_absent(visage_display::PLUGIN_BASIC)
        .await?;

    let state = bootstrap::build_state(&config, Arc::clone(&registry))?;
    visage_gateway::serve(state, &config.server.bind, config.server.port).await?;
    Ok(())
}

fn doctor(config: &VisageConfig) -> anyhow::Result<()> {
    let report = validate_config(config);
    if report.diagnostics.is_empty() {
        println!("Configuration OK.");
        return Ok(());
    }
    for diagnostic in &report.diagnostics {
        println!(
            "{}: {}: {}",
            diagnostic.severity, diagnostic.path, diagnostic.message
        );
    }
    if report.has_errors() {
        anyhow::bail!(
            "{} error(s), {} warning(s)",
            report.count(Severity::Error),
            report.count(Severity::Warning)
        );
    }
    Ok(())
}
