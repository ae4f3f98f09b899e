//! GidroAtlas server - main entry point
//!
//! Loads layered configuration, connects to the database, applies
//! migrations and serves the object registry REST API.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{routing::get, Json, Router};
use clap::Parser;
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use object_registry::ObjectRegistryModule;
use sea_orm::{ConnectOptions, Database};
use serde::{Deserialize, Serialize};
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "gidroatlas-server")]
#[command(about = "Water-resource object registry server")]
#[command(version)]
struct Args {
    /// YAML configuration file; missing files are skipped
    #[arg(short, long, default_value = "config/gidroatlas.yaml", env = "GIDROATLAS_CONFIG")]
    config: PathBuf,

    /// Override the listen address from configuration
    #[arg(short, long)]
    bind: Option<SocketAddr>,

    /// Print the effective configuration as YAML and exit
    #[arg(long)]
    print_config: bool,

    /// Apply migrations and exit without serving
    #[arg(long)]
    migrate_only: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct AppConfig {
    #[serde(default)]
    server: ServerConfig,
    #[serde(default)]
    database: DatabaseConfig,
    #[serde(default)]
    logging: LoggingConfig,
    #[serde(default)]
    object_registry: object_registry::Config,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct ServerConfig {
    bind_addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8087)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct DatabaseConfig {
    url: String,
    max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://gidroatlas.db?mode=rwc".to_string(),
            max_connections: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct LoggingConfig {
    /// EnvFilter directives, overridden by RUST_LOG
    level: String,
    json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Defaults, then the YAML file, then `GIDROATLAS__SECTION__KEY` variables
fn load_config(path: &Path) -> Result<AppConfig> {
    Figment::from(Serialized::defaults(AppConfig::default()))
        .merge(Yaml::file(path))
        .merge(Env::prefixed("GIDROATLAS__").split("__"))
        .extract()
        .with_context(|| format!("Failed to load configuration from {}", path.display()))
}

fn init_logging(cfg: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.level));
    let registry = tracing_subscriber::registry().with(filter);

    if cfg.json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut cfg = load_config(&args.config)?;
    if let Some(bind) = args.bind {
        cfg.server.bind_addr = bind;
    }

    if args.print_config {
        print!("{}", serde_yaml::to_string(&cfg)?);
        return Ok(());
    }

    init_logging(&cfg.logging);
    info!(config = %args.config.display(), "Starting GidroAtlas server");

    let mut options = ConnectOptions::new(cfg.database.url.clone());
    options.max_connections(cfg.database.max_connections);
    let db = Arc::new(
        Database::connect(options)
            .await
            .context("Failed to connect to database")?,
    );
    info!("Database connected");

    let registry = ObjectRegistryModule::new(cfg.object_registry.clone());
    registry.migrate(&db).await?;
    if args.migrate_only {
        info!("Migrations applied, exiting");
        return Ok(());
    }
    registry.init(db).await?;

    let app = registry
        .register_rest(Router::new())?
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http());

    info!("Starting HTTP server on {}", cfg.server.bind_addr);
    let listener = tokio::net::TcpListener::bind(cfg.server.bind_addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "GidroAtlas",
    }))
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
