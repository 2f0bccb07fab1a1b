//! mvista-api - MusicVista catalog browse and insights service
//!
//! Serves artist, album and track search plus catalog-wide insights as JSON
//! over HTTP from a SQLite catalog database.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use mvista_api::{build_router, AppState};
use mvista_common::config::{
    cors_origins_from_env, parse_origin_list, ConfigOverrides, ServerConfig,
};
use mvista_common::db;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Command-line arguments; each may also come from the environment
#[derive(Parser, Debug)]
#[command(name = "mvista-api")]
#[command(about = "MusicVista catalog API server")]
#[command(version)]
struct Args {
    /// TOML config file
    #[arg(short, long, env = "MVISTA_CONFIG")]
    config: Option<PathBuf>,

    /// Address to listen on
    #[arg(long, env = "MVISTA_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// Catalog database file
    #[arg(short, long, env = "MVISTA_DATABASE")]
    database: Option<PathBuf>,

    /// Open the database read-only and skip schema creation
    #[arg(long, env = "MVISTA_READ_ONLY")]
    read_only: bool,

    /// Deployment environment name
    #[arg(short, long, env = "MVISTA_ENV")]
    environment: Option<String>,

    /// Allowed CORS origin, repeatable or comma-separated; `*` allows any
    /// (default from MVISTA_CORS_ORIGINS, then FRONTEND_URL)
    #[arg(long = "cors-origin", value_delimiter = ',')]
    cors_origins: Vec<String>,

    /// Log level (trace, debug, info, warn, error); RUST_LOG still wins
    #[arg(long, env = "MVISTA_LOG_LEVEL")]
    log_level: Option<String>,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            config_file: self.config.clone(),
            host: self.host.clone(),
            port: self.port,
            database_path: self.database.clone(),
            read_only: self.read_only,
            environment: self.environment.clone(),
            cors_origins: parse_origin_list(&self.cors_origins.join(","))
                .or_else(cors_origins_from_env),
            log_level: self.log_level.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = ServerConfig::resolve(&args.overrides()).context("Failed to load configuration")?;

    // RUST_LOG wins over the configured level
    let level = &config.log_level;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "mvista_api={level},mvista_common={level},tower_http={level}"
        ))
    });
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting MusicVista API (mvista-api) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    match &config.config_file {
        Some(path) => info!("Config file: {}", path.display()),
        None => info!("No config file found, using defaults"),
    }
    info!("Environment: {}", config.environment);
    info!("Database path: {}", config.database_path.display());
    info!("CORS origins: {}", config.cors_origins.join(", "));

    let pool = if config.read_only {
        db::connect_readonly(&config.database_path).await
    } else {
        db::init_database(&config.database_path).await
    };
    let pool = match pool {
        Ok(pool) => {
            if config.read_only {
                info!("✓ Connected to database (read-only)");
            } else {
                info!("✓ Database ready");
            }
            pool
        }
        Err(e) => {
            error!("Failed to open database: {}", e);
            return Err(e.into());
        }
    };

    let state = AppState::new(pool, &config.environment);
    let app = build_router(state, &config.cors_origins);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("mvista-api listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
