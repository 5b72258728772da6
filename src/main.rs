//! Library API server
//!
//! Reads configuration from a TOML file (`LIBRARY_API_CONFIG`, or
//! ~/.config/library-api/config.toml) and serves the REST API.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::task::JoinError;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use library_api::config::LoggingSection;
use library_api::domain::RepositoryProvider;
use library_api::infrastructure::database::seed::seed_demo_data;
use library_api::shared::shutdown::ShutdownCoordinator;
use library_api::{
    create_api_router, default_config_path, init_and_migrate, AppConfig, SeaOrmRepositoryProvider,
};

fn init_tracing(logging: &LoggingSection) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));
    if logging.json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn log_server_exit(result: Result<std::io::Result<()>, JoinError>) {
    match result {
        Ok(Ok(())) => info!("REST API server stopped"),
        Ok(Err(e)) => error!("REST API server error: {}", e),
        Err(e) => error!("REST API server task failed: {}", e),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = std::env::var("LIBRARY_API_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| default_config_path());
    let app_cfg = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            init_tracing(&cfg.logging);
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            let cfg = AppConfig::default();
            init_tracing(&cfg.logging);
            error!("Failed to load config: {}. Using defaults.", e);
            cfg
        }
    };

    info!("Starting Library API...");

    // ── Database ───────────────────────────────────────────────
    let db_config = app_cfg.database.to_database_config();
    info!("Database: {}", db_config.url);

    let db = match init_and_migrate(&db_config).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to prepare database: {}", e);
            return Err(e.into());
        }
    };
    info!("Migrations completed");

    let repos: Arc<dyn RepositoryProvider> = Arc::new(SeaOrmRepositoryProvider::new(db.clone()));

    if app_cfg.database.seed {
        match seed_demo_data(repos.as_ref()).await {
            Ok(0) => info!("Database already holds authors, skipping demo data"),
            Ok(n) => info!("Seeded {} demo authors", n),
            Err(e) => {
                error!("Failed to seed demo data: {}", e);
                return Err(e.into());
            }
        }
    }

    // Initialize shutdown coordinator
    let shutdown = ShutdownCoordinator::new(app_cfg.server.shutdown_timeout);
    let shutdown_signal = shutdown.signal();
    shutdown.start_signal_listener();

    // Create REST API router
    let api_router = create_api_router(db.clone(), repos, &app_cfg, &shutdown_signal);

    let api_addr = app_cfg.server.address();
    let listener = tokio::net::TcpListener::bind(&api_addr).await?;
    info!("REST API server listening on http://{}", api_addr);
    info!("Swagger UI available at http://{}/docs/", api_addr);

    let api_shutdown = shutdown_signal.clone();
    let api_server = axum::serve(
        listener,
        api_router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        api_shutdown.wait().await;
        info!("REST API server received shutdown signal");
    });

    let mut api_task = tokio::spawn(async move { api_server.await });

    tokio::select! {
        result = &mut api_task => log_server_exit(result),
        _ = shutdown_signal.wait() => {
            match tokio::time::timeout(shutdown.timeout(), &mut api_task).await {
                Ok(result) => log_server_exit(result),
                Err(_) => {
                    warn!(
                        "In-flight requests did not finish within {:?}, aborting",
                        shutdown.timeout()
                    );
                    api_task.abort();
                }
            }
        }
    }

    if let Err(e) = db.close().await {
        warn!("Error closing database connection: {}", e);
    } else {
        info!("Database connection closed");
    }

    info!("Library API shutdown complete");
    Ok(())
}
