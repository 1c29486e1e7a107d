//! Main server module - Axum setup and router configuration
//!
//! Opens the database, seeds the default inventory, and serves the car API
//! until Ctrl+C or SIGTERM.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::{http::StatusCode, routing::get, Router};
use clap::Parser;
use tokio::net::TcpListener;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::db::Database;
use crate::routes::{self, ServerState};
use crate::seed;

/// Server command-line arguments
#[derive(Parser, Debug, Clone)]
#[command(name = "carlot", version, about = "Car inventory REST service")]
pub struct ServerArgs {
    /// Port to listen on
    #[arg(short, long, env = "CARLOT_PORT", default_value = "8080")]
    pub port: u16,

    /// Bind address
    #[arg(short, long, env = "CARLOT_BIND", default_value = "127.0.0.1")]
    pub bind: String,

    /// Database file path (default: ~/.carlot/cars.db)
    #[arg(long, env = "CARLOT_DB_PATH")]
    pub db_path: Option<PathBuf>,

    /// Use a transient in-memory database (overrides --db-path)
    #[arg(long)]
    pub in_memory: bool,

    /// Request timeout in seconds
    #[arg(long, env = "CARLOT_TIMEOUT", default_value = "30")]
    pub timeout: u64,

    /// Skip inserting the default cars into an empty store
    #[arg(long)]
    pub no_seed: bool,

    /// Debug logging when RUST_LOG is not set
    #[arg(long)]
    pub debug: bool,
}

impl Default for ServerArgs {
    fn default() -> Self {
        Self {
            port: 8080,
            bind: "127.0.0.1".to_string(),
            db_path: None,
            in_memory: false,
            timeout: 30,
            no_seed: false,
            debug: false,
        }
    }
}

impl ServerArgs {
    /// Socket address assembled from `bind` and `port`
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.bind, self.port)
            .parse()
            .with_context(|| format!("invalid bind address '{}:{}'", self.bind, self.port))
    }

    /// Database path, falling back to ~/.carlot/cars.db
    pub fn resolved_db_path(&self) -> PathBuf {
        self.db_path.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".carlot")
                .join("cars.db")
        })
    }
}

/// Run the server with the given arguments
pub async fn run_server(args: ServerArgs) -> anyhow::Result<()> {
    let addr = args.socket_addr()?;

    let db = if args.in_memory {
        info!("Opening in-memory database");
        Database::open_in_memory().context("failed to open in-memory database")?
    } else {
        let db_path = args.resolved_db_path();
        info!("Opening database at {}", db_path.display());
        Database::open(&db_path)
            .with_context(|| format!("failed to open database at {}", db_path.display()))?
    };

    if args.no_seed {
        info!("Seeding disabled");
    } else {
        seed::seed_if_empty(&db).context("failed to seed default cars")?;
    }

    let app = build_router(db, args.timeout);

    info!("Starting carlot on http://{}", addr);
    let listener = TcpListener::bind(addr).await?;

    // Run with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Create the Axum router with all routes
pub fn build_router(db: Database, timeout_secs: u64) -> Router {
    let state = Arc::new(ServerState::new(db.clone()));

    // CORS layer for local development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Middleware stack
    let middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(timeout_secs),
        ))
        .layer(cors);

    Router::new()
        // Health
        .route("/health", get(routes::health_check))
        // Cars
        .route("/api/cars", get(routes::list_cars).post(routes::create_car))
        .route("/api/cars/color/{color}", get(routes::cars_by_color))
        .route(
            "/api/cars/price/between/{min}/{max}",
            get(routes::cars_by_price_between),
        )
        .route("/api/cars/price/under/{max}", get(routes::cars_by_price_under))
        .route("/api/cars/price/over/{min}", get(routes::cars_by_price_over))
        .with_state(db)
        // Health needs full state for uptime
        .layer(axum::Extension(state))
        .layer(middleware)
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                warn!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
