use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

mod config;
mod db;
mod error;
mod handlers;
mod models;

use crate::config::Config;
use crate::db::{MemoryStorage, PgStorage, Storage};

/// Shared application state. Cheap to clone: storage handles are pools or Arcs.
#[derive(Clone)]
pub struct AppState<S> {
    pub db: S,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present (ignored in production where env vars are injected)
    dotenv::dotenv().ok();

    // Structured logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,warehouse_service=debug"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    let config = Config::from_env()?;

    info!("Warehouse service starting");

    match &config.database_url {
        Some(url) => {
            info!("Connecting to PostgreSQL...");
            let pool = PgPoolOptions::new()
                .max_connections(config.max_connections)
                .connect(url)
                .await
                .context("failed to connect to DATABASE_URL")?;
            info!("Database connection pool established.");

            info!("Running migrations...");
            sqlx::migrate!("./migrations").run(&pool).await?;
            info!("Migrations complete.");

            serve(&config, AppState { db: PgStorage::new(pool) }).await
        }
        None => {
            warn!("DATABASE_URL not set; data is kept in memory and lost on exit");
            serve(&config, AppState { db: MemoryStorage::new() }).await
        }
    }
}

async fn serve<S: Storage>(config: &Config, state: AppState<S>) -> anyhow::Result<()> {
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn build_router<S: Storage>(state: AppState<S>) -> Router {
    use handlers::{products, warehouses};

    Router::new()
        // ── Health ──────────────────────────────────────────────────────────
        .route("/health", get(handlers::health::<S>))

        // ── Products ────────────────────────────────────────────────────────
        .route("/products/add", post(products::add_product::<S>))
        .route("/products/all", get(products::all_products::<S>))
        .route("/products/:id", get(products::get_product::<S>))

        // ── Warehouses ──────────────────────────────────────────────────────
        .route("/warehouse/add", post(warehouses::add_warehouse::<S>))
        .route("/warehouse/all", get(warehouses::all_warehouses::<S>))
        .route("/warehouse/:id", get(warehouses::get_warehouse::<S>))
        .route(
            "/warehouse/:id/addProduct",
            post(warehouses::add_product_to_warehouse::<S>),
        )

        // ── Middleware ──────────────────────────────────────────────────────
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
