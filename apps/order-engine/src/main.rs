//! Order Engine Binary
//!
//! Starts the Storefront order engine.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin order-engine
//! ```
//!
//! # Environment Variables
//!
//! ## Required
//! - `DATABASE_URL`: Postgres connection string
//! - `JWT_SECRET_KEY`: bearer-token signing secret
//!
//! ## Optional
//! - `HTTP_PORT`: HTTP server port (default: 8080)
//! - `CONFIG_PATH`: YAML config file (default: config.yaml if present)
//! - `DEFAULT_SHIPPING_FEE`: fee applied when an order omits one
//! - `RUST_LOG`: Log level (default: info)

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::signal;

use order_engine::application::use_cases::{
    ListOrdersUseCase, ManageCartUseCase, PlaceOrderUseCase, UpdateOrderStatusUseCase,
};
use order_engine::config::{load_config, Config};
use order_engine::domain::shared::Money;
use order_engine::infrastructure::http::{create_router, AppState, JwtAuth};
use order_engine::infrastructure::persistence::PgStore;

/// Application state wired over the Postgres store.
type PgAppState = AppState<PgStore, PgStore, PgStore>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();
    init_tracing();

    tracing::info!("Starting Storefront Order Engine");

    let config_path = std::env::var("CONFIG_PATH").ok();
    let config = load_config(config_path.as_deref()).context("loading configuration")?;
    log_config(&config);

    let store = PgStore::connect(&config.database.url, config.database.max_connections)
        .await
        .context("connecting to the database")?;
    store.migrate().await.context("running migrations")?;
    tracing::info!("Database ready");

    let state = create_state(&config, &store);
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.server.bind_address, config.server.http_port)
        .parse()
        .context("parsing bind address")?;

    tracing::info!(%addr, "HTTP server starting");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health");
    tracing::info!("  POST /api/v1/orders");
    tracing::info!("  GET  /api/v1/orders");
    tracing::info!("  GET  /api/v1/orders/recent");
    tracing::info!("  GET  /api/v1/orders/current-month-revenue");
    tracing::info!("  GET  /api/v1/orders/by-time-range");
    tracing::info!("  GET  /api/v1/orders/{{user_id}}");
    tracing::info!("  PUT  /api/v1/orders/{{order_id}}/status");
    tracing::info!("  GET  /api/v1/cart");
    tracing::info!("  POST /api/v1/cart");

    let listener = TcpListener::bind(addr).await.context("binding listener")?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;

    tracing::info!("Order engine stopped");
    Ok(())
}

/// Load .env file from current directory or any ancestor directory.
fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}

/// Initialize the tracing subscriber with environment filter.
///
/// Uses static directive strings that are compile-time constants guaranteed to parse.
#[allow(clippy::expect_used)]
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(
                "order_engine=info"
                    .parse()
                    .expect("static directive 'order_engine=info' is valid"),
            ),
        )
        .init();
}

/// Log the parsed configuration (never the secrets).
fn log_config(config: &Config) {
    tracing::info!(
        http_port = config.server.http_port,
        bind_address = %config.server.bind_address,
        max_connections = config.database.max_connections,
        default_shipping_fee = %config.ordering.default_shipping_fee,
        "Configuration loaded"
    );
}

/// Wire the use cases over the Postgres store.
fn create_state(config: &Config, store: &PgStore) -> PgAppState {
    let store = Arc::new(store.clone());
    let default_fee = Money::new(config.ordering.default_shipping_fee);

    AppState {
        place_order: Arc::new(PlaceOrderUseCase::new(
            Arc::clone(&store),
            Arc::clone(&store),
            default_fee,
        )),
        update_status: Arc::new(UpdateOrderStatusUseCase::new(Arc::clone(&store))),
        list_orders: Arc::new(ListOrdersUseCase::new(Arc::clone(&store))),
        cart: Arc::new(ManageCartUseCase::new(Arc::clone(&store), Arc::clone(&store))),
        auth: Arc::new(JwtAuth::new(&config.auth.jwt_secret)),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }
}

/// Wait for shutdown signal (SIGTERM or SIGINT).
///
/// # Panics
///
/// Panics if signal handlers cannot be installed. This is intentional because:
/// - Signal handlers are critical for graceful shutdown
/// - Failure to install handlers means the process cannot respond to termination signals
/// - It is better to fail fast during startup than to have an unresponsive process
#[allow(clippy::expect_used)]
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("signal handler installation is critical for graceful shutdown");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("SIGTERM handler installation is critical for graceful shutdown")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating shutdown");
        }
    }
}
