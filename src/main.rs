use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::http::{Method, Request, header};
use axum::response::Response;
use migration::{Migrator, MigratorTrait};
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::Span;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use game_collection_api::config::{Config, Environment, StoreBackend};
use game_collection_api::routes::ROUTES;
use game_collection_api::state::AppState;
use game_collection_api::store::{DatabaseStore, DocumentStore, GameStore, MemoryStore, seed};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize structured logging
    init_tracing(&config.log_level);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = config.environment.as_str(),
        "Starting Game Collection API"
    );

    // Build the game store
    let store = build_store(&config.store_backend).await?;
    tracing::info!(backend = store.backend_name(), "Game store ready");

    if config.seed_sample_games {
        seed::seed_if_empty(store.as_ref()).await?;
    }

    // Build application state
    let state = AppState::new(store, config.clone());

    // Build the application with middleware
    let app = build_app(state, &config);

    // Start the server
    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Server listening");
    for route in ROUTES {
        tracing::info!(method = route.method, path = route.path, "{}", route.description);
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Open the configured backend; the relational one is migrated and the document one indexed
/// before use.
async fn build_store(backend: &StoreBackend) -> anyhow::Result<Arc<dyn GameStore>> {
    match backend {
        StoreBackend::Memory => Ok(Arc::new(MemoryStore::new())),
        StoreBackend::Database { url } => {
            tracing::info!("Connecting to database...");
            let db = game_collection_api::db::connect(url).await?;
            tracing::info!("Database connected");

            tracing::info!("Running database migrations...");
            Migrator::up(&db, None).await?;
            tracing::info!("Migrations applied");

            Ok(Arc::new(DatabaseStore::new(db)))
        }
        StoreBackend::Document { uri, database } => {
            tracing::info!(database = %database, "Connecting to MongoDB...");
            let store = DocumentStore::connect(uri, database).await?;
            store.ping().await?;
            tracing::info!("MongoDB connected");

            store.ensure_indexes().await?;
            tracing::info!("Indexes ensured");

            Ok(Arc::new(store))
        }
    }
}

/// Build the full application router with all middleware layers.
fn build_app(state: AppState, config: &Config) -> Router {
    let cors = if config.environment == Environment::Production {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
            .max_age(Duration::from_secs(3600))
    } else {
        CorsLayer::permissive()
    };

    let trace = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<_>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                status_code = tracing::field::Empty,
            )
        })
        .on_response(|response: &Response, latency: Duration, span: &Span| {
            span.record("status_code", response.status().as_u16());
            tracing::info!(latency_ms = latency.as_millis(), "response");
        });

    game_collection_api::routes::router()
        .with_state(state)
        .layer(ServiceBuilder::new().layer(trace).layer(cors))
}

/// Initialize the `tracing` subscriber with an environment-based filter.
fn init_tracing(log_level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("game_collection_api={log_level},tower_http=info,sea_orm=warn,mongodb=warn")
            .into()
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, shutting down gracefully...");
        },
        () = terminate => {
            tracing::info!("Received terminate signal, shutting down gracefully...");
        },
    }
}
