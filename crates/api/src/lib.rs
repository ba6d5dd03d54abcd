//! Data Desk API Server
//!
//! HTTP front end for the cleaning pipeline and the track explorer. Uploads
//! are parsed and cleaned per request on the blocking pool; the only shared
//! state is the explorer session registry.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tower_governor::GovernorLayer;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;
use track_explorer::SessionRegistry;

pub mod error;
pub mod rate_limit;
mod routes;
pub mod settings;
pub mod telemetry;

pub use settings::{ApiConfig, LoggingConfig, ServerConfig};
pub use error::ApiError;

/// Application state shared across handlers
pub struct AppState {
    /// Live explorer sessions
    pub registry: SessionRegistry,
    /// Active configuration
    pub config: ApiConfig,
    /// Prometheus handle, when a recorder is installed
    pub metrics: Option<PrometheusHandle>,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Create new application state
    pub fn new(config: ApiConfig, metrics: Option<PrometheusHandle>) -> Self {
        Self {
            registry: SessionRegistry::new(config.explorer.clone()),
            config,
            metrics,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
        }
    }
}

/// State handle passed to every handler
pub type SharedState = Arc<RwLock<AppState>>;

/// Create the application router
///
/// Rate limiting needs the peer address and is layered on in [`run_server`].
pub fn create_router(state: SharedState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/api/v1/health", get(routes::system::health))
        .route("/metrics", get(routes::system::metrics))
        .route("/api/v1/clean", post(routes::clean::clean_upload))
        .route("/api/v1/clean/download", post(routes::clean::download_cleaned))
        .route("/api/v1/explorer/sessions", post(routes::explorer::open_session))
        .route(
            "/api/v1/explorer/sessions/:id",
            get(routes::explorer::get_session).delete(routes::explorer::close_session),
        )
        .route(
            "/api/v1/explorer/sessions/:id/insights/:key",
            post(routes::explorer::show_insight),
        )
        .route(
            "/api/v1/explorer/sessions/:id/reset",
            post(routes::explorer::reset_session),
        )
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Initialize logging
pub fn init_logging(config: &LoggingConfig) -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
    let level = config.level.parse::<Level>().unwrap_or(Level::INFO);
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true);

    if config.json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    }
}

/// Periodically drop idle explorer sessions
fn spawn_session_sweeper(state: SharedState, every: Duration) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            state.write().await.registry.evict_idle();
        }
    });
}

/// Run the server
pub async fn run_server(config: ApiConfig) -> anyhow::Result<()> {
    let metrics = match telemetry::install_recorder() {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!("Prometheus recorder unavailable: {}", e);
            None
        }
    };

    let addr: SocketAddr = config.server.bind_addr.parse()?;
    let max_upload_bytes = config.server.max_upload_bytes;
    let sweep_every = Duration::from_secs(config.server.sweep_interval_seconds.max(1));
    let limits = config.rate_limit.clone();

    let state = Arc::new(RwLock::new(AppState::new(config, metrics)));
    spawn_session_sweeper(state.clone(), sweep_every);

    let mut app = create_router(state, max_upload_bytes);
    if limits.enabled {
        let governor = rate_limit::create_governor_config(&limits)
            .ok_or_else(|| anyhow::anyhow!("invalid rate limit: {:?}", limits))?;
        app = app.layer(GovernorLayer { config: governor });
        info!(
            "Rate limiting enabled: burst {}, one request per {}s",
            limits.burst_size, limits.per_second
        );
    }

    info!("Starting API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
