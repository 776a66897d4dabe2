pub mod error;
pub mod query;
pub mod routes;

use anyhow::Context;
use axum::routing::{get, post};
use axum::Router;
use chrono::{DateTime, Utc};
use regdash_core::{DashConfig, Store, WindowResolver};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub config: Arc<DashConfig>,
    pub resolver: WindowResolver,
    pub clock: Clock,
}

impl AppState {
    pub fn new(store: Store, config: DashConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
            resolver: WindowResolver::lab(),
            clock: Arc::new(Utc::now),
        }
    }

    /// Pin "now", e.g. for tests.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/api/summary", get(routes::summary))
        .route("/api/failures", get(routes::failures))
        .route("/api/runs", get(routes::runs))
        .route("/api/by_cloud", get(routes::by_cloud))
        .route("/api/windows", get(routes::windows))
        .route("/api/cloud_trend", get(routes::cloud_trend))
        .route("/details", get(routes::details))
        .route("/ingest/json", post(routes::ingest_json))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Open the configured store and serve until the process is stopped.
pub async fn serve(config: DashConfig) -> anyhow::Result<()> {
    let store = Store::from_config(&config)?;
    let bind = config.bind.clone();
    let app = router(AppState::new(store, config));

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("failed to bind {bind}"))?;
    tracing::info!(addr = %bind, "regdash listening");
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
