//! HTTP API application wiring (Axum router + middleware).
//!
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `errors.rs`: consistent error responses
//! - `extract.rs`: extractors that reject with those error responses

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware::{from_fn, from_fn_with_state},
    routing::get,
    Extension, Router,
};
use prometheus::Registry;
use tokio::sync::watch;
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use orgbook_observability::HttpMetrics;

use crate::config::AppConfig;
use crate::middleware;

pub mod errors;
pub mod extract;
pub mod routes;

/// Shared, cheaply cloneable application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    /// Exposed at `/metrics`.
    pub registry: Registry,
    pub metrics: HttpMetrics,
    /// Flips to `true` once the process starts shutting down.
    pub shutdown: watch::Receiver<bool>,
}

impl AppState {
    /// Build the state with a fresh metrics registry.
    pub fn new(
        config: AppConfig,
        shutdown: watch::Receiver<bool>,
    ) -> Result<Self, prometheus::Error> {
        let registry = Registry::new();
        let metrics = HttpMetrics::register(&registry)?;
        Ok(Self {
            config: Arc::new(config),
            registry,
            metrics,
            shutdown,
        })
    }

    pub fn is_draining(&self) -> bool {
        *self.shutdown.borrow()
    }
}

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(state: AppState) -> Router {
    // Tenant-scoped routes stop accepting work while draining; health and
    // metrics stay reachable for the orchestrator.
    let scoped = routes::router().route_layer(from_fn_with_state(
        state.shutdown.clone(),
        middleware::drain_guard,
    ));

    let router = Router::new()
        .route("/health", get(routes::system::health))
        .route("/metrics", get(routes::system::metrics))
        .merge(scoped);

    apply_middleware(router, &state)
}

/// Wrap `router` in the cross-cutting middleware stack.
///
/// Outermost first: request tracing, metrics, panic recovery, error
/// translation, tenant context.
pub fn apply_middleware(router: Router, state: &AppState) -> Router {
    router
        .layer(Extension(state.clone()))
        .layer(DefaultBodyLimit::max(state.config.max_body_bytes))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(from_fn_with_state(
                    state.metrics.clone(),
                    middleware::track_metrics,
                ))
                .layer(CatchPanicLayer::custom(middleware::PanicResponder::new(
                    state.metrics.clone(),
                )))
                .layer(from_fn(middleware::translate_errors))
                .layer(from_fn_with_state(
                    state.config.tenant_id,
                    middleware::tenant_context,
                )),
        )
}
