use axum::{
    Router,
    extract::FromRef,
    http::HeaderName,
    middleware,
};

use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Admin access contract and its two enforcement points.
pub mod access;
pub mod gatekeeper;
pub mod session;

// Content API client, page logic and rendering.
pub mod api;
pub mod config;
pub mod content;
pub mod forms;
pub mod handlers;
pub mod login;
pub mod models;
pub mod templates;

// Module for routing segregation (Public, Admin).
pub mod routes;
use routes::{admin, public};

// --- Public Re-exports ---

pub use api::{ApiClient, ApiError};
pub use config::AppConfig;

/// AppState
///
/// Immutable container shared across all requests. Per-request credential
/// state lives in [`session::Session`], never here.
#[derive(Clone)]
pub struct AppState {
    /// Session-less client for the content API. Admin handlers bind it to
    /// their request's session with `ApiClient::with_session`.
    pub api: ApiClient,
    /// Configuration: The loaded, immutable environment configuration.
    pub config: AppConfig,
}

impl AppState {
    /// Builds the shared API client from `config.api_url`.
    pub fn new(config: AppConfig) -> Result<Self, ApiError> {
        let api = ApiClient::new(&config.api_url)?;
        Ok(Self { api, config })
    }
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for ApiClient {
    fn from_ref(app_state: &AppState) -> ApiClient {
        app_state.api.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// create_router
///
/// Assembles the site: public pages, the admin console nested under `/admin`,
/// a 404 fallback, the edge gatekeeper in front of all of them, and the
/// observability stack outermost.
pub fn create_router(state: AppState) -> Router {
    // Header name constant for Request Correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    // 1. Base Router Assembly
    let base_router = Router::new()
        .merge(public::public_routes())
        // Admin Routes: Nested under '/admin', with their own session layer.
        .nest("/admin", admin::admin_routes())
        .fallback(handlers::public::not_found)
        // Edge Gatekeeper: decides redirect-or-allow before any handler (or the
        // fallback) runs. Non-admin paths pass straight through.
        .layer(middleware::from_fn(gatekeeper::gatekeeper))
        .with_state(state);

    // 2. Observability and Correlation Layers (Applied outermost/first)
    base_router.layer(
        ServiceBuilder::new()
            // 2a. Request ID Generation: a UUID for every incoming request.
            .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
            // 2b. Request Tracing: one span per request, carrying the request ID.
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(trace_span_logger)
                    .on_response(
                        DefaultOnResponse::new()
                            .level(Level::INFO)
                            .latency_unit(tower_http::LatencyUnit::Millis),
                    ),
            )
            // 2c. Request ID Propagation: echo x-request-id back to the client.
            .layer(PropagateRequestIdLayer::new(x_request_id)),
    )
}

/// trace_span_logger
///
/// Span factory for `TraceLayer`: HTTP method, URI and the `x-request-id`
/// set by the layer above, so every log line of a request is correlated.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
