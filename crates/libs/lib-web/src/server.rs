//! # Server Setup
//!
//! Server initialization, route registration, and HTTP server startup.
//!
//! ## Routes
//!
//! | Method | Path           | Handler                                   |
//! |--------|----------------|-------------------------------------------|
//! | POST   | `/api/contact` | [`handlers::contact::submit_contact`]     |
//! | GET    | `/ws`          | [`handlers::websocket::chat_websocket`]   |
//! | GET    | `/health`      | plain `OK`                                |
//! | *      | anything else  | static site if configured, otherwise 404  |

// region: --- Imports
use crate::chat::ChatRelay;
use crate::handlers;
use crate::middleware::{log_requests, stamp_req, RequestStamp};
use axum::http::{header, HeaderValue, Method};
use axum::{
    routing::{get, post},
    Router,
};
use lib_core::{AppError, Config, ContactStore, MemContactStore};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tracing::{info, warn};
// endregion: --- Imports

// region: --- AppState
/// Application state shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub contacts: Arc<dyn ContactStore>,
    pub relay: Arc<ChatRelay>,
}

impl AppState {
    pub fn new(config: Config, contacts: Arc<dyn ContactStore>) -> Self {
        let relay = Arc::new(ChatRelay::new(config.bot_reply_delay()));
        Self {
            config,
            contacts,
            relay,
        }
    }
}

impl axum::extract::FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl axum::extract::FromRef<AppState> for Arc<dyn ContactStore> {
    fn from_ref(state: &AppState) -> Self {
        state.contacts.clone()
    }
}

impl axum::extract::FromRef<AppState> for Arc<ChatRelay> {
    fn from_ref(state: &AppState) -> Self {
        state.relay.clone()
    }
}
// endregion: --- AppState

// region: --- Server Setup
/// Install the global tracing subscriber.
///
/// Unknown levels fall back to `info`.
pub fn init_tracing(log_level: &str) -> anyhow::Result<()> {
    let level = match log_level {
        "trace" | "debug" | "info" | "warn" | "error" => log_level,
        _ => "info",
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(level))
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .with_file(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to set global tracing subscriber: {}", e))
}

/// Initialize and start the HTTP server.
///
/// Runs until Ctrl-C, then drains in-flight requests.
///
/// # Errors
///
/// Returns an error if tracing cannot be installed or the bind address is unavailable.
pub async fn start_server(config: Config) -> anyhow::Result<()> {
    init_tracing(&config.log_level)?;

    info!(" SMARTSCALE SITE BACKEND STARTING");
    info!(" Log level: {}", config.log_level);
    info!(" Contact inbox: {}", config.contact_inbox);
    info!(" Bot reply delay: {}ms", config.bot_reply_delay_ms);

    let contacts: Arc<dyn ContactStore> = Arc::new(MemContactStore::new());
    let state = AppState::new(config.clone(), contacts);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;

    info!(" SERVER READY: http://{}", config.bind_address);
    log_server_info(&config);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!(" Server stopped");
    Ok(())
}

/// Create the main application router with all routes
pub fn create_router(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    info!("[ROUTE SETUP] Registering HTTP routes...");
    let router = Router::new()
        .route("/api/contact", post(handlers::contact::submit_contact))
        .route("/ws", get(handlers::websocket::chat_websocket))
        .route("/health", get(|| async { "OK" }));

    let router = match &state.config.static_dir {
        Some(dir) => {
            info!("[ROUTE SETUP] Serving static site from {}", dir.display());
            let index = ServeFile::new(dir.join("index.html"));
            router.fallback_service(ServeDir::new(dir).fallback(index))
        }
        None => router.fallback(|| async {
            info!("[404 HANDLER] Unmatched route - returning 404");
            AppError::NotFound("Route not found".to_string())
        }),
    };

    router
        .with_state(state)
        .layer(axum::middleware::from_fn(log_requests))
        // Wraps log_requests so the stamp is already set when it runs.
        .layer(axum::middleware::from_fn(stamp_req))
        .layer(
            tower_http::trace::TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    let request_id = request
                        .extensions()
                        .get::<RequestStamp>()
                        .map(|s| s.id.clone())
                        .unwrap_or_else(|| "pending".to_string());
                    tracing::info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = %request.method(),
                        uri = %request.uri(),
                        version = ?request.version(),
                    )
                })
                .on_failure(
                    |error: tower_http::classify::ServerErrorsFailureClass,
                     latency: std::time::Duration,
                     _span: &tracing::Span| {
                        tracing::error!(
                            error = ?error,
                            latency_ms = latency.as_millis(),
                            "[HTTP FAILURE] Error: {:?}, Latency: {}ms",
                            error,
                            latency.as_millis()
                        );
                    },
                ),
        )
        .layer(cors)
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!(" Shutdown signal received"),
        Err(e) => {
            warn!(error = %e, " Could not listen for Ctrl-C; graceful shutdown disabled");
            std::future::pending::<()>().await;
        }
    }
}

/// Log server information
fn log_server_info(config: &Config) {
    info!(" CONTACT:");
    info!("   • POST /api/contact");
    info!(" CHAT:");
    info!("   • GET  /ws (WebSocket)");
    info!(" HEALTH:");
    info!("   • GET  /health");
    if let Some(dir) = &config.static_dir {
        info!(" STATIC SITE: {}", dir.display());
    }
    info!(" CORS origins: {}", config.allowed_origins.join(", "));
}
// endregion: --- Server Setup

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn test_app(config: Config) -> Router {
        create_router(AppState::new(config, Arc::new(MemContactStore::new())))
    }

    #[tokio::test]
    async fn test_health_returns_ok() {
        let response = test_app(Config::default())
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"OK");
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let response = test_app(Config::default())
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body, serde_json::json!({"message": "Route not found"}));
    }

    #[tokio::test]
    async fn test_static_dir_serves_index_for_unknown_paths() {
        let dir = std::env::temp_dir().join(format!("site-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("index.html"), "<h1>SmartScale</h1>").unwrap();

        let config = Config {
            static_dir: Some(dir.clone()),
            ..Config::default()
        };
        let response = test_app(config)
            .oneshot(Request::builder().uri("/services").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"<h1>SmartScale</h1>");

        std::fs::remove_dir_all(dir).ok();
    }
}
