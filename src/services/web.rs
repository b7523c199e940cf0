//! Axum-based HTTP server for the display API.
//!
//! Provides REST endpoints for:
//! - GET `/api/state` - What the display currently shows
//! - POST `/api/text` - Write text (`{"text": "12:34"}`) or raw bytes (`{"bytes": [128, 49]}`)
//! - POST `/api/clear` - Blank every digit
//! - GET `/` - Web UI (serves index.html)

use std::fmt::Display;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::config::WebConfig;
use crate::device::DeviceError;
use crate::traits::DigitalOutputBank;

use super::api::{ApiResponse, DisplayState, SetTextRequest, WriteResponse};
use super::shared::SharedDisplay;

fn device_error<E: Display>(err: DeviceError<E>) -> (StatusCode, Json<ApiResponse<WriteResponse>>) {
    let status = match err {
        DeviceError::Busy => StatusCode::CONFLICT,
        DeviceError::Config(_) | DeviceError::Line(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    log::warn!("display request failed: {}", err);
    (status, Json(ApiResponse::err(err.to_string())))
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /api/state - Returns what the display shows
async fn get_state<B>(
    State(display): State<Arc<SharedDisplay<B>>>,
) -> Json<ApiResponse<DisplayState>>
where
    B: DigitalOutputBank + Send + 'static,
{
    Json(ApiResponse::ok(display.state()))
}

/// POST /api/text - Write text or raw bytes
///
/// Accepts JSON: `{"text": "12.5"}` or `{"bytes": [128]}`.
/// Fails with 409 while another writer holds the display.
async fn set_text<B>(
    State(display): State<Arc<SharedDisplay<B>>>,
    body: Bytes,
) -> (StatusCode, Json<ApiResponse<WriteResponse>>)
where
    B: DigitalOutputBank + Send + 'static,
    B::Error: Display,
{
    let request = match serde_json::from_slice::<SetTextRequest>(&body) {
        Ok(request) => request,
        Err(e) => {
            log::warn!("rejected text request: {}", e);
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::err("Invalid text request")),
            );
        }
    };

    match display.try_write_with_state(request.payload()) {
        Ok((accepted, state)) => (
            StatusCode::OK,
            Json(ApiResponse::ok(WriteResponse::new(accepted, state))),
        ),
        Err(e) => device_error(e),
    }
}

/// POST /api/clear - Blank the display
///
/// Fails with 409 while another writer holds the display.
async fn clear<B>(
    State(display): State<Arc<SharedDisplay<B>>>,
) -> (StatusCode, Json<ApiResponse<WriteResponse>>)
where
    B: DigitalOutputBank + Send + 'static,
    B::Error: Display,
{
    match display.try_clear() {
        Ok(state) => (
            StatusCode::OK,
            Json(ApiResponse::ok(WriteResponse::new(0, state))),
        ),
        Err(e) => device_error(e),
    }
}

/// GET / - Serve the web UI
async fn index() -> impl IntoResponse {
    Html(include_str!("../../www/index.html"))
}

/// Fallback handler for 404
async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::<()>::err("Not found")),
    )
}

// ============================================================================
// Server Builder
// ============================================================================

/// Configuration for the web server
#[derive(Debug, Clone)]
pub struct WebServerConfig {
    /// Address to bind to
    pub addr: SocketAddr,
    /// Whether to enable CORS for all origins
    pub cors_permissive: bool,
}

impl Default for WebServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            cors_permissive: true,
        }
    }
}

impl WebServerConfig {
    /// Create a new config with the given address
    pub fn new(addr: impl Into<SocketAddr>) -> Self {
        Self {
            addr: addr.into(),
            ..Default::default()
        }
    }

    /// Set whether CORS should be permissive
    pub fn cors(mut self, permissive: bool) -> Self {
        self.cors_permissive = permissive;
        self
    }

    /// Create from shared WebConfig
    pub fn from_config(config: &WebConfig) -> Self {
        Self {
            addr: ([0, 0, 0, 0], config.port).into(),
            cors_permissive: config.cors_permissive,
        }
    }
}

/// Build the Axum router with all routes
pub fn build_router<B>(display: Arc<SharedDisplay<B>>, config: &WebServerConfig) -> Router
where
    B: DigitalOutputBank + Send + 'static,
    B::Error: Display,
{
    let mut router = Router::new()
        // API routes
        .route("/api/state", get(get_state::<B>))
        .route("/api/text", post(set_text::<B>))
        .route("/api/clear", post(clear::<B>))
        // Web UI
        .route("/", get(index))
        // Fallback
        .fallback(not_found)
        .with_state(display);

    // Add CORS if requested
    if config.cors_permissive {
        router = router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    router
}

/// Start the web server with shared state
///
/// This function blocks until the server is shut down. Share `display` with
/// the MQTT handler to drive one device from both.
///
/// # Example
///
/// ```ignore
/// let display = Arc::new(SharedDisplay::new(device));
///
/// // Share the device with MQTT
/// let mqtt_handler = MqttHandler::new(Arc::clone(&display), mqtt_config);
///
/// // Run web server on the same device
/// run_server(display, web_config).await?;
/// ```
pub async fn run_server<B>(
    display: Arc<SharedDisplay<B>>,
    config: WebServerConfig,
) -> Result<(), std::io::Error>
where
    B: DigitalOutputBank + Send + 'static,
    B::Error: Display,
{
    let router = build_router(display, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    log::info!("Web server listening on http://{}", config.addr);

    axum::serve(listener, router).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_web_server_config_default() {
        let config = WebServerConfig::default();
        assert_eq!(config.addr.port(), 8080);
        assert!(config.cors_permissive);
    }

    #[test]
    fn test_web_server_config_from_config() {
        let shared = WebConfig::default().with_port(3000).with_cors(false);
        let config = WebServerConfig::from_config(&shared);
        assert_eq!(config.addr.port(), 3000);
        assert!(!config.cors_permissive);
    }

    #[test]
    fn test_web_server_config_builder() {
        let config = WebServerConfig::new(([127, 0, 0, 1], 9000)).cors(false);
        assert_eq!(config.addr.to_string(), "127.0.0.1:9000");
        assert!(!config.cors_permissive);
    }
}
