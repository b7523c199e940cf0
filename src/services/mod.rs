//! Network services for HTTP API and MQTT integration.
//!
//! This module provides optional network access to the display:
//! - `web` feature: Axum-based HTTP API server with JSON endpoints
//! - `mqtt` feature: MQTT client for pub/sub messaging
//!
//! Both services drive a single `SegmentDevice` through
//! `SharedDisplay<B>` wrapped in `Arc` for thread-safe access.
//!
//! # Shared State Pattern
//!
//! ```ignore
//! use std::sync::Arc;
//! use rs_sseg::services::SharedDisplay;
//!
//! // Create single shared display
//! let display = Arc::new(SharedDisplay::new(device));
//!
//! // Web and MQTT both use the same device
//! let web_router = build_router(Arc::clone(&display), &web_config);
//! let mqtt_handler = MqttHandler::new(Arc::clone(&display), mqtt_config);
//! ```

// Shared state (available when either web or mqtt is enabled)
pub mod shared;

// API types are shared between web and mqtt
pub mod api;

#[cfg(feature = "web")]
pub mod web;

#[cfg(feature = "mqtt")]
pub mod mqtt;

// Re-exports
pub use api::*;
pub use shared::*;

#[cfg(feature = "web")]
pub use web::*;

#[cfg(feature = "mqtt")]
pub use mqtt::*;
