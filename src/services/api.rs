//! API request and response types for HTTP/MQTT communication.

use serde::{Deserialize, Serialize};

// Re-export shared message types from messages module
pub use crate::messages::{DisplayState, SetTextRequest};

// ============================================================================
// Response Types
// ============================================================================

/// API response wrapper for consistent JSON structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the request was successful
    pub success: bool,
    /// Response data (present when success=true)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Error message (present when success=false)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response with data
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Create an error response
    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Result of a write request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WriteResponse {
    /// Bytes accepted, including any past the truncation limit
    pub accepted: usize,
    /// Display state after the write
    pub state: DisplayState,
}

impl WriteResponse {
    /// Create a write response
    pub fn new(accepted: usize, state: DisplayState) -> Self {
        Self { accepted, state }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_response_ok() {
        let response = ApiResponse::ok(42);
        assert!(response.success);
        assert_eq!(response.data, Some(42));
        assert!(response.error.is_none());
    }

    #[test]
    fn test_api_response_err() {
        let response = ApiResponse::<()>::err("display is busy");
        assert!(!response.success);
        assert!(response.data.is_none());
        assert_eq!(response.error.as_deref(), Some("display is busy"));
    }

    #[test]
    fn test_api_response_skips_empty_fields() {
        let json = serde_json::to_string(&ApiResponse::<()>::err("nope")).unwrap();
        assert_eq!(json, r#"{"success":false,"error":"nope"}"#);
    }
}
