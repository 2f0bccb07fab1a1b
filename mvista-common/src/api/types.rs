//! Response envelope types
//!
//! Every endpoint answers with the same envelope:
//!
//! ```json
//! { "success": true,  "data": ...,      "timestamp": "2024-01-01T00:00:00.000Z" }
//! { "success": false, "error": "...",   "timestamp": "2024-01-01T00:00:00.000Z" }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::time::now_rfc3339;

/// Uniform response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            timestamp: now_rfc3339(),
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            timestamp: now_rfc3339(),
        }
    }
}

/// GET /health response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub success: bool,
    pub status: String,
    pub message: String,
    pub module: String,
    pub version: String,
    pub environment: String,
    /// Seconds since the service started
    pub uptime: f64,
    pub timestamp: String,
}

/// GET /api response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub success: bool,
    pub message: String,
    pub version: String,
    pub endpoints: BTreeMap<String, String>,
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope_shape() {
        let json = serde_json::to_value(ApiResponse::success(vec![1, 2])).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"], serde_json::json!([1, 2]));
        assert!(json.get("error").is_none());
        assert!(json["timestamp"].is_string());
    }

    #[test]
    fn test_failure_envelope_shape() {
        let json = serde_json::to_value(ApiResponse::<()>::failure("Track not found")).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Track not found");
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_null_data_is_kept_for_optional_payloads() {
        let json = serde_json::to_value(ApiResponse::success(None::<String>)).unwrap();
        assert!(json.get("data").is_some());
        assert!(json["data"].is_null());
    }
}
