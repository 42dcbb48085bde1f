// Copyright (c) 2025 Fortress Labs. All rights reserved.
// This software is proprietary and confidential.

/**
 * Fortress Console - API Error Taxonomy
 * Connection-vs-server classification for backend calls
 *
 * @copyright 2025 Fortress Labs
 * @license Proprietary
 */

use thiserror::Error;

/// Error raised by any backend call.
///
/// Every failure falls into one of two operator-facing buckets: the
/// backend never answered (`Connection`), or it answered with an HTTP
/// error (`Server`). A success status with an unparseable body is an
/// `InvalidResponse`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No HTTP response was received (refused, DNS failure, timeout)
    #[error("{message}")]
    Connection { message: String },

    /// The backend answered with an HTTP error status
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// The backend answered 2xx but the body did not match the contract
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    pub fn is_connection_error(&self) -> bool {
        matches!(self, ApiError::Connection { .. })
    }

    /// HTTP status of a server error, if there was a response
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Build a `Server` error from a response body, preferring the
    /// message the backend embedded in it
    pub fn server(status: u16, body: &str) -> Self {
        let message = extract_backend_message(body)
            .unwrap_or_else(|| format!("server returned HTTP {}", status));
        ApiError::Server { status, message }
    }
}

/// Pull the human-readable message out of an error body.
///
/// The backend wraps errors as `{"message": ...}`; the auth endpoints
/// use DRF-style `{"detail": ...}`.
fn extract_backend_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    for key in ["message", "detail", "error"] {
        if let Some(text) = value.get(key).and_then(|m| m.as_str()) {
            if !text.is_empty() {
                return Some(text.to_string());
            }
        }
    }
    None
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Connection {
                message: "Request timed out. Please try again.".to_string(),
            }
        } else if err.is_connect() {
            ApiError::Connection {
                message:
                    "Cannot connect to the backend server. Please ensure it is running and reachable."
                        .to_string(),
            }
        } else if let Some(status) = err.status() {
            ApiError::Server {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else if err.is_decode() {
            ApiError::InvalidResponse(err.to_string())
        } else {
            ApiError::Connection {
                message: format!("Network error: {}", err),
            }
        }
    }
}
