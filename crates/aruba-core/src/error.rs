// ── Core error types ──
//
// Scrape-level errors from aruba-core. Consumers see which endpoint failed
// and why, never a raw reqwest or serde error. The `From<aruba_api::Error>`
// impl translates transport-layer errors that are not tied to a single
// endpoint (token refresh); `CoreError::fetch` scopes one to an endpoint.

use thiserror::Error;

use crate::endpoint::Endpoint;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Startup ──────────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Credentials ──────────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    #[error("Persisting refreshed credentials failed: {message}")]
    Persist { message: String },

    // ── Per-endpoint ─────────────────────────────────────────────────
    #[error("Fetching {endpoint} failed: {message}")]
    Fetch {
        endpoint: String,
        /// HTTP status code (if the gateway answered).
        status: Option<u16>,
        message: String,
    },

    #[error("Decoding {endpoint} response failed: {message}")]
    Decode { endpoint: String, message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Scope an API error to the endpoint that produced it.
    pub fn fetch(endpoint: Endpoint, err: aruba_api::Error) -> Self {
        let endpoint = endpoint.name().to_owned();
        match err {
            aruba_api::Error::Deserialization { message, body: _ } => {
                CoreError::Decode { endpoint, message }
            }
            other => CoreError::Fetch {
                endpoint,
                status: other.status(),
                message: other.to_string(),
            },
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<aruba_api::Error> for CoreError {
    fn from(err: aruba_api::Error) -> Self {
        match err {
            aruba_api::Error::Authentication { message } => {
                CoreError::Authentication { message }
            }
            aruba_api::Error::Unauthorized { status } => CoreError::Authentication {
                message: format!("credentials rejected (HTTP {status})"),
            },
            aruba_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            aruba_api::Error::Tls(msg) => CoreError::Config {
                message: format!("TLS error: {msg}"),
            },
            aruba_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
            other @ (aruba_api::Error::Transport(_) | aruba_api::Error::Http { .. }) => {
                CoreError::Authentication {
                    message: other.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_keeps_status_and_endpoint() {
        let err = CoreError::fetch(
            Endpoint::Switches,
            aruba_api::Error::Http {
                status: 500,
                message: "boom".into(),
            },
        );
        match err {
            CoreError::Fetch {
                endpoint, status, ..
            } => {
                assert_eq!(endpoint, "switches");
                assert_eq!(status, Some(500));
            }
            other => panic!("expected Fetch, got {other:?}"),
        }
    }

    #[test]
    fn fetch_maps_bad_json_to_decode() {
        let err = CoreError::fetch(
            Endpoint::AccessPoints,
            aruba_api::Error::Deserialization {
                message: "expected value".into(),
                body: "<html>".into(),
            },
        );
        assert!(matches!(err, CoreError::Decode { .. }));
    }
}
