use thiserror::Error;

/// Top-level error type for the `aruba-api` crate.
///
/// Covers every failure mode across the OAuth2 and monitoring surfaces:
/// authentication, transport, HTTP status, and JSON decoding.
/// `aruba-core` maps these into scrape-level diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Token exchange or login step failed (wrong credentials, revoked
    /// refresh token, missing auth code, etc.)
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// A resource endpoint rejected the bearer token (HTTP 401/403).
    #[error("Access token rejected (HTTP {status})")]
    Unauthorized { status: u16 },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── HTTP ────────────────────────────────────────────────────────
    /// Any other non-2xx response.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this error indicates the access token is no longer
    /// accepted and a token refresh might resolve it.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// The HTTP status code carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { status } | Self::Http { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
