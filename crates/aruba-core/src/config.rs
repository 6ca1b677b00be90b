// ── Runtime collection configuration ──
//
// Describes *where* to scrape and *how* to keep the token alive.
// Carries credential data but never touches disk; aruba-config builds a
// `CollectorConfig` from the YAML file and hands it in.

use std::time::Duration;

use aruba_api::{ClientApplication, TlsMode, TransportConfig};
use url::Url;

/// Default number of clients requested from the top-N bandwidth listing.
pub const DEFAULT_TOP_CLIENTS: u32 = 100;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict). Default for the public API gateways.
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification.
    DangerAcceptInvalid,
}

impl From<&TlsVerification> for TlsMode {
    fn from(tls: &TlsVerification) -> Self {
        match tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        }
    }
}

/// Everything the collector needs besides the live credential.
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// API gateway base URL (e.g. `https://apigw-prod2.central.arubanetworks.com/`).
    pub base_url: Url,
    /// OAuth client registered in the API gateway.
    pub application: ClientApplication,
    pub tls: TlsVerification,
    /// Upper bound on every upstream call.
    pub timeout: Duration,
    /// Refresh this long before the recorded deadline.
    pub safety_margin: Duration,
    /// `count` passed to the top-clients endpoint.
    pub top_clients: u32,
}

impl CollectorConfig {
    pub fn new(base_url: Url, application: ClientApplication) -> Self {
        Self {
            base_url,
            application,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            safety_margin: Duration::from_secs(60),
            top_clients: DEFAULT_TOP_CLIENTS,
        }
    }

    /// Transport settings for the shared `reqwest` client.
    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: TlsMode::from(&self.tls),
            timeout: self.timeout,
            cookie_jar: None,
        }
    }
}
