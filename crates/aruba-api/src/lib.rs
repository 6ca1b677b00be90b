// aruba-api: Async Rust client for the Aruba Central REST API (OAuth2 + monitoring)

pub mod client;
pub mod error;
pub mod models;
pub mod monitoring;
pub mod oauth;
pub mod transport;

pub use client::CentralClient;
pub use error::Error;
pub use oauth::ClientApplication;
pub use transport::{TlsMode, TransportConfig};
