//! Collection pipeline between `aruba-api` and the exporter binary.
//!
//! - **[`Collector`]**: facade shared by every concurrent scrape.
//!   [`scrape()`](Collector::scrape) makes sure the bearer token is usable,
//!   fetches each monitoring [`Endpoint`] concurrently, and flattens the
//!   decoded resources into [`MetricPoint`]s.
//!
//! - **[`TokenRefresher`]**: single-flight OAuth2 refresh over a lock-free
//!   [`CredentialStore`]. Successful refreshes are handed to a
//!   [`CredentialSink`] for persistence.
//!
//! - **[`catalog`]**: the static set of gauge [`MetricDescriptor`]s.
//!
//! This crate never reads or writes files; `aruba-config` supplies the
//! [`CollectorConfig`] and the sink.

pub mod catalog;
pub mod collector;
pub mod config;
pub mod credential;
pub mod endpoint;
pub mod error;
pub mod flatten;
pub mod metric;
pub mod refresh;

// ── Primary re-exports ──────────────────────────────────────────────
pub use collector::{Collector, EndpointOutcome, EndpointStatus, Scrape};
pub use config::{CollectorConfig, DEFAULT_TOP_CLIENTS, TlsVerification};
pub use credential::{Credential, CredentialStore};
pub use endpoint::{Endpoint, Resources};
pub use error::CoreError;
pub use flatten::Flatten;
pub use metric::{MetricDescriptor, MetricPoint};
pub use refresh::{CredentialSink, TokenRefresher};

pub use aruba_api::ClientApplication;
