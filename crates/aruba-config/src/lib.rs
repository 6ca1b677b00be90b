//! Exporter configuration file.
//!
//! YAML schema, loading (file + `ARUBA_*` environment overrides), translation
//! to `aruba_core::CollectorConfig`, and atomic persistence of refreshed
//! tokens back into the same file.

use std::io::Write as _;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use aruba_core::{
    ClientApplication, CollectorConfig, CoreError, Credential, CredentialSink, DEFAULT_TOP_CLIENTS,
    TlsVerification,
};

/// File read when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "exporter_config.yaml";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("config file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to write {}: {source}", path.display())]
    Persist {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

fn invalid(field: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Validation {
        field: field.into(),
        reason: reason.into(),
    }
}

// ── YAML config structs ─────────────────────────────────────────────

/// Top-level YAML document.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExporterFile {
    /// API gateway base URL.
    pub aruba_endpoint: String,

    /// Empty until `login` has run once.
    #[serde(default)]
    pub aruba_tokens: TokenSection,

    pub aruba_application_credentials: ApplicationSection,

    /// Only read by `login`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aruba_user: Option<UserSection>,

    #[serde(default)]
    pub exporter_config: ExporterSection,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenSection {
    #[serde(default)]
    pub access_token: String,

    #[serde(default)]
    pub refresh_token: String,

    /// Written by the exporter after each refresh.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationSection {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct UserSection {
    pub user: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExporterSection {
    #[serde(default = "default_metrics_path")]
    pub exporter_endpoint: String,

    /// `":9090"` or a full `host:port`.
    #[serde(default = "default_port")]
    pub exporter_port: String,

    /// Seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,

    /// Seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safety_margin: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_clients: Option<u32>,

    #[serde(default)]
    pub insecure: bool,

    /// PEM bundle to trust instead of the system store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,
}

impl Default for ExporterSection {
    fn default() -> Self {
        Self {
            exporter_endpoint: default_metrics_path(),
            exporter_port: default_port(),
            timeout: None,
            safety_margin: None,
            top_clients: None,
            insecure: false,
            ca_cert: None,
        }
    }
}

fn default_metrics_path() -> String {
    "/metrics".into()
}
fn default_port() -> String {
    ":9090".into()
}

// ── Config loading ──────────────────────────────────────────────────

/// Environment variables mapped onto document paths.
const ENV_KEYS: &[(&str, &str)] = &[
    ("ENDPOINT", "arubaEndpoint"),
    ("ACCESS_TOKEN", "arubaTokens.accessToken"),
    ("REFRESH_TOKEN", "arubaTokens.refreshToken"),
    ("CLIENT_ID", "arubaApplicationCredentials.clientId"),
    ("CLIENT_SECRET", "arubaApplicationCredentials.clientSecret"),
    ("CUSTOMER_ID", "arubaApplicationCredentials.customerId"),
    ("USER", "arubaUser.user"),
    ("PASSWORD", "arubaUser.password"),
    ("EXPORTER_ENDPOINT", "exporterConfig.exporterEndpoint"),
    ("EXPORTER_PORT", "exporterConfig.exporterPort"),
    ("TIMEOUT", "exporterConfig.timeout"),
    ("SAFETY_MARGIN", "exporterConfig.safetyMargin"),
    ("TOP_CLIENTS", "exporterConfig.topClients"),
    ("INSECURE", "exporterConfig.insecure"),
    ("CA_CERT", "exporterConfig.caCert"),
];

fn env_provider() -> Env {
    Env::prefixed("ARUBA_")
        .filter_map(|key| {
            ENV_KEYS
                .iter()
                .find(|(var, _)| key.as_str().eq_ignore_ascii_case(var))
                .map(|(_, path)| (*path).into())
        })
        .lowercase(false)
}

/// Load the document from `path`, with `ARUBA_*` variables layered on top.
///
/// Files in the older list layout are accepted and read as mappings.
pub fn load_config(path: &Path) -> Result<ExporterFile, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let mut doc: serde_yaml::Value = serde_yaml::from_str(&std::fs::read_to_string(path)?)?;
    normalize_document(&mut doc);

    let figment = Figment::new()
        .merge(Yaml::string(&serde_yaml::to_string(&doc)?))
        .merge(env_provider());

    let config: ExporterFile = figment.extract()?;
    debug!(path = %path.display(), endpoint = %config.aruba_endpoint, "configuration loaded");
    Ok(config)
}

// ── Legacy layout ───────────────────────────────────────────────────

/// Sections that older files write as a list of single-key maps:
///
/// ```yaml
/// arubaTokens:
///   - arubaAccessToken: "..."
///   - arubaRefreshToken: "..."
/// ```
const LIST_SECTIONS: &[&str] = &[
    "arubaTokens",
    "arubaApplicationCredentials",
    "arubaUser",
    "exporterConfig",
];

const TOKEN_KEY_ALIASES: &[(&str, &str)] = &[
    ("arubaAccessToken", "accessToken"),
    ("arubaRefreshToken", "refreshToken"),
];

/// Rewrite list-layout sections as mappings, in place.
fn normalize_document(doc: &mut serde_yaml::Value) {
    let Some(root) = doc.as_mapping_mut() else {
        return;
    };
    for section in LIST_SECTIONS {
        let Some(value) = root.get_mut(*section) else {
            continue;
        };
        if let Some(items) = value.as_sequence() {
            let mut folded = serde_yaml::Mapping::new();
            for entry in items.iter().filter_map(serde_yaml::Value::as_mapping) {
                for (key, item) in entry {
                    folded.insert(key.clone(), item.clone());
                }
            }
            *value = serde_yaml::Value::Mapping(folded);
        }
    }

    if let Some(tokens) = root
        .get_mut("arubaTokens")
        .and_then(serde_yaml::Value::as_mapping_mut)
    {
        for (old, new) in TOKEN_KEY_ALIASES {
            if let Some(token) = tokens.remove(*old) {
                if !tokens.contains_key(*new) {
                    tokens.insert(serde_yaml::Value::from(*new), token);
                }
            }
        }
    }
}

// ── Translation to core types ───────────────────────────────────────

impl ExporterFile {
    pub fn application(&self) -> ClientApplication {
        let app = &self.aruba_application_credentials;
        ClientApplication {
            client_id: app.client_id.clone(),
            client_secret: SecretString::from(app.client_secret.clone()),
            customer_id: app.customer_id.clone().filter(|c| !c.is_empty()),
        }
    }

    /// Everything the collector needs, validated.
    pub fn to_collector_config(&self) -> Result<CollectorConfig, ConfigError> {
        let base_url: url::Url = self
            .aruba_endpoint
            .parse()
            .map_err(|e| invalid("arubaEndpoint", format!("{e}: {}", self.aruba_endpoint)))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(invalid("arubaEndpoint", "expected an http(s) URL"));
        }

        let app = &self.aruba_application_credentials;
        if app.client_id.is_empty() {
            return Err(invalid("arubaApplicationCredentials.clientId", "must not be empty"));
        }
        if app.client_secret.is_empty() {
            return Err(invalid(
                "arubaApplicationCredentials.clientSecret",
                "must not be empty",
            ));
        }

        let exporter = &self.exporter_config;
        let tls = if exporter.insecure {
            TlsVerification::DangerAcceptInvalid
        } else if let Some(ref ca) = exporter.ca_cert {
            TlsVerification::CustomCa(ca.clone())
        } else {
            TlsVerification::SystemDefaults
        };

        let mut config = CollectorConfig::new(base_url, self.application());
        config.tls = tls;
        config.timeout = Duration::from_secs(exporter.timeout.unwrap_or(30));
        config.safety_margin = Duration::from_secs(exporter.safety_margin.unwrap_or(60));
        config.top_clients = exporter.top_clients.unwrap_or(DEFAULT_TOP_CLIENTS);
        if config.top_clients == 0 {
            return Err(invalid("exporterConfig.topClients", "must be at least 1"));
        }
        Ok(config)
    }

    /// The persisted token pair. Requires a refresh token.
    pub fn credential(&self) -> Result<Credential, ConfigError> {
        let tokens = &self.aruba_tokens;
        if tokens.refresh_token.is_empty() {
            return Err(invalid(
                "arubaTokens.refreshToken",
                "missing; run `aruba-exporter login` first",
            ));
        }
        Ok(Credential::new(
            tokens.access_token.clone(),
            tokens.refresh_token.clone(),
            tokens.expires_at,
        ))
    }

    /// Socket address to serve on. `":9090"` binds all interfaces.
    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        let raw = self.exporter_config.exporter_port.trim();
        let full = if let Some(port) = raw.strip_prefix(':') {
            format!("0.0.0.0:{port}")
        } else if raw.chars().all(|c| c.is_ascii_digit()) {
            format!("0.0.0.0:{raw}")
        } else {
            raw.to_owned()
        };
        full.parse()
            .map_err(|_| invalid("exporterConfig.exporterPort", format!("not a listen address: {raw}")))
    }

    /// HTTP path serving the exposition, always with a leading slash.
    pub fn metrics_path(&self) -> String {
        let path = self.exporter_config.exporter_endpoint.trim();
        if path.is_empty() {
            default_metrics_path()
        } else if path.starts_with('/') {
            path.to_owned()
        } else {
            format!("/{path}")
        }
    }
}

// ── Token persistence ───────────────────────────────────────────────

/// Write `contents` to `path` via a temp file in the same directory.
///
/// Readers see either the old file or the new one, never a partial write.
pub fn write_atomic(path: &Path, contents: &str) -> Result<(), ConfigError> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let persist_err = |source: std::io::Error| ConfigError::Persist {
        path: path.to_path_buf(),
        source,
    };

    let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(persist_err)?;
    tmp.write_all(contents.as_bytes()).map_err(persist_err)?;
    tmp.as_file().sync_all().map_err(persist_err)?;
    tmp.persist(path).map_err(|e| persist_err(e.error))?;
    Ok(())
}

/// Replace the `arubaTokens` section of the file at `path`.
///
/// The rest of the raw document is kept, with list-layout sections
/// rewritten as mappings; environment overrides are never folded into the
/// file.
pub fn persist_tokens(path: &Path, credential: &Credential) -> Result<(), ConfigError> {
    let raw = std::fs::read_to_string(path)?;
    let mut doc: serde_yaml::Value = serde_yaml::from_str(&raw)?;
    normalize_document(&mut doc);
    let root = doc
        .as_mapping_mut()
        .ok_or_else(|| invalid("document", "top level must be a mapping"))?;

    let tokens = TokenSection {
        access_token: credential.access_token.expose_secret().to_owned(),
        refresh_token: credential.refresh_token.expose_secret().to_owned(),
        expires_at: credential.expires_at,
    };
    root.insert(
        serde_yaml::Value::from("arubaTokens"),
        serde_yaml::to_value(&tokens)?,
    );

    write_atomic(path, &serde_yaml::to_string(&doc)?)?;
    debug!(path = %path.display(), "tokens persisted");
    Ok(())
}

/// Persists refreshed credentials into the configuration file.
#[derive(Debug, Clone)]
pub struct FileCredentialSink {
    path: PathBuf,
}

impl FileCredentialSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialSink for FileCredentialSink {
    fn persist(&self, credential: &Credential) -> Result<(), CoreError> {
        persist_tokens(&self.path, credential).map_err(|e| CoreError::Persist {
            message: e.to_string(),
        })
    }
}
