#![allow(clippy::unwrap_used)]
// Loading and token persistence against real files.

use std::path::PathBuf;

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use secrecy::ExposeSecret;
use tempfile::TempDir;

use aruba_config::{
    ConfigError, FileCredentialSink, load_config, persist_tokens, write_atomic,
};
use aruba_core::{Credential, CredentialSink};

const SAMPLE: &str = r#"
arubaEndpoint: https://apigw-prod2.central.arubanetworks.com/
arubaTokens:
  accessToken: "initial-access"
  refreshToken: "initial-refresh"
arubaApplicationCredentials:
  clientId: "client-1"
  clientSecret: "s3cret"
  customerId: "cust-9"
arubaUser:
  user: "admin@example.com"
  password: "pw"
exporterConfig:
  exporterEndpoint: /metrics
  exporterPort: ":9100"
  timeout: 10
  topClients: 25
"#;

fn write_sample(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("exporter_config.yaml");
    std::fs::write(&path, SAMPLE).unwrap();
    path
}

#[test]
fn loads_every_section() {
    let dir = TempDir::new().unwrap();
    let path = write_sample(&dir);

    let file = load_config(&path).unwrap();

    assert_eq!(file.aruba_tokens.access_token, "initial-access");
    assert_eq!(file.aruba_user.as_ref().unwrap().user, "admin@example.com");
    assert_eq!(file.listen_addr().unwrap().port(), 9100);

    let config = file.to_collector_config().unwrap();
    assert_eq!(config.top_clients, 25);
    assert_eq!(config.timeout.as_secs(), 10);
    assert_eq!(config.application.customer_id.as_deref(), Some("cust-9"));

    let cred = file.credential().unwrap();
    assert_eq!(cred.refresh_token.expose_secret(), "initial-refresh");
    assert!(cred.expires_at.is_none());
}

#[test]
fn missing_file_is_reported() {
    let dir = TempDir::new().unwrap();
    let result = load_config(&dir.path().join("absent.yaml"));
    assert!(matches!(result, Err(ConfigError::NotFound { .. })));
}

#[test]
fn persisted_tokens_round_trip_special_characters() {
    let dir = TempDir::new().unwrap();
    let path = write_sample(&dir);

    let tricky_access = r#"ab": #'c"d"#;
    let tricky_refresh = "line: value # not a comment 'quoted'";
    let expires = Utc.with_ymd_and_hms(2030, 1, 2, 3, 4, 5).unwrap();
    persist_tokens(
        &path,
        &Credential::new(tricky_access, tricky_refresh, Some(expires)),
    )
    .unwrap();

    let file = load_config(&path).unwrap();
    assert_eq!(file.aruba_tokens.access_token, tricky_access);
    assert_eq!(file.aruba_tokens.refresh_token, tricky_refresh);
    assert_eq!(file.aruba_tokens.expires_at, Some(expires));

    // Everything else survives the rewrite.
    assert_eq!(file.aruba_application_credentials.client_secret, "s3cret");
    assert_eq!(file.exporter_config.exporter_port, ":9100");
    assert_eq!(file.aruba_user.unwrap().password, "pw");
}

#[test]
fn file_sink_persists_refreshed_credential() {
    let dir = TempDir::new().unwrap();
    let path = write_sample(&dir);
    let sink = FileCredentialSink::new(&path);

    sink.persist(&Credential::new("next-access", "next-refresh", None))
        .unwrap();

    let cred = load_config(&path).unwrap().credential().unwrap();
    assert_eq!(cred.access_token.expose_secret(), "next-access");
    assert_eq!(cred.refresh_token.expose_secret(), "next-refresh");
}

#[test]
fn file_sink_reports_missing_file() {
    let dir = TempDir::new().unwrap();
    let sink = FileCredentialSink::new(dir.path().join("gone.yaml"));

    let err = sink
        .persist(&Credential::new("a", "r", None))
        .unwrap_err();
    assert!(matches!(err, aruba_core::CoreError::Persist { .. }));
}

#[test]
fn atomic_write_leaves_no_temp_files() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out.yaml");

    write_atomic(&path, "first: 1\n").unwrap();
    write_atomic(&path, "second: 2\n").unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "second: 2\n");
    let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
}

/// The list-of-single-key-maps layout older exporters wrote.
const LIST_LAYOUT: &str = r#"arubaEndpoint: "https://apigw-prod2.central.arubanetworks.com/"
arubaTokens:
  - arubaAccessToken: "legacy-access"
  - arubaRefreshToken: "legacy-refresh"
arubaApplicationCredentials:
  - clientId: "client-1"
  - clientSecret: "s3cret"
  - customerId: "cust-9"
arubaUser:
  - user: "admin@example.com"
  - password: "pw"
exporterConfig:
  - exporterEndpoint: "/metrics"
  - exporterPort: ":9100" "#;

#[test]
fn loads_list_layout() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("exporter_config.yaml");
    std::fs::write(&path, LIST_LAYOUT).unwrap();

    let file = load_config(&path).unwrap();

    assert_eq!(file.aruba_tokens.access_token, "legacy-access");
    assert_eq!(file.aruba_tokens.refresh_token, "legacy-refresh");
    assert_eq!(file.aruba_user.as_ref().unwrap().password, "pw");
    assert_eq!(file.metrics_path(), "/metrics");
    assert_eq!(file.listen_addr().unwrap().port(), 9100);

    let config = file.to_collector_config().unwrap();
    assert_eq!(config.application.client_id, "client-1");
    assert_eq!(config.application.customer_id.as_deref(), Some("cust-9"));
}

#[test]
fn persisting_into_list_layout_writes_mappings() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("exporter_config.yaml");
    std::fs::write(&path, LIST_LAYOUT).unwrap();

    let credential = Credential::new("next-access", "next-refresh", None);
    persist_tokens(&path, &credential).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert!(!written.contains("arubaAccessToken"), "{written}");
    assert!(!written.contains("- clientId"), "{written}");

    let file = load_config(&path).unwrap();
    assert_eq!(file.aruba_tokens.access_token, "next-access");
    assert_eq!(file.aruba_tokens.refresh_token, "next-refresh");
    assert_eq!(file.aruba_application_credentials.client_secret, "s3cret");
    assert_eq!(file.listen_addr().unwrap().port(), 9100);
}
