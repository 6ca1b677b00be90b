#![allow(clippy::unwrap_used)]
// End-to-end collector scrapes against a mock API gateway.

use chrono::{TimeDelta, Utc};
use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use aruba_api::CentralClient;
use aruba_core::{
    ClientApplication, Collector, CollectorConfig, Credential, Endpoint, EndpointStatus,
    MetricPoint, Scrape,
};

// ── Helpers ─────────────────────────────────────────────────────────

const APS: &str = "/monitoring/v2/aps";
const MCS: &str = "/monitoring/v1/mobility_controllers";
const SWITCHES: &str = "/monitoring/v1/switches";
const CLIENTS: &str = "/monitoring/v1/clients/bandwidth_usage/topn";

fn collector(server: &MockServer, access_token: &str) -> Collector {
    let base = Url::parse(&server.uri()).unwrap();
    let application = ClientApplication {
        client_id: "client-1".into(),
        client_secret: SecretString::from("s3cret".to_owned()),
        customer_id: None,
    };
    let config = CollectorConfig::new(base.clone(), application);
    let credential = Credential::new(
        access_token,
        "refresh-1",
        Some(Utc::now() + TimeDelta::hours(2)),
    );
    let client = CentralClient::with_client(reqwest::Client::new(), base);
    Collector::with_client(client, &config, credential, None)
}

async fn respond(server: &MockServer, route: &str, status: u16, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

async fn empty_mcs_and_clients(server: &MockServer) {
    respond(server, MCS, 200, json!({ "count": 0, "mcs": [] })).await;
    respond(server, CLIENTS, 200, json!({ "clients": [] })).await;
}

fn two_aps() -> serde_json::Value {
    json!({
        "count": 2,
        "aps": [
            {
                "name": "ap-1",
                "macaddr": "aa:bb:cc:00:00:01",
                "group_name": "campus",
                "site": "hq",
                "status": "Up",
                "firmware_version": "10.4",
                "cpu_utilization": 42,
                "mem_free": 1000,
                "radios": [
                    { "band": 0, "channel": "1", "radio_name": "r0", "tx_power": 18, "utilization": 7 },
                    { "band": 1, "channel": "36", "radio_name": "r1", "tx_power": 21, "utilization": 12 }
                ]
            },
            {
                "name": "ap-2",
                "macaddr": "aa:bb:cc:00:00:02",
                "cpu_utilization": 5,
                "mem_free": 2000,
                "radios": []
            }
        ]
    })
}

fn resource_points(scrape: &Scrape) -> Vec<&MetricPoint> {
    scrape.resource_points().collect()
}

fn outcome(scrape: &Scrape, endpoint: Endpoint) -> &EndpointStatus {
    &scrape
        .outcomes
        .iter()
        .find(|o| o.endpoint == endpoint)
        .unwrap()
        .status
}

fn self_sample(scrape: &Scrape, name: &str, endpoint: Endpoint) -> f64 {
    scrape
        .points
        .iter()
        .find(|p| p.descriptor.name == name && p.label("endpoint") == Some(endpoint.name()))
        .unwrap()
        .value
}

// ── Tests ───────────────────────────────────────────────────────────

#[tokio::test]
async fn failing_endpoint_is_isolated() {
    let server = MockServer::start().await;
    respond(&server, APS, 200, two_aps()).await;
    respond(&server, SWITCHES, 500, json!({ "message": "internal" })).await;
    empty_mcs_and_clients(&server).await;

    let scrape = collector(&server, "live").scrape().await;

    // ap-1: cpu, mem_free, 2 radios x 2; ap-2: cpu, mem_free.
    let points = resource_points(&scrape);
    assert_eq!(points.len(), 8);
    assert!(points.iter().all(|p| p.descriptor.name.starts_with("ap_")));

    assert!(matches!(
        outcome(&scrape, Endpoint::AccessPoints),
        EndpointStatus::Success { records: 2, points: 8 }
    ));
    assert!(matches!(
        outcome(&scrape, Endpoint::Switches),
        EndpointStatus::Failed { .. }
    ));
    assert_eq!(
        self_sample(&scrape, "aruba_scrape_endpoint_success", Endpoint::Switches),
        0.0
    );
    assert_eq!(
        self_sample(&scrape, "aruba_scrape_endpoint_success", Endpoint::AccessPoints),
        1.0
    );
}

#[tokio::test]
async fn ap_sample_values_and_identity() {
    let server = MockServer::start().await;
    respond(&server, APS, 200, two_aps()).await;
    respond(&server, SWITCHES, 200, json!({ "count": 0, "switches": [] })).await;
    empty_mcs_and_clients(&server).await;

    let scrape = collector(&server, "live").scrape().await;

    let cpu = scrape
        .points
        .iter()
        .find(|p| p.descriptor.name == "ap_cpu_utilization" && p.label("name") == Some("ap-1"))
        .unwrap();
    assert_eq!(cpu.value, 42.0);
    assert_eq!(
        cpu.label_values,
        vec!["ap-1", "aa:bb:cc:00:00:01", "campus", "hq", "Up", "10.4"]
    );

    let mem = scrape
        .points
        .iter()
        .find(|p| p.descriptor.name == "ap_mem_free" && p.label("name") == Some("ap-1"))
        .unwrap();
    assert_eq!(mem.value, 1000.0);

    // Absent fields produce nothing.
    assert!(!scrape.points.iter().any(|p| p.descriptor.name == "ap_uptime"));

    for p in &scrape.points {
        assert_eq!(p.label_values.len(), p.descriptor.label_names.len());
    }
}

#[tokio::test]
async fn scrapes_are_idempotent() {
    let server = MockServer::start().await;
    respond(&server, APS, 200, two_aps()).await;
    respond(
        &server,
        SWITCHES,
        200,
        json!({ "count": 1, "switches": [{
            "name": "sw-1",
            "macaddr": "de:ad:be:ef:00:01",
            "cpu_utilization": 9,
            "uplink_ports": [{ "port": "49" }]
        }]}),
    )
    .await;
    respond(
        &server,
        MCS,
        200,
        json!({ "count": 1, "mcs": [{ "name": "mc-1", "macaddr": "00:11:22:33:44:55", "uptime": 60 }] }),
    )
    .await;
    respond(
        &server,
        CLIENTS,
        200,
        json!({ "clients": [{ "name": "phone", "macaddr": "66:55:44:33:22:11", "rx_data_bytes": 1, "tx_data_bytes": 2 }] }),
    )
    .await;

    let collector = collector(&server, "live");
    let first = collector.scrape().await;
    let second = collector.scrape().await;

    assert_eq!(resource_points(&first), resource_points(&second));

    // Emission follows the fixed endpoint order.
    let families: Vec<_> = resource_points(&first)
        .iter()
        .map(|p| p.descriptor.name.split('_').next().unwrap())
        .collect();
    let mut ordered = families.clone();
    ordered.dedup();
    assert_eq!(ordered, vec!["ap", "mc", "switch", "client"]);
}

#[tokio::test]
async fn rejected_token_triggers_one_refresh_and_retry() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(header("authorization", "Bearer revoked"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid_token"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "renewed",
            "refresh_token": "refresh-2",
            "expires_in": 7200
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(APS))
        .and(header("authorization", "Bearer renewed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(two_aps()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(SWITCHES))
        .and(header("authorization", "Bearer renewed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "switches": [] })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(MCS))
        .and(header("authorization", "Bearer renewed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "mcs": [] })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(CLIENTS))
        .and(header("authorization", "Bearer renewed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "clients": [] })))
        .mount(&server)
        .await;

    let collector = collector(&server, "revoked");
    let scrape = collector.scrape().await;

    assert!(scrape.outcomes.iter().all(aruba_core::EndpointOutcome::is_success));
    assert_eq!(resource_points(&scrape).len(), 8);
    assert_eq!(collector.refresher().attempts(), 1);
}

#[tokio::test]
async fn catalog_is_stable_across_outcomes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let before = Collector::catalog().len();
    let scrape = collector(&server, "live").scrape().await;

    assert!(resource_points(&scrape).is_empty());
    assert_eq!(scrape.outcomes.len(), Endpoint::ALL.len());
    assert_eq!(Collector::catalog().len(), before);
}
