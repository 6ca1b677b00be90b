// ── Collector ──
//
// One scrape: make sure the token is usable, fetch every endpoint
// concurrently, flatten what came back. Endpoints fail independently; a
// failed one contributes nothing but its self-observation samples.

use std::sync::Arc;
use std::time::{Duration, Instant};

use aruba_api::CentralClient;
use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::catalog::{CATALOG, SCRAPE_ENDPOINT_DURATION_SECONDS, SCRAPE_ENDPOINT_SUCCESS};
use crate::config::CollectorConfig;
use crate::credential::Credential;
use crate::endpoint::Endpoint;
use crate::error::CoreError;
use crate::metric::{MetricDescriptor, MetricPoint};
use crate::refresh::{CredentialSink, TokenRefresher};

/// Outcome of one endpoint within a scrape.
#[derive(Debug)]
pub enum EndpointStatus {
    Success { records: usize, points: usize },
    Failed { error: CoreError },
}

#[derive(Debug)]
pub struct EndpointOutcome {
    pub endpoint: Endpoint,
    pub duration: Duration,
    pub status: EndpointStatus,
}

impl EndpointOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self.status, EndpointStatus::Success { .. })
    }
}

/// Result of one collection pass.
#[derive(Debug, Default)]
pub struct Scrape {
    pub points: Vec<MetricPoint>,
    pub outcomes: Vec<EndpointOutcome>,
}

impl Scrape {
    /// Points belonging to resource families, without self-observation.
    pub fn resource_points(&self) -> impl Iterator<Item = &MetricPoint> {
        self.points.iter().filter(|p| {
            !std::ptr::eq(p.descriptor, &SCRAPE_ENDPOINT_SUCCESS)
                && !std::ptr::eq(p.descriptor, &SCRAPE_ENDPOINT_DURATION_SECONDS)
        })
    }
}

struct CollectorInner {
    client: CentralClient,
    refresher: TokenRefresher,
    endpoints: Vec<Endpoint>,
    top_clients: u32,
}

/// Cheaply cloneable handle shared by every concurrent scrape.
#[derive(Clone)]
pub struct Collector {
    inner: Arc<CollectorInner>,
}

impl Collector {
    /// Build a collector with its own HTTP client.
    pub fn new(
        config: &CollectorConfig,
        credential: Credential,
        sink: Option<Arc<dyn CredentialSink>>,
    ) -> Result<Self, CoreError> {
        let client = CentralClient::new(config.base_url.clone(), &config.transport())?;
        Ok(Self::with_client(client, config, credential, sink))
    }

    /// Build a collector around an existing client.
    pub fn with_client(
        client: CentralClient,
        config: &CollectorConfig,
        credential: Credential,
        sink: Option<Arc<dyn CredentialSink>>,
    ) -> Self {
        let refresher = TokenRefresher::new(
            client.clone(),
            config.application.clone(),
            credential,
            config.safety_margin,
            sink,
        );
        Self {
            inner: Arc::new(CollectorInner {
                client,
                refresher,
                endpoints: Endpoint::ALL.to_vec(),
                top_clients: config.top_clients,
            }),
        }
    }

    /// Every descriptor the exporter can emit, independent of scrape outcome.
    pub fn catalog() -> &'static [&'static MetricDescriptor] {
        CATALOG
    }

    pub fn refresher(&self) -> &TokenRefresher {
        &self.inner.refresher
    }

    /// Run one collection pass.
    pub async fn scrape(&self) -> Scrape {
        let credential = self.inner.refresher.ensure_valid().await;

        let results = join_all(
            self.inner
                .endpoints
                .iter()
                .map(|&endpoint| self.collect_endpoint(endpoint, &credential)),
        )
        .await;

        let mut scrape = Scrape::default();
        for (outcome, mut points) in results {
            scrape.points.append(&mut points);
            scrape.outcomes.push(outcome);
        }
        for outcome in &scrape.outcomes {
            let label = [outcome.endpoint.name()];
            let success = if outcome.is_success() { 1.0 } else { 0.0 };
            scrape
                .points
                .push(MetricPoint::new(&SCRAPE_ENDPOINT_SUCCESS, success, &label));
            scrape.points.push(MetricPoint::new(
                &SCRAPE_ENDPOINT_DURATION_SECONDS,
                outcome.duration.as_secs_f64(),
                &label,
            ));
        }

        let failed = scrape.outcomes.iter().filter(|o| !o.is_success()).count();
        info!(
            points = scrape.points.len(),
            endpoints = scrape.outcomes.len(),
            failed,
            "scrape complete"
        );
        scrape
    }

    async fn collect_endpoint(
        &self,
        endpoint: Endpoint,
        credential: &Arc<Credential>,
    ) -> (EndpointOutcome, Vec<MetricPoint>) {
        let inner = &self.inner;
        let started = Instant::now();

        let result = match endpoint
            .fetch(&inner.client, &credential.access_token, inner.top_clients)
            .await
        {
            Err(e) if e.is_auth_expired() => {
                warn!(%endpoint, "access token rejected; refreshing and retrying once");
                let renewed = inner.refresher.force_refresh(credential).await;
                endpoint
                    .fetch(&inner.client, &renewed.access_token, inner.top_clients)
                    .await
            }
            other => other,
        };

        let duration = started.elapsed();
        match result {
            Ok(resources) => {
                let mut points = Vec::new();
                resources.flatten_into(&mut points);
                debug!(
                    %endpoint,
                    records = resources.len(),
                    points = points.len(),
                    elapsed = ?duration,
                    "endpoint collected"
                );
                let status = EndpointStatus::Success {
                    records: resources.len(),
                    points: points.len(),
                };
                (
                    EndpointOutcome {
                        endpoint,
                        duration,
                        status,
                    },
                    points,
                )
            }
            Err(e) => {
                let error = CoreError::fetch(endpoint, e);
                warn!(%endpoint, error = %error, "endpoint skipped this scrape");
                (
                    EndpointOutcome {
                        endpoint,
                        duration,
                        status: EndpointStatus::Failed { error },
                    },
                    Vec::new(),
                )
            }
        }
    }
}
