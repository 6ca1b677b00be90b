// ── Token refresher ──
//
// Keeps the credential store usable. Refresh is single-flight: an async
// mutex serializes attempts and a generation counter lets callers that
// queued behind an attempt reuse its outcome instead of starting another.
// A failed refresh leaves the store untouched; callers keep the stale
// token and the affected endpoints degrade on their own.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use aruba_api::{CentralClient, ClientApplication};
use chrono::{TimeDelta, Utc};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::credential::{Credential, CredentialStore};
use crate::error::CoreError;

/// Destination for refreshed credentials (the config file, in production).
pub trait CredentialSink: Send + Sync {
    /// Durably record `credential`. Called after every successful refresh.
    fn persist(&self, credential: &Credential) -> Result<(), CoreError>;
}

pub struct TokenRefresher {
    client: CentralClient,
    application: ClientApplication,
    store: CredentialStore,
    sink: Option<Arc<dyn CredentialSink>>,
    safety_margin: TimeDelta,
    flight: Mutex<()>,
    /// Completed refresh attempts, successful or not.
    attempts: AtomicU64,
}

impl std::fmt::Debug for TokenRefresher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenRefresher")
            .field("store", &self.store)
            .field("safety_margin", &self.safety_margin)
            .field("attempts", &self.attempts)
            .finish_non_exhaustive()
    }
}

impl TokenRefresher {
    pub fn new(
        client: CentralClient,
        application: ClientApplication,
        credential: Credential,
        safety_margin: Duration,
        sink: Option<Arc<dyn CredentialSink>>,
    ) -> Self {
        Self {
            client,
            application,
            store: CredentialStore::new(credential),
            sink,
            safety_margin: TimeDelta::from_std(safety_margin).unwrap_or(TimeDelta::zero()),
            flight: Mutex::new(()),
            attempts: AtomicU64::new(0),
        }
    }

    /// Current credential without any freshness check.
    pub fn current(&self) -> Arc<Credential> {
        self.store.read()
    }

    /// Number of refresh attempts made so far.
    pub fn attempts(&self) -> u64 {
        self.attempts.load(Ordering::Acquire)
    }

    fn is_fresh(&self, credential: &Credential) -> bool {
        credential.is_fresh_at(Utc::now(), self.safety_margin)
    }

    /// Return a credential that is fresh, refreshing first if needed.
    ///
    /// Concurrent callers that find the credential stale share one refresh.
    /// On refresh failure the stale credential is returned.
    pub async fn ensure_valid(&self) -> Arc<Credential> {
        let current = self.store.read();
        if self.is_fresh(&current) {
            return current;
        }

        let seen = self.attempts.load(Ordering::Acquire);
        let _flight = self.flight.lock().await;

        if self.attempts.load(Ordering::Acquire) != seen {
            debug!("refresh completed while waiting; reusing its outcome");
            return self.store.read();
        }
        let current = self.store.read();
        if self.is_fresh(&current) {
            return current;
        }
        self.refresh_locked(&current).await
    }

    /// Refresh after the gateway rejected `rejected`.
    ///
    /// Only refreshes if the store still holds the rejected access token;
    /// otherwise the newer credential is returned as is.
    pub async fn force_refresh(&self, rejected: &Credential) -> Arc<Credential> {
        let seen = self.attempts.load(Ordering::Acquire);
        let _flight = self.flight.lock().await;

        let current = self.store.read();
        if !current.same_access_token(rejected) || self.attempts.load(Ordering::Acquire) != seen {
            return current;
        }
        self.refresh_locked(&current).await
    }

    /// Perform one refresh attempt. Caller holds `flight`.
    async fn refresh_locked(&self, current: &Credential) -> Arc<Credential> {
        let outcome = match self.fetch_successor(current).await {
            Ok(successor) => {
                self.store.replace(successor);
                let fresh = self.store.read();
                info!(expires_at = ?fresh.expires_at, "access token refreshed");
                self.persist(Arc::clone(&fresh)).await;
                fresh
            }
            Err(err) => {
                warn!(error = %err, "token refresh failed; continuing with stale token");
                self.store.read()
            }
        };

        self.attempts.fetch_add(1, Ordering::AcqRel);
        outcome
    }

    async fn fetch_successor(&self, current: &Credential) -> Result<Credential, CoreError> {
        let grant = self
            .client
            .refresh_token(&self.application, &current.refresh_token)
            .await?;
        Credential::from_grant(grant, &current.refresh_token, Utc::now())
    }

    /// Hand `fresh` to the sink on the blocking pool; sinks do file I/O.
    async fn persist(&self, fresh: Arc<Credential>) {
        let Some(sink) = self.sink.clone() else {
            return;
        };
        match tokio::task::spawn_blocking(move || sink.persist(&fresh)).await {
            Ok(Ok(())) => debug!("refreshed credential persisted"),
            Ok(Err(e)) => error!(error = %e, "refreshed credential not persisted"),
            Err(e) => error!(error = %e, "credential sink task aborted"),
        }
    }
}
