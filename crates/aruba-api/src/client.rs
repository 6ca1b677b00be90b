// Aruba Central HTTP client
//
// Wraps `reqwest::Client` with Central-specific URL construction, bearer
// authentication, status mapping, and envelope decoding. Endpoint families
// (oauth, monitoring) are implemented as inherent methods in separate files
// to keep this module focused on transport mechanics.

use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, trace, warn};
use url::Url;

use crate::error::Error;
use crate::models::Paged;
use crate::transport::TransportConfig;

/// Longest slice of an upstream body carried inside an error message.
const BODY_PREVIEW: usize = 200;

/// Largest `limit` the monitoring listings accept.
pub const DEFAULT_PAGE_LIMIT: usize = 1000;

/// Upper bound on pages per listing, in case the gateway ignores `offset`.
const MAX_PAGES: usize = 100;

/// Raw HTTP client for the Aruba Central API gateway.
///
/// One instance serves every scrape; it holds no credential state. Callers
/// pass the current access token into each request.
#[derive(Debug, Clone)]
pub struct CentralClient {
    http: reqwest::Client,
    base_url: Url,
    page_limit: usize,
}

impl CentralClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the API gateway root, e.g.
    /// `https://apigw-prod2.central.arubanetworks.com/`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url: normalize_base(base_url),
            page_limit: DEFAULT_PAGE_LIMIT,
        }
    }

    /// Override the page size used for paginated listings.
    #[must_use]
    pub fn with_page_limit(mut self, limit: usize) -> Self {
        self.page_limit = limit.max(1);
        self
    }

    /// The underlying HTTP client (for auth flows that need direct access).
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// The API gateway base URL (always ends with `/`).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Join a relative API path (`monitoring/v1/switches`) onto the base.
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send an authenticated GET and decode the JSON envelope into `T`.
    pub async fn get_envelope<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        access_token: &SecretString,
    ) -> Result<T, Error> {
        let url = self.api_url(path)?;
        debug!("GET {}", url);

        let resp = self
            .http
            .get(url)
            .query(query)
            .bearer_auth(access_token.expose_secret())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        parse_json(resp).await
    }

    // ── Pagination helper ────────────────────────────────────────────

    /// Fetch every `limit`/`offset` page of a listing into one envelope.
    ///
    /// Stops on a short page, once the reported `total` is reached, or
    /// after `MAX_PAGES` requests.
    pub async fn get_all_pages<T: Paged>(
        &self,
        path: &str,
        query: &[(&str, String)],
        access_token: &SecretString,
    ) -> Result<T, Error> {
        let mut envelope: T = self
            .get_envelope(path, &self.page_query(query, 0), access_token)
            .await?;
        let total = envelope.total();
        let mut received = envelope.items_mut().len();
        let mut pages = 1;

        loop {
            let collected = envelope.items_mut().len();
            let reached_total =
                total.is_some_and(|t| u64::try_from(collected).unwrap_or(u64::MAX) >= t);
            if received < self.page_limit || reached_total {
                break;
            }
            if pages >= MAX_PAGES {
                warn!(path, collected, ?total, "page limit reached; listing truncated");
                break;
            }

            let mut page: T = self
                .get_envelope(path, &self.page_query(query, collected), access_token)
                .await?;
            received = page.items_mut().len();
            envelope.items_mut().append(page.items_mut());
            pages += 1;
            debug!(path, offset = collected, received, "fetched page");
        }

        if let Some(t) = total {
            let collected = envelope.items_mut().len();
            if u64::try_from(collected).unwrap_or(u64::MAX) < t {
                warn!(path, collected, total = t, "listing shorter than reported total");
            }
        }
        Ok(envelope)
    }

    fn page_query<'q>(&self, query: &[(&'q str, String)], offset: usize) -> Vec<(&'q str, String)> {
        let mut paged = query.to_vec();
        paged.push(("offset", offset.to_string()));
        paged.push(("limit", self.page_limit.to_string()));
        paged
    }
}

/// Map the response status, then decode the body.
///
/// 401/403 become `Error::Unauthorized` so the caller can decide whether a
/// token refresh is worth attempting; any other non-2xx is `Error::Http`.
pub(crate) async fn parse_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
    let status = resp.status();

    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        return Err(Error::Unauthorized {
            status: status.as_u16(),
        });
    }

    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(Error::Http {
            status: status.as_u16(),
            message: preview(&body).to_owned(),
        });
    }

    let body = resp.text().await?;
    trace!(bytes = body.len(), "response body received");

    serde_json::from_str(&body).map_err(|e| Error::Deserialization {
        message: format!("{e} (body preview: {:?})", preview(&body)),
        body,
    })
}

fn preview(body: &str) -> &str {
    match body.char_indices().nth(BODY_PREVIEW) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

/// `Url::join` drops the last path segment unless the base ends in `/`.
fn normalize_base(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn base_url_gets_trailing_slash() {
        let client = CentralClient::with_client(
            reqwest::Client::new(),
            Url::parse("https://apigw.example.com/gateway").unwrap(),
        );
        assert_eq!(client.base_url().as_str(), "https://apigw.example.com/gateway/");
        assert_eq!(
            client.api_url("/monitoring/v2/aps").unwrap().as_str(),
            "https://apigw.example.com/gateway/monitoring/v2/aps"
        );
    }

    #[test]
    fn preview_respects_char_boundaries() {
        let body = "é".repeat(BODY_PREVIEW + 10);
        assert_eq!(preview(&body).chars().count(), BODY_PREVIEW);
        assert_eq!(preview("short"), "short");
    }
}
