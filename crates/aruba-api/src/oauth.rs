// Aruba Central OAuth2 flows
//
// Refresh-token exchange (used on every expiring scrape) and the
// three-step authorization-code bootstrap used once to mint the first
// token pair: login (session + CSRF cookies), authorize (auth code),
// token exchange.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::debug;

use crate::client::{CentralClient, parse_json};
use crate::error::Error;
use crate::models::{AuthCodeResponse, TokenGrant};

const TOKEN_PATH: &str = "oauth2/token";
const LOGIN_PATH: &str = "oauth2/authorize/central/api/login";
const AUTHORIZE_PATH: &str = "oauth2/authorize/central/api";

/// The OAuth client registered in Central's API Gateway.
///
/// Static for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct ClientApplication {
    pub client_id: String,
    pub client_secret: SecretString,
    /// Only needed by the authorization-code bootstrap.
    pub customer_id: Option<String>,
}

impl CentralClient {
    /// Exchange a refresh token for a new token pair.
    ///
    /// `POST /oauth2/token?client_id=..&client_secret=..&grant_type=refresh_token&refresh_token=..`
    pub async fn refresh_token(
        &self,
        app: &ClientApplication,
        refresh_token: &SecretString,
    ) -> Result<TokenGrant, Error> {
        let url = self.api_url(TOKEN_PATH)?;
        debug!("refreshing access token at {}", url);

        let resp = self
            .http()
            .post(url)
            .query(&[
                ("client_id", app.client_id.as_str()),
                ("client_secret", app.client_secret.expose_secret()),
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token.expose_secret()),
            ])
            .send()
            .await?;

        token_response(resp, "token refresh").await
    }

    /// Mint the first token pair from resource-owner credentials.
    ///
    /// The `session` and `csrftoken` cookies set by the login step are read
    /// from its response and forwarded explicitly, so no cookie jar is needed.
    pub async fn authorize(
        &self,
        app: &ClientApplication,
        username: &str,
        password: &SecretString,
    ) -> Result<TokenGrant, Error> {
        let customer_id = app
            .customer_id
            .as_deref()
            .ok_or_else(|| Error::Authentication {
                message: "customer id is required for the authorization-code flow".into(),
            })?;

        // 1. Login: establishes `session` and `csrftoken` cookies.
        let url = self.api_url(LOGIN_PATH)?;
        debug!("logging in at {}", url);

        let resp = self
            .http()
            .post(url)
            .query(&[("client_id", app.client_id.as_str())])
            .json(&json!({
                "username": username,
                "password": password.expose_secret(),
            }))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Authentication {
                message: format!("login failed (HTTP {status})"),
            });
        }

        let mut csrf_token = None;
        let mut session = None;
        for cookie in resp.cookies() {
            match cookie.name() {
                "csrftoken" => csrf_token = Some(cookie.value().to_owned()),
                "session" => session = Some(cookie.value().to_owned()),
                _ => {}
            }
        }
        let (Some(csrf_token), Some(session)) = (csrf_token, session) else {
            return Err(Error::Authentication {
                message: "login response did not set session and csrftoken cookies".into(),
            });
        };

        // 2. Authorize: trade the session for a one-time auth code.
        let url = self.api_url(AUTHORIZE_PATH)?;
        debug!("requesting authorization code at {}", url);

        let resp = self
            .http()
            .post(url)
            .query(&[
                ("client_id", app.client_id.as_str()),
                ("response_type", "code"),
                ("scope", "all"),
            ])
            .header(reqwest::header::COOKIE, format!("session={session}"))
            .header("X-CSRF-Token", csrf_token)
            .json(&json!({ "customer_id": customer_id }))
            .send()
            .await?;

        let code = match parse_json::<AuthCodeResponse>(resp).await {
            Ok(AuthCodeResponse {
                auth_code: Some(code),
            }) => code,
            Ok(_) => {
                return Err(Error::Authentication {
                    message: "authorization code not found in response".into(),
                });
            }
            Err(e) => {
                return Err(Error::Authentication {
                    message: format!("authorization request failed: {e}"),
                });
            }
        };

        // 3. Exchange the code for tokens.
        let url = self.api_url(TOKEN_PATH)?;
        debug!("exchanging authorization code at {}", url);

        let resp = self
            .http()
            .post(url)
            .json(&json!({
                "client_id": app.client_id,
                "client_secret": app.client_secret.expose_secret(),
                "grant_type": "authorization_code",
                "code": code,
            }))
            .send()
            .await?;

        token_response(resp, "code exchange").await
    }
}

/// Any failure at the token endpoint is an authentication failure, whatever
/// the HTTP status, so callers can treat it uniformly as degraded auth.
async fn token_response(resp: reqwest::Response, step: &str) -> Result<TokenGrant, Error> {
    match parse_json::<TokenGrant>(resp).await {
        Ok(grant) if grant.access_token.is_empty() => Err(Error::Authentication {
            message: format!("{step} returned an empty access token"),
        }),
        Ok(grant) => {
            debug!(expires_in = grant.expires_in, "{step} successful");
            Ok(grant)
        }
        Err(Error::Transport(e)) => Err(Error::Transport(e)),
        Err(e) => Err(Error::Authentication {
            message: format!("{step} failed: {e}"),
        }),
    }
}
