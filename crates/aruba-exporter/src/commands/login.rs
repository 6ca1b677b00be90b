//! `login`: authorization-code bootstrap.
//!
//! Signs in with the user credentials from the config file, trades the
//! session for an auth code, exchanges it for the first token pair, and
//! writes the tokens back into the file.

use chrono::Utc;
use secrecy::SecretString;
use tracing::info;

use aruba_api::CentralClient;
use aruba_config::{load_config, persist_tokens};
use aruba_core::{CoreError, Credential};

use crate::cli::GlobalOpts;
use crate::error::ExporterError;

pub async fn handle(global: &GlobalOpts) -> Result<(), ExporterError> {
    let file = load_config(&global.config)?;
    let config = file.to_collector_config()?;

    let user = file
        .aruba_user
        .as_ref()
        .filter(|u| !u.user.is_empty())
        .ok_or_else(|| ExporterError::MissingField {
            field: "arubaUser".into(),
        })?;
    if config.application.customer_id.is_none() {
        return Err(ExporterError::MissingField {
            field: "arubaApplicationCredentials.customerId".into(),
        });
    }

    let transport = config.transport().with_cookie_jar();
    let client =
        CentralClient::new(config.base_url.clone(), &transport).map_err(CoreError::from)?;

    let grant = client
        .authorize(
            &config.application,
            &user.user,
            &SecretString::from(user.password.clone()),
        )
        .await
        .map_err(|e| ExporterError::Login {
            message: e.to_string(),
        })?;

    let no_previous = SecretString::from(String::new());
    let credential = Credential::from_grant(grant, &no_previous, Utc::now())?;
    persist_tokens(&global.config, &credential)?;

    info!(user = %user.user, expires_at = ?credential.expires_at, "login succeeded");
    println!("Tokens written to {}", global.config.display());
    Ok(())
}
