// ── Credential store ──
//
// Holds the live OAuth token pair. Readers take a lock-free snapshot;
// the refresher swaps in a whole new `Credential`, so no reader can ever
// pair a fresh access token with a stale refresh token.

use std::sync::Arc;

use arc_swap::ArcSwap;
use chrono::{DateTime, TimeDelta, Utc};
use secrecy::{ExposeSecret, SecretString};

use aruba_api::models::TokenGrant;

use crate::error::CoreError;

/// The bearer token pair and its deadline.
#[derive(Debug, Clone)]
pub struct Credential {
    pub access_token: SecretString,
    pub refresh_token: SecretString,
    /// `None` means the lifetime is unknown (e.g. tokens pasted into the
    /// config by hand) and the credential is treated as expired.
    pub expires_at: Option<DateTime<Utc>>,
}

impl Credential {
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            access_token: SecretString::from(access_token.into()),
            refresh_token: SecretString::from(refresh_token.into()),
            expires_at,
        }
    }

    /// Build the successor credential from a token endpoint response.
    ///
    /// The deadline is fixed once here from `expires_in`; a grant without a
    /// refresh token keeps `previous_refresh`. A lifetime that does not fit
    /// the calendar is rejected like any other malformed grant.
    pub fn from_grant(
        grant: TokenGrant,
        previous_refresh: &SecretString,
        now: DateTime<Utc>,
    ) -> Result<Self, CoreError> {
        let expires_at = TimeDelta::try_seconds(grant.expires_in.max(0))
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| CoreError::Authentication {
                message: format!("token lifetime out of range: expires_in={}", grant.expires_in),
            })?;
        let refresh_token = grant
            .refresh_token
            .filter(|t| !t.is_empty())
            .map_or_else(|| previous_refresh.clone(), SecretString::from);
        Ok(Self {
            access_token: SecretString::from(grant.access_token),
            refresh_token,
            expires_at: Some(expires_at),
        })
    }

    /// Usable iff `now < expires_at - margin`.
    pub fn is_fresh_at(&self, now: DateTime<Utc>, margin: TimeDelta) -> bool {
        self.expires_at
            .and_then(|deadline| deadline.checked_sub_signed(margin))
            .is_some_and(|usable_until| now < usable_until)
    }

    /// Whether both credentials carry the same access token.
    pub fn same_access_token(&self, other: &Credential) -> bool {
        self.access_token.expose_secret() == other.access_token.expose_secret()
    }
}

/// Atomic holder of the current [`Credential`].
///
/// Pure state: no refresh or retry logic lives here.
#[derive(Debug)]
pub struct CredentialStore {
    current: ArcSwap<Credential>,
}

impl CredentialStore {
    pub fn new(credential: Credential) -> Self {
        Self {
            current: ArcSwap::from_pointee(credential),
        }
    }

    /// Non-blocking snapshot of the current credential.
    pub fn read(&self) -> Arc<Credential> {
        self.current.load_full()
    }

    /// Atomically swap in a new credential.
    pub fn replace(&self, credential: Credential) {
        self.current.store(Arc::new(credential));
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn grant(refresh: Option<&str>) -> TokenGrant {
        TokenGrant {
            access_token: "new-access".into(),
            refresh_token: refresh.map(str::to_owned),
            token_type: Some("bearer".into()),
            expires_in: 7200,
        }
    }

    #[test]
    fn unknown_expiry_is_stale() {
        let cred = Credential::new("a", "r", None);
        assert!(!cred.is_fresh_at(Utc::now(), TimeDelta::seconds(60)));
    }

    #[test]
    fn freshness_honours_safety_margin() {
        let now = Utc::now();
        let margin = TimeDelta::seconds(60);

        let far = Credential::new("a", "r", Some(now + TimeDelta::seconds(3600)));
        assert!(far.is_fresh_at(now, margin));

        let closing = Credential::new("a", "r", Some(now + TimeDelta::seconds(59)));
        assert!(!closing.is_fresh_at(now, margin));

        let expired = Credential::new("a", "r", Some(now - TimeDelta::seconds(1)));
        assert!(!expired.is_fresh_at(now, margin));
    }

    #[test]
    fn from_grant_computes_deadline_once() {
        let now = Utc::now();
        let prev = SecretString::from("old-refresh".to_owned());
        let cred = Credential::from_grant(grant(Some("new-refresh")), &prev, now).unwrap();

        assert_eq!(cred.expires_at, Some(now + TimeDelta::seconds(7200)));
        assert_eq!(cred.access_token.expose_secret(), "new-access");
        assert_eq!(cred.refresh_token.expose_secret(), "new-refresh");
    }

    #[test]
    fn from_grant_keeps_previous_refresh_token() {
        let prev = SecretString::from("old-refresh".to_owned());
        let cred = Credential::from_grant(grant(None), &prev, Utc::now()).unwrap();
        assert_eq!(cred.refresh_token.expose_secret(), "old-refresh");
    }

    #[test]
    fn from_grant_rejects_lifetime_beyond_calendar() {
        let prev = SecretString::from("old-refresh".to_owned());
        let mut huge = grant(Some("new-refresh"));
        huge.expires_in = i64::MAX;

        let err = Credential::from_grant(huge, &prev, Utc::now()).unwrap_err();
        assert!(matches!(err, CoreError::Authentication { .. }));
    }

    #[test]
    fn freshness_check_survives_extreme_deadline() {
        let margin = TimeDelta::seconds(60);

        let earliest = Credential::new("a", "r", Some(DateTime::<Utc>::MIN_UTC));
        assert!(!earliest.is_fresh_at(Utc::now(), margin));

        let latest = Credential::new("a", "r", Some(DateTime::<Utc>::MAX_UTC));
        assert!(latest.is_fresh_at(Utc::now(), margin));
        assert!(!latest.is_fresh_at(Utc::now(), TimeDelta::MIN));
    }

    #[test]
    fn replace_swaps_whole_credential() {
        let store = CredentialStore::new(Credential::new("a1", "r1", None));
        let before = store.read();

        store.replace(Credential::new("a2", "r2", None));
        let after = store.read();

        // Old snapshot is untouched; new snapshot is consistent.
        assert_eq!(before.access_token.expose_secret(), "a1");
        assert_eq!(before.refresh_token.expose_secret(), "r1");
        assert_eq!(after.access_token.expose_secret(), "a2");
        assert_eq!(after.refresh_token.expose_secret(), "r2");
        assert!(!before.same_access_token(&after));
    }
}
