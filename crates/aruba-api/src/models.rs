// Aruba Central response types
//
// Models for the monitoring and OAuth endpoints. Every monitoring response
// is an envelope `{ "count": N, "<records>": [...] }`. Record fields use
// `#[serde(default)]` liberally because Central omits or nulls fields
// depending on device state and firmware; unknown fields are ignored.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

/// Treat an explicit JSON `null` the same as an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ── Pagination ───────────────────────────────────────────────────────

/// A listing envelope fetched in `limit`/`offset` pages.
pub trait Paged: DeserializeOwned {
    type Item;

    /// Size of the whole listing, when the gateway reports it.
    fn total(&self) -> Option<u64>;

    fn items_mut(&mut self) -> &mut Vec<Self::Item>;
}

macro_rules! paged {
    ($envelope:ty, $field:ident, $item:ty) => {
        impl Paged for $envelope {
            type Item = $item;

            fn total(&self) -> Option<u64> {
                self.total
            }

            fn items_mut(&mut self) -> &mut Vec<$item> {
                &mut self.$field
            }
        }
    };
}

paged!(AccessPointList, aps, AccessPoint);
paged!(MobilityControllerList, mcs, MobilityController);
paged!(SwitchList, switches, Switch);

// ── OAuth ────────────────────────────────────────────────────────────

/// Body of a successful `POST /oauth2/token` (refresh or code exchange).
#[derive(Debug, Clone, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    /// Central rotates the refresh token on every exchange, but tolerate
    /// its absence and keep the previous one.
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    /// Lifetime of `access_token` in seconds.
    pub expires_in: i64,
}

/// Body of `POST /oauth2/authorize/central/api`.
#[derive(Debug, Deserialize)]
pub(crate) struct AuthCodeResponse {
    #[serde(default)]
    pub auth_code: Option<String>,
}

// ── Access points ────────────────────────────────────────────────────

/// Envelope of `GET monitoring/v2/aps`.
#[derive(Debug, Deserialize)]
pub struct AccessPointList {
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub total: Option<u64>,
    pub aps: Vec<AccessPoint>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccessPoint {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, rename = "macaddr", deserialize_with = "null_as_default")]
    pub mac_address: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub group_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub site: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub firmware_version: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub serial: Option<String>,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub client_count: Option<f64>,
    #[serde(default)]
    pub cpu_utilization: Option<f64>,
    #[serde(default)]
    pub mem_free: Option<f64>,
    #[serde(default)]
    pub mem_total: Option<f64>,
    /// Seconds.
    #[serde(default)]
    pub uptime: Option<f64>,
    #[serde(default)]
    pub swarm_master: Option<bool>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub radios: Vec<Radio>,
}

/// Radio nested inside an [`AccessPoint`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Radio {
    #[serde(default)]
    pub band: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub channel: String,
    #[serde(default)]
    pub index: Option<i64>,
    #[serde(default, rename = "macaddr")]
    pub mac_address: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub radio_name: String,
    #[serde(default)]
    pub radio_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub tx_power: Option<f64>,
    #[serde(default)]
    pub utilization: Option<f64>,
}

// ── Mobility controllers ─────────────────────────────────────────────

/// Envelope of `GET monitoring/v1/mobility_controllers`.
#[derive(Debug, Deserialize)]
pub struct MobilityControllerList {
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub total: Option<u64>,
    pub mcs: Vec<MobilityController>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MobilityController {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, rename = "macaddr", deserialize_with = "null_as_default")]
    pub mac_address: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub group_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub mode: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub model: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub site: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub firmware_version: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub serial: Option<String>,
    #[serde(default)]
    pub cpu_utilization: Option<f64>,
    #[serde(default)]
    pub mem_free: Option<f64>,
    #[serde(default)]
    pub mem_total: Option<f64>,
    #[serde(default)]
    pub uptime: Option<f64>,
}

// ── Switches ─────────────────────────────────────────────────────────

/// Envelope of `GET monitoring/v1/switches`.
#[derive(Debug, Deserialize)]
pub struct SwitchList {
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub total: Option<u64>,
    pub switches: Vec<Switch>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Switch {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, rename = "macaddr", deserialize_with = "null_as_default")]
    pub mac_address: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub group_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub site: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub switch_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub firmware_version: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub serial: Option<String>,
    #[serde(default)]
    pub stack_id: Option<String>,
    #[serde(default)]
    pub client_count: Option<f64>,
    #[serde(default)]
    pub cpu_utilization: Option<f64>,
    #[serde(default)]
    pub mem_free: Option<f64>,
    #[serde(default)]
    pub mem_total: Option<f64>,
    #[serde(default)]
    pub usage: Option<f64>,
    #[serde(default)]
    pub uptime: Option<f64>,
    /// Watts.
    #[serde(default)]
    pub power_consumption: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub uplink_ports: Vec<UplinkPort>,
}

/// Uplink port nested inside a [`Switch`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UplinkPort {
    #[serde(default, deserialize_with = "null_as_default")]
    pub port: String,
}

// ── Clients ──────────────────────────────────────────────────────────

/// Envelope of `GET monitoring/v1/clients/bandwidth_usage/topn`.
#[derive(Debug, Deserialize)]
pub struct TopClientList {
    pub clients: Vec<Client>,
}

/// A client from the top-N-by-bandwidth report.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Client {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, rename = "macaddr", deserialize_with = "null_as_default")]
    pub mac_address: String,
    #[serde(default)]
    pub rx_data_bytes: Option<f64>,
    #[serde(default)]
    pub tx_data_bytes: Option<f64>,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn access_point_ignores_unknown_and_null_fields() {
        let json = r#"{
            "aps": [{
                "name": "ap-1",
                "macaddr": "aa:bb:cc:dd:ee:01",
                "cpu_utilization": 42,
                "mem_free": null,
                "radios": null,
                "sleep_status": false,
                "labels": ["lab"],
                "brand_new_field": {"nested": true}
            }]
        }"#;

        let list: AccessPointList = serde_json::from_str(json).unwrap();
        assert_eq!(list.count, None);
        let ap = &list.aps[0];
        assert_eq!(ap.name, "ap-1");
        assert_eq!(ap.cpu_utilization, Some(42.0));
        assert_eq!(ap.mem_free, None);
        assert!(ap.radios.is_empty());
        assert_eq!(ap.group_name, "");
    }

    #[test]
    fn envelope_without_records_array_is_rejected() {
        let json = r#"{ "count": 3, "devices": [] }"#;
        assert!(serde_json::from_str::<SwitchList>(json).is_err());
    }

    #[test]
    fn token_grant_without_refresh_token() {
        let json = r#"{ "access_token": "abc", "expires_in": 7200 }"#;
        let grant: TokenGrant = serde_json::from_str(json).unwrap();
        assert_eq!(grant.access_token, "abc");
        assert!(grant.refresh_token.is_none());
        assert_eq!(grant.expires_in, 7200);
    }
}
