// ── Upstream endpoint catalog ──
//
// The closed set of monitoring resources polled on every scrape, and the
// decoded collections they yield.

use std::fmt;

use aruba_api::CentralClient;
use aruba_api::models::{AccessPoint, Client, MobilityController, Switch};
use aruba_api::monitoring::{
    ACCESS_POINTS_PATH, MOBILITY_CONTROLLERS_PATH, SWITCHES_PATH, TOP_CLIENTS_PATH,
};
use secrecy::SecretString;

use crate::flatten::Flatten;
use crate::metric::MetricPoint;

/// A monitoring endpoint of the Central API gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    AccessPoints,
    MobilityControllers,
    Switches,
    TopClients,
}

impl Endpoint {
    /// Fixed scrape order. Points are emitted in this order.
    pub const ALL: [Endpoint; 4] = [
        Endpoint::AccessPoints,
        Endpoint::MobilityControllers,
        Endpoint::Switches,
        Endpoint::TopClients,
    ];

    /// Stable short name, used as the `endpoint` label.
    pub fn name(self) -> &'static str {
        match self {
            Self::AccessPoints => "access_points",
            Self::MobilityControllers => "mobility_controllers",
            Self::Switches => "switches",
            Self::TopClients => "top_clients",
        }
    }

    /// Path relative to the gateway base URL.
    pub fn path(self) -> &'static str {
        match self {
            Self::AccessPoints => ACCESS_POINTS_PATH,
            Self::MobilityControllers => MOBILITY_CONTROLLERS_PATH,
            Self::Switches => SWITCHES_PATH,
            Self::TopClients => TOP_CLIENTS_PATH,
        }
    }

    /// Fetch and decode this endpoint's envelope.
    pub async fn fetch(
        self,
        client: &CentralClient,
        access_token: &SecretString,
        top_clients: u32,
    ) -> Result<Resources, aruba_api::Error> {
        Ok(match self {
            Self::AccessPoints => {
                Resources::AccessPoints(client.list_access_points(access_token).await?.aps)
            }
            Self::MobilityControllers => Resources::MobilityControllers(
                client.list_mobility_controllers(access_token).await?.mcs,
            ),
            Self::Switches => Resources::Switches(client.list_switches(access_token).await?.switches),
            Self::TopClients => Resources::TopClients(
                client
                    .list_top_clients(top_clients, access_token)
                    .await?
                    .clients,
            ),
        })
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Records decoded from one endpoint.
#[derive(Debug, Clone)]
pub enum Resources {
    AccessPoints(Vec<AccessPoint>),
    MobilityControllers(Vec<MobilityController>),
    Switches(Vec<Switch>),
    TopClients(Vec<Client>),
}

impl Resources {
    /// Number of top-level records.
    pub fn len(&self) -> usize {
        match self {
            Self::AccessPoints(v) => v.len(),
            Self::MobilityControllers(v) => v.len(),
            Self::Switches(v) => v.len(),
            Self::TopClients(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flatten every record, in response order.
    pub fn flatten_into(&self, out: &mut Vec<MetricPoint>) {
        fn all<T: Flatten>(items: &[T], out: &mut Vec<MetricPoint>) {
            for item in items {
                item.flatten(out);
            }
        }
        match self {
            Self::AccessPoints(v) => all(v, out),
            Self::MobilityControllers(v) => all(v, out),
            Self::Switches(v) => all(v, out),
            Self::TopClients(v) => all(v, out),
        }
    }
}
