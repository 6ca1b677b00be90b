// Aruba Central monitoring endpoints
//
// Read-only inventory and health listings. Device listings are paged with
// `limit`/`offset` and merged into one envelope; the top-N client report
// is a single request.

use secrecy::SecretString;
use tracing::debug;

use crate::client::CentralClient;
use crate::error::Error;
use crate::models::{AccessPointList, MobilityControllerList, SwitchList, TopClientList};

pub const ACCESS_POINTS_PATH: &str = "monitoring/v2/aps";
pub const MOBILITY_CONTROLLERS_PATH: &str = "monitoring/v1/mobility_controllers";
pub const SWITCHES_PATH: &str = "monitoring/v1/switches";
pub const TOP_CLIENTS_PATH: &str = "monitoring/v1/clients/bandwidth_usage/topn";

fn flag(name: &'static str) -> (&'static str, String) {
    (name, "true".to_owned())
}

impl CentralClient {
    /// List access points with radio details and client counts.
    ///
    /// `GET monitoring/v2/aps`
    pub async fn list_access_points(
        &self,
        access_token: &SecretString,
    ) -> Result<AccessPointList, Error> {
        debug!("listing access points");
        self.get_all_pages(
            ACCESS_POINTS_PATH,
            &[
                flag("calculate_total"),
                flag("calculate_client_count"),
                flag("calculate_ssid_count"),
                flag("show_resource_details"),
            ],
            access_token,
        )
        .await
    }

    /// List mobility controllers (gateways).
    ///
    /// `GET monitoring/v1/mobility_controllers`
    pub async fn list_mobility_controllers(
        &self,
        access_token: &SecretString,
    ) -> Result<MobilityControllerList, Error> {
        debug!("listing mobility controllers");
        self.get_all_pages(
            MOBILITY_CONTROLLERS_PATH,
            &[("calculate_total", "false".to_owned())],
            access_token,
        )
        .await
    }

    /// List switches with resource details and uplink ports.
    ///
    /// `GET monitoring/v1/switches`
    pub async fn list_switches(&self, access_token: &SecretString) -> Result<SwitchList, Error> {
        debug!("listing switches");
        self.get_all_pages(
            SWITCHES_PATH,
            &[flag("show_resource_details"), flag("calculate_client_count")],
            access_token,
        )
        .await
    }

    /// Top `count` clients by bandwidth usage.
    ///
    /// `GET monitoring/v1/clients/bandwidth_usage/topn?count=N`
    pub async fn list_top_clients(
        &self,
        count: u32,
        access_token: &SecretString,
    ) -> Result<TopClientList, Error> {
        debug!(count, "listing top clients");
        self.get_envelope(TOP_CLIENTS_PATH, &[("count", count.to_string())], access_token)
            .await
    }
}
