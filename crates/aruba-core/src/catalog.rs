// ── Metric descriptor catalog ──
//
// Every family the exporter can emit. The exposition layer registers the
// whole catalog on each scrape; a family with no points in that scrape is
// left out of the output, HELP/TYPE lines included.

use crate::metric::MetricDescriptor;

const AP_LABELS: &[&str] = &["name", "mac", "group_name", "site", "status", "firmware_version"];
const RADIO_LABELS: &[&str] = &["ap_name", "ap_mac", "radio_name", "band", "channel"];
const MC_LABELS: &[&str] = &[
    "name",
    "mac",
    "group_name",
    "mode",
    "model",
    "site",
    "status",
    "firmware_version",
];
const SWITCH_LABELS: &[&str] = &[
    "name",
    "mac",
    "group_name",
    "site",
    "switch_type",
    "status",
    "firmware_version",
];
const UPLINK_LABELS: &[&str] = &["switch_name", "switch_mac", "port"];
const CLIENT_LABELS: &[&str] = &["name", "mac"];
const ENDPOINT_LABELS: &[&str] = &["endpoint"];

macro_rules! gauge {
    ($ident:ident, $name:literal, $help:literal, $labels:expr) => {
        pub static $ident: MetricDescriptor = MetricDescriptor {
            name: $name,
            help: $help,
            label_names: $labels,
        };
    };
}

// ── Access points ───────────────────────────────────────────────────

gauge!(AP_CLIENT_COUNT, "ap_client_count", "Number of clients connected to the access point", AP_LABELS);
gauge!(AP_CPU_UTILIZATION, "ap_cpu_utilization", "CPU utilization of the access point in percent", AP_LABELS);
gauge!(AP_MEM_FREE, "ap_mem_free", "Free memory of the access point in bytes", AP_LABELS);
gauge!(AP_MEM_TOTAL, "ap_mem_total", "Total memory of the access point in bytes", AP_LABELS);
gauge!(AP_UPTIME, "ap_uptime", "Uptime of the access point in seconds", AP_LABELS);

gauge!(AP_RADIO_TX_POWER, "ap_radio_tx_power", "Transmit power of the radio in dBm", RADIO_LABELS);
gauge!(AP_RADIO_UTILIZATION, "ap_radio_utilization", "Channel utilization of the radio in percent", RADIO_LABELS);

// ── Mobility controllers ────────────────────────────────────────────

gauge!(MC_CPU_UTILIZATION, "mc_cpu_utilization", "CPU utilization of the mobility controller in percent", MC_LABELS);
gauge!(MC_MEM_FREE, "mc_mem_free", "Free memory of the mobility controller in bytes", MC_LABELS);
gauge!(MC_MEM_TOTAL, "mc_mem_total", "Total memory of the mobility controller in bytes", MC_LABELS);
gauge!(MC_UPTIME, "mc_uptime", "Uptime of the mobility controller in seconds", MC_LABELS);

// ── Switches ────────────────────────────────────────────────────────

gauge!(SWITCH_CLIENT_COUNT, "switch_client_count", "Number of clients connected to the switch", SWITCH_LABELS);
gauge!(SWITCH_CPU_UTILIZATION, "switch_cpu_utilization", "CPU utilization of the switch in percent", SWITCH_LABELS);
gauge!(SWITCH_MEM_FREE, "switch_mem_free", "Free memory of the switch in bytes", SWITCH_LABELS);
gauge!(SWITCH_MEM_TOTAL, "switch_mem_total", "Total memory of the switch in bytes", SWITCH_LABELS);
gauge!(SWITCH_USAGE, "switch_usage", "Traffic usage reported for the switch", SWITCH_LABELS);
gauge!(SWITCH_UPTIME, "switch_uptime", "Uptime of the switch in seconds", SWITCH_LABELS);
gauge!(SWITCH_POWER_CONSUMPTION, "switch_power_consumption", "Power drawn by the switch in watts", SWITCH_LABELS);

gauge!(SWITCH_UPLINK_PORT_INFO, "switch_uplink_port_info", "Uplink port of the switch (always 1)", UPLINK_LABELS);

// ── Clients ─────────────────────────────────────────────────────────

gauge!(CLIENT_RX_DATA_BYTES, "client_rx_data_bytes", "Volume of data received by the client in bytes", CLIENT_LABELS);
gauge!(CLIENT_TX_DATA_BYTES, "client_tx_data_bytes", "Volume of data transmitted by the client in bytes", CLIENT_LABELS);

// ── Exporter self-observation ───────────────────────────────────────

gauge!(SCRAPE_ENDPOINT_SUCCESS, "aruba_scrape_endpoint_success", "Whether the last fetch of the endpoint succeeded (1) or failed (0)", ENDPOINT_LABELS);
gauge!(SCRAPE_ENDPOINT_DURATION_SECONDS, "aruba_scrape_endpoint_duration_seconds", "Time spent fetching the endpoint in seconds", ENDPOINT_LABELS);

/// All descriptors, in exposition order.
pub static CATALOG: &[&MetricDescriptor] = &[
    &AP_CLIENT_COUNT,
    &AP_CPU_UTILIZATION,
    &AP_MEM_FREE,
    &AP_MEM_TOTAL,
    &AP_UPTIME,
    &AP_RADIO_TX_POWER,
    &AP_RADIO_UTILIZATION,
    &MC_CPU_UTILIZATION,
    &MC_MEM_FREE,
    &MC_MEM_TOTAL,
    &MC_UPTIME,
    &SWITCH_CLIENT_COUNT,
    &SWITCH_CPU_UTILIZATION,
    &SWITCH_MEM_FREE,
    &SWITCH_MEM_TOTAL,
    &SWITCH_USAGE,
    &SWITCH_UPTIME,
    &SWITCH_POWER_CONSUMPTION,
    &SWITCH_UPLINK_PORT_INFO,
    &CLIENT_RX_DATA_BYTES,
    &CLIENT_TX_DATA_BYTES,
    &SCRAPE_ENDPOINT_SUCCESS,
    &SCRAPE_ENDPOINT_DURATION_SECONDS,
];
