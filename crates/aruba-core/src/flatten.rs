// ── Metric flattener ──
//
// Projects decoded resources onto gauge samples. Every family carries the
// device `name` and `mac`; child series (radios, uplink ports) carry their
// parent's pair under a prefixed label. Absent numeric fields yield no
// sample at all.

use aruba_api::models::{AccessPoint, Client, MobilityController, Radio, Switch};

use crate::catalog::{
    AP_CLIENT_COUNT, AP_CPU_UTILIZATION, AP_MEM_FREE, AP_MEM_TOTAL, AP_RADIO_TX_POWER,
    AP_RADIO_UTILIZATION, AP_UPTIME, CLIENT_RX_DATA_BYTES, CLIENT_TX_DATA_BYTES,
    MC_CPU_UTILIZATION, MC_MEM_FREE, MC_MEM_TOTAL, MC_UPTIME, SWITCH_CLIENT_COUNT,
    SWITCH_CPU_UTILIZATION, SWITCH_MEM_FREE, SWITCH_MEM_TOTAL, SWITCH_POWER_CONSUMPTION,
    SWITCH_UPLINK_PORT_INFO, SWITCH_UPTIME, SWITCH_USAGE,
};
use crate::metric::{MetricPoint, push_present};

/// A resource that can be turned into metric points.
pub trait Flatten {
    /// Append this resource's points to `out`. Pure: same input, same output.
    fn flatten(&self, out: &mut Vec<MetricPoint>);
}

impl Flatten for AccessPoint {
    fn flatten(&self, out: &mut Vec<MetricPoint>) {
        let labels = [
            self.name.as_str(),
            self.mac_address.as_str(),
            self.group_name.as_str(),
            self.site.as_str(),
            self.status.as_str(),
            self.firmware_version.as_str(),
        ];
        push_present(out, &AP_CLIENT_COUNT, self.client_count, &labels);
        push_present(out, &AP_CPU_UTILIZATION, self.cpu_utilization, &labels);
        push_present(out, &AP_MEM_FREE, self.mem_free, &labels);
        push_present(out, &AP_MEM_TOTAL, self.mem_total, &labels);
        push_present(out, &AP_UPTIME, self.uptime, &labels);

        for radio in &self.radios {
            flatten_radio(self, radio, out);
        }
    }
}

fn flatten_radio(ap: &AccessPoint, radio: &Radio, out: &mut Vec<MetricPoint>) {
    let band = radio.band.map(|b| b.to_string()).unwrap_or_default();
    let labels = [
        ap.name.as_str(),
        ap.mac_address.as_str(),
        radio.radio_name.as_str(),
        band.as_str(),
        radio.channel.as_str(),
    ];
    push_present(out, &AP_RADIO_TX_POWER, radio.tx_power, &labels);
    push_present(out, &AP_RADIO_UTILIZATION, radio.utilization, &labels);
}

impl Flatten for MobilityController {
    fn flatten(&self, out: &mut Vec<MetricPoint>) {
        let labels = [
            self.name.as_str(),
            self.mac_address.as_str(),
            self.group_name.as_str(),
            self.mode.as_str(),
            self.model.as_str(),
            self.site.as_str(),
            self.status.as_str(),
            self.firmware_version.as_str(),
        ];
        push_present(out, &MC_CPU_UTILIZATION, self.cpu_utilization, &labels);
        push_present(out, &MC_MEM_FREE, self.mem_free, &labels);
        push_present(out, &MC_MEM_TOTAL, self.mem_total, &labels);
        push_present(out, &MC_UPTIME, self.uptime, &labels);
    }
}

impl Flatten for Switch {
    fn flatten(&self, out: &mut Vec<MetricPoint>) {
        let labels = [
            self.name.as_str(),
            self.mac_address.as_str(),
            self.group_name.as_str(),
            self.site.as_str(),
            self.switch_type.as_str(),
            self.status.as_str(),
            self.firmware_version.as_str(),
        ];
        push_present(out, &SWITCH_CLIENT_COUNT, self.client_count, &labels);
        push_present(out, &SWITCH_CPU_UTILIZATION, self.cpu_utilization, &labels);
        push_present(out, &SWITCH_MEM_FREE, self.mem_free, &labels);
        push_present(out, &SWITCH_MEM_TOTAL, self.mem_total, &labels);
        push_present(out, &SWITCH_USAGE, self.usage, &labels);
        push_present(out, &SWITCH_UPTIME, self.uptime, &labels);
        push_present(out, &SWITCH_POWER_CONSUMPTION, self.power_consumption, &labels);

        for uplink in &self.uplink_ports {
            out.push(MetricPoint::new(
                &SWITCH_UPLINK_PORT_INFO,
                1.0,
                &[self.name.as_str(), self.mac_address.as_str(), uplink.port.as_str()],
            ));
        }
    }
}

impl Flatten for Client {
    fn flatten(&self, out: &mut Vec<MetricPoint>) {
        let labels = [self.name.as_str(), self.mac_address.as_str()];
        push_present(out, &CLIENT_RX_DATA_BYTES, self.rx_data_bytes, &labels);
        push_present(out, &CLIENT_TX_DATA_BYTES, self.tx_data_bytes, &labels);
    }
}
