//! Prometheus text exposition of a [`Scrape`].
//!
//! A fresh registry per scrape: concurrent scrapes never share gauge state
//! and a device that disappears upstream simply stops being reported.

use std::collections::{HashMap, HashSet};

use prometheus::{Encoder, GaugeVec, Opts, Registry, TextEncoder};
use tracing::warn;

use aruba_core::{Collector, MetricPoint, Scrape};

/// `Content-Type` of the rendered body.
pub const CONTENT_TYPE: &str = prometheus::TEXT_FORMAT;

/// Render every point of `scrape` in the text format.
pub fn render(scrape: &Scrape) -> Result<String, prometheus::Error> {
    let registry = Registry::new();
    let mut families: HashMap<&'static str, GaugeVec> = HashMap::new();

    for descriptor in Collector::catalog() {
        let gauge = GaugeVec::new(
            Opts::new(descriptor.name, descriptor.help),
            descriptor.label_names,
        )?;
        registry.register(Box::new(gauge.clone()))?;
        families.insert(descriptor.name, gauge);
    }

    for point in collisions(&scrape.points) {
        warn!(
            metric = point.descriptor.name,
            labels = ?point.label_values,
            "duplicate series in one scrape; later value wins"
        );
    }

    for point in &scrape.points {
        let Some(gauge) = families.get(point.descriptor.name) else {
            continue;
        };
        let values: Vec<&str> = point.label_values.iter().map(String::as_str).collect();
        gauge.get_metric_with_label_values(&values)?.set(point.value);
    }

    let mut buf = Vec::new();
    TextEncoder::new().encode(&registry.gather(), &mut buf)?;
    String::from_utf8(buf).map_err(|e| prometheus::Error::Msg(e.to_string()))
}

/// Points whose family and label values repeat an earlier point.
fn collisions(points: &[MetricPoint]) -> Vec<&MetricPoint> {
    let mut seen: HashSet<(&str, &[String])> = HashSet::new();
    points
        .iter()
        .filter(|p| !seen.insert((p.descriptor.name, p.label_values.as_slice())))
        .collect()
}
