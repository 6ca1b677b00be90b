// ── Metric descriptors and points ──

/// Static description of one gauge family.
///
/// Identity is the name; all descriptors live in [`crate::catalog`].
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct MetricDescriptor {
    pub name: &'static str,
    pub help: &'static str,
    pub label_names: &'static [&'static str],
}

/// One sample produced by a scrape.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricPoint {
    pub descriptor: &'static MetricDescriptor,
    pub value: f64,
    /// Positionally aligned with `descriptor.label_names`.
    pub label_values: Vec<String>,
}

impl MetricPoint {
    pub fn new(descriptor: &'static MetricDescriptor, value: f64, label_values: &[&str]) -> Self {
        debug_assert_eq!(
            label_values.len(),
            descriptor.label_names.len(),
            "label arity mismatch for {}",
            descriptor.name
        );
        Self {
            descriptor,
            value,
            label_values: label_values.iter().map(|v| (*v).to_owned()).collect(),
        }
    }

    /// Value of the named label, if the descriptor declares it.
    pub fn label(&self, name: &str) -> Option<&str> {
        self.descriptor
            .label_names
            .iter()
            .position(|n| *n == name)
            .and_then(|i| self.label_values.get(i))
            .map(String::as_str)
    }
}

/// Push a point only when the source value is present.
pub(crate) fn push_present(
    out: &mut Vec<MetricPoint>,
    descriptor: &'static MetricDescriptor,
    value: Option<f64>,
    label_values: &[&str],
) {
    if let Some(value) = value {
        out.push(MetricPoint::new(descriptor, value, label_values));
    }
}
