//! `catalog`: print every metric family with its labels.

use aruba_core::Collector;

pub fn handle() {
    for descriptor in Collector::catalog() {
        println!(
            "{}{{{}}}\t{}",
            descriptor.name,
            descriptor.label_names.join(","),
            descriptor.help
        );
    }
}
