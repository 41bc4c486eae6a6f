use std::collections::HashMap;
use tracing::debug;
use uom::si::{angle::degree, f64::Angle};

/// Key under which the observer inclination is published.
pub const INCLINATION_KEY: &str = "inc_degrees";

/// Key-value metadata kept by the host.
pub trait Metadata {
    /// Numeric filter value attached to the current data set.
    fn filter_value(&self, key: &str) -> Option<f64>;

    fn string(&self, key: &str) -> Option<String>;

    fn set_string(&mut self, key: &str, value: String);
}

/// In-memory [`Metadata`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MetadataStore {
    filters: HashMap<String, f64>,
    strings: HashMap<String, String>,
}

impl MetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter(mut self, key: &str, value: f64) -> Self {
        self.filters.insert(key.to_string(), value);
        self
    }
}

impl Metadata for MetadataStore {
    fn filter_value(&self, key: &str) -> Option<f64> {
        self.filters.get(key).copied()
    }

    fn string(&self, key: &str) -> Option<String> {
        self.strings.get(key).cloned()
    }

    fn set_string(&mut self, key: &str, value: String) {
        self.strings.insert(key.to_string(), value);
    }
}

/// Publishes the observer `inclination` in degrees under [`INCLINATION_KEY`].
pub fn publish_inclination(metadata: &mut (impl Metadata + ?Sized), inclination: Angle) {
    let value = format!("{:12.6}", inclination.get::<degree>());
    debug!(value = value.trim(), "publishing inclination");
    metadata.set_string(INCLINATION_KEY, value);
}
