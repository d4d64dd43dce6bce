//! Feature Set Assembly

use crate::sanitizer::{sanitize_features, Node, Placeholder, Sanitized};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Kind of statistic a feature value represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKind {
    Mean,
    Std,
    Min,
    Max,
    Percentile,
    Ratio,
    Count,
    Range,
    Duration,
    Rate,
    /// Log-scaled level such as dB
    Level,
    /// Weighted combination of other features
    Index,
}

/// A named scalar tagged with its statistic kind.
///
/// `None` is an explicit absent value and serializes as JSON `null`.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, Deserialize)]
pub struct FeatureValue {
    pub kind: StatKind,
    pub value: Option<f64>,
}

impl FeatureValue {
    /// Whether the value is absent or a finite number
    pub fn is_finite(&self) -> bool {
        self.value.map_or(true, f64::is_finite)
    }
}

/// Feature name to value mapping for one recording.
///
/// Serializes as a flat object of `name -> number | null`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureSet {
    entries: BTreeMap<String, FeatureValue>,
}

impl FeatureSet {
    /// Create an empty feature set
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, replacing any previous entry of the same name
    pub fn insert(&mut self, name: impl Into<String>, kind: StatKind, value: f64) {
        self.entries.insert(
            name.into(),
            FeatureValue {
                kind,
                value: Some(value),
            },
        );
    }

    /// Insert an explicit absent value
    pub fn insert_absent(&mut self, name: impl Into<String>, kind: StatKind) {
        self.entries
            .insert(name.into(), FeatureValue { kind, value: None });
    }

    /// Insert a prepared entry
    pub fn insert_value(&mut self, name: impl Into<String>, value: FeatureValue) {
        self.entries.insert(name.into(), value);
    }

    /// Look up an entry
    pub fn get(&self, name: &str) -> Option<&FeatureValue> {
        self.entries.get(name)
    }

    /// Numeric value of an entry, `None` when missing or absent
    pub fn value(&self, name: &str) -> Option<f64> {
        self.entries.get(name).and_then(|v| v.value)
    }

    /// Merge another (partial) set into this one
    pub fn extend(&mut self, other: FeatureSet) {
        self.entries.extend(other.entries);
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FeatureValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Whether every present value is finite
    pub fn is_finite(&self) -> bool {
        self.entries.values().all(FeatureValue::is_finite)
    }

    /// Plain `name -> value` view
    pub fn to_values(&self) -> BTreeMap<String, Option<f64>> {
        self.entries
            .iter()
            .map(|(k, v)| (k.clone(), v.value))
            .collect()
    }

    /// Encode as a JSON object
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Compact binary encoding of the `name -> value` view
    pub fn to_bytes(&self) -> Result<Vec<u8>, postcard::Error> {
        postcard::to_allocvec(self)
    }

    /// Decode bytes written by [`to_bytes`](Self::to_bytes)
    pub fn values_from_bytes(bytes: &[u8]) -> Result<BTreeMap<String, Option<f64>>, postcard::Error> {
        postcard::from_bytes(bytes)
    }

    /// Convert into a result tree node
    pub fn into_node(self) -> Node {
        Node::Map(
            self.entries
                .into_iter()
                .map(|(k, v)| (k, Node::from(v.value)))
                .collect(),
        )
    }

    /// Replace every non-finite value with `placeholder`
    pub fn sanitized(self, placeholder: Placeholder) -> Sanitized<FeatureSet> {
        sanitize_features(self, placeholder)
    }

    pub(crate) fn entries_mut(&mut self) -> impl Iterator<Item = (&String, &mut FeatureValue)> {
        self.entries.iter_mut()
    }
}

impl Serialize for FeatureSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, feature) in &self.entries {
            map.serialize_entry(name, &feature.value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FeatureSet {
        let mut features = FeatureSet::new();
        features.insert("f0_mean_hz", StatKind::Mean, 151.25);
        features.insert("voiced_fraction", StatKind::Ratio, 0.5);
        features.insert_absent("f1_mean_hz", StatKind::Mean);
        features
    }

    #[test]
    fn test_lookup() {
        let features = sample();
        assert_eq!(features.len(), 3);
        assert_eq!(features.value("f0_mean_hz"), Some(151.25));
        assert_eq!(features.value("f1_mean_hz"), None);
        assert_eq!(features.get("f1_mean_hz").unwrap().kind, StatKind::Mean);
        assert!(features.get("missing").is_none());
    }

    #[test]
    fn test_json_is_flat() {
        let json = sample().to_json().unwrap();
        assert_eq!(
            json,
            r#"{"f0_mean_hz":151.25,"f1_mean_hz":null,"voiced_fraction":0.5}"#
        );
    }

    #[test]
    fn test_json_round_trip() {
        let features = sample();
        let decoded: BTreeMap<String, Option<f64>> =
            serde_json::from_str(&features.to_json().unwrap()).unwrap();
        assert_eq!(decoded, features.to_values());
    }

    #[test]
    fn test_bytes_round_trip() {
        let features = sample();
        let bytes = features.to_bytes().unwrap();
        assert_eq!(FeatureSet::values_from_bytes(&bytes).unwrap(), features.to_values());
    }

    #[test]
    fn test_extend_overrides() {
        let mut features = sample();
        let mut other = FeatureSet::new();
        other.insert("voiced_fraction", StatKind::Ratio, 1.0);
        other.insert("jitter_percent", StatKind::Ratio, 0.4);
        features.extend(other);
        assert_eq!(features.len(), 4);
        assert_eq!(features.value("voiced_fraction"), Some(1.0));
    }

    #[test]
    fn test_is_finite() {
        let mut features = sample();
        assert!(features.is_finite());
        features.insert("broken", StatKind::Ratio, f64::NAN);
        assert!(!features.is_finite());
    }

    #[test]
    fn test_sanitized_keeps_absent_values() {
        let mut features = sample();
        features.insert("jitter_percent", StatKind::Ratio, f64::INFINITY);
        let result = features.sanitized(Placeholder::Zero);
        assert_eq!(result.replaced, vec!["jitter_percent"]);
        assert_eq!(result.value.value("jitter_percent"), Some(0.0));
        assert_eq!(result.value.value("f1_mean_hz"), None);
    }
}
