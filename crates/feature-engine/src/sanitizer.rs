//! Output Sanitizer
//!
//! Last step before a result crosses the serialization boundary. Every
//! numeric leaf that is NaN or infinite is replaced by the caller's chosen
//! placeholder; everything else passes through untouched. A replacement
//! means some aggregator missed a guard, so each one is logged.

use crate::features::FeatureSet;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::warn;

/// Substitute for a non-finite numeric leaf
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placeholder {
    /// Replace with `0.0`
    #[default]
    Zero,
    /// Replace with `null`
    Null,
    /// Replace with a fixed finite value
    Value(f64),
}

impl Placeholder {
    /// Replacement value, `None` meaning null.
    ///
    /// A non-finite `Value` placeholder degrades to zero.
    pub fn resolve(self) -> Option<f64> {
        match self {
            Placeholder::Zero => Some(0.0),
            Placeholder::Null => None,
            Placeholder::Value(v) if v.is_finite() => Some(v),
            Placeholder::Value(_) => Some(0.0),
        }
    }
}

/// Result tree: nested maps and lists of numbers, strings and booleans
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<Node>),
    Map(BTreeMap<String, Node>),
}

impl Node {
    /// Build a map node from `(key, node)` pairs
    pub fn map<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Node)>,
    {
        Node::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Whether every numeric leaf is finite
    pub fn is_finite(&self) -> bool {
        match self {
            Node::Number(n) => n.is_finite(),
            Node::List(items) => items.iter().all(Node::is_finite),
            Node::Map(entries) => entries.values().all(Node::is_finite),
            Node::Null | Node::Bool(_) | Node::Text(_) => true,
        }
    }

    /// Look up a direct child of a map node
    pub fn get(&self, key: &str) -> Option<&Node> {
        match self {
            Node::Map(entries) => entries.get(key),
            _ => None,
        }
    }

    /// Numeric value of a number node
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Node::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Render as JSON text
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Render as indented JSON text
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Node::Null => serializer.serialize_unit(),
            Node::Bool(b) => serializer.serialize_bool(*b),
            Node::Number(n) => serializer.serialize_f64(*n),
            Node::Text(s) => serializer.serialize_str(s),
            Node::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Node::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

impl From<f64> for Node {
    fn from(value: f64) -> Self {
        Node::Number(value)
    }
}

impl From<Option<f64>> for Node {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Node::Null, Node::Number)
    }
}

impl From<usize> for Node {
    fn from(value: usize) -> Self {
        Node::Number(value as f64)
    }
}

impl From<bool> for Node {
    fn from(value: bool) -> Self {
        Node::Bool(value)
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::Text(value.to_string())
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Node::Text(value)
    }
}

impl From<FeatureSet> for Node {
    fn from(features: FeatureSet) -> Self {
        features.into_node()
    }
}

impl From<Vec<Node>> for Node {
    fn from(items: Vec<Node>) -> Self {
        Node::List(items)
    }
}

/// Sanitized value plus the path of every replaced leaf
#[derive(Debug, Clone, PartialEq)]
pub struct Sanitized<T> {
    pub value: T,
    pub replaced: Vec<String>,
}

impl<T> Sanitized<T> {
    /// Whether nothing had to be replaced
    pub fn is_clean(&self) -> bool {
        self.replaced.is_empty()
    }
}

/// Replace every non-finite numeric leaf of `node`.
///
/// Paths are reported as `/key/0/key` pointers from the root.
pub fn sanitize(node: Node, placeholder: Placeholder) -> Sanitized<Node> {
    let mut replaced = Vec::new();
    let value = sanitize_node(node, placeholder, &mut String::new(), &mut replaced);
    Sanitized { value, replaced }
}

fn sanitize_node(
    node: Node,
    placeholder: Placeholder,
    path: &mut String,
    replaced: &mut Vec<String>,
) -> Node {
    match node {
        Node::Number(n) if !n.is_finite() => {
            let path = if path.is_empty() { "/".to_string() } else { path.clone() };
            warn!("Non-finite value {} at {} replaced by {:?}", n, path, placeholder);
            replaced.push(path);
            Node::from(placeholder.resolve())
        }
        Node::List(items) => Node::List(
            items
                .into_iter()
                .enumerate()
                .map(|(i, item)| {
                    let len = path.len();
                    path.push('/');
                    path.push_str(&i.to_string());
                    let item = sanitize_node(item, placeholder, path, replaced);
                    path.truncate(len);
                    item
                })
                .collect(),
        ),
        Node::Map(entries) => Node::Map(
            entries
                .into_iter()
                .map(|(key, value)| {
                    let len = path.len();
                    path.push('/');
                    path.push_str(&key);
                    let value = sanitize_node(value, placeholder, path, replaced);
                    path.truncate(len);
                    (key, value)
                })
                .collect(),
        ),
        other => other,
    }
}

/// Replace every non-finite value of a flat feature set
pub fn sanitize_features(mut features: FeatureSet, placeholder: Placeholder) -> Sanitized<FeatureSet> {
    let mut replaced = Vec::new();
    for (name, feature) in features.entries_mut() {
        if feature.is_finite() {
            continue;
        }
        warn!(
            "Non-finite feature {} = {:?} replaced by {:?}",
            name, feature.value, placeholder
        );
        feature.value = placeholder.resolve();
        replaced.push(name.clone());
    }
    Sanitized {
        value: features,
        replaced,
    }
}
