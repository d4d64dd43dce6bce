//! Segment Averaging
//!
//! Long recordings are analyzed in segments and reduced to one feature set.

use crate::features::{FeatureSet, FeatureValue};
use safe_stats::safe_mean;
use std::collections::BTreeMap;

/// Average feature sets of several segments into one.
///
/// Per feature, only finite non-zero values are averaged, since a zero is
/// usually a segment's empty-input fallback. A feature that is zero in
/// every segment stays `0.0`; one that is absent in every segment stays
/// absent. The kind is taken from the first segment reporting the feature.
pub fn average_segments(segments: &[FeatureSet]) -> FeatureSet {
    let mut collected: BTreeMap<&str, (FeatureValue, Vec<f64>, bool)> = BTreeMap::new();

    for segment in segments {
        for (name, feature) in segment.iter() {
            let (_, values, present) = collected
                .entry(name)
                .or_insert_with(|| (*feature, Vec::new(), false));
            if let Some(v) = feature.value.filter(|v| v.is_finite()) {
                *present = true;
                if v != 0.0 {
                    values.push(v);
                }
            }
        }
    }

    let mut averaged = FeatureSet::new();
    for (name, (first, values, present)) in collected {
        let value = if !values.is_empty() {
            Some(safe_mean(&values, 0.0))
        } else if present {
            Some(0.0)
        } else {
            None
        };
        averaged.insert_value(
            name,
            FeatureValue {
                kind: first.kind,
                value,
            },
        );
    }
    averaged
}
