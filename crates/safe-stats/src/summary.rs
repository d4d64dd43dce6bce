//! Descriptive Summary of a Value Sequence

use crate::reduce::{safe_max, safe_mean, safe_min, safe_std};
use crate::DEFAULT_FALLBACK;
use serde::{Deserialize, Serialize};

/// Summary statistics for a sequence of finite values
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Number of values summarized
    pub count: usize,
    /// Mean value
    pub mean: f64,
    /// Sample standard deviation
    pub std_dev: f64,
    /// Minimum value
    pub min: f64,
    /// Maximum value
    pub max: f64,
}

impl Summary {
    /// Compute a summary, falling back to zero for every field on empty input
    pub fn compute(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }

        Self {
            count: values.len(),
            mean: safe_mean(values, DEFAULT_FALLBACK),
            std_dev: safe_std(values, DEFAULT_FALLBACK),
            min: safe_min(values, DEFAULT_FALLBACK),
            max: safe_max(values, DEFAULT_FALLBACK),
        }
    }

    /// `max - min`, zero when empty
    pub fn range(&self) -> f64 {
        crate::finite_or(self.max - self.min, DEFAULT_FALLBACK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_values() {
        let stats = Summary::compute(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(stats.count, 5);
        assert!((stats.mean - 3.0).abs() < 0.001);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 5.0);
        assert_eq!(stats.range(), 4.0);
    }

    #[test]
    fn test_summary_single_value() {
        let stats = Summary::compute(&[200.0]);
        assert_eq!(stats.mean, 200.0);
        assert_eq!(stats.std_dev, 0.0);
        assert_eq!(stats.range(), 0.0);
    }

    #[test]
    fn test_empty_values() {
        let stats = Summary::compute(&[]);
        assert_eq!(stats, Summary::default());
        assert_eq!(stats.mean, 0.0);
    }
}
