//! Contour Cleaner

use crate::range::PlausibleRange;
use crate::raw::RawContour;
use tracing::debug;

/// Finite, plausible subsequence of a [`RawContour`].
///
/// Values keep their original relative order, and each value remembers the
/// frame it came from so that adjacency and cross-contour alignment remain
/// available. `removed_count + len() == original_count` always holds.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanContour {
    values: Vec<f64>,
    frame_indices: Vec<usize>,
    removed_count: usize,
    original_count: usize,
    hop_seconds: f64,
}

/// Drop undefined frames and, if a range is given, frames outside it.
///
/// Never fails: a contour where every frame is dropped simply comes back
/// empty and downstream aggregators apply their fallback policy.
pub fn clean(raw: &RawContour, plausible_range: Option<PlausibleRange>) -> CleanContour {
    let original_count = raw.frame_count();
    let mut values = Vec::with_capacity(original_count);
    let mut frame_indices = Vec::with_capacity(original_count);

    for (index, frame) in raw.frames().iter().enumerate() {
        let Some(value) = *frame else { continue };
        if !value.is_finite() {
            continue;
        }
        if let Some(range) = plausible_range {
            if !range.contains(value) {
                continue;
            }
        }
        values.push(value);
        frame_indices.push(index);
    }

    let removed_count = original_count - values.len();
    debug!(
        "Cleaned contour: kept {} of {} frames ({} removed)",
        values.len(),
        original_count,
        removed_count
    );

    CleanContour {
        values,
        frame_indices,
        removed_count,
        original_count,
        hop_seconds: raw.hop_seconds(),
    }
}

impl CleanContour {
    /// Surviving values in frame order
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Original frame index of every surviving value
    pub fn frame_indices(&self) -> &[usize] {
        &self.frame_indices
    }

    /// Number of surviving values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no frame survived
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Frames dropped during cleaning
    pub fn removed_count(&self) -> usize {
        self.removed_count
    }

    /// Frames in the raw contour
    pub fn original_count(&self) -> usize {
        self.original_count
    }

    /// Frame hop (seconds)
    pub fn hop_seconds(&self) -> f64 {
        self.hop_seconds
    }

    /// Fraction of frames that survived, 0 for an empty recording
    pub fn coverage(&self) -> f64 {
        if self.original_count == 0 {
            0.0
        } else {
            1.0 - self.removed_count as f64 / self.original_count as f64
        }
    }

    /// Length of the whole recording (seconds)
    pub fn duration_seconds(&self) -> f64 {
        self.original_count as f64 * self.hop_seconds
    }

    /// Values of this contour at the frames `other` kept.
    ///
    /// Frames kept by `other` but dropped here are skipped.
    pub fn aligned_to(&self, other: &CleanContour) -> Vec<f64> {
        let mut aligned = Vec::with_capacity(other.len().min(self.len()));
        let mut i = 0;
        let mut j = 0;

        // both index lists ascend
        while i < self.frame_indices.len() && j < other.frame_indices.len() {
            let ours = self.frame_indices[i];
            let theirs = other.frame_indices[j];
            if ours == theirs {
                aligned.push(self.values[i]);
                i += 1;
                j += 1;
            } else if ours < theirs {
                i += 1;
            } else {
                j += 1;
            }
        }

        aligned
    }

    /// Maximal runs of consecutive kept frames, as `(start position, length)`
    pub fn runs(&self) -> Vec<(usize, usize)> {
        self.runs_where(|_| true)
    }

    /// Maximal runs of consecutive frames satisfying `keep`, as
    /// `(start position, length)` pairs over [`values`](Self::values).
    pub fn runs_where<F>(&self, keep: F) -> Vec<(usize, usize)>
    where
        F: Fn(f64) -> bool,
    {
        let mut runs = Vec::new();
        let mut current: Option<(usize, usize)> = None;

        for (pos, &value) in self.values.iter().enumerate() {
            let adjacent = pos > 0 && self.frame_indices[pos] == self.frame_indices[pos - 1] + 1;
            if !keep(value) {
                if let Some(run) = current.take() {
                    runs.push(run);
                }
                continue;
            }
            current = match current {
                Some((start, len)) if adjacent => Some((start, len + 1)),
                Some(run) => {
                    runs.push(run);
                    Some((pos, 1))
                }
                None => Some((pos, 1)),
            };
        }

        if let Some(run) = current {
            runs.push(run);
        }
        runs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn raw(frames: Vec<Option<f64>>) -> RawContour {
        RawContour::new(0.01, frames).unwrap()
    }

    #[test]
    fn test_removes_undefined_frames() {
        let contour = clean(&raw(vec![Some(100.0), None, Some(120.0), None]), None);
        assert_eq!(contour.values(), &[100.0, 120.0]);
        assert_eq!(contour.frame_indices(), &[0, 2]);
        assert_eq!(contour.removed_count(), 2);
        assert_eq!(contour.original_count(), 4);
    }

    #[test]
    fn test_range_removes_implausible() {
        let range = PlausibleRange::new(50.0, 500.0).unwrap();
        let contour = clean(
            &raw(vec![Some(0.0), Some(-10.0), Some(49.0), Some(50.0), Some(510.0), Some(210.0)]),
            Some(range),
        );
        assert_eq!(contour.values(), &[50.0, 210.0]);
        assert_eq!(contour.removed_count(), 4);
    }

    #[test]
    fn test_all_undefined_is_empty_not_error() {
        let contour = clean(&raw(vec![None; 100]), None);
        assert!(contour.is_empty());
        assert_eq!(contour.removed_count(), 100);
        assert_eq!(contour.coverage(), 0.0);
    }

    #[test]
    fn test_empty_raw_contour() {
        let contour = clean(&RawContour::empty(0.01).unwrap(), None);
        assert_eq!(contour.original_count(), 0);
        assert_eq!(contour.coverage(), 0.0);
        assert_eq!(contour.duration_seconds(), 0.0);
    }

    #[test]
    fn test_coverage_and_duration() {
        let contour = clean(&raw(vec![Some(1.0), None, Some(1.0), Some(1.0)]), None);
        assert!((contour.coverage() - 0.75).abs() < 1e-12);
        assert!((contour.duration_seconds() - 0.04).abs() < 1e-12);
    }

    #[test]
    fn test_aligned_to() {
        let pitch = clean(&raw(vec![Some(100.0), None, Some(110.0), Some(120.0)]), None);
        let amplitude = clean(&raw(vec![Some(0.5), Some(0.6), None, Some(0.8)]), None);
        assert_eq!(amplitude.aligned_to(&pitch), vec![0.5, 0.8]);
        assert_eq!(pitch.aligned_to(&amplitude), vec![100.0, 120.0]);
    }

    #[test]
    fn test_runs_respect_frame_gaps() {
        let contour = clean(
            &raw(vec![Some(5.0), Some(6.0), None, Some(7.0), Some(1.0), Some(8.0), Some(9.0)]),
            None,
        );
        let runs = contour.runs_where(|v| v >= 5.0);
        // frames 0-1, then 3 (gap at 2), then 5-6 (frame 4 below threshold)
        assert_eq!(runs, vec![(0, 2), (2, 1), (4, 2)]);
        assert_eq!(contour.runs(), vec![(0, 2), (2, 4)]);
    }

    proptest! {
        #[test]
        fn prop_counts_add_up(
            frames in prop::collection::vec(prop::option::of(-1000.0f64..1000.0), 0..200),
            low in -500.0f64..0.0,
            width in 0.0f64..1000.0,
        ) {
            let range = PlausibleRange::new(low, low + width).unwrap();
            let contour = clean(&raw(frames.clone()), Some(range));
            prop_assert_eq!(contour.removed_count() + contour.len(), frames.len());
            prop_assert!(contour.values().iter().all(|v| v.is_finite() && range.contains(*v)));
            prop_assert!(contour.frame_indices().windows(2).all(|w| w[0] < w[1]));
        }
    }
}
