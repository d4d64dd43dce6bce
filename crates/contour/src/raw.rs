//! Raw Per-Frame Contours

use crate::error::ContourError;
use serde::{Deserialize, Serialize};

/// How an extraction backend marks frames it could not measure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentinel {
    /// NaN (or any non-finite value) means undefined
    NaN,
    /// Zero or negative values mean undefined, e.g. 0 Hz for unvoiced frames
    NonPositive,
}

impl Sentinel {
    /// Interpret one backend sample
    pub fn interpret(self, sample: f64) -> Option<f64> {
        if !sample.is_finite() {
            return None;
        }
        match self {
            Sentinel::NaN => Some(sample),
            Sentinel::NonPositive if sample > 0.0 => Some(sample),
            Sentinel::NonPositive => None,
        }
    }
}

/// Ordered per-frame measurements of a single quantity.
///
/// `None` is the explicit undefined marker. Non-finite values never survive
/// construction, so nothing downstream has to compare against NaN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawContourRepr")]
pub struct RawContour {
    /// Frame hop (seconds)
    hop_seconds: f64,
    /// One entry per analysis frame
    frames: Vec<Option<f64>>,
}

#[derive(Deserialize)]
struct RawContourRepr {
    hop_seconds: f64,
    #[serde(default)]
    frames: Vec<Option<f64>>,
}

impl TryFrom<RawContourRepr> for RawContour {
    type Error = ContourError;

    fn try_from(repr: RawContourRepr) -> Result<Self, Self::Error> {
        RawContour::new(repr.hop_seconds, repr.frames)
    }
}

impl RawContour {
    /// Create a contour from explicit frame values
    pub fn new(hop_seconds: f64, frames: Vec<Option<f64>>) -> Result<Self, ContourError> {
        validate_hop(hop_seconds)?;
        let frames = frames
            .into_iter()
            .map(|v| v.filter(|x| x.is_finite()))
            .collect();
        Ok(Self { hop_seconds, frames })
    }

    /// Create a contour of `frame_count` frames from `(frame_index, value)` pairs.
    ///
    /// Frames that are never mentioned are undefined.
    pub fn from_indexed<I>(
        hop_seconds: f64,
        frame_count: usize,
        pairs: I,
    ) -> Result<Self, ContourError>
    where
        I: IntoIterator<Item = (usize, Option<f64>)>,
    {
        validate_hop(hop_seconds)?;
        let mut frames = vec![None; frame_count];
        let mut seen = vec![false; frame_count];

        for (index, value) in pairs {
            if index >= frame_count {
                return Err(ContourError::FrameOutOfBounds { index, frame_count });
            }
            if seen[index] {
                return Err(ContourError::DuplicateFrame(index));
            }
            seen[index] = true;
            frames[index] = value.filter(|x| x.is_finite());
        }

        Ok(Self { hop_seconds, frames })
    }

    /// Create a contour from backend samples that use an in-band sentinel
    pub fn from_samples(
        hop_seconds: f64,
        samples: &[f64],
        sentinel: Sentinel,
    ) -> Result<Self, ContourError> {
        validate_hop(hop_seconds)?;
        let frames = samples.iter().map(|&s| sentinel.interpret(s)).collect();
        Ok(Self { hop_seconds, frames })
    }

    /// A contour with no frames
    pub fn empty(hop_seconds: f64) -> Result<Self, ContourError> {
        Self::new(hop_seconds, Vec::new())
    }

    /// Frame hop (seconds)
    pub fn hop_seconds(&self) -> f64 {
        self.hop_seconds
    }

    /// Number of frames, defined or not
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Frame values in order
    pub fn frames(&self) -> &[Option<f64>] {
        &self.frames
    }

    /// Number of frames carrying a value
    pub fn defined_count(&self) -> usize {
        self.frames.iter().filter(|v| v.is_some()).count()
    }
}

fn validate_hop(hop_seconds: f64) -> Result<(), ContourError> {
    if hop_seconds.is_finite() && hop_seconds > 0.0 {
        Ok(())
    } else {
        Err(ContourError::InvalidHop(hop_seconds))
    }
}
