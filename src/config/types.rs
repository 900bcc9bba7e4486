//! Configuration type definitions.

use crate::constants::{
    DEFAULT_BORDER_ROW, DEFAULT_CLIP_DIR, DEFAULT_DETECTION_BLUR, DEFAULT_DETECTION_PICKUP,
    DEFAULT_FRAME_LEN, DEFAULT_SEGMENTATION_BLUR, DEFAULT_SEGMENTATION_PICKUP,
};
use crate::spectrogram::NormPolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Event detection settings.
    #[serde(default)]
    pub detection: DetectionConfig,

    /// Segmentation settings.
    #[serde(default)]
    pub segmentation: SegmentationConfig,

    /// Clip output settings.
    #[serde(default)]
    pub clips: ClipConfig,

    /// Batch run settings.
    #[serde(default)]
    pub run: RunConfig,
}

/// Event detection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// STFT frame length in samples.
    pub frame_len: usize,

    /// Gaussian sigma for event detection smoothing.
    pub blur: f32,

    /// Pickup threshold for event detection (0.0-1.0).
    pub pickup: f32,

    /// Border noise threshold row (frequency-bin index).
    pub border_row: usize,

    /// Normalization policy feeding the detector.
    ///
    /// Detection thresholds are calibrated against `per-frame`; image
    /// export always uses the global policy regardless of this setting.
    pub norm: NormPolicy,

    /// Apply the 5x5 median despeckle pass after thresholding.
    pub despeckle: bool,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            frame_len: DEFAULT_FRAME_LEN,
            blur: DEFAULT_DETECTION_BLUR,
            pickup: DEFAULT_DETECTION_PICKUP,
            border_row: DEFAULT_BORDER_ROW,
            norm: NormPolicy::PerFrame,
            despeckle: false,
        }
    }
}

/// Segmentation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationConfig {
    /// Gaussian sigma for detection strength smoothing.
    pub blur: f32,

    /// Pickup threshold for detection strength.
    pub pickup: f32,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            blur: DEFAULT_SEGMENTATION_BLUR,
            pickup: DEFAULT_SEGMENTATION_PICKUP,
        }
    }
}

/// Clip output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipConfig {
    /// Output directory for extracted clips.
    pub output_dir: PathBuf,

    /// Minimum clip duration in seconds; shorter clips are widened.
    pub min_duration: Option<f64>,
}

impl Default for ClipConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_CLIP_DIR),
            min_duration: None,
        }
    }
}

/// Batch run settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Per-file processing timeout in seconds.
    pub timeout_secs: Option<f64>,
}
