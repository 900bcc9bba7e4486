//! Application-wide constants.
//!
//! All magic numbers and strings are defined here to ensure consistency
//! and make changes easy to track.

/// Application name used for config directories and user-facing messages.
pub const APP_NAME: &str = "vocseg";

/// Default STFT frame length in samples.
pub const DEFAULT_FRAME_LEN: usize = 1024;

/// Default Gaussian sigma for event detection smoothing.
pub const DEFAULT_DETECTION_BLUR: f32 = 3.0;

/// Default pickup threshold for event detection.
pub const DEFAULT_DETECTION_PICKUP: f32 = 0.65;

/// Default border noise threshold row (frequency-bin index).
pub const DEFAULT_BORDER_ROW: usize = 55;

/// Default Gaussian sigma for segmentation smoothing.
pub const DEFAULT_SEGMENTATION_BLUR: f32 = 19.0;

/// Default pickup threshold for segmentation strength.
pub const DEFAULT_SEGMENTATION_PICKUP: f32 = 1.0;

/// Default output directory for extracted clips.
pub const DEFAULT_CLIP_DIR: &str = "clips";

/// Decibel conversion constants for the spectrogram builder.
pub mod db {
    /// Amplitude floor before log conversion.
    pub const AMIN: f32 = 1e-5;

    /// Dynamic range below the peak retained after dB conversion.
    pub const TOP_DB: f32 = 80.0;
}

/// Pickup threshold bounds.
pub mod pickup {
    /// Minimum valid pickup threshold.
    pub const MIN: f32 = 0.0;
    /// Maximum valid pickup threshold for detection.
    pub const MAX: f32 = 1.0;
}

/// Gaussian filter constants.
pub mod gaussian {
    /// Kernel truncation in standard deviations.
    pub const TRUNCATE: f32 = 4.0;
}

/// Despeckle (binary median) filter window side length.
pub const DESPECKLE_WINDOW: usize = 5;

/// Row energy below which a frequency bin counts as silent when trimming.
pub const SILENT_ROW_ENERGY: f32 = 1e-3;

/// Supported audio file extensions for input collection.
pub const AUDIO_EXTENSIONS: &[&str] = &["wav", "flac", "mp3", "m4a", "aac"];

/// Debug image export file name suffixes, per pipeline stage.
pub mod debug_images {
    /// Normalized spectrogram export suffix.
    pub const SPECTROGRAM: &str = ".spectrogram.png";
    /// Raw detection mask export suffix.
    pub const MASK: &str = ".mask.png";
    /// Border-filtered mask export suffix.
    pub const CLEANED: &str = ".cleaned.png";
}
