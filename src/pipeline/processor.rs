//! Single file processing pipeline.
//!
//! Strictly linear: spectrogram, detection mask, border filter, segmenter,
//! clip extraction. Every stage is a pure transform of its predecessor's
//! output; the cancellation token is checked between stages so a long run
//! can be abandoned without affecting the rest of the batch.

use crate::audio::load_waveform;
use crate::cancel::RunToken;
use crate::clipper::{ClipWriter, clip_range, extract};
use crate::config::Config;
use crate::constants::debug_images;
use crate::detection::{detect_events, segment_mask, suppress_border_noise};
use crate::error::Result;
use crate::pipeline::source_stem;
use crate::spectrogram::{self, NormPolicy, presentation_view, render};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Which debug images to export alongside the clips.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExportOptions {
    /// Export the globally-normalized spectrogram.
    pub spectrogram: bool,
    /// Export the raw detection mask.
    pub mask: bool,
    /// Export the border-filtered mask.
    pub cleaned: bool,
}

/// Result of processing a single file.
#[derive(Debug)]
pub struct ProcessResult {
    /// Number of segments detected.
    pub segments: usize,
    /// Number of clips written.
    pub clips: usize,
    /// Processing duration in seconds.
    pub duration_secs: f64,
    /// Audio duration in seconds.
    pub audio_duration_secs: f64,
}

/// Process a single audio file and write one clip per detected segment.
pub fn process_file(
    input_path: &Path,
    config: &Config,
    export: ExportOptions,
    token: &RunToken,
) -> Result<ProcessResult> {
    let start_time = Instant::now();

    info!("Processing: {}", input_path.display());

    // Decode audio
    let waveform = load_waveform(input_path)?;
    let audio_duration_secs = waveform.duration_secs();
    info!(
        "Decoded {:.1}s of audio at {} Hz",
        audio_duration_secs, waveform.sample_rate
    );
    token.check()?;

    // Spectrogram
    let detection = &config.detection;
    let spec_db = spectrogram::stft_magnitude_db(&waveform, detection.frame_len)?;
    let spec = spectrogram::normalize(&spec_db, detection.norm);
    debug!(
        "Spectrogram: {} bins x {} frames ({:?} normalization)",
        spec.rows(),
        spec.cols(),
        detection.norm
    );
    token.check()?;

    let stem = source_stem(input_path);
    let clip_dir = &config.clips.output_dir;
    if export.spectrogram {
        ensure_dir(clip_dir)?;
        // Display export always uses the global policy
        let view = presentation_view(&spectrogram::normalize(&spec_db, NormPolicy::Global));
        let path = clip_dir.join(format!("{stem}{}", debug_images::SPECTROGRAM));
        render::save_matrix_png(&view, &path)?;
        debug!("Wrote {}", path.display());
    }

    // Detection mask
    let mask = detect_events(&spec, detection.blur, detection.pickup, detection.despeckle)?;
    debug!("Detection mask: {} cells set", mask.total_ones());
    token.check()?;

    if export.mask {
        ensure_dir(clip_dir)?;
        let path = clip_dir.join(format!("{stem}{}", debug_images::MASK));
        render::save_matrix_png(&mask.to_matrix(), &path)?;
    }

    // Border noise suppression
    let cleaned = suppress_border_noise(&mask, detection.border_row)?;
    debug!(
        "Border filter cleared {} cells",
        mask.total_ones() - cleaned.total_ones()
    );
    token.check()?;

    if export.cleaned {
        ensure_dir(clip_dir)?;
        let path = clip_dir.join(format!("{stem}{}", debug_images::CLEANED));
        render::save_matrix_png(&cleaned.to_matrix(), &path)?;
    }

    // Segmentation
    let segmentation = &config.segmentation;
    let segments = segment_mask(&cleaned, segmentation.blur, segmentation.pickup)?;
    info!("Found {} segment(s)", segments.len());
    token.check()?;

    // Clip extraction
    let writer = ClipWriter::new(clip_dir.clone());
    let mut clips = 0usize;
    for (index, segment) in segments.iter().enumerate() {
        token.check()?;
        let range = clip_range(
            *segment,
            spec.cols(),
            waveform.len(),
            waveform.sample_rate,
            config.clips.min_duration,
        )?;
        let samples = extract(&waveform, range);
        let path = writer.write_clip(samples, waveform.sample_rate, &stem, index)?;
        debug!(
            "Wrote clip {} (frames {}..={}, samples {}..{})",
            path.display(),
            segment.start_frame,
            segment.end_frame,
            range.start,
            range.end
        );
        clips += 1;
    }

    let duration_secs = start_time.elapsed().as_secs_f64();
    let realtime_factor = if duration_secs > 0.0 {
        audio_duration_secs / duration_secs
    } else {
        0.0
    };
    info!(
        "Processed {} in {:.2}s ({:.1}x realtime), {} clip(s) written",
        input_path.display(),
        duration_secs,
        realtime_factor,
        clips
    );

    Ok(ProcessResult {
        segments: segments.len(),
        clips,
        duration_secs,
        audio_duration_secs,
    })
}

fn ensure_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|e| crate::error::Error::OutputDirCreateFailed {
        path: dir.to_path_buf(),
        source: e,
    })
}
