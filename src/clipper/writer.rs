//! WAV file writing for extracted clips.

use std::fs;
use std::path::{Path, PathBuf};

use hound::{SampleFormat, WavSpec, WavWriter as HoundWriter};

use crate::error::Error;

/// Writes detection clips to WAV files.
pub struct ClipWriter {
    /// Output directory for clips.
    output_dir: PathBuf,
}

impl ClipWriter {
    /// Create a new clip writer with the given output directory.
    #[must_use]
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    /// Write one detection's samples to a WAV file.
    ///
    /// The filename carries a two-part identifier, source file stem plus
    /// detection index, so clips never collide across source files or
    /// across detections within one file.
    ///
    /// # Errors
    ///
    /// Returns an error if the output directory cannot be created or the
    /// file cannot be written.
    pub fn write_clip(
        &self,
        samples: &[f32],
        sample_rate: u32,
        source_stem: &str,
        detection_index: usize,
    ) -> Result<PathBuf, Error> {
        fs::create_dir_all(&self.output_dir).map_err(|e| Error::OutputDirCreateFailed {
            path: self.output_dir.clone(),
            source: e,
        })?;

        let filename = clip_filename(source_stem, detection_index);
        let output_path = self.output_dir.join(filename);
        write_wav_file(&output_path, samples, sample_rate)?;
        Ok(output_path)
    }
}

/// Generate a collision-free clip filename.
///
/// Format: `{stem}_d{index}.wav`, e.g. `dawn-chorus_d3.wav`.
fn clip_filename(source_stem: &str, detection_index: usize) -> String {
    format!("{}_d{detection_index}.wav", sanitize_filename(source_stem))
}

/// Sanitize a string for use as a filename.
///
/// Replaces characters that are invalid in filenames across platforms
/// and prevents path traversal.
fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            _ => c,
        })
        .collect();

    sanitized.replace("..", "__")
}

/// Write samples to a 16-bit mono WAV file.
fn write_wav_file(path: &Path, samples: &[f32], sample_rate: u32) -> Result<(), Error> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut writer = HoundWriter::create(path, spec).map_err(|e| Error::WavWriteFailed {
        path: path.to_path_buf(),
        source: e,
    })?;

    for &sample in samples {
        #[allow(clippy::cast_possible_truncation)]
        let sample_i16 = (sample.clamp(-1.0, 1.0) * f32::from(i16::MAX)) as i16;
        writer
            .write_sample(sample_i16)
            .map_err(|e| Error::WavWriteFailed {
                path: path.to_path_buf(),
                source: e,
            })?;
    }

    writer.finalize().map_err(|e| Error::WavWriteFailed {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}
