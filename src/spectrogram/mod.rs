//! Spectrogram construction: waveform to normalized time-frequency matrix.
//!
//! The short-time transform uses a Hann window of `frame_len` samples and a
//! hop of `frame_len / 2 + 1`. The hop is intentionally one sample longer
//! than a true half frame; downstream frame-to-sample mapping is calibrated
//! against this exact formula, so it must not be "fixed".

mod matrix;
pub mod render;

pub use matrix::Matrix;

use crate::audio::Waveform;
use crate::constants::{SILENT_ROW_ENERGY, db};
use crate::error::{Error, Result};
use realfft::RealFftPlanner;
use serde::{Deserialize, Serialize};

/// Min-max normalization policy for the magnitude matrix.
///
/// Detection thresholds are calibrated against `PerFrame`; `Global` is for
/// display and image export. The two are never mixed within one path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum NormPolicy {
    /// Each time frame scaled to [0,1] by its own min/max.
    #[default]
    PerFrame,
    /// Single min/max over the entire matrix.
    Global,
}

/// Hop length for a given frame length.
#[must_use]
pub fn hop_len(frame_len: usize) -> usize {
    frame_len / 2 + 1
}

/// Build a normalized magnitude spectrogram from a waveform.
///
/// Convenience wrapper over [`stft_magnitude_db`] and [`normalize`].
pub fn build(waveform: &Waveform, frame_len: usize, policy: NormPolicy) -> Result<Matrix> {
    let spec = stft_magnitude_db(waveform, frame_len)?;
    Ok(normalize(&spec, policy))
}

/// Compute the decibel-scale magnitude spectrogram.
///
/// Magnitudes are floored at a small amplitude before the log, and the
/// result is clipped to an 80 dB range below the matrix peak.
pub fn stft_magnitude_db(waveform: &Waveform, frame_len: usize) -> Result<Matrix> {
    if waveform.is_empty() {
        return Err(Error::invalid_input("waveform is empty"));
    }
    if frame_len == 0 {
        return Err(Error::invalid_input("frame length must be positive"));
    }
    if frame_len > waveform.len() {
        return Err(Error::invalid_input(format!(
            "frame length {frame_len} exceeds waveform length {}",
            waveform.len()
        )));
    }

    let hop = hop_len(frame_len);
    let n_bins = frame_len / 2 + 1;
    let n_frames = (waveform.len() - frame_len) / hop + 1;

    let mut planner = RealFftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(frame_len);
    let window = hann_window(frame_len);

    // Reusable FFT buffers, filled in place per frame
    let mut input = fft.make_input_vec();
    let mut spectrum = fft.make_output_vec();

    let mut data = Vec::with_capacity(n_bins * n_frames);
    for frame in 0..n_frames {
        let pos = frame * hop;
        for (inp, (&s, &w)) in input
            .iter_mut()
            .zip(waveform.samples[pos..pos + frame_len].iter().zip(&window))
        {
            *inp = s * w;
        }
        fft.process(&mut input, &mut spectrum)
            .map_err(|e| Error::invalid_input(format!("FFT failed: {e}")))?;
        data.extend(spectrum.iter().map(|c| amplitude_to_db(c.norm())));
    }

    let mut spec = Matrix::from_columns(n_bins, n_frames, data);
    clip_to_top_db(&mut spec);
    Ok(spec)
}

/// Normalize a matrix to [0,1] under the given policy.
///
/// A frame (or matrix) with zero dynamic range normalizes to all-zeros
/// rather than propagating a divide-by-zero.
#[must_use]
pub fn normalize(spec: &Matrix, policy: NormPolicy) -> Matrix {
    let mut out = spec.clone();
    match policy {
        NormPolicy::PerFrame => {
            for col in 0..out.cols() {
                let frame = out.col_mut(col);
                let (min, max) = slice_min_max(frame);
                scale_unit(frame, min, max);
            }
        }
        NormPolicy::Global => {
            if let Some((min, max)) = out.min_max() {
                for col in 0..out.cols() {
                    scale_unit(out.col_mut(col), min, max);
                }
            }
        }
    }
    out
}

/// Drop frequency rows whose total energy is below `SILENT_ROW_ENERGY`,
/// then flip the frequency axis so low frequencies sit at the bottom row.
///
/// Presentation-only transform for display and image export; the detection
/// path never applies it.
#[must_use]
pub fn presentation_view(spec: &Matrix) -> Matrix {
    let kept: Vec<usize> = (0..spec.rows())
        .filter(|&row| {
            let energy: f32 = (0..spec.cols()).map(|col| spec.get(row, col)).sum();
            energy > SILENT_ROW_ENERGY
        })
        .collect();

    let mut out = Matrix::zeros(kept.len(), spec.cols());
    for (new_row, &row) in kept.iter().rev().enumerate() {
        for col in 0..spec.cols() {
            out.set(new_row, col, spec.get(row, col));
        }
    }
    out
}

fn amplitude_to_db(amplitude: f32) -> f32 {
    20.0 * amplitude.max(db::AMIN).log10()
}

fn clip_to_top_db(spec: &mut Matrix) {
    if let Some((_, max)) = spec.min_max() {
        let floor = max - db::TOP_DB;
        for col in 0..spec.cols() {
            for v in spec.col_mut(col) {
                *v = v.max(floor);
            }
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn hann_window(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| 0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / (size - 1) as f32).cos()))
        .collect()
}

fn slice_min_max(values: &[f32]) -> (f32, f32) {
    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    for &v in values {
        min = min.min(v);
        max = max.max(v);
    }
    (min, max)
}

fn scale_unit(values: &mut [f32], min: f32, max: f32) {
    let range = max - min;
    if range <= f32::EPSILON {
        values.fill(0.0);
    } else {
        for v in values {
            *v = (*v - min) / range;
        }
    }
}
