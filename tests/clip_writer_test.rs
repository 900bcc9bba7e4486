//! Tests for the WAV clip writer.

#![allow(clippy::unwrap_used, clippy::cast_precision_loss)]

use tempfile::TempDir;
use vocseg::clipper::ClipWriter;

#[test]
fn test_write_clip_creates_output_directory() {
    let temp_dir = TempDir::new().unwrap();
    let out = temp_dir.path().join("clips");
    let writer = ClipWriter::new(out.clone());

    let samples: Vec<f32> = (0..22_050).map(|i| (i as f32 * 0.01).sin()).collect();
    let path = writer.write_clip(&samples, 22_050, "rec-001", 0).unwrap();

    assert!(out.exists());
    assert!(path.exists());
}

#[test]
fn test_write_clip_filename_carries_source_and_index() {
    let temp_dir = TempDir::new().unwrap();
    let writer = ClipWriter::new(temp_dir.path().to_path_buf());

    let samples: Vec<f32> = vec![0.0; 1024];
    let first = writer.write_clip(&samples, 22_050, "dawn-chorus", 0).unwrap();
    let second = writer.write_clip(&samples, 22_050, "dawn-chorus", 1).unwrap();
    let other = writer.write_clip(&samples, 22_050, "dusk-chorus", 0).unwrap();

    assert_eq!(first.file_name().unwrap(), "dawn-chorus_d0.wav");
    assert_eq!(second.file_name().unwrap(), "dawn-chorus_d1.wav");
    assert_eq!(other.file_name().unwrap(), "dusk-chorus_d0.wav");
}

#[test]
fn test_write_clip_sanitizes_source_stem() {
    let temp_dir = TempDir::new().unwrap();
    let writer = ClipWriter::new(temp_dir.path().to_path_buf());

    let samples: Vec<f32> = vec![0.0; 1024];
    let path = writer.write_clip(&samples, 22_050, "rec/with:odd*chars", 0).unwrap();

    let name = path.file_name().unwrap().to_str().unwrap();
    assert!(!name.contains('/'));
    assert!(!name.contains(':'));
    assert!(!name.contains('*'));
}

#[test]
fn test_written_wav_is_valid() {
    let temp_dir = TempDir::new().unwrap();
    let writer = ClipWriter::new(temp_dir.path().to_path_buf());

    let samples: Vec<f32> = (0..22_050).map(|i| (i as f32 * 0.01).sin()).collect();
    let path = writer.write_clip(&samples, 22_050, "rec", 0).unwrap();

    let reader = hound::WavReader::open(&path).unwrap();
    let spec = reader.spec();
    assert_eq!(spec.sample_rate, 22_050);
    assert_eq!(spec.channels, 1);
    assert_eq!(spec.bits_per_sample, 16);
    assert_eq!(reader.len(), 22_050);
}
