//! Batch coordination for file processing.

use crate::constants::AUDIO_EXTENSIONS;
use crate::error::Result;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Result of checking whether a file should be processed.
#[derive(Debug)]
pub enum ProcessCheck {
    /// File should be processed.
    Process,
    /// Skip - clips for this source already exist.
    SkipExists,
}

/// Source identifier used in clip filenames and debug exports.
///
/// Non-UTF-8 stems degrade to lossy replacement characters rather than
/// failing the file.
#[must_use]
pub fn source_stem(input: &Path) -> String {
    input
        .file_stem()
        .map_or_else(|| "output".to_string(), |s| s.to_string_lossy().into_owned())
}

/// Check if a file should be processed.
///
/// A source whose first clip already exists in the output directory is
/// skipped unless `force` is set.
pub fn should_process(input: &Path, clip_dir: &Path, force: bool) -> ProcessCheck {
    if force {
        return ProcessCheck::Process;
    }

    let stem = source_stem(input);
    if clip_dir.join(format!("{stem}_d0.wav")).exists() {
        return ProcessCheck::SkipExists;
    }
    ProcessCheck::Process
}

/// Collect input files from paths (files and directories).
pub fn collect_input_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            if is_audio_file(path) {
                files.push(path.clone());
            }
        } else if path.is_dir() {
            collect_audio_files_recursive(path, &mut files)?;
        } else {
            warn!("Skipping non-existent path: {}", path.display());
        }
    }

    files.sort();
    Ok(files)
}

/// Recursively collect audio files from a directory.
fn collect_audio_files_recursive(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            collect_audio_files_recursive(&path, files)?;
        } else if is_audio_file(&path) {
            files.push(path);
        }
    }
    Ok(())
}

/// Whether a path looks like a supported audio file.
fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            let ext = ext.to_ascii_lowercase();
            AUDIO_EXTENSIONS.contains(&ext.as_str())
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_is_audio_file_by_extension() {
        assert!(is_audio_file(Path::new("rec.wav")));
        assert!(is_audio_file(Path::new("rec.WAV")));
        assert!(is_audio_file(Path::new("rec.flac")));
        assert!(!is_audio_file(Path::new("rec.txt")));
        assert!(!is_audio_file(Path::new("rec")));
    }

    #[test]
    fn test_source_stem() {
        assert_eq!(source_stem(Path::new("/data/dawn-chorus.wav")), "dawn-chorus");
        assert_eq!(source_stem(Path::new("a.b.wav")), "a.b");
    }

    #[test]
    fn test_collect_input_files_recurses_directories() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("sub");
        std::fs::create_dir(&sub).unwrap();
        std::fs::write(dir.path().join("a.wav"), b"x").unwrap();
        std::fs::write(sub.join("b.flac"), b"x").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"x").unwrap();

        let files = collect_input_files(&[dir.path().to_path_buf()]).unwrap();
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn test_should_process_skips_when_clip_exists() {
        let dir = tempfile::tempdir().unwrap();
        let input = Path::new("/data/rec.wav");
        std::fs::write(dir.path().join("rec_d0.wav"), b"x").unwrap();

        assert!(matches!(
            should_process(input, dir.path(), false),
            ProcessCheck::SkipExists
        ));
        assert!(matches!(
            should_process(input, dir.path(), true),
            ProcessCheck::Process
        ));
    }

    #[test]
    fn test_should_process_fresh_source() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            should_process(Path::new("/data/rec.wav"), dir.path(), false),
            ProcessCheck::Process
        ));
    }
}
