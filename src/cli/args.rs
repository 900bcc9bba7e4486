//! CLI argument definitions.

use crate::spectrogram::NormPolicy;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Sound event detection and segmentation for field recordings.
#[derive(Debug, Parser)]
#[command(name = "vocseg")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Input files or directories to process.
    pub inputs: Vec<PathBuf>,

    /// Common options for processing.
    #[command(flatten)]
    pub process: ProcessArgs,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    Config {
        /// Configuration action to perform.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommand actions.
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ConfigAction {
    /// Create default configuration file.
    Init,
    /// Display current configuration.
    Show,
    /// Print configuration file path.
    Path,
}

/// Arguments for the processing command.
#[derive(Debug, Args)]
#[allow(clippy::struct_excessive_bools)]
pub struct ProcessArgs {
    /// STFT frame length in samples.
    #[arg(long, value_parser = parse_frame_len, env = "VOCSEG_FRAME_LEN")]
    pub frame_len: Option<usize>,

    /// Gaussian sigma for detection smoothing.
    #[arg(short = 'b', long, value_parser = parse_sigma, env = "VOCSEG_BLUR")]
    pub blur: Option<f32>,

    /// Detection pickup threshold (0.0-1.0).
    #[arg(short = 'p', long, value_parser = parse_pickup, env = "VOCSEG_PICKUP")]
    pub pickup: Option<f32>,

    /// Border noise threshold row (frequency-bin index).
    #[arg(long, env = "VOCSEG_BORDER_ROW")]
    pub border_row: Option<usize>,

    /// Gaussian sigma for segmentation smoothing.
    #[arg(long, value_parser = parse_sigma, env = "VOCSEG_SEG_BLUR")]
    pub seg_blur: Option<f32>,

    /// Segmentation pickup threshold (non-negative).
    #[arg(long, value_parser = parse_non_negative, env = "VOCSEG_SEG_PICKUP")]
    pub seg_pickup: Option<f32>,

    /// Minimum clip duration in seconds; shorter clips are widened.
    #[arg(long, value_parser = parse_positive_secs, env = "VOCSEG_MIN_DURATION")]
    pub min_duration: Option<f64>,

    /// Output directory for clips (default: ./clips).
    #[arg(short, long, env = "VOCSEG_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Normalization policy feeding the detector.
    #[arg(long, value_enum)]
    pub norm: Option<NormPolicy>,

    /// Apply the median despeckle pass after thresholding.
    #[arg(long)]
    pub despeckle: bool,

    /// Export the spectrogram as a grayscale PNG.
    #[arg(long)]
    pub save_spectrogram: bool,

    /// Export the raw detection mask as a grayscale PNG.
    #[arg(long)]
    pub save_mask: bool,

    /// Export the border-filtered mask as a grayscale PNG.
    #[arg(long)]
    pub save_cleaned: bool,

    /// Per-file processing timeout in seconds.
    #[arg(long, value_parser = parse_positive_secs, env = "VOCSEG_TIMEOUT")]
    pub timeout: Option<f64>,

    /// Reprocess files even if clips exist.
    #[arg(long)]
    pub force: bool,

    /// Stop on first error.
    #[arg(long)]
    pub fail_fast: bool,

    /// Suppress progress output.
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity (-v: debug, -vv: trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Parse and validate a frame length value.
fn parse_frame_len(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid integer"))?;

    if value == 0 {
        return Err("frame length must be positive".to_string());
    }

    Ok(value)
}

/// Parse and validate a Gaussian sigma value.
fn parse_sigma(s: &str) -> Result<f32, String> {
    let value: f32 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;

    if !value.is_finite() || value <= 0.0 {
        return Err(format!("blur must be positive, got {value}"));
    }

    Ok(value)
}

/// Parse and validate a pickup threshold value.
fn parse_pickup(s: &str) -> Result<f32, String> {
    let value: f32 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;

    if !(0.0..=1.0).contains(&value) {
        return Err(format!("pickup must be between 0.0 and 1.0, got {value}"));
    }

    Ok(value)
}

/// Parse and validate a non-negative threshold value.
fn parse_non_negative(s: &str) -> Result<f32, String> {
    let value: f32 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;

    if !value.is_finite() || value < 0.0 {
        return Err(format!("value must be non-negative, got {value}"));
    }

    Ok(value)
}

/// Parse and validate a positive duration in seconds.
fn parse_positive_secs(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;

    if !value.is_finite() || value <= 0.0 {
        return Err(format!("duration must be positive, got {value}"));
    }

    Ok(value)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pickup_valid() {
        assert_eq!(parse_pickup("0.65").ok(), Some(0.65));
        assert_eq!(parse_pickup("0.0").ok(), Some(0.0));
        assert_eq!(parse_pickup("1.0").ok(), Some(1.0));
    }

    #[test]
    fn test_parse_pickup_invalid() {
        assert!(parse_pickup("1.5").is_err());
        assert!(parse_pickup("-0.1").is_err());
        assert!(parse_pickup("abc").is_err());
    }

    #[test]
    fn test_parse_sigma_rejects_nonpositive() {
        assert!(parse_sigma("0").is_err());
        assert!(parse_sigma("-3").is_err());
        assert_eq!(parse_sigma("3").ok(), Some(3.0));
    }

    #[test]
    fn test_parse_frame_len_rejects_zero() {
        assert!(parse_frame_len("0").is_err());
        assert_eq!(parse_frame_len("1024").ok(), Some(1024));
    }

    #[test]
    fn test_cli_parse_simple() {
        let cli = Cli::try_parse_from(["vocseg", "recording.wav"]);
        assert!(cli.is_ok());
        let cli = cli.unwrap();
        assert_eq!(cli.inputs.len(), 1);
    }

    #[test]
    fn test_cli_parse_with_options() {
        let cli = Cli::try_parse_from([
            "vocseg",
            "recording.wav",
            "-p",
            "0.5",
            "-b",
            "4.0",
            "--border-row",
            "40",
            "-q",
        ]);
        assert!(cli.is_ok());
        let cli = cli.unwrap();
        assert_eq!(cli.process.pickup, Some(0.5));
        assert_eq!(cli.process.blur, Some(4.0));
        assert_eq!(cli.process.border_row, Some(40));
        assert!(cli.process.quiet);
    }

    #[test]
    fn test_cli_parse_norm_policy() {
        let cli = Cli::try_parse_from(["vocseg", "rec.wav", "--norm", "global"]);
        assert!(cli.is_ok());
        assert_eq!(cli.unwrap().process.norm, Some(NormPolicy::Global));
    }

    #[test]
    fn test_cli_parse_config_subcommand() {
        let cli = Cli::try_parse_from(["vocseg", "config", "show"]);
        assert!(cli.is_ok());
    }

    #[test]
    fn test_cli_rejects_invalid_pickup() {
        let cli = Cli::try_parse_from(["vocseg", "rec.wav", "-p", "2.0"]);
        assert!(cli.is_err());
    }
}
