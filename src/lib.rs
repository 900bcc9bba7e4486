//! Vocseg - sound event detection and segmentation for field recordings.
//!
//! This crate turns long recordings into short candidate clips via a
//! spectrogram-based detection pipeline: STFT, smoothing-and-threshold
//! detection, border noise suppression, run-length segmentation, and
//! sample-accurate clip extraction.

#![warn(missing_docs)]

pub mod audio;
pub mod cancel;
pub mod cli;
pub mod clipper;
pub mod config;
pub mod constants;
pub mod detection;
pub mod error;
pub mod pipeline;
pub mod progress;
pub mod spectrogram;

use cancel::RunToken;
use clap::Parser;
use cli::{Cli, Command, ProcessArgs};
use config::{Config, config_file_path, load_default_config, save_default_config, validate_config};
use pipeline::{ExportOptions, ProcessCheck, collect_input_files, process_file, should_process};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{error, info, warn};

pub use error::{Error, Result};

/// Main entry point for the vocseg CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.process.verbose, cli.process.quiet);

    // Handle subcommands
    if let Some(command) = cli.command {
        return handle_command(command);
    }

    if cli.inputs.is_empty() {
        return Err(Error::NoValidAudioFiles);
    }

    // Load configuration and fold in CLI overrides
    let mut config = load_default_config()?;
    apply_overrides(&mut config, &cli.process);
    validate_config(&config)?;

    process_inputs(&cli.inputs, &cli.process, &config)
}

/// Process input files with the given options.
fn process_inputs(inputs: &[PathBuf], args: &ProcessArgs, config: &Config) -> Result<()> {
    use std::time::Instant;

    let total_start = Instant::now();

    let files = collect_input_files(inputs)?;
    if files.is_empty() {
        return Err(Error::NoValidAudioFiles);
    }

    info!("Found {} audio file(s) to process", files.len());

    let export = ExportOptions {
        spectrogram: args.save_spectrogram,
        mask: args.save_mask,
        cleaned: args.save_cleaned,
    };

    // Ctrl+C trips the shared cancellation flag; the pipeline notices it
    // between stages
    let cancelled = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&cancelled);
    if let Err(e) = ctrlc::set_handler(move || {
        handler_flag.store(true, Ordering::Relaxed);
    }) {
        warn!("Failed to install Ctrl+C handler: {e}");
    }

    let token = config.run.timeout_secs.map_or_else(
        || RunToken::new(Arc::clone(&cancelled)),
        |timeout| RunToken::with_timeout(Arc::clone(&cancelled), timeout),
    );

    let progress_enabled = !args.quiet;
    let file_progress = progress::create_file_progress(files.len(), progress_enabled);

    let mut processed = 0usize;
    let mut skipped = 0usize;
    let mut errors = 0usize;
    let mut total_segments = 0usize;
    let mut total_clips = 0usize;

    for file in &files {
        if cancelled.load(Ordering::Relaxed) {
            warn!("Cancelled; {} file(s) left unprocessed", files.len() - processed - skipped - errors);
            break;
        }

        match should_process(file, &config.clips.output_dir, args.force) {
            ProcessCheck::SkipExists => {
                info!("Skipping (clips exist): {}", file.display());
                skipped += 1;
                progress::inc_progress(file_progress.as_ref());
                continue;
            }
            ProcessCheck::Process => {}
        }

        // Each file gets a fresh deadline; independent runs share no state
        match process_file(file, config, export, &token.renew()) {
            Ok(result) => {
                processed += 1;
                total_segments += result.segments;
                total_clips += result.clips;
            }
            Err(e) => {
                error!("Failed to process {}: {}", file.display(), e);
                errors += 1;
                if args.fail_fast {
                    progress::finish_progress(file_progress, "Failed");
                    return Err(e);
                }
            }
        }
        progress::inc_progress(file_progress.as_ref());
    }

    progress::finish_progress(file_progress, "Complete");

    let total_duration = total_start.elapsed().as_secs_f64();
    info!(
        "Complete: {} processed, {} skipped, {} errors, {} segment(s), {} clip(s) in {:.2}s",
        processed, skipped, errors, total_segments, total_clips, total_duration
    );

    if errors > 0 && !args.fail_fast {
        warn!("{} file(s) had errors", errors);
    }

    Ok(())
}

/// Fold CLI overrides into the loaded configuration.
fn apply_overrides(config: &mut Config, args: &ProcessArgs) {
    if let Some(frame_len) = args.frame_len {
        config.detection.frame_len = frame_len;
    }
    if let Some(blur) = args.blur {
        config.detection.blur = blur;
    }
    if let Some(pickup) = args.pickup {
        config.detection.pickup = pickup;
    }
    if let Some(border_row) = args.border_row {
        config.detection.border_row = border_row;
    }
    if let Some(norm) = args.norm {
        config.detection.norm = norm;
    }
    if args.despeckle {
        config.detection.despeckle = true;
    }
    if let Some(blur) = args.seg_blur {
        config.segmentation.blur = blur;
    }
    if let Some(pickup) = args.seg_pickup {
        config.segmentation.pickup = pickup;
    }
    if let Some(min_duration) = args.min_duration {
        config.clips.min_duration = Some(min_duration);
    }
    if let Some(ref output_dir) = args.output_dir {
        config.clips.output_dir.clone_from(output_dir);
    }
    if let Some(timeout) = args.timeout {
        config.run.timeout_secs = Some(timeout);
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter_str = if quiet {
        "warn"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_str));

    fmt().with_env_filter(filter).init();
}

fn handle_command(command: Command) -> Result<()> {
    use cli::ConfigAction;

    match command {
        Command::Config { action } => match action {
            ConfigAction::Init => {
                let path = config_file_path()?;
                if path.exists() {
                    println!("Configuration file already exists: {}", path.display());
                } else {
                    let config = Config::default();
                    let saved_path = save_default_config(&config)?;
                    println!("Created configuration file: {}", saved_path.display());
                }
                Ok(())
            }
            ConfigAction::Show => {
                let config = load_default_config()?;
                println!("{config:#?}");
                Ok(())
            }
            ConfigAction::Path => {
                let path = config_file_path()?;
                println!("{}", path.display());
                Ok(())
            }
        },
    }
}
