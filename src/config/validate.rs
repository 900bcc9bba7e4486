//! Configuration validation.

use crate::config::Config;
use crate::constants::pickup;
use crate::error::{Error, Result};

/// Validate the entire configuration.
///
/// Every numeric parameter is checked at the boundary so a bad
/// configuration fails before any audio is decoded.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_detection(config)?;
    validate_segmentation(config)?;
    validate_clips(config)?;
    validate_run(config)?;
    Ok(())
}

fn validate_detection(config: &Config) -> Result<()> {
    let detection = &config.detection;

    if detection.frame_len == 0 {
        return Err(Error::ConfigValidation {
            message: "detection.frame_len must be positive".to_string(),
        });
    }

    if !detection.blur.is_finite() || detection.blur <= 0.0 {
        return Err(Error::ConfigValidation {
            message: format!("detection.blur must be positive, got {}", detection.blur),
        });
    }

    if !(pickup::MIN..=pickup::MAX).contains(&detection.pickup) {
        return Err(Error::ConfigValidation {
            message: format!(
                "detection.pickup must be between {} and {}, got {}",
                pickup::MIN,
                pickup::MAX,
                detection.pickup
            ),
        });
    }

    Ok(())
}

fn validate_segmentation(config: &Config) -> Result<()> {
    let segmentation = &config.segmentation;

    if !segmentation.blur.is_finite() || segmentation.blur <= 0.0 {
        return Err(Error::ConfigValidation {
            message: format!(
                "segmentation.blur must be positive, got {}",
                segmentation.blur
            ),
        });
    }

    if !segmentation.pickup.is_finite() || segmentation.pickup < 0.0 {
        return Err(Error::ConfigValidation {
            message: format!(
                "segmentation.pickup must be non-negative, got {}",
                segmentation.pickup
            ),
        });
    }

    Ok(())
}

fn validate_clips(config: &Config) -> Result<()> {
    if let Some(min_duration) = config.clips.min_duration
        && (!min_duration.is_finite() || min_duration <= 0.0)
    {
        return Err(Error::ConfigValidation {
            message: format!("clips.min_duration must be positive, got {min_duration}"),
        });
    }
    Ok(())
}

fn validate_run(config: &Config) -> Result<()> {
    if let Some(timeout) = config.run.timeout_secs
        && (!timeout.is_finite() || timeout <= 0.0)
    {
        return Err(Error::ConfigValidation {
            message: format!("run.timeout_secs must be positive, got {timeout}"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_valid_config() {
        let config = Config::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_zero_frame_len() {
        let mut config = Config::default();
        config.detection.frame_len = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_invalid_detection_pickup() {
        let mut config = Config::default();
        config.detection.pickup = 1.5;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_nonpositive_detection_blur() {
        let mut config = Config::default();
        config.detection.blur = 0.0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_negative_segmentation_pickup() {
        let mut config = Config::default();
        config.segmentation.pickup = -0.5;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_nonpositive_min_duration() {
        let mut config = Config::default();
        config.clips.min_duration = Some(0.0);
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_nonpositive_timeout() {
        let mut config = Config::default();
        config.run.timeout_secs = Some(-1.0);
        assert!(validate_config(&config).is_err());
    }
}
