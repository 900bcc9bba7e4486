//! Cooperative cancellation and per-run deadlines.
//!
//! A [`RunToken`] is checked between pipeline stages so a long spectrogram
//! computation can be abandoned without affecting other files in the batch.

use crate::error::{Error, Result};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Shared cancellation flag plus an optional per-run deadline.
#[derive(Debug, Clone)]
pub struct RunToken {
    cancelled: Arc<AtomicBool>,
    started: Instant,
    deadline: Option<Duration>,
}

impl RunToken {
    /// Create a token with no deadline.
    #[must_use]
    pub fn new(cancelled: Arc<AtomicBool>) -> Self {
        Self {
            cancelled,
            started: Instant::now(),
            deadline: None,
        }
    }

    /// Create a token that also trips after `timeout_secs` seconds.
    #[must_use]
    pub fn with_timeout(cancelled: Arc<AtomicBool>, timeout_secs: f64) -> Self {
        Self {
            cancelled,
            started: Instant::now(),
            deadline: Some(Duration::from_secs_f64(timeout_secs)),
        }
    }

    /// Restart the deadline clock for a new file.
    #[must_use]
    pub fn renew(&self) -> Self {
        Self {
            cancelled: Arc::clone(&self.cancelled),
            started: Instant::now(),
            deadline: self.deadline,
        }
    }

    /// Fail with `Cancelled` or `Timeout` if this run should stop.
    pub fn check(&self) -> Result<()> {
        if self.cancelled.load(Ordering::Relaxed) {
            return Err(Error::Cancelled);
        }
        if let Some(deadline) = self.deadline {
            let elapsed = self.started.elapsed();
            if elapsed > deadline {
                return Err(Error::Timeout {
                    seconds: elapsed.as_secs_f64(),
                });
            }
        }
        Ok(())
    }

    /// Whether the shared cancellation flag has been tripped.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

impl Default for RunToken {
    fn default() -> Self {
        Self::new(Arc::new(AtomicBool::new(false)))
    }
}
