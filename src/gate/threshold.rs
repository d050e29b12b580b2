//! Thresholds for smile gating.
//!
//! Fixed for the lifetime of one session. Changing them never
//! requires touching the state machine.

use crate::capture::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Smile gate thresholds and polling cadence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// A frame qualifies when its happiness is strictly above this.
    pub smile_probability_threshold: f64,
    /// Credit needed to trigger a capture.
    pub required_consecutive_frames: u32,
    /// Delay between classifier ticks in milliseconds.
    pub poll_interval_ms: u64,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            smile_probability_threshold: 0.8,
            required_consecutive_frames: 5,
            poll_interval_ms: 100,
        }
    }
}

impl GateConfig {
    /// Creates a config with the given threshold and run length.
    pub fn new(smile_probability_threshold: f64, required_consecutive_frames: u32) -> Self {
        Self {
            smile_probability_threshold,
            required_consecutive_frames,
            ..Default::default()
        }
    }

    /// Returns the poll interval as a [`Duration`].
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// True when `happiness` counts as a smiling frame.
    #[inline]
    pub fn qualifies(&self, happiness: f64) -> bool {
        happiness > self.smile_probability_threshold
    }

    /// Validates the thresholds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let threshold = self.smile_probability_threshold;
        if !(0.0..1.0).contains(&threshold) {
            return Err(ConfigError::InvalidThreshold(threshold));
        }
        if self.required_consecutive_frames == 0 {
            return Err(ConfigError::InvalidFrameCount);
        }
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::InvalidPollInterval);
        }
        Ok(())
    }
}
