//! Configuration type definitions

use ms912x_protocol::frame::COLUMN_UNIT;
use ms912x_protocol::{PixelFormat, FRAME_HEADER_LEN};

use crate::mode::{find_mode, ModeKey, MODE_TABLE};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Largest surface a transfer slot can hold, per axis
pub const MAX_SURFACE_DIM: u16 = 2048;

/// Smallest configurable slot surface, per axis
pub const MIN_SURFACE_DIM: u16 = 16;

/// Consecutive failed frame transfers before the device is declared lost
pub const DEFAULT_FAILURE_LIMIT: u8 = 8;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Baseline mode is not in the mode table
    UnknownBaselineMode,
    /// Failure limit must be at least 1
    InvalidFailureLimit,
    /// Slot surface outside 16..=2048 or width not a multiple of 16
    InvalidCapacity,
    /// Serialization failed
    Serialize,
    /// Deserialization failed
    Deserialize,
}

/// What happens to the rectangle of a failed frame transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RetryPolicy {
    /// Fold it back into the pending damage so the next update resends it
    #[default]
    Remerge,
    /// Drop it; the area stays stale until it is damaged again
    Discard,
}

/// Transfer pipeline configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PipelineConfig {
    /// Consecutive failed transfers before the device is declared lost
    pub failure_limit: u8,
    /// Handling of failed transfer rectangles
    pub retry: RetryPolicy,
    /// Widest mode a slot can hold (multiple of 16)
    pub max_width: u16,
    /// Tallest mode a slot can hold
    pub max_height: u16,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            failure_limit: DEFAULT_FAILURE_LIMIT,
            retry: RetryPolicy::Remerge,
            max_width: MAX_SURFACE_DIM,
            max_height: MAX_SURFACE_DIM,
        }
    }
}

impl PipelineConfig {
    /// Bytes per transfer buffer: one header plus a full slot surface
    pub fn slot_capacity(&self) -> usize {
        FRAME_HEADER_LEN
            + self.max_width as usize * self.max_height as usize * PixelFormat::Uyvy.bytes_per_pixel()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.failure_limit == 0 {
            return Err(ConfigError::InvalidFailureLimit);
        }
        let dims = MIN_SURFACE_DIM..=MAX_SURFACE_DIM;
        if !dims.contains(&self.max_width)
            || !dims.contains(&self.max_height)
            || self.max_width % COLUMN_UNIT != 0
        {
            return Err(ConfigError::InvalidCapacity);
        }
        Ok(())
    }
}

/// Device façade configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DeviceConfig {
    /// Mode programmed once at open, before anything else
    pub baseline_mode: ModeKey,
    /// Transfer pipeline settings
    pub pipeline: PipelineConfig,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            baseline_mode: MODE_TABLE[0].key(),
            pipeline: PipelineConfig::default(),
        }
    }
}

impl DeviceConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ModeKey { width, height, hz } = self.baseline_mode;
        if find_mode(width, height, hz).is_none() {
            return Err(ConfigError::UnknownBaselineMode);
        }
        self.pipeline.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = DeviceConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.baseline_mode, ModeKey::new(800, 600, 60));
        assert_eq!(config.pipeline.retry, RetryPolicy::Remerge);
    }

    #[test]
    fn test_unknown_baseline_rejected() {
        let config = DeviceConfig {
            baseline_mode: ModeKey::new(999, 999, 60),
            ..DeviceConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::UnknownBaselineMode));
    }

    #[test]
    fn test_zero_failure_limit_rejected() {
        let config = PipelineConfig {
            failure_limit: 0,
            ..PipelineConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidFailureLimit));
    }

    #[test]
    fn test_capacity_bounds() {
        let too_big = PipelineConfig {
            max_width: 4096,
            ..PipelineConfig::default()
        };
        assert_eq!(too_big.validate(), Err(ConfigError::InvalidCapacity));

        let unaligned = PipelineConfig {
            max_width: 1366,
            ..PipelineConfig::default()
        };
        assert_eq!(unaligned.validate(), Err(ConfigError::InvalidCapacity));

        let small = PipelineConfig {
            max_width: 1024,
            max_height: 768,
            ..PipelineConfig::default()
        };
        assert_eq!(small.validate(), Ok(()));
        assert_eq!(small.slot_capacity(), 8 + 1024 * 768 * 2);
    }
}
