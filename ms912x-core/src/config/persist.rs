//! Binary configuration blobs
//!
//! Hosts that keep the adapter configuration alongside other settings
//! store it postcard-encoded.

use super::types::{ConfigError, DeviceConfig};

/// Upper bound on an encoded [`DeviceConfig`]
pub const MAX_CONFIG_SIZE: usize = 32;

impl DeviceConfig {
    /// Decode and validate a stored configuration
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: DeviceConfig = postcard::from_bytes(bytes).map_err(|_| ConfigError::Deserialize)?;
        config.validate()?;
        Ok(config)
    }

    /// Encode into `buf`, returning the used prefix
    pub fn to_slice<'b>(&self, buf: &'b mut [u8]) -> Result<&'b mut [u8], ConfigError> {
        postcard::to_slice(self, buf).map_err(|_| ConfigError::Serialize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PipelineConfig, RetryPolicy};
    use crate::mode::ModeKey;

    #[test]
    fn test_stored_config_is_validated() {
        let config = DeviceConfig {
            baseline_mode: ModeKey::new(1024, 768, 61),
            ..DeviceConfig::default()
        };
        let mut buf = [0u8; MAX_CONFIG_SIZE];
        let used = config.to_slice(&mut buf).unwrap().len();
        assert_eq!(
            DeviceConfig::from_bytes(&buf[..used]),
            Err(ConfigError::UnknownBaselineMode)
        );
    }

    #[test]
    fn test_discard_policy_survives_storage() {
        let config = DeviceConfig {
            pipeline: PipelineConfig {
                retry: RetryPolicy::Discard,
                ..PipelineConfig::default()
            },
            ..DeviceConfig::default()
        };
        let mut buf = [0u8; MAX_CONFIG_SIZE];
        let used = config.to_slice(&mut buf).unwrap().len();
        assert_eq!(DeviceConfig::from_bytes(&buf[..used]), Ok(config));
    }

    #[test]
    fn test_truncated_blob() {
        assert_eq!(DeviceConfig::from_bytes(&[0x01]), Err(ConfigError::Deserialize));
    }
}
