//! Configuration types
//!
//! Board-agnostic configuration structures stored as postcard binary data.

pub mod types;

pub use types::*;

/// Configuration encoding errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Bytes are not a valid configuration
    Deserialize,
    /// Output buffer too small
    Serialize,
    /// Configuration was written by another format version
    VersionMismatch(u8),
}

#[cfg(feature = "serde")]
impl DashboardConfig {
    /// Decode a configuration and check its version
    pub fn from_postcard(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: DashboardConfig =
            postcard::from_bytes(bytes).map_err(|_| ConfigError::Deserialize)?;
        if config.version != CONFIG_VERSION {
            return Err(ConfigError::VersionMismatch(config.version));
        }
        Ok(config)
    }

    /// Encode into `buf`, returning the used prefix
    pub fn to_postcard<'b>(&self, buf: &'b mut [u8]) -> Result<&'b mut [u8], ConfigError> {
        postcard::to_slice(self, buf).map_err(|_| ConfigError::Serialize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_dashboard_geometry() {
        let config = DashboardConfig::default();
        assert_eq!(config.version, CONFIG_VERSION);
        assert_eq!(config.layout.max_width, 360);
        assert_eq!(config.layout.content_bottom, 440);
        assert_eq!(config.font.cache_size, 30);
        assert_eq!(config.panel.busy_initial_ms, 100);
        assert_eq!(config.panel.busy_max_ms, 3000);
        assert_eq!(config.panel.busy_deadline_ms, None);
        assert_eq!(config.clock.utc_offset_secs(), 8 * 3600);
    }

    #[test]
    fn test_negative_utc_offset() {
        let clock = ClockConfig {
            utc_offset_hours: -5,
        };
        assert_eq!(clock.utc_offset_secs(), -18000);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_postcard_encoding() {
        let mut config = DashboardConfig::default();
        config.panel.busy_deadline_ms = Some(60_000);
        config.clock.utc_offset_hours = -3;

        let mut buf = [0u8; 128];
        let bytes = config.to_postcard(&mut buf).unwrap();
        assert_eq!(DashboardConfig::from_postcard(bytes), Ok(config));

        let mut tiny = [0u8; 4];
        assert_eq!(
            config.to_postcard(&mut tiny).err(),
            Some(ConfigError::Serialize)
        );
        assert_eq!(
            DashboardConfig::from_postcard(&[]),
            Err(ConfigError::Deserialize)
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_version_mismatch_rejected() {
        let config = DashboardConfig {
            version: 7,
            ..DashboardConfig::default()
        };
        let mut buf = [0u8; 128];
        let bytes = config.to_postcard(&mut buf).unwrap();
        assert_eq!(
            DashboardConfig::from_postcard(bytes),
            Err(ConfigError::VersionMismatch(7))
        );
    }
}
