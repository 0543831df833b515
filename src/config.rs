//! Runtime configuration for the caller.

use std::time::Duration;

use crate::error::TendrilError;

/// Scheduling and endpoint configuration.
///
/// Mutable at runtime through [`crate::caller::CallerHandle::update_config`];
/// a change to the base interval re-arms a pending timer immediately instead
/// of waiting out the old delay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerConfig {
    /// Base interval between calls, before seasonal scaling and jitter.
    pub base_interval: Duration,
    /// Jitter amplitude as a percentage of the seasonal interval (0-100).
    pub jitter_percent: u8,
    /// Share of calls routed over the SSE transport (0-100).
    pub sse_percent: u8,
    /// MCP endpoint for plain HTTP calls.
    pub server_url: String,
    /// SSE endpoint for streaming calls.
    pub sse_url: String,
}

impl Default for CallerConfig {
    fn default() -> Self {
        Self {
            base_interval: Duration::from_secs(30),
            jitter_percent: 30,
            sse_percent: 25,
            server_url: "http://localhost:3000/mcp".to_string(),
            sse_url: "http://localhost:3000/sse".to_string(),
        }
    }
}

impl CallerConfig {
    /// Check value ranges: positive base interval, percentages within 0-100.
    pub fn validate(&self) -> Result<(), TendrilError> {
        if self.base_interval.is_zero() {
            return Err(TendrilError::InvalidConfig(
                "base interval must be positive".to_string(),
            ));
        }
        if self.jitter_percent > 100 {
            return Err(TendrilError::InvalidConfig(format!(
                "jitter percent {} out of range 0-100",
                self.jitter_percent
            )));
        }
        if self.sse_percent > 100 {
            return Err(TendrilError::InvalidConfig(format!(
                "SSE percent {} out of range 0-100",
                self.sse_percent
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(CallerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_interval_rejected() {
        let config = CallerConfig {
            base_interval: Duration::ZERO,
            ..CallerConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(TendrilError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_out_of_range_percentages_rejected() {
        let config = CallerConfig {
            jitter_percent: 101,
            ..CallerConfig::default()
        };
        assert!(config.validate().is_err());

        let config = CallerConfig {
            sse_percent: 200,
            ..CallerConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
