//! Runtime configuration for the threat analyzer.

/// Tracked devices not seen for this long are marked departed.
pub const DEVICE_TIMEOUT_MS: u32 = 60_000;

/// Minimum spacing between heartbeat pulses.
pub const HEARTBEAT_INTERVAL_MS: u32 = 10_000;

/// Default tracker slot count.
pub const MAX_TRACKED_DEVICES: usize = 32;

/// Analyzer settings. Replaceable at runtime via `ThreatAnalyzer::set_config`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyzerConfig {
    /// Staleness window for the device tracker (ms).
    pub device_timeout_ms: u32,
    /// Heartbeat interval (ms).
    pub heartbeat_interval_ms: u32,
    /// Whether WiFi frames are analyzed
    pub wifi_enabled: bool,
    /// Whether BLE advertisements are analyzed
    pub ble_enabled: bool,
}

impl AnalyzerConfig {
    pub const fn new() -> Self {
        Self {
            device_timeout_ms: DEVICE_TIMEOUT_MS,
            heartbeat_interval_ms: HEARTBEAT_INTERVAL_MS,
            wifi_enabled: true,
            ble_enabled: true,
        }
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = AnalyzerConfig::default();
        assert_eq!(config.device_timeout_ms, 60_000);
        assert_eq!(config.heartbeat_interval_ms, 10_000);
        assert!(config.wifi_enabled);
        assert!(config.ble_enabled);
        assert_eq!(config, AnalyzerConfig::new());
    }
}
