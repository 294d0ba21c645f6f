/// Threat analyzer: the single consumer of scan events.
///
/// Owns both detector registries and the device tracker. Each scan event is
/// scored, classified, recorded against the tracker, and turned into at most
/// one `ThreatEvent`. `tick` ages the tracker and produces the heartbeat pulse.
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::Channel;
use log::{debug, info, trace};

use crate::classify::{ble_alert_level, ble_category, wifi_alert_level, wifi_category};
use crate::config::{AnalyzerConfig, MAX_TRACKED_DEVICES};
use crate::detector::{DetectorFlag, DetectorRegistry};
use crate::event::{
    oui, AlertLevel, BleDevice, MacFmt, RadioType, ScanEvent, ThreatEvent, WifiFrame,
};
use crate::score::score;
use crate::signatures::surveillance_vendor;
use crate::tracker::{DeviceState, DeviceTracker};

/// Downstream consumer of threat events (telemetry, display, audio).
pub trait ThreatSink {
    fn publish(&mut self, threat: &ThreatEvent);
}

impl<F: FnMut(&ThreatEvent)> ThreatSink for F {
    fn publish(&mut self, threat: &ThreatEvent) {
        self(threat)
    }
}

pub struct ThreatAnalyzer<const N: usize = MAX_TRACKED_DEVICES> {
    config: AnalyzerConfig,
    wifi_detectors: DetectorRegistry<WifiFrame>,
    ble_detectors: DetectorRegistry<BleDevice>,
    tracker: DeviceTracker<N>,
    last_heartbeat_ms: u32,
}

impl<const N: usize> ThreatAnalyzer<N> {
    /// Analyzer with the built-in detector tables.
    pub fn new(config: AnalyzerConfig) -> Self {
        Self::with_registries(config, DetectorRegistry::wifi(), DetectorRegistry::ble())
    }

    pub fn with_registries(
        config: AnalyzerConfig,
        wifi_detectors: DetectorRegistry<WifiFrame>,
        ble_detectors: DetectorRegistry<BleDevice>,
    ) -> Self {
        Self {
            config,
            wifi_detectors,
            ble_detectors,
            tracker: DeviceTracker::new(config.device_timeout_ms),
            last_heartbeat_ms: 0,
        }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Replace the configuration. Tracked devices are kept.
    pub fn set_config(&mut self, config: AnalyzerConfig) {
        self.config = config;
        self.tracker.set_timeout_ms(config.device_timeout_ms);
    }

    pub fn tracker(&self) -> &DeviceTracker<N> {
        &self.tracker
    }

    pub fn analyze_wifi_frame(&mut self, frame: &WifiFrame, now_ms: u32) -> Option<ThreatEvent> {
        if !self.config.wifi_enabled {
            return None;
        }

        let s = score(&self.wifi_detectors, frame, frame.rssi);
        if s.matched.is_empty() {
            return None;
        }
        trace!(
            "{} from {}: flags={:#05x}",
            frame.frame_type.as_str(),
            MacFmt(&frame.mac),
            s.matched.bits()
        );

        let threat = ThreatEvent {
            radio: RadioType::WiFi,
            channel: frame.channel,
            rssi: frame.rssi,
            mac: frame.mac,
            identifier: frame.ssid.clone(),
            certainty: s.certainty,
            alert_level: wifi_alert_level(s.matched, frame.is_hidden()),
            category: wifi_category(s.matched),
            match_flags: s.matched.with(DetectorFlag::RssiModifier),
            detector_weights: s.weights,
            rssi_modifier: s.rssi_modifier,
            first_detection: false,
            should_alert: false,
        };
        Some(self.track(threat, now_ms))
    }

    pub fn analyze_bluetooth_device(&mut self, device: &BleDevice, now_ms: u32) -> Option<ThreatEvent> {
        if !self.config.ble_enabled {
            return None;
        }

        let s = score(&self.ble_detectors, device, device.rssi);
        if s.matched.is_empty() {
            return None;
        }

        let threat = ThreatEvent {
            radio: RadioType::Bluetooth,
            channel: 0,
            rssi: device.rssi,
            mac: device.mac,
            identifier: device.name.clone(),
            certainty: s.certainty,
            alert_level: ble_alert_level(s.matched),
            category: ble_category(s.matched),
            match_flags: s.matched.with(DetectorFlag::RssiModifier),
            detector_weights: s.weights,
            rssi_modifier: s.rssi_modifier,
            first_detection: false,
            should_alert: false,
        };
        Some(self.track(threat, now_ms))
    }

    pub fn analyze(&mut self, event: &ScanEvent, now_ms: u32) -> Option<ThreatEvent> {
        match event {
            ScanEvent::WiFi(frame) => self.analyze_wifi_frame(frame, now_ms),
            ScanEvent::Ble(device) => self.analyze_bluetooth_device(device, now_ms),
        }
    }

    fn track(&mut self, mut threat: ThreatEvent, now_ms: u32) -> ThreatEvent {
        let prior = self
            .tracker
            .record_detection(&threat.mac, now_ms, threat.alert_level);
        threat.first_detection = prior == DeviceState::Empty;
        threat.should_alert = threat.first_detection && threat.alert_level == AlertLevel::Confirmed;

        if threat.first_detection && threat.match_flags.contains(DetectorFlag::SurveillanceOui) {
            if let Some(maker) = surveillance_vendor(oui(&threat.mac)) {
                debug!("{} registered to {}", MacFmt(&threat.mac), maker);
            }
        }

        if threat.should_alert {
            info!(
                "{} {} \"{}\" confirmed ({}%)",
                threat.radio.as_str(),
                MacFmt(&threat.mac),
                threat.identifier,
                threat.certainty
            );
        } else {
            debug!(
                "{} {} level={} certainty={} prior={:?}",
                threat.radio.as_str(),
                MacFmt(&threat.mac),
                threat.alert_level.as_str(),
                threat.certainty,
                prior
            );
        }
        threat
    }

    /// Age the tracker. Returns true on a heartbeat: the interval has
    /// elapsed and a Suspicious-or-higher device is in range.
    pub fn tick(&mut self, now_ms: u32) -> bool {
        self.tracker.tick(now_ms);

        if now_ms.wrapping_sub(self.last_heartbeat_ms) < self.config.heartbeat_interval_ms {
            return false;
        }
        self.last_heartbeat_ms = now_ms;

        let pulse = self.tracker.has_high_confidence_in_range();
        if pulse {
            debug!("heartbeat, {} in range", self.tracker.in_range_count());
        }
        pulse
    }

    /// Analyze every queued scan event and publish the resulting threats.
    /// Returns the number published.
    pub fn drain<M: RawMutex, const Q: usize>(
        &mut self,
        queue: &Channel<M, ScanEvent, Q>,
        now_ms: u32,
        sink: &mut impl ThreatSink,
    ) -> usize {
        let mut published = 0;
        while let Ok(event) = queue.try_receive() {
            if let Some(threat) = self.analyze(&event, now_ms) {
                sink.publish(&threat);
                published += 1;
            }
        }
        published
    }
}

impl<const N: usize> Default for ThreatAnalyzer<N> {
    fn default() -> Self {
        Self::new(AnalyzerConfig::new())
    }
}
