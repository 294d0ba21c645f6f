/// Observed-signal and threat value types.
///
/// `WifiFrame` and `BleDevice` are produced by the collector layer and
/// consumed once by the analyzer. `ThreatEvent` is the derived record handed
/// to downstream consumers (telemetry, display, audio).
/// All types are fixed-size: `heapless` strings, no allocation.
use core::fmt;

use heapless::String;
use serde::{Serialize, Serializer};

use crate::detector::{DetectorSet, DetectorWeights};

/// A 6-byte hardware (MAC) address.
pub type MacAddr = [u8; 6];

/// SSIDs and BLE local names, up to 32 bytes.
pub type NameString = String<32>;

/// Maximum length for UUID strings ("0000180a-0000-1000-8000-00805f9b34fb")
pub type UuidString = String<37>;

/// First three bytes of a MAC address.
#[inline]
pub fn oui(mac: &MacAddr) -> [u8; 3] {
    [mac[0], mac[1], mac[2]]
}

/// Displays a MAC address as lowercase `aa:bb:cc:dd:ee:ff`.
#[derive(Debug, Clone, Copy)]
pub struct MacFmt<'a>(pub &'a MacAddr);

impl fmt::Display for MacFmt<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.0;
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            m[0], m[1], m[2], m[3], m[4], m[5]
        )
    }
}

/// Copy as much of `src` into `dst` as fits, stopping on a char boundary.
pub fn push_truncated<const N: usize>(dst: &mut String<N>, src: &str) {
    for c in src.chars() {
        if dst.push(c).is_err() {
            break;
        }
    }
}

/// WiFi frame type classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameType {
    Beacon,
    ProbeRequest,
    ProbeResponse,
    Data,
    Other,
}

impl FrameType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FrameType::Beacon => "beacon",
            FrameType::ProbeRequest => "probe_req",
            FrameType::ProbeResponse => "probe_resp",
            FrameType::Data => "data",
            FrameType::Other => "other",
        }
    }
}

/// One observed WiFi frame.
#[derive(Debug, Clone, PartialEq)]
pub struct WifiFrame {
    pub mac: MacAddr,
    /// Empty when the network is hidden.
    pub ssid: NameString,
    pub rssi: i8,
    pub channel: u8,
    pub frame_type: FrameType,
}

impl WifiFrame {
    pub fn new(mac: MacAddr, ssid: &str, rssi: i8, channel: u8, frame_type: FrameType) -> Self {
        let mut s = NameString::new();
        push_truncated(&mut s, ssid);
        Self {
            mac,
            ssid: s,
            rssi,
            channel,
            frame_type,
        }
    }

    /// A hidden network broadcasts an empty or all-NUL SSID.
    pub fn is_hidden(&self) -> bool {
        self.ssid.bytes().all(|b| b == 0)
    }
}

/// One observed BLE advertisement.
#[derive(Debug, Clone, PartialEq)]
pub struct BleDevice {
    pub mac: MacAddr,
    pub name: NameString,
    pub rssi: i8,
    /// Primary advertised service UUID, canonical text form.
    pub service_uuid: Option<UuidString>,
}

impl BleDevice {
    pub fn new(mac: MacAddr, name: &str, rssi: i8) -> Self {
        let mut n = NameString::new();
        push_truncated(&mut n, name);
        Self {
            mac,
            name: n,
            rssi,
            service_uuid: None,
        }
    }

    pub fn with_service_uuid(mut self, uuid: &str) -> Self {
        let mut u = UuidString::new();
        push_truncated(&mut u, uuid);
        self.service_uuid = Some(u);
        self
    }
}

/// Unified scan event, as queued by the radio collectors.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanEvent {
    WiFi(WifiFrame),
    Ble(BleDevice),
}

impl ScanEvent {
    pub fn mac(&self) -> &MacAddr {
        match self {
            ScanEvent::WiFi(f) => &f.mac,
            ScanEvent::Ble(d) => &d.mac,
        }
    }
}

/// Radio a threat was observed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadioType {
    WiFi,
    Bluetooth,
}

impl RadioType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RadioType::WiFi => "wifi",
            RadioType::Bluetooth => "bluetooth",
        }
    }
}

impl Serialize for RadioType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Alert severity tiers, derived from detector flags rather than numeric scores.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum AlertLevel {
    /// No tier matched; the event is still emitted for telemetry.
    #[default]
    None = 0,
    /// Other surveillance camera vendor. Display only.
    Info = 1,
    /// Weak signal, needs context.
    Suspicious = 2,
    /// High confidence, full alert.
    Confirmed = 3,
}

impl AlertLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertLevel::None => "none",
            AlertLevel::Info => "info",
            AlertLevel::Suspicious => "suspicious",
            AlertLevel::Confirmed => "confirmed",
        }
    }
}

/// Serialized as its numeric tier (0-3).
impl Serialize for AlertLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(*self as u8)
    }
}

/// What kind of hardware a threat most likely is. Independent of alert level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreatCategory {
    SurveillanceDevice,
    SurveillanceCamera,
    AcousticDetector,
}

impl ThreatCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThreatCategory::SurveillanceDevice => "surveillance_device",
            ThreatCategory::SurveillanceCamera => "surveillance_camera",
            ThreatCategory::AcousticDetector => "acoustic_detector",
        }
    }
}

impl Serialize for ThreatCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A classified detection, emitted once per qualifying input event.
#[derive(Debug, Clone, PartialEq)]
pub struct ThreatEvent {
    pub radio: RadioType,
    /// WiFi channel, 0 for BLE.
    pub channel: u8,
    pub rssi: i8,
    pub mac: MacAddr,
    /// SSID or BLE device name.
    pub identifier: NameString,
    /// 0-100
    pub certainty: u8,
    pub alert_level: AlertLevel,
    pub category: ThreatCategory,
    /// Matched detectors plus the `RssiModifier` marker bit.
    pub match_flags: DetectorSet,
    pub detector_weights: DetectorWeights,
    pub rssi_modifier: i8,
    pub first_detection: bool,
    pub should_alert: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alert_levels_are_ordered() {
        assert!(AlertLevel::None < AlertLevel::Info);
        assert!(AlertLevel::Info < AlertLevel::Suspicious);
        assert!(AlertLevel::Suspicious < AlertLevel::Confirmed);
        assert_eq!(AlertLevel::Confirmed as u8, 3);
    }

    #[test]
    fn push_truncated_stops_on_char_boundary() {
        let mut s = String::<4>::new();
        push_truncated(&mut s, "abé€");
        // 'a' 'b' 'é' (2 bytes) fill all four bytes; '€' does not fit
        assert_eq!(s.as_str(), "abé");
    }

    #[test]
    fn long_ssid_is_truncated_to_fit() {
        let long = "0123456789012345678901234567890123456789";
        let frame = WifiFrame::new([0; 6], long, -60, 6, FrameType::Beacon);
        assert_eq!(frame.ssid.len(), 32);
        assert!(long.starts_with(frame.ssid.as_str()));
    }

    #[test]
    fn hidden_ssid() {
        let frame = WifiFrame::new([0; 6], "", -60, 1, FrameType::Beacon);
        assert!(frame.is_hidden());
        let frame = WifiFrame::new([0; 6], "\0\0\0", -60, 1, FrameType::Beacon);
        assert!(frame.is_hidden());
        let frame = WifiFrame::new([0; 6], "Home", -60, 1, FrameType::Beacon);
        assert!(!frame.is_hidden());
    }

    #[test]
    fn ble_device_builder_sets_uuid() {
        let dev = BleDevice::new([1; 6], "", -70)
            .with_service_uuid("00003100-0000-1000-8000-00805f9b34fb");
        assert_eq!(
            dev.service_uuid.as_deref(),
            Some("00003100-0000-1000-8000-00805f9b34fb")
        );
        assert!(BleDevice::new([1; 6], "x", -70).service_uuid.is_none());
    }

    #[test]
    fn mac_display_is_lowercase() {
        use core::fmt::Write;
        let mut s = String::<18>::new();
        write!(s, "{}", MacFmt(&[0xB4, 0x1E, 0x52, 0x0A, 0xBC, 0xFF])).unwrap();
        assert_eq!(s.as_str(), "b4:1e:52:0a:bc:ff");
    }

    #[test]
    fn radio_and_category_names() {
        assert_eq!(RadioType::WiFi.as_str(), "wifi");
        assert_eq!(RadioType::Bluetooth.as_str(), "bluetooth");
        assert_eq!(ThreatCategory::AcousticDetector.as_str(), "acoustic_detector");
        assert_eq!(FrameType::ProbeRequest.as_str(), "probe_req");
    }
}
