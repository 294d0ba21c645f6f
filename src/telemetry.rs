/// NDJSON telemetry for downstream consumers (serial, BLE, companion apps).
///
/// Every message is one JSON object terminated by `\n`. Encoding uses
/// `serde_json_core` into fixed-size buffers; no allocation.
use core::fmt::Write;

use heapless::{String, Vec};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::detector::DetectorFlag;
use crate::event::{AlertLevel, MacAddr, MacFmt, RadioType, ThreatCategory, ThreatEvent};
use crate::tracker::DeviceTracker;

/// Maximum length for MAC address strings ("aa:bb:cc:dd:ee:ff")
pub type MacString = String<18>;

/// Firmware version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Maximum size of a serialized JSON message, newline included
pub const MAX_MSG_LEN: usize = 512;

/// Buffer type for serialized JSON messages
pub type MsgBuffer = Vec<u8, MAX_MSG_LEN>;

/// Messages emitted by the device.
#[derive(Debug, Serialize)]
#[serde(tag = "event")]
pub enum DeviceMessage<'a> {
    /// A classified threat
    #[serde(rename = "target_detected")]
    TargetDetected {
        ms_since_boot: u32,
        source: Source,
        target: Target<'a>,
    },
    /// Periodic pulse while a suspicious-or-higher device is in range
    #[serde(rename = "heartbeat")]
    Heartbeat { ms_since_boot: u32, in_range: u16 },
    /// Device status report
    #[serde(rename = "status")]
    Status {
        /// Uptime in seconds
        uptime: u32,
        /// Occupied tracker slots, departed included
        tracked: u16,
        in_range: u16,
        version: &'static str,
    },
}

#[derive(Debug, Serialize)]
pub struct Source {
    pub radio: RadioType,
    pub channel: u8,
    pub rssi: i8,
}

#[derive(Debug, Serialize)]
pub struct Target<'a> {
    pub mac: MacString,
    /// SSID or BLE device name
    pub label: &'a str,
    pub certainty: u8,
    pub alert_level: AlertLevel,
    pub category: ThreatCategory,
    pub first_detection: bool,
    pub should_alert: bool,
    pub detectors: DetectorBreakdown<'a>,
}

/// Serializes as `{"<detector>": weight, ...}` in flag-bit order.
/// `rssi_modifier` carries the signed adjustment rather than a weight.
#[derive(Debug)]
pub struct DetectorBreakdown<'a>(pub &'a ThreatEvent);

impl Serialize for DetectorBreakdown<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let threat = self.0;
        let mut map = serializer.serialize_map(Some(threat.match_flags.len()))?;
        for flag in threat.match_flags.iter() {
            if flag == DetectorFlag::RssiModifier {
                map.serialize_entry(flag.name(), &threat.rssi_modifier)?;
            } else {
                map.serialize_entry(flag.name(), &threat.detector_weights.get(flag))?;
            }
        }
        map.end()
    }
}

/// Format a MAC address as lowercase "aa:bb:cc:dd:ee:ff".
pub fn format_mac(mac: &MacAddr, out: &mut MacString) {
    out.clear();
    let _ = write!(out, "{}", MacFmt(mac));
}

/// Serialize a DeviceMessage to JSON bytes followed by a newline.
/// Returns the number of bytes written, or None if `buf` is too small.
pub fn serialize_message(msg: &DeviceMessage, buf: &mut [u8]) -> Option<usize> {
    let len = serde_json_core::to_slice(msg, buf).ok()?;
    // Room for the NDJSON delimiter is required; a message without it is unusable
    *buf.get_mut(len)? = b'\n';
    Some(len + 1)
}

fn saturate_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

/// Builds telemetry messages with timestamps relative to boot.
#[derive(Debug, Clone, Copy)]
pub struct TelemetryReporter {
    boot_ms: u32,
}

impl TelemetryReporter {
    pub const fn new(boot_ms: u32) -> Self {
        Self { boot_ms }
    }

    pub fn ms_since_boot(&self, now_ms: u32) -> u32 {
        now_ms.wrapping_sub(self.boot_ms)
    }

    pub fn target_detected<'a>(&self, threat: &'a ThreatEvent, now_ms: u32) -> DeviceMessage<'a> {
        let mut mac = MacString::new();
        format_mac(&threat.mac, &mut mac);
        DeviceMessage::TargetDetected {
            ms_since_boot: self.ms_since_boot(now_ms),
            source: Source {
                radio: threat.radio,
                channel: threat.channel,
                rssi: threat.rssi,
            },
            target: Target {
                mac,
                label: threat.identifier.as_str(),
                certainty: threat.certainty,
                alert_level: threat.alert_level,
                category: threat.category,
                first_detection: threat.first_detection,
                should_alert: threat.should_alert,
                detectors: DetectorBreakdown(threat),
            },
        }
    }

    pub fn heartbeat(&self, in_range: usize, now_ms: u32) -> DeviceMessage<'static> {
        DeviceMessage::Heartbeat {
            ms_since_boot: self.ms_since_boot(now_ms),
            in_range: saturate_u16(in_range),
        }
    }

    pub fn status<const N: usize>(&self, tracker: &DeviceTracker<N>, now_ms: u32) -> DeviceMessage<'static> {
        DeviceMessage::Status {
            uptime: self.ms_since_boot(now_ms) / 1000,
            tracked: saturate_u16(tracker.len()),
            in_range: saturate_u16(tracker.in_range_count()),
            version: VERSION,
        }
    }

    /// Encode into a fresh buffer. None if the message does not fit.
    pub fn encode(&self, msg: &DeviceMessage) -> Option<MsgBuffer> {
        let mut buf = MsgBuffer::new();
        buf.resize_default(MAX_MSG_LEN).ok()?;
        let len = serialize_message(msg, &mut buf)?;
        buf.truncate(len);
        Some(buf)
    }
}
