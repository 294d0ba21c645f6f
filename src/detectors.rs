/// WiFi and BLE matcher functions and their default registries.
///
/// Every matcher is pure: it looks at one event and reports matched/weight.
/// Precondition failures (empty name, missing service UUID) are a plain
/// miss; there is no error path.
use crate::detector::{DetectorEntry, DetectorFlag, DetectorRegistry, DetectorResult};
use crate::event::{oui, BleDevice, MacAddr, WifiFrame};
use crate::signatures::{
    self, BLE_NAME_PATTERNS, FLOCK_SAFETY_OUI, RAVEN_SERVICE_UUIDS_16, RAVEN_STANDARD_UUIDS_16,
    SSID_EXACT, SSID_KEYWORDS, SSID_PATTERNS,
};

pub const SSID_FORMAT_WEIGHT: u8 = 75;
pub const SSID_KEYWORD_WEIGHT: u8 = 45;
pub const MAC_OUI_WEIGHT: u8 = 20;
pub const FLOCK_OUI_WEIGHT: u8 = 90;
pub const SURVEILLANCE_OUI_WEIGHT: u8 = 30;
pub const BLE_NAME_WEIGHT: u8 = 55;
pub const RAVEN_CUSTOM_UUID_WEIGHT: u8 = 80;
/// Low: these SIG UUIDs are common on unrelated consumer devices.
pub const RAVEN_STD_UUID_WEIGHT: u8 = 10;

/// Default WiFi detector table.
pub static WIFI_DETECTORS: [DetectorEntry<WifiFrame>; 5] = [
    DetectorEntry { evaluate: detect_ssid_format, flag: DetectorFlag::SsidFormat },
    DetectorEntry { evaluate: detect_ssid_keyword, flag: DetectorFlag::SsidKeyword },
    DetectorEntry { evaluate: detect_wifi_mac_oui, flag: DetectorFlag::MacOui },
    DetectorEntry { evaluate: detect_wifi_flock_oui, flag: DetectorFlag::FlockOui },
    DetectorEntry { evaluate: detect_wifi_surveillance_oui, flag: DetectorFlag::SurveillanceOui },
];

/// Default BLE detector table.
pub static BLE_DETECTORS: [DetectorEntry<BleDevice>; 6] = [
    DetectorEntry { evaluate: detect_ble_name, flag: DetectorFlag::BleName },
    DetectorEntry { evaluate: detect_raven_custom_uuid, flag: DetectorFlag::RavenCustomUuid },
    DetectorEntry { evaluate: detect_raven_std_uuid, flag: DetectorFlag::RavenStdUuid },
    DetectorEntry { evaluate: detect_ble_mac_oui, flag: DetectorFlag::MacOui },
    DetectorEntry { evaluate: detect_ble_flock_oui, flag: DetectorFlag::FlockOui },
    DetectorEntry { evaluate: detect_ble_surveillance_oui, flag: DetectorFlag::SurveillanceOui },
];

impl DetectorRegistry<WifiFrame> {
    /// Registry preloaded with `WIFI_DETECTORS`.
    pub fn wifi() -> Self {
        Self::from_entries(&WIFI_DETECTORS)
    }
}

impl DetectorRegistry<BleDevice> {
    /// Registry preloaded with `BLE_DETECTORS`.
    pub fn ble() -> Self {
        Self::from_entries(&BLE_DETECTORS)
    }
}

// ── Helpers ────────────────────────────────────────────────────────────

/// ASCII case-insensitive substring search. No allocation.
pub fn contains_ignore_ascii_case(haystack: &str, needle: &str) -> bool {
    let (h, n) = (haystack.as_bytes(), needle.as_bytes());
    if n.is_empty() {
        return true;
    }
    if n.len() > h.len() {
        return false;
    }
    h.windows(n.len()).any(|w| w.eq_ignore_ascii_case(n))
}

/// Extract the 16-bit short id from a SIG-base UUID string ("0000XXXX-...").
///
/// Only the leading 8 characters are inspected. Returns `None` if they are
/// not `0000` followed by four hex digits.
pub fn short_uuid16(uuid: &str) -> Option<u16> {
    let head = uuid.get(..8)?;
    let short = head.strip_prefix("0000")?;
    if !short.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u16::from_str_radix(short, 16).ok()
}

fn matches_any_ssid_format(ssid: &str) -> bool {
    SSID_PATTERNS.iter().any(|p| p.matches(ssid)) || SSID_EXACT.iter().any(|&e| e == ssid)
}

fn known_oui(mac: &MacAddr) -> DetectorResult {
    DetectorResult::when(
        signatures::is_known_oui(oui(mac)),
        MAC_OUI_WEIGHT,
        DetectorFlag::MacOui.name(),
    )
}

fn flock_oui(mac: &MacAddr) -> DetectorResult {
    DetectorResult::when(
        oui(mac) == FLOCK_SAFETY_OUI,
        FLOCK_OUI_WEIGHT,
        DetectorFlag::FlockOui.name(),
    )
}

fn surveillance_oui(mac: &MacAddr) -> DetectorResult {
    DetectorResult::when(
        signatures::surveillance_vendor(oui(mac)).is_some(),
        SURVEILLANCE_OUI_WEIGHT,
        DetectorFlag::SurveillanceOui.name(),
    )
}

// ── WiFi detectors ─────────────────────────────────────────────────────

/// "Flock-" + 6 hex, "Penguin-" + 10 digits, or exactly "FS Ext Battery".
pub fn detect_ssid_format(frame: &WifiFrame) -> DetectorResult {
    let ssid = frame.ssid.as_str();
    DetectorResult::when(
        !ssid.is_empty() && matches_any_ssid_format(ssid),
        SSID_FORMAT_WEIGHT,
        DetectorFlag::SsidFormat.name(),
    )
}

/// Case-insensitive keyword anywhere in the SSID.
pub fn detect_ssid_keyword(frame: &WifiFrame) -> DetectorResult {
    let ssid = frame.ssid.as_str();
    DetectorResult::when(
        !ssid.is_empty()
            && SSID_KEYWORDS
                .iter()
                .any(|k| contains_ignore_ascii_case(ssid, k)),
        SSID_KEYWORD_WEIGHT,
        DetectorFlag::SsidKeyword.name(),
    )
}

pub fn detect_wifi_mac_oui(frame: &WifiFrame) -> DetectorResult {
    known_oui(&frame.mac)
}

pub fn detect_wifi_flock_oui(frame: &WifiFrame) -> DetectorResult {
    flock_oui(&frame.mac)
}

pub fn detect_wifi_surveillance_oui(frame: &WifiFrame) -> DetectorResult {
    surveillance_oui(&frame.mac)
}

// ── BLE detectors ──────────────────────────────────────────────────────

pub fn detect_ble_name(device: &BleDevice) -> DetectorResult {
    let name = device.name.as_str();
    DetectorResult::when(
        !name.is_empty()
            && BLE_NAME_PATTERNS
                .iter()
                .any(|p| contains_ignore_ascii_case(name, p)),
        BLE_NAME_WEIGHT,
        DetectorFlag::BleName.name(),
    )
}

/// Raven custom service range 0x3100-0x3500.
pub fn detect_raven_custom_uuid(device: &BleDevice) -> DetectorResult {
    let matched = device
        .service_uuid
        .as_deref()
        .and_then(short_uuid16)
        .is_some_and(|id| RAVEN_SERVICE_UUIDS_16.contains(&id));
    DetectorResult::when(
        matched,
        RAVEN_CUSTOM_UUID_WEIGHT,
        DetectorFlag::RavenCustomUuid.name(),
    )
}

/// Standard SIG services Raven also exposes.
pub fn detect_raven_std_uuid(device: &BleDevice) -> DetectorResult {
    let matched = device
        .service_uuid
        .as_deref()
        .and_then(short_uuid16)
        .is_some_and(|id| RAVEN_STANDARD_UUIDS_16.contains(&id));
    DetectorResult::when(
        matched,
        RAVEN_STD_UUID_WEIGHT,
        DetectorFlag::RavenStdUuid.name(),
    )
}

pub fn detect_ble_mac_oui(device: &BleDevice) -> DetectorResult {
    known_oui(&device.mac)
}

pub fn detect_ble_flock_oui(device: &BleDevice) -> DetectorResult {
    flock_oui(&device.mac)
}

pub fn detect_ble_surveillance_oui(device: &BleDevice) -> DetectorResult {
    surveillance_oui(&device.mac)
}
