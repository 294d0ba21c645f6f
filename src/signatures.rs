//! Compiled-in signature data for surveillance device detection.
//!
//! Three disjoint OUI tables feed three detectors: the known-vendor list
//! (weak evidence on its own), the Flock Safety registration (strong), and
//! other surveillance camera makers (informational). SSID patterns, BLE
//! name patterns and Raven service UUIDs follow.

/// Radio-module vendor prefixes seen in target hardware.
///
/// Common in unrelated consumer gear too, so a match is weak evidence.
pub static KNOWN_OUIS: &[[u8; 3]] = &[
    [0x58, 0x8E, 0x81], [0xCC, 0xCC, 0xCC], [0xEC, 0x1B, 0xBD], [0x90, 0x35, 0xEA],
    [0x04, 0x0D, 0x84], [0xF0, 0x82, 0xC0], [0x1C, 0x34, 0xF1], [0x38, 0x5B, 0x44],
    [0x94, 0x34, 0x69], [0xB4, 0xE3, 0xF9], [0x70, 0xC9, 0x4E], [0x3C, 0x91, 0x80],
    [0xD8, 0xF3, 0xBC], [0x80, 0x30, 0x49], [0x14, 0x5A, 0xFC], [0x74, 0x4C, 0xA1],
    [0x08, 0x3A, 0x88], [0x9C, 0x2F, 0x9D], [0x94, 0x08, 0x53], [0xE4, 0xAA, 0xEA],
];

/// Flock Safety's own IEEE registration.
pub const FLOCK_SAFETY_OUI: [u8; 3] = [0xB4, 0x1E, 0x52];

/// Dedicated surveillance camera manufacturers.
pub static SURVEILLANCE_OUIS: &[([u8; 3], &str)] = &[
    // Avigilon Alta
    ([0x70, 0x1A, 0xD5], "Avigilon Alta"),
    // Axis Communications
    ([0x00, 0x40, 0x8C], "Axis Communications"),
    ([0xAC, 0xCC, 0x8E], "Axis Communications"),
    ([0xB8, 0xA4, 0x4F], "Axis Communications"),
    ([0xE8, 0x27, 0x25], "Axis Communications"),
    // FLIR
    ([0x00, 0x13, 0x56], "FLIR Systems"),
    ([0x00, 0x40, 0x7F], "FLIR Systems"),
    ([0x00, 0x1B, 0xD8], "FLIR Systems"),
    // GeoVision
    ([0x00, 0x13, 0xE2], "GeoVision"),
    // Hanwha Vision
    ([0x44, 0xB4, 0x23], "Hanwha Vision"),
    ([0x8C, 0x1D, 0x55], "Hanwha Vision"),
    ([0xE4, 0x30, 0x22], "Hanwha Vision"),
    // March Networks
    ([0x00, 0x10, 0xBE], "March Networks"),
    ([0x00, 0x12, 0x81], "March Networks"),
    // Mobotix
    ([0x00, 0x03, 0xC5], "Mobotix"),
    // Sunell Electronics
    ([0x00, 0x1C, 0x27], "Sunell Electronics"),
];

/// Structured SSID formats: fixed prefix plus a fixed-length suffix.
pub static SSID_PATTERNS: &[SsidPattern] = &[
    // Flock Safety camera
    SsidPattern::new("Flock-", 6, Charset::Hex),
    // Penguin solar/battery unit
    SsidPattern::new("Penguin-", 10, Charset::Digits),
];

/// SSIDs that only ever appear verbatim.
pub static SSID_EXACT: &[&str] = &["FS Ext Battery"];

/// Lowercase substrings searched case-insensitively in any SSID.
///
/// `flck` covers the vowel-dropped spelling.
pub static SSID_KEYWORDS: &[&str] = &["flock", "flck", "penguin", "pigvision"];

/// Substrings searched case-insensitively in BLE local names.
pub static BLE_NAME_PATTERNS: &[&str] = &["Flock", "Penguin", "FS Ext Battery", "Pigvision"];

/// Raven (ShotSpotter) custom GATT services, as 16-bit ids on the SIG base
/// UUID `0000XXXX-0000-1000-8000-00805f9b34fb`.
pub static RAVEN_SERVICE_UUIDS_16: &[u16] = &[
    0x3100, // GPS
    0x3200, // Power
    0x3300, // Network
    0x3400, // Upload
    0x3500, // Error
];

/// SIG-assigned services Raven exposes alongside its own.
pub static RAVEN_STANDARD_UUIDS_16: &[u16] = &[
    0x180A, // Device Information
    0x1809, // Health Thermometer
    0x1819, // Location and Navigation
];

/// Characters allowed in a pattern suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Charset {
    /// 0-9, a-f, A-F
    Hex,
    /// 0-9
    Digits,
}

impl Charset {
    fn admits(self, c: char) -> bool {
        match self {
            Charset::Hex => c.is_ascii_hexdigit(),
            Charset::Digits => c.is_ascii_digit(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SsidPattern {
    pub prefix: &'static str,
    pub suffix_len: usize,
    pub charset: Charset,
}

impl SsidPattern {
    pub const fn new(prefix: &'static str, suffix_len: usize, charset: Charset) -> Self {
        Self {
            prefix,
            suffix_len,
            charset,
        }
    }

    /// Case-sensitive prefix, then exactly `suffix_len` chars from `charset`.
    pub fn matches(&self, ssid: &str) -> bool {
        ssid.strip_prefix(self.prefix).is_some_and(|suffix| {
            suffix.len() == self.suffix_len && suffix.chars().all(|c| self.charset.admits(c))
        })
    }
}

pub fn is_known_oui(oui: [u8; 3]) -> bool {
    KNOWN_OUIS.contains(&oui)
}

/// Manufacturer name if `oui` belongs to a surveillance camera maker.
pub fn surveillance_vendor(oui: [u8; 3]) -> Option<&'static str> {
    SURVEILLANCE_OUIS
        .iter()
        .find(|(prefix, _)| *prefix == oui)
        .map(|&(_, maker)| maker)
}
