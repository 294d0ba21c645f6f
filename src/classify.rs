/// Alert-level and category policy.
///
/// Tiers come from which detectors matched, never from the numeric
/// certainty. Rules are evaluated top to bottom and the first hit wins.
use crate::detector::{DetectorFlag, DetectorSet};
use crate::event::{AlertLevel, ThreatCategory};

/// WiFi tier rules.
///
/// 1. SSID format or Flock OUI → Confirmed
/// 2. SSID keyword + known-vendor OUI → Confirmed
/// 3. SSID keyword alone → Suspicious
/// 4. Known-vendor OUI with a hidden SSID → Suspicious
/// 5. Surveillance-vendor OUI → Info
pub fn wifi_alert_level(flags: DetectorSet, hidden_ssid: bool) -> AlertLevel {
    if flags.contains(DetectorFlag::SsidFormat) || flags.contains(DetectorFlag::FlockOui) {
        return AlertLevel::Confirmed;
    }
    let keyword = flags.contains(DetectorFlag::SsidKeyword);
    let vendor = flags.contains(DetectorFlag::MacOui);
    if keyword && vendor {
        return AlertLevel::Confirmed;
    }
    if keyword {
        return AlertLevel::Suspicious;
    }
    if vendor && hidden_ssid {
        return AlertLevel::Suspicious;
    }
    if flags.contains(DetectorFlag::SurveillanceOui) {
        return AlertLevel::Info;
    }
    AlertLevel::None
}

/// BLE tier rules.
///
/// 1. Name pattern, Raven custom UUID or Flock OUI → Confirmed
/// 2. Known-vendor OUI → Suspicious
/// 3. Raven standard UUID → Suspicious
/// 4. Surveillance-vendor OUI → Info
pub fn ble_alert_level(flags: DetectorSet) -> AlertLevel {
    let confirmed = DetectorFlag::BleName | DetectorFlag::RavenCustomUuid | DetectorFlag::FlockOui;
    if flags.intersects(confirmed) {
        AlertLevel::Confirmed
    } else if flags.contains(DetectorFlag::MacOui) || flags.contains(DetectorFlag::RavenStdUuid) {
        AlertLevel::Suspicious
    } else if flags.contains(DetectorFlag::SurveillanceOui) {
        AlertLevel::Info
    } else {
        AlertLevel::None
    }
}

pub fn wifi_category(flags: DetectorSet) -> ThreatCategory {
    if flags.contains(DetectorFlag::SurveillanceOui) {
        ThreatCategory::SurveillanceCamera
    } else {
        ThreatCategory::SurveillanceDevice
    }
}

/// Raven UUIDs mark an acoustic gunshot detector; that outranks a camera OUI.
pub fn ble_category(flags: DetectorSet) -> ThreatCategory {
    if flags.intersects(DetectorFlag::RavenCustomUuid | DetectorFlag::RavenStdUuid) {
        ThreatCategory::AcousticDetector
    } else if flags.contains(DetectorFlag::SurveillanceOui) {
        ThreatCategory::SurveillanceCamera
    } else {
        ThreatCategory::SurveillanceDevice
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use DetectorFlag::*;

    // ── WiFi ────────────────────────────────────────────────────────

    #[test]
    fn wifi_format_or_flock_oui_is_confirmed() {
        assert_eq!(wifi_alert_level(SsidFormat.into(), false), AlertLevel::Confirmed);
        assert_eq!(wifi_alert_level(FlockOui.into(), true), AlertLevel::Confirmed);
        assert_eq!(
            wifi_alert_level(SsidFormat | SurveillanceOui, false),
            AlertLevel::Confirmed
        );
    }

    #[test]
    fn wifi_keyword_with_vendor_is_confirmed() {
        assert_eq!(wifi_alert_level(SsidKeyword | MacOui, false), AlertLevel::Confirmed);
    }

    #[test]
    fn wifi_keyword_alone_is_suspicious() {
        assert_eq!(wifi_alert_level(SsidKeyword.into(), false), AlertLevel::Suspicious);
    }

    #[test]
    fn wifi_vendor_needs_hidden_ssid() {
        assert_eq!(wifi_alert_level(MacOui.into(), true), AlertLevel::Suspicious);
        assert_eq!(wifi_alert_level(MacOui.into(), false), AlertLevel::None);
    }

    #[test]
    fn wifi_surveillance_vendor_is_info() {
        assert_eq!(wifi_alert_level(SurveillanceOui.into(), false), AlertLevel::Info);
        assert_eq!(wifi_alert_level(SurveillanceOui.into(), true), AlertLevel::Info);
    }

    #[test]
    fn wifi_no_flags_is_none() {
        assert_eq!(wifi_alert_level(DetectorSet::EMPTY, true), AlertLevel::None);
    }

    #[test]
    fn wifi_categories() {
        assert_eq!(wifi_category(SurveillanceOui.into()), ThreatCategory::SurveillanceCamera);
        assert_eq!(wifi_category(SsidFormat | MacOui), ThreatCategory::SurveillanceDevice);
        assert_eq!(wifi_category(DetectorSet::EMPTY), ThreatCategory::SurveillanceDevice);
    }

    // ── BLE ─────────────────────────────────────────────────────────

    #[test]
    fn ble_strong_flags_are_confirmed() {
        assert_eq!(ble_alert_level(BleName.into()), AlertLevel::Confirmed);
        assert_eq!(ble_alert_level(RavenCustomUuid.into()), AlertLevel::Confirmed);
        assert_eq!(ble_alert_level(FlockOui.into()), AlertLevel::Confirmed);
    }

    #[test]
    fn ble_weak_flags_are_suspicious() {
        assert_eq!(ble_alert_level(MacOui.into()), AlertLevel::Suspicious);
        assert_eq!(ble_alert_level(RavenStdUuid.into()), AlertLevel::Suspicious);
        assert_eq!(
            ble_alert_level(RavenStdUuid | SurveillanceOui),
            AlertLevel::Suspicious
        );
    }

    #[test]
    fn ble_surveillance_vendor_is_info() {
        assert_eq!(ble_alert_level(SurveillanceOui.into()), AlertLevel::Info);
        assert_eq!(ble_alert_level(DetectorSet::EMPTY), AlertLevel::None);
    }

    #[test]
    fn ble_categories() {
        assert_eq!(ble_category(RavenCustomUuid.into()), ThreatCategory::AcousticDetector);
        assert_eq!(
            ble_category(RavenStdUuid | SurveillanceOui),
            ThreatCategory::AcousticDetector
        );
        assert_eq!(ble_category(SurveillanceOui.into()), ThreatCategory::SurveillanceCamera);
        assert_eq!(ble_category(BleName | MacOui), ThreatCategory::SurveillanceDevice);
    }
}
