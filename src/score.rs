/// Certainty scoring: sum of matched detector weights plus an RSSI adjustment.
use crate::detector::{DetectorRegistry, DetectorSet, DetectorWeights};

/// Output of running one registry over one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Score {
    /// Detectors that matched. Never contains `RssiModifier`.
    pub matched: DetectorSet,
    pub weights: DetectorWeights,
    /// Signed adjustment derived from signal strength.
    pub rssi_modifier: i8,
    /// Clamped to 0-100.
    pub certainty: u8,
}

/// Signal-strength adjustment: closer devices are more certain.
pub fn rssi_modifier(rssi: i8) -> i8 {
    if rssi > -50 {
        10
    } else if rssi > -70 {
        0
    } else if rssi > -85 {
        -5
    } else {
        -10
    }
}

/// Add the adjustment and clamp to 0-100.
pub fn certainty(total_weight: u16, modifier: i8) -> u8 {
    (i32::from(total_weight) + i32::from(modifier)).clamp(0, 100) as u8
}

/// Run every detector in `registry` against `event`.
pub fn score<E>(registry: &DetectorRegistry<E>, event: &E, rssi: i8) -> Score {
    let mut matched = DetectorSet::new();
    let mut weights = DetectorWeights::new();
    let mut total: u16 = 0;

    for entry in registry.entries() {
        let result = (entry.evaluate)(event);
        if result.matched {
            matched.insert(entry.flag);
            weights.set(entry.flag, result.weight);
            total = total.saturating_add(u16::from(result.weight));
        }
    }

    let modifier = rssi_modifier(rssi);
    Score {
        matched,
        weights,
        rssi_modifier: modifier,
        certainty: certainty(total, modifier),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::{DetectorFlag, DetectorResult};

    #[test]
    fn rssi_modifier_bands() {
        assert_eq!(rssi_modifier(-30), 10);
        assert_eq!(rssi_modifier(-49), 10);
        assert_eq!(rssi_modifier(-50), 0); // boundary: > -50 is false
        assert_eq!(rssi_modifier(-60), 0);
        assert_eq!(rssi_modifier(-70), -5); // boundary: > -70 is false
        assert_eq!(rssi_modifier(-80), -5);
        assert_eq!(rssi_modifier(-85), -10); // boundary: > -85 is false
        assert_eq!(rssi_modifier(-90), -10);
        assert_eq!(rssi_modifier(i8::MIN), -10);
        assert_eq!(rssi_modifier(i8::MAX), 10);
    }

    #[test]
    fn certainty_clamps_both_ends() {
        assert_eq!(certainty(0, -10), 0);
        assert_eq!(certainty(5, -10), 0);
        assert_eq!(certainty(75, 0), 75);
        assert_eq!(certainty(95, 10), 100);
        assert_eq!(certainty(400, -10), 100);
        assert_eq!(certainty(u16::MAX, 10), 100);
    }

    fn heavy(_: &i8) -> DetectorResult {
        DetectorResult::hit(80, "heavy")
    }

    fn light(_: &i8) -> DetectorResult {
        DetectorResult::hit(30, "light")
    }

    fn never(_: &i8) -> DetectorResult {
        DetectorResult::miss(50, "never")
    }

    #[test]
    fn score_sums_matched_weights_only() {
        let mut reg = DetectorRegistry::<i8>::new();
        reg.register(light, DetectorFlag::SurveillanceOui).unwrap();
        reg.register(never, DetectorFlag::BleName).unwrap();
        let s = score(&reg, &0, -60);
        assert_eq!(s.matched, DetectorSet::from(DetectorFlag::SurveillanceOui));
        assert_eq!(s.weights.get(DetectorFlag::SurveillanceOui), 30);
        assert_eq!(s.weights.get(DetectorFlag::BleName), 0);
        assert_eq!(s.rssi_modifier, 0);
        assert_eq!(s.certainty, 30);
    }

    #[test]
    fn score_is_order_independent() {
        let mut a = DetectorRegistry::<i8>::new();
        a.register(heavy, DetectorFlag::RavenCustomUuid).unwrap();
        a.register(light, DetectorFlag::MacOui).unwrap();
        let mut b = DetectorRegistry::<i8>::new();
        b.register(light, DetectorFlag::MacOui).unwrap();
        b.register(heavy, DetectorFlag::RavenCustomUuid).unwrap();
        assert_eq!(score(&a, &0, -75), score(&b, &0, -75));
        assert_eq!(score(&a, &0, -75).certainty, 100);
    }

    #[test]
    fn score_with_no_match_is_empty() {
        let mut reg = DetectorRegistry::<i8>::new();
        reg.register(never, DetectorFlag::BleName).unwrap();
        let s = score(&reg, &0, -30);
        assert!(s.matched.is_empty());
        assert_eq!(s.certainty, 10);
    }

    #[test]
    fn score_never_records_rssi_marker() {
        let mut reg = DetectorRegistry::<i8>::new();
        reg.register(heavy, DetectorFlag::FlockOui).unwrap();
        let s = score(&reg, &0, -95);
        assert!(!s.matched.contains(DetectorFlag::RssiModifier));
        assert_eq!(s.rssi_modifier, -10);
        assert_eq!(s.certainty, 70);
    }
}
