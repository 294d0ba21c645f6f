/// Detector flags, match sets, and the per-radio detector registry.
///
/// Every detector owns exactly one `DetectorFlag` bit. A scan event's
/// matched detectors are collected in a `DetectorSet`, and each matched
/// weight is stored in `DetectorWeights` at the flag's bit position, so the
/// individual contributions survive even though certainty is a lossy sum.
use core::ops::BitOr;

use heapless::Vec;
use serde::{Serialize, Serializer};

/// Number of weight slots, one per `DetectorFlag` bit position.
pub const MAX_DETECTOR_WEIGHTS: usize = 9;

/// Maximum number of detectors a single registry can hold.
pub const MAX_DETECTORS: usize = 8;

/// One bit per detector. The discriminant is the bit position.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorFlag {
    SsidFormat = 0,
    SsidKeyword = 1,
    MacOui = 2,
    BleName = 3,
    RavenCustomUuid = 4,
    RavenStdUuid = 5,
    /// Not a detector: marks that an RSSI adjustment was applied.
    RssiModifier = 6,
    FlockOui = 7,
    SurveillanceOui = 8,
}

impl DetectorFlag {
    /// All flags in bit order.
    pub const ALL: [DetectorFlag; MAX_DETECTOR_WEIGHTS] = [
        DetectorFlag::SsidFormat,
        DetectorFlag::SsidKeyword,
        DetectorFlag::MacOui,
        DetectorFlag::BleName,
        DetectorFlag::RavenCustomUuid,
        DetectorFlag::RavenStdUuid,
        DetectorFlag::RssiModifier,
        DetectorFlag::FlockOui,
        DetectorFlag::SurveillanceOui,
    ];

    #[inline]
    pub const fn bit(self) -> usize {
        self as usize
    }

    #[inline]
    pub const fn mask(self) -> u16 {
        1 << (self as u16)
    }

    /// Stable name used in telemetry.
    pub fn name(self) -> &'static str {
        match self {
            DetectorFlag::SsidFormat => "ssid_format",
            DetectorFlag::SsidKeyword => "ssid_keyword",
            DetectorFlag::MacOui => "mac_oui",
            DetectorFlag::BleName => "ble_name",
            DetectorFlag::RavenCustomUuid => "raven_custom_uuid",
            DetectorFlag::RavenStdUuid => "raven_std_uuid",
            DetectorFlag::RssiModifier => "rssi_modifier",
            DetectorFlag::FlockOui => "flock_oui",
            DetectorFlag::SurveillanceOui => "surveillance_oui",
        }
    }
}

/// A set of `DetectorFlag`s. Stack-only, 2 bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DetectorSet {
    bits: u16,
}

impl DetectorSet {
    pub const EMPTY: DetectorSet = DetectorSet { bits: 0 };

    pub const fn new() -> Self {
        Self::EMPTY
    }

    #[inline]
    pub fn insert(&mut self, flag: DetectorFlag) {
        self.bits |= flag.mask();
    }

    #[inline]
    pub fn contains(&self, flag: DetectorFlag) -> bool {
        self.bits & flag.mask() != 0
    }

    /// True if any flag of `other` is present.
    #[inline]
    pub fn intersects(&self, other: DetectorSet) -> bool {
        self.bits & other.bits != 0
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    /// Raw bit pattern, bit N = flag with discriminant N.
    pub fn bits(&self) -> u16 {
        self.bits
    }

    pub fn with(mut self, flag: DetectorFlag) -> Self {
        self.insert(flag);
        self
    }

    /// Flags present, in bit order.
    pub fn iter(&self) -> impl Iterator<Item = DetectorFlag> + '_ {
        DetectorFlag::ALL.into_iter().filter(|f| self.contains(*f))
    }
}

impl From<DetectorFlag> for DetectorSet {
    fn from(flag: DetectorFlag) -> Self {
        DetectorSet { bits: flag.mask() }
    }
}

impl BitOr for DetectorFlag {
    type Output = DetectorSet;

    fn bitor(self, rhs: DetectorFlag) -> DetectorSet {
        DetectorSet::from(self).with(rhs)
    }
}

impl BitOr<DetectorFlag> for DetectorSet {
    type Output = DetectorSet;

    fn bitor(self, rhs: DetectorFlag) -> DetectorSet {
        self.with(rhs)
    }
}

impl BitOr for DetectorSet {
    type Output = DetectorSet;

    fn bitor(self, rhs: DetectorSet) -> DetectorSet {
        DetectorSet {
            bits: self.bits | rhs.bits,
        }
    }
}

impl Serialize for DetectorSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u16(self.bits)
    }
}

/// Matched weight per detector, indexed by flag bit position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DetectorWeights {
    slots: [u8; MAX_DETECTOR_WEIGHTS],
}

impl DetectorWeights {
    pub const fn new() -> Self {
        Self {
            slots: [0; MAX_DETECTOR_WEIGHTS],
        }
    }

    #[inline]
    pub fn set(&mut self, flag: DetectorFlag, weight: u8) {
        self.slots[flag.bit()] = weight;
    }

    #[inline]
    pub fn get(&self, flag: DetectorFlag) -> u8 {
        self.slots[flag.bit()]
    }

    pub fn as_array(&self) -> &[u8; MAX_DETECTOR_WEIGHTS] {
        &self.slots
    }
}

/// Result returned by every detector function. Stack-allocated, no heap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectorResult {
    pub matched: bool,
    /// Contribution to certainty when matched (0-100 scale).
    pub weight: u8,
    pub name: &'static str,
}

impl DetectorResult {
    pub const fn miss(weight: u8, name: &'static str) -> Self {
        Self {
            matched: false,
            weight,
            name,
        }
    }

    pub const fn hit(weight: u8, name: &'static str) -> Self {
        Self {
            matched: true,
            weight,
            name,
        }
    }

    pub const fn when(matched: bool, weight: u8, name: &'static str) -> Self {
        Self {
            matched,
            weight,
            name,
        }
    }
}

/// A stateless matcher over one event type.
pub type DetectorFn<E> = fn(&E) -> DetectorResult;

/// A registry entry pairs a matcher with its flag bit.
pub struct DetectorEntry<E> {
    pub evaluate: DetectorFn<E>,
    pub flag: DetectorFlag,
}

// Manual impls: derive would require `E: Clone`.
impl<E> Clone for DetectorEntry<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for DetectorEntry<E> {}

impl<E> core::fmt::Debug for DetectorEntry<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DetectorEntry")
            .field("flag", &self.flag)
            .finish()
    }
}

/// Ordered list of detectors for one radio type.
///
/// Order has no effect on scoring: matched weights are summed.
pub struct DetectorRegistry<E> {
    entries: Vec<DetectorEntry<E>, MAX_DETECTORS>,
}

impl<E> DetectorRegistry<E> {
    pub const fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Build from a static table. Entries past `MAX_DETECTORS` are dropped.
    pub fn from_entries(table: &[DetectorEntry<E>]) -> Self {
        let mut registry = Self::new();
        for entry in table.iter().take(MAX_DETECTORS) {
            let _ = registry.entries.push(*entry);
        }
        registry
    }

    /// Append a detector. Returns the entry back if the registry is full.
    pub fn register(
        &mut self,
        evaluate: DetectorFn<E>,
        flag: DetectorFlag,
    ) -> Result<(), DetectorEntry<E>> {
        self.entries.push(DetectorEntry { evaluate, flag })
    }

    pub fn entries(&self) -> &[DetectorEntry<E>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<E> Default for DetectorRegistry<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> core::fmt::Debug for DetectorRegistry<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.entries.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── DetectorSet ─────────────────────────────────────────────────

    #[test]
    fn set_empty_on_creation() {
        let set = DetectorSet::new();
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
        for flag in DetectorFlag::ALL {
            assert!(!set.contains(flag), "{} should be unset", flag.name());
        }
    }

    #[test]
    fn set_bits_match_flag_positions() {
        let set = DetectorFlag::SsidFormat | DetectorFlag::SurveillanceOui;
        assert_eq!(set.bits(), 0b1_0000_0001);
        assert!(set.contains(DetectorFlag::SsidFormat));
        assert!(set.contains(DetectorFlag::SurveillanceOui));
        assert!(!set.contains(DetectorFlag::FlockOui));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn set_insert_idempotent() {
        let mut set = DetectorSet::new();
        set.insert(DetectorFlag::MacOui);
        set.insert(DetectorFlag::MacOui);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn set_intersects() {
        let set = DetectorSet::from(DetectorFlag::FlockOui);
        assert!(set.intersects(DetectorFlag::SsidFormat | DetectorFlag::FlockOui));
        assert!(!set.intersects(DetectorFlag::SsidFormat | DetectorFlag::SsidKeyword));
        assert!(!DetectorSet::EMPTY.intersects(set));
    }

    #[test]
    fn set_iter_in_bit_order() {
        let set = DetectorFlag::SurveillanceOui | DetectorFlag::SsidKeyword | DetectorFlag::MacOui;
        let flags: Vec<DetectorFlag, 9> = set.iter().collect();
        assert_eq!(
            flags.as_slice(),
            &[
                DetectorFlag::SsidKeyword,
                DetectorFlag::MacOui,
                DetectorFlag::SurveillanceOui
            ]
        );
    }

    #[test]
    fn flag_bits_are_unique_and_in_range() {
        let mut seen = 0u16;
        for (i, flag) in DetectorFlag::ALL.iter().enumerate() {
            assert_eq!(flag.bit(), i);
            assert!(flag.bit() < MAX_DETECTOR_WEIGHTS);
            assert_eq!(seen & flag.mask(), 0);
            seen |= flag.mask();
        }
    }

    // ── DetectorWeights ─────────────────────────────────────────────

    #[test]
    fn weights_indexed_by_flag() {
        let mut w = DetectorWeights::new();
        w.set(DetectorFlag::SurveillanceOui, 30);
        w.set(DetectorFlag::SsidFormat, 75);
        assert_eq!(w.get(DetectorFlag::SurveillanceOui), 30);
        assert_eq!(w.get(DetectorFlag::SsidFormat), 75);
        assert_eq!(w.get(DetectorFlag::MacOui), 0);
        assert_eq!(w.as_array()[8], 30);
    }

    // ── DetectorRegistry ────────────────────────────────────────────

    fn always(_: &u8) -> DetectorResult {
        DetectorResult::hit(1, "always")
    }

    #[test]
    fn registry_rejects_past_capacity() {
        let mut reg = DetectorRegistry::<u8>::new();
        for _ in 0..MAX_DETECTORS {
            assert!(reg.register(always, DetectorFlag::MacOui).is_ok());
        }
        let rejected = reg.register(always, DetectorFlag::FlockOui);
        assert_eq!(rejected.map_err(|e| e.flag), Err(DetectorFlag::FlockOui));
        assert_eq!(reg.len(), MAX_DETECTORS);
    }

    #[test]
    fn registry_preserves_order() {
        let mut reg = DetectorRegistry::<u8>::new();
        reg.register(always, DetectorFlag::BleName).unwrap();
        reg.register(always, DetectorFlag::MacOui).unwrap();
        let flags: Vec<DetectorFlag, 2> = reg.entries().iter().map(|e| e.flag).collect();
        assert_eq!(flags.as_slice(), &[DetectorFlag::BleName, DetectorFlag::MacOui]);
        assert!((reg.entries()[0].evaluate)(&0).matched);
    }
}
