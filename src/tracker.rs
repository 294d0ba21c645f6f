/// Device presence tracking: per-MAC lifecycle over a fixed slot table.
///
/// Each slot walks `Empty → NewDetect → InRange → Departed`. A departed slot
/// is never matched by address again; a returning device gets a fresh slot
/// and reads as a first sighting. When the table is full, the oldest departed
/// slot is reused first, then the least recently seen slot overall.
use log::{debug, warn};

use crate::config::{DEVICE_TIMEOUT_MS, MAX_TRACKED_DEVICES};
use crate::event::{AlertLevel, MacAddr, MacFmt};

/// Lifecycle state of a tracker slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeviceState {
    #[default]
    Empty,
    /// Seen exactly once in the current episode.
    NewDetect,
    /// Seen two or more times in the current episode.
    InRange,
    /// Not seen within the staleness window.
    Departed,
}

impl DeviceState {
    /// NewDetect or InRange.
    pub fn is_active(&self) -> bool {
        matches!(self, DeviceState::NewDetect | DeviceState::InRange)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackedDevice {
    pub mac: MacAddr,
    pub first_seen_ms: u32,
    pub last_seen_ms: u32,
    /// Highest alert level seen during this episode.
    pub max_alert_level: AlertLevel,
    pub state: DeviceState,
}

impl TrackedDevice {
    pub const EMPTY: TrackedDevice = TrackedDevice {
        mac: [0; 6],
        first_seen_ms: 0,
        last_seen_ms: 0,
        max_alert_level: AlertLevel::None,
        state: DeviceState::Empty,
    };

    fn is_live(&self, mac: &MacAddr) -> bool {
        self.state.is_active() && self.mac == *mac
    }
}

/// Fixed-capacity presence tracker. `N` slots, O(N) per operation.
#[derive(Debug, Clone)]
pub struct DeviceTracker<const N: usize = MAX_TRACKED_DEVICES> {
    slots: [TrackedDevice; N],
    timeout_ms: u32,
}

impl<const N: usize> DeviceTracker<N> {
    pub const fn new(timeout_ms: u32) -> Self {
        Self {
            slots: [TrackedDevice::EMPTY; N],
            timeout_ms,
        }
    }

    /// Clear every slot.
    pub fn reset(&mut self) {
        self.slots = [TrackedDevice::EMPTY; N];
    }

    pub fn timeout_ms(&self) -> u32 {
        self.timeout_ms
    }

    pub fn set_timeout_ms(&mut self, timeout_ms: u32) {
        self.timeout_ms = timeout_ms;
    }

    /// Record a sighting and return the state the device was in *before* it.
    ///
    /// `Empty` means a new episode started.
    pub fn record_detection(&mut self, mac: &MacAddr, now_ms: u32, level: AlertLevel) -> DeviceState {
        if let Some(slot) = self.slots.iter_mut().find(|s| s.is_live(mac)) {
            let prev = slot.state;
            slot.last_seen_ms = now_ms;
            slot.state = DeviceState::InRange;
            if level > slot.max_alert_level {
                slot.max_alert_level = level;
            }
            return prev;
        }

        let Some(idx) = self.allocate_slot(now_ms) else {
            // Zero-capacity tracker
            return DeviceState::Empty;
        };
        self.slots[idx] = TrackedDevice {
            mac: *mac,
            first_seen_ms: now_ms,
            last_seen_ms: now_ms,
            max_alert_level: level,
            state: DeviceState::NewDetect,
        };
        DeviceState::Empty
    }

    /// Empty first, then the oldest departed, then global LRU.
    fn allocate_slot(&self, now_ms: u32) -> Option<usize> {
        if let Some(idx) = self.slots.iter().position(|s| s.state == DeviceState::Empty) {
            return Some(idx);
        }

        let age = |s: &TrackedDevice| now_ms.wrapping_sub(s.last_seen_ms);

        let departed = self
            .slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.state == DeviceState::Departed)
            .max_by(|(ia, a), (ib, b)| age(a).cmp(&age(b)).then(ib.cmp(ia)))
            .map(|(idx, _)| idx);
        if departed.is_some() {
            return departed;
        }

        let (idx, victim) = self
            .slots
            .iter()
            .enumerate()
            .max_by(|(ia, a), (ib, b)| age(a).cmp(&age(b)).then(ib.cmp(ia)))?;
        warn!("tracker full, evicting {} ({:?})", MacFmt(&victim.mac), victim.state);
        Some(idx)
    }

    /// Mark active slots unseen for longer than the timeout as departed.
    pub fn tick(&mut self, now_ms: u32) {
        let timeout = self.timeout_ms;
        for slot in self.slots.iter_mut().filter(|s| s.state.is_active()) {
            if now_ms.wrapping_sub(slot.last_seen_ms) > timeout {
                slot.state = DeviceState::Departed;
                debug!("departed {}", MacFmt(&slot.mac));
            }
        }
    }

    /// Any device in range with a max level of Suspicious or higher.
    pub fn has_high_confidence_in_range(&self) -> bool {
        self.slots
            .iter()
            .any(|s| s.state == DeviceState::InRange && s.max_alert_level >= AlertLevel::Suspicious)
    }

    /// The live (not departed) slot for `mac`.
    pub fn get(&self, mac: &MacAddr) -> Option<&TrackedDevice> {
        self.slots.iter().find(|s| s.is_live(mac))
    }

    /// Occupied slots, departed included.
    pub fn iter(&self) -> impl Iterator<Item = &TrackedDevice> {
        self.slots.iter().filter(|s| s.state != DeviceState::Empty)
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn in_range_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| s.state == DeviceState::InRange)
            .count()
    }

    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<const N: usize> Default for DeviceTracker<N> {
    fn default() -> Self {
        Self::new(DEVICE_TIMEOUT_MS)
    }
}
