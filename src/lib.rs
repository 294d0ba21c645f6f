//! FlockSquawk library: portable surveillance-hardware threat engine.
//!
//! Classifies observed WiFi frames and BLE advertisements as likely
//! surveillance devices (license-plate cameras, acoustic gunshot detectors,
//! and their support hardware). Each observation is run through a per-radio
//! registry of weighted detectors, scored, assigned an alert tier from the
//! set of matched detectors, and tracked per MAC address so that a device
//! alerts once per presence episode.
//!
//! The crate has no platform dependencies and is testable on any host with
//! `cargo test`. Platform binaries provide radio access (feeding the
//! `collector` adapters) and output sinks (consuming `telemetry`).
//!
//! Data flow:
//! - `collector` parses raw frames into `ScanEvent`s and queues them.
//! - `analyzer` drains the queue: `score` → `classify` → `tracker`.
//! - `ThreatEvent`s go to a `ThreatSink`; `telemetry` encodes them as NDJSON.
//!
//! `no_std`, no allocator. All collections are fixed-capacity `heapless` types.

#![cfg_attr(not(test), no_std)]

pub mod analyzer;
pub mod classify;
pub mod collector;
pub mod config;
pub mod detector;
pub mod detectors;
pub mod event;
pub mod score;
pub mod signatures;
pub mod telemetry;
pub mod tracker;

pub use analyzer::{ThreatAnalyzer, ThreatSink};
pub use config::AnalyzerConfig;
pub use detector::{DetectorFlag, DetectorRegistry, DetectorSet, DetectorWeights};
pub use event::{
    AlertLevel, BleDevice, FrameType, MacAddr, RadioType, ScanEvent, ThreatCategory, ThreatEvent,
    WifiFrame,
};
pub use tracker::{DeviceState, DeviceTracker};
