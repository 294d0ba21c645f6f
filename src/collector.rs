/// Radio collector adapters.
///
/// WiFi: raw 802.11 frames parsed with the ieee80211 crate.
/// BLE: raw advertisement data (AD structures) parsed by `BleAdvParser`.
///
/// Both produce `ScanEvent`s for the ingest queue, which the analyzer drains.
/// Everything here is safe to call from ISR context (no allocation, no blocking).
use core::fmt::Write;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::{Channel, TrySendError};
use log::trace;

use ieee80211::match_frames;
use ieee80211::mgmt_frame::{BeaconFrame, ProbeRequestFrame, ProbeResponseFrame};

use crate::event::{
    push_truncated, BleDevice, FrameType, MacAddr, MacFmt, ScanEvent, UuidString, WifiFrame,
};

/// Ingest queue depth.
pub const SCAN_QUEUE_DEPTH: usize = 16;

/// Bounded queue between radio callbacks and the analyzer.
///
/// Use `CriticalSectionRawMutex` when producers run in ISR or task context,
/// `NoopRawMutex` on a single thread.
pub type ScanQueue<M> = Channel<M, ScanEvent, SCAN_QUEUE_DEPTH>;

/// Non-blocking enqueue. A full queue hands the event back.
pub fn enqueue<M: RawMutex, const Q: usize>(
    queue: &Channel<M, ScanEvent, Q>,
    event: ScanEvent,
) -> Result<(), ScanEvent> {
    queue.try_send(event).map_err(|TrySendError::Full(event)| {
        trace!("scan queue full, dropping {}", MacFmt(event.mac()));
        event
    })
}

/// Bytes of the 802.11 MAC header up to and including Address 2.
const ADDR2: core::ops::Range<usize> = 10..16;

/// Turn a raw 802.11 frame into a `WifiFrame`.
///
/// Beacons and probes carry an SSID element, which `ieee80211` decodes. Any
/// other frame still names its transmitter in Address 2, which is enough for
/// the OUI detectors, so it is kept with an empty SSID. Frames too short to
/// hold Address 2 are dropped.
pub fn parse_wifi_frame(frame: &[u8], rssi: i8, channel: u8) -> Option<WifiFrame> {
    let managed = match_frames! {
        frame,
        beacon = BeaconFrame<'_> => { (
            beacon.header.transmitter_address.0,
            beacon.body.ssid(),
            FrameType::Beacon,
        ) }
        probe_req = ProbeRequestFrame<'_> => { (
            probe_req.header.transmitter_address.0,
            probe_req.body.ssid(),
            FrameType::ProbeRequest,
        ) }
        probe_resp = ProbeResponseFrame<'_> => { (
            probe_resp.header.transmitter_address.0,
            probe_resp.body.ssid(),
            FrameType::ProbeResponse,
        ) }
    };

    let (mac, ssid, frame_type) = match managed {
        Ok((mac, ssid, frame_type)) => (mac, ssid.unwrap_or(""), frame_type),
        Err(_) => {
            let mac: MacAddr = frame.get(ADDR2)?.try_into().ok()?;
            (mac, "", header_frame_type(frame[0]))
        }
    };

    // Some APs hide their SSID as a run of NUL bytes instead of a zero-length element
    Some(WifiFrame::new(mac, ssid.trim_end_matches('\0'), rssi, channel, frame_type))
}

/// Frame type from the first frame-control byte (bits 2-3).
fn header_frame_type(fc0: u8) -> FrameType {
    if (fc0 >> 2) & 0b11 == 0b10 {
        FrameType::Data
    } else {
        FrameType::Other
    }
}

/// Parse a frame and enqueue it. Returns false if the frame was unparseable
/// or the queue was full.
pub fn on_wifi_frame<M: RawMutex, const Q: usize>(
    queue: &Channel<M, ScanEvent, Q>,
    frame: &[u8],
    rssi: i8,
    channel: u8,
) -> bool {
    match parse_wifi_frame(frame, rssi, channel) {
        Some(event) => enqueue(queue, ScanEvent::WiFi(event)).is_ok(),
        None => false,
    }
}

/// Bluetooth Base UUID, 00000000-0000-1000-8000-00805f9b34fb, big-endian.
const BASE_UUID: [u8; 16] = [
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x10, 0x00, 0x80, 0x00, 0x00, 0x80, 0x5F, 0x9B, 0x34, 0xFB,
];

/// Format 16 big-endian bytes as canonical lowercase UUID text.
pub fn format_uuid(uuid: &[u8; 16]) -> UuidString {
    let mut s = UuidString::new();
    for (i, b) in uuid.iter().enumerate() {
        if matches!(i, 4 | 6 | 8 | 10) {
            let _ = s.push('-');
        }
        let _ = write!(s, "{:02x}", b);
    }
    s
}

/// Expand a little-endian 16-, 32- or 128-bit UUID from an AD structure.
fn uuid_from_le(data: &[u8]) -> Option<UuidString> {
    let mut uuid = BASE_UUID;
    match data.len() {
        2 | 4 => {
            let start = 4 - data.len();
            for (dst, src) in uuid[start..4].iter_mut().zip(data.iter().rev()) {
                *dst = *src;
            }
        }
        16 => {
            for (dst, src) in uuid.iter_mut().zip(data.iter().rev()) {
                *dst = *src;
            }
        }
        _ => return None,
    }
    Some(format_uuid(&uuid))
}

/// Parse BLE advertisement data (AD structures) into a `BleDevice`.
///
/// AD structure format: [length] [type] [data...]
/// Types we care about:
///   0x02/0x03 = Incomplete/Complete list of 16-bit service UUIDs
///   0x04/0x05 = Incomplete/Complete list of 32-bit service UUIDs
///   0x06/0x07 = Incomplete/Complete list of 128-bit service UUIDs
///   0x08/0x09 = Shortened/Complete local name
///
/// Only the first advertised service UUID is kept.
pub struct BleAdvParser;

impl BleAdvParser {
    pub fn parse(addr: &MacAddr, rssi: i8, ad_data: &[u8]) -> BleDevice {
        let mut device = BleDevice::new(*addr, "", rssi);

        let mut pos = 0;
        while pos < ad_data.len() {
            let len = ad_data[pos] as usize;
            if len == 0 || pos + 1 + len > ad_data.len() {
                break;
            }

            let ad_type = ad_data[pos + 1];
            let data = &ad_data[pos + 2..pos + 1 + len];

            match ad_type {
                0x02 | 0x03 => Self::take_first_uuid(&mut device, data, 2),
                0x04 | 0x05 => Self::take_first_uuid(&mut device, data, 4),
                0x06 | 0x07 => Self::take_first_uuid(&mut device, data, 16),
                // Complete name wins over a shortened one
                0x08 | 0x09 if ad_type == 0x09 || device.name.is_empty() => {
                    device.name.clear();
                    push_truncated(&mut device.name, utf8_prefix(data));
                }
                _ => {}
            }

            pos += 1 + len;
        }

        device
    }

    fn take_first_uuid(device: &mut BleDevice, data: &[u8], width: usize) {
        if device.service_uuid.is_none() {
            device.service_uuid = data.chunks_exact(width).next().and_then(uuid_from_le);
        }
    }
}

/// Longest valid UTF-8 prefix of `data`.
fn utf8_prefix(data: &[u8]) -> &str {
    match core::str::from_utf8(data) {
        Ok(s) => s,
        Err(e) => core::str::from_utf8(&data[..e.valid_up_to()]).unwrap_or(""),
    }
}

/// Parse an advertisement and enqueue it. Returns false if the queue was full.
pub fn on_ble_advertisement<M: RawMutex, const Q: usize>(
    queue: &Channel<M, ScanEvent, Q>,
    addr: &MacAddr,
    rssi: i8,
    ad_data: &[u8],
) -> bool {
    let device = BleAdvParser::parse(addr, rssi, ad_data);
    enqueue(queue, ScanEvent::Ble(device)).is_ok()
}
