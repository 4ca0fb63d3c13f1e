//! Gain-change log decoding.
//!
//! Recorders can log every AGC gain adjustment to a sidecar file next to the
//! recording: fixed 16-byte records, no header, no footer. All fields are
//! little-endian, matching every platform these files are produced on.

use std::io::Read;

use crate::error::DecodeError;
use crate::read::{read_full, Fill};

/// One automatic-gain-control adjustment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GainChangeEvent {
    /// Stream position, in samples, at which the change took effect.
    pub sample_num: u64,
    /// Gain after the change, in dB.
    pub current_gain: f32,
    /// Tuner index, 0 or 1.
    pub tuner: u8,
    /// IF gain reduction in dB.
    pub gain_reduction_db: u8,
    /// LNA gain reduction in dB.
    pub lna_gain_reduction_db: u8,
}

impl GainChangeEvent {
    /// On-disk record width: the fields plus one trailing pad byte.
    pub const RECORD_LEN: usize = 16;

    pub fn from_bytes(raw: &[u8; 16]) -> Self {
        Self {
            sample_num: u64::from_le_bytes([
                raw[0], raw[1], raw[2], raw[3], raw[4], raw[5], raw[6], raw[7],
            ]),
            current_gain: f32::from_le_bytes([raw[8], raw[9], raw[10], raw[11]]),
            tuner: raw[12],
            gain_reduction_db: raw[13],
            lna_gain_reduction_db: raw[14],
        }
    }

    pub fn to_bytes(&self) -> [u8; 16] {
        let mut raw = [0u8; 16];
        raw[0..8].copy_from_slice(&self.sample_num.to_le_bytes());
        raw[8..12].copy_from_slice(&self.current_gain.to_le_bytes());
        raw[12] = self.tuner;
        raw[13] = self.gain_reduction_db;
        raw[14] = self.lna_gain_reduction_db;
        raw
    }
}

/// Pulls gain-change events off a log stream.
pub struct GainLogReader<R> {
    inner: R,
}

impl<R: Read> GainLogReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// The next event, or `Ok(None)` at a clean end of the log.
    ///
    /// A log that ends off a 16-byte boundary is truncated: no partial event
    /// is returned, and what to do about the tail is the caller's call.
    pub fn next_event(&mut self) -> Result<Option<GainChangeEvent>, DecodeError> {
        let mut raw = [0u8; GainChangeEvent::RECORD_LEN];
        match read_full(&mut self.inner, &mut raw)? {
            Fill::Full => Ok(Some(GainChangeEvent::from_bytes(&raw))),
            Fill::Eof => Ok(None),
            Fill::Short(got) => Err(DecodeError::TruncatedRecord {
                expected: GainChangeEvent::RECORD_LEN,
                got,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_round_trips() {
        let event = GainChangeEvent {
            sample_num: 123_456_789_012,
            current_gain: 38.25,
            tuner: 1,
            gain_reduction_db: 40,
            lna_gain_reduction_db: 24,
        };
        let raw = event.to_bytes();
        assert_eq!(GainChangeEvent::from_bytes(&raw), event);
        // byte 15 is padding and stays zero
        assert_eq!(raw[15], 0);
    }
}
