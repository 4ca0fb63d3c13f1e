//! Raw I/Q sample streams.
//!
//! The rawest recording output is headerless: back-to-back little-endian
//! 16-bit I/Q pairs, one pair per tuner. Nothing in the bytes says how many
//! tuners there were; the caller has to know.

use std::io::Read;

use crate::error::DecodeError;
use crate::read::{read_full, Fill};

/// Number of interleaved tuner streams in a raw recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channels {
    Single,
    Dual,
}

impl Channels {
    /// Frame width in bytes: two i16 values per tuner.
    pub fn frame_len(self) -> usize {
        match self {
            Channels::Single => 4,
            Channels::Dual => 8,
        }
    }
}

/// One frame of a raw sample stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleFrame {
    Single { i: i16, q: i16 },
    Dual { i_a: i16, q_a: i16, i_b: i16, q_b: i16 },
}

/// Pulls fixed-width sample frames off a raw stream.
pub struct SampleReader<R> {
    inner: R,
    channels: Channels,
}

impl<R: Read> SampleReader<R> {
    pub fn new(inner: R, channels: Channels) -> Self {
        Self { inner, channels }
    }

    /// The next frame, or `Ok(None)` at a clean end of the stream. The
    /// stream must end on a frame boundary; a trailing partial frame is a
    /// truncation error.
    pub fn next_frame(&mut self) -> Result<Option<SampleFrame>, DecodeError> {
        let len = self.channels.frame_len();
        let mut raw = [0u8; 8];
        match read_full(&mut self.inner, &mut raw[..len])? {
            Fill::Full => {}
            Fill::Eof => return Ok(None),
            Fill::Short(got) => {
                return Err(DecodeError::TruncatedRecord { expected: len, got })
            }
        }
        let frame = match self.channels {
            Channels::Single => SampleFrame::Single {
                i: i16::from_le_bytes([raw[0], raw[1]]),
                q: i16::from_le_bytes([raw[2], raw[3]]),
            },
            Channels::Dual => SampleFrame::Dual {
                i_a: i16::from_le_bytes([raw[0], raw[1]]),
                q_a: i16::from_le_bytes([raw[2], raw[3]]),
                i_b: i16::from_le_bytes([raw[4], raw[5]]),
                q_b: i16::from_le_bytes([raw[6], raw[7]]),
            },
        };
        Ok(Some(frame))
    }
}

/// Running min/max of one tuner's I and Q values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IqRange {
    pub i_min: i16,
    pub i_max: i16,
    pub q_min: i16,
    pub q_max: i16,
}

impl IqRange {
    /// Starts inverted (min at `i16::MAX`, max at `i16::MIN`) so the first
    /// sample snaps both ends into place.
    fn new() -> Self {
        Self {
            i_min: i16::MAX,
            i_max: i16::MIN,
            q_min: i16::MAX,
            q_max: i16::MIN,
        }
    }

    fn update(&mut self, i: i16, q: i16) {
        self.i_min = self.i_min.min(i);
        self.i_max = self.i_max.max(i);
        self.q_min = self.q_min.min(q);
        self.q_max = self.q_max.max(q);
    }
}

/// Fold of a raw sample stream: frame count plus per-tuner value ranges.
///
/// The accumulator is explicit so callers drive it: create one, feed it
/// every frame, read the fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleStats {
    pub frames: u64,
    /// Tuner A (the only tuner, for single-channel streams).
    pub a: IqRange,
    /// Tuner B, present for dual-channel streams.
    pub b: Option<IqRange>,
}

impl SampleStats {
    pub fn new(channels: Channels) -> Self {
        Self {
            frames: 0,
            a: IqRange::new(),
            b: match channels {
                Channels::Single => None,
                Channels::Dual => Some(IqRange::new()),
            },
        }
    }

    pub fn update(&mut self, frame: &SampleFrame) {
        self.frames += 1;
        match *frame {
            SampleFrame::Single { i, q } => self.a.update(i, q),
            SampleFrame::Dual { i_a, q_a, i_b, q_b } => {
                self.a.update(i_a, q_a);
                self.b.get_or_insert_with(IqRange::new).update(i_b, q_b);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_track_single_channel_extremes() {
        let mut stats = SampleStats::new(Channels::Single);
        stats.update(&SampleFrame::Single { i: -5, q: 7 });
        stats.update(&SampleFrame::Single { i: 3, q: -2 });
        assert_eq!(stats.frames, 2);
        assert_eq!(stats.a.i_min, -5);
        assert_eq!(stats.a.i_max, 3);
        assert_eq!(stats.a.q_min, -2);
        assert_eq!(stats.a.q_max, 7);
        assert!(stats.b.is_none());
    }

    #[test]
    fn dual_stats_start_with_inverted_ranges() {
        let stats = SampleStats::new(Channels::Dual);
        assert_eq!(stats.frames, 0);
        assert_eq!(stats.a.i_min, i16::MAX);
        assert_eq!(stats.a.i_max, i16::MIN);
        assert_eq!(stats.b, Some(stats.a));
    }

    #[test]
    fn dual_stats_track_each_tuner_separately() {
        let mut stats = SampleStats::new(Channels::Dual);
        stats.update(&SampleFrame::Dual {
            i_a: 10,
            q_a: -10,
            i_b: 200,
            q_b: -200,
        });
        assert_eq!(stats.a.i_max, 10);
        let b = stats.b.unwrap();
        assert_eq!(b.i_max, 200);
        assert_eq!(b.q_min, -200);
    }
}
