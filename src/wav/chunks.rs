//! Chunk body decoders and the tag dispatch table.
//!
//! All multi-byte fields are little-endian. Each decoder takes raw body
//! bytes already pulled off the stream by the walker; a body whose length
//! does not fit its tag never aborts anything, it just stays undecoded.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use super::FourCc;

fn u16_at(raw: &[u8], off: usize) -> u16 {
    u16::from_le_bytes([raw[off], raw[off + 1]])
}

fn u32_at(raw: &[u8], off: usize) -> u32 {
    u32::from_le_bytes([raw[off], raw[off + 1], raw[off + 2], raw[off + 3]])
}

/// 64-bit values are stored as (low, high) u32 pairs.
fn combine(lo: u32, hi: u32) -> u64 {
    (hi as u64) << 32 | lo as u64
}

fn split(value: u64) -> (u32, u32) {
    (value as u32, (value >> 32) as u32)
}

/// Strip the trailing NUL padding from a fixed-width text field.
fn trim_nul(raw: &[u8]) -> &[u8] {
    let end = raw.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    &raw[..end]
}

/// The `fmt ` chunk: how the sample payload is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatChunk {
    pub format_code: u16,
    pub channels: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,
}

impl FormatChunk {
    pub const BODY_LEN: usize = 16;

    /// Decode a 16-byte `fmt ` body; `None` for any other length.
    pub fn from_bytes(raw: &[u8]) -> Option<Self> {
        if raw.len() != Self::BODY_LEN {
            return None;
        }
        Some(Self {
            format_code: u16_at(raw, 0),
            channels: u16_at(raw, 2),
            sample_rate: u32_at(raw, 4),
            byte_rate: u32_at(raw, 8),
            block_align: u16_at(raw, 12),
            bits_per_sample: u16_at(raw, 14),
        })
    }

    pub fn to_bytes(&self) -> [u8; 16] {
        let mut raw = [0u8; 16];
        raw[0..2].copy_from_slice(&self.format_code.to_le_bytes());
        raw[2..4].copy_from_slice(&self.channels.to_le_bytes());
        raw[4..8].copy_from_slice(&self.sample_rate.to_le_bytes());
        raw[8..12].copy_from_slice(&self.byte_rate.to_le_bytes());
        raw[12..14].copy_from_slice(&self.block_align.to_le_bytes());
        raw[14..16].copy_from_slice(&self.bits_per_sample.to_le_bytes());
        raw
    }

    /// Name of the format code, for the well-known ones.
    pub fn format_name(&self) -> Option<&'static str> {
        match self.format_code {
            1 => Some("PCM"),
            3 => Some("IEEE float"),
            6 => Some("A-law"),
            7 => Some("mu-law"),
            0xFFFE => Some("extensible"),
            _ => None,
        }
    }
}

/// The RF64 `ds64` chunk.
///
/// When a recording outgrows the 32-bit RIFF size fields the writer flips
/// the container id to `RF64`, stores `0xFFFFFFFF` in the affected size
/// fields and puts the real values here. These supersede the sentinel-marked
/// sizes in the outer header and the eventual `data` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ds64Chunk {
    pub riff_size: u64,
    pub data_size: u64,
    pub sample_count: u64,
    /// Entry count of the optional per-chunk size table. The writers covered
    /// here always leave it at zero.
    pub table_length: u32,
}

impl Ds64Chunk {
    pub const BODY_LEN: usize = 28;

    /// Decode a 28-byte `ds64` body; `None` for any other length.
    pub fn from_bytes(raw: &[u8]) -> Option<Self> {
        if raw.len() != Self::BODY_LEN {
            return None;
        }
        Some(Self {
            riff_size: combine(u32_at(raw, 0), u32_at(raw, 4)),
            data_size: combine(u32_at(raw, 8), u32_at(raw, 12)),
            sample_count: combine(u32_at(raw, 16), u32_at(raw, 20)),
            table_length: u32_at(raw, 24),
        })
    }

    pub fn to_bytes(&self) -> [u8; 28] {
        let mut raw = [0u8; 28];
        let (lo, hi) = split(self.riff_size);
        raw[0..4].copy_from_slice(&lo.to_le_bytes());
        raw[4..8].copy_from_slice(&hi.to_le_bytes());
        let (lo, hi) = split(self.data_size);
        raw[8..12].copy_from_slice(&lo.to_le_bytes());
        raw[12..16].copy_from_slice(&hi.to_le_bytes());
        let (lo, hi) = split(self.sample_count);
        raw[16..20].copy_from_slice(&lo.to_le_bytes());
        raw[20..24].copy_from_slice(&hi.to_le_bytes());
        raw[24..28].copy_from_slice(&self.table_length.to_le_bytes());
        raw
    }
}

/// Wall-clock timestamp in the layout the `auxi` chunk uses (the Windows
/// SYSTEMTIME structure): eight u16 fields, UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CivilTime {
    pub year: u16,
    pub month: u16,
    /// Carried in the file but not part of the instant.
    pub day_of_week: u16,
    pub day: u16,
    pub hour: u16,
    pub minute: u16,
    pub second: u16,
    pub millisecond: u16,
}

impl CivilTime {
    pub const LEN: usize = 16;

    fn read_at(raw: &[u8], off: usize) -> Self {
        Self {
            year: u16_at(raw, off),
            month: u16_at(raw, off + 2),
            day_of_week: u16_at(raw, off + 4),
            day: u16_at(raw, off + 6),
            hour: u16_at(raw, off + 8),
            minute: u16_at(raw, off + 10),
            second: u16_at(raw, off + 12),
            millisecond: u16_at(raw, off + 14),
        }
    }

    pub fn to_bytes(&self) -> [u8; 16] {
        let mut raw = [0u8; 16];
        let fields = [
            self.year,
            self.month,
            self.day_of_week,
            self.day,
            self.hour,
            self.minute,
            self.second,
            self.millisecond,
        ];
        for (i, field) in fields.into_iter().enumerate() {
            raw[i * 2..i * 2 + 2].copy_from_slice(&field.to_le_bytes());
        }
        raw
    }

    /// Convert to a UTC instant.
    ///
    /// Returns `None` when the fields do not form a real date. Recorders
    /// write an all-zero timestamp as a placeholder and only fill it in when
    /// the file is finalized, so an unfinished recording shows up as `None`
    /// rather than a failure. `day_of_week` is ignored.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        let date = NaiveDate::from_ymd_opt(self.year as i32, self.month as u32, self.day as u32)?;
        let time = date.and_hms_milli_opt(
            self.hour as u32,
            self.minute as u32,
            self.second as u32,
            self.millisecond as u32,
        )?;
        Some(Utc.from_utc_datetime(&time))
    }
}

/// The fixed field block shared by both `auxi` layouts: acquisition
/// timestamps followed by the tuning parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuxiInfo {
    pub start_time: CivilTime,
    pub stop_time: CivilTime,
    /// Center frequency in Hz.
    pub center_freq: u32,
    pub ad_frequency: u32,
    pub if_frequency: u32,
    pub bandwidth: u32,
    pub iq_offset: u32,
    pub db_offset: u32,
    pub max_val: u32,
    /// Spare field; rsp-recorder stores the initial tuner A gain here, in
    /// thousandths of a dB.
    pub unused4: u32,
    /// Spare field; tuner B gain for dual-tuner recordings, same scale.
    pub unused5: u32,
}

impl AuxiInfo {
    pub const LEN: usize = 68;

    fn read_at(raw: &[u8], off: usize) -> Self {
        Self {
            start_time: CivilTime::read_at(raw, off),
            stop_time: CivilTime::read_at(raw, off + CivilTime::LEN),
            center_freq: u32_at(raw, off + 32),
            ad_frequency: u32_at(raw, off + 36),
            if_frequency: u32_at(raw, off + 40),
            bandwidth: u32_at(raw, off + 44),
            iq_offset: u32_at(raw, off + 48),
            db_offset: u32_at(raw, off + 52),
            max_val: u32_at(raw, off + 56),
            unused4: u32_at(raw, off + 60),
            unused5: u32_at(raw, off + 64),
        }
    }

    pub fn to_bytes(&self) -> [u8; 68] {
        let mut raw = [0u8; 68];
        raw[0..16].copy_from_slice(&self.start_time.to_bytes());
        raw[16..32].copy_from_slice(&self.stop_time.to_bytes());
        let fields = [
            self.center_freq,
            self.ad_frequency,
            self.if_frequency,
            self.bandwidth,
            self.iq_offset,
            self.db_offset,
            self.max_val,
            self.unused4,
            self.unused5,
        ];
        for (i, field) in fields.into_iter().enumerate() {
            raw[32 + i * 4..36 + i * 4].copy_from_slice(&field.to_le_bytes());
        }
        raw
    }
}

/// Acquisition metadata from the `auxi` chunk.
///
/// Two incompatible encodings of this chunk exist in the wild, and nothing
/// but the declared body size tells them apart: the 164-byte layout written
/// by SDRuno appends a fixed-width "next file" name to the shared fields,
/// the 68-byte one stops after them. Consumers that only need the shared
/// fields can stay variant-blind through [`info`](AuxiChunk::info).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuxiChunk {
    /// 164-byte layout (SDRuno and related SDRplay tools).
    Sdrplay { info: AuxiInfo, next_file: String },
    /// 68-byte layout (rsp-recorder, SDRconnect).
    Franco(AuxiInfo),
}

impl AuxiChunk {
    pub const SDRPLAY_BODY_LEN: usize = AuxiInfo::LEN + 96;
    pub const FRANCO_BODY_LEN: usize = AuxiInfo::LEN;

    /// Decode an `auxi` body, picking the layout by its exact size. Other
    /// sizes belong to other vendors' uses of the tag and decode to `None`.
    pub fn from_bytes(raw: &[u8]) -> Option<Self> {
        match raw.len() {
            Self::SDRPLAY_BODY_LEN => Some(AuxiChunk::Sdrplay {
                info: AuxiInfo::read_at(raw, 0),
                next_file: String::from_utf8_lossy(trim_nul(&raw[AuxiInfo::LEN..])).into_owned(),
            }),
            Self::FRANCO_BODY_LEN => Some(AuxiChunk::Franco(AuxiInfo::read_at(raw, 0))),
            _ => None,
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            AuxiChunk::Sdrplay { info, next_file } => {
                let mut raw = vec![0u8; Self::SDRPLAY_BODY_LEN];
                raw[..AuxiInfo::LEN].copy_from_slice(&info.to_bytes());
                let name = next_file.as_bytes();
                let n = name.len().min(96);
                raw[AuxiInfo::LEN..AuxiInfo::LEN + n].copy_from_slice(&name[..n]);
                raw
            }
            AuxiChunk::Franco(info) => info.to_bytes().to_vec(),
        }
    }

    /// The fields shared by both layouts.
    pub fn info(&self) -> &AuxiInfo {
        match self {
            AuxiChunk::Sdrplay { info, .. } => info,
            AuxiChunk::Franco(info) => info,
        }
    }

    /// Name of the next file of a split recording, when the layout has one.
    pub fn next_file(&self) -> Option<&str> {
        match self {
            AuxiChunk::Sdrplay { next_file, .. } => Some(next_file),
            AuxiChunk::Franco(_) => None,
        }
    }
}

/// One entry of the `r64m` marker chunk: a labelled position in the sample
/// stream, written at a fixed interval so long recordings can be lined up
/// with wall-clock time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    pub flags: u32,
    pub sample_offset: u64,
    pub byte_offset: u64,
    /// Fixed-width text, trailing NULs trimmed. rsp-recorder stores an
    /// RFC 3339 timestamp here.
    pub label: String,
}

impl Marker {
    pub const ENTRY_LEN: usize = 320;

    /// Decode one 320-byte marker entry; `None` for any other length.
    pub fn from_bytes(raw: &[u8]) -> Option<Self> {
        if raw.len() != Self::ENTRY_LEN {
            return None;
        }
        Some(Self {
            flags: u32_at(raw, 0),
            sample_offset: combine(u32_at(raw, 4), u32_at(raw, 8)),
            byte_offset: combine(u32_at(raw, 12), u32_at(raw, 16)),
            // bytes 20..28 hold an intra-sample offset no known writer uses;
            // the tail (label chunk id, GUID, user data) is ignored too
            label: String::from_utf8_lossy(trim_nul(&raw[28..284])).into_owned(),
        })
    }

    pub fn to_bytes(&self) -> [u8; 320] {
        let mut raw = [0u8; 320];
        raw[0..4].copy_from_slice(&self.flags.to_le_bytes());
        let (lo, hi) = split(self.sample_offset);
        raw[4..8].copy_from_slice(&lo.to_le_bytes());
        raw[8..12].copy_from_slice(&hi.to_le_bytes());
        let (lo, hi) = split(self.byte_offset);
        raw[12..16].copy_from_slice(&lo.to_le_bytes());
        raw[16..20].copy_from_slice(&hi.to_le_bytes());
        let label = self.label.as_bytes();
        let n = label.len().min(256);
        raw[28..28 + n].copy_from_slice(&label[..n]);
        raw
    }
}

/// Decoded body of one non-`data` chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkBody {
    Format(FormatChunk),
    Ds64(Ds64Chunk),
    Auxi(AuxiChunk),
    Markers(Vec<Marker>),
    /// `JUNK`: recognized and intentionally content-free. Writers reserve
    /// space with it (a 28-byte JUNK is a `ds64` placeholder).
    Junk,
    /// A known tag with a body length its decoder cannot accept. The body
    /// was still consumed, so the walk stays synchronized.
    BadLength {
        id: FourCc,
        expected: usize,
        actual: usize,
    },
    /// An unrecognized tag. Unknown chunks never abort the walk.
    Skipped,
}

/// Route a chunk body to the decoder for its tag.
pub fn decode_body(id: FourCc, body: &[u8]) -> ChunkBody {
    match id {
        FourCc::FMT => match FormatChunk::from_bytes(body) {
            Some(format) => ChunkBody::Format(format),
            None => ChunkBody::BadLength {
                id,
                expected: FormatChunk::BODY_LEN,
                actual: body.len(),
            },
        },
        FourCc::DS64 => match Ds64Chunk::from_bytes(body) {
            Some(ds64) => ChunkBody::Ds64(ds64),
            None => ChunkBody::BadLength {
                id,
                expected: Ds64Chunk::BODY_LEN,
                actual: body.len(),
            },
        },
        FourCc::AUXI => match AuxiChunk::from_bytes(body) {
            Some(auxi) => ChunkBody::Auxi(auxi),
            None => ChunkBody::Skipped,
        },
        FourCc::R64M => match decode_markers(body) {
            Some(markers) => ChunkBody::Markers(markers),
            None => ChunkBody::Skipped,
        },
        FourCc::JUNK => ChunkBody::Junk,
        _ => ChunkBody::Skipped,
    }
}

/// An `r64m` body is an array of 320-byte entries; anything else is left
/// undecoded like an unknown tag.
fn decode_markers(body: &[u8]) -> Option<Vec<Marker>> {
    if body.is_empty() || body.len() % Marker::ENTRY_LEN != 0 {
        return None;
    }
    body.chunks_exact(Marker::ENTRY_LEN)
        .map(Marker::from_bytes)
        .collect()
}
