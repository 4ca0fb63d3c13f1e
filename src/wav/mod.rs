//! RIFF/RF64 WAVE container walking.
//!
//! SDR recording tools write I/Q data as WAV files with vendor metadata
//! chunks in front of an often enormous `data` chunk. [`WavReader`] walks
//! that chunk sequence without ever loading the sample payload: callers pull
//! [`ChunkEvent`]s one at a time until the `data` chunk, garbage bytes, or
//! the end of the stream.

pub mod chunks;

use std::fmt;
use std::io::Read;

use crate::error::DecodeError;
use crate::read::{read_full, Fill};

pub use chunks::{AuxiChunk, AuxiInfo, ChunkBody, CivilTime, Ds64Chunk, FormatChunk, Marker};

/// A four-character chunk tag.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct FourCc(pub [u8; 4]);

impl FourCc {
    pub const RIFF: FourCc = FourCc(*b"RIFF");
    pub const RF64: FourCc = FourCc(*b"RF64");
    pub const WAVE: FourCc = FourCc(*b"WAVE");
    pub const FMT: FourCc = FourCc(*b"fmt ");
    pub const DATA: FourCc = FourCc(*b"data");
    pub const DS64: FourCc = FourCc(*b"ds64");
    pub const AUXI: FourCc = FourCc(*b"auxi");
    pub const JUNK: FourCc = FourCc(*b"JUNK");
    pub const R64M: FourCc = FourCc(*b"r64m");

    /// Whether all four bytes are printable ASCII (0x20..=0x7E). A tag that
    /// is not means the walk has lost synchronization with the file.
    pub fn is_printable(&self) -> bool {
        self.0.iter().all(|b| (0x20..=0x7e).contains(b))
    }
}

impl fmt::Display for FourCc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            if (0x20..=0x7e).contains(&b) {
                write!(f, "{}", b as char)?;
            } else {
                write!(f, "\\x{:02x}", b)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for FourCc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FourCc({})", self)
    }
}

/// A 32-bit size field from a chunk header.
///
/// RF64 writers store `0xFFFFFFFF` here when the real size lives in the
/// `ds64` chunk; that sentinel must never be taken as a literal 4 GiB size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkSize {
    Known(u32),
    /// The `0xFFFFFFFF` sentinel: the real size is stored elsewhere.
    Unknown,
}

impl ChunkSize {
    pub fn from_raw(raw: u32) -> Self {
        if raw == u32::MAX {
            ChunkSize::Unknown
        } else {
            ChunkSize::Known(raw)
        }
    }

    pub fn known(self) -> Option<u32> {
        match self {
            ChunkSize::Known(n) => Some(n),
            ChunkSize::Unknown => None,
        }
    }
}

impl fmt::Display for ChunkSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChunkSize::Known(n) => write!(f, "{}", n),
            // RF64 tooling conventionally shows the sentinel as -1
            ChunkSize::Unknown => write!(f, "-1"),
        }
    }
}

/// The outer 12-byte RIFF/RF64 header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerHeader {
    /// `RIFF` or `RF64`.
    pub id: FourCc,
    pub size: ChunkSize,
    /// Always `WAVE`.
    pub format: FourCc,
}

/// An 8-byte chunk header: tag plus declared body size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
    pub id: FourCc,
    pub size: ChunkSize,
}

/// One step of the chunk walk.
#[derive(Debug, PartialEq, Eq)]
pub enum ChunkEvent {
    /// A chunk whose body was read and dispatched to a decoder.
    Chunk { header: ChunkHeader, body: ChunkBody },
    /// The `data` chunk. Terminal: the payload is never read here, the
    /// caller streams it separately if it wants the samples. `size` is the
    /// payload length in bytes, resolved through `ds64` when the declared
    /// size is the RF64 sentinel, or `None` when it could not be resolved.
    Data {
        header: ChunkHeader,
        size: Option<u64>,
    },
    /// The walk hit bytes it cannot interpret and stopped. Terminal.
    /// Everything decoded before this point is still valid.
    Garbage(Garbage),
}

/// Why a walk stopped before a clean end of the stream.
///
/// These are warnings, not errors: once the tag bytes are wrong there is no
/// reliable way to find the next chunk boundary, so the walk just ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Garbage {
    /// The stream ended inside a chunk header.
    ShortHeader,
    /// A chunk tag with bytes outside printable ASCII.
    BadId(FourCc),
    /// The stream ended inside a chunk body.
    ShortBody(FourCc),
    /// A chunk other than `data` declared the RF64 sentinel size, which
    /// only the outer and `data` headers may carry.
    UnknownSize(FourCc),
}

impl fmt::Display for Garbage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Garbage::ShortHeader => write!(f, "stream ended inside a chunk header"),
            Garbage::BadId(id) => write!(f, "found garbage instead of a chunk id ({})", id),
            Garbage::ShortBody(id) => write!(f, "stream ended inside the body of chunk '{}'", id),
            Garbage::UnknownSize(id) => {
                write!(f, "chunk '{}' declares the RF64 sentinel size", id)
            }
        }
    }
}

/// Walks the chunk sequence of a WAV/RF64 recording.
///
/// Construction validates the outer container header, the one fatal check in
/// the pipeline. After that, [`next_chunk`](WavReader::next_chunk) yields one
/// event per chunk until the `data` chunk, garbage, or the end of the file,
/// and `Ok(None)` from then on. The cursor only moves forward; a `ds64`
/// chunk seen along the way is remembered so a sentinel-sized `data` header
/// can be resolved when it arrives.
pub struct WavReader<R> {
    inner: R,
    header: ContainerHeader,
    ds64: Option<Ds64Chunk>,
    done: bool,
}

impl<R: Read> WavReader<R> {
    /// Read and validate the 12-byte container header.
    pub fn new(mut inner: R) -> Result<Self, DecodeError> {
        let mut raw = [0u8; 12];
        if read_full(&mut inner, &mut raw)? != Fill::Full {
            return Err(DecodeError::TruncatedContainer);
        }
        let id = FourCc([raw[0], raw[1], raw[2], raw[3]]);
        let size = ChunkSize::from_raw(u32::from_le_bytes([raw[4], raw[5], raw[6], raw[7]]));
        let format = FourCc([raw[8], raw[9], raw[10], raw[11]]);
        if !(id == FourCc::RIFF || id == FourCc::RF64) || format != FourCc::WAVE {
            return Err(DecodeError::InvalidContainer { id, format });
        }
        Ok(Self {
            inner,
            header: ContainerHeader { id, size, format },
            ds64: None,
            done: false,
        })
    }

    /// The outer container header.
    pub fn header(&self) -> &ContainerHeader {
        &self.header
    }

    /// The `ds64` chunk, once the walk has passed one.
    pub fn ds64(&self) -> Option<&Ds64Chunk> {
        self.ds64.as_ref()
    }

    /// Unwrap the underlying reader. After a [`ChunkEvent::Data`] event it
    /// is positioned at the first byte of the sample payload.
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Pull the next chunk event, or `Ok(None)` once the walk has ended.
    pub fn next_chunk(&mut self) -> Result<Option<ChunkEvent>, DecodeError> {
        if self.done {
            return Ok(None);
        }
        let mut raw = [0u8; 8];
        match read_full(&mut self.inner, &mut raw)? {
            Fill::Full => {}
            Fill::Eof => {
                self.done = true;
                return Ok(None);
            }
            Fill::Short(_) => return Ok(Some(self.finish(Garbage::ShortHeader))),
        }
        let id = FourCc([raw[0], raw[1], raw[2], raw[3]]);
        let size = ChunkSize::from_raw(u32::from_le_bytes([raw[4], raw[5], raw[6], raw[7]]));
        if !id.is_printable() {
            return Ok(Some(self.finish(Garbage::BadId(id))));
        }
        let header = ChunkHeader { id, size };

        if id == FourCc::DATA {
            self.done = true;
            let size = match size {
                ChunkSize::Known(n) => Some(n as u64),
                ChunkSize::Unknown => self.ds64.as_ref().map(|ds64| ds64.data_size),
            };
            return Ok(Some(ChunkEvent::Data { header, size }));
        }

        let len = match size.known() {
            Some(n) => n as usize,
            // ds64 resolves only the outer and data sizes, so a sentinel
            // here leaves no way to find the next header
            None => return Ok(Some(self.finish(Garbage::UnknownSize(id)))),
        };
        let mut body = vec![0u8; len];
        if read_full(&mut self.inner, &mut body)? != Fill::Full {
            return Ok(Some(self.finish(Garbage::ShortBody(id))));
        }

        // Bodies sit back to back in these files; no pad byte follows an
        // odd-sized chunk.
        let body = chunks::decode_body(id, &body);
        if let ChunkBody::Ds64(ds64) = &body {
            self.ds64 = Some(ds64.clone());
        }
        Ok(Some(ChunkEvent::Chunk { header, body }))
    }

    fn finish(&mut self, garbage: Garbage) -> ChunkEvent {
        self.done = true;
        ChunkEvent::Garbage(garbage)
    }
}
