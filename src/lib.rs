//! Decoders for the binary artifacts of SDRplay RSP recording tools:
//! WAV/RF64 I/Q recordings with vendor metadata chunks ([`wav`]), sidecar
//! gain-change logs ([`gains`]), and headerless raw sample streams
//! ([`samples`]).
//!
//! Decoding is pull-based over any [`std::io::Read`], and the sample
//! payload of a recording is never loaded: walking a multi-gigabyte RF64
//! file touches only its metadata.

pub mod error;
pub mod gains;
pub mod read;
pub mod samples;
pub mod wav;

pub use error::DecodeError;
