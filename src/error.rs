use std::io;

use crate::wav::FourCc;

/// Errors raised by the decoders in this crate.
///
/// Only unrecoverable conditions live here. Conditions that merely end a
/// chunk walk early (a garbage tag, a truncated header) or that skip a
/// single chunk are reported through the chunk event stream instead, so
/// everything decoded before them stays usable.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The outer 12-byte header is not a RIFF or RF64 WAVE container.
    #[error("not a RIFF/RF64 WAVE file (id '{id}', format '{format}')")]
    InvalidContainer { id: FourCc, format: FourCc },

    /// The stream ended inside the 12-byte container header.
    #[error("container header truncated")]
    TruncatedContainer,

    /// A fixed-size record ended partway through. No partial record is
    /// returned; fixed-record streams have no way to resynchronize.
    #[error("record truncated after {got} of {expected} bytes")]
    TruncatedRecord { expected: usize, got: usize },

    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] io::Error),
}
