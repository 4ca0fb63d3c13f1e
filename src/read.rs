use std::io::{self, Read};

/// Outcome of trying to fill a fixed-size buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fill {
    /// The buffer was filled completely.
    Full,
    /// The stream was already exhausted; no bytes were read.
    Eof,
    /// The stream ended after a nonzero number of bytes.
    Short(usize),
}

/// Read from `reader` until `buf` is full or the stream ends.
///
/// Every reader in this crate is built on this: `Eof` means the stream
/// stopped exactly on a record or chunk boundary, while `Short` means it was
/// cut off in the middle of something. Interrupted reads are retried.
pub fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<Fill> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    if filled == buf.len() {
        Ok(Fill::Full)
    } else if filled == 0 {
        Ok(Fill::Eof)
    } else {
        Ok(Fill::Short(filled))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn fills_the_whole_buffer() {
        let mut cursor = Cursor::new(vec![1u8, 2, 3, 4]);
        let mut buf = [0u8; 4];
        assert_eq!(read_full(&mut cursor, &mut buf).unwrap(), Fill::Full);
        assert_eq!(buf, [1, 2, 3, 4]);
    }

    #[test]
    fn empty_stream_is_eof() {
        let mut cursor = Cursor::new(Vec::new());
        let mut buf = [0u8; 4];
        assert_eq!(read_full(&mut cursor, &mut buf).unwrap(), Fill::Eof);
    }

    #[test]
    fn partial_fill_reports_byte_count() {
        let mut cursor = Cursor::new(vec![1u8, 2, 3]);
        let mut buf = [0u8; 8];
        assert_eq!(read_full(&mut cursor, &mut buf).unwrap(), Fill::Short(3));
        assert_eq!(&buf[..3], &[1, 2, 3]);
    }

    #[test]
    fn zero_length_buffer_is_always_full() {
        let mut cursor = Cursor::new(vec![1u8]);
        let mut buf = [0u8; 0];
        assert_eq!(read_full(&mut cursor, &mut buf).unwrap(), Fill::Full);
    }
}
