//! Sequential reader for framed event files
//!
//! Container layout, repeated per record (all little-endian):
//! `serial u32`, `event_id u16`, `flags u16` (reserved), `payload_len u32`,
//! then `payload_len` bytes of bank payload. The reader is strictly
//! forward-only; rereading a file means opening a fresh reader.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use crate::event::RawEvent;

const RECORD_HEADER_LEN: usize = 12;

pub struct FramedFileReader<R> {
    inner: R,
}

impl FramedFileReader<BufReader<File>> {
    /// Open an event file for sequential reading
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: Read> FramedFileReader<R> {
    /// Wrap any byte stream in the framed record format
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Read the next record.
    ///
    /// Returns `Ok(None)` on a clean end of stream. A record cut off mid
    /// header or mid payload is an `UnexpectedEof` error, not end-of-stream.
    pub fn read_next(&mut self) -> io::Result<Option<RawEvent>> {
        let mut header = [0u8; RECORD_HEADER_LEN];
        match read_exact_or_eof(&mut self.inner, &mut header)? {
            HeaderRead::Eof => return Ok(None),
            HeaderRead::Complete => {}
        }

        let serial = u32::from_le_bytes([header[0], header[1], header[2], header[3]]);
        let event_id = u16::from_le_bytes([header[4], header[5]]);
        // header[6..8] is the reserved flags word
        let payload_len =
            u32::from_le_bytes([header[8], header[9], header[10], header[11]]) as usize;

        let mut payload = vec![0u8; payload_len];
        self.inner.read_exact(&mut payload)?;

        Ok(Some(RawEvent {
            serial,
            event_id,
            payload,
        }))
    }
}

enum HeaderRead {
    Complete,
    Eof,
}

/// Fill `buf` completely, distinguishing a clean EOF at the first byte from
/// a record truncated partway through.
fn read_exact_or_eof<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<HeaderRead> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => {
                if filled == 0 {
                    return Ok(HeaderRead::Eof);
                }
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "event record truncated mid-header",
                ));
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(HeaderRead::Complete)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{write_event_file, write_record};

    fn events(n: u32) -> Vec<RawEvent> {
        (0..n)
            .map(|i| RawEvent {
                serial: i,
                event_id: 1,
                payload: vec![i as u8; (i % 7) as usize],
            })
            .collect()
    }

    #[test]
    fn test_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.mid");
        let expected = events(5);
        write_event_file(&path, &expected).unwrap();

        let mut reader = FramedFileReader::open(&path).unwrap();
        let mut read_back = Vec::new();
        while let Some(event) = reader.read_next().unwrap() {
            read_back.push(event);
        }

        assert_eq!(read_back, expected);
    }

    #[test]
    fn test_empty_file_is_clean_eof() {
        let mut reader = FramedFileReader::new(io::Cursor::new(Vec::new()));
        assert!(reader.read_next().unwrap().is_none());
    }

    #[test]
    fn test_truncated_header_is_error() {
        let mut bytes = Vec::new();
        write_record(
            &mut bytes,
            &RawEvent {
                serial: 1,
                event_id: 1,
                payload: vec![1, 2, 3],
            },
        )
        .unwrap();
        bytes.truncate(6);

        let mut reader = FramedFileReader::new(io::Cursor::new(bytes));
        let err = reader.read_next().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_truncated_payload_is_error() {
        let mut bytes = Vec::new();
        write_record(
            &mut bytes,
            &RawEvent {
                serial: 1,
                event_id: 1,
                payload: vec![1, 2, 3, 4],
            },
        )
        .unwrap();
        bytes.truncate(bytes.len() - 2);

        let mut reader = FramedFileReader::new(io::Cursor::new(bytes));
        let err = reader.read_next().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_reader_is_forward_only_per_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.mid");
        write_event_file(&path, &events(3)).unwrap();

        // First full drain
        let mut first = FramedFileReader::open(&path).unwrap();
        let mut count = 0;
        while first.read_next().unwrap().is_some() {
            count += 1;
        }
        assert_eq!(count, 3);
        assert!(first.read_next().unwrap().is_none());

        // A second pass requires a fresh open
        let mut second = FramedFileReader::open(&path).unwrap();
        assert!(second.read_next().unwrap().is_some());
    }
}
