use std::io::{self, ErrorKind, Read};

use bytes::{Buf, Bytes, BytesMut};

use crate::codec::{decode_frame, incomplete_frame_error, FrameConfig, Message};
use crate::error::{FrameError, Result};
use crate::varint::decode_uvarint;

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;
const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Reads complete frames from any `Read` stream.
///
/// Handles partial reads internally, so callers always get complete frames.
/// A clean end of stream between frames is `Ok(None)`; an end of stream
/// inside a frame is an error.
pub struct FrameReader<T> {
    inner: T,
    buf: BytesMut,
    config: FrameConfig,
    eof: bool,
}

impl<T: Read> FrameReader<T> {
    /// Create a new frame reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a new frame reader with explicit configuration.
    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
            eof: false,
        }
    }

    /// Read the next complete frame payload (blocking).
    pub fn read_frame(&mut self) -> Result<Option<Bytes>> {
        loop {
            if let Some(frame) = decode_frame(&mut self.buf, self.config.max_payload_size)? {
                tracing::trace!(payload_len = frame.len(), "read frame");
                return Ok(Some(frame));
            }
            if self.eof {
                return self.finish();
            }
            self.fill()?;
        }
    }

    /// Read and decode the next message.
    pub fn read_msg<M: Message>(&mut self) -> Result<Option<M>> {
        self.read_frame()?.map(M::decode).transpose()
    }

    /// Step over the next frame without buffering its payload.
    ///
    /// Returns `false` at a clean end of stream.
    pub fn skip_msg(&mut self) -> Result<bool> {
        let (declared, prefix_len) = loop {
            if let Some(prefix) = decode_uvarint(&self.buf)? {
                break prefix;
            }
            if self.eof {
                return self.finish().map(|_| false);
            }
            self.fill()?;
        };

        tracing::trace!(payload_len = declared, "skipping frame");
        self.buf.advance(prefix_len);
        let buffered = self.buf.len().min(usize::try_from(declared).unwrap_or(usize::MAX));
        self.buf.advance(buffered);

        let remaining = declared - buffered as u64;
        if remaining > 0 {
            let skipped = io::copy(&mut (&mut self.inner).take(remaining), &mut io::sink())?;
            if skipped < remaining {
                self.eof = true;
                return Err(FrameError::Truncated {
                    declared,
                    available: buffered as u64 + skipped,
                });
            }
        }
        Ok(true)
    }

    fn fill(&mut self) -> Result<()> {
        let mut chunk = [0u8; READ_CHUNK_SIZE];
        loop {
            match self.inner.read(&mut chunk) {
                Ok(0) => {
                    self.eof = true;
                    return Ok(());
                }
                Ok(n) => {
                    self.buf.extend_from_slice(&chunk[..n]);
                    return Ok(());
                }
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
    }

    fn finish(&mut self) -> Result<Option<Bytes>> {
        if self.buf.is_empty() {
            return Ok(None);
        }
        let err = incomplete_frame_error(&self.buf);
        self.buf.clear();
        Err(err)
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Update maximum payload size for subsequent frame decoding.
    pub fn set_max_payload_size(&mut self, max_payload_size: usize) {
        self.config.max_payload_size = max_payload_size;
    }

    /// Current frame reader configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::codec::encode_frame;

    fn wire(payloads: &[&[u8]]) -> Vec<u8> {
        let mut buf = BytesMut::new();
        for payload in payloads {
            encode_frame(payload, &mut buf);
        }
        buf.to_vec()
    }

    #[test]
    fn read_single_frame() {
        let mut reader = FrameReader::new(Cursor::new(wire(&[b"hello"])));
        let frame = reader.read_frame().unwrap().unwrap();
        assert_eq!(frame.as_ref(), b"hello");
        assert!(reader.read_frame().unwrap().is_none());
    }

    #[test]
    fn read_multiple_frames() {
        let mut reader = FrameReader::new(Cursor::new(wire(&[b"one", b"", b"three"])));

        let payloads: Vec<Vec<u8>> = std::iter::from_fn(|| reader.read_msg::<Vec<u8>>().unwrap())
            .collect();
        assert_eq!(payloads, vec![b"one".to_vec(), Vec::new(), b"three".to_vec()]);
    }

    #[test]
    fn read_frame_with_large_payload() {
        let payload = vec![0xAB; 64 * 1024];
        let mut reader = FrameReader::new(Cursor::new(wire(&[payload.as_slice()])));
        let frame = reader.read_frame().unwrap().unwrap();
        assert_eq!(frame.as_ref(), payload.as_slice());
    }

    #[test]
    fn partial_read_handling() {
        let byte_reader = ByteByByteReader {
            bytes: wire(&[b"slow", b"drip"]),
            pos: 0,
        };
        let mut reader = FrameReader::new(byte_reader);

        assert_eq!(reader.read_frame().unwrap().unwrap().as_ref(), b"slow");
        assert_eq!(reader.read_frame().unwrap().unwrap().as_ref(), b"drip");
        assert!(reader.read_frame().unwrap().is_none());
    }

    #[test]
    fn empty_stream_is_clean_end() {
        let mut reader = FrameReader::new(Cursor::new(Vec::<u8>::new()));
        assert!(reader.read_frame().unwrap().is_none());
        assert!(!reader.skip_msg().unwrap());
    }

    #[test]
    fn stream_ends_inside_prefix() {
        let mut reader = FrameReader::new(Cursor::new(vec![0x80]));
        let err = reader.read_frame().unwrap_err();
        assert!(matches!(err, FrameError::TruncatedPrefix));
    }

    #[test]
    fn stream_ends_inside_payload() {
        let mut partial = wire(&[b"sixteen-byte-msg"]);
        partial.truncate(10);

        let mut reader = FrameReader::new(Cursor::new(partial));
        let err = reader.read_frame().unwrap_err();
        assert!(matches!(
            err,
            FrameError::Truncated {
                declared: 16,
                available: 9
            }
        ));
    }

    #[test]
    fn oversized_frame_in_stream() {
        let cfg = FrameConfig {
            max_payload_size: 16,
        };
        let mut reader = FrameReader::with_config(Cursor::new(wire(&[&[7u8; 1024]])), cfg);
        let err = reader.read_frame().unwrap_err();
        assert!(matches!(err, FrameError::PayloadTooLarge { size: 1024, .. }));
    }

    #[test]
    fn skip_then_read() {
        let big = vec![1u8; 3 * READ_CHUNK_SIZE];
        let mut reader = FrameReader::new(Cursor::new(wire(&[big.as_slice(), b"after"])));

        assert!(reader.skip_msg().unwrap());
        assert_eq!(reader.read_frame().unwrap().unwrap().as_ref(), b"after");
        assert!(!reader.skip_msg().unwrap());
    }

    #[test]
    fn skip_ignores_payload_limit() {
        let cfg = FrameConfig {
            max_payload_size: 4,
        };
        let mut reader = FrameReader::with_config(Cursor::new(wire(&[b"too long", b"ok"])), cfg);
        assert!(reader.skip_msg().unwrap());
        assert_eq!(reader.read_frame().unwrap().unwrap().as_ref(), b"ok");
    }

    #[test]
    fn skip_detects_truncation() {
        let mut partial = wire(&[&[9u8; 20_000]]);
        partial.truncate(12_000);

        let mut reader = FrameReader::new(Cursor::new(partial));
        let err = reader.skip_msg().unwrap_err();
        assert!(matches!(
            err,
            FrameError::Truncated {
                declared: 20_000,
                available: 11_997
            }
        ));
    }

    #[test]
    fn accessors_and_into_inner() {
        let mut reader = FrameReader::new(Cursor::new(Vec::<u8>::new()));
        reader.set_max_payload_size(32);
        assert_eq!(reader.config().max_payload_size, 32);

        let _ = reader.get_ref();
        let _ = reader.get_mut();
        let _inner = reader.into_inner();
    }

    #[test]
    fn read_would_block_propagates_io_error() {
        let reader = FailFirst {
            kind: ErrorKind::WouldBlock,
            failed: false,
            bytes: Cursor::new(wire(&[b"ok"])),
        };
        let mut framed = FrameReader::new(reader);
        let err = framed.read_frame().unwrap_err();
        assert!(matches!(err, FrameError::Io(e) if e.kind() == ErrorKind::WouldBlock));
    }

    #[test]
    fn interrupted_read_retries() {
        let reader = FailFirst {
            kind: ErrorKind::Interrupted,
            failed: false,
            bytes: Cursor::new(wire(&[b"ok"])),
        };
        let mut framed = FrameReader::new(reader);
        assert_eq!(framed.read_frame().unwrap().unwrap().as_ref(), b"ok");
    }

    #[derive(Debug)]
    struct ByteByByteReader {
        bytes: Vec<u8>,
        pos: usize,
    }

    impl Read for ByteByByteReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.pos >= self.bytes.len() || buf.is_empty() {
                return Ok(0);
            }
            buf[0] = self.bytes[self.pos];
            self.pos += 1;
            Ok(1)
        }
    }

    struct FailFirst {
        kind: ErrorKind,
        failed: bool,
        bytes: Cursor<Vec<u8>>,
    }

    impl Read for FailFirst {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if !self.failed {
                self.failed = true;
                return Err(io::Error::from(self.kind));
            }
            self.bytes.read(buf)
        }
    }
}
