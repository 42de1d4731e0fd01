use std::io::{ErrorKind, Write};

use bytes::BytesMut;

use crate::codec::{encode_frame, encode_msg, FrameConfig, Message};
use crate::error::{FrameError, Result};

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;

/// Writes complete frames to any `Write` stream.
///
/// Frames are not flushed individually; call [`FrameWriter::flush`] when the
/// stream is done.
pub struct FrameWriter<T> {
    inner: T,
    buf: BytesMut,
    config: FrameConfig,
}

impl<T: Write> FrameWriter<T> {
    /// Create a new frame writer with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a new frame writer with explicit configuration.
    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
        }
    }

    /// Write one raw payload as a frame, returning the bytes written.
    pub fn write_frame(&mut self, payload: &[u8]) -> Result<usize> {
        if payload.len() > self.config.max_payload_size {
            return Err(FrameError::PayloadTooLarge {
                size: payload.len() as u64,
                max: self.config.max_payload_size,
            });
        }

        self.buf.clear();
        encode_frame(payload, &mut self.buf);
        self.write_buffered()
    }

    /// Encode `msg` as one frame, returning the bytes written.
    ///
    /// Nothing reaches the stream when encoding fails.
    pub fn write_msg<M: Message>(&mut self, msg: &M) -> Result<usize> {
        self.buf.clear();
        let payload_len = encode_msg(msg, &mut self.buf, self.config.max_payload_size)?;
        tracing::trace!(payload_len, "write frame");
        self.write_buffered()
    }

    fn write_buffered(&mut self) -> Result<usize> {
        let mut offset = 0usize;
        while offset < self.buf.len() {
            match self.inner.write(&self.buf[offset..]) {
                Ok(0) => return Err(FrameError::Io(ErrorKind::WriteZero.into())),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
        Ok(offset)
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Update maximum payload size for subsequent frame encoding.
    pub fn set_max_payload_size(&mut self, max_payload_size: usize) {
        self.config.max_payload_size = max_payload_size;
    }

    /// Current frame writer configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use std::io::{self, Cursor};

    use bytes::Bytes;

    use super::*;
    use crate::reader::FrameReader;

    #[test]
    fn write_frame_produces_prefix_and_payload() {
        let mut writer = FrameWriter::new(Vec::new());
        let n = writer.write_frame(b"hello").unwrap();
        assert_eq!(n, 6);
        assert_eq!(writer.get_ref().as_slice(), b"\x05hello");
    }

    #[test]
    fn write_msg_reports_total_bytes() {
        let mut writer = FrameWriter::new(Vec::new());
        let payload = Bytes::from(vec![0x11; 200]);
        assert_eq!(writer.write_msg(&payload).unwrap(), 202);
        assert_eq!(writer.write_msg(&Bytes::new()).unwrap(), 1);
        assert_eq!(writer.get_ref().len(), 203);
    }

    #[test]
    fn reader_sees_what_writer_wrote() {
        let mut writer = FrameWriter::new(Vec::new());
        writer.write_msg(&b"first".to_vec()).unwrap();
        writer.write_frame(b"").unwrap();
        writer.write_msg(&Bytes::from_static(b"third")).unwrap();
        writer.flush().unwrap();

        let mut reader = FrameReader::new(Cursor::new(writer.into_inner()));
        assert_eq!(reader.read_msg::<Vec<u8>>().unwrap().unwrap(), b"first");
        assert!(reader.read_msg::<Bytes>().unwrap().unwrap().is_empty());
        assert_eq!(reader.read_msg::<Vec<u8>>().unwrap().unwrap(), b"third");
        assert!(reader.read_msg::<Vec<u8>>().unwrap().is_none());
    }

    #[test]
    fn oversized_payload_writes_nothing() {
        let cfg = FrameConfig {
            max_payload_size: 4,
        };
        let mut writer = FrameWriter::with_config(Vec::new(), cfg);
        let err = writer.write_frame(b"too long").unwrap_err();
        assert!(matches!(err, FrameError::PayloadTooLarge { size: 8, max: 4 }));
        let err = writer.write_msg(&b"too long".to_vec()).unwrap_err();
        assert!(matches!(err, FrameError::PayloadTooLarge { .. }));
        assert!(writer.get_ref().is_empty());
    }

    #[test]
    fn short_writes_are_completed() {
        let mut writer = FrameWriter::new(OneByteWriter::default());
        writer.write_frame(b"drip").unwrap();
        assert_eq!(writer.get_ref().bytes, b"\x04drip");
    }

    #[test]
    fn zero_write_is_an_error() {
        let mut writer = FrameWriter::new(ZeroWriter);
        let err = writer.write_frame(b"x").unwrap_err();
        assert!(matches!(err, FrameError::Io(e) if e.kind() == ErrorKind::WriteZero));
    }

    #[test]
    fn accessors_and_config() {
        let mut writer = FrameWriter::new(Vec::<u8>::new());
        writer.set_max_payload_size(8);
        assert_eq!(writer.config().max_payload_size, 8);
        writer.get_mut().push(0);
        assert_eq!(writer.into_inner(), vec![0]);
    }

    #[derive(Default)]
    struct OneByteWriter {
        bytes: Vec<u8>,
        interrupted: bool,
    }

    impl Write for OneByteWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if !self.interrupted {
                self.interrupted = true;
                return Err(io::Error::from(ErrorKind::Interrupted));
            }
            self.bytes.push(buf[0]);
            Ok(1)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct ZeroWriter;

    impl Write for ZeroWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Ok(0)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }
}
