use bytes::{Buf, Bytes, BytesMut};

use crate::error::{FrameError, Result};
use crate::varint::{decode_uvarint, put_uvarint, uvarint_len};

/// Default maximum payload size: 16 MiB.
pub const DEFAULT_MAX_PAYLOAD: usize = 16 * 1024 * 1024;

/// A value that can travel as one frame payload.
///
/// `encoded_len` lets a writer emit the length prefix before encoding. A
/// message that cannot know its size up front returns `None` and the writer
/// encodes it into a scratch buffer first.
pub trait Message: Sized {
    /// Append the payload bytes to `dst`.
    fn encode(&self, dst: &mut BytesMut) -> Result<()>;

    /// Rebuild the message from exactly one payload.
    fn decode(src: Bytes) -> Result<Self>;

    /// Exact number of bytes `encode` will append, if known.
    fn encoded_len(&self) -> Option<usize> {
        None
    }
}

impl Message for Bytes {
    fn encode(&self, dst: &mut BytesMut) -> Result<()> {
        dst.extend_from_slice(self);
        Ok(())
    }

    fn decode(src: Bytes) -> Result<Self> {
        Ok(src)
    }

    fn encoded_len(&self) -> Option<usize> {
        Some(self.len())
    }
}

impl Message for Vec<u8> {
    fn encode(&self, dst: &mut BytesMut) -> Result<()> {
        dst.extend_from_slice(self);
        Ok(())
    }

    fn decode(src: Bytes) -> Result<Self> {
        Ok(src.to_vec())
    }

    fn encoded_len(&self) -> Option<usize> {
        Some(self.len())
    }
}

/// Encode a payload into the wire format.
///
/// Wire format:
/// ```text
/// ┌──────────────────────┬──────────────────────┐
/// │ Length (uvarint)     │ Payload              │
/// │ 1..=10 bytes         │ (Length bytes)       │
/// └──────────────────────┴──────────────────────┘
/// ```
pub fn encode_frame(payload: &[u8], dst: &mut BytesMut) {
    dst.reserve(uvarint_len(payload.len() as u64) + payload.len());
    put_uvarint(dst, payload.len() as u64);
    dst.extend_from_slice(payload);
}

/// Encode `msg` as one frame, returning the payload size.
///
/// Messages that report their size are written straight into `dst`.
pub fn encode_msg<M: Message>(msg: &M, dst: &mut BytesMut, max_payload: usize) -> Result<usize> {
    let Some(len) = msg.encoded_len() else {
        let mut scratch = BytesMut::new();
        msg.encode(&mut scratch)?;
        check_payload_size(scratch.len() as u64, max_payload)?;
        encode_frame(&scratch, dst);
        return Ok(scratch.len());
    };

    check_payload_size(len as u64, max_payload)?;
    let frame_start = dst.len();
    dst.reserve(uvarint_len(len as u64) + len);
    put_uvarint(dst, len as u64);
    let payload_start = dst.len();
    if let Err(err) = msg.encode(dst) {
        dst.truncate(frame_start);
        return Err(err);
    }

    let actual = dst.len() - payload_start;
    if actual != len {
        dst.truncate(frame_start);
        return Err(FrameError::SizeMismatch {
            reported: len,
            actual,
        });
    }
    Ok(len)
}

/// Decode a frame from a buffer.
///
/// Returns `Ok(None)` if the buffer doesn't contain a complete frame yet.
/// On success, consumes the frame bytes from the buffer.
pub fn decode_frame(src: &mut BytesMut, max_payload: usize) -> Result<Option<Bytes>> {
    let Some((payload_len, prefix_len)) = decode_uvarint(src)? else {
        return Ok(None);
    };

    check_payload_size(payload_len, max_payload)?;

    let payload_len = payload_len as usize;
    if src.len() < prefix_len + payload_len {
        return Ok(None);
    }

    src.advance(prefix_len);
    Ok(Some(src.split_to(payload_len).freeze()))
}

/// Classify bytes left over when the stream ends mid-frame.
pub fn incomplete_frame_error(remaining: &[u8]) -> FrameError {
    match decode_uvarint(remaining) {
        Ok(Some((declared, prefix_len))) => FrameError::Truncated {
            declared,
            available: (remaining.len() - prefix_len) as u64,
        },
        Ok(None) => FrameError::TruncatedPrefix,
        Err(err) => err,
    }
}

fn check_payload_size(size: u64, max: usize) -> Result<()> {
    if size > max as u64 {
        return Err(FrameError::PayloadTooLarge { size, max });
    }
    Ok(())
}

/// Configuration for the frame codec.
#[derive(Debug, Clone)]
pub struct FrameConfig {
    /// Maximum payload size in bytes. Default: 16 MiB.
    pub max_payload_size: usize,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_payload_size: DEFAULT_MAX_PAYLOAD,
        }
    }
}
