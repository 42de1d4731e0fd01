//! Varint length-prefixed framing and the `framed` binary quad format.
//!
//! Every message is framed with an unsigned LEB128 payload length followed
//! by the payload bytes. [`Message`] types that know their encoded size are
//! written without an intermediate buffer, and a [`FrameReader`] can step
//! over a message without reading its payload into memory.
//!
//! [`FramedQuadReader`] and [`FramedQuadWriter`] carry one quad per frame
//! and are registered as the `framed` format.

pub mod binary;
pub mod codec;
pub mod error;
pub mod quads;
pub mod reader;
pub mod varint;
pub mod writer;

#[cfg(feature = "async")]
pub mod async_codec;

#[cfg(feature = "async")]
pub use async_codec::QuadCodec;
pub use codec::{
    decode_frame, encode_frame, encode_msg, incomplete_frame_error, FrameConfig, Message,
    DEFAULT_MAX_PAYLOAD,
};
pub use error::{FrameError, Result};
pub use quads::{register, register_global, FramedQuadReader, FramedQuadWriter, FORMAT_NAME};
pub use reader::FrameReader;
pub use varint::MAX_VARINT_LEN;
pub use writer::FrameWriter;
