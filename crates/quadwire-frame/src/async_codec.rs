//! `tokio_util` codec for framed quads.

use bytes::BytesMut;
use quadwire_model::Quad;
use tokio_util::codec::{Decoder, Encoder};

use crate::codec::{decode_frame, encode_msg, incomplete_frame_error, FrameConfig, Message};
use crate::error::FrameError;

/// Frames quads for `FramedRead` / `FramedWrite`.
#[derive(Debug, Clone, Default)]
pub struct QuadCodec {
    config: FrameConfig,
}

impl QuadCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: FrameConfig) -> Self {
        Self { config }
    }
}

impl Decoder for QuadCodec {
    type Item = Quad;
    type Error = FrameError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Quad>, FrameError> {
        let Some(payload) = decode_frame(src, self.config.max_payload_size)? else {
            return Ok(None);
        };
        let quad = Quad::decode(payload)?;
        if !quad.is_valid() {
            return Err(FrameError::InvalidQuad);
        }
        Ok(Some(quad))
    }

    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<Quad>, FrameError> {
        if let Some(quad) = self.decode(buf)? {
            return Ok(Some(quad));
        }
        if buf.is_empty() {
            return Ok(None);
        }
        let err = incomplete_frame_error(buf);
        buf.clear();
        Err(err)
    }
}

impl Encoder<Quad> for QuadCodec {
    type Error = FrameError;

    fn encode(&mut self, item: Quad, dst: &mut BytesMut) -> Result<(), FrameError> {
        <Self as Encoder<&Quad>>::encode(self, &item, dst)
    }
}

impl Encoder<&Quad> for QuadCodec {
    type Error = FrameError;

    fn encode(&mut self, item: &Quad, dst: &mut BytesMut) -> Result<(), FrameError> {
        encode_msg(item, dst, self.config.max_payload_size).map(|_| ())
    }
}
