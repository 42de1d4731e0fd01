//! The `framed` quad format: a stream of length-prefixed binary quads.

use std::io::{Read, Write};

use quadwire_format::{
    check_cancelled, BoxQuadReader, BoxQuadWriter, CancellationToken, Format, FormatRegistry,
    QuadReader, QuadWriter,
};
use quadwire_model::{Quad, QuadError, Result};

use crate::codec::FrameConfig;
use crate::reader::FrameReader;
use crate::writer::FrameWriter;

/// Registry name of the framed binary format.
pub const FORMAT_NAME: &str = "framed";
pub const EXTENSIONS: &[&str] = &[".fq"];
pub const MEDIA_TYPES: &[&str] = &["application/x-framed-quads"];

/// Reads quads written by [`FramedQuadWriter`].
pub struct FramedQuadReader<R> {
    frames: FrameReader<R>,
    index: u64,
    closed: bool,
}

impl<R: Read> FramedQuadReader<R> {
    pub fn new(inner: R) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    pub fn with_config(inner: R, config: FrameConfig) -> Self {
        Self {
            frames: FrameReader::with_config(inner, config),
            index: 0,
            closed: false,
        }
    }

    /// Step over the next quad without decoding it.
    ///
    /// Returns `false` at the end of the stream.
    pub fn skip_quad(&mut self) -> Result<bool> {
        if self.closed {
            return Err(QuadError::Closed);
        }
        let skipped = self
            .frames
            .skip_msg()
            .map_err(|err| QuadError::from(err).at(self.index))?;
        if skipped {
            self.index += 1;
        }
        Ok(skipped)
    }

    /// Index of the next quad in the stream.
    pub fn position(&self) -> u64 {
        self.index
    }

    pub fn into_inner(self) -> R {
        self.frames.into_inner()
    }
}

impl<R: Read> QuadReader for FramedQuadReader<R> {
    fn read_quad(&mut self, ctx: &CancellationToken) -> Result<Option<Quad>> {
        if self.closed {
            return Err(QuadError::Closed);
        }
        check_cancelled(ctx)?;

        let index = self.index;
        let quad = self
            .frames
            .read_msg::<Quad>()
            .map_err(|err| QuadError::from(err).at(index))?;
        let Some(quad) = quad else {
            return Ok(None);
        };
        self.index += 1;
        if !quad.is_valid() {
            return Err(QuadError::Invalid.at(index));
        }
        Ok(Some(quad))
    }

    fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }
}

/// Writes each quad as one frame.
pub struct FramedQuadWriter<W: Write> {
    frames: FrameWriter<W>,
    written: u64,
    closed: bool,
}

impl<W: Write> FramedQuadWriter<W> {
    pub fn new(inner: W) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    pub fn with_config(inner: W, config: FrameConfig) -> Self {
        Self {
            frames: FrameWriter::with_config(inner, config),
            written: 0,
            closed: false,
        }
    }

    /// Number of quads written so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.frames.into_inner()
    }
}

impl<W: Write> QuadWriter for FramedQuadWriter<W> {
    fn write_quad(&mut self, ctx: &CancellationToken, quad: &Quad) -> Result<()> {
        if self.closed {
            return Err(QuadError::Closed);
        }
        check_cancelled(ctx)?;
        if !quad.is_valid() {
            return Err(QuadError::Invalid.at(self.written));
        }
        self.frames
            .write_msg(quad)
            .map_err(|err| QuadError::from(err).at(self.written))?;
        self.written += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        tracing::debug!(quads = self.written, "framed writer closed");
        self.frames.flush().map_err(QuadError::from)
    }
}

fn open_reader(source: Box<dyn Read + Send>) -> BoxQuadReader {
    Box::new(FramedQuadReader::new(source))
}

fn open_writer(sink: Box<dyn Write + Send>) -> BoxQuadWriter {
    Box::new(FramedQuadWriter::new(sink))
}

/// Descriptor for the framed format.
pub fn format() -> Format {
    Format::new(FORMAT_NAME)
        .with_extensions(EXTENSIONS.iter().copied())
        .with_media_types(MEDIA_TYPES.iter().copied())
        .with_reader(open_reader)
        .with_writer(open_writer)
}

/// Add the framed format to `registry`.
pub fn register(registry: &mut FormatRegistry) -> quadwire_format::Result<()> {
    registry.register(format())
}

/// Add the framed format to the process-wide registry.
pub fn register_global() -> quadwire_format::Result<()> {
    quadwire_format::register_format(format())
}
