//! The `json-stream` format: one JSON object per quad, newline separated.
//!
//! Both directions stream, so input of any size is read one record at a
//! time.

use std::io::{BufReader, Read, Write};

use quadwire_format::{
    check_cancelled, BoxQuadReader, BoxQuadWriter, CancellationToken, Format, QuadReader,
    QuadWriter,
};
use quadwire_model::{Quad, QuadError, Result};
use serde_json::de::IoRead;
use serde_json::StreamDeserializer;

use crate::wire::{json_error, Failure, WireQuad};

pub const FORMAT_NAME: &str = "json-stream";

/// Reads concatenated JSON objects, one quad each.
///
/// The first decode error ends the stream; later reads repeat it.
pub struct JsonStreamReader<R: Read> {
    records: StreamDeserializer<'static, IoRead<BufReader<R>>, WireQuad>,
    index: u64,
    failure: Option<(Failure, u64)>,
    closed: bool,
}

impl<R: Read> JsonStreamReader<R> {
    pub fn new(source: R) -> Self {
        Self {
            records: serde_json::Deserializer::from_reader(BufReader::new(source)).into_iter(),
            index: 0,
            failure: None,
            closed: false,
        }
    }

    fn fail(&mut self, err: QuadError, index: u64) -> QuadError {
        if let Some(failure) = Failure::record(&err) {
            self.failure = Some((failure, index));
        }
        err.at(index)
    }
}

impl<R: Read> QuadReader for JsonStreamReader<R> {
    fn read_quad(&mut self, ctx: &CancellationToken) -> Result<Option<Quad>> {
        if self.closed {
            return Err(QuadError::Closed);
        }
        if let Some((failure, index)) = &self.failure {
            return Err(failure.to_error(FORMAT_NAME).at(*index));
        }
        check_cancelled(ctx)?;

        let index = self.index;
        let wire = match self.records.next() {
            None => return Ok(None),
            Some(Ok(wire)) => wire,
            Some(Err(err)) => return Err(self.fail(json_error(FORMAT_NAME, err), index)),
        };
        self.index += 1;

        let quad = wire.into_quad().map_err(|err| err.at(index))?;
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

/// Writes each quad as a compact JSON object followed by a newline.
pub struct JsonStreamWriter<W: Write> {
    inner: W,
    written: u64,
    closed: bool,
}

impl<W: Write> JsonStreamWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            written: 0,
            closed: false,
        }
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> QuadWriter for JsonStreamWriter<W> {
    fn write_quad(&mut self, ctx: &CancellationToken, quad: &Quad) -> Result<()> {
        if self.closed {
            return Err(QuadError::Closed);
        }
        check_cancelled(ctx)?;
        let index = self.written;
        if !quad.is_valid() {
            return Err(QuadError::Invalid.at(index));
        }
        serde_json::to_writer(&mut self.inner, &WireQuad::from(quad))
            .map_err(|err| json_error(FORMAT_NAME, err).at(index))?;
        self.inner
            .write_all(b"\n")
            .map_err(|err| QuadError::Io(err).at(index))?;
        self.written += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        tracing::debug!(quads = self.written, "json-stream writer closed");
        self.inner.flush()?;
        Ok(())
    }
}

fn open_reader(source: Box<dyn Read + Send>) -> BoxQuadReader {
    Box::new(JsonStreamReader::new(source))
}

fn open_writer(sink: Box<dyn Write + Send>) -> BoxQuadWriter {
    Box::new(JsonStreamWriter::new(sink))
}

/// Descriptor for the `json-stream` format.
pub fn format() -> Format {
    Format::new(FORMAT_NAME)
        .with_media_types(["application/x-json-stream"])
        .with_reader(open_reader)
        .with_writer(open_writer)
}
