//! The `json` format: one JSON array holding every quad.
//!
//! Reading decodes the whole document before the first quad is returned, so
//! a syntax error anywhere fails the entire read. Use
//! [`json_stream`](crate::json_stream) for inputs that should not be held
//! in memory.

use std::io::{Read, Write};

use quadwire_format::{
    check_cancelled, BoxQuadReader, BoxQuadWriter, CancellationToken, Format, QuadReader,
    QuadWriter,
};
use quadwire_model::{Quad, QuadError, Result, Value};

use crate::wire::{json_error, Failure, WireQuad, WireValue};

pub const FORMAT_NAME: &str = "json";

/// Reads a JSON array of quads. `null` and empty input are empty streams.
pub struct JsonReader {
    quads: std::vec::IntoIter<WireQuad>,
    index: u64,
    failure: Option<Failure>,
    closed: bool,
}

impl JsonReader {
    /// Read and decode all of `source`.
    pub fn new(mut source: impl Read) -> Self {
        let mut data = Vec::new();
        match source.read_to_end(&mut data) {
            Ok(_) => Self::from_slice(&data),
            Err(err) => Self::failed(&QuadError::Io(err)),
        }
    }

    pub fn from_slice(data: &[u8]) -> Self {
        if data.iter().all(u8::is_ascii_whitespace) {
            return Self::with_quads(Vec::new());
        }
        match serde_json::from_slice::<Option<Vec<WireQuad>>>(data) {
            Ok(quads) => {
                let quads = quads.unwrap_or_default();
                tracing::debug!(quads = quads.len(), "decoded json document");
                Self::with_quads(quads)
            }
            Err(err) => Self::failed(&json_error(FORMAT_NAME, err)),
        }
    }

    fn with_quads(quads: Vec<WireQuad>) -> Self {
        Self {
            quads: quads.into_iter(),
            index: 0,
            failure: None,
            closed: false,
        }
    }

    fn failed(err: &QuadError) -> Self {
        tracing::debug!(error = %err, "json document rejected");
        Self {
            failure: Failure::record(err),
            ..Self::with_quads(Vec::new())
        }
    }

    /// Quads not yet returned.
    pub fn remaining(&self) -> usize {
        self.quads.len()
    }
}

impl QuadReader for JsonReader {
    fn read_quad(&mut self, ctx: &CancellationToken) -> Result<Option<Quad>> {
        if self.closed {
            return Err(QuadError::Closed);
        }
        if let Some(failure) = &self.failure {
            return Err(failure.to_error(FORMAT_NAME));
        }
        check_cancelled(ctx)?;

        let Some(wire) = self.quads.next() else {
            return Ok(None);
        };
        let index = self.index;
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

/// Writes quads as an indented JSON array.
///
/// Closing a writer that never wrote a quad emits `null` instead of `[]`.
pub struct JsonWriter<W: Write> {
    inner: W,
    written: u64,
    closed: bool,
}

impl<W: Write> JsonWriter<W> {
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

    fn write_record(&mut self, quad: &Quad) -> Result<()> {
        let separator: &[u8] = if self.written == 0 { b"[\n\t" } else { b",\n\t" };
        self.inner.write_all(separator)?;
        serde_json::to_writer(&mut self.inner, &WireQuad::from(quad))
            .map_err(|err| json_error(FORMAT_NAME, err))
    }
}

impl<W: Write> QuadWriter for JsonWriter<W> {
    fn write_quad(&mut self, ctx: &CancellationToken, quad: &Quad) -> Result<()> {
        if self.closed {
            return Err(QuadError::Closed);
        }
        check_cancelled(ctx)?;
        let index = self.written;
        if !quad.is_valid() {
            return Err(QuadError::Invalid.at(index));
        }
        self.write_record(quad).map_err(|err| err.at(index))?;
        self.written += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        tracing::debug!(quads = self.written, "json writer closed");
        let trailer: &[u8] = if self.written == 0 { b"null\n" } else { b"\n]\n" };
        self.inner.write_all(trailer)?;
        self.inner.flush()?;
        Ok(())
    }
}

/// Encode one value the way quad fields are written: its canonical text as a
/// JSON string, or a tagged object when that text would read back differently.
pub fn marshal_value(value: &Value) -> Result<Vec<u8>> {
    serde_json::to_vec(&WireValue::from(value)).map_err(|err| json_error(FORMAT_NAME, err))
}

/// Decode a value written by [`marshal_value`]; `null` is no value.
pub fn unmarshal_value(data: &[u8]) -> Result<Option<Value>> {
    let wire: Option<WireValue> =
        serde_json::from_slice(data).map_err(|err| json_error(FORMAT_NAME, err))?;
    Ok(wire.map(WireValue::into_value))
}

fn open_reader(source: Box<dyn Read + Send>) -> BoxQuadReader {
    Box::new(JsonReader::new(source))
}

fn open_writer(sink: Box<dyn Write + Send>) -> BoxQuadWriter {
    Box::new(JsonWriter::new(sink))
}

/// Descriptor for the `json` format.
pub fn format() -> Format {
    Format::new(FORMAT_NAME)
        .with_extensions([".json"])
        .with_media_types(["application/json"])
        .with_reader(open_reader)
        .with_writer(open_writer)
        .with_value_codec(marshal_value, unmarshal_value)
}
