//! Register an application-specific format next to the built-in ones.
//!
//! The `tsv` format writes one quad per line as tab-separated canonical
//! values.

use std::io::Write;

use quadwire::format::{register_format, BoxQuadWriter, CancellationToken, Format, QuadWriter};
use quadwire::model::{Quad, QuadError, Result};
use quadwire::{copy, register_builtin_formats, Value};

struct TsvWriter<W> {
    inner: W,
    closed: bool,
}

impl<W: Write> QuadWriter for TsvWriter<W> {
    fn write_quad(&mut self, _ctx: &CancellationToken, quad: &Quad) -> Result<()> {
        if self.closed {
            return Err(QuadError::Closed);
        }
        if !quad.is_valid() {
            return Err(QuadError::Invalid);
        }
        writeln!(
            self.inner,
            "{}\t{}\t{}",
            quad.subject, quad.predicate, quad.object
        )?;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.closed = true;
        self.inner.flush()?;
        Ok(())
    }
}

fn open_tsv(sink: Box<dyn Write + Send>) -> BoxQuadWriter {
    Box::new(TsvWriter {
        inner: sink,
        closed: false,
    })
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    register_builtin_formats();
    register_format(
        Format::new("tsv")
            .with_extensions([".tsv"])
            .with_media_types(["text/tab-separated-values"])
            .with_writer(open_tsv),
    )?;

    let tsv = quadwire::format::format_by_extension("tsv").ok_or("tsv not registered")?;
    let mut writer = tsv.open_writer(std::io::stdout())?;
    let quads = vec![
        Quad::new(
            Value::iri("http://example.org/a"),
            Value::iri("http://example.org/knows"),
            Value::iri("http://example.org/b"),
            None,
        ),
        Quad::new(
            Value::iri("http://example.org/a"),
            Value::iri("http://example.org/age"),
            Value::Int(42),
            None,
        ),
    ];

    let ctx = CancellationToken::new();
    copy(&ctx, &mut writer, &mut quadwire::format::from_quads(quads))?;
    writer.close()?;
    Ok(())
}
