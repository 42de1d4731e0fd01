//! Graphviz output: every quad becomes an edge from subject to object
//! labelled with the predicate. Quad labels are not drawn.

use std::io::Write;

use quadwire_format::{check_cancelled, BoxQuadWriter, CancellationToken, Format, QuadWriter};
use quadwire_model::{Quad, QuadError, Result, Value};

pub const FORMAT_NAME: &str = "graphviz";

const HEADER: &str = "digraph cayley_graph {\n";
const FOOTER: &str = "}\n";

pub struct DotWriter<W: Write> {
    inner: W,
    written: u64,
    started: bool,
    closed: bool,
}

impl<W: Write> DotWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            written: 0,
            started: false,
            closed: false,
        }
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    fn start(&mut self) -> Result<()> {
        if !self.started {
            self.inner.write_all(HEADER.as_bytes())?;
            self.started = true;
        }
        Ok(())
    }
}

fn escape(value: &Value) -> String {
    value.to_string().replace('\\', "\\\\").replace('"', "\\\"")
}

impl<W: Write> QuadWriter for DotWriter<W> {
    fn write_quad(&mut self, ctx: &CancellationToken, quad: &Quad) -> Result<()> {
        if self.closed {
            return Err(QuadError::Closed);
        }
        check_cancelled(ctx)?;
        let index = self.written;
        if !quad.is_valid() {
            return Err(QuadError::Invalid.at(index));
        }
        self.start().map_err(|err| err.at(index))?;
        writeln!(
            self.inner,
            "\t\"{}\" -> \"{}\" [ label = \"{}\" ];",
            escape(&quad.subject),
            escape(&quad.object),
            escape(&quad.predicate),
        )
        .map_err(|err| QuadError::Io(err).at(index))?;
        self.written += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        tracing::debug!(edges = self.written, "graphviz writer closed");
        self.start()?;
        self.inner.write_all(FOOTER.as_bytes())?;
        self.inner.flush()?;
        Ok(())
    }
}

fn open_writer(sink: Box<dyn Write + Send>) -> BoxQuadWriter {
    Box::new(DotWriter::new(sink))
}

/// Descriptor for the write-only `graphviz` format.
pub fn format() -> Format {
    Format::new(FORMAT_NAME)
        .with_extensions([".gv", ".dot"])
        .with_media_types(["text/vnd.graphviz"])
        .with_writer(open_writer)
}

#[cfg(test)]
mod tests {
    use quadwire_format::{copy, from_quads};
    use quadwire_model::ErrorKind;

    use super::*;

    const EXPECTED: &str = r#"digraph cayley_graph {
	"_:subject1" -> "\"Tomas de Torquemada\"" [ label = "</film/performance/character>" ];
	"_:subject1" -> "\"object1\"" [ label = "<http://an.example/predicate1>" ];
	"<http://example.org/bob#me>" -> "\"1990-07-04\"^^<http://www.w3.org/2001/XMLSchema#date>" [ label = "<http://schema.org/birthDate>" ];
	"_:subject1" -> "\"some \\\"text\\\"\"" [ label = "<text>" ];
}
"#;

    fn film_quads() -> Vec<Quad> {
        vec![
            Quad::new(
                Value::bnode("subject1"),
                Value::iri("/film/performance/character"),
                Value::string("Tomas de Torquemada"),
                None,
            ),
            Quad::new(
                Value::bnode("subject1"),
                Value::iri("http://an.example/predicate1"),
                Value::string("object1"),
                None,
            ),
            Quad::new(
                Value::iri("http://example.org/bob#me"),
                Value::iri("http://schema.org/birthDate"),
                Value::typed("1990-07-04", "http://www.w3.org/2001/XMLSchema#date"),
                None,
            ),
            Quad::new(
                Value::bnode("subject1"),
                Value::iri("text"),
                Value::string(r#"some "text""#),
                None,
            ),
        ]
    }

    #[test]
    fn renders_edges() {
        let ctx = CancellationToken::new();
        let mut writer = DotWriter::new(Vec::new());
        let n = copy(&ctx, &mut writer, &mut from_quads(film_quads())).unwrap();
        assert_eq!(n, 4);
        writer.close().unwrap();
        assert_eq!(String::from_utf8(writer.into_inner()).unwrap(), EXPECTED);
    }

    #[test]
    fn empty_graph_on_close() {
        let mut writer = DotWriter::new(Vec::new());
        writer.close().unwrap();
        writer.close().unwrap();
        assert_eq!(
            String::from_utf8(writer.into_inner()).unwrap(),
            "digraph cayley_graph {\n}\n"
        );
    }

    #[test]
    fn labels_are_ignored() {
        let ctx = CancellationToken::new();
        let mut writer = DotWriter::new(Vec::new());
        let quad = Quad::new(
            Value::iri("a"),
            Value::iri("b"),
            Value::iri("c"),
            Some(Value::iri("g")),
        );
        writer.write_quad(&ctx, &quad).unwrap();
        writer.close().unwrap();
        let out = String::from_utf8(writer.into_inner()).unwrap();
        assert!(!out.contains("<g>"));
    }

    #[test]
    fn rejects_invalid_and_closed() {
        let ctx = CancellationToken::new();
        let mut writer = DotWriter::new(Vec::new());
        let bad = Quad::new(Value::iri(""), Value::iri("b"), Value::iri("c"), None);
        assert_eq!(writer.write_quad(&ctx, &bad).unwrap_err().kind(), ErrorKind::Invalid);
        assert_eq!(writer.written(), 0);
        writer.close().unwrap();
        assert_eq!(
            writer.write_quad(&ctx, &film_quads()[0]).unwrap_err().kind(),
            ErrorKind::Closed
        );
    }

    #[test]
    fn write_only_descriptor() {
        let format = format();
        assert!(format.can_write());
        assert!(!format.can_read());
        assert!(format.open_reader(std::io::empty()).is_err());
    }
}
