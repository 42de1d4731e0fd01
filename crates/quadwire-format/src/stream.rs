use quadwire_model::{Quad, QuadError, Result};
use tokio_util::sync::CancellationToken;

use crate::error::PartialWrite;

/// A forward-only cursor over a stream of quads.
///
/// `read_quad` returns `Ok(None)` at end of stream. A reader is owned by one
/// caller for its whole lifetime.
pub trait QuadReader {
    /// Read the next quad, or `None` when the stream is exhausted.
    fn read_quad(&mut self, ctx: &CancellationToken) -> Result<Option<Quad>>;

    /// Append up to `max` quads to `buf` and return how many were appended.
    ///
    /// Fewer than `max` means the stream ended. On error the quads read so
    /// far remain in `buf`.
    fn read_quads(
        &mut self,
        ctx: &CancellationToken,
        buf: &mut Vec<Quad>,
        max: usize,
    ) -> Result<usize> {
        let start = buf.len();
        while buf.len() - start < max {
            check_cancelled(ctx)?;
            match self.read_quad(ctx)? {
                Some(quad) => buf.push(quad),
                None => break,
            }
        }
        Ok(buf.len() - start)
    }

    /// Release the reader. Reading afterwards fails with `Closed`.
    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

/// A sink for quads in one encoding.
///
/// Writers reject quads that fail [`Quad::is_valid`] with
/// [`QuadError::Invalid`] before writing any byte for them.
pub trait QuadWriter {
    fn write_quad(&mut self, ctx: &CancellationToken, quad: &Quad) -> Result<()>;

    /// Write a batch, stopping at the first failure.
    fn write_quads(
        &mut self,
        ctx: &CancellationToken,
        quads: &[Quad],
    ) -> std::result::Result<usize, PartialWrite> {
        for (written, quad) in quads.iter().enumerate() {
            check_cancelled(ctx)
                .and_then(|()| self.write_quad(ctx, quad))
                .map_err(|source| PartialWrite { written, source })?;
        }
        Ok(quads.len())
    }

    /// Flush any trailer. Calling `close` again is a no-op.
    fn close(&mut self) -> Result<()>;
}

impl<R: QuadReader + ?Sized> QuadReader for Box<R> {
    fn read_quad(&mut self, ctx: &CancellationToken) -> Result<Option<Quad>> {
        (**self).read_quad(ctx)
    }

    fn read_quads(
        &mut self,
        ctx: &CancellationToken,
        buf: &mut Vec<Quad>,
        max: usize,
    ) -> Result<usize> {
        (**self).read_quads(ctx, buf, max)
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }
}

impl<W: QuadWriter + ?Sized> QuadWriter for Box<W> {
    fn write_quad(&mut self, ctx: &CancellationToken, quad: &Quad) -> Result<()> {
        (**self).write_quad(ctx, quad)
    }

    fn write_quads(
        &mut self,
        ctx: &CancellationToken,
        quads: &[Quad],
    ) -> std::result::Result<usize, PartialWrite> {
        (**self).write_quads(ctx, quads)
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }
}

/// Fail with [`QuadError::Cancelled`] once `ctx` has been cancelled.
pub fn check_cancelled(ctx: &CancellationToken) -> Result<()> {
    if ctx.is_cancelled() {
        return Err(QuadError::Cancelled);
    }
    Ok(())
}

/// Reads quads from any in-memory iterator.
pub struct IterReader<I> {
    iter: I,
    closed: bool,
}

/// Reader over an owned `Vec<Quad>`.
pub type SliceReader = IterReader<std::vec::IntoIter<Quad>>;

/// Build a reader over a sequence of quads.
pub fn from_quads<I>(quads: I) -> IterReader<I::IntoIter>
where
    I: IntoIterator<Item = Quad>,
{
    IterReader {
        iter: quads.into_iter(),
        closed: false,
    }
}

impl<I: Iterator<Item = Quad>> QuadReader for IterReader<I> {
    fn read_quad(&mut self, ctx: &CancellationToken) -> Result<Option<Quad>> {
        if self.closed {
            return Err(QuadError::Closed);
        }
        check_cancelled(ctx)?;
        Ok(self.iter.next())
    }

    fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }
}

/// Collects written quads in memory.
#[derive(Debug, Default)]
pub struct MemoryWriter {
    quads: Vec<Quad>,
    closed: bool,
}

impl MemoryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quads(&self) -> &[Quad] {
        &self.quads
    }

    pub fn into_quads(self) -> Vec<Quad> {
        self.quads
    }
}

impl QuadWriter for MemoryWriter {
    fn write_quad(&mut self, _ctx: &CancellationToken, quad: &Quad) -> Result<()> {
        if self.closed {
            return Err(QuadError::Closed);
        }
        if !quad.is_valid() {
            return Err(QuadError::Invalid.at(self.quads.len() as u64));
        }
        self.quads.push(quad.clone());
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }
}

/// Drain `reader` into a vector.
pub fn read_all<R: QuadReader + ?Sized>(ctx: &CancellationToken, reader: &mut R) -> Result<Vec<Quad>> {
    let mut quads = Vec::new();
    while let Some(quad) = reader.read_quad(ctx)? {
        quads.push(quad);
    }
    Ok(quads)
}

#[cfg(test)]
mod tests {
    use quadwire_model::{ErrorKind, Value};

    use super::*;

    fn quad(n: usize) -> Quad {
        Quad::new(
            Value::iri(format!("s{n}")),
            Value::iri("p"),
            Value::Int(n as i64),
            None,
        )
    }

    #[test]
    fn iter_reader_yields_then_ends() {
        let ctx = CancellationToken::new();
        let mut reader = from_quads(vec![quad(0), quad(1)]);
        assert_eq!(reader.read_quad(&ctx).unwrap(), Some(quad(0)));
        assert_eq!(reader.read_quad(&ctx).unwrap(), Some(quad(1)));
        assert_eq!(reader.read_quad(&ctx).unwrap(), None);
        assert_eq!(reader.read_quad(&ctx).unwrap(), None);
    }

    #[test]
    fn read_after_close_fails() {
        let ctx = CancellationToken::new();
        let mut reader = from_quads(vec![quad(0)]);
        reader.close().unwrap();
        let err = reader.read_quad(&ctx).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Closed);
    }

    #[test]
    fn read_quads_reports_short_batch_at_end() {
        let ctx = CancellationToken::new();
        let mut reader = from_quads((0..5).map(quad));
        let mut buf = Vec::new();
        assert_eq!(reader.read_quads(&ctx, &mut buf, 3).unwrap(), 3);
        assert_eq!(reader.read_quads(&ctx, &mut buf, 3).unwrap(), 2);
        assert_eq!(buf.len(), 5);
    }

    #[test]
    fn cancelled_read_aborts() {
        let ctx = CancellationToken::new();
        ctx.cancel();
        let mut reader = from_quads(vec![quad(0)]);
        let err = reader.read_quad(&ctx).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Cancelled);
    }

    #[test]
    fn memory_writer_rejects_invalid() {
        let ctx = CancellationToken::new();
        let mut writer = MemoryWriter::new();
        let bad = Quad::new(Value::raw(""), Value::iri("p"), Value::iri("o"), None);
        let err = writer.write_quads(&ctx, &[quad(0), bad, quad(2)]).unwrap_err();
        assert_eq!(err.written, 1);
        assert_eq!(err.source.kind(), ErrorKind::Invalid);
        assert_eq!(writer.quads(), &[quad(0)]);
    }

    #[test]
    fn memory_writer_close_is_idempotent() {
        let ctx = CancellationToken::new();
        let mut writer = MemoryWriter::new();
        writer.close().unwrap();
        writer.close().unwrap();
        assert_eq!(
            writer.write_quad(&ctx, &quad(0)).unwrap_err().kind(),
            ErrorKind::Closed
        );
    }

    #[test]
    fn read_all_collects() {
        let ctx = CancellationToken::new();
        let mut reader = from_quads((0..3).map(quad));
        assert_eq!(read_all(&ctx, &mut reader).unwrap().len(), 3);
    }
}
