use tokio_util::sync::CancellationToken;

use crate::config::CopyConfig;
use crate::error::{CopyError, PartialWrite};
use crate::stream::{check_cancelled, QuadReader, QuadWriter};

/// Drain `reader` into `writer` with the default [`CopyConfig`].
pub fn copy<W, R>(
    ctx: &CancellationToken,
    writer: &mut W,
    reader: &mut R,
) -> Result<u64, CopyError>
where
    W: QuadWriter + ?Sized,
    R: QuadReader + ?Sized,
{
    copy_with_config(ctx, writer, reader, &CopyConfig::default())
}

/// Drain `reader` into `writer`, handing chunks of `batch_size` quads to
/// [`QuadWriter::write_quads`].
///
/// Stops at the first error from either side. When the reader fails in the
/// middle of a chunk, the quads already read are written before the read
/// error is returned. The writer is not closed.
pub fn copy_with_config<W, R>(
    ctx: &CancellationToken,
    writer: &mut W,
    reader: &mut R,
    config: &CopyConfig,
) -> Result<u64, CopyError>
where
    W: QuadWriter + ?Sized,
    R: QuadReader + ?Sized,
{
    let batch_size = config.batch_size.max(1);
    let mut buf = Vec::with_capacity(batch_size.min(1024));
    let mut copied = 0u64;

    loop {
        check_cancelled(ctx).map_err(|source| CopyError { copied, source })?;

        buf.clear();
        let read = reader.read_quads(ctx, &mut buf, batch_size);

        if !buf.is_empty() {
            match writer.write_quads(ctx, &buf) {
                Ok(written) => copied += written as u64,
                Err(PartialWrite { written, source }) => {
                    copied += written as u64;
                    tracing::debug!(copied, error = %source, "copy stopped by writer");
                    return Err(CopyError { copied, source });
                }
            }
        }

        match read {
            Ok(n) if n < batch_size => break,
            Ok(_) => {}
            Err(source) => {
                tracing::debug!(copied, error = %source, "copy stopped by reader");
                return Err(CopyError { copied, source });
            }
        }
    }

    tracing::debug!(copied, "copy finished");
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use quadwire_model::{ErrorKind, Quad, QuadError, Result, Value};

    use super::*;
    use crate::stream::{from_quads, MemoryWriter};

    fn quad(n: usize) -> Quad {
        Quad::new(
            Value::bnode(format!("n{n}")),
            Value::iri("http://ex.org/p"),
            Value::string(format!("v{n}")),
            None,
        )
    }

    #[test]
    fn copies_everything_in_order() {
        let ctx = CancellationToken::new();
        let input: Vec<Quad> = (0..25).map(quad).collect();
        let mut writer = MemoryWriter::new();
        let n = copy_with_config(
            &ctx,
            &mut writer,
            &mut from_quads(input.clone()),
            &CopyConfig { batch_size: 4 },
        )
        .unwrap();
        assert_eq!(n, 25);
        assert_eq!(writer.quads(), input.as_slice());
    }

    #[test]
    fn empty_stream_copies_nothing() {
        let ctx = CancellationToken::new();
        let mut writer = MemoryWriter::new();
        let n = copy(&ctx, &mut writer, &mut from_quads(Vec::new())).unwrap();
        assert_eq!(n, 0);
    }

    #[test]
    fn writer_failure_reports_partial_count() {
        let ctx = CancellationToken::new();
        let mut input: Vec<Quad> = (0..6).map(quad).collect();
        input[4].object = Value::raw("");
        let mut writer = MemoryWriter::new();
        let err = copy_with_config(
            &ctx,
            &mut writer,
            &mut from_quads(input),
            &CopyConfig { batch_size: 3 },
        )
        .unwrap_err();
        assert_eq!(err.copied, 4);
        assert_eq!(err.source.kind(), ErrorKind::Invalid);
    }

    struct FailingReader {
        remaining: usize,
    }

    impl QuadReader for FailingReader {
        fn read_quad(&mut self, _ctx: &CancellationToken) -> Result<Option<Quad>> {
            if self.remaining == 0 {
                return Err(QuadError::malformed("test", "broken record"));
            }
            self.remaining -= 1;
            Ok(Some(quad(self.remaining)))
        }
    }

    #[test]
    fn reader_failure_flushes_partial_chunk() {
        let ctx = CancellationToken::new();
        let mut writer = MemoryWriter::new();
        let err = copy_with_config(
            &ctx,
            &mut writer,
            &mut FailingReader { remaining: 5 },
            &CopyConfig { batch_size: 3 },
        )
        .unwrap_err();
        assert_eq!(err.copied, 5);
        assert_eq!(writer.quads().len(), 5);
        assert_eq!(err.source.kind(), ErrorKind::Malformed);
    }

    #[test]
    fn cancellation_stops_copy() {
        let ctx = CancellationToken::new();
        ctx.cancel();
        let mut writer = MemoryWriter::new();
        let err = copy(&ctx, &mut writer, &mut from_quads((0..3).map(quad))).unwrap_err();
        assert_eq!(err.copied, 0);
        assert_eq!(err.source.kind(), ErrorKind::Cancelled);
    }

    struct CancelAfter {
        inner: MemoryWriter,
        ctx: CancellationToken,
        limit: usize,
    }

    impl QuadWriter for CancelAfter {
        fn write_quad(&mut self, ctx: &CancellationToken, quad: &Quad) -> Result<()> {
            self.inner.write_quad(ctx, quad)?;
            if self.inner.quads().len() == self.limit {
                self.ctx.cancel();
            }
            Ok(())
        }

        fn close(&mut self) -> Result<()> {
            self.inner.close()
        }
    }

    #[test]
    fn cancellation_is_checked_between_quads() {
        let ctx = CancellationToken::new();
        let mut writer = CancelAfter {
            inner: MemoryWriter::new(),
            ctx: ctx.clone(),
            limit: 2,
        };
        let err = copy(&ctx, &mut writer, &mut from_quads((0..10).map(quad))).unwrap_err();
        assert_eq!(err.copied, 2);
        assert_eq!(err.source.kind(), ErrorKind::Cancelled);
    }
}
