use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::time::Instant;

use quadwire::format::{
    copy_with_config, from_quads, read_all, with_registry, CancellationToken, CopyConfig,
    CopyError, Format, FormatError, QuadReader, QuadWriter, SliceReader,
};
use quadwire::model::sort_by_quad_string;

use crate::cmd::ConvertArgs;
use crate::exit::{
    copy_error, format_error, io_error, quad_error, CliError, CliResult, INTERNAL, SUCCESS, USAGE,
};
use crate::output::{print_summary, ConvertSummary, OutputFormat};

pub fn run(args: ConvertArgs, format: OutputFormat) -> CliResult<i32> {
    let from = resolve_format(args.from.as_deref(), args.input.as_deref(), "--from")?;
    let to = resolve_format(args.to.as_deref(), args.output.as_deref(), "--to")?;
    if args.batch_size == 0 {
        return Err(CliError::usage("--batch-size must be at least 1"));
    }

    let source: Box<dyn Read + Send> = match &args.input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).map_err(|err| io_error(&format!("open {}", path.display()), err))?,
        )),
        None => Box::new(io::stdin()),
    };
    let mut reader = from.open_reader(source).map_err(format_error)?;

    let sink: Box<dyn Write + Send> = match &args.output {
        Some(path) => Box::new(
            File::create(path).map_err(|err| io_error(&format!("create {}", path.display()), err))?,
        ),
        None => Box::new(io::stdout()),
    };
    let mut writer = to
        .open_writer(BufWriter::new(sink))
        .map_err(format_error)?;

    let ctx = CancellationToken::new();
    install_ctrlc_handler(ctx.clone())?;

    tracing::debug!(from = %from.name, to = %to.name, sort = args.sort, "starting conversion");
    let started = Instant::now();
    let config = CopyConfig {
        batch_size: args.batch_size,
    };

    let copied = if args.sort {
        sorted_copy(&ctx, &mut *writer, &mut *reader, &config)
    } else {
        copy_with_config(&ctx, &mut *writer, &mut *reader, &config)
    };

    // Close on failure too so buffered output reaches the sink.
    let closed = writer.close();
    if let Err(err) = reader.close() {
        tracing::debug!(error = %err, "closing input failed");
    }

    let quads = copied.map_err(|err| {
        tracing::error!(copied = err.copied, error = %err.source, "conversion failed");
        copy_error(&err)
    })?;
    closed.map_err(|err| quad_error("close output", &err))?;

    let elapsed_ms = started.elapsed().as_millis();
    tracing::info!(quads, elapsed_ms, from = %from.name, to = %to.name, "conversion finished");

    if args.output.is_some() {
        print_summary(
            &ConvertSummary {
                input_format: &from.name,
                output_format: &to.name,
                quads,
                elapsed_ms,
            },
            format,
        );
    }
    Ok(SUCCESS)
}

fn sorted_copy(
    ctx: &CancellationToken,
    writer: &mut dyn QuadWriter,
    reader: &mut dyn QuadReader,
    config: &CopyConfig,
) -> Result<u64, CopyError> {
    let mut quads = read_all(ctx, reader).map_err(|source| CopyError { copied: 0, source })?;
    sort_by_quad_string(&mut quads);
    let mut sorted: SliceReader = from_quads(quads);
    copy_with_config(ctx, writer, &mut sorted, config)
}

/// Pick a format by explicit name, falling back to the file extension.
fn resolve_format(name: Option<&str>, path: Option<&Path>, flag: &str) -> CliResult<Format> {
    if let Some(name) = name {
        return with_registry(|registry| registry.get(name).cloned()).map_err(|err| match err {
            FormatError::UnknownFormat(_) => CliError::new(
                USAGE,
                format!("{err}; run `quadwire formats` to list formats"),
            ),
            other => format_error(other),
        });
    }

    let Some(path) = path else {
        return Err(CliError::usage(format!(
            "{flag} is required when using stdin/stdout"
        )));
    };
    with_registry(|registry| registry.by_path(path).cloned()).ok_or_else(|| {
        CliError::usage(format!(
            "cannot infer format from {}; pass {flag}",
            path.display()
        ))
    })
}

fn install_ctrlc_handler(ctx: CancellationToken) -> CliResult<()> {
    ctrlc::set_handler(move || {
        ctx.cancel();
    })
    .map_err(|err| CliError::new(INTERNAL, format!("signal handler setup failed: {err}")))
}
