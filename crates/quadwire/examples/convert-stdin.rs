//! Read JSON-stream quads from stdin and write the framed binary form to stdout.
//!
//! ```sh
//! cargo run --example convert-stdin < quads.jsonl > quads.fq
//! ```

use std::io::{self, BufWriter};

use quadwire::format::{copy, format_by_name};
use quadwire::{register_builtin_formats, CancellationToken};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    register_builtin_formats();
    let from = format_by_name("json-stream").ok_or("json-stream not registered")?;
    let to = format_by_name("framed").ok_or("framed not registered")?;

    let mut reader = from.open_reader(io::stdin())?;
    let mut writer = to.open_writer(BufWriter::new(io::stdout()))?;

    let ctx = CancellationToken::new();
    let copied = copy(&ctx, &mut writer, &mut reader)?;
    writer.close()?;

    eprintln!("copied {copied} quads");
    Ok(())
}
