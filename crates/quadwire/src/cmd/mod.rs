use clap::{Args, Subcommand};
use std::path::PathBuf;

use quadwire::format::DEFAULT_BATCH_SIZE;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod convert;
pub mod formats;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert a quad stream from one format to another.
    Convert(ConvertArgs),
    /// List registered formats.
    Formats(FormatsArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Convert(args) => convert::run(args, format),
        Command::Formats(args) => formats::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Input file. Reads stdin when omitted.
    pub input: Option<PathBuf>,
    /// Output file. Writes stdout when omitted.
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
    /// Input format name. Default: inferred from the input extension.
    #[arg(long, value_name = "FORMAT")]
    pub from: Option<String>,
    /// Output format name. Default: inferred from the output extension.
    #[arg(long, value_name = "FORMAT")]
    pub to: Option<String>,
    /// Buffer the whole input and write quads in canonical text order.
    #[arg(long)]
    pub sort: bool,
    /// Quads handed to the writer per batch.
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,
}

#[derive(Args, Debug, Default)]
pub struct FormatsArgs {
    /// Only list formats that can be read.
    #[arg(long)]
    pub readable: bool,
    /// Only list formats that can be written.
    #[arg(long)]
    pub writable: bool,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
