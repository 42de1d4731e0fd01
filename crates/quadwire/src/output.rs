use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use quadwire::format::Format;
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
pub struct FormatOutput<'a> {
    pub name: &'a str,
    pub extensions: &'a [String],
    pub media_types: &'a [String],
    pub read: bool,
    pub write: bool,
    pub value_codec: bool,
}

impl<'a> From<&'a Format> for FormatOutput<'a> {
    fn from(format: &'a Format) -> Self {
        Self {
            name: &format.name,
            extensions: &format.extensions,
            media_types: &format.media_types,
            read: format.can_read(),
            write: format.can_write(),
            value_codec: format.marshal_value.is_some(),
        }
    }
}

pub fn print_formats(formats: &[Format], format: OutputFormat) {
    let rows: Vec<FormatOutput<'_>> = formats.iter().map(FormatOutput::from).collect();
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(&rows).unwrap_or_else(|_| "[]".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["NAME", "EXTENSIONS", "MEDIA TYPES", "READ", "WRITE"]);
            for row in &rows {
                table.add_row(vec![
                    row.name.to_string(),
                    row.extensions.join(", "),
                    row.media_types.join(", "),
                    yes_no(row.read).to_string(),
                    yes_no(row.write).to_string(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for row in &rows {
                println!(
                    "{} ext=[{}] mime=[{}] read={} write={}",
                    row.name,
                    row.extensions.join(","),
                    row.media_types.join(","),
                    row.read,
                    row.write
                );
            }
        }
        OutputFormat::Raw => {
            for row in &rows {
                println!("{}", row.name);
            }
        }
    }
}

#[derive(Serialize)]
pub struct ConvertSummary<'a> {
    pub input_format: &'a str,
    pub output_format: &'a str,
    pub quads: u64,
    pub elapsed_ms: u128,
}

/// Report a finished conversion. Only used when quads went to a file.
pub fn print_summary(summary: &ConvertSummary<'_>, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(summary).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["FROM", "TO", "QUADS", "ELAPSED"])
                .add_row(vec![
                    summary.input_format.to_string(),
                    summary.output_format.to_string(),
                    summary.quads.to_string(),
                    format!("{}ms", summary.elapsed_ms),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "converted {} quads from {} to {} in {}ms",
                summary.quads, summary.input_format, summary.output_format, summary.elapsed_ms
            );
        }
        OutputFormat::Raw => println!("{}", summary.quads),
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}
