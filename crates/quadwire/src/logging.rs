use clap::ValueEnum;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Target prefix shared by every quadwire crate.
const QUADWIRE_TARGET: &str = "quadwire";

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_filter(self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

/// `level` applies to quadwire's own crates; everything else stays at warn
/// or quieter.
fn targets(level: LogLevel) -> Targets {
    let level = level.as_filter();
    Targets::new()
        .with_default(level.min(LevelFilter::WARN))
        .with_target(QUADWIRE_TARGET, level)
}

/// Route `tracing` events to stderr so stdout stays free for quad data.
///
/// Text logs drop the event target; json logs keep it so per-crate events
/// (`quadwire_frame`, `quadwire_text`, ...) can be told apart.
pub fn init_logging(format: LogFormat, level: LogLevel) {
    let filter = targets(level);
    let layer = fmt::layer().with_writer(std::io::stderr).with_ansi(false);

    let installed = match format {
        LogFormat::Text => tracing_subscriber::registry()
            .with(layer.with_target(false))
            .with(filter)
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(layer.json().with_current_span(false))
            .with(filter)
            .try_init(),
    };
    // A subscriber set by an embedding process wins.
    let _ = installed;
}
