use std::fmt;
use std::io;

use quadwire::format::{CopyError, FormatError};
use quadwire::model::{ErrorKind, QuadError};

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const INTERNAL: i32 = 125;
pub const CANCELLED: i32 = 130;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(USAGE, message)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

fn io_code(kind: io::ErrorKind) -> i32 {
    match kind {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::NotFound | io::ErrorKind::BrokenPipe => FAILURE,
        _ => INTERNAL,
    }
}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    CliError::new(io_code(err.kind()), format!("{context}: {err}"))
}

fn io_kind(err: &QuadError) -> Option<io::ErrorKind> {
    match err {
        QuadError::Io(source) => Some(source.kind()),
        QuadError::AtRecord { source, .. } => io_kind(source),
        _ => None,
    }
}

pub fn quad_error(context: &str, err: &QuadError) -> CliError {
    let code = match err.kind() {
        ErrorKind::Invalid | ErrorKind::Incomplete | ErrorKind::Malformed => DATA_INVALID,
        ErrorKind::Cancelled => CANCELLED,
        ErrorKind::Io => io_kind(err).map_or(INTERNAL, io_code),
        ErrorKind::Closed | ErrorKind::InvalidDirection => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn copy_error(err: &CopyError) -> CliError {
    quad_error(
        &format!("conversion stopped after {} quads", err.copied),
        &err.source,
    )
}

pub fn format_error(err: FormatError) -> CliError {
    match err {
        FormatError::UnknownFormat(_) | FormatError::Unsupported { .. } => {
            CliError::usage(err.to_string())
        }
        other => CliError::new(INTERNAL, other.to_string()),
    }
}
