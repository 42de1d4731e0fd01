use crate::quad::Direction;

/// Errors produced while building, reading or writing quads.
#[derive(Debug, thiserror::Error)]
pub enum QuadError {
    /// The quad fails [`Quad::is_valid`](crate::Quad::is_valid).
    #[error("invalid quad")]
    Invalid,

    /// A decoded record is missing a required field.
    #[error("incomplete quad: missing {0}")]
    Incomplete(Direction),

    /// The reader or writer was already closed.
    #[error("stream is closed")]
    Closed,

    /// Format-specific syntax error.
    #[error("malformed {format} encoding: {message}")]
    Malformed {
        format: &'static str,
        message: String,
    },

    /// The cancellation token fired between two quads.
    #[error("operation cancelled")]
    Cancelled,

    /// Field access through a direction that does not name a field.
    #[error("direction {0} does not select a quad field")]
    InvalidDirection(Direction),

    /// An I/O error from the underlying byte source or sink.
    #[error("quad I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Another error, annotated with the zero-based index of the record.
    #[error("record {index}: {source}")]
    AtRecord {
        index: u64,
        #[source]
        source: Box<QuadError>,
    },
}

/// Classification of a [`QuadError`], ignoring record annotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Invalid,
    Incomplete,
    Closed,
    Malformed,
    Cancelled,
    InvalidDirection,
    Io,
}

impl QuadError {
    /// Build a [`QuadError::Malformed`] for the given format name.
    pub fn malformed(format: &'static str, message: impl Into<String>) -> Self {
        Self::Malformed {
            format,
            message: message.into(),
        }
    }

    /// Annotate the error with the index of the offending record.
    ///
    /// An error that already carries an index keeps the innermost one.
    pub fn at(self, index: u64) -> Self {
        match self {
            already @ Self::AtRecord { .. } => already,
            other => Self::AtRecord {
                index,
                source: Box::new(other),
            },
        }
    }

    /// The record index, when the error carries one.
    pub fn record_index(&self) -> Option<u64> {
        match self {
            Self::AtRecord { index, .. } => Some(*index),
            _ => None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Invalid => ErrorKind::Invalid,
            Self::Incomplete(_) => ErrorKind::Incomplete,
            Self::Closed => ErrorKind::Closed,
            Self::Malformed { .. } => ErrorKind::Malformed,
            Self::Cancelled => ErrorKind::Cancelled,
            Self::InvalidDirection(_) => ErrorKind::InvalidDirection,
            Self::Io(_) => ErrorKind::Io,
            Self::AtRecord { source, .. } => source.kind(),
        }
    }
}

pub type Result<T> = std::result::Result<T, QuadError>;
