use quadwire_model::{Direction, QuadError};

/// Errors that can occur during frame encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The stream ended inside a length prefix.
    #[error("truncated length prefix")]
    TruncatedPrefix,

    /// The length prefix does not fit in 64 bits.
    #[error("length prefix overflows u64")]
    VarintOverflow,

    /// The length prefix promises more bytes than the stream holds.
    #[error("frame declares {declared} payload bytes but only {available} are available")]
    Truncated { declared: u64, available: u64 },

    /// The payload exceeds the configured maximum size.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: u64, max: usize },

    /// The payload bytes do not decode as the expected message.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    /// A decoded quad lacks a required field.
    #[error("decoded quad has no {0}")]
    MissingField(Direction),

    /// The quad fails validation and was not encoded.
    #[error("refusing to encode invalid quad")]
    InvalidQuad,

    /// A message encoded to a different size than it reported.
    #[error("message reported {reported} bytes but encoded {actual}")]
    SizeMismatch { reported: usize, actual: usize },

    /// An I/O error occurred while reading or writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FrameError>;

impl From<FrameError> for QuadError {
    fn from(err: FrameError) -> Self {
        match err {
            FrameError::Io(source) => QuadError::Io(source),
            FrameError::MissingField(direction) => QuadError::Incomplete(direction),
            FrameError::InvalidQuad => QuadError::Invalid,
            other => QuadError::malformed(crate::quads::FORMAT_NAME, other.to_string()),
        }
    }
}
