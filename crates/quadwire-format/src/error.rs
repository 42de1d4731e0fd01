use quadwire_model::QuadError;

/// Errors from the format registry.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    /// A format with this name is already registered.
    #[error("format {0:?} is already registered")]
    DuplicateName(String),

    /// No registered format matches the requested name, extension or media type.
    #[error("unknown format: {0}")]
    UnknownFormat(String),

    /// The format exists but does not provide the requested capability.
    #[error("format {name} has no {capability}")]
    Unsupported {
        name: String,
        capability: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, FormatError>;

/// A batch write that stopped early.
#[derive(Debug, thiserror::Error)]
#[error("write failed after {written} quads: {source}")]
pub struct PartialWrite {
    /// Quads of the batch written before the failure.
    pub written: usize,
    #[source]
    pub source: QuadError,
}

/// A [`copy`](crate::copy()) that stopped early.
#[derive(Debug, thiserror::Error)]
#[error("copy failed after {copied} quads: {source}")]
pub struct CopyError {
    /// Quads transferred before the failure.
    pub copied: u64,
    #[source]
    pub source: QuadError,
}
