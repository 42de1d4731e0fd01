//! Streaming quad protocol and format registry.
//!
//! Every codec implements [`QuadReader`] and/or [`QuadWriter`]. [`copy()`]
//! drains any reader into any writer, so converting between two encodings
//! is always: open a reader for one format, a writer for the other, copy.
//!
//! Formats are discovered through a [`FormatRegistry`], either an isolated
//! instance or the process-wide one in [`global`].

pub mod config;
pub mod copy;
pub mod error;
pub mod global;
pub mod registry;
pub mod stream;

pub use config::{CopyConfig, DuplicatePolicy, RegistryConfig, DEFAULT_BATCH_SIZE};
pub use copy::{copy, copy_with_config};
pub use error::{CopyError, FormatError, PartialWrite, Result};
pub use global::{
    format_by_extension, format_by_media_type, format_by_name, register_format,
    registered_formats, with_registry,
};
pub use registry::{
    BoxQuadReader, BoxQuadWriter, Format, FormatRegistry, MarshalValueFn, ReaderFn,
    UnmarshalValueFn, WriterFn,
};
pub use stream::{
    check_cancelled, from_quads, read_all, IterReader, MemoryWriter, QuadReader, QuadWriter,
    SliceReader,
};
pub use tokio_util::sync::CancellationToken;
