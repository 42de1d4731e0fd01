//! Quad and value model for quadwire.
//!
//! This is the lowest layer. A [`Quad`] is four [`Value`]s: subject,
//! predicate, object and an optional label. Every codec reads and writes
//! these types and reports failures as [`QuadError`].

pub mod convert;
pub mod error;
pub mod quad;
pub mod value;
pub mod vocab;

pub use convert::{convert_typed, has_string_conversion, register_string_conversion, StringConversion};
pub use error::{ErrorKind, QuadError, Result};
pub use quad::{sort_by_quad_string, Direction, Quad};
pub use value::{is_valid_value, native_of, string_of, Identifier, Native, Value};
