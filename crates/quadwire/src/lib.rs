//! Quad interchange: one data model, many wire encodings.
//!
//! quadwire reads and writes streams of RDF-style quads in several
//! encodings that all share the same streaming protocol, so any reader can
//! be copied into any writer.
//!
//! # Crate Structure
//!
//! - [`model`]: values, quads and error kinds
//! - [`format`]: reader/writer traits, `copy` and the format registry
//! - [`frame`]: varint framing and the `framed` binary format
//! - [`text`]: `json`, `json-stream` and `graphviz`

use std::sync::Once;

use quadwire_format::{Format, FormatRegistry};

/// Re-export model types.
pub mod model {
    pub use quadwire_model::*;
}

/// Re-export streaming protocol and registry types.
pub mod format {
    pub use quadwire_format::*;
}

/// Re-export framing types.
pub mod frame {
    pub use quadwire_frame::*;
}

/// Re-export text codecs.
pub mod text {
    pub use quadwire_text::*;
}

pub use quadwire_format::{
    copy, copy_with_config, CancellationToken, CopyError, QuadReader, QuadWriter,
};
pub use quadwire_model::{Direction, ErrorKind, Quad, QuadError, Value};

/// Descriptors for every format shipped with quadwire.
pub fn builtin_formats() -> Vec<Format> {
    let mut formats = quadwire_text::formats();
    formats.push(quadwire_frame::quads::format());
    formats
}

/// A fresh registry holding only the built-in formats.
pub fn builtin_registry() -> FormatRegistry {
    let mut registry = FormatRegistry::new();
    for format in builtin_formats() {
        if let Err(err) = registry.register(format) {
            tracing::warn!(error = %err, "skipping built-in format");
        }
    }
    registry
}

static BUILTINS: Once = Once::new();

/// Add the built-in formats to the process-wide registry.
///
/// Safe to call any number of times. A name already registered by the
/// application is left alone.
pub fn register_builtin_formats() {
    BUILTINS.call_once(|| {
        for format in builtin_formats() {
            if quadwire_format::format_by_name(&format.name).is_some() {
                tracing::debug!(format = %format.name, "format already registered");
                continue;
            }
            if let Err(err) = quadwire_format::register_format(format) {
                tracing::warn!(error = %err, "built-in format not registered");
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_registry_has_every_format() {
        let registry = builtin_registry();
        assert_eq!(
            registry.names(),
            vec!["framed", "graphviz", "json", "json-stream"]
        );
    }

    #[test]
    fn global_registration_is_idempotent() {
        register_builtin_formats();
        register_builtin_formats();
        assert!(quadwire_format::format_by_name("framed").is_some());
        assert!(quadwire_format::format_by_extension(".json").is_some());
        assert!(quadwire_format::format_by_media_type("text/vnd.graphviz").is_some());
    }
}
