//! Text quad encodings: `json`, `json-stream` and the write-only
//! `graphviz` format.
//!
//! `json` and `json-stream` share a wire shape: an object with `subject`,
//! `predicate`, `object` and, when present, `label`, each holding the
//! canonical text of a value. `json` buffers the whole array on read,
//! `json-stream` reads one object at a time.

pub mod dot;
pub mod json;
pub mod json_stream;
mod wire;

use quadwire_format::{Format, FormatRegistry};

pub use dot::DotWriter;
pub use json::{JsonReader, JsonWriter};
pub use json_stream::{JsonStreamReader, JsonStreamWriter};

/// Descriptors for every format in this crate.
pub fn formats() -> Vec<Format> {
    vec![json::format(), json_stream::format(), dot::format()]
}

/// Add the text formats to `registry`.
pub fn register(registry: &mut FormatRegistry) -> quadwire_format::Result<()> {
    for format in formats() {
        registry.register(format)?;
    }
    Ok(())
}

/// Add the text formats to the process-wide registry.
pub fn register_global() -> quadwire_format::Result<()> {
    for format in formats() {
        quadwire_format::register_format(format)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registers_all_formats() {
        let mut registry = FormatRegistry::new();
        register(&mut registry).unwrap();

        assert_eq!(registry.names(), vec!["graphviz", "json", "json-stream"]);
        assert_eq!(registry.by_extension(".dot").unwrap().name, "graphviz");
        assert_eq!(registry.by_extension("gv").unwrap().name, "graphviz");
        assert_eq!(
            registry
                .by_media_type("application/json; charset=utf-8")
                .unwrap()
                .name,
            "json"
        );
        assert!(registry.get("json").unwrap().marshal_value.is_some());
        assert!(registry.by_name("json-stream").unwrap().extensions.is_empty());
    }
}
