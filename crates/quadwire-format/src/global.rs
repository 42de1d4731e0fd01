//! The process-wide format registry.
//!
//! Codec crates register into it from their own `register_global` functions;
//! registrations may happen in any order and may interleave with lookups.
//! Lookups return clones so no lock is held while a codec runs.

use std::sync::{LazyLock, PoisonError, RwLock, RwLockReadGuard};

use crate::error::Result;
use crate::registry::{Format, FormatRegistry};

static GLOBAL: LazyLock<RwLock<FormatRegistry>> =
    LazyLock::new(|| RwLock::new(FormatRegistry::new()));

fn read() -> RwLockReadGuard<'static, FormatRegistry> {
    GLOBAL.read().unwrap_or_else(PoisonError::into_inner)
}

/// Register a format in the process-wide registry.
pub fn register_format(format: Format) -> Result<()> {
    GLOBAL
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .register(format)
}

pub fn format_by_name(name: &str) -> Option<Format> {
    read().by_name(name).cloned()
}

pub fn format_by_extension(ext: &str) -> Option<Format> {
    read().by_extension(ext).cloned()
}

pub fn format_by_media_type(media_type: &str) -> Option<Format> {
    read().by_media_type(media_type).cloned()
}

/// Every registered format, in registration order.
pub fn registered_formats() -> Vec<Format> {
    read().formats().to_vec()
}

/// Run `f` against the process-wide registry under its read lock.
pub fn with_registry<T>(f: impl FnOnce(&FormatRegistry) -> T) -> T {
    f(&read())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FormatError;

    #[test]
    fn global_registration_and_lookup() {
        register_format(
            Format::new("global-test-format")
                .with_extensions([".gtf"])
                .with_media_types(["application/x-global-test"]),
        )
        .unwrap();

        assert!(format_by_name("global-test-format").is_some());
        assert_eq!(
            format_by_extension(".gtf").map(|f| f.name),
            Some("global-test-format".to_string())
        );
        assert!(format_by_media_type("application/x-global-test").is_some());
        assert!(registered_formats()
            .iter()
            .any(|f| f.name == "global-test-format"));
        assert!(with_registry(|r| r.by_name("global-test-format").is_some()));

        let err = register_format(Format::new("global-test-format")).unwrap_err();
        assert!(matches!(err, FormatError::DuplicateName(_)));
    }
}
