/// What happens when a format is registered under a name already in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Fail with `FormatError::DuplicateName`; the first registration stays.
    #[default]
    Reject,
    /// The new format replaces the old one in place.
    Replace,
}

/// Controls format registration and lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Behavior on duplicate format names.
    pub on_duplicate: DuplicatePolicy,
    /// When true, extensions and media types match ASCII case-insensitively.
    /// Format names always match exactly.
    pub case_insensitive_lookup: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            on_duplicate: DuplicatePolicy::Reject,
            case_insensitive_lookup: true,
        }
    }
}

/// Default read-ahead chunk used by [`copy`](crate::copy()).
pub const DEFAULT_BATCH_SIZE: usize = 10_000;

/// Controls [`copy_with_config`](crate::copy_with_config).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyConfig {
    /// Maximum quads read ahead before handing them to the writer.
    pub batch_size: usize,
}

impl Default for CopyConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}
