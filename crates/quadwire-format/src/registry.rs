use std::fmt;
use std::io::{Read, Write};
use std::path::Path;

use quadwire_model::Value;

use crate::config::{DuplicatePolicy, RegistryConfig};
use crate::error::{FormatError, Result};
use crate::stream::{QuadReader, QuadWriter};

/// A boxed quad reader produced by a [`Format`].
pub type BoxQuadReader = Box<dyn QuadReader + Send>;
/// A boxed quad writer produced by a [`Format`].
pub type BoxQuadWriter = Box<dyn QuadWriter + Send>;

pub type ReaderFn = fn(Box<dyn Read + Send>) -> BoxQuadReader;
pub type WriterFn = fn(Box<dyn Write + Send>) -> BoxQuadWriter;
/// Encodes a single value outside of a quad stream.
pub type MarshalValueFn = fn(&Value) -> quadwire_model::Result<Vec<u8>>;
/// Decodes a single value; `None` stands for an explicitly absent value.
pub type UnmarshalValueFn = fn(&[u8]) -> quadwire_model::Result<Option<Value>>;

/// A named quad encoding and the constructors for its readers and writers.
#[derive(Clone)]
pub struct Format {
    pub name: String,
    /// File extensions including the leading `.`.
    pub extensions: Vec<String>,
    pub media_types: Vec<String>,
    pub reader: Option<ReaderFn>,
    pub writer: Option<WriterFn>,
    pub marshal_value: Option<MarshalValueFn>,
    pub unmarshal_value: Option<UnmarshalValueFn>,
}

impl Format {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extensions: Vec::new(),
            media_types: Vec::new(),
            reader: None,
            writer: None,
            marshal_value: None,
            unmarshal_value: None,
        }
    }

    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions.extend(extensions.into_iter().map(|ext| {
            let ext: String = ext.into();
            normalize_extension(&ext)
        }));
        self
    }

    pub fn with_media_types<I, S>(mut self, media_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.media_types
            .extend(media_types.into_iter().map(Into::into));
        self
    }

    pub fn with_reader(mut self, reader: ReaderFn) -> Self {
        self.reader = Some(reader);
        self
    }

    pub fn with_writer(mut self, writer: WriterFn) -> Self {
        self.writer = Some(writer);
        self
    }

    pub fn with_value_codec(mut self, marshal: MarshalValueFn, unmarshal: UnmarshalValueFn) -> Self {
        self.marshal_value = Some(marshal);
        self.unmarshal_value = Some(unmarshal);
        self
    }

    pub fn can_read(&self) -> bool {
        self.reader.is_some()
    }

    pub fn can_write(&self) -> bool {
        self.writer.is_some()
    }

    /// Open a reader for this format over `source`.
    pub fn open_reader(&self, source: impl Read + Send + 'static) -> Result<BoxQuadReader> {
        let reader = self.reader.ok_or_else(|| self.unsupported("reader"))?;
        Ok(reader(Box::new(source)))
    }

    /// Open a writer for this format over `sink`.
    pub fn open_writer(&self, sink: impl Write + Send + 'static) -> Result<BoxQuadWriter> {
        let writer = self.writer.ok_or_else(|| self.unsupported("writer"))?;
        Ok(writer(Box::new(sink)))
    }

    fn unsupported(&self, capability: &'static str) -> FormatError {
        FormatError::Unsupported {
            name: self.name.clone(),
            capability,
        }
    }
}

impl fmt::Debug for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Format")
            .field("name", &self.name)
            .field("extensions", &self.extensions)
            .field("media_types", &self.media_types)
            .field("reader", &self.can_read())
            .field("writer", &self.can_write())
            .field("value_codec", &self.marshal_value.is_some())
            .finish()
    }
}

/// Formats keyed by name, extension and media type.
///
/// Lookups by extension or media type return the first-registered match.
pub struct FormatRegistry {
    formats: Vec<Format>,
    config: RegistryConfig,
}

impl FormatRegistry {
    /// Create an empty registry with default config.
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create an empty registry with explicit config.
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            formats: Vec::new(),
            config,
        }
    }

    /// Register a format under its name.
    pub fn register(&mut self, format: Format) -> Result<()> {
        match self.formats.iter().position(|f| f.name == format.name) {
            None => {
                tracing::debug!(
                    name = %format.name,
                    extensions = ?format.extensions,
                    media_types = ?format.media_types,
                    "registering format"
                );
                self.formats.push(format);
                Ok(())
            }
            Some(_) if self.config.on_duplicate == DuplicatePolicy::Reject => {
                Err(FormatError::DuplicateName(format.name))
            }
            Some(index) => {
                tracing::warn!(name = %format.name, "replacing registered format");
                self.formats[index] = format;
                Ok(())
            }
        }
    }

    /// Format with exactly this name.
    pub fn by_name(&self, name: &str) -> Option<&Format> {
        self.formats.iter().find(|f| f.name == name)
    }

    /// First format claiming `ext` (with or without the leading `.`).
    pub fn by_extension(&self, ext: &str) -> Option<&Format> {
        let ext = normalize_extension(ext);
        self.formats
            .iter()
            .find(|f| f.extensions.iter().any(|e| self.matches(e, &ext)))
    }

    /// First format claiming the media type; parameters are ignored.
    pub fn by_media_type(&self, media_type: &str) -> Option<&Format> {
        let essence = media_type_essence(media_type);
        self.formats
            .iter()
            .find(|f| f.media_types.iter().any(|m| self.matches(m, essence)))
    }

    /// Format for a file path, chosen by its extension.
    pub fn by_path(&self, path: &Path) -> Option<&Format> {
        let ext = path.extension()?.to_str()?;
        self.by_extension(ext)
    }

    /// Resolve `name`, failing with [`FormatError::UnknownFormat`].
    pub fn get(&self, name: &str) -> Result<&Format> {
        self.by_name(name).ok_or_else(|| {
            tracing::debug!(%name, "format lookup missed");
            FormatError::UnknownFormat(name.to_string())
        })
    }

    /// All formats in registration order.
    pub fn formats(&self) -> &[Format] {
        &self.formats
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.formats.iter().map(|f| f.name.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.formats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }

    /// Get registry configuration.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    fn matches(&self, registered: &str, wanted: &str) -> bool {
        if self.config.case_insensitive_lookup {
            registered.eq_ignore_ascii_case(wanted)
        } else {
            registered == wanted
        }
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize_extension(ext: &str) -> String {
    if ext.starts_with('.') {
        ext.to_string()
    } else {
        format!(".{ext}")
    }
}

fn media_type_essence(media_type: &str) -> &str {
    media_type
        .split_once(';')
        .map_or(media_type, |(essence, _)| essence)
        .trim()
}
