use std::fmt;

use crate::convert::convert_typed;
use crate::vocab::{XSD_BOOLEAN, XSD_DOUBLE, XSD_INTEGER};

/// A single quad field.
///
/// The variants are closed: every codec matches on all of them. `Raw` is the
/// universal form for codecs that carry no richer typing; an empty `Raw`,
/// `Iri` or `BNode` marks an absent value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Opaque identifier text, printed as-is.
    Raw(String),
    /// IRI without the surrounding angle brackets.
    Iri(String),
    /// Blank node label without the `_:` prefix.
    BNode(String),
    /// Plain string literal.
    String(String),
    /// Literal with an explicit datatype IRI.
    Typed { value: String, datatype: String },
    /// Language-tagged string literal.
    Lang { value: String, lang: String },
    Int(i64),
    Float(f64),
    Bool(bool),
}

/// The closest primitive representation of a [`Value`].
#[derive(Debug, Clone, PartialEq)]
pub enum Native {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// No primitive exists; the value itself.
    Value(Value),
}

impl Value {
    pub fn raw(s: impl Into<String>) -> Self {
        Self::Raw(s.into())
    }

    pub fn iri(s: impl Into<String>) -> Self {
        Self::Iri(s.into())
    }

    pub fn bnode(s: impl Into<String>) -> Self {
        Self::BNode(s.into())
    }

    pub fn string(s: impl Into<String>) -> Self {
        Self::String(s.into())
    }

    pub fn typed(value: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self::Typed {
            value: value.into(),
            datatype: datatype.into(),
        }
    }

    pub fn lang(value: impl Into<String>, lang: impl Into<String>) -> Self {
        Self::Lang {
            value: value.into(),
            lang: lang.into(),
        }
    }

    /// False only for identifiers whose text is empty.
    ///
    /// Literals are always present, even when their native conversion fails.
    pub fn is_valid(&self) -> bool {
        match self {
            Self::Raw(s) | Self::Iri(s) | Self::BNode(s) => !s.is_empty(),
            Self::String(_)
            | Self::Typed { .. }
            | Self::Lang { .. }
            | Self::Int(_)
            | Self::Float(_)
            | Self::Bool(_) => true,
        }
    }

    /// True for values that name a node rather than hold data.
    pub fn is_identifier(&self) -> bool {
        matches!(self, Self::Raw(_) | Self::Iri(_) | Self::BNode(_))
    }

    pub fn native(&self) -> Native {
        match self {
            Self::Raw(s) | Self::String(s) => Native::Str(s.clone()),
            Self::Lang { value, .. } => Native::Str(value.clone()),
            Self::Iri(_) | Self::BNode(_) => Native::Value(self.clone()),
            Self::Typed { value, datatype } => match convert_typed(value, datatype) {
                converted @ Self::Typed { .. } => Native::Value(converted),
                converted => converted.native(),
            },
            Self::Int(v) => Native::Int(*v),
            Self::Float(v) => Native::Float(*v),
            Self::Bool(v) => Native::Bool(*v),
        }
    }

    /// Replace a typed literal by its registered native variant, if any.
    pub fn into_native_value(self) -> Self {
        match self {
            Self::Typed { value, datatype } => convert_typed(&value, &datatype),
            other => other,
        }
    }

    /// Parse the canonical text form produced by `Display`.
    ///
    /// Text that is not a well-formed IRI, blank node or literal is kept as
    /// [`Value::Raw`], so parsing never fails.
    pub fn parse(s: &str) -> Self {
        parse_term(s).unwrap_or_else(|| Self::Raw(s.to_string()))
    }
}

/// Render `v`, or the empty string when absent.
pub fn string_of(v: Option<&Value>) -> String {
    v.map(Value::to_string).unwrap_or_default()
}

/// Native form of `v`, or `None` when absent.
pub fn native_of(v: Option<&Value>) -> Option<Native> {
    v.map(Value::native)
}

/// False when `v` is absent or an empty identifier.
pub fn is_valid_value(v: Option<&Value>) -> bool {
    v.is_some_and(Value::is_valid)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raw(s) => f.write_str(s),
            Self::Iri(s) => write!(f, "<{s}>"),
            Self::BNode(s) => write!(f, "_:{s}"),
            Self::String(s) => write_quoted(f, s),
            Self::Typed { value, datatype } => {
                write_quoted(f, value)?;
                write!(f, "^^<{datatype}>")
            }
            Self::Lang { value, lang } => {
                write_quoted(f, value)?;
                write!(f, "@{lang}")
            }
            Self::Int(v) => write!(f, "\"{v}\"^^<{XSD_INTEGER}>"),
            Self::Float(v) => {
                f.write_str("\"")?;
                write_double(f, *v)?;
                write!(f, "\"^^<{XSD_DOUBLE}>")
            }
            Self::Bool(v) => write!(f, "\"{v}\"^^<{XSD_BOOLEAN}>"),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

/// A value that names a graph node: raw text, an IRI or a blank node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identifier {
    Raw(String),
    Iri(String),
    BNode(String),
}

impl From<Identifier> for Value {
    fn from(id: Identifier) -> Self {
        match id {
            Identifier::Raw(s) => Self::Raw(s),
            Identifier::Iri(s) => Self::Iri(s),
            Identifier::BNode(s) => Self::BNode(s),
        }
    }
}

impl TryFrom<Value> for Identifier {
    type Error = Value;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Raw(s) => Ok(Self::Raw(s)),
            Value::Iri(s) => Ok(Self::Iri(s)),
            Value::BNode(s) => Ok(Self::BNode(s)),
            literal => Err(literal),
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raw(s) => f.write_str(s),
            Self::Iri(s) => write!(f, "<{s}>"),
            Self::BNode(s) => write!(f, "_:{s}"),
        }
    }
}

/// xsd:double lexical form; Rust spells infinity `inf`.
fn write_double(f: &mut fmt::Formatter<'_>, v: f64) -> fmt::Result {
    if v.is_nan() {
        f.write_str("NaN")
    } else if v.is_infinite() {
        f.write_str(if v > 0.0 { "INF" } else { "-INF" })
    } else {
        write!(f, "{v}")
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_str("\"")?;
    for c in s.chars() {
        match c {
            '\\' => f.write_str("\\\\")?,
            '"' => f.write_str("\\\"")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c => write!(f, "{c}")?,
        }
    }
    f.write_str("\"")
}

fn parse_term(s: &str) -> Option<Value> {
    if let Some(inner) = s.strip_prefix('<').and_then(|r| r.strip_suffix('>')) {
        return is_iri_text(inner).then(|| Value::Iri(inner.to_string()));
    }
    if let Some(label) = s.strip_prefix("_:") {
        return (!label.contains(char::is_whitespace)).then(|| Value::BNode(label.to_string()));
    }
    if s.starts_with('"') {
        let (value, rest) = unquote(s)?;
        if rest.is_empty() {
            return Some(Value::String(value));
        }
        if let Some(datatype) = rest
            .strip_prefix("^^<")
            .and_then(|r| r.strip_suffix('>'))
        {
            return is_iri_text(datatype).then(|| Value::Typed {
                value,
                datatype: datatype.to_string(),
            });
        }
        if let Some(lang) = rest.strip_prefix('@') {
            let well_formed = !lang.is_empty()
                && lang.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
            return well_formed.then(|| Value::Lang {
                value,
                lang: lang.to_string(),
            });
        }
    }
    None
}

fn is_iri_text(s: &str) -> bool {
    !s.contains(['<', '>']) && !s.contains(char::is_whitespace)
}

/// Split a leading quoted literal into its unescaped text and the remainder.
fn unquote(s: &str) -> Option<(String, &str)> {
    let body = s.strip_prefix('"')?;
    let mut out = String::with_capacity(body.len());
    let mut chars = body.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '"' => return Some((out, &body[i + 1..])),
            '\\' => {
                let (_, esc) = chars.next()?;
                match esc {
                    '\\' => out.push('\\'),
                    '"' => out.push('"'),
                    '\'' => out.push('\''),
                    'n' => out.push('\n'),
                    'r' => out.push('\r'),
                    't' => out.push('\t'),
                    'b' => out.push('\u{8}'),
                    'f' => out.push('\u{c}'),
                    'u' => out.push(unescape_hex(&mut chars, 4)?),
                    'U' => out.push(unescape_hex(&mut chars, 8)?),
                    _ => return None,
                }
            }
            c => out.push(c),
        }
    }
    None
}

fn unescape_hex(chars: &mut std::str::CharIndices<'_>, digits: usize) -> Option<char> {
    let mut code = 0u32;
    for _ in 0..digits {
        let (_, c) = chars.next()?;
        code = code * 16 + c.to_digit(16)?;
    }
    char::from_u32(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::XSD_DATE;

    #[test]
    fn doubles_use_xsd_lexical_forms() {
        let text = |v: f64| Value::Float(v).to_string();
        assert_eq!(text(f64::INFINITY), format!("\"INF\"^^<{XSD_DOUBLE}>"));
        assert_eq!(text(f64::NEG_INFINITY), format!("\"-INF\"^^<{XSD_DOUBLE}>"));
        assert_eq!(text(f64::NAN), format!("\"NaN\"^^<{XSD_DOUBLE}>"));
        assert_eq!(text(-0.25), format!("\"-0.25\"^^<{XSD_DOUBLE}>"));
        for v in [f64::INFINITY, f64::NEG_INFINITY] {
            assert_eq!(Value::parse(&text(v)).into_native_value(), Value::Float(v));
        }
    }

    #[test]
    fn canonical_text_forms() {
        assert_eq!(Value::raw("abc").to_string(), "abc");
        assert_eq!(Value::iri("http://ex.org/a").to_string(), "<http://ex.org/a>");
        assert_eq!(Value::bnode("b0").to_string(), "_:b0");
        assert_eq!(
            Value::string("say \"hi\"\n").to_string(),
            r#""say \"hi\"\n""#
        );
        assert_eq!(
            Value::typed("1990-07-04", XSD_DATE).to_string(),
            "\"1990-07-04\"^^<http://www.w3.org/2001/XMLSchema#date>"
        );
        assert_eq!(Value::lang("chat", "fr").to_string(), "\"chat\"@fr");
        assert_eq!(
            Value::Int(42).to_string(),
            "\"42\"^^<http://www.w3.org/2001/XMLSchema#integer>"
        );
        assert_eq!(
            Value::Bool(true).to_string(),
            "\"true\"^^<http://www.w3.org/2001/XMLSchema#boolean>"
        );
    }

    #[test]
    fn raw_text_is_stable() {
        for s in ["", "x", "<not closed", "\"open", "a b c"] {
            assert_eq!(Value::raw(s).to_string(), s);
        }
    }

    #[test]
    fn parse_inverts_display() {
        let values = [
            Value::iri("http://ex.org/a#b"),
            Value::bnode("n1"),
            Value::string("tab\there \\ \"quoted\""),
            Value::typed("x", "http://ex.org/dt"),
            Value::lang("colour", "en-GB"),
            Value::raw("plain"),
        ];
        for v in values {
            assert_eq!(Value::parse(&v.to_string()), v);
        }
    }

    #[test]
    fn parse_falls_back_to_raw() {
        assert_eq!(Value::parse("\"unterminated"), Value::raw("\"unterminated"));
        assert_eq!(Value::parse("\"bad\\q\""), Value::raw("\"bad\\q\""));
        assert_eq!(Value::parse("<a> <b>"), Value::raw("<a> <b>"));
        assert_eq!(Value::parse("\"x\"@"), Value::raw("\"x\"@"));
        assert_eq!(Value::parse(""), Value::raw(""));
    }

    #[test]
    fn parse_unicode_escapes() {
        assert_eq!(Value::parse(r#""caf\u00e9""#), Value::string("café"));
        assert_eq!(Value::parse(r#""\U0001F600""#), Value::string("😀"));
    }

    #[test]
    fn validity() {
        assert!(!is_valid_value(None));
        assert!(!is_valid_value(Some(&Value::raw(""))));
        assert!(!is_valid_value(Some(&Value::iri(""))));
        assert!(!is_valid_value(Some(&Value::bnode(""))));
        assert!(is_valid_value(Some(&Value::string(""))));
        assert!(is_valid_value(Some(&Value::typed("nope", crate::vocab::XSD_INTEGER))));
    }

    #[test]
    fn null_safe_accessors() {
        assert_eq!(string_of(None), "");
        assert_eq!(native_of(None), None);
        assert_eq!(string_of(Some(&Value::iri("a"))), "<a>");
    }

    #[test]
    fn native_forms() {
        assert_eq!(Value::raw("r").native(), Native::Str("r".into()));
        assert_eq!(Value::Int(3).native(), Native::Int(3));
        assert_eq!(Value::lang("v", "en").native(), Native::Str("v".into()));
        assert_eq!(
            Value::iri("a").native(),
            Native::Value(Value::iri("a"))
        );
        assert_eq!(
            Value::typed("17", crate::vocab::XSD_INTEGER).native(),
            Native::Int(17)
        );
        let broken = Value::typed("seventeen", crate::vocab::XSD_INTEGER);
        assert_eq!(broken.native(), Native::Value(broken.clone()));
    }

    #[test]
    fn identifiers() {
        assert!(Value::bnode("x").is_identifier());
        assert!(!Value::string("x").is_identifier());
        let id = Identifier::try_from(Value::iri("a")).unwrap();
        assert_eq!(id.to_string(), "<a>");
        assert_eq!(Value::from(id), Value::iri("a"));
        assert!(Identifier::try_from(Value::Int(1)).is_err());
    }
}
