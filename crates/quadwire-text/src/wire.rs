use std::io;

use quadwire_model::{convert_typed, Direction, Quad, QuadError, Result, Value};
use serde::{Deserialize, Serialize};

/// JSON shape of one quad.
#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct WireQuad {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<WireValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicate: Option<WireValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<WireValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<WireValue>,
}

/// One field on the wire.
///
/// Values are written as their canonical text. A value whose text would
/// decode to a different value, such as raw text that looks like an IRI or a
/// typed literal that reads back as a native number, is written as a tagged
/// object instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub(crate) enum WireValue {
    Text(String),
    Term(WireTerm),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub(crate) enum WireTerm {
    Raw { value: String },
    Iri { value: String },
    Bnode { value: String },
    Typed { value: String, datatype: String },
    Lang { value: String, lang: String },
}

impl From<&Value> for WireValue {
    fn from(value: &Value) -> Self {
        let text = value.to_string();
        if decode_text(&text) == *value {
            return Self::Text(text);
        }
        let term = match value {
            Value::Raw(s) => WireTerm::Raw { value: s.clone() },
            Value::Iri(s) => WireTerm::Iri { value: s.clone() },
            Value::BNode(s) => WireTerm::Bnode { value: s.clone() },
            Value::Typed { value, datatype } => WireTerm::Typed {
                value: value.clone(),
                datatype: datatype.clone(),
            },
            Value::Lang { value, lang } => WireTerm::Lang {
                value: value.clone(),
                lang: lang.clone(),
            },
            // NaN is the only value here and it never compares equal.
            Value::String(_) | Value::Int(_) | Value::Float(_) | Value::Bool(_) => {
                return Self::Text(text)
            }
        };
        Self::Term(term)
    }
}

impl WireValue {
    pub fn into_value(self) -> Value {
        match self {
            Self::Text(text) => decode_text(&text),
            Self::Term(WireTerm::Raw { value }) => Value::Raw(value),
            Self::Term(WireTerm::Iri { value }) => Value::Iri(value),
            Self::Term(WireTerm::Bnode { value }) => Value::BNode(value),
            Self::Term(WireTerm::Typed { value, datatype }) => Value::Typed { value, datatype },
            Self::Term(WireTerm::Lang { value, lang }) => Value::Lang { value, lang },
        }
    }
}

impl From<&Quad> for WireQuad {
    fn from(quad: &Quad) -> Self {
        Self {
            subject: Some(WireValue::from(&quad.subject)),
            predicate: Some(WireValue::from(&quad.predicate)),
            object: Some(WireValue::from(&quad.object)),
            label: quad
                .label
                .as_ref()
                .filter(|label| label.is_valid())
                .map(WireValue::from),
        }
    }
}

impl WireQuad {
    pub fn into_quad(self) -> Result<Quad> {
        let required = |field: Option<WireValue>, direction| {
            field
                .map(WireValue::into_value)
                .ok_or(QuadError::Incomplete(direction))
        };
        Ok(Quad {
            subject: required(self.subject, Direction::Subject)?,
            predicate: required(self.predicate, Direction::Predicate)?,
            object: required(self.object, Direction::Object)?,
            label: self
                .label
                .map(WireValue::into_value)
                .filter(Value::is_valid),
        })
    }
}

/// Parse canonical text.
///
/// A typed literal becomes its native value only when the native renders
/// back to the same text, so `"042"^^xsd:integer` stays typed.
pub(crate) fn decode_text(text: &str) -> Value {
    match Value::parse(text) {
        Value::Typed { value, datatype } => {
            let native = convert_typed(&value, &datatype);
            let typed = Value::Typed { value, datatype };
            if !matches!(native, Value::Typed { .. }) && native.to_string() == typed.to_string() {
                native
            } else {
                typed
            }
        }
        other => other,
    }
}

pub(crate) fn json_error(format: &'static str, err: serde_json::Error) -> QuadError {
    if err.is_io() {
        QuadError::Io(io::Error::from(err))
    } else {
        QuadError::malformed(format, err.to_string())
    }
}

/// A decode failure kept so every later read reports it again.
#[derive(Debug)]
pub(crate) enum Failure {
    Malformed(String),
    Io(io::ErrorKind, String),
}

impl Failure {
    pub fn record(err: &QuadError) -> Option<Self> {
        match err {
            QuadError::Io(io) => Some(Self::Io(io.kind(), io.to_string())),
            QuadError::Malformed { message, .. } => Some(Self::Malformed(message.clone())),
            QuadError::AtRecord { source, .. } => Self::record(source),
            _ => None,
        }
    }

    pub fn to_error(&self, format: &'static str) -> QuadError {
        match self {
            Self::Malformed(message) => QuadError::malformed(format, message.clone()),
            Self::Io(kind, message) => QuadError::Io(io::Error::new(*kind, message.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use quadwire_model::vocab::{XSD_BOOLEAN, XSD_DATE, XSD_INTEGER, XSD_STRING};

    use super::*;

    fn through_wire(value: &Value) -> Value {
        let json = serde_json::to_string(&WireValue::from(value)).unwrap();
        serde_json::from_str::<WireValue>(&json).unwrap().into_value()
    }

    #[test]
    fn label_is_omitted_when_absent() {
        let quad = Quad::new(Value::iri("s"), Value::iri("p"), Value::string("o"), None);
        let json = serde_json::to_string(&WireQuad::from(&quad)).unwrap();
        assert_eq!(json, r#"{"subject":"<s>","predicate":"<p>","object":"\"o\""}"#);
    }

    #[test]
    fn missing_field_is_incomplete() {
        let wire: WireQuad = serde_json::from_str(r#"{"subject":"<s>","object":"<o>"}"#).unwrap();
        let err = wire.into_quad().unwrap_err();
        assert!(matches!(err, QuadError::Incomplete(Direction::Predicate)));
    }

    #[test]
    fn empty_label_means_no_label() {
        for label in [r#""""#, r#"{"kind":"raw","value":""}"#] {
            let json = format!(r#"{{"subject":"a","predicate":"b","object":"c","label":{label}}}"#);
            let wire: WireQuad = serde_json::from_str(&json).unwrap();
            assert_eq!(wire.into_quad().unwrap().label, None, "label {label}");
        }
    }

    #[test]
    fn canonical_typed_literals_become_native() {
        assert_eq!(decode_text(&format!("\"12\"^^<{XSD_INTEGER}>")), Value::Int(12));
        assert_eq!(decode_text(&format!("\"true\"^^<{XSD_BOOLEAN}>")), Value::Bool(true));
        assert_eq!(decode_text("plain"), Value::raw("plain"));
    }

    #[test]
    fn non_canonical_lexical_forms_stay_typed() {
        for (lexical, datatype) in [("042", XSD_INTEGER), ("1", XSD_BOOLEAN), ("x", XSD_STRING)] {
            let text = Value::typed(lexical, datatype).to_string();
            assert_eq!(decode_text(&text), Value::typed(lexical, datatype));
        }
    }

    #[test]
    fn natives_and_plain_terms_stay_text() {
        for value in [
            Value::Int(-3),
            Value::Bool(false),
            Value::Float(2.5),
            Value::iri("http://a"),
            Value::raw("plain"),
            Value::typed("1990-07-04", XSD_DATE),
        ] {
            assert!(matches!(WireValue::from(&value), WireValue::Text(_)), "{value:?}");
            assert_eq!(through_wire(&value), value);
        }
    }

    #[test]
    fn ambiguous_values_use_tagged_objects() {
        let raw = Value::raw("<http://a>");
        assert_eq!(
            serde_json::to_string(&WireValue::from(&raw)).unwrap(),
            r#"{"kind":"raw","value":"<http://a>"}"#
        );
        let canonical_typed = Value::typed("42", XSD_INTEGER);
        assert_eq!(
            serde_json::to_string(&WireValue::from(&canonical_typed)).unwrap(),
            format!(r#"{{"kind":"typed","value":"42","datatype":"{XSD_INTEGER}"}}"#)
        );
        for value in [
            raw,
            canonical_typed,
            Value::raw("\"quoted\""),
            Value::iri("has space"),
            Value::bnode("a b"),
            Value::lang("hi", "en us"),
        ] {
            assert_eq!(through_wire(&value), value);
        }
    }

    #[test]
    fn unknown_kind_is_rejected() {
        assert!(serde_json::from_str::<WireValue>(r#"{"kind":"vector","value":"x"}"#).is_err());
    }
}
