//! Datatype-keyed conversions from typed literals to native values.
//!
//! Codecs that decode typed literals call [`convert_typed`] to map them onto
//! [`Value::Int`], [`Value::Float`] and friends. Datatypes without a
//! registered conversion, and lexical forms a conversion rejects, stay
//! [`Value::Typed`].

use std::collections::HashMap;
use std::sync::{LazyLock, PoisonError, RwLock};

use crate::error::{QuadError, Result};
use crate::value::Value;
use crate::vocab::{XSD_BOOLEAN, XSD_DOUBLE, XSD_FLOAT, XSD_INT, XSD_INTEGER, XSD_LONG, XSD_STRING};

/// Converts the lexical form of a typed literal into a native value.
pub type StringConversion = fn(&str) -> Result<Value>;

static CONVERSIONS: LazyLock<RwLock<HashMap<String, StringConversion>>> = LazyLock::new(|| {
    let mut table: HashMap<String, StringConversion> = HashMap::new();
    for datatype in [XSD_INTEGER, XSD_INT, XSD_LONG] {
        table.insert(datatype.to_string(), parse_int);
    }
    for datatype in [XSD_DOUBLE, XSD_FLOAT] {
        table.insert(datatype.to_string(), parse_float);
    }
    table.insert(XSD_BOOLEAN.to_string(), parse_bool);
    table.insert(XSD_STRING.to_string(), |s| Ok(Value::String(s.to_string())));
    RwLock::new(table)
});

/// Register (or replace) the conversion used for `datatype`.
pub fn register_string_conversion(datatype: impl Into<String>, conversion: StringConversion) {
    let datatype = datatype.into();
    tracing::debug!(%datatype, "registering string conversion");
    CONVERSIONS
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(datatype, conversion);
}

/// True when `datatype` has a registered conversion.
pub fn has_string_conversion(datatype: &str) -> bool {
    CONVERSIONS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .contains_key(datatype)
}

/// Convert a typed literal, falling back to [`Value::Typed`] as-is.
pub fn convert_typed(value: &str, datatype: &str) -> Value {
    let conversion = CONVERSIONS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(datatype)
        .copied();
    match conversion.map(|convert| convert(value)) {
        Some(Ok(native)) => native,
        Some(Err(err)) => {
            tracing::trace!(%datatype, error = %err, "keeping typed literal unconverted");
            Value::typed(value, datatype)
        }
        None => Value::typed(value, datatype),
    }
}

fn parse_int(s: &str) -> Result<Value> {
    s.trim()
        .parse::<i64>()
        .map(Value::Int)
        .map_err(|err| QuadError::malformed("xsd:integer", err.to_string()))
}

fn parse_float(s: &str) -> Result<Value> {
    let s = s.trim();
    let parsed = match s {
        "INF" | "+INF" => Ok(f64::INFINITY),
        "-INF" => Ok(f64::NEG_INFINITY),
        other => other.parse::<f64>(),
    };
    parsed
        .map(Value::Float)
        .map_err(|err| QuadError::malformed("xsd:double", err.to_string()))
}

fn parse_bool(s: &str) -> Result<Value> {
    match s.trim() {
        "true" | "1" => Ok(Value::Bool(true)),
        "false" | "0" => Ok(Value::Bool(false)),
        other => Err(QuadError::malformed(
            "xsd:boolean",
            format!("not a boolean: {other}"),
        )),
    }
}
