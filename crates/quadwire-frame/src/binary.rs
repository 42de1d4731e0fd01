//! Compact binary encoding of a [`Quad`] as one frame payload.
//!
//! Each of subject, predicate, object and label is a tag byte followed by
//! the value body. Strings are a uvarint byte length plus UTF-8 bytes.
//!
//! | tag | value      | body                          |
//! |-----|------------|-------------------------------|
//! | 0   | absent     | none                          |
//! | 1   | raw        | string                        |
//! | 2   | IRI        | string                        |
//! | 3   | blank node | string                        |
//! | 4   | string     | string                        |
//! | 5   | typed      | lexical string, datatype IRI  |
//! | 6   | language   | lexical string, language tag  |
//! | 7   | integer    | zigzag uvarint                |
//! | 8   | float      | 8 bytes, little-endian IEEE   |
//! | 9   | boolean    | one byte, 0 or 1              |

use bytes::{Buf, BufMut, Bytes, BytesMut};
use quadwire_model::{Direction, Quad, Value};

use crate::codec::Message;
use crate::error::{FrameError, Result};
use crate::varint::{get_uvarint, put_uvarint, uvarint_len, zigzag_decode, zigzag_encode};

const TAG_ABSENT: u8 = 0;
const TAG_RAW: u8 = 1;
const TAG_IRI: u8 = 2;
const TAG_BNODE: u8 = 3;
const TAG_STRING: u8 = 4;
const TAG_TYPED: u8 = 5;
const TAG_LANG: u8 = 6;
const TAG_INT: u8 = 7;
const TAG_FLOAT: u8 = 8;
const TAG_BOOL: u8 = 9;

impl Message for Quad {
    fn encode(&self, dst: &mut BytesMut) -> Result<()> {
        if !self.is_valid() {
            return Err(FrameError::InvalidQuad);
        }
        put_value(dst, Some(&self.subject));
        put_value(dst, Some(&self.predicate));
        put_value(dst, Some(&self.object));
        put_value(dst, stored_label(self));
        Ok(())
    }

    fn decode(mut src: Bytes) -> Result<Self> {
        let subject = get_value(&mut src)?.ok_or(FrameError::MissingField(Direction::Subject))?;
        let predicate =
            get_value(&mut src)?.ok_or(FrameError::MissingField(Direction::Predicate))?;
        let object = get_value(&mut src)?.ok_or(FrameError::MissingField(Direction::Object))?;
        let label = get_value(&mut src)?.filter(Value::is_valid);
        if src.has_remaining() {
            return Err(FrameError::MalformedPayload(format!(
                "{} trailing bytes after quad",
                src.remaining()
            )));
        }
        Ok(Quad {
            subject,
            predicate,
            object,
            label,
        })
    }

    fn encoded_len(&self) -> Option<usize> {
        Some(
            value_len(Some(&self.subject))
                + value_len(Some(&self.predicate))
                + value_len(Some(&self.object))
                + value_len(stored_label(self)),
        )
    }
}

// An invalid label is written as no label.
fn stored_label(quad: &Quad) -> Option<&Value> {
    quad.label.as_ref().filter(|label| label.is_valid())
}

fn str_len(s: &str) -> usize {
    uvarint_len(s.len() as u64) + s.len()
}

fn value_len(value: Option<&Value>) -> usize {
    let body = match value {
        None => 0,
        Some(Value::Raw(s) | Value::Iri(s) | Value::BNode(s) | Value::String(s)) => str_len(s),
        Some(Value::Typed { value, datatype }) => str_len(value) + str_len(datatype),
        Some(Value::Lang { value, lang }) => str_len(value) + str_len(lang),
        Some(Value::Int(i)) => uvarint_len(zigzag_encode(*i)),
        Some(Value::Float(_)) => 8,
        Some(Value::Bool(_)) => 1,
    };
    1 + body
}

fn put_str(dst: &mut BytesMut, s: &str) {
    put_uvarint(dst, s.len() as u64);
    dst.put_slice(s.as_bytes());
}

fn put_value(dst: &mut BytesMut, value: Option<&Value>) {
    match value {
        None => dst.put_u8(TAG_ABSENT),
        Some(Value::Raw(s)) => {
            dst.put_u8(TAG_RAW);
            put_str(dst, s);
        }
        Some(Value::Iri(s)) => {
            dst.put_u8(TAG_IRI);
            put_str(dst, s);
        }
        Some(Value::BNode(s)) => {
            dst.put_u8(TAG_BNODE);
            put_str(dst, s);
        }
        Some(Value::String(s)) => {
            dst.put_u8(TAG_STRING);
            put_str(dst, s);
        }
        Some(Value::Typed { value, datatype }) => {
            dst.put_u8(TAG_TYPED);
            put_str(dst, value);
            put_str(dst, datatype);
        }
        Some(Value::Lang { value, lang }) => {
            dst.put_u8(TAG_LANG);
            put_str(dst, value);
            put_str(dst, lang);
        }
        Some(Value::Int(i)) => {
            dst.put_u8(TAG_INT);
            put_uvarint(dst, zigzag_encode(*i));
        }
        Some(Value::Float(f)) => {
            dst.put_u8(TAG_FLOAT);
            dst.put_f64_le(*f);
        }
        Some(Value::Bool(b)) => {
            dst.put_u8(TAG_BOOL);
            dst.put_u8(u8::from(*b));
        }
    }
}

fn malformed(message: impl Into<String>) -> FrameError {
    FrameError::MalformedPayload(message.into())
}

fn get_u8(src: &mut Bytes) -> Result<u8> {
    if !src.has_remaining() {
        return Err(malformed("payload ends before value"));
    }
    Ok(src.get_u8())
}

fn get_str(src: &mut Bytes) -> Result<String> {
    let len = get_uvarint(src)?;
    if len > src.remaining() as u64 {
        return Err(malformed(format!(
            "string of {len} bytes overruns payload ({} left)",
            src.remaining()
        )));
    }
    let raw = src.split_to(len as usize);
    String::from_utf8(raw.to_vec()).map_err(|err| malformed(err.to_string()))
}

fn get_value(src: &mut Bytes) -> Result<Option<Value>> {
    let value = match get_u8(src)? {
        TAG_ABSENT => return Ok(None),
        TAG_RAW => Value::Raw(get_str(src)?),
        TAG_IRI => Value::Iri(get_str(src)?),
        TAG_BNODE => Value::BNode(get_str(src)?),
        TAG_STRING => Value::String(get_str(src)?),
        TAG_TYPED => Value::Typed {
            value: get_str(src)?,
            datatype: get_str(src)?,
        },
        TAG_LANG => Value::Lang {
            value: get_str(src)?,
            lang: get_str(src)?,
        },
        TAG_INT => Value::Int(zigzag_decode(get_uvarint(src)?)),
        TAG_FLOAT => {
            if src.remaining() < 8 {
                return Err(malformed("truncated float"));
            }
            Value::Float(src.get_f64_le())
        }
        TAG_BOOL => match get_u8(src)? {
            0 => Value::Bool(false),
            1 => Value::Bool(true),
            other => return Err(malformed(format!("invalid boolean byte {other}"))),
        },
        tag => return Err(malformed(format!("unknown value tag {tag}"))),
    };
    Ok(Some(value))
}
