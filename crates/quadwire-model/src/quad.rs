use std::cmp::Ordering;
use std::fmt;

use crate::error::{QuadError, Result};
use crate::value::{string_of, Value};

/// Selects one field of a [`Quad`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Matches every field; not a field selector itself.
    Any,
    Subject,
    Predicate,
    Object,
    Label,
}

impl Direction {
    /// The four directions that name a field, in quad order.
    pub const ALL: [Direction; 4] = [
        Direction::Subject,
        Direction::Predicate,
        Direction::Object,
        Direction::Label,
    ];

    /// Single-byte prefix used when a direction is part of a key.
    pub fn prefix(self) -> u8 {
        match self {
            Self::Any => b'a',
            Self::Subject => b's',
            Self::Predicate => b'p',
            Self::Object => b'o',
            Self::Label => b'c',
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Subject => "subject",
            Self::Predicate => "predicate",
            Self::Object => "object",
            Self::Label => "label",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One graph edge: subject, predicate, object and an optional label.
#[derive(Debug, Clone, PartialEq)]
pub struct Quad {
    pub subject: Value,
    pub predicate: Value,
    pub object: Value,
    pub label: Option<Value>,
}

impl Quad {
    pub fn new(
        subject: impl Into<Value>,
        predicate: impl Into<Value>,
        object: impl Into<Value>,
        label: Option<Value>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
            label,
        }
    }

    /// Field selected by `d`; `Ok(None)` for an absent label.
    pub fn get(&self, d: Direction) -> Result<Option<&Value>> {
        match d {
            Direction::Subject => Ok(Some(&self.subject)),
            Direction::Predicate => Ok(Some(&self.predicate)),
            Direction::Object => Ok(Some(&self.object)),
            Direction::Label => Ok(self.label.as_ref()),
            Direction::Any => Err(QuadError::InvalidDirection(d)),
        }
    }

    /// Replace the field selected by `d`.
    ///
    /// An invalid value (such as an empty raw string) clears the label.
    pub fn set(&mut self, d: Direction, v: Value) -> Result<()> {
        match d {
            Direction::Subject => self.subject = v,
            Direction::Predicate => self.predicate = v,
            Direction::Object => self.object = v,
            Direction::Label => self.label = v.is_valid().then_some(v),
            Direction::Any => return Err(QuadError::InvalidDirection(d)),
        }
        Ok(())
    }

    /// Canonical text of the selected field; empty for `Any` or no label.
    pub fn get_string(&self, d: Direction) -> String {
        self.get(d).ok().flatten().map(Value::to_string).unwrap_or_default()
    }

    /// Subject, predicate and object are present; the label may be absent.
    pub fn is_valid(&self) -> bool {
        self.subject.is_valid() && self.predicate.is_valid() && self.object.is_valid()
    }

    /// The one-line `S P O [L] .` rendering.
    pub fn to_nquad(&self) -> String {
        self.to_string()
    }

    /// Orders by the string forms of subject, predicate, object, then label.
    pub fn cmp_by_string(&self, other: &Self) -> Ordering {
        self.subject
            .to_string()
            .cmp(&other.subject.to_string())
            .then_with(|| self.predicate.to_string().cmp(&other.predicate.to_string()))
            .then_with(|| self.object.to_string().cmp(&other.object.to_string()))
            .then_with(|| string_of(self.label.as_ref()).cmp(&string_of(other.label.as_ref())))
    }
}

impl fmt::Display for Quad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.subject, self.predicate, self.object)?;
        match &self.label {
            Some(label) if label.is_valid() => write!(f, " {label} ."),
            _ => f.write_str(" ."),
        }
    }
}

/// Sort quads in place by [`Quad::cmp_by_string`].
pub fn sort_by_quad_string(quads: &mut [Quad]) {
    quads.sort_by_cached_key(|q| {
        Direction::ALL.map(|d| q.get_string(d))
    });
}
