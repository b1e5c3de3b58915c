use std::fmt;

use bitvec::prelude::*;
use itertools::Itertools;

/// Packed wire bits, most significant bit first.
pub type BitString = BitVec<u8, Msb0>;

/// A single decoded or to-be-encoded field value.
///
/// Calibrated fields decode to [`Value::Real`], raw integer fields to
/// [`Value::Integer`]; arrays decode to a [`Value::List`] of their element
/// values. [`Value::Bits`] carries opaque binary payloads bit-exactly.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Real(f64),
    Boolean(bool),
    Text(String),
    Bits(BitString),
    List(Vec<Value>),
}

impl Value {
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric view: integers widen to f64.
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Value::Integer(v) => Some(*v as f64),
            Value::Real(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bits(&self) -> Option<&BitString> {
        match self {
            Value::Bits(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(v) => Some(v),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "integer",
            Value::Real(_) => "real",
            Value::Boolean(_) => "boolean",
            Value::Text(_) => "text",
            Value::Bits(_) => "bits",
            Value::List(_) => "list",
        }
    }
}

/// The display form is also the comparison form: include conditions and
/// restriction criteria match `value.to_string()` against the dictionary's
/// string value, so `Integer(2)` compares equal to `"2"`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{v}"),
            Value::Real(v) => write!(f, "{v}"),
            Value::Boolean(v) => write!(f, "{v}"),
            Value::Text(v) => write!(f, "{v}"),
            Value::Bits(v) => {
                for bit in v.iter() {
                    f.write_str(if *bit { "1" } else { "0" })?;
                }
                Ok(())
            }
            Value::List(v) => write!(f, "[{}]", v.iter().join(", ")),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v as i64)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Integer(v as i64)
    }
}

impl From<u8> for Value {
    fn from(v: u8) -> Self {
        Value::Integer(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<BitString> for Value {
    fn from(v: BitString) -> Self {
        Value::Bits(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::List(v)
    }
}
