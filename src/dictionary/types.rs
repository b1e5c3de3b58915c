use bitvec::order::Msb0;
use bitvec::slice::BitSlice;

use crate::dictionary::parameters::{Enumeration, Unit};
use crate::encodings::array::ArrayEncoding;
use crate::encodings::binary::BinaryEncoding;
use crate::encodings::boolean::BooleanEncoding;
use crate::encodings::integer::IntegerEncoding;
use crate::encodings::string::StringEncoding;
use crate::encodings::{BitCodec, Context};
use crate::errors::CodecError;
use crate::values::{BitString, Value};

/// A named parameter or argument type. Each variant binds the data
/// encoding that realizes it on the wire.
#[derive(Debug, Clone)]
pub enum EntryType {
    Integer(IntegerType),
    Float(FloatType),
    Enumerated(EnumeratedType),
    Boolean(BooleanType),
    String(StringType),
    Binary(BinaryType),
    Array(ArrayType),
    AbsoluteTime(AbsoluteTimeType),
}

impl EntryType {
    pub fn name(&self) -> &str {
        match self {
            EntryType::Integer(t) => &t.name,
            EntryType::Float(t) => &t.name,
            EntryType::Enumerated(t) => &t.name,
            EntryType::Boolean(t) => &t.name,
            EntryType::String(t) => &t.name,
            EntryType::Binary(t) => &t.name,
            EntryType::Array(t) => &t.name,
            EntryType::AbsoluteTime(t) => &t.name,
        }
    }

    /// Bits this type occupies on the wire, possibly depending on
    /// already-known fields in the context.
    pub fn size(&self, ctx: Context<'_>) -> Result<u32, CodecError> {
        match self {
            EntryType::Integer(t) => t.encoding.size(ctx),
            EntryType::Float(t) => t.encoding.size(ctx),
            EntryType::Enumerated(t) => t.encoding.size(ctx),
            EntryType::Boolean(t) => t.encoding.size(ctx),
            EntryType::String(t) => t.encoding.size(ctx),
            EntryType::Binary(t) => t.encoding.size(ctx),
            EntryType::Array(t) => t.encoding.size(ctx),
            EntryType::AbsoluteTime(t) => t.encoding.size(ctx),
        }
    }

    pub fn encode(&self, value: &Value, ctx: Context<'_>) -> Result<BitString, CodecError> {
        match self {
            EntryType::Integer(t) => t.encoding.encode(value, ctx),
            EntryType::Float(t) => t.encoding.encode(value, ctx),
            EntryType::Enumerated(t) => t.encoding.encode(value, ctx),
            EntryType::Boolean(t) => t.encoding.encode(value, ctx),
            EntryType::String(t) => t.encoding.encode(value, ctx),
            EntryType::Binary(t) => t.encoding.encode(value, ctx),
            EntryType::Array(t) => t.encoding.encode(value, ctx),
            EntryType::AbsoluteTime(t) => t.encoding.encode(value, ctx),
        }
    }

    pub fn decode(&self, bits: &BitSlice<u8, Msb0>, ctx: Context<'_>) -> Result<Value, CodecError> {
        match self {
            EntryType::Integer(t) => t.encoding.decode(bits, ctx),
            // An uncalibrated float type still yields a real value.
            EntryType::Float(t) => Ok(match t.encoding.decode(bits, ctx)? {
                Value::Integer(raw) => Value::Real(raw as f64),
                value => value,
            }),
            EntryType::Enumerated(t) => t.encoding.decode(bits, ctx),
            EntryType::Boolean(t) => t.encoding.decode(bits, ctx),
            EntryType::String(t) => t.encoding.decode(bits, ctx),
            EntryType::Binary(t) => t.encoding.decode(bits, ctx),
            EntryType::Array(t) => t.encoding.decode(bits, ctx),
            EntryType::AbsoluteTime(t) => t.encoding.decode(bits, ctx),
        }
    }

    /// Casts a dictionary string value (restriction criteria come from
    /// XML attributes) to this type's native record value.
    pub fn value_from_string(&self, raw: &str) -> Result<Value, CodecError> {
        match self {
            EntryType::Integer(_) | EntryType::Enumerated(_) | EntryType::AbsoluteTime(_) => raw
                .parse::<i64>()
                .map(Value::Integer)
                .map_err(|_| cast_error(raw, "integer")),
            EntryType::Float(_) => raw
                .parse::<f64>()
                .map(Value::Real)
                .map_err(|_| cast_error(raw, "real")),
            EntryType::Boolean(t) => {
                if raw == t.encoding.one_label {
                    Ok(Value::Boolean(true))
                } else if raw == t.encoding.zero_label {
                    Ok(Value::Boolean(false))
                } else {
                    Err(cast_error(raw, "boolean"))
                }
            }
            EntryType::String(_) => Ok(Value::Text(raw.to_string())),
            EntryType::Binary(_) => hex::decode(raw)
                .map(|bytes| Value::Bits(BitString::from_vec(bytes)))
                .map_err(|_| CodecError::InvalidHex(raw.to_string())),
            EntryType::Array(_) => Err(cast_error(raw, "array")),
        }
    }
}

fn cast_error(raw: &str, target: &str) -> CodecError {
    CodecError::TypeMismatch(format!("cannot cast \"{raw}\" to {target}"))
}

#[derive(Debug, Clone)]
pub struct IntegerType {
    pub name: String,
    /// Semantic signedness and width of the engineering value; the wire
    /// representation is governed by `encoding`.
    pub signed: bool,
    pub size_in_bits: u32,
    pub unit_set: Vec<Unit>,
    pub encoding: IntegerEncoding,
}

impl IntegerType {
    pub fn new(name: impl Into<String>, encoding: IntegerEncoding) -> Self {
        Self {
            name: name.into(),
            signed: true,
            size_in_bits: 32,
            unit_set: Vec::new(),
            encoding,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FloatType {
    pub name: String,
    pub size_in_bits: u32,
    pub unit_set: Vec<Unit>,
    /// Floats round-trip through a calibrated integer encoding; there is
    /// no native IEEE encoding in this core.
    pub encoding: IntegerEncoding,
}

impl FloatType {
    pub fn new(name: impl Into<String>, encoding: IntegerEncoding) -> Self {
        Self {
            name: name.into(),
            size_in_bits: 64,
            unit_set: Vec::new(),
            encoding,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EnumeratedType {
    pub name: String,
    pub initial_value: Option<String>,
    pub enumeration_list: Vec<Enumeration>,
    pub unit_set: Vec<Unit>,
    pub encoding: IntegerEncoding,
}

impl EnumeratedType {
    pub fn new(
        name: impl Into<String>,
        enumeration_list: Vec<Enumeration>,
        encoding: IntegerEncoding,
    ) -> Self {
        Self {
            name: name.into(),
            initial_value: None,
            enumeration_list,
            unit_set: Vec::new(),
            encoding,
        }
    }

    pub fn label_for(&self, value: i64) -> Option<&str> {
        self.enumeration_list
            .iter()
            .find(|e| e.value == value)
            .map(|e| e.label.as_str())
    }

    pub fn value_for(&self, label: &str) -> Option<i64> {
        self.enumeration_list
            .iter()
            .find(|e| e.label == label)
            .map(|e| e.value)
    }
}

#[derive(Debug, Clone)]
pub struct BooleanType {
    pub name: String,
    pub encoding: BooleanEncoding,
}

impl BooleanType {
    pub fn new(name: impl Into<String>, encoding: BooleanEncoding) -> Self {
        Self {
            name: name.into(),
            encoding,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StringType {
    pub name: String,
    pub encoding: StringEncoding,
}

impl StringType {
    pub fn new(name: impl Into<String>, encoding: StringEncoding) -> Self {
        Self {
            name: name.into(),
            encoding,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BinaryType {
    pub name: String,
    pub encoding: BinaryEncoding,
}

impl BinaryType {
    pub fn new(name: impl Into<String>, encoding: BinaryEncoding) -> Self {
        Self {
            name: name.into(),
            encoding,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ArrayType {
    pub name: String,
    pub encoding: ArrayEncoding,
}

impl ArrayType {
    pub fn new(name: impl Into<String>, encoding: ArrayEncoding) -> Self {
        Self {
            name: name.into(),
            encoding,
        }
    }
}

/// Time since a reference epoch. Defaults to the 32-bit unsigned seconds
/// encoding when the dictionary gives none.
#[derive(Debug, Clone)]
pub struct AbsoluteTimeType {
    pub name: String,
    pub short_description: String,
    pub reference_time: ReferenceTime,
    pub encoding: IntegerEncoding,
}

impl AbsoluteTimeType {
    pub fn new(name: impl Into<String>, reference_time: ReferenceTime) -> Self {
        Self {
            name: name.into(),
            short_description: String::new(),
            reference_time,
            encoding: IntegerEncoding::unsigned(32),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReferenceTime {
    pub epoch: Option<String>,
    /// Parameter the timestamp is offset from, when not epoch-based.
    pub offset_from: Option<String>,
}
