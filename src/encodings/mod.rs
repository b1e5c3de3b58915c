pub mod array;
pub mod binary;
pub mod boolean;
pub mod calibration;
pub mod charset;
pub mod integer;
pub mod string;

pub use array::{ArrayEncoding, ArrayIndex, Dimension};
pub use binary::BinaryEncoding;
pub use boolean::BooleanEncoding;
pub use calibration::{Calibrator, PolynomialCalibrator, Term};
pub use charset::Charset;
pub use integer::{IntegerEncoding, IntegerSignedness};
pub use string::{StringEncoding, StringSize};

use bitvec::order::Msb0;
use bitvec::slice::BitSlice;

use crate::dictionary::SpaceSystem;
use crate::errors::CodecError;
use crate::values::{BitString, Record, Value};

/// Lookup context threaded through every codec call: the dictionary for
/// type references and the partial record for dynamic sizes. Plan order
/// matches wire order, so any earlier field a size refers to is already
/// present.
#[derive(Clone, Copy)]
pub struct Context<'a> {
    pub system: &'a SpaceSystem,
    pub entries: &'a Record,
}

/// Uniform contract of every data encoding.
pub trait BitCodec {
    /// Bits this field consumes or produces under the given context.
    fn size(&self, ctx: Context<'_>) -> Result<u32, CodecError>;

    fn encode(&self, value: &Value, ctx: Context<'_>) -> Result<BitString, CodecError>;

    fn decode(&self, bits: &BitSlice<u8, Msb0>, ctx: Context<'_>) -> Result<Value, CodecError>;
}

/// Reference to a previously decoded field that carries a size or count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstanceRef {
    Parameter(String),
    Argument(String),
}

impl InstanceRef {
    pub fn parameter(name: impl Into<String>) -> Self {
        InstanceRef::Parameter(name.into())
    }

    pub fn argument(name: impl Into<String>) -> Self {
        InstanceRef::Argument(name.into())
    }

    pub fn name(&self) -> &str {
        match self {
            InstanceRef::Parameter(name) | InstanceRef::Argument(name) => name,
        }
    }

    /// The integer value of the referenced field.
    pub fn resolve(&self, ctx: Context<'_>) -> Result<i64, CodecError> {
        let name = self.name();
        let value = ctx
            .entries
            .get(name)
            .ok_or_else(|| CodecError::MissingField(name.to_string()))?;
        value.as_integer().ok_or_else(|| {
            CodecError::TypeMismatch(format!(
                "size reference {name} is a {}, not an integer",
                value.type_name()
            ))
        })
    }
}

/// A bit count that is either fixed in the dictionary or read from an
/// earlier field of the same message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSize {
    Fixed(u32),
    Dynamic(InstanceRef),
}

impl FieldSize {
    pub fn resolve(&self, ctx: Context<'_>) -> Result<u32, CodecError> {
        match self {
            FieldSize::Fixed(bits) => Ok(*bits),
            FieldSize::Dynamic(reference) => {
                let bits = reference.resolve(ctx)?;
                u32::try_from(bits).map_err(|_| {
                    CodecError::TypeMismatch(format!(
                        "size reference {} resolved to {bits}",
                        reference.name()
                    ))
                })
            }
        }
    }
}

/// Bytes of a bit slice; a trailing partial byte is padded on the right.
pub(crate) fn bits_to_bytes(bits: &BitSlice<u8, Msb0>) -> Vec<u8> {
    use bitvec::field::BitField;
    let mut out = Vec::with_capacity(bits.len().div_ceil(8));
    for chunk in bits.chunks(8) {
        let mut byte = chunk.load_be::<u8>();
        if chunk.len() < 8 {
            byte <<= 8 - chunk.len();
        }
        out.push(byte);
    }
    out
}
