use bitvec::order::Msb0;
use bitvec::slice::BitSlice;

use super::{BitCodec, Context, FieldSize};
use crate::errors::CodecError;
use crate::values::{BitString, Value};

/// Opaque bit-string payload; the codec is the identity. The size is
/// fixed or read from an earlier integer field (as a bit count).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryEncoding {
    pub size: FieldSize,
}

impl BinaryEncoding {
    pub fn fixed(size_in_bits: u32) -> Self {
        Self {
            size: FieldSize::Fixed(size_in_bits),
        }
    }

    pub fn dynamic(reference: super::InstanceRef) -> Self {
        Self {
            size: FieldSize::Dynamic(reference),
        }
    }
}

impl BitCodec for BinaryEncoding {
    fn size(&self, ctx: Context<'_>) -> Result<u32, CodecError> {
        self.size.resolve(ctx)
    }

    fn encode(&self, value: &Value, ctx: Context<'_>) -> Result<BitString, CodecError> {
        let bits = value.as_bits().ok_or_else(|| {
            CodecError::TypeMismatch(format!("cannot encode {} as binary", value.type_name()))
        })?;
        let expected = self.size(ctx)? as usize;
        if bits.len() != expected {
            return Err(CodecError::SizeMismatch {
                expected,
                actual: bits.len(),
            });
        }
        Ok(bits.clone())
    }

    fn decode(&self, bits: &BitSlice<u8, Msb0>, ctx: Context<'_>) -> Result<Value, CodecError> {
        let expected = self.size(ctx)? as usize;
        if bits.len() != expected {
            return Err(CodecError::SizeMismatch {
                expected,
                actual: bits.len(),
            });
        }
        Ok(Value::Bits(bits.to_bitvec()))
    }
}
