use std::sync::OnceLock;

use bitvec::order::Msb0;
use bitvec::slice::BitSlice;

use super::{BitCodec, Context, InstanceRef};
use crate::dictionary::types::EntryType;
use crate::errors::CodecError;
use crate::values::{BitString, Value};

/// One bound of an array dimension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArrayIndex {
    Fixed(i64),
    Dynamic(InstanceRef),
}

impl ArrayIndex {
    fn resolve(&self, ctx: Context<'_>) -> Result<i64, CodecError> {
        match self {
            ArrayIndex::Fixed(index) => Ok(*index),
            ArrayIndex::Dynamic(reference) => reference.resolve(ctx),
        }
    }
}

/// A single dimension spanning `start..=end`; multi-dimensional arrays
/// are not supported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dimension {
    pub start: ArrayIndex,
    pub end: ArrayIndex,
}

impl Dimension {
    pub fn fixed(start: i64, end: i64) -> Self {
        Self {
            start: ArrayIndex::Fixed(start),
            end: ArrayIndex::Fixed(end),
        }
    }

    /// Dimension whose element count equals an earlier field's value.
    pub fn counted_by(reference: InstanceRef) -> Self {
        Self {
            start: ArrayIndex::Fixed(1),
            end: ArrayIndex::Dynamic(reference),
        }
    }

    pub fn element_count(&self, ctx: Context<'_>) -> Result<usize, CodecError> {
        let count = self.end.resolve(ctx)? - self.start.resolve(ctx)? + 1;
        if count < 0 {
            return Err(CodecError::NegativeArrayLength(count));
        }
        Ok(count as usize)
    }
}

/// Homogeneous array of another named type. The element type is resolved
/// through the dictionary on first use and cached; the cache is the only
/// lazily-written state in a loaded dictionary and is thread-safe.
#[derive(Debug, Clone)]
pub struct ArrayEncoding {
    pub element_type_ref: String,
    pub dimension: Dimension,
    element: OnceLock<Box<EntryType>>,
}

impl ArrayEncoding {
    pub fn new(element_type_ref: impl Into<String>, dimension: Dimension) -> Self {
        Self {
            element_type_ref: element_type_ref.into(),
            dimension,
            element: OnceLock::new(),
        }
    }

    fn element(&self, ctx: Context<'_>) -> Result<&EntryType, CodecError> {
        if let Some(element) = self.element.get() {
            return Ok(element);
        }
        let resolved = ctx.system.get_entry_type(&self.element_type_ref)?.clone();
        Ok(self.element.get_or_init(|| Box::new(resolved)))
    }
}

impl BitCodec for ArrayEncoding {
    fn size(&self, ctx: Context<'_>) -> Result<u32, CodecError> {
        let count = self.dimension.element_count(ctx)? as u64;
        let element_bits = self.element(ctx)?.size(ctx)? as u64;
        u32::try_from(count * element_bits).map_err(|_| CodecError::Unsupported {
            what: "array size",
            value: (count * element_bits).to_string(),
        })
    }

    fn encode(&self, value: &Value, ctx: Context<'_>) -> Result<BitString, CodecError> {
        let items = value.as_list().ok_or_else(|| {
            CodecError::TypeMismatch(format!("cannot encode {} as array", value.type_name()))
        })?;
        let count = self.dimension.element_count(ctx)?;
        if items.len() != count {
            return Err(CodecError::ArrayLengthMismatch {
                expected: count,
                actual: items.len(),
            });
        }
        let element = self.element(ctx)?;
        let mut out = BitString::new();
        for item in items {
            out.extend_from_bitslice(&element.encode(item, ctx)?);
        }
        Ok(out)
    }

    fn decode(&self, bits: &BitSlice<u8, Msb0>, ctx: Context<'_>) -> Result<Value, CodecError> {
        let count = self.dimension.element_count(ctx)?;
        let element = self.element(ctx)?;
        let mut items = Vec::with_capacity(count);
        let mut cursor = bits;
        for _ in 0..count {
            let width = element.size(ctx)? as usize;
            if cursor.len() < width {
                return Err(CodecError::SizeMismatch {
                    expected: width,
                    actual: cursor.len(),
                });
            }
            let (head, rest) = cursor.split_at(width);
            items.push(element.decode(head, ctx)?);
            cursor = rest;
        }
        if !cursor.is_empty() {
            return Err(CodecError::SizeMismatch {
                expected: bits.len() - cursor.len(),
                actual: bits.len(),
            });
        }
        Ok(Value::List(items))
    }
}
