use bitvec::order::Msb0;
use bitvec::slice::BitSlice;

use super::charset::Charset;
use super::{bits_to_bytes, BitCodec, Context, InstanceRef};
use crate::errors::CodecError;
use crate::values::{BitString, Value};

/// How many bits a string field spans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StringSize {
    /// Width fixed in the dictionary.
    Fixed(u32),
    /// Width read from an earlier field of the same message.
    Dynamic(InstanceRef),
    /// Variable-length element; the buffer always spans `maxSizeInBits`.
    Variable(u32),
}

/// Text over a fixed- or dynamically-sized byte region. Shorter payloads
/// are zero-padded (after the optional termination sequence), longer
/// payloads are truncated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringEncoding {
    pub charset: Charset,
    pub size: StringSize,
    /// Hex-encoded termination byte sequence, e.g. `"00"` or `"0D0A"`.
    pub termination_char: Option<String>,
}

impl StringEncoding {
    pub fn fixed(charset: Charset, size_in_bits: u32) -> Self {
        Self {
            charset,
            size: StringSize::Fixed(size_in_bits),
            termination_char: None,
        }
    }

    pub fn dynamic(charset: Charset, reference: InstanceRef) -> Self {
        Self {
            charset,
            size: StringSize::Dynamic(reference),
            termination_char: None,
        }
    }

    pub fn variable(charset: Charset, max_size_in_bits: u32) -> Self {
        Self {
            charset,
            size: StringSize::Variable(max_size_in_bits),
            termination_char: None,
        }
    }

    pub fn terminated(mut self, termination_char: impl Into<String>) -> Self {
        self.termination_char = Some(termination_char.into());
        self
    }

    fn termination_bytes(&self) -> Result<Option<Vec<u8>>, CodecError> {
        match &self.termination_char {
            Some(hex_str) => hex::decode(hex_str)
                .map(Some)
                .map_err(|_| CodecError::InvalidHex(hex_str.clone())),
            None => Ok(None),
        }
    }

    fn buffer_bytes(&self, ctx: Context<'_>) -> Result<usize, CodecError> {
        let bits = self.size(ctx)? as usize;
        if bits % 8 != 0 {
            return Err(CodecError::Unsupported {
                what: "string field size",
                value: format!("{bits} bits"),
            });
        }
        Ok(bits / 8)
    }
}

impl BitCodec for StringEncoding {
    fn size(&self, ctx: Context<'_>) -> Result<u32, CodecError> {
        match &self.size {
            StringSize::Fixed(bits) | StringSize::Variable(bits) => Ok(*bits),
            StringSize::Dynamic(reference) => {
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

    fn encode(&self, value: &Value, ctx: Context<'_>) -> Result<BitString, CodecError> {
        let text = value.as_text().ok_or_else(|| {
            CodecError::TypeMismatch(format!("cannot encode {} as string", value.type_name()))
        })?;
        let capacity = self.buffer_bytes(ctx)?;
        let mut payload = self.charset.encode(text);
        payload.truncate(capacity);
        if payload.len() < capacity {
            // The terminator is only written when it fits; an exactly
            // filling payload gets none.
            if let Some(termination) = self.termination_bytes()? {
                if payload.len() + termination.len() <= capacity {
                    payload.extend_from_slice(&termination);
                }
            }
        }
        payload.resize(capacity, 0);
        Ok(BitString::from_vec(payload))
    }

    fn decode(&self, bits: &BitSlice<u8, Msb0>, ctx: Context<'_>) -> Result<Value, CodecError> {
        let expected = self.size(ctx)? as usize;
        if bits.len() != expected {
            return Err(CodecError::SizeMismatch {
                expected,
                actual: bits.len(),
            });
        }
        let mut bytes = bits_to_bytes(bits);
        let termination = self.termination_bytes()?;
        match termination
            .as_deref()
            .filter(|t| !t.is_empty())
            .and_then(|t| find_sequence(&bytes, t))
        {
            Some(position) => bytes.truncate(position),
            None => strip_trailing_zero_units(&mut bytes, self.charset.unit_bytes()),
        }
        Ok(Value::Text(self.charset.decode(&bytes)))
    }
}

fn find_sequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

fn strip_trailing_zero_units(bytes: &mut Vec<u8>, unit: usize) {
    while bytes.len() >= unit && bytes[bytes.len() - unit..].iter().all(|&b| b == 0) {
        bytes.truncate(bytes.len() - unit);
    }
}
