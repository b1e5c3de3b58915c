use bitvec::order::Msb0;
use bitvec::slice::BitSlice;

use super::integer::IntegerEncoding;
use super::{BitCodec, Context};
use crate::errors::CodecError;
use crate::values::{BitString, Value};

/// Boolean over a wrapped integer encoding, 1-bit unsigned unless the
/// dictionary says otherwise. The labels let a dictionary spell its
/// truth values ("ON"/"OFF", "CHARGE"/"DISCHARGE").
#[derive(Debug, Clone, PartialEq)]
pub struct BooleanEncoding {
    pub integer: IntegerEncoding,
    pub zero_label: String,
    pub one_label: String,
}

impl Default for BooleanEncoding {
    fn default() -> Self {
        Self {
            integer: IntegerEncoding::unsigned(1),
            zero_label: "False".to_string(),
            one_label: "True".to_string(),
        }
    }
}

impl BooleanEncoding {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_labels(zero_label: impl Into<String>, one_label: impl Into<String>) -> Self {
        Self {
            zero_label: zero_label.into(),
            one_label: one_label.into(),
            ..Default::default()
        }
    }

    pub fn with_integer(mut self, integer: IntegerEncoding) -> Self {
        self.integer = integer;
        self
    }
}

impl BitCodec for BooleanEncoding {
    fn size(&self, ctx: Context<'_>) -> Result<u32, CodecError> {
        self.integer.size(ctx)
    }

    fn encode(&self, value: &Value, _ctx: Context<'_>) -> Result<BitString, CodecError> {
        let truth = match value {
            Value::Boolean(b) => *b,
            Value::Integer(i) => *i != 0,
            Value::Text(s) if *s == self.one_label => true,
            Value::Text(s) if *s == self.zero_label => false,
            other => {
                return Err(CodecError::TypeMismatch(format!(
                    "cannot encode {other} as boolean"
                )))
            }
        };
        self.integer.encode_raw(truth as i64)
    }

    fn decode(&self, bits: &BitSlice<u8, Msb0>, _ctx: Context<'_>) -> Result<Value, CodecError> {
        Ok(Value::Boolean(self.integer.decode_raw(bits)? != 0))
    }
}
