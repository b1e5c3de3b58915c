use bitvec::field::BitField;
use bitvec::order::Msb0;
use bitvec::slice::BitSlice;
use strum::{Display, EnumString};

use super::calibration::{round_places, Calibrator, PolynomialCalibrator};
use super::{BitCodec, Context};
use crate::errors::CodecError;
use crate::values::{BitString, Value};

/// Wire representation of the integer's sign. Sign-magnitude and BCD
/// forms are not implemented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
pub enum IntegerSignedness {
    #[default]
    #[strum(serialize = "unsigned")]
    Unsigned,
    #[strum(serialize = "twosComplement")]
    TwosComplement,
}

/// Only MSB-first transmission is implemented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
pub enum BitOrder {
    #[default]
    #[strum(serialize = "mostSignificantBitFirst")]
    MostSignificantFirst,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
pub enum ByteOrder {
    #[default]
    #[strum(serialize = "mostSignificantByteFirst")]
    MostSignificantFirst,
}

/// Big-endian, MSB-first packed integer of an exact bit width. Also the
/// carrier encoding for floats, enumerations, booleans and timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct IntegerEncoding {
    pub size_in_bits: u32,
    pub encoding: IntegerSignedness,
    pub bit_order: BitOrder,
    pub byte_order: ByteOrder,
    pub calibrator: Option<Calibrator>,
}

impl Default for IntegerEncoding {
    fn default() -> Self {
        Self {
            size_in_bits: 8,
            encoding: IntegerSignedness::Unsigned,
            bit_order: BitOrder::default(),
            byte_order: ByteOrder::default(),
            calibrator: None,
        }
    }
}

impl IntegerEncoding {
    pub fn unsigned(size_in_bits: u32) -> Self {
        Self {
            size_in_bits,
            ..Default::default()
        }
    }

    pub fn twos_complement(size_in_bits: u32) -> Self {
        Self {
            size_in_bits,
            encoding: IntegerSignedness::TwosComplement,
            ..Default::default()
        }
    }

    pub fn with_calibrator(mut self, calibrator: PolynomialCalibrator) -> Self {
        self.calibrator = Some(Calibrator::Polynomial(calibrator));
        self
    }

    fn signed(&self) -> bool {
        self.encoding == IntegerSignedness::TwosComplement
    }

    fn check_width(&self) -> Result<(), CodecError> {
        if self.size_in_bits < 1 || self.size_in_bits > 64 {
            return Err(CodecError::Unsupported {
                what: "integer sizeInBits",
                value: self.size_in_bits.to_string(),
            });
        }
        Ok(())
    }

    fn check_range(&self, raw: i64) -> Result<(), CodecError> {
        let bits = self.size_in_bits;
        let fits = if self.signed() {
            if bits == 64 {
                true
            } else {
                let half = 1i64 << (bits - 1);
                raw >= -half && raw < half
            }
        } else if raw < 0 {
            false
        } else {
            bits == 64 || (raw as u64) < (1u64 << bits)
        };
        if !fits {
            return Err(CodecError::ValueOutOfRange { value: raw, bits });
        }
        Ok(())
    }

    /// Packs a raw (uncalibrated) value.
    pub(crate) fn encode_raw(&self, raw: i64) -> Result<BitString, CodecError> {
        self.check_width()?;
        self.check_range(raw)?;
        let width = self.size_in_bits as usize;
        let mut bits = BitString::repeat(false, width);
        bits.store_be::<u64>((raw as u64) & width_mask(self.size_in_bits));
        Ok(bits)
    }

    /// Unpacks a raw (uncalibrated) value.
    pub(crate) fn decode_raw(&self, bits: &BitSlice<u8, Msb0>) -> Result<i64, CodecError> {
        self.check_width()?;
        if bits.len() != self.size_in_bits as usize {
            return Err(CodecError::SizeMismatch {
                expected: self.size_in_bits as usize,
                actual: bits.len(),
            });
        }
        let raw = bits.load_be::<u64>();
        if self.signed() {
            Ok(sign_extend(raw, self.size_in_bits))
        } else if raw > i64::MAX as u64 {
            Err(CodecError::TypeMismatch(format!(
                "unsigned value {raw} exceeds the representable record range"
            )))
        } else {
            Ok(raw as i64)
        }
    }
}

impl BitCodec for IntegerEncoding {
    fn size(&self, _ctx: Context<'_>) -> Result<u32, CodecError> {
        Ok(self.size_in_bits)
    }

    fn encode(&self, value: &Value, _ctx: Context<'_>) -> Result<BitString, CodecError> {
        match &self.calibrator {
            Some(calibrator) => {
                let calibrated = value.as_real().ok_or_else(|| {
                    CodecError::TypeMismatch(format!(
                        "cannot uncalibrate a {} value",
                        value.type_name()
                    ))
                })?;
                self.encode_raw(calibrator.uncalibrate(calibrated)?)
            }
            None => match value {
                Value::Integer(raw) => self.encode_raw(*raw),
                Value::Real(_) => Err(CodecError::TypeMismatch(
                    "unable to encode float as integer without calibrator".to_string(),
                )),
                other => Err(CodecError::TypeMismatch(format!(
                    "cannot encode a {} value as an integer",
                    other.type_name()
                ))),
            },
        }
    }

    fn decode(&self, bits: &BitSlice<u8, Msb0>, _ctx: Context<'_>) -> Result<Value, CodecError> {
        let raw = self.decode_raw(bits)?;
        match &self.calibrator {
            Some(calibrator) => Ok(Value::Real(round_places(calibrator.calibrate(raw)?, 12))),
            None => Ok(Value::Integer(raw)),
        }
    }
}

fn width_mask(bits: u32) -> u64 {
    if bits >= 64 {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}

fn sign_extend(raw: u64, bits: u32) -> i64 {
    if bits == 64 {
        return raw as i64;
    }
    let sign = 1u64 << (bits - 1);
    if raw & sign != 0 {
        (raw | !width_mask(bits)) as i64
    } else {
        raw as i64
    }
}
