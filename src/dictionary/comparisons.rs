use strum::{Display, EnumString};

use crate::errors::CodecError;
use crate::values::Record;

/// XTCE comparison operators. Only equality is evaluated by the codec;
/// the rest exist so a dictionary carrying them loads and then fails
/// loudly at the point of use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
pub enum ComparisonOperator {
    #[default]
    #[strum(serialize = "==")]
    Equality,
    #[strum(serialize = "!=")]
    Inequality,
    #[strum(serialize = "<")]
    LessThan,
    #[strum(serialize = "<=")]
    LessOrEqual,
    #[strum(serialize = ">")]
    GreaterThan,
    #[strum(serialize = ">=")]
    GreaterOrEqual,
}

/// A single equality test against a named parameter, used both as an
/// include condition and as a base-container restriction criterion.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub parameter_ref: String,
    pub comparison_operator: ComparisonOperator,
    /// Right-hand side as it appears in the dictionary. Comparisons are
    /// string comparisons against the stringified record value.
    pub value: String,
    pub instance: u32,
    pub use_calibrated_value: bool,
}

impl Comparison {
    pub fn equal_to(parameter_ref: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            parameter_ref: parameter_ref.into(),
            comparison_operator: ComparisonOperator::Equality,
            value: value.into(),
            instance: 0,
            use_calibrated_value: true,
        }
    }

    /// Only `==` on instance 0 of the calibrated value is implemented.
    pub fn require_supported(&self) -> Result<(), CodecError> {
        if self.comparison_operator != ComparisonOperator::Equality {
            return Err(CodecError::Unsupported {
                what: "ComparisonOperator",
                value: self.comparison_operator.to_string(),
            });
        }
        if self.instance != 0 {
            return Err(CodecError::Unsupported {
                what: "instance",
                value: self.instance.to_string(),
            });
        }
        if !self.use_calibrated_value {
            return Err(CodecError::Unsupported {
                what: "useCalibratedValue",
                value: "false".to_string(),
            });
        }
        Ok(())
    }

    /// Whether the record satisfies this comparison. The referenced field
    /// must already be present in the record.
    pub fn matches(&self, entries: &Record) -> Result<bool, CodecError> {
        self.require_supported()?;
        let got = entries
            .get(&self.parameter_ref)
            .ok_or_else(|| CodecError::MissingField(self.parameter_ref.clone()))?;
        Ok(got.to_string() == self.value)
    }
}

/// All conditions must hold for a gated entry to contribute.
pub fn conditions_met(conditions: &[&Comparison], entries: &Record) -> Result<bool, CodecError> {
    for condition in conditions {
        if !condition.matches(entries)? {
            return Ok(false);
        }
    }
    Ok(true)
}
