use thiserror::Error;

/// Failure surface shared by the dictionary, the data encodings and the
/// message codec. Every error is fatal to the operation that raised it;
/// the only place errors are swallowed is the speculative inheritor
/// dispatch in [`crate::codec::Encoder::decode`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CodecError {
    #[error("unknown SequenceContainer: {0}")]
    UnknownSequenceContainer(String),

    #[error("unknown MetaCommand: {0}")]
    UnknownMetaCommand(String),

    #[error("unknown container: {0}")]
    UnknownContainer(String),

    #[error("unknown Parameter: {0}")]
    UnknownParameter(String),

    #[error("unknown argument: {0}")]
    UnknownArgument(String),

    #[error("unknown entry type: {0}")]
    UnknownEntryType(String),

    #[error("duplicate dictionary name: {0}")]
    DuplicateName(String),

    #[error("unsupported {what}: {value}")]
    Unsupported { what: &'static str, value: String },

    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    #[error("value {value} does not fit in {bits} bits")]
    ValueOutOfRange { value: i64, bits: u32 },

    #[error("field size mismatch: expected {expected} bits, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("array value has {actual} elements, dimension spans {expected}")]
    ArrayLengthMismatch { expected: usize, actual: usize },

    #[error("negative array length {0}")]
    NegativeArrayLength(i64),

    #[error("fixed value mismatch")]
    FixedValueMismatch,

    #[error("restriction violated for {parameter}: expected {expected}, got {actual}")]
    RestrictionViolation {
        parameter: String,
        expected: String,
        actual: String,
    },

    #[error("conflicting restrictions for {parameter}: {first} vs {second}")]
    ConflictingRestrictions {
        parameter: String,
        first: String,
        second: String,
    },

    #[error("no inheritor of {container} decodes the message ({remaining_bits} bits left over)")]
    AbstractResolution {
        container: String,
        remaining_bits: usize,
    },

    #[error("{remaining_bits} bits remain after decoding concrete container {container}")]
    TrailingBits {
        container: String,
        remaining_bits: usize,
    },

    #[error("missing entry: {0}")]
    MissingField(String),

    #[error("inheritance cycle through {0}")]
    InheritanceCycle(String),

    #[error("calibration produced a non-finite value")]
    NonFiniteCalibration,

    #[error("invalid hex string: {0}")]
    InvalidHex(String),
}
