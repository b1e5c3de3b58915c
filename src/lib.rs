//! Bit-accurate XTCE telemetry/telecommand codec core.
//!
//! A declarative space-system dictionary (XTCE 1.2) drives the codec: the
//! planner flattens a container's inheritance chain into an ordered entry
//! plan, and the data encodings turn field values into packed MSB-first
//! bits and back. Decoding an abstract container speculatively dispatches
//! over its known inheritors, using base-container restriction criteria
//! to identify the concrete message shape.

pub mod codec;
pub mod dictionary;
pub mod encodings;
pub mod errors;
pub mod logger;
pub mod values;

pub use crate::codec::{DecodeOptions, Encoder};
pub use crate::dictionary::SpaceSystem;
pub use crate::errors::CodecError;
pub use crate::values::{BitString, Message, MessageType, Record, Value};
