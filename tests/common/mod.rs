//! Shared fixtures: in-memory dictionaries standing in for the XML
//! documents the schema loader would produce.

use xtce_core::dictionary::types::{
    ArrayType, BinaryType, EntryType, EnumeratedType, FloatType, IntegerType, StringType,
};
use xtce_core::dictionary::{
    Argument, BaseContainer, CommandContainer, Comparison, ContainerEntry, Enumeration,
    MetaCommand, Parameter, SequenceContainer,
};
use xtce_core::encodings::{
    ArrayEncoding, BinaryEncoding, Charset, Dimension, InstanceRef, IntegerEncoding,
    PolynomialCalibrator, StringEncoding,
};
use xtce_core::{BitString, Record, SpaceSystem, Value};

pub fn record<const N: usize>(pairs: [(&str, Value); N]) -> Record {
    pairs
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
}

/// Bit string from a pattern of '0'/'1' characters; whitespace is
/// ignored so patterns can be grouped per field.
pub fn bits(pattern: &str) -> BitString {
    pattern
        .chars()
        .filter(|c| *c == '0' || *c == '1')
        .map(|c| c == '1')
        .collect()
}

pub fn byte_bits(bytes: &[u8]) -> BitString {
    BitString::from_slice(bytes)
}

/// The CCSDS green-book style vehicle: an abstract telemetry header with
/// a conditional secondary header, inherited by a power-heater-timer
/// command identified by ID=255.
pub fn space_vehicle() -> SpaceSystem {
    let mut system = SpaceSystem::new("SpaceVehicle");

    for (name, width) in [
        ("IDType", 8),
        ("SecHType", 1),
        ("PktTypeType", 1),
        ("LengthType", 16),
        ("SecondsType", 32),
        ("MilliSecondsType", 32),
        ("CheckSumType", 8),
    ] {
        system
            .add_parameter_type(EntryType::Integer(IntegerType::new(
                name,
                IntegerEncoding::unsigned(width),
            )))
            .unwrap();
    }
    system
        .add_argument_type(EntryType::Enumerated(EnumeratedType::new(
            "TimerStartStopType",
            vec![
                Enumeration::new(0, "TIMER_STOP"),
                Enumeration::new(1, "TIMER_START"),
            ],
            IntegerEncoding::unsigned(16),
        )))
        .unwrap();

    for (name, type_ref) in [
        ("ID", "IDType"),
        ("SecH", "SecHType"),
        ("Type", "PktTypeType"),
        ("Length", "LengthType"),
        ("Seconds", "SecondsType"),
        ("MilliSeconds", "MilliSecondsType"),
        ("CheckSum", "CheckSumType"),
    ] {
        system.add_parameter(Parameter::new(name, type_ref)).unwrap();
    }

    system
        .add_sequence_container(SequenceContainer {
            name: "SecondaryHeader".to_string(),
            entry_list: vec![
                ContainerEntry::parameter("Seconds"),
                ContainerEntry::parameter("MilliSeconds"),
            ],
            ..Default::default()
        })
        .unwrap();
    system
        .add_sequence_container(SequenceContainer {
            name: "Header".to_string(),
            is_abstract: true,
            entry_list: vec![
                ContainerEntry::parameter("ID"),
                ContainerEntry::parameter("SecH"),
                ContainerEntry::parameter("Type"),
                ContainerEntry::parameter("Length"),
                ContainerEntry::container(
                    "SecondaryHeader",
                    vec![Comparison::equal_to("SecH", "1")],
                ),
            ],
            ..Default::default()
        })
        .unwrap();

    system
        .add_meta_command(MetaCommand {
            name: "PWHTMR".to_string(),
            command_container: CommandContainer {
                name: "PWHTMR".to_string(),
                entry_list: vec![
                    ContainerEntry::fixed_value("1E", 8),
                    ContainerEntry::parameter("CheckSum"),
                    ContainerEntry::argument("TimerStartStop"),
                ],
                base_container: Some(BaseContainer::restricted(
                    "Header",
                    vec![Comparison::equal_to("ID", "255")],
                )),
                ..Default::default()
            },
            argument_list: vec![Argument::new("TimerStartStop", "TimerStartStopType")],
            ..Default::default()
        })
        .unwrap();

    system
}

/// A request/reply message bus: everything inherits an abstract
/// MessageBase, replies and commands branch on MessageType, and the
/// concrete shapes branch on MessageID.
pub fn message_bus() -> SpaceSystem {
    let mut system = SpaceSystem::new("MessageBus");

    system
        .add_parameter_type(EntryType::Integer(IntegerType::new(
            "UInt8",
            IntegerEncoding::unsigned(8),
        )))
        .unwrap();
    system
        .add_parameter_type(EntryType::Float(FloatType::new(
            "ScaledTemperature",
            IntegerEncoding::unsigned(16).with_calibrator(PolynomialCalibrator::linear(0.0, 0.1)),
        )))
        .unwrap();
    system
        .add_parameter_type(EntryType::String(StringType::new(
            "StatusText",
            StringEncoding::fixed(Charset::Utf8, 64),
        )))
        .unwrap();
    system
        .add_parameter_type(EntryType::Binary(BinaryType::new(
            "BlobData",
            BinaryEncoding::dynamic(InstanceRef::parameter("BDataLen")),
        )))
        .unwrap();
    system
        .add_parameter_type(EntryType::Array(ArrayType::new(
            "VoltageArray",
            ArrayEncoding::new("UInt8", Dimension::fixed(0, 3)),
        )))
        .unwrap();
    system
        .add_parameter_type(EntryType::Array(ArrayType::new(
            "DynamicU8Array",
            ArrayEncoding::new("UInt8", Dimension::counted_by(InstanceRef::parameter("ArrayCount"))),
        )))
        .unwrap();
    system
        .add_parameter_type(EntryType::Array(ArrayType::new(
            "FixedTemperatureArray",
            ArrayEncoding::new("ScaledTemperature", Dimension::fixed(0, 2)),
        )))
        .unwrap();
    system
        .add_parameter_type(EntryType::Array(ArrayType::new(
            "DynamicTemperatureArray",
            ArrayEncoding::new(
                "ScaledTemperature",
                Dimension::counted_by(InstanceRef::parameter("FloatArrayCount")),
            ),
        )))
        .unwrap();
    system
        .add_argument_type(EntryType::Integer(IntegerType::new(
            "NonceArg",
            IntegerEncoding::unsigned(8),
        )))
        .unwrap();

    for (name, type_ref) in [
        ("MessageType", "UInt8"),
        ("MessageDestination", "UInt8"),
        ("MessageSource", "UInt8"),
        ("MessageID", "UInt8"),
        ("Intermediate", "UInt8"),
        ("Nonce", "UInt8"),
        ("BatteryVoltage", "VoltageArray"),
        ("ArrayCount", "UInt8"),
        ("DynamicData", "DynamicU8Array"),
        ("BDataLen", "UInt8"),
        ("BData", "BlobData"),
        ("FloatArrayCount", "UInt8"),
        ("FloatTemperatures", "DynamicTemperatureArray"),
        ("FixedTemperatures", "FixedTemperatureArray"),
        ("StatusMessage", "StatusText"),
    ] {
        system.add_parameter(Parameter::new(name, type_ref)).unwrap();
    }

    system
        .add_sequence_container(SequenceContainer {
            name: "MessageBase".to_string(),
            is_abstract: true,
            entry_list: vec![
                ContainerEntry::parameter("MessageType"),
                ContainerEntry::parameter("MessageDestination"),
                ContainerEntry::parameter("MessageSource"),
                ContainerEntry::parameter("MessageID"),
            ],
            ..Default::default()
        })
        .unwrap();
    system
        .add_sequence_container(SequenceContainer {
            name: "Reply".to_string(),
            is_abstract: true,
            base_container: Some(BaseContainer::restricted(
                "MessageBase",
                vec![Comparison::equal_to("MessageType", "2")],
            )),
            ..Default::default()
        })
        .unwrap();

    for (name, message_id, entry_list) in [
        ("Reply_Ping", "99", vec![ContainerEntry::parameter("Nonce")]),
        (
            "Reply_BatteryVoltage",
            "97",
            vec![ContainerEntry::parameter("BatteryVoltage")],
        ),
        (
            "Reply_Blob",
            "95",
            vec![
                ContainerEntry::parameter("BDataLen"),
                ContainerEntry::parameter("BData"),
                ContainerEntry::parameter("Nonce"),
            ],
        ),
        (
            "Reply_DynamicArray",
            "94",
            vec![
                ContainerEntry::parameter("ArrayCount"),
                ContainerEntry::parameter("DynamicData"),
            ],
        ),
        (
            "Reply_DynamicFloatArray",
            "93",
            vec![
                ContainerEntry::parameter("FloatArrayCount"),
                ContainerEntry::parameter("FloatTemperatures"),
            ],
        ),
        (
            "Reply_FixedFloatArray",
            "92",
            vec![ContainerEntry::parameter("FixedTemperatures")],
        ),
        (
            "Reply_Status",
            "91",
            vec![ContainerEntry::parameter("StatusMessage")],
        ),
    ] {
        system
            .add_sequence_container(SequenceContainer {
                name: name.to_string(),
                entry_list,
                base_container: Some(BaseContainer::restricted(
                    "Reply",
                    vec![Comparison::equal_to("MessageID", message_id)],
                )),
                ..Default::default()
            })
            .unwrap();
    }

    system
        .add_meta_command(MetaCommand {
            name: "Command".to_string(),
            is_abstract: true,
            command_container: CommandContainer {
                name: "Command".to_string(),
                entry_list: vec![ContainerEntry::parameter("Intermediate")],
                base_container: Some(BaseContainer::restricted(
                    "MessageBase",
                    vec![Comparison::equal_to("MessageType", "1")],
                )),
                ..Default::default()
            },
            ..Default::default()
        })
        .unwrap();
    system
        .add_meta_command(MetaCommand {
            name: "Command_NOARG".to_string(),
            command_container: CommandContainer {
                name: "Command_NOARG".to_string(),
                base_container: Some(BaseContainer::restricted(
                    "Command",
                    vec![Comparison::equal_to("MessageID", "98")],
                )),
                ..Default::default()
            },
            base_meta_command: Some("Command".to_string()),
            ..Default::default()
        })
        .unwrap();
    system
        .add_meta_command(MetaCommand {
            name: "Command_Ping".to_string(),
            command_container: CommandContainer {
                name: "Command_Ping".to_string(),
                entry_list: vec![ContainerEntry::argument("Nonce")],
                base_container: Some(BaseContainer::restricted(
                    "Command",
                    vec![Comparison::equal_to("MessageID", "99")],
                )),
                ..Default::default()
            },
            base_meta_command: Some("Command".to_string()),
            argument_list: vec![Argument::new("Nonce", "NonceArg")],
            ..Default::default()
        })
        .unwrap();

    system
}
