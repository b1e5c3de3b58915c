use std::fmt;

use indexmap::IndexMap;

use super::value::Value;

/// Ordered field-name to value map. Insertion order follows plan order on
/// decode; equality is order-insensitive, which is what round-trip checks
/// want after restriction merging reorders an encoded record.
pub type Record = IndexMap<String, Value>;

/// Names the container or meta-command a message is shaped by.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MessageType {
    SequenceContainer(String),
    MetaCommand(String),
}

impl MessageType {
    pub fn name(&self) -> &str {
        match self {
            MessageType::SequenceContainer(name) | MessageType::MetaCommand(name) => name,
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageType::SequenceContainer(name) => write!(f, "SequenceContainer {name}"),
            MessageType::MetaCommand(name) => write!(f, "MetaCommand {name}"),
        }
    }
}

/// A telemetry or command message: the dictionary entry that shapes it
/// plus the field values.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub message_type: MessageType,
    pub entries: Record,
}

impl Message {
    pub fn new(message_type: MessageType, entries: Record) -> Self {
        Self {
            message_type,
            entries,
        }
    }

    /// Message shaped by a sequence container.
    pub fn telemetry(container: impl Into<String>, entries: Record) -> Self {
        Self::new(MessageType::SequenceContainer(container.into()), entries)
    }

    /// Message shaped by a meta-command.
    pub fn command(meta_command: impl Into<String>, entries: Record) -> Self {
        Self::new(MessageType::MetaCommand(meta_command.into()), entries)
    }
}
