pub mod comparisons;
pub mod containers;
pub mod parameters;
pub mod types;

pub use comparisons::{conditions_met, Comparison, ComparisonOperator};
pub use containers::{
    ArgumentRefEntry, BaseContainer, CommandContainer, ContainerEntry, ContainerRefEntry,
    FixedValueEntry, MetaCommand, ParameterRefEntry, SequenceContainer,
};
pub use parameters::{Argument, Enumeration, Parameter, ParameterProperties, Unit};
pub use types::EntryType;

use indexmap::IndexMap;

use crate::errors::CodecError;
use crate::values::MessageType;

/// The root XTCE dictionary: every named type, parameter, container and
/// meta-command of one space system. Built once by the schema loader and
/// immutable afterwards.
#[derive(Debug, Clone, Default)]
pub struct SpaceSystem {
    pub name: String,
    pub long_description: String,
    parameter_types: IndexMap<String, EntryType>,
    argument_types: IndexMap<String, EntryType>,
    parameters: IndexMap<String, Parameter>,
    containers: IndexMap<String, SequenceContainer>,
    meta_commands: IndexMap<String, MetaCommand>,
}

/// Either container variant, as returned by name lookup across both
/// namespaces.
#[derive(Debug, Clone, Copy)]
pub enum ContainerHandle<'a> {
    Sequence(&'a SequenceContainer),
    Command(&'a CommandContainer),
}

impl<'a> ContainerHandle<'a> {
    pub fn name(&self) -> &'a str {
        match *self {
            ContainerHandle::Sequence(c) => &c.name,
            ContainerHandle::Command(c) => &c.name,
        }
    }

    pub fn entry_list(&self) -> &'a [ContainerEntry] {
        match *self {
            ContainerHandle::Sequence(c) => &c.entry_list,
            ContainerHandle::Command(c) => &c.entry_list,
        }
    }

    pub fn base_container(&self) -> Option<&'a BaseContainer> {
        match *self {
            ContainerHandle::Sequence(c) => c.base_container.as_ref(),
            ContainerHandle::Command(c) => c.base_container.as_ref(),
        }
    }
}

impl SpaceSystem {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn add_parameter_type(&mut self, entry_type: EntryType) -> Result<(), CodecError> {
        insert_unique(&mut self.parameter_types, entry_type.name().to_string(), entry_type)
    }

    pub fn add_argument_type(&mut self, entry_type: EntryType) -> Result<(), CodecError> {
        insert_unique(&mut self.argument_types, entry_type.name().to_string(), entry_type)
    }

    pub fn add_parameter(&mut self, parameter: Parameter) -> Result<(), CodecError> {
        insert_unique(&mut self.parameters, parameter.name.clone(), parameter)
    }

    pub fn add_sequence_container(&mut self, container: SequenceContainer) -> Result<(), CodecError> {
        insert_unique(&mut self.containers, container.name.clone(), container)
    }

    pub fn add_meta_command(&mut self, meta_command: MetaCommand) -> Result<(), CodecError> {
        insert_unique(&mut self.meta_commands, meta_command.name.clone(), meta_command)
    }

    pub fn get_sequence_container(&self, name: &str) -> Result<&SequenceContainer, CodecError> {
        self.containers
            .get(name)
            .ok_or_else(|| CodecError::UnknownSequenceContainer(name.to_string()))
    }

    pub fn get_meta_command(&self, name: &str) -> Result<&MetaCommand, CodecError> {
        self.meta_commands
            .get(name)
            .ok_or_else(|| CodecError::UnknownMetaCommand(name.to_string()))
    }

    /// A container of either kind: sequence containers shadow command
    /// containers of the same name.
    pub fn get_container(&self, name: &str) -> Result<ContainerHandle<'_>, CodecError> {
        if let Some(container) = self.containers.get(name) {
            return Ok(ContainerHandle::Sequence(container));
        }
        self.meta_commands
            .values()
            .map(|mc| &mc.command_container)
            .find(|cc| cc.name == name)
            .map(ContainerHandle::Command)
            .ok_or_else(|| CodecError::UnknownContainer(name.to_string()))
    }

    pub fn get_parameter(&self, name: &str) -> Result<&Parameter, CodecError> {
        self.parameters
            .get(name)
            .ok_or_else(|| CodecError::UnknownParameter(name.to_string()))
    }

    /// Resolves a type reference across the parameter and argument type
    /// namespaces.
    pub fn get_entry_type(&self, name: &str) -> Result<&EntryType, CodecError> {
        self.parameter_types
            .get(name)
            .or_else(|| self.argument_types.get(name))
            .ok_or_else(|| CodecError::UnknownEntryType(name.to_string()))
    }

    /// Every container or meta-command whose base link names `container`.
    /// Order is dictionary insertion order, which fixes the speculative
    /// dispatch order on decode.
    pub fn find_inheritors(&self, container: &str) -> Vec<MessageType> {
        let sequences = self
            .containers
            .values()
            .filter(|c| base_ref(c.base_container.as_ref()) == Some(container))
            .map(|c| MessageType::SequenceContainer(c.name.clone()));
        let commands = self
            .meta_commands
            .values()
            .filter(|mc| base_ref(mc.command_container.base_container.as_ref()) == Some(container))
            .map(|mc| MessageType::MetaCommand(mc.name.clone()));
        sequences.chain(commands).collect()
    }
}

fn base_ref(base: Option<&BaseContainer>) -> Option<&str> {
    base.map(|b| b.container_ref.as_str())
}

fn insert_unique<T>(
    map: &mut IndexMap<String, T>,
    name: String,
    value: T,
) -> Result<(), CodecError> {
    if map.contains_key(&name) {
        return Err(CodecError::DuplicateName(name));
    }
    map.insert(name, value);
    Ok(())
}
