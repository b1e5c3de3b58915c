use crate::dictionary::comparisons::Comparison;
use crate::dictionary::parameters::Argument;
use crate::errors::CodecError;
use crate::values::BitString;

/// A telemetry container: a named, possibly abstract template for a
/// bit-level message.
#[derive(Debug, Clone, Default)]
pub struct SequenceContainer {
    pub name: String,
    pub is_abstract: bool,
    pub long_description: String,
    pub entry_list: Vec<ContainerEntry>,
    pub base_container: Option<BaseContainer>,
}

/// The container owned by a meta-command. Abstractness lives on the
/// meta-command itself.
#[derive(Debug, Clone, Default)]
pub struct CommandContainer {
    pub name: String,
    pub long_description: String,
    pub entry_list: Vec<ContainerEntry>,
    pub base_container: Option<BaseContainer>,
}

/// Link to the container this one inherits from, optionally constraining
/// fields of the base. The criteria identify a concrete inheritor on
/// decode and auto-populate the restricted fields on encode.
#[derive(Debug, Clone, Default)]
pub struct BaseContainer {
    pub container_ref: String,
    pub restriction_criteria: Vec<Comparison>,
}

impl BaseContainer {
    pub fn new(container_ref: impl Into<String>) -> Self {
        Self {
            container_ref: container_ref.into(),
            restriction_criteria: Vec::new(),
        }
    }

    pub fn restricted(container_ref: impl Into<String>, criteria: Vec<Comparison>) -> Self {
        Self {
            container_ref: container_ref.into(),
            restriction_criteria: criteria,
        }
    }
}

/// One element of a container's wire layout.
#[derive(Debug, Clone)]
pub enum ContainerEntry {
    Parameter(ParameterRefEntry),
    Argument(ArgumentRefEntry),
    Container(ContainerRefEntry),
    FixedValue(FixedValueEntry),
}

impl ContainerEntry {
    pub fn parameter(parameter_ref: impl Into<String>) -> Self {
        ContainerEntry::Parameter(ParameterRefEntry {
            parameter_ref: parameter_ref.into(),
            include_condition: Vec::new(),
        })
    }

    /// Parameter entry gated by an include condition.
    pub fn parameter_when(parameter_ref: impl Into<String>, condition: Vec<Comparison>) -> Self {
        ContainerEntry::Parameter(ParameterRefEntry {
            parameter_ref: parameter_ref.into(),
            include_condition: condition,
        })
    }

    pub fn argument(argument_ref: impl Into<String>) -> Self {
        ContainerEntry::Argument(ArgumentRefEntry {
            argument_ref: argument_ref.into(),
        })
    }

    /// Inline another container's entries, gated by an include condition.
    pub fn container(container_ref: impl Into<String>, condition: Vec<Comparison>) -> Self {
        ContainerEntry::Container(ContainerRefEntry {
            container_ref: container_ref.into(),
            include_condition: condition,
        })
    }

    pub fn fixed_value(binary_value: impl Into<String>, size_in_bits: u32) -> Self {
        ContainerEntry::FixedValue(FixedValueEntry {
            binary_value: binary_value.into(),
            size_in_bits,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParameterRefEntry {
    pub parameter_ref: String,
    pub include_condition: Vec<Comparison>,
}

#[derive(Debug, Clone, Default)]
pub struct ArgumentRefEntry {
    pub argument_ref: String,
}

#[derive(Debug, Clone, Default)]
pub struct ContainerRefEntry {
    pub container_ref: String,
    pub include_condition: Vec<Comparison>,
}

/// A constant bit pattern on the wire, e.g. a command opcode.
#[derive(Debug, Clone, Default)]
pub struct FixedValueEntry {
    /// Hex-encoded byte string.
    pub binary_value: String,
    pub size_in_bits: u32,
}

impl FixedValueEntry {
    /// The trailing `size_in_bits` bits of the hex constant.
    pub fn bits(&self) -> Result<BitString, CodecError> {
        let bytes = hex::decode(&self.binary_value)
            .map_err(|_| CodecError::InvalidHex(self.binary_value.clone()))?;
        let all = BitString::from_vec(bytes);
        let wanted = self.size_in_bits as usize;
        if wanted > all.len() {
            return Err(CodecError::SizeMismatch {
                expected: wanted,
                actual: all.len(),
            });
        }
        Ok(all[all.len() - wanted..].to_bitvec())
    }
}

/// A command definition owning exactly one command container and an
/// optional argument list. Inherits through `base_meta_command`.
#[derive(Debug, Clone, Default)]
pub struct MetaCommand {
    pub name: String,
    pub is_abstract: bool,
    pub long_description: String,
    pub system_name: String,
    pub command_container: CommandContainer,
    pub base_meta_command: Option<String>,
    pub argument_list: Vec<Argument>,
}
