//! Message-level encode and decode, driven by the flattened entry plan.

mod planner;

use bitvec::order::Msb0;
use bitvec::slice::BitSlice;

use crate::dictionary::{conditions_met, ContainerEntry, SpaceSystem};
use crate::encodings::Context;
use crate::errors::CodecError;
use crate::values::{BitString, Message, MessageType, Record, Value};

use planner::{argument_types, build_plan, EntryPlan, MessageHandle};

/// Knobs for [`Encoder::decode`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DecodeOptions {
    /// Refuse to settle on an abstract type even when it consumes the
    /// whole message; keep dispatching until a concrete inheritor fits.
    pub require_concrete: bool,
}

/// Bit codec over one dictionary. Holds no state between calls; a single
/// encoder may serve any number of messages.
pub struct Encoder<'a> {
    system: &'a SpaceSystem,
}

impl<'a> Encoder<'a> {
    pub fn new(system: &'a SpaceSystem) -> Self {
        Self { system }
    }

    /// Encodes the message into its wire bits.
    ///
    /// Restriction criteria from the inheritance chain are written into
    /// `msg.entries` first, overwriting whatever the caller supplied for
    /// those fields; the mutation is part of the contract.
    pub fn encode(&self, msg: &mut Message) -> Result<BitString, CodecError> {
        let handle = MessageHandle::resolve(self.system, &msg.message_type)?;
        let plan = build_plan(self.system, &handle)?;

        for (name, restriction) in &plan.restrictions {
            restriction.require_supported()?;
            let parameter = self.system.get_parameter(name)?;
            let entry_type = self.system.get_entry_type(&parameter.parameter_type_ref)?;
            let value = entry_type.value_from_string(&restriction.value)?;
            msg.entries.insert((*name).to_string(), value);
        }

        let argument_index = argument_types(self.system, &handle)?;
        let entries = &msg.entries;
        let ctx = Context {
            system: self.system,
            entries,
        };
        let mut out = BitString::new();
        for planned in &plan.entries {
            if !planned.conditions.is_empty() && !conditions_met(&planned.conditions, entries)? {
                continue;
            }
            match planned.entry {
                ContainerEntry::Parameter(entry) => {
                    let parameter = self.system.get_parameter(&entry.parameter_ref)?;
                    let entry_type =
                        self.system.get_entry_type(&parameter.parameter_type_ref)?;
                    let value = required_entry(entries, &entry.parameter_ref)?;
                    out.extend_from_bitslice(&entry_type.encode(value, ctx)?);
                }
                ContainerEntry::Argument(entry) => {
                    let type_ref = argument_index
                        .get(entry.argument_ref.as_str())
                        .ok_or_else(|| CodecError::UnknownArgument(entry.argument_ref.clone()))?;
                    let entry_type = self.system.get_entry_type(type_ref)?;
                    let value = required_entry(entries, &entry.argument_ref)?;
                    out.extend_from_bitslice(&entry_type.encode(value, ctx)?);
                }
                ContainerEntry::FixedValue(entry) => {
                    out.extend_from_bitslice(&entry.bits()?);
                }
                // The planner inlines container references.
                ContainerEntry::Container(entry) => {
                    return Err(CodecError::Unsupported {
                        what: "unflattened container entry",
                        value: entry.container_ref.clone(),
                    });
                }
            }
        }
        Ok(out)
    }

    /// Decodes `bits` as a message of the given shape.
    ///
    /// When the shape is abstract (or bits are left over), every known
    /// inheritor is tried in dictionary order against the full input;
    /// failures of speculative attempts are swallowed and the first
    /// success wins. Nothing decoded during a failed attempt survives.
    pub fn decode(
        &self,
        message_type: &MessageType,
        bits: &BitSlice<u8, Msb0>,
        options: DecodeOptions,
    ) -> Result<Message, CodecError> {
        let handle = MessageHandle::resolve(self.system, message_type)?;
        let (message, remaining_bits) = self.decode_message(&handle, bits)?;

        let is_abstract = handle.is_abstract();
        if remaining_bits == 0 && (!is_abstract || !options.require_concrete) {
            return Ok(message);
        }
        let container = handle.container_name();
        if !is_abstract {
            return Err(CodecError::TrailingBits {
                container: container.to_string(),
                remaining_bits,
            });
        }

        for inheritor in self.system.find_inheritors(container) {
            match self.decode(&inheritor, bits, options) {
                Ok(resolved) => return Ok(resolved),
                Err(rejection) => {
                    log::debug!("inheritor {inheritor} of {container} rejected: {rejection}");
                }
            }
        }
        Err(CodecError::AbstractResolution {
            container: container.to_string(),
            remaining_bits,
        })
    }

    /// Plan-driven single-shape decode; returns the record and how many
    /// bits were left unconsumed.
    fn decode_message(
        &self,
        handle: &MessageHandle<'a>,
        bits: &BitSlice<u8, Msb0>,
    ) -> Result<(Message, usize), CodecError> {
        let plan = build_plan(self.system, handle)?;
        let argument_index = argument_types(self.system, handle)?;
        let mut entries = Record::new();
        let mut cursor = bits;

        for planned in &plan.entries {
            if !planned.conditions.is_empty() && !conditions_met(&planned.conditions, &entries)? {
                continue;
            }
            match planned.entry {
                ContainerEntry::Parameter(entry) => {
                    let parameter = self.system.get_parameter(&entry.parameter_ref)?;
                    let entry_type =
                        self.system.get_entry_type(&parameter.parameter_type_ref)?;
                    let (value, rest) = pop_entry(self.system, &entries, entry_type, cursor)?;
                    cursor = rest;
                    entries.insert(entry.parameter_ref.clone(), value);
                    check_restriction(&plan, &entries, &entry.parameter_ref)?;
                }
                ContainerEntry::Argument(entry) => {
                    let type_ref = argument_index
                        .get(entry.argument_ref.as_str())
                        .ok_or_else(|| CodecError::UnknownArgument(entry.argument_ref.clone()))?;
                    let entry_type = self.system.get_entry_type(type_ref)?;
                    let (value, rest) = pop_entry(self.system, &entries, entry_type, cursor)?;
                    cursor = rest;
                    entries.insert(entry.argument_ref.clone(), value);
                }
                ContainerEntry::FixedValue(entry) => {
                    let width = entry.size_in_bits as usize;
                    if cursor.len() < width {
                        return Err(CodecError::SizeMismatch {
                            expected: width,
                            actual: cursor.len(),
                        });
                    }
                    let (head, rest) = cursor.split_at(width);
                    if head != entry.bits()?.as_bitslice() {
                        return Err(CodecError::FixedValueMismatch);
                    }
                    cursor = rest;
                }
                ContainerEntry::Container(entry) => {
                    return Err(CodecError::Unsupported {
                        what: "unflattened container entry",
                        value: entry.container_ref.clone(),
                    });
                }
            }
        }

        let message = Message::new(handle.message_type(), entries);
        Ok((message, cursor.len()))
    }
}

/// Slices the next entry off the buffer and decodes it under the current
/// partial record.
fn pop_entry<'b>(
    system: &SpaceSystem,
    entries: &Record,
    entry_type: &crate::dictionary::EntryType,
    cursor: &'b BitSlice<u8, Msb0>,
) -> Result<(Value, &'b BitSlice<u8, Msb0>), CodecError> {
    let ctx = Context { system, entries };
    let width = entry_type.size(ctx)? as usize;
    if cursor.len() < width {
        return Err(CodecError::SizeMismatch {
            expected: width,
            actual: cursor.len(),
        });
    }
    let (head, rest) = cursor.split_at(width);
    Ok((entry_type.decode(head, ctx)?, rest))
}

/// A decoded parameter that a base-container link restricts must carry
/// the restricted value, otherwise this shape does not describe the
/// message.
fn check_restriction(
    plan: &EntryPlan<'_>,
    entries: &Record,
    parameter: &str,
) -> Result<(), CodecError> {
    let Some(restriction) = plan.restrictions.get(parameter) else {
        return Ok(());
    };
    restriction.require_supported()?;
    let actual = entries[parameter].to_string();
    if actual != restriction.value {
        return Err(CodecError::RestrictionViolation {
            parameter: parameter.to_string(),
            expected: restriction.value.clone(),
            actual,
        });
    }
    Ok(())
}

fn required_entry<'v>(entries: &'v Record, name: &str) -> Result<&'v Value, CodecError> {
    entries
        .get(name)
        .ok_or_else(|| CodecError::MissingField(name.to_string()))
}
