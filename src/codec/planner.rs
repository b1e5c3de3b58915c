use std::collections::HashSet;

use indexmap::IndexMap;

use crate::dictionary::{
    Comparison, ContainerEntry, ContainerHandle, MetaCommand, SequenceContainer, SpaceSystem,
};
use crate::errors::CodecError;
use crate::values::MessageType;

/// Resolved view of the container or meta-command a message is shaped by.
#[derive(Debug, Clone, Copy)]
pub(crate) enum MessageHandle<'a> {
    Sequence(&'a SequenceContainer),
    Command(&'a MetaCommand),
}

impl<'a> MessageHandle<'a> {
    pub fn resolve(
        system: &'a SpaceSystem,
        message_type: &MessageType,
    ) -> Result<Self, CodecError> {
        match message_type {
            MessageType::SequenceContainer(name) => {
                Ok(MessageHandle::Sequence(system.get_sequence_container(name)?))
            }
            MessageType::MetaCommand(name) => {
                Ok(MessageHandle::Command(system.get_meta_command(name)?))
            }
        }
    }

    pub fn is_abstract(&self) -> bool {
        match self {
            MessageHandle::Sequence(container) => container.is_abstract,
            MessageHandle::Command(meta_command) => meta_command.is_abstract,
        }
    }

    /// Name under which inheritors reference this message shape.
    pub fn container_name(&self) -> &'a str {
        match *self {
            MessageHandle::Sequence(container) => &container.name,
            MessageHandle::Command(meta_command) => &meta_command.command_container.name,
        }
    }

    pub fn message_type(&self) -> MessageType {
        match self {
            MessageHandle::Sequence(container) => {
                MessageType::SequenceContainer(container.name.clone())
            }
            MessageHandle::Command(meta_command) => {
                MessageType::MetaCommand(meta_command.name.clone())
            }
        }
    }
}

/// One plan slot: the entry plus the include conditions gating it.
pub(crate) struct PlannedEntry<'a> {
    pub entry: &'a ContainerEntry,
    pub conditions: Vec<&'a Comparison>,
}

/// The flattened wire layout of a message shape: entries in transmission
/// order, plus the equality restrictions collected from base-container
/// links, indexed by parameter name.
pub(crate) struct EntryPlan<'a> {
    pub entries: Vec<PlannedEntry<'a>>,
    pub restrictions: IndexMap<&'a str, &'a Comparison>,
}

/// Flattens the inheritance chain (and any included sub-containers) of a
/// message shape. Outermost ancestor entries come first, matching wire
/// order.
pub(crate) fn build_plan<'a>(
    system: &'a SpaceSystem,
    handle: &MessageHandle<'a>,
) -> Result<EntryPlan<'a>, CodecError> {
    let start = match *handle {
        MessageHandle::Sequence(container) => ContainerHandle::Sequence(container),
        MessageHandle::Command(meta_command) => {
            ContainerHandle::Command(&meta_command.command_container)
        }
    };
    let mut restrictions = Vec::new();
    let mut path = HashSet::new();
    let entries = chain_entries(system, start, &mut path, &mut restrictions)?;
    let restrictions = index_restrictions(restrictions)?;
    log::trace!(
        "planned {} with {} entries and {} restrictions",
        start.name(),
        entries.len(),
        restrictions.len()
    );
    Ok(EntryPlan {
        entries,
        restrictions,
    })
}

/// Walks the base-container chain upward from `handle`, prepending each
/// ancestor's (flattened) entry list and appending its base-link
/// restriction criteria. A command container whose base resolves to a
/// sequence container continues the walk there.
fn chain_entries<'a>(
    system: &'a SpaceSystem,
    handle: ContainerHandle<'a>,
    path: &mut HashSet<&'a str>,
    restrictions: &mut Vec<&'a Comparison>,
) -> Result<Vec<PlannedEntry<'a>>, CodecError> {
    let name = handle.name();
    if !path.insert(name) {
        return Err(CodecError::InheritanceCycle(name.to_string()));
    }

    let own = flatten_list(system, handle.entry_list(), path)?;
    let mut plan = match handle.base_container() {
        Some(base) => {
            restrictions.extend(base.restriction_criteria.iter());
            let parent = system.get_container(&base.container_ref)?;
            chain_entries(system, parent, path, restrictions)?
        }
        None => Vec::new(),
    };
    plan.extend(own);

    path.remove(name);
    Ok(plan)
}

/// Expands one entry list, inlining `ContainerRefEntry` plans with the
/// composed condition list `outer + inner`.
fn flatten_list<'a>(
    system: &'a SpaceSystem,
    list: &'a [ContainerEntry],
    path: &mut HashSet<&'a str>,
) -> Result<Vec<PlannedEntry<'a>>, CodecError> {
    let mut out = Vec::with_capacity(list.len());
    for entry in list {
        match entry {
            ContainerEntry::Container(inclusion) => {
                let sub = system.get_sequence_container(&inclusion.container_ref)?;
                // The included container's own base-chain restrictions
                // describe its identity, not this chain's; drop them.
                let mut sub_restrictions = Vec::new();
                let sub_plan =
                    chain_entries(system, ContainerHandle::Sequence(sub), path, &mut sub_restrictions)?;
                for sub_entry in sub_plan {
                    let mut conditions: Vec<&Comparison> =
                        inclusion.include_condition.iter().collect();
                    conditions.extend(sub_entry.conditions);
                    out.push(PlannedEntry {
                        entry: sub_entry.entry,
                        conditions,
                    });
                }
            }
            ContainerEntry::Parameter(parameter) => out.push(PlannedEntry {
                entry,
                conditions: parameter.include_condition.iter().collect(),
            }),
            ContainerEntry::Argument(_) | ContainerEntry::FixedValue(_) => out.push(PlannedEntry {
                entry,
                conditions: Vec::new(),
            }),
        }
    }
    Ok(out)
}

/// Two restrictions naming the same parameter must agree; a chain that
/// contradicts itself is malformed.
fn index_restrictions(
    restrictions: Vec<&Comparison>,
) -> Result<IndexMap<&str, &Comparison>, CodecError> {
    let mut index: IndexMap<&str, &Comparison> = IndexMap::new();
    for restriction in restrictions {
        match index.get(restriction.parameter_ref.as_str()) {
            Some(existing) if existing.value != restriction.value => {
                return Err(CodecError::ConflictingRestrictions {
                    parameter: restriction.parameter_ref.clone(),
                    first: existing.value.clone(),
                    second: restriction.value.clone(),
                });
            }
            Some(_) => {}
            None => {
                index.insert(&restriction.parameter_ref, restriction);
            }
        }
    }
    Ok(index)
}

/// Argument name to argument type reference, walking the meta-command and
/// its ancestors; the nearest definition wins.
pub(crate) fn argument_types<'a>(
    system: &'a SpaceSystem,
    handle: &MessageHandle<'a>,
) -> Result<IndexMap<&'a str, &'a str>, CodecError> {
    let MessageHandle::Command(meta_command) = handle else {
        return Ok(IndexMap::new());
    };
    let mut index = IndexMap::new();
    let mut visited = HashSet::new();
    let mut current = *meta_command;
    loop {
        if !visited.insert(current.name.as_str()) {
            return Err(CodecError::InheritanceCycle(current.name.clone()));
        }
        for argument in &current.argument_list {
            index
                .entry(argument.name.as_str())
                .or_insert(argument.argument_type_ref.as_str());
        }
        match &current.base_meta_command {
            Some(parent) => current = system.get_meta_command(parent)?,
            None => break,
        }
    }
    Ok(index)
}
