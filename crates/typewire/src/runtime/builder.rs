// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Mutable message builder.
//!
//! A struct builder keeps one slot per declared field plus a `modified`
//! bitset; a union builder keeps a single active slot, so at most one field
//! can ever be set. A message-typed field holds either a built value or a
//! live nested builder, never both.

use super::bits::FieldBits;
use super::message::Fields;
use super::value::Mismatch;
use super::{MapValue, Message, SetValue, Value};
use crate::descriptor::{
    ContainerOrdering, FieldDescriptor, FieldId, MessageDescriptor, Requirement, TypeDescriptor,
};
use crate::error::{FieldError, ValidationError};

#[derive(Debug, Clone)]
enum Entry {
    Value(Value),
    Builder(Box<MessageBuilder>),
}

impl Entry {
    fn snapshot(&self) -> Value {
        match self {
            Self::Value(value) => value.clone(),
            Self::Builder(builder) => Value::Message(builder.build_partial()),
        }
    }

    /// Live builder for this entry, turning a stored value into one in place.
    fn as_builder(&mut self, descriptor: &MessageDescriptor) -> &mut MessageBuilder {
        match self {
            Self::Builder(builder) => builder,
            Self::Value(value) => {
                let builder = match value {
                    Value::Message(message) => message.mutate(),
                    _ => MessageBuilder::new(descriptor.clone()),
                };
                *self = Self::Builder(Box::new(builder));
                self.as_builder(descriptor)
            }
        }
    }
}

#[derive(Debug, Clone)]
enum Slots {
    Struct(Vec<Option<Entry>>),
    Union(Option<(usize, Entry)>),
}

/// Builder for a [`Message`] of any descriptor.
#[derive(Debug, Clone)]
pub struct MessageBuilder {
    descriptor: MessageDescriptor,
    slots: Slots,
    modified: FieldBits,
}

impl MessageBuilder {
    pub fn new(descriptor: MessageDescriptor) -> Self {
        let len = descriptor.fields().len();
        let slots = if descriptor.is_union() {
            Slots::Union(None)
        } else {
            Slots::Struct(vec![None; len])
        };
        Self {
            descriptor,
            slots,
            modified: FieldBits::new(len),
        }
    }

    /// Builder holding the fields of `message`, none marked modified.
    pub fn from_message(message: &Message) -> Self {
        let mut builder = Self::new(message.descriptor().clone());
        for (index, value) in message.entries() {
            builder.store(index, Entry::Value(value.clone()));
        }
        builder
    }

    pub fn descriptor(&self) -> &MessageDescriptor {
        &self.descriptor
    }

    fn store(&mut self, index: usize, entry: Entry) -> &mut Entry {
        match &mut self.slots {
            Slots::Struct(slots) => slots[index].insert(entry),
            Slots::Union(active) => &mut active.insert((index, entry)).1,
        }
    }

    /// Store and mark modified. Replacing a union's active field marks the
    /// displaced field modified too.
    fn put(&mut self, index: usize, entry: Entry) -> &mut Entry {
        if let Some(previous) = self.active_index().filter(|&active| active != index) {
            self.modified.set(previous);
        }
        self.modified.set(index);
        self.store(index, entry)
    }

    fn take_entry(&mut self, index: usize) -> Option<Entry> {
        match &mut self.slots {
            Slots::Struct(slots) => slots[index].take(),
            Slots::Union(active) => {
                if active.as_ref().is_some_and(|(i, _)| *i == index) {
                    active.take().map(|(_, entry)| entry)
                } else {
                    None
                }
            }
        }
    }

    fn entry(&self, index: usize) -> Option<&Entry> {
        match &self.slots {
            Slots::Struct(slots) => slots.get(index).and_then(Option::as_ref),
            Slots::Union(Some((active, entry))) if *active == index => Some(entry),
            Slots::Union(_) => None,
        }
    }

    fn entries(&self) -> impl Iterator<Item = (usize, &Entry)> {
        let (slots, active) = match &self.slots {
            Slots::Struct(slots) => (Some(slots), None),
            Slots::Union(active) => (None, active.as_ref()),
        };
        slots
            .into_iter()
            .flat_map(|slots| {
                slots
                    .iter()
                    .enumerate()
                    .filter_map(|(index, slot)| slot.as_ref().map(|entry| (index, entry)))
            })
            .chain(active.map(|(index, entry)| (*index, entry)))
    }

    fn active_index(&self) -> Option<usize> {
        match &self.slots {
            Slots::Union(Some((active, _))) => Some(*active),
            _ => None,
        }
    }

    fn require_index(&self, id: FieldId) -> Result<usize, FieldError> {
        self.descriptor
            .index_of(id)
            .ok_or_else(|| FieldError::NoSuchField {
                message: self.descriptor.qualified_name().to_string(),
                id,
            })
    }

    fn mismatch(&self, field: &FieldDescriptor, mismatch: Mismatch) -> FieldError {
        FieldError::TypeMismatch {
            message: self.descriptor.qualified_name().to_string(),
            field: field.name().to_string(),
            expected: mismatch.expected,
            got: mismatch.got,
        }
    }

    fn wrong_container(&self, field: &FieldDescriptor, expected: &'static str) -> FieldError {
        FieldError::WrongContainer {
            message: self.descriptor.qualified_name().to_string(),
            field: field.name().to_string(),
            expected,
        }
    }

    /// Set a field, replacing any previous value (or, for a union, any other
    /// active field). Setting an undeclared id is ignored.
    pub fn set(&mut self, id: FieldId, value: impl Into<Value>) -> Result<&mut Self, FieldError> {
        let Some(index) = self.descriptor.index_of(id) else {
            log::debug!(
                "[builder] ignoring set of undeclared field {} in {}",
                id,
                self.descriptor.qualified_name()
            );
            return Ok(self);
        };
        let field = self.descriptor.field_at(index);
        let value = value
            .into()
            .conform(field.field_type(), field.ordering())
            .map_err(|m| self.mismatch(field, m))?;
        self.put(index, Entry::Value(value));
        Ok(self)
    }

    /// Unset a field. Clearing an undeclared id is ignored.
    pub fn clear(&mut self, id: FieldId) -> &mut Self {
        match self.descriptor.index_of(id) {
            Some(index) => {
                self.take_entry(index);
                self.modified.set(index);
            }
            None => log::debug!(
                "[builder] ignoring clear of undeclared field {} in {}",
                id,
                self.descriptor.qualified_name()
            ),
        }
        self
    }

    /// Append to a list field or insert into a set field.
    pub fn add_to(&mut self, id: FieldId, item: impl Into<Value>) -> Result<&mut Self, FieldError> {
        let index = self.require_index(id)?;
        let descriptor = self.descriptor.clone();
        let field = descriptor.field_at(index);
        let ordering = field.ordering();
        let entry = match field.field_type() {
            TypeDescriptor::List { item: item_ty, .. } => {
                let item_ty = item_ty.get();
                let item = item
                    .into()
                    .conform(item_ty, item_ty.ordering())
                    .map_err(|m| self.mismatch(field, m))?;
                let mut items = match self.take_entry(index) {
                    Some(Entry::Value(Value::List(items))) => items,
                    _ => Vec::new(),
                };
                if ordering == ContainerOrdering::Sorted {
                    let pos = items.partition_point(|existing| existing <= &item);
                    items.insert(pos, item);
                } else {
                    items.push(item);
                }
                Value::List(items)
            }
            TypeDescriptor::Set { item: item_ty, .. } => {
                let item_ty = item_ty.get();
                let item = item
                    .into()
                    .conform(item_ty, item_ty.ordering())
                    .map_err(|m| self.mismatch(field, m))?;
                let mut set = match self.take_entry(index) {
                    Some(Entry::Value(Value::Set(set))) => set,
                    _ => SetValue::new(ordering),
                };
                set.insert(item);
                Value::Set(set)
            }
            _ => return Err(self.wrong_container(field, "list or set")),
        };
        self.put(index, Entry::Value(entry));
        Ok(self)
    }

    /// Put an entry into a map field.
    pub fn put_in(
        &mut self,
        id: FieldId,
        key: impl Into<Value>,
        value: impl Into<Value>,
    ) -> Result<&mut Self, FieldError> {
        let index = self.require_index(id)?;
        let descriptor = self.descriptor.clone();
        let field = descriptor.field_at(index);
        let TypeDescriptor::Map {
            key: key_ty,
            value: value_ty,
            ..
        } = field.field_type()
        else {
            return Err(self.wrong_container(field, "map"));
        };
        let (key_ty, value_ty) = (key_ty.get(), value_ty.get());
        let key = key
            .into()
            .conform(key_ty, key_ty.ordering())
            .map_err(|m| self.mismatch(field, m))?;
        let value = value
            .into()
            .conform(value_ty, value_ty.ordering())
            .map_err(|m| self.mismatch(field, m))?;
        let mut map = match self.take_entry(index) {
            Some(Entry::Value(Value::Map(map))) => map,
            _ => MapValue::new(field.ordering()),
        };
        map.insert(key, value);
        self.put(index, Entry::Value(Value::Map(map)));
        Ok(self)
    }

    /// Live builder for a message-typed field.
    ///
    /// Reuses an existing nested builder, mutates an existing value, or
    /// starts empty. The field counts as set from this call on.
    pub fn mutable_message(&mut self, id: FieldId) -> Result<&mut MessageBuilder, FieldError> {
        let index = self.require_index(id)?;
        let field = self.descriptor.field_at(index);
        let Some(child) = field.field_type().as_message() else {
            return Err(FieldError::NotAMessage {
                message: self.descriptor.qualified_name().to_string(),
                field: field.name().to_string(),
            });
        };
        let child = child.clone();
        Ok(self.child_builder(index, child))
    }

    fn child_builder(&mut self, index: usize, descriptor: MessageDescriptor) -> &mut MessageBuilder {
        let entry = self
            .take_entry(index)
            .unwrap_or_else(|| Entry::Builder(Box::new(MessageBuilder::new(descriptor.clone()))));
        self.put(index, entry).as_builder(&descriptor)
    }

    /// Current value of a field. A nested builder is snapshotted, not consumed.
    pub fn get(&self, id: FieldId) -> Option<Value> {
        self.descriptor
            .index_of(id)
            .and_then(|index| self.entry(index))
            .map(Entry::snapshot)
    }

    pub fn is_set(&self, id: FieldId) -> bool {
        self.descriptor
            .index_of(id)
            .is_some_and(|index| self.entry(index).is_some())
    }

    pub fn is_modified(&self, id: FieldId) -> bool {
        self.descriptor
            .index_of(id)
            .is_some_and(|index| self.modified.get(index))
    }

    /// Ids of set fields, in declaration order.
    pub fn set_fields(&self) -> Vec<FieldId> {
        self.entries()
            .map(|(index, _)| self.descriptor.field_at(index).id())
            .collect()
    }

    /// Ids of fields touched since this builder was created.
    pub fn modified_fields(&self) -> Vec<FieldId> {
        self.modified
            .iter_ones()
            .map(|index| self.descriptor.field_at(index).id())
            .collect()
    }

    /// Same classification as [`Message::is_compact`], over the current slots.
    pub fn is_compact(&self) -> bool {
        if !self.descriptor.is_compactible() {
            return false;
        }
        let Slots::Struct(slots) = &self.slots else {
            return false;
        };
        let present = slots.iter().take_while(|slot| slot.is_some()).count();
        slots[present..].iter().all(Option::is_none)
    }

    /// Active field of a union builder.
    pub fn union_field(&self) -> Option<&FieldDescriptor> {
        self.active_index()
            .map(|index| self.descriptor.field_at(index))
    }

    /// Merge every present field of `incoming` into this builder.
    ///
    /// Scalars are replaced, nested messages merged recursively, lists
    /// appended, sets and maps unioned. A union merges into the active field
    /// only when `incoming` has the same one active; otherwise it switches.
    pub fn merge(&mut self, incoming: &Message) -> Result<&mut Self, FieldError> {
        if incoming.descriptor() != &self.descriptor {
            return Err(FieldError::DescriptorMismatch {
                expected: self.descriptor.qualified_name().to_string(),
                got: incoming.descriptor().qualified_name().to_string(),
            });
        }
        if self.descriptor.is_union() {
            if let Some((index, value)) = incoming.entries().next() {
                if self.active_index() == Some(index) {
                    self.merge_at(index, value)?;
                } else {
                    self.put(index, Entry::Value(value.clone()));
                }
            }
        } else {
            for (index, value) in incoming.entries() {
                self.merge_at(index, value)?;
            }
        }
        Ok(self)
    }

    fn merge_at(&mut self, index: usize, incoming: &Value) -> Result<(), FieldError> {
        if let Value::Message(message) = incoming {
            if self.entry(index).is_some() {
                self.child_builder(index, message.descriptor().clone())
                    .merge(message)?;
                return Ok(());
            }
        }
        let ordering = self.descriptor.field_at(index).ordering();
        let merged = match (self.take_entry(index), incoming) {
            (Some(Entry::Value(Value::List(mut items))), Value::List(more)) => {
                items.extend(more.iter().cloned());
                if ordering == ContainerOrdering::Sorted {
                    items.sort();
                }
                Value::List(items)
            }
            (Some(Entry::Value(Value::Set(mut set))), Value::Set(more)) => {
                set.extend(more.iter().cloned());
                Value::Set(set)
            }
            (Some(Entry::Value(Value::Map(mut map))), Value::Map(more)) => {
                map.extend(more.iter().map(|(k, v)| (k.clone(), v.clone())));
                Value::Map(map)
            }
            (_, value) => value.clone(),
        };
        self.put(index, Entry::Value(merged));
        Ok(())
    }

    /// True iff [`validate`](Self::validate) would pass.
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Check required fields (every missing one is reported) or, for a
    /// union, that a field is active. Nested builders are checked as well.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match &self.slots {
            Slots::Struct(slots) => {
                let missing: Vec<String> = self
                    .descriptor
                    .fields()
                    .iter()
                    .zip(slots)
                    .filter(|(field, slot)| field.is_required() && slot.is_none())
                    .map(|(field, _)| field.name().to_string())
                    .collect();
                if !missing.is_empty() {
                    return Err(ValidationError::MissingRequired {
                        message: self.descriptor.qualified_name().to_string(),
                        fields: missing,
                    });
                }
            }
            Slots::Union(None) => {
                return Err(ValidationError::NoUnionField {
                    message: self.descriptor.qualified_name().to_string(),
                });
            }
            Slots::Union(Some(_)) => {}
        }
        for (_, entry) in self.entries() {
            if let Entry::Builder(builder) = entry {
                builder.validate()?;
            }
        }
        Ok(())
    }

    /// Validate, then build. The builder stays usable.
    pub fn build(&self) -> Result<Message, ValidationError> {
        self.validate()?;
        Ok(self.build_partial())
    }

    /// Build without validation. Unset `Default` fields still get their
    /// default value.
    pub fn build_partial(&self) -> Message {
        let fields = match &self.slots {
            Slots::Struct(slots) => Fields::Struct(
                slots
                    .iter()
                    .enumerate()
                    .map(|(index, slot)| match slot {
                        Some(entry) => Some(entry.snapshot()),
                        None => self.default_for(index),
                    })
                    .collect(),
            ),
            Slots::Union(active) => {
                Fields::Union(active.as_ref().map(|(index, entry)| (*index, entry.snapshot())))
            }
        };
        Message::from_parts(self.descriptor.clone(), fields)
    }

    fn default_for(&self, index: usize) -> Option<Value> {
        let field = self.descriptor.field_at(index);
        if field.requirement() != Requirement::Default {
            return None;
        }
        match field
            .effective_default()?
            .conform(field.field_type(), field.ordering())
        {
            Ok(value) => Some(value),
            Err(m) => {
                log::warn!(
                    "[builder] ignoring default of {}.{}: expected {}, got {}",
                    self.descriptor.qualified_name(),
                    field.name(),
                    m.expected,
                    m.got
                );
                None
            }
        }
    }

    pub(crate) fn set_value_at(&mut self, index: usize, value: Value) {
        self.put(index, Entry::Value(value));
    }

    pub(crate) fn set_builder_at(&mut self, index: usize, builder: MessageBuilder) {
        self.put(index, Entry::Builder(Box::new(builder)));
    }
}
