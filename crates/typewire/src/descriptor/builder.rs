// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fluent builder API for message and enum descriptors.

use super::{
    EnumDescriptor, EnumEntry, FieldDescriptor, FieldId, MessageDescriptor, MessageVariant,
    TypeRef,
};
use crate::error::DescriptorError;

/// Builder for struct, union and exception descriptors.
#[derive(Debug)]
pub struct MessageDescriptorBuilder {
    namespace: String,
    name: String,
    variant: MessageVariant,
    docs: Option<String>,
    compact: bool,
    fields: Vec<FieldDescriptor>,
}

impl MessageDescriptorBuilder {
    /// Create a new builder for a struct type.
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            variant: MessageVariant::Struct,
            docs: None,
            compact: false,
            fields: Vec::new(),
        }
    }

    pub fn variant(mut self, variant: MessageVariant) -> Self {
        self.variant = variant;
        self
    }

    /// Add a field with the `Default` requirement.
    pub fn field(mut self, id: FieldId, name: impl Into<String>, ty: impl Into<TypeRef>) -> Self {
        self.fields.push(FieldDescriptor::new(id, name, ty));
        self
    }

    /// Add a required field.
    pub fn required(mut self, id: FieldId, name: impl Into<String>, ty: impl Into<TypeRef>) -> Self {
        self.fields.push(FieldDescriptor::new(id, name, ty).required());
        self
    }

    /// Add an optional field.
    pub fn optional(mut self, id: FieldId, name: impl Into<String>, ty: impl Into<TypeRef>) -> Self {
        self.fields.push(FieldDescriptor::new(id, name, ty).optional());
        self
    }

    /// Add a fully configured field (defaults, ordering override, docs).
    pub fn field_descriptor(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Opt in to compact (positional) encoding when the fields qualify.
    pub fn compact(mut self) -> Self {
        self.compact = true;
        self
    }

    pub fn docs(mut self, docs: impl Into<String>) -> Self {
        self.docs = Some(docs.into());
        self
    }

    pub fn build(self) -> Result<MessageDescriptor, DescriptorError> {
        MessageDescriptor::from_parts(
            self.namespace,
            self.name,
            self.variant,
            self.docs,
            self.compact,
            self.fields,
        )
    }
}

impl MessageDescriptor {
    /// Start a union descriptor.
    pub fn union(namespace: impl Into<String>, name: impl Into<String>) -> MessageDescriptorBuilder {
        MessageDescriptorBuilder::new(namespace, name).variant(MessageVariant::Union)
    }

    /// Start an exception descriptor.
    pub fn exception(
        namespace: impl Into<String>,
        name: impl Into<String>,
    ) -> MessageDescriptorBuilder {
        MessageDescriptorBuilder::new(namespace, name).variant(MessageVariant::Exception)
    }
}

/// Builder for enum descriptors.
#[derive(Debug)]
pub struct EnumDescriptorBuilder {
    namespace: String,
    name: String,
    docs: Option<String>,
    entries: Vec<EnumEntry>,
    next_value: i32,
}

impl EnumDescriptorBuilder {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            docs: None,
            entries: Vec::new(),
            next_value: 0,
        }
    }

    /// Add a value numbered one past the previous one (starting at 0).
    pub fn value(self, name: impl Into<String>) -> Self {
        let value = self.next_value;
        self.value_with(name, value)
    }

    /// Add a value with an explicit number.
    pub fn value_with(self, name: impl Into<String>, value: i32) -> Self {
        self.entry(EnumEntry::new(name, value))
    }

    pub fn entry(mut self, entry: EnumEntry) -> Self {
        self.next_value = entry.value.wrapping_add(1);
        self.entries.push(entry);
        self
    }

    pub fn docs(mut self, docs: impl Into<String>) -> Self {
        self.docs = Some(docs.into());
        self
    }

    pub fn build(self) -> Result<EnumDescriptor, DescriptorError> {
        EnumDescriptor::from_parts(self.namespace, self.name, self.docs, self.entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{ContainerOrdering, PrimitiveKind, Requirement, TypeDescriptor};

    #[test]
    fn test_builder_struct() {
        let desc = MessageDescriptorBuilder::new("geo", "Point")
            .required(1, "x", PrimitiveKind::Double)
            .required(2, "y", PrimitiveKind::Double)
            .field(3, "label", PrimitiveKind::String)
            .docs("A point on the plane.")
            .build()
            .expect("valid descriptor");

        assert_eq!(desc.variant(), MessageVariant::Struct);
        assert_eq!(desc.fields().len(), 3);
        assert_eq!(desc.fields()[2].requirement(), Requirement::Default);
        assert_eq!(desc.docs(), Some("A point on the plane."));
    }

    #[test]
    fn test_builder_union_and_exception() {
        let union = MessageDescriptor::union("test", "Value")
            .optional(1, "i", PrimitiveKind::I32)
            .optional(2, "s", PrimitiveKind::String)
            .build()
            .expect("valid union");
        assert!(union.is_union());

        let exception = MessageDescriptor::exception("test", "Failure")
            .optional(1, "message", PrimitiveKind::String)
            .build()
            .expect("valid exception");
        assert_eq!(exception.variant(), MessageVariant::Exception);
    }

    #[test]
    fn test_builder_field_descriptor() {
        let desc = MessageDescriptorBuilder::new("test", "Tagged")
            .field_descriptor(
                FieldDescriptor::new(4, "tags", TypeDescriptor::set(PrimitiveKind::String))
                    .optional()
                    .with_ordering(ContainerOrdering::Ordered)
                    .with_docs("Insertion ordered."),
            )
            .build()
            .expect("valid descriptor");

        let field = desc.find_field_by_id(4).expect("declared");
        assert_eq!(field.ordering(), ContainerOrdering::Ordered);
        assert_eq!(field.docs(), Some("Insertion ordered."));
    }

    #[test]
    fn test_enum_builder_numbering() {
        let desc = EnumDescriptorBuilder::new("test", "Level")
            .value("LOW")
            .value("MEDIUM")
            .value_with("HIGH", 10)
            .value("CRITICAL")
            .build()
            .expect("valid enum");

        let values: Vec<i32> = desc.entries().iter().map(|e| e.value).collect();
        assert_eq!(values, [0, 1, 10, 11]);
    }
}
