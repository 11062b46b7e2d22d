// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Message and field descriptors.

use super::{ContainerOrdering, FieldId, MessageDescriptorBuilder, TypeDescriptor, TypeRef};
use crate::error::DescriptorError;
use crate::runtime::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Maximum field count of a compactible message.
pub const MAX_COMPACT_FIELDS: usize = 10;

/// Kind of message type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageVariant {
    Struct,
    Union,
    Exception,
}

impl MessageVariant {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Struct => "struct",
            Self::Union => "union",
            Self::Exception => "exception",
        }
    }
}

/// Per-field presence policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Requirement {
    /// Must be set before build.
    Required,
    /// May be absent.
    Optional,
    /// Always logically present; filled from the default value at build.
    #[default]
    Default,
}

/// A field default, computed at most once.
#[derive(Clone)]
pub struct DefaultValue(Arc<DefaultSource>);

enum DefaultSource {
    Ready(Value),
    Lazy {
        cell: OnceLock<Value>,
        init: Box<dyn Fn() -> Value + Send + Sync>,
    },
}

impl DefaultValue {
    pub fn new(value: Value) -> Self {
        Self(Arc::new(DefaultSource::Ready(value)))
    }

    /// Default produced on first use, e.g. one that refers to a message type
    /// declared later in the schema.
    pub fn lazy(init: impl Fn() -> Value + Send + Sync + 'static) -> Self {
        Self(Arc::new(DefaultSource::Lazy {
            cell: OnceLock::new(),
            init: Box::new(init),
        }))
    }

    pub fn get(&self) -> &Value {
        match &*self.0 {
            DefaultSource::Ready(value) => value,
            DefaultSource::Lazy { cell, init } => cell.get_or_init(|| init()),
        }
    }
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.0 {
            DefaultSource::Ready(value) => write!(f, "DefaultValue({value})"),
            DefaultSource::Lazy { cell, .. } => match cell.get() {
                Some(value) => write!(f, "DefaultValue({value})"),
                None => f.write_str("DefaultValue(<lazy>)"),
            },
        }
    }
}

/// A field of a message type.
#[derive(Clone)]
pub struct FieldDescriptor {
    id: FieldId,
    name: String,
    requirement: Requirement,
    type_ref: TypeRef,
    ordering: Option<ContainerOrdering>,
    default: Option<DefaultValue>,
    docs: Option<String>,
}

impl FieldDescriptor {
    /// New field with the `Default` requirement.
    pub fn new(id: FieldId, name: impl Into<String>, ty: impl Into<TypeRef>) -> Self {
        Self {
            id,
            name: name.into(),
            requirement: Requirement::Default,
            type_ref: ty.into(),
            ordering: None,
            default: None,
            docs: None,
        }
    }

    pub fn required(self) -> Self {
        self.with_requirement(Requirement::Required)
    }

    pub fn optional(self) -> Self {
        self.with_requirement(Requirement::Optional)
    }

    pub fn with_requirement(mut self, requirement: Requirement) -> Self {
        self.requirement = requirement;
        self
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(DefaultValue::new(value.into()));
        self
    }

    pub fn with_lazy_default(mut self, init: impl Fn() -> Value + Send + Sync + 'static) -> Self {
        self.default = Some(DefaultValue::lazy(init));
        self
    }

    /// Field-level container ordering, overriding the type's own.
    pub fn with_ordering(mut self, ordering: ContainerOrdering) -> Self {
        self.ordering = Some(ordering);
        self
    }

    pub fn with_docs(mut self, docs: impl Into<String>) -> Self {
        self.docs = Some(docs.into());
        self
    }

    pub fn id(&self) -> FieldId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn requirement(&self) -> Requirement {
        self.requirement
    }

    pub fn is_required(&self) -> bool {
        self.requirement == Requirement::Required
    }

    pub fn type_ref(&self) -> &TypeRef {
        &self.type_ref
    }

    /// Declared type of the field.
    ///
    /// # Panics
    ///
    /// Panics if the type is an unresolved registry reference.
    pub fn field_type(&self) -> &TypeDescriptor {
        self.type_ref.get()
    }

    /// Concrete container ordering used for this field.
    pub fn ordering(&self) -> ContainerOrdering {
        self.ordering
            .unwrap_or_else(|| self.field_type().ordering())
    }

    /// Explicitly declared default value.
    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref().map(DefaultValue::get)
    }

    /// Declared default, or the zero value of a primitive field.
    pub fn effective_default(&self) -> Option<Value> {
        match self.default_value() {
            Some(value) => Some(value.clone()),
            None => self.field_type().default_value(),
        }
    }

    pub fn docs(&self) -> Option<&str> {
        self.docs.as_deref()
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("requirement", &self.requirement)
            .field("type", &self.type_ref.name())
            .finish()
    }
}

/// Shared, immutable descriptor of a struct, union or exception.
#[derive(Clone)]
pub struct MessageDescriptor {
    inner: Arc<MessageInner>,
}

struct MessageInner {
    namespace: String,
    name: String,
    qualified_name: String,
    variant: MessageVariant,
    docs: Option<String>,
    fields: Vec<FieldDescriptor>,
    by_id: HashMap<FieldId, usize>,
    by_name: HashMap<String, usize>,
    compactible: bool,
    simple: OnceLock<bool>,
}

impl MessageDescriptor {
    /// Start a struct descriptor.
    pub fn builder(
        namespace: impl Into<String>,
        name: impl Into<String>,
    ) -> MessageDescriptorBuilder {
        MessageDescriptorBuilder::new(namespace, name)
    }

    pub(crate) fn from_parts(
        namespace: String,
        name: String,
        variant: MessageVariant,
        docs: Option<String>,
        compact: bool,
        fields: Vec<FieldDescriptor>,
    ) -> Result<Self, DescriptorError> {
        let qualified_name = super::qualify(&namespace, &name);
        let mut by_id = HashMap::with_capacity(fields.len());
        let mut by_name = HashMap::with_capacity(fields.len());
        for (index, field) in fields.iter().enumerate() {
            if variant == MessageVariant::Union && field.is_required() {
                return Err(DescriptorError::RequiredUnionField {
                    message: qualified_name,
                    field: field.name.clone(),
                });
            }
            if by_id.insert(field.id, index).is_some() {
                return Err(DescriptorError::DuplicateFieldId {
                    message: qualified_name,
                    id: field.id,
                });
            }
            if by_name.insert(field.name.clone(), index).is_some() {
                return Err(DescriptorError::DuplicateFieldName {
                    message: qualified_name,
                    field: field.name.clone(),
                });
            }
        }

        let compactible = compact
            && variant != MessageVariant::Union
            && fields.len() <= MAX_COMPACT_FIELDS
            && fields.iter().enumerate().all(|(index, field)| {
                field.requirement == Requirement::Optional && i32::from(field.id) == index as i32 + 1
            });
        if compact && !compactible {
            log::debug!(
                "[descriptor] {} is annotated compact but its fields do not qualify",
                qualified_name
            );
        }

        Ok(Self {
            inner: Arc::new(MessageInner {
                namespace,
                name,
                qualified_name,
                variant,
                docs,
                fields,
                by_id,
                by_name,
                compactible,
                simple: OnceLock::new(),
            }),
        })
    }

    pub fn namespace(&self) -> &str {
        &self.inner.namespace
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// `namespace.Name`, or just `Name` without a namespace.
    pub fn qualified_name(&self) -> &str {
        &self.inner.qualified_name
    }

    pub fn variant(&self) -> MessageVariant {
        self.inner.variant
    }

    pub fn is_union(&self) -> bool {
        self.inner.variant == MessageVariant::Union
    }

    pub fn docs(&self) -> Option<&str> {
        self.inner.docs.as_deref()
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.inner.fields
    }

    pub(crate) fn field_at(&self, index: usize) -> &FieldDescriptor {
        &self.inner.fields[index]
    }

    /// Declaration index of a field id.
    pub fn index_of(&self, id: FieldId) -> Option<usize> {
        self.inner.by_id.get(&id).copied()
    }

    pub fn find_field_by_id(&self, id: FieldId) -> Option<&FieldDescriptor> {
        self.index_of(id).map(|index| &self.inner.fields[index])
    }

    pub fn find_field_by_name(&self, name: &str) -> Option<&FieldDescriptor> {
        self.inner
            .by_name
            .get(name)
            .map(|&index| &self.inner.fields[index])
    }

    /// Fields that must be set before build.
    pub fn required_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.inner.fields.iter().filter(|field| field.is_required())
    }

    /// True iff no field is a message or a container.
    ///
    /// A field whose registry reference is still unresolved counts as not
    /// simple. Such an answer is not cached, so the check is repeated once
    /// the schema has finished loading.
    pub fn is_simple(&self) -> bool {
        if let Some(&simple) = self.inner.simple.get() {
            return simple;
        }
        let mut resolved = true;
        let simple = self.inner.fields.iter().all(|field| match field.type_ref().try_get() {
            Ok(ty) => matches!(ty, TypeDescriptor::Primitive(_) | TypeDescriptor::Enum(_)),
            Err(_) => {
                resolved = false;
                false
            }
        });
        if resolved {
            let _ = self.inner.simple.set(simple);
        }
        simple
    }

    /// True iff annotated compact, every field optional, ids numbered 1..=n
    /// in declaration order and n <= 10. Unions never qualify.
    pub fn is_compactible(&self) -> bool {
        self.inner.compactible
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl PartialEq for MessageDescriptor {
    // Shallow: field types are not compared, which keeps recursive schemas finite.
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
            || (self.inner.qualified_name == other.inner.qualified_name
                && self.inner.variant == other.inner.variant
                && self.inner.fields.len() == other.inner.fields.len()
                && self
                    .inner
                    .fields
                    .iter()
                    .zip(&other.inner.fields)
                    .all(|(a, b)| a.id == b.id && a.name == b.name))
    }
}

impl Eq for MessageDescriptor {}

impl fmt::Debug for MessageDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageDescriptor")
            .field("name", &self.inner.qualified_name)
            .field("variant", &self.inner.variant)
            .field("fields", &self.inner.fields)
            .finish()
    }
}

impl fmt::Display for MessageDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inner.qualified_name)
    }
}
