// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type descriptors for every schema type.

use super::{EnumDescriptor, MessageDescriptor, TypeRegistry};
use crate::error::DescriptorError;
use crate::runtime::Value;
use std::fmt;
use std::sync::{Arc, OnceLock, Weak};

/// Numeric field id, the wire tag of a field within its message.
pub type FieldId = i16;

/// Primitive type kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Bool,
    Byte,
    I16,
    I32,
    I64,
    Double,
    String,
    Binary,
}

impl PrimitiveKind {
    /// Schema name of the primitive.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Byte => "byte",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::Double => "double",
            Self::String => "string",
            Self::Binary => "binary",
        }
    }

    /// Encoded payload size in bytes (None for length-prefixed kinds).
    pub fn fixed_size(&self) -> Option<usize> {
        match self {
            Self::Bool | Self::Byte => Some(1),
            Self::I16 => Some(2),
            Self::I32 => Some(4),
            Self::I64 | Self::Double => Some(8),
            Self::String | Self::Binary => None,
        }
    }

    /// Zero value of the kind.
    pub fn default_value(&self) -> Value {
        match self {
            Self::Bool => Value::Bool(false),
            Self::Byte => Value::Byte(0),
            Self::I16 => Value::I16(0),
            Self::I32 => Value::I32(0),
            Self::I64 => Value::I64(0),
            Self::Double => Value::Double(0.0),
            Self::String => Value::String(String::new()),
            Self::Binary => Value::Binary(Vec::new()),
        }
    }
}

/// Concrete container semantics.
///
/// `Default` is unordered (the runtime keeps a canonical sorted layout but
/// makes no promise about it), `Sorted` keeps items/keys in value order, and
/// `Ordered` preserves insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ContainerOrdering {
    #[default]
    Default,
    Sorted,
    Ordered,
}

/// A schema type.
#[derive(Clone)]
pub enum TypeDescriptor {
    Primitive(PrimitiveKind),
    Enum(EnumDescriptor),
    List {
        item: TypeRef,
        ordering: ContainerOrdering,
    },
    Set {
        item: TypeRef,
        ordering: ContainerOrdering,
    },
    Map {
        key: TypeRef,
        value: TypeRef,
        ordering: ContainerOrdering,
    },
    /// Struct, union or exception.
    Message(MessageDescriptor),
}

impl TypeDescriptor {
    pub fn list(item: impl Into<TypeRef>) -> Self {
        Self::List {
            item: item.into(),
            ordering: ContainerOrdering::Default,
        }
    }

    pub fn set(item: impl Into<TypeRef>) -> Self {
        Self::Set {
            item: item.into(),
            ordering: ContainerOrdering::Default,
        }
    }

    pub fn map(key: impl Into<TypeRef>, value: impl Into<TypeRef>) -> Self {
        Self::Map {
            key: key.into(),
            value: value.into(),
            ordering: ContainerOrdering::Default,
        }
    }

    /// Replace the intrinsic ordering of a container type. No-op otherwise.
    pub fn with_ordering(mut self, new: ContainerOrdering) -> Self {
        match &mut self {
            Self::List { ordering, .. } | Self::Set { ordering, .. } | Self::Map { ordering, .. } => {
                *ordering = new;
            }
            _ => {}
        }
        self
    }

    /// Intrinsic container ordering (`Default` for non-containers).
    pub fn ordering(&self) -> ContainerOrdering {
        match self {
            Self::List { ordering, .. } | Self::Set { ordering, .. } | Self::Map { ordering, .. } => {
                *ordering
            }
            _ => ContainerOrdering::Default,
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self, Self::List { .. } | Self::Set { .. } | Self::Map { .. })
    }

    pub fn as_message(&self) -> Option<&MessageDescriptor> {
        match self {
            Self::Message(descriptor) => Some(descriptor),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumDescriptor> {
        match self {
            Self::Enum(descriptor) => Some(descriptor),
            _ => None,
        }
    }

    /// Schema type name: `i32`, `pkg.Color`, `list<i32>`, `map<string,pkg.Foo>`.
    pub fn name(&self) -> String {
        match self {
            Self::Primitive(kind) => kind.name().to_string(),
            Self::Enum(descriptor) => descriptor.qualified_name().to_string(),
            Self::List { item, .. } => format!("list<{}>", item.name()),
            Self::Set { item, .. } => format!("set<{}>", item.name()),
            Self::Map { key, value, .. } => format!("map<{},{}>", key.name(), value.name()),
            Self::Message(descriptor) => descriptor.qualified_name().to_string(),
        }
    }

    /// Implicit default: the zero value for primitives, nothing otherwise.
    pub fn default_value(&self) -> Option<Value> {
        match self {
            Self::Primitive(kind) => Some(kind.default_value()),
            _ => None,
        }
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Primitive(a), Self::Primitive(b)) => a == b,
            (Self::Enum(a), Self::Enum(b)) => a == b,
            (
                Self::List {
                    item: a,
                    ordering: oa,
                },
                Self::List {
                    item: b,
                    ordering: ob,
                },
            )
            | (
                Self::Set {
                    item: a,
                    ordering: oa,
                },
                Self::Set {
                    item: b,
                    ordering: ob,
                },
            ) => oa == ob && a == b,
            (
                Self::Map {
                    key: ka,
                    value: va,
                    ordering: oa,
                },
                Self::Map {
                    key: kb,
                    value: vb,
                    ordering: ob,
                },
            ) => oa == ob && ka == kb && va == vb,
            (Self::Message(a), Self::Message(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for TypeDescriptor {
    // Only names: message types may refer back to themselves.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeDescriptor({})", self.name())
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl From<PrimitiveKind> for TypeDescriptor {
    fn from(kind: PrimitiveKind) -> Self {
        Self::Primitive(kind)
    }
}

impl From<EnumDescriptor> for TypeDescriptor {
    fn from(descriptor: EnumDescriptor) -> Self {
        Self::Enum(descriptor)
    }
}

impl From<MessageDescriptor> for TypeDescriptor {
    fn from(descriptor: MessageDescriptor) -> Self {
        Self::Message(descriptor)
    }
}

/// Shared handle to a type, resolved on first use.
///
/// A reference created from a [`TypeDescriptor`] is resolved immediately. A
/// reference obtained from [`TypeRegistry::reference`] names a type that may
/// not be registered yet; it resolves against the registry the first time it
/// is read, which is how recursive and mutually recursive schemas are wired.
#[derive(Clone)]
pub struct TypeRef(Arc<TypeRefInner>);

struct TypeRefInner {
    resolved: OnceLock<TypeDescriptor>,
    deferred: Option<Deferred>,
}

struct Deferred {
    name: String,
    registry: Weak<TypeRegistry>,
}

impl TypeRef {
    pub fn new(descriptor: TypeDescriptor) -> Self {
        let resolved = OnceLock::new();
        let _ = resolved.set(descriptor);
        Self(Arc::new(TypeRefInner {
            resolved,
            deferred: None,
        }))
    }

    pub(crate) fn deferred(name: String, registry: Weak<TypeRegistry>) -> Self {
        Self(Arc::new(TypeRefInner {
            resolved: OnceLock::new(),
            deferred: Some(Deferred { name, registry }),
        }))
    }

    /// Resolve the referenced type.
    pub fn try_get(&self) -> Result<&TypeDescriptor, DescriptorError> {
        if let Some(descriptor) = self.0.resolved.get() {
            return Ok(descriptor);
        }
        let Some(deferred) = &self.0.deferred else {
            return Err(DescriptorError::UnresolvedType("<anonymous>".to_string()));
        };
        let found = deferred
            .registry
            .upgrade()
            .and_then(|registry| registry.get(&deferred.name));
        match found {
            Some(descriptor) => Ok(self.0.resolved.get_or_init(|| descriptor)),
            None => Err(DescriptorError::UnresolvedType(deferred.name.clone())),
        }
    }

    /// Resolve the referenced type.
    ///
    /// # Panics
    ///
    /// Panics if the reference names a type that was never registered. Call
    /// [`TypeRegistry::resolve_all`] after loading a schema to rule this out.
    pub fn get(&self) -> &TypeDescriptor {
        match self.try_get() {
            Ok(descriptor) => descriptor,
            Err(err) => panic!("{err}"),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.0.resolved.get().is_some()
    }

    /// Type name, available before resolution for deferred references.
    pub fn name(&self) -> String {
        match (self.0.resolved.get(), &self.0.deferred) {
            (Some(descriptor), _) => descriptor.name(),
            (None, Some(deferred)) => deferred.name.clone(),
            (None, None) => "<anonymous>".to_string(),
        }
    }
}

impl PartialEq for TypeRef {
    fn eq(&self, other: &Self) -> bool {
        if Arc::ptr_eq(&self.0, &other.0) {
            return true;
        }
        match (self.try_get(), other.try_get()) {
            (Ok(a), Ok(b)) => a == b,
            _ => self.name() == other.name(),
        }
    }
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeRef({})", self.name())
    }
}

impl From<TypeDescriptor> for TypeRef {
    fn from(descriptor: TypeDescriptor) -> Self {
        Self::new(descriptor)
    }
}

impl From<PrimitiveKind> for TypeRef {
    fn from(kind: PrimitiveKind) -> Self {
        Self::new(TypeDescriptor::Primitive(kind))
    }
}

impl From<EnumDescriptor> for TypeRef {
    fn from(descriptor: EnumDescriptor) -> Self {
        Self::new(TypeDescriptor::Enum(descriptor))
    }
}

impl From<MessageDescriptor> for TypeRef {
    fn from(descriptor: MessageDescriptor) -> Self {
        Self::new(TypeDescriptor::Message(descriptor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_sizes() {
        assert_eq!(PrimitiveKind::Bool.fixed_size(), Some(1));
        assert_eq!(PrimitiveKind::I16.fixed_size(), Some(2));
        assert_eq!(PrimitiveKind::Double.fixed_size(), Some(8));
        assert_eq!(PrimitiveKind::Binary.fixed_size(), None);
    }

    #[test]
    fn test_container_names() {
        let ty = TypeDescriptor::map(
            PrimitiveKind::String,
            TypeDescriptor::list(PrimitiveKind::I32),
        );
        assert_eq!(ty.name(), "map<string,list<i32>>");
        assert!(ty.is_container());
        assert_eq!(ty.ordering(), ContainerOrdering::Default);

        let sorted = TypeDescriptor::set(PrimitiveKind::I64).with_ordering(ContainerOrdering::Sorted);
        assert_eq!(sorted.ordering(), ContainerOrdering::Sorted);
        assert_eq!(sorted.to_string(), "set<i64>");
    }

    #[test]
    fn test_with_ordering_ignores_scalars() {
        let ty = TypeDescriptor::from(PrimitiveKind::I32).with_ordering(ContainerOrdering::Ordered);
        assert_eq!(ty.ordering(), ContainerOrdering::Default);
        assert!(!ty.is_container());
    }

    #[test]
    fn test_equality_accounts_for_ordering() {
        let a = TypeDescriptor::set(PrimitiveKind::I32);
        let b = TypeDescriptor::set(PrimitiveKind::I32);
        let c = TypeDescriptor::set(PrimitiveKind::I32).with_ordering(ContainerOrdering::Ordered);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, TypeDescriptor::list(PrimitiveKind::I32));
    }

    #[test]
    fn test_default_values() {
        assert_eq!(
            TypeDescriptor::from(PrimitiveKind::I32).default_value(),
            Some(Value::I32(0))
        );
        assert_eq!(TypeDescriptor::list(PrimitiveKind::I32).default_value(), None);
    }

    #[test]
    fn test_orphan_deferred_reference_is_unresolved() {
        let orphan = TypeRef::deferred("pkg.Missing".to_string(), Weak::new());
        assert!(!orphan.is_resolved());
        assert_eq!(orphan.name(), "pkg.Missing");
        assert_eq!(
            orphan.try_get().expect_err("no registry"),
            DescriptorError::UnresolvedType("pkg.Missing".to_string())
        );
    }
}
