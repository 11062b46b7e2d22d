// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dynamic value representation.

use super::container::compare_by_hash;
use super::{EnumValue, MapValue, Message, SetValue};
use crate::descriptor::{ContainerOrdering, PrimitiveKind, TypeDescriptor};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A value of any schema type.
#[derive(Debug, Clone)]
pub enum Value {
    Bool(bool),
    Byte(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    Double(f64),
    String(String),
    Binary(Vec<u8>),
    Enum(EnumValue),
    List(Vec<Value>),
    Set(SetValue),
    Map(MapValue),
    Message(Message),
}

/// A value did not match the type it was checked against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Mismatch {
    pub expected: String,
    pub got: String,
}

impl Value {
    /// Build a list value from anything convertible to values.
    pub fn list<T: Into<Value>>(items: impl IntoIterator<Item = T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_byte(&self) -> Option<i8> {
        match self {
            Self::Byte(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i16(&self) -> Option<i16> {
        match self {
            Self::I16(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Self::I32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::I64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Double(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Binary(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumValue> {
        match self {
            Self::Enum(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_set(&self) -> Option<&SetValue> {
        match self {
            Self::Set(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&MapValue> {
        match self {
            Self::Map(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_message(&self) -> Option<&Message> {
        match self {
            Self::Message(v) => Some(v),
            _ => None,
        }
    }

    /// Item count of a container, 1 for anything else.
    pub fn count(&self) -> usize {
        match self {
            Self::List(items) => items.len(),
            Self::Set(set) => set.len(),
            Self::Map(map) => map.len(),
            _ => 1,
        }
    }

    /// Type name for diagnostics.
    pub fn type_name(&self) -> String {
        match self {
            Self::Bool(_) => PrimitiveKind::Bool.name().to_string(),
            Self::Byte(_) => PrimitiveKind::Byte.name().to_string(),
            Self::I16(_) => PrimitiveKind::I16.name().to_string(),
            Self::I32(_) => PrimitiveKind::I32.name().to_string(),
            Self::I64(_) => PrimitiveKind::I64.name().to_string(),
            Self::Double(_) => PrimitiveKind::Double.name().to_string(),
            Self::String(_) => PrimitiveKind::String.name().to_string(),
            Self::Binary(_) => PrimitiveKind::Binary.name().to_string(),
            Self::Enum(v) => v.descriptor().qualified_name().to_string(),
            Self::List(_) => "list".to_string(),
            Self::Set(_) => "set".to_string(),
            Self::Map(_) => "map".to_string(),
            Self::Message(m) => m.descriptor().qualified_name().to_string(),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Bool(_) => 0,
            Self::Byte(_) => 1,
            Self::I16(_) => 2,
            Self::I32(_) => 3,
            Self::I64(_) => 4,
            Self::Double(_) => 5,
            Self::String(_) => 6,
            Self::Binary(_) => 7,
            Self::Enum(_) => 8,
            Self::List(_) => 9,
            Self::Set(_) => 10,
            Self::Map(_) => 11,
            Self::Message(_) => 12,
        }
    }

    /// Check the value against `ty`, reshaping containers to `ordering`
    /// (nested containers to their own type's ordering).
    ///
    /// An `i32` is accepted for an enum type when it names a declared value.
    pub(crate) fn conform(self, ty: &TypeDescriptor, ordering: ContainerOrdering) -> Result<Value, Mismatch> {
        let mismatch = |value: &Value| Mismatch {
            expected: ty.name(),
            got: value.type_name(),
        };
        match (ty, self) {
            (TypeDescriptor::Primitive(kind), value) => {
                let matches = matches!(
                    (kind, &value),
                    (PrimitiveKind::Bool, Self::Bool(_))
                        | (PrimitiveKind::Byte, Self::Byte(_))
                        | (PrimitiveKind::I16, Self::I16(_))
                        | (PrimitiveKind::I32, Self::I32(_))
                        | (PrimitiveKind::I64, Self::I64(_))
                        | (PrimitiveKind::Double, Self::Double(_))
                        | (PrimitiveKind::String, Self::String(_))
                        | (PrimitiveKind::Binary, Self::Binary(_))
                );
                if matches {
                    Ok(value)
                } else {
                    Err(mismatch(&value))
                }
            }
            (TypeDescriptor::Enum(descriptor), Self::Enum(value)) if value.descriptor() == descriptor => {
                Ok(Self::Enum(value))
            }
            (TypeDescriptor::Enum(descriptor), Self::I32(raw)) => descriptor
                .by_value(raw)
                .map(Self::Enum)
                .ok_or_else(|| mismatch(&Self::I32(raw))),
            (TypeDescriptor::List { item, .. }, Self::List(items)) => {
                let item_ty = item.get();
                let mut items = items
                    .into_iter()
                    .map(|v| v.conform(item_ty, item_ty.ordering()))
                    .collect::<Result<Vec<_>, _>>()?;
                if ordering == ContainerOrdering::Sorted {
                    items.sort();
                }
                Ok(Self::List(items))
            }
            (TypeDescriptor::Set { item, .. }, Self::Set(set)) => {
                let item_ty = item.get();
                let items = set
                    .into_items()
                    .into_iter()
                    .map(|v| v.conform(item_ty, item_ty.ordering()))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Self::Set(SetValue::from_items(ordering, items)))
            }
            (TypeDescriptor::Map { key, value, .. }, Self::Map(map)) => {
                let (key_ty, value_ty) = (key.get(), value.get());
                let entries = map
                    .into_entries()
                    .into_iter()
                    .map(|(k, v)| {
                        Ok((
                            k.conform(key_ty, key_ty.ordering())?,
                            v.conform(value_ty, value_ty.ordering())?,
                        ))
                    })
                    .collect::<Result<Vec<_>, Mismatch>>()?;
                Ok(Self::Map(MapValue::from_entries(ordering, entries)))
            }
            (TypeDescriptor::Message(descriptor), Self::Message(message))
                if message.descriptor() == descriptor =>
            {
                Ok(Self::Message(message))
            }
            (_, value) => Err(mismatch(&value)),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Byte(a), Self::Byte(b)) => a == b,
            (Self::I16(a), Self::I16(b)) => a == b,
            (Self::I32(a), Self::I32(b)) => a == b,
            (Self::I64(a), Self::I64(b)) => a == b,
            // Bitwise, so NaN equals itself and values stay hashable.
            (Self::Double(a), Self::Double(b)) => a.to_bits() == b.to_bits(),
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Binary(a), Self::Binary(b)) => a == b,
            (Self::Enum(a), Self::Enum(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Set(a), Self::Set(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            (Self::Message(a), Self::Message(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Self::Bool(v) => v.hash(state),
            Self::Byte(v) => v.hash(state),
            Self::I16(v) => v.hash(state),
            Self::I32(v) => v.hash(state),
            Self::I64(v) => v.hash(state),
            Self::Double(v) => v.to_bits().hash(state),
            Self::String(v) => v.hash(state),
            Self::Binary(v) => v.hash(state),
            Self::Enum(v) => v.hash(state),
            Self::List(v) => v.hash(state),
            Self::Set(v) => v.hash(state),
            Self::Map(v) => v.hash(state),
            Self::Message(v) => state.write_u64(v.hash_code()),
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    /// Numbers numerically, strings and binaries lexicographically, messages
    /// recursively. Containers compare by content hash first, which is total
    /// and consistent with equality but not a meaningful content order.
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Byte(a), Self::Byte(b)) => a.cmp(b),
            (Self::I16(a), Self::I16(b)) => a.cmp(b),
            (Self::I32(a), Self::I32(b)) => a.cmp(b),
            (Self::I64(a), Self::I64(b)) => a.cmp(b),
            (Self::Double(a), Self::Double(b)) => a.total_cmp(b),
            (Self::String(a), Self::String(b)) => a.cmp(b),
            (Self::Binary(a), Self::Binary(b)) => a.cmp(b),
            (Self::Enum(a), Self::Enum(b)) => a.cmp(b),
            (Self::List(a), Self::List(b)) => compare_by_hash(a, b, a.iter(), b.iter()),
            (Self::Set(a), Self::Set(b)) => a.cmp(b),
            (Self::Map(a), Self::Map(b)) => a.cmp(b),
            (Self::Message(a), Self::Message(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Byte(v) => write!(f, "{v}"),
            Self::I16(v) => write!(f, "{v}"),
            Self::I32(v) => write!(f, "{v}"),
            Self::I64(v) => write!(f, "{v}"),
            Self::Double(v) => write!(f, "{v}"),
            Self::String(v) => write!(f, "{v:?}"),
            Self::Binary(v) => {
                f.write_str("[")?;
                for byte in v {
                    write!(f, "{byte:02x}")?;
                }
                f.write_str("]")
            }
            Self::Enum(v) => write!(f, "{v}"),
            Self::List(items) => write_items(f, "[", "]", items.iter()),
            Self::Set(set) => write_items(f, "{", "}", set.iter()),
            Self::Map(map) => {
                f.write_str("{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{key}:{value}")?;
                }
                f.write_str("}")
            }
            Self::Message(m) => write!(f, "{m}"),
        }
    }
}

fn write_items<'a>(
    f: &mut fmt::Formatter<'_>,
    open: &str,
    close: &str,
    items: impl Iterator<Item = &'a Value>,
) -> fmt::Result {
    f.write_str(open)?;
    for (i, item) in items.enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        write!(f, "{item}")?;
    }
    f.write_str(close)
}

macro_rules! impl_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Self::$variant(v)
                }
            }
        )*
    };
}

impl_from! {
    bool => Bool,
    i8 => Byte,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    f64 => Double,
    String => String,
    EnumValue => Enum,
    SetValue => Set,
    MapValue => Map,
    Message => Message,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Self::Binary(v.to_vec())
    }
}
