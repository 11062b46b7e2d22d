// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Wire type tags.

use crate::descriptor::{PrimitiveKind, TypeDescriptor};
use std::fmt;

/// Terminates the field list of a struct or exception.
pub const STOP: u8 = 0;

/// On-the-wire tag identifying how a payload is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum WireType {
    Bool = 2,
    Byte = 3,
    Double = 4,
    I16 = 6,
    I32 = 8,
    I64 = 10,
    /// Length-prefixed bytes: strings and binaries.
    Binary = 11,
    Struct = 12,
    Map = 13,
    Set = 14,
    List = 15,
    /// Exactly one field entry, or a lone stop marker.
    Union = 16,
}

impl WireType {
    /// Wire type used for values of `ty`. Enums travel as their `i32` value.
    pub fn for_type(ty: &TypeDescriptor) -> Self {
        match ty {
            TypeDescriptor::Primitive(kind) => match kind {
                PrimitiveKind::Bool => Self::Bool,
                PrimitiveKind::Byte => Self::Byte,
                PrimitiveKind::I16 => Self::I16,
                PrimitiveKind::I32 => Self::I32,
                PrimitiveKind::I64 => Self::I64,
                PrimitiveKind::Double => Self::Double,
                PrimitiveKind::String | PrimitiveKind::Binary => Self::Binary,
            },
            TypeDescriptor::Enum(_) => Self::I32,
            TypeDescriptor::List { .. } => Self::List,
            TypeDescriptor::Set { .. } => Self::Set,
            TypeDescriptor::Map { .. } => Self::Map,
            TypeDescriptor::Message(descriptor) if descriptor.is_union() => Self::Union,
            TypeDescriptor::Message(_) => Self::Struct,
        }
    }

    /// Payload size for fixed-width types.
    pub fn fixed_size(self) -> Option<u64> {
        match self {
            Self::Bool | Self::Byte => Some(1),
            Self::I16 => Some(2),
            Self::I32 => Some(4),
            Self::I64 | Self::Double => Some(8),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Byte => "byte",
            Self::Double => "double",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::Binary => "binary",
            Self::Struct => "struct",
            Self::Map => "map",
            Self::Set => "set",
            Self::List => "list",
            Self::Union => "union",
        }
    }
}

impl TryFrom<u8> for WireType {
    type Error = u8;

    fn try_from(tag: u8) -> Result<Self, u8> {
        Ok(match tag {
            2 => Self::Bool,
            3 => Self::Byte,
            4 => Self::Double,
            6 => Self::I16,
            8 => Self::I32,
            10 => Self::I64,
            11 => Self::Binary,
            12 => Self::Struct,
            13 => Self::Map,
            14 => Self::Set,
            15 => Self::List,
            16 => Self::Union,
            other => return Err(other),
        })
    }
}

impl fmt::Display for WireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{EnumDescriptor, MessageDescriptor};

    #[test]
    fn test_tag_roundtrip() {
        for tag in 0..=u8::MAX {
            if let Ok(wire) = WireType::try_from(tag) {
                assert_eq!(wire as u8, tag);
            }
        }
        assert_eq!(WireType::try_from(STOP), Err(STOP));
        assert_eq!(WireType::try_from(5), Err(5));
        assert_eq!(WireType::try_from(17), Err(17));
    }

    #[test]
    fn test_for_type() {
        assert_eq!(
            WireType::for_type(&PrimitiveKind::String.into()),
            WireType::Binary
        );
        let color = EnumDescriptor::builder("p", "Color")
            .value("RED")
            .build()
            .expect("valid enum");
        assert_eq!(WireType::for_type(&color.into()), WireType::I32);

        let union = MessageDescriptor::union("p", "U")
            .build()
            .expect("valid union");
        assert_eq!(WireType::for_type(&union.into()), WireType::Union);
        assert_eq!(
            WireType::for_type(&TypeDescriptor::map(PrimitiveKind::I32, PrimitiveKind::I32)),
            WireType::Map
        );
    }
}
