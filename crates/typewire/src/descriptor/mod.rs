// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schema descriptors.
//!
//! Descriptors are immutable once built and cheap to clone (every handle is
//! reference counted), so they can be shared across threads and handed to
//! every builder, message and codec call that needs them.
//!
//! # Example
//!
//! ```rust
//! use typewire::descriptor::{EnumDescriptor, MessageDescriptor, PrimitiveKind, TypeDescriptor};
//!
//! let operator = EnumDescriptor::builder("calc", "Operator")
//!     .value_with("ADD", 1)
//!     .value_with("MULTIPLY", 2)
//!     .build()
//!     .unwrap();
//!
//! let operation = MessageDescriptor::builder("calc", "Operation")
//!     .required(1, "operator", operator)
//!     .optional(2, "operands", TypeDescriptor::list(PrimitiveKind::Double))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(operation.qualified_name(), "calc.Operation");
//! assert_eq!(operation.fields()[1].field_type().name(), "list<double>");
//! ```

mod builder;
mod enums;
mod message;
mod registry;
mod types;

pub use builder::{EnumDescriptorBuilder, MessageDescriptorBuilder};
pub use enums::{EnumDescriptor, EnumEntry};
pub use message::{
    DefaultValue, FieldDescriptor, MessageDescriptor, MessageVariant, Requirement,
    MAX_COMPACT_FIELDS,
};
pub use registry::TypeRegistry;
pub use types::{ContainerOrdering, FieldId, PrimitiveKind, TypeDescriptor, TypeRef};

pub(crate) fn qualify(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        name.to_string()
    } else {
        format!("{namespace}.{name}")
    }
}
