// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Generic message runtime
//!
//! Schema-typed values without generated code: every struct, union and
//! exception instance is a [`Message`] driven by its
//! [`MessageDescriptor`](crate::descriptor::MessageDescriptor), and every
//! field value is a [`Value`].
//!
//! # Features
//!
//! - **Value**: closed tagged union over primitives, enums, containers and messages
//! - **Message**: immutable, cheap to clone, structural equality/ordering/hash
//! - **MessageBuilder**: set/clear/add/put/merge/validate/build with nested builders
//! - **EnumValue**: enum values resolved by integer or by name
//!
//! # Example
//!
//! ```rust
//! use typewire::descriptor::{MessageDescriptor, PrimitiveKind, TypeDescriptor};
//! use typewire::runtime::{MessageBuilder, Value};
//!
//! let desc = MessageDescriptor::builder("inv", "Item")
//!     .required(1, "sku", PrimitiveKind::String)
//!     .optional(2, "tags", TypeDescriptor::list(PrimitiveKind::String))
//!     .build()
//!     .unwrap();
//!
//! let mut builder = MessageBuilder::new(desc);
//! builder.set(1, "A-100").unwrap();
//! builder.add_to(2, "fragile").unwrap();
//! let item = builder.build().unwrap();
//!
//! assert_eq!(item.get(1), Some(&Value::from("A-100")));
//! assert_eq!(item.size(2), 1);
//! assert_eq!(item.to_string(), r#"inv.Item{sku:"A-100",tags:["fragile"]}"#);
//! ```

mod bits;
mod builder;
mod container;
mod enum_value;
pub mod hash;
mod message;
mod value;

pub use bits::FieldBits;
pub use builder::MessageBuilder;
pub use container::{MapValue, SetValue};
pub use enum_value::{EnumValue, EnumValueBuilder};
pub use message::Message;
pub use value::Value;
