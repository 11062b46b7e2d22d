// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # typewire
//!
//! Schema-driven serialization: descriptors describe structs, unions,
//! exceptions, enums and containers as data; a generic runtime holds and
//! manipulates instances of any of them without generated code; a binary
//! codec turns instances into bytes and back.
//!
//! ## Modules
//!
//! - [`descriptor`] - immutable type descriptors, builders and a named registry
//! - [`runtime`] - [`Value`], [`Message`], [`MessageBuilder`] and enum values
//! - [`binary`] - the binary wire codec
//! - [`config`] - codec limits and strictness
//! - [`error`] - error types
//!
//! ## Quick Start
//!
//! ```rust
//! use typewire::{BinarySerializer, MessageBuilder, MessageDescriptor, PrimitiveKind, TypeDescriptor};
//!
//! let desc = MessageDescriptor::builder("shop", "Order")
//!     .required(1, "id", PrimitiveKind::I64)
//!     .optional(2, "lines", TypeDescriptor::list(PrimitiveKind::String))
//!     .build()?;
//!
//! let mut builder = MessageBuilder::new(desc.clone());
//! builder.set(1, 1001i64)?;
//! builder.add_to(2, "2x coffee")?;
//! let order = builder.build()?;
//!
//! let serializer = BinarySerializer::new();
//! let bytes = serializer.to_vec(&order)?;
//! let decoded = serializer.from_slice(&bytes, &desc)?;
//! assert_eq!(decoded, order);
//! # Ok::<(), typewire::Error>(())
//! ```

pub mod binary;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod runtime;

pub use binary::{decode_message, encode_message, BinaryReader, BinarySerializer, BinaryWriter};
pub use config::CodecConfig;
pub use descriptor::{
    ContainerOrdering, EnumDescriptor, FieldDescriptor, FieldId, MessageDescriptor,
    MessageVariant, PrimitiveKind, Requirement, TypeDescriptor, TypeRegistry,
};
pub use error::{DecodeError, DescriptorError, EncodeError, Error, FieldError, Result, ValidationError};
pub use runtime::{EnumValue, Message, MessageBuilder, Value};
