// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Binary wire codec
//!
//! Big-endian, field-tagged and self-describing, so a reader can skip
//! anything it does not know:
//!
//! | Element | Layout |
//! |---|---|
//! | field header | `wire_type:u8 field_id:i16` |
//! | struct / exception | field entries, then a `0` stop byte |
//! | union | exactly one field entry, or a lone `0` when nothing is active |
//! | bool / byte | 1 byte |
//! | i16 / i32 / i64 / double | 2 / 4 / 8 / 8 bytes |
//! | string / binary | `len:u32` then the bytes (UTF-8 for strings) |
//! | enum | its `i32` value |
//! | list / set | `item_type:u8 count:u32` then the items |
//! | map | `key_type:u8 value_type:u8 count:u32` then key, value pairs |
//!
//! # Example
//!
//! ```rust
//! use typewire::binary::{decode_message, encode_message};
//! use typewire::descriptor::{MessageDescriptor, PrimitiveKind};
//! use typewire::runtime::MessageBuilder;
//!
//! let desc = MessageDescriptor::builder("demo", "Ping")
//!     .required(1, "seq", PrimitiveKind::I64)
//!     .build()
//!     .unwrap();
//!
//! let mut builder = MessageBuilder::new(desc.clone());
//! builder.set(1, 7i64).unwrap();
//! let ping = builder.build().unwrap();
//!
//! let bytes = encode_message(&ping).unwrap();
//! assert_eq!(bytes, [10, 0, 1, 0, 0, 0, 0, 0, 0, 0, 7, 0]);
//! assert_eq!(decode_message(&bytes, &desc).unwrap(), ping);
//! ```

mod reader;
mod wire;
mod writer;

pub use reader::BinaryReader;
pub use wire::{WireType, STOP};
pub use writer::BinaryWriter;

use crate::config::CodecConfig;
use crate::descriptor::MessageDescriptor;
use crate::error::{DecodeError, EncodeError};
use crate::runtime::{Message, MessageBuilder};
use std::io::{Read, Write};

/// Binary serializer bound to a codec configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BinarySerializer {
    config: CodecConfig,
}

impl BinarySerializer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CodecConfig) -> Self {
        Self { config }
    }

    /// Serializer that does not validate required fields on decode.
    pub fn lenient() -> Self {
        Self::with_config(CodecConfig::lenient())
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Write `message` to `sink`, returning the number of bytes written.
    pub fn serialize<W: Write>(&self, sink: W, message: &Message) -> Result<usize, EncodeError> {
        let mut writer = BinaryWriter::new(sink);
        let written = writer.write_message(message)?;
        writer.flush()?;
        Ok(written)
    }

    /// Read one message of type `descriptor` from `source`.
    pub fn deserialize<R: Read>(
        &self,
        source: R,
        descriptor: &MessageDescriptor,
    ) -> Result<Message, DecodeError> {
        BinaryReader::with_config(source, self.config).read_message(descriptor)
    }

    /// Read one message's fields into `builder` without validating.
    pub fn deserialize_into<R: Read>(
        &self,
        source: R,
        builder: &mut MessageBuilder,
    ) -> Result<(), DecodeError> {
        BinaryReader::with_config(source, self.config).read_into(builder)
    }

    pub fn to_vec(&self, message: &Message) -> Result<Vec<u8>, EncodeError> {
        let mut bytes = Vec::new();
        self.serialize(&mut bytes, message)?;
        Ok(bytes)
    }

    pub fn from_slice(
        &self,
        bytes: &[u8],
        descriptor: &MessageDescriptor,
    ) -> Result<Message, DecodeError> {
        self.deserialize(bytes, descriptor)
    }
}

/// Encode with the default configuration.
pub fn encode_message(message: &Message) -> Result<Vec<u8>, EncodeError> {
    BinarySerializer::new().to_vec(message)
}

/// Decode with the default (strict) configuration.
pub fn decode_message(bytes: &[u8], descriptor: &MessageDescriptor) -> Result<Message, DecodeError> {
    BinarySerializer::new().from_slice(bytes, descriptor)
}
