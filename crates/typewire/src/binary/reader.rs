// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Binary decoder.
//!
//! Fields are decoded into a [`MessageBuilder`]. Unknown field ids and
//! fields whose wire type does not match the declared type are skipped using
//! only the self-describing wire layout; required-field validation happens
//! once, when the top-level builder is built.

use super::wire::{WireType, STOP};
use crate::config::{CodecConfig, MAX_PREALLOC_ITEMS};
use crate::descriptor::{ContainerOrdering, MessageDescriptor, PrimitiveKind, TypeDescriptor};
use crate::error::DecodeError;
use crate::runtime::{MapValue, Message, MessageBuilder, SetValue, Value};
use byteorder::{BigEndian, ReadBytesExt};
use std::io::{self, Read};

/// Reads messages from a byte source, guided by their descriptors.
#[derive(Debug)]
pub struct BinaryReader<R: Read> {
    source: R,
    config: CodecConfig,
}

impl<R: Read> BinaryReader<R> {
    pub fn new(source: R) -> Self {
        Self::with_config(source, CodecConfig::default())
    }

    pub fn with_config(source: R, config: CodecConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    pub fn into_inner(self) -> R {
        self.source
    }

    /// Read one message of the given type.
    ///
    /// In strict mode the decoded builder is validated; a missing required
    /// field fails here, after the whole message was consumed.
    pub fn read_message(&mut self, descriptor: &MessageDescriptor) -> Result<Message, DecodeError> {
        log::trace!("[binary] decoding {}", descriptor.qualified_name());
        let mut builder = MessageBuilder::new(descriptor.clone());
        self.read_fields(&mut builder, 0)?;
        self.finish(&builder)
    }

    /// Read one message's fields into an existing builder, replacing the
    /// fields present on the wire. Does not validate.
    pub fn read_into(&mut self, builder: &mut MessageBuilder) -> Result<(), DecodeError> {
        log::trace!(
            "[binary] decoding into {}",
            builder.descriptor().qualified_name()
        );
        self.read_fields(builder, 0)
    }

    /// Skip one encoded struct without knowing its type.
    pub fn skip_message(&mut self) -> Result<(), DecodeError> {
        self.skip(WireType::Struct, 0)
    }

    fn finish(&self, builder: &MessageBuilder) -> Result<Message, DecodeError> {
        if self.config.strict {
            Ok(builder.build()?)
        } else {
            Ok(builder.build_partial())
        }
    }

    fn enter(&self, depth: usize) -> Result<usize, DecodeError> {
        if depth >= self.config.max_depth {
            return Err(DecodeError::DepthExceeded {
                limit: self.config.max_depth,
            });
        }
        Ok(depth + 1)
    }

    fn read_fields(&mut self, builder: &mut MessageBuilder, depth: usize) -> Result<(), DecodeError> {
        let depth = self.enter(depth)?;
        let descriptor = builder.descriptor().clone();
        loop {
            let tag = self.read_u8("field header")?;
            if tag == STOP {
                break;
            }
            let wire = wire_type(tag, "field header")?;
            let id = self
                .source
                .read_i16::<BigEndian>()
                .map_err(|e| DecodeError::io(e, "field id"))?;

            match descriptor.index_of(id) {
                Some(index) => {
                    let field = descriptor.field_at(index);
                    let ty = field.field_type();
                    if WireType::for_type(ty) != wire {
                        log::debug!(
                            "[binary] skipping {}.{}: wire type {} does not match {}",
                            descriptor.qualified_name(),
                            field.name(),
                            wire,
                            ty
                        );
                        self.skip(wire, depth)?;
                    } else if let TypeDescriptor::Message(child) = ty {
                        let mut child_builder = MessageBuilder::new(child.clone());
                        self.read_fields(&mut child_builder, depth)?;
                        builder.set_builder_at(index, child_builder);
                    } else if let Some(value) = self.read_value(ty, field.ordering(), depth)? {
                        builder.set_value_at(index, value);
                    } else {
                        log::debug!(
                            "[binary] dropping {}.{}: value not representable",
                            descriptor.qualified_name(),
                            field.name()
                        );
                    }
                }
                None => {
                    log::debug!(
                        "[binary] skipping unknown field {} ({}) in {}",
                        id,
                        wire,
                        descriptor.qualified_name()
                    );
                    self.skip(wire, depth)?;
                }
            }

            // A union holds exactly one entry and has no stop marker after it.
            if descriptor.is_union() {
                break;
            }
        }
        Ok(())
    }

    /// Decode a non-field value. `None` means the payload was consumed but
    /// cannot be represented (undeclared enum value, mismatched item types).
    fn read_value(
        &mut self,
        ty: &TypeDescriptor,
        ordering: ContainerOrdering,
        depth: usize,
    ) -> Result<Option<Value>, DecodeError> {
        let value = match ty {
            TypeDescriptor::Primitive(kind) => self.read_primitive(*kind)?,
            TypeDescriptor::Enum(descriptor) => {
                let raw = self.read_i32()?;
                match descriptor.by_value(raw) {
                    Some(value) => Value::Enum(value),
                    None => {
                        log::debug!(
                            "[binary] undeclared value {} for enum {}",
                            raw,
                            descriptor.qualified_name()
                        );
                        return Ok(None);
                    }
                }
            }
            TypeDescriptor::List { item, .. } => {
                let depth = self.enter(depth)?;
                let item = item.get();
                let Some(mut items) = self.read_items(item, depth)? else {
                    return Ok(None);
                };
                if ordering == ContainerOrdering::Sorted {
                    items.sort();
                }
                Value::List(items)
            }
            TypeDescriptor::Set { item, .. } => {
                let depth = self.enter(depth)?;
                let Some(items) = self.read_items(item.get(), depth)? else {
                    return Ok(None);
                };
                Value::Set(SetValue::from_items(ordering, items))
            }
            TypeDescriptor::Map { key, value, .. } => {
                let depth = self.enter(depth)?;
                let (key_ty, value_ty) = (key.get(), value.get());
                let key_tag = self.read_u8("map key type")?;
                let value_tag = self.read_u8("map value type")?;
                let count = self.read_len(self.config.max_collection_len, "map size")?;
                if count == 0 {
                    return Ok(Some(Value::Map(MapValue::new(ordering))));
                }
                let key_wire = wire_type(key_tag, "map key type")?;
                let value_wire = wire_type(value_tag, "map value type")?;
                if key_wire != WireType::for_type(key_ty) || value_wire != WireType::for_type(value_ty) {
                    log::debug!(
                        "[binary] skipping map<{},{}> for {}",
                        key_wire,
                        value_wire,
                        ty
                    );
                    for _ in 0..count {
                        self.skip(key_wire, depth)?;
                        self.skip(value_wire, depth)?;
                    }
                    return Ok(None);
                }
                let mut entries = Vec::with_capacity((count as usize).min(MAX_PREALLOC_ITEMS));
                for _ in 0..count {
                    let key = self.read_item(key_ty, depth)?;
                    let value = self.read_item(value_ty, depth)?;
                    if let (Some(key), Some(value)) = (key, value) {
                        entries.push((key, value));
                    }
                }
                Value::Map(MapValue::from_entries(ordering, entries))
            }
            TypeDescriptor::Message(descriptor) => {
                let mut builder = MessageBuilder::new(descriptor.clone());
                self.read_fields(&mut builder, depth)?;
                Value::Message(self.finish(&builder)?)
            }
        };
        Ok(Some(value))
    }

    fn read_item(&mut self, ty: &TypeDescriptor, depth: usize) -> Result<Option<Value>, DecodeError> {
        self.read_value(ty, ty.ordering(), depth)
    }

    /// Items of a list or set, after its header.
    fn read_items(&mut self, item: &TypeDescriptor, depth: usize) -> Result<Option<Vec<Value>>, DecodeError> {
        let tag = self.read_u8("collection item type")?;
        let count = self.read_len(self.config.max_collection_len, "collection size")?;
        if count == 0 {
            return Ok(Some(Vec::new()));
        }
        let wire = wire_type(tag, "collection item type")?;
        if wire != WireType::for_type(item) {
            log::debug!("[binary] skipping collection of {} (expected {})", wire, item);
            for _ in 0..count {
                self.skip(wire, depth)?;
            }
            return Ok(None);
        }
        let mut items = Vec::with_capacity((count as usize).min(MAX_PREALLOC_ITEMS));
        for _ in 0..count {
            if let Some(value) = self.read_item(item, depth)? {
                items.push(value);
            }
        }
        Ok(Some(items))
    }

    fn read_primitive(&mut self, kind: PrimitiveKind) -> Result<Value, DecodeError> {
        Ok(match kind {
            PrimitiveKind::Bool => Value::Bool(self.read_u8("bool")? != 0),
            PrimitiveKind::Byte => Value::Byte(
                self.source
                    .read_i8()
                    .map_err(|e| DecodeError::io(e, "byte"))?,
            ),
            PrimitiveKind::I16 => Value::I16(
                self.source
                    .read_i16::<BigEndian>()
                    .map_err(|e| DecodeError::io(e, "i16"))?,
            ),
            PrimitiveKind::I32 => Value::I32(self.read_i32()?),
            PrimitiveKind::I64 => Value::I64(
                self.source
                    .read_i64::<BigEndian>()
                    .map_err(|e| DecodeError::io(e, "i64"))?,
            ),
            PrimitiveKind::Double => Value::Double(
                self.source
                    .read_f64::<BigEndian>()
                    .map_err(|e| DecodeError::io(e, "double"))?,
            ),
            PrimitiveKind::String => Value::String(String::from_utf8(self.read_bytes("string")?)?),
            PrimitiveKind::Binary => Value::Binary(self.read_bytes("binary")?),
        })
    }

    fn read_u8(&mut self, context: &'static str) -> Result<u8, DecodeError> {
        self.source
            .read_u8()
            .map_err(|e| DecodeError::io(e, context))
    }

    fn read_i32(&mut self) -> Result<i32, DecodeError> {
        self.source
            .read_i32::<BigEndian>()
            .map_err(|e| DecodeError::io(e, "i32"))
    }

    fn read_len(&mut self, limit: u32, context: &'static str) -> Result<u32, DecodeError> {
        let len = self
            .source
            .read_u32::<BigEndian>()
            .map_err(|e| DecodeError::io(e, context))?;
        if len > limit {
            return Err(DecodeError::LengthExceeded { len, limit });
        }
        Ok(len)
    }

    fn read_bytes(&mut self, context: &'static str) -> Result<Vec<u8>, DecodeError> {
        let len = self.read_len(self.config.max_binary_len, context)?;
        // Grow with the data actually present instead of trusting the prefix.
        let mut buf = Vec::with_capacity((len as usize).min(MAX_PREALLOC_ITEMS));
        (&mut self.source)
            .take(u64::from(len))
            .read_to_end(&mut buf)
            .map_err(|e| DecodeError::io(e, context))?;
        if buf.len() < len as usize {
            return Err(DecodeError::Truncated { context });
        }
        Ok(buf)
    }

    fn skip_bytes(&mut self, n: u64, context: &'static str) -> Result<(), DecodeError> {
        let copied = io::copy(&mut (&mut self.source).take(n), &mut io::sink())
            .map_err(|e| DecodeError::io(e, context))?;
        if copied < n {
            return Err(DecodeError::Truncated { context });
        }
        Ok(())
    }

    /// Skip one payload of the given wire type.
    fn skip(&mut self, wire: WireType, depth: usize) -> Result<(), DecodeError> {
        if let Some(size) = wire.fixed_size() {
            return self.skip_bytes(size, wire.name());
        }
        let depth = self.enter(depth)?;
        match wire {
            WireType::Binary => {
                let len = self.read_len(self.config.max_binary_len, "binary")?;
                self.skip_bytes(u64::from(len), "binary")
            }
            WireType::Struct => loop {
                let tag = self.read_u8("field header")?;
                if tag == STOP {
                    return Ok(());
                }
                let field_wire = wire_type(tag, "field header")?;
                self.skip_bytes(2, "field id")?;
                self.skip(field_wire, depth)?;
            },
            WireType::Union => {
                let tag = self.read_u8("field header")?;
                if tag == STOP {
                    return Ok(());
                }
                let field_wire = wire_type(tag, "field header")?;
                self.skip_bytes(2, "field id")?;
                self.skip(field_wire, depth)
            }
            WireType::List | WireType::Set => {
                let tag = self.read_u8("collection item type")?;
                let count = self.read_len(self.config.max_collection_len, "collection size")?;
                if count == 0 {
                    return Ok(());
                }
                let item = wire_type(tag, "collection item type")?;
                (0..count).try_for_each(|_| self.skip(item, depth))
            }
            WireType::Map => {
                let key_tag = self.read_u8("map key type")?;
                let value_tag = self.read_u8("map value type")?;
                let count = self.read_len(self.config.max_collection_len, "map size")?;
                if count == 0 {
                    return Ok(());
                }
                let key = wire_type(key_tag, "map key type")?;
                let value = wire_type(value_tag, "map value type")?;
                (0..count).try_for_each(|_| {
                    self.skip(key, depth)?;
                    self.skip(value, depth)
                })
            }
            WireType::Bool
            | WireType::Byte
            | WireType::Double
            | WireType::I16
            | WireType::I32
            | WireType::I64 => unreachable!("fixed-size wire types are skipped above"),
        }
    }
}

fn wire_type(tag: u8, context: &'static str) -> Result<WireType, DecodeError> {
    WireType::try_from(tag).map_err(|tag| DecodeError::InvalidWireType { tag, context })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::MessageDescriptor;

    fn pair() -> MessageDescriptor {
        MessageDescriptor::builder("t", "Pair")
            .required(1, "a", PrimitiveKind::I32)
            .optional(2, "b", PrimitiveKind::String)
            .build()
            .expect("valid descriptor")
    }

    #[test]
    fn test_read_struct() {
        let bytes = [8, 0, 1, 0, 0, 0, 7, 11, 0, 2, 0, 0, 0, 1, b'x', 0];
        let mut reader = BinaryReader::new(&bytes[..]);
        let message = reader.read_message(&pair()).expect("decode");
        assert_eq!(message.get(1), Some(&Value::I32(7)));
        assert_eq!(message.get(2), Some(&Value::from("x")));
    }

    #[test]
    fn test_unknown_field_is_skipped() {
        // Field 9 is a list<i16> the reader does not know about.
        let bytes = [
            15, 0, 9, 6, 0, 0, 0, 2, 0, 1, 0, 2, // list<i16> [1, 2]
            8, 0, 1, 0, 0, 0, 3, // a = 3
            0,
        ];
        let message = BinaryReader::new(&bytes[..])
            .read_message(&pair())
            .expect("decode");
        assert_eq!(message.get(1), Some(&Value::I32(3)));
        assert_eq!(message.present_count(), 1);
    }

    #[test]
    fn test_mismatched_wire_type_is_skipped() {
        // Field 2 arrives as i32 instead of string.
        let bytes = [8, 0, 1, 0, 0, 0, 1, 8, 0, 2, 0, 0, 0, 9, 0];
        let message = BinaryReader::new(&bytes[..])
            .read_message(&pair())
            .expect("decode");
        assert!(!message.has(2));
    }

    #[test]
    fn test_missing_required_fails_after_decode() {
        let bytes = [11, 0, 2, 0, 0, 0, 0, 0];
        let err = BinaryReader::new(&bytes[..])
            .read_message(&pair())
            .expect_err("a is required");
        assert_eq!(
            err.to_string(),
            "Missing required fields a in message t.Pair"
        );

        let lenient = BinaryReader::with_config(&bytes[..], CodecConfig::lenient())
            .read_message(&pair())
            .expect("lenient decode");
        assert!(!lenient.has(1));
    }

    #[test]
    fn test_truncated_input() {
        let bytes = [8, 0, 1, 0, 0];
        let err = BinaryReader::new(&bytes[..])
            .read_message(&pair())
            .expect_err("truncated");
        assert!(matches!(err, DecodeError::Truncated { context: "i32" }));
    }

    #[test]
    fn test_invalid_wire_type() {
        let bytes = [99, 0, 1];
        let err = BinaryReader::new(&bytes[..])
            .read_message(&pair())
            .expect_err("invalid tag");
        assert!(matches!(err, DecodeError::InvalidWireType { tag: 99, .. }));
    }

    #[test]
    fn test_invalid_utf8() {
        let bytes = [8, 0, 1, 0, 0, 0, 1, 11, 0, 2, 0, 0, 0, 2, 0xff, 0xfe, 0];
        let err = BinaryReader::new(&bytes[..])
            .read_message(&pair())
            .expect_err("invalid utf-8");
        assert!(matches!(err, DecodeError::InvalidUtf8(_)));
    }

    #[test]
    fn test_length_limits() {
        let bytes = [8, 0, 1, 0, 0, 0, 1, 11, 0, 2, 0, 0, 1, 0, 0];
        let config = CodecConfig::default().with_max_binary_len(16);
        let err = BinaryReader::with_config(&bytes[..], config)
            .read_message(&pair())
            .expect_err("too long");
        assert!(matches!(err, DecodeError::LengthExceeded { len: 256, limit: 16 }));
    }

    #[test]
    fn test_huge_declared_length_is_truncation_not_allocation() {
        let bytes = [11, 0, 2, 0x03, 0xff, 0xff, 0xff, b'x'];
        let err = BinaryReader::new(&bytes[..])
            .read_message(&pair())
            .expect_err("truncated");
        assert!(matches!(err, DecodeError::Truncated { context: "string" }));
    }

    #[test]
    fn test_depth_limit() {
        // Nested lists of lists, deeper than allowed.
        let mut bytes = vec![15, 0, 9];
        for _ in 0..8 {
            bytes.extend_from_slice(&[15, 0, 0, 0, 1]);
        }
        let config = CodecConfig::default().with_max_depth(4);
        let err = BinaryReader::with_config(&bytes[..], config)
            .read_message(&pair())
            .expect_err("too deep");
        assert!(matches!(err, DecodeError::DepthExceeded { limit: 4 }));
    }

    #[test]
    fn test_skip_message() {
        let bytes = [
            12, 0, 1, 8, 0, 1, 0, 0, 0, 1, 0, // nested struct
            13, 0, 2, 11, 3, 0, 0, 0, 1, 0, 0, 0, 1, b'k', 9, // map<string,byte>
            16, 0, 3, 2, 0, 1, 1, // union with a bool entry
            0, 0xaa,
        ];
        let mut reader = BinaryReader::new(&bytes[..]);
        reader.skip_message().expect("skip");
        assert_eq!(reader.into_inner(), [0xaa]);
    }
}
