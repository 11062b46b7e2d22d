// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Binary encoder.

use super::wire::{WireType, STOP};
use crate::descriptor::{FieldId, PrimitiveKind, TypeDescriptor};
use crate::error::EncodeError;
use crate::runtime::{Message, Value};
use byteorder::{BigEndian, WriteBytesExt};
use std::io::Write;

/// Writes messages to a byte sink, guided by their descriptors.
#[derive(Debug)]
pub struct BinaryWriter<W: Write> {
    sink: W,
    written: usize,
}

impl<W: Write> BinaryWriter<W> {
    pub fn new(sink: W) -> Self {
        Self { sink, written: 0 }
    }

    /// Total bytes written so far.
    pub fn bytes_written(&self) -> usize {
        self.written
    }

    pub fn get_ref(&self) -> &W {
        &self.sink
    }

    pub fn into_inner(self) -> W {
        self.sink
    }

    /// Write one message; returns the bytes it took.
    pub fn write_message(&mut self, message: &Message) -> Result<usize, EncodeError> {
        let start = self.written;
        log::trace!(
            "[binary] encoding {}",
            message.descriptor().qualified_name()
        );
        self.write_body(message)?;
        Ok(self.written - start)
    }

    pub fn flush(&mut self) -> Result<(), EncodeError> {
        self.sink.flush()?;
        Ok(())
    }

    fn write_body(&mut self, message: &Message) -> Result<(), EncodeError> {
        let union = message.descriptor().is_union();
        let mut entries = 0;
        for (field, value) in message.present_fields() {
            let ty = field.field_type();
            self.write_field_header(WireType::for_type(ty), field.id())?;
            self.write_value(value, ty)?;
            entries += 1;
        }
        // A union with an entry is self-delimited; everything else ends with STOP.
        if !union || entries == 0 {
            self.write_u8(STOP)?;
        }
        Ok(())
    }

    fn write_field_header(&mut self, wire: WireType, id: FieldId) -> Result<(), EncodeError> {
        self.write_u8(wire as u8)?;
        self.sink.write_i16::<BigEndian>(id)?;
        self.written += 2;
        Ok(())
    }

    fn write_value(&mut self, value: &Value, ty: &TypeDescriptor) -> Result<(), EncodeError> {
        match (ty, value) {
            (TypeDescriptor::Primitive(PrimitiveKind::Bool), Value::Bool(v)) => {
                self.write_u8(u8::from(*v))
            }
            (TypeDescriptor::Primitive(PrimitiveKind::Byte), Value::Byte(v)) => {
                self.sink.write_i8(*v)?;
                self.written += 1;
                Ok(())
            }
            (TypeDescriptor::Primitive(PrimitiveKind::I16), Value::I16(v)) => {
                self.sink.write_i16::<BigEndian>(*v)?;
                self.written += 2;
                Ok(())
            }
            (TypeDescriptor::Primitive(PrimitiveKind::I32), Value::I32(v)) => self.write_i32(*v),
            (TypeDescriptor::Primitive(PrimitiveKind::I64), Value::I64(v)) => {
                self.sink.write_i64::<BigEndian>(*v)?;
                self.written += 8;
                Ok(())
            }
            (TypeDescriptor::Primitive(PrimitiveKind::Double), Value::Double(v)) => {
                self.sink.write_f64::<BigEndian>(*v)?;
                self.written += 8;
                Ok(())
            }
            (TypeDescriptor::Primitive(PrimitiveKind::String), Value::String(v)) => {
                self.write_bytes(v.as_bytes())
            }
            (TypeDescriptor::Primitive(PrimitiveKind::Binary), Value::Binary(v)) => {
                self.write_bytes(v)
            }
            (TypeDescriptor::Enum(_), Value::Enum(v)) => self.write_i32(v.value()),
            (TypeDescriptor::List { item, .. }, Value::List(items)) => {
                let item = item.get();
                self.write_collection_header(item, items.len())?;
                items.iter().try_for_each(|v| self.write_value(v, item))
            }
            (TypeDescriptor::Set { item, .. }, Value::Set(set)) => {
                let item = item.get();
                self.write_collection_header(item, set.len())?;
                set.iter().try_for_each(|v| self.write_value(v, item))
            }
            (TypeDescriptor::Map { key, value, .. }, Value::Map(map)) => {
                let (key, value_ty) = (key.get(), value.get());
                self.write_u8(WireType::for_type(key) as u8)?;
                self.write_u8(WireType::for_type(value_ty) as u8)?;
                self.write_len(map.len())?;
                for (k, v) in map.iter() {
                    self.write_value(k, key)?;
                    self.write_value(v, value_ty)?;
                }
                Ok(())
            }
            (TypeDescriptor::Message(_), Value::Message(message)) => self.write_body(message),
            (ty, value) => Err(EncodeError::InvalidValue {
                expected: ty.name(),
                got: value.type_name(),
            }),
        }
    }

    fn write_collection_header(&mut self, item: &TypeDescriptor, len: usize) -> Result<(), EncodeError> {
        self.write_u8(WireType::for_type(item) as u8)?;
        self.write_len(len)
    }

    fn write_len(&mut self, len: usize) -> Result<(), EncodeError> {
        let len = u32::try_from(len).map_err(|_| EncodeError::LengthOverflow { len })?;
        self.sink.write_u32::<BigEndian>(len)?;
        self.written += 4;
        Ok(())
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), EncodeError> {
        self.write_len(bytes.len())?;
        self.sink.write_all(bytes)?;
        self.written += bytes.len();
        Ok(())
    }

    fn write_u8(&mut self, v: u8) -> Result<(), EncodeError> {
        self.sink.write_u8(v)?;
        self.written += 1;
        Ok(())
    }

    fn write_i32(&mut self, v: i32) -> Result<(), EncodeError> {
        self.sink.write_i32::<BigEndian>(v)?;
        self.written += 4;
        Ok(())
    }
}
