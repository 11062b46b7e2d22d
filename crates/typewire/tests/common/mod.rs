// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Shared schema for integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use typewire::descriptor::{
    ContainerOrdering, EnumDescriptor, FieldDescriptor, MessageDescriptor, PrimitiveKind,
    TypeDescriptor, TypeRegistry,
};
use typewire::runtime::{MapValue, SetValue};
use typewire::{Message, MessageBuilder, Value};

pub const SEED: u64 = 0x7e57_c0de;

pub struct Schema {
    pub registry: Arc<TypeRegistry>,
    pub color: EnumDescriptor,
    pub point: MessageDescriptor,
    pub shape: MessageDescriptor,
    pub everything: MessageDescriptor,
    pub tree: MessageDescriptor,
}

pub fn schema() -> Schema {
    let registry = TypeRegistry::new();

    let color = EnumDescriptor::builder("test", "Color")
        .value_with("RED", 1)
        .value_with("GREEN", 3)
        .value_with("BLUE", 5)
        .build()
        .expect("valid Color");

    let point = MessageDescriptor::builder("test", "Point")
        .compact()
        .optional(1, "x", PrimitiveKind::I32)
        .optional(2, "y", PrimitiveKind::I32)
        .optional(3, "z", PrimitiveKind::I32)
        .build()
        .expect("valid Point");

    let shape = MessageDescriptor::union("test", "Shape")
        .optional(1, "circle", PrimitiveKind::Double)
        .optional(2, "label", PrimitiveKind::String)
        .optional(3, "corner", point.clone())
        .build()
        .expect("valid Shape");

    let everything = MessageDescriptor::builder("test", "Everything")
        .optional(1, "flag", PrimitiveKind::Bool)
        .optional(2, "tiny", PrimitiveKind::Byte)
        .optional(3, "short", PrimitiveKind::I16)
        .optional(4, "int", PrimitiveKind::I32)
        .optional(5, "long", PrimitiveKind::I64)
        .optional(6, "real", PrimitiveKind::Double)
        .optional(7, "text", PrimitiveKind::String)
        .optional(8, "blob", PrimitiveKind::Binary)
        .optional(9, "color", color.clone())
        .optional(10, "point", point.clone())
        .optional(11, "shape", shape.clone())
        .optional(12, "ints", TypeDescriptor::list(PrimitiveKind::I32))
        .optional(13, "names", TypeDescriptor::set(PrimitiveKind::String))
        .optional(14, "lookup", TypeDescriptor::map(PrimitiveKind::I32, PrimitiveKind::String))
        .optional(15, "points", TypeDescriptor::list(point.clone()))
        .field_descriptor(
            FieldDescriptor::new(16, "ordered_names", TypeDescriptor::set(PrimitiveKind::String))
                .optional()
                .with_ordering(ContainerOrdering::Ordered),
        )
        .optional(
            17,
            "colors_by_name",
            TypeDescriptor::map(PrimitiveKind::String, color.clone()),
        )
        .optional(
            18,
            "nested",
            TypeDescriptor::list(TypeDescriptor::list(PrimitiveKind::I64)),
        )
        .build()
        .expect("valid Everything");

    let tree = MessageDescriptor::builder("test", "Tree")
        .required(1, "value", PrimitiveKind::I32)
        .optional(
            2,
            "children",
            TypeDescriptor::list(registry.reference("test.Tree")),
        )
        .build()
        .expect("valid Tree");

    registry.register_enum(color.clone()).expect("register Color");
    registry.register_message(point.clone()).expect("register Point");
    registry.register_message(shape.clone()).expect("register Shape");
    registry
        .register_message(everything.clone())
        .expect("register Everything");
    registry.register_message(tree.clone()).expect("register Tree");
    registry.resolve_all().expect("all references resolve");

    Schema {
        registry,
        color,
        point,
        shape,
        everything,
        tree,
    }
}

fn random_string(rng: &mut fastrand::Rng) -> String {
    let len = rng.usize(..12);
    (0..len).map(|_| rng.alphanumeric()).collect()
}

pub fn random_point(schema: &Schema, rng: &mut fastrand::Rng) -> Message {
    let mut builder = MessageBuilder::new(schema.point.clone());
    for id in 1..=3 {
        if rng.bool() {
            builder.set(id, rng.i32(..)).expect("i32 field");
        }
    }
    builder.build().expect("point has no required fields")
}

pub fn random_shape(schema: &Schema, rng: &mut fastrand::Rng) -> Message {
    let mut builder = MessageBuilder::new(schema.shape.clone());
    match rng.u8(..3) {
        0 => builder.set(1, rng.f64() * 100.0),
        1 => builder.set(2, random_string(rng)),
        _ => builder.set(3, random_point(schema, rng)),
    }
    .expect("union field");
    builder.build().expect("one field active")
}

/// A message with every field present.
pub fn random_everything(schema: &Schema, rng: &mut fastrand::Rng) -> Message {
    let colors: Vec<_> = schema.color.values().collect();
    let mut builder = MessageBuilder::new(schema.everything.clone());
    builder
        .set(1, rng.bool())
        .and_then(|b| b.set(2, rng.i8(..)))
        .and_then(|b| b.set(3, rng.i16(..)))
        .and_then(|b| b.set(4, rng.i32(..)))
        .and_then(|b| b.set(5, rng.i64(..)))
        .and_then(|b| b.set(6, rng.f64() - 0.5))
        .and_then(|b| b.set(7, random_string(rng)))
        .and_then(|b| {
            let blob: Vec<u8> = (0..rng.usize(..16)).map(|_| rng.u8(..)).collect();
            b.set(8, Value::Binary(blob))
        })
        .and_then(|b| b.set(9, colors[rng.usize(..colors.len())].clone()))
        .and_then(|b| b.set(10, random_point(schema, rng)))
        .and_then(|b| b.set(11, random_shape(schema, rng)))
        .and_then(|b| b.set(12, Value::list((0..rng.usize(..8)).map(|_| rng.i32(..)))))
        .expect("scalar fields");

    let names = SetValue::from_items(
        ContainerOrdering::Default,
        (0..rng.usize(..6)).map(|_| Value::String(random_string(rng))),
    );
    builder.set(13, names).expect("names");

    let lookup = MapValue::from_entries(
        ContainerOrdering::Default,
        (0..rng.usize(..6)).map(|_| (Value::I32(rng.i32(..)), Value::String(random_string(rng)))),
    );
    builder.set(14, lookup).expect("lookup");

    builder
        .set(15, Value::list((0..rng.usize(..4)).map(|_| random_point(schema, rng))))
        .expect("points");

    for _ in 0..rng.usize(..6) {
        builder.add_to(16, random_string(rng)).expect("ordered names");
    }
    // Keep the field present even when the loop did nothing.
    if !builder.is_set(16) {
        builder
            .set(16, SetValue::new(ContainerOrdering::Ordered))
            .expect("ordered names");
    }

    for color in &colors {
        if rng.bool() {
            builder
                .put_in(17, color.name(), color.clone())
                .expect("colors by name");
        }
    }
    if !builder.is_set(17) {
        builder
            .set(17, MapValue::new(ContainerOrdering::Default))
            .expect("colors by name");
    }

    let nested = Value::list(
        (0..rng.usize(..4)).map(|_| Value::list((0..rng.usize(..4)).map(|_| rng.i64(..)))),
    );
    builder.set(18, nested).expect("nested");

    builder.build().expect("no required fields")
}

pub fn random_tree(schema: &Schema, rng: &mut fastrand::Rng, depth: usize) -> Message {
    let mut builder = MessageBuilder::new(schema.tree.clone());
    builder.set(1, rng.i32(..)).expect("value");
    if depth > 0 {
        for _ in 0..rng.usize(..3) {
            builder
                .add_to(2, random_tree(schema, rng, depth - 1))
                .expect("child");
        }
    }
    builder.build().expect("value is set")
}
