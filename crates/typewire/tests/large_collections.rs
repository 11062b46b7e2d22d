// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Decoding large sets and maps whose items arrive in adversarial order.
//!
//! Item-by-item sorted insertion would make these inputs quadratic; at this
//! size that turns a sub-second decode into minutes.

use byteorder::{BigEndian, WriteBytesExt};
use typewire::binary::{WireType, STOP};
use typewire::{
    decode_message, ContainerOrdering, FieldDescriptor, MessageDescriptor, PrimitiveKind,
    TypeDescriptor, Value,
};

const ITEMS: i32 = 200_000;

fn bulk() -> MessageDescriptor {
    MessageDescriptor::builder("bulk", "Bulk")
        .optional(1, "sorted", TypeDescriptor::set(PrimitiveKind::I32))
        .field_descriptor(
            FieldDescriptor::new(2, "arrival", TypeDescriptor::set(PrimitiveKind::I32))
                .optional()
                .with_ordering(ContainerOrdering::Ordered),
        )
        .optional(3, "lookup", TypeDescriptor::map(PrimitiveKind::I32, PrimitiveKind::I32))
        .build()
        .expect("valid Bulk")
}

fn descending_payload() -> Vec<u8> {
    let mut out = Vec::new();
    for id in [1i16, 2] {
        out.write_u8(WireType::Set as u8).expect("write");
        out.write_i16::<BigEndian>(id).expect("write");
        out.write_u8(WireType::I32 as u8).expect("write");
        out.write_i32::<BigEndian>(ITEMS).expect("write");
        for item in (0..ITEMS).rev() {
            out.write_i32::<BigEndian>(item).expect("write");
        }
    }

    out.write_u8(WireType::Map as u8).expect("write");
    out.write_i16::<BigEndian>(3).expect("write");
    out.write_u8(WireType::I32 as u8).expect("write");
    out.write_u8(WireType::I32 as u8).expect("write");
    out.write_i32::<BigEndian>(ITEMS).expect("write");
    for key in (0..ITEMS).rev() {
        out.write_i32::<BigEndian>(key).expect("write");
        out.write_i32::<BigEndian>(-key).expect("write");
    }

    out.push(STOP);
    out
}

#[test]
fn test_descending_sets_and_map_decode() {
    let desc = bulk();
    let bytes = descending_payload();
    let message = decode_message(&bytes, &desc).expect("decode");
    let len = ITEMS as usize;

    // 1. Value-ordered set comes out ascending
    let sorted = message.get(1).and_then(Value::as_set).expect("set");
    assert_eq!(sorted.len(), len);
    assert_eq!(sorted.iter().next(), Some(&Value::I32(0)));
    assert_eq!(sorted.iter().last(), Some(&Value::I32(ITEMS - 1)));

    // 2. Insertion-ordered set keeps the wire order
    let arrival = message.get(2).and_then(Value::as_set).expect("set");
    assert_eq!(arrival.len(), len);
    assert_eq!(arrival.iter().next(), Some(&Value::I32(ITEMS - 1)));
    assert!(arrival.contains(&Value::I32(12_345)));

    // 3. Map keys come out ascending with their values attached
    let lookup = message.get(3).and_then(Value::as_map).expect("map");
    assert_eq!(lookup.len(), len);
    assert_eq!(lookup.keys().next(), Some(&Value::I32(0)));
    assert_eq!(lookup.get(&Value::I32(777)), Some(&Value::I32(-777)));
}

#[test]
fn test_repeated_map_keys_keep_the_last_value() {
    let desc = bulk();
    let mut bytes = Vec::new();
    bytes.write_u8(WireType::Map as u8).expect("write");
    bytes.write_i16::<BigEndian>(3).expect("write");
    bytes.write_u8(WireType::I32 as u8).expect("write");
    bytes.write_u8(WireType::I32 as u8).expect("write");
    bytes.write_i32::<BigEndian>(3).expect("write");
    for (key, value) in [(5, 1), (2, 2), (5, 3)] {
        bytes.write_i32::<BigEndian>(key).expect("write");
        bytes.write_i32::<BigEndian>(value).expect("write");
    }
    bytes.push(STOP);

    let message = decode_message(&bytes, &desc).expect("decode");
    let lookup = message.get(3).and_then(Value::as_map).expect("map");
    assert_eq!(lookup.len(), 2);
    assert_eq!(lookup.get(&Value::I32(5)), Some(&Value::I32(3)));
}
