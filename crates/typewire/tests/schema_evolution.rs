// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Readers and writers on different versions of the same schema.

use typewire::runtime::MapValue;
use typewire::{
    decode_message, encode_message, BinarySerializer, ContainerOrdering, DecodeError,
    MessageBuilder, MessageDescriptor, PrimitiveKind, TypeDescriptor, Value,
};

fn profile_v1() -> MessageDescriptor {
    MessageDescriptor::builder("acct", "Profile")
        .required(1, "user", PrimitiveKind::String)
        .optional(2, "age", PrimitiveKind::I32)
        .build()
        .expect("valid v1")
}

fn address() -> MessageDescriptor {
    MessageDescriptor::builder("acct", "Address")
        .optional(1, "street", PrimitiveKind::String)
        .optional(2, "zip", PrimitiveKind::I32)
        .build()
        .expect("valid Address")
}

/// v1 plus new optional fields of every wire shape.
fn profile_v2() -> MessageDescriptor {
    MessageDescriptor::builder("acct", "Profile")
        .required(1, "user", PrimitiveKind::String)
        .optional(2, "age", PrimitiveKind::I32)
        .optional(3, "score", PrimitiveKind::Double)
        .optional(4, "emails", TypeDescriptor::list(PrimitiveKind::String))
        .optional(5, "home", address())
        .optional(
            6,
            "prefs",
            TypeDescriptor::map(PrimitiveKind::String, TypeDescriptor::set(PrimitiveKind::I16)),
        )
        .optional(7, "avatar", PrimitiveKind::Binary)
        .build()
        .expect("valid v2")
}

fn full_v2() -> typewire::Message {
    let v2 = profile_v2();
    let mut builder = MessageBuilder::new(v2);
    builder
        .set(1, "ada")
        .and_then(|b| b.set(2, 36))
        .and_then(|b| b.set(3, 9.5))
        .and_then(|b| b.add_to(4, "ada@example.org"))
        .and_then(|b| b.add_to(4, "ada@work.example"))
        .and_then(|b| b.put_in(6, "dark", Value::Set(Default::default())))
        .and_then(|b| b.set(7, &b"\x89PNG"[..]))
        .expect("scalar fields");
    builder
        .mutable_message(5)
        .expect("home")
        .set(1, "1 Analytical Way")
        .and_then(|b| b.set(2, 10101))
        .expect("address");
    builder.build().expect("valid v2 message")
}

#[test]
fn test_old_reader_skips_new_fields() {
    let _ = env_logger::builder().is_test(true).try_init();

    // 1. Write with the newer schema
    let bytes = encode_message(&full_v2()).expect("encode v2");

    // 2. Read with the older one
    let old = decode_message(&bytes, &profile_v1()).expect("decode as v1");

    // 3. Known fields survive, unknown ones are gone
    assert_eq!(old.get(1).and_then(Value::as_str), Some("ada"));
    assert_eq!(old.get(2).and_then(Value::as_i32), Some(36));
    assert_eq!(old.present_count(), 2);
}

#[test]
fn test_new_reader_sees_old_message() {
    let mut builder = MessageBuilder::new(profile_v1());
    builder.set(1, "grace").expect("user");
    let bytes = encode_message(&builder.build().expect("valid v1")).expect("encode v1");

    let new = decode_message(&bytes, &profile_v2()).expect("decode as v2");
    assert_eq!(new.get(1).and_then(Value::as_str), Some("grace"));
    for id in 2..=7 {
        assert!(!new.has(id), "field {id} should be absent");
    }
}

#[test]
fn test_old_reader_result_matches_projection() {
    let v2_message = full_v2();
    let bytes = encode_message(&v2_message).expect("encode v2");
    let projected = decode_message(&bytes, &profile_v1()).expect("decode as v1");

    let mut expected = MessageBuilder::new(profile_v1());
    expected.set(1, "ada").and_then(|b| b.set(2, 36)).expect("fields");
    assert_eq!(projected, expected.build().expect("valid"));
    assert_eq!(encode_message(&projected).expect("re-encode").len(), 3 + 4 + 3 + 3 + 4 + 1);
}

#[test]
fn test_changed_field_type_is_skipped() {
    // Field 2 was an i32, a later writer made it a string.
    let retyped = MessageDescriptor::builder("acct", "Profile")
        .required(1, "user", PrimitiveKind::String)
        .optional(2, "age", PrimitiveKind::String)
        .build()
        .expect("valid retyped");
    let mut builder = MessageBuilder::new(retyped);
    builder.set(1, "alan").and_then(|b| b.set(2, "forty")).expect("fields");
    let bytes = encode_message(&builder.build().expect("valid")).expect("encode");

    let decoded = decode_message(&bytes, &profile_v1()).expect("decode");
    assert_eq!(decoded.get(1).and_then(Value::as_str), Some("alan"));
    assert!(!decoded.has(2));
}

#[test]
fn test_new_required_field_rejects_old_data_unless_lenient() {
    let stricter = MessageDescriptor::builder("acct", "Profile")
        .required(1, "user", PrimitiveKind::String)
        .optional(2, "age", PrimitiveKind::I32)
        .required(3, "region", PrimitiveKind::String)
        .build()
        .expect("valid stricter");

    let mut builder = MessageBuilder::new(profile_v1());
    builder.set(1, "edsger").expect("user");
    let bytes = encode_message(&builder.build().expect("valid")).expect("encode");

    match decode_message(&bytes, &stricter) {
        Err(DecodeError::Validation(err)) => {
            assert_eq!(err.missing_fields(), ["region"]);
        }
        other => panic!("expected a validation error, got {other:?}"),
    }

    let partial = BinarySerializer::lenient()
        .from_slice(&bytes, &stricter)
        .expect("lenient decode");
    assert!(partial.has(1));
    assert!(!partial.has(3));
}

#[test]
fn test_map_ordering_follows_reader_schema() {
    let writer_schema = MessageDescriptor::builder("acct", "Tags")
        .optional(
            1,
            "tags",
            TypeDescriptor::map(PrimitiveKind::String, PrimitiveKind::I32)
                .with_ordering(ContainerOrdering::Ordered),
        )
        .build()
        .expect("valid writer");
    let reader_schema = MessageDescriptor::builder("acct", "Tags")
        .optional(1, "tags", TypeDescriptor::map(PrimitiveKind::String, PrimitiveKind::I32))
        .build()
        .expect("valid reader");

    let mut builder = MessageBuilder::new(writer_schema);
    builder
        .put_in(1, "b", 2)
        .and_then(|b| b.put_in(1, "a", 1))
        .expect("entries");
    let bytes = encode_message(&builder.build().expect("valid")).expect("encode");

    let decoded = decode_message(&bytes, &reader_schema).expect("decode");
    let tags = decoded.get(1).and_then(Value::as_map).expect("tags");
    let expected = MapValue::from_entries(
        ContainerOrdering::Default,
        [(Value::from("a"), Value::I32(1)), (Value::from("b"), Value::I32(2))],
    );
    assert_eq!(tags, &expected);
    let keys: Vec<_> = tags.keys().filter_map(Value::as_str).collect();
    assert_eq!(keys, ["a", "b"]);
}
