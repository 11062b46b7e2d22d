// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use libfuzzer_sys::fuzz_target;
use std::sync::OnceLock;
use typewire::{
    BinarySerializer, CodecConfig, EnumDescriptor, MessageDescriptor, PrimitiveKind,
    TypeDescriptor,
};

fn descriptor() -> &'static MessageDescriptor {
    static DESC: OnceLock<MessageDescriptor> = OnceLock::new();
    DESC.get_or_init(|| {
        let level = EnumDescriptor::builder("fuzz", "Level")
            .value("LOW")
            .value("HIGH")
            .build()
            .expect("valid Level");
        let leaf = MessageDescriptor::union("fuzz", "Leaf")
            .optional(1, "text", PrimitiveKind::String)
            .optional(2, "level", level.clone())
            .build()
            .expect("valid Leaf");
        MessageDescriptor::builder("fuzz", "Root")
            .required(1, "id", PrimitiveKind::I64)
            .optional(2, "flag", PrimitiveKind::Bool)
            .optional(3, "small", PrimitiveKind::Byte)
            .optional(4, "short", PrimitiveKind::I16)
            .optional(5, "real", PrimitiveKind::Double)
            .optional(6, "blob", PrimitiveKind::Binary)
            .optional(7, "leaf", leaf.clone())
            .optional(8, "leaves", TypeDescriptor::list(leaf))
            .optional(9, "tags", TypeDescriptor::set(PrimitiveKind::String))
            .optional(10, "levels", TypeDescriptor::map(PrimitiveKind::I32, level))
            .build()
            .expect("valid Root")
    })
}

fuzz_target!(|data: &[u8]| {
    let desc = descriptor();
    let config = CodecConfig::lenient()
        .with_max_depth(16)
        .with_max_collection_len(1 << 16)
        .with_max_binary_len(1 << 20);
    let serializer = BinarySerializer::with_config(config);

    // Strict decode must never panic
    let _ = BinarySerializer::with_config(config.with_strict(true)).from_slice(data, desc);

    // Anything that decodes must re-encode and decode to the same value
    if let Ok(message) = serializer.from_slice(data, desc) {
        let bytes = serializer.to_vec(&message).expect("re-encode decoded message");
        let again = serializer.from_slice(&bytes, desc).expect("decode re-encoded message");
        assert_eq!(again, message);
    }
});
