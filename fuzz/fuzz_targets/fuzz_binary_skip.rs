// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use libfuzzer_sys::fuzz_target;
use typewire::{BinaryReader, CodecConfig};

fuzz_target!(|data: &[u8]| {
    // Skipping without a descriptor walks every wire type
    let config = CodecConfig::default().with_max_collection_len(1 << 16);
    let mut reader = BinaryReader::with_config(data, config);
    while reader.skip_message().is_ok() {}
});
