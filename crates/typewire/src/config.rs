// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Codec configuration - limits and strictness for the binary reader.
//!
//! All limits are applied while decoding untrusted input. Encoding has no
//! configuration: a built message is always written the same way.
//!
//! # Example
//!
//! ```rust
//! use typewire::config::CodecConfig;
//!
//! let config = CodecConfig::default().with_max_depth(16);
//! assert!(config.strict);
//!
//! let lenient = CodecConfig::lenient();
//! assert!(!lenient.strict);
//! ```

/// Default nesting limit (messages and containers) while decoding.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Default upper bound on a declared list/set/map item count.
pub const DEFAULT_MAX_COLLECTION_LEN: u32 = 16 * 1024 * 1024;

/// Default upper bound on a declared string/binary length (64 MiB).
pub const DEFAULT_MAX_BINARY_LEN: u32 = 64 * 1024 * 1024;

/// Items reserved up front for a decoded container, whatever the declared count.
pub(crate) const MAX_PREALLOC_ITEMS: usize = 1024;

/// Binary codec configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct CodecConfig {
    /// Validate required fields (and union activity) after decoding.
    pub strict: bool,
    /// Maximum nesting of messages and containers.
    pub max_depth: usize,
    /// Maximum declared item count of a single container.
    pub max_collection_len: u32,
    /// Maximum declared length of a single string or binary payload.
    pub max_binary_len: u32,
}

impl CodecConfig {
    /// Configuration that builds decoded messages without validating them.
    pub fn lenient() -> Self {
        Self {
            strict: false,
            ..Self::default()
        }
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_collection_len(mut self, max: u32) -> Self {
        self.max_collection_len = max;
        self
    }

    pub fn with_max_binary_len(mut self, max: u32) -> Self {
        self.max_binary_len = max;
        self
    }
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            strict: true,
            max_depth: DEFAULT_MAX_DEPTH,
            max_collection_len: DEFAULT_MAX_COLLECTION_LEN,
            max_binary_len: DEFAULT_MAX_BINARY_LEN,
        }
    }
}
