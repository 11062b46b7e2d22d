// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Enum values bound to their descriptor.

use crate::descriptor::{EnumDescriptor, EnumEntry};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A declared value of an enum type.
#[derive(Clone)]
pub struct EnumValue {
    descriptor: EnumDescriptor,
    index: usize,
}

impl EnumValue {
    pub(crate) fn new(descriptor: EnumDescriptor, index: usize) -> Self {
        Self { descriptor, index }
    }

    fn entry(&self) -> &EnumEntry {
        self.descriptor.entry(self.index)
    }

    pub fn value(&self) -> i32 {
        self.entry().value
    }

    pub fn name(&self) -> &str {
        &self.entry().name
    }

    pub fn docs(&self) -> Option<&str> {
        self.entry().docs.as_deref()
    }

    pub fn descriptor(&self) -> &EnumDescriptor {
        &self.descriptor
    }
}

impl PartialEq for EnumValue {
    fn eq(&self, other: &Self) -> bool {
        self.value() == other.value() && self.descriptor == other.descriptor
    }
}

impl Eq for EnumValue {}

impl Hash for EnumValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.descriptor.qualified_name().hash(state);
        self.value().hash(state);
    }
}

impl PartialOrd for EnumValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EnumValue {
    fn cmp(&self, other: &Self) -> Ordering {
        self.descriptor
            .qualified_name()
            .cmp(other.descriptor.qualified_name())
            .then_with(|| self.value().cmp(&other.value()))
    }
}

impl fmt::Debug for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}({})",
            self.descriptor.qualified_name(),
            self.name(),
            self.value()
        )
    }
}

impl fmt::Display for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum RawEnum {
    Value(i32),
    Name(String),
}

/// Builder resolving an enum value from a raw integer or name.
///
/// Unlike [`MessageBuilder`](super::MessageBuilder), building never fails:
/// an unresolvable input yields `None`.
#[derive(Debug, Clone)]
pub struct EnumValueBuilder {
    descriptor: EnumDescriptor,
    raw: Option<RawEnum>,
}

impl EnumValueBuilder {
    pub fn new(descriptor: EnumDescriptor) -> Self {
        Self {
            descriptor,
            raw: None,
        }
    }

    pub fn set_value(&mut self, value: i32) -> &mut Self {
        self.raw = Some(RawEnum::Value(value));
        self
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.raw = Some(RawEnum::Name(name.into()));
        self
    }

    pub fn clear(&mut self) -> &mut Self {
        self.raw = None;
        self
    }

    /// True iff the raw input names a declared value.
    pub fn valid(&self) -> bool {
        self.build().is_some()
    }

    pub fn build(&self) -> Option<EnumValue> {
        match self.raw.as_ref()? {
            RawEnum::Value(value) => self.descriptor.by_value(*value),
            RawEnum::Name(name) => self.descriptor.by_name(name),
        }
    }
}
