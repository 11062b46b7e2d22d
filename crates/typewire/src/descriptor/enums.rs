// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Enum descriptors.

use super::EnumDescriptorBuilder;
use crate::error::DescriptorError;
use crate::runtime::{EnumValue, EnumValueBuilder};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A declared enum value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumEntry {
    pub value: i32,
    pub name: String,
    pub docs: Option<String>,
}

impl EnumEntry {
    pub fn new(name: impl Into<String>, value: i32) -> Self {
        Self {
            value,
            name: name.into(),
            docs: None,
        }
    }

    pub fn with_docs(mut self, docs: impl Into<String>) -> Self {
        self.docs = Some(docs.into());
        self
    }
}

/// Shared, immutable enum descriptor.
///
/// Entries keep declaration order; values need not be contiguous or sorted.
#[derive(Clone)]
pub struct EnumDescriptor {
    inner: Arc<EnumInner>,
}

struct EnumInner {
    namespace: String,
    name: String,
    qualified_name: String,
    docs: Option<String>,
    entries: Vec<EnumEntry>,
    by_value: HashMap<i32, usize>,
    by_name: HashMap<String, usize>,
}

impl EnumDescriptor {
    pub fn builder(namespace: impl Into<String>, name: impl Into<String>) -> EnumDescriptorBuilder {
        EnumDescriptorBuilder::new(namespace, name)
    }

    pub(crate) fn from_parts(
        namespace: String,
        name: String,
        docs: Option<String>,
        entries: Vec<EnumEntry>,
    ) -> Result<Self, DescriptorError> {
        let qualified_name = super::qualify(&namespace, &name);
        let mut by_value = HashMap::with_capacity(entries.len());
        let mut by_name = HashMap::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            if by_value.insert(entry.value, index).is_some() {
                return Err(DescriptorError::DuplicateEnumValue {
                    name: qualified_name,
                    value: entry.value,
                });
            }
            if by_name.insert(entry.name.clone(), index).is_some() {
                return Err(DescriptorError::DuplicateEnumName {
                    name: qualified_name,
                    entry: entry.name.clone(),
                });
            }
        }
        Ok(Self {
            inner: Arc::new(EnumInner {
                namespace,
                name,
                qualified_name,
                docs,
                entries,
                by_value,
                by_name,
            }),
        })
    }

    pub fn namespace(&self) -> &str {
        &self.inner.namespace
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn qualified_name(&self) -> &str {
        &self.inner.qualified_name
    }

    pub fn docs(&self) -> Option<&str> {
        self.inner.docs.as_deref()
    }

    /// Entries in declaration order.
    pub fn entries(&self) -> &[EnumEntry] {
        &self.inner.entries
    }

    pub(crate) fn entry(&self, index: usize) -> &EnumEntry {
        &self.inner.entries[index]
    }

    /// Look up a value by its integer.
    pub fn by_value(&self, value: i32) -> Option<EnumValue> {
        self.inner
            .by_value
            .get(&value)
            .map(|&index| EnumValue::new(self.clone(), index))
    }

    /// Look up a value by its declared name.
    pub fn by_name(&self, name: &str) -> Option<EnumValue> {
        self.inner
            .by_name
            .get(name)
            .map(|&index| EnumValue::new(self.clone(), index))
    }

    /// All values in declaration order.
    pub fn values(&self) -> impl Iterator<Item = EnumValue> + '_ {
        (0..self.inner.entries.len()).map(|index| EnumValue::new(self.clone(), index))
    }

    pub fn value_builder(&self) -> EnumValueBuilder {
        EnumValueBuilder::new(self.clone())
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl PartialEq for EnumDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
            || (self.inner.qualified_name == other.inner.qualified_name
                && self.inner.entries.len() == other.inner.entries.len()
                && self
                    .inner
                    .entries
                    .iter()
                    .zip(&other.inner.entries)
                    .all(|(a, b)| a.value == b.value && a.name == b.name))
    }
}

impl Eq for EnumDescriptor {}

impl fmt::Debug for EnumDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnumDescriptor")
            .field("name", &self.inner.qualified_name)
            .field("entries", &self.inner.entries.len())
            .finish()
    }
}
