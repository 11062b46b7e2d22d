// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Immutable generic message.

use super::hash::FnvHasher;
use super::{MessageBuilder, Value};
use crate::descriptor::{FieldDescriptor, FieldId, MessageDescriptor, MessageVariant};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;

/// Field storage, by declaration index.
#[derive(Debug)]
pub(crate) enum Fields {
    Struct(Vec<Option<Value>>),
    Union(Option<(usize, Value)>),
}

/// A built struct, union or exception instance.
///
/// Cloning is cheap and shares the underlying data. Equality is structural.
#[derive(Clone)]
pub struct Message {
    inner: Arc<MessageData>,
}

struct MessageData {
    descriptor: MessageDescriptor,
    fields: Fields,
    /// 0 until computed.
    hash: AtomicU64,
}

impl Message {
    pub(crate) fn from_parts(descriptor: MessageDescriptor, fields: Fields) -> Self {
        Self {
            inner: Arc::new(MessageData {
                descriptor,
                fields,
                hash: AtomicU64::new(0),
            }),
        }
    }

    /// Message with no field present.
    pub fn empty(descriptor: &MessageDescriptor) -> Self {
        let fields = if descriptor.is_union() {
            Fields::Union(None)
        } else {
            Fields::Struct(vec![None; descriptor.fields().len()])
        };
        Self::from_parts(descriptor.clone(), fields)
    }

    pub fn descriptor(&self) -> &MessageDescriptor {
        &self.inner.descriptor
    }

    pub fn variant(&self) -> MessageVariant {
        self.inner.descriptor.variant()
    }

    pub(crate) fn value_at(&self, index: usize) -> Option<&Value> {
        match &self.inner.fields {
            Fields::Struct(slots) => slots.get(index).and_then(Option::as_ref),
            Fields::Union(Some((active, value))) if *active == index => Some(value),
            Fields::Union(_) => None,
        }
    }

    /// Present values with their declaration index, in declaration order.
    pub(crate) fn entries(&self) -> impl Iterator<Item = (usize, &Value)> {
        let (slots, active) = match &self.inner.fields {
            Fields::Struct(slots) => (Some(slots), None),
            Fields::Union(active) => (None, active.as_ref()),
        };
        slots
            .into_iter()
            .flat_map(|slots| {
                slots
                    .iter()
                    .enumerate()
                    .filter_map(|(index, slot)| slot.as_ref().map(|value| (index, value)))
            })
            .chain(active.map(|(index, value)| (*index, value)))
    }

    /// Whether the field is present. Unknown ids are simply absent.
    pub fn has(&self, id: FieldId) -> bool {
        self.get(id).is_some()
    }

    /// Item count for containers, 0 or 1 otherwise.
    pub fn size(&self, id: FieldId) -> usize {
        self.get(id).map_or(0, Value::count)
    }

    /// Field value, `None` when absent or not declared.
    pub fn get(&self, id: FieldId) -> Option<&Value> {
        self.inner
            .descriptor
            .index_of(id)
            .and_then(|index| self.value_at(index))
    }

    pub fn get_by_name(&self, name: &str) -> Option<&Value> {
        self.inner
            .descriptor
            .find_field_by_name(name)
            .and_then(|field| self.get(field.id()))
    }

    /// Active field of a union.
    pub fn union_field(&self) -> Option<&FieldDescriptor> {
        match &self.inner.fields {
            Fields::Union(Some((index, _))) => Some(self.inner.descriptor.field_at(*index)),
            _ => None,
        }
    }

    /// Present fields with their values, in declaration order.
    pub fn present_fields(&self) -> impl Iterator<Item = (&FieldDescriptor, &Value)> {
        self.entries()
            .map(|(index, value)| (self.inner.descriptor.field_at(index), value))
    }

    /// Number of present fields.
    pub fn present_count(&self) -> usize {
        self.entries().count()
    }

    /// True iff the descriptor is compactible and no present field follows
    /// an absent one.
    pub fn is_compact(&self) -> bool {
        if !self.inner.descriptor.is_compactible() {
            return false;
        }
        let Fields::Struct(slots) = &self.inner.fields else {
            return false;
        };
        let mut gap = false;
        for slot in slots {
            match slot {
                None => gap = true,
                Some(_) if gap => return false,
                Some(_) => {}
            }
        }
        true
    }

    /// Builder seeded with this message's fields; nothing is marked modified.
    pub fn mutate(&self) -> MessageBuilder {
        MessageBuilder::from_message(self)
    }

    /// Process-stable structural hash, computed once.
    pub fn hash_code(&self) -> u64 {
        let cached = self.inner.hash.load(AtomicOrdering::Relaxed);
        if cached != 0 {
            return cached;
        }
        let mut hasher = FnvHasher::default();
        self.inner.descriptor.qualified_name().hash(&mut hasher);
        for (field, value) in self.present_fields() {
            field.id().hash(&mut hasher);
            value.hash(&mut hasher);
        }
        // Zero is reserved for "not computed yet".
        let computed = hasher.finish().max(1);
        self.inner.hash.store(computed, AtomicOrdering::Relaxed);
        computed
    }

    fn compare_struct(&self, a: &[Option<Value>], b: &[Option<Value>]) -> Ordering {
        for (x, y) in a.iter().zip(b) {
            let ord = match (x, y) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Less,
                (Some(_), None) => Ordering::Greater,
                (Some(x), Some(y)) => x.cmp(y),
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        a.len().cmp(&b.len())
    }
}

impl PartialEq for Message {
    fn eq(&self, other: &Self) -> bool {
        if Arc::ptr_eq(&self.inner, &other.inner) {
            return true;
        }
        if self.inner.descriptor != other.inner.descriptor {
            return false;
        }
        match (&self.inner.fields, &other.inner.fields) {
            (Fields::Struct(a), Fields::Struct(b)) => a == b,
            (Fields::Union(a), Fields::Union(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Message {}

impl Hash for Message {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash_code());
    }
}

impl PartialOrd for Message {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Message {
    /// Type name first. Structs then compare field by field in declaration
    /// order, absent before present; unions compare the active field id,
    /// then its value.
    fn cmp(&self, other: &Self) -> Ordering {
        let (a, b) = (&self.inner.descriptor, &other.inner.descriptor);
        let ord = a.qualified_name().cmp(b.qualified_name());
        if ord != Ordering::Equal {
            return ord;
        }
        let ord = match (&self.inner.fields, &other.inner.fields) {
            (Fields::Struct(x), Fields::Struct(y)) => self.compare_struct(x, y),
            (Fields::Union(x), Fields::Union(y)) => {
                let id = |active: &Option<(usize, Value)>, desc: &MessageDescriptor| {
                    active.as_ref().map(|(index, _)| desc.field_at(*index).id())
                };
                id(x, a).cmp(&id(y, b)).then_with(|| {
                    let vx = x.as_ref().map(|(_, v)| v);
                    let vy = y.as_ref().map(|(_, v)| v);
                    vx.cmp(&vy)
                })
            }
            (Fields::Union(_), Fields::Struct(_)) => Ordering::Less,
            (Fields::Struct(_), Fields::Union(_)) => Ordering::Greater,
        };
        // Same name but different layouts: keep the order consistent with `eq`.
        ord.then_with(|| {
            let layout = |d: &MessageDescriptor| {
                d.fields()
                    .iter()
                    .map(|field| (field.id(), field.name().to_string()))
                    .collect::<Vec<_>>()
            };
            layout(a).cmp(&layout(b))
        })
    }
}

impl fmt::Display for Message {
    /// `pkg.Name{field:value,...}` over present fields.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{{", self.inner.descriptor.qualified_name())?;
        for (i, (field, value)) in self.present_fields().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}:{}", field.name(), value)?;
        }
        f.write_str("}")
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Message({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{PrimitiveKind, TypeDescriptor};

    fn point() -> MessageDescriptor {
        MessageDescriptor::builder("geo", "Point")
            .compact()
            .optional(1, "x", PrimitiveKind::I32)
            .optional(2, "y", PrimitiveKind::I32)
            .optional(3, "z", PrimitiveKind::I32)
            .optional(4, "tags", TypeDescriptor::list(PrimitiveKind::String))
            .build()
            .expect("valid descriptor")
    }

    fn build(desc: &MessageDescriptor, values: &[(FieldId, Value)]) -> Message {
        let mut builder = MessageBuilder::new(desc.clone());
        for (id, value) in values {
            builder.set(*id, value.clone()).expect("matching type");
        }
        builder.build().expect("valid message")
    }

    #[test]
    fn test_has_size_get() {
        let desc = point();
        let msg = build(
            &desc,
            &[(1, Value::I32(4)), (4, Value::list(["a", "b", "c"]))],
        );
        assert!(msg.has(1));
        assert!(!msg.has(2));
        assert!(!msg.has(99));
        assert_eq!(msg.size(1), 1);
        assert_eq!(msg.size(2), 0);
        assert_eq!(msg.size(4), 3);
        assert_eq!(msg.get(1), Some(&Value::I32(4)));
        assert_eq!(msg.get_by_name("x"), Some(&Value::I32(4)));
        assert!(msg.get(99).is_none());
        assert_eq!(msg.present_count(), 2);
    }

    #[test]
    fn test_compactness() {
        let desc = point();
        let contiguous = build(&desc, &[(1, Value::I32(1)), (2, Value::I32(2)), (3, Value::I32(3))]);
        assert!(contiguous.is_compact());

        let gap = build(&desc, &[(1, Value::I32(1)), (3, Value::I32(3))]);
        assert!(!gap.is_compact());

        assert!(Message::empty(&desc).is_compact());
    }

    #[test]
    fn test_equality_and_hash() {
        let desc = point();
        let a = build(&desc, &[(1, Value::I32(1))]);
        let b = build(&desc, &[(1, Value::I32(1))]);
        let c = build(&desc, &[(1, Value::I32(2))]);
        assert_eq!(a, b);
        assert_eq!(a.hash_code(), b.hash_code());
        assert_ne!(a, c);
        assert_ne!(a.hash_code(), 0);
        assert_eq!(a.hash_code(), a.hash_code());
    }

    #[test]
    fn test_different_descriptors_never_equal() {
        let other = MessageDescriptor::builder("geo", "Vector")
            .optional(1, "x", PrimitiveKind::I32)
            .build()
            .expect("valid descriptor");
        let a = build(&point(), &[(1, Value::I32(1))]);
        let b = build(&other, &[(1, Value::I32(1))]);
        assert_ne!(a, b);
        assert_ne!(a.cmp(&b), Ordering::Equal);
    }

    #[test]
    fn test_ordering_absent_before_present() {
        let desc = point();
        let absent = build(&desc, &[(2, Value::I32(9))]);
        let present = build(&desc, &[(1, Value::I32(0))]);
        assert!(absent < present);

        let low = build(&desc, &[(1, Value::I32(1))]);
        let high = build(&desc, &[(1, Value::I32(2))]);
        assert!(low < high);
    }

    #[test]
    fn test_display() {
        let msg = build(&point(), &[(1, Value::I32(1)), (4, Value::list(["a"]))]);
        assert_eq!(msg.to_string(), r#"geo.Point{x:1,tags:["a"]}"#);
    }
}
