// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Named type registry.
//!
//! Descriptors are registered once under their qualified name. Fields may
//! refer to a type before it is registered through [`TypeRegistry::reference`],
//! which is how self-referential and mutually recursive schemas are built:
//!
//! ```rust
//! use typewire::descriptor::{MessageDescriptor, PrimitiveKind, TypeDescriptor, TypeRegistry};
//!
//! let registry = TypeRegistry::new();
//! let node = MessageDescriptor::builder("tree", "Node")
//!     .required(1, "value", PrimitiveKind::I32)
//!     .optional(2, "children", TypeDescriptor::list(registry.reference("tree.Node")))
//!     .build()
//!     .unwrap();
//! registry.register_message(node).unwrap();
//! registry.resolve_all().unwrap();
//! ```

use super::{EnumDescriptor, MessageDescriptor, TypeDescriptor, TypeRef};
use crate::error::DescriptorError;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::{Arc, Weak};

/// Registry of named message and enum descriptors.
#[derive(Debug)]
pub struct TypeRegistry {
    this: Weak<TypeRegistry>,
    types: RwLock<HashMap<String, TypeDescriptor>>,
    pending: Mutex<Vec<TypeRef>>,
}

impl TypeRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            this: this.clone(),
            types: RwLock::new(HashMap::new()),
            pending: Mutex::new(Vec::new()),
        })
    }

    pub fn register_message(&self, descriptor: MessageDescriptor) -> Result<(), DescriptorError> {
        let name = descriptor.qualified_name().to_string();
        self.register(name, TypeDescriptor::Message(descriptor))
    }

    pub fn register_enum(&self, descriptor: EnumDescriptor) -> Result<(), DescriptorError> {
        let name = descriptor.qualified_name().to_string();
        self.register(name, TypeDescriptor::Enum(descriptor))
    }

    fn register(&self, name: String, descriptor: TypeDescriptor) -> Result<(), DescriptorError> {
        let mut types = self.types.write();
        if types.contains_key(&name) {
            return Err(DescriptorError::DuplicateType(name));
        }
        log::debug!("[registry] registered {}", name);
        types.insert(name, descriptor);
        Ok(())
    }

    /// Lazy reference to a named type, registered now or later.
    pub fn reference(&self, name: impl Into<String>) -> TypeRef {
        let type_ref = TypeRef::deferred(name.into(), self.this.clone());
        self.pending.lock().push(type_ref.clone());
        type_ref
    }

    pub fn get(&self, name: &str) -> Option<TypeDescriptor> {
        self.types.read().get(name).cloned()
    }

    pub fn message(&self, name: &str) -> Option<MessageDescriptor> {
        match self.types.read().get(name) {
            Some(TypeDescriptor::Message(descriptor)) => Some(descriptor.clone()),
            _ => None,
        }
    }

    pub fn enumeration(&self, name: &str) -> Option<EnumDescriptor> {
        match self.types.read().get(name) {
            Some(TypeDescriptor::Enum(descriptor)) => Some(descriptor.clone()),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.types.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.read().is_empty()
    }

    /// Resolve every reference handed out so far.
    ///
    /// Fails on the first name that is still not registered; resolved
    /// references are kept, so the call can be repeated after registering
    /// the missing type.
    pub fn resolve_all(&self) -> Result<(), DescriptorError> {
        let mut pending = self.pending.lock();
        let mut result = Ok(());
        pending.retain(|type_ref| match type_ref.try_get() {
            Ok(_) => false,
            Err(err) => {
                if result.is_ok() {
                    result = Err(err);
                }
                true
            }
        });
        result
    }
}
