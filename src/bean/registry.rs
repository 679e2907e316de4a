//! Type registry
//!
//! Holds one [`BeanDescriptor`] per registered class. The registry is filled
//! once, then frozen by moving it into an `Arc` (see
//! [`RdfMapper`](crate::mapper::RdfMapper)); from then on it is only read, so
//! concurrent lookups need no locking.

use super::descriptor::BeanDescriptor;
use crate::mapper::{MappingError, MappingResult, RdfBean};
use rustc_hash::FxHashMap;
use std::any::TypeId;
use std::sync::Arc;
use tracing::debug;

/// Registered bean descriptors, keyed by class name
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    beans: FxHashMap<String, Arc<BeanDescriptor>>,
    /// Rust type → class name, for beans registered through [`RdfBean`]
    types: FxHashMap<TypeId, String>,
}

impl TypeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor
    ///
    /// Idempotent per class name: registering a name twice keeps the first
    /// descriptor.
    pub fn register(&mut self, descriptor: BeanDescriptor) {
        if self.beans.contains_key(descriptor.name()) {
            debug!(bean = descriptor.name(), "bean already registered");
            return;
        }
        debug!(
            bean = descriptor.name(),
            type_iri = descriptor.type_iri().as_str(),
            fields = descriptor.fields().len(),
            "registered bean"
        );
        self.beans
            .insert(descriptor.name().to_string(), Arc::new(descriptor));
    }

    /// Register a typed bean and every bean it declares as a dependency
    pub fn register_bean<T: RdfBean + 'static>(&mut self) -> MappingResult<()> {
        if self.types.contains_key(&TypeId::of::<T>()) {
            return Ok(());
        }
        let descriptor = T::descriptor()?;
        self.types
            .insert(TypeId::of::<T>(), descriptor.name().to_string());
        self.register(descriptor);
        T::register_dependencies(self)
    }

    /// Look up a descriptor by class name
    pub fn lookup(&self, name: &str) -> MappingResult<Arc<BeanDescriptor>> {
        self.beans
            .get(name)
            .cloned()
            .ok_or_else(|| MappingError::UnregisteredType(name.to_string()))
    }

    /// Look up the descriptor of a typed bean
    pub fn lookup_bean<T: RdfBean + 'static>(&self) -> MappingResult<Arc<BeanDescriptor>> {
        match self.types.get(&TypeId::of::<T>()) {
            Some(name) => self.lookup(name),
            None => Err(MappingError::UnregisteredType(
                std::any::type_name::<T>().to_string(),
            )),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.beans.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.beans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.beans.is_empty()
    }

    /// Check that every nested field references a registered bean
    pub fn validate(&self) -> MappingResult<()> {
        let mut names: Vec<&String> = self.beans.keys().collect();
        names.sort();
        for name in names {
            for nested in self.beans[name].nested_beans() {
                if !self.contains(nested) {
                    return Err(MappingError::UnregisteredType(nested.to_string()));
                }
            }
        }
        Ok(())
    }
}
