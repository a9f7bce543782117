//! AdapterCache: binding'и по `TypeId`
//!
//! Каждый тип резолвится ровно один раз за жизнь App; после этого запись
//! в кэш не меняется (absent capability тоже не перепроверяется).

use bevy::prelude::*;
use bevy::reflect::{TypePath, TypeRegistry};
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

use super::binding::AdapterBinding;
use super::strategy::BindingStrategy;

#[derive(Resource, Debug, Default)]
pub struct AdapterCache {
    strategy: BindingStrategy,
    bindings: HashMap<TypeId, Arc<AdapterBinding>>,
}

impl AdapterCache {
    pub fn new(strategy: BindingStrategy) -> Self {
        Self {
            strategy,
            bindings: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Уже резолвленный binding (без discovery)
    pub fn get<H: 'static>(&self) -> Option<Arc<AdapterBinding>> {
        self.bindings.get(&TypeId::of::<H>()).cloned()
    }

    /// Binding для типа `H`; при первом обращении: discovery по `sample`
    pub fn binding_for<H>(&mut self, sample: &H, registry: &TypeRegistry) -> Arc<AdapterBinding>
    where
        H: Reflect + TypePath,
    {
        if let Some(binding) = self.bindings.get(&TypeId::of::<H>()) {
            return Arc::clone(binding);
        }

        let (binding, problems) = AdapterBinding::resolve(
            sample,
            TypeId::of::<H>(),
            H::type_path(),
            registry,
            &self.strategy,
        );

        for problem in &problems {
            crate::logger::log_warning(&format!("Adapter discovery: {}", problem));
        }
        crate::logger::log_info(&format!("Adapter binding resolved: {}", binding.summary()));

        let binding = Arc::new(binding);
        self.bindings.insert(TypeId::of::<H>(), Arc::clone(&binding));
        binding
    }
}
