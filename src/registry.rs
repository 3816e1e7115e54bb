//! Owning store for registered modules.
//!
//! The registry is the only owner of module instances for the whole session.
//! Everything else (resolver, coordinator, host code) borrows from it.
//!
//! Storage is a hash map keyed by name, so registration order is tracked in a
//! separate list. Re-registering a name replaces the stored module but still
//! appends the name to that list; [`ModuleRegistry::loaded_names`] collapses the
//! repeats so each live module is reported once, at its first registration.

use std::any::Any;

use log::warn;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::ModuleError;
use crate::module::{EngineModule, ModuleState};

/// A stored module together with its lifecycle state.
pub struct ModuleEntry {
    module: Box<dyn EngineModule>,
    state: ModuleState,
}

impl ModuleEntry {
    fn new(module: Box<dyn EngineModule>) -> Self {
        ModuleEntry {
            module,
            state: ModuleState::Registered,
        }
    }

    pub fn module(&self) -> &dyn EngineModule {
        self.module.as_ref()
    }

    pub fn module_mut(&mut self) -> &mut dyn EngineModule {
        self.module.as_mut()
    }

    pub fn state(&self) -> ModuleState {
        self.state
    }

    pub fn is_initialized(&self) -> bool {
        self.state.is_initialized()
    }

    /// Lifecycle transitions belong to the coordinator.
    pub(crate) fn set_state(&mut self, state: ModuleState) {
        self.state = state;
    }
}

/// Map of module names to owned modules, plus registration order.
#[derive(Default)]
pub struct ModuleRegistry {
    modules: FxHashMap<String, ModuleEntry>,
    registration_order: Vec<String>,
}

impl ModuleRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        ModuleRegistry {
            modules: FxHashMap::default(),
            registration_order: Vec::new(),
        }
    }

    /// Store `module` under `name`, taking ownership.
    ///
    /// If the name is already taken the old module is replaced and handed back
    /// so the caller decides when it drops.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        module: Box<dyn EngineModule>,
    ) -> Option<Box<dyn EngineModule>> {
        let name = name.into();
        let previous = self
            .modules
            .insert(name.clone(), ModuleEntry::new(module))
            .map(|entry| entry.module);
        if previous.is_some() {
            warn!("{}", ModuleError::DuplicateRegistration { name: name.clone() });
        }
        self.registration_order.push(name);
        previous
    }

    pub fn get(&self, name: &str) -> Option<&dyn EngineModule> {
        self.modules.get(name).map(|entry| entry.module())
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut dyn EngineModule> {
        self.modules.get_mut(name).map(|entry| entry.module_mut())
    }

    /// Borrow the module under `name` as its concrete type.
    pub fn get_as<T: EngineModule>(&self, name: &str) -> Option<&T> {
        let entry = self.modules.get(name)?;
        let any: &dyn Any = &*entry.module;
        any.downcast_ref::<T>()
    }

    pub fn get_as_mut<T: EngineModule>(&mut self, name: &str) -> Option<&mut T> {
        let entry = self.modules.get_mut(name)?;
        let any: &mut dyn Any = &mut *entry.module;
        any.downcast_mut::<T>()
    }

    pub fn entry(&self, name: &str) -> Option<&ModuleEntry> {
        self.modules.get(name)
    }

    pub fn entry_mut(&mut self, name: &str) -> Option<&mut ModuleEntry> {
        self.modules.get_mut(name)
    }

    /// Returns `true` if a module is stored under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }

    /// Number of live modules (repeated registrations count once).
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Every call to [`register`](Self::register), in order, repeats included.
    pub fn registration_log(&self) -> &[String] {
        &self.registration_order
    }

    /// Live module names in registration order, each listed once.
    pub fn loaded_names(&self) -> Vec<&str> {
        let mut seen: FxHashSet<&str> = FxHashSet::default();
        self.registration_order
            .iter()
            .map(String::as_str)
            .filter(|name| self.modules.contains_key(*name) && seen.insert(*name))
            .collect()
    }
}
