//! Component registry contract and the in-process default.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use {
    comet_pipeline::{ComponentType, Constructor, Instance},
    dashmap::{DashMap, mapref::entry::Entry},
    tracing::debug,
};

use crate::{
    error::{RegistryError, Result},
    naming::bean_name,
};

/// A key → instance store owned by a DI subsystem.
///
/// Keys are [`bean_name`]s. Implementations must be safe for concurrent use.
pub trait ComponentRegistry: Send + Sync {
    /// Whether a definition exists under `key` in this registry (parents are
    /// not consulted).
    fn contains(&self, key: &str) -> bool;

    /// Add a definition for `component`. Fails if the key is taken.
    fn register(&self, component: &ComponentType) -> Result<()>;

    /// Add a definition backed by an existing instance.
    fn register_instance(&self, component: &ComponentType, instance: Instance) -> Result<()>;

    /// Look up or create an instance. `Ok(None)` means the registry has none.
    fn get(&self, component: &ComponentType, args: &[Instance]) -> Result<Option<Instance>>;

    /// Make the registry ready to serve lookups.
    fn refresh(&self) -> Result<()>;
}

pub type SharedRegistry = Arc<dyn ComponentRegistry>;

/// Creates a registry scoped under an optional parent.
pub trait RegistryProvider: Send + Sync {
    fn create_child(&self, parent: Option<SharedRegistry>) -> Result<SharedRegistry>;
}

// ── ComponentContext ────────────────────────────────────────────────────────

/// In-process registry with singleton scope and parent delegation.
///
/// Lookup order: cached singleton, local definition with a public
/// constructor, parent registry. Lookups fail until [`refresh`] is called.
///
/// [`refresh`]: ComponentRegistry::refresh
#[derive(Default)]
pub struct ComponentContext {
    parent: Option<SharedRegistry>,
    definitions: DashMap<String, ComponentType>,
    singletons: DashMap<String, Instance>,
    active: AtomicBool,
}

impl ComponentContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parent(parent: SharedRegistry) -> Self {
        Self {
            parent: Some(parent),
            ..Self::default()
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Registered keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.definitions.iter().map(|e| e.key().clone()).collect();
        keys.sort();
        keys
    }

    // Constructors run outside any shard lock and may call back into this
    // context. The first stored instance wins a race.
    fn create_singleton(&self, key: &str, component: &ComponentType) -> Result<Instance> {
        let built = component
            .construct()
            .map_err(|e| RegistryError::creation(key, e.to_string()))?;
        let stored = Arc::clone(self.singletons.entry(key.to_string()).or_insert(built).value());
        debug!(key, component = component.name(), "singleton available");
        Ok(stored)
    }
}

impl ComponentRegistry for ComponentContext {
    fn contains(&self, key: &str) -> bool {
        self.definitions.contains_key(key)
    }

    fn register(&self, component: &ComponentType) -> Result<()> {
        let key = bean_name(component.simple_name());
        match self.definitions.entry(key) {
            Entry::Occupied(e) => Err(RegistryError::duplicate(e.key().clone())),
            Entry::Vacant(e) => {
                debug!(key = %e.key(), component = component.name(), "component registered");
                e.insert(component.clone());
                Ok(())
            },
        }
    }

    fn register_instance(&self, component: &ComponentType, instance: Instance) -> Result<()> {
        let key = bean_name(component.simple_name());
        if !component.matches(&instance) {
            return Err(RegistryError::type_mismatch(key, component.name()));
        }
        match self.definitions.entry(key.clone()) {
            Entry::Occupied(_) => Err(RegistryError::duplicate(key)),
            Entry::Vacant(e) => {
                e.insert(component.clone());
                self.singletons.insert(key.clone(), instance);
                debug!(key = %key, component = component.name(), "instance registered");
                Ok(())
            },
        }
    }

    fn get(&self, component: &ComponentType, args: &[Instance]) -> Result<Option<Instance>> {
        if !self.is_active() {
            return Err(RegistryError::NotActive);
        }
        let key = bean_name(component.simple_name());

        if let Some(instance) = self.singletons.get(&key) {
            return Ok(Some(Arc::clone(instance.value())));
        }

        let local = self.definitions.get(&key).map(|d| d.value().clone());
        if let Some(definition) = &local
            && matches!(definition.constructor(), Constructor::Public(_))
        {
            return self.create_singleton(&key, definition).map(Some);
        }

        if let Some(parent) = &self.parent
            && let Some(instance) = parent.get(component, args)?
        {
            return Ok(Some(instance));
        }

        match local {
            Some(definition) => Err(RegistryError::creation(
                key,
                format!("{} has no public constructor", definition.name()),
            )),
            None => Ok(None),
        }
    }

    fn refresh(&self) -> Result<()> {
        self.active.store(true, Ordering::Release);
        debug!(definitions = self.definitions.len(), "component context refreshed");
        Ok(())
    }
}

/// Provider for [`ComponentContext`] registries.
#[derive(Debug, Default, Clone, Copy)]
pub struct ComponentContextProvider;

impl RegistryProvider for ComponentContextProvider {
    fn create_child(&self, parent: Option<SharedRegistry>) -> Result<SharedRegistry> {
        let context = match parent {
            Some(parent) => ComponentContext::with_parent(parent),
            None => ComponentContext::new(),
        };
        Ok(Arc::new(context))
    }
}
