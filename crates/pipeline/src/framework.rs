//! Process-wide framework handle and configuration.

use std::{
    any::Any,
    collections::HashMap,
    fmt,
    sync::Arc,
};

use crate::{
    factory::{Component, ComponentType, Constructor},
    filter::{BroadcastFilter, FilterChain},
};

// ── RuntimeContext ──────────────────────────────────────────────────────────

/// Externally supplied runtime context (e.g. the hosting web application).
///
/// Attributes are typed values keyed by name; plugins look up collaborators
/// such as a parent component registry here.
#[derive(Default)]
pub struct RuntimeContext {
    name: String,
    attributes: HashMap<String, Arc<dyn Any + Send + Sync>>,
}

impl RuntimeContext {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_attribute<T: Any + Send + Sync>(mut self, key: impl Into<String>, value: T) -> Self {
        self.set_attribute(key, value);
        self
    }

    pub fn set_attribute<T: Any + Send + Sync>(&mut self, key: impl Into<String>, value: T) {
        self.attributes.insert(key.into(), Arc::new(value));
    }

    /// Returns the attribute if present and of type `T`.
    pub fn attribute<T: Any>(&self, key: &str) -> Option<&T> {
        self.attributes.get(key)?.downcast_ref::<T>()
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for RuntimeContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&String> = self.attributes.keys().collect();
        keys.sort();
        f.debug_struct("RuntimeContext")
            .field("name", &self.name)
            .field("attributes", &keys)
            .finish()
    }
}

// ── Framework ───────────────────────────────────────────────────────────────

/// The host framework as seen by plugins.
#[derive(Debug, Default)]
pub struct Framework {
    filters: FilterChain,
    runtime_context: Option<RuntimeContext>,
}

impl Framework {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_runtime_context(mut self, context: RuntimeContext) -> Self {
        self.runtime_context = Some(context);
        self
    }

    /// Add a filter to the outbound chain used by every broadcaster.
    pub fn register_broadcast_filter(&self, filter: Arc<dyn BroadcastFilter>) -> bool {
        self.filters.add(filter)
    }

    pub fn broadcast_filters(&self) -> &FilterChain {
        &self.filters
    }

    pub fn runtime_context(&self) -> Option<&RuntimeContext> {
        self.runtime_context.as_ref()
    }
}

// ── Configuration ───────────────────────────────────────────────────────────

/// Shared configuration handed to every plugin at setup.
///
/// Built once at bootstrap and read-only afterwards; share it as
/// `Arc<Configuration>`.
#[derive(Debug)]
pub struct Configuration {
    framework: Arc<Framework>,
    init_params: HashMap<String, String>,
}

impl Configuration {
    pub fn new(framework: Arc<Framework>) -> Self {
        Self {
            framework,
            init_params: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_init_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.init_params.insert(key.into(), value.into());
        self
    }

    pub fn init_param(&self, key: &str) -> Option<&str> {
        self.init_params.get(key).map(String::as_str)
    }

    pub fn framework(&self) -> &Arc<Framework> {
        &self.framework
    }
}

impl Component for Configuration {
    fn component_type() -> ComponentType {
        ComponentType::of::<Self>(Constructor::Missing)
    }
}
