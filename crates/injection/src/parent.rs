use {
    comet_config::ROOT_REGISTRY_ATTRIBUTE,
    comet_pipeline::RuntimeContext,
    tracing::debug,
};

use crate::registry::SharedRegistry;

/// Finds the registry that a newly created registry should be scoped under.
pub trait ParentContextLookup: Send + Sync {
    fn parent_for(&self, runtime: &RuntimeContext) -> Option<SharedRegistry>;
}

/// Reads the parent registry from a runtime-context attribute.
#[derive(Debug, Clone)]
pub struct RootRegistryLookup {
    attribute: String,
}

impl RootRegistryLookup {
    pub fn new(attribute: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
        }
    }

    /// Publish `registry` on `runtime` under the default attribute.
    #[must_use]
    pub fn attach(runtime: RuntimeContext, registry: SharedRegistry) -> RuntimeContext {
        runtime.with_attribute(ROOT_REGISTRY_ATTRIBUTE, registry)
    }
}

impl Default for RootRegistryLookup {
    fn default() -> Self {
        Self::new(ROOT_REGISTRY_ATTRIBUTE)
    }
}

impl ParentContextLookup for RootRegistryLookup {
    fn parent_for(&self, runtime: &RuntimeContext) -> Option<SharedRegistry> {
        let parent = runtime.attribute::<SharedRegistry>(&self.attribute).cloned();
        if parent.is_none() {
            debug!(runtime = runtime.name(), attribute = %self.attribute, "no parent registry published");
        }
        parent
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::registry::{ComponentContext, ComponentRegistry};

    #[test]
    fn finds_attached_registry() {
        let root: SharedRegistry = Arc::new(ComponentContext::new());
        let runtime = RootRegistryLookup::attach(RuntimeContext::new("web"), Arc::clone(&root));

        let found = RootRegistryLookup::default().parent_for(&runtime).unwrap();
        assert!(Arc::ptr_eq(&found, &root));
    }

    #[test]
    fn ignores_missing_or_mistyped_attribute() {
        let lookup = RootRegistryLookup::default();
        assert!(lookup.parent_for(&RuntimeContext::new("web")).is_none());

        let concrete = Arc::new(ComponentContext::new());
        concrete.refresh().unwrap();
        let mistyped =
            RuntimeContext::new("web").with_attribute(ROOT_REGISTRY_ATTRIBUTE, concrete);
        assert!(lookup.parent_for(&mistyped).is_none());
    }

    #[test]
    fn custom_attribute_name() {
        let root: SharedRegistry = Arc::new(ComponentContext::new());
        let runtime = RuntimeContext::new("web").with_attribute("custom.root", Arc::clone(&root));
        assert!(RootRegistryLookup::new("custom.root").parent_for(&runtime).is_some());
        assert!(RootRegistryLookup::default().parent_for(&runtime).is_none());
    }
}
