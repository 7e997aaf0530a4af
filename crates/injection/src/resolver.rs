//! [`ObjectFactory`] backed by a [`ComponentRegistry`].

use std::{any::Any, fmt, sync::Arc};

use {
    comet_config::InjectionConfig,
    comet_pipeline::{
        Component, ComponentType, Configuration, FactoryError, FactoryStatus, Instance,
        ObjectFactory,
    },
    tracing::{debug, info, warn},
};

use crate::{
    error::{RegistryError, Result},
    naming::bean_name,
    parent::{ParentContextLookup, RootRegistryLookup},
    registry::{ComponentContextProvider, RegistryProvider, SharedRegistry},
};

/// Where a resolved instance came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceSource {
    Container,
    Direct,
}

/// A resolved instance tagged with its origin.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub instance: Instance,
    pub source: InstanceSource,
}

impl Resolution {
    pub fn downcast<C: Any + Send + Sync>(self) -> Option<Arc<C>> {
        self.instance.downcast::<C>().ok()
    }
}

/// Resolves components through a child registry, constructing them directly
/// when the registry has nothing usable.
///
/// Registry failures never reach the caller: they are logged and treated as
/// a miss. Only direct construction can fail, with
/// [`FactoryError::Instantiation`] or [`FactoryError::Access`].
pub struct ManagedObjectResolver {
    provider: Arc<dyn RegistryProvider>,
    parent_lookup: Arc<dyn ParentContextLookup>,
    enabled: bool,
    config: Option<Arc<Configuration>>,
    context: Option<SharedRegistry>,
    status: FactoryStatus,
}

impl ManagedObjectResolver {
    pub fn new() -> Self {
        Self::from_config(&InjectionConfig::default())
    }

    pub fn from_config(config: &InjectionConfig) -> Self {
        Self {
            provider: Arc::new(ComponentContextProvider),
            parent_lookup: Arc::new(RootRegistryLookup::new(
                config.parent_context_attribute.clone(),
            )),
            enabled: config.enabled,
            config: None,
            context: None,
            status: FactoryStatus::Unconfigured,
        }
    }

    #[must_use]
    pub fn with_provider(mut self, provider: impl RegistryProvider + 'static) -> Self {
        self.provider = Arc::new(provider);
        self
    }

    #[must_use]
    pub fn with_parent_lookup(mut self, lookup: impl ParentContextLookup + 'static) -> Self {
        self.parent_lookup = Arc::new(lookup);
        self
    }

    /// The registry created by `configure`, if configuration succeeded.
    pub fn context(&self) -> Option<&SharedRegistry> {
        self.context.as_ref()
    }

    pub fn configuration(&self) -> Option<&Arc<Configuration>> {
        self.config.as_ref()
    }

    /// Resolve `concrete`, reporting whether the registry or direct
    /// construction supplied the instance.
    pub fn resolve_traced(
        &self,
        capability: &'static str,
        concrete: &ComponentType,
    ) -> std::result::Result<Resolution, FactoryError> {
        if let Some(instance) = self.from_registry(concrete) {
            return Ok(Resolution {
                instance,
                source: InstanceSource::Container,
            });
        }

        info!(
            capability,
            component = concrete.name(),
            "unable to find component, creating it directly"
        );
        Ok(Resolution {
            instance: concrete.construct()?,
            source: InstanceSource::Direct,
        })
    }

    fn from_registry(&self, concrete: &ComponentType) -> Option<Instance> {
        let context = self.context.as_ref()?;
        let key = bean_name(concrete.simple_name());

        if !context.contains(&key) {
            match context.register(concrete) {
                Ok(()) => debug!(key = %key, "registered component lazily"),
                // Another request registered it first.
                Err(RegistryError::Duplicate { .. }) => {},
                Err(e) => warn!(key = %key, error = %e, "failed to register component"),
            }
        }

        match context.get(concrete, &[]) {
            Ok(Some(instance)) if concrete.matches(&instance) => Some(instance),
            Ok(Some(_)) => {
                warn!(
                    key = %key,
                    expected = concrete.name(),
                    "registry returned a component of another type"
                );
                None
            },
            Ok(None) => None,
            Err(e) => {
                warn!(key = %key, error = %e, "registry lookup failed");
                None
            },
        }
    }

    fn build_context(&self, config: &Arc<Configuration>) -> Result<SharedRegistry> {
        let parent = config
            .framework()
            .runtime_context()
            .and_then(|runtime| self.parent_lookup.parent_for(runtime));

        let context = self.provider.create_child(parent)?;
        context.refresh()?;

        // Make the configuration itself injectable into user components.
        let config_type = Configuration::component_type();
        let instance: Instance = Arc::clone(config) as Instance;
        context.register_instance(&config_type, instance)?;

        let framework: Instance = Arc::clone(config.framework()) as Instance;
        let injected = context
            .get(&config_type, &[framework])?
            .ok_or_else(|| RegistryError::message("configuration is not injectable"))?
            .downcast::<Configuration>()
            .map_err(|_| {
                RegistryError::type_mismatch(
                    bean_name(config_type.simple_name()),
                    config_type.name(),
                )
            })?;
        if !Arc::ptr_eq(&injected, config) {
            return Err(RegistryError::message(
                "registry returned a different configuration instance",
            ));
        }

        Ok(context)
    }
}

impl Default for ManagedObjectResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectFactory for ManagedObjectResolver {
    fn configure(&mut self, config: &Arc<Configuration>) {
        self.config = Some(Arc::clone(config));

        if !self.enabled {
            info!("component injection disabled, components will be constructed directly");
            self.status = FactoryStatus::Degraded {
                reason: "injection disabled".into(),
            };
            return;
        }

        match self.build_context(config) {
            Ok(context) => {
                self.context = Some(context);
                self.status = FactoryStatus::Ready;
                info!("component injection configured");
            },
            Err(e) => {
                warn!(error = %e, "unable to configure injection");
                self.context = None;
                self.status = FactoryStatus::Degraded {
                    reason: e.to_string(),
                };
            },
        }
    }

    fn new_instance(
        &self,
        capability: &'static str,
        concrete: &ComponentType,
    ) -> std::result::Result<Instance, FactoryError> {
        self.resolve_traced(capability, concrete)
            .map(|resolution| resolution.instance)
    }

    fn allow_injection_of(&self, component: ComponentType) -> &dyn ObjectFactory {
        let Some(context) = &self.context else {
            debug!(component = component.name(), "no registry, injection not available");
            return self;
        };
        let key = bean_name(component.simple_name());
        if context.contains(&key) {
            debug!(key = %key, "component already injectable");
        } else if let Err(e) = context.register(&component) {
            warn!(key = %key, error = %e, "failed to allow injection");
        }
        self
    }

    fn status(&self) -> FactoryStatus {
        self.status.clone()
    }
}

impl fmt::Display for ManagedObjectResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Managed ObjectFactory")
    }
}
