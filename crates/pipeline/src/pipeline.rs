//! Explicit plugin registration and per-request dispatch.

use std::sync::Arc;

use {
    comet_common::{Payload, Request},
    tracing::{debug, info},
};

use crate::{
    action::Action,
    factory::{DirectObjectFactory, ObjectFactory},
    filter::BroadcastAction,
    framework::Configuration,
    interceptor::Interceptor,
};

/// Collects plugins before the pipeline is shared across threads.
#[derive(Default)]
pub struct PipelineBuilder {
    interceptors: Vec<Box<dyn Interceptor>>,
    object_factory: Option<Box<dyn ObjectFactory>>,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an interceptor; interceptors run in registration order.
    #[must_use]
    pub fn interceptor(mut self, interceptor: impl Interceptor + 'static) -> Self {
        self.interceptors.push(Box::new(interceptor));
        self
    }

    /// Replace the default [`DirectObjectFactory`].
    #[must_use]
    pub fn object_factory(mut self, factory: impl ObjectFactory + 'static) -> Self {
        self.object_factory = Some(Box::new(factory));
        self
    }

    /// Configure every plugin exactly once and freeze the pipeline.
    pub fn build(self, config: Arc<Configuration>) -> Pipeline {
        let mut object_factory = self
            .object_factory
            .unwrap_or_else(|| Box::new(DirectObjectFactory::new()));
        object_factory.configure(&config);

        let mut interceptors = self.interceptors;
        for interceptor in &mut interceptors {
            interceptor.configure(&config);
            debug!(interceptor = interceptor.name(), "interceptor configured");
        }

        info!(
            interceptors = interceptors.len(),
            broadcast_filters = config.framework().broadcast_filters().len(),
            object_factory = %object_factory,
            status = ?object_factory.status(),
            "pipeline configured"
        );

        Pipeline {
            config,
            interceptors,
            object_factory,
        }
    }
}

/// A configured, immutable pipeline. Safe to share between request threads.
pub struct Pipeline {
    config: Arc<Configuration>,
    interceptors: Vec<Box<dyn Interceptor>>,
    object_factory: Box<dyn ObjectFactory>,
}

impl Pipeline {
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// Run interceptors in order until one returns something other than
    /// [`Action::Continue`].
    pub fn inspect(&self, request: &mut Request) -> Action {
        for interceptor in &self.interceptors {
            let action = interceptor.inspect(request);
            if !action.is_continue() {
                debug!(interceptor = interceptor.name(), %action, "interceptor stopped chain");
                return action;
            }
        }
        Action::Continue
    }

    /// Run `post_inspect` on every interceptor in reverse order.
    pub fn post_inspect(&self, request: &mut Request) {
        for interceptor in self.interceptors.iter().rev() {
            interceptor.post_inspect(request);
        }
    }

    /// Pass an outbound message through the framework's broadcast filters.
    pub fn broadcast(&self, message: Payload) -> BroadcastAction {
        self.config.framework().broadcast_filters().apply(message)
    }

    pub fn object_factory(&self) -> &dyn ObjectFactory {
        &*self.object_factory
    }

    pub fn configuration(&self) -> &Arc<Configuration> {
        &self.config
    }

    pub fn interceptor_names(&self) -> Vec<&str> {
        self.interceptors.iter().map(|i| i.name()).collect()
    }
}
