use std::sync::Arc;

use {
    comet_common::{Payload, Request},
    comet_config::{InterceptorConfig, MESSAGE_OBJECT_ATTRIBUTE},
    comet_pipeline::{Action, Configuration, Interceptor},
    tracing::debug,
};

use crate::filter::WrappedMessageFilter;

/// Replaces the request body with the payload of a wrapped RPC message.
///
/// Requests without the attribute, or whose attribute is not a wrapped
/// message, pass through untouched. `inspect` always returns
/// [`Action::Continue`].
#[derive(Debug, Clone)]
pub struct MessageNormalizingInterceptor {
    attribute: String,
}

impl MessageNormalizingInterceptor {
    /// Attribute name used when none is configured.
    pub const DEFAULT_ATTRIBUTE: &'static str = MESSAGE_OBJECT_ATTRIBUTE;

    pub fn new() -> Self {
        Self::from_config(&InterceptorConfig::default())
    }

    pub fn from_config(config: &InterceptorConfig) -> Self {
        Self {
            attribute: config.message_attribute.clone(),
        }
    }

    /// Read the wrapped message from a different request attribute.
    #[must_use]
    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = attribute.into();
        self
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }
}

impl Default for MessageNormalizingInterceptor {
    fn default() -> Self {
        Self::new()
    }
}

impl Interceptor for MessageNormalizingInterceptor {
    fn name(&self) -> &str {
        "rpc-message-normalizer"
    }

    fn configure(&mut self, config: &Arc<Configuration>) {
        config
            .framework()
            .register_broadcast_filter(Arc::new(WrappedMessageFilter));
    }

    fn inspect(&self, request: &mut Request) -> Action {
        let body = match request.attribute(&self.attribute) {
            Some(Payload::Wrapped(message)) => message.payload().clone(),
            _ => return Action::Continue,
        };
        debug!(
            attribute = %self.attribute,
            len = body.as_bytes().len(),
            "unwrapped rpc message into request body"
        );
        request.set_body(body);
        Action::Continue
    }
}
