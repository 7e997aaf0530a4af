use serde::{Deserialize, Serialize};

/// Request attribute under which the RPC deserializer stores the wrapped message.
pub const MESSAGE_OBJECT_ATTRIBUTE: &str = "comet.rpc.message_object";

/// Runtime-context attribute holding the parent component registry.
pub const ROOT_REGISTRY_ATTRIBUTE: &str = "comet.injection.root_registry";

/// Top-level settings file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CometConfig {
    pub interceptor: InterceptorConfig,
    pub injection: InjectionConfig,
}

/// Settings for the message-normalizing interceptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterceptorConfig {
    /// Attribute name read on every inbound request.
    pub message_attribute: String,
}

impl Default for InterceptorConfig {
    fn default() -> Self {
        Self {
            message_attribute: MESSAGE_OBJECT_ATTRIBUTE.into(),
        }
    }
}

/// Settings for the managed object resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InjectionConfig {
    /// When false, every instance is constructed directly.
    pub enabled: bool,
    /// Runtime-context attribute consulted for the parent registry.
    pub parent_context_attribute: String,
}

impl Default for InjectionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            parent_context_attribute: ROOT_REGISTRY_ATTRIBUTE.into(),
        }
    }
}
