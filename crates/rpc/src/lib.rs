//! Normalizes RPC-wrapped messages into plain bodies.
//!
//! An upstream deserializer stores the decoded RPC envelope as a request
//! attribute. [`MessageNormalizingInterceptor`] replaces the request body with
//! the envelope's inner payload, and the [`WrappedMessageFilter`] it registers
//! does the same for outbound broadcasts, so every other stage only ever sees
//! plain payloads regardless of the client technology.

pub mod filter;
pub mod interceptor;

pub use {
    comet_config::MESSAGE_OBJECT_ATTRIBUTE,
    filter::WrappedMessageFilter,
    interceptor::MessageNormalizingInterceptor,
};
