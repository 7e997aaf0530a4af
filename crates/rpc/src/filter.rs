use {
    comet_common::Payload,
    comet_pipeline::{BroadcastAction, BroadcastFilter},
    tracing::debug,
};

/// Broadcast-side twin of the interceptor: unwraps envelopes before fan-out.
#[derive(Debug, Default, Clone, Copy)]
pub struct WrappedMessageFilter;

impl WrappedMessageFilter {
    pub const NAME: &'static str = "rpc-wrapped-message";
}

impl BroadcastFilter for WrappedMessageFilter {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn filter(&self, message: Payload) -> BroadcastAction {
        match message {
            Payload::Wrapped(wrapped) => {
                debug!(
                    len = wrapped.payload().as_bytes().len(),
                    "unwrapping outbound rpc message"
                );
                BroadcastAction::Continue(Payload::Body(wrapped.into_payload()))
            },
            other => BroadcastAction::Continue(other),
        }
    }
}
