use std::sync::Arc;

use comet_common::Request;

use crate::{action::Action, framework::Configuration};

/// A stage invoked once per inbound request.
///
/// `configure` runs single-threaded at pipeline setup; `inspect` and
/// `post_inspect` may be called concurrently from many requests.
pub trait Interceptor: Send + Sync {
    /// A human-readable name for this interceptor.
    fn name(&self) -> &str;

    /// One-time setup with the shared configuration. Default is a no-op.
    fn configure(&mut self, _config: &Arc<Configuration>) {}

    /// Inspect (and possibly mutate) the request before dispatch.
    fn inspect(&self, request: &mut Request) -> Action;

    /// Called after dispatch, in reverse registration order. Default is a no-op.
    fn post_inspect(&self, _request: &mut Request) {}
}
